pub mod lanczos_resampler;
pub mod sepia_tone_engine;
