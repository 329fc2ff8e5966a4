pub mod filter_engine;
pub mod intensity;
pub mod resampler;
