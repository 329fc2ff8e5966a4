mod console_surface;
mod session;
mod settings;

use std::io;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use sepia_core::filtering::domain::filter_engine::FilterEngine;
use sepia_core::filtering::domain::intensity::Intensity;
use sepia_core::filtering::infrastructure::lanczos_resampler::LanczosResampler;
use sepia_core::filtering::infrastructure::sepia_tone_engine::SepiaToneEngine;
use sepia_core::photos::domain::image_reader::ImageReader;
use sepia_core::photos::infrastructure::directory_photo_library::DirectoryPhotoLibrary;
use sepia_core::photos::infrastructure::image_file_reader::ImageFileReader;
use sepia_core::photos::infrastructure::image_file_writer::ImageFileWriter;
use sepia_core::pipeline::infrastructure::threaded_filter_dispatcher::ThreadedFilterDispatcher;
use sepia_core::pipeline::pipeline_logger::LogPipelineLogger;
use sepia_core::pipeline::preview_controller::{
    self, ControllerEvent, PreviewConfig, PreviewController,
};
use sepia_core::shared::constants::IMAGE_EXTENSIONS;

use console_surface::ConsoleSurface;
use settings::Settings;

/// Sepia-tone filter for photos, with a throttled live-preview session.
#[derive(Parser)]
#[command(name = "sepia")]
struct Cli {
    /// Input image file.
    input: PathBuf,

    /// Output file (required unless --interactive is used).
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Filter intensity (0.0-1.0). Defaults to the last value used.
    #[arg(long)]
    intensity: Option<f32>,

    /// Directory saved photos are written to.
    #[arg(long)]
    library: Option<PathBuf>,

    /// Read slider commands from stdin and keep a live preview file updated.
    #[arg(long, short)]
    interactive: bool,

    /// Directory for the live preview file (default: a temporary directory).
    #[arg(long)]
    preview_dir: Option<PathBuf>,

    /// Width of the display the preview is sized for.
    #[arg(long)]
    viewport_width: Option<u32>,

    /// Minimum milliseconds between two throttled preview renders.
    #[arg(long)]
    min_interval_ms: Option<u64>,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut settings = Settings::load();
    apply_overrides(&cli, &mut settings);
    validate(&cli, &settings)?;

    let intensity = Intensity::new(settings.intensity)?;

    if cli.interactive {
        let preview_dir = cli.preview_dir.as_deref();
        let last = run_interactive(&cli.input, preview_dir, &settings, intensity)?;
        persisted_after_session(Settings::load(), last).save();
    } else if let Some(output) = &cli.output {
        run_one_shot(&cli.input, output, intensity)?;
    }

    Ok(())
}

fn run_one_shot(
    input: &Path,
    output: &Path,
    intensity: Intensity,
) -> Result<(), Box<dyn std::error::Error>> {
    let picked = ImageFileReader::new().read(input)?;
    let upright = picked.image.oriented(picked.orientation);

    let filtered = SepiaToneEngine::new().apply(&upright, intensity)?;
    ImageFileWriter::new().write(output, &filtered)?;
    log::info!(
        "Output written to {} (intensity {:.2})",
        output.display(),
        intensity.value()
    );
    Ok(())
}

fn run_interactive(
    input: &Path,
    preview_dir: Option<&Path>,
    settings: &Settings,
    intensity: Intensity,
) -> Result<Intensity, Box<dyn std::error::Error>> {
    // Held until the session ends so a temporary preview file survives it.
    let temp_dir = tempfile::tempdir()?;
    let preview_path = preview_dir.unwrap_or(temp_dir.path()).join("preview.png");

    let reader = ImageFileReader::new();
    let picked = reader.read(input)?;

    let config = PreviewConfig {
        min_interval: settings.min_interval(),
        viewport_width: settings.viewport_width,
    };
    let library_dir = settings.library_dir_or_default();
    log::info!("Saving photos to {}", library_dir.display());

    let controller = PreviewController::new(
        config,
        Arc::new(SepiaToneEngine::new()),
        Box::new(LanczosResampler::new()),
        Box::new(ThreadedFilterDispatcher::new()),
        Box::new(DirectoryPhotoLibrary::new(library_dir)),
        Box::new(LogPipelineLogger::new()),
        ConsoleSurface::new(preview_path),
    )
    .with_intensity(intensity);

    eprintln!("Live preview: {}", controller.surface().preview_path().display());

    let (events, handle) = preview_controller::spawn(controller);
    events.send(ControllerEvent::NewSourceImagePicked(picked))?;

    eprintln!("{}", session::HELP);

    let result = session::run(io::stdin().lock(), &events, &reader, intensity);

    // The loop may already be gone if the session failed on a send.
    let _ = events.send(ControllerEvent::Shutdown);
    let surface = handle
        .join()
        .map_err(|_| "preview controller thread panicked")?;
    log::info!("{} previews displayed", surface.displayed());

    result
}

/// Stored settings with only the session's last intensity written back;
/// one-off flags never become defaults.
fn persisted_after_session(stored: Settings, last: Intensity) -> Settings {
    Settings {
        intensity: last.value(),
        ..stored
    }
}

fn apply_overrides(cli: &Cli, settings: &mut Settings) {
    if let Some(intensity) = cli.intensity {
        settings.intensity = intensity;
    }
    if let Some(library) = &cli.library {
        settings.library_dir = Some(library.clone());
    }
    if let Some(width) = cli.viewport_width {
        settings.viewport_width = width;
    }
    if let Some(ms) = cli.min_interval_ms {
        settings.min_interval_ms = ms;
    }
}

fn validate(cli: &Cli, settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    if !cli.input.exists() {
        return Err(format!("Input file not found: {}", cli.input.display()).into());
    }
    if !is_image(&cli.input) {
        return Err(format!(
            "Unsupported image type: {} (expected one of {})",
            cli.input.display(),
            IMAGE_EXTENSIONS.join(", ")
        )
        .into());
    }
    if !cli.interactive && cli.output.is_none() {
        return Err("Output file is required unless --interactive is used".into());
    }
    if cli.interactive && cli.output.is_some() {
        return Err("--output and --interactive are mutually exclusive".into());
    }
    if !(0.0..=1.0).contains(&settings.intensity) {
        return Err(format!(
            "Intensity must be between 0.0 and 1.0, got {}",
            settings.intensity
        )
        .into());
    }
    if settings.viewport_width == 0 {
        return Err("Viewport width must be positive".into());
    }
    if settings.min_interval() > Duration::from_secs(10) {
        return Err(format!(
            "Minimum interval must be at most 10000 ms, got {}",
            settings.min_interval_ms
        )
        .into());
    }
    Ok(())
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("sepia").chain(args.iter().copied()))
    }

    #[rstest]
    #[case("photo.jpg", true)]
    #[case("photo.JPEG", true)]
    #[case("photo.png", true)]
    #[case("clip.mp4", false)]
    #[case("noext", false)]
    fn test_is_image(#[case] path: &str, #[case] expected: bool) {
        assert_eq!(is_image(Path::new(path)), expected);
    }

    #[test]
    fn test_overrides_replace_settings() {
        let args = cli(&[
            "in.png",
            "--intensity",
            "0.9",
            "--library",
            "/photos",
            "--viewport-width",
            "800",
            "--min-interval-ms",
            "30",
        ]);
        let mut settings = Settings::default();
        apply_overrides(&args, &mut settings);

        assert_eq!(settings.intensity, 0.9);
        assert_eq!(settings.library_dir, Some(PathBuf::from("/photos")));
        assert_eq!(settings.viewport_width, 800);
        assert_eq!(settings.min_interval_ms, 30);
    }

    #[test]
    fn test_session_persists_only_last_intensity() {
        let stored = Settings {
            intensity: 0.2,
            min_interval_ms: 70,
            viewport_width: 375,
            library_dir: Some(PathBuf::from("/photos")),
        };
        let args = cli(&[
            "in.png",
            "-i",
            "--library",
            "/tmp/one_off",
            "--min-interval-ms",
            "5000",
            "--viewport-width",
            "9",
        ]);
        let mut effective = stored.clone();
        apply_overrides(&args, &mut effective);
        assert_eq!(effective.viewport_width, 9);

        let saved = persisted_after_session(stored.clone(), Intensity::new(0.8).unwrap());
        assert_eq!(
            saved,
            Settings {
                intensity: 0.8,
                ..stored
            }
        );
    }

    #[test]
    fn test_validate_requires_output_or_interactive() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.png");
        std::fs::write(&input, b"").unwrap();
        let input = input.to_str().unwrap();

        assert!(validate(&cli(&[input]), &Settings::default()).is_err());
        assert!(validate(&cli(&[input, "-i"]), &Settings::default()).is_ok());
        assert!(validate(&cli(&[input, "-o", "out.png"]), &Settings::default()).is_ok());
        assert!(validate(&cli(&[input, "-i", "-o", "out.png"]), &Settings::default()).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.png");
        std::fs::write(&input, b"").unwrap();
        let args = cli(&[input.to_str().unwrap(), "-i"]);

        let out_of_range = Settings {
            intensity: 1.5,
            ..Default::default()
        };
        assert!(validate(&args, &out_of_range).is_err());

        let zero_width = Settings {
            viewport_width: 0,
            ..Default::default()
        };
        assert!(validate(&args, &zero_width).is_err());
    }

    #[test]
    fn test_validate_rejects_missing_and_unsupported_input() {
        assert!(validate(&cli(&["/nonexistent/in.png", "-i"]), &Settings::default()).is_err());

        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("notes.txt");
        std::fs::write(&input, b"").unwrap();
        assert!(validate(&cli(&[input.to_str().unwrap(), "-i"]), &Settings::default()).is_err());
    }

    #[test]
    fn test_one_shot_writes_filtered_image() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.png");
        let output = dir.path().join("out").join("sepia.png");
        let gray = sepia_core::shared::raster_image::RasterImage::filled(8, 6, [100, 100, 100]);
        ImageFileWriter::new().write(&input, &gray).unwrap();

        run_one_shot(&input, &output, Intensity::FULL).unwrap();

        let written = ImageFileReader::new().read(&output).unwrap().image;
        assert_eq!((written.width(), written.height()), (8, 6));
        assert_eq!(written.pixel(3, 3), [135, 120, 94]);
    }
}
