use std::io::BufRead;
use std::path::PathBuf;

use crossbeam_channel::Sender;

use sepia_core::filtering::domain::intensity::Intensity;
use sepia_core::photos::domain::image_reader::ImageReader;
use sepia_core::pipeline::preview_controller::ControllerEvent;

pub const HELP: &str = "Commands: <0.0-1.0> | commit [<0.0-1.0>] | open <path> | save | quit";

#[derive(Debug, PartialEq)]
pub enum Command {
    Intensity(Intensity),
    Commit(Option<Intensity>),
    Open(PathBuf),
    Save,
    Quit,
}

pub fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word {
        "save" if rest.is_empty() => Ok(Command::Save),
        "quit" | "exit" if rest.is_empty() => Ok(Command::Quit),
        "commit" if rest.is_empty() => Ok(Command::Commit(None)),
        "commit" => parse_intensity(rest).map(|i| Command::Commit(Some(i))),
        "open" if !rest.is_empty() => Ok(Command::Open(PathBuf::from(rest))),
        "open" => Err("open needs a path".to_string()),
        _ if rest.is_empty() => parse_intensity(word).map(Command::Intensity),
        _ => Err(format!("Unknown command '{line}'. {HELP}")),
    }
}

fn parse_intensity(text: &str) -> Result<Intensity, String> {
    let value: f32 = text
        .parse()
        .map_err(|_| format!("Unknown command '{text}'. {HELP}"))?;
    Intensity::new(value).map_err(|e| e.to_string())
}

/// Feeds commands from `input` to the controller until `quit` or EOF.
///
/// Returns the last intensity the user asked for.
pub fn run<R: BufRead>(
    input: R,
    events: &Sender<ControllerEvent>,
    reader: &dyn ImageReader,
    initial: Intensity,
) -> Result<Intensity, Box<dyn std::error::Error>> {
    let mut last = initial;

    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(message) => {
                eprintln!("{message}");
                continue;
            }
        };

        match command {
            Command::Intensity(intensity) => {
                last = intensity;
                events.send(ControllerEvent::IntensityChanged(intensity.value()))?;
            }
            Command::Commit(intensity) => {
                last = intensity.unwrap_or(last);
                events.send(ControllerEvent::IntensityCommitted(last.value()))?;
            }
            Command::Open(path) => match reader.read(&path) {
                Ok(picked) => events.send(ControllerEvent::NewSourceImagePicked(picked))?,
                Err(e) => eprintln!("Could not open {}: {e}", path.display()),
            },
            Command::Save => events.send(ControllerEvent::SaveRequested)?,
            Command::Quit => break,
        }
    }

    Ok(last)
}
