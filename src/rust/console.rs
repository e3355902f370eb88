use std::path::PathBuf;
use std::str::FromStr;

use crate::canvas::{CanvasError, HexColor};

pub const HELP: &str = "\
commands:
  pen <5-25>          set pen thickness
  color <#RRGGBB>     set pen color
  background <#RRGGBB> set background color (clears the canvas)
  draw <strokes.json> add strokes to the canvas
  load <image>        classify an image file instead of the canvas
  clear               clear the canvas
  predict             classify the current canvas
  history             show this session's predictions
  settings            show pen and canvas settings
  help                show this help
  quit                end the session";

#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    #[error("Unknown command '{0}', type 'help' for a list")]
    Unknown(String),
    #[error("'{0}' needs an argument")]
    MissingArgument(&'static str),
    #[error("Invalid pen thickness '{0}'")]
    InvalidWidth(String),
    #[error(transparent)]
    Canvas(#[from] CanvasError),
}

/// One line of input in an interactive session.
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleCommand {
    Pen(u32),
    Color(HexColor),
    Background(HexColor),
    Draw(PathBuf),
    Load(PathBuf),
    Clear,
    Predict,
    History,
    Settings,
    Help,
    Quit,
}

impl FromStr for ConsoleCommand {
    type Err = ConsoleError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (name, arg) = match line.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, Some(arg.trim()).filter(|a| !a.is_empty())),
            None => (line, None),
        };
        let required = |command: &'static str| arg.ok_or(ConsoleError::MissingArgument(command));

        match name.to_ascii_lowercase().as_str() {
            "pen" => {
                let raw = required("pen")?;
                raw.parse()
                    .map(ConsoleCommand::Pen)
                    .map_err(|_| ConsoleError::InvalidWidth(raw.to_string()))
            }
            "color" => Ok(ConsoleCommand::Color(required("color")?.parse()?)),
            "background" | "bg" => Ok(ConsoleCommand::Background(required("background")?.parse()?)),
            "draw" => Ok(ConsoleCommand::Draw(PathBuf::from(required("draw")?))),
            "load" => Ok(ConsoleCommand::Load(PathBuf::from(required("load")?))),
            "clear" => Ok(ConsoleCommand::Clear),
            "predict" | "p" => Ok(ConsoleCommand::Predict),
            "history" => Ok(ConsoleCommand::History),
            "settings" => Ok(ConsoleCommand::Settings),
            "help" | "?" => Ok(ConsoleCommand::Help),
            "quit" | "exit" | "q" => Ok(ConsoleCommand::Quit),
            _ => Err(ConsoleError::Unknown(line.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!("pen 20".parse::<ConsoleCommand>().unwrap(), ConsoleCommand::Pen(20));
        assert_eq!(
            "color #ff0000".parse::<ConsoleCommand>().unwrap(),
            ConsoleCommand::Color(HexColor { r: 255, g: 0, b: 0 })
        );
        assert_eq!(
            "  draw  strokes/alif.json ".parse::<ConsoleCommand>().unwrap(),
            ConsoleCommand::Draw(PathBuf::from("strokes/alif.json"))
        );
        assert_eq!("PREDICT".parse::<ConsoleCommand>().unwrap(), ConsoleCommand::Predict);
        assert_eq!("q".parse::<ConsoleCommand>().unwrap(), ConsoleCommand::Quit);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            "pen".parse::<ConsoleCommand>(),
            Err(ConsoleError::MissingArgument("pen"))
        ));
        assert!(matches!(
            "pen thick".parse::<ConsoleCommand>(),
            Err(ConsoleError::InvalidWidth(_))
        ));
        assert!(matches!(
            "color red".parse::<ConsoleCommand>(),
            Err(ConsoleError::Canvas(_))
        ));
        assert!(matches!(
            "erase".parse::<ConsoleCommand>(),
            Err(ConsoleError::Unknown(_))
        ));
    }
}
