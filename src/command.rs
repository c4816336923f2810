use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::game::Game;

/// Everything the engine can be told to do. Each variant maps to one method
/// on [`Game`].
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Command {
    Start,
    Pause,
    Resume,
    MoveLeft,
    MoveRight,
    MoveDown,
    Rotate,
    Drop,
    Tick,
    SetWidth(usize),
    SetHeight(usize),
    Reset,
}

impl Game {
    /// Applies one command. Commands that make no sense in the current
    /// status are ignored.
    pub fn apply(&mut self, command: Command) {
        match command {
            Command::Start => self.start(),
            Command::Pause => self.pause(),
            Command::Resume => self.resume(),
            Command::MoveLeft => {
                self.move_left();
            }
            Command::MoveRight => {
                self.move_right();
            }
            Command::MoveDown => {
                self.move_down();
            }
            Command::Rotate => {
                self.rotate();
            }
            Command::Drop => self.hard_drop(),
            Command::Tick => self.tick(),
            Command::SetWidth(width) => self.set_width(width),
            Command::SetHeight(height) => self.set_height(height),
            Command::Reset => self.reset(),
        }
    }
}

// ============================================================================
// Text form
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParseCommandError {
    #[display("empty command")]
    Empty,
    #[display("unknown command `{name}`")]
    Unknown { name: String },
    #[display("`{name}` expects a size argument")]
    MissingArgument { name: String },
    #[display("`{name}` got an invalid size `{value}`")]
    InvalidArgument { name: String, value: String },
    #[display("`{name}` takes no argument")]
    UnexpectedArgument { name: String },
}

impl FromStr for Command {
    type Err = ParseCommandError;

    /// Parses `MOVE_LEFT`, `move-left`, `SET_WIDTH 12` and the like.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let name = words
            .next()
            .ok_or(ParseCommandError::Empty)?
            .to_ascii_uppercase()
            .replace('-', "_");
        let argument = words.next();
        if words.next().is_some() {
            return Err(ParseCommandError::UnexpectedArgument { name });
        }

        let command = match name.as_str() {
            "SET_WIDTH" => return parse_size(&name, argument).map(Command::SetWidth),
            "SET_HEIGHT" => return parse_size(&name, argument).map(Command::SetHeight),
            "START" => Command::Start,
            "PAUSE" => Command::Pause,
            "RESUME" => Command::Resume,
            "MOVE_LEFT" => Command::MoveLeft,
            "MOVE_RIGHT" => Command::MoveRight,
            "MOVE_DOWN" => Command::MoveDown,
            "ROTATE" => Command::Rotate,
            "DROP" => Command::Drop,
            "TICK" => Command::Tick,
            "RESET" => Command::Reset,
            _ => return Err(ParseCommandError::Unknown { name: name.clone() }),
        };

        if argument.is_some() {
            return Err(ParseCommandError::UnexpectedArgument { name });
        }
        Ok(command)
    }
}

fn parse_size(name: &str, argument: Option<&str>) -> Result<usize, ParseCommandError> {
    let value = argument.ok_or_else(|| ParseCommandError::MissingArgument {
        name: name.to_owned(),
    })?;
    value
        .parse()
        .map_err(|_| ParseCommandError::InvalidArgument {
            name: name.to_owned(),
            value: value.to_owned(),
        })
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Start => f.write_str("START"),
            Command::Pause => f.write_str("PAUSE"),
            Command::Resume => f.write_str("RESUME"),
            Command::MoveLeft => f.write_str("MOVE_LEFT"),
            Command::MoveRight => f.write_str("MOVE_RIGHT"),
            Command::MoveDown => f.write_str("MOVE_DOWN"),
            Command::Rotate => f.write_str("ROTATE"),
            Command::Drop => f.write_str("DROP"),
            Command::Tick => f.write_str("TICK"),
            Command::SetWidth(width) => write!(f, "SET_WIDTH {width}"),
            Command::SetHeight(height) => write!(f, "SET_HEIGHT {height}"),
            Command::Reset => f.write_str("RESET"),
        }
    }
}
