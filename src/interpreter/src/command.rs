use std::fmt::Display;

use hexpr_core::Face;
use itertools::Itertools;
use thiserror::Error;

/// Prefix that routes a reply to the chat as an error.
pub const CHAT_ERROR_PREFIX: &str = "sendtochaterror";

/// Each face button and the name of its position on the module.
pub const POSITIONAL_ALIASES: [(Face, &str); 6] = [
    (Face::U, "tm"),
    (Face::D, "bm"),
    (Face::F, "br"),
    (Face::B, "tl"),
    (Face::L, "bl"),
    (Face::R, "tr"),
];

/// The faces that can be cycled on their own.
pub const CYCLABLE_FACES: [Face; 3] = [Face::U, Face::B, Face::R];

/// A button on the module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    Face(Face),
    Submit,
}

impl Display for Control {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Control::Face(face) => write!(f, "{face}"),
            Control::Submit => write!(f, "submit"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Submit,
    Press(Vec<Face>),
    Cycle(Vec<Face>),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Do you honestly expect me to know what {} means? 4Head", .0.to_uppercase())]
    UnknownToken(String),
    #[error("Maybe you should tell me what to press. Kappa")]
    NothingToPress,
    #[error("Sorry, I can't cycle the {} face.", .0.to_uppercase())]
    CannotCycle(String),
    #[error("Maybe you should tell me what to cycle. Kappa")]
    NothingToCycle,
    #[error("Unrecognized command `{0}`.")]
    UnknownCommand(String),
}

impl CommandError {
    /// The single line sent back over the command channel.
    pub fn to_chat(&self) -> String {
        format!("{CHAT_ERROR_PREFIX} {self}")
    }
}

pub fn positional_name(face: Face) -> &'static str {
    POSITIONAL_ALIASES
        .iter()
        .find_map(|&(f, name)| (f == face).then_some(name))
        .unwrap_or_default()
}

/// Resolves a lowercase token to a face, by face letter or by position.
pub fn resolve_token(token: &str) -> Option<Face> {
    token.parse().ok().or_else(|| {
        POSITIONAL_ALIASES
            .iter()
            .find_map(|&(face, name)| (name == token).then_some(face))
    })
}

impl Command {
    /// Parses one line from the command channel. Case and surrounding
    /// whitespace are ignored.
    ///
    /// # Errors
    ///
    /// Any unrecognised or disallowed token rejects the whole command.
    pub fn parse(input: &str) -> Result<Command, CommandError> {
        let input = input.trim().to_lowercase();

        if matches!(input.as_str(), "submit" | "press submit" | "check") {
            return Ok(Command::Submit);
        }

        let mut tokens = input.split_whitespace();
        match tokens.next() {
            Some("press") => {
                let faces = tokens
                    .map(|token| {
                        resolve_token(token)
                            .ok_or_else(|| CommandError::UnknownToken(token.to_owned()))
                    })
                    .collect::<Result<Vec<_>, _>>()?;

                if faces.is_empty() {
                    return Err(CommandError::NothingToPress);
                }
                Ok(Command::Press(faces))
            }
            Some("cycle") => {
                let faces = tokens
                    .map(|token| {
                        resolve_token(token)
                            .filter(|face| CYCLABLE_FACES.contains(face))
                            .ok_or_else(|| CommandError::CannotCycle(token.to_owned()))
                    })
                    .collect::<Result<Vec<_>, _>>()?;

                if faces.is_empty() {
                    return Err(CommandError::NothingToCycle);
                }
                Ok(Command::Cycle(faces))
            }
            _ => Err(CommandError::UnknownCommand(input)),
        }
    }
}

impl Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::Submit => write!(f, "submit"),
            Command::Press(faces) => write!(f, "press {}", faces.iter().join(" ")),
            Command::Cycle(faces) => write!(f, "cycle {}", faces.iter().join(" ")),
        }
    }
}
