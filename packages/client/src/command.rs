//! Parsing of terminal input lines.

use crate::error::ClientError;

/// One line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Append a line to the shared document
    Edit(String),
    /// `/lang <language>`
    Language(String),
    /// `/join <room> <name>`
    Join { room: String, name: String },
    /// `/leave`
    Leave,
    /// `/clear`
    Clear,
    /// `/quit`
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, ClientError> {
        let Some(rest) = line.strip_prefix('/') else {
            return Ok(Self::Edit(line.to_string()));
        };

        let mut parts = rest.split_whitespace();
        let command = match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some("lang"), Some(language), None, None) => Self::Language(language.to_string()),
            (Some("join"), Some(room), Some(name), None) => Self::Join {
                room: room.to_string(),
                name: name.to_string(),
            },
            (Some("leave"), None, None, None) => Self::Leave,
            (Some("clear"), None, None, None) => Self::Clear,
            (Some("quit"), None, None, None) => Self::Quit,
            _ => return Err(ClientError::InvalidCommand(line.to_string())),
        };
        Ok(command)
    }
}

/// Usage text printed for invalid input
pub const USAGE: &str = "\
commands:
  <text>              append a line to the document
  /lang <language>    change the room language
  /join <room> <name> switch rooms
  /leave              leave the current room
  /clear              empty the document
  /quit               exit";
