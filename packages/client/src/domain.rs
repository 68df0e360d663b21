//! Domain logic for client-side operations.
//!
//! This module contains pure functions and state transitions that implement
//! the client's behaviour without I/O, making them easy to test.

use coderoom_server::infrastructure::dto::websocket::{
    ClientEvent, CodeChangePayload, JoinPayload, LanguageChangePayload, ServerEvent,
    StopTypingPayload, TypingPayload,
};

use crate::command::Command;

pub const DEFAULT_LANGUAGE: &str = "javascript";

/// Local view of the session: where we are and what the document holds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub room: Option<String>,
    pub name: String,
    pub document: String,
    pub language: String,
    pub members: Vec<String>,
}

impl SessionState {
    pub fn new(room: String, name: String) -> Self {
        Self {
            room: Some(room),
            name,
            document: String::new(),
            language: DEFAULT_LANGUAGE.to_string(),
            members: Vec::new(),
        }
    }

    /// Event that (re-)joins the current room, if any
    pub fn join_event(&self) -> Option<ClientEvent> {
        self.room.as_ref().map(|room| {
            ClientEvent::Join(JoinPayload {
                room_id: room.clone(),
                user_name: self.name.clone(),
            })
        })
    }

    /// Apply a local command and return the events to send, in order.
    ///
    /// Edits and language changes outside a room change only local state.
    pub fn apply_command(&mut self, command: Command) -> Vec<ClientEvent> {
        match command {
            Command::Edit(line) => {
                self.document.push_str(&line);
                self.document.push('\n');
                self.document_events(true)
            }
            Command::Clear => {
                self.document.clear();
                self.document_events(false)
            }
            Command::Language(language) => {
                self.language = language.clone();
                self.room
                    .iter()
                    .map(|room| {
                        ClientEvent::LanguageChange(LanguageChangePayload {
                            room_id: room.clone(),
                            language: language.clone(),
                        })
                    })
                    .collect()
            }
            Command::Join { room, name } => {
                self.room = Some(room);
                self.name = name;
                self.members.clear();
                self.join_event().into_iter().collect()
            }
            Command::Leave => {
                let was_joined = self.room.take().is_some();
                self.document.clear();
                self.language = DEFAULT_LANGUAGE.to_string();
                self.members.clear();
                if was_joined {
                    vec![ClientEvent::LeaveRoom]
                } else {
                    Vec::new()
                }
            }
            Command::Quit => Vec::new(),
        }
    }

    /// Apply an event received from the relay
    pub fn apply_server_event(&mut self, event: &ServerEvent) {
        match event {
            ServerEvent::UserJoined(names) => {
                let mut names = names.clone();
                names.sort();
                self.members = names;
            }
            ServerEvent::CodeUpdate(code) => self.document = code.clone(),
            ServerEvent::LanguageUpdate(language) => self.language = language.clone(),
            ServerEvent::UserTyping(_) => {}
        }
    }

    fn document_events(&self, with_typing: bool) -> Vec<ClientEvent> {
        let Some(room) = &self.room else {
            return Vec::new();
        };

        let mut events = Vec::with_capacity(3);
        if with_typing {
            events.push(ClientEvent::Typing(TypingPayload {
                room_id: room.clone(),
                user_name: self.name.clone(),
            }));
        }
        events.push(ClientEvent::CodeChange(CodeChangePayload {
            room_id: room.clone(),
            code: self.document.clone(),
        }));
        if with_typing {
            events.push(ClientEvent::StopTyping(StopTypingPayload {
                room_id: room.clone(),
            }));
        }
        events
    }
}

/// Check if the client should attempt to reconnect.
///
/// # Arguments
///
/// * `current_attempt` - The current reconnection attempt count (0-indexed)
/// * `max_attempts` - The maximum number of reconnection attempts allowed
pub fn should_attempt_reconnect(current_attempt: u32, max_attempts: u32) -> bool {
    current_attempt < max_attempts
}

/// Reconnection attempt count after a session ends with an error.
///
/// A session that had connected starts a fresh series, so only consecutive
/// failures to connect count towards the limit.
pub fn next_reconnect_count(current_attempt: u32, was_connected: bool) -> u32 {
    if was_connected { 1 } else { current_attempt + 1 }
}
