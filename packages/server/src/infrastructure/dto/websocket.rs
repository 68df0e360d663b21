//! WebSocket event DTOs.
//!
//! Every frame is a JSON envelope `{"event": <name>, "data": <payload>}`.
//! Payload fields that are absent decode as empty strings so the coordinator's
//! non-empty guards decide what gets dropped.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JoinPayload {
    pub room_id: String,
    pub user_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CodeChangePayload {
    pub room_id: String,
    pub code: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LanguageChangePayload {
    pub room_id: String,
    pub language: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TypingPayload {
    pub room_id: String,
    pub user_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StopTypingPayload {
    pub room_id: String,
}

/// Inbound event sent by a participant
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientEvent {
    Join(JoinPayload),
    CodeChange(CodeChangePayload),
    LanguageChange(LanguageChangePayload),
    Typing(TypingPayload),
    StopTyping(StopTypingPayload),
    LeaveRoom,
}

/// Raw envelope before the payload is interpreted
#[derive(Debug, Deserialize)]
struct InboundEnvelope {
    event: String,
    #[serde(default)]
    data: Value,
}

/// Failure to decode an inbound frame
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed event frame: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("unknown event '{0}'")]
    UnknownEvent(String),
}

impl ClientEvent {
    /// Decode a text frame into a client event.
    ///
    /// A missing or `null` payload is treated as `{}`; `leaveRoom` ignores its
    /// payload entirely.
    pub fn decode(text: &str) -> Result<Self, DecodeError> {
        let envelope: InboundEnvelope = serde_json::from_str(text)?;
        let data = match envelope.data {
            Value::Null => Value::Object(Default::default()),
            data => data,
        };

        let event = match envelope.event.as_str() {
            "join" => Self::Join(serde_json::from_value(data)?),
            "codeChange" => Self::CodeChange(serde_json::from_value(data)?),
            "languageChange" => Self::LanguageChange(serde_json::from_value(data)?),
            "typing" => Self::Typing(serde_json::from_value(data)?),
            "stopTyping" => Self::StopTyping(serde_json::from_value(data)?),
            "leaveRoom" => Self::LeaveRoom,
            other => return Err(DecodeError::UnknownEvent(other.to_string())),
        };
        Ok(event)
    }

    /// Encode as a text frame
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Wire name of the event
    pub fn name(&self) -> &'static str {
        match self {
            Self::Join(_) => "join",
            Self::CodeChange(_) => "codeChange",
            Self::LanguageChange(_) => "languageChange",
            Self::Typing(_) => "typing",
            Self::StopTyping(_) => "stopTyping",
            Self::LeaveRoom => "leaveRoom",
        }
    }
}

/// Outbound event sent to participants
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerEvent {
    /// Full membership of the room (the name is kept for wire compatibility;
    /// it is sent on every membership change, leaves included)
    UserJoined(Vec<String>),
    CodeUpdate(String),
    LanguageUpdate(String),
    /// Name of the typing participant, or `""` to clear
    UserTyping(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_join() {
        // テスト項目: join イベントが正しくデコードされる
        // given (前提条件):
        let text = r#"{"event":"join","data":{"roomId":"abc123","userName":"alice"}}"#;

        // when (操作):
        let event = ClientEvent::decode(text).unwrap();

        // then (期待する結果):
        assert_eq!(
            event,
            ClientEvent::Join(JoinPayload {
                room_id: "abc123".to_string(),
                user_name: "alice".to_string(),
            })
        );
    }

    #[test]
    fn test_decode_missing_fields_as_empty() {
        // テスト項目: 欠けたフィールドは空文字列としてデコードされる
        // given (前提条件):
        let text = r#"{"event":"join","data":{"roomId":"abc123"}}"#;

        // when (操作):
        let event = ClientEvent::decode(text).unwrap();

        // then (期待する結果):
        assert_eq!(
            event,
            ClientEvent::Join(JoinPayload {
                room_id: "abc123".to_string(),
                user_name: String::new(),
            })
        );
    }

    #[test]
    fn test_decode_leave_room_with_or_without_payload() {
        // テスト項目: leaveRoom はペイロードの有無に関わらずデコードされる
        // given (前提条件):
        let bare = r#"{"event":"leaveRoom"}"#;
        let with_payload = r#"{"event":"leaveRoom","data":{"roomId":"abc123","userName":"alice"}}"#;

        // when (操作):
        let first = ClientEvent::decode(bare).unwrap();
        let second = ClientEvent::decode(with_payload).unwrap();

        // then (期待する結果):
        assert_eq!(first, ClientEvent::LeaveRoom);
        assert_eq!(second, ClientEvent::LeaveRoom);
    }

    #[test]
    fn test_decode_stop_typing_without_data() {
        // テスト項目: data がない stopTyping は空のルーム ID としてデコードされる
        // given (前提条件):
        let text = r#"{"event":"stopTyping","data":null}"#;

        // when (操作):
        let event = ClientEvent::decode(text).unwrap();

        // then (期待する結果):
        assert_eq!(event, ClientEvent::StopTyping(StopTypingPayload::default()));
    }

    #[test]
    fn test_decode_unknown_event() {
        // テスト項目: 未知のイベント名はエラーになる
        // given (前提条件):
        let text = r#"{"event":"userTyping","data":"alice"}"#;

        // when (操作):
        let result = ClientEvent::decode(text);

        // then (期待する結果):
        assert!(matches!(result, Err(DecodeError::UnknownEvent(name)) if name == "userTyping"));
    }

    #[test]
    fn test_decode_malformed_frame() {
        // テスト項目: JSON でないフレームやペイロードの型違いはエラーになる
        // given (前提条件):
        let not_json = "hello";
        let wrong_type = r#"{"event":"codeChange","data":{"roomId":1,"code":"x"}}"#;

        // when (操作):
        let first = ClientEvent::decode(not_json);
        let second = ClientEvent::decode(wrong_type);

        // then (期待する結果):
        assert!(matches!(first, Err(DecodeError::Malformed(_))));
        assert!(matches!(second, Err(DecodeError::Malformed(_))));
    }

    #[test]
    fn test_encode_client_event_uses_wire_names() {
        // テスト項目: クライアントイベントはワイヤ上の名前でエンコードされる
        // given (前提条件):
        let event = ClientEvent::CodeChange(CodeChangePayload {
            room_id: "abc123".to_string(),
            code: "x=1".to_string(),
        });

        // when (操作):
        let json: Value = serde_json::from_str(&event.encode().unwrap()).unwrap();

        // then (期待する結果):
        assert_eq!(json["event"], "codeChange");
        assert_eq!(json["data"]["roomId"], "abc123");
        assert_eq!(json["data"]["code"], "x=1");
        assert_eq!(event.name(), "codeChange");
    }

    #[test]
    fn test_server_event_wire_format() {
        // テスト項目: サーバーイベントが {"event","data"} 形式でシリアライズされる
        // given (前提条件):
        let members = ServerEvent::UserJoined(vec!["alice".to_string(), "bob".to_string()]);
        let cleared = ServerEvent::UserTyping(String::new());

        // when (操作):
        let members_json = serde_json::to_string(&members).unwrap();
        let cleared_json = serde_json::to_string(&cleared).unwrap();

        // then (期待する結果):
        assert_eq!(
            members_json,
            r#"{"event":"userJoined","data":["alice","bob"]}"#
        );
        assert_eq!(cleared_json, r#"{"event":"userTyping","data":""}"#);
        assert_eq!(
            serde_json::from_str::<ServerEvent>(&members_json).unwrap(),
            members
        );
    }
}
