//! Value objects.
//!
//! Raw strings coming off the wire are validated here once; everything past
//! this point works with types that cannot be empty.

use std::fmt;

use uuid::Uuid;

use super::error::ValueObjectError;

/// Key of a room. Opaque, case-sensitive and never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomKey(String);

impl RoomKey {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.is_empty() {
            return Err(ValueObjectError::EmptyRoomKey);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for RoomKey {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for RoomKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Display name of a participant.
///
/// Not unique across rooms; within one room names form a set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParticipantName(String);

impl ParticipantName {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.is_empty() {
            return Err(ValueObjectError::EmptyParticipantName);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for ParticipantName {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for ParticipantName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity the gateway assigns to one transport connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// Generate a fresh random identity
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Unix timestamp in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_key_rejects_empty_string() {
        // テスト項目: 空文字列の RoomKey は作成できない
        // given (前提条件):
        let raw = String::new();

        // when (操作):
        let result = RoomKey::new(raw);

        // then (期待する結果):
        assert_eq!(result, Err(ValueObjectError::EmptyRoomKey));
    }

    #[test]
    fn test_room_key_is_case_sensitive() {
        // テスト項目: RoomKey は大文字小文字を区別する
        // given (前提条件):
        let lower = RoomKey::new("abc123".to_string()).unwrap();

        // when (操作):
        let upper = RoomKey::new("ABC123".to_string()).unwrap();

        // then (期待する結果):
        assert_ne!(lower, upper);
        assert_eq!(lower.as_str(), "abc123");
    }

    #[test]
    fn test_room_key_keeps_whitespace_verbatim() {
        // テスト項目: RoomKey は入力をトリムせずそのまま保持する
        // given (前提条件):
        let raw = " room ".to_string();

        // when (操作):
        let key = RoomKey::try_from(raw).unwrap();

        // then (期待する結果):
        assert_eq!(key.into_string(), " room ");
    }

    #[test]
    fn test_participant_name_rejects_empty_string() {
        // テスト項目: 空文字列の ParticipantName は作成できない
        // given (前提条件):
        let raw = String::new();

        // when (操作):
        let result = ParticipantName::try_from(raw);

        // then (期待する結果):
        assert_eq!(result, Err(ValueObjectError::EmptyParticipantName));
    }

    #[test]
    fn test_connection_ids_are_unique() {
        // テスト項目: 生成された ConnectionId は互いに異なる
        // given (前提条件):
        let first = ConnectionId::generate();

        // when (操作):
        let second = ConnectionId::generate();

        // then (期待する結果):
        assert_ne!(first, second);
        assert_eq!(first.to_string().len(), 36);
    }
}
