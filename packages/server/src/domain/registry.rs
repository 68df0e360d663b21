//! Room registry: the membership and affiliation tables.
//!
//! `RoomRegistry` is plain synchronous state. Every mutating call returns the
//! deliveries it produced, in the order they must be sent; the caller holds the
//! registry behind a single lock and pushes those deliveries before releasing
//! it, which keeps affiliation lookups and membership mutations atomic together.

use std::{collections::HashMap, sync::Arc};

use coderoom_shared::time::Clock;

use super::{
    entity::{Affiliation, Room},
    value_object::{ConnectionId, ParticipantName, RoomKey, Timestamp},
};

/// Outbound event produced by the coordinator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundEvent {
    /// Full membership of a room after a change
    MembersChanged(Vec<ParticipantName>),
    /// Document content, relayed verbatim
    CodeUpdated(String),
    /// Selected language, relayed verbatim
    LanguageChanged(String),
    /// Typing pulse; `None` clears the indicator
    TypingChanged(Option<ParticipantName>),
}

/// One outbound event addressed to a set of connections
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub recipients: Vec<ConnectionId>,
    pub event: OutboundEvent,
}

/// Tracks which connection is in which room under which name.
pub struct RoomRegistry {
    rooms: HashMap<RoomKey, Room>,
    affiliations: HashMap<ConnectionId, Affiliation>,
    clock: Arc<dyn Clock>,
}

impl RoomRegistry {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            rooms: HashMap::new(),
            affiliations: HashMap::new(),
            clock,
        }
    }

    /// Join `room` as `name`, detaching from any previous affiliation first.
    ///
    /// # Returns
    ///
    /// The membership broadcasts to send: the previous room's (if the
    /// connection moved) followed by the new room's.
    pub fn join(
        &mut self,
        connection: ConnectionId,
        room: RoomKey,
        name: ParticipantName,
    ) -> Vec<Delivery> {
        let unchanged = self
            .affiliations
            .get(&connection)
            .is_some_and(|current| current.room == room && current.name == name);
        if unchanged {
            // a same-named connection may have removed the name meanwhile
            if let Some(current) = self.rooms.get_mut(&room) {
                current.attach(connection, name);
            }
            return vec![self.membership_delivery(&room)];
        }

        let mut deliveries = Vec::with_capacity(2);
        if let Some(previous) = self.detach(&connection) {
            deliveries.push(self.membership_delivery(&previous));
        }

        let created_at = Timestamp::new(self.clock.now_millis());
        self.rooms
            .entry(room.clone())
            .or_insert_with(|| Room::new(room.clone(), created_at))
            .attach(connection, name.clone());
        self.affiliations
            .insert(connection, Affiliation::new(room.clone(), name));

        deliveries.push(self.membership_delivery(&room));
        deliveries
    }

    /// Leave the current room, if any.
    ///
    /// # Returns
    ///
    /// The membership broadcast for the room that was left, or `None` when the
    /// connection had no affiliation.
    pub fn leave(&mut self, connection: &ConnectionId) -> Option<Delivery> {
        let room = self.detach(connection)?;
        Some(self.membership_delivery(&room))
    }

    /// Address a relay event to the connections of `room`.
    ///
    /// A missing room yields a delivery with no recipients.
    pub fn relay(
        &self,
        room: &RoomKey,
        exclude: Option<&ConnectionId>,
        event: OutboundEvent,
    ) -> Delivery {
        let recipients = self
            .rooms
            .get(room)
            .map(|r| r.connection_ids(exclude))
            .unwrap_or_default();
        Delivery { recipients, event }
    }

    pub fn affiliation(&self, connection: &ConnectionId) -> Option<&Affiliation> {
        self.affiliations.get(connection)
    }

    pub fn is_affiliated_with(&self, connection: &ConnectionId, room: &RoomKey) -> bool {
        self.affiliations
            .get(connection)
            .is_some_and(|a| &a.room == room)
    }

    pub fn room(&self, key: &RoomKey) -> Option<&Room> {
        self.rooms.get(key)
    }

    /// All non-empty rooms, sorted by key
    pub fn rooms(&self) -> Vec<&Room> {
        let mut rooms: Vec<&Room> = self.rooms.values().collect();
        rooms.sort_by(|a, b| a.key.cmp(&b.key));
        rooms
    }

    pub fn members(&self, key: &RoomKey) -> Vec<ParticipantName> {
        self.rooms
            .get(key)
            .map(|r| r.members().iter().cloned().collect())
            .unwrap_or_default()
    }

    fn detach(&mut self, connection: &ConnectionId) -> Option<RoomKey> {
        let affiliation = self.affiliations.remove(connection)?;
        if let Some(room) = self.rooms.get_mut(&affiliation.room) {
            room.detach(connection, &affiliation.name);
            if room.is_empty() {
                self.rooms.remove(&affiliation.room);
            }
        }
        Some(affiliation.room)
    }

    fn membership_delivery(&self, key: &RoomKey) -> Delivery {
        self.relay(key, None, OutboundEvent::MembersChanged(self.members(key)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coderoom_shared::time::FixedClock;

    fn create_test_registry() -> RoomRegistry {
        RoomRegistry::new(Arc::new(FixedClock::new(1000)))
    }

    fn key(value: &str) -> RoomKey {
        RoomKey::new(value.to_string()).unwrap()
    }

    fn name(value: &str) -> ParticipantName {
        ParticipantName::new(value.to_string()).unwrap()
    }

    fn members_of(delivery: &Delivery) -> Vec<&str> {
        match &delivery.event {
            OutboundEvent::MembersChanged(names) => names.iter().map(|n| n.as_str()).collect(),
            other => panic!("expected MembersChanged, got {:?}", other),
        }
    }

    #[test]
    fn test_join_creates_room_and_broadcasts_membership() {
        // テスト項目: 初回 join でルームが作成され、メンバー一覧がルームに配信される
        // given (前提条件):
        let mut registry = create_test_registry();
        let alice = ConnectionId::generate();

        // when (操作):
        let deliveries = registry.join(alice, key("abc123"), name("alice"));

        // then (期待する結果):
        assert_eq!(deliveries.len(), 1);
        assert_eq!(deliveries[0].recipients, vec![alice]);
        assert_eq!(members_of(&deliveries[0]), vec!["alice"]);
        let room = registry.room(&key("abc123")).unwrap();
        assert_eq!(room.created_at, Timestamp::new(1000));
    }

    #[test]
    fn test_join_twice_is_idempotent() {
        // テスト項目: 同じルーム・同じ名前で 2 回 join してもメンバー集合は変わらない
        // given (前提条件):
        let mut registry = create_test_registry();
        let alice = ConnectionId::generate();
        registry.join(alice, key("R"), name("alice"));

        // when (操作):
        let deliveries = registry.join(alice, key("R"), name("alice"));

        // then (期待する結果): 配信は 1 回だけ発生し、重複はない
        assert_eq!(deliveries.len(), 1);
        assert_eq!(members_of(&deliveries[0]), vec!["alice"]);
        assert_eq!(registry.members(&key("R")), vec![name("alice")]);
    }

    #[test]
    fn test_join_other_room_moves_affiliation() {
        // テスト項目: 別ルームへの join で旧ルームから外れ、旧ルーム → 新ルームの順に配信される
        // given (前提条件):
        let mut registry = create_test_registry();
        let alice = ConnectionId::generate();
        let bob = ConnectionId::generate();
        registry.join(alice, key("R1"), name("alice"));
        registry.join(bob, key("R1"), name("bob"));

        // when (操作):
        let deliveries = registry.join(alice, key("R2"), name("alice"));

        // then (期待する結果):
        assert_eq!(deliveries.len(), 2);
        assert_eq!(deliveries[0].recipients, vec![bob]);
        assert_eq!(members_of(&deliveries[0]), vec!["bob"]);
        assert_eq!(deliveries[1].recipients, vec![alice]);
        assert_eq!(members_of(&deliveries[1]), vec!["alice"]);
        assert_eq!(registry.members(&key("R1")), vec![name("bob")]);
        assert!(registry.is_affiliated_with(&alice, &key("R2")));
        assert!(!registry.is_affiliated_with(&alice, &key("R1")));
    }

    #[test]
    fn test_join_same_room_under_new_name() {
        // テスト項目: 同じルームに別名で join すると旧名が外れてから新名が追加される
        // given (前提条件):
        let mut registry = create_test_registry();
        let alice = ConnectionId::generate();
        registry.join(alice, key("R"), name("alice"));

        // when (操作):
        let deliveries = registry.join(alice, key("R"), name("alicia"));

        // then (期待する結果): 旧ルームは空になり一旦削除されるため、最初の配信の宛先はない
        assert_eq!(deliveries.len(), 2);
        assert!(deliveries[0].recipients.is_empty());
        assert!(members_of(&deliveries[0]).is_empty());
        assert_eq!(members_of(&deliveries[1]), vec!["alicia"]);
    }

    #[test]
    fn test_leave_removes_member_and_notifies_remaining() {
        // テスト項目: leave でメンバーが外れ、残りの接続に更新後のメンバーが配信される
        // given (前提条件):
        let mut registry = create_test_registry();
        let alice = ConnectionId::generate();
        let bob = ConnectionId::generate();
        registry.join(alice, key("R"), name("alice"));
        registry.join(bob, key("R"), name("bob"));

        // when (操作):
        let delivery = registry.leave(&bob).unwrap();

        // then (期待する結果):
        assert_eq!(delivery.recipients, vec![alice]);
        assert_eq!(members_of(&delivery), vec!["alice"]);
        assert!(registry.affiliation(&bob).is_none());
    }

    #[test]
    fn test_leave_twice_is_noop() {
        // テスト項目: 2 回目の leave は何もしない（冪等性）
        // given (前提条件):
        let mut registry = create_test_registry();
        let alice = ConnectionId::generate();
        let bob = ConnectionId::generate();
        registry.join(alice, key("R"), name("alice"));
        registry.join(bob, key("R"), name("bob"));
        registry.leave(&bob);

        // when (操作):
        let second = registry.leave(&bob);

        // then (期待する結果):
        assert!(second.is_none());
        assert_eq!(registry.members(&key("R")), vec![name("alice")]);
    }

    #[test]
    fn test_leave_removes_name_shared_by_another_connection() {
        // テスト項目: 同名で参加した 2 接続のうち 1 つが leave すると、名前はメンバー集合から外れる
        // given (前提条件):
        let mut registry = create_test_registry();
        let first = ConnectionId::generate();
        let second = ConnectionId::generate();
        registry.join(first, key("R"), name("alice"));
        registry.join(second, key("R"), name("alice"));

        // when (操作):
        let delivery = registry.leave(&first).unwrap();

        // then (期待する結果): 残った接続には空のメンバー一覧が配信される
        assert_eq!(
            delivery,
            Delivery {
                recipients: vec![second],
                event: OutboundEvent::MembersChanged(vec![]),
            }
        );
        assert!(registry.room(&key("R")).is_some());
        assert!(registry.is_affiliated_with(&second, &key("R")));
    }

    #[test]
    fn test_rejoin_restores_name_removed_by_other_connection() {
        // テスト項目: 名前が外された後に残った接続が同じ名前で再 join すると名前が戻る
        // given (前提条件):
        let mut registry = create_test_registry();
        let first = ConnectionId::generate();
        let second = ConnectionId::generate();
        registry.join(first, key("R"), name("alice"));
        registry.join(second, key("R"), name("alice"));
        registry.leave(&first);

        // when (操作):
        let deliveries = registry.join(second, key("R"), name("alice"));

        // then (期待する結果):
        assert_eq!(deliveries.len(), 1);
        assert_eq!(members_of(&deliveries[0]), vec!["alice"]);
    }

    #[test]
    fn test_disconnect_of_last_shared_connection_drops_room() {
        // テスト項目: 同名の 2 接続が両方抜けるとルームは破棄される
        // given (前提条件):
        let mut registry = create_test_registry();
        let first = ConnectionId::generate();
        let second = ConnectionId::generate();
        registry.join(first, key("R"), name("alice"));
        registry.join(second, key("R"), name("alice"));
        registry.leave(&first);

        // when (操作):
        let delivery = registry.leave(&second).unwrap();

        // then (期待する結果):
        assert!(delivery.recipients.is_empty());
        assert!(registry.room(&key("R")).is_none());
    }

    #[test]
    fn test_last_leave_drops_room() {
        // テスト項目: 最後の参加者が抜けるとルームは破棄され、空として扱われる
        // given (前提条件):
        let mut registry = create_test_registry();
        let alice = ConnectionId::generate();
        registry.join(alice, key("R"), name("alice"));

        // when (操作):
        let delivery = registry.leave(&alice).unwrap();

        // then (期待する結果):
        assert!(delivery.recipients.is_empty());
        assert!(registry.room(&key("R")).is_none());
        assert!(registry.members(&key("R")).is_empty());
        assert!(registry.rooms().is_empty());
    }

    #[test]
    fn test_relay_to_unknown_room_has_no_recipients() {
        // テスト項目: 存在しないルームへのリレーは宛先なしになる
        // given (前提条件):
        let registry = create_test_registry();

        // when (操作):
        let delivery = registry.relay(
            &key("nowhere"),
            None,
            OutboundEvent::CodeUpdated("x".to_string()),
        );

        // then (期待する結果):
        assert!(delivery.recipients.is_empty());
    }

    #[test]
    fn test_relay_excludes_sender() {
        // テスト項目: 送信者を除外したリレー宛先が計算される
        // given (前提条件):
        let mut registry = create_test_registry();
        let alice = ConnectionId::generate();
        let bob = ConnectionId::generate();
        let carol = ConnectionId::generate();
        registry.join(alice, key("R"), name("alice"));
        registry.join(bob, key("R"), name("bob"));
        registry.join(carol, key("other"), name("carol"));

        // when (操作):
        let delivery = registry.relay(
            &key("R"),
            Some(&alice),
            OutboundEvent::CodeUpdated("print(1)".to_string()),
        );

        // then (期待する結果):
        assert_eq!(delivery.recipients, vec![bob]);
        assert_eq!(
            delivery.event,
            OutboundEvent::CodeUpdated("print(1)".to_string())
        );
    }

    #[test]
    fn test_rooms_sorted_by_key() {
        // テスト項目: ルーム一覧はキー順に並ぶ
        // given (前提条件):
        let mut registry = create_test_registry();
        registry.join(ConnectionId::generate(), key("b"), name("bob"));
        registry.join(ConnectionId::generate(), key("a"), name("alice"));

        // when (操作):
        let rooms = registry.rooms();

        // then (期待する結果):
        let keys: Vec<&str> = rooms.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["a", "b"]);
    }
}
