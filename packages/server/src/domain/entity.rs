//! Entities.

use std::collections::{BTreeSet, HashSet};

use super::value_object::{ConnectionId, ParticipantName, RoomKey, Timestamp};

/// A room: a membership set of names plus the connections attached to it.
///
/// The connections are the broadcast scope. Names are a plain set, so when two
/// connections joined under the same name, the first one to leave removes the
/// name. A room with no members and no connections is dropped by the registry.
#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    pub key: RoomKey,
    pub created_at: Timestamp,
    members: BTreeSet<ParticipantName>,
    connections: HashSet<ConnectionId>,
}

impl Room {
    pub fn new(key: RoomKey, created_at: Timestamp) -> Self {
        Self {
            key,
            created_at,
            members: BTreeSet::new(),
            connections: HashSet::new(),
        }
    }

    /// Attach a connection and insert `name` into the membership set.
    pub fn attach(&mut self, connection: ConnectionId, name: ParticipantName) {
        self.connections.insert(connection);
        self.members.insert(name);
    }

    /// Detach a connection and remove `name` from the membership set.
    ///
    /// Returns whether the connection was attached.
    pub fn detach(&mut self, connection: &ConnectionId, name: &ParticipantName) -> bool {
        self.members.remove(name);
        self.connections.remove(connection)
    }

    /// The membership set, sorted by name.
    pub fn members(&self) -> &BTreeSet<ParticipantName> {
        &self.members
    }

    pub fn has_member(&self, name: &ParticipantName) -> bool {
        self.members.contains(name)
    }

    /// Attached connections, optionally leaving one out.
    pub fn connection_ids(&self, exclude: Option<&ConnectionId>) -> Vec<ConnectionId> {
        self.connections
            .iter()
            .filter(|id| Some(*id) != exclude)
            .copied()
            .collect()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty() && self.connections.is_empty()
    }
}

/// The `(room, name)` pair a connection is currently joined under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Affiliation {
    pub room: RoomKey,
    pub name: ParticipantName,
}

impl Affiliation {
    pub fn new(room: RoomKey, name: ParticipantName) -> Self {
        Self { room, name }
    }
}
