//! Room registry.
//!
//! Process-wide mapping from room name to room state, mutated only through
//! its own operations. Capacity and cleanup-on-empty are enforced inside the
//! mutations themselves, not left to caller discipline. The registry never
//! initiates messages; it only answers queries and mutations.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use pairlink_core::protocol::ConnectionId;

/// The protocol models exactly one caller and one callee.
const ROOM_CAPACITY: usize = 2;

/// Outcome of a join attempt. `Full` is a normal result, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    /// Room did not exist; the caller is now its sole occupant (creator).
    Created,
    /// Room had one occupant; the caller joined second. Carries the peer.
    JoinedAsSecond(ConnectionId),
    /// Room already holds two occupants; membership unchanged.
    Full,
}

/// Occupants in join order: creator first, joiner second.
#[derive(Debug)]
struct Room {
    occupants: Vec<ConnectionId>,
}

/// Room name -> room state, plus each connection's current-room reference.
///
/// A room with zero occupants is never stored: the entry is deleted
/// synchronously with the departure that emptied it. Each mutation is atomic
/// per room via the map's entry API.
#[derive(Default)]
pub struct RoomRegistry {
    rooms: DashMap<String, Room>,
    membership: DashMap<ConnectionId, String>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Join `room`, creating it if absent.
    ///
    /// The caller layer guarantees `conn` is not already in a room; the room
    /// reference is updated here on `Created`/`JoinedAsSecond` and left
    /// untouched on `Full`.
    pub fn try_join(&self, room: &str, conn: ConnectionId) -> JoinOutcome {
        let outcome = match self.rooms.entry(room.to_string()) {
            Entry::Vacant(e) => {
                e.insert(Room {
                    occupants: vec![conn],
                });
                JoinOutcome::Created
            }
            Entry::Occupied(mut e) => {
                let occupants = &mut e.get_mut().occupants;
                if occupants.len() >= ROOM_CAPACITY {
                    return JoinOutcome::Full;
                }
                let peer = occupants[0];
                occupants.push(conn);
                JoinOutcome::JoinedAsSecond(peer)
            }
        };
        self.membership.insert(conn, room.to_string());
        outcome
    }

    /// Remove `conn` from `room`.
    ///
    /// Idempotent: unknown rooms and non-members are a no-op. Deletes the
    /// room entry the moment it empties, and clears the connection's room
    /// reference only when it pointed at this room.
    pub fn leave(&self, room: &str, conn: ConnectionId) {
        if let Entry::Occupied(mut e) = self.rooms.entry(room.to_string()) {
            let occupants = &mut e.get_mut().occupants;
            occupants.retain(|c| *c != conn);
            if occupants.is_empty() {
                e.remove();
            }
        }
        self.membership.remove_if(&conn, |_, r| r == room);
    }

    /// Occupants snapshot in join order; empty if the room does not exist.
    pub fn occupants(&self, room: &str) -> Vec<ConnectionId> {
        self.rooms
            .get(room)
            .map(|r| r.occupants.clone())
            .unwrap_or_default()
    }

    pub fn occupant_count(&self, room: &str) -> usize {
        self.rooms.get(room).map(|r| r.occupants.len()).unwrap_or(0)
    }

    /// The connection's current room reference, if any.
    pub fn room_of(&self, conn: &ConnectionId) -> Option<String> {
        self.membership.get(conn).map(|r| r.value().clone())
    }

    /// Whether the room currently exists (i.e., has at least one occupant).
    pub fn contains_room(&self, room: &str) -> bool {
        self.rooms.contains_key(room)
    }
}
