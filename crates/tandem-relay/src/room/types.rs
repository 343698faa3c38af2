//! Room session state, roles, and occupancy phases.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tandem_common::ConnectionId;

use super::expiry::PendingExpiry;

/// Seat a participant holds within a room. Determines turn eligibility.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub enum Role {
    /// Moves first after every reset.
    #[default]
    #[serde(rename = "player1")]
    PlayerOne,
    #[serde(rename = "player2")]
    PlayerTwo,
}

impl Role {
    pub fn other(self) -> Self {
        match self {
            Role::PlayerOne => Role::PlayerTwo,
            Role::PlayerTwo => Role::PlayerOne,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::PlayerOne => f.write_str("player1"),
            Role::PlayerTwo => f.write_str("player2"),
        }
    }
}

/// Occupancy phase of a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Empty,
    Waiting,
    Active,
}

/// State of one room.
///
/// Seats are an explicit role → connection map; `join_order` keeps the
/// order participants arrived in. Both always hold the same connections.
#[derive(Debug, Default)]
pub struct RoomSession {
    pub(crate) seats: BTreeMap<Role, ConnectionId>,
    pub(crate) join_order: Vec<ConnectionId>,
    pub(crate) current_turn: Role,
    pub(crate) board_state: Option<serde_json::Value>,
    pub(crate) pending_expiry: Option<PendingExpiry>,
    pub(crate) vacated_role: Option<Role>,
}

impl RoomSession {
    pub fn participants(&self) -> &[ConnectionId] {
        &self.join_order
    }

    pub fn occupancy(&self) -> usize {
        self.join_order.len()
    }

    pub fn phase(&self) -> Phase {
        match self.occupancy() {
            0 => Phase::Empty,
            1 => Phase::Waiting,
            _ => Phase::Active,
        }
    }

    pub fn current_turn(&self) -> Role {
        self.current_turn
    }

    pub fn board_state(&self) -> Option<&serde_json::Value> {
        self.board_state.as_ref()
    }

    pub fn vacated_role(&self) -> Option<Role> {
        self.vacated_role
    }

    pub fn expiry_armed(&self) -> bool {
        self.pending_expiry.is_some()
    }

    /// Connection seated in `role`, if any.
    pub fn holder(&self, role: Role) -> Option<&ConnectionId> {
        self.seats.get(&role)
    }

    pub fn role_of(&self, conn: &ConnectionId) -> Option<Role> {
        self.seats
            .iter()
            .find_map(|(role, holder)| (holder == conn).then_some(*role))
    }

    /// Everyone in the room except `conn`.
    pub fn peers_of<'a>(&'a self, conn: &'a ConnectionId) -> impl Iterator<Item = &'a ConnectionId> {
        self.join_order.iter().filter(move |p| *p != conn)
    }

    pub(crate) fn seat(&mut self, conn: ConnectionId, role: Role) {
        self.seats.insert(role, conn.clone());
        self.join_order.push(conn);
    }

    pub(crate) fn unseat(&mut self, conn: &ConnectionId) -> Option<Role> {
        let role = self.role_of(conn)?;
        self.seats.remove(&role);
        self.join_order.retain(|p| p != conn);
        Some(role)
    }

    /// Comparable copy of the observable state.
    pub fn snapshot(&self) -> RoomSnapshot {
        RoomSnapshot {
            participants: self.join_order.clone(),
            seats: self
                .seats
                .iter()
                .map(|(role, conn)| (*role, conn.clone()))
                .collect(),
            current_turn: self.current_turn,
            board_state: self.board_state.clone(),
            vacated_role: self.vacated_role,
            expiry_armed: self.expiry_armed(),
        }
    }
}

/// Plain-data view of a [`RoomSession`].
#[derive(Debug, Clone, PartialEq)]
pub struct RoomSnapshot {
    pub participants: Vec<ConnectionId>,
    pub seats: Vec<(Role, ConnectionId)>,
    pub current_turn: Role,
    pub board_state: Option<serde_json::Value>,
    pub vacated_role: Option<Role>,
    pub expiry_armed: bool,
}

impl Default for RoomSnapshot {
    fn default() -> Self {
        RoomSession::default().snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_other_flips() {
        assert_eq!(Role::PlayerOne.other(), Role::PlayerTwo);
        assert_eq!(Role::PlayerTwo.other(), Role::PlayerOne);
    }

    #[test]
    fn role_wire_names() {
        assert_eq!(serde_json::to_string(&Role::PlayerOne).unwrap(), "\"player1\"");
        assert_eq!(serde_json::to_string(&Role::PlayerTwo).unwrap(), "\"player2\"");
        assert_eq!(Role::PlayerTwo.to_string(), "player2");
    }

    #[test]
    fn new_session_is_empty_with_first_player_to_move() {
        let session = RoomSession::default();
        assert_eq!(session.phase(), Phase::Empty);
        assert_eq!(session.current_turn(), Role::PlayerOne);
        assert!(session.board_state().is_none());
        assert!(!session.expiry_armed());
    }

    #[test]
    fn seat_and_unseat_keep_map_and_order_in_step() {
        let a = ConnectionId::from("a");
        let b = ConnectionId::from("b");
        let mut session = RoomSession::default();

        session.seat(b.clone(), Role::PlayerTwo);
        session.seat(a.clone(), Role::PlayerOne);
        assert_eq!(session.participants(), &[b.clone(), a.clone()]);
        assert_eq!(session.holder(Role::PlayerOne), Some(&a));
        assert_eq!(session.role_of(&b), Some(Role::PlayerTwo));
        assert_eq!(session.phase(), Phase::Active);
        assert_eq!(session.peers_of(&a).collect::<Vec<_>>(), vec![&b]);

        assert_eq!(session.unseat(&b), Some(Role::PlayerTwo));
        assert_eq!(session.unseat(&b), None);
        assert_eq!(session.participants(), &[a]);
        assert!(session.holder(Role::PlayerTwo).is_none());
        assert_eq!(session.phase(), Phase::Waiting);
    }
}
