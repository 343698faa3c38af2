//! Room registry: every room ever joined, plus the connection → seat index.

use std::collections::HashMap;

use tandem_common::{ConnectionId, RoomId};
use tracing::{debug, info};

use super::expiry::{Expired, InactivityMonitor};
use super::roles::assign_role;
use super::turn::{gate_move, DropReason, MoveOutcome};
use super::types::{Role, RoomSession};
use super::RoomError;

/// Where a connection is seated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub room: RoomId,
    pub role: Role,
}

/// A successful join.
#[derive(Debug, Clone, PartialEq)]
pub struct Joined {
    pub role: Role,
    /// Room members after the join, in join order.
    pub participants: Vec<ConnectionId>,
    /// The join filled the room.
    pub game_started: bool,
    /// Board and turn to replay to the joiner when the room has history.
    pub replay: Option<(serde_json::Value, Role)>,
}

/// A participant left a room.
#[derive(Debug, Clone, PartialEq)]
pub struct Departure {
    pub room: RoomId,
    pub role: Role,
    /// Members still seated afterwards.
    pub remaining: Vec<ConnectionId>,
    /// The room emptied and was reset.
    pub reset: bool,
}

/// Owns all room sessions and the participant-role bindings.
///
/// Not synchronized: a single router task owns it and applies events one
/// at a time.
pub struct RoomRegistry {
    rooms: HashMap<RoomId, RoomSession>,
    bindings: HashMap<ConnectionId, Binding>,
    monitor: InactivityMonitor,
}

impl RoomRegistry {
    pub fn new(monitor: InactivityMonitor) -> Self {
        Self {
            rooms: HashMap::new(),
            bindings: HashMap::new(),
            monitor,
        }
    }

    /// Session for `room`, created in its default state if unseen.
    pub fn get_or_create(&mut self, room: &RoomId) -> &mut RoomSession {
        self.rooms.entry(room.clone()).or_default()
    }

    pub fn get(&self, room: &RoomId) -> Option<&RoomSession> {
        self.rooms.get(room)
    }

    pub fn occupancy(&self, room: &RoomId) -> usize {
        self.rooms.get(room).map_or(0, RoomSession::occupancy)
    }

    pub fn is_full(&self, room: &RoomId) -> bool {
        self.occupancy(room) >= 2
    }

    pub fn binding(&self, conn: &ConnectionId) -> Option<&Binding> {
        self.bindings.get(conn)
    }

    /// Number of rooms held, empty ones included.
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Reinitialize `room` in place, disarming its timer first. Anyone
    /// still seated loses their binding. Returns the evicted connections.
    pub fn reset(&mut self, room: &RoomId) -> Vec<ConnectionId> {
        let Some(session) = self.rooms.get_mut(room) else {
            return Vec::new();
        };

        self.monitor.disarm(&mut session.pending_expiry);
        let evicted = std::mem::take(&mut session.join_order);
        *session = RoomSession::default();

        for conn in &evicted {
            if self.bindings.get(conn).is_some_and(|b| &b.room == room) {
                self.bindings.remove(conn);
            }
        }

        info!(room = %room, evicted = evicted.len(), "Room reset");
        evicted
    }

    /// Seat `conn` in `room`.
    ///
    /// Arms the inactivity timer when the join fills the room.
    pub fn join(&mut self, room: &RoomId, conn: &ConnectionId) -> Result<Joined, RoomError> {
        if let Some(binding) = self.bindings.get(conn) {
            return Err(RoomError::AlreadySeated(binding.room.clone()));
        }

        let session = self.get_or_create(room);
        if session.occupancy() >= 2 {
            return Err(RoomError::Full);
        }

        let role = assign_role(session)?;
        session.seat(conn.clone(), role);
        let joined = Joined {
            role,
            participants: session.join_order.clone(),
            game_started: session.occupancy() == 2,
            replay: session
                .board_state
                .clone()
                .map(|board| (board, session.current_turn)),
        };

        self.bindings.insert(
            conn.clone(),
            Binding {
                room: room.clone(),
                role,
            },
        );

        if joined.game_started {
            if let Some(session) = self.rooms.get_mut(room) {
                self.monitor.arm(room, &mut session.pending_expiry);
            }
        }

        Ok(joined)
    }

    /// Run a move from `conn` in `room` through the turn gate. Accepted
    /// moves re-arm the room's inactivity timer.
    pub fn submit_move(
        &mut self,
        room: &RoomId,
        conn: &ConnectionId,
        payload: serde_json::Value,
    ) -> MoveOutcome {
        let mover = match self.bindings.get(conn) {
            Some(binding) if &binding.room == room => Some(binding.role),
            Some(_) => return MoveOutcome::Dropped(DropReason::WrongRoom),
            None => None,
        };

        let Some(session) = self.rooms.get_mut(room) else {
            return MoveOutcome::Dropped(DropReason::Unbound);
        };

        let outcome = gate_move(session, mover, payload);
        if matches!(outcome, MoveOutcome::Accepted { .. }) {
            self.monitor.arm(room, &mut session.pending_expiry);
        }
        outcome
    }

    /// Remove `conn` from its room. With `room` given, only if that is the
    /// room the connection sits in.
    ///
    /// The departing role is remembered so the next joiner reclaims it.
    /// A room left empty is reset.
    pub fn depart(&mut self, conn: &ConnectionId, room: Option<&RoomId>) -> Option<Departure> {
        let binding = self.bindings.get(conn)?;
        if room.is_some_and(|room| room != &binding.room) {
            debug!(conn = %conn, seated_in = %binding.room, "Leave names another room");
            return None;
        }
        let binding = self.bindings.remove(conn)?;

        let remaining = match self.rooms.get_mut(&binding.room) {
            Some(session) => {
                session.unseat(conn);
                if session.occupancy() > 0 {
                    session.vacated_role = Some(binding.role);
                }
                session.join_order.clone()
            }
            None => Vec::new(),
        };

        let reset = remaining.is_empty();
        if reset {
            self.reset(&binding.room);
        }

        Some(Departure {
            room: binding.room,
            role: binding.role,
            remaining,
            reset,
        })
    }

    /// Apply an inactivity expiry. Returns the evicted connections, or
    /// `None` when the notice is stale.
    pub fn expire(&mut self, fired: &Expired) -> Option<Vec<ConnectionId>> {
        let session = self.rooms.get(&fired.room)?;
        if !InactivityMonitor::is_current(&session.pending_expiry, fired) {
            return None;
        }
        Some(self.reset(&fired.room))
    }

    /// Forget rooms with nobody seated. Returns how many were dropped.
    pub fn prune(&mut self) -> usize {
        let before = self.rooms.len();
        self.rooms
            .retain(|_, session| session.occupancy() > 0 || session.expiry_armed());
        before - self.rooms.len()
    }
}
