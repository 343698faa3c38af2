//! Room session state machine.
//!
//! Rooms hold at most two participants, each in a distinct [`Role`]. The
//! registry seats and unseats participants, gates moves on the current
//! turn, and resets rooms that empty out or sit idle past the inactivity
//! window. Nothing here does I/O; the router turns outcomes into events.

mod expiry;
mod registry;
mod roles;
mod turn;
mod types;


use tandem_common::RoomId;

pub use expiry::{Expired, InactivityMonitor, PendingExpiry};
pub use registry::{Binding, Departure, Joined, RoomRegistry};
pub use roles::assign_role;
pub use turn::{DropReason, MoveOutcome};
pub use types::{Phase, Role, RoomSession, RoomSnapshot};

/// Why a join was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoomError {
    #[error("room is full")]
    Full,

    #[error("already seated in room {0}")]
    AlreadySeated(RoomId),
}
