//! Relay wire protocol. JSON text frames tagged by `type`.
//!
//! The first frame from a client is a [`ClientHello`]; every later frame is
//! a [`ClientEvent`]. Board payloads are opaque JSON and never inspected.

use serde::{Deserialize, Serialize};
use tandem_common::{ConnectionId, ProtocolError, RoomId};

use crate::room::Role;

/// First message a client sends to identify itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientHello {
    /// Start with a fresh identity.
    Hello,
    /// Pick up an identity that dropped without a clean close.
    Resume {
        #[serde(rename = "sessionId")]
        session_id: ConnectionId,
    },
}

impl ClientHello {
    pub fn resume_id(self) -> Option<ConnectionId> {
        match self {
            ClientHello::Hello => None,
            ClientHello::Resume { session_id } => Some(session_id),
        }
    }
}

/// Requests a client makes once identified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientEvent {
    CheckRoom {
        room: RoomId,
    },
    JoinRoom {
        room: RoomId,
    },
    MakeMove {
        room: RoomId,
        #[serde(rename = "newGridCells")]
        new_grid_cells: serde_json::Value,
    },
    LeaveRoom {
        room: RoomId,
    },
}

/// Messages the relay sends to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerEvent {
    SessionReady {
        #[serde(rename = "sessionId")]
        session_id: ConnectionId,
        recovered: bool,
    },
    RoomStatus {
        room: RoomId,
        full: bool,
    },
    RoleAssigned {
        role: Role,
    },
    RoomFull {
        message: String,
    },
    OpponentConnected,
    OpponentDisconnected,
    GameStart,
    MoveMade {
        #[serde(rename = "newGridCells")]
        new_grid_cells: serde_json::Value,
        #[serde(rename = "nextTurn")]
        next_turn: Role,
    },
    Error {
        message: String,
    },
}

pub fn parse_hello(text: &str) -> Result<ClientHello, ProtocolError> {
    Ok(serde_json::from_str(text)?)
}

pub fn parse_client_event(text: &str) -> Result<ClientEvent, ProtocolError> {
    Ok(serde_json::from_str(text)?)
}

pub fn encode(event: &ServerEvent) -> Result<String, ProtocolError> {
    Ok(serde_json::to_string(event)?)
}
