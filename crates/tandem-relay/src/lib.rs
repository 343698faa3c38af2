//! tandem-relay: room-based WebSocket relay for two-player turn games.
//!
//! Clients join named rooms of at most two seats. The relay assigns roles,
//! enforces turn order on moves, broadcasts the board to the room, and
//! resets rooms when they empty or go idle. Board payloads are opaque.

pub mod connection;
pub mod logging;
pub mod protocol;
pub mod room;
pub mod router;
pub mod server;

pub use protocol::{ClientEvent, ClientHello, ServerEvent};
pub use room::{Role, RoomRegistry, RoomSession};
pub use router::{spawn_router, RouterConfig, RouterHandle};
pub use server::serve;
