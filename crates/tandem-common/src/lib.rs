pub mod errors;
pub mod id;

pub use errors::{ConfigError, ProtocolError, TandemError};
pub use id::{new_id, ConnectionId, RoomId};

pub type Result<T> = std::result::Result<T, TandemError>;
