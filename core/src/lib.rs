//! Socket primitives over `socket2` with typed errors, plus timed hostname
//! lookups for async callers.

pub mod error;
pub mod lookup;
pub mod socket;

pub use error::{Error, SocketError};
pub use socket::select::select;
pub use socket::{Domain, Level, ReadMode, ShutdownMode, Socket, SocketType};
