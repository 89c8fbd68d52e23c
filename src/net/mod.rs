//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → http/server.rs accept loop
//!     → connection.rs (register handle, guard unregisters on close)
//!     → Hand off to the HTTP/1.1 connection task
//!
//! Connection States:
//!     Active → Closing (close notification) → Closed
//!     Active/Closing → Destroyed (forced on shutdown)
//! ```
//!
//! # Design Decisions
//! - Each connection tracked for graceful shutdown
//! - The registry is owned by the server, no global connection list

pub mod connection;

pub use connection::{ConnectionGuard, ConnectionHandle, ConnectionId, ConnectionRegistry};
