//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (accept loop, Axum setup, connection registration)
//!     → request.rs (request ID, origin URL, captured body)
//!     → dispatcher.rs (validate, probe health, forward)
//!     → response.rs (status line with custom status text)
//!     → Send to client
//! ```

pub mod dispatcher;
pub mod request;
pub mod response;
pub mod server;

pub use dispatcher::Dispatcher;
pub use request::{RequestContext, X_REQUEST_ID};
pub use server::{GatewayServer, ServerError};
