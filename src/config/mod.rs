//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! optional config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → loader.rs (overlay <ROUTE>_SOLVER_* and ACCESS_PORT variables)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!     → route table handed to the dispatcher at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload
//! - All fields have defaults to allow minimal configs
//! - Each route reads its own variable triple; routes without any are not mounted

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    BackendDescriptor, GatewayConfig, ListenerConfig, ObservabilityConfig, ShutdownConfig, SolverRoute,
    TimeoutConfig,
};
