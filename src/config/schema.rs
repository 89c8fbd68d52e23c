//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files; the
//! environment overlay in `loader.rs` fills the same structures.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Root configuration for the solver gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address, body limit).
    pub listener: ListenerConfig,

    /// One backend descriptor per registered solver route.
    pub routes: Vec<BackendDescriptor>,

    /// Upstream call deadlines.
    pub timeouts: TimeoutConfig,

    /// Graceful shutdown timers.
    pub shutdown: ShutdownConfig,

    /// Logging settings.
    pub observability: ObservabilityConfig,
}

impl GatewayConfig {
    /// Look up the descriptor registered for a route.
    pub fn descriptor(&self, route: SolverRoute) -> Option<&BackendDescriptor> {
        self.routes.iter().find(|d| d.route == route)
    }

    /// Insert or replace the descriptor for its route.
    pub fn upsert_route(&mut self, descriptor: BackendDescriptor) {
        match self.routes.iter_mut().find(|d| d.route == descriptor.route) {
            Some(existing) => *existing = descriptor,
            None => self.routes.push(descriptor),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Interface to bind (e.g., "0.0.0.0").
    pub host: String,

    /// Listen port. `ACCESS_PORT` overrides it.
    pub port: u16,

    /// Maximum accepted request body size in bytes.
    pub max_body_bytes: usize,
}

impl ListenerConfig {
    /// `host:port` string suitable for `TcpListener::bind`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            max_body_bytes: 1024 * 1024,
        }
    }
}

/// The fixed set of solver paths the gateway exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverRoute {
    HillClimbing,
    GeneticAlgorithm,
    SimulatedAnnealing,
    NeuronalNetwork,
}

impl SolverRoute {
    /// Every route, in registration order.
    pub const ALL: [SolverRoute; 4] = [
        SolverRoute::HillClimbing,
        SolverRoute::GeneticAlgorithm,
        SolverRoute::SimulatedAnnealing,
        SolverRoute::NeuronalNetwork,
    ];

    /// Route name used in logs and config files.
    pub fn name(self) -> &'static str {
        match self {
            SolverRoute::HillClimbing => "hill_climbing",
            SolverRoute::GeneticAlgorithm => "genetic_algorithm",
            SolverRoute::SimulatedAnnealing => "simulated_annealing",
            SolverRoute::NeuronalNetwork => "neuronal_network",
        }
    }

    /// HTTP path the route is mounted on.
    pub fn path(self) -> &'static str {
        match self {
            SolverRoute::HillClimbing => "/hill_climbing",
            SolverRoute::GeneticAlgorithm => "/genetic_algorithm",
            SolverRoute::SimulatedAnnealing => "/simulated_annealing",
            SolverRoute::NeuronalNetwork => "/neuronal_network",
        }
    }

    /// Prefix of the `<ROUTE>_SOLVER_*` environment variables.
    pub fn env_prefix(self) -> &'static str {
        match self {
            SolverRoute::HillClimbing => "HILL_CLIMBING",
            SolverRoute::GeneticAlgorithm => "GENETIC_ALGORITHM",
            SolverRoute::SimulatedAnnealing => "SIMULATED_ANNEALING",
            SolverRoute::NeuronalNetwork => "NEURONAL_NETWORK",
        }
    }

    /// Resolve an exact request path to its route.
    pub fn from_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|route| route.path() == path)
    }
}

impl fmt::Display for SolverRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Static description of the backend serving one route.
#[derive(Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BackendDescriptor {
    /// Route this backend serves.
    pub route: SolverRoute,

    /// Solver endpoint that receives forwarded requests.
    pub forward_url: String,

    /// Unauthenticated health endpoint probed before every forward.
    pub health_url: String,

    /// Value sent verbatim in the `Authorization` header.
    pub credential: String,
}

// Credentials stay out of logs.
impl fmt::Debug for BackendDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendDescriptor")
            .field("route", &self.route)
            .field("forward_url", &self.forward_url)
            .field("health_url", &self.health_url)
            .field("credential", &"<redacted>")
            .finish()
    }
}

/// Deadlines for upstream calls. A value of `0` disables the bound.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Health probe deadline in seconds.
    pub probe_secs: u64,

    /// Forwarded solve request deadline in seconds.
    pub forward_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            probe_secs: 5,
            forward_secs: 120,
        }
    }
}

/// Graceful shutdown timers.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ShutdownConfig {
    /// Time allowed for all connections to drain before exiting with code 1.
    pub grace_period_ms: u64,

    /// Delay after the close notification before open connections are destroyed.
    pub force_destroy_ms: u64,
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self {
            grace_period_ms: 5000,
            force_destroy_ms: 1000,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes precedence.
    pub log_level: String,

    /// Emit JSON log lines instead of the human readable format.
    pub json: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json: false,
        }
    }
}
