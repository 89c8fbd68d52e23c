//! Configuration loading from disk and the process environment.

use std::fs;
use std::path::Path;

use crate::config::schema::{BackendDescriptor, GatewayConfig, SolverRoute};
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable holding the listen port.
pub const PORT_VAR: &str = "ACCESS_PORT";

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("{var} is not a valid port: '{value}'")]
    InvalidPort { var: &'static str, value: String },

    #[error("route {route} is partially configured, missing: {}", .missing.join(", "))]
    IncompleteRoute {
        route: SolverRoute,
        missing: Vec<String>,
    },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Names of the three variables describing a route's backend.
pub fn route_variables(route: SolverRoute) -> [String; 3] {
    let prefix = route.env_prefix();
    [
        format!("{prefix}_SOLVER_LINK"),
        format!("{prefix}_SOLVER_HEALTH_TEST_LINK"),
        format!("{prefix}_SOLVER_KEY"),
    ]
}

/// Parse a TOML configuration file without validating it.
pub fn load_file(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Overlay environment-style variables on top of a base configuration.
///
/// A route whose three variables are all set replaces whatever the base
/// had for it; a route with none of them set is left untouched. Setting
/// only some of them is an error. Empty values count as unset.
pub fn apply_env<F>(mut config: GatewayConfig, lookup: F) -> Result<GatewayConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

    if let Some(value) = get(PORT_VAR) {
        config.listener.port = value.trim().parse().map_err(|_| ConfigError::InvalidPort {
            var: PORT_VAR,
            value,
        })?;
    }

    for route in SolverRoute::ALL {
        let [link_var, health_var, key_var] = route_variables(route);
        let values = [get(&link_var), get(&health_var), get(&key_var)];

        match values {
            [Some(forward_url), Some(health_url), Some(credential)] => {
                config.upsert_route(BackendDescriptor {
                    route,
                    forward_url,
                    health_url,
                    credential,
                });
            }
            [None, None, None] => {}
            values => {
                let missing = [link_var, health_var, key_var]
                    .into_iter()
                    .zip(values.iter())
                    .filter(|(_, value)| value.is_none())
                    .map(|(name, _)| name)
                    .collect();
                return Err(ConfigError::IncompleteRoute { route, missing });
            }
        }
    }

    Ok(config)
}

/// Load the full configuration: optional file, then environment, then
/// command line port override, then validation.
pub fn load_config(path: Option<&Path>, port_override: Option<u16>) -> Result<GatewayConfig, ConfigError> {
    let base = match path {
        Some(path) => load_file(path)?,
        None => GatewayConfig::default(),
    };

    let mut config = apply_env(base, |name| std::env::var(name).ok())?;
    if let Some(port) = port_override {
        config.listener.port = port;
    }

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}
