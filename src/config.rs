//! Configuration types.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use crate::error::ConfigError;

/// Path value that selects an in-memory profile store.
pub const IN_MEMORY_DB: &str = ":memory:";

/// Assistant configuration, read from the environment.
#[derive(Debug, Clone)]
pub struct AssistantConfig {
    /// Assistant name for identification in logs.
    pub name: String,
    /// libSQL database file, or `:memory:`.
    pub db_path: PathBuf,
    /// Address the HTTP/WebSocket server binds to.
    pub bind: IpAddr,
    /// Port the HTTP/WebSocket server listens on.
    pub port: u16,
    /// Whether to run a local CLI conversation in the foreground.
    pub cli_enabled: bool,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            name: "intake-assist".to_string(),
            db_path: PathBuf::from("./data/intake-assist.db"),
            bind: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 5001,
            cli_enabled: true,
        }
    }
}

impl AssistantConfig {
    /// Build configuration from `INTAKE_*` environment variables.
    ///
    /// Unset variables fall back to [`AssistantConfig::default`]; set but
    /// unparseable values are rejected.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let name = lookup("INTAKE_ASSISTANT_NAME")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.name);

        let db_path = lookup("INTAKE_DB_PATH")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.db_path);

        let bind = match lookup("INTAKE_BIND") {
            Some(raw) => raw.trim().parse().map_err(|e| ConfigError::InvalidValue {
                key: "INTAKE_BIND".to_string(),
                message: format!("{raw:?}: {e}"),
            })?,
            None => defaults.bind,
        };

        let port = match lookup("INTAKE_PORT") {
            Some(raw) => raw.trim().parse().map_err(|e| ConfigError::InvalidValue {
                key: "INTAKE_PORT".to_string(),
                message: format!("{raw:?}: {e}"),
            })?,
            None => defaults.port,
        };

        let cli_enabled = match lookup("INTAKE_CLI") {
            Some(raw) => parse_bool("INTAKE_CLI", &raw)?,
            None => defaults.cli_enabled,
        };

        Ok(Self {
            name,
            db_path,
            bind,
            port,
            cli_enabled,
        })
    }

    /// Socket address for the HTTP/WebSocket server.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }

    /// Whether the profile store should live only in memory.
    pub fn is_in_memory(&self) -> bool {
        self.db_path.as_os_str() == IN_MEMORY_DB
    }
}

fn parse_bool(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("expected a boolean, got {other:?}"),
        }),
    }
}
