//! Service configuration.
//!
//! Defaults, optionally overlaid by a JSON file and then by environment
//! variables.

use crate::core::{Error, Result};
use crate::roles::RoleWeightRegistry;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Path of the optional JSON configuration file.
pub const CONFIG_PATH_VAR: &str = "EDITORIAL_CONFIG";

/// Service configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP listener
    pub server: ServerConfig,
    /// Role name to voting weight; validated by [`RoleWeightRegistry`]
    pub roles: BTreeMap<String, i64>,
    /// Extra attempts for a vote that lost a commit race
    pub conflict_retries: u32,
}

impl AppConfig {
    /// Load `.env`, the optional config file, then environment overrides.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();

        let mut config = match std::env::var(CONFIG_PATH_VAR) {
            Ok(path) => Self::from_file(path)?,
            Err(_) => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Read a JSON configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Apply `EDITORIAL_*` overrides from `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(host) = lookup("EDITORIAL_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("EDITORIAL_PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| Error::Config(format!("EDITORIAL_PORT is not a port: {}", port)))?;
        }
        if let Some(weights) = lookup("EDITORIAL_ROLE_WEIGHTS") {
            self.roles = parse_role_weights(&weights)?;
        }
        if let Some(retries) = lookup("EDITORIAL_CONFLICT_RETRIES") {
            self.conflict_retries = retries.parse().map_err(|_| {
                Error::Config(format!(
                    "EDITORIAL_CONFLICT_RETRIES is not a number: {}",
                    retries
                ))
            })?;
        }
        Ok(())
    }

    /// Build the role weight registry.
    pub fn registry(&self) -> Result<RoleWeightRegistry> {
        RoleWeightRegistry::from_names(&self.roles)
    }

    /// `host:port` to listen on.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            roles: RoleWeightRegistry::default().to_names(),
            conflict_retries: 1,
        }
    }
}

/// HTTP listener configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8082,
        }
    }
}

/// Parse `ROLE=weight` pairs separated by commas.
///
/// Weights stay signed so negative values reach registry validation.
pub fn parse_role_weights(s: &str) -> Result<BTreeMap<String, i64>> {
    let mut weights = BTreeMap::new();
    for pair in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (role, weight) = pair
            .split_once('=')
            .ok_or_else(|| Error::Config(format!("expected ROLE=weight, got '{}'", pair)))?;
        let weight: i64 = weight
            .trim()
            .parse()
            .map_err(|_| Error::Config(format!("weight for {} is not an integer", role.trim())))?;
        if weights.insert(role.trim().to_string(), weight).is_some() {
            return Err(Error::Config(format!("role {} listed twice", role.trim())));
        }
    }
    Ok(weights)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles::Role;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.bind_addr(), "0.0.0.0:8082");
        assert_eq!(config.conflict_retries, 1);
        let registry = config.registry().unwrap();
        assert_eq!(registry.weight_of(Role::ChiefEditor).unwrap(), 40);
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("EDITORIAL_PORT", "9000"),
            ("EDITORIAL_ROLE_WEIGHTS", "EDITOR=50, CHIEF_EDITOR=50"),
            ("EDITORIAL_CONFLICT_RETRIES", "3"),
        ]);
        let mut config = AppConfig::default();
        config
            .apply_overrides(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.conflict_retries, 3);
        assert_eq!(
            config.registry().unwrap().voting_roles(),
            vec![Role::Editor, Role::ChiefEditor]
        );
    }

    #[test]
    fn test_bad_port_is_config_error() {
        let mut config = AppConfig::default();
        let err = config
            .apply_overrides(|k| (k == "EDITORIAL_PORT").then(|| "http".to_string()))
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_negative_weight_reaches_registry() {
        let weights = parse_role_weights("EDITOR=-10,CHIEF_EDITOR=110").unwrap();
        assert_eq!(weights["EDITOR"], -10);

        let config = AppConfig {
            roles: weights,
            ..Default::default()
        };
        assert!(matches!(config.registry(), Err(Error::Config(_))));
    }

    #[test]
    fn test_parse_role_weights_errors() {
        assert!(parse_role_weights("EDITOR").is_err());
        assert!(parse_role_weights("EDITOR=ten").is_err());
        assert!(parse_role_weights("EDITOR=50,EDITOR=50").is_err());
    }

    #[test]
    fn test_partial_json() {
        let config: AppConfig =
            serde_json::from_str(r#"{"roles": {"CHIEF_EDITOR": 100}}"#).unwrap();
        assert_eq!(config.server.port, 8082);
        assert_eq!(
            config.registry().unwrap().voting_roles(),
            vec![Role::ChiefEditor]
        );
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = AppConfig::from_file("/nonexistent/editorial.json").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
