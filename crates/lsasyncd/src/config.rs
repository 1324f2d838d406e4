//! Daemon configuration.

use serde::Deserialize;
use std::path::Path;

use lsr_types::{Name, RouterName};

use crate::error::{LsrError, Result};
use crate::lsa::AdvertisedPrefix;

/// Default dissemination scope when the config does not set one.
pub const DEFAULT_SCOPE_PREFIX: &str = "/ndn/broadcast/sync";

/// Configuration for lsasyncd, loaded from a JSON file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DaemonConfig {
    /// This router's name; the namespace root for everything it publishes.
    pub router_name: RouterName,

    /// The dissemination scope all routers in the network agree on.
    #[serde(default = "default_scope_prefix")]
    pub scope_prefix: Name,

    /// Prefixes this router advertises reachability for.
    #[serde(default)]
    pub advertised_prefixes: Vec<AdvertisedPrefix>,
}

fn default_scope_prefix() -> Name {
    DEFAULT_SCOPE_PREFIX
        .parse()
        .expect("default scope prefix is valid")
}

impl DaemonConfig {
    /// Loads and validates a configuration file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: DaemonConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.scope_prefix.is_empty() {
            return Err(LsrError::Config(
                "scope_prefix must not be the root name".to_string(),
            ));
        }
        for adv in &self.advertised_prefixes {
            if adv.cost < 0.0 {
                return Err(LsrError::Config(format!(
                    "advertised prefix {} has negative cost {}",
                    adv.destination, adv.cost
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn write_config(body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_minimal_config() {
        let file = write_config(r#"{ "router_name": "/ndn/site/router1" }"#);
        let config = DaemonConfig::from_file(file.path()).unwrap();
        assert_eq!(config.router_name.to_string(), "/ndn/site/router1");
        assert_eq!(config.scope_prefix.to_string(), DEFAULT_SCOPE_PREFIX);
        assert!(config.advertised_prefixes.is_empty());
    }

    #[test]
    fn test_full_config() {
        let file = write_config(
            r#"{
                "router_name": "/ndn/site/router1",
                "scope_prefix": "/ndn/site/sync",
                "advertised_prefixes": [
                    { "destination": "/ndn/site/prefixA", "face_uri": "udp4://10.0.0.1:6363", "cost": 12.5 }
                ]
            }"#,
        );
        let config = DaemonConfig::from_file(file.path()).unwrap();
        assert_eq!(config.scope_prefix.to_string(), "/ndn/site/sync");
        assert_eq!(config.advertised_prefixes.len(), 1);
    }

    #[test]
    fn test_negative_cost_rejected() {
        let file = write_config(
            r#"{
                "router_name": "/ndn/site/router1",
                "advertised_prefixes": [
                    { "destination": "/ndn/site/prefixA", "face_uri": "faceA", "cost": -1.0 }
                ]
            }"#,
        );
        assert!(matches!(
            DaemonConfig::from_file(file.path()),
            Err(LsrError::Config(_))
        ));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let file = write_config(r#"{ "router_name": "/ndn/site/router1", "bogus": 1 }"#);
        assert!(DaemonConfig::from_file(file.path()).is_err());
    }
}
