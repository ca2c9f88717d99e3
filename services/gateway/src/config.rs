//! Startup configuration, read once from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use reqwest::Url;

pub const BACKEND_URL_VAR: &str = "BACKEND_URL";
pub const STATIC_DIR_VAR: &str = "STATIC_DIR";
pub const DEFAULT_STATIC_DIR: &str = "/opt/app/frontend/build";
pub const LISTEN_PORT: u16 = 3000;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not set; start the gateway with {0}=http://...")]
    Missing(&'static str),
    #[error("{name} is not a usable backend address: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Process-wide, read-only settings fixed at startup.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub backend: Url,
    pub static_dir: PathBuf,
    pub listen: SocketAddr,
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup so callers never have to
    /// touch the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let raw_backend = non_empty(BACKEND_URL_VAR).ok_or(ConfigError::Missing(BACKEND_URL_VAR))?;
        let backend = parse_backend(raw_backend.trim())?;

        let static_dir = non_empty(STATIC_DIR_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR));

        Ok(Self {
            backend,
            static_dir,
            listen: SocketAddr::from(([0, 0, 0, 0], LISTEN_PORT)),
        })
    }
}

fn parse_backend(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::Invalid {
        name: BACKEND_URL_VAR,
        reason,
    };

    let url = Url::parse(raw).map_err(|error| invalid(error.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme `{}`", url.scheme())));
    }
    if url.cannot_be_a_base() || url.host().is_none() {
        return Err(invalid("missing host".into()));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn missing_backend_is_reported_by_name() {
        let error = GatewayConfig::from_lookup(lookup(&[])).unwrap_err();
        assert_eq!(error, ConfigError::Missing("BACKEND_URL"));
        assert!(error.to_string().contains("BACKEND_URL"));
    }

    #[test]
    fn blank_backend_counts_as_missing() {
        let error = GatewayConfig::from_lookup(lookup(&[("BACKEND_URL", "  ")])).unwrap_err();
        assert_eq!(error, ConfigError::Missing("BACKEND_URL"));
    }

    #[rstest]
    #[case("not a url")]
    #[case("ftp://backend.internal")]
    #[case("mailto:ops@example.com")]
    fn rejects_unusable_backend(#[case] raw: &str) {
        let error = GatewayConfig::from_lookup(lookup(&[("BACKEND_URL", raw)])).unwrap_err();
        assert!(matches!(error, ConfigError::Invalid { name: "BACKEND_URL", .. }));
    }

    #[test]
    fn defaults_static_dir_and_port() {
        let config =
            GatewayConfig::from_lookup(lookup(&[("BACKEND_URL", "http://10.0.1.20:8000")])).unwrap();
        assert_eq!(config.backend.as_str(), "http://10.0.1.20:8000/");
        assert_eq!(config.static_dir, PathBuf::from(DEFAULT_STATIC_DIR));
        assert_eq!(config.listen.port(), 3000);
    }

    #[test]
    fn static_dir_can_be_overridden() {
        let config = GatewayConfig::from_lookup(lookup(&[
            ("BACKEND_URL", "https://users.internal"),
            ("STATIC_DIR", "/srv/admin"),
        ]))
        .unwrap();
        assert_eq!(config.static_dir, PathBuf::from("/srv/admin"));
    }
}
