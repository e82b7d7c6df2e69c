//! Server configuration read from environment variables.

use std::path::PathBuf;

use street_trees_census::socrata::DEFAULT_ENDPOINT;

/// Runtime settings for the API server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to bind (`BIND_ADDR`, default `127.0.0.1`).
    pub bind_addr: String,
    /// Port to bind (`PORT`, default `8080`).
    pub port: u16,
    /// Frontend directory served at `/` (`STATIC_DIR`, default `static`).
    pub static_dir: PathBuf,
    /// Tree census resource URL (`TREE_CENSUS_URL`).
    pub census_url: String,
}

impl ServerConfig {
    /// Reads configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, falling back to defaults for
    /// missing or unparseable values.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                log::warn!("Ignoring invalid PORT {raw:?}, using 8080");
                8080
            }),
            None => 8080,
        };

        Self {
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| "127.0.0.1".to_string()),
            port,
            static_dir: lookup("STATIC_DIR").map_or_else(|| PathBuf::from("static"), PathBuf::from),
            census_url: lookup("TREE_CENSUS_URL").unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_unset() {
        let config = ServerConfig::from_lookup(|_| None);
        assert_eq!(config.bind_addr, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.static_dir, PathBuf::from("static"));
        assert_eq!(config.census_url, DEFAULT_ENDPOINT);
    }

    #[test]
    fn reads_overrides() {
        let config = ServerConfig::from_lookup(|key| match key {
            "BIND_ADDR" => Some("0.0.0.0".to_string()),
            "PORT" => Some("9000".to_string()),
            "STATIC_DIR" => Some("frontend/dist".to_string()),
            "TREE_CENSUS_URL" => Some("http://localhost:1234/trees.json".to_string()),
            _ => None,
        });
        assert_eq!(config.bind_addr, "0.0.0.0");
        assert_eq!(config.port, 9000);
        assert_eq!(config.static_dir, PathBuf::from("frontend/dist"));
        assert_eq!(config.census_url, "http://localhost:1234/trees.json");
    }

    #[test]
    fn invalid_port_falls_back() {
        let config = ServerConfig::from_lookup(|key| (key == "PORT").then(|| "http".to_string()));
        assert_eq!(config.port, 8080);
    }
}
