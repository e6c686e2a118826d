use std::net::SocketAddr;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Number of recent transactions kept for inspection.
    pub history_capacity: usize,
    /// Field names reported as failed when a payload does not carry them.
    pub expected_fields: Vec<String>,
    /// Field echoed back as `user` when a transaction is received.
    pub display_field: String,
    pub max_payload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8000)),
            history_capacity: txl_ledger::DEFAULT_CAPACITY,
            expected_fields: Vec::new(),
            display_field: "usrname".into(),
            max_payload_bytes: 1024 * 1024,
        }
    }
}

impl ServerConfig {
    pub fn from_toml_str(text: &str) -> ServerResult<Self> {
        let config: Self = toml::from_str(text).map_err(|e| ServerError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> ServerResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded server configuration");
        Ok(config)
    }

    pub fn validate(&self) -> ServerResult<()> {
        if self.history_capacity == 0 {
            return Err(ServerError::Config("history_capacity must be at least 1".into()));
        }
        if self.max_payload_bytes == 0 {
            return Err(ServerError::Config("max_payload_bytes must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config() {
        let c = ServerConfig::default();
        assert_eq!(c.bind_addr, "127.0.0.1:8000".parse::<SocketAddr>().unwrap());
        assert_eq!(c.history_capacity, 10);
        assert!(c.expected_fields.is_empty());
        assert_eq!(c.display_field, "usrname");
        c.validate().unwrap();
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let c = ServerConfig::from_toml_str(
            r#"
            bind_addr = "0.0.0.0:9000"
            expected_fields = ["authorizer_usrnbr", "usrname"]
            "#,
        )
        .unwrap();
        assert_eq!(c.bind_addr.port(), 9000);
        assert_eq!(c.expected_fields, ["authorizer_usrnbr", "usrname"]);
        assert_eq!(c.history_capacity, 10);
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let err = ServerConfig::from_toml_str("history_capacity = 0").unwrap_err();
        assert!(matches!(err, ServerError::Config(_)));
    }

    #[test]
    fn bad_toml_is_config_error() {
        let err = ServerConfig::from_toml_str("bind_addr = 12").unwrap_err();
        assert!(matches!(err, ServerError::Config(_)));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "display_field = \"creat_usrnbr\"").unwrap();
        writeln!(file, "history_capacity = 3").unwrap();

        let c = ServerConfig::load(file.path()).unwrap();
        assert_eq!(c.display_field, "creat_usrnbr");
        assert_eq!(c.history_capacity, 3);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = ServerConfig::load("/nonexistent/txl.toml").unwrap_err();
        assert!(matches!(err, ServerError::Io(_)));
    }
}
