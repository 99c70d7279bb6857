//! Server configuration.

use serde::{Deserialize, Serialize};

/// Listener configuration for [`crate::CatalogServer`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind (default `"0.0.0.0"`).
    pub host: String,
    /// Port to bind (default `3002`; `0` auto-assigns).
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 3002,
        }
    }
}

impl ServerConfig {
    /// Loopback config on an auto-assigned port.
    pub fn ephemeral() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 0,
        }
    }

    /// `host:port` string for binding.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_listens_on_3002() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.host, "0.0.0.0");
        assert_eq!(cfg.port, 3002);
        assert_eq!(cfg.bind_addr(), "0.0.0.0:3002");
    }

    #[test]
    fn ephemeral_is_loopback_port_zero() {
        let cfg = ServerConfig::ephemeral();
        assert_eq!(cfg.bind_addr(), "127.0.0.1:0");
    }
}
