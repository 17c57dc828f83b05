use crate::config::{
    default_connect_timeout_secs, default_host, default_port, default_response_timeout_secs,
    default_write_timeout_secs,
};

use serde::{Deserialize, Serialize};

/// Upload server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host name.
    #[serde(default = "default_host")]
    pub host: String,
    /// Server TCP port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Limit for resolving and connecting.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Limit for any single stalled write of the request.
    #[serde(default = "default_write_timeout_secs")]
    pub write_timeout_secs: u64,
    /// Limit for the server's reply after the payload is sent.
    #[serde(default = "default_response_timeout_secs")]
    pub response_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            connect_timeout_secs: default_connect_timeout_secs(),
            write_timeout_secs: default_write_timeout_secs(),
            response_timeout_secs: default_response_timeout_secs(),
        }
    }
}
