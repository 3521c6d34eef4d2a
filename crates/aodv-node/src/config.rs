//! TOML configuration for AODV nodes.

use std::net::SocketAddr;
use std::path::Path;

use serde::Deserialize;

use aodv_core::types::NodeAddress;
use aodv_routing::ProtocolTiming;

use crate::error::NodeError;

/// Top-level node configuration loaded from a TOML file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeConfig {
    #[serde(default)]
    pub node: NodeSection,
    #[serde(default)]
    pub protocol: ProtocolSection,
    #[serde(default)]
    pub logging: LoggingSection,
    #[serde(default)]
    pub medium: MediumSection,
}

impl NodeConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, NodeError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| NodeError::Config(format!("failed to read config file: {e}")))?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// Values that TOML accepts but the node cannot use (a malformed address,
    /// an unparsable socket address) are rejected here rather than at startup.
    pub fn parse(s: &str) -> Result<Self, NodeError> {
        let config: Self = toml::from_str(s)
            .map_err(|e| NodeError::Config(format!("failed to parse config: {e}")))?;
        config.node.address()?;
        config.medium.bind_addr()?;
        config.medium.peer_addrs()?;
        config.medium.connect_addr()?;
        Ok(config)
    }
}

/// The `[node]` section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeSection {
    /// Local address as 1-4 hex digits. May also be set at runtime.
    pub address: Option<String>,
}

impl NodeSection {
    pub fn address(&self) -> Result<Option<NodeAddress>, NodeError> {
        self.address
            .as_deref()
            .map(|s| {
                s.parse::<NodeAddress>()
                    .map_err(|e| NodeError::Config(format!("invalid node address '{s}': {e}")))
            })
            .transpose()
    }
}

/// The `[protocol]` section.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProtocolSection {
    #[serde(default = "default_active_route_timeout")]
    pub active_route_timeout_ms: u64,
    #[serde(default = "default_node_traversal_time")]
    pub node_traversal_time_ms: u64,
    #[serde(default = "default_net_diameter")]
    pub net_diameter: u64,
    #[serde(default = "default_rreq_retries")]
    pub rreq_retries: u8,
}

fn default_active_route_timeout() -> u64 {
    ProtocolTiming::default().active_route_timeout
}

fn default_node_traversal_time() -> u64 {
    ProtocolTiming::default().node_traversal_time
}

fn default_net_diameter() -> u64 {
    ProtocolTiming::default().net_diameter
}

fn default_rreq_retries() -> u8 {
    ProtocolTiming::default().rreq_retries
}

impl ProtocolSection {
    pub fn to_timing(&self) -> ProtocolTiming {
        ProtocolTiming {
            active_route_timeout: self.active_route_timeout_ms,
            node_traversal_time: self.node_traversal_time_ms,
            net_diameter: self.net_diameter,
            rreq_retries: self.rreq_retries,
        }
    }
}

impl Default for ProtocolSection {
    fn default() -> Self {
        Self {
            active_route_timeout_ms: default_active_route_timeout(),
            node_traversal_time_ms: default_node_traversal_time(),
            net_diameter: default_net_diameter(),
            rreq_retries: default_rreq_retries(),
        }
    }
}

/// The `[logging]` section.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingSection {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// The `[medium]` section.
///
/// By default the node emulates the radio channel with UDP sockets. Setting
/// `connect` switches to the armored line medium over TCP instead.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MediumSection {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default)]
    pub peers: Vec<String>,
    pub connect: Option<String>,
}

fn default_bind() -> String {
    "0.0.0.0:47000".to_string()
}

impl MediumSection {
    pub fn bind_addr(&self) -> Result<SocketAddr, NodeError> {
        parse_socket_addr(&self.bind)
    }

    pub fn peer_addrs(&self) -> Result<Vec<SocketAddr>, NodeError> {
        self.peers.iter().map(|p| parse_socket_addr(p)).collect()
    }

    pub fn connect_addr(&self) -> Result<Option<SocketAddr>, NodeError> {
        self.connect.as_deref().map(parse_socket_addr).transpose()
    }
}

impl Default for MediumSection {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            peers: Vec::new(),
            connect: None,
        }
    }
}

/// Parse a socket address string like "0.0.0.0:47000".
pub fn parse_socket_addr(s: &str) -> Result<SocketAddr, NodeError> {
    s.parse()
        .map_err(|e| NodeError::Config(format!("invalid socket address '{s}': {e}")))
}
