//! Container descriptors and topology planning.
//!
//! A [`TopologyPlan`] is the pure part of topology setup: which containers
//! exist, what they are called, which port each listens on, and what command
//! line it runs. Nothing here touches Docker, so the rules are unit tested.

use std::fmt;
use std::str::FromStr;

use crate::client::NodeAddress;
use crate::config::PlaygroundConfig;
use crate::error::Result;

/// Binary started inside each container.
pub const SERVER_BINARY: &str = "valkey-server";

/// Role of a node in the topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeRole {
    /// Accepts writes.
    Primary,
    /// Replicates from the primary.
    Replica,
}

impl fmt::Display for NodeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeRole::Primary => write!(f, "primary"),
            NodeRole::Replica => write!(f, "replica"),
        }
    }
}

/// How a replica reaches its primary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReplicaLink {
    /// Primary's container name and container port on the shared network.
    #[default]
    Network,
    /// Primary's resolved host and mapped host port.
    ///
    /// Only reachable from a replica when the Docker host is routable from
    /// inside containers (e.g. `host.docker.internal` setups).
    HostMapped,
}

impl ReplicaLink {
    /// Address a replica passes to `--replicaof`.
    ///
    /// `mapped` is the primary's resolved host address once it is running.
    pub fn primary_address(self, primary: &NodeSpec, mapped: &NodeAddress) -> NodeAddress {
        match self {
            ReplicaLink::Network => primary.network_address(),
            ReplicaLink::HostMapped => mapped.clone(),
        }
    }
}

impl FromStr for ReplicaLink {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "network" => Ok(ReplicaLink::Network),
            "host" | "host-mapped" => Ok(ReplicaLink::HostMapped),
            other => Err(format!("unknown replica link: {other}")),
        }
    }
}

/// Description of one container before it is started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeSpec {
    /// Position in the topology; 0 is the primary.
    pub index: usize,
    pub role: NodeRole,
    /// Container name, also its DNS name on the topology network.
    pub name: String,
    /// Port `valkey-server` listens on inside the container.
    pub port: u16,
}

impl NodeSpec {
    /// Startup command line.
    ///
    /// `primary` must be `Some` for replicas; it is ignored for the primary.
    pub fn command(&self, primary: Option<&NodeAddress>) -> Vec<String> {
        let mut cmd = vec![
            SERVER_BINARY.to_string(),
            "--port".to_string(),
            self.port.to_string(),
        ];
        if self.role == NodeRole::Replica
            && let Some(primary) = primary
        {
            cmd.push("--replicaof".to_string());
            cmd.push(primary.host.clone());
            cmd.push(primary.port.to_string());
        }
        cmd
    }

    /// Address of this node as seen from other containers on the network.
    pub fn network_address(&self) -> NodeAddress {
        NodeAddress::new(self.name.clone(), self.port)
    }
}

/// Ordered set of container descriptors for one topology.
#[derive(Debug, Clone)]
pub struct TopologyPlan {
    /// Identifier shared by the network and container names.
    pub run_id: String,
    /// Docker network all nodes join.
    pub network: String,
    /// Index 0 is the primary, the rest are replicas.
    pub nodes: Vec<NodeSpec>,
}

impl TopologyPlan {
    /// Lay out one primary and `config.replicas` replicas on sequential ports.
    ///
    /// Fails with `InvalidConfig` when `config` does not validate, e.g. when
    /// the last replica's port would exceed `u16::MAX`.
    pub fn new(config: &PlaygroundConfig, run_id: &str) -> Result<Self> {
        config.validate()?;
        let nodes = (0..=config.replicas)
            .map(|offset| {
                let role = if offset == 0 {
                    NodeRole::Primary
                } else {
                    NodeRole::Replica
                };
                NodeSpec {
                    index: usize::from(offset),
                    role,
                    name: format!("valkey-{run_id}-{offset}"),
                    port: config.base_port + offset,
                }
            })
            .collect();

        Ok(Self {
            run_id: run_id.to_string(),
            network: format!("valkey-net-{run_id}"),
            nodes,
        })
    }

    /// The primary's descriptor.
    pub fn primary(&self) -> Option<&NodeSpec> {
        self.nodes.first()
    }

    /// Replica descriptors in start order.
    pub fn replicas(&self) -> &[NodeSpec] {
        self.nodes.get(1..).unwrap_or_default()
    }
}
