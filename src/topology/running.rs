//! Handles to started containers.

use testcontainers::{ContainerAsync, GenericImage};
use tracing::{info, instrument, warn};

use crate::client::NodeAddress;
use crate::topology::TopologyError;
use crate::topology::node::{NodeRole, NodeSpec, TopologyPlan};

/// A started container together with its descriptor and resolved address.
#[derive(Debug)]
pub struct RunningNode {
    spec: NodeSpec,
    command: Vec<String>,
    address: NodeAddress,
    container: ContainerAsync<GenericImage>,
}

impl RunningNode {
    pub(crate) fn new(
        spec: NodeSpec,
        command: Vec<String>,
        address: NodeAddress,
        container: ContainerAsync<GenericImage>,
    ) -> Self {
        Self {
            spec,
            command,
            address,
            container,
        }
    }

    pub fn spec(&self) -> &NodeSpec {
        &self.spec
    }

    pub fn role(&self) -> NodeRole {
        self.spec.role
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    /// Docker container id.
    pub fn id(&self) -> &str {
        self.container.id()
    }

    /// Command line the container was started with.
    pub fn command(&self) -> &[String] {
        &self.command
    }

    /// Host and mapped port reachable from the test process.
    pub fn address(&self) -> &NodeAddress {
        &self.address
    }

    pub async fn is_running(&self) -> Result<bool, TopologyError> {
        Ok(self.container.is_running().await?)
    }

    /// Stop the container without removing it.
    pub async fn stop(&self) -> Result<(), TopologyError> {
        self.container.stop().await?;
        Ok(())
    }
}

/// A started topology. Index 0 of [`RunningTopology::nodes`] is the primary.
///
/// Dropping the topology removes its containers and network.
#[derive(Debug)]
pub struct RunningTopology {
    plan: TopologyPlan,
    primary: RunningNode,
    replicas: Vec<RunningNode>,
}

impl RunningTopology {
    pub(crate) fn new(plan: TopologyPlan, primary: RunningNode, replicas: Vec<RunningNode>) -> Self {
        Self {
            plan,
            primary,
            replicas,
        }
    }

    pub fn plan(&self) -> &TopologyPlan {
        &self.plan
    }

    pub fn network(&self) -> &str {
        &self.plan.network
    }

    pub fn primary(&self) -> &RunningNode {
        &self.primary
    }

    pub fn replicas(&self) -> &[RunningNode] {
        &self.replicas
    }

    /// All nodes in start order.
    pub fn nodes(&self) -> impl Iterator<Item = &RunningNode> {
        std::iter::once(&self.primary).chain(self.replicas.iter())
    }

    pub fn len(&self) -> usize {
        1 + self.replicas.len()
    }

    /// Always false; a topology has at least a primary.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Addresses of every node in start order, for client configuration.
    pub fn node_addresses(&self) -> Vec<NodeAddress> {
        self.nodes().map(|n| n.address().clone()).collect()
    }

    /// Log the running state and container id of every node.
    pub async fn log_status(&self) {
        for node in self.nodes() {
            match node.is_running().await {
                Ok(running) => info!(
                    container = %node.name(),
                    id = %node.id(),
                    role = %node.role(),
                    is_running = running,
                    "Container status"
                ),
                Err(e) => warn!(
                    container = %node.name(),
                    id = %node.id(),
                    error = %e,
                    "Failed to inspect container"
                ),
            }
        }
    }

    /// Fail on the first node that is not running.
    pub async fn ensure_all_running(&self) -> Result<(), TopologyError> {
        for node in self.nodes() {
            if !node.is_running().await? {
                return Err(TopologyError::ContainerNotRunning {
                    name: node.name().to_string(),
                    id: node.id().to_string(),
                });
            }
        }
        Ok(())
    }

    /// Stop every container in start order.
    #[instrument(skip(self), fields(network = %self.plan.network))]
    pub async fn stop(&self) -> Result<(), TopologyError> {
        for node in self.nodes() {
            node.stop().await?;
            info!(container = %node.name(), id = %node.id(), "Container stopped");
        }
        Ok(())
    }
}
