//! Start a planned topology, one container at a time.

use testcontainers::core::{ContainerPort, WaitFor};
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, GenericImage, ImageExt};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::client::NodeAddress;
use crate::config::PlaygroundConfig;
use crate::error::Result;
use crate::topology::logs::TracingLogConsumer;
use crate::topology::node::{NodeRole, NodeSpec, TopologyPlan};
use crate::topology::running::{RunningNode, RunningTopology};
use crate::topology::TopologyError;

/// Line `valkey-server` prints once it accepts client connections.
pub const READY_MESSAGE: &str = "Ready to accept connections";

/// Builds and starts a primary/replica topology.
#[derive(Debug, Clone)]
pub struct TopologyBuilder {
    config: PlaygroundConfig,
    run_id: String,
}

impl TopologyBuilder {
    /// Create a builder with a fresh run identifier.
    pub fn new(config: PlaygroundConfig) -> Self {
        let run_id: String = Uuid::new_v4().simple().to_string().chars().take(8).collect();
        Self { config, run_id }
    }

    /// Override the run identifier used in network and container names.
    pub fn with_run_id(mut self, run_id: impl Into<String>) -> Self {
        self.run_id = run_id.into();
        self
    }

    pub fn config(&self) -> &PlaygroundConfig {
        &self.config
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Container descriptors this builder will start.
    pub fn plan(&self) -> Result<TopologyPlan> {
        TopologyPlan::new(&self.config, &self.run_id)
    }

    /// Start the primary, then each replica, sequentially.
    ///
    /// Replica commands embed the primary's address, so the primary is
    /// always started and resolved before any replica is configured. If a
    /// later container fails, containers already started are removed when
    /// their handles drop.
    #[instrument(skip(self), fields(run_id = %self.run_id, replicas = self.config.replicas))]
    pub async fn start(self) -> Result<RunningTopology> {
        let plan = self.plan()?;

        let mut primary: Option<RunningNode> = None;
        let mut replicas = Vec::with_capacity(plan.replicas().len());

        for spec in &plan.nodes {
            let link = primary
                .as_ref()
                .map(|p| self.config.replica_link.primary_address(p.spec(), p.address()));
            let command = spec.command(link.as_ref());
            debug!(container = %spec.name, command = %command.join(" "), "Starting container");

            let container = self.start_container(&plan.network, spec, command.clone()).await?;
            let address = resolve_address(&container, spec.port).await?;
            info!(
                container = %spec.name,
                id = %container.id(),
                role = %spec.role,
                address = %address,
                "Container started"
            );

            let node = RunningNode::new(spec.clone(), command, address, container);
            match spec.role {
                NodeRole::Primary => primary = Some(node),
                NodeRole::Replica => replicas.push(node),
            }
        }

        let primary = primary.ok_or(TopologyError::MissingPrimary)?;
        Ok(RunningTopology::new(plan, primary, replicas))
    }

    async fn start_container(
        &self,
        network: &str,
        spec: &NodeSpec,
        command: Vec<String>,
    ) -> std::result::Result<ContainerAsync<GenericImage>, TopologyError> {
        let container = GenericImage::new(self.config.image.clone(), self.config.tag.clone())
            .with_exposed_port(ContainerPort::Tcp(spec.port))
            .with_wait_for(WaitFor::message_on_stdout(READY_MESSAGE))
            .with_network(network)
            .with_container_name(spec.name.clone())
            .with_cmd(command)
            .with_startup_timeout(self.config.startup_timeout)
            .with_log_consumer(TracingLogConsumer::new(spec.name.clone()))
            .start()
            .await?;
        Ok(container)
    }
}

async fn resolve_address(
    container: &ContainerAsync<GenericImage>,
    port: u16,
) -> std::result::Result<NodeAddress, TopologyError> {
    let host = container.get_host().await?.to_string();
    let mapped = container.get_host_port_ipv4(ContainerPort::Tcp(port)).await?;
    Ok(NodeAddress::new(host, mapped))
}
