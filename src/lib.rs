//! valkey-playground library crate
//!
//! Starts Valkey primary/replica topologies in containers and exercises a
//! Valkey client against them.
//!
//! ```no_run
//! use valkey_playground::{PlaygroundConfig, start_topology, connect_primary};
//! use valkey_playground::harness::{SmokeOptions, run_smoke_check};
//!
//! # async fn demo() -> valkey_playground::Result<()> {
//! let topology = start_topology(PlaygroundConfig::default()).await?;
//! let client = connect_primary(&topology).await?;
//! run_smoke_check(&client, &SmokeOptions::default()).await?;
//! topology.stop().await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod harness;
pub mod telemetry;
pub mod topology;
pub mod wait;

pub use client::{BackoffStrategy, NodeAddress, RoleInfo, ValkeyClient, ValkeyClientConfig};
pub use config::PlaygroundConfig;
pub use error::{Error, Result};
pub use topology::{RunningTopology, TopologyBuilder};

use tracing::info;

/// Start a topology, log each container's status and check they all run.
pub async fn start_topology(config: PlaygroundConfig) -> Result<RunningTopology> {
    let topology = TopologyBuilder::new(config).start().await?;
    topology.log_status().await;
    topology.ensure_all_running().await?;
    info!(
        network = %topology.network(),
        nodes = topology.len(),
        "Topology running"
    );
    Ok(topology)
}

/// Client configuration listing every node of `topology`, with the default
/// reconnect backoff.
pub fn client_config_for(topology: &RunningTopology) -> ValkeyClientConfig {
    let addresses = topology.node_addresses();
    for address in &addresses {
        info!(%address, "NodeAddress");
    }
    ValkeyClientConfig::new(addresses).with_reconnect_strategy(BackoffStrategy::default())
}

/// Connect to the primary of `topology`.
pub async fn connect_primary(topology: &RunningTopology) -> Result<ValkeyClient> {
    let config = client_config_for(topology);
    info!(?config, "Client config");
    Ok(ValkeyClient::connect(config).await?)
}
