//! Common test fixtures and helpers.

use std::time::Duration;

use valkey_playground::telemetry::{DEFAULT_FILTER, init_tracing};
use valkey_playground::{PlaygroundConfig, RunningTopology, ValkeyClient, start_topology};

use crate::common::fixtures::test_config;

// ============================================================
// Timeout Constants
// ============================================================

/// Short timeout for quick operations.
pub const SHORT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default timeout for replication to settle.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================
// Test Initialization
// ============================================================

/// Initialize tracing and start a topology with `replicas` replicas.
///
/// Plays the role of a before-all hook: the topology is started, each
/// container's status is logged, and every container is checked running.
pub async fn init_test(replicas: u16) -> RunningTopology {
    init_test_with_config(test_config(replicas)).await
}

/// Initialize tracing and start a topology from an explicit configuration.
pub async fn init_test_with_config(config: PlaygroundConfig) -> RunningTopology {
    init_tracing(DEFAULT_FILTER);

    let topology = start_topology(config)
        .await
        .expect("Failed to start Valkey topology");
    assert!(!topology.is_empty(), "Topology should not be empty");
    topology
}

/// Connect directly to every replica of `topology`.
pub async fn connect_replicas(topology: &RunningTopology) -> Vec<ValkeyClient> {
    let mut clients = Vec::new();
    for replica in topology.replicas() {
        let client = ValkeyClient::connect_single(replica.address(), None)
            .await
            .unwrap_or_else(|e| panic!("Failed to connect to {}: {}", replica.name(), e));
        clients.push(client);
    }
    clients
}
