//! Container topology lifecycle tests.

use valkey_playground::topology::{NodeRole, ReplicaLink, SERVER_BINARY};

use crate::common::fixtures::test_config;
use crate::{assert_all_running, assert_none_running, init_test, init_test_with_config};

/// Test that the primary and replica containers start and run.
#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires Docker"]
async fn test_topology_containers_running() {
    let topology = init_test(1).await;

    assert_eq!(topology.len(), 2);
    assert_eq!(topology.primary().role(), NodeRole::Primary);
    assert_eq!(topology.replicas().len(), 1);
    assert_all_running(&topology).await;

    for node in topology.nodes() {
        assert!(!node.id().is_empty(), "Container id should be set");
        assert!(node.address().port > 0, "Mapped port should be assigned");
    }
}

/// Test that replica command lines embed the primary's address.
#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires Docker"]
async fn test_replica_commands_reference_primary() {
    let topology = init_test(2).await;
    let primary = topology.primary().spec();

    assert_eq!(
        topology.primary().command(),
        [
            SERVER_BINARY.to_string(),
            "--port".to_string(),
            primary.port.to_string()
        ]
    );

    for replica in topology.replicas() {
        let command = replica.command().join(" ");
        assert!(
            command.ends_with(&format!("--replicaof {} {}", primary.name, primary.port)),
            "Replica {} command should point at the primary: {}",
            replica.name(),
            command
        );
    }
}

/// Test that host-mapped replicas point at the primary's mapped host port.
#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires Docker"]
async fn test_host_mapped_replica_command() {
    let config = test_config(1).with_replica_link(ReplicaLink::HostMapped);
    let topology = init_test_with_config(config).await;
    let mapped = topology.primary().address();

    let command = topology.replicas()[0].command().join(" ");
    assert!(
        command.ends_with(&format!("--replicaof {} {}", mapped.host, mapped.port)),
        "Replica command should use the primary's mapped address: {}",
        command
    );
}

/// Test that nodes listen on sequential ports and get distinct host ports.
#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires Docker"]
async fn test_sequential_ports() {
    let topology = init_test(2).await;

    let ports: Vec<u16> = topology.nodes().map(|n| n.spec().port).collect();
    assert_eq!(ports, vec![6379, 6380, 6381]);

    let mut mapped: Vec<u16> = topology.node_addresses().iter().map(|a| a.port).collect();
    mapped.sort_unstable();
    mapped.dedup();
    assert_eq!(mapped.len(), 3, "Each node should have its own host port");
}

/// Test that stop halts every container (after-all hook).
#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires Docker"]
async fn test_stop_halts_containers() {
    let topology = init_test(1).await;
    assert_all_running(&topology).await;

    topology.stop().await.expect("Failed to stop topology");

    assert_none_running(&topology).await;
    assert!(topology.ensure_all_running().await.is_err());
}
