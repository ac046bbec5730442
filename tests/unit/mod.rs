// Test code is allowed to panic on failure
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

//! Unit tests for valkey-playground.
//!
//! These tests run without Docker and exercise the public API pieces that
//! do not need a live server.

#[path = "../common/mod.rs"]
mod common;

mod plan_tests {
    use valkey_playground::NodeAddress;
    use valkey_playground::topology::{NodeRole, ReplicaLink, TopologyBuilder, TopologyPlan};

    use crate::common::fixtures::test_config;

    #[test]
    fn test_plan_from_default_config_matches_fixture() {
        let plan = TopologyBuilder::new(test_config(1))
            .with_run_id("test")
            .plan()
            .unwrap();

        assert_eq!(plan.nodes.len(), 2);
        assert_eq!(plan.nodes[0].role, NodeRole::Primary);
        assert_eq!(plan.nodes[0].port, 6379);
        assert_eq!(plan.nodes[1].role, NodeRole::Replica);
        assert_eq!(plan.nodes[1].port, 6380);
    }

    #[test]
    fn test_replica_points_at_primary_network_name() {
        let plan = TopologyPlan::new(&test_config(2), "test").unwrap();
        let primary = plan.primary().unwrap().network_address();
        assert_eq!(primary, NodeAddress::new("valkey-test-0", 6379));

        for replica in plan.replicas() {
            let cmd = replica.command(Some(&primary)).join(" ");
            assert_eq!(
                cmd,
                format!(
                    "valkey-server --port {} --replicaof valkey-test-0 6379",
                    replica.port
                )
            );
        }
    }

    #[test]
    fn test_replica_link_default_is_network() {
        assert_eq!(test_config(1).replica_link, ReplicaLink::Network);
    }

    #[test]
    fn test_node_role_display() {
        assert_eq!(NodeRole::Primary.to_string(), "primary");
        assert_eq!(NodeRole::Replica.to_string(), "replica");
    }
}

mod client_tests {
    use std::time::Duration;

    use valkey_playground::client::{ReplicationInfo, ServerInfo};
    use valkey_playground::{BackoffStrategy, NodeAddress, RoleInfo, ValkeyClientConfig};

    use crate::common::fixtures::{
        PRIMARY_INFO, REPLICA_REPLICATION_INFO, primary_role_reply, replica_role_reply,
    };

    #[test]
    fn test_server_info_from_primary() {
        let info = ServerInfo::parse(PRIMARY_INFO).unwrap();
        assert!(info.is_valkey());
        assert!(info.is_primary());
        assert_eq!(info.connected_clients, Some(1));
    }

    #[test]
    fn test_replication_info_from_replica() {
        let info = ReplicationInfo::parse(REPLICA_REPLICATION_INFO).unwrap();
        assert!(info.is_link_up());
        assert_eq!(info.is_in_sync(), Some(true));
    }

    #[test]
    fn test_role_replies() {
        let primary = RoleInfo::parse(&primary_role_reply()).unwrap();
        assert_eq!(primary.name(), "master");

        let replica = RoleInfo::parse(&replica_role_reply()).unwrap();
        assert_eq!(replica.name(), "slave");
        assert!(matches!(
            replica,
            RoleInfo::Replica { ref primary_host, primary_port: 6379, .. } if primary_host == "valkey-test-0"
        ));
    }

    #[test]
    fn test_client_config_from_addresses() {
        let config = ValkeyClientConfig::new(vec![
            NodeAddress::new("localhost", 32768),
            NodeAddress::new("localhost", 32769),
        ])
        .with_reconnect_strategy(BackoffStrategy::default());

        assert_eq!(config.addresses.len(), 2);
        assert_eq!(config.reconnect, Some(BackoffStrategy::new(3, 2, 10)));
        assert_eq!(
            config.reconnect.unwrap().max_delay(),
            Duration::from_millis(2000)
        );
    }
}

mod harness_tests {
    use valkey_playground::harness::{SmokeError, SmokeOptions, check_info, check_value};

    use crate::common::fixtures::PRIMARY_INFO;

    #[test]
    fn test_check_info_on_captured_primary() {
        let server = check_info(PRIMARY_INFO, &SmokeOptions::default()).unwrap();
        assert_eq!(server.valkey_version.as_deref(), Some("8.0.0"));
    }

    #[test]
    fn test_check_info_rejects_redis() {
        let info = PRIMARY_INFO.replace("server_name:valkey\r\n", "");
        let err = check_info(&info, &SmokeOptions::default()).unwrap_err();
        assert!(matches!(err, SmokeError::InfoMissing(ref f) if f == "server_name:valkey"));
        assert_eq!(err.to_string(), "INFO does not contain 'server_name:valkey'");
    }

    #[test]
    fn test_check_value_prefix() {
        let key = "3f1c6a52-0d0e-4f7b-9d55-0d6c1d8c0b9e";
        assert!(check_value(key, Some(format!("value-{key}")), "value-").is_ok());
        assert!(check_value(key, Some(key.to_string()), "value-").is_err());
    }
}

mod config_tests {
    use valkey_playground::PlaygroundConfig;
    use valkey_playground::config::{ENV_BASE_PORT, ENV_REPLICAS};

    #[test]
    fn test_lookup_overrides_topology_size() {
        let config = PlaygroundConfig::from_lookup(|key| match key {
            k if k == ENV_REPLICAS => Some("2".to_string()),
            k if k == ENV_BASE_PORT => Some("7000".to_string()),
            _ => None,
        })
        .unwrap();

        assert_eq!(config.node_count(), 3);
        assert_eq!(config.base_port, 7000);
    }

    #[test]
    fn test_invalid_port_reported() {
        let err = PlaygroundConfig::from_lookup(|key| {
            (key == ENV_BASE_PORT).then(|| "70000".to_string())
        })
        .unwrap_err();
        assert!(err.to_string().starts_with("Invalid configuration"));
    }
}
