//! Test fixtures: configurations and captured server replies.

use fred::types::Value;
use valkey_playground::PlaygroundConfig;

/// Configuration with `replicas` replicas and everything else defaulted.
pub fn test_config(replicas: u16) -> PlaygroundConfig {
    PlaygroundConfig::default().with_replicas(replicas)
}

/// `INFO` output of a freshly started Valkey primary with one client.
pub const PRIMARY_INFO: &str = "# Server\r\n\
    redis_version:7.2.4\r\n\
    server_name:valkey\r\n\
    valkey_version:8.0.0\r\n\
    redis_mode:standalone\r\n\
    tcp_port:6379\r\n\
    \r\n\
    # Clients\r\n\
    connected_clients:1\r\n\
    blocked_clients:0\r\n\
    \r\n\
    # Replication\r\n\
    role:master\r\n\
    connected_slaves:1\r\n\
    slave0:ip=172.18.0.3,port=6380,state=online,offset=854,lag=1\r\n\
    master_repl_offset:854\r\n";

/// `INFO replication` output of a replica with an established link.
pub const REPLICA_REPLICATION_INFO: &str = "# Replication\r\n\
    role:slave\r\n\
    master_host:valkey-test-0\r\n\
    master_port:6379\r\n\
    master_link_status:up\r\n\
    slave_repl_offset:854\r\n\
    master_repl_offset:854\r\n";

/// `ROLE` reply of a primary with a single replica.
pub fn primary_role_reply() -> Vec<Value> {
    vec![
        Value::from("master"),
        Value::Integer(854),
        Value::Array(vec![Value::Array(vec![
            Value::from("172.18.0.3"),
            Value::from("6380"),
            Value::from("854"),
        ])]),
    ]
}

/// `ROLE` reply of a replica attached to `valkey-test-0:6379`.
pub fn replica_role_reply() -> Vec<Value> {
    vec![
        Value::from("slave"),
        Value::from("valkey-test-0"),
        Value::Integer(6379),
        Value::from("connected"),
        Value::Integer(854),
    ]
}
