//! Valkey client wrapper using the fred crate.
//!
//! Connects to a standalone primary/replica deployment given a list of node
//! addresses and exposes the handful of commands the fixture exercises.

use std::time::Duration;

use fred::prelude::*;
use fred::types::config::ReconnectPolicy;
use fred::types::{ClusterHash, CustomCommand, InfoKind, Value};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::client::backoff::BackoffStrategy;
use crate::client::parsing::{ReplicationInfo, ServerInfo};
use crate::client::types::{NodeAddress, RoleInfo};

/// Errors that can occur during Valkey operations.
#[derive(Error, Debug)]
pub enum ValkeyError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Redis error: {0}")]
    Redis(#[from] fred::error::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] crate::client::parsing::ParseError),

    #[error("Unexpected reply to {command}: {reply}")]
    UnexpectedReply { command: String, reply: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Configuration for connecting to a set of Valkey nodes.
#[derive(Clone, Debug)]
pub struct ValkeyClientConfig {
    /// Candidate nodes, tried in order.
    pub addresses: Vec<NodeAddress>,
    /// Reconnect backoff; fred's default policy applies when unset.
    pub reconnect: Option<BackoffStrategy>,
    /// Connection timeout.
    pub connection_timeout: Duration,
    /// Command timeout.
    pub command_timeout: Duration,
}

impl Default for ValkeyClientConfig {
    fn default() -> Self {
        Self {
            addresses: Vec::new(),
            reconnect: None,
            connection_timeout: Duration::from_secs(10),
            command_timeout: Duration::from_secs(30),
        }
    }
}

impl ValkeyClientConfig {
    /// Create a new configuration with addresses.
    pub fn new(addresses: Vec<NodeAddress>) -> Self {
        Self {
            addresses,
            ..Default::default()
        }
    }

    /// Append a node address.
    pub fn with_address(mut self, address: NodeAddress) -> Self {
        self.addresses.push(address);
        self
    }

    /// Set the reconnect backoff.
    pub fn with_reconnect_strategy(mut self, backoff: BackoffStrategy) -> Self {
        self.reconnect = Some(backoff);
        self
    }

    /// Set connection timeout.
    pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    /// Set command timeout.
    pub fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    /// Reconnect policy handed to fred, if a backoff is configured.
    pub fn reconnect_policy(&self) -> Option<ReconnectPolicy> {
        self.reconnect.map(ReconnectPolicy::from)
    }
}

/// Valkey client bound to a single node.
pub struct ValkeyClient {
    client: Client,
    address: NodeAddress,
    config: ValkeyClientConfig,
}

impl ValkeyClient {
    /// Connect to the primary among `config.addresses`.
    ///
    /// Each address is tried in order. The first node whose `ROLE` is
    /// `master` wins. If no primary answers, the first reachable node is
    /// used; if no node is reachable, the last error is returned.
    #[instrument(skip(config), fields(addresses = ?config.addresses))]
    pub async fn connect(config: ValkeyClientConfig) -> Result<Self, ValkeyError> {
        if config.addresses.is_empty() {
            return Err(ValkeyError::InvalidConfig(
                "No node addresses provided".to_string(),
            ));
        }

        let mut fallback: Option<Self> = None;
        let mut last_error: Option<ValkeyError> = None;

        for address in &config.addresses {
            let client = match Self::connect_node(address, &config).await {
                Ok(client) => client,
                Err(e) => {
                    warn!(address = %address, error = %e, "Node unreachable");
                    last_error = Some(e);
                    continue;
                }
            };

            match client.role().await {
                Ok(role) if role.is_primary() => {
                    info!(address = %address, "Connected to primary");
                    if let Some(other) = fallback.take() {
                        let _ = other.close().await;
                    }
                    return Ok(client);
                }
                Ok(role) => {
                    debug!(address = %address, role = role.name(), "Node is not a primary");
                    if fallback.is_none() {
                        fallback = Some(client);
                    } else {
                        let _ = client.close().await;
                    }
                }
                Err(e) => {
                    warn!(address = %address, error = %e, "ROLE failed");
                    let _ = client.close().await;
                    last_error = Some(e);
                }
            }
        }

        if let Some(client) = fallback {
            warn!(address = %client.address, "No primary found, using first reachable node");
            return Ok(client);
        }

        Err(last_error
            .unwrap_or_else(|| ValkeyError::Connection("No reachable node".to_string())))
    }

    /// Connect to exactly one node, whatever its role.
    #[instrument(skip_all, fields(address = %address))]
    pub async fn connect_single(
        address: &NodeAddress,
        reconnect: Option<BackoffStrategy>,
    ) -> Result<Self, ValkeyError> {
        let config = ValkeyClientConfig {
            addresses: vec![address.clone()],
            reconnect,
            ..Default::default()
        };
        Self::connect_node(address, &config).await
    }

    async fn connect_node(
        address: &NodeAddress,
        config: &ValkeyClientConfig,
    ) -> Result<Self, ValkeyError> {
        let redis_config = Config {
            server: ServerConfig::Centralized {
                server: Server::new(address.host.clone(), address.port),
            },
            ..Default::default()
        };

        let command_timeout = config.command_timeout;
        let connection_timeout = config.connection_timeout;

        let mut builder = Builder::from_config(redis_config);
        builder
            .with_performance_config(|perf| {
                perf.default_command_timeout = command_timeout;
            })
            .with_connection_config(|conn| {
                conn.connection_timeout = connection_timeout;
            });
        if let Some(policy) = config.reconnect_policy() {
            builder.set_policy(policy);
        }
        let client = builder.build()?;

        debug!(address = %address, "Connecting to Valkey node");
        client.init().await?;
        debug!(address = %address, "Connected to Valkey node");

        Ok(Self {
            client,
            address: address.clone(),
            config: config.clone(),
        })
    }

    /// Get the underlying fred client.
    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// Node this client is connected to.
    pub fn address(&self) -> &NodeAddress {
        &self.address
    }

    /// Get the client configuration.
    pub fn config(&self) -> &ValkeyClientConfig {
        &self.config
    }

    /// Check if the client is connected.
    pub fn is_connected(&self) -> bool {
        self.client.is_connected()
    }

    /// Close the connection.
    pub async fn close(&self) -> Result<(), ValkeyError> {
        self.client.quit().await?;
        Ok(())
    }

    /// `PING <message>`; the server echoes the message.
    #[instrument(skip(self))]
    pub async fn ping(&self, message: &str) -> Result<String, ValkeyError> {
        let response: String = self.client.ping(Some(message.to_string())).await?;
        Ok(response)
    }

    /// Raw `INFO` output, optionally restricted to one section.
    #[instrument(skip(self))]
    pub async fn info(&self, section: Option<InfoKind>) -> Result<String, ValkeyError> {
        let response: String = self.client.info(section).await?;
        Ok(response)
    }

    /// Parsed server, clients and replication fields of `INFO`.
    pub async fn server_info(&self) -> Result<ServerInfo, ValkeyError> {
        let raw = self.info(None).await?;
        Ok(ServerInfo::parse(&raw)?)
    }

    /// Parsed `INFO replication`.
    pub async fn replication_info(&self) -> Result<ReplicationInfo, ValkeyError> {
        let raw = self.info(Some(InfoKind::Replication)).await?;
        Ok(ReplicationInfo::parse(&raw)?)
    }

    /// `SET key value`.
    #[instrument(skip(self, value))]
    pub async fn set(&self, key: &str, value: &str) -> Result<(), ValkeyError> {
        let _: () = self.client.set(key, value, None, None, false).await?;
        Ok(())
    }

    /// `GET key`; `None` when the key does not exist.
    #[instrument(skip(self))]
    pub async fn get(&self, key: &str) -> Result<Option<String>, ValkeyError> {
        let value: Option<String> = self.client.get(key).await?;
        Ok(value)
    }

    /// `RANDOMKEY`; `None` on an empty database.
    #[instrument(skip(self))]
    pub async fn random_key(&self) -> Result<Option<String>, ValkeyError> {
        let key: Option<String> = self.client.randomkey().await?;
        Ok(key)
    }

    /// Send an arbitrary command. `args[0]` is the command name.
    #[instrument(skip(self))]
    pub async fn custom_command(&self, args: &[&str]) -> Result<Value, ValkeyError> {
        let (name, rest) = args
            .split_first()
            .ok_or_else(|| ValkeyError::InvalidConfig("Empty command".to_string()))?;

        let command = CustomCommand::new(name.to_string(), ClusterHash::FirstKey, false);
        let rest: Vec<String> = rest.iter().map(|arg| arg.to_string()).collect();
        let reply: Value = self.client.custom(command, rest).await?;
        Ok(reply)
    }

    /// `ROLE`, parsed.
    #[instrument(skip(self))]
    pub async fn role(&self) -> Result<RoleInfo, ValkeyError> {
        match self.custom_command(&["ROLE"]).await? {
            Value::Array(items) => Ok(RoleInfo::parse(&items)?),
            other => Err(ValkeyError::UnexpectedReply {
                command: "ROLE".to_string(),
                reply: format!("{other:?}"),
            }),
        }
    }
}
