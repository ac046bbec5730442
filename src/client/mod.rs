//! Valkey client module.
//!
//! This module provides:
//! - `valkey_client`: connection and command wrapper over fred
//! - `backoff`: reconnect backoff strategy
//! - `types`: node addresses and the parsed `ROLE` reply
//! - `parsing`: `INFO` output parsing

pub mod backoff;
pub mod parsing;
pub mod types;
pub mod valkey_client;

pub use backoff::BackoffStrategy;
pub use parsing::{ParseError, ReplicationInfo, ServerInfo};
pub use types::{NodeAddress, ReplicaEntry, RoleInfo};
pub use valkey_client::{ValkeyClient, ValkeyClientConfig, ValkeyError};
