//! Primary/replica container topology.
//!
//! Organized into submodules:
//! - `node`: container descriptors and the pure topology plan
//! - `builder`: sequential container startup on an isolated network
//! - `running`: handles to started containers
//! - `logs`: container output forwarded to tracing

pub mod builder;
pub mod logs;
pub mod node;
pub mod running;

pub use builder::{READY_MESSAGE, TopologyBuilder};
pub use logs::TracingLogConsumer;
pub use node::{NodeRole, NodeSpec, ReplicaLink, SERVER_BINARY, TopologyPlan};
pub use running::{RunningNode, RunningTopology};

use thiserror::Error;

/// Errors raised while managing containers.
#[derive(Error, Debug)]
pub enum TopologyError {
    #[error("Container runtime error: {0}")]
    Container(#[from] testcontainers::TestcontainersError),

    #[error("Container {name} ({id}) is not running")]
    ContainerNotRunning { name: String, id: String },

    #[error("Topology has no primary")]
    MissingPrimary,
}
