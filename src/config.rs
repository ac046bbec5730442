//! Fixture configuration.
//!
//! Defaults match the upstream Valkey image and port; every field can be
//! overridden through an environment variable so CI can pin a different
//! image or topology size without code changes.

use std::time::Duration;

use tracing::debug;

use crate::error::{Error, Result};
use crate::topology::ReplicaLink;

/// Default container image name.
pub const DEFAULT_IMAGE: &str = "valkey/valkey";
/// Default container image tag.
pub const DEFAULT_TAG: &str = "8.0.0-rc2";
/// Default listening port of the primary.
pub const DEFAULT_BASE_PORT: u16 = 6379;
/// Default number of replicas.
pub const DEFAULT_REPLICAS: u16 = 1;
/// Default time allowed for a container to report readiness.
pub const DEFAULT_STARTUP_TIMEOUT: Duration = Duration::from_secs(60);

pub const ENV_IMAGE: &str = "VALKEY_IMAGE";
pub const ENV_TAG: &str = "VALKEY_TAG";
pub const ENV_REPLICAS: &str = "VALKEY_REPLICAS";
pub const ENV_BASE_PORT: &str = "VALKEY_BASE_PORT";
pub const ENV_STARTUP_TIMEOUT_SECS: &str = "VALKEY_STARTUP_TIMEOUT_SECS";
pub const ENV_REPLICA_LINK: &str = "VALKEY_REPLICA_LINK";

/// Configuration for a primary/replica topology.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlaygroundConfig {
    /// Container image name.
    pub image: String,
    /// Container image tag.
    pub tag: String,
    /// Number of replicas attached to the primary.
    pub replicas: u16,
    /// Port of the primary; replica `i` listens on `base_port + i`.
    pub base_port: u16,
    /// Time allowed for each container to become ready.
    pub startup_timeout: Duration,
    /// How replicas address the primary.
    pub replica_link: ReplicaLink,
}

impl Default for PlaygroundConfig {
    fn default() -> Self {
        Self {
            image: DEFAULT_IMAGE.to_string(),
            tag: DEFAULT_TAG.to_string(),
            replicas: DEFAULT_REPLICAS,
            base_port: DEFAULT_BASE_PORT,
            startup_timeout: DEFAULT_STARTUP_TIMEOUT,
            replica_link: ReplicaLink::default(),
        }
    }
}

impl PlaygroundConfig {
    /// Build a configuration from defaults overlaid with environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable lookup.
    ///
    /// `from_env` delegates here; tests pass a map instead of mutating the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(image) = lookup(ENV_IMAGE) {
            config.image = image;
        }
        if let Some(tag) = lookup(ENV_TAG) {
            config.tag = tag;
        }
        if let Some(raw) = lookup(ENV_REPLICAS) {
            config.replicas = parse_var(ENV_REPLICAS, &raw)?;
        }
        if let Some(raw) = lookup(ENV_BASE_PORT) {
            config.base_port = parse_var(ENV_BASE_PORT, &raw)?;
        }
        if let Some(raw) = lookup(ENV_STARTUP_TIMEOUT_SECS) {
            config.startup_timeout = Duration::from_secs(parse_var(ENV_STARTUP_TIMEOUT_SECS, &raw)?);
        }
        if let Some(raw) = lookup(ENV_REPLICA_LINK) {
            config.replica_link = raw.parse().map_err(|_| {
                Error::InvalidConfig(format!(
                    "{ENV_REPLICA_LINK}: expected 'network' or 'host', got '{raw}'"
                ))
            })?;
        }

        config.validate()?;
        debug!(?config, "Loaded playground configuration");
        Ok(config)
    }

    /// Set the number of replicas.
    pub fn with_replicas(mut self, replicas: u16) -> Self {
        self.replicas = replicas;
        self
    }

    /// Set the primary's port.
    pub fn with_base_port(mut self, base_port: u16) -> Self {
        self.base_port = base_port;
        self
    }

    /// Set the container image.
    pub fn with_image(mut self, image: impl Into<String>, tag: impl Into<String>) -> Self {
        self.image = image.into();
        self.tag = tag.into();
        self
    }

    /// Set the per-container startup timeout.
    pub fn with_startup_timeout(mut self, timeout: Duration) -> Self {
        self.startup_timeout = timeout;
        self
    }

    /// Set how replicas address the primary.
    pub fn with_replica_link(mut self, link: ReplicaLink) -> Self {
        self.replica_link = link;
        self
    }

    /// Total number of containers (primary plus replicas).
    pub fn node_count(&self) -> usize {
        1 + usize::from(self.replicas)
    }

    /// Check that the configuration describes a startable topology.
    pub fn validate(&self) -> Result<()> {
        if self.image.trim().is_empty() {
            return Err(Error::InvalidConfig("image must not be empty".to_string()));
        }
        if self.tag.trim().is_empty() {
            return Err(Error::InvalidConfig("tag must not be empty".to_string()));
        }
        if self.base_port == 0 {
            return Err(Error::InvalidConfig("base_port must be non-zero".to_string()));
        }
        if self.base_port.checked_add(self.replicas).is_none() {
            return Err(Error::InvalidConfig(format!(
                "base_port {} with {} replicas exceeds the port range",
                self.base_port, self.replicas
            )));
        }
        Ok(())
    }
}

fn parse_var<T>(name: &str, raw: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| Error::InvalidConfig(format!("{name}: {e} (got '{raw}')")))
}
