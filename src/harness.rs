//! Fixed command sequence that validates a freshly started primary.
//!
//! The sequence: `PING` echo, `INFO` content, `ROLE`, a batch of `SET`/`GET`
//! round trips on random keys, then `RANDOMKEY`. The first mismatch is
//! reported as a [`SmokeError`].

use thiserror::Error;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::client::{RoleInfo, ServerInfo, ValkeyClient, ValkeyError};

/// Message sent with `PING`.
pub const DEFAULT_PING_MESSAGE: &str = "Hello world";
/// Prefix of every value written by the check.
pub const DEFAULT_VALUE_PREFIX: &str = "value-";
/// Number of keys written by the check.
pub const DEFAULT_KEY_COUNT: usize = 5;

/// Errors reported by the smoke check.
#[derive(Error, Debug)]
pub enum SmokeError {
    #[error("PING returned {actual:?}, expected {expected:?}")]
    PingMismatch { expected: String, actual: String },

    #[error("INFO does not contain '{0}'")]
    InfoMissing(String),

    #[error("ROLE returned '{actual}', expected '{expected}'")]
    RoleMismatch { expected: String, actual: String },

    #[error("GET {key} returned {value:?}, expected prefix '{prefix}'")]
    ValueMismatch {
        key: String,
        value: Option<String>,
        prefix: String,
    },

    #[error("RANDOMKEY returned no key")]
    NoRandomKey,

    #[error("Client error: {0}")]
    Client(#[from] ValkeyError),
}

/// Parameters of the smoke check.
#[derive(Debug, Clone)]
pub struct SmokeOptions {
    pub ping_message: String,
    pub key_count: usize,
    pub value_prefix: String,
    /// Expected `connected_clients`; `None` skips the check.
    pub expected_connected_clients: Option<i64>,
}

impl Default for SmokeOptions {
    fn default() -> Self {
        Self {
            ping_message: DEFAULT_PING_MESSAGE.to_string(),
            key_count: DEFAULT_KEY_COUNT,
            value_prefix: DEFAULT_VALUE_PREFIX.to_string(),
            expected_connected_clients: Some(1),
        }
    }
}

/// What the smoke check observed.
#[derive(Debug, Clone)]
pub struct SmokeReport {
    pub ping: String,
    pub server: ServerInfo,
    pub role: RoleInfo,
    /// Keys written, in write order.
    pub keys: Vec<String>,
    pub random_key: String,
}

/// Check raw `INFO` output against what a fresh Valkey primary reports.
pub fn check_info(info: &str, options: &SmokeOptions) -> Result<ServerInfo, SmokeError> {
    let mut expected = vec!["server_name:valkey".to_string(), "role:master".to_string()];
    if let Some(clients) = options.expected_connected_clients {
        expected.push(format!("connected_clients:{clients}"));
    }

    for fragment in expected {
        if !info.lines().any(|line| line.trim() == fragment) {
            return Err(SmokeError::InfoMissing(fragment));
        }
    }

    Ok(ServerInfo::parse(info).map_err(ValkeyError::from)?)
}

/// Check that a `GET` result carries the expected value prefix.
pub fn check_value(key: &str, value: Option<String>, prefix: &str) -> Result<String, SmokeError> {
    match value {
        Some(v) if v.starts_with(prefix) => Ok(v),
        other => Err(SmokeError::ValueMismatch {
            key: key.to_string(),
            value: other,
            prefix: prefix.to_string(),
        }),
    }
}

/// Run the fixed command sequence against a primary.
#[instrument(skip_all, fields(address = %client.address()))]
pub async fn run_smoke_check(
    client: &ValkeyClient,
    options: &SmokeOptions,
) -> Result<SmokeReport, SmokeError> {
    let ping = client.ping(&options.ping_message).await?;
    if ping != options.ping_message {
        return Err(SmokeError::PingMismatch {
            expected: options.ping_message.clone(),
            actual: ping,
        });
    }

    let raw_info = client.info(None).await?;
    let server = check_info(&raw_info, options)?;
    debug!(?server, "INFO checked");

    let role = client.role().await?;
    if !role.is_primary() {
        return Err(SmokeError::RoleMismatch {
            expected: "master".to_string(),
            actual: role.name().to_string(),
        });
    }

    let keys: Vec<String> = (0..options.key_count)
        .map(|_| Uuid::new_v4().to_string())
        .collect();
    for key in &keys {
        client
            .set(key, &format!("{}{}", options.value_prefix, key))
            .await?;
    }
    for key in &keys {
        let value = client.get(key).await?;
        check_value(key, value, &options.value_prefix)?;
    }

    let random_key = client.random_key().await?.ok_or(SmokeError::NoRandomKey)?;

    info!(keys = keys.len(), %random_key, "Smoke check passed");
    Ok(SmokeReport {
        ping,
        server,
        role,
        keys,
        random_key,
    })
}
