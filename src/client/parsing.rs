//! Parsing of Valkey `INFO` text output.
//!
//! `INFO` returns `key:value` lines grouped under `# Section` headers. The
//! functions here are pure so they can be tested against captured output.

use std::collections::HashMap;

use regex::Regex;
use thiserror::Error;

/// Errors that can occur during parsing.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Failed to compile regex: {0}")]
    RegexCompilation(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Missing required field: {0}")]
    MissingField(String),
}

/// Parse key-value pairs from INFO command output.
///
/// # Example
/// ```
/// use valkey_playground::client::parsing::parse_info_output;
///
/// let info = "# Server\nserver_name:valkey\nrole:master\n";
/// let parsed = parse_info_output(info).unwrap();
/// assert_eq!(parsed.get("server_name"), Some(&"valkey".to_string()));
/// ```
pub fn parse_info_output(info: &str) -> Result<HashMap<String, String>, ParseError> {
    let kv_regex =
        Regex::new(r"^([\w-]+):(.*)$").map_err(|e| ParseError::RegexCompilation(e.to_string()))?;

    let mut result = HashMap::new();

    for line in info.lines() {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(caps) = kv_regex.captures(line)
            && let (Some(key), Some(value)) = (caps.get(1), caps.get(2))
        {
            result.insert(key.as_str().to_string(), value.as_str().to_string());
        }
    }

    Ok(result)
}

/// Parse a specific value from INFO output by key name.
pub fn parse_info_value(info: &str, key: &str) -> Option<String> {
    parse_info_output(info)
        .ok()
        .and_then(|map| map.get(key).cloned())
}

/// Parse an integer value from INFO output.
pub fn parse_info_int(info: &str, key: &str) -> Option<i64> {
    parse_info_value(info, key).and_then(|v| v.trim().parse().ok())
}

/// Fields of the `# Server`, `# Clients` and `# Replication` sections the
/// fixture asserts on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerInfo {
    /// `valkey` for Valkey servers; absent on Redis.
    pub server_name: Option<String>,
    pub valkey_version: Option<String>,
    pub redis_version: Option<String>,
    /// `master` or `slave`.
    pub role: Option<String>,
    pub connected_clients: Option<i64>,
    pub tcp_port: Option<u16>,
}

impl ServerInfo {
    pub fn parse(info: &str) -> Result<Self, ParseError> {
        let parsed = parse_info_output(info)?;

        Ok(ServerInfo {
            server_name: parsed.get("server_name").cloned(),
            valkey_version: parsed.get("valkey_version").cloned(),
            redis_version: parsed.get("redis_version").cloned(),
            role: parsed.get("role").cloned(),
            connected_clients: parsed
                .get("connected_clients")
                .and_then(|v| v.trim().parse().ok()),
            tcp_port: parsed.get("tcp_port").and_then(|v| v.trim().parse().ok()),
        })
    }

    pub fn is_valkey(&self) -> bool {
        self.server_name.as_deref() == Some("valkey")
    }

    pub fn is_primary(&self) -> bool {
        self.role.as_deref() == Some("master")
    }
}

/// Parse replication information from INFO REPLICATION output.
#[derive(Debug, Clone, Default)]
pub struct ReplicationInfo {
    /// Role ("master" or "slave")
    pub role: Option<String>,
    /// Master link status ("up" or "down"), replicas only
    pub master_link_status: Option<String>,
    /// Number of attached replicas, primaries only
    pub connected_slaves: Option<i64>,
    /// Master's replication offset
    pub master_repl_offset: Option<i64>,
    /// Replica's replication offset
    pub slave_repl_offset: Option<i64>,
}

impl ReplicationInfo {
    pub fn parse(info: &str) -> Result<Self, ParseError> {
        let parsed = parse_info_output(info)?;
        let int = |key: &str| parsed.get(key).and_then(|v| v.trim().parse().ok());

        Ok(ReplicationInfo {
            role: parsed.get("role").cloned(),
            master_link_status: parsed.get("master_link_status").cloned(),
            connected_slaves: int("connected_slaves"),
            master_repl_offset: int("master_repl_offset"),
            slave_repl_offset: int("slave_repl_offset"),
        })
    }

    /// True once a replica's link to its primary is established.
    pub fn is_link_up(&self) -> bool {
        self.master_link_status.as_deref() == Some("up")
    }

    /// Check if replication is in sync by comparing offsets.
    pub fn is_in_sync(&self) -> Option<bool> {
        match (self.master_repl_offset, self.slave_repl_offset) {
            (Some(master), Some(slave)) => Some(master == slave),
            _ => None,
        }
    }

    /// Replication lag in bytes, if both offsets are known.
    pub fn replication_lag(&self) -> Option<i64> {
        match (self.master_repl_offset, self.slave_repl_offset) {
            (Some(master), Some(slave)) => Some(master - slave),
            _ => None,
        }
    }
}
