//! Types for node addressing and parsed command replies.

use std::fmt;

use fred::types::Value;

use crate::client::parsing::ParseError;

/// A reachable server instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeAddress {
    pub host: String,
    pub port: u16,
}

impl NodeAddress {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for NodeAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// A replica as listed in the primary's `ROLE` reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplicaEntry {
    pub host: String,
    pub port: u16,
    pub offset: i64,
}

/// Parsed reply of the `ROLE` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleInfo {
    /// `["master", offset, [[host, port, offset], ...]]`
    Master {
        offset: i64,
        replicas: Vec<ReplicaEntry>,
    },
    /// `["slave", host, port, state, offset]`
    Replica {
        primary_host: String,
        primary_port: u16,
        /// Link state: `connect`, `connecting`, `sync` or `connected`.
        state: String,
        offset: i64,
    },
    /// `["sentinel", [names...]]`
    Sentinel { primaries: Vec<String> },
}

impl RoleInfo {
    /// Role name as the server reports it.
    pub fn name(&self) -> &'static str {
        match self {
            RoleInfo::Master { .. } => "master",
            RoleInfo::Replica { .. } => "slave",
            RoleInfo::Sentinel { .. } => "sentinel",
        }
    }

    pub fn is_primary(&self) -> bool {
        matches!(self, RoleInfo::Master { .. })
    }

    /// Parse the array reply of `ROLE`.
    pub fn parse(reply: &[Value]) -> Result<Self, ParseError> {
        let mut items = reply.iter();
        let role = items
            .next()
            .and_then(Value::as_str)
            .ok_or_else(|| ParseError::MissingField("role".to_string()))?;

        match &*role {
            "master" => {
                let offset = next_i64(&mut items, "offset")?;
                let replicas = match items.next() {
                    Some(Value::Array(entries)) => entries
                        .iter()
                        .map(parse_replica_entry)
                        .collect::<Result<Vec<_>, _>>()?,
                    Some(Value::Null) | None => Vec::new(),
                    Some(other) => {
                        return Err(ParseError::Parse(format!(
                            "expected replica list, got {other:?}"
                        )));
                    }
                };
                Ok(RoleInfo::Master { offset, replicas })
            }
            "slave" | "replica" => Ok(RoleInfo::Replica {
                primary_host: next_string(&mut items, "primary_host")?,
                primary_port: next_port(&mut items, "primary_port")?,
                state: next_string(&mut items, "state")?,
                offset: next_i64(&mut items, "offset")?,
            }),
            "sentinel" => {
                let primaries = match items.next() {
                    Some(Value::Array(names)) => names
                        .iter()
                        .filter_map(|v| v.as_str().map(|s| s.to_string()))
                        .collect(),
                    _ => Vec::new(),
                };
                Ok(RoleInfo::Sentinel { primaries })
            }
            other => Err(ParseError::Parse(format!("unknown role: {other}"))),
        }
    }
}

fn parse_replica_entry(entry: &Value) -> Result<ReplicaEntry, ParseError> {
    let Value::Array(fields) = entry else {
        return Err(ParseError::Parse(format!(
            "expected replica entry array, got {entry:?}"
        )));
    };
    let mut fields = fields.iter();
    Ok(ReplicaEntry {
        host: next_string(&mut fields, "replica_host")?,
        port: next_port(&mut fields, "replica_port")?,
        offset: next_i64(&mut fields, "replica_offset")?,
    })
}

fn next_string<'a>(
    items: &mut impl Iterator<Item = &'a Value>,
    field: &str,
) -> Result<String, ParseError> {
    items
        .next()
        .and_then(Value::as_str)
        .map(|s| s.to_string())
        .ok_or_else(|| ParseError::MissingField(field.to_string()))
}

fn next_i64<'a>(items: &mut impl Iterator<Item = &'a Value>, field: &str) -> Result<i64, ParseError> {
    items
        .next()
        .and_then(Value::as_i64)
        .ok_or_else(|| ParseError::MissingField(field.to_string()))
}

fn next_port<'a>(items: &mut impl Iterator<Item = &'a Value>, field: &str) -> Result<u16, ParseError> {
    let raw = next_i64(items, field)?;
    u16::try_from(raw).map_err(|_| ParseError::Parse(format!("{field} out of range: {raw}")))
}
