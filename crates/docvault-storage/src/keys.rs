//! Key encoding and decoding for storage layer.
//!
//! Record keys: `{kind}:{id}` (e.g. `doc:01HV...`).
//! Pointer keys: `{kind}:{segment}:...:{target}` with an empty value, used
//! as secondary indexes scanned by prefix (e.g. `owner:alice:01HV...`).
//!
//! Segments never contain `:`; writes reject such ids so a prefix scan for
//! one owner can never run into another owner's pointers.

use crate::error::StorageError;

/// Record key kinds
pub const DOC: &str = "doc";
pub const TAG: &str = "tag";
pub const SHARE: &str = "share";
pub const FILE: &str = "file";

/// Pointer key kinds
pub const OWNER: &str = "owner";
pub const GRANTEE: &str = "grantee";

/// Reject ids that would break key framing.
pub fn validate_segment(segment: &str) -> Result<(), StorageError> {
    if segment.is_empty() {
        return Err(StorageError::Key("empty key segment".to_string()));
    }
    if segment.contains(':') {
        return Err(StorageError::Key(format!(
            "key segment must not contain ':': {}",
            segment
        )));
    }
    Ok(())
}

/// Key for a primary record: `{kind}:{id}`
pub fn record_key(kind: &str, id: &str) -> Vec<u8> {
    format!("{}:{}", kind, id).into_bytes()
}

/// Key for a pointer: `{kind}:{seg1}:{seg2}...`
pub fn pointer_key(kind: &str, segments: &[&str]) -> Vec<u8> {
    let mut key = kind.to_string();
    for segment in segments {
        key.push(':');
        key.push_str(segment);
    }
    key.into_bytes()
}

/// Scan prefix for pointers: `{kind}:{seg1}:...:` (trailing separator)
pub fn pointer_prefix(kind: &str, segments: &[&str]) -> Vec<u8> {
    let mut prefix = pointer_key(kind, segments);
    prefix.push(b':');
    prefix
}

/// Decode the segments following `prefix` in a pointer key.
pub fn pointer_tail(key: &[u8], prefix: &[u8]) -> Result<Vec<String>, StorageError> {
    let rest = key
        .strip_prefix(prefix)
        .ok_or_else(|| StorageError::Key("pointer key does not match prefix".to_string()))?;
    let rest = std::str::from_utf8(rest)
        .map_err(|e| StorageError::Key(format!("Invalid UTF-8: {}", e)))?;
    Ok(rest.split(':').map(str::to_string).collect())
}

/// Key for outbox entries (index updates)
/// Format: outbox:{sequence:020}
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboxKey {
    /// Monotonic sequence number
    pub sequence: u64,
}

impl OutboxKey {
    /// Create a new outbox key with given sequence
    pub fn new(sequence: u64) -> Self {
        Self { sequence }
    }

    /// Encode key to bytes; zero padding keeps lexicographic == numeric order
    pub fn to_bytes(&self) -> Vec<u8> {
        format!("outbox:{:020}", self.sequence).into_bytes()
    }

    /// Decode key from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StorageError> {
        let s = std::str::from_utf8(bytes)
            .map_err(|e| StorageError::Key(format!("Invalid UTF-8: {}", e)))?;

        let (prefix, sequence) = s
            .split_once(':')
            .ok_or_else(|| StorageError::Key(format!("Invalid outbox key format: {}", s)))?;
        if prefix != "outbox" {
            return Err(StorageError::Key(format!("Invalid outbox key format: {}", s)));
        }

        let sequence: u64 = sequence
            .parse()
            .map_err(|e| StorageError::Key(format!("Invalid sequence: {}", e)))?;

        Ok(Self { sequence })
    }
}

/// Key for checkpoint entries
/// Format: checkpoint:{name}
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckpointKey {
    pub name: String,
}

impl CheckpointKey {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        format!("checkpoint:{}", self.name).into_bytes()
    }
}
