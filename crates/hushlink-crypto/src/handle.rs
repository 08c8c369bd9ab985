//! Encrypted key handles: opaque 32-byte references to custody-wrapped
//! secrets, as stored in the ledger's `bytes32` field.

use std::{fmt, str::FromStr};

use thiserror::Error;

/// Size of a handle in bytes.
pub const HANDLE_SIZE: usize = 32;

/// Errors from parsing textual handles.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HandleError {
    /// Input is not `0x` followed by 64 hex characters.
    #[error("invalid encrypted key handle: expected 0x-prefixed 64-character hex string")]
    InvalidFormat,
}

/// An opaque reference to a custody-wrapped ephemeral secret.
///
/// Produced by the custody oracle together with its validity proof; the two
/// are meaningless individually. The handle itself reveals nothing about the
/// wrapped secret. Shape is validated locally before any network call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle([u8; HANDLE_SIZE]);

impl Handle {
    /// Create a handle from raw bytes.
    pub const fn from_bytes(bytes: [u8; HANDLE_SIZE]) -> Self {
        Self(bytes)
    }

    /// Raw bytes of the handle.
    pub const fn as_bytes(&self) -> &[u8; HANDLE_SIZE] {
        &self.0
    }

    /// Lowercase `0x`-prefixed hex form, as the oracle's response map keys
    /// handles.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Handle {
    type Err = HandleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex_part = s.strip_prefix("0x").ok_or(HandleError::InvalidFormat)?;
        if hex_part.len() != HANDLE_SIZE * 2 {
            return Err(HandleError::InvalidFormat);
        }
        let mut bytes = [0u8; HANDLE_SIZE];
        hex::decode_to_slice(hex_part, &mut bytes).map_err(|_| HandleError::InvalidFormat)?;
        Ok(Self(bytes))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn hex_roundtrip() {
        let handle = Handle::from_bytes([0xcd; HANDLE_SIZE]);
        let reparsed: Handle = handle.to_hex().parse().unwrap();
        assert_eq!(handle, reparsed);
    }

    #[test]
    fn parse_accepts_mixed_case() {
        let h: Handle =
            "0xAbCdEf0123456789abcdef0123456789ABCDEF0123456789abcdef0123456789".parse().unwrap();
        assert_eq!(
            h.to_hex(),
            "0xabcdef0123456789abcdef0123456789abcdef0123456789abcdef0123456789"
        );
    }

    #[test]
    fn parse_rejects_bad_shapes() {
        // Missing prefix, too short, too long, non-hex
        assert!("abcdef0123456789abcdef0123456789abcdef0123456789abcdef0123456789"
            .parse::<Handle>()
            .is_err());
        assert!("0xabcd".parse::<Handle>().is_err());
        assert!(format!("0x{}ff", "ab".repeat(HANDLE_SIZE)).parse::<Handle>().is_err());
        assert!(format!("0x{}", "zz".repeat(HANDLE_SIZE)).parse::<Handle>().is_err());
    }
}
