//! Ledger addresses and address-shaped ephemeral secrets.
//!
//! An [`Address`] is the 20-byte account identifier used by the ledger. The
//! same shape doubles as the [`EphemeralSecret`] that seeds per-message
//! encryption keys: the custody oracle encrypts address-typed values, so the
//! secret must parse, print, and checksum exactly like an account address.

use std::{fmt, str::FromStr};

use sha3::{Digest, Keccak256};
use thiserror::Error;

/// Size of an address in bytes.
pub const ADDRESS_SIZE: usize = 20;

/// Errors from parsing textual addresses.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AddressError {
    /// Input is not `0x` followed by 40 hex characters.
    #[error("invalid address: expected 0x-prefixed 40-character hex string")]
    InvalidFormat,
}

/// A 20-byte ledger account address.
///
/// Parsing accepts any hex casing; display uses checksum casing so the
/// textual form matches what wallets and the ledger produce. Key derivation
/// normalizes to lowercase first, so casing never affects derived keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; ADDRESS_SIZE]);

impl Address {
    /// The all-zero address. The ledger rejects it as a recipient.
    pub const ZERO: Self = Self([0u8; ADDRESS_SIZE]);

    /// Create an address from raw bytes.
    pub const fn from_bytes(bytes: [u8; ADDRESS_SIZE]) -> Self {
        Self(bytes)
    }

    /// Raw bytes of the address.
    pub const fn as_bytes(&self) -> &[u8; ADDRESS_SIZE] {
        &self.0
    }

    /// Whether this is the all-zero address.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; ADDRESS_SIZE]
    }

    /// Lowercase textual form: `0x` followed by 40 lowercase hex characters.
    ///
    /// This is the canonical input to key derivation.
    pub fn to_lowercase_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Checksum-cased textual form (EIP-55).
    ///
    /// Each alphabetic hex digit is uppercased when the corresponding nibble
    /// of `Keccak-256(lowercase_hex_without_prefix)` is 8 or greater.
    pub fn to_checksummed(&self) -> String {
        let lower = hex::encode(self.0);
        let digest = Keccak256::digest(lower.as_bytes());

        let mut out = String::with_capacity(2 + ADDRESS_SIZE * 2);
        out.push_str("0x");
        for (i, ch) in lower.chars().enumerate() {
            let nibble = if i % 2 == 0 {
                digest[i / 2] >> 4
            } else {
                digest[i / 2] & 0x0f
            };
            if ch.is_ascii_alphabetic() && nibble >= 8 {
                out.push(ch.to_ascii_uppercase());
            } else {
                out.push(ch);
            }
        }
        out
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_checksummed())
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex_part = s.strip_prefix("0x").ok_or(AddressError::InvalidFormat)?;
        if hex_part.len() != ADDRESS_SIZE * 2 {
            return Err(AddressError::InvalidFormat);
        }
        let mut bytes = [0u8; ADDRESS_SIZE];
        hex::decode_to_slice(hex_part, &mut bytes).map_err(|_| AddressError::InvalidFormat)?;
        Ok(Self(bytes))
    }
}

/// A single-use, address-shaped secret seeding one message key.
///
/// Generated fresh per message from cryptographically secure entropy,
/// consumed by the envelope codec and the custody-encryption adapter, then
/// discarded by the sender. The recipient recovers the same value through
/// the custody oracle.
///
/// Note: the secret is deliberately printable (it is shown to the sender as
/// a receipt and returned by the oracle in cleartext form), so it is not
/// zeroized on drop; the derived AES key is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EphemeralSecret(Address);

impl EphemeralSecret {
    /// Build a secret from 20 bytes of caller-provided entropy.
    ///
    /// The caller MUST supply cryptographically secure random bytes in
    /// production. Taking entropy as an argument keeps this function pure
    /// and testable.
    pub const fn from_entropy(entropy: [u8; ADDRESS_SIZE]) -> Self {
        Self(Address::from_bytes(entropy))
    }

    /// View the secret as its address shape.
    pub const fn address(&self) -> &Address {
        &self.0
    }

    /// Lowercase textual form used as key-derivation input.
    pub fn to_lowercase_hex(&self) -> String {
        self.0.to_lowercase_hex()
    }
}

impl fmt::Display for EphemeralSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for EphemeralSecret {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Address::from_str(s)?))
    }
}

impl From<Address> for EphemeralSecret {
    fn from(address: Address) -> Self {
        Self(address)
    }
}
