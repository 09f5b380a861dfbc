//! # Identities
//!
//! An [`Identity`] is the opaque caller reference every operation is
//! invoked with. Externally owned identities are whatever string the
//! surrounding environment authenticated (a wallet address, a key
//! fingerprint). Contract identities are derived deterministically from the
//! deploying identity and a nonce:
//!
//! ```text
//! contract:hex(BLAKE3(creator || nonce_le))[..40]
//! ```
//!
//! The derivation mirrors how a factory deploys each child at a fresh,
//! predictable address.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::CONTRACT_ACCOUNT_PREFIX;

/// Number of hex characters kept from the derivation hash (20 bytes).
const CONTRACT_ADDRESS_HEX_LEN: usize = 40;

/// Errors raised when parsing an identity from user input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentityError {
    /// Identities must contain at least one non-whitespace character.
    #[error("identity must not be empty")]
    Empty,

    /// Identities may not contain whitespace.
    #[error("identity contains whitespace: {0:?}")]
    Whitespace(String),

    /// Contract accounts can only be derived, never claimed.
    #[error("identity {0:?} uses the reserved contract prefix")]
    ReservedPrefix(String),
}

/// An unforgeable caller reference.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    /// Wraps an already-authenticated identifier.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError`] if the identifier is empty, contains
    /// whitespace, or starts with the contract account prefix.
    pub fn new(raw: impl Into<String>) -> Result<Self, IdentityError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(IdentityError::Empty);
        }
        if raw.chars().any(char::is_whitespace) {
            return Err(IdentityError::Whitespace(raw));
        }
        if raw.starts_with(CONTRACT_ACCOUNT_PREFIX) {
            return Err(IdentityError::ReservedPrefix(raw));
        }
        Ok(Self(raw))
    }

    /// Derives the custody account of the `nonce`-th contract deployed by
    /// `creator`.
    pub fn derive_contract(creator: &Identity, nonce: u64) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(creator.as_str().as_bytes());
        hasher.update(&nonce.to_le_bytes());
        let digest = hex::encode(hasher.finalize().as_bytes());
        Self(format!(
            "{}{}",
            CONTRACT_ACCOUNT_PREFIX,
            &digest[..CONTRACT_ADDRESS_HEX_LEN]
        ))
    }

    /// Returns `true` for identities produced by [`derive_contract`](Self::derive_contract).
    pub fn is_contract(&self) -> bool {
        self.0.starts_with(CONTRACT_ACCOUNT_PREFIX)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Identity {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Identity::new(s)
    }
}
