//! # Nonce Registry
//!
//! Replay protection. A `(signer, nonce)` pair is executed at most once;
//! nonces need not be sequential and gaps are allowed.
//!
//! Consumption is two-phase: `check_and_consume` records the key in a
//! [`StagedChanges`] scratch set, and only `commit` writes it to the
//! registry. Dropping the scratch set discards the consumption.

use super::entities::NonceKey;
use super::value_objects::{Address, U256};
use crate::errors::RelayError;
use std::collections::HashSet;

/// Nonces consumed by an in-flight forward, not yet visible to queries.
#[derive(Debug, Default)]
pub struct StagedChanges {
    nonces: HashSet<NonceKey>,
}

impl StagedChanges {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, key: &NonceKey) -> bool {
        self.nonces.contains(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nonces.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nonces.is_empty()
    }
}

/// Committed set of executed `(signer, nonce)` pairs. Entries never leave.
#[derive(Debug, Default)]
pub struct NonceRegistry {
    executed: HashSet<NonceKey>,
}

impl NonceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the pair was consumed by a committed forward.
    #[must_use]
    pub fn is_executed(&self, signer: Address, nonce: U256) -> bool {
        self.executed.contains(&NonceKey::new(signer, nonce))
    }

    /// Stage consumption of `(signer, nonce)`.
    ///
    /// # Errors
    ///
    /// `NonceAlreadyExecuted` if the pair is committed or already staged.
    pub fn check_and_consume(
        &self,
        signer: Address,
        nonce: U256,
        staged: &mut StagedChanges,
    ) -> Result<(), RelayError> {
        let key = NonceKey::new(signer, nonce);
        if self.executed.contains(&key) || !staged.nonces.insert(key) {
            return Err(RelayError::NonceAlreadyExecuted { signer, nonce });
        }
        Ok(())
    }

    /// Make every staged consumption permanent.
    pub fn commit(&mut self, staged: StagedChanges) {
        self.executed.extend(staged.nonces);
    }

    /// Number of committed pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.executed.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.executed.is_empty()
    }
}
