//! # Access Gate
//!
//! Optional allow-listing of signers and relayers.
//!
//! One shared list backs both gates; each gate has its own enable flag.
//! Both flags start disabled. Entries are never removed.

use super::value_objects::Address;
use crate::errors::RelayError;
use std::collections::HashSet;

#[derive(Debug, Default, Clone)]
pub struct AccessGate {
    signer_whitelist_enabled: bool,
    relayer_whitelist_enabled: bool,
    whitelist: HashSet<Address>,
}

impl AccessGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gate with preset flags and entries.
    pub fn with_state(
        signer_whitelist_enabled: bool,
        relayer_whitelist_enabled: bool,
        whitelist: impl IntoIterator<Item = Address>,
    ) -> Self {
        Self {
            signer_whitelist_enabled,
            relayer_whitelist_enabled,
            whitelist: whitelist.into_iter().collect(),
        }
    }

    /// Flip signer allow-listing. Returns the new state.
    pub fn toggle_signer_whitelist(&mut self) -> bool {
        self.signer_whitelist_enabled = !self.signer_whitelist_enabled;
        self.signer_whitelist_enabled
    }

    /// Flip relayer allow-listing. Returns the new state.
    pub fn toggle_relayer_whitelist(&mut self) -> bool {
        self.relayer_whitelist_enabled = !self.relayer_whitelist_enabled;
        self.relayer_whitelist_enabled
    }

    /// Add an address. Idempotent; returns false if already listed.
    pub fn add_to_whitelist(&mut self, address: Address) -> bool {
        self.whitelist.insert(address)
    }

    #[must_use]
    pub fn is_whitelisted(&self, address: Address) -> bool {
        self.whitelist.contains(&address)
    }

    #[must_use]
    pub fn signer_whitelist_enabled(&self) -> bool {
        self.signer_whitelist_enabled
    }

    #[must_use]
    pub fn relayer_whitelist_enabled(&self) -> bool {
        self.relayer_whitelist_enabled
    }

    /// Check both gates, signer first.
    ///
    /// # Errors
    ///
    /// `SignerNotAuthorized` or `RelayerNotAuthorized` when the respective
    /// gate is enabled and the address is not listed.
    pub fn authorize(&self, signer: Address, relayer: Address) -> Result<(), RelayError> {
        if self.signer_whitelist_enabled && !self.is_whitelisted(signer) {
            return Err(RelayError::SignerNotAuthorized(signer));
        }
        if self.relayer_whitelist_enabled && !self.is_whitelisted(relayer) {
            return Err(RelayError::RelayerNotAuthorized(relayer));
        }
        Ok(())
    }
}
