//! # Driving Ports (API - Inbound)
//!
//! The public surface of a relay core: forwarding entry points for
//! relayers, administrative operations for the embedding host, and
//! read-only queries.

use crate::domain::entities::{ForwardBatch, ForwardOutcome, ForwardReceipt, ForwardRequest};
use crate::domain::value_objects::{Address, U256};
use crate::errors::RelayError;
use async_trait::async_trait;

/// Relay core API.
///
/// Implementations serialize every call: no two operations interleave.
#[async_trait]
pub trait MetaRelayApi: Send + Sync {
    /// Verify, authorize, dispatch and settle one request submitted by `relayer`.
    ///
    /// # Errors
    ///
    /// Any rejection; the core's state is then exactly as before the call.
    async fn forward(
        &self,
        relayer: Address,
        request: ForwardRequest,
    ) -> Result<ForwardReceipt, RelayError>;

    /// Forward each element in index order, isolating per-element failures.
    ///
    /// # Errors
    ///
    /// Whole-batch rejections only (`BatchLengthMismatch`, `BatchTooLarge`);
    /// element failures are reported in the returned vector.
    async fn forward_batch(
        &self,
        relayer: Address,
        batch: ForwardBatch,
    ) -> Result<Vec<ForwardOutcome>, RelayError>;

    /// Flip the signer gate; returns the new state.
    async fn toggle_signer_whitelist(&self) -> bool;

    /// Flip the relayer gate; returns the new state.
    async fn toggle_relayer_whitelist(&self) -> bool;

    /// List `address` for both gates; returns false if already listed.
    async fn add_to_whitelist(&self, address: Address) -> bool;

    async fn is_whitelisted(&self, address: Address) -> bool;

    async fn signer_whitelist_enabled(&self) -> bool;

    async fn relayer_whitelist_enabled(&self) -> bool;

    /// Returns true if `(signer, nonce)` was consumed by a settled forward.
    async fn is_nonce_executed(&self, signer: Address, nonce: U256) -> bool;
}
