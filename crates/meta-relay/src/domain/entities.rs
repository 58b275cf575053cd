//! # Domain Entities
//!
//! Requests, receipts and the per-request state machine.

use super::value_objects::{Address, Bytes, FeeAsset, U256};
use crate::errors::RelayError;
use serde::{Deserialize, Serialize};

// =============================================================================
// FORWARD REQUEST
// =============================================================================

/// A signer-authorized action submitted by a relayer.
///
/// Immutable once built; lives for the duration of one relay call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForwardRequest {
    /// Contract the payload is dispatched to.
    pub target: Address,
    /// Call data handed to the target verbatim.
    pub payload: Bytes,
    /// 65-byte `r || s || v` signature over `(target, payload)`.
    pub signature: Bytes,
    /// Currency the relayer fee is paid in.
    pub fee_asset: FeeAsset,
    /// Fee credited to the relayer on success. Zero is a valid no-op fee.
    pub fee_amount: U256,
    /// One-time identifier scoped to `signer`.
    pub nonce: U256,
    /// Identity the relayer claims produced `signature`.
    pub signer: Address,
}

impl ForwardRequest {
    /// Build a request from its seven wire fields.
    ///
    /// `fee_asset` is the raw address form: the zero address selects the
    /// native currency.
    #[must_use]
    pub fn new(
        target: Address,
        payload: impl Into<Bytes>,
        signature: impl Into<Bytes>,
        fee_asset: Address,
        fee_amount: U256,
        nonce: U256,
        signer: Address,
    ) -> Self {
        Self {
            target,
            payload: payload.into(),
            signature: signature.into(),
            fee_asset: FeeAsset::from_address(fee_asset),
            fee_amount,
            nonce,
            signer,
        }
    }

    /// Replay-protection key of this request.
    #[must_use]
    pub fn nonce_key(&self) -> NonceKey {
        NonceKey::new(self.signer, self.nonce)
    }
}

// =============================================================================
// FORWARD BATCH
// =============================================================================

/// Parallel-array form of a batched forward.
///
/// All arrays must have the same length; element `i` of each array forms
/// request `i`. The fee asset is shared by the whole batch.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForwardBatch {
    pub targets: Vec<Address>,
    pub payloads: Vec<Bytes>,
    pub signatures: Vec<Bytes>,
    pub fee_asset: Address,
    pub fee_amounts: Vec<U256>,
    pub nonces: Vec<U256>,
    pub signers: Vec<Address>,
}

impl ForwardBatch {
    /// Number of elements (length of `targets`).
    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Returns true if the batch carries no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Zip the parallel arrays into ordered requests.
    ///
    /// # Errors
    ///
    /// `BatchLengthMismatch` naming the first array whose length differs
    /// from `targets`.
    pub fn into_requests(self) -> Result<Vec<ForwardRequest>, RelayError> {
        let expected = self.targets.len();
        let lengths = [
            ("payloads", self.payloads.len()),
            ("signatures", self.signatures.len()),
            ("fee_amounts", self.fee_amounts.len()),
            ("nonces", self.nonces.len()),
            ("signers", self.signers.len()),
        ];
        if let Some((field, actual)) = lengths.into_iter().find(|(_, len)| *len != expected) {
            return Err(RelayError::BatchLengthMismatch {
                field,
                expected,
                actual,
            });
        }

        let fee_asset = self.fee_asset;
        let requests = self
            .targets
            .into_iter()
            .zip(self.payloads)
            .zip(self.signatures)
            .zip(self.fee_amounts)
            .zip(self.nonces)
            .zip(self.signers)
            .map(
                |(((((target, payload), signature), fee_amount), nonce), signer)| {
                    ForwardRequest::new(
                        target, payload, signature, fee_asset, fee_amount, nonce, signer,
                    )
                },
            )
            .collect();

        Ok(requests)
    }
}

// =============================================================================
// NONCE KEY
// =============================================================================

/// `(signer, nonce)` replay-protection key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NonceKey {
    pub signer: Address,
    pub nonce: U256,
}

impl NonceKey {
    #[must_use]
    pub const fn new(signer: Address, nonce: U256) -> Self {
        Self { signer, nonce }
    }
}

// =============================================================================
// STATE MACHINE
// =============================================================================

/// Stages of a single forward.
///
/// ```text
/// Received → Verified → NonceChecked → Authorized → Dispatched → Settled
///     └──────────┴───────────┴──────────────┴────────────┴──→ Rejected(reason)
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ForwardStage {
    Received,
    Verified,
    NonceChecked,
    Authorized,
    Dispatched,
    Settled,
}

impl ForwardStage {
    /// Next stage on success. `Settled` is terminal.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Received => Some(Self::Verified),
            Self::Verified => Some(Self::NonceChecked),
            Self::NonceChecked => Some(Self::Authorized),
            Self::Authorized => Some(Self::Dispatched),
            Self::Dispatched => Some(Self::Settled),
            Self::Settled => None,
        }
    }

    /// Returns true for the terminal success stage.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Settled)
    }
}

// =============================================================================
// RECEIPT
// =============================================================================

/// Record of a settled forward.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForwardReceipt {
    pub signer: Address,
    pub relayer: Address,
    pub target: Address,
    pub nonce: U256,
    pub fee_asset: FeeAsset,
    pub fee_amount: U256,
    /// Data returned by the target call.
    pub return_data: Bytes,
}

/// Per-element outcome of a batched forward.
pub type ForwardOutcome = Result<ForwardReceipt, RelayError>;

// =============================================================================
// TESTS
// =============================================================================
