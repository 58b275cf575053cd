//! # Error Types
//!
//! All error types for request relaying.

use crate::domain::abi;
use crate::domain::entities::ForwardStage;
use crate::domain::value_objects::{Address, Bytes, FeeAsset, U256};
use thiserror::Error;

// =============================================================================
// RELAY ERRORS
// =============================================================================

/// Terminal rejection of a forward request.
///
/// None of these are retried internally. A rejected request leaves no
/// observable state behind: no consumed nonce, no balance change.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RelayError {
    /// Recovered identity differs from the claimed signer, or the signature
    /// could not be recovered at all (`recovered` is `None`).
    #[error("signature mismatch: claimed {claimed:?}, recovered {recovered:?}")]
    SignatureMismatch {
        claimed: Address,
        recovered: Option<Address>,
    },

    /// The (signer, nonce) pair was already executed.
    #[error("NONCE_ALREADY_EXECUTED")]
    NonceAlreadyExecuted { signer: Address, nonce: U256 },

    /// Signer whitelist is enabled and the signer is not listed.
    #[error("SIGNER_NOT_AUTHORIZED")]
    SignerNotAuthorized(Address),

    /// Relayer whitelist is enabled and the relayer is not listed.
    #[error("RELAYER_NOT_AUTHORIZED")]
    RelayerNotAuthorized(Address),

    /// The target call failed. `reason` is whatever the callee supplied.
    #[error("execution reverted: {}", .reason.as_deref().unwrap_or(""))]
    ExecutionReverted {
        target: Address,
        reason: Option<String>,
    },

    /// The core could not pay the relayer fee.
    ///
    /// Native path: no reason. Token path: the ledger's own revert reason.
    #[error(
        "insufficient funds for {asset} fee of {required}: {}",
        .reason.as_deref().unwrap_or("")
    )]
    InsufficientFunds {
        asset: FeeAsset,
        required: U256,
        reason: Option<String>,
    },

    /// Parallel batch arrays differ in length.
    #[error("batch length mismatch: {field} has {actual} entries, expected {expected}")]
    BatchLengthMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Batch exceeds the configured maximum.
    #[error("batch too large: {size} > {max}")]
    BatchTooLarge { size: usize, max: usize },

    /// The execution host misbehaved (e.g. unknown checkpoint).
    #[error("host failure: {0}")]
    Host(#[from] HostError),
}

impl RelayError {
    /// Stable classification of this rejection.
    #[must_use]
    pub fn kind(&self) -> RejectKind {
        match self {
            Self::SignatureMismatch { .. } => RejectKind::SignatureMismatch,
            Self::NonceAlreadyExecuted { .. } => RejectKind::NonceAlreadyExecuted,
            Self::SignerNotAuthorized(_) => RejectKind::SignerNotAuthorized,
            Self::RelayerNotAuthorized(_) => RejectKind::RelayerNotAuthorized,
            Self::ExecutionReverted { .. } => RejectKind::ExecutionReverted,
            Self::InsufficientFunds { .. } => RejectKind::InsufficientFunds,
            Self::BatchLengthMismatch { .. } => RejectKind::BatchLengthMismatch,
            Self::BatchTooLarge { .. } => RejectKind::BatchTooLarge,
            Self::Host(_) => RejectKind::HostFailure,
        }
    }

    /// Reason string surfaced to the caller.
    ///
    /// Fixed strings for replay and access rejections; the callee or ledger
    /// reason (possibly empty) for execution and fee failures.
    #[must_use]
    pub fn reason(&self) -> &str {
        match self {
            Self::NonceAlreadyExecuted { .. } => RejectKind::NonceAlreadyExecuted.as_str(),
            Self::SignerNotAuthorized(_) => RejectKind::SignerNotAuthorized.as_str(),
            Self::RelayerNotAuthorized(_) => RejectKind::RelayerNotAuthorized.as_str(),
            Self::ExecutionReverted { reason, .. } | Self::InsufficientFunds { reason, .. } => {
                reason.as_deref().unwrap_or("")
            }
            Self::SignatureMismatch { .. } => "",
            Self::BatchLengthMismatch { .. } => RejectKind::BatchLengthMismatch.as_str(),
            Self::BatchTooLarge { .. } => RejectKind::BatchTooLarge.as_str(),
            Self::Host(_) => RejectKind::HostFailure.as_str(),
        }
    }

    /// The stage the request failed to reach.
    #[must_use]
    pub fn failed_stage(&self) -> ForwardStage {
        match self {
            Self::SignatureMismatch { .. }
            | Self::BatchLengthMismatch { .. }
            | Self::BatchTooLarge { .. } => ForwardStage::Verified,
            Self::NonceAlreadyExecuted { .. } => ForwardStage::NonceChecked,
            Self::SignerNotAuthorized(_) | Self::RelayerNotAuthorized(_) => {
                ForwardStage::Authorized
            }
            Self::ExecutionReverted { .. } | Self::Host(_) => ForwardStage::Dispatched,
            Self::InsufficientFunds { .. } => ForwardStage::Settled,
        }
    }
}

/// Machine-readable rejection kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectKind {
    SignatureMismatch,
    NonceAlreadyExecuted,
    SignerNotAuthorized,
    RelayerNotAuthorized,
    ExecutionReverted,
    InsufficientFunds,
    BatchLengthMismatch,
    BatchTooLarge,
    HostFailure,
}

impl RejectKind {
    /// Upper snake case name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SignatureMismatch => "SIGNATURE_MISMATCH",
            Self::NonceAlreadyExecuted => "NONCE_ALREADY_EXECUTED",
            Self::SignerNotAuthorized => "SIGNER_NOT_AUTHORIZED",
            Self::RelayerNotAuthorized => "RELAYER_NOT_AUTHORIZED",
            Self::ExecutionReverted => "EXECUTION_REVERTED",
            Self::InsufficientFunds => "INSUFFICIENT_FUNDS",
            Self::BatchLengthMismatch => "BATCH_LENGTH_MISMATCH",
            Self::BatchTooLarge => "BATCH_TOO_LARGE",
            Self::HostFailure => "HOST_FAILURE",
        }
    }
}

impl std::fmt::Display for RejectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// SIGNATURE ERRORS
// =============================================================================

/// Why a signature yielded no identity.
///
/// Internal detail: callers only ever see `SignatureMismatch` with the
/// recovered identity absent.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SignatureError {
    #[error("signature must be 65 bytes, got {0}")]
    InvalidLength(usize),

    #[error("r or s outside [1, n-1]")]
    InvalidScalar,

    #[error("s in upper half of curve order")]
    MalleableSignature,

    #[error("invalid recovery id: {0}")]
    InvalidRecoveryId(u8),

    #[error("public key recovery failed")]
    RecoveryFailed,
}

// =============================================================================
// HOST ERRORS
// =============================================================================

/// A call or transfer on the execution host failed.
///
/// Mirrors an EVM revert: an optional reason string, absent when the
/// callee reverts without one.
#[derive(Debug, Error, Clone, Default, PartialEq, Eq)]
#[error("reverted: {}", .reason.as_deref().unwrap_or(""))]
pub struct Revert {
    /// Reason string, if the callee supplied one.
    pub reason: Option<String>,
}

impl Revert {
    /// Revert without a reason.
    #[must_use]
    pub const fn empty() -> Self {
        Self { reason: None }
    }

    /// Revert with a reason string.
    #[must_use]
    pub fn with_reason(reason: impl Into<String>) -> Self {
        Self {
            reason: Some(reason.into()),
        }
    }

    /// Parse raw revert data. Anything but an `Error(string)` payload
    /// yields a reasonless revert.
    #[must_use]
    pub fn from_data(data: &[u8]) -> Self {
        Self {
            reason: abi::decode_revert_reason(data),
        }
    }

    /// Raw revert data: an `Error(string)` payload, or empty without a reason.
    #[must_use]
    pub fn to_data(&self) -> Bytes {
        self.reason
            .as_deref()
            .map(abi::encode_revert_reason)
            .unwrap_or_default()
    }
}

/// Host-level failures unrelated to the request itself.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HostError {
    /// A checkpoint id was reverted or committed out of order.
    #[error("unknown checkpoint: {0}")]
    UnknownCheckpoint(u64),
}

// =============================================================================
// TESTS
// =============================================================================
