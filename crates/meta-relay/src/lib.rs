//! # Meta-Relay - Signature-Authorized Action Forwarding
//!
//! A relay core that executes actions on behalf of a signer who never
//! submits them. A relayer submits the signer's signed request and is paid
//! a fee out of the core's own holdings.
//!
//! ## Request Lifecycle
//!
//! ```text
//! Received → Verified → NonceChecked → Authorized → Dispatched → Settled
//!     └──────────┴───────────┴──────────────┴────────────┴──→ Rejected(kind)
//! ```
//!
//! | Stage | Component | Rejection |
//! |-------|-----------|-----------|
//! | Verified | `SignatureVerifier` | `SIGNATURE_MISMATCH` |
//! | NonceChecked | `NonceRegistry` | `NONCE_ALREADY_EXECUTED` |
//! | Authorized | `AccessGate` | `SIGNER_NOT_AUTHORIZED`, `RELAYER_NOT_AUTHORIZED` |
//! | Dispatched | `ActionDispatcher` | `EXECUTION_REVERTED` |
//! | Settled | `FeeSettlement` | `INSUFFICIENT_FUNDS` |
//!
//! A rejected forward changes nothing: the nonce stays fresh and every
//! host side effect is reverted.
//!
//! ## Signed Message
//!
//! `personal_sign(keccak256(abi.encode(address target, bytes payload)))`.
//! Fee fields and the nonce are not covered by the signature.
//!
//! ## Batches
//!
//! Elements run in index order as independent forwards. A failing element
//! does not undo earlier ones or block later ones. Only a malformed or
//! oversized batch is rejected as a whole.
//!
//! ## Usage Example
//!
//! ```ignore
//! use meta_relay::prelude::*;
//!
//! let service = RelayService::new(RelayConfig::from_env()?, host)?;
//! let receipt = service.forward(relayer, request).await?;
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

// =============================================================================
// MODULES
// =============================================================================

pub mod adapters;
pub mod config;
pub mod domain;
pub mod errors;
pub mod orchestrator;
pub mod ports;
pub mod service;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::domain::entities::{
        ForwardBatch, ForwardOutcome, ForwardReceipt, ForwardRequest, ForwardStage, NonceKey,
    };
    pub use crate::domain::value_objects::{Address, Bytes, EcdsaSignature, FeeAsset, Hash, U256};

    pub use crate::domain::access::AccessGate;
    pub use crate::domain::dispatch::ActionDispatcher;
    pub use crate::domain::fees::FeeSettlement;
    pub use crate::domain::nonces::{NonceRegistry, StagedChanges};
    pub use crate::domain::signature::{
        address_from_key, forward_digest, recover_signer, sign_forward, SignatureVerifier,
    };

    pub use crate::errors::{HostError, RejectKind, RelayError, Revert, SignatureError};

    pub use crate::ports::inbound::MetaRelayApi;
    pub use crate::ports::outbound::{CheckpointId, ExecutionHost};

    pub use crate::adapters::{Contract, Erc20Event, InMemoryErc20, InMemoryHost};

    pub use crate::config::{ConfigError, RelayConfig};
    pub use crate::orchestrator::RelayOrchestrator;
    pub use crate::service::{create_test_service, RelayService, ServiceStats};
}

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
