//! # Domain Layer
//!
//! Relay components, leaves first: signature recovery, replay protection,
//! access gating, dispatch and fee settlement. All of it is independent of
//! the execution substrate, which is reached only through `ExecutionHost`.

pub mod abi;
pub mod access;
pub mod dispatch;
pub mod entities;
pub mod fees;
pub mod nonces;
pub mod signature;
pub mod value_objects;

pub use access::AccessGate;
pub use dispatch::ActionDispatcher;
pub use entities::*;
pub use fees::FeeSettlement;
pub use nonces::{NonceRegistry, StagedChanges};
pub use signature::{sign_forward, SignatureVerifier};
pub use value_objects::*;
