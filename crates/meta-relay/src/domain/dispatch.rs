//! # Action Dispatcher
//!
//! Invokes the target with the verified payload. The core is the caller of
//! record; the target never sees the signer.

use super::value_objects::{Address, Bytes};
use crate::errors::RelayError;
use crate::ports::outbound::ExecutionHost;

#[derive(Debug, Clone, Copy)]
pub struct ActionDispatcher {
    core: Address,
}

impl ActionDispatcher {
    pub fn new(core: Address) -> Self {
        Self { core }
    }

    /// Call `target` with `payload` and return its output.
    ///
    /// # Errors
    ///
    /// `ExecutionReverted` with the callee's reason, or none if it gave none.
    pub fn dispatch<H: ExecutionHost + ?Sized>(
        &self,
        host: &mut H,
        target: Address,
        payload: &[u8],
    ) -> Result<Bytes, RelayError> {
        host.call(self.core, target, payload)
            .map_err(|revert| RelayError::ExecutionReverted {
                target,
                reason: revert.reason,
            })
    }
}
