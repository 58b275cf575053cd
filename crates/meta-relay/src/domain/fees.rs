//! # Fee Settlement
//!
//! Pays the relayer out of the core's own holdings.
//!
//! The two fee paths fail differently: the native path reverts with no
//! reason, the token path surfaces the ledger's reason string verbatim.

use super::value_objects::{Address, FeeAsset, U256};
use crate::errors::RelayError;
use crate::ports::outbound::ExecutionHost;
use tracing::debug;

/// Moves fees from `core` to the payee.
#[derive(Debug, Clone, Copy)]
pub struct FeeSettlement {
    core: Address,
}

impl FeeSettlement {
    pub fn new(core: Address) -> Self {
        Self { core }
    }

    /// Transfer `amount` of `asset` from the core to `payee`.
    ///
    /// A zero amount is a no-op. No partial transfer ever happens.
    ///
    /// # Errors
    ///
    /// `InsufficientFunds` carrying the ledger's reason, if any.
    pub fn settle<H: ExecutionHost + ?Sized>(
        &self,
        host: &mut H,
        asset: FeeAsset,
        amount: U256,
        payee: Address,
    ) -> Result<(), RelayError> {
        if amount.is_zero() {
            debug!(%asset, "zero fee, nothing to settle");
            return Ok(());
        }

        let insufficient = |reason: Option<String>| RelayError::InsufficientFunds {
            asset,
            required: amount,
            reason,
        };

        match asset {
            FeeAsset::Native => host
                .transfer_native(self.core, payee, amount)
                .map_err(|revert| insufficient(revert.reason)),
            FeeAsset::Token(ledger) => {
                match host.token_transfer(ledger, self.core, payee, amount) {
                    Ok(true) => Ok(()),
                    Ok(false) => Err(insufficient(None)),
                    Err(revert) => Err(insufficient(revert.reason)),
                }
            }
        }
    }
}
