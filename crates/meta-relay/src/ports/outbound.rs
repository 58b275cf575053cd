//! # Driven Ports (SPI - Outbound)
//!
//! The execution substrate the relay runs on. An adapter provides:
//! - Contract calls with the relay core as caller of record
//! - The native-currency ledger
//! - Checkpoints so a failed forward leaves no side effects
//!
//! Fungible-asset access is expressed through `call` with ABI call data,
//! so any ledger speaking `transfer`/`balanceOf` works unchanged.
//!
//! Calls are synchronous: a forward runs to completion on one serialized
//! state and never suspends midway.

use crate::domain::abi;
use crate::domain::value_objects::{Address, Bytes, U256};
use crate::errors::{HostError, Revert};

/// Handle returned by [`ExecutionHost::checkpoint`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CheckpointId(pub u64);

// =============================================================================
// EXECUTION HOST
// =============================================================================

/// Interface to the ledger and contracts the relay acts upon.
pub trait ExecutionHost: Send {
    /// Invoke `target` with `input` as `caller`.
    ///
    /// An address with no contract accepts any call and returns no data.
    ///
    /// # Errors
    ///
    /// The callee's revert, with its reason if it supplied one.
    fn call(&mut self, caller: Address, target: Address, input: &[u8]) -> Result<Bytes, Revert>;

    /// Native-currency balance of `owner`.
    fn native_balance(&self, owner: Address) -> U256;

    /// Move native currency. All or nothing.
    ///
    /// # Errors
    ///
    /// A revert without a reason when `from` holds less than `amount`.
    fn transfer_native(&mut self, from: Address, to: Address, amount: U256) -> Result<(), Revert>;

    /// Open a checkpoint. Checkpoints nest.
    fn checkpoint(&mut self) -> CheckpointId;

    /// Undo everything since `id` and close it along with any inner checkpoints.
    ///
    /// # Errors
    ///
    /// `UnknownCheckpoint` if `id` is not open.
    fn revert_to(&mut self, id: CheckpointId) -> Result<(), HostError>;

    /// Keep everything since `id` and close it along with any inner checkpoints.
    ///
    /// # Errors
    ///
    /// `UnknownCheckpoint` if `id` is not open.
    fn commit(&mut self, id: CheckpointId) -> Result<(), HostError>;

    /// `balanceOf(owner)` on the ledger at `asset`.
    ///
    /// # Errors
    ///
    /// The ledger's revert, or a reasonless revert when the return data is
    /// not a single word.
    fn token_balance(&mut self, asset: Address, owner: Address) -> Result<U256, Revert> {
        let output = self.call(owner, asset, abi::encode_balance_of(owner).as_slice())?;
        let word = first_word(&output).ok_or_else(Revert::empty)?;
        Ok(abi::decode_u256(&word))
    }

    /// `transfer(to, amount)` on the ledger at `asset`, called by `from`.
    ///
    /// Returns the ledger's boolean result.
    ///
    /// # Errors
    ///
    /// The ledger's revert (e.g. `"ERC20: transfer amount exceeds balance"`),
    /// or a reasonless revert when nothing decodable was returned.
    fn token_transfer(
        &mut self,
        asset: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<bool, Revert> {
        let output = self.call(from, asset, abi::encode_transfer(to, amount).as_slice())?;
        let word = first_word(&output).ok_or_else(Revert::empty)?;
        Ok(!abi::decode_u256(&word).is_zero())
    }
}

fn first_word(output: &Bytes) -> Option<[u8; abi::WORD]> {
    let slice = output.as_slice().get(..abi::WORD)?;
    let mut word = [0u8; abi::WORD];
    word.copy_from_slice(slice);
    Some(word)
}
