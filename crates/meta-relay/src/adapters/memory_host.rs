//! # In-Memory Host
//!
//! Single-process execution host for tests and embedding.
//! Production deployments implement `ExecutionHost` over a real ledger.

use crate::domain::value_objects::{Address, Bytes, U256};
use crate::errors::{HostError, Revert};
use crate::ports::outbound::{CheckpointId, ExecutionHost};
use parking_lot::Mutex;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

// =============================================================================
// CONTRACTS
// =============================================================================

/// Who is calling which contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallContext {
    pub caller: Address,
    pub this: Address,
}

/// A contract deployed on an [`InMemoryHost`].
///
/// A contract owns its state; the host snapshots it for checkpoints and
/// restores it when a call reverts.
pub trait Contract: Send + fmt::Debug {
    /// Handle a call.
    ///
    /// # Errors
    ///
    /// A revert; the host discards the contract's changes.
    fn call(&mut self, ctx: CallContext, input: &[u8]) -> Result<Bytes, Revert>;

    fn box_clone(&self) -> Box<dyn Contract>;

    fn as_any(&self) -> &dyn Any;
}

impl Clone for Box<dyn Contract> {
    fn clone(&self) -> Self {
        self.box_clone()
    }
}

// =============================================================================
// EVENT LOG
// =============================================================================

/// Append-only contract log whose clones share storage.
///
/// A clone differs from its source only in how many entries it sees, so
/// snapshotting a contract costs the same however long its history is.
/// Appending through a rewound clone first drops the entries it no
/// longer sees.
#[derive(Debug)]
pub struct EventLog<T> {
    entries: Arc<Mutex<Vec<T>>>,
    len: usize,
}

impl<T> Default for EventLog<T> {
    fn default() -> Self {
        Self {
            entries: Arc::new(Mutex::new(Vec::new())),
            len: 0,
        }
    }
}

impl<T> Clone for EventLog<T> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
            len: self.len,
        }
    }
}

impl<T: Clone> EventLog<T> {
    pub fn push(&mut self, entry: T) {
        let mut entries = self.entries.lock();
        entries.truncate(self.len);
        entries.push(entry);
        self.len += 1;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Visible entries, oldest first.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        let entries = self.entries.lock();
        entries.get(..self.len).map(<[T]>::to_vec).unwrap_or_default()
    }
}

// =============================================================================
// HOST
// =============================================================================

#[derive(Debug, Clone, Default)]
struct HostState {
    native: HashMap<Address, U256>,
    contracts: HashMap<Address, Box<dyn Contract>>,
}

/// In-memory ledger with snapshot checkpoints.
#[derive(Debug, Default)]
pub struct InMemoryHost {
    state: HostState,
    /// Open checkpoints, innermost last.
    checkpoints: Vec<(CheckpointId, HostState)>,
    next_checkpoint: u64,
}

impl InMemoryHost {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `contract` at `address`, replacing whatever was there.
    pub fn deploy(&mut self, address: Address, contract: impl Contract + 'static) {
        self.state.contracts.insert(address, Box::new(contract));
    }

    /// Returns true if a contract lives at `address`.
    #[must_use]
    pub fn has_contract(&self, address: Address) -> bool {
        self.state.contracts.contains_key(&address)
    }

    /// Typed view of the contract at `address`.
    #[must_use]
    pub fn contract<T: Contract + 'static>(&self, address: Address) -> Option<&T> {
        self.state
            .contracts
            .get(&address)
            .and_then(|c| c.as_any().downcast_ref::<T>())
    }

    /// Set a native balance directly (external funding).
    pub fn set_native_balance(&mut self, owner: Address, amount: U256) {
        self.state.native.insert(owner, amount);
    }

    /// Plain native-currency payment between any two accounts.
    ///
    /// # Errors
    ///
    /// A reasonless revert when `from` is short.
    pub fn send_native(&mut self, from: Address, to: Address, amount: U256) -> Result<(), Revert> {
        self.transfer_native(from, to, amount)
    }

    /// Number of open checkpoints.
    #[must_use]
    pub fn checkpoint_depth(&self) -> usize {
        self.checkpoints.len()
    }

    fn checkpoint_index(&self, id: CheckpointId) -> Result<usize, HostError> {
        self.checkpoints
            .iter()
            .position(|(open, _)| *open == id)
            .ok_or(HostError::UnknownCheckpoint(id.0))
    }
}

impl ExecutionHost for InMemoryHost {
    fn call(&mut self, caller: Address, target: Address, input: &[u8]) -> Result<Bytes, Revert> {
        let Some(contract) = self.state.contracts.get_mut(&target) else {
            return Ok(Bytes::new());
        };

        let before = contract.box_clone();
        let ctx = CallContext {
            caller,
            this: target,
        };
        let result = contract.call(ctx, input);
        if result.is_err() {
            *contract = before;
        }
        result
    }

    fn native_balance(&self, owner: Address) -> U256 {
        self.state.native.get(&owner).copied().unwrap_or_default()
    }

    fn transfer_native(&mut self, from: Address, to: Address, amount: U256) -> Result<(), Revert> {
        let from_balance = self.native_balance(from);
        if from_balance < amount {
            return Err(Revert::empty());
        }
        if from == to {
            return Ok(());
        }

        let to_balance = self.native_balance(to);
        let credited = to_balance.checked_add(amount).ok_or_else(Revert::empty)?;
        self.state.native.insert(from, from_balance - amount);
        self.state.native.insert(to, credited);
        Ok(())
    }

    fn checkpoint(&mut self) -> CheckpointId {
        let id = CheckpointId(self.next_checkpoint);
        self.next_checkpoint += 1;
        self.checkpoints.push((id, self.state.clone()));
        id
    }

    fn revert_to(&mut self, id: CheckpointId) -> Result<(), HostError> {
        let index = self.checkpoint_index(id)?;
        if let Some((_, snapshot)) = self.checkpoints.split_off(index).into_iter().next() {
            self.state = snapshot;
        }
        Ok(())
    }

    fn commit(&mut self, id: CheckpointId) -> Result<(), HostError> {
        let index = self.checkpoint_index(id)?;
        self.checkpoints.truncate(index);
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
