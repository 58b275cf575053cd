//! # In-Memory ERC20
//!
//! Fungible-asset ledger with the standard ERC20 surface and revert strings.
//! The whole supply is minted to the deployer.

use super::memory_host::{CallContext, Contract, EventLog};
use crate::domain::abi;
use crate::domain::value_objects::{Address, Bytes, U256};
use crate::errors::Revert;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::collections::HashMap;

/// Supply minted at deployment.
pub const DEFAULT_SUPPLY: u64 = 10_000_000_000;

pub const ERR_EXCEEDS_BALANCE: &str = "ERC20: transfer amount exceeds balance";
pub const ERR_INSUFFICIENT_ALLOWANCE: &str = "ERC20: insufficient allowance";
pub const ERR_TRANSFER_TO_ZERO: &str = "ERC20: transfer to the zero address";
pub const ERR_APPROVE_TO_ZERO: &str = "ERC20: approve to the zero address";

/// Log emitted by the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Erc20Event {
    Transfer {
        from: Address,
        to: Address,
        value: U256,
    },
    Approval {
        owner: Address,
        spender: Address,
        value: U256,
    },
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryErc20 {
    total_supply: U256,
    balances: HashMap<Address, U256>,
    allowances: HashMap<(Address, Address), U256>,
    events: EventLog<Erc20Event>,
}

impl InMemoryErc20 {
    /// Deploy with [`DEFAULT_SUPPLY`] minted to `deployer`.
    #[must_use]
    pub fn new(deployer: Address) -> Self {
        Self::with_supply(deployer, U256::from(DEFAULT_SUPPLY))
    }

    #[must_use]
    pub fn with_supply(deployer: Address, supply: U256) -> Self {
        let mut token = Self {
            total_supply: supply,
            ..Self::default()
        };
        token.balances.insert(deployer, supply);
        token.events.push(Erc20Event::Transfer {
            from: Address::ZERO,
            to: deployer,
            value: supply,
        });
        token
    }

    #[must_use]
    pub fn total_supply(&self) -> U256 {
        self.total_supply
    }

    #[must_use]
    pub fn balance_of(&self, owner: Address) -> U256 {
        self.balances.get(&owner).copied().unwrap_or_default()
    }

    #[must_use]
    pub fn allowance(&self, owner: Address, spender: Address) -> U256 {
        self.allowances
            .get(&(owner, spender))
            .copied()
            .unwrap_or_default()
    }

    /// Emitted logs, oldest first.
    #[must_use]
    pub fn events(&self) -> Vec<Erc20Event> {
        self.events.to_vec()
    }

    /// Number of emitted logs.
    #[must_use]
    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// Move `amount` from `from` to `to`.
    ///
    /// # Errors
    ///
    /// Reverts on a zero recipient or when `from` is short.
    pub fn transfer(&mut self, from: Address, to: Address, amount: U256) -> Result<(), Revert> {
        if to.is_zero() {
            return Err(Revert::with_reason(ERR_TRANSFER_TO_ZERO));
        }
        let from_balance = self.balance_of(from);
        if from_balance < amount {
            return Err(Revert::with_reason(ERR_EXCEEDS_BALANCE));
        }

        self.balances.insert(from, from_balance - amount);
        // total supply bounds every balance, so this cannot overflow
        let to_balance = self.balance_of(to).saturating_add(amount);
        self.balances.insert(to, to_balance);

        self.events.push(Erc20Event::Transfer {
            from,
            to,
            value: amount,
        });
        Ok(())
    }

    /// Set `spender`'s allowance over `owner`'s balance.
    ///
    /// # Errors
    ///
    /// Reverts on a zero spender.
    pub fn approve(&mut self, owner: Address, spender: Address, amount: U256) -> Result<(), Revert> {
        if spender.is_zero() {
            return Err(Revert::with_reason(ERR_APPROVE_TO_ZERO));
        }
        self.allowances.insert((owner, spender), amount);
        self.events.push(Erc20Event::Approval {
            owner,
            spender,
            value: amount,
        });
        Ok(())
    }

    /// Spend allowance and move funds on behalf of `from`.
    ///
    /// # Errors
    ///
    /// Reverts when the allowance or the balance is short.
    pub fn transfer_from(
        &mut self,
        spender: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), Revert> {
        let allowance = self.allowance(from, spender);
        if allowance < amount {
            return Err(Revert::with_reason(ERR_INSUFFICIENT_ALLOWANCE));
        }
        self.transfer(from, to, amount)?;
        // unlimited approvals are not decremented
        if allowance != U256::MAX {
            self.allowances.insert((from, spender), allowance - amount);
        }
        Ok(())
    }
}

/// Argument word `i`, or a reasonless revert for short call data.
fn arg(words: &[[u8; abi::WORD]], i: usize) -> Result<&[u8; abi::WORD], Revert> {
    words.get(i).ok_or_else(Revert::empty)
}

fn arg_address(words: &[[u8; abi::WORD]], i: usize) -> Result<Address, Revert> {
    abi::decode_address(arg(words, i)?).ok_or_else(Revert::empty)
}

fn arg_u256(words: &[[u8; abi::WORD]], i: usize) -> Result<U256, Revert> {
    Ok(abi::decode_u256(arg(words, i)?))
}

fn ok_true() -> Bytes {
    Bytes::from_slice(&abi::bool_word(true))
}

fn ok_u256(value: U256) -> Bytes {
    Bytes::from_slice(&abi::u256_word(value))
}

impl Contract for InMemoryErc20 {
    fn call(&mut self, ctx: CallContext, input: &[u8]) -> Result<Bytes, Revert> {
        let (selector, words) = abi::split_call(input).ok_or_else(Revert::empty)?;

        match selector {
            abi::TRANSFER_SELECTOR => {
                self.transfer(ctx.caller, arg_address(&words, 0)?, arg_u256(&words, 1)?)?;
                Ok(ok_true())
            }
            abi::APPROVE_SELECTOR => {
                self.approve(ctx.caller, arg_address(&words, 0)?, arg_u256(&words, 1)?)?;
                Ok(ok_true())
            }
            abi::TRANSFER_FROM_SELECTOR => {
                self.transfer_from(
                    ctx.caller,
                    arg_address(&words, 0)?,
                    arg_address(&words, 1)?,
                    arg_u256(&words, 2)?,
                )?;
                Ok(ok_true())
            }
            abi::BALANCE_OF_SELECTOR => Ok(ok_u256(self.balance_of(arg_address(&words, 0)?))),
            abi::ALLOWANCE_SELECTOR => Ok(ok_u256(
                self.allowance(arg_address(&words, 0)?, arg_address(&words, 1)?),
            )),
            abi::TOTAL_SUPPLY_SELECTOR => Ok(ok_u256(self.total_supply)),
            _ => Err(Revert::empty()),
        }
    }

    fn box_clone(&self) -> Box<dyn Contract> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
