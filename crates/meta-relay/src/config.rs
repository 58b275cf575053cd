//! Relay configuration from environment variables.

use crate::domain::value_objects::Address;
use std::env;
use thiserror::Error;

/// Default cap on elements per batch.
pub const DEFAULT_MAX_BATCH_SIZE: usize = 64;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var}: invalid address {value:?}")]
    InvalidAddress { var: &'static str, value: String },

    #[error("{var}: invalid number {value:?}")]
    InvalidNumber { var: &'static str, value: String },

    #[error("core address must not be zero")]
    ZeroCoreAddress,

    #[error("max batch size must be at least 1")]
    ZeroBatchSize,
}

/// Configuration of one relay core instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    /// Address of the core: caller of record for dispatch and source of fees.
    pub core_address: Address,

    /// Largest batch accepted by `forward_batch`.
    pub max_batch_size: usize,

    /// Initial state of the signer gate.
    pub signer_whitelist_enabled: bool,

    /// Initial state of the relayer gate.
    pub relayer_whitelist_enabled: bool,

    /// Addresses listed at startup.
    pub initial_whitelist: Vec<Address>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            core_address: Address::ZERO,
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
            signer_whitelist_enabled: false,
            relayer_whitelist_enabled: false,
            initial_whitelist: Vec::new(),
        }
    }
}

impl RelayConfig {
    /// Default configuration for a core at `core_address`.
    pub fn for_core(core_address: Address) -> Self {
        Self {
            core_address,
            ..Self::default()
        }
    }

    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `RELAY_CORE_ADDRESS`: hex address of the core (default: zero, rejected by `validate`)
    /// - `RELAY_MAX_BATCH_SIZE`: batch cap (default: 64)
    /// - `RELAY_SIGNER_WHITELIST`: enable the signer gate (default: false)
    /// - `RELAY_RELAYER_WHITELIST`: enable the relayer gate (default: false)
    /// - `RELAY_WHITELIST`: comma-separated hex addresses listed at startup
    ///
    /// # Errors
    ///
    /// A malformed address or number.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`RelayConfig::from_env`] over an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// A malformed address or number.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let core_address = match lookup("RELAY_CORE_ADDRESS") {
            Some(value) => parse_address("RELAY_CORE_ADDRESS", &value)?,
            None => defaults.core_address,
        };

        let max_batch_size = match lookup("RELAY_MAX_BATCH_SIZE") {
            Some(value) => value
                .trim()
                .parse::<usize>()
                .map_err(|_| ConfigError::InvalidNumber {
                    var: "RELAY_MAX_BATCH_SIZE",
                    value,
                })?,
            None => defaults.max_batch_size,
        };

        let flag = |key: &str| {
            lookup(key)
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(false)
        };

        let initial_whitelist = match lookup("RELAY_WHITELIST") {
            Some(list) => list
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| parse_address("RELAY_WHITELIST", s))
                .collect::<Result<Vec<_>, _>>()?,
            None => Vec::new(),
        };

        Ok(Self {
            core_address,
            max_batch_size,
            signer_whitelist_enabled: flag("RELAY_SIGNER_WHITELIST"),
            relayer_whitelist_enabled: flag("RELAY_RELAYER_WHITELIST"),
            initial_whitelist,
        })
    }

    /// Reject configurations the orchestrator cannot run with.
    ///
    /// # Errors
    ///
    /// `ZeroCoreAddress` or `ZeroBatchSize`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.core_address.is_zero() {
            return Err(ConfigError::ZeroCoreAddress);
        }
        if self.max_batch_size == 0 {
            return Err(ConfigError::ZeroBatchSize);
        }
        Ok(())
    }
}

fn parse_address(var: &'static str, value: &str) -> Result<Address, ConfigError> {
    Address::from_hex(value).ok_or_else(|| ConfigError::InvalidAddress {
        var,
        value: value.to_string(),
    })
}
