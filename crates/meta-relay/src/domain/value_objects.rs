//! # Value Objects
//!
//! Immutable primitives shared by every relay component.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Amounts and nonces.
pub use primitive_types::U256;

// =============================================================================
// FIXED-SIZE NEWTYPES
// =============================================================================

/// Shared surface of the fixed-width byte newtypes.
///
/// `Debug` prints every byte; `Display` abbreviates to the first four and
/// last two bytes, which is what log lines want.
macro_rules! fixed_bytes {
    ($name:ident, $len:literal) => {
        impl $name {
            /// Width in bytes.
            pub const LEN: usize = $len;

            /// All-zero value.
            pub const ZERO: Self = Self([0u8; $len]);

            #[must_use]
            pub const fn new(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }

            /// None unless `slice` is exactly the right width.
            #[must_use]
            pub fn from_slice(slice: &[u8]) -> Option<Self> {
                <[u8; $len]>::try_from(slice).ok().map(Self)
            }

            #[must_use]
            pub const fn as_bytes(&self) -> &[u8; $len] {
                &self.0
            }

            #[must_use]
            pub fn is_zero(&self) -> bool {
                self.0.iter().all(|b| *b == 0)
            }

            /// `0x` followed by every byte in lowercase hex.
            #[must_use]
            pub fn to_hex(&self) -> String {
                format!("0x{}", hex::encode(self.0))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.to_hex())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(
                    f,
                    "0x{}...{}",
                    hex::encode(&self.0[..4]),
                    hex::encode(&self.0[$len - 2..])
                )
            }
        }

        impl From<[u8; $len]> for $name {
            fn from(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }
    };
}

/// 20-byte identity of a signer, relayer, contract or the core itself.
///
/// The zero address doubles as the native-currency fee sentinel.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Address(pub [u8; 20]);

fixed_bytes!(Address, 20);

impl Address {
    /// Parse `0x`-prefixed or bare hex. Surrounding whitespace is ignored.
    #[must_use]
    pub fn from_hex(s: &str) -> Option<Self> {
        let s = s.trim();
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        Self::from_slice(&hex::decode(digits).ok()?)
    }
}

/// Keccak-256 digest.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Hash(pub [u8; 32]);

fixed_bytes!(Hash, 32);

// =============================================================================
// BYTES (variable length)
// =============================================================================

/// Variable-length byte vector for payloads, signatures and return data.
#[derive(Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Bytes(pub Vec<u8>);

impl Bytes {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    #[must_use]
    pub fn from_slice(slice: &[u8]) -> Self {
        Self(slice.to_vec())
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }

    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Bytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.get(..4) {
            Some(head) if self.0.len() > 8 => {
                write!(f, "0x{}..({} bytes)", hex::encode(head), self.0.len())
            }
            _ => write!(f, "0x{}", hex::encode(&self.0)),
        }
    }
}

impl From<Vec<u8>> for Bytes {
    fn from(vec: Vec<u8>) -> Self {
        Self(vec)
    }
}

impl From<&[u8]> for Bytes {
    fn from(slice: &[u8]) -> Self {
        Self(slice.to_vec())
    }
}

impl AsRef<[u8]> for Bytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

// =============================================================================
// ECDSA SIGNATURE
// =============================================================================

/// Recoverable secp256k1 signature in wire order `r || s || v`.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct EcdsaSignature {
    pub r: [u8; 32],
    pub s: [u8; 32],
    /// Parity byte: 0/1 raw or 27/28 offset.
    pub v: u8,
}

impl EcdsaSignature {
    /// Wire length of an `r || s || v` signature.
    pub const LENGTH: usize = 65;

    #[must_use]
    pub const fn new(r: [u8; 32], s: [u8; 32], v: u8) -> Self {
        Self { r, s, v }
    }

    /// Splits a 65-byte `r || s || v` encoding. Returns None if wrong length.
    #[must_use]
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let (&v, rs) = <&[u8; Self::LENGTH]>::try_from(bytes).ok()?.split_last()?;
        let (r, s) = rs.split_at(32);
        Some(Self {
            r: r.try_into().ok()?,
            s: s.try_into().ok()?,
            v,
        })
    }

    /// Encodes as 65 bytes `r || s || v`.
    #[must_use]
    pub fn to_bytes(&self) -> Bytes {
        Bytes([&self.r[..], &self.s[..], &[self.v][..]].concat())
    }
}

// =============================================================================
// FEE ASSET
// =============================================================================

/// Currency a relayer fee is paid in.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum FeeAsset {
    /// The substrate's native currency.
    Native,
    /// A fungible-asset ledger deployed at the given address.
    Token(Address),
}

impl FeeAsset {
    /// Maps the zero-address sentinel to `Native`, anything else to `Token`.
    #[must_use]
    pub fn from_address(address: Address) -> Self {
        if address.is_zero() {
            Self::Native
        } else {
            Self::Token(address)
        }
    }

    /// Inverse of [`FeeAsset::from_address`].
    #[must_use]
    pub fn address(&self) -> Address {
        match self {
            Self::Native => Address::ZERO,
            Self::Token(address) => *address,
        }
    }

    /// Returns true for the native-currency fee path.
    #[must_use]
    pub fn is_native(&self) -> bool {
        matches!(self, Self::Native)
    }
}

impl fmt::Display for FeeAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Native => write!(f, "native"),
            Self::Token(address) => write!(f, "token({address})"),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
