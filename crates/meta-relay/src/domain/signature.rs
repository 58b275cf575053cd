//! # Signature Verification (secp256k1)
//!
//! Binds a forward request to its signer.
//!
//! The signer hashes `abi.encode(target, payload)` with Keccak-256 and signs
//! the result under the personal-message prefix. The verifier recomputes the
//! digest from the request, recovers the public key and compares the derived
//! address to the claimed signer. Fee fields and the nonce are not covered.
//!
//! ## Security Notes
//!
//! - R and S must be in [1, n-1]
//! - S must not exceed n/2 (EIP-2)
//! - Scalar comparisons use `subtle` and run in constant time

use super::abi::encode_address_and_bytes;
use super::entities::ForwardRequest;
use super::value_objects::{Address, EcdsaSignature, Hash};
use crate::errors::{RelayError, SignatureError};
use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use sha3::{Digest, Keccak256};
use subtle::{Choice, ConstantTimeEq};
use tracing::debug;
use zeroize::Zeroize;

/// secp256k1 curve order n
const SECP256K1_ORDER: [u8; 32] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE,
    0xBA, 0xAE, 0xDC, 0xE6, 0xAF, 0x48, 0xA0, 0x3B, 0xBF, 0xD2, 0x5E, 0x8C, 0xD0, 0x36, 0x41, 0x41,
];

/// n/2, the EIP-2 malleability bound.
const SECP256K1_HALF_ORDER: [u8; 32] = [
    0x7F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0x5D, 0x57, 0x6E, 0x73, 0x57, 0xA4, 0x50, 0x1D, 0xDF, 0xE9, 0x2F, 0x46, 0x68, 0x1B, 0x20, 0xA0,
];

/// Personal-message prefix for a 32-byte message.
const PERSONAL_MESSAGE_PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n32";

// =============================================================================
// SIGNATURE VERIFIER
// =============================================================================

/// Stateless verifier for forward-request signatures.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignatureVerifier;

impl SignatureVerifier {
    pub fn new() -> Self {
        Self
    }

    /// Check that `request.signature` was produced by `request.signer`.
    ///
    /// Pure: no state is read or written.
    ///
    /// # Errors
    ///
    /// `SignatureMismatch` when the recovered identity differs from the
    /// claimed signer, or when nothing could be recovered.
    pub fn verify(&self, request: &ForwardRequest) -> Result<Address, RelayError> {
        let digest = forward_digest(request.target, request.payload.as_slice());

        match recover_signer(&digest, request.signature.as_slice()) {
            Ok(recovered) if recovered == request.signer => Ok(recovered),
            Ok(recovered) => Err(RelayError::SignatureMismatch {
                claimed: request.signer,
                recovered: Some(recovered),
            }),
            Err(e) => {
                debug!(signer = %request.signer, error = %e, "signature unrecoverable");
                Err(RelayError::SignatureMismatch {
                    claimed: request.signer,
                    recovered: None,
                })
            }
        }
    }
}

// =============================================================================
// MESSAGE HASHING
// =============================================================================

/// Keccak-256 digest.
pub fn keccak256(data: &[u8]) -> Hash {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&hasher.finalize());
    Hash(hash)
}

/// `keccak256(abi.encode(target, payload))`, the message the signer signs.
pub fn forward_message_hash(target: Address, payload: &[u8]) -> Hash {
    keccak256(&encode_address_and_bytes(target, payload))
}

/// Wraps a 32-byte message in the personal-message prefix and hashes it.
pub fn personal_message_digest(message: &Hash) -> Hash {
    let mut hasher = Keccak256::new();
    hasher.update(PERSONAL_MESSAGE_PREFIX);
    hasher.update(message.as_bytes());
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&hasher.finalize());
    Hash(hash)
}

/// The prehash actually fed to ECDSA for a forward of `payload` to `target`.
pub fn forward_digest(target: Address, payload: &[u8]) -> Hash {
    personal_message_digest(&forward_message_hash(target, payload))
}

// =============================================================================
// RECOVERY
// =============================================================================

/// Recover the signer address from a 65-byte `r || s || v` signature.
///
/// # Errors
///
/// Wrong length, out-of-range or high S scalars, an invalid recovery id,
/// or a point that does not recover.
pub fn recover_signer(digest: &Hash, signature: &[u8]) -> Result<Address, SignatureError> {
    let sig = EcdsaSignature::from_slice(signature)
        .ok_or(SignatureError::InvalidLength(signature.len()))?;

    if !is_valid_scalar(&sig.r) || !is_valid_scalar(&sig.s) {
        return Err(SignatureError::InvalidScalar);
    }
    if !is_low_s(&sig.s) {
        return Err(SignatureError::MalleableSignature);
    }

    let recovery_id = parse_recovery_id(sig.v)?;

    let mut sig_bytes = [0u8; 64];
    sig_bytes[..32].copy_from_slice(&sig.r);
    sig_bytes[32..].copy_from_slice(&sig.s);
    let parsed = Signature::from_slice(&sig_bytes);
    sig_bytes.zeroize();
    let k256_sig = parsed.map_err(|_| SignatureError::InvalidScalar)?;

    let key = VerifyingKey::recover_from_prehash(digest.as_bytes(), &k256_sig, recovery_id)
        .map_err(|_| SignatureError::RecoveryFailed)?;

    Ok(address_from_key(&key))
}

/// Address of a public key: last 20 bytes of `keccak256(x || y)`.
pub fn address_from_key(key: &VerifyingKey) -> Address {
    let point = key.to_encoded_point(false);
    let hash = keccak256(&point.as_bytes()[1..]);
    let mut address = [0u8; 20];
    address.copy_from_slice(&hash.0[12..]);
    Address(address)
}

/// Accepts 0, 1, 27 and 28.
fn parse_recovery_id(v: u8) -> Result<RecoveryId, SignatureError> {
    let id = match v {
        0 | 27 => 0,
        1 | 28 => 1,
        _ => return Err(SignatureError::InvalidRecoveryId(v)),
    };
    RecoveryId::try_from(id).map_err(|_| SignatureError::InvalidRecoveryId(v))
}

/// Constant-time `a < b` over big-endian bytes.
fn ct_less_than(a: &[u8; 32], b: &[u8; 32]) -> Choice {
    let mut less = Choice::from(0u8);
    let mut greater = Choice::from(0u8);

    for (x, y) in a.iter().zip(b.iter()) {
        let undecided = !(less | greater);
        less |= undecided & Choice::from(u8::from(x < y));
        greater |= undecided & Choice::from(u8::from(x > y));
    }

    less
}

/// S at most n/2.
fn is_low_s(s: &[u8; 32]) -> bool {
    (!ct_less_than(&SECP256K1_HALF_ORDER, s)).into()
}

/// Scalar in [1, n-1].
fn is_valid_scalar(scalar: &[u8; 32]) -> bool {
    let mut is_zero = Choice::from(1u8);
    for byte in scalar {
        is_zero &= byte.ct_eq(&0u8);
    }
    (!is_zero & ct_less_than(scalar, &SECP256K1_ORDER)).into()
}

// =============================================================================
// CLIENT-SIDE SIGNING
// =============================================================================

/// Sign a forward of `payload` to `target` the way a wallet would.
///
/// Produces a low-S, 65-byte signature with `v` in {27, 28}.
///
/// # Errors
///
/// Propagates signing failures from `k256`.
pub fn sign_forward(
    key: &SigningKey,
    target: Address,
    payload: &[u8],
) -> Result<EcdsaSignature, k256::ecdsa::Error> {
    let digest = forward_digest(target, payload);
    let (sig, recid) = key.sign_prehash_recoverable(digest.as_bytes())?;

    // k256 may hand back a high S; normalizing flips the y parity
    let (sig, recid) = match sig.normalize_s() {
        Some(low) => (
            low,
            RecoveryId::new(!recid.is_y_odd(), recid.is_x_reduced()),
        ),
        None => (sig, recid),
    };

    let bytes = sig.to_bytes();
    let mut r = [0u8; 32];
    let mut s = [0u8; 32];
    r.copy_from_slice(&bytes[..32]);
    s.copy_from_slice(&bytes[32..]);

    Ok(EcdsaSignature::new(r, s, 27 + recid.to_byte()))
}

// =============================================================================
// TESTS
// =============================================================================
