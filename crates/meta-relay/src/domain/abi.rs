//! # ABI Encoding
//!
//! The slice of the Solidity contract ABI the relay speaks: the signed
//! `(address, bytes)` binding, fungible-asset call data and `Error(string)`
//! revert payloads. All words are 32 bytes, big-endian.

use super::signature::keccak256;
use super::value_objects::{Address, Bytes, U256};

/// ABI word size.
pub const WORD: usize = 32;

/// `transfer(address,uint256)`
pub const TRANSFER_SELECTOR: [u8; 4] = [0xa9, 0x05, 0x9c, 0xbb];
/// `transferFrom(address,address,uint256)`
pub const TRANSFER_FROM_SELECTOR: [u8; 4] = [0x23, 0xb8, 0x72, 0xdd];
/// `approve(address,uint256)`
pub const APPROVE_SELECTOR: [u8; 4] = [0x09, 0x5e, 0xa7, 0xb3];
/// `balanceOf(address)`
pub const BALANCE_OF_SELECTOR: [u8; 4] = [0x70, 0xa0, 0x82, 0x31];
/// `allowance(address,address)`
pub const ALLOWANCE_SELECTOR: [u8; 4] = [0xdd, 0x62, 0xed, 0x3e];
/// `totalSupply()`
pub const TOTAL_SUPPLY_SELECTOR: [u8; 4] = [0x18, 0x16, 0x0d, 0xdd];
/// `Error(string)`
pub const ERROR_SELECTOR: [u8; 4] = [0x08, 0xc3, 0x79, 0xa0];

/// First four bytes of `keccak256(signature)`.
#[must_use]
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    let mut out = [0u8; 4];
    out.copy_from_slice(&hash.0[..4]);
    out
}

// =============================================================================
// WORD ENCODING
// =============================================================================

/// Left-pads an address into a word.
#[must_use]
pub fn address_word(address: Address) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    word[12..].copy_from_slice(address.as_bytes());
    word
}

/// Big-endian word of an unsigned integer.
#[must_use]
pub fn u256_word(value: U256) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    value.to_big_endian(&mut word);
    word
}

fn usize_word(value: usize) -> [u8; WORD] {
    u256_word(U256::from(value))
}

/// Length-prefixed, zero-padded tail of a dynamic `bytes`/`string`.
fn dynamic_tail(data: &[u8]) -> Vec<u8> {
    let padded = data.len().div_ceil(WORD) * WORD;
    let mut out = Vec::with_capacity(WORD + padded);
    out.extend_from_slice(&usize_word(data.len()));
    out.extend_from_slice(data);
    out.resize(WORD + padded, 0);
    out
}

/// `abi.encode(address target, bytes payload)`.
///
/// This is the exact preimage the signer hashes; any deviation makes
/// recovery yield an unrelated identity.
#[must_use]
pub fn encode_address_and_bytes(target: Address, payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(3 * WORD + payload.len().div_ceil(WORD) * WORD);
    out.extend_from_slice(&address_word(target));
    out.extend_from_slice(&usize_word(2 * WORD));
    out.extend_from_slice(&dynamic_tail(payload));
    out
}

/// Call data: selector followed by static words.
#[must_use]
pub fn encode_call(selector: [u8; 4], words: &[[u8; WORD]]) -> Bytes {
    let mut out = Vec::with_capacity(4 + words.len() * WORD);
    out.extend_from_slice(&selector);
    for word in words {
        out.extend_from_slice(word);
    }
    Bytes(out)
}

/// Call data for `transfer(to, amount)`.
#[must_use]
pub fn encode_transfer(to: Address, amount: U256) -> Bytes {
    encode_call(TRANSFER_SELECTOR, &[address_word(to), u256_word(amount)])
}

/// Call data for `balanceOf(owner)`.
#[must_use]
pub fn encode_balance_of(owner: Address) -> Bytes {
    encode_call(BALANCE_OF_SELECTOR, &[address_word(owner)])
}

/// ABI `bool` return word.
#[must_use]
pub fn bool_word(value: bool) -> [u8; WORD] {
    u256_word(if value { U256::one() } else { U256::zero() })
}

// =============================================================================
// DECODING
// =============================================================================

/// Splits call data into its selector and argument words.
///
/// Returns None if the input is shorter than a selector or the argument
/// area is not word-aligned.
#[must_use]
pub fn split_call(input: &[u8]) -> Option<([u8; 4], Vec<[u8; WORD]>)> {
    if input.len() < 4 || (input.len() - 4) % WORD != 0 {
        return None;
    }
    let mut selector = [0u8; 4];
    selector.copy_from_slice(&input[..4]);
    let words = input[4..]
        .chunks_exact(WORD)
        .map(|chunk| {
            let mut word = [0u8; WORD];
            word.copy_from_slice(chunk);
            word
        })
        .collect();
    Some((selector, words))
}

/// Decodes an address word, rejecting dirty upper bytes.
#[must_use]
pub fn decode_address(word: &[u8; WORD]) -> Option<Address> {
    if word[..12].iter().any(|b| *b != 0) {
        return None;
    }
    Address::from_slice(&word[12..])
}

/// Decodes an unsigned integer word.
#[must_use]
pub fn decode_u256(word: &[u8; WORD]) -> U256 {
    U256::from_big_endian(word)
}

// =============================================================================
// REVERT PAYLOADS
// =============================================================================

/// `Error(string)` revert payload carrying `reason`.
#[must_use]
pub fn encode_revert_reason(reason: &str) -> Bytes {
    let mut out = Vec::new();
    out.extend_from_slice(&ERROR_SELECTOR);
    out.extend_from_slice(&usize_word(WORD));
    out.extend_from_slice(&dynamic_tail(reason.as_bytes()));
    Bytes(out)
}

/// Extracts the reason from an `Error(string)` revert payload.
///
/// Returns None for empty or non-`Error(string)` payloads.
#[must_use]
pub fn decode_revert_reason(data: &[u8]) -> Option<String> {
    if data.len() < 4 + 2 * WORD || data[..4] != ERROR_SELECTOR {
        return None;
    }
    let body = &data[4..];
    let offset = word_as_usize(&body[..WORD])?;
    let len_start = offset.checked_add(WORD)?;
    let len = word_as_usize(body.get(offset..len_start)?)?;
    let text = body.get(len_start..len_start.checked_add(len)?)?;
    String::from_utf8(text.to_vec()).ok()
}

fn word_as_usize(word: &[u8]) -> Option<usize> {
    let value = U256::from_big_endian(word);
    if value > U256::from(usize::MAX) {
        return None;
    }
    Some(value.as_usize())
}

// =============================================================================
// TESTS
// =============================================================================
