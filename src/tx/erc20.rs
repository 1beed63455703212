//! ERC-20 call data encoding
//!
//! Payloads are built by hand: a 4-byte selector taken from the keccak-256 of
//! the canonical signature, followed by 32-byte left-padded arguments.

use ethers::types::{Address, Bytes, U256};
use sha3::{Digest, Keccak256};

pub const TRANSFER_SIGNATURE: &str = "transfer(address,uint256)";
pub const BALANCE_OF_SIGNATURE: &str = "balanceOf(address)";

/// Length of a `transfer(address,uint256)` payload
pub const TRANSFER_PAYLOAD_LEN: usize = 4 + 32 + 32;

/// First four bytes of keccak-256 over the function signature
pub fn method_selector(signature: &str) -> [u8; 4] {
    let hash = Keccak256::digest(signature.as_bytes());
    let mut selector = [0u8; 4];
    selector.copy_from_slice(&hash[..4]);
    selector
}

fn pad_address(address: &Address) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[12..].copy_from_slice(address.as_bytes());
    word
}

fn pad_uint(value: U256) -> [u8; 32] {
    let mut word = [0u8; 32];
    value.to_big_endian(&mut word);
    word
}

/// Encode `transfer(to, amount)`
pub fn build_transfer_payload(to: &Address, amount: U256) -> Bytes {
    let mut data = Vec::with_capacity(TRANSFER_PAYLOAD_LEN);
    data.extend_from_slice(&method_selector(TRANSFER_SIGNATURE));
    data.extend_from_slice(&pad_address(to));
    data.extend_from_slice(&pad_uint(amount));
    data.into()
}

/// Encode `balanceOf(holder)`
pub fn build_balance_of_payload(holder: &Address) -> Bytes {
    let mut data = Vec::with_capacity(4 + 32);
    data.extend_from_slice(&method_selector(BALANCE_OF_SIGNATURE));
    data.extend_from_slice(&pad_address(holder));
    data.into()
}

/// Read a single `uint256` return word. Empty output (no contract) reads as zero.
pub fn decode_uint_word(output: &[u8]) -> Option<U256> {
    match output.len() {
        0 => Some(U256::zero()),
        32 => Some(U256::from_big_endian(output)),
        _ => None,
    }
}
