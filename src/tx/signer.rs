//! Legacy transaction construction and EIP-155 signing

use crate::error::{CliError, CliResult};

use ethers::signers::{LocalWallet, Signer};
use ethers::types::transaction::eip2718::TypedTransaction;
use ethers::types::{Address, Bytes, Signature, TransactionRequest, H256, U256};

/// Canonical fields of a legacy transaction, before signing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRecord {
    pub nonce: u64,
    pub to: Address,
    pub value: U256,
    pub gas_limit: u64,
    pub gas_price: U256,
    pub data: Bytes,
}

impl TransactionRecord {
    fn to_typed(&self, chain_id: u64) -> TypedTransaction {
        let request = TransactionRequest::new()
            .nonce(self.nonce)
            .to(self.to)
            .value(self.value)
            .gas(self.gas_limit)
            .gas_price(self.gas_price)
            .data(self.data.clone())
            .chain_id(chain_id);

        TypedTransaction::Legacy(request)
    }
}

/// A signed transaction ready for `eth_sendRawTransaction`
#[derive(Debug, Clone)]
pub struct SignedTransaction {
    pub record: TransactionRecord,
    pub chain_id: u64,
    pub signature: Signature,
    /// RLP of `[nonce, gasPrice, gas, to, value, data, v, r, s]`
    pub raw: Bytes,
    pub hash: H256,
}

impl SignedTransaction {
    pub fn raw_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.raw))
    }

    pub fn hash_hex(&self) -> String {
        format!("{:#x}", self.hash)
    }

    /// Sender address recovered from the signature
    pub fn recover_sender(&self) -> CliResult<Address> {
        let sighash = self.record.to_typed(self.chain_id).sighash();
        self.signature
            .recover(sighash)
            .map_err(|e| CliError::Signing(e.to_string()))
    }
}

/// Parse a hex private key, with or without `0x`
pub fn parse_private_key(key: &str) -> CliResult<LocalWallet> {
    let key = key.trim();
    let key = key
        .strip_prefix("0x")
        .or_else(|| key.strip_prefix("0X"))
        .unwrap_or(key);

    let bytes = hex::decode(key).map_err(|e| CliError::KeyFormat(e.to_string()))?;
    if bytes.len() != 32 {
        return Err(CliError::KeyFormat(format!(
            "expected 32 bytes, got {}",
            bytes.len()
        )));
    }

    LocalWallet::from_bytes(&bytes).map_err(|e| CliError::KeyFormat(e.to_string()))
}

/// Parse a 20-byte hex address. Unlike checksum-lenient parsing, the length must be exact.
pub fn parse_address(field: &str, input: &str) -> CliResult<Address> {
    let trimmed = input.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    let bytes = hex::decode(digits).map_err(|e| CliError::decode(field, e))?;
    if bytes.len() != Address::len_bytes() {
        return Err(CliError::decode(
            field,
            format!("expected 20-byte address, got {} bytes", bytes.len()),
        ));
    }

    Ok(Address::from_slice(&bytes))
}

/// Sign `record` for `chain_id` with replay protection
pub fn sign(record: TransactionRecord, chain_id: u64, wallet: &LocalWallet) -> CliResult<SignedTransaction> {
    let typed = record.to_typed(chain_id);
    let signature = wallet
        .clone()
        .with_chain_id(chain_id)
        .sign_transaction_sync(&typed)
        .map_err(|e| CliError::Signing(e.to_string()))?;

    let raw = typed.rlp_signed(&signature);
    let hash = typed.hash(&signature);

    Ok(SignedTransaction {
        record,
        chain_id,
        signature,
        raw,
        hash,
    })
}
