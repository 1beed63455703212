//! `txpool_content` snapshot types and field decoding
//!
//! The node reports every field as a string. Entries are kept verbatim for
//! display and decoded on demand before being re-signed.

use crate::error::{CliError, CliResult};
use crate::tx::parse_address;

use ethers::types::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// sender -> nonce -> transaction
pub type SenderPool = BTreeMap<String, BTreeMap<String, RawPoolTransaction>>;

/// Full pool snapshot, split by category
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TxPoolContent {
    pub pending: SenderPool,
    pub queued: SenderPool,
}

/// `transactionIndex` is `null` for pool entries on most nodes, but some report numbers or strings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TransactionIndex {
    #[default]
    Absent,
    Number(u64),
    Text(String),
}

/// Pool entry exactly as reported by the node
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawPoolTransaction {
    pub from: String,
    pub gas: String,
    pub gas_price: String,
    pub hash: String,
    pub input: String,
    pub nonce: String,
    pub r: String,
    pub s: String,
    pub to: Option<String>,
    pub transaction_index: TransactionIndex,
    #[serde(rename = "type")]
    pub tx_type: String,
    pub v: String,
    pub value: String,
}

/// Pool entry with binary and numeric fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolTransaction {
    pub hash: String,
    pub from: Address,
    pub to: Address,
    pub nonce: u64,
    pub gas_limit: u64,
    pub gas_price: U256,
    pub value: U256,
    pub input: Bytes,
}

impl RawPoolTransaction {
    pub fn decode(&self) -> CliResult<PoolTransaction> {
        let to = match self.to.as_deref() {
            Some(to) if !to.is_empty() => parse_address("to", to)?,
            _ => return Err(CliError::decode("to", "contract creation cannot be replaced")),
        };

        Ok(PoolTransaction {
            hash: self.hash.clone(),
            from: parse_address("from", &self.from)?,
            to,
            nonce: decode_u64("nonce", &self.nonce)?,
            gas_limit: decode_u64("gas", &self.gas)?,
            gas_price: decode_u256("gasPrice", &self.gas_price)?,
            value: decode_u256("value", &self.value)?,
            input: decode_bytes("input", &self.input)?,
        })
    }

    /// Entries whose `from` does not parse never match
    fn sent_by(&self, sender: Address) -> bool {
        parse_address("from", self.from.trim()).map_or(false, |from| from == sender)
    }
}

impl TxPoolContent {
    /// Flatten the `pending` category, optionally keeping a single sender.
    ///
    /// Entries are ordered by sender, then by ascending nonce.
    pub fn pending_entries(&self, sender: Option<Address>) -> Vec<RawPoolTransaction> {
        let mut entries: Vec<RawPoolTransaction> = self
            .pending
            .values()
            .flat_map(|by_nonce| by_nonce.values())
            .filter(|tx| sender.map_or(true, |s| tx.sent_by(s)))
            .cloned()
            .collect();

        entries.sort_by_cached_key(|tx| {
            (
                tx.from.to_ascii_lowercase(),
                decode_u64("nonce", &tx.nonce).unwrap_or(u64::MAX),
            )
        });
        entries
    }
}

/// Decode a quantity: `0x`-prefixed hex or plain decimal
pub fn decode_u256(field: &str, input: &str) -> CliResult<U256> {
    let input = input.trim();
    match input.strip_prefix("0x").or_else(|| input.strip_prefix("0X")) {
        Some("") => Err(CliError::decode(field, "empty hex quantity")),
        Some(digits) if digits.len() > 64 => {
            Err(CliError::decode(field, format!("{} exceeds 256 bits", input)))
        }
        Some(digits) => U256::from_str_radix(digits, 16)
            .map_err(|e| CliError::decode(field, format!("{:?}: {:?}", input, e))),
        None if input.is_empty() => Err(CliError::decode(field, "empty quantity")),
        None => U256::from_dec_str(input)
            .map_err(|e| CliError::decode(field, format!("{:?}: {:?}", input, e))),
    }
}

pub fn decode_u64(field: &str, input: &str) -> CliResult<u64> {
    let value = decode_u256(field, input)?;
    if value > U256::from(u64::MAX) {
        return Err(CliError::decode(field, format!("{} exceeds 64 bits", input)));
    }
    Ok(value.as_u64())
}

/// Decode call data; empty string and `0x` are both empty
pub fn decode_bytes(field: &str, input: &str) -> CliResult<Bytes> {
    let input = input.trim();
    let digits = input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
        .unwrap_or(input);

    hex::decode(digits)
        .map(Bytes::from)
        .map_err(|e| CliError::decode(field, e))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;

    pub(crate) fn entry(from: &str, nonce: u64, gas_price: u64) -> serde_json::Value {
        json!({
            "blockHash": null,
            "blockNumber": null,
            "from": from,
            "gas": "0x5208",
            "gasPrice": format!("0x{:x}", gas_price),
            "hash": format!("0x{:064x}", nonce + gas_price * 1000),
            "input": "0x",
            "nonce": format!("0x{:x}", nonce),
            "r": "0x1",
            "s": "0x2",
            "to": "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed",
            "transactionIndex": null,
            "type": "0x0",
            "v": "0x25",
            "value": "0xde0b6b3a7640000"
        })
    }

    #[test]
    fn test_snapshot_deserializes() {
        let sender = "0x1111111111111111111111111111111111111111";
        let snapshot: TxPoolContent = serde_json::from_value(json!({
            "pending": { sender: { "3": entry(sender, 3, 10) } },
            "queued": {}
        }))
        .unwrap();

        let entries = snapshot.pending_entries(None);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].transaction_index, TransactionIndex::Absent);
        assert!(snapshot.queued.is_empty());
    }

    #[test]
    fn test_transaction_index_variants() {
        let parse = |v: serde_json::Value| -> TransactionIndex { serde_json::from_value(v).unwrap() };
        assert_eq!(parse(json!(null)), TransactionIndex::Absent);
        assert_eq!(parse(json!(4)), TransactionIndex::Number(4));
        assert_eq!(parse(json!("0x4")), TransactionIndex::Text("0x4".into()));

        let mut raw = entry("0x1111111111111111111111111111111111111111", 0, 1);
        raw.as_object_mut().unwrap().remove("transactionIndex");
        let tx: RawPoolTransaction = serde_json::from_value(raw).unwrap();
        assert_eq!(tx.transaction_index, TransactionIndex::Absent);
    }

    #[test]
    fn test_pending_entries_filter_and_order() {
        let abc = "0xABC0000000000000000000000000000000000001";
        let def = "0xdef0000000000000000000000000000000000002";
        let snapshot: TxPoolContent = serde_json::from_value(json!({
            "pending": {
                abc: {
                    "10": entry(abc, 10, 10),
                    "9": entry(abc, 9, 10),
                },
                def: { "1": entry(def, 1, 20) }
            }
        }))
        .unwrap();

        let filtered = snapshot.pending_entries(Some(parse_address("from", abc).unwrap()));
        let nonces: Vec<_> = filtered.iter().map(|tx| tx.nonce.clone()).collect();
        assert_eq!(nonces, vec!["0x9", "0xa"]);

        assert_eq!(snapshot.pending_entries(None).len(), 3);
        assert!(snapshot.pending_entries(Some(Address::zero())).is_empty());
    }

    #[test]
    fn test_sender_filter_ignores_prefix_and_case() {
        let abc = "0xABC0000000000000000000000000000000000001";
        let snapshot: TxPoolContent = serde_json::from_value(json!({
            "pending": {
                abc: { "0": entry(abc, 0, 10) },
                "garbage": { "0": entry("not-an-address", 0, 10) }
            }
        }))
        .unwrap();

        let bare = parse_address("from", "abc0000000000000000000000000000000000001").unwrap();
        let matched = snapshot.pending_entries(Some(bare));
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].from, abc);
    }

    #[test]
    fn test_decode_preserves_large_values() {
        let mut raw = entry("0x1111111111111111111111111111111111111111", 5, 1);
        // 2^70 wei and a gas price above u64
        raw["value"] = json!("0x400000000000000000");
        raw["gasPrice"] = json!("0x10000000000000000");
        raw["input"] = json!("0xa9059cbb");
        let tx: RawPoolTransaction = serde_json::from_value(raw).unwrap();

        let decoded = tx.decode().unwrap();
        assert_eq!(decoded.nonce, 5);
        assert_eq!(decoded.gas_limit, 21_000);
        assert_eq!(decoded.value, U256::from(2u64).pow(U256::from(70u64)));
        assert_eq!(decoded.gas_price, U256::from(u64::MAX) + U256::one());
        assert_eq!(decoded.input.to_vec(), vec![0xa9, 0x05, 0x9c, 0xbb]);
    }

    #[test]
    fn test_decode_quantity_forms() {
        assert_eq!(decode_u256("value", "0x0").unwrap(), U256::zero());
        assert_eq!(decode_u256("value", "1000").unwrap(), U256::from(1000u64));
        assert!(decode_u256("value", "0x").is_err());
        assert!(decode_u256("value", "0xzz").is_err());
        assert!(decode_u256("value", "").is_err());
        assert!(decode_u64("nonce", "0x10000000000000000").is_err());
        assert_eq!(decode_bytes("input", "").unwrap(), Bytes::default());
        assert_eq!(decode_bytes("input", "0x").unwrap(), Bytes::default());
        assert!(decode_bytes("input", "0xabc").is_err());
    }

    #[test]
    fn test_contract_creation_is_not_decodable() {
        let mut raw = entry("0x1111111111111111111111111111111111111111", 0, 1);
        raw["to"] = json!(null);
        let tx: RawPoolTransaction = serde_json::from_value(raw).unwrap();
        assert!(matches!(
            tx.decode(),
            Err(CliError::Decode { ref field, .. }) if field == "to"
        ));
    }
}
