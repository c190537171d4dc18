//! # Core Domain Entities
//!
//! Defines the chain entities read by the synchronization pipeline.
//!
//! ## Clusters
//!
//! - **Primitives**: `Hash`, `Address`, `U256`, `Difficulty`, hashing helpers
//! - **Chain**: `Transaction`, `BlockHeader`, `Block`
//! - **Networking**: `NodeId`, `BlockHeaderWrapper`
//!
//! ## Wire Format
//!
//! All chain entities use RLP. Scalars are encoded as minimal big-endian
//! byte strings, fixed-size hashes as byte strings of their exact length.
//!
//! ```text
//! Transaction        = [nonce, gas_price, gas_limit, to, value, data, v, r, s]
//! BlockHeader        = [parent_hash, coinbase, state_root, transactions_root,
//!                       difficulty, number, gas_limit, gas_used, timestamp,
//!                       extra_data, nonce]
//! Block              = [header, [transaction...], [uncle...]]
//! BlockHeaderWrapper = [header, [node_id...]]
//! ```

use std::collections::BTreeSet;
use std::fmt;

use rlp::{Decodable, DecoderError, Encodable, Rlp, RlpStream};
use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};

// Re-export U256 from primitive-types for use across all subsystems
pub use primitive_types::U256;

// =============================================================================
// PRIMITIVES
// =============================================================================

/// A 32-byte Keccak-256 hash.
pub type Hash = [u8; 32];

/// A 20-byte account address.
pub type Address = [u8; 20];

/// Compute the Keccak-256 hash of `data`.
pub fn keccak256(data: &[u8]) -> Hash {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// First six hex characters of a hash, as printed in log lines.
pub fn short_hash(hash: &Hash) -> String {
    hex::encode(&hash[..3])
}

/// Decode one complete RLP item from `bytes`.
///
/// Unlike [`rlp::decode`], trailing bytes after the item are rejected, so a
/// payload has exactly one valid reading.
pub fn decode_exact<T: Decodable>(bytes: &[u8]) -> Result<T, DecoderError> {
    let rlp = Rlp::new(bytes);
    let info = rlp.payload_info()?;
    if info.total() != bytes.len() {
        return Err(DecoderError::RlpInconsistentLengthAndData);
    }
    rlp.as_val()
}

fn expect_list(rlp: &Rlp, fields: usize) -> Result<(), DecoderError> {
    if !rlp.is_list() {
        return Err(DecoderError::RlpExpectedToBeList);
    }
    if rlp.item_count()? != fields {
        return Err(DecoderError::RlpIncorrectListLen);
    }
    Ok(())
}

fn fixed_at<const N: usize>(rlp: &Rlp, index: usize) -> Result<[u8; N], DecoderError> {
    let item = rlp.at(index)?;
    <[u8; N]>::try_from(item.data()?).map_err(|_| DecoderError::RlpInvalidLength)
}

/// Cumulative chain difficulty: a non-negative integer of any width.
///
/// Kept as the big-endian bytes it arrived in, so a received value logs and
/// re-encodes exactly as sent. Comparison is by numeric value; leading zero
/// bytes are insignificant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Difficulty(Vec<u8>);

impl Difficulty {
    /// Wrap big-endian bytes. Empty is zero.
    pub fn from_be_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Bytes as given, leading zeros included.
    pub fn as_be_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Big-endian bytes without leading zeros (empty for zero).
    pub fn significant_bytes(&self) -> &[u8] {
        match self.0.iter().position(|byte| *byte != 0) {
            Some(start) => &self.0[start..],
            None => &[][..],
        }
    }

    /// Returns `true` for zero.
    pub fn is_zero(&self) -> bool {
        self.significant_bytes().is_empty()
    }

    /// The value as a `U256`, or `None` when it needs more than 256 bits.
    pub fn to_u256(&self) -> Option<U256> {
        let significant = self.significant_bytes();
        (significant.len() <= 32).then(|| U256::from_big_endian(significant))
    }
}

impl From<U256> for Difficulty {
    fn from(value: U256) -> Self {
        let mut buf = [0u8; 32];
        value.to_big_endian(&mut buf);
        let start = 32 - (value.bits() + 7) / 8;
        Self(buf[start..].to_vec())
    }
}

impl From<u64> for Difficulty {
    fn from(value: u64) -> Self {
        U256::from(value).into()
    }
}

impl PartialEq for Difficulty {
    fn eq(&self, other: &Self) -> bool {
        self.significant_bytes() == other.significant_bytes()
    }
}

impl Eq for Difficulty {}

impl PartialEq<U256> for Difficulty {
    fn eq(&self, other: &U256) -> bool {
        self.to_u256().as_ref() == Some(other)
    }
}

impl PartialOrd for Difficulty {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Difficulty {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        let (a, b) = (self.significant_bytes(), other.significant_bytes());
        a.len().cmp(&b.len()).then_with(|| a.cmp(b))
    }
}

impl fmt::LowerHex for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(&self.0))
    }
}

impl Encodable for Difficulty {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.append(&self.0);
    }
}

impl Decodable for Difficulty {
    fn decode(rlp: &Rlp) -> Result<Self, DecoderError> {
        if !rlp.is_data() {
            return Err(DecoderError::RlpExpectedToBeData);
        }
        Ok(Self(rlp.data()?.to_vec()))
    }
}

// =============================================================================
// CLUSTER A: THE CHAIN
// =============================================================================

/// A signed legacy transaction as carried in a block body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Transaction {
    /// Sender's nonce.
    pub nonce: u64,
    /// Gas price in base units.
    pub gas_price: U256,
    /// Gas limit for this transaction.
    pub gas_limit: u64,
    /// Recipient (`None` for contract creation).
    pub to: Option<Address>,
    /// Value transferred in base units.
    pub value: U256,
    /// Call data or init code.
    pub data: Vec<u8>,
    /// Signature recovery id.
    pub v: u64,
    /// Signature `r` component.
    pub r: U256,
    /// Signature `s` component.
    pub s: U256,
}

impl Transaction {
    /// Keccak-256 of the canonical encoding.
    pub fn hash(&self) -> Hash {
        keccak256(&rlp::encode(self))
    }
}

impl Encodable for Transaction {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(9);
        s.append(&self.nonce);
        s.append(&self.gas_price);
        s.append(&self.gas_limit);
        match &self.to {
            Some(to) => s.append(&to.to_vec()),
            None => s.append_empty_data(),
        };
        s.append(&self.value);
        s.append(&self.data);
        s.append(&self.v);
        s.append(&self.r);
        s.append(&self.s);
    }
}

impl Decodable for Transaction {
    fn decode(rlp: &Rlp) -> Result<Self, DecoderError> {
        expect_list(rlp, 9)?;

        let to = match rlp.at(3)?.data()? {
            [] => None,
            bytes => Some(<Address>::try_from(bytes).map_err(|_| DecoderError::RlpInvalidLength)?),
        };

        Ok(Self {
            nonce: rlp.val_at(0)?,
            gas_price: rlp.val_at(1)?,
            gas_limit: rlp.val_at(2)?,
            to,
            value: rlp.val_at(4)?,
            data: rlp.val_at(5)?,
            v: rlp.val_at(6)?,
            r: rlp.val_at(7)?,
            s: rlp.val_at(8)?,
        })
    }
}

/// The header of a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BlockHeader {
    /// Hash of the parent block (creates the chain linkage).
    pub parent_hash: Hash,
    /// Beneficiary of the block reward.
    pub coinbase: Address,
    /// Root hash of the state trie after applying this block.
    pub state_root: Hash,
    /// Root hash of the transaction trie.
    pub transactions_root: Hash,
    /// Difficulty of this block alone (not cumulative).
    pub difficulty: U256,
    /// Block number (height) in the chain.
    pub number: u64,
    /// Gas limit of the block.
    pub gas_limit: u64,
    /// Gas consumed by the block's transactions.
    pub gas_used: u64,
    /// Unix timestamp when the block was sealed.
    pub timestamp: u64,
    /// Arbitrary miner-supplied data.
    pub extra_data: Vec<u8>,
    /// Proof-of-work nonce.
    pub nonce: u64,
}

impl BlockHeader {
    /// Keccak-256 of the canonical encoding.
    pub fn hash(&self) -> Hash {
        keccak256(&rlp::encode(self))
    }

    /// Short hex form of [`Self::hash`].
    pub fn short_hash(&self) -> String {
        short_hash(&self.hash())
    }
}

impl Encodable for BlockHeader {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(11);
        s.append(&self.parent_hash.to_vec());
        s.append(&self.coinbase.to_vec());
        s.append(&self.state_root.to_vec());
        s.append(&self.transactions_root.to_vec());
        s.append(&self.difficulty);
        s.append(&self.number);
        s.append(&self.gas_limit);
        s.append(&self.gas_used);
        s.append(&self.timestamp);
        s.append(&self.extra_data);
        s.append(&self.nonce);
    }
}

impl Decodable for BlockHeader {
    fn decode(rlp: &Rlp) -> Result<Self, DecoderError> {
        expect_list(rlp, 11)?;
        Ok(Self {
            parent_hash: fixed_at(rlp, 0)?,
            coinbase: fixed_at(rlp, 1)?,
            state_root: fixed_at(rlp, 2)?,
            transactions_root: fixed_at(rlp, 3)?,
            difficulty: rlp.val_at(4)?,
            number: rlp.val_at(5)?,
            gas_limit: rlp.val_at(6)?,
            gas_used: rlp.val_at(7)?,
            timestamp: rlp.val_at(8)?,
            extra_data: rlp.val_at(9)?,
            nonce: rlp.val_at(10)?,
        })
    }
}

/// A full block: header, transactions and uncle headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Block {
    /// The block header.
    pub header: BlockHeader,
    /// Transactions in execution order.
    pub transactions: Vec<Transaction>,
    /// Uncle (ommer) headers.
    pub uncles: Vec<BlockHeader>,
}

impl Block {
    /// Block number, taken from the header.
    pub fn number(&self) -> u64 {
        self.header.number
    }

    /// Block hash, which is the header hash.
    pub fn hash(&self) -> Hash {
        self.header.hash()
    }

    /// Short hex form of [`Self::hash`].
    pub fn short_hash(&self) -> String {
        self.header.short_hash()
    }

    /// Canonical RLP encoding of the whole block.
    pub fn encoded(&self) -> Vec<u8> {
        rlp::encode(self).to_vec()
    }
}

impl Encodable for Block {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(3);
        s.append(&self.header);
        s.append_list::<Transaction, _>(&self.transactions);
        s.append_list::<BlockHeader, _>(&self.uncles);
    }
}

impl Decodable for Block {
    fn decode(rlp: &Rlp) -> Result<Self, DecoderError> {
        expect_list(rlp, 3)?;
        Ok(Self {
            header: rlp.val_at(0)?,
            transactions: rlp.list_at(1)?,
            uncles: rlp.list_at(2)?,
        })
    }
}

// =============================================================================
// CLUSTER B: NETWORKING
// =============================================================================

/// Unique identifier of a remote node (opaque bytes, usually a public key).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct NodeId(pub Vec<u8>);

impl NodeId {
    /// Wrap raw node id bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Raw bytes of the id.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// First eight hex characters, for log lines.
    pub fn short(&self) -> String {
        let mut encoded = hex::encode(&self.0);
        encoded.truncate(8);
        encoded
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(&self.0))
    }
}

impl From<&[u8]> for NodeId {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl Encodable for NodeId {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.append(&self.0);
    }
}

impl Decodable for NodeId {
    fn decode(rlp: &Rlp) -> Result<Self, DecoderError> {
        Ok(Self(rlp.data()?.to_vec()))
    }
}

/// A block header together with the peers known to have relayed it.
///
/// This is the unit of work buffered by the header queue. Attribution is
/// only ever queried through [`Self::sent_by`], which is a pure membership
/// test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeaderWrapper {
    header: BlockHeader,
    senders: BTreeSet<NodeId>,
}

impl BlockHeaderWrapper {
    /// Wrap a header received from a single peer.
    pub fn new(header: BlockHeader, node_id: NodeId) -> Self {
        Self {
            header,
            senders: BTreeSet::from([node_id]),
        }
    }

    /// Wrap a header relayed by several peers.
    pub fn with_senders(header: BlockHeader, senders: impl IntoIterator<Item = NodeId>) -> Self {
        Self {
            header,
            senders: senders.into_iter().collect(),
        }
    }

    /// The wrapped header.
    pub fn header(&self) -> &BlockHeader {
        &self.header
    }

    /// Block number, the queue key.
    pub fn number(&self) -> u64 {
        self.header.number
    }

    /// Header hash.
    pub fn hash(&self) -> Hash {
        self.header.hash()
    }

    /// Returns `true` if `node_id` is one of the recorded senders.
    pub fn sent_by(&self, node_id: &NodeId) -> bool {
        self.senders.contains(node_id)
    }

    /// Recorded senders in ascending byte order.
    pub fn senders(&self) -> impl Iterator<Item = &NodeId> {
        self.senders.iter()
    }

    /// Unwrap into the bare header.
    pub fn into_header(self) -> BlockHeader {
        self.header
    }
}

impl Encodable for BlockHeaderWrapper {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(2);
        s.append(&self.header);
        s.begin_list(self.senders.len());
        for sender in &self.senders {
            s.append(sender);
        }
    }
}

impl Decodable for BlockHeaderWrapper {
    fn decode(rlp: &Rlp) -> Result<Self, DecoderError> {
        expect_list(rlp, 2)?;
        let senders: Vec<NodeId> = rlp.list_at(1)?;
        Ok(Self::with_senders(rlp.val_at(0)?, senders))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_header(number: u64) -> BlockHeader {
        BlockHeader {
            parent_hash: [0x11; 32],
            coinbase: [0x22; 20],
            state_root: [0x33; 32],
            transactions_root: [0x44; 32],
            difficulty: U256::from(131_072u64),
            number,
            gas_limit: 8_000_000,
            gas_used: 21_000,
            timestamp: 1_438_269_988,
            extra_data: b"mined".to_vec(),
            nonce: 0x42,
        }
    }

    fn sample_tx(nonce: u64, to: Option<Address>) -> Transaction {
        Transaction {
            nonce,
            gas_price: U256::from(20_000_000_000u64),
            gas_limit: 21_000,
            to,
            value: U256::exp10(18),
            data: vec![],
            v: 27,
            r: U256::from(7u64),
            s: U256::from(9u64),
        }
    }

    #[test]
    fn test_header_roundtrip() {
        let header = sample_header(1_000_000);
        let encoded = rlp::encode(&header);
        let decoded: BlockHeader = decode_exact(&encoded).unwrap();
        assert_eq!(decoded, header);
        assert_eq!(decoded.hash(), header.hash());
    }

    #[test]
    fn test_block_roundtrip_with_body() {
        let block = Block {
            header: sample_header(7),
            transactions: vec![sample_tx(0, Some([0xAB; 20])), sample_tx(1, None)],
            uncles: vec![sample_header(6)],
        };
        let decoded: Block = decode_exact(&block.encoded()).unwrap();
        assert_eq!(decoded, block);
        assert_eq!(decoded.transactions[1].to, None);
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let block = Block {
            header: sample_header(3),
            ..Default::default()
        };
        assert_eq!(block.encoded(), block.clone().encoded());
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        let mut encoded = rlp::encode(&vec![1u8, 2, 3]).to_vec();
        encoded.push(0x00);
        assert_eq!(
            decode_exact::<Vec<u8>>(&encoded),
            Err(DecoderError::RlpInconsistentLengthAndData)
        );
    }

    #[test]
    fn test_header_wrong_field_count() {
        let mut stream = RlpStream::new_list(2);
        stream.append(&1u64).append(&2u64);
        assert_eq!(
            decode_exact::<BlockHeader>(&stream.out()),
            Err(DecoderError::RlpIncorrectListLen)
        );
    }

    #[test]
    fn test_short_hash_is_six_hex_chars() {
        let header = sample_header(1);
        let short = header.short_hash();
        assert_eq!(short.len(), 6);
        assert!(hex::encode(header.hash()).starts_with(&short));
    }

    #[test]
    fn test_wrapper_sent_by() {
        let alice = NodeId::new(vec![0xA1; 64]);
        let bob = NodeId::new(vec![0xB0; 64]);
        let wrapper = BlockHeaderWrapper::new(sample_header(5), alice.clone());

        assert!(wrapper.sent_by(&alice));
        assert!(!wrapper.sent_by(&bob));
        // Querying twice has no side effect.
        assert!(!wrapper.sent_by(&bob));
        assert_eq!(wrapper.number(), 5);
    }

    #[test]
    fn test_wrapper_roundtrip_keeps_senders() {
        let senders = [NodeId::new(vec![2]), NodeId::new(vec![1])];
        let wrapper = BlockHeaderWrapper::with_senders(sample_header(9), senders.clone());
        let decoded: BlockHeaderWrapper = decode_exact(&rlp::encode(&wrapper)).unwrap();
        assert_eq!(decoded, wrapper);
        assert!(senders.iter().all(|s| decoded.sent_by(s)));
    }

    #[test]
    fn test_difficulty_wider_than_u256() {
        let mut bytes = vec![0x01];
        bytes.extend_from_slice(&[0u8; 32]);
        let wide = Difficulty::from_be_bytes(bytes.clone());

        assert_eq!(wide.to_u256(), None);
        assert!(wide > Difficulty::from(U256::MAX));

        let decoded: Difficulty = decode_exact(&rlp::encode(&wide)).unwrap();
        assert_eq!(decoded.as_be_bytes(), bytes.as_slice());
    }

    #[test]
    fn test_difficulty_leading_zeros_compare_by_value() {
        let padded = Difficulty::from_be_bytes(vec![0x00, 0x00, 0x07]);

        assert_eq!(padded, Difficulty::from(7u64));
        assert_eq!(padded, U256::from(7u64));
        assert_eq!(format!("{:x}", padded), "000007");
        assert_eq!(padded.significant_bytes(), &[0x07]);
    }

    #[test]
    fn test_difficulty_from_u256_is_minimal() {
        assert!(Difficulty::from(U256::zero()).as_be_bytes().is_empty());
        assert!(Difficulty::default().is_zero());
        assert_eq!(Difficulty::from(0x0102u64).as_be_bytes(), &[0x01, 0x02]);
        assert_eq!(rlp::encode(&Difficulty::from(0u64)).to_vec(), vec![0x80]);
    }

    #[test]
    fn test_node_id_display() {
        let id = NodeId::new(vec![0xde, 0xad, 0xbe, 0xef, 0x01]);
        assert_eq!(id.to_string(), "deadbeef01");
        assert_eq!(id.short(), "deadbeef");
    }

    #[test]
    fn test_header_serde_json() {
        let header = sample_header(12);
        let json = serde_json::to_string(&header).unwrap();
        let back: BlockHeader = serde_json::from_str(&json).unwrap();
        assert_eq!(back, header);
    }
}
