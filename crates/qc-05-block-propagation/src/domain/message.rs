//! Eth wire message codes and the common message contract.

use std::fmt;

use shared_types::rlp::{DecoderError, Rlp};

use crate::events::MessageDecodeError;

/// Message codes of the eth sub-protocol (versions 62 and 63).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum EthMessageCode {
    /// Handshake: protocol version, network id, total difficulty, best hash
    Status = 0x00,
    /// Hashes and numbers of newly available blocks
    NewBlockHashes = 0x01,
    /// Transactions to include in the pool
    Transactions = 0x02,
    /// Request for a range of headers
    GetBlockHeaders = 0x03,
    /// Headers answering `GetBlockHeaders`
    BlockHeaders = 0x04,
    /// Request for block bodies by hash
    GetBlockBodies = 0x05,
    /// Bodies answering `GetBlockBodies`
    BlockBodies = 0x06,
    /// Full block plus total difficulty
    NewBlock = 0x07,
    /// Request for state trie nodes
    GetNodeData = 0x0d,
    /// Trie nodes answering `GetNodeData`
    NodeData = 0x0e,
    /// Request for receipts by block hash
    GetReceipts = 0x0f,
    /// Receipts answering `GetReceipts`
    Receipts = 0x10,
}

impl EthMessageCode {
    /// Every known code, in wire order.
    pub const ALL: [Self; 12] = [
        Self::Status,
        Self::NewBlockHashes,
        Self::Transactions,
        Self::GetBlockHeaders,
        Self::BlockHeaders,
        Self::GetBlockBodies,
        Self::BlockBodies,
        Self::NewBlock,
        Self::GetNodeData,
        Self::NodeData,
        Self::GetReceipts,
        Self::Receipts,
    ];

    /// Wire value.
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Code of the message that answers this one, if it is a request.
    pub const fn answer(self) -> Option<Self> {
        match self {
            Self::GetBlockHeaders => Some(Self::BlockHeaders),
            Self::GetBlockBodies => Some(Self::BlockBodies),
            Self::GetNodeData => Some(Self::NodeData),
            Self::GetReceipts => Some(Self::Receipts),
            _ => None,
        }
    }

    /// Protocol name, as printed in logs.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Status => "STATUS",
            Self::NewBlockHashes => "NEW_BLOCK_HASHES",
            Self::Transactions => "TRANSACTIONS",
            Self::GetBlockHeaders => "GET_BLOCK_HEADERS",
            Self::BlockHeaders => "BLOCK_HEADERS",
            Self::GetBlockBodies => "GET_BLOCK_BODIES",
            Self::BlockBodies => "BLOCK_BODIES",
            Self::NewBlock => "NEW_BLOCK",
            Self::GetNodeData => "GET_NODE_DATA",
            Self::NodeData => "NODE_DATA",
            Self::GetReceipts => "GET_RECEIPTS",
            Self::Receipts => "RECEIPTS",
        }
    }
}

impl TryFrom<u8> for EthMessageCode {
    type Error = MessageDecodeError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|candidate| candidate.as_u8() == code)
            .ok_or(MessageDecodeError::UnknownMessageCode(code))
    }
}

impl From<EthMessageCode> for u8 {
    fn from(code: EthMessageCode) -> Self {
        code.as_u8()
    }
}

impl fmt::Display for EthMessageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An eth message with a canonical wire encoding.
pub trait EthMessage: fmt::Display + Send + Sync {
    /// Discriminant of this message type.
    fn code(&self) -> EthMessageCode;

    /// Canonical RLP payload.
    fn encoded(&self) -> &[u8];

    /// Code of the expected reply, `None` for announcements.
    fn answer_code(&self) -> Option<EthMessageCode> {
        self.code().answer()
    }
}

/// Open `bytes` as a single top-level RLP list with nothing trailing it.
pub(crate) fn open_list(bytes: &[u8]) -> Result<Rlp<'_>, MessageDecodeError> {
    let rlp = Rlp::new(bytes);
    if !rlp.is_list() {
        return Err(DecoderError::RlpExpectedToBeList.into());
    }
    if rlp.payload_info()?.total() != bytes.len() {
        return Err(DecoderError::RlpInconsistentLengthAndData.into());
    }
    Ok(rlp)
}
