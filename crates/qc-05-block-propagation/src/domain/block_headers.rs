//! `BLOCK_HEADERS` (0x04): the reply to `GET_BLOCK_HEADERS`, a flat RLP
//! list of headers. Decoded lazily, like [`super::NewBlockMessage`].

use std::fmt;
use std::sync::OnceLock;

use shared_types::rlp;
use shared_types::{BlockHeader, BlockHeaderWrapper, NodeId};

use super::message::{open_list, EthMessage, EthMessageCode};
use crate::events::MessageDecodeError;

/// Block headers message.
#[derive(Clone, Debug)]
pub struct BlockHeadersMessage {
    encoded: Vec<u8>,
    parsed: OnceLock<Result<Vec<BlockHeader>, MessageDecodeError>>,
}

impl BlockHeadersMessage {
    /// Message discriminant.
    pub const CODE: EthMessageCode = EthMessageCode::BlockHeaders;

    /// Build a reply carrying `headers`.
    pub fn new(headers: Vec<BlockHeader>) -> Self {
        Self {
            encoded: rlp::encode_list::<BlockHeader, BlockHeader>(&headers).to_vec(),
            parsed: OnceLock::from(Ok(headers)),
        }
    }

    /// Wrap a payload received from a peer.
    pub fn from_encoded(encoded: impl Into<Vec<u8>>) -> Self {
        Self {
            encoded: encoded.into(),
            parsed: OnceLock::new(),
        }
    }

    /// The carried headers, in payload order.
    pub fn headers(&self) -> Result<&[BlockHeader], MessageDecodeError> {
        self.parsed
            .get_or_init(|| parse(&self.encoded))
            .as_ref()
            .map(Vec::as_slice)
            .map_err(Clone::clone)
    }

    /// Consume the message and attribute every header to `node_id`.
    pub fn into_wrappers(self, node_id: &NodeId) -> Result<Vec<BlockHeaderWrapper>, MessageDecodeError> {
        let headers = match self.parsed.into_inner() {
            Some(parsed) => parsed?,
            None => parse(&self.encoded)?,
        };
        Ok(headers
            .into_iter()
            .map(|header| BlockHeaderWrapper::new(header, node_id.clone()))
            .collect())
    }
}

impl EthMessage for BlockHeadersMessage {
    fn code(&self) -> EthMessageCode {
        Self::CODE
    }

    fn encoded(&self) -> &[u8] {
        &self.encoded
    }
}

impl fmt::Display for BlockHeadersMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.headers() {
            Ok(headers) => match (headers.first(), headers.last()) {
                (Some(first), Some(last)) => write!(
                    f,
                    "{} [ count: {} range: {}..{} ]",
                    Self::CODE,
                    headers.len(),
                    first.number,
                    last.number
                ),
                _ => write!(f, "{} [ empty ]", Self::CODE),
            },
            Err(err) => write!(f, "{} [ malformed: {} ]", Self::CODE, err),
        }
    }
}

fn parse(bytes: &[u8]) -> Result<Vec<BlockHeader>, MessageDecodeError> {
    Ok(open_list(bytes)?.as_list()?)
}
