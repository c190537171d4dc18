//! P2P message types for Block Propagation subsystem.

use std::fmt;

use crate::domain::{BlockHeadersMessage, EthMessage, EthMessageCode, NewBlockMessage};
use crate::events::MessageDecodeError;

/// Inbound eth messages this subsystem consumes.
#[derive(Clone, Debug)]
pub enum InboundMessage {
    /// Block announcement
    NewBlock(NewBlockMessage),
    /// Header reply
    BlockHeaders(BlockHeadersMessage),
}

impl InboundMessage {
    /// Map a wire code to its decoder.
    ///
    /// Decoding itself stays lazy; only the code is validated here.
    pub fn route(code: u8, payload: Vec<u8>) -> Result<Self, MessageDecodeError> {
        match EthMessageCode::try_from(code)? {
            EthMessageCode::NewBlock => Ok(Self::NewBlock(NewBlockMessage::from_encoded(payload))),
            EthMessageCode::BlockHeaders => {
                Ok(Self::BlockHeaders(BlockHeadersMessage::from_encoded(payload)))
            }
            other => Err(MessageDecodeError::UnsupportedMessage(other)),
        }
    }

    fn inner(&self) -> &dyn EthMessage {
        match self {
            Self::NewBlock(message) => message,
            Self::BlockHeaders(message) => message,
        }
    }
}

impl EthMessage for InboundMessage {
    fn code(&self) -> EthMessageCode {
        self.inner().code()
    }

    fn encoded(&self) -> &[u8] {
        self.inner().encoded()
    }

    fn answer_code(&self) -> Option<EthMessageCode> {
        self.inner().answer_code()
    }
}

impl fmt::Display for InboundMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.inner(), f)
    }
}
