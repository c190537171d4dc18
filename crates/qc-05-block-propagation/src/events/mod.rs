//! Events and error types for Block Propagation subsystem.

use shared_types::rlp::DecoderError;
use thiserror::Error;

use crate::domain::EthMessageCode;

pub mod p2p;

pub use p2p::*;

/// Errors raised while decoding an inbound eth message.
///
/// `Clone` because lazily decoded messages cache the outcome of their first
/// decode, failures included.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MessageDecodeError {
    /// Corrupt RLP framing or an undecodable field.
    #[error("Malformed RLP: {0}")]
    Rlp(#[from] DecoderError),

    /// Top-level list with the wrong number of elements.
    #[error("{message} payload has {found} elements (expected {expected})")]
    WrongItemCount {
        /// Message being decoded
        message: EthMessageCode,
        /// Elements the message requires
        expected: usize,
        /// Elements actually present
        found: usize,
    },

    /// Wire code outside the eth message set.
    #[error("Unknown eth message code: {0:#04x}")]
    UnknownMessageCode(u8),

    /// Valid eth message this subsystem does not consume.
    #[error("Unsupported message: {0}")]
    UnsupportedMessage(EthMessageCode),

    /// Payload exceeds the configured size limit.
    #[error("Payload too large: {size} bytes (max: {max})")]
    PayloadTooLarge {
        /// Payload size in bytes
        size: usize,
        /// Configured limit
        max: usize,
    },
}

impl MessageDecodeError {
    /// Returns `true` if the sending peer broke the protocol and should be
    /// penalized. Messages we merely do not handle are not violations.
    pub fn is_protocol_violation(&self) -> bool {
        !matches!(self, Self::UnsupportedMessage(_))
    }
}
