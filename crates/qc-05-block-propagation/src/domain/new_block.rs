//! # NewBlock Announcement
//!
//! `NEW_BLOCK` (0x07) broadcasts a freshly produced block together with the
//! announcer's total difficulty:
//!
//! ```text
//! rlp([block, difficulty])
//! ```
//!
//! The encoded payload is the canonical form. A message built locally is
//! encoded once at construction; a message received from the wire keeps its
//! bytes and decodes them on first access, exactly once, caching the
//! outcome for every later reader.

use std::fmt;
use std::sync::OnceLock;

use shared_types::rlp::RlpStream;
use shared_types::{Block, Difficulty};

use super::message::{open_list, EthMessage, EthMessageCode};
use crate::events::MessageDecodeError;

/// Elements in a `NEW_BLOCK` payload.
const NEW_BLOCK_ITEMS: usize = 2;

#[derive(Clone, Debug, PartialEq, Eq)]
struct NewBlockParts {
    block: Block,
    difficulty: Difficulty,
}

/// Block announcement message.
#[derive(Clone, Debug)]
pub struct NewBlockMessage {
    encoded: Vec<u8>,
    parsed: OnceLock<Result<NewBlockParts, MessageDecodeError>>,
}

impl NewBlockMessage {
    /// Message discriminant.
    pub const CODE: EthMessageCode = EthMessageCode::NewBlock;

    /// Build an announcement for a local block.
    pub fn new(block: Block, difficulty: impl Into<Difficulty>) -> Self {
        let difficulty = difficulty.into();
        let mut stream = RlpStream::new_list(NEW_BLOCK_ITEMS);
        stream.append(&block);
        stream.append(&difficulty);

        Self {
            encoded: stream.out().to_vec(),
            parsed: OnceLock::from(Ok(NewBlockParts { block, difficulty })),
        }
    }

    /// Wrap a payload received from a peer. Nothing is parsed yet.
    pub fn from_encoded(encoded: impl Into<Vec<u8>>) -> Self {
        Self {
            encoded: encoded.into(),
            parsed: OnceLock::new(),
        }
    }

    /// Force the lazy decode and report whether the payload is well formed.
    pub fn decode(&self) -> Result<(), MessageDecodeError> {
        self.parts().map(|_| ())
    }

    /// Returns `true` once the payload has been parsed (successfully or not).
    pub fn is_parsed(&self) -> bool {
        self.parsed.get().is_some()
    }

    /// The announced block.
    pub fn block(&self) -> Result<&Block, MessageDecodeError> {
        self.parts().map(|parts| &parts.block)
    }

    /// The announced difficulty as an unsigned integer of any width. Never
    /// sign-extended: a payload byte of `0x80` reads as 128.
    pub fn difficulty(&self) -> Result<&Difficulty, MessageDecodeError> {
        self.parts().map(|parts| &parts.difficulty)
    }

    /// The difficulty bytes exactly as carried in the payload.
    pub fn difficulty_bytes(&self) -> Result<&[u8], MessageDecodeError> {
        self.difficulty().map(Difficulty::as_be_bytes)
    }

    /// Consume the message, yielding the block and the difficulty.
    pub fn into_parts(self) -> Result<(Block, Difficulty), MessageDecodeError> {
        let parts = match self.parsed.into_inner() {
            Some(parsed) => parsed?,
            None => parse(&self.encoded)?,
        };
        Ok((parts.block, parts.difficulty))
    }

    fn parts(&self) -> Result<&NewBlockParts, MessageDecodeError> {
        self.parsed
            .get_or_init(|| parse(&self.encoded))
            .as_ref()
            .map_err(Clone::clone)
    }
}

impl PartialEq for NewBlockMessage {
    fn eq(&self, other: &Self) -> bool {
        self.encoded == other.encoded
    }
}

impl Eq for NewBlockMessage {}

impl EthMessage for NewBlockMessage {
    fn code(&self) -> EthMessageCode {
        Self::CODE
    }

    fn encoded(&self) -> &[u8] {
        &self.encoded
    }

    fn answer_code(&self) -> Option<EthMessageCode> {
        None
    }
}

impl fmt::Display for NewBlockMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.parts() {
            Ok(parts) => write!(
                f,
                "{} [ number: {} hash:{} difficulty: {:x} ]",
                Self::CODE,
                parts.block.number(),
                parts.block.short_hash(),
                parts.difficulty,
            ),
            Err(err) => write!(f, "{} [ malformed: {} ]", Self::CODE, err),
        }
    }
}

fn parse(bytes: &[u8]) -> Result<NewBlockParts, MessageDecodeError> {
    let rlp = open_list(bytes)?;
    let found = rlp.item_count()?;
    if found != NEW_BLOCK_ITEMS {
        return Err(MessageDecodeError::WrongItemCount {
            message: NewBlockMessage::CODE,
            expected: NEW_BLOCK_ITEMS,
            found,
        });
    }

    Ok(NewBlockParts {
        block: rlp.val_at(0)?,
        difficulty: rlp.val_at(1)?,
    })
}
