//! # Domain Layer for Block Propagation
//!
//! Pure business logic with no I/O dependencies. This is the innermost layer
//! of the hexagonal architecture.
//!
//! ## Contents
//!
//! - **message**: Eth wire codes (`EthMessageCode`) and the `EthMessage` trait
//! - **new_block**: `NewBlockMessage`, the block announcement codec
//! - **block_headers**: `BlockHeadersMessage`, the header reply codec
//! - **value_objects**: Configuration and results (`PropagationConfig`, `IngestOutcome`)
//! - **invariants**: Security invariant checks (payload size)
//!
//! ## Design Principles
//!
//! 1. **No I/O**: All functions are pure and synchronous
//! 2. **Lazy decoding**: Inbound payloads are parsed once, on first access
//! 3. **Testable**: All logic can be unit tested without mocks

mod block_headers;
mod invariants;
mod message;
mod new_block;
mod value_objects;

pub use block_headers::*;
pub use invariants::*;
pub use message::{EthMessage, EthMessageCode};
pub use new_block::*;
pub use value_objects::*;
