//! Security invariants for inbound messages.

use super::PropagationConfig;
use crate::events::MessageDecodeError;

/// INVARIANT: Size Limit
/// No payload larger than `max_message_size_bytes` reaches a decoder.
pub fn invariant_size_limit(payload_size: usize, config: &PropagationConfig) -> bool {
    payload_size <= config.max_message_size_bytes
}

/// Check an inbound payload before routing it.
pub fn check_payload_size(
    payload_size: usize,
    config: &PropagationConfig,
) -> Result<(), MessageDecodeError> {
    if !invariant_size_limit(payload_size, config) {
        return Err(MessageDecodeError::PayloadTooLarge {
            size: payload_size,
            max: config.max_message_size_bytes,
        });
    }
    Ok(())
}
