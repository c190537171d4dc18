//! Hexagonal architecture ports for Block Propagation subsystem.

pub mod inbound;
pub mod outbound;
