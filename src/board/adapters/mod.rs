//! Adapter implementations for board ports.

pub mod http;
pub mod memory;
