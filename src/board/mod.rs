//! Kanban board ordering and synchronization.
//!
//! The board keeps a client-side cache of lists and tasks, applies drag and
//! edit operations to it optimistically, and reconciles with an
//! authoritative remote store. Any failed remote call is recovered by
//! reloading the whole board.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
