//! Boardsync: ordering and synchronization engine for kanban boards.
//!
//! This crate keeps a client-side cache of a board's lists and tasks,
//! turns drag gestures into dense order assignments, filters what is shown,
//! and reconciles every change with an authoritative remote store.
//!
//! # Architecture
//!
//! Boardsync follows hexagonal architecture principles:
//!
//! - **Domain**: Pure ordering and filtering logic with no I/O
//! - **Ports**: Abstract trait interfaces for the remote store and gestures
//! - **Adapters**: Concrete store implementations (HTTP, in-memory)
//! - **Services**: Cache, drag state machine, sync coordination
//!
//! # Modules
//!
//! - [`board`]: Board cache, ordering engine and sync coordinator

pub mod board;
