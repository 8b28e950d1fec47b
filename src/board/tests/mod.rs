//! Unit tests for the board module.
//!
//! Tests are organised by component: domain values, ordering algorithms,
//! filters, the drag state machine, synchronization and list lifecycle.

mod support;
