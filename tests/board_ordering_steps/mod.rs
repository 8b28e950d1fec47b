//! Step definitions for board ordering scenarios.

mod given;
mod then;
mod when;
pub mod world;
