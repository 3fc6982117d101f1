//! Geo-marker construction.
//!
//! Turns resource and project records into positioned, pickable marker
//! hierarchies whose look depends on the record's status.

/// Spawning and rebuilding marker entities.
pub mod factory;

/// Record types and the current input lists.
pub mod records;

/// Status classification and the per-status visual table.
pub mod visual;
