//! Loading pipeline for a globe mount.
//!
//! Runs from settings and bundled records through scene creation and texture
//! resolution, tracking each stage for the host's progress display.

/// Settings and bundled record loading from JSON assets.
///
/// Falls back to compiled-in defaults when a file is missing or invalid.
pub mod asset_loader;

/// Loading progress tracking resource for state transitions.
///
/// Monitors settings, records, scene creation and texture resolution.
pub mod progress;

/// Day, night and cloud texture state monitoring.
///
/// A texture that fails to load degrades its surface to an untextured one.
pub mod texture_loader;
