//! Runtime diagnostics and native overlays.
//!
//! Sends frame rate updates to the host and, on native builds, mirrors the
//! frame rate and the last selection in on-screen text.

/// FPS tracking and notification systems for performance monitoring.
///
/// Sends frame rate updates to frontend via RPC and updates native UI overlays.
pub mod fps_tracking;

/// Native overlay naming the last clicked marker.
pub mod selection_overlay;
