//! Orbit camera for globe navigation.
//!
//! Provides damped drag rotation, clamped zoom, idle auto-rotation and
//! animated focusing on a geographic location.

/// Orbit camera resource and controller system.
pub mod globe_camera;
