//! Core application setup and state management.
//!
//! Handles the mount lifecycle, window configuration, runtime settings and
//! the context that owns everything a mounted globe creates.

/// Application setup and plugin configuration for the Bevy engine.
///
/// Creates the main app with asset loading, scene, animation and picking
/// systems, plus platform-specific configurations.
pub mod app_setup;

/// Application state machine and lifecycle transitions.
///
/// Moves from loading to running, and between running and stopped on request.
pub mod app_state;

/// Mount-scoped ownership of entities and GPU resources, and teardown.
pub mod context;

/// Runtime tunables with compiled-in defaults and validation.
pub mod settings;

/// Platform-specific window configuration for native and WASM builds.
///
/// Configures canvas integration for web targets and vsync settings.
pub mod window_config;
