//! Shared defaults for the globe render engine.

pub mod coordinate_system;
pub mod path;
pub mod render_settings;
pub mod texture;
