//! Globe scene construction.
//!
//! Builds the camera, lights, textured globe and cloud shell for one mount
//! and records every asset it creates for release on teardown.

/// Globe and cloud meshes, materials, lighting and camera spawning.
pub mod globe;
