//! Interactive tools operating on the rendered globe.

/// Click-to-record picking against marker meshes.
pub mod picking;
