//! Geographic helpers for placing things on the globe.

/// Latitude/longitude to sphere projection, its inverse and surface orientation.
pub mod projection;
