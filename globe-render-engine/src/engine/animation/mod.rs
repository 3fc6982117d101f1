//! Per-frame animation of the mounted globe.
//!
//! Every system here is gated on the globe running, so nothing animates
//! before the scene exists or after teardown.

/// Cloud shell rotation.
pub mod clouds;

/// Distance-driven switch between the day and night surfaces.
///
/// Uses a hysteresis band so the surface does not flicker at the threshold.
pub mod day_night;

/// Scale pulsing for markers whose status needs attention.
pub mod pulse;
