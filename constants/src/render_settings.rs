/// Camera-to-target distance below which the day material is shown.
pub const DAY_DISTANCE: f32 = 2.2;

/// Camera-to-target distance above which the night material is shown.
/// Between the two the current material is kept.
pub const NIGHT_DISTANCE: f32 = 2.8;

/// Cloud shell spin in radians per second.
pub const CLOUD_ROTATION_SPEED: f32 = 0.02;

/// Relative size change of a pulsing marker.
pub const PULSE_AMPLITUDE: f32 = 0.12;

/// Pulse angular speed in radians per second.
pub const PULSE_SPEED: f32 = 2.6;

/// Fraction of orbit velocity removed each frame.
pub const CAMERA_DAMPING: f32 = 0.08;

pub const CAMERA_MIN_DISTANCE: f32 = 1.35;
pub const CAMERA_MAX_DISTANCE: f32 = 6.0;
pub const CAMERA_START_DISTANCE: f32 = 3.2;

/// Idle spin of the camera around the globe in radians per second.
pub const AUTO_ROTATE_SPEED: f32 = 0.05;

/// Pointer travel (logical pixels) between press and release that still
/// counts as a click rather than an orbit drag.
pub const PICK_DRAG_TOLERANCE: f32 = 4.0;
