/// Radius of the rendered globe in world units. Every other distance in the
/// scene is expressed relative to this.
pub const GLOBE_RADIUS: f32 = 1.0;

/// Radius of the cloud shell, slightly above the surface.
pub const CLOUD_RADIUS: f32 = GLOBE_RADIUS * 1.012;

/// Height of a marker's anchor above the surface.
pub const MARKER_SURFACE_OFFSET: f32 = 0.004;

/// Edge length of an unscaled marker before the status multiplier.
pub const MARKER_BASE_SIZE: f32 = 0.035;

/// Latitude added to the polar angle: `phi = (90 - lat)`.
pub const POLAR_ANGLE_OFFSET_DEG: f64 = 90.0;

/// Longitude added to the azimuth: `theta = (lon + 180)`.
pub const AZIMUTH_OFFSET_DEG: f64 = 180.0;
