use bevy::prelude::*;
use constants::coordinate_system::{AZIMUTH_OFFSET_DEG, POLAR_ANGLE_OFFSET_DEG};
use serde::{Deserialize, Serialize};

/// Latitude/longitude pair in degrees. Values are not range-checked; anything
/// outside [-90, 90] x [-180, 180] still projects to a point on the sphere.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Geographic to Cartesian, Y-up, with (0, 0) on +X and east towards -Z.
pub fn project(point: GeoPoint, radius: f32) -> Vec3 {
    let r = radius as f64;
    let phi = (POLAR_ANGLE_OFFSET_DEG - point.latitude).to_radians();
    let theta = (point.longitude + AZIMUTH_OFFSET_DEG).to_radians();

    Vec3::new(
        (-r * phi.sin() * theta.cos()) as f32,
        (r * phi.cos()) as f32,
        (r * phi.sin() * theta.sin()) as f32,
    )
}

/// Inverse of [`project`]. Longitude is undefined at the poles and comes back
/// as whatever `atan2` gives for a zero-length horizontal component.
pub fn unproject(position: Vec3) -> GeoPoint {
    let p = position.as_dvec3();
    let r = p.length();
    if r == 0.0 {
        return GeoPoint::new(0.0, 0.0);
    }

    let phi = (p.y / r).clamp(-1.0, 1.0).acos();
    let theta = p.z.atan2(-p.x);

    let latitude = POLAR_ANGLE_OFFSET_DEG - phi.to_degrees();
    let mut longitude = theta.to_degrees() - AZIMUTH_OFFSET_DEG;
    if longitude <= -180.0 {
        longitude += 360.0;
    }
    if longitude > 180.0 {
        longitude -= 360.0;
    }

    GeoPoint::new(latitude, longitude)
}

/// Point a marker would look at to face away from the globe centre.
pub fn look_target(position: Vec3) -> Vec3 {
    position * 2.0
}

/// Rotation taking local +Y onto the outward surface normal at `position`,
/// so a Y-up marker stands upright on the globe.
pub fn surface_orientation(position: Vec3) -> Quat {
    let normal = (look_target(position) - position).normalize_or_zero();
    if normal == Vec3::ZERO {
        return Quat::IDENTITY;
    }
    Quat::from_rotation_arc(Vec3::Y, normal)
}
