use bevy::prelude::*;

/// Local-space volume tested against a pick ray.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub enum PickVolume {
    Sphere(f32),
    /// Full edge lengths of a box centred on the part origin.
    Box(Vec3),
}

/// Intersects a world ray with `volume` placed by `xf`. The ray is moved into
/// the part's local frame with the inverse affine, which keeps `t` in world
/// units as long as `dir` is normalised.
pub fn ray_hits_volume(
    origin: Vec3,
    dir: Vec3,
    xf: &GlobalTransform,
    volume: PickVolume,
) -> Option<f32> {
    let inv = xf.compute_matrix().inverse();
    let o_local = inv.transform_point3(origin);
    let d_local = inv.transform_vector3(dir);
    match volume {
        PickVolume::Sphere(radius) => ray_sphere_hit_t(o_local, d_local, radius),
        PickVolume::Box(size) => {
            let he = size * 0.5;
            ray_aabb_hit_t(o_local, d_local, -he, he)
        }
    }
}

// Slab-method ray–AABB intersection, returns Some(t) or None
pub fn ray_aabb_hit_t(
    ray_origin: Vec3,
    ray_direction: Vec3,
    min: Vec3,
    max: Vec3,
) -> Option<f32> {
    let inv = ray_direction.map(|d| if d != 0.0 { 1.0 / d } else { f32::INFINITY });

    let (mut tmin, mut tmax) = slab(ray_origin.x, inv.x, min.x, max.x)?;

    let (tymin, tymax) = slab(ray_origin.y, inv.y, min.y, max.y)?;
    if tmin > tymax || tymin > tmax {
        return None;
    }
    tmin = tmin.max(tymin);
    tmax = tmax.min(tymax);

    let (tzmin, tzmax) = slab(ray_origin.z, inv.z, min.z, max.z)?;
    if tmin > tzmax || tzmin > tmax {
        return None;
    }
    tmin = tmin.max(tzmin);
    tmax = tmax.min(tzmax);

    if tmax < 0.0 {
        return None;
    }
    Some(if tmin >= 0.0 { tmin } else { tmax })
}

// Entry/exit along one axis. A ray parallel to the slab either always or
// never overlaps it.
fn slab(origin: f32, inv_dir: f32, min: f32, max: f32) -> Option<(f32, f32)> {
    if inv_dir.is_infinite() {
        return if origin >= min && origin <= max {
            Some((f32::NEG_INFINITY, f32::INFINITY))
        } else {
            None
        };
    }
    let (a, b) = ((min - origin) * inv_dir, (max - origin) * inv_dir);
    Some(if a > b { (b, a) } else { (a, b) })
}

/// Nearest non-negative hit of a ray with a sphere at the origin. A ray that
/// starts inside returns the exit distance.
pub fn ray_sphere_hit_t(ray_origin: Vec3, ray_direction: Vec3, radius: f32) -> Option<f32> {
    let a = ray_direction.length_squared();
    if a == 0.0 {
        return None;
    }
    let b = 2.0 * ray_origin.dot(ray_direction);
    let c = ray_origin.length_squared() - radius * radius;
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return None;
    }
    let sqrt_disc = disc.sqrt();
    let t0 = (-b - sqrt_disc) / (2.0 * a);
    let t1 = (-b + sqrt_disc) / (2.0 * a);
    if t1 < 0.0 {
        return None;
    }
    Some(if t0 >= 0.0 { t0 } else { t1 })
}
