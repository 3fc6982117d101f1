use super::ray::{PickVolume, ray_hits_volume, ray_sphere_hit_t};
use super::{PickMetadata, PickResult, PointerPress, RecordSelected};
use crate::engine::core::settings::GlobeSettings;
use crate::engine::markers::records::GlobeRecords;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

/// Window position (origin top-left, y down) to normalised device
/// coordinates (origin centre, y up).
pub fn pointer_to_ndc(cursor: Vec2, viewport: Vec2) -> Vec2 {
    Vec2::new(
        (cursor.x / viewport.x) * 2.0 - 1.0,
        -(cursor.y / viewport.y) * 2.0 + 1.0,
    )
}

/// Ray through `ndc` for a camera with the given projection and placement.
/// Uses Bevy's reversed-Z convention: the near plane sits at depth 1.
pub fn ray_from_ndc(
    ndc: Vec2,
    clip_from_view: Mat4,
    camera_transform: &GlobalTransform,
) -> Option<Ray3d> {
    let world_from_clip = camera_transform.compute_matrix() * clip_from_view.inverse();
    let near = world_from_clip.project_point3(ndc.extend(1.0));
    let far = world_from_clip.project_point3(ndc.extend(f32::EPSILON));
    if !near.is_finite() || !far.is_finite() {
        return None;
    }
    let direction = Dir3::new(far - near).ok()?;
    Some(Ray3d::new(near, direction))
}

/// Distance at which `ray` enters a globe of `radius` at the origin, or
/// infinity when it misses. Markers beyond it are on the far side.
pub fn globe_occlusion_distance(ray: Ray3d, radius: f32) -> f32 {
    ray_sphere_hit_t(ray.origin, ray.direction.as_vec3(), radius).unwrap_or(f32::INFINITY)
}

/// Nearest marker part along `ray` closer than `max_t`. Equal distances keep
/// the candidate seen first, so overlapping markers resolve the same way
/// every click.
pub fn resolve_nearest<'a, I>(ray: Ray3d, candidates: I, max_t: f32) -> Option<PickResult>
where
    I: IntoIterator<Item = (&'a PickMetadata, &'a GlobalTransform, &'a PickVolume)>,
{
    let origin = ray.origin;
    let dir = ray.direction.as_vec3();

    let mut best: Option<(&PickMetadata, f32)> = None;
    for (meta, xf, volume) in candidates {
        let Some(t) = ray_hits_volume(origin, dir, xf, *volume) else {
            continue;
        };
        if t < 0.0 || t > max_t {
            continue;
        }
        if best.is_none_or(|(_, best_t)| t < best_t) {
            best = Some((meta, t));
        }
    }

    best.map(|(meta, _)| PickResult {
        entity_id: meta.entity_id.clone(),
        entity_kind: meta.entity_kind,
    })
}

/// Resolves a left click (press and release without dragging) to a record.
pub fn pick_marker_on_click(
    buttons: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&GlobalTransform, &Camera), With<Camera3d>>,
    parts: Query<(&PickMetadata, &GlobalTransform, &PickVolume)>,
    records: Res<GlobeRecords>,
    settings: Res<GlobeSettings>,
    mut press: ResMut<PointerPress>,
    mut selected: EventWriter<RecordSelected>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let cursor = window.cursor_position();

    if buttons.just_pressed(MouseButton::Left) {
        press.position = cursor;
        return;
    }
    if !buttons.just_released(MouseButton::Left) {
        return;
    }

    let Some(pressed_at) = press.position.take() else {
        return;
    };
    let Some(cursor) = cursor else {
        return;
    };
    if pressed_at.distance(cursor) > settings.pick_drag_tolerance {
        return;
    }

    let Ok((cam_xf, camera)) = cameras.single() else {
        return;
    };

    let viewport = camera
        .logical_viewport_size()
        .unwrap_or_else(|| window.size());
    let ndc = pointer_to_ndc(cursor, viewport);
    let Some(ray) = ray_from_ndc(ndc, camera.clip_from_view(), cam_xf) else {
        return;
    };

    let max_t = globe_occlusion_distance(ray, settings.globe_radius);
    let Some(hit) = resolve_nearest(ray, parts.iter(), max_t) else {
        debug!("Pick at {:?} hit no marker", cursor);
        return;
    };

    match records.find(hit.entity_kind, &hit.entity_id) {
        Some(record) => {
            info!("Selected {} '{}' ({})", hit.entity_kind.as_str(), record.name, record.id);
            selected.write(RecordSelected {
                kind: hit.entity_kind,
                record: record.clone(),
            });
        }
        None => {
            debug!(
                "Picked {} id {} no longer resolves to a unique record",
                hit.entity_kind.as_str(),
                hit.entity_id
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::markers::records::{EntityKind, GlobeRecord};
    use bevy::ecs::system::RunSystemOnce;

    fn meta(id: &str) -> PickMetadata {
        PickMetadata {
            entity_id: id.to_string(),
            entity_kind: EntityKind::Resource,
            name: id.to_string(),
        }
    }

    fn camera_at(z: f32) -> (Mat4, GlobalTransform) {
        let clip_from_view =
            Mat4::perspective_infinite_reverse_rh(std::f32::consts::FRAC_PI_4, 1.0, 0.1);
        let xf = GlobalTransform::from(
            Transform::from_xyz(0.0, 0.0, z).looking_at(Vec3::ZERO, Vec3::Y),
        );
        (clip_from_view, xf)
    }

    #[test]
    fn ndc_maps_corners_and_centre() {
        let viewport = Vec2::new(800.0, 600.0);
        assert_eq!(pointer_to_ndc(Vec2::new(400.0, 300.0), viewport), Vec2::ZERO);
        assert_eq!(pointer_to_ndc(Vec2::ZERO, viewport), Vec2::new(-1.0, 1.0));
        assert_eq!(pointer_to_ndc(viewport, viewport), Vec2::new(1.0, -1.0));
    }

    #[test]
    fn centre_ray_points_down_the_view_axis() {
        let (clip_from_view, xf) = camera_at(5.0);
        let ray = ray_from_ndc(Vec2::ZERO, clip_from_view, &xf).unwrap();
        assert!(ray.direction.as_vec3().distance(Vec3::NEG_Z) < 1e-4);
        assert!((ray.origin.z - 4.9).abs() < 1e-3);
    }

    #[test]
    fn empty_scene_yields_no_pick() {
        let (clip_from_view, xf) = camera_at(5.0);
        let ray = ray_from_ndc(Vec2::ZERO, clip_from_view, &xf).unwrap();
        let none: Vec<(&PickMetadata, &GlobalTransform, &PickVolume)> = Vec::new();
        assert!(resolve_nearest(ray, none, f32::INFINITY).is_none());
    }

    #[test]
    fn ray_missing_every_marker_yields_no_pick() {
        let (clip_from_view, xf) = camera_at(5.0);
        let ray = ray_from_ndc(Vec2::ZERO, clip_from_view, &xf).unwrap();
        let m = meta("off-axis");
        let at = GlobalTransform::from(Transform::from_xyz(3.0, 0.0, 0.0));
        let vol = PickVolume::Sphere(0.5);
        assert!(resolve_nearest(ray, [(&m, &at, &vol)], f32::INFINITY).is_none());
    }

    #[test]
    fn nearer_of_two_overlapping_markers_wins() {
        let (clip_from_view, xf) = camera_at(5.0);
        let ray = ray_from_ndc(Vec2::ZERO, clip_from_view, &xf).unwrap();

        let far = meta("far");
        let near = meta("near");
        let far_xf = GlobalTransform::from(Transform::from_xyz(0.0, 0.0, -1.0));
        let near_xf = GlobalTransform::from(Transform::from_xyz(0.0, 0.0, 1.0));
        let vol = PickVolume::Sphere(0.3);

        for _ in 0..3 {
            let candidates = [(&far, &far_xf, &vol), (&near, &near_xf, &vol)];
            let hit = resolve_nearest(ray, candidates, f32::INFINITY).unwrap();
            assert_eq!(hit.entity_id, "near");
            let candidates = [(&near, &near_xf, &vol), (&far, &far_xf, &vol)];
            let hit = resolve_nearest(ray, candidates, f32::INFINITY).unwrap();
            assert_eq!(hit.entity_id, "near");
        }
    }

    #[test]
    fn coincident_markers_keep_the_first_candidate() {
        let (clip_from_view, xf) = camera_at(5.0);
        let ray = ray_from_ndc(Vec2::ZERO, clip_from_view, &xf).unwrap();
        let a = meta("a");
        let b = meta("b");
        let at = GlobalTransform::from(Transform::from_xyz(0.0, 0.0, 0.0));
        let vol = PickVolume::Box(Vec3::splat(0.4));
        let candidates = [(&a, &at, &vol), (&b, &at, &vol)];
        let hit = resolve_nearest(ray, candidates, f32::INFINITY).unwrap();
        assert_eq!(hit.entity_id, "a");
    }

    #[test]
    fn off_centre_pointer_reaches_an_off_axis_marker() {
        let (clip_from_view, xf) = camera_at(5.0);
        let target = Vec3::new(1.0, 0.5, 0.0);
        let ndc = clip_from_view
            .mul_mat4(&xf.compute_matrix().inverse())
            .project_point3(target)
            .truncate();
        let ray = ray_from_ndc(ndc, clip_from_view, &xf).unwrap();
        let m = meta("side");
        let at = GlobalTransform::from(Transform::from_translation(target));
        let vol = PickVolume::Sphere(0.1);
        let hit = resolve_nearest(ray, [(&m, &at, &vol)], f32::INFINITY).unwrap();
        assert_eq!(hit.entity_id, "side");
    }

    #[test]
    fn markers_on_the_far_side_are_hidden_by_the_globe() {
        let (clip_from_view, xf) = camera_at(5.0);
        let ray = ray_from_ndc(Vec2::ZERO, clip_from_view, &xf).unwrap();
        let front = meta("front");
        let back = meta("back");
        let front_xf = GlobalTransform::from(Transform::from_xyz(0.0, 0.0, 1.05));
        let back_xf = GlobalTransform::from(Transform::from_xyz(0.0, 0.0, -1.05));
        let vol = PickVolume::Sphere(0.04);
        let max_t = globe_occlusion_distance(ray, 1.0);

        let candidates = [(&back, &back_xf, &vol), (&front, &front_xf, &vol)];
        let hit = resolve_nearest(ray, candidates, max_t);
        assert_eq!(hit.unwrap().entity_id, "front");
        assert!(resolve_nearest(ray, [(&back, &back_xf, &vol)], max_t).is_none());
    }

    fn site(id: &str) -> GlobeRecord {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": format!("Site {id}"),
            "latitude": 0.0,
            "longitude": 0.0,
        }))
        .unwrap()
    }

    /// A window, a camera on +Z looking at the globe and one marker part in
    /// front of it on the view axis. Without a render pass the camera keeps
    /// an identity projection, so the centre pixel's ray runs straight down
    /// the view axis.
    fn click_world(resources: Vec<GlobeRecord>) -> World {
        let mut world = World::new();
        world.insert_resource(ButtonInput::<MouseButton>::default());
        world.insert_resource(GlobeSettings::default());
        world.insert_resource(GlobeRecords {
            resources,
            projects: Vec::new(),
        });
        world.insert_resource(PointerPress::default());
        world.init_resource::<Events<RecordSelected>>();

        world.spawn((Window::default(), PrimaryWindow));
        world.spawn((
            Camera3d::default(),
            Camera::default(),
            GlobalTransform::from(
                Transform::from_xyz(0.0, 0.0, 5.0).looking_at(Vec3::ZERO, Vec3::Y),
            ),
        ));
        world.spawn((
            meta("r-1"),
            GlobalTransform::from(Transform::from_xyz(0.0, 0.0, 1.05)),
            PickVolume::Sphere(0.05),
        ));
        world
    }

    fn move_cursor(world: &mut World, position: Vec2) {
        let mut windows = world.query::<&mut Window>();
        for mut window in windows.iter_mut(world) {
            window.set_cursor_position(Some(position));
        }
    }

    fn centre(world: &mut World) -> Vec2 {
        let mut windows = world.query::<&Window>();
        windows.single(world).unwrap().size() / 2.0
    }

    /// Presses at `from`, releases at `to` and returns what was selected.
    fn click(world: &mut World, from: Vec2, to: Vec2) -> Vec<RecordSelected> {
        move_cursor(world, from);
        world.resource_mut::<ButtonInput<MouseButton>>().press(MouseButton::Left);
        world.run_system_once(pick_marker_on_click).unwrap();

        move_cursor(world, to);
        let mut buttons = world.resource_mut::<ButtonInput<MouseButton>>();
        buttons.clear();
        buttons.release(MouseButton::Left);
        world.run_system_once(pick_marker_on_click).unwrap();

        world
            .resource_mut::<Events<RecordSelected>>()
            .drain()
            .collect()
    }

    #[test]
    fn click_on_a_marker_selects_its_record() {
        let mut world = click_world(vec![site("r-1")]);
        let at = centre(&mut world);
        let nudged = at + Vec2::new(1.0, 1.0);

        let selected = click(&mut world, at, nudged);

        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].kind, EntityKind::Resource);
        assert_eq!(selected[0].record.id, "r-1");
        assert!(world.resource::<PointerPress>().position.is_none());
    }

    #[test]
    fn drag_past_the_tolerance_selects_nothing() {
        let mut world = click_world(vec![site("r-1")]);
        let at = centre(&mut world);
        let tolerance = world.resource::<GlobeSettings>().pick_drag_tolerance;
        let dragged_from = at + Vec2::new(tolerance * 3.0, 0.0);

        assert!(click(&mut world, dragged_from, at).is_empty());
    }

    #[test]
    fn stale_or_ambiguous_ids_select_nothing() {
        let mut world = click_world(Vec::new());
        let at = centre(&mut world);
        assert!(click(&mut world, at, at).is_empty());

        world.insert_resource(GlobeRecords {
            resources: vec![site("r-1"), site("r-1")],
            projects: Vec::new(),
        });
        assert!(click(&mut world, at, at).is_empty());

        world.insert_resource(GlobeRecords {
            resources: vec![site("r-1")],
            projects: Vec::new(),
        });
        assert_eq!(click(&mut world, at, at).len(), 1);
    }
}
