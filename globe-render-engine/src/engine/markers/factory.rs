use crate::engine::animation::pulse::MarkerPulse;
use crate::engine::core::context::{GlobeContext, GpuResourceLedger, MarkerRoot};
use crate::engine::core::settings::GlobeSettings;
use crate::engine::markers::records::GlobeRecords;
use crate::engine::markers::visual::{ColorFamily, MarkerVisual, PartMesh};
use bevy::prelude::*;
use std::collections::HashMap;

/// Meshes and materials shared by every marker of one rebuild. All of them
/// are recorded in the marker ledger, so the next rebuild frees them.
#[derive(Default)]
struct MarkerPalette {
    meshes: HashMap<PartMesh, Handle<Mesh>>,
    materials: HashMap<ColorFamily, Handle<StandardMaterial>>,
}

impl MarkerPalette {
    fn mesh(
        &mut self,
        part: PartMesh,
        ledger: &mut GpuResourceLedger,
        meshes: &mut Assets<Mesh>,
    ) -> Handle<Mesh> {
        self.meshes
            .entry(part)
            .or_insert_with(|| ledger.add_mesh(meshes, part.mesh()))
            .clone()
    }

    fn material(
        &mut self,
        color: ColorFamily,
        ledger: &mut GpuResourceLedger,
        materials: &mut Assets<StandardMaterial>,
    ) -> Handle<StandardMaterial> {
        self.materials
            .entry(color)
            .or_insert_with(|| {
                ledger.add_material(
                    materials,
                    StandardMaterial {
                        base_color: color.base_color(),
                        emissive: color.emissive(),
                        perceptual_roughness: 0.45,
                        ..default()
                    },
                )
            })
            .clone()
    }
}

/// Spawns one marker: a root carrying the placement and a child per part.
/// Every child gets the same pick metadata.
fn spawn_marker(
    commands: &mut Commands,
    visual: &MarkerVisual,
    phase: f32,
    palette: &mut MarkerPalette,
    ledger: &mut GpuResourceLedger,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) -> Entity {
    let material = palette.material(visual.color, ledger, materials);
    let parts: Vec<_> = visual
        .parts
        .iter()
        .map(|part| (palette.mesh(part.mesh, ledger, meshes), part))
        .collect();

    let mut root = commands.spawn((
        MarkerRoot,
        Name::new(format!(
            "{} marker {}",
            visual.pick.entity_kind.as_str(),
            visual.pick.entity_id
        )),
        visual.transform(),
        Visibility::default(),
    ));
    if visual.pulses {
        root.insert(MarkerPulse {
            base_scale: visual.scale,
            phase,
        });
    }

    root.with_children(|parent| {
        for (mesh, part) in parts {
            parent.spawn((
                Mesh3d(mesh),
                MeshMaterial3d(material.clone()),
                part.transform,
                part.volume,
                visual.pick.clone(),
            ));
        }
    })
    .id()
}

/// Rebuilds every marker from scratch when the records change or the mount
/// asks for it. Previous markers and their GPU assets are released first.
pub fn rebuild_markers(
    mut commands: Commands,
    records: Res<GlobeRecords>,
    settings: Res<GlobeSettings>,
    mut context: ResMut<GlobeContext>,
    existing: Query<Entity, With<MarkerRoot>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut images: ResMut<Assets<Image>>,
) {
    if !records.is_changed() && !context.markers_dirty {
        return;
    }

    for entity in &existing {
        commands.entity(entity).try_despawn();
    }

    let context = &mut *context;
    context
        .marker_ledger
        .release(&mut meshes, &mut materials, &mut images);

    let layout = settings.marker_layout();
    let mut palette = MarkerPalette::default();
    let mut spawned = 0;
    for (index, (kind, record)) in records.iter().enumerate() {
        let visual = MarkerVisual::build(record, kind, &layout);
        spawn_marker(
            &mut commands,
            &visual,
            index as f32 * 0.7,
            &mut palette,
            &mut context.marker_ledger,
            &mut meshes,
            &mut materials,
        );
        spawned += 1;
    }

    context.markers_dirty = false;
    info!(
        "✓ Built {} markers ({} resources, {} projects)",
        spawned,
        records.resources.len(),
        records.projects.len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::markers::records::{EntityKind, GlobeRecord};
    use crate::tools::picking::{PickMetadata, PickVolume};
    use bevy::ecs::system::RunSystemOnce;

    fn record(id: &str, status: &str) -> GlobeRecord {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": format!("Site {id}"),
            "latitude": 40.115,
            "longitude": 67.842,
            "status": status,
        }))
        .unwrap()
    }

    fn world(resources: Vec<GlobeRecord>, projects: Vec<GlobeRecord>) -> World {
        let mut world = World::new();
        world.insert_resource(Assets::<Mesh>::default());
        world.insert_resource(Assets::<StandardMaterial>::default());
        world.insert_resource(Assets::<Image>::default());
        world.insert_resource(GlobeSettings::default());
        world.insert_resource(GlobeContext::default());
        world.insert_resource(GlobeRecords {
            resources,
            projects,
        });
        world
    }

    #[test]
    fn every_part_of_a_marker_resolves_to_its_record() {
        let mut world = world(vec![record("r-7", "critical")], vec![record("p-2", "completed")]);
        world.run_system_once(rebuild_markers).unwrap();

        let roots: Vec<Entity> = world
            .query_filtered::<Entity, With<MarkerRoot>>()
            .iter(&world)
            .collect();
        assert_eq!(roots.len(), 2);

        for root in roots {
            let children: Vec<Entity> = world
                .get::<Children>(root)
                .map(|c| c.to_vec())
                .unwrap_or_default();
            assert!(children.len() >= 2);
            let metas: Vec<&PickMetadata> = children
                .iter()
                .map(|c| world.get::<PickMetadata>(*c).unwrap())
                .collect();
            assert!(metas.iter().all(|m| *m == metas[0]));
            assert!(children.iter().all(|c| world.get::<PickVolume>(*c).is_some()));
        }

        let kinds: Vec<EntityKind> = world
            .query::<&PickMetadata>()
            .iter(&world)
            .map(|m| m.entity_kind)
            .collect();
        assert!(kinds.contains(&EntityKind::Resource) && kinds.contains(&EntityKind::Project));
    }

    #[test]
    fn only_pulsing_statuses_get_a_pulse() {
        let mut world = world(vec![record("a", "critical"), record("b", "stable")], vec![]);
        world.run_system_once(rebuild_markers).unwrap();
        let pulsing = world.query::<&MarkerPulse>().iter(&world).count();
        assert_eq!(pulsing, 1);
    }

    #[test]
    fn rebuild_replaces_previous_markers_and_assets() {
        let mut world = world(vec![record("a", "critical"), record("b", "stable")], vec![]);
        world.run_system_once(rebuild_markers).unwrap();
        let meshes_after_first = world.resource::<Assets<Mesh>>().len();
        let tracked_after_first = world.resource::<GlobeContext>().marker_ledger.len();

        world.resource_mut::<GlobeContext>().markers_dirty = true;
        world.run_system_once(rebuild_markers).unwrap();

        assert_eq!(world.query::<&MarkerRoot>().iter(&world).count(), 2);
        assert_eq!(world.resource::<Assets<Mesh>>().len(), meshes_after_first);
        assert_eq!(
            world.resource::<GlobeContext>().marker_ledger.len(),
            tracked_after_first
        );
    }

    #[test]
    fn empty_records_clear_the_globe() {
        let mut world = world(vec![record("a", "stable")], vec![]);
        world.run_system_once(rebuild_markers).unwrap();
        world.resource_mut::<GlobeRecords>().resources.clear();
        world.run_system_once(rebuild_markers).unwrap();
        assert_eq!(world.query::<&MarkerRoot>().iter(&world).count(), 0);
        assert!(world.resource::<GlobeContext>().marker_ledger.is_empty());
        assert!(world.resource::<Assets<Mesh>>().is_empty());
    }
}
