use bevy::prelude::*;

/// Handles to every GPU-backed asset the engine created. Whatever goes in
/// here is removed from its `Assets` collection on release, so nothing
/// survives a teardown even if a stray clone of the handle is still alive.
#[derive(Default, Debug)]
pub struct GpuResourceLedger {
    meshes: Vec<Handle<Mesh>>,
    materials: Vec<Handle<StandardMaterial>>,
    images: Vec<Handle<Image>>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReleasedCounts {
    pub meshes: usize,
    pub materials: usize,
    pub images: usize,
}

impl GpuResourceLedger {
    pub fn add_mesh(&mut self, assets: &mut Assets<Mesh>, mesh: impl Into<Mesh>) -> Handle<Mesh> {
        let handle = assets.add(mesh);
        self.meshes.push(handle.clone());
        handle
    }

    pub fn add_material(
        &mut self,
        assets: &mut Assets<StandardMaterial>,
        material: StandardMaterial,
    ) -> Handle<StandardMaterial> {
        let handle = assets.add(material);
        self.materials.push(handle.clone());
        handle
    }

    /// Tracks a texture obtained from the asset server.
    pub fn track_image(&mut self, handle: &Handle<Image>) {
        self.images.push(handle.clone());
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty() && self.materials.is_empty() && self.images.is_empty()
    }

    pub fn len(&self) -> usize {
        self.meshes.len() + self.materials.len() + self.images.len()
    }

    /// Removes every tracked asset and forgets the handles.
    pub fn release(
        &mut self,
        meshes: &mut Assets<Mesh>,
        materials: &mut Assets<StandardMaterial>,
        images: &mut Assets<Image>,
    ) -> ReleasedCounts {
        let mut counts = ReleasedCounts::default();
        for handle in self.meshes.drain(..) {
            if meshes.remove(handle.id()).is_some() {
                counts.meshes += 1;
            }
        }
        for handle in self.materials.drain(..) {
            if materials.remove(handle.id()).is_some() {
                counts.materials += 1;
            }
        }
        for handle in self.images.drain(..) {
            if images.remove(handle.id()).is_some() {
                counts.images += 1;
            }
        }
        counts
    }
}

/// Everything one mounted globe owns. Systems receive it explicitly; there is
/// no other place the scene's entities or handles are kept.
#[derive(Resource, Default)]
pub struct GlobeContext {
    /// Cleared at the single cancellation point, `teardown_globe`.
    pub running: bool,
    pub camera: Option<Entity>,
    pub light: Option<Entity>,
    pub globe: Option<Entity>,
    pub clouds: Option<Entity>,
    pub day_material: Handle<StandardMaterial>,
    pub night_material: Handle<StandardMaterial>,
    pub day_texture: Handle<Image>,
    pub night_texture: Handle<Image>,
    pub cloud_texture: Handle<Image>,
    pub cloud_material: Handle<StandardMaterial>,
    /// Globe, cloud, lighting assets: acquired once per mount.
    pub scene_ledger: GpuResourceLedger,
    /// Marker assets: replaced on every rebuild.
    pub marker_ledger: GpuResourceLedger,
    /// Forces a marker rebuild even when the records did not change.
    pub markers_dirty: bool,
}

impl GlobeContext {
    fn owned_entities(&self) -> impl Iterator<Item = Entity> {
        [self.camera, self.light, self.globe, self.clouds]
            .into_iter()
            .flatten()
    }
}

/// Run condition for every per-frame system of the globe.
pub fn globe_is_running(context: Option<Res<GlobeContext>>) -> bool {
    context.is_some_and(|c| c.running)
}

/// Marker roots, tagged so teardown and rebuild can find them.
#[derive(Component)]
pub struct MarkerRoot;

/// Stops the frame loop and releases everything the mount acquired.
pub fn teardown_globe(
    mut commands: Commands,
    mut context: ResMut<GlobeContext>,
    markers: Query<Entity, With<MarkerRoot>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut images: ResMut<Assets<Image>>,
) {
    context.running = false;

    for entity in context.owned_entities().chain(markers.iter()) {
        commands.entity(entity).try_despawn();
    }

    let scene = context
        .scene_ledger
        .release(&mut meshes, &mut materials, &mut images);
    let marker = context
        .marker_ledger
        .release(&mut meshes, &mut materials, &mut images);

    info!(
        "Globe torn down: released {} meshes, {} materials, {} textures",
        scene.meshes + marker.meshes,
        scene.materials + marker.materials,
        scene.images + marker.images
    );

    *context = GlobeContext::default();
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;

    fn world_with_assets() -> World {
        let mut world = World::new();
        world.insert_resource(Assets::<Mesh>::default());
        world.insert_resource(Assets::<StandardMaterial>::default());
        world.insert_resource(Assets::<Image>::default());
        world
    }

    #[test]
    fn release_empties_the_collections() {
        let mut meshes = Assets::<Mesh>::default();
        let mut materials = Assets::<StandardMaterial>::default();
        let mut images = Assets::<Image>::default();
        let mut ledger = GpuResourceLedger::default();

        ledger.add_mesh(&mut meshes, Sphere::new(1.0));
        ledger.add_mesh(&mut meshes, Cuboid::new(1.0, 1.0, 1.0));
        let kept_alive = ledger.add_material(&mut materials, StandardMaterial::default());
        let image = images.add(Image::default());
        ledger.track_image(&image);
        assert_eq!(ledger.len(), 4);

        let counts = ledger.release(&mut meshes, &mut materials, &mut images);

        assert_eq!(
            counts,
            ReleasedCounts {
                meshes: 2,
                materials: 1,
                images: 1
            }
        );
        assert!(ledger.is_empty());
        assert_eq!(meshes.len(), 0);
        assert!(materials.get(&kept_alive).is_none());
        assert!(images.get(&image).is_none());
    }

    #[test]
    fn second_release_is_a_no_op() {
        let mut meshes = Assets::<Mesh>::default();
        let mut materials = Assets::<StandardMaterial>::default();
        let mut images = Assets::<Image>::default();
        let mut ledger = GpuResourceLedger::default();
        ledger.add_mesh(&mut meshes, Sphere::new(1.0));

        ledger.release(&mut meshes, &mut materials, &mut images);
        let again = ledger.release(&mut meshes, &mut materials, &mut images);
        assert_eq!(again, ReleasedCounts::default());
    }

    #[test]
    fn teardown_stops_the_loop_and_frees_everything() {
        let mut world = world_with_assets();
        let mut context = GlobeContext {
            running: true,
            ..default()
        };
        {
            let mut meshes = world.resource_mut::<Assets<Mesh>>();
            context.scene_ledger.add_mesh(&mut meshes, Sphere::new(1.0));
            context.marker_ledger.add_mesh(&mut meshes, Sphere::new(0.1));
        }
        {
            let mut materials = world.resource_mut::<Assets<StandardMaterial>>();
            context.day_material = context
                .scene_ledger
                .add_material(&mut materials, StandardMaterial::default());
        }
        let globe = world.spawn(Transform::default()).id();
        let marker = world.spawn((MarkerRoot, Transform::default())).id();
        let child = world.spawn(Transform::default()).id();
        world.entity_mut(marker).add_child(child);
        context.globe = Some(globe);
        world.insert_resource(context);

        assert!(world.run_system_once(globe_is_running).unwrap());
        world.run_system_once(teardown_globe).unwrap();

        assert!(!world.run_system_once(globe_is_running).unwrap());
        assert!(world.get_entity(globe).is_err());
        assert!(world.get_entity(marker).is_err());
        assert!(world.get_entity(child).is_err());
        assert!(world.resource::<Assets<Mesh>>().is_empty());
        assert!(world.resource::<Assets<StandardMaterial>>().is_empty());
        let context = world.resource::<GlobeContext>();
        assert!(context.scene_ledger.is_empty() && context.marker_ledger.is_empty());
    }
}
