use crate::engine::animation::clouds::CloudLayer;
use crate::engine::animation::day_night::{DayNightSwitch, LightingMode, SunLight};
use crate::engine::camera::globe_camera::GlobeCamera;
use crate::engine::core::context::GlobeContext;
use crate::engine::core::settings::GlobeSettings;
use crate::engine::geo::projection::{GeoPoint, project};
use crate::engine::loading::progress::LoadingProgress;
use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use constants::texture::{GLOBE_SECTORS, GLOBE_STACKS};

/// Latitude/longitude grid sphere whose vertices come from the same
/// projection as the markers, so texture and markers always line up.
/// UV (0, 0) is the north-west corner of an equirectangular map.
pub fn globe_mesh(radius: f32, sectors: u32, stacks: u32) -> Mesh {
    let sectors = sectors.max(3);
    let stacks = stacks.max(2);
    let vertex_count = ((sectors + 1) * (stacks + 1)) as usize;

    let mut positions: Vec<[f32; 3]> = Vec::with_capacity(vertex_count);
    let mut normals: Vec<[f32; 3]> = Vec::with_capacity(vertex_count);
    let mut uvs: Vec<[f32; 2]> = Vec::with_capacity(vertex_count);

    for i in 0..=stacks {
        let v = i as f32 / stacks as f32;
        let latitude = 90.0 - 180.0 * v as f64;
        for j in 0..=sectors {
            let u = j as f32 / sectors as f32;
            let longitude = -180.0 + 360.0 * u as f64;
            let position = project(GeoPoint::new(latitude, longitude), radius);
            positions.push(position.to_array());
            normals.push(position.normalize_or_zero().to_array());
            uvs.push([u, v]);
        }
    }

    // Counter-clockwise from outside: north-west, south-west, south-east.
    let row = sectors + 1;
    let mut indices: Vec<u32> = Vec::with_capacity((sectors * stacks * 6) as usize);
    for i in 0..stacks {
        for j in 0..sectors {
            let a = i * row + j;
            let b = a + row;
            let c = b + 1;
            let d = a + 1;
            indices.extend_from_slice(&[a, b, c, a, c, d]);
        }
    }

    Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default())
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
        .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, normals)
        .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, uvs)
        .with_inserted_indices(Indices::U32(indices))
}

/// Spawns the globe scene once settings are known. Runs on every mount.
pub fn spawn_globe_scene(
    mut commands: Commands,
    mut loading_progress: ResMut<LoadingProgress>,
    mut context: ResMut<GlobeContext>,
    settings: Res<GlobeSettings>,
    asset_server: Res<AssetServer>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    if loading_progress.scene_spawned || !loading_progress.settings_loaded {
        return;
    }
    let context = &mut *context;

    context.day_texture = asset_server.load(settings.textures.day.clone());
    context.night_texture = asset_server.load(settings.textures.night.clone());
    context.cloud_texture = asset_server.load(settings.textures.clouds.clone());
    let ledger = &mut context.scene_ledger;
    ledger.track_image(&context.day_texture);
    ledger.track_image(&context.night_texture);
    ledger.track_image(&context.cloud_texture);

    context.day_material = ledger.add_material(
        &mut materials,
        StandardMaterial {
            base_color_texture: Some(context.day_texture.clone()),
            perceptual_roughness: 0.85,
            ..default()
        },
    );
    context.night_material = ledger.add_material(
        &mut materials,
        StandardMaterial {
            base_color: Color::srgb(0.02, 0.03, 0.06),
            emissive: LinearRgba::rgb(1.0, 0.9, 0.7),
            emissive_texture: Some(context.night_texture.clone()),
            perceptual_roughness: 1.0,
            ..default()
        },
    );
    context.cloud_material = ledger.add_material(
        &mut materials,
        StandardMaterial {
            base_color: Color::srgba(1.0, 1.0, 1.0, 0.85),
            base_color_texture: Some(context.cloud_texture.clone()),
            alpha_mode: AlphaMode::Blend,
            perceptual_roughness: 1.0,
            ..default()
        },
    );

    let globe_mesh_handle = ledger.add_mesh(
        &mut meshes,
        globe_mesh(settings.globe_radius, GLOBE_SECTORS, GLOBE_STACKS),
    );
    let cloud_mesh_handle = ledger.add_mesh(
        &mut meshes,
        globe_mesh(settings.cloud_radius, GLOBE_SECTORS / 2, GLOBE_STACKS / 2),
    );

    let globe_camera = GlobeCamera::from_settings(&settings);
    let mode = LightingMode::initial(globe_camera.distance, settings.night_distance);
    let surface = match mode {
        LightingMode::Day => context.day_material.clone(),
        LightingMode::Night => context.night_material.clone(),
    };

    context.camera = Some(
        commands
            .spawn((Camera3d::default(), globe_camera.transform(), Name::new("Globe camera")))
            .id(),
    );
    context.light = Some(
        commands
            .spawn((
                DirectionalLight {
                    illuminance: mode.sun_illuminance(),
                    shadows_enabled: false,
                    ..default()
                },
                Transform::from_xyz(4.0, 2.0, 3.0).looking_at(Vec3::ZERO, Vec3::Y),
                SunLight,
                Name::new("Sun"),
            ))
            .id(),
    );
    context.globe = Some(
        commands
            .spawn((
                Mesh3d(globe_mesh_handle),
                MeshMaterial3d(surface),
                Transform::default(),
                Name::new("Globe"),
            ))
            .id(),
    );
    context.clouds = Some(
        commands
            .spawn((
                Mesh3d(cloud_mesh_handle),
                MeshMaterial3d(context.cloud_material.clone()),
                Transform::default(),
                Visibility::default(),
                CloudLayer,
                Name::new("Clouds"),
            ))
            .id(),
    );

    commands.insert_resource(AmbientLight {
        brightness: 120.0,
        ..default()
    });
    commands.insert_resource(DayNightSwitch { mode });
    commands.insert_resource(globe_camera);

    loading_progress.scene_spawned = true;
    info!("✓ Globe scene spawned ({:?} lighting)", mode);
}
