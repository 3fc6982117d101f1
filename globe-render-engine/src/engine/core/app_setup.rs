// Standard library and external crates
use bevy::asset::AssetMetaCheck;
use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::prelude::*;
use bevy_common_assets::json::JsonAssetPlugin;

// Crate engine modules
use crate::engine::animation::{
    clouds::rotate_clouds,
    day_night::{DayNightSwitch, update_day_night},
    pulse::animate_marker_pulse,
};
use crate::engine::camera::globe_camera::{GlobeCamera, camera_controller};
use crate::engine::core::app_state::{
    AppState, GlobeLifecycle, handle_lifecycle_requests,
    notify_state_change, start_frame_loop, transition_to_running, update_loading_frontend,
};
use crate::engine::core::context::{GlobeContext, globe_is_running, teardown_globe};
use crate::engine::core::settings::GlobeSettings;
use crate::engine::core::window_config::create_window_config;
use crate::engine::loading::asset_loader::{
    GlobeAssetLoader, load_records_system, load_settings_system, start_loading,
};
use crate::engine::loading::progress::LoadingProgress;
use crate::engine::loading::texture_loader::check_texture_loading;
use crate::engine::markers::factory::rebuild_markers;
use crate::engine::markers::records::{GlobeRecords, RecordSet};
use crate::engine::scene::globe::spawn_globe_scene;
use crate::engine::systems::fps_tracking::fps_notification_system;
// Crate tools modules
use crate::tools::picking::MarkerPickingPlugin;
// Web RPC modules
use crate::rpc::web_rpc::WebRpcPlugin;

#[cfg(not(target_arch = "wasm32"))]
use crate::engine::core::app_state::{FpsText, SelectionText};
#[cfg(not(target_arch = "wasm32"))]
use crate::engine::systems::{
    fps_tracking::fps_text_update_system, selection_overlay::selection_text_update_system,
};

pub fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .init_state::<AppState>()
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        // Distinct double extensions keep the two JSON asset types apart.
        .add_plugins(JsonAssetPlugin::<GlobeSettings>::new(&["settings.json"]))
        .add_plugins(JsonAssetPlugin::<RecordSet>::new(&["records.json"]))
        .add_plugins(WebRpcPlugin)
        .add_plugins(MarkerPickingPlugin);

    // Initialise resources early
    app.init_resource::<LoadingProgress>()
        .init_resource::<GlobeAssetLoader>()
        .init_resource::<GlobeContext>()
        .init_resource::<GlobeRecords>()
        .init_resource::<GlobeSettings>()
        .init_resource::<GlobeCamera>()
        .init_resource::<DayNightSwitch>()
        .add_event::<GlobeLifecycle>();

    // Every mount, including a restart after stop, goes through Loading.
    app.add_systems(OnEnter(AppState::Loading), start_loading)
        .add_systems(
            Update,
            (
                load_settings_system,
                spawn_globe_scene,
                check_texture_loading,
                load_records_system,
                transition_to_running,
                update_loading_frontend,
            )
                .chain()
                .run_if(in_state(AppState::Loading)),
        )
        .add_systems(OnEnter(AppState::Running), start_frame_loop)
        .add_systems(OnEnter(AppState::Stopped), teardown_globe)
        .add_systems(Update, (handle_lifecycle_requests, notify_state_change));

    // Frame loop: only while mounted and running.
    let runtime_systems = (
        camera_controller,
        update_day_night,
        rotate_clouds,
        rebuild_markers,
        animate_marker_pulse,
        fps_notification_system,
    )
        .chain();

    app.add_systems(Update, runtime_systems.run_if(globe_is_running));

    // Overlay text only for native builds; the host draws its own UI.
    #[cfg(not(target_arch = "wasm32"))]
    {
        app.add_systems(Startup, create_native_overlays).add_systems(
            Update,
            (fps_text_update_system, selection_text_update_system),
        );
    }

    app
}

#[cfg(not(target_arch = "wasm32"))]
fn create_native_overlays(mut commands: Commands) {
    commands
        .spawn(Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((
                Text::new("FPS: "),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::srgb(1., 0., 0.)),
                Node {
                    position_type: PositionType::Absolute,
                    bottom: Val::Px(12.0),
                    right: Val::Px(12.0),
                    ..default()
                },
                FpsText,
            ));
            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::WHITE),
                Node {
                    position_type: PositionType::Absolute,
                    top: Val::Px(12.0),
                    left: Val::Px(12.0),
                    ..default()
                },
                SelectionText,
            ));
        });
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    DefaultPlugins.set(window_config).set(asset_config)
}
