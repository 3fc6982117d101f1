use crate::engine::core::context::GlobeContext;
use crate::engine::loading::progress::LoadingProgress;
use crate::rpc::web_rpc::WebRpcInterface;
use bevy::prelude::*;

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum AppState {
    #[default]
    Loading,
    Running,
    Stopped,
}

impl AppState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Running => "running",
            Self::Stopped => "stopped",
        }
    }
}

/// Host or user request to mount or unmount the globe.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlobeLifecycle {
    Start,
    Stop,
}

#[derive(Component)]
pub struct FpsText;

#[derive(Component)]
pub struct SelectionText;

// Loading → Running once settings, records, scene and textures have settled.
pub fn transition_to_running(
    loading_progress: Res<LoadingProgress>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if loading_progress.is_complete() {
        info!("→ Globe ready, transitioning to Running state");
        next_state.set(AppState::Running);
    }
}

pub fn start_frame_loop(mut context: ResMut<GlobeContext>) {
    context.running = true;
    context.markers_dirty = true;
}

pub fn handle_lifecycle_requests(
    mut requests: EventReader<GlobeLifecycle>,
    state: Res<State<AppState>>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    for request in requests.read() {
        match (request, state.get()) {
            (GlobeLifecycle::Stop, AppState::Loading | AppState::Running) => {
                info!("→ Stop requested, transitioning to Stopped state");
                next_state.set(AppState::Stopped);
            }
            (GlobeLifecycle::Start, AppState::Stopped) => {
                info!("→ Start requested, transitioning to Loading state");
                next_state.set(AppState::Loading);
            }
            (request, current) => {
                debug!("Ignoring {:?} while {:?}", request, current);
            }
        }
    }
}

pub fn notify_state_change(state: Res<State<AppState>>, mut rpc: ResMut<WebRpcInterface>) {
    if state.is_changed() {
        rpc.send_notification(
            "globe_state",
            serde_json::json!({ "state": state.get().as_str() }),
        );
    }
}

pub fn update_loading_frontend(
    loading_progress: Res<LoadingProgress>,
    mut rpc: ResMut<WebRpcInterface>,
) {
    if !loading_progress.is_changed() {
        return;
    }
    rpc.send_notification("loading_progress", loading_progress.to_json());
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::state::app::StatesPlugin;

    fn app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin))
            .init_state::<AppState>()
            .add_event::<GlobeLifecycle>()
            .add_systems(Update, handle_lifecycle_requests);
        app
    }

    fn current(app: &App) -> AppState {
        *app.world().resource::<State<AppState>>().get()
    }

    #[test]
    fn stop_then_start_remounts() {
        let mut app = app();
        app.update();
        assert_eq!(current(&app), AppState::Loading);

        app.world_mut().send_event(GlobeLifecycle::Stop);
        app.update();
        app.update();
        assert_eq!(current(&app), AppState::Stopped);

        app.world_mut().send_event(GlobeLifecycle::Start);
        app.update();
        app.update();
        assert_eq!(current(&app), AppState::Loading);
    }

    #[test]
    fn start_while_loading_is_ignored() {
        let mut app = app();
        app.world_mut().send_event(GlobeLifecycle::Start);
        app.update();
        app.update();
        assert_eq!(current(&app), AppState::Loading);
    }
}
