use crate::engine::camera::globe_camera::GlobeCamera;
use crate::engine::core::app_state::{AppState, GlobeLifecycle};
use crate::engine::core::context::GlobeContext;
use crate::engine::geo::projection::GeoPoint;
use crate::engine::markers::records::{EntityKind, GlobeRecord, GlobeRecords, parse_records};
use crate::tools::picking::RecordSelected;
use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;

#[cfg(target_arch = "wasm32")]
use web_sys::{MessageEvent, window};

/// JSON-RPC 2.0 request structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 response structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub result: Option<serde_json::Value>,
    pub error: Option<RpcError>,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 notification structure for one-way communication.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcNotification {
    pub jsonrpc: String,
    pub method: String,
    pub params: serde_json::Value,
}

/// JSON-RPC error structure following specification.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

/// Standard RPC error codes and constructors.
impl RpcError {
    pub fn method_not_found(method: &str) -> Self {
        Self {
            code: -32601,
            message: "Method not found".to_string(),
            data: Some(serde_json::json!({ "method": method })),
        }
    }

    pub fn invalid_params(message: &str) -> Self {
        Self {
            code: -32602,
            message: message.to_string(),
            data: None,
        }
    }

    pub fn internal_error(message: &str) -> Self {
        Self {
            code: -32603,
            message: message.to_string(),
            data: None,
        }
    }
}

/// What a host request asks the globe to do, parsed and validated.
#[derive(Debug, Clone, PartialEq)]
pub enum GlobeCommand {
    SetRecords {
        kind: EntityKind,
        records: Vec<GlobeRecord>,
    },
    FocusLocation(GeoPoint),
    Lifecycle(GlobeLifecycle),
    GetFps,
}

/// Maps a request onto a command without touching any engine state.
pub fn parse_rpc_command(request: &RpcRequest) -> Result<GlobeCommand, RpcError> {
    match request.method.as_str() {
        "set_resources" => parse_record_list(EntityKind::Resource, &request.params),
        "set_projects" => parse_record_list(EntityKind::Project, &request.params),
        "focus_location" => {
            #[derive(Deserialize)]
            struct FocusParams {
                latitude: f64,
                longitude: f64,
            }

            let focus = serde_json::from_value::<FocusParams>(request.params.clone())
                .map_err(|_| RpcError::invalid_params("Expected 'latitude' and 'longitude'"))?;
            Ok(GlobeCommand::FocusLocation(GeoPoint::new(
                focus.latitude,
                focus.longitude,
            )))
        }
        "start_globe" => Ok(GlobeCommand::Lifecycle(GlobeLifecycle::Start)),
        "stop_globe" => Ok(GlobeCommand::Lifecycle(GlobeLifecycle::Stop)),
        "get_fps" => Ok(GlobeCommand::GetFps),
        other => Err(RpcError::method_not_found(other)),
    }
}

fn parse_record_list(
    kind: EntityKind,
    params: &serde_json::Value,
) -> Result<GlobeCommand, RpcError> {
    let records = parse_records(params).map_err(|err| {
        RpcError::invalid_params(&format!("Expected a list of {} records: {err}", kind.as_str()))
    })?;
    Ok(GlobeCommand::SetRecords { kind, records })
}

/// Engine state a host command may touch.
#[derive(SystemParam)]
pub struct RpcTargets<'w> {
    records: ResMut<'w, GlobeRecords>,
    camera: Option<ResMut<'w, GlobeCamera>>,
    context: Res<'w, GlobeContext>,
    state: Res<'w, State<AppState>>,
    lifecycle: EventWriter<'w, GlobeLifecycle>,
    diagnostics: Res<'w, DiagnosticsStore>,
}

fn apply_command(
    command: GlobeCommand,
    targets: &mut RpcTargets,
) -> Result<serde_json::Value, RpcError> {
    match command {
        GlobeCommand::SetRecords { kind, records } => {
            let count = records.len();
            targets.records.replace(kind, records);
            info!("Host replaced {} list with {} records", kind.as_str(), count);
            Ok(serde_json::json!({ "success": true, "kind": kind.as_str(), "count": count }))
        }
        GlobeCommand::FocusLocation(point) => {
            let camera = targets
                .camera
                .as_mut()
                .filter(|_| targets.context.running)
                .ok_or_else(|| RpcError::internal_error("Globe is not running"))?;
            camera.focus_on(point);
            Ok(serde_json::json!({
                "success": true,
                "latitude": point.latitude,
                "longitude": point.longitude
            }))
        }
        GlobeCommand::Lifecycle(request) => {
            targets.lifecycle.write(request);
            Ok(serde_json::json!({
                "success": true,
                "state": targets.state.get().as_str()
            }))
        }
        GlobeCommand::GetFps => {
            let fps = targets
                .diagnostics
                .get(&FrameTimeDiagnosticsPlugin::FPS)
                .and_then(|fps_diagnostic| fps_diagnostic.smoothed())
                .unwrap_or(0.0) as f32;
            Ok(serde_json::json!({ "fps": fps }))
        }
    }
}

/// Resource managing bidirectional RPC communication between React and Bevy.
/// Handles both request-response patterns and notification broadcasting.
#[derive(Resource, Default)]
pub struct WebRpcInterface {
    outgoing_notifications: Vec<RpcNotification>,
    outgoing_responses: Vec<RpcResponse>,
}

impl WebRpcInterface {
    /// Send notification to React frontend without expecting response.
    pub fn send_notification(&mut self, method: &str, params: serde_json::Value) {
        self.outgoing_notifications.push(RpcNotification {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
        });
    }

    /// Queue response for transmission to React frontend.
    fn queue_response(&mut self, response: RpcResponse) {
        self.outgoing_responses.push(response);
    }
}

/// Plugin establishing WebRPC communication layer for iframe-based deployment.
pub struct WebRpcPlugin;

impl Plugin for WebRpcPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WebRpcInterface>()
            .add_event::<IncomingRpcMessage>()
            .add_event::<GlobeLifecycle>()
            .add_event::<RecordSelected>()
            .add_systems(
                Update,
                (
                    process_incoming_messages,
                    handle_rpc_messages,
                    dispatch_selection,
                    send_outgoing_messages,
                )
                    .chain(),
            );

        #[cfg(target_arch = "wasm32")]
        app.add_systems(Startup, setup_message_listener);
    }
}

#[cfg(target_arch = "wasm32")]
fn setup_message_listener(mut commands: Commands) {
    use std::sync::Arc;
    use std::sync::Mutex;

    // Thread-safe message queue for cross-thread communication.
    let message_queue: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let queue_clone = message_queue.clone();

    let closure = Closure::wrap(Box::new(move |event: MessageEvent| {
        if let Ok(data) = event.data().dyn_into::<js_sys::JsString>() {
            let message_str: String = data.into();

            if message_str.contains("jsonrpc") {
                if let Ok(mut queue) = queue_clone.lock() {
                    queue.push(message_str);
                }
            }
        }
    }) as Box<dyn FnMut(MessageEvent)>);

    match window() {
        Some(window) => {
            if let Err(e) = window
                .add_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
            {
                error!("Failed to register message listener: {:?}", e);
            }
        }
        None => warn!("Window object not available, host messages disabled"),
    }

    // Prevent closure from being dropped by transferring ownership to JS.
    closure.forget();
    commands.insert_resource(MessageQueue(message_queue));
}

/// Resource wrapping thread-safe message queue for WASM event handling.
#[derive(Resource)]
struct MessageQueue(std::sync::Arc<std::sync::Mutex<Vec<String>>>);

/// Event representing incoming RPC message from React frontend.
#[derive(Event)]
struct IncomingRpcMessage {
    content: String,
}

fn process_incoming_messages(
    message_queue: Option<Res<MessageQueue>>,
    mut message_events: EventWriter<IncomingRpcMessage>,
) {
    let Some(queue_res) = message_queue else {
        return;
    };

    let messages = if let Ok(mut queue) = queue_res.0.lock() {
        std::mem::take(&mut *queue)
    } else {
        Vec::new()
    };

    for message_str in messages {
        message_events.write(IncomingRpcMessage {
            content: message_str,
        });
    }
}

fn handle_rpc_messages(
    mut events: EventReader<IncomingRpcMessage>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut targets: RpcTargets,
) {
    for event in events.read() {
        let request = match serde_json::from_str::<RpcRequest>(&event.content) {
            Ok(request) => request,
            Err(parse_error) => {
                warn!("Dropping unparsable RPC message: {}", parse_error);
                continue;
            }
        };

        debug!("Processing RPC method: {}", request.method);
        let result =
            parse_rpc_command(&request).and_then(|command| apply_command(command, &mut targets));

        if let Err(error) = &result {
            warn!("RPC {} failed: {} ({})", request.method, error.message, error.code);
        }

        // Only requests with IDs get a response.
        if let Some(id) = request.id {
            rpc_interface.queue_response(create_response(id, result));
        }
    }
}

/// Forwards clicked markers to the host under `resource_selected` or
/// `project_selected`.
fn dispatch_selection(
    mut selections: EventReader<RecordSelected>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    for selection in selections.read() {
        match serde_json::to_value(&selection.record) {
            Ok(record) => rpc_interface.send_notification(selection.kind.selection_method(), record),
            Err(e) => error!("Failed to serialize selected record: {}", e),
        }
    }
}

fn create_response(
    id: serde_json::Value,
    result: Result<serde_json::Value, RpcError>,
) -> RpcResponse {
    let (result, error) = match result {
        Ok(value) => (Some(value), None),
        Err(error) => (None, Some(error)),
    };
    RpcResponse {
        jsonrpc: "2.0".to_string(),
        result,
        error,
        id: Some(id),
    }
}

/// Send queued notifications and responses to React frontend.
fn send_outgoing_messages(mut rpc_interface: ResMut<WebRpcInterface>) {
    // Send notifications first.
    for notification in rpc_interface.outgoing_notifications.drain(..) {
        send_message_to_parent(&notification);
    }

    // Send responses second to maintain order.
    for response in rpc_interface.outgoing_responses.drain(..) {
        send_message_to_parent(&response);
    }
}

/// Send serialized message to parent window (React frontend).
fn send_message_to_parent<T: Serialize>(message: &T) {
    #[cfg(target_arch = "wasm32")]
    {
        match serde_json::to_string(message) {
            Ok(json) => {
                if let Some(window) = window() {
                    if let Some(parent) = window.parent().ok().flatten() {
                        if let Err(e) = parent.post_message(&JsValue::from_str(&json), "*") {
                            error!("Failed to send message to parent: {:?}", e);
                        }
                    } else {
                        warn!("No parent window available for message transmission");
                    }
                } else {
                    error!("Window object not available");
                }
            }
            Err(e) => {
                error!("Failed to serialize message: {}", e);
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        // No-op for non-WASM targets.
        let _ = message;
    }
}
