use crate::engine::loading::progress::LoadingProgress;
use crate::engine::systems::fps_tracking::smoothed_fps;
use crate::story::controller::StoryController;
use crate::story::scene_id::SceneId;
use crate::story::scenes::lookup_scene;
use bevy::diagnostic::DiagnosticsStore;
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

/// JSON-RPC 2.0 error object.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

/// Commands from the host page, raised as events for the story systems.
#[derive(Event, Debug, Clone, PartialEq)]
pub enum HostCommand {
    StartExperience,
    SessionResult {
        granted: bool,
        reason: Option<String>,
    },
    /// Controller select; `None` means use the viewer's forward ray.
    Select {
        ray: Option<Ray3d>,
    },
    ViewerPose(Transform),
    RestartExperience,
    JumpToScene(SceneId),
}

/// Resource managing bidirectional RPC communication with the host page.
/// Handles both request-response patterns and notification broadcasting.
#[derive(Resource, Default)]
pub struct WebRpcInterface {
    outgoing_notifications: Vec<RpcNotification>,
    outgoing_responses: Vec<RpcResponse>,
}

impl WebRpcInterface {
    /// Send notification to the host without expecting response.
    pub fn send_notification(&mut self, method: &str, params: serde_json::Value) {
        self.outgoing_notifications.push(RpcNotification {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
        });
    }

    /// Notifications queued for the next send.
    pub fn pending_notifications(&self) -> &[RpcNotification] {
        &self.outgoing_notifications
    }

    /// Queue response for transmission to the host.
    fn queue_response(&mut self, response: RpcResponse) {
        self.outgoing_responses.push(response);
    }
}

/// Plugin establishing the postMessage bridge to the host page.
pub struct WebRpcPlugin;

impl Plugin for WebRpcPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WebRpcInterface>()
            .add_event::<IncomingRpcMessage>()
            .add_event::<HostCommand>()
            .add_systems(
                PreUpdate,
                (process_incoming_messages, handle_rpc_messages).chain(),
            )
            .add_systems(Last, send_outgoing_messages);

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

    if let Some(window) = window() {
        if let Err(e) =
            window.add_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
        {
            error!("Failed to register message listener: {:?}", e);
            return;
        }
    }

    // Prevent closure from being dropped by transferring ownership to JS.
    closure.forget();
    commands.insert_resource(MessageQueue(message_queue));
}

/// Resource wrapping thread-safe message queue for WASM event handling.
#[derive(Resource)]
struct MessageQueue(std::sync::Arc<std::sync::Mutex<Vec<String>>>);

/// Event representing incoming RPC message from the host.
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

/// Read-only engine state the query methods report.
struct RpcContext<'a> {
    fps: f32,
    progress: &'a LoadingProgress,
    current_scene: Option<SceneId>,
}

fn handle_rpc_messages(
    mut events: EventReader<IncomingRpcMessage>,
    diagnostics: Res<DiagnosticsStore>,
    progress: Res<LoadingProgress>,
    controller: Res<StoryController>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut host_commands: EventWriter<HostCommand>,
) {
    let context = RpcContext {
        fps: current_fps(&diagnostics),
        progress: &progress,
        current_scene: controller.current(),
    };

    for event in events.read() {
        match serde_json::from_str::<RpcRequest>(&event.content) {
            Ok(request) => {
                debug!("Processing RPC method: {}", request.method);
                let mut commands = Vec::new();
                if let Some(response) = handle_rpc_request(&request, &context, &mut commands) {
                    rpc_interface.queue_response(response);
                }
                host_commands.write_batch(commands);
            }
            Err(parse_error) => {
                warn!("Ignoring malformed RPC message: {}", parse_error);
            }
        }
    }
}

/// Handle one request or notification. Only requests with an id get a response.
fn handle_rpc_request(
    request: &RpcRequest,
    context: &RpcContext,
    commands: &mut Vec<HostCommand>,
) -> Option<RpcResponse> {
    let result = match request.method.as_str() {
        "start_experience" => queue_command(commands, HostCommand::StartExperience),
        "session_result" => handle_session_result(&request.params, commands),
        "select" => handle_select(&request.params, commands),
        "viewer_pose" => handle_viewer_pose(&request.params, commands),
        "restart_experience" => queue_command(commands, HostCommand::RestartExperience),
        "jump_to_scene" => handle_jump_to_scene(&request.params, commands),
        "get_loading_progress" => Ok(serde_json::json!({
            "percent": context.progress.percent(),
            "essential_loaded": context.progress.essential_loaded,
        })),
        "get_current_scene" => Ok(serde_json::json!({
            "scene": context.current_scene.map(|scene| scene.as_str()),
        })),
        "get_fps" => Ok(serde_json::json!({ "fps": context.fps })),
        _ => {
            warn!("Unknown RPC method: {}", request.method);
            Err(RpcError {
                code: -32601,
                message: "Method not found".to_string(),
                data: Some(serde_json::json!({"method": request.method})),
            })
        }
    };

    // Notifications have no id and get no response.
    let id = request.id.clone()?;
    Some(match result {
        Ok(result_value) => RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: Some(result_value),
            error: None,
            id: Some(id),
        },
        Err(error) => RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(error),
            id: Some(id),
        },
    })
}

fn queue_command(
    commands: &mut Vec<HostCommand>,
    command: HostCommand,
) -> Result<serde_json::Value, RpcError> {
    commands.push(command);
    Ok(serde_json::json!({ "success": true }))
}

fn handle_session_result(
    params: &serde_json::Value,
    commands: &mut Vec<HostCommand>,
) -> Result<serde_json::Value, RpcError> {
    #[derive(Deserialize)]
    struct SessionResultParams {
        granted: bool,
        reason: Option<String>,
    }

    let parsed = serde_json::from_value::<SessionResultParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected 'granted' parameter"))?;
    queue_command(
        commands,
        HostCommand::SessionResult {
            granted: parsed.granted,
            reason: parsed.reason,
        },
    )
}

fn handle_select(
    params: &serde_json::Value,
    commands: &mut Vec<HostCommand>,
) -> Result<serde_json::Value, RpcError> {
    #[derive(Deserialize, Default)]
    struct SelectParams {
        origin: Option<[f32; 3]>,
        direction: Option<[f32; 3]>,
    }

    let parsed = if params.is_null() {
        SelectParams::default()
    } else {
        serde_json::from_value::<SelectParams>(params.clone())
            .map_err(|_| RpcError::invalid_params("Expected 'origin' and 'direction' arrays"))?
    };

    let ray = match (parsed.origin, parsed.direction) {
        (Some(origin), Some(direction)) => {
            let direction = Dir3::new(Vec3::from(direction))
                .map_err(|_| RpcError::invalid_params("'direction' must be non-zero"))?;
            Some(Ray3d::new(Vec3::from(origin), direction))
        }
        (None, None) => None,
        _ => {
            return Err(RpcError::invalid_params(
                "'origin' and 'direction' must be given together",
            ));
        }
    };
    queue_command(commands, HostCommand::Select { ray })
}

fn handle_viewer_pose(
    params: &serde_json::Value,
    commands: &mut Vec<HostCommand>,
) -> Result<serde_json::Value, RpcError> {
    #[derive(Deserialize)]
    struct ViewerPoseParams {
        position: [f32; 3],
        orientation: [f32; 4],
    }

    let parsed = serde_json::from_value::<ViewerPoseParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected 'position' and 'orientation'"))?;
    let pose = Transform::from_translation(Vec3::from(parsed.position))
        .with_rotation(Quat::from_array(parsed.orientation).normalize());
    queue_command(commands, HostCommand::ViewerPose(pose))
}

fn handle_jump_to_scene(
    params: &serde_json::Value,
    commands: &mut Vec<HostCommand>,
) -> Result<serde_json::Value, RpcError> {
    #[derive(Deserialize)]
    struct JumpParams {
        name: String,
    }

    let parsed = serde_json::from_value::<JumpParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected 'name' parameter"))?;
    let scene = lookup_scene(&parsed.name)
        .map_err(|err| RpcError::invalid_params(&err.to_string()))?;
    queue_command(commands, HostCommand::JumpToScene(scene.id))
}

fn current_fps(diagnostics: &DiagnosticsStore) -> f32 {
    smoothed_fps(diagnostics).unwrap_or(0.0) as f32
}

/// Send queued notifications and responses to the host.
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

/// Send serialized message to the parent window.
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

/// Standard RPC error codes and constructors.
impl RpcError {
    pub fn invalid_params(message: &str) -> Self {
        Self {
            code: -32602,
            message: message.to_string(),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(json: &str) -> RpcRequest {
        serde_json::from_str(json).unwrap()
    }

    fn run(json: &str) -> (Option<RpcResponse>, Vec<HostCommand>) {
        let mut progress = LoadingProgress::default();
        progress.total_bytes = Some(200);
        progress.loaded_bytes = 50;
        let context = RpcContext {
            fps: 60.0,
            progress: &progress,
            current_scene: Some(SceneId::Phishing),
        };
        let mut commands = Vec::new();
        let response = handle_rpc_request(&request(json), &context, &mut commands);
        (response, commands)
    }

    #[test]
    fn start_notification_raises_command_without_response() {
        let (response, commands) = run(r#"{"jsonrpc":"2.0","method":"start_experience"}"#);
        assert!(response.is_none());
        assert_eq!(commands, vec![HostCommand::StartExperience]);
    }

    #[test]
    fn session_result_carries_refusal_reason() {
        let (_, commands) = run(
            r#"{"jsonrpc":"2.0","method":"session_result","params":{"granted":false,"reason":"NotSupportedError"},"id":1}"#,
        );
        assert_eq!(
            commands,
            vec![HostCommand::SessionResult {
                granted: false,
                reason: Some("NotSupportedError".to_string()),
            }]
        );
    }

    #[test]
    fn select_with_and_without_ray() {
        let (_, commands) = run(r#"{"jsonrpc":"2.0","method":"select","id":2}"#);
        assert_eq!(commands, vec![HostCommand::Select { ray: None }]);

        let (_, commands) = run(
            r#"{"jsonrpc":"2.0","method":"select","params":{"origin":[0,1.6,0],"direction":[0,0,-2]},"id":3}"#,
        );
        let [HostCommand::Select { ray: Some(ray) }] = commands.as_slice() else {
            panic!("expected a select with a ray, got {commands:?}");
        };
        assert_eq!(ray.origin, Vec3::new(0.0, 1.6, 0.0));
        assert_eq!(*ray.direction, Vec3::NEG_Z);

        let (response, commands) = run(
            r#"{"jsonrpc":"2.0","method":"select","params":{"origin":[0,0,0]},"id":4}"#,
        );
        assert!(commands.is_empty());
        assert_eq!(response.unwrap().error.unwrap().code, -32602);
    }

    #[test]
    fn unknown_scene_is_an_invalid_params_error() {
        let (response, commands) = run(
            r#"{"jsonrpc":"2.0","method":"jump_to_scene","params":{"name":"scene99"},"id":5}"#,
        );
        assert!(commands.is_empty());
        let error = response.unwrap().error.unwrap();
        assert_eq!(error.code, -32602);
        assert!(error.message.contains("scene99"));

        let (_, commands) = run(
            r#"{"jsonrpc":"2.0","method":"jump_to_scene","params":{"name":"passwords"},"id":6}"#,
        );
        assert_eq!(commands, vec![HostCommand::JumpToScene(SceneId::Passwords)]);
    }

    #[test]
    fn queries_report_engine_state() {
        let (response, _) = run(r#"{"jsonrpc":"2.0","method":"get_loading_progress","id":7}"#);
        assert_eq!(response.unwrap().result.unwrap()["percent"], 25.0);

        let (response, _) = run(r#"{"jsonrpc":"2.0","method":"get_current_scene","id":8}"#);
        assert_eq!(response.unwrap().result.unwrap()["scene"], "phishing");
    }

    #[test]
    fn unknown_method_is_reported() {
        let (response, _) = run(r#"{"jsonrpc":"2.0","method":"tool_selection","id":9}"#);
        assert_eq!(response.unwrap().error.unwrap().code, -32601);
    }
}
