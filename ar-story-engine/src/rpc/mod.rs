//! JSON-RPC 2.0 bridge to the host page.
//!
//! The engine runs in a canvas inside a host page that owns the DOM and the
//! immersive session. Messages travel over `postMessage`:
//!
//! ```text
//! Host page  <──postMessage──>  Bevy
//!     │                           │
//!     ├─ Request (with id) ──────>│
//!     │<──────── Response (id) ───┤
//!     │<───── Notification ───────┤
//! ```
//!
//! ## Incoming methods
//!
//! - `start_experience`: start button clicked
//! - `session_result {granted, reason?}`: outcome of the immersive session request
//! - `select {origin?, direction?}`: controller select, optionally with its ray
//! - `viewer_pose {position, orientation}`: immersive viewer pose for the camera
//! - `restart_experience`: restart clicked on the end page
//! - `jump_to_scene {name}`: enter a scene by name
//! - `get_loading_progress`, `get_current_scene`, `get_fps`: queries
//!
//! ## Outgoing notifications
//!
//! `dom_display`, `dom_text`, `alert`, `loading_progress`, `request_session`,
//! `scene_changed`, `end_session`, `reload_experience`, `fps_update`.
//!
//! ## Error codes
//!
//! - `-32601`: Method not found
//! - `-32602`: Invalid params (including unknown scene names)

/// Typed helper for host page DOM updates.
pub mod dom;

/// Message transport, request handling and host commands.
pub mod web_rpc;
