//! JSON-RPC 2.0 communication layer for React host integration.
//!
//! Implements bidirectional messaging between the globe engine and the host
//! page via iframe `postMessage`, supporting both request-response and
//! notification patterns.
//!
//! ## Message Flow
//!
//! ```text
//! React (Parent Window)  <──postMessage──>  Globe (iframe)
//!        │                                        │
//!        ├─ Request (with ID) ──────────────────> │
//!        │                                        ├─ Parse into GlobeCommand
//!        │ <───────────────── Response (with ID) ─┤
//!        │                                        │
//!        │ <────────── Notification (no ID) ─────┤
//! ```
//!
//! Requests without an ID are executed but never answered.
//!
//! ## Methods
//!
//! ### Data
//! - `set_resources`: replace the resource list (array or `{ "records": [...] }`)
//! - `set_projects`: replace the project list, same shape
//!
//! ### Camera
//! - `focus_location`: `{ "latitude", "longitude" }`, eases the camera round
//!
//! ### Lifecycle
//! - `start_globe`: mount again after a stop
//! - `stop_globe`: tear the globe down and release its GPU resources
//!
//! ### Diagnostics
//! - `get_fps`: current smoothed frame rate
//!
//! ## Notifications
//!
//! - `resource_selected` / `project_selected`: the clicked record, verbatim
//! - `loading_progress`: per-stage loading state
//! - `globe_state`: `loading`, `running` or `stopped`
//! - `fps_update`: frame rate, twice a second
//!
//! ## Error Handling
//!
//! Standard JSON-RPC 2.0 error codes:
//! - `-32601`: Method not found
//! - `-32602`: Invalid params
//! - `-32603`: Internal error (e.g. focusing while the globe is stopped)

/// JSON-RPC 2.0 bidirectional communication system for React integration.
///
/// Handles request-response patterns, notifications, and WASM message listeners.
pub mod web_rpc;
