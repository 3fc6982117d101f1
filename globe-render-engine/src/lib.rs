//! Interactive 3D globe for water resources and projects.
//!
//! Places status-coded markers on a textured Earth, animates the scene and
//! reports clicked markers back to the embedding React host over JSON-RPC.

pub mod engine;
pub mod rpc;
pub mod tools;

pub use engine::core::app_setup::create_app;
