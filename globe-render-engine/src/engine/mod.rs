pub mod animation;
pub mod camera;
pub mod core;
pub mod geo;
pub mod loading;
pub mod markers;
pub mod scene;
pub mod systems;
