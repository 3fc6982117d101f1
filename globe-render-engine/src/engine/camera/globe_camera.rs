use crate::engine::core::settings::GlobeSettings;
use crate::engine::geo::projection::{GeoPoint, project};
use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use std::f32::consts::{FRAC_PI_2, PI, TAU};

const ROTATE_SENSITIVITY: f32 = 0.0025;
const ZOOM_SENSITIVITY: f32 = 0.08;
const PITCH_LIMIT: f32 = FRAC_PI_2 - 0.05;
/// Focus animation ends once both angles are this close to the target.
const FOCUS_EPSILON: f32 = 1e-3;
/// Frame rate `damping` is expressed at. Other rates decay by the same amount
/// per second.
const REFERENCE_FPS: f32 = 60.0;

/// Orbit state around the globe centre. Angles are in radians; the camera
/// sits on the ray `(cos p sin y, sin p, cos p cos y)` at `distance`.
#[derive(Resource, Debug, Clone)]
pub struct GlobeCamera {
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
    pub yaw_velocity: f32,
    pub pitch_velocity: f32,
    pub zoom_velocity: f32,
    pub damping: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub auto_rotate: bool,
    pub auto_rotate_speed: f32,
    /// Target (yaw, pitch) while a focus animation is running.
    pub focus: Option<(f32, f32)>,
    pub is_dragging: bool,
}

impl Default for GlobeCamera {
    fn default() -> Self {
        Self::from_settings(&GlobeSettings::default())
    }
}

impl GlobeCamera {
    pub fn from_settings(settings: &GlobeSettings) -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.3,
            distance: settings
                .camera_start_distance
                .clamp(settings.camera_min_distance, settings.camera_max_distance),
            yaw_velocity: 0.0,
            pitch_velocity: 0.0,
            zoom_velocity: 0.0,
            damping: settings.camera_damping,
            min_distance: settings.camera_min_distance,
            max_distance: settings.camera_max_distance,
            auto_rotate: settings.auto_rotate,
            auto_rotate_speed: settings.auto_rotate_speed,
            focus: None,
            is_dragging: false,
        }
    }

    /// Drag in logical pixels. Dragging cancels any running focus animation.
    pub fn apply_drag(&mut self, delta: Vec2) {
        self.yaw_velocity -= delta.x * ROTATE_SENSITIVITY;
        self.pitch_velocity += delta.y * ROTATE_SENSITIVITY;
        self.focus = None;
    }

    /// Positive `amount` zooms in. Speed scales with the current distance.
    pub fn apply_zoom(&mut self, amount: f32) {
        self.zoom_velocity -= amount * ZOOM_SENSITIVITY * self.distance;
    }

    /// Starts turning the camera until `point` sits in the centre of the view.
    pub fn focus_on(&mut self, point: GeoPoint) {
        let dir = project(point, 1.0).normalize_or_zero();
        if dir == Vec3::ZERO {
            return;
        }
        let pitch = dir.y.clamp(-1.0, 1.0).asin().clamp(-PITCH_LIMIT, PITCH_LIMIT);
        let yaw = dir.x.atan2(dir.z);
        self.focus = Some((yaw, pitch));
        self.yaw_velocity = 0.0;
        self.pitch_velocity = 0.0;
    }

    /// Advances by `dt` seconds. Velocities are per reference frame and decay
    /// by `damping` per reference frame, integrated exactly so the motion
    /// does not depend on how `dt` is sliced.
    pub fn advance(&mut self, dt: f32) {
        let retained = 1.0 - self.damping;
        let ease = 1.0 - retained.powf(dt * REFERENCE_FPS);
        // Frames' worth of velocity travelled while decaying over `dt`.
        let frames = ease / -retained.ln();
        if let Some((target_yaw, target_pitch)) = self.focus {
            let dyaw = wrap_angle(target_yaw - self.yaw);
            let dpitch = target_pitch - self.pitch;
            if dyaw.abs() < FOCUS_EPSILON && dpitch.abs() < FOCUS_EPSILON {
                self.yaw = target_yaw;
                self.pitch = target_pitch;
                self.focus = None;
            } else {
                self.yaw += dyaw * ease;
                self.pitch += dpitch * ease;
            }
        } else if self.auto_rotate && !self.is_dragging {
            self.yaw += self.auto_rotate_speed * dt;
        }

        self.yaw = wrap_angle(self.yaw + self.yaw_velocity * frames);
        self.pitch = (self.pitch + self.pitch_velocity * frames).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.distance = (self.distance + self.zoom_velocity * frames)
            .clamp(self.min_distance, self.max_distance);

        let decay = 1.0 - ease;
        self.yaw_velocity *= decay;
        self.pitch_velocity *= decay;
        self.zoom_velocity *= decay;
    }

    pub fn eye_position(&self) -> Vec3 {
        Vec3::new(
            self.pitch.cos() * self.yaw.sin(),
            self.pitch.sin(),
            self.pitch.cos() * self.yaw.cos(),
        ) * self.distance
    }

    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.eye_position()).looking_at(Vec3::ZERO, Vec3::Y)
    }
}

/// Wraps into [-PI, PI).
fn wrap_angle(angle: f32) -> f32 {
    (angle + PI).rem_euclid(TAU) - PI
}

pub fn camera_controller(
    mut camera_query: Query<&mut Transform, With<Camera3d>>,
    mut globe_camera: ResMut<GlobeCamera>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: EventReader<MouseMotion>,
    mut scroll_events: EventReader<MouseWheel>,
    time: Res<Time>,
) {
    let Ok(mut camera_transform) = camera_query.single_mut() else {
        return;
    };

    let mouse_delta: Vec2 = mouse_motion.read().map(|m| m.delta).sum();
    globe_camera.is_dragging = mouse_button.pressed(MouseButton::Left);
    if globe_camera.is_dragging && mouse_delta != Vec2::ZERO {
        globe_camera.apply_drag(mouse_delta);
    }

    // Mouse wheel scroll accumulation (pixel and line scroll)
    let scroll_accum: f32 = scroll_events
        .read()
        .map(|ev| match ev.unit {
            MouseScrollUnit::Line => ev.y,
            MouseScrollUnit::Pixel => ev.y * 0.02,
        })
        .sum();
    if scroll_accum.abs() > f32::EPSILON {
        globe_camera.apply_zoom(scroll_accum);
    }

    globe_camera.advance(time.delta_secs());
    *camera_transform = globe_camera.transform();
}
