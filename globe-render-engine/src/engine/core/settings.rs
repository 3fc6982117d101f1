use crate::engine::markers::visual::MarkerLayout;
use bevy::prelude::*;
use constants::coordinate_system::{
    CLOUD_RADIUS, GLOBE_RADIUS, MARKER_BASE_SIZE, MARKER_SURFACE_OFFSET,
};
use constants::render_settings::{
    AUTO_ROTATE_SPEED, CAMERA_DAMPING, CAMERA_MAX_DISTANCE, CAMERA_MIN_DISTANCE,
    CAMERA_START_DISTANCE, CLOUD_ROTATION_SPEED, DAY_DISTANCE, NIGHT_DISTANCE, PICK_DRAG_TOLERANCE,
    PULSE_AMPLITUDE, PULSE_SPEED,
};
use constants::texture::{CLOUD_TEXTURE_PATH, DAY_TEXTURE_PATH, NIGHT_TEXTURE_PATH};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Runtime tunables. Loaded from `globe/globe.settings.json` when present;
/// any field left out keeps its compiled-in default.
#[derive(Resource, Asset, TypePath, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobeSettings {
    pub globe_radius: f32,
    pub cloud_radius: f32,
    pub marker_base_size: f32,
    pub marker_surface_offset: f32,
    pub day_distance: f32,
    pub night_distance: f32,
    pub cloud_rotation_speed: f32,
    pub pulse_amplitude: f32,
    pub pulse_speed: f32,
    pub camera_damping: f32,
    pub camera_min_distance: f32,
    pub camera_max_distance: f32,
    pub camera_start_distance: f32,
    pub auto_rotate: bool,
    pub auto_rotate_speed: f32,
    pub pick_drag_tolerance: f32,
    pub textures: TextureSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureSettings {
    pub day: String,
    pub night: String,
    pub clouds: String,
}

impl Default for TextureSettings {
    fn default() -> Self {
        Self {
            day: DAY_TEXTURE_PATH.to_string(),
            night: NIGHT_TEXTURE_PATH.to_string(),
            clouds: CLOUD_TEXTURE_PATH.to_string(),
        }
    }
}

impl Default for GlobeSettings {
    fn default() -> Self {
        Self {
            globe_radius: GLOBE_RADIUS,
            cloud_radius: CLOUD_RADIUS,
            marker_base_size: MARKER_BASE_SIZE,
            marker_surface_offset: MARKER_SURFACE_OFFSET,
            day_distance: DAY_DISTANCE,
            night_distance: NIGHT_DISTANCE,
            cloud_rotation_speed: CLOUD_ROTATION_SPEED,
            pulse_amplitude: PULSE_AMPLITUDE,
            pulse_speed: PULSE_SPEED,
            camera_damping: CAMERA_DAMPING,
            camera_min_distance: CAMERA_MIN_DISTANCE,
            camera_max_distance: CAMERA_MAX_DISTANCE,
            camera_start_distance: CAMERA_START_DISTANCE,
            auto_rotate: true,
            auto_rotate_speed: AUTO_ROTATE_SPEED,
            pick_drag_tolerance: PICK_DRAG_TOLERANCE,
            textures: TextureSettings::default(),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum SettingsError {
    #[error("globe radius must be positive, got {0}")]
    NonPositiveRadius(f32),
    #[error("night distance {night} must be greater than day distance {day}")]
    EmptyHysteresisBand { day: f32, night: f32 },
    #[error("camera distance range [{min}, {max}] is empty or inside the globe")]
    InvalidCameraRange { min: f32, max: f32 },
    #[error("camera damping must be in (0, 1], got {0}")]
    InvalidDamping(f32),
}

impl GlobeSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.globe_radius <= 0.0 {
            return Err(SettingsError::NonPositiveRadius(self.globe_radius));
        }
        if self.night_distance <= self.day_distance {
            return Err(SettingsError::EmptyHysteresisBand {
                day: self.day_distance,
                night: self.night_distance,
            });
        }
        if self.camera_min_distance <= self.globe_radius
            || self.camera_max_distance < self.camera_min_distance
        {
            return Err(SettingsError::InvalidCameraRange {
                min: self.camera_min_distance,
                max: self.camera_max_distance,
            });
        }
        if !(self.camera_damping > 0.0 && self.camera_damping <= 1.0) {
            return Err(SettingsError::InvalidDamping(self.camera_damping));
        }
        Ok(())
    }

    pub fn marker_layout(&self) -> MarkerLayout {
        MarkerLayout {
            globe_radius: self.globe_radius,
            surface_offset: self.marker_surface_offset,
            base_size: self.marker_base_size,
        }
    }
}
