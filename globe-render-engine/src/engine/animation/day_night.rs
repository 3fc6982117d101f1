use crate::engine::camera::globe_camera::GlobeCamera;
use crate::engine::core::context::GlobeContext;
use crate::engine::core::settings::GlobeSettings;
use bevy::prelude::*;

const DAY_SUN_ILLUMINANCE: f32 = 9_000.0;
const NIGHT_SUN_ILLUMINANCE: f32 = 600.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightingMode {
    Day,
    Night,
}

impl LightingMode {
    /// Mode for a camera that starts at `distance`, before any hysteresis applies.
    pub fn initial(distance: f32, night_distance: f32) -> Self {
        if distance >= night_distance {
            Self::Night
        } else {
            Self::Day
        }
    }

    pub fn sun_illuminance(&self) -> f32 {
        match self {
            Self::Day => DAY_SUN_ILLUMINANCE,
            Self::Night => NIGHT_SUN_ILLUMINANCE,
        }
    }
}

/// Close-up shows the day surface, pulled back shows city lights. Between the
/// two thresholds the current mode is kept.
#[derive(Resource, Debug, Clone, Copy)]
pub struct DayNightSwitch {
    pub mode: LightingMode,
}

impl Default for DayNightSwitch {
    fn default() -> Self {
        Self {
            mode: LightingMode::Day,
        }
    }
}

impl DayNightSwitch {
    /// Returns the new mode when `distance` crosses the far side of the band.
    pub fn update(
        &mut self,
        distance: f32,
        day_distance: f32,
        night_distance: f32,
    ) -> Option<LightingMode> {
        let next = match self.mode {
            LightingMode::Day if distance >= night_distance => LightingMode::Night,
            LightingMode::Night if distance <= day_distance => LightingMode::Day,
            _ => return None,
        };
        self.mode = next;
        Some(next)
    }
}

#[derive(Component)]
pub struct SunLight;

pub fn update_day_night(
    globe_camera: Res<GlobeCamera>,
    settings: Res<GlobeSettings>,
    context: Res<GlobeContext>,
    mut switch: ResMut<DayNightSwitch>,
    mut globes: Query<&mut MeshMaterial3d<StandardMaterial>>,
    mut suns: Query<&mut DirectionalLight, With<SunLight>>,
) {
    let Some(mode) = switch.update(
        globe_camera.distance,
        settings.day_distance,
        settings.night_distance,
    ) else {
        return;
    };

    debug!("Lighting switched to {:?} at distance {:.2}", mode, globe_camera.distance);

    let material = match mode {
        LightingMode::Day => context.day_material.clone(),
        LightingMode::Night => context.night_material.clone(),
    };
    if let Some(entity) = context.globe {
        if let Ok(mut globe_material) = globes.get_mut(entity) {
            globe_material.0 = material;
        }
    }
    for mut sun in &mut suns {
        sun.illuminance = mode.sun_illuminance();
    }
}
