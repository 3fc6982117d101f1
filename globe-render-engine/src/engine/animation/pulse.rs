use crate::engine::core::settings::GlobeSettings;
use bevy::prelude::*;

/// Marks a marker root that breathes around its base scale.
#[derive(Component, Debug, Clone, Copy)]
pub struct MarkerPulse {
    pub base_scale: f32,
    /// Offsets neighbouring markers so they do not pulse in lockstep.
    pub phase: f32,
}

/// Scale at `elapsed` seconds. Never drops below `base * (1 - amplitude)`.
pub fn pulse_scale(base: f32, elapsed: f32, phase: f32, amplitude: f32, speed: f32) -> f32 {
    base * (1.0 + amplitude * (elapsed * speed + phase).sin())
}

pub fn animate_marker_pulse(
    mut markers: Query<(&MarkerPulse, &mut Transform)>,
    settings: Res<GlobeSettings>,
    time: Res<Time>,
) {
    let elapsed = time.elapsed_secs();
    for (pulse, mut transform) in &mut markers {
        let scale = pulse_scale(
            pulse.base_scale,
            elapsed,
            pulse.phase,
            settings.pulse_amplitude,
            settings.pulse_speed,
        );
        transform.scale = Vec3::splat(scale);
    }
}
