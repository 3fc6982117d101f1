use crate::engine::core::context::GlobeContext;
use crate::engine::loading::progress::{LoadingProgress, TextureStatus};
use bevy::asset::LoadState;
use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlobeTexture {
    Day,
    Night,
    Clouds,
}

impl GlobeTexture {
    pub const ALL: [GlobeTexture; 3] = [Self::Day, Self::Night, Self::Clouds];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Day => "Day texture",
            Self::Night => "Night texture",
            Self::Clouds => "Cloud texture",
        }
    }

    fn handle<'a>(&self, context: &'a GlobeContext) -> &'a Handle<Image> {
        match self {
            Self::Day => &context.day_texture,
            Self::Night => &context.night_texture,
            Self::Clouds => &context.cloud_texture,
        }
    }
}

pub fn texture_status(load_state: Option<LoadState>) -> TextureStatus {
    match load_state {
        Some(LoadState::Loaded) => TextureStatus::Loaded,
        Some(LoadState::Failed(_)) | None => TextureStatus::Failed,
        Some(_) => TextureStatus::Loading,
    }
}

// Check the globe textures and degrade any that failed
pub fn check_texture_loading(
    mut loading_progress: ResMut<LoadingProgress>,
    context: Res<GlobeContext>,
    asset_server: Res<AssetServer>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut visibility: Query<&mut Visibility>,
) {
    if loading_progress.textures_settled || !loading_progress.scene_spawned {
        return;
    }

    let states: Vec<(GlobeTexture, TextureStatus)> = GlobeTexture::ALL
        .iter()
        .map(|texture| {
            let state = asset_server.get_load_state(texture.handle(&context));
            (*texture, texture_status(state))
        })
        .collect();

    let labelled: Vec<(String, TextureStatus)> = states
        .iter()
        .map(|(texture, status)| (texture.label().to_string(), *status))
        .collect();
    // Only touch progress on change so the host is not notified every frame.
    if loading_progress.textures_loading_states != labelled {
        loading_progress.textures_loading_states = labelled;
    }

    if !states.iter().all(|(_, status)| status.is_settled()) {
        return;
    }

    for (texture, status) in &states {
        if *status == TextureStatus::Failed {
            warn!("{} failed to load, rendering without it", texture.label());
            degrade(*texture, &context, &mut materials, &mut visibility);
        }
    }

    info!("✓ Globe textures settled");
    loading_progress.textures_settled = true;
}

fn degrade(
    texture: GlobeTexture,
    context: &GlobeContext,
    materials: &mut Assets<StandardMaterial>,
    visibility: &mut Query<&mut Visibility>,
) {
    match texture {
        GlobeTexture::Day => {
            if let Some(material) = materials.get_mut(&context.day_material) {
                material.base_color_texture = None;
            }
        }
        GlobeTexture::Night => {
            // The constant emissive only makes sense masked by the city lights.
            if let Some(material) = materials.get_mut(&context.night_material) {
                material.emissive_texture = None;
                material.base_color_texture = None;
                material.emissive = LinearRgba::BLACK;
            }
        }
        GlobeTexture::Clouds => {
            if let Some(entity) = context.clouds {
                if let Ok(mut clouds) = visibility.get_mut(entity) {
                    *clouds = Visibility::Hidden;
                }
            }
        }
    }
}
