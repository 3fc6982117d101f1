use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureStatus {
    Loading,
    Loaded,
    Failed,
}

impl TextureStatus {
    pub fn is_settled(&self) -> bool {
        !matches!(self, Self::Loading)
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Loaded => "loaded",
            Self::Failed => "failed",
        }
    }
}

#[derive(Resource, Default, Debug)]
pub struct LoadingProgress {
    pub settings_loaded: bool,
    pub records_loaded: bool,
    pub scene_spawned: bool,
    pub textures_settled: bool,
    pub textures_loading_states: Vec<(String, TextureStatus)>,
}

impl LoadingProgress {
    /// A failed texture still counts: the globe renders untextured.
    pub fn is_complete(&self) -> bool {
        self.settings_loaded && self.records_loaded && self.scene_spawned && self.textures_settled
    }

    pub fn to_json(&self) -> serde_json::Value {
        let textures: serde_json::Map<String, serde_json::Value> = self
            .textures_loading_states
            .iter()
            .map(|(name, status)| (name.clone(), serde_json::json!(status.as_str())))
            .collect();

        serde_json::json!({
            "settings": self.settings_loaded,
            "records": self.records_loaded,
            "scene": self.scene_spawned,
            "textures": textures,
            "complete": self.is_complete(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_textures_do_not_block_completion() {
        let progress = LoadingProgress {
            settings_loaded: true,
            records_loaded: true,
            scene_spawned: true,
            textures_settled: true,
            textures_loading_states: vec![
                ("Day texture".into(), TextureStatus::Loaded),
                ("Cloud texture".into(), TextureStatus::Failed),
            ],
        };
        assert!(progress.is_complete());
        let json = progress.to_json();
        assert_eq!(json["textures"]["Cloud texture"], "failed");
        assert_eq!(json["complete"], true);
    }

    #[test]
    fn fresh_progress_is_incomplete() {
        assert!(!LoadingProgress::default().is_complete());
        assert!(!TextureStatus::Loading.is_settled());
    }
}
