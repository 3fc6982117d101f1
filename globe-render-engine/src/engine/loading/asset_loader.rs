use crate::engine::core::settings::GlobeSettings;
use crate::engine::loading::progress::LoadingProgress;
use crate::engine::markers::records::{GlobeRecords, RecordSet};
use bevy::asset::LoadState;
use bevy::prelude::*;
use constants::path::{MOCK_RECORDS_FILE, RELATIVE_GLOBE_PATH, SETTINGS_FILE};

#[derive(Resource, Default)]
pub struct GlobeAssetLoader {
    settings: Option<Handle<GlobeSettings>>,
    records: Option<Handle<RecordSet>>,
}

/// Where a JSON asset has got to, collapsed to what the loading stage needs.
enum Resolution<'a, T> {
    Pending,
    Ready(&'a T),
    Unavailable,
}

fn resolve<'a, T: Asset>(
    handle: &Option<Handle<T>>,
    assets: &'a Assets<T>,
    asset_server: &AssetServer,
) -> Resolution<'a, T> {
    let Some(handle) = handle else {
        return Resolution::Unavailable;
    };
    if let Some(asset) = assets.get(handle) {
        return Resolution::Ready(asset);
    }
    match asset_server.get_load_state(handle) {
        Some(LoadState::Failed(_)) | None => Resolution::Unavailable,
        _ => Resolution::Pending,
    }
}

// Start the loading process
pub fn start_loading(
    mut loader: ResMut<GlobeAssetLoader>,
    mut loading_progress: ResMut<LoadingProgress>,
    asset_server: Res<AssetServer>,
) {
    *loading_progress = LoadingProgress::default();
    loader.settings = Some(asset_server.load(format!("{RELATIVE_GLOBE_PATH}/{SETTINGS_FILE}")));
    loader.records = Some(asset_server.load(format!("{RELATIVE_GLOBE_PATH}/{MOCK_RECORDS_FILE}")));
    info!("→ Loading globe settings and bundled records");
}

pub fn load_settings_system(
    mut loading_progress: ResMut<LoadingProgress>,
    loader: Res<GlobeAssetLoader>,
    mut settings: ResMut<GlobeSettings>,
    settings_assets: Res<Assets<GlobeSettings>>,
    asset_server: Res<AssetServer>,
) {
    if loading_progress.settings_loaded {
        return;
    }

    match resolve(&loader.settings, &settings_assets, &asset_server) {
        Resolution::Pending => return,
        Resolution::Ready(loaded) => match loaded.validate() {
            Ok(()) => {
                info!("✓ Globe settings loaded");
                *settings = loaded.clone();
            }
            Err(err) => {
                warn!("Ignoring globe settings file: {err}");
                *settings = GlobeSettings::default();
            }
        },
        Resolution::Unavailable => {
            warn!("Globe settings unavailable, using defaults");
            *settings = GlobeSettings::default();
        }
    }
    loading_progress.settings_loaded = true;
}

/// Bundled records only fill an empty store: anything the host already pushed
/// wins. Returns whether the bundle was applied.
pub fn merge_bundled(records: &mut GlobeRecords, bundled: &RecordSet) -> bool {
    if !records.resources.is_empty() || !records.projects.is_empty() {
        return false;
    }
    *records = GlobeRecords::from(bundled.clone());
    true
}

pub fn load_records_system(
    mut loading_progress: ResMut<LoadingProgress>,
    loader: Res<GlobeAssetLoader>,
    mut records: ResMut<GlobeRecords>,
    record_assets: Res<Assets<RecordSet>>,
    asset_server: Res<AssetServer>,
) {
    if loading_progress.records_loaded {
        return;
    }

    match resolve(&loader.records, &record_assets, &asset_server) {
        Resolution::Pending => return,
        Resolution::Ready(bundled) => {
            if merge_bundled(&mut records, bundled) {
                info!(
                    "✓ Bundled records loaded: {} resources, {} projects",
                    bundled.resources.len(),
                    bundled.projects.len()
                );
            } else {
                debug!("Host records already present, bundled records skipped");
            }
        }
        Resolution::Unavailable => {
            warn!("Bundled records unavailable, waiting for host data");
        }
    }
    loading_progress.records_loaded = true;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::markers::records::{EntityKind, GlobeRecord};

    fn record(id: &str) -> GlobeRecord {
        serde_json::from_value(serde_json::json!({
            "id": id, "name": id, "latitude": 0.0, "longitude": 0.0
        }))
        .unwrap()
    }

    #[test]
    fn bundled_records_fill_an_empty_store() {
        let mut records = GlobeRecords::default();
        let bundle = RecordSet {
            resources: vec![record("r1")],
            projects: vec![record("p1"), record("p2")],
        };
        assert!(merge_bundled(&mut records, &bundle));
        assert_eq!(records.list(EntityKind::Resource).len(), 1);
        assert_eq!(records.list(EntityKind::Project).len(), 2);
    }

    #[test]
    fn host_records_are_not_overwritten() {
        let mut records = GlobeRecords::default();
        records.replace(EntityKind::Project, vec![record("host")]);
        let bundle = RecordSet {
            resources: vec![record("bundled")],
            projects: vec![],
        };
        assert!(!merge_bundled(&mut records, &bundle));
        assert!(records.list(EntityKind::Resource).is_empty());
        assert_eq!(records.list(EntityKind::Project)[0].id, "host");
    }
}
