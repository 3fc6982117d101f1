/// Asset-relative location of the bundled globe data.
pub const RELATIVE_GLOBE_PATH: &str = "globe";

pub const SETTINGS_FILE: &str = "globe.settings.json";
pub const MOCK_RECORDS_FILE: &str = "mock.records.json";
