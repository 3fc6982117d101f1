use crate::engine::geo::projection::GeoPoint;
use bevy::prelude::*;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Which list a record came from. Selections are reported back to the host
/// under the matching notification name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Resource,
    Project,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Resource => "resource",
            Self::Project => "project",
        }
    }

    /// RPC notification fired when a marker of this kind is clicked.
    pub fn selection_method(&self) -> &'static str {
        match self {
            Self::Resource => "resource_selected",
            Self::Project => "project_selected",
        }
    }
}

/// A water resource or project as supplied by the host application.
/// Display fields the engine does not use are kept in `details` and echoed
/// back untouched on selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobeRecord {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, deserialize_with = "text_or_blank")]
    pub status: String,
    #[serde(default, deserialize_with = "optional_text")]
    pub category: Option<String>,
    #[serde(flatten)]
    pub details: serde_json::Map<String, serde_json::Value>,
}

impl GlobeRecord {
    pub fn geo_point(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    })
}

// Classification fields: anything that is not a string reads as unset, so the
// record falls back to the default visual instead of failing the whole list.
fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Some(s),
        _ => None,
    })
}

fn text_or_blank<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_text(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("malformed record payload: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Accepts either a bare array of records or `{ "records": [...] }`.
pub fn parse_records(value: &serde_json::Value) -> Result<Vec<GlobeRecord>, RecordError> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Payload {
        List(Vec<GlobeRecord>),
        Wrapped { records: Vec<GlobeRecord> },
    }

    let payload = serde_json::from_value::<Payload>(value.clone())?;
    Ok(match payload {
        Payload::List(records) | Payload::Wrapped { records } => records,
    })
}

/// Bundled record file shape, loaded through the JSON asset plugin.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Asset, TypePath)]
pub struct RecordSet {
    #[serde(default)]
    pub resources: Vec<GlobeRecord>,
    #[serde(default)]
    pub projects: Vec<GlobeRecord>,
}

/// Current input lists. Any mutation through `ResMut` triggers a full marker
/// rebuild.
#[derive(Resource, Debug, Clone, Default)]
pub struct GlobeRecords {
    pub resources: Vec<GlobeRecord>,
    pub projects: Vec<GlobeRecord>,
}

impl GlobeRecords {
    pub fn list(&self, kind: EntityKind) -> &[GlobeRecord] {
        match kind {
            EntityKind::Resource => &self.resources,
            EntityKind::Project => &self.projects,
        }
    }

    pub fn replace(&mut self, kind: EntityKind, records: Vec<GlobeRecord>) {
        match kind {
            EntityKind::Resource => self.resources = records,
            EntityKind::Project => self.projects = records,
        }
    }

    /// Looks a picked id up. Only an unambiguous match counts; a missing or
    /// duplicated id gives `None`.
    pub fn find(&self, kind: EntityKind, id: &str) -> Option<&GlobeRecord> {
        let mut matches = self.list(kind).iter().filter(|r| r.id == id);
        let first = matches.next()?;
        if matches.next().is_some() {
            return None;
        }
        Some(first)
    }

    /// All records tagged with their kind, resources first.
    pub fn iter(&self) -> impl Iterator<Item = (EntityKind, &GlobeRecord)> {
        self.resources
            .iter()
            .map(|r| (EntityKind::Resource, r))
            .chain(self.projects.iter().map(|r| (EntityKind::Project, r)))
    }
}

impl From<RecordSet> for GlobeRecords {
    fn from(set: RecordSet) -> Self {
        Self {
            resources: set.resources,
            projects: set.projects,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::markers::visual::MarkerStatus;
    use serde_json::json;

    fn record(id: &str) -> GlobeRecord {
        GlobeRecord {
            id: id.to_string(),
            name: format!("record {id}"),
            latitude: 0.0,
            longitude: 0.0,
            status: String::new(),
            category: None,
            details: Default::default(),
        }
    }

    #[test]
    fn numeric_ids_and_extra_fields_are_kept() {
        let parsed = parse_records(&json!([{
            "id": 17,
            "name": "Aral basin",
            "latitude": 45.0,
            "longitude": 60.0,
            "status": "Critical",
            "region": "Central Asia",
            "qualityIndex": 0.31
        }]))
        .unwrap();

        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].id, "17");
        assert_eq!(parsed[0].details["region"], json!("Central Asia"));
        assert_eq!(parsed[0].category, None);

        let echoed = serde_json::to_value(&parsed[0]).unwrap();
        assert_eq!(echoed["qualityIndex"], json!(0.31));
    }

    #[test]
    fn wrapped_payloads_parse() {
        let parsed = parse_records(&json!({
            "records": [{ "id": "p-1", "latitude": 1.0, "longitude": 2.0 }]
        }))
        .unwrap();
        assert_eq!(parsed[0].id, "p-1");
        assert_eq!(parsed[0].status, "");
    }

    #[test]
    fn non_string_status_and_category_read_as_unset() {
        let parsed = parse_records(&json!([
            { "id": "ok", "latitude": 1.0, "longitude": 2.0, "status": "Critical" },
            { "id": "n", "latitude": 3.0, "longitude": 4.0, "status": null, "category": null },
            { "id": "3", "latitude": 5.0, "longitude": 6.0, "status": 3, "category": ["x"] }
        ]))
        .unwrap();

        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed[0].status, "Critical");
        assert_eq!(parsed[1].status, "");
        assert_eq!(parsed[1].category, None);
        assert_eq!(parsed[2].status, "");
        assert_eq!(parsed[2].category, None);
        assert_eq!(
            MarkerStatus::classify(&parsed[2].status, parsed[2].category.as_deref()),
            MarkerStatus::Stable
        );
    }

    #[test]
    fn missing_coordinates_are_rejected() {
        let err = parse_records(&json!([{ "id": "x", "name": "no coords" }]));
        assert!(matches!(err, Err(RecordError::Malformed(_))));
    }

    #[test]
    fn find_requires_a_unique_match() {
        let mut records = GlobeRecords::default();
        records.replace(EntityKind::Resource, vec![record("a"), record("b"), record("b")]);
        records.replace(EntityKind::Project, vec![record("a")]);

        assert_eq!(records.find(EntityKind::Resource, "a").map(|r| r.id.as_str()), Some("a"));
        assert!(records.find(EntityKind::Resource, "b").is_none());
        assert!(records.find(EntityKind::Resource, "zzz").is_none());
        assert!(records.find(EntityKind::Project, "a").is_some());
        assert_eq!(records.iter().count(), 4);
    }
}
