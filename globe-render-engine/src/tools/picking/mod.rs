//! Pointer picking for globe markers.
//!
//! A left click that does not turn into an orbit drag is converted to
//! normalised device coordinates, unprojected into a world ray through the
//! active camera and tested against the pick volume of every marker part.
//! The nearest hit's metadata is looked up in [`GlobeRecords`] and, if it
//! names exactly one record, a [`RecordSelected`] event is written for the
//! host bridge to forward.
//!
//! Misses and stale ids are not errors; they simply select nothing.
//!
//! [`GlobeRecords`]: crate::engine::markers::records::GlobeRecords

use crate::engine::core::context::globe_is_running;
use crate::engine::markers::records::{EntityKind, GlobeRecord};
use bevy::prelude::*;

/// Ray/volume intersection tests in a part's local frame.
pub mod ray;

/// NDC conversion, nearest-hit resolution and the click system.
pub mod resolver;

pub use ray::PickVolume;

/// Identifies the record a marker part stands for. Every part of a marker
/// carries an identical copy so any of them resolves to the same record.
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct PickMetadata {
    pub entity_id: String,
    pub entity_kind: EntityKind,
    pub name: String,
}

/// Outcome of one pick, consumed by the click system that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickResult {
    pub entity_id: String,
    pub entity_kind: EntityKind,
}

/// A record chosen by clicking its marker.
#[derive(Event, Debug, Clone)]
pub struct RecordSelected {
    pub kind: EntityKind,
    pub record: GlobeRecord,
}

/// Cursor position at the last left press, cleared on release.
#[derive(Resource, Default)]
pub struct PointerPress {
    pub position: Option<Vec2>,
}

pub struct MarkerPickingPlugin;

impl Plugin for MarkerPickingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PointerPress>()
            .add_event::<RecordSelected>()
            .add_systems(
                Update,
                resolver::pick_marker_on_click.run_if(globe_is_running),
            );
    }
}
