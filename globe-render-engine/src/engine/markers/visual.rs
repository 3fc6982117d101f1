use crate::engine::geo::projection::{look_target, project, surface_orientation};
use crate::engine::markers::records::{EntityKind, GlobeRecord};
use crate::tools::picking::{PickMetadata, PickVolume};
use bevy::prelude::*;
use std::f32::consts::PI;

/// Marker state driving colour, shape and size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerStatus {
    Critical,
    NeedsAttention,
    Investment,
    Stable,
    Completed,
}

impl MarkerStatus {
    /// Reads `status` first and falls back to `category`. Anything
    /// unrecognised is treated as `Stable`.
    pub fn classify(status: &str, category: Option<&str>) -> Self {
        Self::from_label(status)
            .or_else(|| category.and_then(Self::from_label))
            .unwrap_or(Self::Stable)
    }

    fn from_label(label: &str) -> Option<Self> {
        let key: String = label
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .flat_map(char::to_lowercase)
            .collect();

        match key.as_str() {
            "critical" => Some(Self::Critical),
            "needsattention" | "attention" | "warning" => Some(Self::NeedsAttention),
            "investment" | "funding" | "openforinvestment" => Some(Self::Investment),
            "stable" | "good" | "normal" => Some(Self::Stable),
            "completed" | "complete" | "done" => Some(Self::Completed),
            _ => None,
        }
    }

    pub fn descriptor(&self) -> &'static VisualDescriptor {
        let index = match self {
            Self::Critical => 0,
            Self::NeedsAttention => 1,
            Self::Investment => 2,
            Self::Stable => 3,
            Self::Completed => 4,
        };
        &VISUAL_TABLE[index]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorFamily {
    Red,
    Amber,
    Blue,
    Teal,
    Violet,
}

impl ColorFamily {
    pub fn base_color(&self) -> Color {
        match self {
            Self::Red => Color::srgb(0.94, 0.27, 0.27),
            Self::Amber => Color::srgb(0.96, 0.62, 0.04),
            Self::Blue => Color::srgb(0.23, 0.51, 0.96),
            Self::Teal => Color::srgb(0.08, 0.72, 0.65),
            Self::Violet => Color::srgb(0.55, 0.36, 0.96),
        }
    }

    /// Self-lit tint so markers stay readable on the night side.
    pub fn emissive(&self) -> LinearRgba {
        self.base_color().to_linear() * 0.6
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeFamily {
    /// Sphere head over a downward cone.
    Droplet,
    /// Flat disc inside a ring, used for finished projects.
    Badge,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualDescriptor {
    pub status: MarkerStatus,
    pub color: ColorFamily,
    pub shape: ShapeFamily,
    pub scale: f32,
    pub pulses: bool,
}

pub const VISUAL_TABLE: [VisualDescriptor; 5] = [
    VisualDescriptor {
        status: MarkerStatus::Critical,
        color: ColorFamily::Red,
        shape: ShapeFamily::Droplet,
        scale: 1.4,
        pulses: true,
    },
    VisualDescriptor {
        status: MarkerStatus::NeedsAttention,
        color: ColorFamily::Amber,
        shape: ShapeFamily::Droplet,
        scale: 1.2,
        pulses: true,
    },
    VisualDescriptor {
        status: MarkerStatus::Investment,
        color: ColorFamily::Blue,
        shape: ShapeFamily::Droplet,
        scale: 1.1,
        pulses: false,
    },
    VisualDescriptor {
        status: MarkerStatus::Stable,
        color: ColorFamily::Teal,
        shape: ShapeFamily::Droplet,
        scale: 1.0,
        pulses: false,
    },
    VisualDescriptor {
        status: MarkerStatus::Completed,
        color: ColorFamily::Violet,
        shape: ShapeFamily::Badge,
        scale: 1.0,
        pulses: false,
    },
];

/// Unit-sized mesh primitive a marker part is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartMesh {
    DropletHead,
    DropletTip,
    BadgeDisc,
    BadgeRing,
}

impl PartMesh {
    pub fn mesh(&self) -> Mesh {
        match self {
            Self::DropletHead => Sphere::new(0.32).mesh().uv(16, 12),
            Self::DropletTip => Cone {
                radius: 0.26,
                height: 0.6,
            }
            .into(),
            Self::BadgeDisc => Cylinder::new(0.36, 0.08).into(),
            Self::BadgeRing => Torus::new(0.38, 0.48).into(),
        }
    }
}

/// One sub-mesh of a marker, in the marker's local frame (+Y is outward).
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerPart {
    pub mesh: PartMesh,
    pub transform: Transform,
    pub volume: PickVolume,
}

/// Sizes used when laying markers out on a globe.
#[derive(Debug, Clone, Copy)]
pub struct MarkerLayout {
    pub globe_radius: f32,
    pub surface_offset: f32,
    pub base_size: f32,
}

/// Render-only proxy for one record, rebuilt whenever the input changes.
#[derive(Debug, Clone)]
pub struct MarkerVisual {
    pub position: Vec3,
    pub orientation: Quat,
    pub look_target: Vec3,
    pub scale: f32,
    pub status: MarkerStatus,
    pub color: ColorFamily,
    pub shape: ShapeFamily,
    pub pulses: bool,
    pub pick: PickMetadata,
    pub parts: Vec<MarkerPart>,
}

impl MarkerVisual {
    pub fn build(record: &GlobeRecord, kind: EntityKind, layout: &MarkerLayout) -> Self {
        let status = MarkerStatus::classify(&record.status, record.category.as_deref());
        let descriptor = status.descriptor();
        let position = project(
            record.geo_point(),
            layout.globe_radius + layout.surface_offset,
        );

        Self {
            position,
            orientation: surface_orientation(position),
            look_target: look_target(position),
            scale: layout.base_size * descriptor.scale,
            status,
            color: descriptor.color,
            shape: descriptor.shape,
            pulses: descriptor.pulses,
            pick: PickMetadata {
                entity_id: record.id.clone(),
                entity_kind: kind,
                name: record.name.clone(),
            },
            parts: shape_parts(descriptor.shape),
        }
    }

    /// World transform of the marker root.
    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.position)
            .with_rotation(self.orientation)
            .with_scale(Vec3::splat(self.scale))
    }
}

fn shape_parts(shape: ShapeFamily) -> Vec<MarkerPart> {
    match shape {
        ShapeFamily::Droplet => vec![
            MarkerPart {
                mesh: PartMesh::DropletTip,
                // Apex touches the surface, base opens upward.
                transform: Transform::from_xyz(0.0, 0.3, 0.0)
                    .with_rotation(Quat::from_rotation_x(PI)),
                volume: PickVolume::Box(Vec3::new(0.52, 0.6, 0.52)),
            },
            MarkerPart {
                mesh: PartMesh::DropletHead,
                transform: Transform::from_xyz(0.0, 0.72, 0.0),
                volume: PickVolume::Sphere(0.32),
            },
        ],
        ShapeFamily::Badge => vec![
            MarkerPart {
                mesh: PartMesh::BadgeDisc,
                transform: Transform::from_xyz(0.0, 0.04, 0.0),
                volume: PickVolume::Box(Vec3::new(0.72, 0.08, 0.72)),
            },
            MarkerPart {
                mesh: PartMesh::BadgeRing,
                transform: Transform::from_xyz(0.0, 0.05, 0.0),
                volume: PickVolume::Box(Vec3::new(0.96, 0.1, 0.96)),
            },
        ],
    }
}
