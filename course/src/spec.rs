use serde::{Deserialize, Serialize};

use crate::{Shape, Vec3f};

/// Placed collision shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumeSpec {
    pub position: Vec3f,
    pub shape: Shape,
}

impl VolumeSpec {
    pub fn new(position: Vec3f, shape: Shape) -> Self {
        Self { position, shape }
    }
}

/// Immovable collider (walls, lane dividers, ramps).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolidSpec {
    pub name: String,
    pub volume: VolumeSpec,
}

/// A body that can be knocked over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropSpec {
    pub volume: VolumeSpec,
    pub mass: f32,
    pub linear_damping: f32,
    pub angular_damping: f32,
    /// Where the knock lands, in the prop's local frame.
    pub impulse_point: Vec3f,
}

/// Static trigger volume plus the separate target it knocks over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnockdownSpec {
    pub volume: VolumeSpec,
    pub target: PropSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateOption {
    pub id: String,
    pub label: String,
    pub volume: VolumeSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PedestalOption {
    pub id: String,
    pub label: String,
    pub knockdown: KnockdownSpec,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfirmSpec {
    /// Target counts once its tilt passes the topple threshold.
    Tilt,
    /// Target counts a fixed delay after the hit.
    Delay,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneKind {
    /// Play button (freezes the car while the video runs) and a start gate.
    Intro {
        play_button: VolumeSpec,
        start_gate: VolumeSpec,
        decorations: Vec<KnockdownSpec>,
    },
    /// First option driven into is the answer.
    SingleChoice { options: Vec<GateOption> },
    /// Knocked-down options toggle; the continue gate submits.
    MultiSelect {
        options: Vec<PedestalOption>,
        continue_gate: VolumeSpec,
        confirm: ConfirmSpec,
    },
    /// Driving into the booth opens a prompt; the submitted text is the answer.
    FreeText { booth: VolumeSpec },
}

impl ZoneKind {
    pub fn option_id(&self, index: usize) -> Option<&str> {
        match self {
            ZoneKind::SingleChoice { options } => options.get(index).map(|o| o.id.as_str()),
            ZoneKind::MultiSelect { options, .. } => options.get(index).map(|o| o.id.as_str()),
            ZoneKind::Intro { .. } | ZoneKind::FreeText { .. } => None,
        }
    }
}

/// Extent of a zone along world Z (the travel axis runs toward -Z).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneSpan {
    pub min_z: f32,
    pub max_z: f32,
}

impl ZoneSpan {
    pub fn new(min_z: f32, max_z: f32) -> Self {
        Self { min_z, max_z }
    }

    pub fn overlaps(&self, other: &ZoneSpan) -> bool {
        self.min_z < other.max_z && other.min_z < self.max_z
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneSpec {
    pub id: String,
    pub title: String,
    pub span: ZoneSpan,
    /// Seconds between capturing an answer and completing the zone.
    pub completion_delay: f32,
    pub kind: ZoneKind,
    #[serde(default)]
    pub solids: Vec<SolidSpec>,
}

/// A whole drivable course: spawn point, boundary walls and ordered zones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseSpec {
    pub spawn: Vec3f,
    pub walls: Vec<SolidSpec>,
    pub zones: Vec<ZoneSpec>,
}
