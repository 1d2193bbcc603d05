use crate::geom::tube::{Inside, Tube};
use crate::material::Material;
use crate::{HasName, Point, Vector};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Logical role of a volume in the concentric layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VolumeKind {
    World,
    Target,
    Shield,
    Vacuum,
    Wall,
}

impl VolumeKind {
    /// Daughters of the world, innermost first.
    pub const DAUGHTERS: [VolumeKind; 4] = [
        VolumeKind::Target,
        VolumeKind::Shield,
        VolumeKind::Vacuum,
        VolumeKind::Wall,
    ];

    /// Logical volume name.
    pub fn name(&self) -> &'static str {
        match self {
            VolumeKind::World => "World",
            VolumeKind::Target => "Target",
            VolumeKind::Shield => "Shield",
            VolumeKind::Vacuum => "Vacuum",
            VolumeKind::Wall => "Wall",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "World" => Some(VolumeKind::World),
            "Target" => Some(VolumeKind::Target),
            "Shield" => Some(VolumeKind::Shield),
            "Vacuum" => Some(VolumeKind::Vacuum),
            "Wall" => Some(VolumeKind::Wall),
            _ => None,
        }
    }
}

impl fmt::Display for VolumeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Placement of a volume inside its mother.
///
/// Rotation is not supported: all volumes are axis-aligned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub translation: Vector,
    pub copy_number: u32,
}

impl Placement {
    /// No rotation, at (0, 0, 0), copy number 0.
    pub fn at_origin() -> Self {
        Self {
            translation: Vector::zero(),
            copy_number: 0,
        }
    }

    /// Converts a point from the mother frame to the volume frame.
    pub fn to_local(&self, p: Point) -> Point {
        p - self.translation
    }
}

impl Default for Placement {
    fn default() -> Self {
        Self::at_origin()
    }
}

/// A placed volume: shape, material and position.
#[derive(Debug, Clone, PartialEq)]
pub struct Volume {
    pub name: String,
    pub kind: VolumeKind,
    pub solid: Tube,
    pub material: Arc<Material>,
    pub placement: Placement,
}

impl HasName for Volume {
    fn get_name(&self) -> &str {
        &self.name
    }
}

impl Volume {
    /// Creates a volume placed at the origin, named after its kind.
    pub fn new(kind: VolumeKind, solid: Tube, material: Arc<Material>) -> Self {
        Self {
            name: kind.name().to_string(),
            kind,
            solid,
            material,
            placement: Placement::at_origin(),
        }
    }

    /// Classifies a point given in the mother frame.
    pub fn inside(&self, p: Point) -> Inside {
        self.solid.inside(self.placement.to_local(p))
    }

    pub fn inner_radius(&self) -> f64 {
        self.solid.rmin
    }

    pub fn outer_radius(&self) -> f64 {
        self.solid.rmax
    }

    pub fn length(&self) -> f64 {
        self.solid.length()
    }

    pub fn cubic_volume(&self) -> f64 {
        self.solid.cubic_volume()
    }

    /// Mass in kg (volume in mm^3, density in kg/m^3).
    pub fn mass(&self) -> f64 {
        self.cubic_volume() * 1e-9 * self.material.density
    }
}
