//! Immutable volume tree produced by one build.
//!
//! Hierarchy: World → {Target, Shield, Vacuum, Wall}
//!
//! The four daughters are siblings under the world, all centred on the
//! origin. A published tree is never mutated; changes produce a new tree.

use crate::geom::tube::Inside;
use crate::geom::volume::{Volume, VolumeKind};
use crate::material::Material;
use crate::name::find_by_name;
use crate::units::best_length;
use crate::{Point, UID};
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct ResolvedGeometry {
    uid: UID,
    revision: u32,
    world: Volume,
    daughters: Vec<Volume>,
}

impl ResolvedGeometry {
    pub(crate) fn new(world: Volume, daughters: Vec<Volume>) -> Self {
        Self {
            uid: UID::new(),
            revision: 0,
            world,
            daughters,
        }
    }

    /// Identity of the build this tree comes from.
    pub fn uid(&self) -> &UID {
        &self.uid
    }

    /// Number of material swaps applied since the build.
    pub fn revision(&self) -> u32 {
        self.revision
    }

    pub fn world(&self) -> &Volume {
        &self.world
    }

    /// Daughters of the world, innermost first.
    pub fn daughters(&self) -> &[Volume] {
        &self.daughters
    }

    /// World followed by its daughters.
    pub fn volumes(&self) -> impl Iterator<Item = &Volume> {
        std::iter::once(&self.world).chain(self.daughters.iter())
    }

    /// Looks up a logical volume by name.
    pub fn volume(&self, name: &str) -> Option<&Volume> {
        if self.world.name == name {
            return Some(&self.world);
        }
        find_by_name(&self.daughters, name)
    }

    pub fn volume_of(&self, kind: VolumeKind) -> Option<&Volume> {
        self.volumes().find(|v| v.kind == kind)
    }

    pub fn target(&self) -> Option<&Volume> {
        self.volume_of(VolumeKind::Target)
    }

    /// Returns the innermost volume containing `p`, `None` outside the world.
    ///
    /// A point on a boundary shared by two daughters belongs to the inner one.
    pub fn locate(&self, p: Point) -> Option<&Volume> {
        let local = self.world.placement.to_local(p);
        if self.world.solid.inside(local) == Inside::Outside {
            return None;
        }
        if let Some(v) = self
            .daughters
            .iter()
            .find(|d| d.inside(local) == Inside::Inside)
        {
            return Some(v);
        }
        let on_surface = self
            .daughters
            .iter()
            .find(|d| d.inside(local) == Inside::Surface);
        Some(on_surface.unwrap_or(&self.world))
    }

    /// Returns a copy with one volume's material replaced.
    ///
    /// Dimensions are untouched, so the copy keeps the build identity and
    /// only bumps the revision.
    pub fn with_material(&self, kind: VolumeKind, material: Arc<Material>) -> Self {
        let mut next = self.clone();
        if next.world.kind == kind {
            next.world.material = Arc::clone(&material);
        }
        for d in next.daughters.iter_mut().filter(|d| d.kind == kind) {
            d.material = Arc::clone(&material);
        }
        next.revision += 1;
        next
    }

    /// True if both trees have identical shapes, placements and materials.
    pub fn same_layout(&self, other: &Self) -> bool {
        self.world == other.world && self.daughters == other.daughters
    }
}

impl fmt::Display for ResolvedGeometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Geometry {} (revision {})", self.uid.short(), self.revision)?;
        for v in self.volumes() {
            write!(
                f,
                "\n {} : Length = {} Rmin = {} Rmax = {} Material = {} Mass = {:.4} kg",
                v.name,
                best_length(v.length()),
                best_length(v.inner_radius()),
                best_length(v.outer_radius()),
                v.material.name,
                v.mass()
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::tube::Tube;
    use crate::material::{GasState, State};

    fn material(name: &str) -> Arc<Material> {
        Arc::new(Material::new(name, 1.0, State::Solid, GasState::ntp()))
    }

    fn two_shells() -> ResolvedGeometry {
        let world = Volume::new(VolumeKind::World, Tube::disk(4.0, 10.0), material("air"));
        let target = Volume::new(VolumeKind::Target, Tube::disk(1.0, 4.0), material("lar"));
        let shield = Volume::new(
            VolumeKind::Shield,
            Tube::annulus(1.0, 2.0, 4.0),
            material("steel"),
        );
        ResolvedGeometry::new(world, vec![target, shield])
    }

    #[test]
    fn test_lookup_by_name() {
        let g = two_shells();
        assert_eq!(g.volume("Shield").map(|v| v.kind), Some(VolumeKind::Shield));
        assert_eq!(g.volume("World").map(|v| v.kind), Some(VolumeKind::World));
        assert!(g.volume("Wall").is_none());
        assert!(g.target().is_some());
    }

    #[test]
    fn test_locate() {
        let g = two_shells();
        let name = |p: Point| g.locate(p).map(|v| v.name.clone());
        assert_eq!(name(Point::origin()).as_deref(), Some("Target"));
        assert_eq!(name(Point::new(1.5, 0.0, 0.0)).as_deref(), Some("Shield"));
        assert_eq!(name(Point::new(1.0, 0.0, 0.0)).as_deref(), Some("Target"));
        assert_eq!(name(Point::new(3.0, 0.0, 0.0)).as_deref(), Some("World"));
        assert_eq!(name(Point::new(0.0, 0.0, 3.0)).as_deref(), Some("World"));
        assert_eq!(name(Point::new(5.0, 0.0, 0.0)), None);
    }

    #[test]
    fn test_with_material_keeps_identity() {
        let g = two_shells();
        let swapped = g.with_material(VolumeKind::Shield, material("lead"));
        assert_eq!(swapped.uid(), g.uid());
        assert_eq!(swapped.revision(), 1);
        assert_eq!(swapped.volume("Shield").unwrap().material.name, "lead");
        assert_eq!(g.volume("Shield").unwrap().material.name, "steel");
        assert_eq!(
            swapped.volume("Shield").unwrap().solid,
            g.volume("Shield").unwrap().solid
        );
        assert!(!swapped.same_layout(&g));
    }
}
