use crate::error::Result;
use crate::geom::parameters::GeometryParameters;
use crate::geom::tree::ResolvedGeometry;
use crate::geom::tube::Tube;
use crate::geom::volume::{Volume, VolumeKind};
use crate::material::Material;
use crate::material::catalog::MaterialCatalog;
use crate::sim::overlap::check_overlaps;
use std::sync::Arc;

/// Builds the concentric volume tree from a parameter snapshot.
///
/// The build is atomic: on any error nothing is returned and the caller's
/// previous geometry stays authoritative.
#[derive(Debug, Clone, Default)]
pub struct ConcentricGeometryBuilder {
    /// Surface points sampled per daughter by the overlap check (0 disables it).
    pub overlap_samples: usize,
}

impl ConcentricGeometryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables the overlap check after each build.
    pub fn with_overlap_check(mut self, samples: usize) -> Self {
        self.overlap_samples = samples;
        self
    }

    pub fn build(
        &self,
        params: &GeometryParameters,
        catalog: &MaterialCatalog,
    ) -> Result<ResolvedGeometry> {
        params.validate()?;

        // All materials first: a failure here aborts before any volume exists
        let target_material = catalog.resolve_at(&params.target_material, params.target_state())?;
        let shield_material = catalog.resolve(&params.shield_material)?;
        let vacuum_material = catalog.resolve(&params.vacuum_material)?;
        let wall_material = catalog.resolve(&params.wall_material)?;
        let world_material = catalog.resolve(&params.world_material)?;

        let world = Self::place(params, VolumeKind::World, world_material);
        let daughters = vec![
            Self::place(params, VolumeKind::Target, target_material),
            Self::place(params, VolumeKind::Shield, shield_material),
            Self::place(params, VolumeKind::Vacuum, vacuum_material),
            Self::place(params, VolumeKind::Wall, wall_material),
        ];
        let geometry = ResolvedGeometry::new(world, daughters);

        if self.overlap_samples > 0 {
            let overlaps = check_overlaps(&geometry, self.overlap_samples, 0);
            for o in &overlaps {
                log::warn!("{}", o);
            }
            if overlaps.is_empty() {
                log::debug!("Overlap check passed ({} samples per volume)", self.overlap_samples);
            }
        }

        log::info!("\n{}\n{}", params, geometry);
        Ok(geometry)
    }

    fn place(params: &GeometryParameters, kind: VolumeKind, material: Arc<Material>) -> Volume {
        let (rmin, rmax) = params.radial_bounds(kind);
        let length = params.length_of(kind);
        let solid = if rmin == 0.0 {
            Tube::disk(rmax, length)
        } else {
            Tube::annulus(rmin, rmax, length)
        };
        Volume::new(kind, solid, material)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GeometryError;
    use crate::geom::parameters::Parameter;
    use crate::units::CM;
    use crate::{Placement, Point};

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn build(params: &GeometryParameters) -> Result<ResolvedGeometry> {
        ConcentricGeometryBuilder::new().build(params, &MaterialCatalog::new())
    }

    #[test]
    fn test_reference_dimensions() -> Result<()> {
        let g = build(&GeometryParameters::default())?;
        let wall = g.volume("Wall").unwrap();
        assert!(close(wall.inner_radius(), 17.0 * CM));
        assert!(close(wall.outer_radius(), 19.0 * CM));
        assert!(close(g.world().outer_radius(), 20.0 * CM));
        assert!(close(g.world().length(), 20.0 * CM));
        assert!(close(g.target().unwrap().length(), 15.0 * CM));
        Ok(())
    }

    #[test]
    fn test_shells_touch() -> Result<()> {
        let params = GeometryParameters {
            shield_thickness: 1.5 * CM,
            vacuum_thickness: 4.0 * CM,
            ..Default::default()
        };
        let g = build(&params)?;
        let d = g.daughters();
        assert_eq!(d.len(), 4);
        for pair in d.windows(2) {
            assert!(close(pair[1].inner_radius(), pair[0].outer_radius()));
            assert!(pair[1].outer_radius() > pair[0].outer_radius());
        }
        Ok(())
    }

    #[test]
    fn test_placements_at_origin() -> Result<()> {
        let g = build(&GeometryParameters::default())?;
        for v in g.volumes() {
            assert_eq!(v.placement, Placement::at_origin());
        }
        Ok(())
    }

    #[test]
    fn test_materials_assigned() -> Result<()> {
        let g = build(&GeometryParameters::default())?;
        assert_eq!(g.target().unwrap().material.name, "G4_lAr");
        assert_eq!(g.volume("Shield").unwrap().material.name, "G4_STAINLESS-STEEL");
        assert_eq!(g.volume("Vacuum").unwrap().material.name, "G4_Galactic");
        assert_eq!(g.volume("Wall").unwrap().material.name, "G4_STAINLESS-STEEL");
        assert_eq!(g.world().material.name, "Air");
        Ok(())
    }

    #[test]
    fn test_unresolved_material_aborts() {
        let params = GeometryParameters {
            wall_material: "unobtainium".to_string(),
            ..Default::default()
        };
        assert_eq!(
            build(&params).unwrap_err(),
            GeometryError::UnresolvedMaterial("unobtainium".to_string())
        );
    }

    #[test]
    fn test_invalid_dimensions_abort() {
        let params = GeometryParameters {
            wall_thickness: -2.0 * CM,
            ..Default::default()
        };
        match build(&params) {
            Err(GeometryError::InvalidDimensions { parameter, value, .. }) => {
                assert_eq!(parameter, Parameter::WallThickness);
                assert!(close(value, -20.0));
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_overflowing_radii_abort() {
        let params = GeometryParameters {
            target_radius: 1.0e308,
            shield_thickness: 5.0e307,
            vacuum_thickness: 1.0e300,
            wall_thickness: 1.0e308,
            ..Default::default()
        };
        assert!(matches!(
            build(&params),
            Err(GeometryError::InvalidDimensions {
                parameter: Parameter::WallThickness,
                ..
            })
        ));
    }

    #[test]
    fn test_build_is_idempotent() -> Result<()> {
        let params = GeometryParameters::default();
        let catalog = MaterialCatalog::new();
        let builder = ConcentricGeometryBuilder::new();
        let a = builder.build(&params, &catalog)?;
        let b = builder.build(&params, &catalog)?;
        assert!(a.same_layout(&b));
        assert_ne!(a.uid(), b.uid());
        Ok(())
    }

    #[test]
    fn test_target_gas_uses_target_state() -> Result<()> {
        let mut params = GeometryParameters {
            target_material: "Xenon".to_string(),
            ..Default::default()
        };
        let dense = build(&params)?.target().unwrap().material.density;
        params.target_pressure /= 2.0;
        let thin = build(&params)?.target().unwrap().material.density;
        assert!(close(dense / thin, 2.0));
        Ok(())
    }

    #[test]
    fn test_locate_in_built_geometry() -> Result<()> {
        let g = build(&GeometryParameters::default())?;
        let at = |r: f64| g.locate(Point::new(r, 0.0, 0.0)).map(|v| v.kind);
        assert_eq!(at(5.0 * CM), Some(VolumeKind::Target));
        assert_eq!(at(11.0 * CM), Some(VolumeKind::Shield));
        assert_eq!(at(14.0 * CM), Some(VolumeKind::Vacuum));
        assert_eq!(at(18.0 * CM), Some(VolumeKind::Wall));
        assert_eq!(at(19.5 * CM), Some(VolumeKind::World));
        assert_eq!(at(25.0 * CM), None);
        Ok(())
    }
}
