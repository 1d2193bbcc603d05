//! Placement overlap check.
//!
//! Random points are sampled on the surfaces of every daughter. A point
//! strictly inside a sibling, or outside the world, is an overlap. Shared
//! boundaries between shells land on the sibling's surface and are not
//! reported.

use crate::geom::tree::ResolvedGeometry;
use crate::geom::tube::{Inside, Tube};
use crate::Point;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::collections::HashSet;
use std::f64::consts::PI;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct Overlap {
    /// Volume whose surface point was sampled.
    pub volume: String,
    /// Sibling the point lies in, or the world it escapes from.
    pub other: String,
    /// Sample point in world coordinates.
    pub point: Point,
}

impl fmt::Display for Overlap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Overlap between '{}' and '{}' at {}",
            self.volume, self.other, self.point
        )
    }
}

/// Checks every daughter against its siblings and the world.
///
/// At most one overlap is reported per pair of volumes. Each daughter uses
/// its own random stream derived from `seed`, so results are reproducible.
pub fn check_overlaps(
    geometry: &ResolvedGeometry,
    samples_per_volume: usize,
    seed: u64,
) -> Vec<Overlap> {
    let daughters = geometry.daughters();
    let world = geometry.world();

    daughters
        .par_iter()
        .enumerate()
        .flat_map_iter(|(i, volume)| {
            let mut rng = StdRng::seed_from_u64(seed.wrapping_add(i as u64));
            let mut reported: HashSet<&str> = HashSet::new();
            let mut found = Vec::new();

            for _ in 0..samples_per_volume {
                let Some(local) = sample_point_on_tube(&volume.solid, &mut rng) else {
                    break;
                };
                let p = local + volume.placement.translation;

                if world.inside(p) == Inside::Outside && reported.insert(&world.name) {
                    found.push(Overlap {
                        volume: volume.name.clone(),
                        other: world.name.clone(),
                        point: p,
                    });
                }
                for (j, other) in daughters.iter().enumerate() {
                    if j != i && other.inside(p) == Inside::Inside && reported.insert(&other.name)
                    {
                        found.push(Overlap {
                            volume: volume.name.clone(),
                            other: other.name.clone(),
                            point: p,
                        });
                    }
                }
            }
            found
        })
        .collect()
}

/// Uniform random point on the surface of a tube, in its local frame.
fn sample_point_on_tube(tube: &Tube, rng: &mut impl Rng) -> Option<Point> {
    let (outer, inner) = tube.lateral_areas();
    let cap = tube.cap_area();
    let total = outer + inner + 2.0 * cap;
    if total <= 0.0 || !total.is_finite() {
        return None;
    }

    let phi = 2.0 * PI * rng.r#gen::<f64>();
    let pick = rng.r#gen::<f64>() * total;
    let hz = tube.half_length;

    let p = if pick < outer {
        Point::from_cylindrical(tube.rmax, phi, rng.gen_range(-hz..=hz))
    } else if pick < outer + inner {
        Point::from_cylindrical(tube.rmin, phi, rng.gen_range(-hz..=hz))
    } else {
        // Uniform in area over the annulus
        let r2 = tube.rmin.powi(2) + rng.r#gen::<f64>() * (tube.rmax.powi(2) - tube.rmin.powi(2));
        let z = if pick < outer + inner + cap { hz } else { -hz };
        Point::from_cylindrical(r2.sqrt(), phi, z)
    };
    Some(p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::builder::ConcentricGeometryBuilder;
    use crate::geom::volume::{Volume, VolumeKind};
    use crate::material::{GasState, Material, State};
    use crate::{GeometryParameters, MaterialCatalog};
    use std::sync::Arc;

    fn material() -> Arc<Material> {
        Arc::new(Material::new("m", 1.0, State::Solid, GasState::ntp()))
    }

    #[test]
    fn test_built_geometry_has_no_overlaps() {
        let params = GeometryParameters::default();
        let g = ConcentricGeometryBuilder::new()
            .build(&params, &MaterialCatalog::new())
            .unwrap();
        assert!(check_overlaps(&g, 2000, 7).is_empty());
    }

    #[test]
    fn test_intruding_shell_is_reported() {
        let world = Volume::new(VolumeKind::World, Tube::disk(10.0, 10.0), material());
        let target = Volume::new(VolumeKind::Target, Tube::disk(2.0, 4.0), material());
        let shield = Volume::new(VolumeKind::Shield, Tube::annulus(1.5, 3.0, 4.0), material());
        let g = ResolvedGeometry::new(world, vec![target, shield]);

        let overlaps = check_overlaps(&g, 2000, 1);
        assert!(overlaps.iter().any(|o| o.volume == "Target" && o.other == "Shield"));
        assert!(overlaps.iter().any(|o| o.volume == "Shield" && o.other == "Target"));
        assert_eq!(overlaps.len(), 2);
    }

    #[test]
    fn test_protruding_shell_is_reported() {
        let world = Volume::new(VolumeKind::World, Tube::disk(10.0, 10.0), material());
        let wall = Volume::new(VolumeKind::Wall, Tube::annulus(5.0, 6.0, 30.0), material());
        let g = ResolvedGeometry::new(world, vec![wall]);

        let overlaps = check_overlaps(&g, 500, 3);
        assert_eq!(overlaps.len(), 1);
        assert_eq!(overlaps[0].other, "World");
        assert!(overlaps[0].point.z.abs() > 5.0);
    }

    #[test]
    fn test_samples_lie_on_surface() {
        let tube = Tube::annulus(1.0, 2.0, 3.0);
        let mut rng = StdRng::seed_from_u64(0);
        for _ in 0..200 {
            let p = sample_point_on_tube(&tube, &mut rng).unwrap();
            assert_eq!(tube.inside(p), Inside::Surface);
        }
    }
}
