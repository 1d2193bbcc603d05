//! Right circular cylinder centred on the origin, axis along Z.
//!
//! A tube with `rmin == 0` is a solid disk; otherwise it is an annulus.

use crate::Point;
use crate::units::TOLERANCE;
use std::f64::consts::PI;

/// Position of a point relative to a solid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inside {
    Inside,
    Surface,
    Outside,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tube {
    pub rmin: f64,
    pub rmax: f64,
    pub half_length: f64,
}

impl Tube {
    pub fn new(rmin: f64, rmax: f64, half_length: f64) -> Self {
        Self {
            rmin,
            rmax,
            half_length,
        }
    }

    /// Solid disk of radius `r` and full length `length`.
    pub fn disk(r: f64, length: f64) -> Self {
        Self::new(0.0, r, 0.5 * length)
    }

    /// Annulus between `rmin` and `rmax` with full length `length`.
    pub fn annulus(rmin: f64, rmax: f64, length: f64) -> Self {
        Self::new(rmin, rmax, 0.5 * length)
    }

    pub fn is_solid(&self) -> bool {
        self.rmin == 0.0
    }

    pub fn length(&self) -> f64 {
        2.0 * self.half_length
    }

    pub fn thickness(&self) -> f64 {
        self.rmax - self.rmin
    }

    pub fn cubic_volume(&self) -> f64 {
        PI * (self.rmax.powi(2) - self.rmin.powi(2)) * self.length()
    }

    /// Lateral area of the outer and inner cylinders.
    pub fn lateral_areas(&self) -> (f64, f64) {
        let outer = 2.0 * PI * self.rmax * self.length();
        let inner = 2.0 * PI * self.rmin * self.length();
        (outer, inner)
    }

    /// Area of one end cap.
    pub fn cap_area(&self) -> f64 {
        PI * (self.rmax.powi(2) - self.rmin.powi(2))
    }

    pub fn surface_area(&self) -> f64 {
        let (outer, inner) = self.lateral_areas();
        outer + inner + 2.0 * self.cap_area()
    }

    /// Classifies a point given in the tube's local frame.
    pub fn inside(&self, p: Point) -> Inside {
        let r = p.radius_xy();
        let z = p.z.abs();

        let outside_r = r > self.rmax + TOLERANCE || (!self.is_solid() && r < self.rmin - TOLERANCE);
        if outside_r || z > self.half_length + TOLERANCE {
            return Inside::Outside;
        }

        let inside_r = r < self.rmax - TOLERANCE && (self.is_solid() || r > self.rmin + TOLERANCE);
        if inside_r && z < self.half_length - TOLERANCE {
            Inside::Inside
        } else {
            Inside::Surface
        }
    }
}
