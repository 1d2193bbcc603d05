//! Independent geometry parameters and the quantities derived from them.
//!
//! Only the fields of [`GeometryParameters`] are stored. Shell radii and the
//! world size are always recomputed from them, so they cannot drift.

use crate::error::{GeometryError, Result};
use crate::geom::volume::VolumeKind;
use crate::material::GasState;
use crate::units::{
    ATMOSPHERE, CM, KELVIN, WORLD_LENGTH_MARGIN, WORLD_RADIUS_MARGIN, best_length,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One independently settable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Parameter {
    TargetLength,
    TargetRadius,
    TargetMaterial,
    TargetPressure,
    TargetTemperature,
    ShieldLength,
    ShieldThickness,
    ShieldMaterial,
    VacuumLength,
    VacuumThickness,
    VacuumMaterial,
    WallLength,
    WallThickness,
    WallMaterial,
    WorldMaterial,
}

/// What a change to a parameter invalidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterClass {
    /// Length, radius or thickness: the whole geometry must be rebuilt.
    Dimension,
    /// Material selection: swap one volume's material.
    Material,
    /// Thermodynamic state of the target: re-derive the target material.
    State,
}

impl Parameter {
    pub const ALL: [Parameter; 15] = [
        Parameter::TargetLength,
        Parameter::TargetRadius,
        Parameter::TargetMaterial,
        Parameter::TargetPressure,
        Parameter::TargetTemperature,
        Parameter::ShieldLength,
        Parameter::ShieldThickness,
        Parameter::ShieldMaterial,
        Parameter::VacuumLength,
        Parameter::VacuumThickness,
        Parameter::VacuumMaterial,
        Parameter::WallLength,
        Parameter::WallThickness,
        Parameter::WallMaterial,
        Parameter::WorldMaterial,
    ];

    pub fn class(&self) -> ParameterClass {
        use Parameter::*;
        match self {
            TargetLength | TargetRadius | ShieldLength | ShieldThickness | VacuumLength
            | VacuumThickness | WallLength | WallThickness => ParameterClass::Dimension,
            TargetMaterial | ShieldMaterial | VacuumMaterial | WallMaterial | WorldMaterial => {
                ParameterClass::Material
            }
            TargetPressure | TargetTemperature => ParameterClass::State,
        }
    }

    /// Volume the parameter belongs to.
    pub fn volume(&self) -> VolumeKind {
        use Parameter::*;
        match self {
            TargetLength | TargetRadius | TargetMaterial | TargetPressure | TargetTemperature => {
                VolumeKind::Target
            }
            ShieldLength | ShieldThickness | ShieldMaterial => VolumeKind::Shield,
            VacuumLength | VacuumThickness | VacuumMaterial => VolumeKind::Vacuum,
            WallLength | WallThickness | WallMaterial => VolumeKind::Wall,
            WorldMaterial => VolumeKind::World,
        }
    }

    pub fn description(&self) -> &'static str {
        use Parameter::*;
        match self {
            TargetLength => "target length",
            TargetRadius => "target radius",
            TargetMaterial => "target material",
            TargetPressure => "target pressure",
            TargetTemperature => "target temperature",
            ShieldLength => "shield length",
            ShieldThickness => "shield thickness",
            ShieldMaterial => "shield material",
            VacuumLength => "vacuum length",
            VacuumThickness => "vacuum thickness",
            VacuumMaterial => "vacuum material",
            WallLength => "wall length",
            WallThickness => "wall thickness",
            WallMaterial => "wall material",
            WorldMaterial => "world material",
        }
    }

    /// Material parameter of a volume.
    pub fn material_of(kind: VolumeKind) -> Self {
        match kind {
            VolumeKind::World => Parameter::WorldMaterial,
            VolumeKind::Target => Parameter::TargetMaterial,
            VolumeKind::Shield => Parameter::ShieldMaterial,
            VolumeKind::Vacuum => Parameter::VacuumMaterial,
            VolumeKind::Wall => Parameter::WallMaterial,
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Mutable parameter set of the detector.
///
/// Lengths are full lengths along Z (internal unit: mm). Thicknesses are
/// radial. Pressure and temperature feed the density of state-dependent
/// target gases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryParameters {
    pub target_length: f64,
    pub target_radius: f64,
    pub shield_length: f64,
    pub shield_thickness: f64,
    pub vacuum_length: f64,
    pub vacuum_thickness: f64,
    pub wall_length: f64,
    pub wall_thickness: f64,

    pub target_material: String,
    pub shield_material: String,
    pub vacuum_material: String,
    pub wall_material: String,
    pub world_material: String,

    /// Pressure in Pa.
    pub target_pressure: f64,
    /// Temperature in K.
    pub target_temperature: f64,
}

impl Default for GeometryParameters {
    fn default() -> Self {
        let target_length = 15.0 * CM;
        Self {
            target_length,
            target_radius: 10.0 * CM,
            shield_length: target_length,
            shield_thickness: 2.0 * CM,
            vacuum_length: target_length,
            vacuum_thickness: 5.0 * CM,
            wall_length: target_length,
            wall_thickness: 2.0 * CM,
            target_material: "G4_lAr".to_string(),
            shield_material: "G4_STAINLESS-STEEL".to_string(),
            vacuum_material: "G4_Galactic".to_string(),
            wall_material: "G4_STAINLESS-STEEL".to_string(),
            world_material: "Air".to_string(),
            target_pressure: 15.0 * ATMOSPHERE,
            target_temperature: 273.15 * KELVIN,
        }
    }
}

impl GeometryParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of a dimension parameter, `None` for other classes.
    pub fn dimension(&self, parameter: Parameter) -> Option<f64> {
        use Parameter::*;
        match parameter {
            TargetLength => Some(self.target_length),
            TargetRadius => Some(self.target_radius),
            ShieldLength => Some(self.shield_length),
            ShieldThickness => Some(self.shield_thickness),
            VacuumLength => Some(self.vacuum_length),
            VacuumThickness => Some(self.vacuum_thickness),
            WallLength => Some(self.wall_length),
            WallThickness => Some(self.wall_thickness),
            _ => None,
        }
    }

    fn value_mut(&mut self, parameter: Parameter) -> Option<&mut f64> {
        use Parameter::*;
        match parameter {
            TargetLength => Some(&mut self.target_length),
            TargetRadius => Some(&mut self.target_radius),
            ShieldLength => Some(&mut self.shield_length),
            ShieldThickness => Some(&mut self.shield_thickness),
            VacuumLength => Some(&mut self.vacuum_length),
            VacuumThickness => Some(&mut self.vacuum_thickness),
            WallLength => Some(&mut self.wall_length),
            WallThickness => Some(&mut self.wall_thickness),
            TargetPressure => Some(&mut self.target_pressure),
            TargetTemperature => Some(&mut self.target_temperature),
            _ => None,
        }
    }

    /// Sets a dimension or state parameter. Returns false for material parameters.
    pub(crate) fn set_value(&mut self, parameter: Parameter, value: f64) -> bool {
        match self.value_mut(parameter) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    pub fn material_name(&self, kind: VolumeKind) -> &str {
        match kind {
            VolumeKind::World => &self.world_material,
            VolumeKind::Target => &self.target_material,
            VolumeKind::Shield => &self.shield_material,
            VolumeKind::Vacuum => &self.vacuum_material,
            VolumeKind::Wall => &self.wall_material,
        }
    }

    pub(crate) fn set_material_name(&mut self, kind: VolumeKind, name: &str) {
        let slot = match kind {
            VolumeKind::World => &mut self.world_material,
            VolumeKind::Target => &mut self.target_material,
            VolumeKind::Shield => &mut self.shield_material,
            VolumeKind::Vacuum => &mut self.vacuum_material,
            VolumeKind::Wall => &mut self.wall_material,
        };
        *slot = name.to_string();
    }

    /// State used to derive the target material.
    pub fn target_state(&self) -> GasState {
        GasState::new(self.target_pressure, self.target_temperature)
    }

    pub fn shield_inner_radius(&self) -> f64 {
        self.target_radius
    }

    pub fn shield_outer_radius(&self) -> f64 {
        self.shield_inner_radius() + self.shield_thickness
    }

    /// The vacuum gap starts where the shield ends.
    pub fn vacuum_inner_radius(&self) -> f64 {
        self.shield_outer_radius()
    }

    pub fn vacuum_outer_radius(&self) -> f64 {
        self.vacuum_inner_radius() + self.vacuum_thickness
    }

    pub fn wall_inner_radius(&self) -> f64 {
        self.vacuum_outer_radius()
    }

    pub fn wall_outer_radius(&self) -> f64 {
        self.wall_inner_radius() + self.wall_thickness
    }

    pub fn world_radius(&self) -> f64 {
        self.wall_outer_radius() + WORLD_RADIUS_MARGIN
    }

    /// Longest daughter plus the margin, so every daughter fits along Z.
    ///
    /// Equals `wall_length + WORLD_LENGTH_MARGIN` whenever the wall is the
    /// longest shell, as in the default layout. Shorter walls do not shrink
    /// the world below the other shells.
    pub fn world_length(&self) -> f64 {
        let longest = [
            self.target_length,
            self.shield_length,
            self.vacuum_length,
            self.wall_length,
        ]
        .into_iter()
        .fold(f64::NEG_INFINITY, f64::max);
        longest + WORLD_LENGTH_MARGIN
    }

    /// Inner and outer radius of a volume.
    pub fn radial_bounds(&self, kind: VolumeKind) -> (f64, f64) {
        match kind {
            VolumeKind::World => (0.0, self.world_radius()),
            VolumeKind::Target => (0.0, self.target_radius),
            VolumeKind::Shield => (self.shield_inner_radius(), self.shield_outer_radius()),
            VolumeKind::Vacuum => (self.vacuum_inner_radius(), self.vacuum_outer_radius()),
            VolumeKind::Wall => (self.wall_inner_radius(), self.wall_outer_radius()),
        }
    }

    /// Full length of a volume.
    pub fn length_of(&self, kind: VolumeKind) -> f64 {
        match kind {
            VolumeKind::World => self.world_length(),
            VolumeKind::Target => self.target_length,
            VolumeKind::Shield => self.shield_length,
            VolumeKind::Vacuum => self.vacuum_length,
            VolumeKind::Wall => self.wall_length,
        }
    }

    /// Checks that every dimension is positive and finite, that the radii
    /// increase strictly outward and that the target state is physical.
    pub fn validate(&self) -> Result<()> {
        use Parameter::*;
        for parameter in [
            TargetLength,
            TargetRadius,
            ShieldLength,
            ShieldThickness,
            VacuumLength,
            VacuumThickness,
            WallLength,
            WallThickness,
        ] {
            let value = self.dimension(parameter).unwrap_or(f64::NAN);
            if !value.is_finite() || value <= 0.0 {
                return Err(GeometryError::InvalidDimensions {
                    parameter,
                    value,
                    reason: "must be positive and finite",
                });
            }
        }

        // Outer radius of each shell against the one inside it
        let ordering = [
            (TargetRadius, 0.0, self.target_radius),
            (ShieldThickness, self.target_radius, self.shield_outer_radius()),
            (VacuumThickness, self.shield_outer_radius(), self.vacuum_outer_radius()),
            (WallThickness, self.vacuum_outer_radius(), self.wall_outer_radius()),
        ];
        for (parameter, inner, outer) in ordering {
            let reason = if !outer.is_finite() {
                "outer radius overflows"
            } else if outer <= inner {
                "radius does not increase outward"
            } else {
                continue;
            };
            return Err(GeometryError::InvalidDimensions {
                parameter,
                value: self.dimension(parameter).unwrap_or(f64::NAN),
                reason,
            });
        }
        if !self.world_radius().is_finite() {
            return Err(GeometryError::InvalidDimensions {
                parameter: WallThickness,
                value: self.wall_thickness,
                reason: "world radius overflows",
            });
        }
        if !self.world_length().is_finite() {
            return Err(GeometryError::InvalidDimensions {
                parameter: WallLength,
                value: self.wall_length,
                reason: "world length overflows",
            });
        }

        Self::validate_state(TargetPressure, self.target_pressure)?;
        Self::validate_state(TargetTemperature, self.target_temperature)?;
        Ok(())
    }

    pub(crate) fn validate_state(parameter: Parameter, value: f64) -> Result<()> {
        if value.is_finite() && value > 0.0 {
            Ok(())
        } else {
            Err(GeometryError::InvalidState { parameter, value })
        }
    }
}

impl fmt::Display for GeometryParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            " Target : Length = {} Radius = {} Material = {}",
            best_length(self.target_length),
            best_length(self.target_radius),
            self.target_material
        )?;
        write!(
            f,
            "\n Shield : Length = {} Thickness = {} Material = {}",
            best_length(self.shield_length),
            best_length(self.shield_thickness),
            self.shield_material
        )?;
        write!(
            f,
            "\n Vacuum : Length = {} Thickness = {} Material = {}",
            best_length(self.vacuum_length),
            best_length(self.vacuum_thickness),
            self.vacuum_material
        )?;
        write!(
            f,
            "\n Wall : Length = {} Thickness = {} Material = {}",
            best_length(self.wall_length),
            best_length(self.wall_thickness),
            self.wall_material
        )?;
        write!(
            f,
            "\n World : Length = {} Radius = {} Material = {}",
            best_length(self.world_length()),
            best_length(self.world_radius()),
            self.world_material
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_default_layout() {
        let p = GeometryParameters::default();
        assert!(close(p.wall_outer_radius(), 19.0 * CM));
        assert!(close(p.world_radius(), 20.0 * CM));
        assert!(close(p.world_length(), 20.0 * CM));
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_shells_are_contiguous() {
        let p = GeometryParameters {
            shield_thickness: 3.0 * CM,
            vacuum_thickness: 0.5 * CM,
            ..Default::default()
        };
        assert!(close(p.shield_inner_radius(), p.target_radius));
        assert!(close(p.vacuum_inner_radius(), p.shield_outer_radius()));
        assert!(close(p.wall_inner_radius(), p.vacuum_outer_radius()));
    }

    #[test]
    fn test_world_covers_longest_daughter() {
        let p = GeometryParameters {
            target_length: 40.0 * CM,
            ..Default::default()
        };
        assert!(close(p.world_length(), 45.0 * CM));
        assert!(p.world_length() >= p.wall_length);
    }

    #[test]
    fn test_validate_rejects_non_positive() {
        let p = GeometryParameters {
            vacuum_thickness: 0.0,
            ..Default::default()
        };
        match p.validate() {
            Err(GeometryError::InvalidDimensions { parameter, .. }) => {
                assert_eq!(parameter, Parameter::VacuumThickness)
            }
            other => panic!("unexpected: {:?}", other),
        }

        let p = GeometryParameters {
            target_length: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(
            p.validate(),
            Err(GeometryError::InvalidDimensions {
                parameter: Parameter::TargetLength,
                ..
            })
        ));
    }

    #[test]
    fn test_validate_rejects_absorbed_thickness() {
        // Thickness lost to rounding: radius does not increase
        let p = GeometryParameters {
            target_radius: 1.0e20,
            shield_thickness: 1.0e-3,
            ..Default::default()
        };
        assert!(matches!(
            p.validate(),
            Err(GeometryError::InvalidDimensions {
                parameter: Parameter::ShieldThickness,
                ..
            })
        ));
    }

    #[test]
    fn test_validate_rejects_overflowing_radius() {
        let p = GeometryParameters {
            target_radius: 1.0e308,
            shield_thickness: 5.0e307,
            vacuum_thickness: 1.0e300,
            wall_thickness: 1.0e308,
            ..Default::default()
        };
        assert!(p.wall_outer_radius().is_infinite());
        assert!(matches!(
            p.validate(),
            Err(GeometryError::InvalidDimensions {
                parameter: Parameter::WallThickness,
                reason: "outer radius overflows",
                ..
            })
        ));
    }

    #[test]
    fn test_validate_rejects_bad_state() {
        let p = GeometryParameters {
            target_temperature: -1.0,
            ..Default::default()
        };
        assert_eq!(
            p.validate(),
            Err(GeometryError::InvalidState {
                parameter: Parameter::TargetTemperature,
                value: -1.0
            })
        );
    }

    #[test]
    fn test_parameter_classes() {
        let dims = Parameter::ALL
            .iter()
            .filter(|p| p.class() == ParameterClass::Dimension)
            .count();
        assert_eq!(dims, 8);
        for p in Parameter::ALL {
            assert_eq!(p.class() == ParameterClass::Dimension, {
                GeometryParameters::default().dimension(p).is_some()
            });
        }
        assert_eq!(Parameter::material_of(VolumeKind::Wall), Parameter::WallMaterial);
    }

    #[test]
    fn test_summary_lists_every_shell() {
        let s = GeometryParameters::default().to_string();
        for name in ["Target", "Shield", "Vacuum", "Wall", "World"] {
            assert!(s.contains(name));
        }
        assert!(s.contains("Thickness = 5 cm"));
    }
}
