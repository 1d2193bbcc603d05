//! Custom gas materials defined in closed form.

use super::{Element, GasState, Material, State, ideal_gas_density};
use crate::HasName;
use crate::units::{ATMOSPHERE, G_PER_MOLE, KELVIN, KG_PER_M3, MG_PER_CM3};

/// How the density of a custom gas is obtained.
#[derive(Debug, Clone, PartialEq)]
pub enum DensityRule {
    /// Derived from pressure, molar mass and temperature at resolution time.
    IdealGas,
    /// Fixed density and conditions, independent of the requested state.
    Fixed { density: f64, conditions: GasState },
}

/// Recipe for a custom gas material.
#[derive(Debug, Clone, PartialEq)]
pub struct GasRecipe {
    pub name: String,
    /// (element, mass fraction)
    pub composition: Vec<(Element, f64)>,
    pub density: DensityRule,
}

impl HasName for GasRecipe {
    fn get_name(&self) -> &str {
        &self.name
    }
}

impl GasRecipe {
    pub fn new(name: &str, composition: Vec<(Element, f64)>, density: DensityRule) -> Self {
        Self {
            name: name.to_string(),
            composition,
            density,
        }
    }

    /// Mean molar mass of the composition in kg/mole.
    pub fn molar_mass(&self) -> f64 {
        let inv: f64 = self
            .composition
            .iter()
            .map(|(e, w)| w / e.molar_mass)
            .sum();
        if inv > 0.0 { 1.0 / inv } else { 0.0 }
    }

    /// True if the density depends on the requested state.
    pub fn is_state_dependent(&self) -> bool {
        matches!(self.density, DensityRule::IdealGas)
    }

    /// Builds the material at the given state.
    ///
    /// `state` is ignored for [`DensityRule::Fixed`] recipes.
    pub fn material_at(&self, state: GasState) -> Material {
        let (density, conditions) = match &self.density {
            DensityRule::IdealGas => (
                ideal_gas_density(state.pressure, self.molar_mass(), state.temperature),
                state,
            ),
            DensityRule::Fixed {
                density,
                conditions,
            } => (*density, *conditions),
        };
        let mut material = Material::new(&self.name, density, State::Gas, conditions);
        for (element, fraction) in &self.composition {
            material = material.with_component(element.clone(), *fraction);
        }
        material
    }

    /// Natural xenon, density from the ideal-gas law.
    pub fn xenon() -> Self {
        let xe = Element::new("Xenon", "Xe", 54, 131.292 * G_PER_MOLE);
        Self::new("Xenon", vec![(xe, 1.0)], DensityRule::IdealGas)
    }

    /// Enriched xenon-136 at 15 atm.
    pub fn xenon136() -> Self {
        let xe136 = Element::new("Xenon136", "Xe", 54, 135.91 * G_PER_MOLE);
        Self::new(
            "Xenon136",
            vec![(xe136, 1.0)],
            DensityRule::Fixed {
                density: 80.3 * KG_PER_M3,
                conditions: GasState::new(15.0 * ATMOSPHERE, 275.0 * KELVIN),
            },
        )
    }

    /// Dry air, 70 % nitrogen and 30 % oxygen by mass.
    pub fn air() -> Self {
        let n = Element::new("Nitrogen", "N", 7, 14.01 * G_PER_MOLE);
        let o = Element::new("Oxygen", "O", 8, 15.9994 * G_PER_MOLE);
        Self::new(
            "Air",
            vec![(n, 0.7), (o, 0.3)],
            DensityRule::Fixed {
                density: 1.205 * MG_PER_CM3,
                conditions: GasState::new(1.0 * ATMOSPHERE, 293.0 * KELVIN),
            },
        )
    }
}
