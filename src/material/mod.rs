//! Physical materials.
//!
//! A [`Material`] is fully specified: density, composition by mass fraction,
//! physical state, temperature and pressure. Materials are created by the
//! [`catalog::MaterialCatalog`] and shared as `Arc<Material>` between shells
//! and across rebuilds.

pub mod catalog;
pub mod element;
pub mod gas;
pub mod nist;

use crate::HasName;
use crate::units::{ATMOSPHERE, GAS_CONSTANT, KELVIN};
use std::fmt;

/// Physical state of a material.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Solid,
    Liquid,
    Gas,
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            State::Solid => "solid",
            State::Liquid => "liquid",
            State::Gas => "gas",
        };
        write!(f, "{}", s)
    }
}

/// Thermodynamic state (pressure in Pa, temperature in K).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GasState {
    pub pressure: f64,
    pub temperature: f64,
}

impl GasState {
    pub fn new(pressure: f64, temperature: f64) -> Self {
        Self {
            pressure,
            temperature,
        }
    }

    /// Normal temperature and pressure (293.15 K, 1 atm).
    pub fn ntp() -> Self {
        Self::new(1.0 * ATMOSPHERE, 293.15 * KELVIN)
    }
}

/// Chemical element.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: String,
    pub symbol: String,
    pub z: u32,
    /// Molar mass in kg/mole.
    pub molar_mass: f64,
}

impl Element {
    pub fn new(name: &str, symbol: &str, z: u32, molar_mass: f64) -> Self {
        Self {
            name: name.to_string(),
            symbol: symbol.to_string(),
            z,
            molar_mass,
        }
    }
}

impl HasName for Element {
    fn get_name(&self) -> &str {
        &self.name
    }
}

/// One element of a material with its mass fraction.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    pub element: Element,
    pub mass_fraction: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    /// Density in kg/m^3.
    pub density: f64,
    pub state: State,
    /// Temperature in K.
    pub temperature: f64,
    /// Pressure in Pa.
    pub pressure: f64,
    pub components: Vec<Component>,
}

impl HasName for Material {
    fn get_name(&self) -> &str {
        &self.name
    }
}

/// Ideal-gas density `p * M / (R * T)` in kg/m^3.
///
/// `pressure` in Pa, `molar_mass` in kg/mole, `temperature` in K.
pub fn ideal_gas_density(pressure: f64, molar_mass: f64, temperature: f64) -> f64 {
    pressure * molar_mass / (GAS_CONSTANT * temperature)
}

impl Material {
    /// Creates a material without components.
    pub fn new(name: &str, density: f64, state: State, conditions: GasState) -> Self {
        Self {
            name: name.to_string(),
            density,
            state,
            temperature: conditions.temperature,
            pressure: conditions.pressure,
            components: Vec::new(),
        }
    }

    pub fn with_component(mut self, element: Element, mass_fraction: f64) -> Self {
        self.components.push(Component {
            element,
            mass_fraction,
        });
        self
    }

    /// Sum of all mass fractions (1.0 for a complete composition).
    pub fn mass_fraction_sum(&self) -> f64 {
        self.components.iter().map(|c| c.mass_fraction).sum()
    }

    /// Mean molar mass in kg/mole, `1 / sum(w_i / A_i)`.
    pub fn molar_mass(&self) -> f64 {
        let inv: f64 = self
            .components
            .iter()
            .map(|c| c.mass_fraction / c.element.molar_mass)
            .sum();
        if inv > 0.0 { 1.0 / inv } else { 0.0 }
    }

    pub fn mass_fraction_of(&self, symbol: &str) -> f64 {
        self.components
            .iter()
            .filter(|c| c.element.symbol == symbol)
            .map(|c| c.mass_fraction)
            .sum()
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Material: {} density: {} state: {} T: {} K P: {:.4e} atm",
            self.name,
            crate::units::best_density(self.density),
            self.state,
            self.temperature / KELVIN,
            self.pressure / ATMOSPHERE
        )?;
        for c in &self.components {
            write!(
                f,
                "\n  ---> Element: {} ({}) Z = {} ElmMassFraction: {:.2} %",
                c.element.name,
                c.element.symbol,
                c.element.z,
                100.0 * c.mass_fraction
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::{G_PER_CM3, G_PER_MOLE};

    #[test]
    fn test_ideal_gas_density_xenon() {
        // 15 atm, 273.15 K: ~0.0879 g/cm3
        let rho = ideal_gas_density(15.0 * ATMOSPHERE, 131.292 * G_PER_MOLE, 273.15);
        assert!((rho / G_PER_CM3 - 0.0879).abs() < 1e-3);
    }

    #[test]
    fn test_molar_mass_mixture() {
        let n = Element::new("Nitrogen", "N", 7, 14.01 * G_PER_MOLE);
        let o = Element::new("Oxygen", "O", 8, 15.9994 * G_PER_MOLE);
        let m = Material::new("Air", 1.205, State::Gas, GasState::ntp())
            .with_component(n, 0.7)
            .with_component(o, 0.3);
        let expected = 1.0 / (0.7 / (14.01 * G_PER_MOLE) + 0.3 / (15.9994 * G_PER_MOLE));
        assert!((m.molar_mass() - expected).abs() < 1e-12);
        assert!((m.mass_fraction_sum() - 1.0).abs() < 1e-12);
        assert!((m.mass_fraction_of("O") - 0.3).abs() < 1e-12);
    }
}
