//! Embedded standard material database.
//!
//! Entries are addressed by their `G4_*` names. Compositions are mass fractions.

use super::element::find_element;
use super::{GasState, Material, State};
use crate::units::{ATMOSPHERE, G_PER_CM3, PASCAL};

pub(crate) struct StandardEntry {
    pub name: &'static str,
    /// Density in g/cm3.
    pub density: f64,
    pub state: State,
    /// Temperature in K.
    pub temperature: f64,
    /// Pressure in Pa.
    pub pressure: f64,
    /// (element symbol, mass fraction)
    pub composition: &'static [(&'static str, f64)],
}

const NTP_T: f64 = 293.15;
const NTP_P: f64 = ATMOSPHERE;

const fn entry(
    name: &'static str,
    density: f64,
    state: State,
    composition: &'static [(&'static str, f64)],
) -> StandardEntry {
    StandardEntry {
        name,
        density,
        state,
        temperature: NTP_T,
        pressure: NTP_P,
        composition,
    }
}

pub(crate) const STANDARD_MATERIALS: &[StandardEntry] = &[
    // Cryogenic liquids
    StandardEntry {
        name: "G4_lAr",
        density: 1.396,
        state: State::Liquid,
        temperature: 87.3,
        pressure: NTP_P,
        composition: &[("Ar", 1.0)],
    },
    StandardEntry {
        name: "G4_lXe",
        density: 2.953,
        state: State::Liquid,
        temperature: 165.0,
        pressure: NTP_P,
        composition: &[("Xe", 1.0)],
    },
    // Gases
    StandardEntry {
        name: "G4_Galactic",
        density: 1.0e-25,
        state: State::Gas,
        temperature: 2.73,
        pressure: 3.0e-18 * PASCAL,
        composition: &[("H", 1.0)],
    },
    entry(
        "G4_AIR",
        0.00120479,
        State::Gas,
        &[("C", 0.000124), ("N", 0.755268), ("O", 0.231781), ("Ar", 0.012827)],
    ),
    entry("G4_Ar", 0.00166201, State::Gas, &[("Ar", 1.0)]),
    entry("G4_Xe", 0.00548536, State::Gas, &[("Xe", 1.0)]),
    // Liquids
    entry(
        "G4_WATER",
        1.0,
        State::Liquid,
        &[("H", 0.111894), ("O", 0.888106)],
    ),
    // Metals & elements
    entry("G4_Al", 2.699, State::Solid, &[("Al", 1.0)]),
    entry("G4_Si", 2.33, State::Solid, &[("Si", 1.0)]),
    entry("G4_Ti", 4.54, State::Solid, &[("Ti", 1.0)]),
    entry("G4_Fe", 7.874, State::Solid, &[("Fe", 1.0)]),
    entry("G4_Cu", 8.96, State::Solid, &[("Cu", 1.0)]),
    entry("G4_Ge", 5.323, State::Solid, &[("Ge", 1.0)]),
    entry("G4_W", 19.3, State::Solid, &[("W", 1.0)]),
    entry("G4_Pb", 11.35, State::Solid, &[("Pb", 1.0)]),
    // Compounds
    entry(
        "G4_STAINLESS-STEEL",
        8.0,
        State::Solid,
        &[("Fe", 0.6732), ("Cr", 0.2089), ("Ni", 0.1179)],
    ),
    entry(
        "G4_POLYETHYLENE",
        0.94,
        State::Solid,
        &[("H", 0.143711), ("C", 0.856289)],
    ),
    entry(
        "G4_KAPTON",
        1.42,
        State::Solid,
        &[("H", 0.026362), ("C", 0.691133), ("N", 0.07327), ("O", 0.209235)],
    ),
    entry(
        "G4_PLASTIC_SC_VINYLTOLUENE",
        1.032,
        State::Solid,
        &[("H", 0.085), ("C", 0.915)],
    ),
    entry(
        "G4_CONCRETE",
        2.3,
        State::Solid,
        &[
            ("H", 0.01),
            ("C", 0.001),
            ("O", 0.529107),
            ("Na", 0.016),
            ("Mg", 0.002),
            ("Al", 0.033872),
            ("Si", 0.337021),
            ("K", 0.013),
            ("Ca", 0.044),
            ("Fe", 0.014),
        ],
    ),
];

/// Finds a standard entry by exact name.
#[cfg(test)]
pub(crate) fn find_entry(name: &str) -> Option<&'static StandardEntry> {
    STANDARD_MATERIALS.iter().find(|e| e.name == name)
}

/// Builds the material for an entry.
///
/// Returns `None` if an element symbol is missing from the element table.
pub(crate) fn build(entry: &StandardEntry) -> Option<Material> {
    let conditions = GasState::new(entry.pressure, entry.temperature);
    let mut material = Material::new(
        entry.name,
        entry.density * G_PER_CM3,
        entry.state,
        conditions,
    );
    for &(symbol, fraction) in entry.composition {
        material = material.with_component(find_element(symbol)?, fraction);
    }
    Some(material)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_entries_build() {
        for e in STANDARD_MATERIALS {
            let m = build(e);
            assert!(m.is_some(), "{} has an unknown element", e.name);
        }
    }

    #[test]
    fn test_fractions_sum_to_one() {
        for e in STANDARD_MATERIALS {
            let sum: f64 = e.composition.iter().map(|(_, w)| w).sum();
            assert!((sum - 1.0).abs() < 1e-6, "{}: {}", e.name, sum);
        }
    }

    #[test]
    fn test_liquid_argon() {
        let m = build(find_entry("G4_lAr").unwrap()).unwrap();
        assert_eq!(m.state, State::Liquid);
        assert!((m.density - 1396.0).abs() < 1e-9);
        assert_eq!(m.components[0].element.symbol, "Ar");
    }

    #[test]
    fn test_names_are_case_sensitive() {
        assert!(find_entry("G4_lAr").is_some());
        assert!(find_entry("g4_lar").is_none());
    }
}
