use super::Element;
use crate::units::G_PER_MOLE;

/// Embedded element data.
///
/// Each entry: (symbol, name, Z, molar mass in g/mole)
pub(crate) const ELEMENTS: &[(&str, &str, u32, f64)] = &[
    ("H", "Hydrogen", 1, 1.00794),
    ("C", "Carbon", 6, 12.0107),
    ("N", "Nitrogen", 7, 14.0067),
    ("O", "Oxygen", 8, 15.9994),
    ("Na", "Sodium", 11, 22.98977),
    ("Mg", "Magnesium", 12, 24.305),
    ("Al", "Aluminium", 13, 26.981538),
    ("Si", "Silicon", 14, 28.0855),
    ("P", "Phosphorus", 15, 30.973761),
    ("S", "Sulfur", 16, 32.065),
    ("Ar", "Argon", 18, 39.948),
    ("K", "Potassium", 19, 39.0983),
    ("Ca", "Calcium", 20, 40.078),
    ("Ti", "Titanium", 22, 47.867),
    ("Cr", "Chromium", 24, 51.9961),
    ("Mn", "Manganese", 25, 54.938049),
    ("Fe", "Iron", 26, 55.845),
    ("Ni", "Nickel", 28, 58.6934),
    ("Cu", "Copper", 29, 63.546),
    ("Ge", "Germanium", 32, 72.64),
    ("Xe", "Xenon", 54, 131.293),
    ("W", "Tungsten", 74, 183.84),
    ("Pb", "Lead", 82, 207.2),
];

/// Finds an element by its chemical symbol (case-sensitive).
pub fn find_element(symbol: &str) -> Option<Element> {
    ELEMENTS
        .iter()
        .find(|(s, _, _, _)| *s == symbol)
        .map(|&(s, name, z, a)| Element::new(name, s, z, a * G_PER_MOLE))
}
