//! Unit system.
//!
//! Internal units: millimetre, kelvin, pascal, kg/m^3 and kg/mole.
//! Multiply a literal by its unit to get an internal value, divide an internal
//! value by a unit to express it in that unit.

// Length
pub const MM: f64 = 1.0;
pub const CM: f64 = 10.0 * MM;
pub const M: f64 = 1000.0 * MM;

// Temperature
pub const KELVIN: f64 = 1.0;

// Pressure
pub const PASCAL: f64 = 1.0;
pub const ATMOSPHERE: f64 = 101_325.0 * PASCAL;

// Density
pub const KG_PER_M3: f64 = 1.0;
pub const G_PER_CM3: f64 = 1000.0 * KG_PER_M3;
pub const MG_PER_CM3: f64 = 1.0 * KG_PER_M3;

// Amount of substance
pub const G_PER_MOLE: f64 = 1.0e-3;

/// Molar gas constant in J/(mol*K).
pub const GAS_CONSTANT: f64 = 8.314_462_618;

/// Distance added to the longest shell to get the world length.
pub const WORLD_LENGTH_MARGIN: f64 = 5.0 * CM;

/// Distance added to the wall outer radius to get the world radius.
pub const WORLD_RADIUS_MARGIN: f64 = 1.0 * CM;

/// Geometric tolerance used for surface classification (mm).
pub const TOLERANCE: f64 = 1e-9 * MM;

/// Formats a length with the largest unit that keeps the value >= 1.
pub fn best_length(value: f64) -> String {
    let abs = value.abs();
    if abs >= M {
        format!("{} m", value / M)
    } else if abs >= CM {
        format!("{} cm", value / CM)
    } else {
        format!("{} mm", value / MM)
    }
}

/// Formats a density in g/cm3.
pub fn best_density(value: f64) -> String {
    format!("{:.6e} g/cm3", value / G_PER_CM3)
}
