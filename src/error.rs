//! Error taxonomy for geometry construction and reconfiguration.
//!
//! Every variant names the field, material or volume that failed. Callers
//! recover from these locally: a rejected command leaves prior state intact.

use crate::UID;
use crate::engine::EnginePhase;
use crate::geom::parameters::Parameter;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GeometryError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// A length, radius or thickness is non-positive, not finite, or breaks
    /// the outward radial ordering.
    #[error("invalid dimensions: {parameter} = {value} ({reason})")]
    InvalidDimensions {
        parameter: Parameter,
        value: f64,
        reason: &'static str,
    },

    /// Pressure or temperature used to derive a gas density is not usable.
    #[error("invalid thermodynamic state: {parameter} = {value}")]
    InvalidState { parameter: Parameter, value: f64 },

    /// The name matches neither the custom materials nor the standard database.
    #[error("material not found: {0}")]
    UnresolvedMaterial(String),

    /// A sensitive region was already bound on this geometry instance.
    #[error("sensitive region '{volume}' already bound on geometry {geometry}")]
    DoubleBind { geometry: UID, volume: String },

    /// The referenced logical volume does not exist in the geometry tree.
    #[error("logical volume not found: {0}")]
    MissingVolume(String),

    /// The engine does not accept this command in its current phase.
    #[error("command '{command}' not allowed in phase {phase}")]
    CommandOutOfPhase {
        command: &'static str,
        phase: EnginePhase,
    },

    /// A rebuild signal is pending; events cannot start on the old geometry.
    #[error("geometry is stale, initialize before processing events")]
    StaleGeometry,

    /// Events were requested before any geometry was installed.
    #[error("no geometry installed")]
    NoGeometry,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_culprit() {
        let err = GeometryError::UnresolvedMaterial("unobtainium".to_string());
        assert!(err.to_string().contains("unobtainium"));

        let err = GeometryError::InvalidDimensions {
            parameter: Parameter::ShieldThickness,
            value: -1.0,
            reason: "must be positive",
        };
        assert!(err.to_string().contains("shield thickness"));

        let err = GeometryError::CommandOutOfPhase {
            command: "setTargetRadius",
            phase: EnginePhase::EventLoop,
        };
        assert!(err.to_string().contains("setTargetRadius"));
    }
}
