use crate::geom::parameters::{Parameter, ParameterClass};
use crate::geom::volume::VolumeKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One typed parameter change. Lengths are in mm, pressure in Pa,
/// temperature in K.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    SetTargetMaterial(String),
    SetTargetLength(f64),
    SetTargetRadius(f64),
    SetTargetPressure(f64),
    SetTargetTemperature(f64),
    SetShieldMaterial(String),
    SetShieldLength(f64),
    SetShieldThickness(f64),
    SetVacuumMaterial(String),
    SetVacuumLength(f64),
    SetVacuumThickness(f64),
    SetWallMaterial(String),
    SetWallLength(f64),
    SetWallThickness(f64),
    SetWorldMaterial(String),
}

/// Typed value carried by a command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Payload<'a> {
    Value(f64),
    Material(&'a str),
}

impl Command {
    /// Material selection command for a volume.
    pub fn set_material(kind: VolumeKind, name: &str) -> Self {
        let name = name.to_string();
        match kind {
            VolumeKind::Target => Command::SetTargetMaterial(name),
            VolumeKind::Shield => Command::SetShieldMaterial(name),
            VolumeKind::Vacuum => Command::SetVacuumMaterial(name),
            VolumeKind::Wall => Command::SetWallMaterial(name),
            VolumeKind::World => Command::SetWorldMaterial(name),
        }
    }

    /// Command setting a numeric parameter, `None` for material parameters.
    pub fn set_value(parameter: Parameter, value: f64) -> Option<Self> {
        use Parameter::*;
        let cmd = match parameter {
            TargetLength => Command::SetTargetLength(value),
            TargetRadius => Command::SetTargetRadius(value),
            TargetPressure => Command::SetTargetPressure(value),
            TargetTemperature => Command::SetTargetTemperature(value),
            ShieldLength => Command::SetShieldLength(value),
            ShieldThickness => Command::SetShieldThickness(value),
            VacuumLength => Command::SetVacuumLength(value),
            VacuumThickness => Command::SetVacuumThickness(value),
            WallLength => Command::SetWallLength(value),
            WallThickness => Command::SetWallThickness(value),
            TargetMaterial | ShieldMaterial | VacuumMaterial | WallMaterial | WorldMaterial => {
                return None;
            }
        };
        Some(cmd)
    }

    pub fn parameter(&self) -> Parameter {
        match self {
            Command::SetTargetMaterial(_) => Parameter::TargetMaterial,
            Command::SetTargetLength(_) => Parameter::TargetLength,
            Command::SetTargetRadius(_) => Parameter::TargetRadius,
            Command::SetTargetPressure(_) => Parameter::TargetPressure,
            Command::SetTargetTemperature(_) => Parameter::TargetTemperature,
            Command::SetShieldMaterial(_) => Parameter::ShieldMaterial,
            Command::SetShieldLength(_) => Parameter::ShieldLength,
            Command::SetShieldThickness(_) => Parameter::ShieldThickness,
            Command::SetVacuumMaterial(_) => Parameter::VacuumMaterial,
            Command::SetVacuumLength(_) => Parameter::VacuumLength,
            Command::SetVacuumThickness(_) => Parameter::VacuumThickness,
            Command::SetWallMaterial(_) => Parameter::WallMaterial,
            Command::SetWallLength(_) => Parameter::WallLength,
            Command::SetWallThickness(_) => Parameter::WallThickness,
            Command::SetWorldMaterial(_) => Parameter::WorldMaterial,
        }
    }

    pub fn class(&self) -> ParameterClass {
        self.parameter().class()
    }

    pub fn payload(&self) -> Payload<'_> {
        match self {
            Command::SetTargetMaterial(name)
            | Command::SetShieldMaterial(name)
            | Command::SetVacuumMaterial(name)
            | Command::SetWallMaterial(name)
            | Command::SetWorldMaterial(name) => Payload::Material(name),
            Command::SetTargetLength(v)
            | Command::SetTargetRadius(v)
            | Command::SetTargetPressure(v)
            | Command::SetTargetTemperature(v)
            | Command::SetShieldLength(v)
            | Command::SetShieldThickness(v)
            | Command::SetVacuumLength(v)
            | Command::SetVacuumThickness(v)
            | Command::SetWallLength(v)
            | Command::SetWallThickness(v) => Payload::Value(*v),
        }
    }

    /// Operator-facing command name.
    pub fn name(&self) -> &'static str {
        match self {
            Command::SetTargetMaterial(_) => "setTargetMaterial",
            Command::SetTargetLength(_) => "setTargetLength",
            Command::SetTargetRadius(_) => "setTargetRadius",
            Command::SetTargetPressure(_) => "setTargetPressure",
            Command::SetTargetTemperature(_) => "setTargetTemperature",
            Command::SetShieldMaterial(_) => "setShieldMaterial",
            Command::SetShieldLength(_) => "setShieldLength",
            Command::SetShieldThickness(_) => "setShieldThickness",
            Command::SetVacuumMaterial(_) => "setVacuumMaterial",
            Command::SetVacuumLength(_) => "setVacuumLength",
            Command::SetVacuumThickness(_) => "setVacuumThickness",
            Command::SetWallMaterial(_) => "setWallMaterial",
            Command::SetWallLength(_) => "setWallLength",
            Command::SetWallThickness(_) => "setWallThickness",
            Command::SetWorldMaterial(_) => "setWorldMaterial",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.payload() {
            Payload::Value(v) => write!(f, "{} {}", self.name(), v),
            Payload::Material(m) => write!(f, "{} {}", self.name(), m),
        }
    }
}
