use super::command::{Command, Payload};
use crate::engine::{RunMetadata, TransportEngine};
use crate::error::{GeometryError, Result};
use crate::geom::parameters::{GeometryParameters, Parameter, ParameterClass};
use crate::geom::volume::VolumeKind;
use crate::material::Material;
use crate::material::catalog::MaterialCatalog;
use std::sync::Arc;

/// Notification sent to the engine by an accepted command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// Whole geometry must be rebuilt before the next event.
    GeometryRebuild,
    /// Material-dependent physics tables must be refreshed.
    MaterialTablesStale,
    /// Value stored for later material resolution; nothing to refresh now.
    Stored,
}

/// Acknowledgement of a committed command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ack {
    pub parameter: Parameter,
    pub signal: Signal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Idle,
    Validating,
    Committed,
    Rejected,
}

/// Applies parameter changes one at a time and signals the engine.
///
/// Dimension changes are stored as given and always request a full
/// rebuild; their range is checked by the next build. Material and state
/// changes are resolved first and leave everything untouched on failure.
pub struct ReconfigurationController<E: TransportEngine> {
    params: GeometryParameters,
    catalog: Arc<MaterialCatalog>,
    engine: E,
    state: ControllerState,
    last_outcome: Option<ControllerState>,
}

impl<E: TransportEngine> ReconfigurationController<E> {
    pub fn new(params: GeometryParameters, catalog: Arc<MaterialCatalog>, engine: E) -> Self {
        Self {
            params,
            catalog,
            engine,
            state: ControllerState::Idle,
            last_outcome: None,
        }
    }

    /// Validates and commits one command.
    pub fn apply(&mut self, command: Command) -> Result<Ack> {
        self.transition(ControllerState::Validating);
        let result = self.dispatch(&command);
        match &result {
            Ok(ack) => {
                self.transition(ControllerState::Committed);
                log::debug!("Committed '{}' ({:?})", command, ack.signal);
            }
            Err(e) => {
                self.transition(ControllerState::Rejected);
                log::warn!("Rejected '{}': {}", command, e);
            }
        }
        self.last_outcome = Some(self.state);
        self.transition(ControllerState::Idle);
        result
    }

    /// Applies commands in order, stopping at the first rejection.
    pub fn apply_all<I>(&mut self, commands: I) -> Result<Vec<Ack>>
    where
        I: IntoIterator<Item = Command>,
    {
        commands.into_iter().map(|c| self.apply(c)).collect()
    }

    fn dispatch(&mut self, command: &Command) -> Result<Ack> {
        let phase = self.engine.phase();
        if !phase.accepts_edits() {
            return Err(GeometryError::CommandOutOfPhase {
                command: command.name(),
                phase,
            });
        }

        let parameter = command.parameter();
        match command.payload() {
            Payload::Material(name) => {
                let kind = parameter.volume();
                let material = match kind {
                    VolumeKind::Target => self.catalog.resolve_at(name, self.params.target_state()),
                    _ => self.catalog.resolve(name),
                }?;
                self.swap_material(kind, material)?;
                self.params.set_material_name(kind, name);
                self.engine.notify_material_tables_stale();
                Ok(Ack {
                    parameter,
                    signal: Signal::MaterialTablesStale,
                })
            }
            Payload::Value(value) if parameter.class() == ParameterClass::State => {
                GeometryParameters::validate_state(parameter, value)?;
                if !self.catalog.is_state_dependent(&self.params.target_material) {
                    self.params.set_value(parameter, value);
                    return Ok(Ack {
                        parameter,
                        signal: Signal::Stored,
                    });
                }
                let mut next = self.params.clone();
                next.set_value(parameter, value);
                let material = self
                    .catalog
                    .resolve_at(&next.target_material, next.target_state())?;
                self.swap_material(VolumeKind::Target, material)?;
                self.params = next;
                self.engine.notify_material_tables_stale();
                Ok(Ack {
                    parameter,
                    signal: Signal::MaterialTablesStale,
                })
            }
            Payload::Value(value) => {
                self.params.set_value(parameter, value);
                self.engine.request_geometry_rebuild();
                Ok(Ack {
                    parameter,
                    signal: Signal::GeometryRebuild,
                })
            }
        }
    }

    /// Publishes a copy of the current geometry with one material replaced.
    fn swap_material(&self, kind: VolumeKind, material: Arc<Material>) -> Result<()> {
        if let Some(current) = self.engine.current_geometry() {
            let next = current.with_material(kind, material);
            self.engine.install_geometry(Arc::new(next))?;
        }
        Ok(())
    }

    fn transition(&mut self, next: ControllerState) {
        log::debug!("Controller {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    pub fn set_target_material(&mut self, name: &str) -> Result<Ack> {
        self.apply(Command::SetTargetMaterial(name.to_string()))
    }

    pub fn set_target_length(&mut self, value: f64) -> Result<Ack> {
        self.apply(Command::SetTargetLength(value))
    }

    pub fn set_target_radius(&mut self, value: f64) -> Result<Ack> {
        self.apply(Command::SetTargetRadius(value))
    }

    pub fn set_target_pressure(&mut self, value: f64) -> Result<Ack> {
        self.apply(Command::SetTargetPressure(value))
    }

    pub fn set_target_temperature(&mut self, value: f64) -> Result<Ack> {
        self.apply(Command::SetTargetTemperature(value))
    }

    pub fn set_shield_material(&mut self, name: &str) -> Result<Ack> {
        self.apply(Command::SetShieldMaterial(name.to_string()))
    }

    pub fn set_shield_length(&mut self, value: f64) -> Result<Ack> {
        self.apply(Command::SetShieldLength(value))
    }

    pub fn set_shield_thickness(&mut self, value: f64) -> Result<Ack> {
        self.apply(Command::SetShieldThickness(value))
    }

    pub fn set_vacuum_material(&mut self, name: &str) -> Result<Ack> {
        self.apply(Command::SetVacuumMaterial(name.to_string()))
    }

    pub fn set_vacuum_length(&mut self, value: f64) -> Result<Ack> {
        self.apply(Command::SetVacuumLength(value))
    }

    pub fn set_vacuum_thickness(&mut self, value: f64) -> Result<Ack> {
        self.apply(Command::SetVacuumThickness(value))
    }

    pub fn set_wall_material(&mut self, name: &str) -> Result<Ack> {
        self.apply(Command::SetWallMaterial(name.to_string()))
    }

    pub fn set_wall_length(&mut self, value: f64) -> Result<Ack> {
        self.apply(Command::SetWallLength(value))
    }

    pub fn set_wall_thickness(&mut self, value: f64) -> Result<Ack> {
        self.apply(Command::SetWallThickness(value))
    }

    pub fn set_world_material(&mut self, name: &str) -> Result<Ack> {
        self.apply(Command::SetWorldMaterial(name.to_string()))
    }

    pub fn parameters(&self) -> &GeometryParameters {
        &self.params
    }

    pub fn catalog(&self) -> &MaterialCatalog {
        &self.catalog
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// `Committed` or `Rejected` for the last applied command.
    pub fn last_outcome(&self) -> Option<ControllerState> {
        self.last_outcome
    }

    pub fn target_radius(&self) -> f64 {
        self.params.target_radius
    }

    pub fn target_length(&self) -> f64 {
        self.params.target_length
    }

    /// Pressure of the target in Pa.
    pub fn target_pressure(&self) -> f64 {
        self.params.target_pressure
    }

    /// Temperature of the target in K.
    pub fn target_temperature(&self) -> f64 {
        self.params.target_temperature
    }

    pub fn shield_length(&self) -> f64 {
        self.params.shield_length
    }

    pub fn shield_thickness(&self) -> f64 {
        self.params.shield_thickness
    }

    pub fn vacuum_length(&self) -> f64 {
        self.params.vacuum_length
    }

    pub fn vacuum_thickness(&self) -> f64 {
        self.params.vacuum_thickness
    }

    pub fn wall_length(&self) -> f64 {
        self.params.wall_length
    }

    pub fn wall_thickness(&self) -> f64 {
        self.params.wall_thickness
    }

    pub fn material_name(&self, kind: VolumeKind) -> &str {
        self.params.material_name(kind)
    }

    pub fn run_metadata(&self) -> RunMetadata {
        RunMetadata::from_parameters(&self.params)
    }
}
