//! Interface to the particle-transport engine.
//!
//! The engine owns the authoritative geometry reference and decides when
//! events run. The reconfiguration core only signals it.

pub mod run_manager;

pub use run_manager::RunManager;

use crate::GeometryParameters;
use crate::error::Result;
use crate::geom::tree::ResolvedGeometry;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Lifecycle phase of the transport engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnginePhase {
    /// Before the first initialization.
    PreInit,
    /// Initialized, between runs.
    Idle,
    /// Events are being processed against a published geometry.
    EventLoop,
}

impl EnginePhase {
    /// Geometry and material edits are accepted outside the event loop only.
    pub fn accepts_edits(&self) -> bool {
        !matches!(self, EnginePhase::EventLoop)
    }
}

impl fmt::Display for EnginePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EnginePhase::PreInit => "PreInit",
            EnginePhase::Idle => "Idle",
            EnginePhase::EventLoop => "EventLoop",
        };
        write!(f, "{}", s)
    }
}

/// Signals and geometry hand-off expected from a transport engine.
pub trait TransportEngine {
    fn phase(&self) -> EnginePhase;

    /// The current geometry must be discarded and rebuilt before the next event.
    fn request_geometry_rebuild(&self);

    /// Physics tables that depend on material composition must be refreshed.
    fn notify_material_tables_stale(&self);

    fn current_geometry(&self) -> Option<Arc<ResolvedGeometry>>;

    /// Replaces the published geometry. Rejected while events are running.
    fn install_geometry(&self, geometry: Arc<ResolvedGeometry>) -> Result<()>;
}

impl<T: TransportEngine + ?Sized> TransportEngine for &T {
    fn phase(&self) -> EnginePhase {
        (**self).phase()
    }

    fn request_geometry_rebuild(&self) {
        (**self).request_geometry_rebuild()
    }

    fn notify_material_tables_stale(&self) {
        (**self).notify_material_tables_stale()
    }

    fn current_geometry(&self) -> Option<Arc<ResolvedGeometry>> {
        (**self).current_geometry()
    }

    fn install_geometry(&self, geometry: Arc<ResolvedGeometry>) -> Result<()> {
        (**self).install_geometry(geometry)
    }
}

impl<T: TransportEngine + ?Sized> TransportEngine for Arc<T> {
    fn phase(&self) -> EnginePhase {
        (**self).phase()
    }

    fn request_geometry_rebuild(&self) {
        (**self).request_geometry_rebuild()
    }

    fn notify_material_tables_stale(&self) {
        (**self).notify_material_tables_stale()
    }

    fn current_geometry(&self) -> Option<Arc<ResolvedGeometry>> {
        (**self).current_geometry()
    }

    fn install_geometry(&self, geometry: Arc<ResolvedGeometry>) -> Result<()> {
        (**self).install_geometry(geometry)
    }
}

/// Detector dimensions persisted with each run (lengths in mm).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunMetadata {
    pub target_radius: f64,
    pub target_length: f64,
    /// Sensitive extent along x, y and z.
    pub extent: [f64; 3],
}

impl RunMetadata {
    pub fn from_parameters(params: &GeometryParameters) -> Self {
        Self {
            target_radius: params.target_radius,
            target_length: params.target_length,
            extent: [
                params.target_radius,
                params.target_radius,
                params.target_length,
            ],
        }
    }
}

/// Receives the run metadata at the end of a run.
pub trait RunMetadataSink {
    fn fill_metadata(&mut self, metadata: &RunMetadata) -> anyhow::Result<()>;
}

impl RunMetadataSink for Vec<RunMetadata> {
    fn fill_metadata(&mut self, metadata: &RunMetadata) -> anyhow::Result<()> {
        self.push(*metadata);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::CM;

    #[test]
    fn test_phase_edits() {
        assert!(EnginePhase::PreInit.accepts_edits());
        assert!(EnginePhase::Idle.accepts_edits());
        assert!(!EnginePhase::EventLoop.accepts_edits());
        assert_eq!(EnginePhase::EventLoop.to_string(), "EventLoop");
    }

    #[test]
    fn test_metadata_from_parameters() -> anyhow::Result<()> {
        let params = GeometryParameters::default();
        let meta = RunMetadata::from_parameters(&params);
        assert_eq!(meta.extent, [10.0 * CM, 10.0 * CM, 15.0 * CM]);

        let mut sink: Vec<RunMetadata> = Vec::new();
        sink.fill_metadata(&meta)?;
        assert_eq!(sink, vec![meta]);
        Ok(())
    }
}
