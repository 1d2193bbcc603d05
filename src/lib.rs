//! Concentric cylindrical detector geometry for Monte Carlo transport.
//!
//! Hierarchy: World → {Target, Shield, Vacuum, Wall}
//!
//! The shells are siblings placed at the origin of the world volume. Their
//! radii are derived from the target radius and the accumulated thicknesses,
//! so a change to one thickness moves every shell outside of it.

pub mod control;
pub mod engine;
pub mod error;
pub mod geom;
pub mod io;
pub mod logging;
pub mod material;
mod name;
pub mod sd;
pub mod sim;
mod uid;
pub mod units;

// Prelude
pub use control::{Ack, Command, ControllerState, ReconfigurationController, Signal};
pub use engine::{EnginePhase, RunManager, RunMetadata, RunMetadataSink, TransportEngine};
pub use error::{GeometryError, Result};
pub use geom::builder::ConcentricGeometryBuilder;
pub use geom::parameters::{GeometryParameters, Parameter, ParameterClass};
pub use geom::point::Point;
pub use geom::tree::ResolvedGeometry;
pub use geom::tube::{Inside, Tube};
pub use geom::vector::Vector;
pub use geom::volume::{Placement, Volume, VolumeKind};
pub use material::catalog::MaterialCatalog;
pub use material::{Component, Element, GasState, Material, State};
pub use name::HasName;
pub use sd::{BoundRegion, HitCollector, HitCollectorFactory, SensitiveRegionBinder};
pub use uid::UID;
