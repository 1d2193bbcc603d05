//! Operator command surface.
//!
//! Each mutable parameter has one [`Command`] variant. The controller
//! dispatches them in submission order, one at a time.

pub mod command;
pub mod controller;

pub use command::{Command, Payload};
pub use controller::{Ack, ControllerState, ReconfigurationController, Signal};
