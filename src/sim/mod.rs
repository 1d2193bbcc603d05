//! Checks run against a built geometry before events are simulated.

pub mod overlap;

pub use overlap::{Overlap, check_overlaps};
