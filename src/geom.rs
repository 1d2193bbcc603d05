pub mod builder;
pub mod parameters;
pub mod point;
pub mod tree;
pub mod tube;
pub mod vector;
pub mod volume;

/// Geometric precision for point/vector comparisons
const EPS: f64 = 1e-12;
