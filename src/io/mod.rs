//! File I/O for detector configurations.

pub mod config;

pub use config::{from_json_string, read_parameters, to_json_string, write_parameters};
