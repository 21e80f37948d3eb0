pub mod cli;
pub mod config;
pub mod constants;
pub mod fov;
pub mod harness;
pub mod level;
pub mod models;
pub mod perception;
pub mod utils;

pub use fov::{calculate_hex_fov, FovError, HexFovSweep, ViewCone};
