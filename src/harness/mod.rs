mod history;
pub use self::history::*;
pub mod regression;
pub use self::regression::{run_regression, RegressionFailure, RegressionReport};
mod render;
pub use self::render::*;
mod step_through;
pub use self::step_through::*;
pub mod unit;
pub use self::unit::run_unit;
