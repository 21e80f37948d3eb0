mod cellular;
pub use self::cellular::*;
mod grid;
pub use self::grid::*;
