mod error;
pub use self::error::*;
mod sweep;
pub use self::sweep::*;
mod view_cone;
pub use self::view_cone::*;
