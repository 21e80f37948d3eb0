mod primitives;
pub use self::primitives::*;

mod coordinates;
pub use self::coordinates::*;

mod locus;
pub use self::locus::*;

mod ray_pair;
pub use self::ray_pair::*;
