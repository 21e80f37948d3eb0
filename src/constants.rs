use lazy_static::lazy_static;

use crate::models::{FloatType, HexOffset};

/// Tolerance used for every boundary comparison in the sweep
pub const EPSILON: FloatType = 0.000_000_1;

/// A view-cone side contribution above this counts as full cover
pub const VIEW_CONE_FULL_COVER: FloatType = 0.866;

/// Unit hex directions in axial coordinates
pub const HEX_NEIGHBORS: [HexOffset; 6] = [
    HexOffset { x: 1, y: 1 },
    HexOffset { x: -1, y: -1 },
    HexOffset { x: 0, y: -1 },
    HexOffset { x: -1, y: 0 },
    HexOffset { x: 1, y: 0 },
    HexOffset { x: 0, y: 1 },
];

lazy_static! {
    pub static ref SQRT3_4: FloatType = (3.0 as FloatType / 4.0).sqrt();

    /// Hex -> cartesian transform, rows of a 2x2 matrix
    pub static ref HEX_TRANSFORM: [[FloatType; 2]; 2] = [[-*SQRT3_4, *SQRT3_4], [-0.5, -0.5]];

    /// Cover of a cell whose edge is shaved by a neighboring occluder
    pub static ref ALMOST_COVER: FloatType = 1.0 - *SQRT3_4;
}
