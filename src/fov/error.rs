//! Errors raised by the field-of-view sweep.

use std::fmt;

use crate::models::{FloatType, HexOffset, Side};

/// Broken sweep invariants and rejected view-cone arguments.
///
/// Every variant except `InvalidViewCone` indicates a geometry bug rather than
/// bad input; callers should report it with enough context to reproduce.
#[derive(Debug, Clone, PartialEq)]
pub enum FovError {
    /// More than one active ray pair spans a reflex angle
    MultipleReflexPairs(usize),

    /// A ray pair covering the whole circle is active alongside others
    WorldPairNotAlone { active: usize },

    /// Two ray pairs were to be spliced on the same side of a locus
    SameSideMerge(Side),

    /// A ray pair was to be spliced with itself
    SelfMerge,

    /// The neighbor of a covering pair touches the locus from both sides
    NeighborStraddle(HexOffset),

    /// A finished cell ended up with a cover outside [0, 1]
    CoverOutOfRange { offset: HexOffset, cover: FloatType },

    /// Aperture outside (0, 2pi] or facing that is not a unit hex direction
    InvalidViewCone { aperture: FloatType, facing: HexOffset },
}

impl fmt::Display for FovError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FovError::MultipleReflexPairs(count) => {
                write!(f, "{} reflex ray pairs active at once", count)
            }
            FovError::WorldPairNotAlone { active } => write!(
                f,
                "world ray pair coexists with other ray pairs ({} active)",
                active
            ),
            FovError::SameSideMerge(side) => {
                write!(f, "cannot merge ray pairs on the same side ({:?})", side)
            }
            FovError::SelfMerge => write!(f, "cannot merge a ray pair with itself"),
            FovError::NeighborStraddle(offset) => write!(
                f,
                "neighboring ray pair straddles locus {} from both sides",
                offset
            ),
            FovError::CoverOutOfRange { offset, cover } => {
                write!(f, "cover {} out of range at {}", cover, offset)
            }
            FovError::InvalidViewCone { aperture, facing } => write!(
                f,
                "invalid view cone: aperture {} facing {}",
                aperture, facing
            ),
        }
    }
}

impl std::error::Error for FovError {}
