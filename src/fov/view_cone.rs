use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::constants::{HEX_NEIGHBORS, VIEW_CONE_FULL_COVER};
use crate::fov::FovError;
use crate::models::{Cover, FloatType, HexOffset, Locus, RayPair, Side};

/// Limits the field of view to an aperture centered on a facing direction
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct ViewCone {
    // Total aperture in radians, 2pi is the full circle
    pub aperture: FloatType,
    // Unit hex direction the observer faces
    pub facing: HexOffset,
}

impl ViewCone {
    pub fn new(aperture: FloatType, facing: HexOffset) -> Result<Self, FovError> {
        let valid_aperture = aperture > 0.0 && aperture <= 2.0 * PI;
        if !valid_aperture || !HEX_NEIGHBORS.contains(&facing) {
            return Err(FovError::InvalidViewCone { aperture, facing });
        }
        Ok(Self { aperture, facing })
    }

    /// Raise the cover of every locus hidden by the cone behind the observer.
    /// Loci keep whichever of their own and the masked cover is larger.
    pub fn apply(&self, loci: &mut [Locus]) {
        let blocked = RayPair::from_facing(self.facing, self.aperture);
        for locus in loci.iter_mut().filter(|locus| !locus.offset.is_origin()) {
            let (left, right) = match blocked.calculate_cover(locus) {
                Cover::Straddle { left, right } => (left, right),
                Cover::Hit {
                    amount,
                    side: Side::None,
                } => (amount, amount),
                cover => {
                    let amount = cover.amount().max(0.0);
                    if cover.side() == Side::Left {
                        (amount, 0.0)
                    } else {
                        (0.0, amount)
                    }
                }
            };
            locus.cover_left = locus.cover_left.max(saturate(left));
            locus.cover_right = locus.cover_right.max(saturate(right));
        }
    }
}

fn saturate(cover: FloatType) -> FloatType {
    if cover > VIEW_CONE_FULL_COVER {
        1.0
    } else {
        cover
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_arguments() {
        assert!(ViewCone::new(0.0, HexOffset::new(1, 0)).is_err());
        assert!(ViewCone::new(7.0, HexOffset::new(1, 0)).is_err());
        assert!(ViewCone::new(PI, HexOffset::new(2, 0)).is_err());
        assert!(ViewCone::new(PI, HexOffset::new(1, -1)).is_err());
        assert!(ViewCone::new(PI, HexOffset::new(0, -1)).is_ok());
        assert!(ViewCone::new(2.0 * PI, HexOffset::new(1, 1)).is_ok());
    }

    #[test]
    fn masks_loci_behind_observer() {
        let cone = ViewCone::new(PI, HexOffset::new(1, 1)).unwrap();
        let mut loci = vec![
            Locus::new(HexOffset::new(0, 0), false),
            Locus::new(HexOffset::new(1, 1), false),
            Locus::new(HexOffset::new(-1, -1), false),
            Locus::new(HexOffset::new(-1, 0), false),
        ];
        cone.apply(&mut loci);
        assert_eq!(0.0, loci[0].cover());
        assert_eq!(0.0, loci[1].cover());
        assert_eq!(1.0, loci[2].cover());
        assert!((loci[3].cover() - 0.5).abs() < 1e-12);
    }
}
