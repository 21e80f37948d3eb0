//! Distance-ordered sweep computing how much of every cell is hidden from an
//! observer on a hex grid.
//!
//! Cells are processed one distance band at a time, clockwise inside a band.
//! Opaque cells grow a set of occluded angular intervals (ray pairs) which
//! every later cell is tested against.

use std::ops::BitOrAssign;

use crate::fov::{FovError, ViewCone};
use crate::models::{Cover, FloatType, HexOffset, IntType, Locus, RayPair, Side, TileCover, TileSample};

/// Boundaries of a ray pair created in the current distance band.
///
/// A fresh boundary still counts as a neighbor for merges, but does not
/// shadow cells of its own band.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Freshness(u8);

impl Freshness {
    pub const STALE: Self = Self(0);
    pub const BOTH: Self = Self(3);

    pub fn contains(&self, side: Side) -> bool {
        self.0 & side.mask() != 0
    }

    pub fn bits(&self) -> u8 {
        self.0
    }

    /// Cover through `side`, discounted to nothing when that side is fresh
    fn discount(&self, cover: FloatType, side: Side) -> FloatType {
        if self.contains(side) {
            0.0
        } else {
            cover.max(0.0)
        }
    }
}

impl BitOrAssign<Side> for Freshness {
    fn bitor_assign(&mut self, side: Side) {
        self.0 |= side.mask();
    }
}

impl BitOrAssign for Freshness {
    fn bitor_assign(&mut self, other: Self) {
        self.0 |= other.0;
    }
}

/// Entry of the ordered active list: an arena index and its freshness
#[derive(Clone, Copy, Debug)]
struct ActiveSlot {
    pair: usize,
    fresh: Freshness,
}

/// Incremental field-of-view computation for one observer.
///
/// Every call to [`HexFovSweep::step`] completes one cell. The sweep keeps no
/// state beyond its own lifetime.
#[derive(Debug)]
pub struct HexFovSweep {
    observer: HexOffset,
    // Remaining loci, farthest first so the nearest pops off the end
    pending: Vec<Locus>,
    completed: Vec<Locus>,
    // Every ray pair created so far; only those in `active` are live
    pairs: Vec<RayPair>,
    active: Vec<ActiveSlot>,
    // Distance band currently being swept
    band: IntType,
    // Where the scan of the active list resumes
    cursor: usize,
    view_cone: Option<ViewCone>,
    evaluations: u64,
}

impl HexFovSweep {
    pub fn new(observer: HexOffset, world: &[TileSample]) -> Self {
        let mut loci: Vec<Locus> = world
            .iter()
            .map(|sample| Locus::new(sample.offset() - observer, sample.blocks_los))
            .collect();
        loci.sort_by(|a, b| b.sort_key().cmp(&a.sort_key()));

        let mut sweep = Self {
            observer,
            pending: loci,
            completed: Vec::with_capacity(world.len()),
            pairs: Vec::new(),
            active: Vec::new(),
            band: 1,
            cursor: 0,
            view_cone: None,
            evaluations: 0,
        };
        sweep.process_origin();
        sweep
    }

    pub fn with_view_cone(mut self, view_cone: Option<ViewCone>) -> Self {
        self.view_cone = view_cone;
        self
    }

    pub fn observer(&self) -> HexOffset {
        self.observer
    }

    pub fn is_done(&self) -> bool {
        self.pending.is_empty()
    }

    /// Absolute position of the cell the next step completes
    pub fn next_offset(&self) -> Option<HexOffset> {
        self.pending
            .last()
            .map(|locus| locus.offset + self.observer)
    }

    /// Number of cover evaluations against ray pairs so far
    pub fn evaluations(&self) -> u64 {
        self.evaluations
    }

    /// Live ray pairs in clockwise order
    pub fn active_pairs(&self) -> impl Iterator<Item = &RayPair> + '_ {
        self.active.iter().map(move |slot| &self.pairs[slot.pair])
    }

    /// Cells completed so far, in completion order
    pub fn snapshot(&self) -> Vec<TileCover> {
        self.completed
            .iter()
            .map(|locus| locus.to_tile_cover(self.observer))
            .collect()
    }

    /// The observer's own cell cannot be shadowed by itself
    fn process_origin(&mut self) {
        while let Some(locus) = self.pending.last() {
            if locus.dist2 != 0 {
                break;
            }
            if let Some(mut origin) = self.pending.pop() {
                origin.cover_left = 0.0;
                origin.cover_right = 0.0;
                self.completed.push(origin);
            }
        }
    }

    fn check_invariants(&self) -> Result<(), FovError> {
        let reflex = self.active_pairs().filter(|pair| pair.is_reflex).count();
        if reflex > 1 {
            return Err(FovError::MultipleReflexPairs(reflex));
        }
        let world = self.active_pairs().filter(|pair| pair.is_world).count();
        if world > 0 && self.active.len() != 1 {
            for pair in self.active_pairs() {
                log::error!("{}", pair);
            }
            return Err(FovError::WorldPairNotAlone {
                active: self.active.len(),
            });
        }
        Ok(())
    }

    /// Complete the nearest pending cell. Returns `false` once nothing is left.
    pub fn step(&mut self) -> Result<bool, FovError> {
        self.check_invariants()?;
        let mut locus = match self.pending.pop() {
            Some(locus) => locus,
            None => return Ok(false),
        };
        log::trace!("{} against {} ray pairs", locus, self.active.len());

        if locus.dist2 > self.band {
            log::trace!("Band {} -> {}", self.band, locus.dist2);
            self.band = locus.dist2;
            self.cursor = 0;
            for slot in self.active.iter_mut() {
                slot.fresh = Freshness::STALE;
            }
        }

        let resolved = self.resolve(&mut locus)?;
        if !resolved && locus.blocks_los {
            let pair = locus.to_ray_pair();
            log::debug!("Created ray pair {} from {}", self.pairs.len(), locus);
            self.pairs.push(pair);
            self.active.push(ActiveSlot {
                pair: self.pairs.len() - 1,
                fresh: Freshness::BOTH,
            });
            self.sort_active();
        }
        self.completed.push(locus);
        Ok(true)
    }

    /// Run the remaining steps and produce the final result
    pub fn finish(mut self) -> Result<Vec<TileCover>, FovError> {
        while self.step()? {}
        log::debug!("Ray pair evaluations: {}", self.evaluations);

        if let Some(view_cone) = self.view_cone {
            view_cone.apply(&mut self.completed);
        }
        let result = self.snapshot();
        for tile in result.iter() {
            if !(0.0..=1.0).contains(&tile.cover) {
                return Err(FovError::CoverOutOfRange {
                    offset: tile.offset,
                    cover: tile.cover,
                });
            }
        }
        Ok(result)
    }

    fn sort_active(&mut self) {
        let pairs = &self.pairs;
        self.active.sort_by(|a, b| {
            let a_key = pairs[a.pair].right_key();
            let b_key = pairs[b.pair].right_key();
            a_key
                .cmp(&b_key)
                .then_with(|| a.fresh.bits().cmp(&b.fresh.bits()))
        });
    }

    fn evaluate(&mut self, index: usize, locus: &Locus) -> Cover {
        self.evaluations += 1;
        let cover = self.pairs[self.active[index].pair].calculate_cover(locus);
        log::trace!(
            "\tpair [{}] {} fresh {}: {:?}",
            index,
            self.pairs[self.active[index].pair],
            self.active[index].fresh.bits(),
            cover
        );
        cover
    }

    /// Settle the cover of `locus` against the active pairs, merging it into
    /// them when it blocks. Returns `false` if no pair was adjacent.
    fn resolve(&mut self, locus: &mut Locus) -> Result<bool, FovError> {
        let len = self.active.len();
        let mut direction: isize = 0;

        for _ in 0..len {
            let cursor = self.cursor;
            let slot = self.active[cursor];
            let cover = self.evaluate(cursor, locus);

            let (amount, side) = match cover {
                Cover::Straddle { left, right } => {
                    locus.cover_right = slot.fresh.discount(left, Side::Left);
                    locus.cover_left = slot.fresh.discount(right, Side::Right);
                    let pair = &mut self.pairs[slot.pair];
                    if locus.blocks_los && pair.is_reflex {
                        log::debug!("Ray pair {} closed the circle at {}", slot.pair, locus);
                        pair.merge_locus(locus, Side::Both);
                    }
                    return Ok(true);
                }
                Cover::Hit { amount, side } if amount == 1.0 => {
                    // Cells of one band never fully hide each other, so this side is stale
                    if side == Side::Right {
                        locus.cover_left = amount;
                    } else {
                        locus.cover_right = amount;
                    }
                    return Ok(true);
                }
                Cover::Hit { amount, side } => (amount, side),
                Cover::Miss(side) => {
                    if direction == 0 {
                        direction = match side {
                            Side::Left => -1,
                            Side::Right => 1,
                            _ => 0,
                        };
                    } else if (direction == -1 && side != Side::Left)
                        || (direction == 1 && side != Side::Right)
                    {
                        break;
                    }
                    self.cursor = wrap(cursor as isize + direction, len);
                    continue;
                }
            };

            // Adjacent to one side, check the neighboring pair on the other
            let neighbor = if len > 1 {
                if side == Side::Left && direction != 1 {
                    Some(wrap(cursor as isize - 1, len))
                } else if direction != -1 {
                    Some(wrap(cursor as isize + 1, len))
                } else {
                    None
                }
            } else {
                None
            };
            let (neighbor_cover, neighbor_fresh) = match neighbor {
                Some(index) => (self.evaluate(index, locus), self.active[index].fresh),
                None => (Cover::Miss(Side::None), Freshness::STALE),
            };
            if let Cover::Straddle { .. } = neighbor_cover {
                return Err(FovError::NeighborStraddle(locus.offset));
            }
            if neighbor_cover.is_hit() && neighbor_cover.side() == side {
                log::error!("Locus {} touches two pairs on its {:?} side", locus, side);
                return Err(FovError::SameSideMerge(side));
            }

            let own = slot.fresh.discount(amount, side);
            let other = neighbor_fresh.discount(neighbor_cover.amount(), neighbor_cover.side());
            if side == Side::Right {
                locus.cover_right = own;
                locus.cover_left = other;
            } else {
                locus.cover_left = own;
                locus.cover_right = other;
            }

            if locus.blocks_los {
                match neighbor {
                    Some(index) if neighbor_cover.is_hit() => {
                        self.splice(cursor, side, index, neighbor_cover.side(), locus)?;
                    }
                    _ => {
                        log::debug!("Merging {} into ray pair {} ({:?})", locus, slot.pair, side);
                        self.pairs[slot.pair].merge_locus(locus, side);
                        self.active[cursor].fresh |= side;
                    }
                }
            }
            return Ok(true);
        }
        Ok(false)
    }

    /// Replace the pairs at `index` and `neighbor` by their union over `locus`
    fn splice(
        &mut self,
        index: usize,
        side: Side,
        neighbor: usize,
        neighbor_side: Side,
        locus: &Locus,
    ) -> Result<(), FovError> {
        let first = self.active[index];
        let second = self.active[neighbor];
        log::debug!(
            "Merging ray pairs {} ({:?}) and {} ({:?}) over {}",
            first.pair,
            side,
            second.pair,
            neighbor_side,
            locus
        );
        let mut merged = RayPair::merge_pairs_by_locus(
            (&self.pairs[first.pair], side),
            (&self.pairs[second.pair], neighbor_side),
        )?;
        merged.culprits.push(locus.offset);
        self.pairs.push(merged);

        let mut fresh = first.fresh;
        fresh |= second.fresh;
        self.active[index] = ActiveSlot {
            pair: self.pairs.len() - 1,
            fresh,
        };
        self.active.remove(neighbor);
        self.cursor = wrap(index as isize - 1, self.active.len());
        Ok(())
    }
}

fn wrap(index: isize, len: usize) -> usize {
    index.rem_euclid(len as isize) as usize
}

/// Cover and squared distance of every cell in `world` as seen from `observer`.
///
/// Cells are returned in the order the sweep completed them, nearest first.
pub fn calculate_hex_fov(
    observer: HexOffset,
    world: &[TileSample],
    view_cone: Option<ViewCone>,
) -> Result<Vec<TileCover>, FovError> {
    HexFovSweep::new(observer, world)
        .with_view_cone(view_cone)
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::ALMOST_COVER;
    use ahash::AHashMap;
    use float_cmp::approx_eq;
    use std::f64::consts::PI;

    fn open_board(walls: &[(IntType, IntType)]) -> Vec<TileSample> {
        let mut world = Vec::new();
        for y in 0..5 {
            for x in 0..5 {
                world.push(TileSample::new(x, y, walls.contains(&(x, y))));
            }
        }
        world
    }

    fn covers(result: &[TileCover]) -> AHashMap<(IntType, IntType), FloatType> {
        result
            .iter()
            .map(|tile| ((tile.offset.x, tile.offset.y), tile.cover))
            .collect()
    }

    #[test]
    fn single_cell_world() {
        let world = vec![TileSample::new(0, 0, false)];
        let result = calculate_hex_fov(HexOffset::new(0, 0), &world, None).unwrap();
        assert_eq!(
            vec![TileCover {
                offset: HexOffset::new(0, 0),
                cover: 0.0,
                dist2: 0
            }],
            result
        );
    }

    #[test]
    fn observer_inside_a_wall_sees_out() {
        let world = open_board(&[(2, 2)]);
        let result = calculate_hex_fov(HexOffset::new(2, 2), &world, None).unwrap();
        assert!(result.iter().all(|tile| tile.cover == 0.0));
    }

    #[test]
    fn every_cell_is_returned_once_nearest_first() {
        let world = open_board(&[(3, 2), (1, 1)]);
        let observer = HexOffset::new(2, 2);
        let result = calculate_hex_fov(observer, &world, None).unwrap();
        assert_eq!(world.len(), result.len());
        assert_eq!(observer, result[0].offset);
        assert!(result.windows(2).all(|w| w[0].dist2 <= w[1].dist2));
        for tile in result.iter() {
            let d = tile.offset - observer;
            assert_eq!(d.x * d.x + d.y * d.y - d.x * d.y, tile.dist2);
            assert!((0.0..=1.0).contains(&tile.cover));
        }
        assert_eq!(world.len(), covers(&result).len());
    }

    #[test]
    fn wall_east_shadows_cells_behind() {
        let world = open_board(&[(3, 2)]);
        let result = calculate_hex_fov(HexOffset::new(2, 2), &world, None).unwrap();
        let covers = covers(&result);
        assert_eq!(1.0, covers[&(4, 2)]);
        for cell in [(4, 3), (3, 1), (4, 1)].iter() {
            assert!(approx_eq!(f64, *ALMOST_COVER, covers[cell], epsilon = 1e-12));
        }
        assert_eq!(0.0, covers[&(3, 2)]);
        assert_eq!(0.0, covers[&(0, 2)]);
    }

    #[test]
    fn same_input_gives_identical_output() {
        let world = open_board(&[(3, 2), (2, 3), (1, 1), (0, 4)]);
        let first = calculate_hex_fov(HexOffset::new(2, 2), &world, None).unwrap();
        let second = calculate_hex_fov(HexOffset::new(2, 2), &world, None).unwrap();
        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.offset, b.offset);
            assert_eq!(a.cover.to_bits(), b.cover.to_bits());
            assert_eq!(a.dist2, b.dist2);
        }
    }

    #[test]
    fn stepping_matches_one_shot() {
        let world = open_board(&[(3, 2), (3, 3)]);
        let observer = HexOffset::new(2, 2);
        let mut sweep = HexFovSweep::new(observer, &world);
        let mut steps = 0;
        while let Some(next) = sweep.next_offset() {
            assert!(sweep.step().unwrap());
            assert_eq!(next, sweep.snapshot().last().unwrap().offset);
            steps += 1;
        }
        assert!(sweep.is_done());
        assert!(!sweep.step().unwrap());
        assert_eq!(world.len() - 1, steps);
        assert!(sweep.evaluations() > 0);
        assert_eq!(1, sweep.active_pairs().count());

        let stepped = sweep.finish().unwrap();
        let direct = calculate_hex_fov(observer, &world, None).unwrap();
        assert_eq!(direct, stepped);
    }

    #[test]
    fn view_cone_hides_cells_behind() {
        let world = open_board(&[]);
        let observer = HexOffset::new(2, 2);
        let cone = ViewCone::new(PI, HexOffset::new(1, 1)).unwrap();
        let result = calculate_hex_fov(observer, &world, Some(cone)).unwrap();
        for tile in result.iter() {
            let d = tile.offset - observer;
            let expected = match d.x + d.y {
                s if s <= -2 => 1.0,
                -1 => 0.5,
                _ => 0.0,
            };
            assert!(
                approx_eq!(f64, expected, tile.cover, epsilon = 1e-12),
                "{} expected {} got {}",
                tile.offset,
                expected,
                tile.cover
            );
        }
    }

    #[test]
    fn freshness_bits() {
        let mut fresh = Freshness::STALE;
        assert!(!fresh.contains(Side::Left));
        fresh |= Side::Right;
        assert!(fresh.contains(Side::Right));
        assert!(!fresh.contains(Side::Left));
        assert!(!fresh.contains(Side::None));
        fresh |= Freshness::BOTH;
        assert_eq!(3, fresh.bits());
        assert_eq!(0.0, fresh.discount(0.7, Side::Left));
        assert_eq!(0.0, Freshness::STALE.discount(-1.0, Side::Left));
        assert_eq!(0.7, Freshness::STALE.discount(0.7, Side::Right));
    }

    fn activate(sweep: &mut HexFovSweep, pair: RayPair) {
        sweep.pairs.push(pair);
        sweep.active.push(ActiveSlot {
            pair: sweep.pairs.len() - 1,
            fresh: Freshness::STALE,
        });
    }

    fn wall_pair(x: IntType, y: IntType) -> RayPair {
        Locus::new(HexOffset::new(x, y), true).to_ray_pair()
    }

    #[test]
    fn two_reflex_pairs_are_rejected() {
        let mut sweep = HexFovSweep::new(HexOffset::new(2, 2), &open_board(&[]));
        for &(x, y) in [(1, 0), (-1, 0)].iter() {
            let mut pair = wall_pair(x, y);
            pair.is_reflex = true;
            activate(&mut sweep, pair);
        }
        let pending = sweep.next_offset();
        assert_eq!(Err(FovError::MultipleReflexPairs(2)), sweep.step());
        assert_eq!(pending, sweep.next_offset());
    }

    #[test]
    fn world_pair_must_be_alone() {
        let mut sweep = HexFovSweep::new(HexOffset::new(2, 2), &open_board(&[]));
        let mut world = wall_pair(1, 0);
        world.is_world = true;
        activate(&mut sweep, world);
        activate(&mut sweep, wall_pair(-1, 0));
        assert_eq!(Err(FovError::WorldPairNotAlone { active: 2 }), sweep.step());
    }

    #[test]
    fn negative_cover_is_rejected() {
        let mut sweep = HexFovSweep::new(HexOffset::new(0, 0), &[TileSample::new(0, 0, false)]);
        let mut locus = Locus::new(HexOffset::new(1, 0), false);
        locus.cover_left = -0.5;
        sweep.completed.push(locus);
        assert_eq!(
            Err(FovError::CoverOutOfRange {
                offset: HexOffset::new(1, 0),
                cover: -0.5
            }),
            sweep.finish()
        );
    }

    fn hex_distance(offset: HexOffset) -> IntType {
        offset.x.abs().max(offset.y.abs()).max((offset.x - offset.y).abs())
    }

    #[test]
    fn closed_ring_hides_everything_outside() {
        for &radius in [2, 3].iter() {
            let mut world = Vec::new();
            for x in -5..=5 {
                for y in -5..=5 {
                    let on_ring = hex_distance(HexOffset::new(x, y)) == radius;
                    world.push(TileSample::new(x, y, on_ring));
                }
            }

            let mut sweep = HexFovSweep::new(HexOffset::ORIGIN, &world);
            while sweep.step().unwrap() {}
            // The ring closes into a single pair covering the whole circle
            let active: Vec<&RayPair> = sweep.active_pairs().collect();
            assert_eq!(1, active.len());
            assert!(active[0].is_world);

            for tile in sweep.finish().unwrap().iter() {
                let distance = hex_distance(tile.offset);
                if distance > radius {
                    assert_eq!(1.0, tile.cover, "radius {} cell {}", radius, tile.offset);
                } else if distance < radius {
                    assert_eq!(0.0, tile.cover, "radius {} cell {}", radius, tile.offset);
                }
            }
        }
    }
}
