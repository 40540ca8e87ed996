//! Pipe pool generation
//!
//! The course is a fixed ring of [`PIPE_PAIRS`] pairs. Pairs that leave the
//! screen are moved behind the rightmost one and given fresh heights, which
//! makes five pairs look like an endless stream.

use rand::Rng;

use super::state::PipePair;
use crate::consts::*;

/// Complementary heights for one pair from a coin flip and a raw offset
///
/// The side picked by `top_first` gets `MIN_PIPE_HEIGHT + raw`; the other
/// side gets the rest of `TOTAL_PIPE_HEIGHT`. `raw` is clamped below
/// `PIPE_HEIGHT_VARIATION`.
pub fn heights_from_draw(top_first: bool, raw: u32) -> (u32, u32) {
    let first = MIN_PIPE_HEIGHT + raw.min(PIPE_HEIGHT_VARIATION - 1);
    let second = TOTAL_PIPE_HEIGHT - first;
    if top_first {
        (first, second)
    } else {
        (second, first)
    }
}

/// Random (top, bottom) heights summing to `TOTAL_PIPE_HEIGHT`
pub fn generate_heights<R: Rng + ?Sized>(rng: &mut R) -> (u32, u32) {
    let top_first = rng.random::<f64>() > 0.5;
    let raw = rng.random_range(0..PIPE_HEIGHT_VARIATION);
    heights_from_draw(top_first, raw)
}

/// Initial x of pool slot `index`: just off the right edge, evenly spaced
pub fn slot_x(index: usize) -> f64 {
    SCREEN_WIDTH + index as f64 * (f64::from(PIPE_WIDTH) + PIPE_GAP)
}

/// Build a full pool of pairs starting just past the right screen edge
pub fn populate_pipes<R: Rng + ?Sized>(rng: &mut R) -> [PipePair; PIPE_PAIRS] {
    std::array::from_fn(|i| PipePair::new(slot_x(i), generate_heights(&mut *rng)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::geometry::{Bounded, Rect};
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_upper_branch_scenario() {
        let (h1, h2) = heights_from_draw(true, 40);
        assert_eq!(h1, 120);
        assert_eq!(h2, 305);
        assert_eq!(h1 + h2, 425);
    }

    #[test]
    fn test_lower_branch_mirrors() {
        assert_eq!(heights_from_draw(false, 40), (305, 120));
    }

    #[test]
    fn test_extreme_draws() {
        assert_eq!(heights_from_draw(true, 0), (80, 345));
        assert_eq!(heights_from_draw(true, 74), (154, 271));
        // Out-of-range draws clamp to the largest legal offset
        assert_eq!(heights_from_draw(true, 500), (154, 271));
    }

    #[test]
    fn test_populate_layout() {
        let mut rng = Pcg32::seed_from_u64(5);
        let pipes = populate_pipes(&mut rng);

        assert_eq!(pipes.len(), 5);
        for (i, pair) in pipes.iter().enumerate() {
            let x = 800.0 + i as f64 * 340.0;
            assert_eq!(pair.x(), x);
            assert_eq!(pair.bottom.placement.x(), x);
            assert_eq!(pair.top.placement.y(), 0.0);
            assert_eq!(
                pair.bottom.placement.y(),
                600.0 - f64::from(pair.bottom.height())
            );
            assert!(!pair.crossed);
            assert_eq!(
                *pair.top.rect(),
                Rect::new(x as i32, 0, x as i32 + 70, pair.top.height() as i32)
            );
            assert_eq!(pair.bottom.rect().max_y, 600);
        }
    }

    #[test]
    fn test_populate_is_seeded() {
        let a = populate_pipes(&mut Pcg32::seed_from_u64(77));
        let b = populate_pipes(&mut Pcg32::seed_from_u64(77));
        for (pa, pb) in a.iter().zip(b.iter()) {
            assert_eq!(pa.top.height(), pb.top.height());
            assert_eq!(pa.bottom.height(), pb.bottom.height());
        }
    }

    proptest! {
        #[test]
        fn test_drawn_heights_hold_invariant(top_first: bool, raw in 0u32..75) {
            let (h1, h2) = heights_from_draw(top_first, raw);
            prop_assert_eq!(h1 + h2, TOTAL_PIPE_HEIGHT);
            prop_assert!(h1 >= MIN_PIPE_HEIGHT);
            prop_assert!(h2 >= MIN_PIPE_HEIGHT);
            prop_assert!(h1 <= TOTAL_PIPE_HEIGHT - MIN_PIPE_HEIGHT);
        }

        #[test]
        fn test_generated_pools_hold_invariant(seed: u64) {
            let mut rng = Pcg32::seed_from_u64(seed);
            for pair in populate_pipes(&mut rng).iter() {
                let (h1, h2) = (pair.top.height(), pair.bottom.height());
                prop_assert_eq!(h1 + h2, TOTAL_PIPE_HEIGHT);
                prop_assert!(h1 >= MIN_PIPE_HEIGHT && h2 >= MIN_PIPE_HEIGHT);
            }
        }
    }
}
