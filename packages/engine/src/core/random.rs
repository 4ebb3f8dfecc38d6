//! Random sources
//!
//! Host side: `SmallRng` seeded once from the configuration, used for
//! random seeding and sequential reseeding.
//! Device side: one xorshift32 state per cell, seeded once when the device
//! grid is allocated and advanced only by the kernel.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::rule::{Cell, ALIVE, DEAD};

const UNIT_SCALE: f32 = 1.0 / (1u32 << 24) as f32;

pub fn host_rng(seed: u64) -> SmallRng {
    SmallRng::seed_from_u64(seed)
}

/// Xorshift32 random number generator
#[inline]
pub fn xorshift32(state: &mut u32) -> u32 {
    let mut x = *state;
    x ^= x << 13;
    x ^= x >> 17;
    x ^= x << 5;
    *state = x;
    x
}

/// Uniform value in [0, 1) from the top 24 bits
#[inline]
pub fn unit_f32(bits: u32) -> f32 {
    (bits >> 8) as f32 * UNIT_SCALE
}

/// SplitMix64 finalizer, used to spread a seed over per-cell states
#[inline]
pub fn splitmix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Initial xorshift state for cell `idx`; never zero
#[inline]
pub fn cell_state(seed: u64, idx: usize) -> u32 {
    let mixed = splitmix64(seed ^ (idx as u64).wrapping_mul(0xD6E8_FEB8_6659_FD93));
    let state = (mixed >> 32) as u32 ^ mixed as u32;
    if state == 0 { 0x9E37_79B9 } else { state }
}

/// Overwrite `cells`, each alive independently with probability `p`
pub fn fill_cells<R: Rng + ?Sized>(cells: &mut [Cell], p: f32, rng: &mut R) -> u64 {
    let mut alive = 0u64;
    for cell in cells.iter_mut() {
        *cell = if p > 0.0 && rng.gen::<f32>() < p {
            alive += 1;
            ALIVE
        } else {
            DEAD
        };
    }
    alive
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_values_stay_below_one() {
        assert_eq!(unit_f32(0), 0.0);
        assert!(unit_f32(u32::MAX) < 1.0);
    }

    #[test]
    fn cell_states_are_nonzero_and_distinct() {
        let a = cell_state(42, 0);
        let b = cell_state(42, 1);
        assert_ne!(a, 0);
        assert_ne!(a, b);
        assert_eq!(a, cell_state(42, 0));
    }

    #[test]
    fn fill_is_deterministic_per_seed() {
        let mut a = vec![0u8; 256];
        let mut b = vec![0u8; 256];
        fill_cells(&mut a, 0.5, &mut host_rng(7));
        fill_cells(&mut b, 0.5, &mut host_rng(7));
        assert_eq!(a, b);
    }

    #[test]
    fn fill_extremes() {
        let mut cells = vec![1u8; 64];
        assert_eq!(fill_cells(&mut cells, 0.0, &mut host_rng(1)), 0);
        assert!(cells.iter().all(|&c| c == DEAD));
        assert_eq!(fill_cells(&mut cells, 1.0, &mut host_rng(1)), 64);
    }
}
