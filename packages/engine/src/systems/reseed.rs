//! Virtual fill - spontaneous birth of dead cells
//!
//! Each dead cell of a freshly computed generation is independently
//! resurrected with probability `p`. Both backends call this from inside
//! their rule pass so the grid is traversed once per generation.

use rand::Rng;

use crate::core::config::check_probability;
use crate::core::error::EngineResult;
use crate::core::random::{unit_f32, xorshift32};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReseedController {
    probability: f32,
}

impl ReseedController {
    pub fn new(probability: f32) -> EngineResult<Self> {
        check_probability("virtual_fill_prob", probability)?;
        Ok(Self { probability })
    }

    pub fn disabled() -> Self {
        Self { probability: 0.0 }
    }

    #[inline]
    pub fn probability(&self) -> f32 {
        self.probability
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.probability > 0.0
    }

    /// Host-side draw for one dead cell
    #[inline]
    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> bool {
        rng.gen::<f32>() < self.probability
    }

    /// Device-side draw advancing the cell's own xorshift state
    #[inline]
    pub fn roll_device(&self, state: &mut u32) -> bool {
        unit_f32(xorshift32(state)) < self.probability
    }
}
