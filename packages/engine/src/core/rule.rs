//! Neighbor-count rule (B3/S23)
//!
//! Shared verbatim by both backends; any divergence here breaks the
//! sequential/parallel equivalence.

/// Cell state as stored in grid buffers
pub type Cell = u8;

pub const DEAD: Cell = 0;
pub const ALIVE: Cell = 1;

/// Next state of a cell given its live neighbor count.
#[inline(always)]
pub fn next_state(alive_neighbors: u8, alive: bool) -> bool {
    match (alive, alive_neighbors) {
        (true, 2) | (true, 3) => true, // survival
        (false, 3) => true,            // birth
        _ => false,
    }
}

/// Byte form of [`next_state`] used in the hot loops
#[inline(always)]
pub fn next_cell(alive_neighbors: u8, cell: Cell) -> Cell {
    next_state(alive_neighbors, cell != DEAD) as Cell
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn birth_only_on_three() {
        for n in 0..=8u8 {
            assert_eq!(next_state(n, false), n == 3, "dead cell with {n} neighbors");
        }
    }

    #[test]
    fn survival_on_two_or_three() {
        for n in 0..=8u8 {
            assert_eq!(next_state(n, true), n == 2 || n == 3, "live cell with {n} neighbors");
        }
    }

    #[test]
    fn byte_form_matches() {
        assert_eq!(next_cell(3, DEAD), ALIVE);
        assert_eq!(next_cell(1, ALIVE), DEAD);
        assert_eq!(next_cell(2, ALIVE), ALIVE);
    }
}
