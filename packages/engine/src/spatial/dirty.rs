//! Dirty-row tracking for the render buffer
//!
//! One bit per grid row. Backends mark rows when the render buffer changes;
//! the renderer drains them to upload only what moved.

#[derive(Clone, Debug)]
pub struct DirtyRows {
    bits: Vec<u64>,
    rows: u32,
}

impl DirtyRows {
    pub fn new(rows: u32) -> Self {
        Self {
            bits: vec![0u64; (rows as usize + 63) / 64],
            rows,
        }
    }

    #[inline(always)]
    fn set_bit(bits: &mut [u64], idx: usize) {
        let word = idx >> 6;
        let bit = idx & 63;
        if word < bits.len() {
            bits[word] |= 1u64 << bit;
        }
    }

    #[inline(always)]
    fn check_bit(bits: &[u64], idx: usize) -> bool {
        let word = idx >> 6;
        let bit = idx & 63;
        word < bits.len() && (bits[word] & (1u64 << bit)) != 0
    }

    #[inline]
    pub fn mark(&mut self, row: u32) {
        if row < self.rows {
            Self::set_bit(&mut self.bits, row as usize);
        }
    }

    pub fn mark_all(&mut self) {
        self.bits.fill(u64::MAX);
        let tail = self.rows as usize & 63;
        if tail != 0 {
            if let Some(last) = self.bits.last_mut() {
                *last = (1u64 << tail) - 1;
            }
        }
    }

    #[inline]
    pub fn is_dirty(&self, row: u32) -> bool {
        Self::check_bit(&self.bits, row as usize)
    }

    pub fn count(&self) -> usize {
        self.bits.iter().map(|w| w.count_ones() as usize).sum()
    }

    pub fn is_clean(&self) -> bool {
        self.bits.iter().all(|&w| w == 0)
    }

    /// Dirty row indices in ascending order; clears the set
    pub fn drain(&mut self) -> Vec<u32> {
        let mut out = Vec::with_capacity(self.count());
        for (word_idx, word) in self.bits.iter_mut().enumerate() {
            let mut w = *word;
            while w != 0 {
                let bit = w.trailing_zeros();
                out.push((word_idx as u32) * 64 + bit);
                w &= w - 1;
            }
            *word = 0;
        }
        out
    }
}
