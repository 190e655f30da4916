//! Code pools: every fixed-length code over digits `1..=max_digit`, shuffled
//! by the caller's seeded generator.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{Result, StimError};
use crate::types::Code;

/// Largest pool we are willing to materialize (9^7).
pub const MAX_POOL_SIZE: usize = 4_782_969;

/// Left and right part-codes, one per part index. The two sides never share
/// a code.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartCodes {
    pub left: Vec<Code>,
    pub right: Vec<Code>,
}

/// Digit alphabet `1..=max_digit`.
#[derive(Clone, Copy, Debug)]
pub struct CodeSpace {
    max_digit: u8,
}

impl CodeSpace {
    pub fn new(max_digit: u8) -> Self {
        Self { max_digit }
    }

    /// Number of distinct codes of `length` digits, if it fits in a pool.
    pub fn pool_size(&self, length: usize) -> Option<usize> {
        (self.max_digit as usize)
            .checked_pow(u32::try_from(length).ok()?)
            .filter(|&n| n <= MAX_POOL_SIZE)
    }

    /// Every code of `length` digits in lexicographic order, then shuffled.
    pub fn all_unique_codes<R: Rng + ?Sized>(&self, length: usize, rng: &mut R) -> Result<Vec<Code>> {
        let size = self.pool_size(length).ok_or_else(|| {
            StimError::InvalidParameters(format!(
                "{}^{} codes exceed the pool limit of {}",
                self.max_digit, length, MAX_POOL_SIZE
            ))
        })?;

        let base = self.max_digit as usize;
        let mut codes = Vec::with_capacity(size);
        let mut digits = vec![0u8; length];
        for index in 0..size {
            let mut rest = index;
            for slot in digits.iter_mut().rev() {
                *slot = (rest % base) as u8 + 1;
                rest /= base;
            }
            codes.push(Code::from_digits(&digits));
        }

        codes.shuffle(rng);
        Ok(codes)
    }

    /// Draw `2 * n_part` distinct codes of `half_length` digits and split them
    /// into disjoint left and right halves of exactly `n_part` each.
    pub fn draw_part_codes<R: Rng + ?Sized>(
        &self,
        n_part: usize,
        half_length: usize,
        rng: &mut R,
    ) -> Result<PartCodes> {
        let mut pool = self.all_unique_codes(half_length, rng)?;
        let needed = 2 * n_part;
        if pool.len() < needed {
            return Err(StimError::PoolExhausted {
                context: format!("drawing part-codes of length {half_length}"),
                needed,
                found: pool.len(),
            });
        }
        pool.truncate(needed);
        let right = pool.split_off(n_part);
        Ok(PartCodes { left: pool, right })
    }
}
