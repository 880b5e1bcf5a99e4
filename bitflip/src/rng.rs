use rand_core::{impls, Error, RngCore};

/// Fallback seed, used where a zero seed would otherwise pin the generator
/// at zero forever.
pub const DEFAULT_SEED: u64 = 0x2839839283234;

/// A basic random number generator based on xorshift64 with 64-bits of state
pub struct XorShift64 {
    /// The RNG's seed and state
    seed: u64,
}

impl XorShift64 {
    /// Create a generator from `seed`, nudging zero to [`DEFAULT_SEED`].
    pub fn new(seed: u64) -> Self {
        XorShift64 {
            seed: if seed == 0 { DEFAULT_SEED } else { seed },
        }
    }

    /// Generate a random number
    #[inline]
    pub fn next(&mut self) -> u64 {
        let val = self.seed;
        self.seed ^= self.seed << 13;
        self.seed ^= self.seed >> 17;
        self.seed ^= self.seed << 43;
        val
    }
}

impl RngCore for XorShift64 {
    #[inline]
    fn next_u32(&mut self) -> u32 {
        self.next() as u32
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        self.next()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        impls::fill_bytes_via_next(self, dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

/// Draw a number in `[0, bound)` by modulo reduction.
#[inline]
pub(crate) fn below<R: RngCore>(rng: &mut R, bound: usize) -> usize {
    debug_assert!(bound > 0, "below() needs a non-empty range");
    rng.next_u64() as usize % bound
}

/// Generator that replays a fixed list of draws, so tests can steer every
/// index and bit choice.
#[cfg(test)]
pub(crate) struct ScriptRng {
    draws: Vec<u64>,
    at: usize,
}

#[cfg(test)]
impl ScriptRng {
    pub(crate) fn new(draws: &[u64]) -> Self {
        ScriptRng {
            draws: draws.to_vec(),
            at: 0,
        }
    }
}

#[cfg(test)]
impl RngCore for ScriptRng {
    fn next_u32(&mut self) -> u32 {
        self.next_u64() as u32
    }

    fn next_u64(&mut self) -> u64 {
        let val = self.draws.get(self.at).copied().expect("script ran dry");
        self.at += 1;
        val
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        impls::fill_bytes_via_next(self, dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_state_before_stepping() {
        let mut rng = XorShift64::new(1);
        assert_eq!(rng.next(), 1);
        assert_eq!(rng.next(), 0x0100_0800_0000_2001);
    }

    #[test]
    fn zero_seed_is_nudged() {
        let mut rng = XorShift64::new(0);
        assert_eq!(rng.next(), DEFAULT_SEED);
        assert_ne!(rng.next(), 0);
    }

    #[test]
    fn below_stays_in_range() {
        let mut rng = XorShift64::new(0xdead_beef);
        for _ in 0..10_000 {
            assert!(below(&mut rng, 10) < 10);
            assert_eq!(below(&mut rng, 1), 0);
        }
    }

    #[test]
    fn scripted_draws_replay_in_order() {
        let mut rng = ScriptRng::new(&[3, 1, 4]);
        assert_eq!(rng.next_u64(), 3);
        assert_eq!(rng.next_u64(), 1);
        assert_eq!(rng.next_u64(), 4);
    }
}
