//! Deterministic random number generation.
//!
//! All randomness in the simulation (terrain growth, attack rolls, damage
//! jitter, spawn-type rolls) flows through a single [`GameRng`] owned by the
//! orchestrator and threaded explicitly through calls. Given the same seed,
//! a game replays identically.

/// PCG random number generator (Permuted Congruential Generator).
///
/// PCG-XSH-RR: 64-bit LCG state with a xorshift-high / random-rotate output
/// permutation. Small state, fast, and passes the usual statistical suites,
/// which is plenty for game mechanics.
#[derive(Clone, Copy, Debug)]
pub struct GameRng {
    state: u64,
}

impl GameRng {
    /// PCG multiplier constant.
    const MULTIPLIER: u64 = 6364136223846793005;

    /// PCG increment constant.
    const INCREMENT: u64 = 1442695040888963407;

    /// Creates a generator from a seed.
    ///
    /// The seed is run through a SplitMix64-style avalanche so that small or
    /// sequential seeds still produce well-mixed initial states.
    pub fn new(seed: u64) -> Self {
        let mut state = seed;
        state ^= state >> 33;
        state = state.wrapping_mul(0xff51afd7ed558ccd);
        state ^= state >> 33;
        Self {
            state: Self::pcg_step(state),
        }
    }

    /// Advance the LCG state by one step.
    #[inline]
    fn pcg_step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    /// XSH-RR output function: xorshift the high bits, then rotate by the
    /// top five bits of state.
    #[inline]
    fn pcg_output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = Self::pcg_step(self.state);
        Self::pcg_output(self.state)
    }

    /// Uniform value in `[0, 1)`.
    pub fn unit(&mut self) -> f64 {
        f64::from(self.next_u32()) / (f64::from(u32::MAX) + 1.0)
    }

    /// Uniform value in `[0, 100)`, the domain of hit-chance rolls.
    pub fn percent(&mut self) -> f64 {
        self.unit() * 100.0
    }

    /// Uniform integer in `[min, max]` inclusive.
    pub fn range_u32(&mut self, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        let span = max - min + 1;
        min + (self.next_u32() % span)
    }

    /// Uniform index in `[0, len)`. Returns 0 for an empty range.
    pub fn index(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        (self.next_u32() as usize) % len
    }

    /// Uniform value in `[lo, hi)`, used for damage jitter.
    pub fn jitter(&mut self, lo: f64, hi: f64) -> f64 {
        lo + self.unit() * (hi - lo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = GameRng::new(0xdead_beef);
        let mut b = GameRng::new(0xdead_beef);
        for _ in 0..64 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = GameRng::new(1);
        let mut b = GameRng::new(2);
        let diverged = (0..16).any(|_| a.next_u32() != b.next_u32());
        assert!(diverged);
    }

    #[test]
    fn ranges_respect_bounds() {
        let mut rng = GameRng::new(42);
        for _ in 0..256 {
            let v = rng.range_u32(3, 7);
            assert!((3..=7).contains(&v));

            let u = rng.unit();
            assert!((0.0..1.0).contains(&u));

            let j = rng.jitter(0.9, 1.1);
            assert!((0.9..1.1).contains(&j));
        }
    }
}
