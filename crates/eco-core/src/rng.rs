//! Deterministic per-cell and simulation-level RNG wrappers.
//!
//! # Determinism strategy
//!
//! Each cell gets its own independent `SmallRng` for each timestep, seeded by:
//!
//!   seed = global_seed XOR (cell * MIXING_CONSTANT) XOR (timestep * STEP_CONSTANT)
//!
//! The mixing constants are large odd 64-bit values (the fractional part of
//! the golden ratio and an xxHash prime) that spread consecutive cell indices
//! and timesteps uniformly across the seed space.  This means:
//!
//! - Cells never share RNG state (no contention, no ordering dependency).
//! - A cell's draws do not depend on which worker processed it or on how the
//!   grid was partitioned — runs are reproducible for a fixed seed.
//! - All RNG calls are local to the owning thread; no synchronisation needed.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::{CellId, Timestep};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Second mixing constant so cell and timestep contributions never cancel.
const STEP_CONSTANT: u64 = 0xc2b2_ae3d_27d4_eb4f;

// ── CellRng ───────────────────────────────────────────────────────────────────

/// Per-cell deterministic RNG, fresh each timestep.
///
/// Construct one at the top of each cell's processing pass.  The type is
/// `!Sync` to prevent accidental sharing across threads — each worker builds
/// its own instance for each cell it owns.
pub struct CellRng(SmallRng);

impl CellRng {
    /// Seed deterministically from the run's global seed, a cell, and the
    /// current timestep.
    pub fn new(global_seed: u64, cell: CellId, timestep: Timestep) -> Self {
        let seed = global_seed
            ^ (cell.0 as u64).wrapping_mul(MIXING_CONSTANT)
            ^ timestep.0.wrapping_mul(STEP_CONSTANT);
        CellRng(SmallRng::seed_from_u64(seed))
    }

    /// Expose the inner `SmallRng` for use with `rand` distribution types
    /// (`rng.inner().sample(...)`, `rng.inner().gen_range(...)`, etc.)
    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    /// Sample a uniformly distributed value of any `Standard`-distributed type.
    #[inline]
    pub fn random<T>(&mut self) -> T
    where
        rand::distributions::Standard: rand::distributions::Distribution<T>,
    {
        self.0.r#gen()
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }

    /// Shuffle a mutable slice in-place (Fisher-Yates).
    #[inline]
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.0);
    }

    /// Choose a random element from a non-empty slice.
    /// Returns `None` if the slice is empty.
    #[inline]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose(&mut self.0)
    }
}

// ── SimRng ────────────────────────────────────────────────────────────────────

/// Simulation-level RNG for global operations (seeding, exogenous events).
///
/// Used only in single-threaded or explicitly synchronised contexts.  If you
/// need parallel randomness, give each worker its own `CellRng` instead.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Derive a child `SimRng` with a different seed offset — useful for
    /// seeding auxiliary streams deterministically from the root seed.
    pub fn child(&mut self, offset: u64) -> SimRng {
        let child_seed: u64 = self.0.r#gen::<u64>() ^ offset.wrapping_mul(MIXING_CONSTANT);
        SimRng(SmallRng::seed_from_u64(child_seed))
    }

    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    #[inline]
    pub fn random<T>(&mut self) -> T
    where
        rand::distributions::Standard: rand::distributions::Distribution<T>,
    {
        self.0.r#gen()
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }
}
