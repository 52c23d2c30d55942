//! Simulation time model.
//!
//! # Design
//!
//! Time is represented as a monotonically increasing `Timestep` counter.  The
//! mapping to calendar time is held in `ModelClock`:
//!
//!   year = timesteps_complete / timesteps_per_year
//!
//! Using an integer timestep as the canonical time unit means all schedule
//! arithmetic is exact (no floating-point drift) and comparisons are O(1).
//!
//! The default resolution is 12 timesteps per year (monthly).  Applications
//! that need finer resolution set `timesteps_per_year` to a larger value; the
//! rest of the framework is agnostic.

use std::fmt;

// ── Timestep ──────────────────────────────────────────────────────────────────

/// An absolute simulation timestep counter.
///
/// Stored as `u64` to avoid overflow.  The `UNSET` sentinel doubles as the
/// "not yet happened" marker for per-cohort event times such as maturity.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timestep(pub u64);

impl Timestep {
    pub const ZERO: Timestep = Timestep(0);

    /// Sentinel for an event that has not happened yet (e.g. maturity).
    pub const UNSET: Timestep = Timestep(u64::MAX);

    /// `true` unless this is the `UNSET` sentinel.
    #[inline]
    pub fn is_set(self) -> bool {
        self != Timestep::UNSET
    }

    /// Return the timestep `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Timestep {
        Timestep(self.0 + n)
    }

    /// Timesteps elapsed from `earlier` to `self`.
    ///
    /// # Panics
    /// Panics in debug mode if `earlier > self`.
    #[inline]
    pub fn since(self, earlier: Timestep) -> u64 {
        self.0 - earlier.0
    }
}

impl std::ops::Add<u64> for Timestep {
    type Output = Timestep;
    #[inline]
    fn add(self, rhs: u64) -> Timestep {
        Timestep(self.0 + rhs)
    }
}

impl std::ops::Sub for Timestep {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Timestep) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Timestep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── ModelClock ────────────────────────────────────────────────────────────────

/// Tracks the current timestep and maps it onto model years.
///
/// `ModelClock` is cheap to copy and intentionally holds no heap data.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModelClock {
    /// How many timesteps one model year comprises.  Default: 12 (monthly).
    pub timesteps_per_year: u64,
    /// The current timestep — advanced by `ModelClock::advance()` each iteration.
    pub current: Timestep,
}

impl ModelClock {
    /// Create a clock starting at timestep 0 with the given resolution.
    pub fn new(timesteps_per_year: u64) -> Self {
        Self {
            timesteps_per_year,
            current: Timestep::ZERO,
        }
    }

    /// Advance the clock by one timestep.
    #[inline]
    pub fn advance(&mut self) {
        self.current = Timestep(self.current.0 + 1);
    }

    /// Completed whole model years.
    #[inline]
    pub fn years_complete(&self) -> u64 {
        self.current.0 / self.timesteps_per_year
    }

    /// `true` when the *previous* timestep closed out a model year — i.e. the
    /// clock sits exactly on a year boundary and at least one year has run.
    #[inline]
    pub fn at_year_boundary(&self) -> bool {
        self.current.0 > 0 && self.current.0.is_multiple_of(self.timesteps_per_year)
    }

    /// Mean number of days one timestep represents.
    #[inline]
    pub fn days_per_timestep(&self) -> f64 {
        365.25 / self.timesteps_per_year as f64
    }
}

impl fmt::Display for ModelClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (year {} step {})",
            self.current,
            self.years_complete(),
            self.current.0 % self.timesteps_per_year
        )
    }
}

// ── ModelConfig ───────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
///
/// Typically loaded from a TOML/JSON file by the application crate and passed
/// to the simulation builder.  Initialization-file parsing itself is out of
/// scope for this workspace.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModelConfig {
    /// Total timesteps to simulate.  For 100 years at monthly resolution:
    /// 100 * 12 = 1200.
    pub total_timesteps: u64,

    /// Timesteps per model year.  Default: 12.
    pub timesteps_per_year: u64,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Worker thread count passed to Rayon.  `None` uses all logical cores.
    pub num_threads: Option<usize>,

    /// Abundance at or below which a cohort is removed by the extinction
    /// sweep.
    pub extinction_threshold: f64,

    /// Per-cell cohort budget enforced by the compactor after each ecology
    /// pass.
    pub max_cohorts_per_cell: usize,

    /// Relative-difference tolerance on juvenile, adult, and current body
    /// mass below which two cohorts are merge candidates.
    pub merge_tolerance: f64,

    /// When `false`, within-cell action order is a permutation seeded from
    /// the timestep alone, and two runs from the same state are
    /// byte-identical.
    pub randomise_ordering: bool,

    /// Which realms to process: `"all"`, `"terrestrial"`, or `"marine"`.
    /// Anything else is rejected before the first timestep runs.
    pub realm_filter: String,

    /// Timesteps of spin-up before scenario impacts apply.
    pub burnin_steps: u64,

    /// Timesteps over which scenario impacts ramp to full magnitude.
    pub impact_steps: u64,
}

impl ModelConfig {
    /// The timestep at which the simulation ends (exclusive upper bound).
    #[inline]
    pub fn end_timestep(&self) -> Timestep {
        Timestep(self.total_timesteps)
    }

    /// Construct a `ModelClock` pre-configured for this run.
    pub fn make_clock(&self) -> ModelClock {
        ModelClock::new(self.timesteps_per_year)
    }
}
