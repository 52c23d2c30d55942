//! Strongly typed, zero-cost identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.  The inner integer is `pub` to allow
//! direct indexing into per-group `Vec`s via `id.0 as usize`, but callers
//! should prefer the `.index()` helpers for clarity.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID" — equivalent to the type's `MAX`.
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Lineage identifier of a cohort.  Allocated once at cohort creation and
    /// carried in lineage sets forever after, so the space is 64-bit.
    pub struct CohortId(u64);
}

typed_id! {
    /// Row-major index of a grid cell.  Max ~4.3 billion cells.
    pub struct CellId(u32);
}

typed_id! {
    /// Index of a functional group in the group catalogue.
    /// Using `u16` keeps per-group list headers compact (max 65,535 groups).
    pub struct FunctionalGroupId(u16);
}

// ── CohortIdSource ────────────────────────────────────────────────────────────

/// Shared allocator for the next-cohort-identifier counter.
///
/// All workers allocate from the same atomic with `fetch_add`, so IDs are
/// unique across the whole run no matter how cells are partitioned between
/// threads.  Nothing is ever written back from per-worker copies — there is
/// no reconciliation step to get wrong.
#[derive(Debug)]
pub struct CohortIdSource(AtomicU64);

impl CohortIdSource {
    /// Start allocating at `next` (0 for a fresh run, or the value restored
    /// from a checkpoint).
    pub fn new(next: u64) -> Self {
        CohortIdSource(AtomicU64::new(next))
    }

    /// Allocate the next ID.
    #[inline]
    pub fn next(&self) -> CohortId {
        CohortId(self.0.fetch_add(1, Ordering::Relaxed))
    }

    /// The ID the next call to [`next`][Self::next] would return.
    ///
    /// Only meaningful when no worker is concurrently allocating — i.e. at
    /// checkpoint capture, which happens between parallel phases.
    #[inline]
    pub fn peek(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}
