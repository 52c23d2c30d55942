//! Action-order permutation over a cell's cohorts.
//!
//! # Why a snapshot
//!
//! The order is built from per-group cohort counts taken *before* any actor
//! runs.  Each entry resolves to `(group, position)` against that snapshot,
//! so offspring appended mid-pass — which land at the end of their group's
//! list, beyond the snapshot counts — can never act this timestep and never
//! shift another actor's address.

use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

use eco_core::{CellRng, FunctionalGroupId, Timestep};
use eco_ecology::ActorRef;

/// Seed mixer for the timestep-derived permutation.
const ORDER_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// How the within-cell action order is drawn.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum OrderingPolicy {
    /// Uniform random permutation from the per-cell RNG.  Reproducible for a
    /// fixed global seed, but different seeds give different orders.
    Random,

    /// Permutation seeded from the timestep alone.  Bit-reproducible across
    /// runs and independent of the global seed — used when randomness is
    /// disabled.
    SeededByTimestep,
}

/// Build the permuted action order for one cell from its per-group cohort
/// count snapshot.
pub fn action_order(
    counts:   &[usize],
    policy:   OrderingPolicy,
    timestep: Timestep,
    rng:      &mut CellRng,
) -> Vec<ActorRef> {
    let mut order: Vec<ActorRef> = counts
        .iter()
        .enumerate()
        .flat_map(|(g, &n)| {
            (0..n).map(move |index| ActorRef {
                group: FunctionalGroupId(g as u16),
                index,
            })
        })
        .collect();

    match policy {
        OrderingPolicy::Random => rng.shuffle(&mut order),
        OrderingPolicy::SeededByTimestep => {
            let mut step_rng =
                SmallRng::seed_from_u64(timestep.0.wrapping_mul(ORDER_CONSTANT));
            order.shuffle(&mut step_rng);
        }
    }
    order
}
