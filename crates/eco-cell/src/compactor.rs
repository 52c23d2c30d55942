//! Cohort compaction — bounding per-cell cohort counts by merging.
//!
//! Analogous to cache eviction, except nothing is discarded: two similar
//! cohorts are combined into one, conserving mass, abundance, and lineage.
//! This bounds per-cell cost no matter how fast the biology creates cohorts.
//!
//! # Determinism
//!
//! Candidate pairs are scanned in fixed `(group, i, j)` order and the best
//! pair wins only on strictly smaller distance, so ties resolve to the
//! earliest pair.  The donor is the smaller-abundance cohort (ties go to the
//! higher index).  For a fixed input the merge sequence is fully determined.

use eco_core::Timestep;
use eco_grid::Cohort;

use crate::{CellResult, EngineError};

// ── MergeTolerance ────────────────────────────────────────────────────────────

/// Per-axis relative-difference bounds for merge candidacy.
///
/// Two cohorts are candidates only when the relative difference of their
/// juvenile, adult, *and* current body masses are each within the bound.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MergeTolerance {
    pub juvenile: f64,
    pub adult:    f64,
    pub body:     f64,
}

impl MergeTolerance {
    /// The same bound on all three axes.
    pub fn uniform(tolerance: f64) -> Self {
        Self {
            juvenile: tolerance,
            adult:    tolerance,
            body:     tolerance,
        }
    }
}

/// Relative difference `|a − b| / max(|a|, |b|)`; zero when both are zero.
#[inline]
fn relative_difference(a: f64, b: f64) -> f64 {
    if a == b {
        return 0.0;
    }
    (a - b).abs() / a.abs().max(b.abs())
}

/// `true` when `a` and `b` are merge candidates under `tol`.
pub fn within_tolerance(a: &Cohort, b: &Cohort, tol: &MergeTolerance) -> bool {
    relative_difference(a.juvenile_mass, b.juvenile_mass) <= tol.juvenile
        && relative_difference(a.adult_mass, b.adult_mass) <= tol.adult
        && relative_difference(a.body_mass, b.body_mass) <= tol.body
}

/// Similarity metric: sum of squared relative differences over the three
/// mass axes.  Smaller is more similar.
pub fn merge_distance(a: &Cohort, b: &Cohort) -> f64 {
    relative_difference(a.juvenile_mass, b.juvenile_mass).powi(2)
        + relative_difference(a.adult_mass, b.adult_mass).powi(2)
        + relative_difference(a.body_mass, b.body_mass).powi(2)
}

// ── Merging ───────────────────────────────────────────────────────────────────

/// Combine `donor` into `recipient`.
///
/// Masses become abundance-weighted averages, abundance is summed, lineage
/// sets union, the merged flag is set, and the maximum body mass is the
/// larger of the two.  Total biomass is conserved exactly:
/// `(Σ wᵢ·massᵢ) · Σ abundanceᵢ = Σ massᵢ·abundanceᵢ` for the abundance
/// weights `wᵢ`.
pub fn merge_into(recipient: &mut Cohort, donor: Cohort) {
    let total = recipient.abundance + donor.abundance;
    let (wr, wd) = if total > 0.0 {
        (recipient.abundance / total, donor.abundance / total)
    } else {
        (0.5, 0.5)
    };

    recipient.juvenile_mass = wr * recipient.juvenile_mass + wd * donor.juvenile_mass;
    recipient.adult_mass = wr * recipient.adult_mass + wd * donor.adult_mass;
    recipient.body_mass = wr * recipient.body_mass + wd * donor.body_mass;
    recipient.reproductive_mass = wr * recipient.reproductive_mass + wd * donor.reproductive_mass;
    recipient.proportion_time_active =
        wr * recipient.proportion_time_active + wd * donor.proportion_time_active;
    recipient.trophic_index = wr * recipient.trophic_index + wd * donor.trophic_index;
    recipient.log_optimal_prey_size_ratio =
        wr * recipient.log_optimal_prey_size_ratio + wd * donor.log_optimal_prey_size_ratio;

    recipient.max_body_mass = recipient.max_body_mass.max(donor.max_body_mass);
    recipient.birth_timestep = recipient.birth_timestep.min(donor.birth_timestep);
    recipient.maturity_timestep = match (
        recipient.maturity_timestep.is_set(),
        donor.maturity_timestep.is_set(),
    ) {
        (true, true)   => recipient.maturity_timestep.min(donor.maturity_timestep),
        (true, false)  => recipient.maturity_timestep,
        (false, true)  => donor.maturity_timestep,
        (false, false) => Timestep::UNSET,
    };

    recipient.abundance = total;
    recipient.lineage.extend(donor.lineage);
    recipient.merged = true;
}

// ── Compaction ────────────────────────────────────────────────────────────────

/// Merge same-group cohort pairs until the total count is at most `target`.
///
/// Mutates `cohorts` in place and returns the number of merges performed.
/// Fails with [`EngineError::CompactionStalled`] if the budget cannot be met
/// because no remaining pair is within tolerance — an over-budget cell after
/// compaction is an invariant violation, never silently tolerated.
pub fn compact_cohorts(
    cohorts: &mut [Vec<Cohort>],
    target:  usize,
    tol:     &MergeTolerance,
) -> CellResult<u64> {
    let mut count: usize = cohorts.iter().map(Vec::len).sum();
    let mut merges = 0u64;

    while count > target {
        // Globally closest candidate pair, scanning in fixed order.
        let mut best: Option<(f64, usize, usize, usize)> = None;
        for (g, list) in cohorts.iter().enumerate() {
            for i in 0..list.len() {
                for j in (i + 1)..list.len() {
                    if !within_tolerance(&list[i], &list[j], tol) {
                        continue;
                    }
                    let d = merge_distance(&list[i], &list[j]);
                    if best.is_none_or(|(bd, _, _, _)| d < bd) {
                        best = Some((d, g, i, j));
                    }
                }
            }
        }

        let Some((_, g, i, j)) = best else {
            return Err(EngineError::CompactionStalled {
                remaining: count,
                target,
            });
        };

        let list = &mut cohorts[g];
        // Donor is the smaller-abundance cohort; ties go to the higher index.
        let (recipient, donor_idx) = if list[i].abundance >= list[j].abundance {
            (i, j)
        } else {
            (j, i)
        };
        let donor = list.remove(donor_idx);
        // Removing below `recipient` shifts it down by one.
        let recipient = if donor_idx < recipient { recipient - 1 } else { recipient };
        merge_into(&mut list[recipient], donor);

        count -= 1;
        merges += 1;
    }

    Ok(merges)
}
