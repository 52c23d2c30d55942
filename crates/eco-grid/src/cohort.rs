//! Cohorts — groups of identical individuals sharing lineage and a mass
//! trajectory.
//!
//! # Lineage
//!
//! Every cohort carries a non-empty ordered set of lineage identifiers.  A
//! freshly created cohort's set holds exactly its own ID; a merged cohort's
//! set is the union of its donors' sets.  Lineage is an owned set of opaque
//! IDs — never a reference to another cohort record — so merged cohorts can
//! outlive their donors without aliasing.

use std::collections::BTreeSet;

use eco_core::{CohortId, FunctionalGroupId, Timestep};

use crate::{GridError, GridResult};

/// A group of `abundance` identical individuals.
///
/// Abundance is real-valued: continuous mortality removes fractional
/// individuals each timestep.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cohort {
    /// Timestep the cohort was created at.
    pub birth_timestep: Timestep,

    /// Timestep the cohort reached maturity, or `Timestep::UNSET` if it has
    /// not yet matured.
    pub maturity_timestep: Timestep,

    /// Ordered lineage identifiers.  Non-empty; more than one element iff
    /// this cohort was produced by a merge.
    pub lineage: BTreeSet<CohortId>,

    /// Reference individual body mass at independence (g).
    pub juvenile_mass: f64,

    /// Reference individual body mass at maturity (g).
    pub adult_mass: f64,

    /// Current individual body mass (g).
    pub body_mass: f64,

    /// Individual mass accumulated toward reproduction (g).
    pub reproductive_mass: f64,

    /// Maximum individual body mass ever achieved (g).
    pub max_body_mass: f64,

    /// Number of individuals.  Fractional; never negative.
    pub abundance: f64,

    /// `true` iff this cohort is the product of at least one merge.
    pub merged: bool,

    /// Proportion of each timestep the individuals are active.
    pub proportion_time_active: f64,

    /// Mean trophic level of the cohort's diet.
    pub trophic_index: f64,

    /// Log of the optimal prey-to-predator body-size ratio.
    pub log_optimal_prey_size_ratio: f64,
}

impl Cohort {
    /// Construct a founding cohort (seeding or reproduction) whose lineage
    /// set holds exactly its own ID.
    pub fn founder(id: CohortId, birth: Timestep, spec: &CohortSpec) -> Self {
        Cohort {
            birth_timestep:             birth,
            maturity_timestep:          Timestep::UNSET,
            lineage:                    BTreeSet::from([id]),
            juvenile_mass:              spec.juvenile_mass,
            adult_mass:                 spec.adult_mass,
            body_mass:                  spec.body_mass,
            reproductive_mass:          0.0,
            max_body_mass:              spec.body_mass,
            abundance:                  spec.abundance,
            merged:                     false,
            proportion_time_active:     spec.proportion_time_active,
            trophic_index:              spec.trophic_index,
            log_optimal_prey_size_ratio: spec.log_optimal_prey_size_ratio,
        }
    }

    /// Total biomass held by the cohort: (body + reproductive potential)
    /// per individual, times abundance.
    #[inline]
    pub fn total_biomass(&self) -> f64 {
        (self.body_mass + self.reproductive_mass) * self.abundance
    }

    /// `true` once the maturity timestep has been recorded.
    #[inline]
    pub fn is_mature(&self) -> bool {
        self.maturity_timestep.is_set()
    }

    /// Check the cohort invariants: non-negative masses and abundance,
    /// non-empty lineage set.
    pub fn validate(&self) -> GridResult<()> {
        for (what, value) in [
            ("juvenile mass", self.juvenile_mass),
            ("adult mass", self.adult_mass),
            ("body mass", self.body_mass),
            ("reproductive mass", self.reproductive_mass),
        ] {
            if value < 0.0 || value.is_nan() {
                return Err(GridError::NegativeMass { what, value });
            }
        }
        if self.abundance < 0.0 || self.abundance.is_nan() {
            return Err(GridError::NegativeAbundance(self.abundance));
        }
        if self.lineage.is_empty() {
            return Err(GridError::EmptyLineage);
        }
        Ok(())
    }
}

// ── CohortSpec ────────────────────────────────────────────────────────────────

/// Blueprint for a cohort that does not exist yet.
///
/// Produced by the ecology collaborator for offspring and by seeding code for
/// founders.  The engine allocates the ID and birth timestep when it turns a
/// spec into a [`Cohort`] — collaborators never mint identifiers themselves.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CohortSpec {
    /// Functional group the new cohort belongs to.
    pub group: FunctionalGroupId,
    pub juvenile_mass: f64,
    pub adult_mass: f64,
    pub body_mass: f64,
    pub abundance: f64,
    pub proportion_time_active: f64,
    pub trophic_index: f64,
    pub log_optimal_prey_size_ratio: f64,
}

impl CohortSpec {
    /// Check that the spec's masses and abundance are non-negative.
    pub fn validate(&self) -> GridResult<()> {
        for (what, value) in [
            ("juvenile mass", self.juvenile_mass),
            ("adult mass", self.adult_mass),
            ("body mass", self.body_mass),
        ] {
            if value < 0.0 || value.is_nan() {
                return Err(GridError::NegativeMass { what, value });
            }
        }
        if self.abundance < 0.0 || self.abundance.is_nan() {
            return Err(GridError::NegativeAbundance(self.abundance));
        }
        Ok(())
    }
}
