//! Scenario perturbations and the `ScenarioModel` trait.

use eco_core::Timestep;
use eco_grid::Cell;

/// The kind of perturbation a scenario item applies.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScenarioKind {
    /// No perturbation — the item is inert.
    #[default]
    None,
    /// Uniform or ramped temperature change.
    Temperature,
    /// Removal of animal biomass by harvesting.
    Harvesting,
    /// Extraction of primary production.
    ProductionExtraction,
}

/// One perturbation: a kind plus its magnitude parameters.
///
/// The meaning of `magnitude` and `rate` is defined by the scenario
/// collaborator (e.g. degrees of warming and degrees per timestep for a
/// temperature item).  The core passes them through untouched.
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScenarioItem {
    pub kind:      ScenarioKind,
    pub magnitude: f64,
    pub rate:      f64,
}

/// The full per-run perturbation set.  Read-only input to the scenario
/// collaborator; the core never interprets the numbers.
#[derive(Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScenarioParameters {
    pub items: Vec<ScenarioItem>,
}

impl ScenarioParameters {
    /// A scenario set with no perturbations.
    pub fn none() -> Self {
        Self::default()
    }

    /// `true` when no item would change anything.
    pub fn is_empty(&self) -> bool {
        self.items.iter().all(|i| i.kind == ScenarioKind::None)
    }
}

// ── ScenarioModel ─────────────────────────────────────────────────────────────

/// Pluggable scenario-impact application.
///
/// Invoked once per cell per timestep, before any ecology runs in that cell.
/// `burnin_steps` and `impact_steps` come from the run configuration;
/// `affected` reflects the cell's scenario mask.  The formulas live entirely
/// in the implementation.
pub trait ScenarioModel: Send + Sync {
    /// Apply temperature perturbations to the cell's environment layers.
    fn apply_temperature_scenario(
        &self,
        cell:         &mut Cell,
        scenario:     &ScenarioParameters,
        timestep:     Timestep,
        burnin_steps: u64,
        impact_steps: u64,
        affected:     bool,
    );

    /// Apply harvesting to the cell's cohorts.
    fn apply_harvesting(
        &self,
        cell:         &mut Cell,
        scenario:     &ScenarioParameters,
        timestep:     Timestep,
        burnin_steps: u64,
        impact_steps: u64,
        affected:     bool,
    );
}
