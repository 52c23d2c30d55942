//! Stocks — non-agent biomass pools.

/// A primary-producer biomass pool (e.g. a plant functional group).
///
/// Stocks are mutated by growth and grazing through the ecology collaborator
/// but are never merged and never made extinct by the core engines.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stock {
    /// Reference individual body mass (g).
    pub individual_mass: f64,

    /// Total biomass in the pool (g).
    pub total_biomass: f64,
}

impl Stock {
    #[inline]
    pub fn new(individual_mass: f64, total_biomass: f64) -> Self {
        Self {
            individual_mass,
            total_biomass,
        }
    }
}
