//! Realm classification of grid cells and the run-level realm filter.

use crate::{EcoError, EcoResult};

/// The biogeographic realm a cell belongs to, decoded from the cell's realm
/// environment layer (1.0 = terrestrial, 2.0 = marine).
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Realm {
    Terrestrial,
    Marine,
}

impl Realm {
    /// Decode a realm layer value.  Returns `None` for anything other than
    /// the two recognized codes; callers decide whether that is fatal.
    pub fn from_layer_value(value: f64) -> Option<Realm> {
        if value == 1.0 {
            Some(Realm::Terrestrial)
        } else if value == 2.0 {
            Some(Realm::Marine)
        } else {
            None
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Realm::Terrestrial => "terrestrial",
            Realm::Marine      => "marine",
        }
    }
}

impl std::fmt::Display for Realm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── RealmFilter ───────────────────────────────────────────────────────────────

/// Restricts which cells a timestep visits, without changing aggregation.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RealmFilter {
    /// Process every cell.
    #[default]
    All,
    /// Process terrestrial cells only.
    TerrestrialOnly,
    /// Process marine cells only.
    MarineOnly,
}

impl RealmFilter {
    /// Parse a configuration string.
    ///
    /// An unrecognized value is a fatal configuration error and must be
    /// surfaced before any timestep runs.
    pub fn parse(s: &str) -> EcoResult<RealmFilter> {
        match s.to_ascii_lowercase().as_str() {
            "all" | ""            => Ok(RealmFilter::All),
            "terrestrial" | "land" => Ok(RealmFilter::TerrestrialOnly),
            "marine" | "ocean"    => Ok(RealmFilter::MarineOnly),
            _ => Err(EcoError::UnknownRealmFilter(s.to_string())),
        }
    }

    /// `true` if a cell in `realm` should be processed under this filter.
    #[inline]
    pub fn matches(self, realm: Realm) -> bool {
        match self {
            RealmFilter::All             => true,
            RealmFilter::TerrestrialOnly => realm == Realm::Terrestrial,
            RealmFilter::MarineOnly      => realm == Realm::Marine,
        }
    }
}
