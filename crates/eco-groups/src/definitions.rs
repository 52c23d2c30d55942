//! Catalogue representation and builder.
//!
//! # Data layout
//!
//! Group membership sets are stored in a single map keyed by interned
//! `(trait, value)` ID pairs:
//!
//! ```text
//! membership[(trait_id, value_id)] = sorted Vec<FunctionalGroupId>
//! ```
//!
//! Per-group properties are stored as one small map per group keyed by the
//! interned property ID.  Both structures are frozen at `build()`; nothing in
//! the catalogue is mutated during a run.
//!
//! All trait/value/property strings are matched case-insensitively (ASCII
//! lowercase at intern time) so catalogue files and query sites don't have to
//! agree on capitalisation.

use rustc_hash::FxHashMap;

use eco_core::FunctionalGroupId;

use crate::{GroupsError, GroupsResult};

// ── FunctionalGroupDefinitions ────────────────────────────────────────────────

/// Immutable functional-group catalogue.
///
/// Do not construct directly; use [`FunctionalGroupDefinitionsBuilder`].
pub struct FunctionalGroupDefinitions {
    /// Display name of each group, indexed by `FunctionalGroupId`.
    names: Vec<String>,

    /// Interned trait names → dense trait ID.
    trait_ids: FxHashMap<String, u16>,

    /// Interned trait values → dense value ID.
    value_ids: FxHashMap<String, u16>,

    /// Interned property names → dense property ID.
    property_ids: FxHashMap<String, u16>,

    /// `(trait, value)` → sorted member group indices.
    membership: FxHashMap<(u16, u16), Vec<FunctionalGroupId>>,

    /// Per-group property values keyed by property ID.
    properties: Vec<FxHashMap<u16, f64>>,
}

impl FunctionalGroupDefinitions {
    /// Number of functional groups in the catalogue.
    pub fn group_count(&self) -> usize {
        self.names.len()
    }

    /// Display name of `group`.
    pub fn name(&self, group: FunctionalGroupId) -> GroupsResult<&str> {
        self.names
            .get(group.index())
            .map(String::as_str)
            .ok_or(GroupsError::GroupOutOfRange(group))
    }

    /// Iterator over all group IDs in index order.
    pub fn group_ids(&self) -> impl Iterator<Item = FunctionalGroupId> + '_ {
        (0..self.names.len() as u16).map(FunctionalGroupId)
    }

    /// All groups whose trait `name` has value `value`, pre-sorted by index.
    ///
    /// A miss is an error: per the error-handling design, trait lookups are
    /// fatal unless the call site explicitly tolerates absence (use
    /// [`groups_with_or_empty`][Self::groups_with_or_empty] there).
    pub fn groups_with(&self, name: &str, value: &str) -> GroupsResult<&[FunctionalGroupId]> {
        let trait_id = *self
            .trait_ids
            .get(&name.to_ascii_lowercase())
            .ok_or_else(|| GroupsError::TraitNotFound(name.to_string()))?;
        let value_id = *self
            .value_ids
            .get(&value.to_ascii_lowercase())
            .ok_or_else(|| GroupsError::TraitValueNotFound {
                name:  name.to_string(),
                value: value.to_string(),
            })?;
        self.membership
            .get(&(trait_id, value_id))
            .map(Vec::as_slice)
            .ok_or_else(|| GroupsError::TraitValueNotFound {
                name:  name.to_string(),
                value: value.to_string(),
            })
    }

    /// Tolerant variant of [`groups_with`][Self::groups_with]: an unknown
    /// trait or value yields an empty slice instead of an error.
    pub fn groups_with_or_empty(&self, name: &str, value: &str) -> &[FunctionalGroupId] {
        self.groups_with(name, value).unwrap_or(&[])
    }

    /// Numeric property `name` of `group`.
    pub fn property(&self, name: &str, group: FunctionalGroupId) -> GroupsResult<f64> {
        let prop_id = *self
            .property_ids
            .get(&name.to_ascii_lowercase())
            .ok_or_else(|| GroupsError::PropertyNotFound(name.to_string()))?;
        let per_group = self
            .properties
            .get(group.index())
            .ok_or(GroupsError::GroupOutOfRange(group))?;
        per_group
            .get(&prop_id)
            .copied()
            .ok_or_else(|| GroupsError::PropertyMissing {
                group,
                name: name.to_string(),
            })
    }

    /// Tolerant variant of [`property`][Self::property] returning `default`
    /// on any miss.  Use only where the design explicitly allows a sentinel.
    pub fn property_or(&self, name: &str, group: FunctionalGroupId, default: f64) -> f64 {
        self.property(name, group).unwrap_or(default)
    }
}

// ── FunctionalGroupDefinitionsBuilder ─────────────────────────────────────────

/// Accumulates group definitions, then freezes them into a
/// [`FunctionalGroupDefinitions`].
///
/// # Example
///
/// ```rust
/// use eco_groups::FunctionalGroupDefinitionsBuilder;
///
/// let mut b = FunctionalGroupDefinitionsBuilder::new();
/// let herbivores = b.add_group(
///     "ectothermic herbivores",
///     &[("nutrition source", "herbivory"), ("thermoregulation", "ectotherm")],
///     &[("proportion suitable time active", 0.5)],
/// );
/// let defs = b.build().unwrap();
/// assert_eq!(defs.groups_with("nutrition source", "herbivory").unwrap(), &[herbivores]);
/// ```
#[derive(Default)]
pub struct FunctionalGroupDefinitionsBuilder {
    groups: Vec<GroupSpec>,
}

struct GroupSpec {
    name:       String,
    traits:     Vec<(String, String)>,
    properties: Vec<(String, f64)>,
}

impl FunctionalGroupDefinitionsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a group with its trait values and numeric properties.
    /// Returns the ID the group will have in the built catalogue.
    pub fn add_group(
        &mut self,
        name:       &str,
        traits:     &[(&str, &str)],
        properties: &[(&str, f64)],
    ) -> FunctionalGroupId {
        let id = FunctionalGroupId(self.groups.len() as u16);
        self.groups.push(GroupSpec {
            name: name.to_string(),
            traits: traits
                .iter()
                .map(|(t, v)| (t.to_ascii_lowercase(), v.to_ascii_lowercase()))
                .collect(),
            properties: properties
                .iter()
                .map(|(p, x)| (p.to_ascii_lowercase(), *x))
                .collect(),
        });
        id
    }

    /// Intern all strings, precompute membership sets, and freeze.
    pub fn build(self) -> GroupsResult<FunctionalGroupDefinitions> {
        let mut names = Vec::with_capacity(self.groups.len());
        let mut trait_ids: FxHashMap<String, u16> = FxHashMap::default();
        let mut value_ids: FxHashMap<String, u16> = FxHashMap::default();
        let mut property_ids: FxHashMap<String, u16> = FxHashMap::default();
        let mut membership: FxHashMap<(u16, u16), Vec<FunctionalGroupId>> = FxHashMap::default();
        let mut properties = Vec::with_capacity(self.groups.len());

        for (index, spec) in self.groups.into_iter().enumerate() {
            let group = FunctionalGroupId(index as u16);

            if names.contains(&spec.name) {
                return Err(GroupsError::DuplicateGroupName(spec.name));
            }
            names.push(spec.name);

            for (trait_name, value) in spec.traits {
                let t = intern(&mut trait_ids, trait_name);
                let v = intern(&mut value_ids, value);
                membership.entry((t, v)).or_default().push(group);
            }

            let mut per_group = FxHashMap::default();
            for (prop_name, value) in spec.properties {
                let p = intern(&mut property_ids, prop_name);
                per_group.insert(p, value);
            }
            properties.push(per_group);
        }

        // Groups were visited in index order, so every membership Vec is
        // already sorted; dedup guards against a trait listed twice.
        for members in membership.values_mut() {
            members.dedup();
        }

        Ok(FunctionalGroupDefinitions {
            names,
            trait_ids,
            value_ids,
            property_ids,
            membership,
            properties,
        })
    }
}

/// Intern `key` into `table`, returning its dense ID.
fn intern(table: &mut FxHashMap<String, u16>, key: String) -> u16 {
    if let Some(&id) = table.get(&key) {
        return id;
    }
    let id = table.len() as u16;
    table.insert(key, id);
    id
}
