//! Error types for eco-groups.

use eco_core::FunctionalGroupId;
use thiserror::Error;

/// Errors raised by catalogue construction and lookup.
#[derive(Debug, Error)]
pub enum GroupsError {
    #[error("unknown trait name {0:?}")]
    TraitNotFound(String),

    #[error("no group carries trait {name:?} = {value:?}")]
    TraitValueNotFound { name: String, value: String },

    #[error("unknown property {0:?}")]
    PropertyNotFound(String),

    #[error("group {group} does not define property {name:?}")]
    PropertyMissing {
        group: FunctionalGroupId,
        name:  String,
    },

    #[error("group {0} out of range")]
    GroupOutOfRange(FunctionalGroupId),

    #[error("duplicate group name {0:?}")]
    DuplicateGroupName(String),
}

/// Alias for `Result<T, GroupsError>`.
pub type GroupsResult<T> = Result<T, GroupsError>;
