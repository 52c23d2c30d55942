//! `eco-ecology` — the seams between the simulation core and its external
//! collaborators.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`model`]    | `EcologyModel` trait + `ActorRef`                          |
//! | [`dispersal`]| `DispersalRule` trait + `DispersalDecision`                |
//! | [`scenario`] | `ScenarioModel` trait, `ScenarioParameters`, `ScenarioKind`|
//! | [`trackers`] | `ProcessTracker` family + `TrackerSet` fan-out             |
//! | [`noop`]     | No-op collaborators for tests and passive runs             |
//! | [`error`]    | `EcologyError`, `EcologyResult<T>`                         |
//!
//! # Design notes
//!
//! The biology itself — growth, metabolism, predation, reproduction, impact
//! formulas, dispersal eligibility — lives behind these traits and is out of
//! scope for this workspace.  The engines in `eco-cell`, `eco-dispersal`, and
//! `eco-sim` call the traits and enforce the contracts: collaborators are
//! trusted (no retry on biological failure), but a contract violation such as
//! negative mass fails the timestep.
//!
//! All traits take `&self` and must be `Send + Sync` so the scheduler can call
//! them from its worker pool; per-cell mutable state must live in the cell,
//! not the collaborator.

pub mod dispersal;
pub mod error;
pub mod model;
pub mod noop;
pub mod scenario;
pub mod trackers;


pub use dispersal::{DispersalDecision, DispersalRule};
pub use error::{EcologyError, EcologyResult};
pub use model::{ActorRef, EcologyModel};
pub use noop::{NoopEcology, NoopScenario, SedentaryRule};
pub use scenario::{ScenarioItem, ScenarioKind, ScenarioModel, ScenarioParameters};
pub use trackers::{
    CrossCellProcessTracker, DispersalSummary, GlobalProcessTracker, ProcessTracker, TrackerSet,
};
