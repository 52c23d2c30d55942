//! `eco-core` — foundational types for the `rust_ecodyn` ecosystem simulation.
//!
//! This crate is a dependency of every other `eco-*` crate.  It intentionally
//! has no `eco-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module        | Contents                                                |
//! |---------------|---------------------------------------------------------|
//! | [`ids`]       | `CohortId`, `CellId`, `FunctionalGroupId`, `CohortIdSource` |
//! | [`time`]      | `Timestep`, `ModelClock`, `ModelConfig`                 |
//! | [`rng`]       | `CellRng` (per-cell), `SimRng` (global)                 |
//! | [`direction`] | Eight-way compass `Direction` enum                      |
//! | [`realm`]     | `Realm` cell classification and `RealmFilter`           |
//! | [`cancel`]    | `CancelToken` cooperative cancellation flag             |
//! | [`error`]     | `EcoError`, `EcoResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |
//!           | Required by the checkpoint payload in `eco-sim`.           |

pub mod cancel;
pub mod direction;
pub mod error;
pub mod ids;
pub mod realm;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use cancel::CancelToken;
pub use direction::Direction;
pub use error::{EcoError, EcoResult};
pub use ids::{CellId, CohortId, CohortIdSource, FunctionalGroupId};
pub use realm::{Realm, RealmFilter};
pub use rng::{CellRng, SimRng};
pub use time::{ModelClock, ModelConfig, Timestep};
