//! # vegapnl
//!
//! Vega P&L projection engine for options portfolios.
//!
//! Given seven vega surfaces captured at fixed spot-shift scenarios
//! (−7.5% … +7.5%), the crate interpolates a surface for any continuous
//! spot move, projects an implied-vol change at each node under a
//! selectable parametric model, and combines the two into P&L aggregated by
//! moneyness, expiry, tenor bucket, and in total — plus full scenario
//! curves and 2-D (spot × vol-change) sensitivity matrices.
//!
//! ## Architecture
//!
//! - **`surface`** — vega surface data model and validation
//! - **`scenario`** — scenario set keyed by spot shift; surface interpolation
//! - **`model`** — implied-vol change models (beta, manual)
//! - **`engine`** — per-node P&L, aggregation views, scenario sweeps
//! - **`greeks`** — vanna/volga grid estimation from the scenario set
//! - **`conventions`** — day counts, reference date, tenor buckets
//!
//! ## Design
//!
//! - **Pure and stateless.** Every operation is a deterministic function of
//!   its explicit inputs. The only configuration is the reference date,
//!   held by [`PnlEngine`] — never read from the wall clock.
//! - **No panics.** Every fallible operation returns [`Result`]. Structural
//!   input problems (missing bracketing scenario, misaligned axes) are
//!   surfaced as errors; an empty grid recovers to a zero-valued result.
//! - **No extrapolation.** Spot moves beyond ±7.5% clamp to the boundary
//!   surface unchanged rather than projecting vega outside the calibrated
//!   envelope.
//! - **Closed model set.** [`VolModel`] is a sum type matched exhaustively
//!   at every Δσ call site, so adding a model is a compile-time-checked
//!   change.
//! - **Data-parallel sweeps.** Scenario curve and matrix points are
//!   independent and evaluated as a rayon parallel map, collected in index
//!   order.
//! - **Serializable.** All value types implement Serde with re-validation
//!   on deserialization where invariants exist (surface rectangularity,
//!   finite model parameters).

pub mod conventions;
pub mod engine;
pub mod error;
pub mod greeks;
pub mod model;
pub mod scenario;
pub mod surface;
pub mod types;
mod validate;

#[doc(inline)]
pub use engine::{
    CurvePoint, MatrixRow, PnlEngine, PnlResult, ScenarioCurve, ScenarioMatrix,
    DEFAULT_CURVE_STEP, DEFAULT_VOL_CHANGES,
};
#[doc(inline)]
pub use error::{Result, VegaPnlError};
#[doc(inline)]
pub use model::{BetaParams, ManualParams, VolModel};
#[doc(inline)]
pub use scenario::ScenarioSet;
#[doc(inline)]
pub use surface::{InterpolatedVegaGrid, VegaRow, VegaSurface};
#[doc(inline)]
pub use types::{SpotShift, TenorBucket, VolChange};
