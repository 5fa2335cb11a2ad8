//! Error types for the vegapnl library.
//!
//! All fallible operations return `Result<T, VegaPnlError>` rather than
//! panicking. Structural input-integrity problems (a missing bracketing
//! scenario, misaligned surface axes) are always surfaced to the caller —
//! a numeric fallback would silently mislead a risk consumer. An empty grid
//! is *not* an error: evaluation on a grid with no rows yields a zero-valued
//! result so one missing data point cannot abort a scenario sweep.

use thiserror::Error;

use crate::types::SpotShift;

/// Convenience type alias for results in this crate.
pub type Result<T> = std::result::Result<T, VegaPnlError>;

/// Errors that can occur during scenario interpolation and P&L evaluation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum VegaPnlError {
    /// A scenario surface required for bracketing the target spot move is
    /// absent from the scenario set. Never approximated from farther
    /// surfaces.
    #[error("missing scenario surface at spot shift {shift}")]
    MissingScenario {
        /// The calibration shift whose surface was required.
        shift: SpotShift,
    },

    /// Two surfaces that must be combined element-wise have differing expiry
    /// or moneyness axes.
    #[error("surface shape mismatch: {message}")]
    ShapeMismatch { message: String },

    /// A model mode was supplied to an operation that does not support it
    /// (e.g. the scenario matrix, which only varies manual-mode parameters).
    #[error("invalid mode for {operation}: {message}")]
    InvalidMode {
        /// Operation that rejected the mode.
        operation: &'static str,
        message: String,
    },

    /// Input data is invalid (non-rectangular matrix, non-finite parameter,
    /// non-positive step size).
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
}
