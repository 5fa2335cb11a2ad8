//! Scenario set and the surface interpolator.
//!
//! The seven calibration shifts partition the spot-move axis into six
//! intervals. A query at an arbitrary spot move resolves to:
//!
//! - the stored surface verbatim, when the target lands on a calibration
//!   point (no interpolation error);
//! - a convex element-wise combination of the two bracketing surfaces for
//!   interior targets;
//! - the nearest boundary surface, clamped unchanged, beyond ±7.5% — no
//!   extrapolation, which would produce unbounded vega outside the
//!   calibrated envelope.
//!
//! Partial sets are allowed: a query only needs the two surfaces that
//! bracket it. A missing bracketing surface is [`MissingScenario`]
//! (never approximated from farther surfaces); bracketing surfaces with
//! differing axes are [`ShapeMismatch`] rather than a silently misaligned
//! blend.
//!
//! [`MissingScenario`]: crate::VegaPnlError::MissingScenario
//! [`ShapeMismatch`]: crate::VegaPnlError::ShapeMismatch

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{self, VegaPnlError};
use crate::surface::{InterpolatedVegaGrid, VegaRow, VegaSurface};
use crate::types::SpotShift;
use crate::validate::validate_finite;

/// Spot moves closer than this to a calibration point are treated as exact.
const EXACT_MATCH_EPS: f64 = 1e-10;

/// Moneyness axes may differ by at most this before being declared mismatched.
pub(crate) const MONEYNESS_AXIS_EPS: f64 = 1e-9;

/// Vega surfaces keyed by the seven fixed spot-shift scenarios.
///
/// May hold fewer than seven surfaces; queries fail with
/// [`VegaPnlError::MissingScenario`] only when a surface they actually need
/// is absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScenarioSet {
    surfaces: BTreeMap<SpotShift, VegaSurface>,
}

impl ScenarioSet {
    /// Empty scenario set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert (or replace) the surface for one calibration shift.
    pub fn insert(&mut self, shift: SpotShift, surface: VegaSurface) {
        self.surfaces.insert(shift, surface);
    }

    /// The stored surface for a shift, if present.
    pub fn get(&self, shift: SpotShift) -> Option<&VegaSurface> {
        self.surfaces.get(&shift)
    }

    /// Number of scenarios present.
    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    /// True when no scenario surface is present.
    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    /// True when all seven calibration shifts are present.
    pub fn is_complete(&self) -> bool {
        SpotShift::ALL.iter().all(|s| self.surfaces.contains_key(s))
    }

    /// Interpolate a vega grid at an arbitrary spot move.
    ///
    /// See the [module docs](self) for the resolution rules. The returned
    /// grid's axes are identical to the (aligned) input axes; interior
    /// values are convex combinations of the bracketing surfaces.
    ///
    /// # Errors
    /// - [`VegaPnlError::MissingScenario`] if a required surface is absent.
    /// - [`VegaPnlError::ShapeMismatch`] if the bracketing surfaces' axes
    ///   differ in length or values.
    /// - [`VegaPnlError::InvalidInput`] if `spot_move` is not finite.
    pub fn interpolate(&self, spot_move: f64) -> error::Result<InterpolatedVegaGrid> {
        validate_finite(spot_move, "spot_move")?;

        for shift in SpotShift::ALL {
            if (spot_move - shift.fraction()).abs() < EXACT_MATCH_EPS {
                return Ok(self.require(shift)?.to_grid());
            }
        }

        // Clamp beyond the calibrated envelope.
        if spot_move < SpotShift::Down75.fraction() {
            return Ok(self.require(SpotShift::Down75)?.to_grid());
        }
        if spot_move > SpotShift::Up75.fraction() {
            return Ok(self.require(SpotShift::Up75)?.to_grid());
        }

        let (lower, upper) = bracket(spot_move);
        let lo = self.require(lower)?;
        let hi = self.require(upper)?;
        check_alignment(lower, lo, upper, hi)?;

        let w = (spot_move - lower.fraction()) / (upper.fraction() - lower.fraction());
        let rows = lo
            .moneyness()
            .iter()
            .zip(lo.vega().iter().zip(hi.vega()))
            .map(|(&moneyness, (lo_row, hi_row))| VegaRow {
                moneyness,
                values: lo_row
                    .iter()
                    .zip(hi_row)
                    .map(|(&a, &b)| a * (1.0 - w) + b * w)
                    .collect(),
            })
            .collect();

        Ok(InterpolatedVegaGrid {
            expiries: lo.expiries().to_vec(),
            rows,
        })
    }

    fn require(&self, shift: SpotShift) -> error::Result<&VegaSurface> {
        self.surfaces
            .get(&shift)
            .ok_or(VegaPnlError::MissingScenario { shift })
    }
}

/// The two calibration shifts strictly bracketing an interior spot move.
///
/// Callers must have handled exact matches and out-of-range targets first.
fn bracket(spot_move: f64) -> (SpotShift, SpotShift) {
    for pair in SpotShift::ALL.windows(2) {
        if pair[0].fraction() < spot_move && spot_move < pair[1].fraction() {
            return (pair[0], pair[1]);
        }
    }
    // Unreachable for in-range non-exact targets; fall back to the widest
    // interval rather than panicking in library code.
    (SpotShift::Down75, SpotShift::Up75)
}

fn check_alignment(
    lower: SpotShift,
    lo: &VegaSurface,
    upper: SpotShift,
    hi: &VegaSurface,
) -> error::Result<()> {
    if lo.expiries().len() != hi.expiries().len() {
        return Err(VegaPnlError::ShapeMismatch {
            message: format!(
                "surface {lower} has {} expiries, surface {upper} has {}",
                lo.expiries().len(),
                hi.expiries().len()
            ),
        });
    }
    if lo.moneyness().len() != hi.moneyness().len() {
        return Err(VegaPnlError::ShapeMismatch {
            message: format!(
                "surface {lower} has {} moneyness rows, surface {upper} has {}",
                lo.moneyness().len(),
                hi.moneyness().len()
            ),
        });
    }
    for (j, (a, b)) in lo.expiries().iter().zip(hi.expiries()).enumerate() {
        if a != b {
            return Err(VegaPnlError::ShapeMismatch {
                message: format!(
                    "expiry column {j} differs between {lower} ({a}) and {upper} ({b})"
                ),
            });
        }
    }
    for (i, (a, b)) in lo.moneyness().iter().zip(hi.moneyness()).enumerate() {
        if (a - b).abs() > MONEYNESS_AXIS_EPS {
            return Err(VegaPnlError::ShapeMismatch {
                message: format!(
                    "moneyness row {i} differs between {lower} ({a}) and {upper} ({b})"
                ),
            });
        }
    }
    Ok(())
}
