//! Volatility change models.
//!
//! A [`VolModel`] projects the implied-vol change Δσ at one surface node
//! (moneyness, expiry) for a given spot move. Two modes:
//!
//! **Beta** — spot-driven parametric response:
//!
//! ```text
//! Δσ = [β·ΔS + γ·ΔS²·sign(β)·0.01] · exp(−τ·T) · [1 + κ·(K−1)·sign(−ΔS)]
//! ```
//!
//! where ΔS is the spot move in percentage units (fraction × 100), T the
//! time to expiry in years, and K the moneyness. The first bracket is the
//! ATM response: linear in spot plus a convexity correction whose sign
//! tracks β so vol spikes stay convex to spot in the same direction as the
//! base relationship. The skew bracket amplifies out-of-the-money strikes on
//! the side consistent with down-move-vol-up; the exponential term makes
//! front tenors move more than back tenors.
//!
//! **Manual** — the caller supplies the ATM shift directly:
//!
//! ```text
//! Δσ = (atmVolChange + skewChange·(K−1)) / (1 + termMultiplier·√T)
//! ```
//!
//! Both modes are pure functions of their explicit inputs; the reference
//! date for T is passed in, never read from the clock.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::conventions::year_fraction;
use crate::error::VegaPnlError;
use crate::types::VolChange;
use crate::validate::{validate_finite, validate_non_negative};

/// `signum` with `sign(0) = 0`, so a zero β contributes no convexity term
/// and a zero spot move no skew tilt.
fn sign(x: f64) -> f64 {
    if x == 0.0 {
        0.0
    } else {
        x.signum()
    }
}

/// Parameters for the spot-driven beta model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BetaParamsRaw", into = "BetaParamsRaw")]
pub struct BetaParams {
    /// β — vol points of ATM response per 1% spot move (negative for the
    /// usual equity spot-down/vol-up relationship).
    pub spot_vol_beta: f64,
    /// κ — skew amplification for out-of-the-money strikes.
    pub skew_beta: f64,
    /// τ — exponential term-structure decay; larger means front tenors
    /// dominate more.
    pub term_decay: f64,
    /// γ — convexity of the ATM response in the spot move.
    pub convexity: f64,
}

#[derive(Serialize, Deserialize)]
struct BetaParamsRaw {
    spot_vol_beta: f64,
    skew_beta: f64,
    term_decay: f64,
    convexity: f64,
}

impl TryFrom<BetaParamsRaw> for BetaParams {
    type Error = VegaPnlError;
    fn try_from(raw: BetaParamsRaw) -> Result<Self, Self::Error> {
        Self::new(raw.spot_vol_beta, raw.skew_beta, raw.term_decay, raw.convexity)
    }
}

impl From<BetaParams> for BetaParamsRaw {
    fn from(p: BetaParams) -> Self {
        Self {
            spot_vol_beta: p.spot_vol_beta,
            skew_beta: p.skew_beta,
            term_decay: p.term_decay,
            convexity: p.convexity,
        }
    }
}

impl BetaParams {
    /// Create beta parameters, rejecting non-finite values.
    ///
    /// # Errors
    /// Returns [`VegaPnlError::InvalidInput`] if any parameter is NaN or
    /// infinite.
    pub fn new(
        spot_vol_beta: f64,
        skew_beta: f64,
        term_decay: f64,
        convexity: f64,
    ) -> crate::Result<Self> {
        validate_finite(spot_vol_beta, "spot_vol_beta")?;
        validate_finite(skew_beta, "skew_beta")?;
        validate_finite(term_decay, "term_decay")?;
        validate_finite(convexity, "convexity")?;
        Ok(Self {
            spot_vol_beta,
            skew_beta,
            term_decay,
            convexity,
        })
    }
}

impl Default for BetaParams {
    fn default() -> Self {
        Self {
            spot_vol_beta: -0.40,
            skew_beta: 0.15,
            term_decay: 0.80,
            convexity: 2.00,
        }
    }
}

/// Parameters for the manual model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ManualParamsRaw", into = "ManualParamsRaw")]
pub struct ManualParams {
    /// ATM implied-vol change in vol points, applied directly.
    pub atm_vol_change: f64,
    /// Additional vol change per unit of (K − 1) moneyness distance.
    pub skew_change: f64,
    /// Term dampening: larger values shrink the move for longer tenors.
    /// Non-negative, so the denominator `1 + term_multiplier·√T` stays ≥ 1.
    pub term_multiplier: f64,
}

#[derive(Serialize, Deserialize)]
struct ManualParamsRaw {
    atm_vol_change: f64,
    skew_change: f64,
    term_multiplier: f64,
}

impl TryFrom<ManualParamsRaw> for ManualParams {
    type Error = VegaPnlError;
    fn try_from(raw: ManualParamsRaw) -> Result<Self, Self::Error> {
        Self::new(raw.atm_vol_change, raw.skew_change, raw.term_multiplier)
    }
}

impl From<ManualParams> for ManualParamsRaw {
    fn from(p: ManualParams) -> Self {
        Self {
            atm_vol_change: p.atm_vol_change,
            skew_change: p.skew_change,
            term_multiplier: p.term_multiplier,
        }
    }
}

impl ManualParams {
    /// Create manual parameters, rejecting non-finite values and a negative
    /// term multiplier (which could zero or flip the dampening denominator).
    ///
    /// # Errors
    /// Returns [`VegaPnlError::InvalidInput`] if any parameter is NaN or
    /// infinite, or if `term_multiplier` is negative.
    pub fn new(atm_vol_change: f64, skew_change: f64, term_multiplier: f64) -> crate::Result<Self> {
        validate_finite(atm_vol_change, "atm_vol_change")?;
        validate_finite(skew_change, "skew_change")?;
        validate_non_negative(term_multiplier, "term_multiplier")?;
        Ok(Self {
            atm_vol_change,
            skew_change,
            term_multiplier,
        })
    }

    /// This parameter set with the ATM term replaced, other terms unchanged.
    /// Used by the scenario matrix to sweep candidate ATM vol changes.
    pub fn with_atm_vol_change(self, atm_vol_change: f64) -> Self {
        Self {
            atm_vol_change,
            ..self
        }
    }
}

impl Default for ManualParams {
    fn default() -> Self {
        Self {
            atm_vol_change: 0.0,
            skew_change: 0.10,
            term_multiplier: 0.50,
        }
    }
}

/// Implied-vol change model: a closed sum over the two supported modes.
///
/// Every Δσ call site matches exhaustively on this enum, so adding a third
/// model is a compile-time-checked change rather than a stringly-typed
/// branch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum VolModel {
    /// Spot-driven parametric response.
    Beta(BetaParams),
    /// Caller-supplied ATM shift with skew and term dampening.
    Manual(ManualParams),
}

impl VolModel {
    /// Projected implied-vol change at one node, in vol points.
    ///
    /// `spot_move` is a signed fraction (−0.05 for a 5% drop); it is ignored
    /// by manual mode. `reference` anchors the time-to-expiry computation.
    pub fn vol_change(
        &self,
        moneyness: f64,
        expiry: NaiveDate,
        spot_move: f64,
        reference: NaiveDate,
    ) -> VolChange {
        let t = year_fraction(expiry, reference);
        match self {
            VolModel::Beta(p) => {
                let ds = spot_move * 100.0;
                let atm = p.spot_vol_beta * ds
                    + p.convexity * ds * ds * sign(p.spot_vol_beta) * 0.01;
                let term = (-p.term_decay * t).exp();
                let skew = 1.0 + p.skew_beta * (moneyness - 1.0) * sign(-ds);
                VolChange(atm * term * skew)
            }
            VolModel::Manual(p) => {
                let base = p.atm_vol_change + p.skew_change * (moneyness - 1.0);
                VolChange(base / (1.0 + p.term_multiplier * t.sqrt()))
            }
        }
    }
}
