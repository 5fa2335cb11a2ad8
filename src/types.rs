//! Core domain types shared across the crate.
//!
//! # Newtype Strategy
//!
//! Following the convention of wrapping *outputs* while taking bare `f64`
//! *inputs*: [`VolChange`] wraps the model's projected implied-vol move so a
//! Δσ cannot be silently mistaken for a vega or a P&L figure. Spot moves,
//! moneyness, and vega enter the API as raw `f64` — the caller already knows
//! what they are passing, and parameter names document the rest.
//!
//! # Why no `Eq` or `Ord` on `VolChange`?
//! It wraps `f64`, which has no total order because of `NaN`. Only
//! `PartialEq` / `PartialOrd` are derived.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the seven fixed spot-shift scenarios at which vega surfaces are
/// captured.
///
/// The set is closed: interpolation for an arbitrary spot move always
/// brackets the target between two of these calibration points (or clamps to
/// the outermost one). Variant order matches the spot-move axis, so the
/// derived `Ord` sorts scenarios from the deepest down-move to the largest
/// up-move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SpotShift {
    /// Spot down 7.5%.
    Down75,
    /// Spot down 5.0%.
    Down50,
    /// Spot down 2.5%.
    Down25,
    /// Unchanged spot (the as-observed surface).
    Atm,
    /// Spot up 2.5%.
    Up25,
    /// Spot up 5.0%.
    Up50,
    /// Spot up 7.5%.
    Up75,
}

impl SpotShift {
    /// All seven calibration shifts, ordered along the spot-move axis.
    pub const ALL: [SpotShift; 7] = [
        SpotShift::Down75,
        SpotShift::Down50,
        SpotShift::Down25,
        SpotShift::Atm,
        SpotShift::Up25,
        SpotShift::Up50,
        SpotShift::Up75,
    ];

    /// Signed spot move as a fraction (e.g. `-0.075` for [`SpotShift::Down75`]).
    pub fn fraction(self) -> f64 {
        match self {
            SpotShift::Down75 => -0.075,
            SpotShift::Down50 => -0.050,
            SpotShift::Down25 => -0.025,
            SpotShift::Atm => 0.0,
            SpotShift::Up25 => 0.025,
            SpotShift::Up50 => 0.050,
            SpotShift::Up75 => 0.075,
        }
    }

    /// Display label, e.g. `"-7.5%"` or `"0%"`.
    pub fn label(self) -> &'static str {
        match self {
            SpotShift::Down75 => "-7.5%",
            SpotShift::Down50 => "-5.0%",
            SpotShift::Down25 => "-2.5%",
            SpotShift::Atm => "0%",
            SpotShift::Up25 => "+2.5%",
            SpotShift::Up50 => "+5.0%",
            SpotShift::Up75 => "+7.5%",
        }
    }
}

impl fmt::Display for SpotShift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Coarse time-to-expiry classification used for aggregated reporting.
///
/// Variant order is the fixed display/aggregation order, so the derived
/// `Ord` (and hence `BTreeMap` iteration) yields buckets front-to-back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TenorBucket {
    /// Up to 30 days (inclusive).
    M0To1,
    /// 31 to 90 days.
    M1To3,
    /// 91 to 180 days.
    M3To6,
    /// 181 to 365 days.
    M6To12,
    /// 366 to 730 days.
    Y1To2,
    /// Beyond 730 days.
    Y2Plus,
}

impl TenorBucket {
    /// All buckets in display order.
    pub const ALL: [TenorBucket; 6] = [
        TenorBucket::M0To1,
        TenorBucket::M1To3,
        TenorBucket::M3To6,
        TenorBucket::M6To12,
        TenorBucket::Y1To2,
        TenorBucket::Y2Plus,
    ];

    /// Display label, e.g. `"0-1M"`.
    pub fn label(self) -> &'static str {
        match self {
            TenorBucket::M0To1 => "0-1M",
            TenorBucket::M1To3 => "1-3M",
            TenorBucket::M3To6 => "3-6M",
            TenorBucket::M6To12 => "6-12M",
            TenorBucket::Y1To2 => "1-2Y",
            TenorBucket::Y2Plus => "2Y+",
        }
    }
}

impl fmt::Display for TenorBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Projected implied-volatility change Δσ at one surface node, in vol points.
///
/// A value of 1.5 means the model projects implied vol rising by 1.5
/// volatility points under the scenario; multiplied by that node's vega it
/// yields the node's P&L.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct VolChange(pub f64);
