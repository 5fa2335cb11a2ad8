//! P&L engine: per-node evaluation, aggregation views, and scenario sweeps.
//!
//! Per-node P&L is `vega × Δσ`; every aggregation (by moneyness row, by
//! expiry column, by tenor bucket, grand total) is derived purely from that
//! matrix, so the four summation paths always agree up to floating rounding.
//!
//! Scenario curves and matrices are repeated single-scenario evaluations at
//! independent spot moves. Each point reads only its own inputs, so sweeps
//! are evaluated as a rayon parallel map; results land in their index slot
//! and order of completion is irrelevant.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::conventions::{classify_tenor, default_reference_date};
use crate::error::{self, VegaPnlError};
use crate::model::VolModel;
use crate::scenario::ScenarioSet;
use crate::surface::InterpolatedVegaGrid;
use crate::types::{SpotShift, TenorBucket};
use crate::validate::validate_positive;

/// Default spot-move step for scenario curves (0.5%).
pub const DEFAULT_CURVE_STEP: f64 = 0.005;

/// Fixed spot-move step for scenario matrices (1%).
pub const MATRIX_SPOT_STEP: f64 = 0.01;

/// Default candidate ATM vol changes for the scenario matrix, in vol points.
pub const DEFAULT_VOL_CHANGES: [f64; 7] = [-5.0, -3.0, -1.0, 0.0, 1.0, 3.0, 5.0];

/// P&L for one expiry column, tagged with its tenor bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpiryPnl {
    pub expiry: NaiveDate,
    pub bucket: TenorBucket,
    pub total: f64,
}

/// P&L for one moneyness row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoneynessPnl {
    pub moneyness: f64,
    pub total: f64,
}

/// Result of one single-scenario evaluation.
///
/// Fully determined by its inputs: the per-node matrix plus every
/// aggregation view. An evaluation over an empty grid yields
/// [`PnlResult::zero`] rather than an error.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PnlResult {
    /// Per-node P&L, aligned to the grid's moneyness rows × expiry columns.
    pub pnl: Vec<Vec<f64>>,
    /// Per-expiry totals in column order.
    pub by_expiry: Vec<ExpiryPnl>,
    /// Per-bucket totals; `BTreeMap` iteration yields display order.
    pub by_bucket: BTreeMap<TenorBucket, f64>,
    /// Per-moneyness totals in row order.
    pub by_moneyness: Vec<MoneynessPnl>,
    /// Grand total across all nodes.
    pub total: f64,
}

impl PnlResult {
    /// The neutral "no data" result: empty views, zero total.
    pub fn zero() -> Self {
        Self::default()
    }
}

/// One point of a P&L-vs-spot curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub spot_move: f64,
    pub total_pnl: f64,
}

/// Ordered P&L-vs-spot curve for one model.
pub type ScenarioCurve = Vec<CurvePoint>;

/// One scenario-matrix row: total P&L per candidate vol change at one spot move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixRow {
    pub spot_move: f64,
    /// Totals aligned with [`ScenarioMatrix::vol_changes`].
    pub totals: Vec<f64>,
}

/// 2-D sensitivity grid: spot move × candidate ATM vol change → total P&L.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioMatrix {
    /// Candidate ATM vol changes, in vol points (the column axis).
    pub vol_changes: Vec<f64>,
    /// Rows in spot-move order.
    pub rows: Vec<MatrixRow>,
}

/// Stateless P&L engine.
///
/// Holds only explicit configuration (the reference date for time-to-expiry);
/// every method is a deterministic function of its arguments.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PnlEngine {
    reference_date: NaiveDate,
}

impl Default for PnlEngine {
    fn default() -> Self {
        Self {
            reference_date: default_reference_date(),
        }
    }
}

impl PnlEngine {
    /// Engine anchored at the given as-of date.
    pub fn new(reference_date: NaiveDate) -> Self {
        Self { reference_date }
    }

    /// The configured as-of date.
    pub fn reference_date(&self) -> NaiveDate {
        self.reference_date
    }

    /// Evaluate P&L for one interpolated grid under one spot move and model.
    ///
    /// An empty grid (no rows) is the recoverable "no data" case and yields
    /// [`PnlResult::zero`]; absence of data for one spot move must not abort
    /// a scenario sweep.
    pub fn evaluate(
        &self,
        grid: &InterpolatedVegaGrid,
        spot_move: f64,
        model: &VolModel,
    ) -> PnlResult {
        if grid.is_empty() {
            return PnlResult::zero();
        }

        let pnl: Vec<Vec<f64>> = grid
            .rows
            .iter()
            .map(|row| {
                row.values
                    .iter()
                    .zip(&grid.expiries)
                    .map(|(&vega, &expiry)| {
                        let dv = model.vol_change(
                            row.moneyness,
                            expiry,
                            spot_move,
                            self.reference_date,
                        );
                        vega * dv.0
                    })
                    .collect()
            })
            .collect();

        let by_expiry: Vec<ExpiryPnl> = grid
            .expiries
            .iter()
            .enumerate()
            .map(|(j, &expiry)| ExpiryPnl {
                expiry,
                bucket: classify_tenor(expiry, self.reference_date),
                total: pnl.iter().map(|row| row[j]).sum(),
            })
            .collect();

        let mut by_bucket: BTreeMap<TenorBucket, f64> = BTreeMap::new();
        for e in &by_expiry {
            *by_bucket.entry(e.bucket).or_insert(0.0) += e.total;
        }

        let by_moneyness: Vec<MoneynessPnl> = grid
            .rows
            .iter()
            .zip(&pnl)
            .map(|(row, pnl_row)| MoneynessPnl {
                moneyness: row.moneyness,
                total: pnl_row.iter().sum(),
            })
            .collect();

        let total = by_moneyness.iter().map(|m| m.total).sum();

        PnlResult {
            pnl,
            by_expiry,
            by_bucket,
            by_moneyness,
            total,
        }
    }

    /// P&L-vs-spot curve: one evaluation per spot move from −7.5% to +7.5%
    /// inclusive, stepping by `step` (default [`DEFAULT_CURVE_STEP`]), each
    /// point rounded to 4 decimal places to avoid floating drift.
    ///
    /// # Errors
    /// Propagates [`VegaPnlError::MissingScenario`] / `ShapeMismatch` from
    /// interpolation — structural integrity problems are never averaged
    /// over. A non-positive or non-finite `step` is `InvalidInput`.
    pub fn scenario_curve(
        &self,
        set: &ScenarioSet,
        model: &VolModel,
        step: f64,
    ) -> error::Result<ScenarioCurve> {
        validate_positive(step, "step")?;
        sweep_points(step, 4)
            .par_iter()
            .map(|&spot_move| {
                let grid = set.interpolate(spot_move)?;
                let result = self.evaluate(&grid, spot_move, model);
                Ok(CurvePoint {
                    spot_move,
                    total_pnl: result.total,
                })
            })
            .collect()
    }

    /// 2-D sensitivity matrix: total P&L per (spot move, candidate ATM vol
    /// change), spot moves −7.5% to +7.5% in 1% steps rounded to 3 decimals.
    ///
    /// Only manual mode is supported: each cell overrides the ATM term of
    /// the base manual parameters with one candidate, leaving skew and term
    /// dampening unchanged. Beta mode has no independent vol-change axis to
    /// vary.
    ///
    /// # Errors
    /// [`VegaPnlError::InvalidMode`] for a beta model; interpolation errors
    /// propagate as in [`scenario_curve`](Self::scenario_curve).
    pub fn scenario_matrix(
        &self,
        set: &ScenarioSet,
        model: &VolModel,
        vol_changes: &[f64],
    ) -> error::Result<ScenarioMatrix> {
        let base = match model {
            VolModel::Manual(p) => *p,
            VolModel::Beta(_) => {
                return Err(VegaPnlError::InvalidMode {
                    operation: "scenario_matrix",
                    message: "beta mode has no vol-change axis to vary independently".into(),
                });
            }
        };

        let rows: Vec<MatrixRow> = sweep_points(MATRIX_SPOT_STEP, 3)
            .par_iter()
            .map(|&spot_move| {
                let grid = set.interpolate(spot_move)?;
                let totals = vol_changes
                    .iter()
                    .map(|&vc| {
                        let candidate = VolModel::Manual(base.with_atm_vol_change(vc));
                        self.evaluate(&grid, spot_move, &candidate).total
                    })
                    .collect();
                Ok(MatrixRow { spot_move, totals })
            })
            .collect::<error::Result<_>>()?;

        Ok(ScenarioMatrix {
            vol_changes: vol_changes.to_vec(),
            rows,
        })
    }
}

/// Spot moves from −7.5% to +7.5% inclusive, stepping by `step`, each
/// rounded to `decimals` places. Consecutive duplicates produced by a step
/// below the rounding granularity are collapsed, so the points are always
/// strictly increasing.
fn sweep_points(step: f64, decimals: i32) -> Vec<f64> {
    let lo = SpotShift::Down75.fraction();
    let hi = SpotShift::Up75.fraction();
    let scale = 10f64.powi(decimals);
    let mut points: Vec<f64> = Vec::new();
    let mut t = lo;
    while t <= hi + 1e-9 {
        let p = (t * scale).round() / scale;
        if points.last() != Some(&p) {
            points.push(p);
        }
        t += step;
    }
    points
}
