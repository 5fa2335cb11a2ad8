//! Higher-order greek estimation from the scenario grids.
//!
//! The scenario set itself carries enough information to estimate vanna
//! (dVega/dSpot) without any option pricing: the ±2.5% surfaces are vega
//! snapshots at shifted spots, so a central finite difference across them
//! approximates the sensitivity at the current spot. Volga has no such
//! cross-scenario signal and is approximated by a wing-convexity proxy on a
//! single surface.
//!
//! Both estimators are pure and return plain grids; they do not feed the
//! P&L engine's result shape.

use crate::error::{self, VegaPnlError};
use crate::scenario::{MONEYNESS_AXIS_EPS, ScenarioSet};
use crate::surface::{InterpolatedVegaGrid, VegaRow, VegaSurface};
use crate::types::SpotShift;
use crate::validate::{validate_finite, validate_positive};

/// Default wing-convexity multiplier for the volga proxy.
pub const DEFAULT_VOLGA_SCALAR: f64 = 0.5;

/// Per-node vanna estimate via central difference across the ±2.5% scenarios.
///
/// `vanna[i][j] ≈ (vega₊₂.₅(i,j) − vega₋₂.₅(i,j)) / (0.05 · spot)`, i.e.
/// dollar vega change per unit of spot. Axes of the returned grid match the
/// (aligned) scenario surfaces.
///
/// # Errors
/// - [`VegaPnlError::MissingScenario`] if either ±2.5% surface is absent.
/// - [`VegaPnlError::ShapeMismatch`] if their axes differ.
/// - [`VegaPnlError::InvalidInput`] if `spot` is not positive and finite.
pub fn vanna_from_scenarios(
    set: &ScenarioSet,
    spot: f64,
) -> error::Result<InterpolatedVegaGrid> {
    validate_positive(spot, "spot")?;

    let down = set
        .get(SpotShift::Down25)
        .ok_or(VegaPnlError::MissingScenario {
            shift: SpotShift::Down25,
        })?;
    let up = set.get(SpotShift::Up25).ok_or(VegaPnlError::MissingScenario {
        shift: SpotShift::Up25,
    })?;

    // Axes must match value-wise; equal lengths alone would let differently
    // sampled surfaces difference row-by-row into a mislabeled grid.
    if up.expiries() != down.expiries()
        || up.moneyness().len() != down.moneyness().len()
        || up
            .moneyness()
            .iter()
            .zip(down.moneyness())
            .any(|(a, b)| (a - b).abs() > MONEYNESS_AXIS_EPS)
    {
        return Err(VegaPnlError::ShapeMismatch {
            message: "±2.5% scenario surfaces have differing axes".into(),
        });
    }

    let spot_span =
        (SpotShift::Up25.fraction() - SpotShift::Down25.fraction()) * spot;
    let rows = down
        .moneyness()
        .iter()
        .zip(down.vega().iter().zip(up.vega()))
        .map(|(&moneyness, (d_row, u_row))| VegaRow {
            moneyness,
            values: d_row
                .iter()
                .zip(u_row)
                .map(|(&d, &u)| (u - d) / spot_span)
                .collect(),
        })
        .collect();

    Ok(InterpolatedVegaGrid {
        expiries: down.expiries().to_vec(),
        rows,
    })
}

/// Per-node volga proxy: `vega · scalar · (K − 1)²`.
///
/// Wing nodes carry the convexity; ATM nodes (K = 1) get zero. The scalar is
/// a caller-tuned multiplier (default [`DEFAULT_VOLGA_SCALAR`]).
///
/// # Errors
/// Returns [`VegaPnlError::InvalidInput`] if `scalar` is not finite.
pub fn volga_proxy(surface: &VegaSurface, scalar: f64) -> error::Result<InterpolatedVegaGrid> {
    validate_finite(scalar, "volga scalar")?;

    let rows = surface
        .moneyness()
        .iter()
        .zip(surface.vega())
        .map(|(&moneyness, row)| {
            let wing = moneyness - 1.0;
            VegaRow {
                moneyness,
                values: row.iter().map(|&v| v * scalar * wing * wing).collect(),
            }
        })
        .collect();

    Ok(InterpolatedVegaGrid {
        expiries: surface.expiries().to_vec(),
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::ScenarioSet;
    use approx::assert_abs_diff_eq;
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn surface(level: f64) -> VegaSurface {
        VegaSurface::new(
            vec![d(2025, 3, 21), d(2025, 6, 20)],
            vec![0.90, 1.0, 1.10],
            vec![vec![level; 2], vec![2.0 * level; 2], vec![level; 2]],
        )
        .unwrap()
    }

    #[test]
    fn vanna_is_central_difference_over_spot_span() {
        let mut set = ScenarioSet::new();
        set.insert(SpotShift::Down25, surface(1000.0));
        set.insert(SpotShift::Up25, surface(1200.0));

        let vanna = vanna_from_scenarios(&set, 100.0).unwrap();
        // (1200 − 1000) / (0.05 · 100) = 40 per unit spot in the wing rows.
        assert_abs_diff_eq!(vanna.rows[0].values[0], 40.0, epsilon = 1e-9);
        assert_abs_diff_eq!(vanna.rows[1].values[1], 80.0, epsilon = 1e-9);
    }

    #[test]
    fn vanna_requires_both_wing_scenarios() {
        let mut set = ScenarioSet::new();
        set.insert(SpotShift::Down25, surface(1000.0));
        let err = vanna_from_scenarios(&set, 100.0).unwrap_err();
        assert!(matches!(
            err,
            VegaPnlError::MissingScenario {
                shift: SpotShift::Up25
            }
        ));
    }

    #[test]
    fn vanna_rejects_mismatched_axes() {
        let mut set = ScenarioSet::new();
        set.insert(SpotShift::Down25, surface(1000.0));
        set.insert(
            SpotShift::Up25,
            VegaSurface::new(
                vec![d(2025, 3, 21), d(2025, 9, 19)],
                vec![0.90, 1.0, 1.10],
                vec![vec![1.0; 2], vec![1.0; 2], vec![1.0; 2]],
            )
            .unwrap(),
        );
        let err = vanna_from_scenarios(&set, 100.0).unwrap_err();
        assert!(matches!(err, VegaPnlError::ShapeMismatch { .. }));
    }

    #[test]
    fn vanna_rejects_equal_length_moneyness_mismatch() {
        // Same row count, different moneyness sampling: must fail rather
        // than difference row-by-row under the down surface's labels.
        let mut set = ScenarioSet::new();
        set.insert(SpotShift::Down25, surface(1000.0));
        set.insert(
            SpotShift::Up25,
            VegaSurface::new(
                vec![d(2025, 3, 21), d(2025, 6, 20)],
                vec![0.85, 1.0, 1.15],
                vec![vec![1200.0; 2], vec![2400.0; 2], vec![1200.0; 2]],
            )
            .unwrap(),
        );
        let err = vanna_from_scenarios(&set, 100.0).unwrap_err();
        assert!(matches!(err, VegaPnlError::ShapeMismatch { .. }));
    }

    #[test]
    fn volga_proxy_vanishes_at_the_money() {
        let grid = volga_proxy(&surface(1000.0), DEFAULT_VOLGA_SCALAR).unwrap();
        // K = 1 row: zero. K = 0.90 row: 1000 · 0.5 · 0.01 = 5.
        assert_abs_diff_eq!(grid.rows[1].values[0], 0.0);
        assert_abs_diff_eq!(grid.rows[0].values[0], 5.0, epsilon = 1e-9);
        assert_abs_diff_eq!(grid.rows[2].values[1], 5.0, epsilon = 1e-9);
    }
}
