//! Vega surface data model.
//!
//! A [`VegaSurface`] is one snapshot of vega-by-strike-by-expiry, captured at
//! a single spot-shift scenario: moneyness (K/S) down the rows, expiry dates
//! across the columns, dollar vega per 1 vol point at each node. Surfaces are
//! immutable after construction and carry optional declared row/column totals
//! for ingestion cross-checks.
//!
//! An [`InterpolatedVegaGrid`] is the ephemeral output of interpolating
//! between two scenario surfaces — same axes, blended values, recomputed per
//! query and never cached by this crate.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{self, VegaPnlError};
use crate::validate::validate_finite;

/// One vega surface captured at a fixed spot-shift scenario.
///
/// Invariants (enforced at construction and on deserialization):
/// - `vega` has one row per moneyness value and one column per expiry;
/// - every node, moneyness value, and declared total is finite;
/// - declared totals, when present, match the axis lengths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "VegaSurfaceRaw", into = "VegaSurfaceRaw")]
pub struct VegaSurface {
    expiries: Vec<NaiveDate>,
    moneyness: Vec<f64>,
    vega: Vec<Vec<f64>>,
    row_totals: Option<Vec<f64>>,
    col_totals: Option<Vec<f64>>,
}

#[derive(Serialize, Deserialize)]
struct VegaSurfaceRaw {
    expiries: Vec<NaiveDate>,
    moneyness: Vec<f64>,
    vega: Vec<Vec<f64>>,
    row_totals: Option<Vec<f64>>,
    col_totals: Option<Vec<f64>>,
}

impl TryFrom<VegaSurfaceRaw> for VegaSurface {
    type Error = VegaPnlError;
    fn try_from(raw: VegaSurfaceRaw) -> Result<Self, Self::Error> {
        let surface = VegaSurface::new(raw.expiries, raw.moneyness, raw.vega)?;
        match (raw.row_totals, raw.col_totals) {
            (None, None) => Ok(surface),
            (rows, cols) => surface.with_declared_totals(rows, cols),
        }
    }
}

impl From<VegaSurface> for VegaSurfaceRaw {
    fn from(s: VegaSurface) -> Self {
        Self {
            expiries: s.expiries,
            moneyness: s.moneyness,
            vega: s.vega,
            row_totals: s.row_totals,
            col_totals: s.col_totals,
        }
    }
}

impl VegaSurface {
    /// Create a surface from its axes and a rectangular vega matrix.
    ///
    /// # Errors
    /// Returns [`VegaPnlError::InvalidInput`] if row count ≠ moneyness count,
    /// any row's length ≠ expiry count, or any value is non-finite.
    pub fn new(
        expiries: Vec<NaiveDate>,
        moneyness: Vec<f64>,
        vega: Vec<Vec<f64>>,
    ) -> error::Result<Self> {
        if vega.len() != moneyness.len() {
            return Err(VegaPnlError::InvalidInput {
                message: format!(
                    "vega matrix has {} rows but {} moneyness values",
                    vega.len(),
                    moneyness.len()
                ),
            });
        }
        for (i, row) in vega.iter().enumerate() {
            if row.len() != expiries.len() {
                return Err(VegaPnlError::InvalidInput {
                    message: format!(
                        "vega matrix is not rectangular: row {i} has {} values but there are {} expiries",
                        row.len(),
                        expiries.len()
                    ),
                });
            }
            for &v in row {
                validate_finite(v, "vega")?;
            }
        }
        for &m in &moneyness {
            validate_finite(m, "moneyness")?;
        }
        Ok(Self {
            expiries,
            moneyness,
            vega,
            row_totals: None,
            col_totals: None,
        })
    }

    /// Attach totals declared by the data producer, for later cross-checking
    /// via [`validate_totals`](Self::validate_totals).
    ///
    /// # Errors
    /// Returns [`VegaPnlError::InvalidInput`] if a totals vector does not
    /// match the corresponding axis length or contains non-finite values.
    pub fn with_declared_totals(
        mut self,
        row_totals: Option<Vec<f64>>,
        col_totals: Option<Vec<f64>>,
    ) -> error::Result<Self> {
        if let Some(rows) = &row_totals {
            if rows.len() != self.moneyness.len() {
                return Err(VegaPnlError::InvalidInput {
                    message: format!(
                        "declared {} row totals for {} rows",
                        rows.len(),
                        self.moneyness.len()
                    ),
                });
            }
            for &t in rows {
                validate_finite(t, "row total")?;
            }
        }
        if let Some(cols) = &col_totals {
            if cols.len() != self.expiries.len() {
                return Err(VegaPnlError::InvalidInput {
                    message: format!(
                        "declared {} column totals for {} columns",
                        cols.len(),
                        self.expiries.len()
                    ),
                });
            }
            for &t in cols {
                validate_finite(t, "column total")?;
            }
        }
        self.row_totals = row_totals;
        self.col_totals = col_totals;
        Ok(self)
    }

    /// Ordered expiry dates (the column axis).
    pub fn expiries(&self) -> &[NaiveDate] {
        &self.expiries
    }

    /// Ordered moneyness values (the row axis).
    pub fn moneyness(&self) -> &[f64] {
        &self.moneyness
    }

    /// The vega matrix, `vega[row][col]` aligned to moneyness × expiries.
    pub fn vega(&self) -> &[Vec<f64>] {
        &self.vega
    }

    /// Sum of every node's vega.
    pub fn total_vega(&self) -> f64 {
        self.vega.iter().flatten().sum()
    }

    /// Check each row and column sum against the declared totals, within an
    /// absolute tolerance. Surfaces without declared totals pass trivially.
    ///
    /// # Errors
    /// Returns [`VegaPnlError::InvalidInput`] naming the first offending row
    /// or column.
    pub fn validate_totals(&self, tolerance: f64) -> error::Result<()> {
        if let Some(declared) = &self.row_totals {
            for (i, (row, &expected)) in self.vega.iter().zip(declared).enumerate() {
                let sum: f64 = row.iter().sum();
                if (sum - expected).abs() > tolerance {
                    return Err(VegaPnlError::InvalidInput {
                        message: format!(
                            "row {i} (moneyness {:.4}) sums to {sum:.4}, declared total {expected:.4}",
                            self.moneyness[i]
                        ),
                    });
                }
            }
        }
        if let Some(declared) = &self.col_totals {
            for (j, &expected) in declared.iter().enumerate() {
                let sum: f64 = self.vega.iter().map(|row| row[j]).sum();
                if (sum - expected).abs() > tolerance {
                    return Err(VegaPnlError::InvalidInput {
                        message: format!(
                            "column {j} ({}) sums to {sum:.4}, declared total {expected:.4}",
                            self.expiries[j]
                        ),
                    });
                }
            }
        }
        Ok(())
    }

    /// Copy this surface's data into a standalone grid.
    pub fn to_grid(&self) -> InterpolatedVegaGrid {
        InterpolatedVegaGrid {
            expiries: self.expiries.clone(),
            rows: self
                .moneyness
                .iter()
                .zip(&self.vega)
                .map(|(&m, values)| VegaRow {
                    moneyness: m,
                    values: values.clone(),
                })
                .collect(),
        }
    }
}

/// One row of an interpolated grid: a moneyness level and its vega per expiry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VegaRow {
    /// Strike-over-spot ratio for this row.
    pub moneyness: f64,
    /// One vega value per expiry column.
    pub values: Vec<f64>,
}

/// Vega grid produced by interpolating the scenario set at one spot move.
///
/// Ephemeral by design: recomputed per query, never cached here. The expiry
/// axis is taken from (and identical to) the scenario surfaces it was
/// blended from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterpolatedVegaGrid {
    /// Ordered expiry dates shared by every row.
    pub expiries: Vec<NaiveDate>,
    /// Rows in moneyness order.
    pub rows: Vec<VegaRow>,
}

impl InterpolatedVegaGrid {
    /// True when the grid has no rows (the recoverable "no data" case).
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sum of every node's vega.
    pub fn total_vega(&self) -> f64 {
        self.rows.iter().flat_map(|r| r.values.iter()).sum()
    }
}
