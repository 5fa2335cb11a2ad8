//! Day-count and tenor conventions.
//!
//! Time-to-expiry is always measured against an explicit reference date
//! ("as-of date") supplied by the caller — never derived from the wall
//! clock — so every computation is reproducible. Days to expiry are floored
//! at one day before annualization: a surface column expiring on the
//! reference date still carries a well-defined (tiny) tenor rather than a
//! zero or negative one.

use chrono::NaiveDate;

use crate::types::TenorBucket;

/// Days per year used for annualization.
pub const DAYS_PER_YEAR: f64 = 365.25;

/// Default reference date for time-to-expiry computation.
///
/// A fixed calendar date, reconfigurable via
/// [`PnlEngine::new`](crate::engine::PnlEngine::new); deployments must
/// advance it as calendar time passes.
pub fn default_reference_date() -> NaiveDate {
    // Infallible: the literal is a valid calendar date.
    NaiveDate::from_ymd_opt(2025, 1, 2).expect("valid calendar date")
}

/// Whole days from `reference` to `expiry`, floored at 1.
pub fn days_to_expiry(expiry: NaiveDate, reference: NaiveDate) -> i64 {
    (expiry - reference).num_days().max(1)
}

/// Time to expiry in years: `max(days, 1) / 365.25`.
pub fn year_fraction(expiry: NaiveDate, reference: NaiveDate) -> f64 {
    days_to_expiry(expiry, reference) as f64 / DAYS_PER_YEAR
}

/// Classify an expiry into its tenor bucket relative to the reference date.
///
/// Boundaries are inclusive on the lower bucket: exactly 30 days out is
/// `0-1M`, 31 days is `1-3M`.
pub fn classify_tenor(expiry: NaiveDate, reference: NaiveDate) -> TenorBucket {
    classify_days(days_to_expiry(expiry, reference))
}

/// Bucket classification from a raw day count.
pub fn classify_days(days: i64) -> TenorBucket {
    match days {
        d if d <= 30 => TenorBucket::M0To1,
        d if d <= 90 => TenorBucket::M1To3,
        d if d <= 180 => TenorBucket::M3To6,
        d if d <= 365 => TenorBucket::M6To12,
        d if d <= 730 => TenorBucket::Y1To2,
        _ => TenorBucket::Y2Plus,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use chrono::Days;

    fn reference() -> NaiveDate {
        default_reference_date()
    }

    fn days_out(n: u64) -> NaiveDate {
        reference() + Days::new(n)
    }

    #[test]
    fn bucket_boundary_is_inclusive_on_the_lower_bucket() {
        assert_eq!(classify_tenor(days_out(30), reference()), TenorBucket::M0To1);
        assert_eq!(classify_tenor(days_out(31), reference()), TenorBucket::M1To3);
        assert_eq!(classify_tenor(days_out(90), reference()), TenorBucket::M1To3);
        assert_eq!(classify_tenor(days_out(91), reference()), TenorBucket::M3To6);
        assert_eq!(classify_tenor(days_out(180), reference()), TenorBucket::M3To6);
        assert_eq!(classify_tenor(days_out(365), reference()), TenorBucket::M6To12);
        assert_eq!(classify_tenor(days_out(730), reference()), TenorBucket::Y1To2);
        assert_eq!(classify_tenor(days_out(731), reference()), TenorBucket::Y2Plus);
    }

    #[test]
    fn year_fraction_uses_365_25() {
        assert_abs_diff_eq!(
            year_fraction(days_out(90), reference()),
            90.0 / 365.25,
            epsilon = 1e-15
        );
    }

    #[test]
    fn days_to_expiry_floors_at_one() {
        // Same-day and past expiries still carry a one-day tenor.
        assert_eq!(days_to_expiry(reference(), reference()), 1);
        let past = reference() - Days::new(10);
        assert_eq!(days_to_expiry(past, reference()), 1);
        assert_abs_diff_eq!(
            year_fraction(reference(), reference()),
            1.0 / 365.25,
            epsilon = 1e-15
        );
    }
}
