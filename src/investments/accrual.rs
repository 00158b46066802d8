//! Accrual engine: discrete per-minute compounding and redemption
//! arithmetic, all in integer cents.
//!
//! Interest accrues in whole-minute compounding steps rather than
//! continuously, which keeps the model auditable and deterministic. The
//! accrued value is always floored, so rounding can only bias the value
//! down, never manufacture money.

use chrono::NaiveDateTime;

use super::investments_constants::REDEMPTION_FEE_RATE;

/// Current value of `principal_cents` after `minutes_elapsed` whole minutes
/// at `minute_rate_ppm` (parts per million per minute; 1_000_000 ppm = 100%).
///
/// Non-positive elapsed time returns the principal unchanged.
pub fn compound_by_minutes(
    principal_cents: i64,
    minute_rate_ppm: i64,
    minutes_elapsed: i64,
) -> i64 {
    if minutes_elapsed <= 0 {
        return principal_cents;
    }
    let factor = 1.0 + minute_rate_ppm as f64 / 1_000_000.0;
    let exponent = minutes_elapsed.min(i32::MAX as i64) as i32;
    let value = principal_cents as f64 * factor.powi(exponent);
    value.floor() as i64
}

/// Whole minutes between two instants, never negative.
pub fn diff_minutes(from: NaiveDateTime, to: NaiveDateTime) -> i64 {
    ((to - from).num_milliseconds() / 60_000).max(0)
}

/// Arithmetic outcome of a redemption, before any storage mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RedemptionPlan {
    pub value_to_redeem_cents: i64,
    pub gain_part_cents: i64,
    pub fee_cents: i64,
    pub net_cents: i64,
    pub remaining_current_cents: i64,
    pub remaining_principal_cents: i64,
    pub is_full: bool,
}

/// Plans a redemption of `requested_cents` (or everything, when absent or
/// non-positive) out of a position currently worth `current_cents`.
///
/// Requests above the current value are silently capped. The fee applies
/// only to the gain proportional to the redeemed value.
pub fn plan_redemption(
    principal_cents: i64,
    current_cents: i64,
    requested_cents: Option<i64>,
) -> RedemptionPlan {
    let gain_total = (current_cents - principal_cents).max(0);

    let value_to_redeem = match requested_cents {
        Some(requested) if requested > 0 => requested.min(current_cents),
        _ => current_cents,
    };

    let proportion = if current_cents > 0 {
        value_to_redeem as f64 / current_cents as f64
    } else {
        0.0
    };

    let gain_part = (gain_total as f64 * proportion).round() as i64;
    let fee = (gain_part as f64 * REDEMPTION_FEE_RATE).round() as i64;
    let net = (value_to_redeem - fee).max(0);

    let remaining_current = (current_cents - value_to_redeem).max(0);
    let remaining_principal =
        (principal_cents - (principal_cents as f64 * proportion).round() as i64).max(0);

    RedemptionPlan {
        value_to_redeem_cents: value_to_redeem,
        gain_part_cents: gain_part,
        fee_cents: fee,
        net_cents: net,
        remaining_current_cents: remaining_current,
        remaining_principal_cents: remaining_principal,
        is_full: value_to_redeem >= current_cents,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 8, 30)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn compounds_example_vector() {
        // 800 ppm/min over 10 minutes: 1.0008^10 ~ 1.008032
        assert_eq!(compound_by_minutes(10_000, 800, 10), 10_080);
    }

    #[test]
    fn zero_minutes_returns_principal() {
        assert_eq!(compound_by_minutes(10_000, 800, 0), 10_000);
        assert_eq!(compound_by_minutes(10_000, 800, -5), 10_000);
    }

    #[test]
    fn zero_rate_is_constant() {
        for minutes in [0, 1, 60, 100_000] {
            assert_eq!(compound_by_minutes(12_345, 0, minutes), 12_345);
        }
    }

    #[test]
    fn monotonically_non_decreasing_in_minutes() {
        let mut previous = 0;
        for minutes in 0..200 {
            let value = compound_by_minutes(10_000, 2_500, minutes);
            assert!(value >= previous);
            previous = value;
        }
    }

    #[test]
    fn floor_never_rounds_up() {
        for minutes in 1..100 {
            let exact = 10_000.0 * (1.0 + 800.0 / 1_000_000.0_f64).powi(minutes);
            let value = compound_by_minutes(10_000, 800, minutes as i64);
            assert!(value as f64 <= exact);
        }
    }

    #[test]
    fn diff_minutes_truncates_and_never_goes_negative() {
        assert_eq!(diff_minutes(at(10, 0, 0), at(10, 10, 59)), 10);
        assert_eq!(diff_minutes(at(10, 0, 0), at(10, 0, 59)), 0);
        assert_eq!(diff_minutes(at(11, 0, 0), at(10, 0, 0)), 0);
    }

    #[test]
    fn full_redemption_with_fee_on_gain() {
        // gain 80, fee round(80 * 0.01) = 1, net 10_079
        let plan = plan_redemption(10_000, 10_080, None);
        assert!(plan.is_full);
        assert_eq!(plan.value_to_redeem_cents, 10_080);
        assert_eq!(plan.fee_cents, 1);
        assert_eq!(plan.net_cents, 10_079);
        assert_eq!(plan.remaining_current_cents, 0);
    }

    #[test]
    fn partial_redemption_locks_in_remaining_value() {
        // p = 5000/10080; gain part round(80 * 0.496) = 40; fee rounds to 0
        let plan = plan_redemption(10_000, 10_080, Some(5_000));
        assert!(!plan.is_full);
        assert_eq!(plan.value_to_redeem_cents, 5_000);
        assert_eq!(plan.gain_part_cents, 40);
        assert_eq!(plan.fee_cents, 0);
        assert_eq!(plan.net_cents, 5_000);
        assert_eq!(plan.remaining_current_cents, 5_080);
    }

    #[test]
    fn requests_above_current_value_are_capped() {
        let plan = plan_redemption(10_000, 10_080, Some(999_999));
        assert!(plan.is_full);
        assert_eq!(plan.value_to_redeem_cents, 10_080);
    }

    #[test]
    fn absent_or_non_positive_request_means_full() {
        assert!(plan_redemption(10_000, 10_080, Some(0)).is_full);
        assert!(plan_redemption(10_000, 10_080, Some(-10)).is_full);
        assert!(plan_redemption(10_000, 10_080, None).is_full);
    }

    #[test]
    fn zero_current_value_redeems_nothing() {
        let plan = plan_redemption(0, 0, None);
        assert!(plan.is_full);
        assert_eq!(plan.value_to_redeem_cents, 0);
        assert_eq!(plan.net_cents, 0);
    }

    #[test]
    fn partial_plus_residual_matches_pre_redemption_value() {
        // The redeemed slice and the locked-in remainder re-assemble the
        // pre-redemption current value within one cent of rounding.
        for requested in [1_000, 3_333, 5_000, 9_999] {
            let plan = plan_redemption(10_000, 10_080, Some(requested));
            let reassembled = plan.value_to_redeem_cents + plan.remaining_current_cents;
            assert!((reassembled - 10_080).abs() <= 1);
        }
    }
}
