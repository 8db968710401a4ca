//! Slippage, price-impact, and deadline enforcement (C2). Pure functions —
//! no pool or position state — so a router can compose them freely.

use crate::constants::{BPS_DENOMINATOR, MAX_SLIPPAGE_BPS};
use crate::error::{AmmError, Result};
use crate::math::{bps_of, div_widened, widen_mul};

/// `expected - expected * slip_bps / BPS`. Fails if `slip_bps` exceeds
/// [`MAX_SLIPPAGE_BPS`].
pub fn calculate_min_output(expected: u64, slip_bps: u64) -> Result<u64> {
    if slip_bps > MAX_SLIPPAGE_BPS {
        return Err(AmmError::InvalidSlippageTolerance(slip_bps, MAX_SLIPPAGE_BPS));
    }
    Ok(expected - bps_of(expected, slip_bps))
}

/// `expected + expected * slip_bps / BPS`. Fails if `slip_bps` exceeds
/// [`MAX_SLIPPAGE_BPS`].
pub fn calculate_max_input(expected: u64, slip_bps: u64) -> Result<u64> {
    if slip_bps > MAX_SLIPPAGE_BPS {
        return Err(AmmError::InvalidSlippageTolerance(slip_bps, MAX_SLIPPAGE_BPS));
    }
    Ok(expected + bps_of(expected, slip_bps))
}

/// Fails with `SlippageExceeded` if `actual < min`.
pub fn enforce_min_output(actual: u64, min: u64) -> Result<()> {
    if actual < min {
        return Err(AmmError::SlippageExceeded {
            amount_out: actual,
            min_amount_out: min,
        });
    }
    Ok(())
}

/// Fails with `SlippageExceeded` if `actual > max`.
pub fn enforce_max_input(actual: u64, max: u64) -> Result<()> {
    if actual > max {
        return Err(AmmError::SlippageExceeded {
            amount_out: actual,
            min_amount_out: max,
        });
    }
    Ok(())
}

/// `|rout*ain - aout*rin| * BPS / (rout*ain)`, in basis points. Returns 0
/// if either `rin` or `ain` is zero (no meaningful baseline to compare to).
pub fn calculate_price_impact(rin: u64, rout: u64, ain: u64, aout: u64) -> u64 {
    if rin == 0 || ain == 0 {
        return 0;
    }
    let fair = widen_mul(rout, ain);
    let actual = widen_mul(aout, rin);
    let diff = fair.abs_diff(actual);
    if fair == 0 {
        return 0;
    }
    div_widened(diff * BPS_DENOMINATOR as u128, fair)
}

/// Fails with `PriceImpactTooHigh` if the computed impact exceeds `max_bps`.
pub fn enforce_price_impact(rin: u64, rout: u64, ain: u64, aout: u64, max_bps: u64) -> Result<()> {
    let impact_bps = calculate_price_impact(rin, rout, ain, aout);
    if impact_bps > max_bps {
        return Err(AmmError::PriceImpactTooHigh { impact_bps, max_bps });
    }
    Ok(())
}

/// Fails with `DeadlineExpired` if `now > deadline`. `now`/`deadline` may be
/// wall-clock epoch seconds or a host-defined logical clock — the same
/// inequality holds either way.
pub fn enforce_deadline(now: u64, deadline: u64) -> Result<()> {
    if now > deadline {
        return Err(AmmError::DeadlineExpired { now, deadline });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn min_output_below_expected() {
        let min = calculate_min_output(100_000, 100).unwrap(); // 1%
        assert_eq!(min, 99_000);
        assert!(min <= 100_000);
    }

    #[test]
    fn max_input_above_expected() {
        let max = calculate_max_input(100_000, 100).unwrap();
        assert_eq!(max, 101_000);
    }

    #[test]
    fn slippage_tolerance_cap_enforced() {
        assert!(calculate_min_output(100, MAX_SLIPPAGE_BPS + 1).is_err());
        assert!(calculate_min_output(100, MAX_SLIPPAGE_BPS).is_ok());
    }

    #[test]
    fn enforce_min_output_fails_iff_below_min() {
        assert!(enforce_min_output(99, 100).is_err());
        assert!(enforce_min_output(100, 100).is_ok());
        assert!(enforce_min_output(101, 100).is_ok());
    }

    #[test]
    fn price_impact_zero_on_balanced_quote() {
        // rout/rin price matches aout/ain exactly => zero impact
        assert_eq!(calculate_price_impact(1_000, 2_000, 100, 200), 0);
    }

    #[test]
    fn price_impact_nonzero_when_skewed() {
        let impact = calculate_price_impact(1_000, 1_000, 100, 50);
        assert!(impact > 0);
    }

    #[test]
    fn deadline_expired_strictly_after() {
        assert!(enforce_deadline(100, 100).is_ok());
        assert!(enforce_deadline(101, 100).is_err());
    }
}
