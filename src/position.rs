//! LP position (C3): an owned object bound to one pool, holding shares and
//! the fee-index cursors the distributor (C7) reads against. Only the
//! operations here mutate a `Position` — callers in C4/C5/C7/C9 go through
//! them rather than poking fields directly.

use crate::constants::BPS_DENOMINATOR;
use crate::error::{AmmError, Result};
use crate::ids::{PoolId, PositionId};
use crate::math::{div_widened, widen_mul};

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Position {
    pub id: PositionId,
    pub pool_id: PoolId,
    pub shares: u64,
    pub last_fee_index_a: u64,
    pub last_fee_index_b: u64,
    pub claimed_fees_a: u64,
    pub claimed_fees_b: u64,
    pub initial_amount_a: u64,
    pub initial_amount_b: u64,
    pub created_at: u64,
    pub name: String,
}

impl Position {
    /// Mint a new position bound to `pool_id`, observing the pool's current
    /// fee indices as its starting cursor so it doesn't retroactively claim
    /// fees accrued before it existed.
    pub fn mint(
        pool_id: PoolId,
        shares: u64,
        fee_index_a: u64,
        fee_index_b: u64,
        initial_amount_a: u64,
        initial_amount_b: u64,
        created_at: u64,
        name: impl Into<String>,
    ) -> Result<Self> {
        if shares == 0 {
            return Err(AmmError::ZeroShares);
        }
        Ok(Self {
            id: PositionId::new(),
            pool_id,
            shares,
            last_fee_index_a: fee_index_a,
            last_fee_index_b: fee_index_b,
            claimed_fees_a: 0,
            claimed_fees_b: 0,
            initial_amount_a,
            initial_amount_b,
            created_at,
            name: name.into(),
        })
    }

    /// Burn the position. Permitted even with `shares == 0` (the common
    /// case after a full withdrawal); the caller drops the value afterward.
    pub fn burn(self) -> (PositionId, PoolId, u64) {
        (self.id, self.pool_id, self.shares)
    }

    pub fn add_shares(&mut self, delta: u64) {
        self.shares += delta;
    }

    pub fn reduce_shares(&mut self, delta: u64) -> Result<()> {
        if delta > self.shares {
            return Err(AmmError::InsufficientShares {
                requested: delta,
                available: self.shares,
            });
        }
        self.shares -= delta;
        Ok(())
    }

    /// Advance the fee-index cursor and accumulate claimed totals. Called
    /// only by the fee distributor (C7) as part of an atomic claim.
    pub fn update_metadata(
        &mut self,
        new_idx_a: u64,
        new_idx_b: u64,
        delta_claimed_a: u64,
        delta_claimed_b: u64,
    ) {
        self.last_fee_index_a = new_idx_a;
        self.last_fee_index_b = new_idx_b;
        self.claimed_fees_a += delta_claimed_a;
        self.claimed_fees_b += delta_claimed_b;
    }

    /// Additive: each liquidity addition (including auto-compounding)
    /// grows the initial-deposit totals used by the impermanent-loss display.
    pub fn update_initial_amounts(&mut self, delta_a: u64, delta_b: u64) {
        self.initial_amount_a += delta_a;
        self.initial_amount_b += delta_b;
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }
}

/// `(shares*reserve_a/total_shares, shares*reserve_b/total_shares)`, widened.
/// Returns `(0, 0)` if the pool has no shares outstanding.
pub fn calculate_position_value(
    shares: u64,
    reserve_a: u64,
    reserve_b: u64,
    total_shares: u64,
) -> (u64, u64) {
    if total_shares == 0 {
        return (0, 0);
    }
    let value_a = div_widened(widen_mul(shares, reserve_a), total_shares as u128);
    let value_b = div_widened(widen_mul(shares, reserve_b), total_shares as u128);
    (value_a, value_b)
}

/// `((cur_idx_a - last_a)*shares/BPS, (cur_idx_b - last_b)*shares/BPS)`.
/// Deltas are always non-negative since fee indices are monotone (I1).
pub fn calculate_pending_fees(
    shares: u64,
    last_fee_index_a: u64,
    last_fee_index_b: u64,
    cur_idx_a: u64,
    cur_idx_b: u64,
) -> (u64, u64) {
    let delta_a = cur_idx_a.saturating_sub(last_fee_index_a);
    let delta_b = cur_idx_b.saturating_sub(last_fee_index_b);
    let pending_a = div_widened(widen_mul(delta_a, shares), BPS_DENOMINATOR as u128);
    let pending_b = div_widened(widen_mul(delta_b, shares), BPS_DENOMINATOR as u128);
    (pending_a, pending_b)
}

/// The simplified, sum-of-balances impermanent-loss measure (§9 Q1): it
/// compares `value_a + value_b` against `initial_a + initial_b` as bare
/// token-unit sums, not a price-normalized quantity. Returns
/// `(magnitude_bps, is_loss)`.
pub fn calculate_impermanent_loss(
    value_a: u64,
    value_b: u64,
    initial_a: u64,
    initial_b: u64,
) -> (u64, bool) {
    let hodl = initial_a + initial_b;
    let lp = value_a + value_b;
    if hodl == 0 {
        return (0, false);
    }
    if lp >= hodl {
        let gain_bps = div_widened(widen_mul(lp - hodl, BPS_DENOMINATOR), hodl as u128);
        (gain_bps, false)
    } else {
        let loss_bps = div_widened(widen_mul(hodl - lp, BPS_DENOMINATOR), hodl as u128);
        (loss_bps, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool_id() -> PoolId {
        PoolId::new()
    }

    #[test]
    fn mint_rejects_zero_shares() {
        assert!(Position::mint(pool_id(), 0, 0, 0, 0, 0, 0, "lp").is_err());
    }

    #[test]
    fn reduce_shares_rejects_overdraw() {
        let mut p = Position::mint(pool_id(), 100, 0, 0, 0, 0, 0, "lp").unwrap();
        assert!(p.reduce_shares(101).is_err());
        assert!(p.reduce_shares(100).is_ok());
        assert_eq!(p.shares, 0);
    }

    #[test]
    fn pending_fees_zero_right_after_mint() {
        let p = Position::mint(pool_id(), 500, 200, 300, 0, 0, 0, "lp").unwrap();
        let (a, b) = calculate_pending_fees(p.shares, p.last_fee_index_a, p.last_fee_index_b, 200, 300);
        assert_eq!((a, b), (0, 0));
    }

    #[test]
    fn position_value_zero_shares_outstanding() {
        assert_eq!(calculate_position_value(100, 1000, 1000, 0), (0, 0));
    }

    #[test]
    fn impermanent_loss_flags_gain_and_loss() {
        let (bps, is_loss) = calculate_impermanent_loss(600, 600, 500, 500);
        assert!(!is_loss);
        assert_eq!(bps, 2_000); // (1200-1000)*10000/1000

        let (bps, is_loss) = calculate_impermanent_loss(400, 400, 500, 500);
        assert!(is_loss);
        assert_eq!(bps, 2_000);
    }
}
