//! Fee distribution (C7): lazy, proportional fee claims against a pool's
//! monotone fee-index accumulators, read through a position's cursor.
//! Works identically over either pool variant via [`FeeBearingPool`].

use crate::error::{AmmError, Result};
use crate::events::Event;
use crate::ids::PoolId;
use crate::position::{calculate_pending_fees, Position};

/// What the distributor needs from a pool: its id, its current fee
/// indices, and a way to add liquidity back in during auto-compounding.
/// Implemented by both `CpPool` and `SsPool` so `claim`/`auto_compound`
/// are written once.
pub trait FeeBearingPool {
    fn id(&self) -> PoolId;
    fn fee_index_a(&self) -> u64;
    fn fee_index_b(&self) -> u64;
    /// Add liquidity back into the pool for auto-compounding.
    /// `tolerance_bps` is honored by pools that enforce a deposit-ratio
    /// check (the CP pool); ignored by pools that don't (the SS pool).
    fn add_liquidity_tolerant(&mut self, a: u64, b: u64, tolerance_bps: u64) -> Result<(u64, Event)>;
}

impl FeeBearingPool for crate::cp_pool::CpPool {
    fn id(&self) -> PoolId {
        self.id
    }
    fn fee_index_a(&self) -> u64 {
        self.fee_index_a
    }
    fn fee_index_b(&self) -> u64 {
        self.fee_index_b
    }
    fn add_liquidity_tolerant(&mut self, a: u64, b: u64, tolerance_bps: u64) -> Result<(u64, Event)> {
        self.add_liquidity(a, b, tolerance_bps)
    }
}

impl FeeBearingPool for crate::ss_pool::SsPool {
    fn id(&self) -> PoolId {
        self.id
    }
    fn fee_index_a(&self) -> u64 {
        self.fee_index_a
    }
    fn fee_index_b(&self) -> u64 {
        self.fee_index_b
    }
    fn add_liquidity_tolerant(&mut self, a: u64, b: u64, _tolerance_bps: u64) -> Result<(u64, Event)> {
        self.add_liquidity(a, b)
    }
}

/// `(pending_a, pending_b, pool_fee_index_a, pool_fee_index_b)`.
pub fn compute_claimable(pool: &impl FeeBearingPool, position: &Position) -> (u64, u64, u64, u64) {
    let idx_a = pool.fee_index_a();
    let idx_b = pool.fee_index_b();
    let (pending_a, pending_b) =
        calculate_pending_fees(position.shares, position.last_fee_index_a, position.last_fee_index_b, idx_a, idx_b);
    (pending_a, pending_b, idx_a, idx_b)
}

/// Claim pending fees into the position's `claimed_fees_*` totals and
/// advance its cursor to the pool's current indices. Atomic: a second
/// claim against the same indices yields zero.
pub fn claim(pool: &impl FeeBearingPool, position: &mut Position) -> Result<(u64, u64, Event)> {
    if position.pool_id != pool.id() {
        return Err(AmmError::PoolMismatch);
    }
    let (pending_a, pending_b, idx_a, idx_b) = compute_claimable(pool, position);
    position.update_metadata(idx_a, idx_b, pending_a, pending_b);

    let event = Event::FeesClaimed {
        position_id: position.id,
        pool_id: position.pool_id,
        amount_a: pending_a,
        amount_b: pending_b,
        auto_compounded: false,
    };
    Ok((pending_a, pending_b, event))
}

/// Claim, then fold the claimed fees back into the pool as new liquidity
/// credited to the same position. If either side is zero the add is
/// skipped (the cursor still advances via the prior claim).
pub fn auto_compound(
    pool: &mut impl FeeBearingPool,
    position: &mut Position,
    tolerance_bps: u64,
) -> Result<(u64, u64, u64, Vec<Event>)> {
    let (pending_a, pending_b, claim_event) = claim(pool, position)?;
    let mut events = vec![claim_event];

    if pending_a == 0 || pending_b == 0 {
        return Ok((0, pending_a, pending_b, events));
    }

    let (new_shares, add_event) = pool.add_liquidity_tolerant(pending_a, pending_b, tolerance_bps)?;
    position.add_shares(new_shares);
    position.update_initial_amounts(pending_a, pending_b);
    events.push(add_event);

    let compounded_event = Event::FeesCompounded {
        position_id: position.id,
        pool_id: position.pool_id,
        amount_a: pending_a,
        amount_b: pending_b,
        new_shares,
    };
    events.push(compounded_event);

    Ok((new_shares, pending_a, pending_b, events))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cp_pool::CpPool;

    fn seeded_pool(fee_bps: u64, a: u64, b: u64) -> CpPool {
        let mut pool = CpPool::new_pool(fee_bps).unwrap();
        pool.provide_initial_liquidity(a, b).unwrap();
        pool
    }

    #[test]
    fn p6_claim_is_idempotent() {
        let mut pool = seeded_pool(30, 1_000_000, 1_000_000);
        let mut position = Position::mint(pool.id, 100_000, pool.fee_index_a, pool.fee_index_b, 0, 0, 0, "lp").unwrap();

        pool.swap(100_000, true).unwrap();

        let (a1, b1, _) = claim(&pool, &mut position).unwrap();
        assert!(a1 > 0 || b1 > 0);

        let (a2, b2, _) = claim(&pool, &mut position).unwrap();
        assert_eq!((a2, b2), (0, 0));
    }

    #[test]
    fn p7_fees_proportional_to_shares() {
        let mut pool = seeded_pool(30, 1_000_000, 1_000_000);
        let mut big = Position::mint(pool.id, 900_000, pool.fee_index_a, pool.fee_index_b, 0, 0, 0, "big").unwrap();
        let mut small = Position::mint(pool.id, 100_000, pool.fee_index_a, pool.fee_index_b, 0, 0, 0, "small").unwrap();

        pool.swap(100_000, true).unwrap();

        let (big_a, _, _) = claim(&pool, &mut big).unwrap();
        let (small_a, _, _) = claim(&pool, &mut small).unwrap();
        assert!(big_a > small_a * 5);
    }

    #[test]
    fn claim_rejects_pool_mismatch() {
        let pool_a = seeded_pool(30, 1_000_000, 1_000_000);
        let pool_b = seeded_pool(30, 1_000_000, 1_000_000);
        let mut position = Position::mint(pool_a.id, 1_000, 0, 0, 0, 0, 0, "lp").unwrap();
        assert!(matches!(claim(&pool_b, &mut position), Err(AmmError::PoolMismatch)));
    }

    #[test]
    fn auto_compound_grows_shares_and_skips_when_one_sided() {
        let mut pool = seeded_pool(30, 1_000_000, 1_000_000);
        let mut position = Position::mint(pool.id, 100_000, pool.fee_index_a, pool.fee_index_b, 0, 0, 0, "lp").unwrap();

        // One-sided swap accrues only token-A fees, so compounding is skipped.
        pool.swap(100_000, true).unwrap();
        let (new_shares, pending_a, pending_b, _) = auto_compound(&mut pool, &mut position, 50).unwrap();
        assert_eq!(new_shares, 0);
        assert!(pending_a > 0);
        assert_eq!(pending_b, 0);

        // Swaps in both directions since the last claim bring both sides positive.
        pool.swap(100_000, true).unwrap();
        pool.swap(100_000, false).unwrap();
        let (new_shares, pending_a, pending_b, _) = auto_compound(&mut pool, &mut position, 5_000).unwrap();
        assert!(new_shares > 0);
        assert!(pending_a > 0 && pending_b > 0);
    }
}
