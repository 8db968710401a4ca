//! Router (C9): composes the registry, factory, pools, positions, and fee
//! distributor into the user-level workflows a host actually calls. No
//! component below this one calls back up into it (§2's dependency order).

use crate::constants::{DEFAULT_PRICE_IMPACT_BPS, DEFAULT_TOLERANCE_BPS};
use crate::cp_pool::CpPool;
use crate::error::{AmmError, Result};
use crate::events::Event;
use crate::factory::{FactoryConfig, PoolFactory};
use crate::fee_distributor::{self, FeeBearingPool};
use crate::ids::{OwnerId, PoolId, PositionId, TokenId};
use crate::position::Position;
use crate::registry::PoolRegistry;
use crate::ss_pool::SsPool;
use std::collections::HashMap;

/// Either pool variant, behind one handle so the router doesn't need to
/// carry two parallel maps.
#[derive(Debug, Clone)]
pub enum AmmPool {
    ConstantProduct(CpPool),
    StableSwap(SsPool),
}

impl AmmPool {
    pub fn id(&self) -> PoolId {
        match self {
            AmmPool::ConstantProduct(p) => p.id,
            AmmPool::StableSwap(p) => p.id,
        }
    }

    pub fn provide_initial_liquidity(&mut self, a: u64, b: u64) -> Result<(u64, Event)> {
        match self {
            AmmPool::ConstantProduct(p) => p.provide_initial_liquidity(a, b),
            AmmPool::StableSwap(p) => p.provide_initial_liquidity(a, b),
        }
    }

    pub fn add_liquidity(&mut self, a: u64, b: u64, tolerance_bps: u64) -> Result<(u64, Event)> {
        self.add_liquidity_tolerant(a, b, tolerance_bps)
    }

    pub fn remove_liquidity(&mut self, burn: u64) -> Result<((u64, u64), Event)> {
        match self {
            AmmPool::ConstantProduct(p) => p.remove_liquidity(burn),
            AmmPool::StableSwap(p) => p.remove_liquidity(burn),
        }
    }

    pub fn get_amount_out(&self, amount_in: u64, a_to_b: bool) -> Result<(u64, u64)> {
        match self {
            AmmPool::ConstantProduct(p) => p.get_amount_out(amount_in, a_to_b),
            AmmPool::StableSwap(p) => p.get_amount_out(amount_in, a_to_b),
        }
    }

    pub fn swap_with_slippage(&mut self, amount_in: u64, a_to_b: bool, min_out: u64) -> Result<(u64, u64, Event)> {
        match self {
            AmmPool::ConstantProduct(p) => p.swap_with_slippage(amount_in, a_to_b, min_out),
            AmmPool::StableSwap(p) => p.swap_with_slippage(amount_in, a_to_b, min_out),
        }
    }

    pub fn total_shares(&self) -> u64 {
        match self {
            AmmPool::ConstantProduct(p) => p.total_shares,
            AmmPool::StableSwap(p) => p.total_shares,
        }
    }

    pub fn reserves(&self) -> (u64, u64) {
        match self {
            AmmPool::ConstantProduct(p) => (p.reserve_a, p.reserve_b),
            AmmPool::StableSwap(p) => (p.reserve_a, p.reserve_b),
        }
    }

    /// Zero and return both protocol-fee buckets, whichever variant this is.
    pub fn withdraw_protocol_fees(&mut self) -> (u64, u64) {
        match self {
            AmmPool::ConstantProduct(p) => p.withdraw_protocol_fees(),
            AmmPool::StableSwap(p) => p.withdraw_protocol_fees(),
        }
    }
}

impl FeeBearingPool for AmmPool {
    fn id(&self) -> PoolId {
        AmmPool::id(self)
    }
    fn fee_index_a(&self) -> u64 {
        match self {
            AmmPool::ConstantProduct(p) => p.fee_index_a,
            AmmPool::StableSwap(p) => p.fee_index_a,
        }
    }
    fn fee_index_b(&self) -> u64 {
        match self {
            AmmPool::ConstantProduct(p) => p.fee_index_b,
            AmmPool::StableSwap(p) => p.fee_index_b,
        }
    }
    fn add_liquidity_tolerant(&mut self, a: u64, b: u64, tolerance_bps: u64) -> Result<(u64, Event)> {
        match self {
            AmmPool::ConstantProduct(p) => p.add_liquidity(a, b, tolerance_bps),
            AmmPool::StableSwap(p) => p.add_liquidity(a, b),
        }
    }
}

/// Overridable router policy: defaults applied when a caller doesn't
/// supply its own tolerance/impact ceiling.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    pub default_tolerance_bps: u64,
    pub default_price_impact_bps: u64,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            default_tolerance_bps: DEFAULT_TOLERANCE_BPS,
            default_price_impact_bps: DEFAULT_PRICE_IMPACT_BPS,
        }
    }
}

pub struct Router {
    pub config: RouterConfig,
    pub registry: PoolRegistry,
    pub factory: PoolFactory,
    pools: HashMap<PoolId, AmmPool>,
    positions: HashMap<PositionId, Position>,
}

impl Router {
    pub fn new(config: RouterConfig, factory_config: FactoryConfig) -> Self {
        Self {
            config,
            registry: PoolRegistry::new(),
            factory: PoolFactory::new(factory_config),
            pools: HashMap::new(),
            positions: HashMap::new(),
        }
    }

    pub fn pool(&self, pool_id: PoolId) -> Result<&AmmPool> {
        self.pools.get(&pool_id).ok_or(AmmError::PoolNotFound)
    }

    pub fn position(&self, position_id: PositionId) -> Result<&Position> {
        self.positions.get(&position_id).ok_or(AmmError::PositionNotFound)
    }

    /// Create a CP pool at `fee_bps` for `(token_a, token_b)`, seed it with
    /// `(amount_a, amount_b)`, mint a position for `creator` holding the
    /// resulting shares, and only then register it — so a seeding failure
    /// never leaves a registry entry pointing at a dead pool.
    pub fn create_pool_full(
        &mut self,
        token_a: TokenId,
        token_b: TokenId,
        fee_bps: u64,
        amount_a: u64,
        amount_b: u64,
        creator: OwnerId,
        now: u64,
    ) -> Result<(PoolId, PositionId, Vec<Event>)> {
        if self.registry.pool_exists(&token_a, &token_b, fee_bps) {
            return Err(AmmError::PoolAlreadyExists);
        }

        let (cp_pool, created_event) = self.factory.create_cp_pool(fee_bps, creator.clone())?;
        let pool_id = cp_pool.id;
        let mut pool = AmmPool::ConstantProduct(cp_pool);

        let (shares, seed_event) = pool.provide_initial_liquidity(amount_a, amount_b)?;
        let position = Position::mint(pool_id, shares, 0, 0, amount_a, amount_b, now, creator.to_string())?;
        let position_id = position.id;

        let register_event =
            self.registry.register_pool(pool_id, &token_a, &token_b, fee_bps, creator.clone(), now)?;

        self.pools.insert(pool_id, pool);
        self.positions.insert(position_id, position);

        let events = vec![
            created_event,
            register_event,
            seed_event,
            Event::PositionMinted { position_id, pool_id, lp_shares: shares, owner: creator },
        ];
        for event in &events {
            event.log();
        }
        Ok((pool_id, position_id, events))
    }

    /// Add liquidity to an existing pool and mint a fresh position for it.
    pub fn add_liquidity_new_position(
        &mut self,
        pool_id: PoolId,
        amount_a: u64,
        amount_b: u64,
        owner: OwnerId,
        now: u64,
    ) -> Result<(PositionId, u64, Vec<Event>)> {
        let pool = self.pools.get_mut(&pool_id).ok_or(AmmError::PoolNotFound)?;
        let (shares, add_event) = pool.add_liquidity(amount_a, amount_b, self.config.default_tolerance_bps)?;
        let fee_index_a = pool.fee_index_a();
        let fee_index_b = pool.fee_index_b();

        let position =
            Position::mint(pool_id, shares, fee_index_a, fee_index_b, amount_a, amount_b, now, owner.to_string())?;
        let position_id = position.id;
        let mint_event = Event::PositionMinted { position_id, pool_id, lp_shares: shares, owner };

        self.positions.insert(position_id, position);
        let events = vec![add_event, mint_event];
        for event in &events {
            event.log();
        }
        Ok((position_id, shares, events))
    }

    /// Add liquidity to a pool and credit an already-minted position.
    /// Fails `PoolMismatch` if `position_id` isn't bound to `pool_id` —
    /// checked before the pool is touched. `position` and `pool` are
    /// disjoint fields of `self`, so both can be held mutably across the
    /// whole call without a second, panicking re-fetch.
    pub fn add_liquidity_existing_position(
        &mut self,
        pool_id: PoolId,
        position_id: PositionId,
        amount_a: u64,
        amount_b: u64,
    ) -> Result<(u64, Vec<Event>)> {
        let position = self.positions.get_mut(&position_id).ok_or(AmmError::PositionNotFound)?;
        if position.pool_id != pool_id {
            return Err(AmmError::PoolMismatch);
        }

        let pool = self.pools.get_mut(&pool_id).ok_or(AmmError::PoolNotFound)?;
        let (shares, add_event) = pool.add_liquidity(amount_a, amount_b, self.config.default_tolerance_bps)?;

        let old_shares = position.shares;
        position.add_shares(shares);
        position.update_initial_amounts(amount_a, amount_b);

        let events = vec![
            add_event,
            Event::SharesUpdated { position_id, old_shares, new_shares: position.shares },
        ];
        for event in &events {
            event.log();
        }
        Ok((shares, events))
    }

    /// Burn `shares` worth of a position's liquidity out of its pool,
    /// keeping the position alive with whatever shares remain. `position`
    /// is held mutably for the whole call (disjoint from `pool`), and is
    /// only reduced after `pool.remove_liquidity` succeeds.
    pub fn remove_liquidity_partial(
        &mut self,
        position_id: PositionId,
        shares: u64,
    ) -> Result<((u64, u64), Vec<Event>)> {
        let position = self.positions.get_mut(&position_id).ok_or(AmmError::PositionNotFound)?;
        if shares > position.shares {
            return Err(AmmError::InsufficientShares { requested: shares, available: position.shares });
        }
        let pool_id = position.pool_id;

        let pool = self.pools.get_mut(&pool_id).ok_or(AmmError::PoolNotFound)?;
        let ((amount_a, amount_b), remove_event) = pool.remove_liquidity(shares)?;
        position.reduce_shares(shares)?;

        let events = vec![remove_event];
        for event in &events {
            event.log();
        }
        Ok(((amount_a, amount_b), events))
    }

    /// Remove all of a position's liquidity, enforce a minimum payout on
    /// each side, and burn the position.
    pub fn remove_all_and_burn(
        &mut self,
        position_id: PositionId,
        min_amount_a: u64,
        min_amount_b: u64,
    ) -> Result<((u64, u64), Vec<Event>)> {
        let position = self.positions.remove(&position_id).ok_or(AmmError::PositionNotFound)?;
        let pool_id = position.pool_id;
        let shares = position.shares;

        let pool = self.pools.get_mut(&pool_id).ok_or(AmmError::PoolNotFound)?;
        let (reserve_a, reserve_b) = pool.reserves();
        let (value_a, value_b) = crate::position::calculate_position_value(shares, reserve_a, reserve_b, pool.total_shares());
        if value_a < min_amount_a || value_b < min_amount_b {
            // Put the position back; the precondition failed before any mutation.
            self.positions.insert(position_id, position);
            return Err(AmmError::SlippageExceeded { amount_out: value_a, min_amount_out: min_amount_a });
        }

        let ((amount_a, amount_b), remove_event) = pool.remove_liquidity(shares)?;
        let (_, _, final_shares) = position.burn();

        let events = vec![remove_event, Event::PositionBurned { position_id, pool_id, final_shares }];
        for event in &events {
            event.log();
        }
        Ok(((amount_a, amount_b), events))
    }

    /// Quote a swap, derive a minimum output from `slip_bps`, enforce it,
    /// and execute — all before any reserve mutation.
    pub fn swap_auto_slippage(
        &mut self,
        pool_id: PoolId,
        amount_in: u64,
        a_to_b: bool,
        slip_bps: u64,
    ) -> Result<(u64, u64, Vec<Event>)> {
        let pool = self.pools.get_mut(&pool_id).ok_or(AmmError::PoolNotFound)?;
        let (quoted_out, _) = pool.get_amount_out(amount_in, a_to_b)?;
        let min_out = crate::slippage::calculate_min_output(quoted_out, slip_bps)?;
        let (amount_out, fee, swap_event) = pool.swap_with_slippage(amount_in, a_to_b, min_out)?;

        let events = vec![swap_event];
        for event in &events {
            event.log();
        }
        Ok((amount_out, fee, events))
    }

    pub fn claim_fees_for_position(&mut self, position_id: PositionId) -> Result<(u64, u64, Vec<Event>)> {
        let position = self.positions.get_mut(&position_id).ok_or(AmmError::PositionNotFound)?;
        let pool = self.pools.get(&position.pool_id).ok_or(AmmError::PoolNotFound)?;
        let (amount_a, amount_b, event) = fee_distributor::claim(pool, position)?;
        event.log();
        Ok((amount_a, amount_b, vec![event]))
    }

    pub fn claim_and_compound(&mut self, position_id: PositionId) -> Result<(u64, u64, u64, Vec<Event>)> {
        let position = self.positions.get_mut(&position_id).ok_or(AmmError::PositionNotFound)?;
        let pool = self.pools.get_mut(&position.pool_id).ok_or(AmmError::PoolNotFound)?;
        let (new_shares, amount_a, amount_b, events) =
            fee_distributor::auto_compound(pool, position, self.config.default_tolerance_bps)?;
        for event in &events {
            event.log();
        }
        Ok((new_shares, amount_a, amount_b, events))
    }

    /// Sweep a pool's accrued protocol-fee buckets to the factory's
    /// configured `fee_recipient`. Zeros both buckets on the pool; moving
    /// the swept balances to the recipient is the host's responsibility.
    pub fn withdraw_protocol_fees(&mut self, pool_id: PoolId) -> Result<(OwnerId, u64, u64)> {
        let pool = self.pools.get_mut(&pool_id).ok_or(AmmError::PoolNotFound)?;
        let (amount_a, amount_b) = pool.withdraw_protocol_fees();
        Ok((self.factory.config.fee_recipient.clone(), amount_a, amount_b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn router() -> Router {
        Router::new(RouterConfig::default(), FactoryConfig::default())
    }

    #[test]
    fn create_pool_full_registers_seeds_and_mints() {
        let mut r = router();
        let (pool_id, position_id, _) = r
            .create_pool_full(
                TokenId::new("USDC"),
                TokenId::new("ETH"),
                30,
                1_000_000,
                1_000_000,
                OwnerId::new("alice"),
                0,
            )
            .unwrap();
        assert!(r.registry.pool_exists(&TokenId::new("USDC"), &TokenId::new("ETH"), 30));
        assert_eq!(r.position(position_id).unwrap().pool_id, pool_id);
        assert!(r.pool(pool_id).unwrap().total_shares() > 0);
    }

    #[test]
    fn create_pool_full_rejects_duplicate() {
        let mut r = router();
        r.create_pool_full(TokenId::new("A"), TokenId::new("B"), 30, 1_000, 1_000, OwnerId::new("x"), 0)
            .unwrap();
        assert!(r
            .create_pool_full(TokenId::new("B"), TokenId::new("A"), 30, 1_000, 1_000, OwnerId::new("y"), 0)
            .is_err());
    }

    #[test]
    fn swap_then_claim_end_to_end() {
        let mut r = router();
        let (pool_id, position_id, _) = r
            .create_pool_full(
                TokenId::new("USDC"),
                TokenId::new("ETH"),
                30,
                1_000_000,
                1_000_000,
                OwnerId::new("alice"),
                0,
            )
            .unwrap();

        r.swap_auto_slippage(pool_id, 100_000, true, 100).unwrap();
        let (amount_a, _amount_b, _) = r.claim_fees_for_position(position_id).unwrap();
        assert!(amount_a > 0);
    }

    #[test]
    fn remove_all_and_burn_enforces_min_out() {
        let mut r = router();
        let (_, position_id, _) = r
            .create_pool_full(TokenId::new("A"), TokenId::new("B"), 30, 1_000_000, 1_000_000, OwnerId::new("x"), 0)
            .unwrap();
        assert!(r.remove_all_and_burn(position_id, u64::MAX, 0).is_err());
        // Position must still exist after the failed attempt.
        assert!(r.position(position_id).is_ok());
        assert!(r.remove_all_and_burn(position_id, 0, 0).is_ok());
        assert!(r.position(position_id).is_err());
    }

    #[test]
    fn add_liquidity_existing_position_requires_pool_match() {
        let mut r = router();
        let (pool_a, position_id, _) = r
            .create_pool_full(TokenId::new("A"), TokenId::new("B"), 30, 1_000_000, 1_000_000, OwnerId::new("x"), 0)
            .unwrap();
        let (pool_b, _, _) = r
            .create_pool_full(TokenId::new("C"), TokenId::new("D"), 30, 1_000_000, 1_000_000, OwnerId::new("y"), 0)
            .unwrap();

        assert!(r.add_liquidity_existing_position(pool_b, position_id, 1_000, 1_000).is_err());
        assert!(r.add_liquidity_existing_position(pool_a, position_id, 1_000, 1_000).is_ok());
    }

    #[test]
    fn withdraw_protocol_fees_sweeps_to_configured_recipient_and_drains_once() {
        let mut r = router();
        let (pool_id, _, _) = r
            .create_pool_full(
                TokenId::new("USDC"),
                TokenId::new("ETH"),
                30,
                1_000_000,
                1_000_000,
                OwnerId::new("alice"),
                0,
            )
            .unwrap();

        r.swap_auto_slippage(pool_id, 100_000, true, 100).unwrap();

        let (recipient, amount_a, amount_b) = r.withdraw_protocol_fees(pool_id).unwrap();
        assert_eq!(recipient, r.factory.config.fee_recipient);
        assert!(amount_a > 0);
        assert_eq!(amount_b, 0);

        let (_, amount_a_again, amount_b_again) = r.withdraw_protocol_fees(pool_id).unwrap();
        assert_eq!(amount_a_again, 0);
        assert_eq!(amount_b_again, 0);
    }
}
