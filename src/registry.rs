//! Pool registry (C6): a typed `(token_lo, token_hi, fee_bps) -> pool_id`
//! map with canonical pair ordering so `(A,B)` and `(B,A)` collide, and
//! duplicate-pool prevention.

use crate::error::{AmmError, Result};
use crate::events::Event;
use crate::ids::{OwnerId, PoolId, TokenId};
use std::collections::HashMap;

/// Canonical registry key: the two token ids in lexicographic order plus
/// the fee tier, so the same unordered pair + tier always maps to one entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PoolKey {
    pub token_lo: TokenId,
    pub token_hi: TokenId,
    pub fee_bps: u64,
}

fn make_key(a: &TokenId, b: &TokenId, fee_bps: u64) -> PoolKey {
    if a <= b {
        PoolKey { token_lo: a.clone(), token_hi: b.clone(), fee_bps }
    } else {
        PoolKey { token_lo: b.clone(), token_hi: a.clone(), fee_bps }
    }
}

#[derive(Debug, Clone)]
pub struct PoolEntry {
    pub pool_id: PoolId,
    pub fee_bps: u64,
    pub created_at: u64,
    pub creator: OwnerId,
    pub is_active: bool,
}

#[derive(Debug, Clone, Default)]
pub struct PoolRegistry {
    pools: HashMap<PoolKey, PoolEntry>,
    pub all_pools: Vec<PoolId>,
    pub active_count: u64,
    pub total_count: u64,
}

impl PoolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pool_exists(&self, a: &TokenId, b: &TokenId, fee_bps: u64) -> bool {
        self.pools.contains_key(&make_key(a, b, fee_bps))
    }

    /// Register a freshly created pool under `(A, B, fee_bps)`. Fails with
    /// `PoolAlreadyExists` if that canonical key is already taken.
    pub fn register_pool(
        &mut self,
        pool_id: PoolId,
        a: &TokenId,
        b: &TokenId,
        fee_bps: u64,
        creator: OwnerId,
        now: u64,
    ) -> Result<Event> {
        let key = make_key(a, b, fee_bps);
        if self.pools.contains_key(&key) {
            return Err(AmmError::PoolAlreadyExists);
        }

        self.pools.insert(
            key.clone(),
            PoolEntry {
                pool_id,
                fee_bps,
                created_at: now,
                creator: creator.clone(),
                is_active: true,
            },
        );
        self.all_pools.push(pool_id);
        self.total_count += 1;
        self.active_count += 1;

        Ok(Event::PoolRegistered {
            pool_id,
            token_lo: key.token_lo,
            token_hi: key.token_hi,
            fee_bps,
            creator,
        })
    }

    pub fn get_pool(&self, a: &TokenId, b: &TokenId, fee_bps: u64) -> Result<PoolId> {
        self.pools
            .get(&make_key(a, b, fee_bps))
            .map(|entry| entry.pool_id)
            .ok_or(AmmError::PoolNotFound)
    }

    pub fn try_get_pool(&self, a: &TokenId, b: &TokenId, fee_bps: u64) -> Option<PoolId> {
        self.pools.get(&make_key(a, b, fee_bps)).map(|entry| entry.pool_id)
    }

    pub fn get_entry(&self, a: &TokenId, b: &TokenId, fee_bps: u64) -> Option<&PoolEntry> {
        self.pools.get(&make_key(a, b, fee_bps))
    }

    /// Mark the pool inactive. Idempotent — deactivating twice doesn't
    /// double-decrement `active_count`.
    pub fn deactivate_pool(&mut self, a: &TokenId, b: &TokenId, fee_bps: u64) -> Result<Event> {
        let key = make_key(a, b, fee_bps);
        let entry = self.pools.get_mut(&key).ok_or(AmmError::PoolNotFound)?;
        if entry.is_active {
            entry.is_active = false;
            self.active_count -= 1;
        }
        Ok(Event::PoolDeactivated { pool_id: entry.pool_id })
    }

    /// Mark the pool active. Idempotent.
    pub fn reactivate_pool(&mut self, a: &TokenId, b: &TokenId, fee_bps: u64) -> Result<Event> {
        let key = make_key(a, b, fee_bps);
        let entry = self.pools.get_mut(&key).ok_or(AmmError::PoolNotFound)?;
        if !entry.is_active {
            entry.is_active = true;
            self.active_count += 1;
        }
        Ok(Event::PoolReactivated { pool_id: entry.pool_id })
    }
}
