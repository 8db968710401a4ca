//! Pool factory (C8): validated creation of CP pools at a recognized fee
//! tier, plus a pause switch. SS pools don't go through a tier whitelist
//! (their `amp_factor`/`fee_bps` are validated directly by `SsPool::new_pool`)
//! but still respect the pause flag here, since pausing is a protocol-wide
//! control, not a CP-specific one.

use crate::constants::CP_FEE_TIERS;
use crate::cp_pool::CpPool;
use crate::error::{AmmError, Result};
use crate::events::Event;
use crate::ids::OwnerId;
use crate::ss_pool::SsPool;

/// Overridable factory policy: the set of CP fee tiers a host recognizes,
/// and where protocol fees are swept to.
#[derive(Debug, Clone)]
pub struct FactoryConfig {
    pub recognized_cp_fee_tiers: Vec<u64>,
    pub fee_recipient: OwnerId,
}

impl Default for FactoryConfig {
    fn default() -> Self {
        Self {
            recognized_cp_fee_tiers: CP_FEE_TIERS.to_vec(),
            fee_recipient: OwnerId::new("protocol"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PoolFactory {
    pub config: FactoryConfig,
    pub pools_created: u64,
    pub paused: bool,
}

impl PoolFactory {
    pub fn new(config: FactoryConfig) -> Self {
        Self { config, pools_created: 0, paused: false }
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn unpause(&mut self) {
        self.paused = false;
    }

    /// Create an empty CP pool at `fee_bps`. Fails `Paused` if the factory
    /// is paused, `InvalidFeeTier` if `fee_bps` isn't in the recognized set.
    /// Returns the pool alongside the `PoolCreated` event, indexed by the
    /// factory's running creation count.
    pub fn create_cp_pool(&mut self, fee_bps: u64, creator: OwnerId) -> Result<(CpPool, Event)> {
        if self.paused {
            return Err(AmmError::Paused);
        }
        if !self.config.recognized_cp_fee_tiers.contains(&fee_bps) {
            return Err(AmmError::InvalidFeeTier(fee_bps));
        }
        let pool = CpPool::new_pool(fee_bps)?;
        let pool_index = self.pools_created;
        self.pools_created += 1;
        let event = Event::PoolCreated { pool_id: pool.id, fee_bps, pool_index, creator };
        Ok((pool, event))
    }

    /// Create an empty SS pool at `(amp_factor, fee_bps)`. Tier validation
    /// is delegated to `SsPool::new_pool`; only the pause flag is checked here.
    pub fn create_ss_pool(&mut self, amp_factor: u64, fee_bps: u64, creator: OwnerId) -> Result<(SsPool, Event)> {
        if self.paused {
            return Err(AmmError::Paused);
        }
        let pool = SsPool::new_pool(amp_factor, fee_bps)?;
        let pool_index = self.pools_created;
        self.pools_created += 1;
        let event = Event::PoolCreated { pool_id: pool.id, fee_bps, pool_index, creator };
        Ok((pool, event))
    }
}
