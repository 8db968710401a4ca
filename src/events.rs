//! Events raised at successful state transitions. Pool and router methods
//! that mutate state return the `Event`(s) they raised alongside their
//! primary result, and log them at `debug!`/`info!` — the crate does not
//! own an event bus, a host wires one up if it wants one.

use crate::ids::{OwnerId, PoolId, PositionId, TokenId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    PoolCreated {
        pool_id: PoolId,
        fee_bps: u64,
        pool_index: u64,
        creator: OwnerId,
    },
    LiquidityAdded {
        pool_id: PoolId,
        amount_a: u64,
        amount_b: u64,
        shares_minted: u64,
        total_shares: u64,
    },
    LiquidityRemoved {
        pool_id: PoolId,
        amount_a: u64,
        amount_b: u64,
        shares_burned: u64,
        total_shares: u64,
    },
    SwapExecuted {
        pool_id: PoolId,
        amount_in: u64,
        amount_out: u64,
        fee_amount: u64,
        a_to_b: bool,
    },
    PositionMinted {
        position_id: PositionId,
        pool_id: PoolId,
        lp_shares: u64,
        owner: OwnerId,
    },
    PositionBurned {
        position_id: PositionId,
        pool_id: PoolId,
        final_shares: u64,
    },
    FeesClaimed {
        position_id: PositionId,
        pool_id: PoolId,
        amount_a: u64,
        amount_b: u64,
        auto_compounded: bool,
    },
    FeesCompounded {
        position_id: PositionId,
        pool_id: PoolId,
        amount_a: u64,
        amount_b: u64,
        new_shares: u64,
    },
    SharesUpdated {
        position_id: PositionId,
        old_shares: u64,
        new_shares: u64,
    },
    PoolRegistered {
        pool_id: PoolId,
        token_lo: TokenId,
        fee_bps: u64,
        token_hi: TokenId,
        creator: OwnerId,
    },
    PoolDeactivated {
        pool_id: PoolId,
    },
    PoolReactivated {
        pool_id: PoolId,
    },
}

impl Event {
    /// Emit this event through the `log` facade at the appropriate level.
    /// Called by every pool/router method right after the event is produced.
    pub fn log(&self) {
        match self {
            Event::PoolCreated { pool_id, .. } | Event::PoolRegistered { pool_id, .. } => {
                log::info!("{self:?} pool={pool_id}");
            }
            Event::SwapExecuted { pool_id, .. } => {
                log::debug!("{self:?} pool={pool_id}");
            }
            Event::PoolDeactivated { pool_id } | Event::PoolReactivated { pool_id } => {
                log::warn!("{self:?} pool={pool_id}");
            }
            _ => log::debug!("{self:?}"),
        }
    }
}
