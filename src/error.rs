//! Error kinds propagated by every fallible operation in this crate.
//!
//! Nothing here is recovered locally: a precondition failure aborts the
//! operation before any state change, and the host decides whether to
//! retry or surface the error.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AmmError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AmmError {
    #[error("fee_bps {fee_bps} exceeds the maximum of {max}")]
    InvalidFee { fee_bps: u64, max: u64 },

    #[error("fee_bps {0} is not a recognized fee tier")]
    InvalidFeeTier(u64),

    #[error("amp_factor {amp} is out of range [1, {max}]")]
    InvalidAmp { amp: u64, max: u64 },

    #[error("pool factory is paused")]
    Paused,

    #[error("pool has zero liquidity")]
    ZeroLiquidity,

    #[error("insufficient liquidity in pool")]
    InsufficientLiquidity,

    #[error("deposit ratio deviates from pool ratio beyond tolerance")]
    InvalidRatio,

    #[error("amount_in must be greater than zero")]
    ZeroAmountIn,

    #[error("shares must be greater than zero")]
    ZeroShares,

    #[error("insufficient shares: requested {requested}, available {available}")]
    InsufficientShares { requested: u64, available: u64 },

    #[error("slippage exceeded: amount_out {amount_out} below minimum {min_amount_out}")]
    SlippageExceeded { amount_out: u64, min_amount_out: u64 },

    #[error("price impact {impact_bps} bps exceeds ceiling {max_bps} bps")]
    PriceImpactTooHigh { impact_bps: u64, max_bps: u64 },

    #[error("deadline {deadline} expired: now is {now}")]
    DeadlineExpired { now: u64, deadline: u64 },

    #[error("slippage tolerance {0} bps exceeds the maximum of {1} bps")]
    InvalidSlippageTolerance(u64, u64),

    #[error("position does not belong to this pool")]
    PoolMismatch,

    #[error("a pool already exists for this token pair and fee tier")]
    PoolAlreadyExists,

    #[error("no pool registered for this token pair and fee tier")]
    PoolNotFound,

    #[error("no position registered under this id")]
    PositionNotFound,

    #[error("no fees available to claim")]
    NoFeesToClaim,
}
