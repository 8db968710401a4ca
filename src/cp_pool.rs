//! Constant-product pool (C4): reserves, LP shares, fee indices, and the
//! protocol-fee bucket, all mutated through `&mut self` methods with no
//! observable intermediate state (§5).

use crate::constants::{BPS_DENOMINATOR, CP_MAX_FEE_BPS, MINIMUM_LIQUIDITY, PROTOCOL_FEE_BPS};
use crate::error::{AmmError, Result};
use crate::events::Event;
use crate::ids::{OwnerId, PoolId};
use crate::math::{bps_of, div_widened, geometric_mean, widen_mul};

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CpPool {
    pub id: PoolId,
    pub fee_bps: u64,
    pub reserve_a: u64,
    pub reserve_b: u64,
    pub total_shares: u64,
    pub fee_index_a: u64,
    pub fee_index_b: u64,
    pub protocol_fees_a: u64,
    pub protocol_fees_b: u64,
    pub cumulative_volume_a: u64,
    pub cumulative_volume_b: u64,
    pub k_last: u128,
}

/// `(amount_out, fee_amount)`.
pub type QuoteResult = (u64, u64);

impl CpPool {
    /// Create an empty pool. Fails if `fee_bps` exceeds [`CP_MAX_FEE_BPS`].
    pub fn new_pool(fee_bps: u64) -> Result<Self> {
        if fee_bps > CP_MAX_FEE_BPS {
            return Err(AmmError::InvalidFee { fee_bps, max: CP_MAX_FEE_BPS });
        }
        Ok(Self {
            id: PoolId::new(),
            fee_bps,
            reserve_a: 0,
            reserve_b: 0,
            total_shares: 0,
            fee_index_a: 0,
            fee_index_b: 0,
            protocol_fees_a: 0,
            protocol_fees_b: 0,
            cumulative_volume_a: 0,
            cumulative_volume_b: 0,
            k_last: 0,
        })
    }

    /// Seed an empty pool. Returns the shares assigned to the caller —
    /// `geometric_mean(a, b) - MINIMUM_LIQUIDITY`, with the minimum locked
    /// forever and unassignable to any position.
    pub fn provide_initial_liquidity(&mut self, a: u64, b: u64) -> Result<(u64, Event)> {
        if self.total_shares != 0 {
            return Err(AmmError::InvalidRatio);
        }
        if a == 0 || b == 0 {
            return Err(AmmError::ZeroLiquidity);
        }
        let g = geometric_mean(a, b);
        if g <= MINIMUM_LIQUIDITY {
            return Err(AmmError::InsufficientLiquidity);
        }

        self.reserve_a = a;
        self.reserve_b = b;
        self.total_shares = g;
        self.k_last = widen_mul(a, b);

        let minted = g - MINIMUM_LIQUIDITY;
        let event = Event::LiquidityAdded {
            pool_id: self.id,
            amount_a: a,
            amount_b: b,
            shares_minted: minted,
            total_shares: self.total_shares,
        };
        Ok((minted, event))
    }

    /// Deposit `(a, b)` at (approximately) the current reserve ratio,
    /// minting shares proportional to the smaller of the two implied
    /// contributions. `tolerance_bps` bounds how far the deposit ratio may
    /// deviate from the pool ratio.
    pub fn add_liquidity(&mut self, a: u64, b: u64, tolerance_bps: u64) -> Result<(u64, Event)> {
        if self.total_shares == 0 {
            return Err(AmmError::ZeroLiquidity);
        }
        if a == 0 || b == 0 {
            return Err(AmmError::ZeroAmountIn);
        }

        let required_b = div_widened(widen_mul(a, self.reserve_b), self.reserve_a as u128);
        if required_b > 0 {
            let diff = b.abs_diff(required_b);
            let deviation_bps = div_widened(widen_mul(diff, BPS_DENOMINATOR), required_b as u128);
            if deviation_bps > tolerance_bps {
                return Err(AmmError::InvalidRatio);
            }
        }

        let shares_a = div_widened(widen_mul(a, self.total_shares), self.reserve_a as u128);
        let shares_b = div_widened(widen_mul(b, self.total_shares), self.reserve_b as u128);
        let minted = shares_a.min(shares_b);
        if minted == 0 {
            return Err(AmmError::ZeroShares);
        }

        self.reserve_a += a;
        self.reserve_b += b;
        self.total_shares += minted;
        self.k_last = widen_mul(self.reserve_a, self.reserve_b);

        let event = Event::LiquidityAdded {
            pool_id: self.id,
            amount_a: a,
            amount_b: b,
            shares_minted: minted,
            total_shares: self.total_shares,
        };
        Ok((minted, event))
    }

    /// Burn `burn` shares pro-rata. Returns `(amount_a, amount_b)`.
    pub fn remove_liquidity(&mut self, burn: u64) -> Result<((u64, u64), Event)> {
        if burn == 0 {
            return Err(AmmError::ZeroShares);
        }
        if burn > self.total_shares {
            return Err(AmmError::InsufficientShares {
                requested: burn,
                available: self.total_shares,
            });
        }
        if self.reserve_a == 0 || self.reserve_b == 0 {
            return Err(AmmError::ZeroLiquidity);
        }

        let amount_a = div_widened(widen_mul(burn, self.reserve_a), self.total_shares as u128);
        let amount_b = div_widened(widen_mul(burn, self.reserve_b), self.total_shares as u128);

        self.reserve_a -= amount_a;
        self.reserve_b -= amount_b;
        self.total_shares -= burn;
        self.k_last = if self.total_shares == 0 {
            0
        } else {
            widen_mul(self.reserve_a, self.reserve_b)
        };

        let event = Event::LiquidityRemoved {
            pool_id: self.id,
            amount_a,
            amount_b,
            shares_burned: burn,
            total_shares: self.total_shares,
        };
        Ok(((amount_a, amount_b), event))
    }

    /// Quote a swap without mutating state. `a_to_b` selects the direction:
    /// `true` means token A is the input.
    pub fn get_amount_out(&self, amount_in: u64, a_to_b: bool) -> Result<QuoteResult> {
        if amount_in == 0 {
            return Err(AmmError::ZeroAmountIn);
        }
        let (reserve_in, reserve_out) = if a_to_b {
            (self.reserve_a, self.reserve_b)
        } else {
            (self.reserve_b, self.reserve_a)
        };
        if reserve_in == 0 || reserve_out == 0 {
            return Err(AmmError::ZeroLiquidity);
        }

        let fee = bps_of(amount_in, self.fee_bps);
        let amount_in_after_fee = amount_in - fee;
        let numerator = widen_mul(amount_in_after_fee, reserve_out);
        let denominator = reserve_in as u128 + amount_in_after_fee as u128;
        let amount_out = div_widened(numerator, denominator);
        Ok((amount_out, fee))
    }

    /// Execute a swap: quote, update reserves/volume, and accrue the fee
    /// to the fee index / protocol bucket on the input side. Returns
    /// `(amount_out, fee_amount, Event)`.
    pub fn swap(&mut self, amount_in: u64, a_to_b: bool) -> Result<(u64, u64, Event)> {
        let (amount_out, fee) = self.get_amount_out(amount_in, a_to_b)?;
        Ok(self.apply_swap(amount_in, a_to_b, amount_out, fee))
    }

    /// Quote, enforce `min_amount_out`, and only then mutate state — so a
    /// slippage failure never touches the pool (§5, §7: pre-condition
    /// failures abort before any state change).
    pub fn swap_with_slippage(
        &mut self,
        amount_in: u64,
        a_to_b: bool,
        min_amount_out: u64,
    ) -> Result<(u64, u64, Event)> {
        let (amount_out, fee) = self.get_amount_out(amount_in, a_to_b)?;
        crate::slippage::enforce_min_output(amount_out, min_amount_out)?;
        Ok(self.apply_swap(amount_in, a_to_b, amount_out, fee))
    }

    fn apply_swap(&mut self, amount_in: u64, a_to_b: bool, amount_out: u64, fee: u64) -> (u64, u64, Event) {
        if a_to_b {
            self.reserve_a += amount_in;
            self.reserve_b -= amount_out;
            self.cumulative_volume_a += amount_in;
            self.accrue_fee_a(fee);
        } else {
            self.reserve_b += amount_in;
            self.reserve_a -= amount_out;
            self.cumulative_volume_b += amount_in;
            self.accrue_fee_b(fee);
        }

        let event = Event::SwapExecuted {
            pool_id: self.id,
            amount_in,
            amount_out,
            fee_amount: fee,
            a_to_b,
        };
        (amount_out, fee, event)
    }

    /// Zero and return both protocol-fee buckets. Transferring the
    /// balances out is the host's responsibility.
    pub fn withdraw_protocol_fees(&mut self) -> (u64, u64) {
        let a = std::mem::take(&mut self.protocol_fees_a);
        let b = std::mem::take(&mut self.protocol_fees_b);
        (a, b)
    }

    fn accrue_fee_a(&mut self, fee: u64) {
        if self.total_shares == 0 {
            self.protocol_fees_a += fee;
            return;
        }
        let proto = bps_of(fee, PROTOCOL_FEE_BPS);
        let lp = fee - proto;
        self.protocol_fees_a += proto;
        self.fee_index_a += div_widened(widen_mul(lp, BPS_DENOMINATOR), self.total_shares as u128);
    }

    fn accrue_fee_b(&mut self, fee: u64) {
        if self.total_shares == 0 {
            self.protocol_fees_b += fee;
            return;
        }
        let proto = bps_of(fee, PROTOCOL_FEE_BPS);
        let lp = fee - proto;
        self.protocol_fees_b += proto;
        self.fee_index_b += div_widened(widen_mul(lp, BPS_DENOMINATOR), self.total_shares as u128);
    }
}
