//! Stable-swap pool (C5): same fee-index discipline as the CP pool, but
//! quoted via a simplified blend between constant-sum and constant-product
//! governed by the amplification factor — not Curve's full D-invariant
//! solver (§9 Q3; this blend is the contract, do not substitute a solver).

use crate::constants::{BPS_DENOMINATOR, PROTOCOL_FEE_BPS, SS_MAX_AMP, SS_MAX_FEE_BPS};
use crate::error::{AmmError, Result};
use crate::events::Event;
use crate::ids::PoolId;
use crate::math::{bps_of, div_widened, widen_mul};

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SsPool {
    pub id: PoolId,
    pub fee_bps: u64,
    pub amp_factor: u64,
    pub reserve_a: u64,
    pub reserve_b: u64,
    pub total_shares: u64,
    pub fee_index_a: u64,
    pub fee_index_b: u64,
    pub protocol_fees_a: u64,
    pub protocol_fees_b: u64,
    pub cumulative_volume_a: u64,
    pub cumulative_volume_b: u64,
}

impl SsPool {
    /// Create an empty pool. Fails if `amp_factor` is out of `[1, SS_MAX_AMP]`
    /// or `fee_bps` exceeds [`SS_MAX_FEE_BPS`].
    pub fn new_pool(amp_factor: u64, fee_bps: u64) -> Result<Self> {
        if amp_factor < 1 || amp_factor > SS_MAX_AMP {
            return Err(AmmError::InvalidAmp { amp: amp_factor, max: SS_MAX_AMP });
        }
        if fee_bps > SS_MAX_FEE_BPS {
            return Err(AmmError::InvalidFee { fee_bps, max: SS_MAX_FEE_BPS });
        }
        Ok(Self {
            id: PoolId::new(),
            fee_bps,
            amp_factor,
            reserve_a: 0,
            reserve_b: 0,
            total_shares: 0,
            fee_index_a: 0,
            fee_index_b: 0,
            protocol_fees_a: 0,
            protocol_fees_b: 0,
            cumulative_volume_a: 0,
            cumulative_volume_b: 0,
        })
    }

    /// Seed the pool. Shares = `a + b` (no geometric mean here — a stable
    /// pool's two sides are assumed near-parity by design).
    pub fn provide_initial_liquidity(&mut self, a: u64, b: u64) -> Result<(u64, Event)> {
        if self.total_shares != 0 {
            return Err(AmmError::InvalidRatio);
        }
        if a == 0 || b == 0 {
            return Err(AmmError::ZeroLiquidity);
        }
        self.reserve_a = a;
        self.reserve_b = b;
        self.total_shares = a + b;

        let event = Event::LiquidityAdded {
            pool_id: self.id,
            amount_a: a,
            amount_b: b,
            shares_minted: self.total_shares,
            total_shares: self.total_shares,
        };
        Ok((self.total_shares, event))
    }

    /// Deposit `(a, b)`; at least one side must be non-zero. Single-sided
    /// deposits are accepted. Shares = `(a+b)*total_shares/(reserve_a+reserve_b)`.
    pub fn add_liquidity(&mut self, a: u64, b: u64) -> Result<(u64, Event)> {
        if self.total_shares == 0 {
            return Err(AmmError::ZeroLiquidity);
        }
        if a == 0 && b == 0 {
            return Err(AmmError::ZeroAmountIn);
        }

        let reserve_sum = self.reserve_a as u128 + self.reserve_b as u128;
        let minted = div_widened(widen_mul(a + b, self.total_shares), reserve_sum);
        if minted == 0 {
            return Err(AmmError::ZeroShares);
        }

        self.reserve_a += a;
        self.reserve_b += b;
        self.total_shares += minted;

        let event = Event::LiquidityAdded {
            pool_id: self.id,
            amount_a: a,
            amount_b: b,
            shares_minted: minted,
            total_shares: self.total_shares,
        };
        Ok((minted, event))
    }

    /// Burn `burn` shares pro-rata on the sum of reserves — identical
    /// formulas to the CP pool's remove.
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

        let event = Event::LiquidityRemoved {
            pool_id: self.id,
            amount_a,
            amount_b,
            shares_burned: burn,
            total_shares: self.total_shares,
        };
        Ok(((amount_a, amount_b), event))
    }

    /// Quote a swap. Blends a constant-sum component and a constant-product
    /// component weighted by `amp_factor / (amp_factor + 1)`, truncated so
    /// the output never exceeds `reserve_out`.
    pub fn get_amount_out(&self, amount_in: u64, a_to_b: bool) -> Result<(u64, u64)> {
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
        let a_prime = amount_in - fee;

        let new_in = reserve_in as u128 + a_prime as u128;
        let cp_term = div_widened(widen_mul(reserve_in, reserve_out), new_in);
        let out_cp = (reserve_out as u128).saturating_sub(cp_term as u128) as u64;

        let out_cs = a_prime.min(reserve_out);

        let amp = self.amp_factor as u128;
        let denom = amp + 1;
        let blended = (widen_mul(out_cs, self.amp_factor) + out_cp as u128) / denom;
        let amount_out = (blended as u64).min(reserve_out);

        Ok((amount_out, fee))
    }

    /// Execute a swap: quote, update reserves/volume, and accrue the fee
    /// identically to the CP pool (10% protocol share).
    pub fn swap(&mut self, amount_in: u64, a_to_b: bool) -> Result<(u64, u64, Event)> {
        let (amount_out, fee) = self.get_amount_out(amount_in, a_to_b)?;
        Ok(self.apply_swap(amount_in, a_to_b, amount_out, fee))
    }

    /// Quote, enforce `min_amount_out`, and only then mutate state.
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

    /// Zero and return both protocol-fee buckets.
    pub fn withdraw_protocol_fees(&mut self) -> (u64, u64) {
        let a = std::mem::take(&mut self.protocol_fees_a);
        let b = std::mem::take(&mut self.protocol_fees_b);
        (a, b)
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_pool_validates_amp_and_fee() {
        assert!(SsPool::new_pool(0, 4).is_err());
        assert!(SsPool::new_pool(SS_MAX_AMP + 1, 4).is_err());
        assert!(SsPool::new_pool(100, SS_MAX_FEE_BPS + 1).is_err());
        assert!(SsPool::new_pool(100, SS_MAX_FEE_BPS).is_ok());
    }

    #[test]
    fn initial_liquidity_is_sum_of_reserves() {
        let mut pool = SsPool::new_pool(100, 4).unwrap();
        let (minted, _) = pool.provide_initial_liquidity(10_000_000, 10_000_000).unwrap();
        assert_eq!(minted, 20_000_000);
    }

    #[test]
    fn scenario_6_high_amp_swap_output_and_fee() {
        let mut pool = SsPool::new_pool(1_000, 4).unwrap();
        pool.provide_initial_liquidity(10_000_000, 10_000_000).unwrap();
        let (amount_out, fee) = pool.get_amount_out(1_000_000, true).unwrap();
        assert_eq!(fee, 400);
        assert!(amount_out > 990_000, "amount_out={amount_out}");
    }

    #[test]
    fn single_sided_deposit_accepted() {
        let mut pool = SsPool::new_pool(100, 4).unwrap();
        pool.provide_initial_liquidity(1_000_000, 1_000_000).unwrap();
        assert!(pool.add_liquidity(100_000, 0).is_ok());
    }

    #[test]
    fn low_amp_approaches_constant_product() {
        let mut cp_like = SsPool::new_pool(1, 0).unwrap();
        cp_like.provide_initial_liquidity(1_000_000, 1_000_000).unwrap();
        let (out_low_amp, _) = cp_like.get_amount_out(100_000, true).unwrap();

        let mut high_amp = SsPool::new_pool(5_000, 0).unwrap();
        high_amp.provide_initial_liquidity(1_000_000, 1_000_000).unwrap();
        let (out_high_amp, _) = high_amp.get_amount_out(100_000, true).unwrap();

        // Low amp should track the CP curve more closely (lower output for
        // a 10% trade than the near-flat high-amp curve).
        assert!(out_low_amp < out_high_amp);
    }

    #[test]
    fn remove_liquidity_pro_rata_on_reserve_sum() {
        let mut pool = SsPool::new_pool(100, 4).unwrap();
        pool.provide_initial_liquidity(1_000_000, 1_000_000).unwrap();
        let total = pool.total_shares;
        let ((a, b), _) = pool.remove_liquidity(total / 2).unwrap();
        assert_eq!(a, 500_000);
        assert_eq!(b, 500_000);
    }
}
