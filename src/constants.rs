//! Wire-visible constants shared by every pool variant, plus the default
//! tunables a host can override via [`crate::factory::FactoryConfig`] and
//! [`crate::router::RouterConfig`].

/// 1 BPS = 1 / 10_000.
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Shares locked forever at first seeding; never assigned to any position.
/// Forecloses the "donate to reserves before first LP" inflation attack.
pub const MINIMUM_LIQUIDITY: u64 = 1_000;

/// Share of every swap fee routed to the protocol bucket rather than LPs.
pub const PROTOCOL_FEE_BPS: u64 = 1_000;

/// Recognized CP fee tiers, in basis points. Any other value is `InvalidFeeTier`.
pub const CP_FEE_TIERS: [u64; 3] = [5, 30, 100];

/// Upper bound on a CP pool's `fee_bps`.
pub const CP_MAX_FEE_BPS: u64 = 1_000;

/// Upper bound on a stable-swap pool's `fee_bps`.
pub const SS_MAX_FEE_BPS: u64 = 100;

/// Upper bound on a stable-swap pool's amplification factor.
pub const SS_MAX_AMP: u64 = 10_000;

/// Default stable-swap amplification factor for newly created SS pools.
pub const SS_DEFAULT_AMP: u64 = 100;

/// Default stable-swap fee, in basis points.
pub const SS_DEFAULT_FEE_BPS: u64 = 4;

/// Slippage tolerance above which `calculate_min_output`/`calculate_max_input` refuse to run.
pub const MAX_SLIPPAGE_BPS: u64 = 5_000;

/// Default price-impact ceiling a router enforces unless the caller overrides it.
pub const DEFAULT_PRICE_IMPACT_BPS: u64 = 500;

/// Default add-liquidity ratio tolerance, in basis points.
pub const DEFAULT_TOLERANCE_BPS: u64 = 50;
