//! Property-based checks of the universal invariants (P1-P9) over
//! arbitrary inputs, as opposed to the fixed literal scenarios.

use amm_core::{slippage, CpPool, FactoryConfig, OwnerId, PoolId, Router, RouterConfig, TokenId};
use proptest::prelude::*;

proptest! {
    /// P1: a single swap on a non-empty CP pool never decreases reserve_a*reserve_b.
    #[test]
    fn p1_k_monotone_on_single_swap(
        seed_a in 10_000u64..10_000_000,
        seed_b in 10_000u64..10_000_000,
        amount_in in 1u64..1_000_000,
        a_to_b in any::<bool>(),
        fee_bps in 0u64..=1_000,
    ) {
        let mut pool = CpPool::new_pool(fee_bps).unwrap();
        let Ok(_) = pool.provide_initial_liquidity(seed_a, seed_b) else { return Ok(()); };
        let k_before = pool.reserve_a as u128 * pool.reserve_b as u128;

        if pool.swap(amount_in, a_to_b).is_ok() {
            let k_after = pool.reserve_a as u128 * pool.reserve_b as u128;
            prop_assert!(k_after >= k_before);
        }
    }

    /// P3: removing `burn` shares returns amounts within one truncation unit
    /// of the exact pro-rata split.
    #[test]
    fn p3_share_conservation_on_remove(
        seed_a in 10_000u64..10_000_000,
        seed_b in 10_000u64..10_000_000,
        burn_fraction in 1u64..=100,
    ) {
        let mut pool = CpPool::new_pool(30).unwrap();
        let Ok(_) = pool.provide_initial_liquidity(seed_a, seed_b) else { return Ok(()); };
        let total = pool.total_shares;
        let burn = (total * burn_fraction / 100).max(1).min(total);

        let reserve_a_before = pool.reserve_a;
        let reserve_b_before = pool.reserve_b;
        if let Ok(((amount_a, amount_b), _)) = pool.remove_liquidity(burn) {
            let expected_a = (burn as u128 * reserve_a_before as u128 / total as u128) as u64;
            let expected_b = (burn as u128 * reserve_b_before as u128 / total as u128) as u64;
            prop_assert!(amount_a.abs_diff(expected_a) <= 1);
            prop_assert!(amount_b.abs_diff(expected_b) <= 1);
        }
    }

    /// P4: once seeded, total_shares never drops below MINIMUM_LIQUIDITY,
    /// even after the entire assignable supply is withdrawn.
    #[test]
    fn p4_locked_minimum_survives_full_withdrawal(
        seed_a in 10_000u64..10_000_000,
        seed_b in 10_000u64..10_000_000,
    ) {
        let mut pool = CpPool::new_pool(30).unwrap();
        let Ok((minted, _)) = pool.provide_initial_liquidity(seed_a, seed_b) else { return Ok(()); };
        pool.remove_liquidity(minted).unwrap();
        prop_assert!(pool.total_shares >= amm_core::constants::MINIMUM_LIQUIDITY);
    }

    /// P5: registry lookups are symmetric in the token pair.
    #[test]
    fn p5_registry_order_invariance(fee_bps in 0u64..=1_000) {
        let mut router = Router::new(RouterConfig::default(), FactoryConfig::default());
        let a = TokenId::new("TOKA");
        let b = TokenId::new("TOKB");
        let _ = router.registry.register_pool(PoolId::new(), &a, &b, fee_bps, OwnerId::new("x"), 0);
        prop_assert_eq!(router.registry.pool_exists(&a, &b, fee_bps), router.registry.pool_exists(&b, &a, fee_bps));
    }

    /// P8: calculate_min_output never exceeds the expected value, and
    /// enforce_min_output's pass/fail tracks the inequality exactly.
    #[test]
    fn p8_slippage_law(
        expected in 1u64..1_000_000_000,
        slip_bps in 0u64..=5_000,
        actual in 0u64..1_000_000_000,
    ) {
        let min_output = slippage::calculate_min_output(expected, slip_bps).unwrap();
        prop_assert!(min_output <= expected);

        let result = slippage::enforce_min_output(actual, min_output);
        prop_assert_eq!(result.is_ok(), actual >= min_output);
    }

    /// P9: duplicate registration under the same canonical key always fails.
    #[test]
    fn p9_duplicate_prevention(fee_bps in 0u64..=1_000) {
        let mut registry = amm_core::PoolRegistry::new();
        let a = TokenId::new("X");
        let b = TokenId::new("Y");
        prop_assert!(registry.register_pool(PoolId::new(), &a, &b, fee_bps, OwnerId::new("a"), 0).is_ok());
        prop_assert!(registry.register_pool(PoolId::new(), &b, &a, fee_bps, OwnerId::new("b"), 0).is_err());
    }
}
