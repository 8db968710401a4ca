//! A constant-product / stable-swap AMM core: pools, LP positions, lazy
//! proportional fee distribution, a pool registry, and a router tying
//! them together.
//!
//! This crate is a simulation/accounting engine, not a custody layer: it
//! tracks balances and invariants in memory and hands back typed results
//! and [`events::Event`]s for a host to act on. Token transfer, identity,
//! wire protocols, and persistence are deliberately out of scope — see
//! each module's doc comment for the boundary it stops at.
//!
//! Dependency order (left depends on nothing here to the right of it):
//! [`math`] → [`slippage`] → [`position`] → [`cp_pool`] / [`ss_pool`] →
//! [`registry`] → [`fee_distributor`] → [`factory`] → [`router`].

pub mod constants;
pub mod cp_pool;
pub mod error;
pub mod events;
pub mod factory;
pub mod fee_distributor;
pub mod ids;
pub mod math;
pub mod position;
pub mod registry;
pub mod router;
pub mod slippage;
pub mod ss_pool;

pub use cp_pool::CpPool;
pub use error::{AmmError, Result};
pub use events::Event;
pub use factory::{FactoryConfig, PoolFactory};
pub use fee_distributor::FeeBearingPool;
pub use ids::{OwnerId, PoolId, PositionId, TokenId};
pub use position::Position;
pub use registry::PoolRegistry;
pub use router::{AmmPool, Router, RouterConfig};
pub use ss_pool::SsPool;
