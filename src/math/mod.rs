//! Arithmetic layers: scaled-18 fixed point, decimal/rate scaling, and
//! the shared liquidity math built on top of pool-supplied invariants.

pub mod base_pool;
pub mod fixed_point;
pub mod scaling;
