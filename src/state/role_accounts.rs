//! Pool role assignments.

use serde::{Deserialize, Serialize};

use crate::domain::Address;

/// Accounts holding pool-scoped roles, recorded at registration.
///
/// The vault records these for the governance layer to consult; it does
/// not itself enforce caller identity (authorization is out of scope of
/// the engine).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RoleAccounts {
    /// May pause and unpause the pool within its pause window.
    pub pause_manager: Address,
    /// May change the pool's static swap fee.
    pub swap_fee_manager: Address,
    /// Receives the creator share of aggregate fees.
    pub pool_creator: Address,
}
