//! Vault-held state: packed balances, pool records and configuration.

mod balances;
mod hooks_config;
mod pool_config;
mod pool_state;
mod role_accounts;
mod token_info;

pub use balances::PackedBalance;
pub use hooks_config::HookFlags;
pub use pool_config::{LiquidityManagement, PoolConfig};
pub use pool_state::{AggregateFeeAmounts, PoolData};
pub(crate) use pool_state::PoolState;
pub use role_accounts::RoleAccounts;
pub use token_info::{TokenConfig, TokenInfo, TokenType};
