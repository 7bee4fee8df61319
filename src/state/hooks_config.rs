//! Hook capability flags.

use serde::{Deserialize, Serialize};

/// Which extension points the pool's hook contract is called at.
///
/// Declared once at registration. The vault enforces these strictly: a
/// point that is not flagged is never called, even if the hook object
/// implements it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HookFlags {
    /// Honor adjusted amounts returned by after-hooks.
    pub enable_hook_adjusted_amounts: bool,
    /// Call `on_before_initialize`.
    pub should_call_before_initialize: bool,
    /// Call `on_after_initialize`.
    pub should_call_after_initialize: bool,
    /// Call `on_compute_dynamic_swap_fee` for every swap.
    pub should_call_compute_dynamic_swap_fee: bool,
    /// Call `on_before_swap`.
    pub should_call_before_swap: bool,
    /// Call `on_after_swap`.
    pub should_call_after_swap: bool,
    /// Call `on_before_add_liquidity`.
    pub should_call_before_add_liquidity: bool,
    /// Call `on_after_add_liquidity`.
    pub should_call_after_add_liquidity: bool,
    /// Call `on_before_remove_liquidity`.
    pub should_call_before_remove_liquidity: bool,
    /// Call `on_after_remove_liquidity`.
    pub should_call_after_remove_liquidity: bool,
}

impl HookFlags {
    /// Flags with every extension point disabled.
    pub const NONE: Self = Self {
        enable_hook_adjusted_amounts: false,
        should_call_before_initialize: false,
        should_call_after_initialize: false,
        should_call_compute_dynamic_swap_fee: false,
        should_call_before_swap: false,
        should_call_after_swap: false,
        should_call_before_add_liquidity: false,
        should_call_after_add_liquidity: false,
        should_call_before_remove_liquidity: false,
        should_call_after_remove_liquidity: false,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_disables_everything() {
        let flags = HookFlags::NONE;
        assert!(!flags.should_call_before_swap);
        assert!(!flags.should_call_after_swap);
        assert!(!flags.enable_hook_adjusted_amounts);
    }

    #[test]
    fn default_matches_none() {
        assert_eq!(HookFlags::default(), HookFlags::NONE);
    }
}
