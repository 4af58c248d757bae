//! Composite contract-revision actions
//!
//! The negotiation learner chooses among a fixed menu of three composite
//! actions. Menu order matters: greedy ties resolve to the lowest index.

use serde::{Deserialize, Serialize};

/// One contract revision applied in a negotiation round
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompositeAction {
    /// Change in annual interest rate (e.g. -0.01 = 100 bp cut)
    pub rate_delta: f64,

    /// Change in tenure, in months
    pub tenure_delta: i32,

    /// Grant a grace period this round
    pub grace_toggle: bool,

    /// Change in collateral requirement (fraction of exposure)
    pub collateral_adjust: f64,
}

impl CompositeAction {
    /// The do-nothing revision
    pub const HOLD: CompositeAction = CompositeAction {
        rate_delta: 0.0,
        tenure_delta: 0,
        grace_toggle: false,
        collateral_adjust: 0.0,
    };
}

/// Fixed action menu, in tie-breaking order
pub const ACTION_MENU: [CompositeAction; 3] = [
    // Concede: cut rate, extend tenure, grant grace, release collateral
    CompositeAction {
        rate_delta: -0.01,
        tenure_delta: 12,
        grace_toggle: true,
        collateral_adjust: -0.02,
    },
    // Soften: modest tenure extension only
    CompositeAction {
        rate_delta: 0.0,
        tenure_delta: 6,
        grace_toggle: false,
        collateral_adjust: 0.0,
    },
    // Tighten: raise rate, shorten tenure, require more collateral
    CompositeAction {
        rate_delta: 0.01,
        tenure_delta: -6,
        grace_toggle: false,
        collateral_adjust: 0.02,
    },
];

/// Number of actions in [`ACTION_MENU`]
pub const NUM_ACTIONS: usize = ACTION_MENU.len();

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_order() {
        assert_eq!(NUM_ACTIONS, 3);
        assert_eq!(ACTION_MENU[0].rate_delta, -0.01);
        assert!(ACTION_MENU[0].grace_toggle);
        assert_eq!(ACTION_MENU[1].tenure_delta, 6);
        assert_eq!(ACTION_MENU[2].collateral_adjust, 0.02);
    }
}
