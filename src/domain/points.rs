use serde::{Deserialize, Serialize};

/// Running reward-point balance.
///
/// Negative values are representable: spends are applied as negative
/// adjustments and nothing at this level refuses them. Callers that must not
/// overdraw (redemptions) check [`PointBalance::covers`] first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PointBalance(i64);

impl PointBalance {
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    pub const fn value(self) -> i64 {
        self.0
    }

    /// Apply a signed adjustment and return the new balance.
    pub fn apply(self, amount: i64) -> Self {
        Self(self.0.saturating_add(amount))
    }

    /// Returns true if the balance can pay `cost` without going negative.
    pub fn covers(self, cost: i64) -> bool {
        self.0 >= cost
    }

    /// Points still missing to pay `cost` (0 when covered).
    pub fn shortfall(self, cost: i64) -> i64 {
        cost.saturating_sub(self.0).max(0)
    }
}

impl std::fmt::Display for PointBalance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
