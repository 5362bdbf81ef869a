use anyhow::Result;
use tracing::debug;

use crate::domain::PointBalance;
use crate::storage::{DynKeyValueStore, LoadOutcome, keys, load_json, save_json};

use super::{DynNotifier, Notification};

/// Running reward-point balance, persisted after every change.
pub struct PointsLedger {
    store: DynKeyValueStore,
    notifier: DynNotifier,
    balance: PointBalance,
}

impl PointsLedger {
    /// Restore the ledger from storage (0 when absent or unreadable).
    pub async fn load(
        store: DynKeyValueStore,
        notifier: DynNotifier,
    ) -> Result<(Self, LoadOutcome)> {
        let loaded = load_json::<PointBalance>(store.as_ref(), keys::POINTS).await?;
        let ledger = Self {
            store,
            notifier,
            balance: loaded.value,
        };
        Ok((ledger, loaded.outcome))
    }

    pub fn balance(&self) -> i64 {
        self.balance.value()
    }

    pub fn point_balance(&self) -> PointBalance {
        self.balance
    }

    /// Apply a signed adjustment and persist it. Returns the new balance.
    ///
    /// Negative amounts are spends and are never refused here, even when they
    /// take the balance below zero; overdraft checks belong to the caller.
    pub async fn add_points(&mut self, amount: i64) -> Result<i64> {
        let updated = self.balance.apply(amount);
        save_json(self.store.as_ref(), keys::POINTS, &updated).await?;
        self.balance = updated;
        debug!(amount, balance = updated.value(), "points adjusted");

        if amount > 0 {
            self.notifier.notify(Notification::celebration(
                "Points earned!",
                format!("+{} points, balance is now {}", amount, updated),
            ));
        }
        Ok(updated.value())
    }
}
