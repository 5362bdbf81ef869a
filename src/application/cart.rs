use anyhow::Result;
use tracing::debug;

use crate::domain::{Cart, CartLine, CartTotals, Product, ProductId};
use crate::storage::{DynKeyValueStore, LoadOutcome, keys, load_json, save_json};

use super::{DynNotifier, Notification};

/// Pharmacy cart with derived totals, persisted after every change.
pub struct CartAggregator {
    store: DynKeyValueStore,
    notifier: DynNotifier,
    cart: Cart,
}

impl CartAggregator {
    /// Restore the cart from storage (empty when absent or unreadable).
    pub async fn load(
        store: DynKeyValueStore,
        notifier: DynNotifier,
    ) -> Result<(Self, LoadOutcome)> {
        let loaded = load_json::<Vec<CartLine>>(store.as_ref(), keys::CART).await?;
        let aggregator = Self {
            store,
            notifier,
            cart: Cart::from_lines(loaded.value),
        };
        Ok((aggregator, loaded.outcome))
    }

    pub fn lines(&self) -> &[CartLine] {
        self.cart.lines()
    }

    pub fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }

    /// Totals over the current lines; recomputed on every call.
    pub fn totals(&self) -> CartTotals {
        self.cart.totals()
    }

    /// Add one unit of `product`. Repeated ids bump the existing line.
    pub async fn add_item(&mut self, product: &Product) -> Result<CartLine> {
        let mut updated = self.cart.clone();
        let line = updated.add(product).clone();
        self.commit(updated).await?;
        debug!(product_id = product.id, quantity = line.quantity, "added to cart");

        self.notifier.notify(Notification::info(
            "Added to cart",
            format!("{} has been added to your cart.", product.name),
        ));
        Ok(line)
    }

    /// Remove the line for `id`. Absent ids are ignored.
    pub async fn remove_item(&mut self, id: ProductId) -> Result<()> {
        let mut updated = self.cart.clone();
        if updated.remove(id) {
            debug!(product_id = id, "removed from cart");
        }
        self.commit(updated).await
    }

    /// Set the quantity of an existing line; `quantity <= 0` removes it.
    pub async fn update_quantity(&mut self, id: ProductId, quantity: i64) -> Result<()> {
        let mut updated = self.cart.clone();
        updated.set_quantity(id, quantity);
        self.commit(updated).await
    }

    pub async fn clear(&mut self) -> Result<()> {
        self.commit(Cart::new()).await
    }

    async fn commit(&mut self, cart: Cart) -> Result<()> {
        save_json(self.store.as_ref(), keys::CART, cart.lines()).await?;
        self.cart = cart;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::application::RecordingNotifier;
    use crate::storage::MemoryStore;

    fn product(id: ProductId, price: i64, points: i64) -> Product {
        Product::new(id, format!("Item {}", id), price, points)
    }

    async fn cart_with(store: Arc<MemoryStore>) -> (CartAggregator, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::new());
        let (cart, _) = CartAggregator::load(store, notifier.clone()).await.unwrap();
        (cart, notifier)
    }

    #[tokio::test]
    async fn test_add_twice_yields_one_line() {
        let (mut cart, notifier) = cart_with(Arc::new(MemoryStore::new())).await;
        cart.add_item(&product(1, 5, 10)).await.unwrap();
        let line = cart.add_item(&product(1, 5, 10)).await.unwrap();

        assert_eq!(line.quantity, 2);
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(notifier.titles(), vec!["Added to cart", "Added to cart"]);
    }

    #[tokio::test]
    async fn test_totals_follow_lines() {
        let (mut cart, _) = cart_with(Arc::new(MemoryStore::new())).await;
        cart.add_item(&product(1, 5, 10)).await.unwrap();
        cart.add_item(&product(1, 5, 10)).await.unwrap();
        cart.add_item(&product(2, 3, 8)).await.unwrap();

        let totals = cart.totals();
        assert_eq!(totals.total_items, 3);
        assert_eq!(totals.total_price, 13);
        assert_eq!(totals.total_points, 28);

        cart.update_quantity(2, 3).await.unwrap();
        assert_eq!(cart.totals().total_points, 44);
    }

    #[tokio::test]
    async fn test_update_to_zero_matches_remove() {
        let (mut a, _) = cart_with(Arc::new(MemoryStore::new())).await;
        let (mut b, _) = cart_with(Arc::new(MemoryStore::new())).await;
        for cart in [&mut a, &mut b] {
            cart.add_item(&product(1, 5, 10)).await.unwrap();
            cart.add_item(&product(2, 3, 8)).await.unwrap();
        }

        a.update_quantity(1, 0).await.unwrap();
        b.remove_item(1).await.unwrap();

        assert_eq!(a.lines(), b.lines());
    }

    #[tokio::test]
    async fn test_update_absent_does_not_insert() {
        let (mut cart, _) = cart_with(Arc::new(MemoryStore::new())).await;
        cart.update_quantity(7, 3).await.unwrap();
        assert!(cart.is_empty());
    }

    #[tokio::test]
    async fn test_clear_zeroes_totals() {
        let (mut cart, _) = cart_with(Arc::new(MemoryStore::new())).await;
        cart.add_item(&product(1, 5, 10)).await.unwrap();
        cart.clear().await.unwrap();
        assert_eq!(cart.totals(), CartTotals::default());
    }

    #[tokio::test]
    async fn test_reload_restores_lines() {
        let store = Arc::new(MemoryStore::new());
        let (mut cart, _) = cart_with(store.clone()).await;
        cart.add_item(&product(1, 5, 10)).await.unwrap();
        cart.add_item(&product(2, 3, 8)).await.unwrap();
        cart.update_quantity(1, 4).await.unwrap();

        let (reloaded, outcome) =
            CartAggregator::load(store, Arc::new(RecordingNotifier::new())).await.unwrap();
        assert_eq!(outcome, LoadOutcome::Restored);
        assert_eq!(reloaded.lines(), cart.lines());
    }

    #[tokio::test]
    async fn test_malformed_cart_defaults_to_empty() {
        let store = Arc::new(MemoryStore::new().with_entry(keys::CART, "[{\"id\": \"x\"}]"));
        let (cart, outcome) =
            CartAggregator::load(store, Arc::new(RecordingNotifier::new())).await.unwrap();
        assert!(cart.is_empty());
        assert!(!outcome.is_restored());
    }
}
