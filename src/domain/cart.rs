use serde::{Deserialize, Serialize};

use super::{Paise, Product, ProductId};

/// One product entry in the cart.
///
/// Name, price and points are a snapshot of the catalog entry at insertion
/// time; later catalog changes do not reach existing lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: ProductId,
    pub name: String,
    /// Unit price in paise. Stored under the legacy `price` key, which
    /// earlier data held in whole rupees.
    #[serde(rename = "price")]
    pub unit_price: Paise,
    #[serde(rename = "points")]
    pub unit_points: i64,
    /// Always >= 1
    pub quantity: u32,
}

impl CartLine {
    pub fn from_product(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            unit_price: product.price,
            unit_points: product.points,
            quantity: 1,
        }
    }

    pub fn line_price(&self) -> Paise {
        self.unit_price.saturating_mul(i64::from(self.quantity))
    }

    pub fn line_points(&self) -> i64 {
        self.unit_points.saturating_mul(i64::from(self.quantity))
    }
}

/// Totals derived from the current lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartTotals {
    pub total_items: u64,
    pub total_price: Paise,
    pub total_points: i64,
}

/// Ordered collection of cart lines, unique by product id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from arbitrary lines, dropping zero-quantity lines and
    /// merging repeated ids into the first occurrence.
    pub fn from_lines(lines: Vec<CartLine>) -> Self {
        let mut cart = Self::new();
        for line in lines.into_iter().filter(|l| l.quantity > 0) {
            match cart.lines.iter_mut().find(|l| l.id == line.id) {
                Some(existing) => existing.quantity = existing.quantity.saturating_add(line.quantity),
                None => cart.lines.push(line),
            }
        }
        cart
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn get(&self, id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Add one unit of `product`, merging into an existing line with the same id.
    pub fn add(&mut self, product: &Product) -> &CartLine {
        let idx = match self.lines.iter().position(|l| l.id == product.id) {
            Some(idx) => {
                let line = &mut self.lines[idx];
                line.quantity = line.quantity.saturating_add(1);
                idx
            }
            None => {
                self.lines.push(CartLine::from_product(product));
                self.lines.len() - 1
            }
        };
        &self.lines[idx]
    }

    /// Remove the line with `id`. Returns false if there was none.
    pub fn remove(&mut self, id: ProductId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| l.id != id);
        self.lines.len() != before
    }

    /// Set the quantity of an existing line. A quantity <= 0 removes the line.
    /// Absent ids are left alone; there is no insert-on-update.
    pub fn set_quantity(&mut self, id: ProductId, quantity: i64) -> bool {
        if quantity <= 0 {
            return self.remove(id);
        }
        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        match self.lines.iter_mut().find(|l| l.id == id) {
            Some(line) => {
                line.quantity = quantity;
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn totals(&self) -> CartTotals {
        self.lines.iter().fold(CartTotals::default(), |acc, line| CartTotals {
            total_items: acc.total_items.saturating_add(u64::from(line.quantity)),
            total_price: acc.total_price.saturating_add(line.line_price()),
            total_points: acc.total_points.saturating_add(line.line_points()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_product(id: ProductId, price: Paise, points: i64) -> Product {
        Product::new(id, format!("Product {}", id), price, points)
    }

    #[test]
    fn test_add_same_product_merges_lines() {
        let mut cart = Cart::new();
        let product = sample_product(1, 5, 10);

        cart.add(&product);
        let line = cart.add(&product);

        assert_eq!(line.quantity, 2);
        assert_eq!(cart.lines().len(), 1);
    }

    #[test]
    fn test_add_keeps_insertion_order() {
        let mut cart = Cart::new();
        cart.add(&sample_product(3, 1, 1));
        cart.add(&sample_product(1, 1, 1));
        cart.add(&sample_product(3, 1, 1));

        let ids: Vec<_> = cart.lines().iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![3, 1]);
    }

    #[test]
    fn test_totals() {
        let mut cart = Cart::new();
        let first = sample_product(1, 5, 10);
        cart.add(&first);
        cart.add(&first);
        cart.add(&sample_product(2, 3, 8));

        let totals = cart.totals();
        assert_eq!(totals.total_items, 3);
        assert_eq!(totals.total_price, 13);
        assert_eq!(totals.total_points, 28);
    }

    #[test]
    fn test_set_quantity_zero_equals_remove() {
        let mut a = Cart::new();
        a.add(&sample_product(1, 5, 10));
        a.add(&sample_product(2, 3, 8));
        let mut b = a.clone();

        a.set_quantity(1, 0);
        b.remove(1);

        assert_eq!(a, b);
        assert!(a.get(1).is_none());
    }

    #[test]
    fn test_set_quantity_negative_removes() {
        let mut cart = Cart::new();
        cart.add(&sample_product(1, 5, 10));
        assert!(cart.set_quantity(1, -3));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_absent_is_noop() {
        let mut cart = Cart::new();
        cart.add(&sample_product(1, 5, 10));
        let before = cart.clone();

        assert!(!cart.set_quantity(99, 4));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_set_quantity_updates_line() {
        let mut cart = Cart::new();
        cart.add(&sample_product(1, 5, 10));
        assert!(cart.set_quantity(1, 7));
        assert_eq!(cart.get(1).map(|l| l.quantity), Some(7));
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut cart = Cart::new();
        assert!(!cart.remove(1));
    }

    #[test]
    fn test_clear_resets_totals() {
        let mut cart = Cart::new();
        cart.add(&sample_product(1, 5, 10));
        cart.clear();
        assert_eq!(cart.totals(), CartTotals::default());
    }

    #[test]
    fn test_from_lines_drops_zero_quantity_and_merges() {
        let mut line = CartLine::from_product(&sample_product(1, 5, 10));
        let mut empty = CartLine::from_product(&sample_product(2, 3, 8));
        empty.quantity = 0;
        line.quantity = 2;

        let cart = Cart::from_lines(vec![line.clone(), empty, line]);

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.get(1).map(|l| l.quantity), Some(4));
    }

    #[test]
    fn test_line_json_shape() {
        let line = CartLine::from_product(&sample_product(1, 500, 10));
        let value = serde_json::to_value(&line).unwrap();
        assert_eq!(value["price"], 500);
        assert_eq!(value["points"], 10);
        assert_eq!(value["quantity"], 1);
    }

    #[test]
    fn test_totals_saturate_on_huge_lines() {
        let mut line = CartLine::from_product(&sample_product(1, i64::MAX / 2 + 1, 1));
        line.quantity = 2;
        let other = CartLine::from_product(&sample_product(2, 10, i64::MAX));
        let cart = Cart::from_lines(vec![line, other]);

        let totals = cart.totals();
        assert_eq!(totals.total_price, i64::MAX);
        assert_eq!(totals.total_points, i64::MAX);
        assert_eq!(totals.total_items, 3);
    }
}
