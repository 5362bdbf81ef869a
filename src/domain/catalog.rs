use serde::{Deserialize, Serialize};

use super::{Paise, rupees};

pub type ProductId = i64;

/// A pharmacy product that can be bought with money and earns points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: Paise,
    pub points: i64,
}

impl Product {
    pub fn new(id: ProductId, name: impl Into<String>, price: Paise, points: i64) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            category: String::new(),
            price,
            points,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }
}

/// A reward that costs points and nothing else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardItem {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub category: String,
    pub cost_points: i64,
}

impl RewardItem {
    fn new(id: i64, name: &str, description: &str, category: &str, cost_points: i64) -> Self {
        Self {
            id,
            name: name.to_string(),
            description: description.to_string(),
            category: category.to_string(),
            cost_points,
        }
    }
}

fn product(id: ProductId, name: &str, description: &str, category: &str, price: i64, points: i64) -> Product {
    Product::new(id, name, rupees(price), points)
        .with_description(description)
        .with_category(category)
}

/// Built-in pharmacy catalog.
pub fn pharmacy_products() -> Vec<Product> {
    vec![
        product(1, "Paracetamol", "Pain reliever and fever reducer. Basic first-aid essential.", "Medication", 5, 10),
        product(2, "Digital Thermometer", "Accurate temperature readings with LCD display.", "Equipment", 15, 25),
        product(3, "ORS Solution", "Oral rehydration salts for treating dehydration.", "Hydration", 3, 8),
        product(4, "Bandages (Pack)", "Sterile adhesive bandages in various sizes.", "First Aid", 4, 12),
        product(5, "Antiseptic Solution", "For cleaning wounds and preventing infection.", "First Aid", 6, 15),
        product(6, "Blood Pressure Monitor", "Digital BP monitor for home use with memory function.", "Equipment", 30, 40),
        product(7, "First Aid Kit", "Complete emergency kit with essential medical supplies.", "First Aid", 25, 35),
        product(8, "Vitamin C Tablets", "Immune system support and antioxidant protection.", "Supplements", 8, 18),
        product(9, "Insulin Syringes", "Sterile disposable syringes for insulin administration.", "Equipment", 10, 20),
    ]
}

/// Built-in redemption catalog.
pub fn reward_items() -> Vec<RewardItem> {
    vec![
        RewardItem::new(1, "Paracetamol", "Pain reliever and fever reducer. Basic first-aid essential.", "Medication", 50),
        RewardItem::new(2, "Digital Thermometer", "Accurate temperature readings with LCD display.", "Equipment", 150),
        RewardItem::new(3, "ORS Solution", "Oral rehydration salts for treating dehydration.", "Hydration", 30),
        RewardItem::new(4, "Bandages (Pack)", "Sterile adhesive bandages in various sizes.", "First Aid", 40),
        RewardItem::new(5, "Antiseptic Solution", "For cleaning wounds and preventing infection.", "First Aid", 60),
        RewardItem::new(6, "Blood Pressure Monitor", "Digital BP monitor for home use with memory function.", "Equipment", 300),
        RewardItem::new(7, "First Aid Kit", "Complete emergency kit with essential medical supplies.", "First Aid", 200),
        RewardItem::new(8, "Vitamin Supplements", "Daily multivitamin tablets for improved immunity.", "Supplements", 80),
    ]
}

pub fn find_product(id: ProductId) -> Option<Product> {
    pharmacy_products().into_iter().find(|p| p.id == id)
}

pub fn find_reward(id: i64) -> Option<RewardItem> {
    reward_items().into_iter().find(|r| r.id == id)
}
