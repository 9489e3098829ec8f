/// Lifesim Engine: Shop and Course Catalog
///
/// What each shop sells and what the college teaches.
/// Prices live in `economy`; this is only the menu.

use crate::buildings::BuildingKind;
use crate::possession::{PossessionEffects, PossessionType};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShopItem {
    pub id: &'static str,
    pub name: &'static str,
    pub category: &'static str,
    pub sold_at: BuildingKind,
    pub possession_type: PossessionType,
    pub clothes_level: Option<u32>,
    pub effects: PossessionEffects,
    /// Eaten on the spot: effects apply now and nothing is kept.
    pub consumed_on_purchase: bool,
}

const fn effects(health: f64, happiness: f64) -> PossessionEffects {
    PossessionEffects {
        health,
        happiness,
        education: 0.0,
    }
}

const fn stocked(
    id: &'static str,
    name: &'static str,
    category: &'static str,
    sold_at: BuildingKind,
    possession_type: PossessionType,
    clothes_level: Option<u32>,
    effects: PossessionEffects,
) -> ShopItem {
    ShopItem {
        id,
        name,
        category,
        sold_at,
        possession_type,
        clothes_level,
        effects,
        consumed_on_purchase: false,
    }
}

const fn meal(id: &'static str, name: &'static str, effects: PossessionEffects) -> ShopItem {
    ShopItem {
        id,
        name,
        category: "Menu",
        sold_at: BuildingKind::Restaurant,
        possession_type: PossessionType::Food,
        clothes_level: None,
        effects,
        consumed_on_purchase: true,
    }
}

pub const SHOP_ITEMS: &[ShopItem] = &[
    stocked("bread", "Bread", "Groceries", BuildingKind::Supermarket, PossessionType::Food, None, effects(1.0, 0.0)),
    stocked("groceries", "Weekly Groceries", "Groceries", BuildingKind::Supermarket, PossessionType::Food, None, effects(3.0, 1.0)),
    stocked("fresh-produce", "Fresh Produce", "Groceries", BuildingKind::Supermarket, PossessionType::Food, None, effects(5.0, 1.0)),
    meal("coffee", "Coffee", effects(0.0, 2.0)),
    meal("burger", "Burger", effects(3.0, 5.0)),
    meal("steak-dinner", "Steak Dinner", effects(8.0, 12.0)),
    stocked("casual-clothes", "Casual Clothes", "Clothing", BuildingKind::ClothesStore, PossessionType::Clothes, Some(1), effects(0.0, 2.0)),
    stocked("business-clothes", "Business Clothes", "Clothing", BuildingKind::ClothesStore, PossessionType::Clothes, Some(2), effects(0.0, 4.0)),
    stocked("formal-suit", "Formal Suit", "Clothing", BuildingKind::ClothesStore, PossessionType::Clothes, Some(3), effects(0.0, 6.0)),
    stocked("microwave", "Microwave", "Kitchen", BuildingKind::ApplianceStore, PossessionType::Appliance, None, effects(1.0, 3.0)),
    stocked("television", "Television", "Electronics", BuildingKind::ApplianceStore, PossessionType::Appliance, None, effects(0.0, 8.0)),
    stocked("computer", "Computer", "Electronics", BuildingKind::ApplianceStore, PossessionType::Appliance, None, effects(0.0, 10.0)),
];

pub fn shop_item(id: &str) -> Option<&'static ShopItem> {
    SHOP_ITEMS.iter().find(|item| item.id == id)
}

pub fn items_sold_at(kind: BuildingKind) -> impl Iterator<Item = &'static ShopItem> {
    SHOP_ITEMS.iter().filter(move |item| item.sold_at == kind)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Course {
    pub id: &'static str,
    pub name: &'static str,
    pub education_gain: f64,
    pub min_education: f64,
}

pub const COURSES: &[Course] = &[
    Course { id: "community-course", name: "Community Course", education_gain: 5.0, min_education: 0.0 },
    Course { id: "trade-certificate", name: "Trade Certificate", education_gain: 10.0, min_education: 10.0 },
    Course { id: "bachelor-degree", name: "Bachelor's Degree", education_gain: 15.0, min_education: 25.0 },
    Course { id: "masters-degree", name: "Master's Degree", education_gain: 20.0, min_education: 50.0 },
];

pub fn course(id: &str) -> Option<&'static Course> {
    COURSES.iter().find(|c| c.id == id)
}
