/// Lifesim Engine: Possessions
///
/// Owned items. Pure data; the effects are recorded on the item but only
/// the purchase action decides whether they are applied.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PossessionType {
    Food,
    Clothes,
    Appliance,
    Stock,
}

/// Measure deltas an item grants when consumed or used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PossessionEffects {
    #[serde(default)]
    pub health: f64,
    #[serde(default)]
    pub happiness: f64,
    #[serde(default)]
    pub education: f64,
}

impl PossessionEffects {
    pub fn is_empty(&self) -> bool {
        self.health == 0.0 && self.happiness == 0.0 && self.education == 0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Possession {
    pub id: String,
    #[serde(rename = "type")]
    pub possession_type: PossessionType,
    pub name: String,
    pub value: i64,
    pub purchase_price: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clothes_level: Option<u32>,
    /// Ticker for stock holdings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(default)]
    pub effects: PossessionEffects,
}

impl Possession {
    pub fn is_clothes(&self) -> bool {
        self.possession_type == PossessionType::Clothes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_type_tag_in_camel_case() {
        let item = Possession {
            id: "casual-clothes#1-600".to_string(),
            possession_type: PossessionType::Clothes,
            name: "Casual Clothes".to_string(),
            value: 60,
            purchase_price: 60,
            clothes_level: Some(1),
            symbol: None,
            effects: PossessionEffects::default(),
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["type"], "clothes");
        assert_eq!(json["purchasePrice"], 60);
        assert_eq!(json["clothesLevel"], 1);
        assert!(json.get("symbol").is_none());
    }
}
