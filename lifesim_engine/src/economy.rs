/// Lifesim Engine: Economy
///
/// Constant prices for items, wages, rent, stocks and resale.
///
/// Every function is pure. Prices do not move with the calendar; a
/// time-varying model would replace the tables below.

use crate::buildings::BuildingKind;
use crate::jobs::Job;
use crate::possession::Possession;

/// Price charged for anything missing from the table.
pub const DEFAULT_PRICE: i64 = 50;

/// Restaurant markup over the base price, applied then floored.
pub const RESTAURANT_MARKUP: f64 = 1.5;

/// Share of an item's value the pawn shop pays out.
pub const RESALE_RATIO: f64 = 0.5;

pub const LOW_COST_WEEKLY_RENT: i64 = 305;
pub const SECURITY_WEEKLY_RENT: i64 = 475;

const BASE_PRICES: &[(&str, i64)] = &[
    // supermarket
    ("bread", 5),
    ("groceries", 25),
    ("fresh-produce", 40),
    // restaurant
    ("coffee", 4),
    ("burger", 10),
    ("steak-dinner", 40),
    // clothes store
    ("casual-clothes", 60),
    ("business-clothes", 150),
    ("formal-suit", 300),
    // appliance store
    ("microwave", 120),
    ("television", 350),
    ("computer", 800),
    // college tuition
    ("community-course", 50),
    ("trade-certificate", 150),
    ("bachelor-degree", 300),
    ("masters-degree", 600),
];

/// A tradable security.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockListing {
    pub id: &'static str,
    pub symbol: &'static str,
    pub name: &'static str,
    pub price: i64,
}

const STOCKS: &[StockListing] = &[
    StockListing { id: "t-bills", symbol: "TBIL", name: "T-Bills", price: 100 },
    StockListing { id: "gold", symbol: "GOLD", name: "Gold", price: 450 },
    StockListing { id: "silver", symbol: "SLVR", name: "Silver", price: 150 },
    StockListing { id: "pig-bellies", symbol: "PORK", name: "Pig Bellies", price: 50 },
    StockListing { id: "blue-chip", symbol: "BLUE", name: "Blue Chip", price: 300 },
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EconomyModel;

impl EconomyModel {
    pub fn new() -> Self {
        Self
    }

    pub fn base_price(&self, item_id: &str) -> i64 {
        BASE_PRICES
            .iter()
            .find(|(id, _)| *id == item_id)
            .map_or(DEFAULT_PRICE, |(_, price)| *price)
    }

    /// Base price with the selling building's markup.
    pub fn price(&self, item_id: &str, building: BuildingKind) -> i64 {
        let base = self.base_price(item_id);
        match building {
            BuildingKind::Restaurant => (base as f64 * RESTAURANT_MARKUP).floor() as i64,
            _ => base,
        }
    }

    pub fn course_price(&self, course_id: &str) -> i64 {
        self.price(course_id, BuildingKind::College)
    }

    /// `wage_per_hour * hours`. Negative hours are not rejected here.
    pub fn wage(&self, job: &Job, hours: i64) -> i64 {
        job.wage_per_hour * hours
    }

    /// Weekly rent; zero for anything that is not housing.
    pub fn rent(&self, building: BuildingKind) -> i64 {
        match building {
            BuildingKind::LowCostApartment => LOW_COST_WEEKLY_RENT,
            BuildingKind::SecurityApartment => SECURITY_WEEKLY_RENT,
            _ => 0,
        }
    }

    pub fn monthly_rent(&self, building: BuildingKind) -> i64 {
        self.rent(building) * 4
    }

    /// Price by ticker, case-insensitive.
    pub fn stock_price(&self, symbol: &str) -> Option<i64> {
        STOCKS
            .iter()
            .find(|s| s.symbol.eq_ignore_ascii_case(symbol))
            .map(|s| s.price)
    }

    pub fn stock_price_by_id(&self, stock_id: &str) -> Option<i64> {
        self.stock(stock_id).map(|s| s.price)
    }

    pub fn stock(&self, stock_id: &str) -> Option<&'static StockListing> {
        STOCKS.iter().find(|s| s.id.eq_ignore_ascii_case(stock_id))
    }

    pub fn stock_catalog(&self) -> &'static [StockListing] {
        STOCKS
    }

    /// What the pawn shop pays: `floor(value * 0.5)`.
    pub fn sell_price(&self, possession: &Possession) -> i64 {
        (possession.value as f64 * RESALE_RATIO).floor() as i64
    }
}
