use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Exchange symbol, e.g. "KELP"
pub type Symbol = String;

/// Underlying product identifier
pub type Product = String;

/// Exchange timestamps are integer ticks (100 per iteration)
pub type Timestamp = i64;

/// A tradable instrument on the island exchange
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Listing {
    pub symbol: Symbol,
    pub product: Product,
    pub denomination: Product,
}

/// Aggregated order book for one symbol.
///
/// Prices map to signed volumes: buy volumes are positive, sell volumes
/// negative. `BTreeMap` keeps levels sorted by price; iterate buys in
/// reverse for best-first order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderDepth {
    pub buy_orders: BTreeMap<i64, i64>,
    pub sell_orders: BTreeMap<i64, i64>,
}

impl OrderDepth {
    pub fn best_bid(&self) -> Option<i64> {
        self.buy_orders.keys().next_back().copied()
    }

    pub fn best_ask(&self) -> Option<i64> {
        self.sell_orders.keys().next().copied()
    }
}

/// Order submitted by a strategy. Positive quantity buys, negative sells.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub symbol: Symbol,
    pub price: i64,
    pub quantity: i64,
}

impl Order {
    pub fn buy(symbol: impl Into<Symbol>, price: i64, quantity: i64) -> Self {
        Self {
            symbol: symbol.into(),
            price,
            quantity,
        }
    }

    pub fn sell(symbol: impl Into<Symbol>, price: i64, quantity: i64) -> Self {
        Self {
            symbol: symbol.into(),
            price,
            quantity: -quantity,
        }
    }
}

/// A fill reported by the exchange
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Trade {
    pub symbol: Symbol,
    pub price: i64,
    pub quantity: i64,
    pub buyer: Option<String>,
    pub seller: Option<String>,
    pub timestamp: Timestamp,
}

/// Conversion pricing for products that can be shipped off-island
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConversionObservation {
    pub bid_price: f64,
    pub ask_price: f64,
    pub transport_fees: f64,
    pub export_tariff: f64,
    pub import_tariff: f64,
    pub sugar_price: f64,
    pub sunlight_index: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Observation {
    pub plain_value_observations: HashMap<Product, i64>,
    pub conversion_observations: HashMap<Product, ConversionObservation>,
}

/// Full exchange snapshot handed to the trader once per iteration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TradingState {
    pub timestamp: Timestamp,
    /// Opaque state string the trader saved last iteration
    pub trader_data: String,
    pub listings: HashMap<Symbol, Listing>,
    pub order_depths: HashMap<Symbol, OrderDepth>,
    pub own_trades: HashMap<Symbol, Vec<Trade>>,
    pub market_trades: HashMap<Symbol, Vec<Trade>>,
    pub position: HashMap<Product, i64>,
    pub observations: Observation,
}
