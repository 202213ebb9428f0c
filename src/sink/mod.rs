use crate::models::{Listing, Observation, Order, OrderDepth, Symbol, Trade, TradingState};
use crate::Result;
use serde_json::{json, Value};
use std::collections::HashMap;

/// Character budget the platform allows for one flushed log line
const MAX_LOG_LENGTH: usize = 3750;

/// Collects free-form log text during an iteration and flushes it together
/// with the iteration's state and orders as one compact JSON line the
/// competition visualizer understands.
///
/// The line is `[state, orders, conversions, traderData, logs]` with every
/// structure compressed to positional arrays. The platform truncates long
/// lines, so the three variable-length strings (incoming trader data,
/// outgoing trader data, accumulated logs) share the budget left after the
/// fixed part is measured with empty strings.
#[derive(Debug, Default)]
pub struct LogSink {
    logs: String,
}

impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one line of log text
    pub fn log(&mut self, text: impl AsRef<str>) {
        self.logs.push_str(text.as_ref());
        self.logs.push('\n');
    }

    /// Encode the iteration and clear the accumulated logs
    pub fn flush(
        &mut self,
        state: &TradingState,
        orders: &HashMap<Symbol, Vec<Order>>,
        conversions: i64,
        trader_data: &str,
    ) -> Result<String> {
        let base_length = serde_json::to_string(&json!([
            compress_state(state, ""),
            compress_orders(orders),
            conversions,
            "",
            "",
        ]))?
        .len();

        let max_item_length = MAX_LOG_LENGTH.saturating_sub(base_length) / 3;

        let line = serde_json::to_string(&json!([
            compress_state(state, &truncate(&state.trader_data, max_item_length)),
            compress_orders(orders),
            conversions,
            truncate(trader_data, max_item_length),
            truncate(&self.logs, max_item_length),
        ]))?;

        self.logs.clear();
        Ok(line)
    }
}

fn compress_state(state: &TradingState, trader_data: &str) -> Value {
    json!([
        state.timestamp,
        trader_data,
        compress_listings(&state.listings),
        compress_order_depths(&state.order_depths),
        compress_trades(&state.own_trades),
        compress_trades(&state.market_trades),
        state.position,
        compress_observations(&state.observations),
    ])
}

fn compress_listings(listings: &HashMap<Symbol, Listing>) -> Value {
    Value::Array(
        listings
            .values()
            .map(|l| json!([l.symbol, l.product, l.denomination]))
            .collect(),
    )
}

fn compress_order_depths(depths: &HashMap<Symbol, OrderDepth>) -> Value {
    Value::Object(
        depths
            .iter()
            .map(|(symbol, depth)| (symbol.clone(), json!([depth.buy_orders, depth.sell_orders])))
            .collect(),
    )
}

fn compress_orders(orders: &HashMap<Symbol, Vec<Order>>) -> Value {
    let mut compressed = Vec::new();
    for arr in orders.values() {
        for order in arr {
            compressed.push(json!([order.symbol, order.price, order.quantity]));
        }
    }
    Value::Array(compressed)
}

fn compress_trades(trades: &HashMap<Symbol, Vec<Trade>>) -> Value {
    let mut compressed = Vec::new();
    for arr in trades.values() {
        for trade in arr {
            compressed.push(json!([
                trade.symbol,
                trade.price,
                trade.quantity,
                trade.buyer,
                trade.seller,
                trade.timestamp,
            ]));
        }
    }
    Value::Array(compressed)
}

fn compress_observations(observations: &Observation) -> Value {
    let conversions: serde_json::Map<String, Value> = observations
        .conversion_observations
        .iter()
        .map(|(product, o)| {
            (
                product.clone(),
                json!([
                    o.bid_price,
                    o.ask_price,
                    o.transport_fees,
                    o.export_tariff,
                    o.import_tariff,
                    o.sugar_price,
                    o.sunlight_index,
                ]),
            )
        })
        .collect();

    json!([observations.plain_value_observations, conversions])
}

fn truncate(value: &str, max_length: usize) -> String {
    if value.chars().count() <= max_length {
        return value.to_string();
    }

    let kept: String = value.chars().take(max_length.saturating_sub(3)).collect();
    format!("{kept}...")
}
