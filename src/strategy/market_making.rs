use crate::models::{Order, Symbol, TradingState};
use crate::strategy::Strategy;
use crate::Result;
use serde_json::Value;
use std::collections::VecDeque;

/// Number of recent iterations tracked for stuck-at-limit detection
const WINDOW_SIZE: usize = 10;

/// Provides the fair value the market maker quotes around.
pub trait Quoter: Send {
    /// Fair value estimate for the symbol, or `None` when the instrument
    /// cannot be priced on this iteration.
    fn true_value(&mut self, state: &TradingState, symbol: &Symbol) -> Option<f64>;
}

/// Inventory-aware market maker shared by all products.
///
/// Each iteration it takes any resting liquidity that crosses the fair
/// value, then quotes the remainder one tick inside the most popular
/// (highest-volume) level on each side. Inventory beyond half the position
/// limit skews the acceptable buy/sell prices by one tick. A rolling
/// window of at-limit flags triggers liquidation quotes when the position
/// has been pinned at the limit for too long:
/// - soft: at limit for half the window including the latest iteration,
///   quote two ticks through fair value
/// - hard: at limit for the entire window, quote at fair value
pub struct MarketMaker<Q: Quoter> {
    symbol: Symbol,
    limit: i64,
    quoter: Q,
    window: VecDeque<bool>,
}

impl<Q: Quoter> MarketMaker<Q> {
    pub fn new(symbol: impl Into<Symbol>, limit: i64, quoter: Q) -> Self {
        Self {
            symbol: symbol.into(),
            limit,
            quoter,
            window: VecDeque::new(),
        }
    }

    fn order(&self, price: i64, quantity: i64) -> Order {
        Order {
            symbol: self.symbol.clone(),
            price,
            quantity,
        }
    }
}

impl<Q: Quoter> Strategy for MarketMaker<Q> {
    fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    fn act(&mut self, state: &TradingState) -> Result<Vec<Order>> {
        let depth = state
            .order_depths
            .get(&self.symbol)
            .ok_or_else(|| format!("no order depth for {}", self.symbol))?;

        let position = state.position.get(&self.symbol).copied().unwrap_or(0);

        self.window.push_back(position.abs() == self.limit);
        if self.window.len() > WINDOW_SIZE {
            self.window.pop_front();
        }

        let true_value = match self.quoter.true_value(state, &self.symbol) {
            Some(v) => v,
            None => {
                tracing::debug!("{}: no fair value this iteration, standing down", self.symbol);
                return Ok(Vec::new());
            }
        };
        let value = true_value.round() as i64;

        let mut to_buy = self.limit - position;
        let mut to_sell = self.limit + position;

        let at_limit = self.window.iter().filter(|&&b| b).count();
        let full_window = self.window.len() == WINDOW_SIZE;
        let latest_at_limit = self.window.back().copied().unwrap_or(false);
        let soft_liquidate = full_window && at_limit * 2 >= WINDOW_SIZE && latest_at_limit;
        let hard_liquidate = full_window && at_limit == WINDOW_SIZE;

        // Long inventory lowers the max buy price; short inventory raises
        // the min sell price.
        let max_buy_price = if position * 2 > self.limit {
            value - 1
        } else {
            value
        };
        let min_sell_price = if position * 2 < -self.limit {
            value + 1
        } else {
            value
        };

        let mut orders = Vec::new();

        // Take asks at or below our max buy price, best price first
        for (&price, &volume) in depth.sell_orders.iter() {
            if to_buy > 0 && price <= max_buy_price {
                let quantity = to_buy.min(-volume);
                orders.push(self.order(price, quantity));
                to_buy -= quantity;
            }
        }

        if to_buy > 0 && hard_liquidate {
            let quantity = to_buy / 2;
            orders.push(self.order(value, quantity));
            to_buy -= quantity;
        }

        if to_buy > 0 && soft_liquidate {
            let quantity = to_buy;
            orders.push(self.order(value - 2, quantity));
            to_buy -= quantity;
        }

        if to_buy > 0 {
            if let Some((&popular_buy, _)) = depth.buy_orders.iter().max_by_key(|&(_, &v)| v) {
                let price = max_buy_price.min(popular_buy + 1);
                orders.push(self.order(price, to_buy));
            }
        }

        // Hit bids at or above our min sell price, best price first
        for (&price, &volume) in depth.buy_orders.iter().rev() {
            if to_sell > 0 && price >= min_sell_price {
                let quantity = to_sell.min(volume);
                orders.push(self.order(price, -quantity));
                to_sell -= quantity;
            }
        }

        if to_sell > 0 && hard_liquidate {
            let quantity = to_sell / 2;
            orders.push(self.order(value, -quantity));
            to_sell -= quantity;
        }

        if to_sell > 0 && soft_liquidate {
            let quantity = to_sell / 2;
            orders.push(self.order(value + 2, -quantity));
            to_sell -= quantity;
        }

        if to_sell > 0 {
            if let Some((&popular_sell, _)) = depth.sell_orders.iter().min_by_key(|&(_, &v)| v) {
                let price = min_sell_price.max(popular_sell - 1);
                orders.push(self.order(price, -to_sell));
            }
        }

        tracing::debug!(
            "{}: value {} position {} -> {} orders",
            self.symbol,
            value,
            position,
            orders.len()
        );

        Ok(orders)
    }

    fn save(&self) -> Value {
        serde_json::to_value(&self.window).unwrap_or(Value::Null)
    }

    fn load(&mut self, data: &Value) {
        if let Some(flags) = data.as_array() {
            self.window = flags.iter().filter_map(Value::as_bool).collect();
        }
    }
}
