use crate::models::{Symbol, TradingState};
use crate::strategy::Quoter;

/// Kelp fair value from recent market trades.
///
/// Weighs each visible market trade by quantity and age (a fill from `n`
/// ticks ago carries factor `n / 100 + 1`), then nudges the weighted
/// average price by a small constant offset observed in historical fills.
///
/// Abstains (returns `None`) when fewer than two market trades are
/// visible or the total weight is zero, so the market maker stands down
/// instead of quoting around a guess.
#[derive(Debug, Clone)]
pub struct KelpQuoter {
    offset: f64,
}

impl KelpQuoter {
    pub fn new(offset: f64) -> Self {
        Self { offset }
    }
}

impl Default for KelpQuoter {
    fn default() -> Self {
        Self::new(0.13)
    }
}

impl Quoter for KelpQuoter {
    fn true_value(&mut self, state: &TradingState, symbol: &Symbol) -> Option<f64> {
        let trades = state.market_trades.get(symbol)?;
        if trades.len() < 2 {
            return None;
        }

        let now = state.timestamp;
        let mut weighted_price = 0.0;
        let mut weight = 0.0;
        for trade in trades {
            let age_factor = (now - trade.timestamp) as f64 / 100.0 + 1.0;
            weighted_price += trade.price as f64 * trade.quantity as f64 * age_factor;
            weight += trade.quantity as f64 * age_factor;
        }

        if weight == 0.0 {
            return None;
        }

        let value = weighted_price / weight + self.offset;
        tracing::debug!("{}: trade-weighted value {:.2}", symbol, value);
        Some(value)
    }
}
