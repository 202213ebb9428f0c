use crate::models::{Symbol, TradingState};
use crate::strategy::Quoter;

/// Rainforest resin trades in a tight band around a stable anchor price.
pub const RESIN_ANCHOR: f64 = 10_000.0;

/// Constant fair value quoter for rainforest resin
#[derive(Debug, Clone, Copy, Default)]
pub struct ResinQuoter;

impl Quoter for ResinQuoter {
    fn true_value(&mut self, _state: &TradingState, _symbol: &Symbol) -> Option<f64> {
        Some(RESIN_ANCHOR)
    }
}
