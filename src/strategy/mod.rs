// Trading strategy module
pub mod kelp;
pub mod market_making;
pub mod resin;

pub use kelp::KelpQuoter;
pub use market_making::{MarketMaker, Quoter};
pub use resin::ResinQuoter;

use crate::models::{Order, Symbol, TradingState};
use crate::Result;
use serde_json::Value;

/// Base trait for all trading strategies
pub trait Strategy: Send {
    /// Symbol this strategy trades
    fn symbol(&self) -> &Symbol;

    /// Produce orders for the current exchange snapshot
    fn act(&mut self, state: &TradingState) -> Result<Vec<Order>>;

    /// Snapshot per-iteration state to carry through the trader data string
    fn save(&self) -> Value {
        Value::Null
    }

    /// Restore state saved by a previous iteration
    fn load(&mut self, _data: &Value) {}
}
