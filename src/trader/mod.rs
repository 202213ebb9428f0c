use crate::models::{Order, Symbol, TradingState};
use crate::sink::LogSink;
use crate::strategy::{KelpQuoter, MarketMaker, ResinQuoter, Strategy};
use crate::Result;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

/// Per-product position limits set by the exchange
const POSITION_LIMITS: &[(&str, i64)] = &[
    ("RAINFOREST_RESIN", 50),
    ("KELP", 50),
    ("SQUID_INK", 50),
];

/// Everything one iteration produces
#[derive(Debug)]
pub struct IterationResult {
    pub orders: HashMap<Symbol, Vec<Order>>,
    pub conversions: i64,
    /// Compact JSON handed back to the exchange and returned to us next
    /// iteration as `TradingState::trader_data`
    pub trader_data: String,
    /// Encoded visualizer log line, ready to print
    pub log_line: String,
}

/// Runs the per-symbol strategies against each exchange snapshot.
///
/// Strategy state survives between iterations only through the trader
/// data string: before acting, each strategy restores what it saved last
/// time; afterwards the fresh snapshots are serialized back into one
/// compact JSON object keyed by symbol.
pub struct Trader {
    strategies: BTreeMap<Symbol, Box<dyn Strategy>>,
    sink: LogSink,
}

impl Default for Trader {
    fn default() -> Self {
        Self::new()
    }
}

impl Trader {
    pub fn new() -> Self {
        let limits: HashMap<&str, i64> = POSITION_LIMITS.iter().copied().collect();

        let mut strategies: BTreeMap<Symbol, Box<dyn Strategy>> = BTreeMap::new();
        strategies.insert(
            "RAINFOREST_RESIN".to_string(),
            Box::new(MarketMaker::new(
                "RAINFOREST_RESIN",
                limits["RAINFOREST_RESIN"],
                ResinQuoter,
            )),
        );
        strategies.insert(
            "KELP".to_string(),
            Box::new(MarketMaker::new(
                "KELP",
                limits["KELP"],
                KelpQuoter::default(),
            )),
        );

        Self {
            strategies,
            sink: LogSink::new(),
        }
    }

    /// Run one iteration against the given exchange snapshot
    pub fn run(&mut self, state: &TradingState) -> Result<IterationResult> {
        self.sink.log(format!("{:?}", state.position));

        let conversions = 0;

        let old_trader_data: HashMap<String, Value> = if state.trader_data.is_empty() {
            HashMap::new()
        } else {
            serde_json::from_str(&state.trader_data)?
        };

        let mut new_trader_data: BTreeMap<String, Value> = BTreeMap::new();
        let mut orders: HashMap<Symbol, Vec<Order>> = HashMap::new();

        for (symbol, strategy) in &mut self.strategies {
            if let Some(saved) = old_trader_data.get(symbol) {
                strategy.load(saved);
            }

            if state.order_depths.contains_key(symbol) {
                orders.insert(symbol.clone(), strategy.act(state)?);
            }

            new_trader_data.insert(symbol.clone(), strategy.save());
        }

        let trader_data = serde_json::to_string(&new_trader_data)?;
        let log_line = self
            .sink
            .flush(state, &orders, conversions, &trader_data)?;

        Ok(IterationResult {
            orders,
            conversions,
            trader_data,
            log_line,
        })
    }
}
