use std::collections::HashMap;

/// Directed exchange-rate table over a small set of currencies
#[derive(Debug, Clone, Default)]
pub struct RateTable {
    currencies: Vec<String>,
    rates: HashMap<(usize, usize), f64>,
}

impl RateTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the rate for converting one unit of `from` into `to`.
    /// Unknown currencies are added to the table.
    pub fn add_rate(&mut self, from: &str, to: &str, rate: f64) {
        let from = self.currency_index(from);
        let to = self.currency_index(to);
        self.rates.insert((from, to), rate);
    }

    pub fn rate(&self, from: &str, to: &str) -> Option<f64> {
        let from = self.currencies.iter().position(|c| c == from)?;
        let to = self.currencies.iter().position(|c| c == to)?;
        self.rates.get(&(from, to)).copied()
    }

    pub fn currencies(&self) -> &[String] {
        &self.currencies
    }

    fn currency_index(&mut self, currency: &str) -> usize {
        if let Some(i) = self.currencies.iter().position(|c| c == currency) {
            return i;
        }
        self.currencies.push(currency.to_string());
        self.currencies.len() - 1
    }
}

/// Best trading cycle found for a start currency
#[derive(Debug, Clone, PartialEq)]
pub struct Cycle {
    /// Profit multiplier over the whole cycle; 1.0 means no profitable
    /// cycle was found
    pub profit: f64,
    /// Currency sequence starting and ending at the start currency;
    /// empty when no profitable cycle exists
    pub path: Vec<String>,
}

impl Cycle {
    fn none() -> Self {
        Self {
            profit: 1.0,
            path: Vec::new(),
        }
    }
}

/// Most profitable cycle starting and ending at `start` using at most
/// `max_trades` conversions. Currencies may be revisited mid-cycle.
///
/// Dynamic program over trade count: `best[k][v]` is the highest product
/// of rates over any k-trade path from the start to currency `v`, with
/// predecessors kept for path reconstruction. Equivalent to running
/// Bellman-Ford per path length on negative log rates, but staying in
/// profit space avoids the round trip through logarithms.
pub fn best_cycle(table: &RateTable, start: &str, max_trades: usize) -> Cycle {
    let n = table.currencies.len();
    let start_index = match table.currencies.iter().position(|c| c == start) {
        Some(i) => i,
        None => return Cycle::none(),
    };

    let mut best = vec![vec![f64::NEG_INFINITY; n]; max_trades + 1];
    let mut parent = vec![vec![usize::MAX; n]; max_trades + 1];
    best[0][start_index] = 1.0;

    for k in 1..=max_trades {
        for from in 0..n {
            if best[k - 1][from] == f64::NEG_INFINITY {
                continue;
            }
            for to in 0..n {
                let Some(&rate) = table.rates.get(&(from, to)) else {
                    continue;
                };
                let profit = best[k - 1][from] * rate;
                if profit > best[k][to] {
                    best[k][to] = profit;
                    parent[k][to] = from;
                }
            }
        }
    }

    let mut result = Cycle::none();
    for k in 1..=max_trades {
        let profit = best[k][start_index];
        if profit > result.profit {
            let mut indices = vec![start_index];
            let mut node = start_index;
            for step in (1..=k).rev() {
                node = parent[step][node];
                indices.push(node);
            }
            indices.reverse();

            result.profit = profit;
            result.path = indices
                .into_iter()
                .map(|i| table.currencies[i].clone())
                .collect();
        }
    }

    result
}

/// Human-readable summary of a cycle search
pub fn format_cycle(cycle: &Cycle) -> String {
    if cycle.path.is_empty() {
        return "No profitable arbitrage cycle found.".to_string();
    }

    format!(
        "Most profitable arbitrage cycle: {}\nProfit multiplier: {:.6}x",
        cycle.path.join(" -> "),
        cycle.profit
    )
}

/// Exchange rates published for the manual round
pub fn manual_round_table() -> RateTable {
    let mut table = RateTable::new();
    let rates = [
        ("SNOWBALLS", "SNOWBALLS", 1.0),
        ("SNOWBALLS", "PIZZAS", 1.45),
        ("SNOWBALLS", "NUGGETS", 0.52),
        ("SNOWBALLS", "SEASHELLS", 0.72),
        ("PIZZAS", "SNOWBALLS", 0.7),
        ("PIZZAS", "PIZZAS", 1.0),
        ("PIZZAS", "NUGGETS", 0.31),
        ("PIZZAS", "SEASHELLS", 0.48),
        ("NUGGETS", "SNOWBALLS", 1.95),
        ("NUGGETS", "PIZZAS", 3.1),
        ("NUGGETS", "NUGGETS", 1.0),
        ("NUGGETS", "SEASHELLS", 1.49),
        ("SEASHELLS", "SNOWBALLS", 1.34),
        ("SEASHELLS", "PIZZAS", 1.98),
        ("SEASHELLS", "NUGGETS", 0.64),
        ("SEASHELLS", "SEASHELLS", 1.0),
    ];
    for (from, to, rate) in rates {
        table.add_rate(from, to, rate);
    }
    table
}
