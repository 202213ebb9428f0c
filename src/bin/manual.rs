use reefbot::arbitrage::{best_cycle, format_cycle, manual_round_table};
use reefbot::Result;

/// Solves the manual round: the most profitable conversion cycle through
/// the published exchange-rate table, starting and ending in seashells.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("reefbot=info")
        .init();

    let table = manual_round_table();
    let start = "SEASHELLS";
    let max_trades = 5;

    println!("Currencies: {}", table.currencies().join(", "));
    println!("Start: {} (max {} trades)\n", start, max_trades);

    let cycle = best_cycle(&table, start, max_trades);
    println!("{}", format_cycle(&cycle));

    Ok(())
}
