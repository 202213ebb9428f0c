// Core modules
pub mod arbitrage;
pub mod models;
pub mod runner;
pub mod sink;
pub mod strategy;
pub mod trader;

// Re-export commonly used types
pub use models::*;
pub use strategy::Strategy;
pub use trader::Trader;

// Error handling
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;
