//! Shared building blocks of the sniper
//!
//! - `types`: cluster, priority fee and trade configuration
//! - `price`: SOL/USD price cache and its refresher
//! - `stream`: block subscription delivering Pump.fun transactions

pub mod price;
#[cfg(feature = "stream")]
pub mod stream;
pub mod types;
