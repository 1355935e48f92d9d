//! Instructions for the Pump.fun Solana Program
//!
//! # Instructions
//!
//! - `Create`: Payload of the token creation the sniper watches for.
//! - `Buy`: Buys tokens from a bonding curve by providing SOL.

mod buy;
mod create;

pub use buy::*;
pub use create::*;
