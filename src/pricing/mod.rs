//! Pricing of freshly created tokens
//!
//! Valuation and buy sizing both start from [`CurveModel::after_deposit`] so the
//! two can never disagree on the reserves they work from.

mod bonding_curve;

pub use bonding_curve::*;

use crate::constants::trade::MARKET_CAP_THRESHOLD_USD;

/// Minimum USD market cap a token needs before it is bought
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarketCapThreshold(pub f64);

impl MarketCapThreshold {
    /// Whether a token valued at `result` should be bought at `sol_usd`
    ///
    /// An unknown SOL price (zero, negative or NaN) never buys.
    pub fn should_buy(&self, result: &PricingResult, sol_usd: f64) -> bool {
        sol_usd > 0.0 && result.market_cap_usd >= self.0
    }
}

impl Default for MarketCapThreshold {
    fn default() -> Self {
        Self(MARKET_CAP_THRESHOLD_USD)
    }
}
