//! Virtual constant-product curve of a freshly created token
//!
//! Pump.fun seeds every bonding curve with the same virtual reserves. The
//! reserves right after the creator's initial deposit are enough to value the
//! token and to size a buy against it.

use crate::{
    constants::curve::{
        INITIAL_VIRTUAL_SOL, INITIAL_VIRTUAL_TOKENS, LAMPORTS_PER_SOL, TOKEN_BASE_UNITS,
        TOTAL_SUPPLY,
    },
    error::ClientError,
};

/// Parameters of the virtual curve every new token starts on
///
/// # Fields
///
/// * `virtual_sol` - Virtual SOL reserve of a fresh curve, in SOL
/// * `virtual_tokens` - Virtual token reserve of a fresh curve, in whole tokens
/// * `total_supply` - Whole tokens minted, used for the market cap
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveModel {
    pub virtual_sol: f64,
    pub virtual_tokens: f64,
    pub total_supply: f64,
}

impl CurveModel {
    /// The curve Pump.fun seeds every token with
    pub const PUMPFUN: Self = Self {
        virtual_sol: INITIAL_VIRTUAL_SOL,
        virtual_tokens: INITIAL_VIRTUAL_TOKENS,
        total_supply: TOTAL_SUPPLY,
    };

    /// Constant product `virtual_sol * virtual_tokens`
    pub fn k(&self) -> f64 {
        self.virtual_sol * self.virtual_tokens
    }

    /// Reserves after the creator deposited `deposit_lamports` into the curve
    pub fn after_deposit(&self, deposit_lamports: u64) -> CurveState {
        let k = self.k();
        let virtual_sol = self.virtual_sol + lamports_to_sol(deposit_lamports);

        CurveState {
            virtual_sol,
            virtual_tokens: k / virtual_sol,
            k,
        }
    }

    /// Values the token after the creator's deposit
    ///
    /// # Arguments
    ///
    /// * `deposit_lamports` - Creator's initial deposit
    /// * `sol_usd` - Current USD price of one SOL
    pub fn valuation(&self, deposit_lamports: u64, sol_usd: f64) -> PricingResult {
        let state = self.after_deposit(deposit_lamports);
        let price_in_sol = state.price_in_sol();
        let market_cap_sol = price_in_sol * self.total_supply;

        PricingResult {
            state,
            price_in_sol,
            market_cap_sol,
            market_cap_usd: market_cap_sol * sol_usd,
        }
    }
}

impl Default for CurveModel {
    fn default() -> Self {
        Self::PUMPFUN
    }
}

/// Virtual reserves at one point on the curve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveState {
    /// Virtual SOL reserve, in SOL
    pub virtual_sol: f64,
    /// Virtual token reserve, in whole tokens
    pub virtual_tokens: f64,
    /// Constant product the reserves stay on
    pub k: f64,
}

impl CurveState {
    /// Price of one whole token in SOL
    pub fn price_in_sol(&self) -> f64 {
        self.virtual_sol / self.virtual_tokens
    }

    /// Reserves after buying with `budget_lamports`
    pub fn simulate_buy(&self, budget_lamports: u64) -> CurveState {
        let virtual_sol = self.virtual_sol + lamports_to_sol(budget_lamports);

        CurveState {
            virtual_sol,
            virtual_tokens: self.k / virtual_sol,
            k: self.k,
        }
    }

    /// Whole tokens received for `budget_lamports`
    pub fn tokens_out(&self, budget_lamports: u64) -> f64 {
        self.virtual_tokens - self.simulate_buy(budget_lamports).virtual_tokens
    }

    /// Token base units received for `budget_lamports`
    ///
    /// # Errors
    ///
    /// Returns `SizingError` when the output is not a positive number of base
    /// units.
    pub fn buy_amount(&self, budget_lamports: u64) -> Result<u64, ClientError> {
        let tokens = self.tokens_out(budget_lamports);
        if !tokens.is_finite() || tokens <= 0.0 {
            return Err(ClientError::SizingError(format!(
                "non-positive token output {tokens} for {budget_lamports} lamports"
            )));
        }

        let base_units = (tokens * TOKEN_BASE_UNITS as f64) as u64;
        if base_units == 0 {
            return Err(ClientError::SizingError(format!(
                "token output {tokens} rounds to zero base units"
            )));
        }

        Ok(base_units)
    }
}

/// Valuation of a token right after creation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricingResult {
    /// Reserves the valuation was computed from
    pub state: CurveState,
    pub price_in_sol: f64,
    pub market_cap_sol: f64,
    pub market_cap_usd: f64,
}

fn lamports_to_sol(lamports: u64) -> f64 {
    lamports as f64 / LAMPORTS_PER_SOL as f64
}
