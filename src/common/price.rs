//! SOL/USD price used to value new tokens
//!
//! A background task refreshes a shared [`PriceCache`] on a fixed interval.
//! Readers never wait on the oracle: they see the last price that was fetched,
//! or zero before the first successful fetch.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use isahc::{config::Configurable, AsyncReadResponseExt, Request, RequestExt};
use parking_lot::RwLock;
use serde::Deserialize;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::ClientError;

/// CoinGecko simple price endpoint for SOL in USD
pub const COINGECKO_SOL_USD_URL: &str =
    "https://api.coingecko.com/api/v3/simple/price?ids=solana&vs_currencies=usd";

/// Default refresh interval of the price cache
pub const PRICE_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// Default upper bound on one price request
pub const PRICE_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Shared handle to the latest SOL/USD price
///
/// Cloning the handle shares the underlying value. Writes replace the value,
/// last write wins.
#[derive(Debug, Clone, Default)]
pub struct PriceCache {
    inner: Arc<RwLock<f64>>,
}

impl PriceCache {
    /// Creates an empty cache holding 0.0
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest price, 0.0 while unknown
    pub fn get(&self) -> f64 {
        *self.inner.read()
    }

    pub fn set(&self, price: f64) {
        *self.inner.write() = price;
    }
}

/// Source of the SOL/USD price
#[async_trait]
pub trait PriceOracle: Send + Sync {
    /// Fetches the current price of one SOL in USD
    ///
    /// # Errors
    ///
    /// Returns `PriceOracleError` when the price cannot be fetched or is not
    /// strictly positive.
    async fn fetch_sol_usd(&self) -> Result<f64, ClientError>;
}

/// Price oracle backed by the CoinGecko public API
///
/// A request still pending after `timeout` fails, so a hung endpoint cannot
/// stall the refresher past its next tick.
#[derive(Debug, Clone)]
pub struct CoinGeckoOracle {
    pub url: String,
    pub timeout: Duration,
}

impl CoinGeckoOracle {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: PRICE_REQUEST_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Deserialize)]
struct SimplePrice {
    solana: UsdQuote,
}

#[derive(Debug, Deserialize)]
struct UsdQuote {
    usd: f64,
}

/// Extracts the SOL/USD price from a CoinGecko `simple/price` response body
///
/// # Errors
///
/// Returns `PriceOracleError` when the body does not parse or the price is not
/// strictly positive.
pub fn parse_simple_price(body: &str) -> Result<f64, ClientError> {
    let parsed: SimplePrice =
        serde_json::from_str(body).map_err(|err| ClientError::PriceOracleError(err.into()))?;

    let price = parsed.solana.usd;
    if !(price > 0.0 && price.is_finite()) {
        return Err(ClientError::PriceOracleError(
            format!("invalid SOL price {}", price).into(),
        ));
    }
    Ok(price)
}

#[async_trait]
impl PriceOracle for CoinGeckoOracle {
    async fn fetch_sol_usd(&self) -> Result<f64, ClientError> {
        let request = Request::get(self.url.as_str())
            .timeout(self.timeout)
            .body(())
            .map_err(|err| ClientError::PriceOracleError(err.into()))?;
        let mut response = request
            .send_async()
            .await
            .map_err(|err| ClientError::PriceOracleError(err.into()))?;

        if !response.status().is_success() {
            return Err(ClientError::PriceOracleError(
                format!("price request failed with status {}", response.status()).into(),
            ));
        }

        let body = response
            .text()
            .await
            .map_err(|err| ClientError::PriceOracleError(err.into()))?;
        parse_simple_price(&body)
    }
}

/// Spawns the background task keeping `cache` up to date
///
/// Fetches once immediately and then on every `interval` tick. A failed fetch
/// is logged and leaves the previous price in place.
pub fn spawn_price_refresher(
    cache: PriceCache,
    oracle: Arc<dyn PriceOracle>,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            match oracle.fetch_sol_usd().await {
                Ok(price) => {
                    cache.set(price);
                    debug!(sol_usd = price, "Updated SOL price");
                }
                Err(err) => warn!(error = %err, "Failed to refresh SOL price"),
            }
        }
    })
}
