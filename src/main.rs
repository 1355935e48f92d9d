use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::{anyhow, Result};
use clap::Parser;
use pumpfun_sniper::{
    common::{
        price::{
            spawn_price_refresher, CoinGeckoOracle, PriceCache, COINGECKO_SOL_USD_URL,
            PRICE_REFRESH_INTERVAL, PRICE_REQUEST_TIMEOUT,
        },
        stream,
        types::{Cluster, SubmitPolicy, TradeSettings},
    },
    constants::trade,
    pricing::MarketCapThreshold,
    Sniper,
};
use solana_sdk::{commitment_config::CommitmentConfig, signature::read_keypair_file, signer::Signer};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Buys Pump.fun tokens whose creator deposit values them above a market cap
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Keypair file of the buyer
    #[arg(long, env = "BUYER_PRIVATE_KEY_PATH")]
    keypair: PathBuf,

    /// HTTP RPC endpoint used to fetch blockhashes and submit buys
    #[arg(long, env = "RPC_HTTP_URL", default_value = "https://api.mainnet-beta.solana.com")]
    rpc_http_url: String,

    /// WebSocket endpoint the block stream subscribes to
    ///
    /// Must serve `blockSubscribe`. Public mainnet endpoints do not; use a
    /// provider or a validator started with `--rpc-pubsub-enable-block-subscription`.
    #[arg(long, env = "RPC_WS_URL")]
    rpc_ws_url: String,

    /// Minimum market cap in USD worth buying
    #[arg(
        long,
        env = "MARKET_CAP_THRESHOLD_USD",
        default_value_t = trade::MARKET_CAP_THRESHOLD_USD
    )]
    threshold_usd: f64,

    /// SOL spent per buy, in lamports
    #[arg(long, env = "BUY_AMOUNT_LAMPORTS", default_value_t = trade::BUY_AMOUNT_LAMPORTS)]
    buy_amount_lamports: u64,

    /// Slippage tolerance in basis points
    #[arg(long, env = "SLIPPAGE_BASIS_POINTS", default_value_t = trade::SLIPPAGE_BASIS_POINTS)]
    slippage_bps: u64,

    /// Seconds between SOL price refreshes
    #[arg(long, env = "PRICE_REFRESH_SECS", default_value_t = PRICE_REFRESH_INTERVAL.as_secs())]
    price_refresh_secs: u64,

    /// Seconds before a blockhash fetch or submission is abandoned
    #[arg(long, env = "SUBMIT_TIMEOUT_SECS", default_value_t = 10)]
    submit_timeout_secs: u64,

    /// SOL/USD price endpoint
    #[arg(long, env = "PRICE_URL", default_value = COINGECKO_SOL_USD_URL)]
    price_url: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let payer = read_keypair_file(&args.keypair)
        .map_err(|err| anyhow!("Failed to read keypair {}: {}", args.keypair.display(), err))?;
    let payer = Arc::new(payer);

    // Blockhashes and preflight at processed; the stream raises itself to confirmed
    let cluster = Cluster::new(
        args.rpc_http_url,
        args.rpc_ws_url,
        CommitmentConfig::processed(),
    );
    let settings = TradeSettings {
        threshold: MarketCapThreshold(args.threshold_usd),
        buy_amount_lamports: args.buy_amount_lamports,
        slippage_basis_points: args.slippage_bps,
        submit: SubmitPolicy {
            timeout: Duration::from_secs(args.submit_timeout_secs),
            ..SubmitPolicy::default()
        },
        ..TradeSettings::default()
    };

    info!(
        buyer = %payer.pubkey(),
        threshold_usd = settings.threshold.0,
        buy_amount_lamports = settings.buy_amount_lamports,
        "Starting sniper"
    );

    let refresh_interval = Duration::from_secs(args.price_refresh_secs);
    let oracle = CoinGeckoOracle::new(args.price_url)
        .with_timeout(PRICE_REQUEST_TIMEOUT.min(refresh_interval));
    let prices = PriceCache::new();
    let refresher = spawn_price_refresher(prices.clone(), Arc::new(oracle), refresh_interval);

    let sniper = Sniper::new(payer, &cluster, settings, prices);
    let subscription = stream::subscribe(cluster, None, None).await?;

    let result = sniper.run(subscription).await;
    refresher.abort();

    if let Err(err) = &result {
        error!(error = %err, "Stream ended");
    }
    result.map_err(Into::into)
}
