#![doc = include_str!("../RUSTDOC.md")]

pub mod common;
pub mod constants;
pub mod decoder;
pub mod error;
pub mod instructions;
pub mod pricing;
pub mod utils;

use std::{future::Future, sync::Arc};

use async_trait::async_trait;
use common::{
    price::PriceCache,
    types::{Cluster, TradeSettings},
};
use decoder::{AddressTable, CreationEvent, Role, TransactionUpdate};
use error::ClientError;
use solana_client::{nonblocking::rpc_client::RpcClient, rpc_config::RpcSendTransactionConfig};
use solana_sdk::{
    commitment_config::{CommitmentConfig, CommitmentLevel},
    hash::Hash,
    instruction::CompiledInstruction,
    signature::{Keypair, Signature},
    signer::Signer,
    transaction::Transaction,
};
use tokio::{sync::Mutex, time::timeout};
use tracing::{debug, info, warn};

/// Ledger operations a buy needs
///
/// Implemented for the nonblocking [`RpcClient`]; tests substitute their own.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Fetches a recent blockhash to sign with
    async fn latest_blockhash(&self) -> Result<Hash, ClientError>;

    /// Submits a signed transaction and returns its signature
    async fn send_transaction(&self, transaction: &Transaction) -> Result<Signature, ClientError>;
}

#[async_trait]
impl Ledger for RpcClient {
    async fn latest_blockhash(&self) -> Result<Hash, ClientError> {
        let (blockhash, _) = self
            .get_latest_blockhash_with_commitment(CommitmentConfig::processed())
            .await?;
        Ok(blockhash)
    }

    /// Submits without preflight simulation
    async fn send_transaction(&self, transaction: &Transaction) -> Result<Signature, ClientError> {
        let signature = self
            .send_transaction_with_config(
                transaction,
                RpcSendTransactionConfig {
                    skip_preflight: true,
                    preflight_commitment: Some(CommitmentLevel::Processed),
                    ..Default::default()
                },
            )
            .await?;
        Ok(signature)
    }
}

/// Serializes buy attempts
///
/// At most one attempt runs at a time across every clone of the guard. Later
/// attempts wait their turn in arrival order; none is dropped.
#[derive(Debug, Clone, Default)]
pub struct BuyGuard {
    lock: Arc<Mutex<()>>,
}

impl BuyGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `attempt` while holding the guard
    pub async fn run<F, T>(&self, attempt: F) -> T
    where
        F: Future<Output = T>,
    {
        let _held = self.lock.lock().await;
        attempt.await
    }
}

/// Why a `create` was not priced
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// The instruction lists too few accounts to be a `create`
    MalformedCreate,
    /// Mint or bonding curve accounts could not be resolved
    MissingRoles(Vec<Role>),
    /// No initial deposit from the creator into the bonding curve
    NoDeposit,
    /// The SOL/USD price is not known yet
    PriceUnavailable,
}

/// Result of handling one `create` instruction
#[derive(Debug)]
pub enum ProcessOutcome {
    /// Valued below the market cap threshold
    BelowThreshold { market_cap_usd: f64 },
    /// Not priced
    Skipped(SkipReason),
    /// Buy submitted
    Submitted(Signature),
    /// Buy attempt aborted
    Failed(ClientError),
}

/// Sniper buying freshly created Pump.fun tokens
///
/// # Examples
///
/// ```no_run
/// use pumpfun_sniper::{
///     common::{
///         price::PriceCache,
///         types::{Cluster, TradeSettings},
///     },
///     Sniper,
/// };
/// use solana_sdk::{commitment_config::CommitmentConfig, signature::Keypair};
/// use std::sync::Arc;
///
/// let payer = Arc::new(Keypair::new());
/// let cluster = Cluster::new(
///     "http://localhost:8899",
///     "ws://localhost:8900",
///     CommitmentConfig::processed(),
/// );
/// let sniper = Sniper::new(payer, &cluster, TradeSettings::default(), PriceCache::new());
/// ```
pub struct Sniper {
    /// Keypair paying for and signing every buy
    pub payer: Arc<Keypair>,
    /// Source of blockhashes and sink of signed buys
    pub ledger: Arc<dyn Ledger>,
    pub settings: TradeSettings,
    /// SOL/USD price kept fresh by a background task
    pub prices: PriceCache,
    pub guard: BuyGuard,
}

impl Sniper {
    /// Creates a sniper submitting through the cluster's HTTP RPC endpoint
    pub fn new(
        payer: Arc<Keypair>,
        cluster: &Cluster,
        settings: TradeSettings,
        prices: PriceCache,
    ) -> Self {
        let rpc = Arc::new(RpcClient::new_with_commitment(
            cluster.rpc.http.clone(),
            cluster.commitment,
        ));
        Self::with_ledger(payer, rpc, settings, prices)
    }

    /// Creates a sniper on top of any ledger
    pub fn with_ledger(
        payer: Arc<Keypair>,
        ledger: Arc<dyn Ledger>,
        settings: TradeSettings,
        prices: PriceCache,
    ) -> Self {
        Self {
            payer,
            ledger,
            settings,
            prices,
            guard: BuyGuard::new(),
        }
    }

    /// Handles every `create` instruction of a transaction, in order
    ///
    /// Transactions without a `create` yield an empty list. Errors never
    /// escape: each instruction's failure is reported in its own outcome.
    pub async fn process_transaction(&self, update: &TransactionUpdate) -> Vec<ProcessOutcome> {
        let table = update.address_table();
        let creates = decoder::find_create_instructions(&table, &update.instructions);

        let mut outcomes = Vec::with_capacity(creates.len());
        for ix in creates {
            let outcome = self.process_create(update, &table, ix).await;
            outcomes.push(outcome);
        }
        outcomes
    }

    async fn process_create(
        &self,
        update: &TransactionUpdate,
        table: &AddressTable,
        ix: &CompiledInstruction,
    ) -> ProcessOutcome {
        let signature = update.signature;

        let Some(event) = decoder::decode_create(table, ix) else {
            debug!(%signature, accounts = ix.accounts.len(), "Skipping malformed create");
            return ProcessOutcome::Skipped(SkipReason::MalformedCreate);
        };

        let missing = event.missing_for_pricing();
        if !missing.is_empty() {
            let error = ClientError::IncompleteDecode(missing.clone());
            warn!(%signature, %error, "Skipping create");
            return ProcessOutcome::Skipped(SkipReason::MissingRoles(missing));
        }

        let deposit = decoder::extract_initial_deposit(
            table,
            &update.inner_instructions,
            event.creator.as_ref(),
            event.bonding_curve.as_ref(),
        );
        if deposit == 0 {
            debug!(%signature, "Skipping create without initial deposit");
            return ProcessOutcome::Skipped(SkipReason::NoDeposit);
        }
        let event = event.with_initial_deposit(deposit);

        let sol_usd = self.prices.get();
        if sol_usd.is_nan() || sol_usd <= 0.0 {
            warn!(%signature, "Skipping create, SOL price unavailable");
            return ProcessOutcome::Skipped(SkipReason::PriceUnavailable);
        }

        let result = self.settings.curve.valuation(deposit, sol_usd);
        let mint = event.mint.unwrap_or_default();
        let symbol = event.metadata.as_ref().map(|m| m.symbol.as_str()).unwrap_or("?");
        if !self.settings.threshold.should_buy(&result, sol_usd) {
            debug!(%mint, symbol, market_cap_usd = result.market_cap_usd, "Below threshold");
            return ProcessOutcome::BelowThreshold {
                market_cap_usd: result.market_cap_usd,
            };
        }

        info!(
            %mint,
            symbol,
            deposit_lamports = deposit,
            market_cap_usd = result.market_cap_usd,
            "Target acquired"
        );

        match self.guard.run(self.attempt_buy(&event, table)).await {
            Ok(signature) => ProcessOutcome::Submitted(signature),
            Err(err) => {
                warn!(%mint, error = %err, "Buy aborted");
                ProcessOutcome::Failed(err)
            }
        }
    }

    /// Assembles, signs and submits one buy
    ///
    /// Must run under the guard.
    async fn attempt_buy(
        &self,
        event: &CreationEvent,
        table: &AddressTable,
    ) -> Result<Signature, ClientError> {
        let policy = self.settings.submit;
        let plan = utils::transaction::build_buy_plan(
            event,
            table,
            &self.payer.pubkey(),
            &self.settings,
        )?;

        let blockhash = timeout(policy.timeout, self.ledger.latest_blockhash())
            .await
            .map_err(|_| ClientError::Timeout("latest blockhash"))??;
        let transaction = plan.sign(blockhash, &self.payer)?;

        info!(
            mint = %event.mint.unwrap_or_default(),
            token_amount = plan.token_amount_out,
            max_sol_cost = plan.max_sol_cost,
            "Buy attempted"
        );

        let mut last_error = ClientError::OtherError("no submission attempted".to_string());
        for attempt in 1..=policy.max_attempts.max(1) {
            match timeout(policy.timeout, self.ledger.send_transaction(&transaction)).await {
                Ok(Ok(signature)) => {
                    info!(%signature, attempt, "Buy submitted");
                    return Ok(signature);
                }
                Ok(Err(err)) => last_error = err,
                Err(_) => last_error = ClientError::Timeout("send transaction"),
            }
            debug!(attempt, error = %last_error, "Submission failed");
        }
        Err(last_error)
    }

    /// Processes the stream until it ends
    ///
    /// Transactions are handled one at a time in delivery order.
    ///
    /// # Errors
    ///
    /// Returns the transport error that ended the stream, or `StreamClosed`.
    #[cfg(feature = "stream")]
    pub async fn run(
        &self,
        mut subscription: common::stream::Subscription,
    ) -> Result<(), ClientError> {
        while let Some(update) = subscription.next().await {
            let update = update?;
            self.process_transaction(&update).await;
        }
        Err(ClientError::StreamClosed)
    }
}
