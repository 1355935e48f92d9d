//! Block stream of Pump.fun transactions
//!
//! Subscribes to every block that mentions the Pump.fun program over the
//! validator's PubSub WebSocket and turns each successful transaction into a
//! [`TransactionUpdate`].

use std::str::FromStr;

use futures::StreamExt;
use solana_client::{
    nonblocking::pubsub_client::PubsubClient,
    rpc_config::{RpcBlockSubscribeConfig, RpcBlockSubscribeFilter},
};
use solana_sdk::{
    commitment_config::CommitmentConfig, instruction::CompiledInstruction, pubkey::Pubkey,
};
use solana_transaction_status::{
    option_serializer::OptionSerializer, EncodedTransactionWithStatusMeta, TransactionDetails,
    UiInnerInstructions, UiInstruction, UiLoadedAddresses, UiTransactionEncoding,
};
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{debug, info};

use super::types::Cluster;
use crate::{
    constants,
    decoder::{InnerInstructions, TransactionUpdate},
    error::ClientError,
};

/// Capacity of the channel between the WebSocket task and the consumer
const UPDATE_BUFFER: usize = 1_000;

/// Represents an active WebSocket subscription to Pump.fun blocks
///
/// Updates are delivered in block order through [`Subscription::next`]. The
/// subscription is torn down when this object is dropped.
pub struct Subscription {
    pub task: JoinHandle<()>,
    pub unsubscribe: Box<dyn Fn() + Send>,
    updates: mpsc::Receiver<Result<TransactionUpdate, ClientError>>,
}

impl Subscription {
    pub fn new(
        task: JoinHandle<()>,
        unsubscribe: Box<dyn Fn() + Send>,
        updates: mpsc::Receiver<Result<TransactionUpdate, ClientError>>,
    ) -> Self {
        Subscription {
            task,
            unsubscribe,
            updates,
        }
    }

    /// Waits for the next transaction update
    ///
    /// Returns `None` once the WebSocket task has finished. A transport failure
    /// is delivered as an error right before that.
    pub async fn next(&mut self) -> Option<Result<TransactionUpdate, ClientError>> {
        self.updates.recv().await
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        (self.unsubscribe)();
        self.task.abort();
    }
}

/// Subscribes to blocks mentioning the Pump.fun program
///
/// # Arguments
///
/// * `cluster` - Solana cluster configuration containing RPC endpoints
/// * `mentioned` - Optional account to filter blocks by. If None, uses the Pump.fun program
/// * `commitment` - Optional commitment level for the subscription. If None, uses the
///   cluster's. Raised to `confirmed` when lower, see [`block_subscribe_config`]
///
/// # Returns
///
/// Returns a `Subscription` delivering one `TransactionUpdate` per successful
/// transaction, in the order the blocks arrive.
///
/// # Errors
///
/// Returns an error if the WebSocket connection cannot be established. A
/// rejected `blockSubscribe` request is delivered through the subscription.
pub async fn subscribe(
    cluster: Cluster,
    mentioned: Option<String>,
    commitment: Option<CommitmentConfig>,
) -> Result<Subscription, ClientError> {
    let pubsub_client = PubsubClient::new(&cluster.rpc.ws).await?;

    let (stop_tx, mut stop_rx) = mpsc::channel::<()>(1);
    let (updates_tx, updates_rx) = mpsc::channel(UPDATE_BUFFER);

    let filter = RpcBlockSubscribeFilter::MentionsAccountOrProgram(
        mentioned.unwrap_or(constants::accounts::PUMPFUN.to_string()),
    );
    let config = block_subscribe_config(commitment.unwrap_or(cluster.commitment));

    let task = tokio::spawn(async move {
        let (mut stream, unsubscribe) =
            match pubsub_client.block_subscribe(filter, Some(config)).await {
                Ok(subscription) => subscription,
                Err(err) => {
                    let _ = updates_tx.send(Err(err.into())).await;
                    return;
                }
            };
        info!("Subscribed to Pump.fun blocks");

        loop {
            let update = tokio::select! {
                _ = stop_rx.recv() => break,
                update = stream.next() => update,
            };
            let Some(update) = update else {
                let _ = updates_tx.send(Err(ClientError::StreamClosed)).await;
                break;
            };

            let slot = update.value.slot;
            let Some(block) = update.value.block else {
                debug!(slot, "Block update without block");
                continue;
            };

            for encoded in block.transactions.unwrap_or_default() {
                if let Some(tx) = transaction_update(slot, encoded) {
                    if updates_tx.send(Ok(tx)).await.is_err() {
                        return;
                    }
                }
            }
        }

        drop(stream);
        unsubscribe().await;
    });

    Ok(Subscription::new(
        task,
        Box::new(move || {
            let _ = stop_tx.try_send(());
        }),
        updates_rx,
    ))
}

/// Configuration of the block subscription
///
/// The validator rejects `blockSubscribe` below `confirmed`, so `processed` is
/// raised to `confirmed`. Transactions come base64 encoded with full details
/// and version 0 messages allowed.
pub fn block_subscribe_config(commitment: CommitmentConfig) -> RpcBlockSubscribeConfig {
    let commitment = if commitment.is_at_least_confirmed() {
        commitment
    } else {
        CommitmentConfig::confirmed()
    };

    RpcBlockSubscribeConfig {
        commitment: Some(commitment),
        encoding: Some(UiTransactionEncoding::Base64),
        transaction_details: Some(TransactionDetails::Full),
        show_rewards: Some(false),
        max_supported_transaction_version: Some(0),
    }
}

/// Converts one transaction of a block into a `TransactionUpdate`
///
/// Returns `None` for failed transactions, transactions without status meta and
/// payloads that do not decode.
pub fn transaction_update(
    slot: u64,
    encoded: EncodedTransactionWithStatusMeta,
) -> Option<TransactionUpdate> {
    let meta = encoded.meta?;
    if meta.err.is_some() {
        return None;
    }
    let tx = encoded.transaction.decode()?;

    let (loaded_writable, loaded_readonly) = match &meta.loaded_addresses {
        OptionSerializer::Some(loaded) => parse_loaded_addresses(loaded),
        _ => (Vec::new(), Vec::new()),
    };
    let inner_instructions = match &meta.inner_instructions {
        OptionSerializer::Some(inner) => parse_inner_instructions(inner),
        _ => Vec::new(),
    };

    Some(TransactionUpdate {
        signature: tx.signatures.first().copied().unwrap_or_default(),
        slot,
        account_keys: tx.message.static_account_keys().to_vec(),
        loaded_writable,
        loaded_readonly,
        instructions: tx.message.instructions().to_vec(),
        inner_instructions,
    })
}

/// Parses the lookup-table addresses of a transaction
///
/// Addresses that are not valid base-58 public keys are dropped.
pub fn parse_loaded_addresses(loaded: &UiLoadedAddresses) -> (Vec<Pubkey>, Vec<Pubkey>) {
    let parse = |keys: &[String]| {
        keys.iter()
            .filter_map(|key| Pubkey::from_str(key).ok())
            .collect::<Vec<_>>()
    };
    (parse(&loaded.writable), parse(&loaded.readonly))
}

/// Parses inner instruction groups
///
/// Only compiled instructions are kept; their payloads are base-58 encoded.
pub fn parse_inner_instructions(groups: &[UiInnerInstructions]) -> Vec<InnerInstructions> {
    groups
        .iter()
        .map(|group| InnerInstructions {
            index: group.index,
            instructions: group
                .instructions
                .iter()
                .filter_map(|ix| match ix {
                    UiInstruction::Compiled(ix) => Some(CompiledInstruction::new_from_raw_parts(
                        ix.program_id_index,
                        bs58::decode(&ix.data).into_vec().ok()?,
                        ix.accounts.clone(),
                    )),
                    UiInstruction::Parsed(_) => None,
                })
                .collect(),
        })
        .collect()
}
