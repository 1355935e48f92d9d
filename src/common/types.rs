//! Configuration types for the sniper
//!
//! Connection settings live in [`Cluster`]; everything that shapes the buy
//! decision and the buy transaction lives in [`TradeSettings`].

use std::time::Duration;

use serde::{Deserialize, Serialize};
use solana_sdk::commitment_config::CommitmentConfig;

use crate::{
    constants::trade,
    pricing::{CurveModel, MarketCapThreshold},
};

/// Compute budget attached to the buy
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityFee {
    /// Maximum compute units that can be consumed by the transaction
    pub unit_limit: Option<u32>,
    /// Price in micro-lamports per compute unit
    pub unit_price: Option<u64>,
}

impl PriorityFee {
    /// Priority fee attached to every buy
    pub const BUY_DEFAULT: Self = Self {
        unit_limit: Some(trade::COMPUTE_UNIT_LIMIT),
        unit_price: Some(trade::COMPUTE_UNIT_PRICE),
    };
}

/// How a signed buy is handed to the ledger
///
/// # Fields
///
/// * `timeout` - Upper bound on each blockhash fetch and each submission
/// * `max_attempts` - Submissions tried before giving up, at least one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitPolicy {
    pub timeout: Duration,
    pub max_attempts: u32,
}

impl Default for SubmitPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            max_attempts: 1,
        }
    }
}

/// Parameters of the buy decision and of the buy itself
///
/// # Fields
///
/// * `threshold` - Minimum USD market cap worth buying
/// * `buy_amount_lamports` - SOL spent on every buy
/// * `slippage_basis_points` - Tolerance added on top of the budget for `max_sol_cost`
/// * `priority_fee` - Compute budget of the buy transaction
/// * `curve` - Curve used for both valuation and sizing
/// * `submit` - Timeout and retry policy of the submission
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TradeSettings {
    pub threshold: MarketCapThreshold,
    pub buy_amount_lamports: u64,
    pub slippage_basis_points: u64,
    pub priority_fee: PriorityFee,
    pub curve: CurveModel,
    pub submit: SubmitPolicy,
}

impl Default for TradeSettings {
    fn default() -> Self {
        Self {
            threshold: MarketCapThreshold::default(),
            buy_amount_lamports: trade::BUY_AMOUNT_LAMPORTS,
            slippage_basis_points: trade::SLIPPAGE_BASIS_POINTS,
            priority_fee: PriorityFee::BUY_DEFAULT,
            curve: CurveModel::PUMPFUN,
            submit: SubmitPolicy::default(),
        }
    }
}

/// Endpoints of the node the sniper talks to
///
/// `ws` must serve `blockSubscribe`, which most public endpoints disable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcEndpoint {
    /// JSON RPC, used for blockhashes and submissions
    pub http: String,
    /// PubSub, used for the block stream
    pub ws: String,
}

/// Connection settings shared by the ledger client and the block stream
///
/// `commitment` applies to blockhash fetches and preflight. The block stream
/// raises it to `confirmed` when lower, the minimum `blockSubscribe` accepts.
#[derive(Debug, Clone)]
pub struct Cluster {
    pub rpc: RpcEndpoint,
    pub commitment: CommitmentConfig,
}

impl Cluster {
    pub fn new(
        http: impl Into<String>,
        ws: impl Into<String>,
        commitment: CommitmentConfig,
    ) -> Self {
        Self {
            rpc: RpcEndpoint {
                http: http.into(),
                ws: ws.into(),
            },
            commitment,
        }
    }
}
