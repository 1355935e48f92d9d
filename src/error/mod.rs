//! Error types for the sniper.
//!
//! This module defines the `ClientError` enum, which covers every way a single
//! buy attempt, a price refresh or the transaction stream can fail.
//!
//! Per-event errors never stop the processing loop: the event is logged and
//! dropped. Only `StreamClosed` and transport errors surfaced by the stream end
//! the process.
//!
//! # Error Types
//!
//! - `IncompleteDecode`: A required account role could not be resolved from the create transaction.
//! - `SizingError`: The bonding curve simulation produced no tokens for the configured budget.
//! - `SolanaClientError`: An error occurred while interacting with the Solana RPC client.
//! - `PubsubClientError`: An error occurred while interacting with the Solana Pubsub client.
//! - `PriceOracleError`: The SOL/USD price could not be fetched or parsed.
//! - `SigningError`: The buy transaction could not be signed.
//! - `Timeout`: An RPC call did not complete within the submit policy timeout.
//! - `StreamClosed`: The transaction stream ended.
//! - `OtherError`: An error occurred that is not covered by the other error types.

use crate::decoder::Role;

#[derive(Debug)]
pub enum ClientError {
    /// Required account roles left unresolved after inference and fallback
    IncompleteDecode(Vec<Role>),
    /// Bonding curve buy simulation produced a non-positive amount
    SizingError(String),
    /// Error from Solana RPC client
    SolanaClientError(solana_client::client_error::ClientError),
    /// Error from Solana Pubsub client
    #[cfg(feature = "stream")]
    PubsubClientError(solana_client::pubsub_client::PubsubClientError),
    /// Error fetching the SOL/USD price
    PriceOracleError(Box<dyn std::error::Error + Send + Sync>),
    /// Error signing the buy transaction
    SigningError(solana_sdk::signer::SignerError),
    /// An RPC call exceeded its deadline
    Timeout(&'static str),
    /// Transaction stream ended
    StreamClosed,
    /// Other error
    OtherError(String),
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IncompleteDecode(roles) => {
                let names: Vec<String> = roles.iter().map(ToString::to_string).collect();
                write!(f, "Incomplete create decode, missing: {}", names.join(", "))
            }
            Self::SizingError(msg) => write!(f, "Buy sizing error: {}", msg),
            Self::SolanaClientError(err) => write!(f, "Solana client error: {}", err),
            #[cfg(feature = "stream")]
            Self::PubsubClientError(err) => write!(f, "Solana pubsub client error: {}", err),
            Self::PriceOracleError(err) => write!(f, "Price oracle error: {}", err),
            Self::SigningError(err) => write!(f, "Signing error: {}", err),
            Self::Timeout(call) => write!(f, "Timed out waiting for {}", call),
            Self::StreamClosed => write!(f, "Transaction stream closed"),
            Self::OtherError(msg) => write!(f, "Other error: {}", msg),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::SolanaClientError(err) => Some(err),
            #[cfg(feature = "stream")]
            Self::PubsubClientError(err) => Some(err),
            Self::PriceOracleError(err) => Some(err.as_ref()),
            Self::SigningError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<solana_client::client_error::ClientError> for ClientError {
    fn from(err: solana_client::client_error::ClientError) -> Self {
        Self::SolanaClientError(err)
    }
}

#[cfg(feature = "stream")]
impl From<solana_client::pubsub_client::PubsubClientError> for ClientError {
    fn from(err: solana_client::pubsub_client::PubsubClientError) -> Self {
        Self::PubsubClientError(err)
    }
}

impl From<solana_sdk::signer::SignerError> for ClientError {
    fn from(err: solana_sdk::signer::SignerError) -> Self {
        Self::SigningError(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incomplete_decode_lists_roles() {
        let err = ClientError::IncompleteDecode(vec![Role::BondingCurve, Role::CreatorVault]);
        assert_eq!(
            err.to_string(),
            "Incomplete create decode, missing: bonding_curve, creator_vault"
        );
    }

    #[test]
    fn test_signer_error_keeps_source() {
        let err: ClientError = solana_sdk::signer::SignerError::NotEnoughSigners.into();
        assert!(std::error::Error::source(&err).is_some());
    }
}
