//! Payload of the instruction that creates new tokens with bonding curves
//!
//! The sniper never sends `create`; it only recognises it by discriminator and
//! reads the token name, symbol and URI out of it for logging.

use crate::constants;
use borsh::{BorshDeserialize, BorshSerialize};
use solana_sdk::pubkey::Pubkey;

/// Instruction data for creating a new token
///
/// # Fields
///
/// * `name` - Name of the token to be created
/// * `symbol` - Symbol/ticker of the token to be created
/// * `uri` - Metadata URI containing token information (image, description, etc.)
/// * `creator` - Public key of the token creator
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct Create {
    pub name: String,
    pub symbol: String,
    pub uri: String,
    pub creator: Pubkey,
}

impl Create {
    /// Instruction discriminator used to identify this instruction
    pub const DISCRIMINATOR: [u8; 8] = constants::discriminators::CREATE;

    /// Serializes the instruction data with the appropriate discriminator
    pub fn data(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(256);
        data.extend_from_slice(&Self::DISCRIMINATOR);
        data.extend_from_slice(&borsh::to_vec(self).unwrap_or_default());
        data
    }

    /// Parses `create` instruction data
    ///
    /// Returns `None` when the discriminator does not match or the arguments do
    /// not deserialize. Trailing bytes added by newer program versions are
    /// ignored.
    pub fn from_instruction_data(data: &[u8]) -> Option<Self> {
        let args = data.strip_prefix(&Self::DISCRIMINATOR)?;
        Self::deserialize(&mut &args[..]).ok()
    }
}
