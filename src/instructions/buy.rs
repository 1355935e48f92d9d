//! Instruction for buying tokens from bonding curves
//!
//! This module provides the buy instruction data structure and the helper that
//! lays out its fixed 12-account list.

use crate::constants;
use borsh::{BorshDeserialize, BorshSerialize};
use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
};

/// Instruction data for buying tokens from a bonding curve
///
/// # Fields
///
/// * `amount` - Amount of tokens to buy (in token smallest units)
/// * `max_sol_cost` - Maximum SOL cost for the purchase in lamports (slippage protection)
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Buy {
    pub amount: u64,
    pub max_sol_cost: u64,
}

impl Buy {
    /// Instruction discriminator used to identify this instruction
    pub const DISCRIMINATOR: [u8; 8] = constants::discriminators::BUY;

    /// Serializes the instruction data with the appropriate discriminator
    ///
    /// # Returns
    ///
    /// 24 bytes: discriminator, `amount` (u64 LE), `max_sol_cost` (u64 LE)
    pub fn data(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(24);
        data.extend_from_slice(&Self::DISCRIMINATOR);
        data.extend_from_slice(&borsh::to_vec(self).unwrap_or_default());
        data
    }
}

/// Accounts of a buy, as resolved from a creation event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuyAccounts {
    pub global: Pubkey,
    pub fee_recipient: Pubkey,
    pub mint: Pubkey,
    pub bonding_curve: Pubkey,
    pub associated_bonding_curve: Pubkey,
    /// Buyer's associated token account for `mint`
    pub associated_user: Pubkey,
    pub user: Pubkey,
    pub creator_vault: Pubkey,
    pub event_authority: Pubkey,
    pub program: Pubkey,
}

/// Creates an instruction to buy tokens from a bonding curve
///
/// # Arguments
///
/// * `accounts` - Resolved accounts of the target token and the buyer
/// * `args` - Buy instruction data containing the token amount and maximum acceptable SOL cost
///
/// # Account Requirements
///
/// The instruction requires the following accounts in this order:
/// 1. Global configuration (readonly)
/// 2. Fee recipient account (writable)
/// 3. Token mint account (writable)
/// 4. Bonding curve (writable)
/// 5. Bonding curve token account (writable)
/// 6. Buyer's token account (writable)
/// 7. Buyer (signer, writable)
/// 8. System program (readonly)
/// 9. Token program (readonly)
/// 10. Creator vault (writable)
/// 11. Event authority (readonly)
/// 12. Pump.fun program ID (readonly)
pub fn buy(accounts: &BuyAccounts, args: Buy) -> Instruction {
    Instruction::new_with_bytes(
        accounts.program,
        &args.data(),
        vec![
            AccountMeta::new_readonly(accounts.global, false),
            AccountMeta::new(accounts.fee_recipient, false),
            AccountMeta::new(accounts.mint, false),
            AccountMeta::new(accounts.bonding_curve, false),
            AccountMeta::new(accounts.associated_bonding_curve, false),
            AccountMeta::new(accounts.associated_user, false),
            AccountMeta::new(accounts.user, true),
            AccountMeta::new_readonly(constants::accounts::SYSTEM_PROGRAM, false),
            AccountMeta::new_readonly(constants::accounts::TOKEN_PROGRAM, false),
            AccountMeta::new(accounts.creator_vault, false),
            AccountMeta::new_readonly(accounts.event_authority, false),
            AccountMeta::new_readonly(accounts.program, false),
        ],
    )
}
