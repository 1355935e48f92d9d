//! Buy transaction assembly
//!
//! [`build_buy_plan`] turns a decoded creation into the ordered instruction
//! list of a buy. The plan is signed with [`BuyPlan::sign`] once a blockhash is
//! known; fetching the blockhash and submitting are left to the caller.

use solana_sdk::{
    compute_budget::ComputeBudgetInstruction, hash::Hash, instruction::Instruction,
    pubkey::Pubkey, signature::Keypair, transaction::Transaction,
};
use spl_associated_token_account::{
    get_associated_token_address, instruction::create_associated_token_account_idempotent,
};

use crate::{
    common::types::{PriorityFee, TradeSettings},
    constants,
    decoder::{AddressTable, CreationEvent},
    error::ClientError,
    instructions::{self, Buy, BuyAccounts},
    utils::{calculate_with_slippage_buy, get_creator_vault_pda},
};

/// Unsigned buy transaction
///
/// # Fields
///
/// * `instructions` - Compute budget, token account creation and buy, in that order
/// * `fee_payer` - Account paying fees, also the buyer
/// * `recent_blockhash` - Placeholder until the plan is signed
/// * `token_amount_out` - Token base units requested from the curve
/// * `max_sol_cost` - Lamports the buy may spend at most
#[derive(Debug, Clone, PartialEq)]
pub struct BuyPlan {
    pub instructions: Vec<Instruction>,
    pub fee_payer: Pubkey,
    pub recent_blockhash: Hash,
    pub token_amount_out: u64,
    pub max_sol_cost: u64,
}

impl BuyPlan {
    /// Signs the plan as a legacy transaction
    ///
    /// # Arguments
    ///
    /// * `recent_blockhash` - Blockhash the transaction is valid for
    /// * `payer` - Keypair of `fee_payer`
    ///
    /// # Errors
    ///
    /// Returns `SigningError` when `payer` is not the plan's fee payer or
    /// signing fails.
    pub fn sign(
        &self,
        recent_blockhash: Hash,
        payer: &Keypair,
    ) -> Result<Transaction, ClientError> {
        let mut transaction =
            Transaction::new_with_payer(&self.instructions, Some(&self.fee_payer));
        transaction.try_sign(&[payer], recent_blockhash)?;
        Ok(transaction)
    }
}

/// Creates compute budget instructions for a priority fee
///
/// Returns at most two instructions: the unit limit first, then the unit
/// price. Unset fields produce no instruction.
pub fn get_priority_fee_instructions(priority_fee: &PriorityFee) -> Vec<Instruction> {
    let mut instructions = Vec::new();

    if let Some(limit) = priority_fee.unit_limit {
        let limit_ix = ComputeBudgetInstruction::set_compute_unit_limit(limit);
        instructions.push(limit_ix);
    }

    if let Some(price) = priority_fee.unit_price {
        let price_ix = ComputeBudgetInstruction::set_compute_unit_price(price);
        instructions.push(price_ix);
    }

    instructions
}

/// Picks the creator vault of a creation
///
/// The vault PDA derived from the mint wins when the transaction references
/// it. Otherwise the decoder's guess is kept.
pub fn resolve_creator_vault(event: &CreationEvent, table: &AddressTable) -> Option<Pubkey> {
    event
        .mint
        .as_ref()
        .and_then(get_creator_vault_pda)
        .filter(|pda| table.contains(pda))
        .or(event.creator_vault)
}

/// Assembles the buy of a freshly created token
///
/// The token amount is sized on the same curve state the valuation uses: the
/// configured curve after the creator's initial deposit.
///
/// # Arguments
///
/// * `event` - Decoded creation, including its initial deposit
/// * `table` - Address table of the creation transaction
/// * `payer` - Buyer and fee payer
/// * `settings` - Budget, slippage, priority fee and curve
///
/// # Errors
///
/// Returns `IncompleteDecode` when an account the buy needs is unresolved and
/// `SizingError` when the budget buys no tokens.
pub fn build_buy_plan(
    event: &CreationEvent,
    table: &AddressTable,
    payer: &Pubkey,
    settings: &TradeSettings,
) -> Result<BuyPlan, ClientError> {
    let event = CreationEvent {
        creator_vault: resolve_creator_vault(event, table),
        ..event.clone()
    };
    let accounts = event.tradeable().map_err(ClientError::IncompleteDecode)?;

    let state = settings.curve.after_deposit(event.initial_deposit_lamports);
    let token_amount_out = state.buy_amount(settings.buy_amount_lamports)?;
    let max_sol_cost =
        calculate_with_slippage_buy(settings.buy_amount_lamports, settings.slippage_basis_points);

    let mut instructions = get_priority_fee_instructions(&settings.priority_fee);

    instructions.push(create_associated_token_account_idempotent(
        payer,
        payer,
        &accounts.mint,
        &constants::accounts::TOKEN_PROGRAM,
    ));

    instructions.push(instructions::buy(
        &BuyAccounts {
            global: accounts.global,
            fee_recipient: accounts.fee_recipient,
            mint: accounts.mint,
            bonding_curve: accounts.bonding_curve,
            associated_bonding_curve: accounts.associated_bonding_curve,
            associated_user: get_associated_token_address(payer, &accounts.mint),
            user: *payer,
            creator_vault: accounts.creator_vault,
            event_authority: accounts.event_authority,
            program: accounts.program,
        },
        Buy {
            amount: token_amount_out,
            max_sol_cost,
        },
    ));

    Ok(BuyPlan {
        instructions,
        fee_payer: *payer,
        recent_blockhash: Hash::default(),
        token_amount_out,
        max_sol_cost,
    })
}
