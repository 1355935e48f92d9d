//! Account role inference for `create` instructions
//!
//! The `create` instruction's account layout is only partially known, so roles
//! are resolved in two stages:
//!
//! 1. [`classify`] and [`infer_roles`] work over the whole address table:
//!    known infrastructure accounts are recognised by address, the mint is the
//!    unknown account whose base-58 form ends in `pump`, and the bonding curve
//!    accounts are the next unknowns in table order.
//! 2. [`resolve_positional`] fills whatever [`PartialCreation::missing`]
//!    reports from fixed positions of the instruction's own account list.

use solana_sdk::{instruction::CompiledInstruction, pubkey::Pubkey};

use super::{AddressTable, CreationEvent, Role};
use crate::{
    constants::{accounts, curve::MINT_SUFFIX, trade::MIN_CREATE_ACCOUNTS},
    instructions::Create,
};

/// Table position tentatively holding the creator vault
pub const CREATOR_VAULT_TABLE_INDEX: usize = 7;
/// Instruction account position of the mint
pub const MINT_ACCOUNT_INDEX: usize = 0;
/// Instruction account position of the bonding curve
pub const BONDING_CURVE_ACCOUNT_INDEX: usize = 2;
/// Instruction account position of the bonding curve's token account
pub const ASSOCIATED_BONDING_CURVE_ACCOUNT_INDEX: usize = 3;

/// What an address in a `create` transaction is known to be
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountKind {
    Global,
    EventAuthority,
    SystemProgram,
    TokenProgram,
    MetadataProgram,
    AssociatedTokenProgram,
    ComputeBudget,
    Rent,
    PumpProgram,
    Unknown,
}

/// Classifies a single address against the known infrastructure accounts
pub fn classify_account(key: &Pubkey) -> AccountKind {
    match *key {
        accounts::GLOBAL => AccountKind::Global,
        accounts::EVENT_AUTHORITY => AccountKind::EventAuthority,
        accounts::SYSTEM_PROGRAM => AccountKind::SystemProgram,
        accounts::TOKEN_PROGRAM => AccountKind::TokenProgram,
        accounts::PUMPFUN => AccountKind::PumpProgram,
        accounts::MPL_TOKEN_METADATA => AccountKind::MetadataProgram,
        accounts::ASSOCIATED_TOKEN_PROGRAM => AccountKind::AssociatedTokenProgram,
        accounts::COMPUTE_BUDGET => AccountKind::ComputeBudget,
        accounts::RENT => AccountKind::Rent,
        _ => AccountKind::Unknown,
    }
}

/// Result of the classification pass over the address table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountClassification {
    /// First address of the table, the fee payer
    pub creator: Option<Pubkey>,
    pub global: Option<Pubkey>,
    pub event_authority: Option<Pubkey>,
    pub program: Option<Pubkey>,
    /// Addresses matching no known account, in table order
    pub unknown: Vec<Pubkey>,
}

/// Classifies every address of the table
pub fn classify(table: &AddressTable) -> AccountClassification {
    let mut classification = AccountClassification {
        creator: table.get(0).copied(),
        ..Default::default()
    };

    for key in table.iter() {
        match classify_account(key) {
            AccountKind::Global => classification.global = Some(*key),
            AccountKind::EventAuthority => classification.event_authority = Some(*key),
            AccountKind::PumpProgram => classification.program = Some(*key),
            AccountKind::Unknown => classification.unknown.push(*key),
            _ => {}
        }
    }

    classification
}

/// Whether `key` looks like a Pump.fun mint
pub fn is_pump_mint(key: &Pubkey) -> bool {
    key.to_string().ends_with(MINT_SUFFIX)
}

/// Roles resolved by the classification stage
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartialCreation {
    pub mint: Option<Pubkey>,
    pub bonding_curve: Option<Pubkey>,
    pub associated_bonding_curve: Option<Pubkey>,
    pub creator: Option<Pubkey>,
    pub creator_vault: Option<Pubkey>,
    pub global: Option<Pubkey>,
    pub event_authority: Option<Pubkey>,
    pub program: Option<Pubkey>,
}

impl PartialCreation {
    /// Pricing-critical roles the positional fallback still has to resolve
    pub fn missing(&self) -> Vec<Role> {
        let mut missing = Vec::new();
        if self.mint.is_none() {
            missing.push(Role::Mint);
        }
        if self.bonding_curve.is_none() {
            missing.push(Role::BondingCurve);
        }
        if self.associated_bonding_curve.is_none() {
            missing.push(Role::AssociatedBondingCurve);
        }
        missing
    }
}

/// Assigns roles from the classified unknown addresses
///
/// The bonding curve accounts are only inferred once a mint was found and at
/// least three unknowns remain after removing the mint and the creator.
pub fn infer_roles(table: &AddressTable, classification: AccountClassification) -> PartialCreation {
    let AccountClassification {
        creator,
        global,
        event_authority,
        program,
        unknown,
    } = classification;

    let mut partial = PartialCreation {
        creator,
        global,
        event_authority,
        program,
        mint: unknown.iter().find(|key| is_pump_mint(key)).copied(),
        ..Default::default()
    };

    if let Some(mint) = partial.mint {
        let remaining: Vec<Pubkey> = unknown
            .into_iter()
            .filter(|key| *key != mint && Some(*key) != creator)
            .collect();

        if remaining.len() >= 3 {
            partial.bonding_curve = Some(remaining[0]);
            partial.associated_bonding_curve = Some(remaining[1]);
            partial.creator_vault = table.get(CREATOR_VAULT_TABLE_INDEX).copied();
        }
    }

    partial
}

/// Completes a partial result from the instruction's own account list
pub fn resolve_positional(
    partial: PartialCreation,
    table: &AddressTable,
    account_indices: &[u8],
) -> CreationEvent {
    let at = |position: usize| {
        account_indices
            .get(position)
            .and_then(|index| table.resolve(*index))
    };

    CreationEvent {
        mint: partial.mint.or_else(|| at(MINT_ACCOUNT_INDEX)),
        bonding_curve: partial
            .bonding_curve
            .or_else(|| at(BONDING_CURVE_ACCOUNT_INDEX)),
        associated_bonding_curve: partial
            .associated_bonding_curve
            .or_else(|| at(ASSOCIATED_BONDING_CURVE_ACCOUNT_INDEX)),
        creator: partial.creator,
        creator_vault: partial.creator_vault,
        global: partial.global,
        event_authority: partial.event_authority,
        program: partial.program,
        fee_recipient: Some(accounts::FEE_RECIPIENT),
        initial_deposit_lamports: 0,
        metadata: None,
    }
}

/// Decodes the account roles of a `create` instruction
///
/// Returns `None` when the instruction lists fewer accounts than a `create`
/// always has. The initial deposit is left at zero; see
/// [`super::extract_initial_deposit`].
pub fn decode_create(table: &AddressTable, ix: &CompiledInstruction) -> Option<CreationEvent> {
    if ix.accounts.len() < MIN_CREATE_ACCOUNTS {
        return None;
    }

    let partial = infer_roles(table, classify(table));
    let event = resolve_positional(partial, table, &ix.accounts);

    Some(CreationEvent {
        metadata: Create::from_instruction_data(&ix.data),
        ..event
    })
}
