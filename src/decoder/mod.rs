//! Decoding of Pump.fun `create` transactions
//!
//! This module turns a raw transaction update into a [`CreationEvent`]:
//!
//! - [`AddressTable`]: the single index space every instruction refers to
//! - [`find_create_instructions`]: locates the program's `create` instructions
//! - [`decode_create`]: resolves the account roles of a `create` instruction
//! - [`extract_initial_deposit`]: recovers the creator's initial SOL deposit
//!
//! The decoder never fails hard. Anything it cannot resolve is left as `None`
//! and callers check [`CreationEvent::missing_for_pricing`] before moving funds.

mod address_table;
mod create;
mod deposit;
mod locator;

pub use address_table::*;
pub use create::*;
pub use deposit::*;
pub use locator::*;

use solana_sdk::{instruction::CompiledInstruction, pubkey::Pubkey, signature::Signature};

use crate::instructions::Create;

/// A transaction as delivered by the stream, reduced to what the decoder needs
#[derive(Debug, Clone, Default)]
pub struct TransactionUpdate {
    /// First signature of the transaction
    pub signature: Signature,
    /// Slot the transaction was observed in
    pub slot: u64,
    /// Statically listed account keys of the message
    pub account_keys: Vec<Pubkey>,
    /// Writable addresses loaded from lookup tables
    pub loaded_writable: Vec<Pubkey>,
    /// Read-only addresses loaded from lookup tables
    pub loaded_readonly: Vec<Pubkey>,
    /// Top-level instructions
    pub instructions: Vec<CompiledInstruction>,
    /// Inner (CPI) instructions grouped by originating top-level instruction
    pub inner_instructions: Vec<InnerInstructions>,
}

impl TransactionUpdate {
    /// Builds the address table of this transaction
    pub fn address_table(&self) -> AddressTable {
        AddressTable::from_parts(
            &self.account_keys,
            &self.loaded_writable,
            &self.loaded_readonly,
        )
    }
}

/// Inner instructions emitted while executing one top-level instruction
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InnerInstructions {
    /// Index of the top-level instruction that triggered these
    pub index: u8,
    pub instructions: Vec<CompiledInstruction>,
}

/// Semantic account roles of a token creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Mint,
    BondingCurve,
    AssociatedBondingCurve,
    Creator,
    CreatorVault,
    Global,
    EventAuthority,
    Program,
    FeeRecipient,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Mint => "mint",
            Self::BondingCurve => "bonding_curve",
            Self::AssociatedBondingCurve => "associated_bonding_curve",
            Self::Creator => "creator",
            Self::CreatorVault => "creator_vault",
            Self::Global => "global",
            Self::EventAuthority => "event_authority",
            Self::Program => "program",
            Self::FeeRecipient => "fee_recipient",
        };
        f.write_str(name)
    }
}

/// Decoded token creation
///
/// Owned by the processing of one stream event and never mutated once built.
/// Unresolved roles are `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreationEvent {
    pub mint: Option<Pubkey>,
    pub bonding_curve: Option<Pubkey>,
    pub associated_bonding_curve: Option<Pubkey>,
    pub creator: Option<Pubkey>,
    pub creator_vault: Option<Pubkey>,
    pub global: Option<Pubkey>,
    pub event_authority: Option<Pubkey>,
    pub program: Option<Pubkey>,
    pub fee_recipient: Option<Pubkey>,
    /// Lamports the creator moved into the bonding curve, zero if none found
    pub initial_deposit_lamports: u64,
    /// Name, symbol and URI from the instruction payload, when it parses
    pub metadata: Option<Create>,
}

impl CreationEvent {
    /// Roles that must be resolved before the event can be priced
    pub fn missing_for_pricing(&self) -> Vec<Role> {
        [
            (Role::Mint, self.mint),
            (Role::BondingCurve, self.bonding_curve),
            (Role::AssociatedBondingCurve, self.associated_bonding_curve),
        ]
        .into_iter()
        .filter_map(|(role, key)| key.is_none().then_some(role))
        .collect()
    }

    /// Resolves every account a buy needs
    ///
    /// Returns the missing roles when any of mint, bonding curve, associated
    /// bonding curve, creator vault, global, event authority, program or fee
    /// recipient is unresolved.
    pub fn tradeable(&self) -> Result<TradeAccounts, Vec<Role>> {
        match (
            self.mint,
            self.bonding_curve,
            self.associated_bonding_curve,
            self.creator_vault,
            self.global,
            self.event_authority,
            self.program,
            self.fee_recipient,
        ) {
            (
                Some(mint),
                Some(bonding_curve),
                Some(associated_bonding_curve),
                Some(creator_vault),
                Some(global),
                Some(event_authority),
                Some(program),
                Some(fee_recipient),
            ) => Ok(TradeAccounts {
                mint,
                bonding_curve,
                associated_bonding_curve,
                creator_vault,
                global,
                event_authority,
                program,
                fee_recipient,
            }),
            _ => Err([
                (Role::Mint, self.mint),
                (Role::BondingCurve, self.bonding_curve),
                (Role::AssociatedBondingCurve, self.associated_bonding_curve),
                (Role::CreatorVault, self.creator_vault),
                (Role::Global, self.global),
                (Role::EventAuthority, self.event_authority),
                (Role::Program, self.program),
                (Role::FeeRecipient, self.fee_recipient),
            ]
            .into_iter()
            .filter_map(|(role, key)| key.is_none().then_some(role))
            .collect()),
        }
    }

    /// Returns a copy carrying the given initial deposit
    pub fn with_initial_deposit(self, lamports: u64) -> Self {
        Self {
            initial_deposit_lamports: lamports,
            ..self
        }
    }
}

/// Fully resolved accounts of a creation, ready to be traded against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TradeAccounts {
    pub mint: Pubkey,
    pub bonding_curve: Pubkey,
    pub associated_bonding_curve: Pubkey,
    pub creator_vault: Pubkey,
    pub global: Pubkey,
    pub event_authority: Pubkey,
    pub program: Pubkey,
    pub fee_recipient: Pubkey,
}
