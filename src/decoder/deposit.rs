use solana_sdk::{instruction::CompiledInstruction, pubkey::Pubkey};

use super::{AddressTable, InnerInstructions};
use crate::constants::{accounts::SYSTEM_PROGRAM, discriminators::SYSTEM_TRANSFER};

/// A decoded system program lamport transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemTransfer {
    pub source: Pubkey,
    pub destination: Pubkey,
    pub lamports: u64,
}

/// Decodes `ix` as a system program transfer
///
/// Returns `None` for any other program, opcode, a payload shorter than 12
/// bytes, or account indices outside the table.
pub fn decode_system_transfer(
    table: &AddressTable,
    ix: &CompiledInstruction,
) -> Option<SystemTransfer> {
    if table.resolve(ix.program_id_index)? != SYSTEM_PROGRAM {
        return None;
    }

    let opcode = u32::from_le_bytes(ix.data.get(0..4)?.try_into().ok()?);
    if opcode != SYSTEM_TRANSFER {
        return None;
    }
    let lamports = u64::from_le_bytes(ix.data.get(4..12)?.try_into().ok()?);

    Some(SystemTransfer {
        source: table.resolve(*ix.accounts.first()?)?,
        destination: table.resolve(*ix.accounts.get(1)?)?,
        lamports,
    })
}

/// Finds the creator's initial SOL deposit into the bonding curve
///
/// Walks every inner instruction and keeps the largest transfer from `creator`
/// to `bonding_curve`. Returns zero when either role is unresolved or no such
/// transfer exists.
pub fn extract_initial_deposit(
    table: &AddressTable,
    inner_instructions: &[InnerInstructions],
    creator: Option<&Pubkey>,
    bonding_curve: Option<&Pubkey>,
) -> u64 {
    let (Some(creator), Some(bonding_curve)) = (creator, bonding_curve) else {
        return 0;
    };

    inner_instructions
        .iter()
        .flat_map(|group| group.instructions.iter())
        .filter_map(|ix| decode_system_transfer(table, ix))
        .filter(|transfer| transfer.source == *creator && transfer.destination == *bonding_curve)
        .map(|transfer| transfer.lamports)
        .max()
        .unwrap_or(0)
}
