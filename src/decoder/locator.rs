use solana_sdk::{instruction::CompiledInstruction, pubkey::Pubkey};

use super::AddressTable;
use crate::constants;

/// Finds every top-level instruction of `program` whose data starts with `discriminator`
///
/// Returns an empty list when `program` is not in the table at all. The first
/// occurrence of the program address is the one instructions must reference.
pub fn find_instructions<'a>(
    table: &AddressTable,
    instructions: &'a [CompiledInstruction],
    program: &Pubkey,
    discriminator: &[u8; 8],
) -> Vec<&'a CompiledInstruction> {
    let Some(program_index) = table.index_of(program) else {
        return Vec::new();
    };

    instructions
        .iter()
        .filter(|ix| usize::from(ix.program_id_index) == program_index)
        .filter(|ix| ix.data.starts_with(discriminator))
        .collect()
}

/// Finds every Pump.fun `create` instruction in the transaction
pub fn find_create_instructions<'a>(
    table: &AddressTable,
    instructions: &'a [CompiledInstruction],
) -> Vec<&'a CompiledInstruction> {
    find_instructions(
        table,
        instructions,
        &constants::accounts::PUMPFUN,
        &constants::discriminators::CREATE,
    )
}
