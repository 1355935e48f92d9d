//! Helpers shared by the buy assembler and the client

pub mod transaction;

use solana_sdk::pubkey::Pubkey;

use crate::constants;

/// Adds slippage tolerance to a SOL amount
///
/// # Arguments
///
/// * `amount` - Amount in lamports
/// * `basis_points` - Tolerance in basis points (1 bp = 0.01%)
///
/// # Returns
///
/// `amount + amount * basis_points / 10_000`, saturating at `u64::MAX`
pub fn calculate_with_slippage_buy(amount: u64, basis_points: u64) -> u64 {
    let with_slippage = amount as u128 + (amount as u128 * basis_points as u128) / 10_000;
    u64::try_from(with_slippage).unwrap_or(u64::MAX)
}

/// Gets the Program Derived Address (PDA) of a token's creator vault
///
/// # Arguments
///
/// * `mint` - Public key of the token mint
///
/// # Returns
///
/// Returns `Some(PDA)` if derivation succeeds, or `None` if it fails
pub fn get_creator_vault_pda(mint: &Pubkey) -> Option<Pubkey> {
    let seeds: &[&[u8]; 2] = &[constants::seeds::VAULT_SEED, mint.as_ref()];
    let program_id: &Pubkey = &constants::accounts::PUMPFUN;
    let pda: Option<(Pubkey, u8)> = Pubkey::try_find_program_address(seeds, program_id);
    pda.map(|pubkey| pubkey.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate_with_slippage_buy() {
        assert_eq!(calculate_with_slippage_buy(1_000_000, 2_000), 1_200_000);
        assert_eq!(calculate_with_slippage_buy(1_000, 0), 1_000);
        assert_eq!(calculate_with_slippage_buy(0, 2_000), 0);
        assert_eq!(calculate_with_slippage_buy(u64::MAX, 10_000), u64::MAX);
    }

    #[test]
    fn test_creator_vault_pda() {
        let mint = Pubkey::new_unique();
        let (expected, _) = Pubkey::find_program_address(
            &[b"vault", mint.as_ref()],
            &constants::accounts::PUMPFUN,
        );
        assert_eq!(get_creator_vault_pda(&mint), Some(expected));
        assert_ne!(get_creator_vault_pda(&Pubkey::new_unique()), Some(expected));
    }
}
