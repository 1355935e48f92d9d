//! Constants used by the sniper
//!
//! Every value here has to match the Pump.fun program bit-for-bit: account
//! addresses, instruction discriminators, PDA seeds and the virtual reserve
//! parameters the program seeds each new bonding curve with.

/// Well-known account addresses
pub mod accounts {
    use solana_sdk::{pubkey, pubkey::Pubkey};

    /// Pump.fun program
    pub const PUMPFUN: Pubkey = pubkey!("6EF8rrecthR5Dkzon8Nwu78hRvfCKubJ14M5uBEwF6P");
    /// Pump.fun global configuration account
    pub const GLOBAL: Pubkey = pubkey!("4wTV1YmiEkRvAtNtsSGPtUrqRYQMe5SKy2uB4Jjaxnjf");
    /// Anchor event authority of the Pump.fun program
    pub const EVENT_AUTHORITY: Pubkey = pubkey!("Ce6TQqeHC9p8KetsN6JsjHK7UTZk7nasjjnr7XxXp9F1");
    /// Account receiving the protocol fee on buys
    pub const FEE_RECIPIENT: Pubkey = pubkey!("G5UZAVbAf46s7cKWoyKu8kYTip9DGTpbLZ2qa9Aq69dP");
    /// Native system program
    pub const SYSTEM_PROGRAM: Pubkey = pubkey!("11111111111111111111111111111111");
    /// SPL token program
    pub const TOKEN_PROGRAM: Pubkey = spl_token::ID;
    /// Metaplex token metadata program
    pub const MPL_TOKEN_METADATA: Pubkey = pubkey!("metaqbxxUerdq28cj1RbAWkYQm3ybzjb6a8bt518x1s");
    /// SPL associated token account program
    pub const ASSOCIATED_TOKEN_PROGRAM: Pubkey =
        pubkey!("ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL");
    /// Compute budget program
    pub const COMPUTE_BUDGET: Pubkey = pubkey!("ComputeBudget111111111111111111111111111111");
    /// Rent sysvar
    pub const RENT: Pubkey = pubkey!("SysvarRent111111111111111111111111111111111");
}

/// PDA seeds
pub mod seeds {
    /// Seed of the per-mint creator vault
    pub const VAULT_SEED: &[u8] = b"vault";
}

/// Anchor instruction discriminators
pub mod discriminators {
    /// `create`
    pub const CREATE: [u8; 8] = [0x18, 0x1e, 0xc8, 0x28, 0x05, 0x1c, 0x07, 0x77];
    /// `buy`
    pub const BUY: [u8; 8] = [0x66, 0x06, 0x3d, 0x12, 0x01, 0xda, 0xeb, 0xea];
    /// System program `Transfer` opcode (little-endian u32 prefix)
    pub const SYSTEM_TRANSFER: u32 = 2;
}

/// Bonding curve parameters
pub mod curve {
    /// Lamports in one SOL
    pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;
    /// Base units in one whole token (6 decimals)
    pub const TOKEN_BASE_UNITS: u64 = 1_000_000;
    /// Whole tokens minted for every Pump.fun token
    pub const TOTAL_SUPPLY: f64 = 1_000_000_000.0;
    /// Virtual SOL reserve a fresh curve starts with
    pub const INITIAL_VIRTUAL_SOL: f64 = 30.0;
    /// Virtual token reserve a fresh curve starts with
    pub const INITIAL_VIRTUAL_TOKENS: f64 = 1_073_000_000.0;
    /// Every Pump.fun mint address ends with this in base-58
    pub const MINT_SUFFIX: &str = "pump";
}

/// Trading defaults
pub mod trade {
    /// Minimum USD market cap at which a new token is bought
    pub const MARKET_CAP_THRESHOLD_USD: f64 = 8_000.00;
    /// SOL spent per buy, in lamports (0.001 SOL)
    pub const BUY_AMOUNT_LAMPORTS: u64 = 1_000_000;
    /// Maximum accepted slippage on the buy, in basis points (20%)
    pub const SLIPPAGE_BASIS_POINTS: u64 = 2_000;
    /// Compute unit limit of the buy transaction
    pub const COMPUTE_UNIT_LIMIT: u32 = 400_000;
    /// Compute unit price of the buy transaction, in micro-lamports
    pub const COMPUTE_UNIT_PRICE: u64 = 500_000;
    /// Minimum number of accounts a `create` instruction must list
    pub const MIN_CREATE_ACCOUNTS: usize = 8;
}
