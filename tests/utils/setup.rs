use std::{
    str::FromStr,
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use pumpfun_sniper::{
    common::{price::PriceCache, types::TradeSettings},
    constants::{accounts, discriminators},
    decoder::{InnerInstructions, TransactionUpdate},
    error::ClientError,
    instructions::Create,
    utils::get_creator_vault_pda,
    Ledger, Sniper,
};
use solana_sdk::{
    hash::Hash,
    instruction::CompiledInstruction,
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    transaction::Transaction,
};

pub const SOL: u64 = 1_000_000_000;

/// Table position of the system program in fabricated creations
const SYSTEM_PROGRAM_INDEX: u8 = 6;
/// Table position of the Pump.fun program in fabricated creations
const PUMPFUN_INDEX: u8 = 12;

/// Mint address ending in `pump`, distinct per `tag` (`A`..`Z`)
///
/// 28 zero bytes followed by four bytes that encode as `<tag>pump`.
pub fn pump_mint(tag: char) -> Pubkey {
    Pubkey::from_str(&format!("1111111111111111111111111111{tag}pump"))
        .expect("valid pump mint")
}

/// Accounts of a fabricated token creation
#[derive(Debug, Clone)]
pub struct Creation {
    pub creator: Pubkey,
    pub mint: Pubkey,
    pub bonding_curve: Pubkey,
    pub associated_bonding_curve: Pubkey,
    pub metadata: Pubkey,
    pub creator_vault: Pubkey,
}

impl Creation {
    pub fn new(tag: char) -> Self {
        let mint = pump_mint(tag);
        Self {
            creator: Pubkey::new_unique(),
            mint,
            bonding_curve: Pubkey::new_unique(),
            associated_bonding_curve: Pubkey::new_unique(),
            metadata: Pubkey::new_unique(),
            creator_vault: get_creator_vault_pda(&mint).expect("vault PDA"),
        }
    }

    /// Static keys laid out the way a Pump.fun `create` transaction lists them
    pub fn account_keys(&self) -> Vec<Pubkey> {
        vec![
            self.creator,
            self.mint,
            self.bonding_curve,
            self.associated_bonding_curve,
            self.metadata,
            accounts::GLOBAL,
            accounts::SYSTEM_PROGRAM,
            accounts::TOKEN_PROGRAM,
            accounts::MPL_TOKEN_METADATA,
            accounts::ASSOCIATED_TOKEN_PROGRAM,
            accounts::RENT,
            accounts::EVENT_AUTHORITY,
            accounts::PUMPFUN,
        ]
    }

    /// The `create` instruction, with a parseable payload
    pub fn create_instruction(&self) -> CompiledInstruction {
        let data = Create {
            name: "Cat On Horse".to_string(),
            symbol: "COH".to_string(),
            uri: "https://example.com/coh.json".to_string(),
            creator: self.creator,
        }
        .data();
        CompiledInstruction::new_from_raw_parts(
            PUMPFUN_INDEX,
            data,
            vec![1, 4, 2, 3, 5, 8, 4, 0, 6, 7, 9, 10, 11, 12],
        )
    }

    /// System transfer of `lamports` from the creator into the bonding curve
    pub fn deposit_instruction(&self, lamports: u64) -> CompiledInstruction {
        transfer(0, 2, lamports)
    }

    /// A successful creation with the given initial deposit
    ///
    /// The creator vault PDA is referenced through the loaded read-only
    /// addresses, as a lookup table would.
    pub fn update(&self, deposit_lamports: u64) -> TransactionUpdate {
        let inner_instructions = if deposit_lamports > 0 {
            vec![InnerInstructions {
                index: 0,
                instructions: vec![
                    transfer(0, 4, 15_616_720),
                    self.deposit_instruction(deposit_lamports),
                ],
            }]
        } else {
            Vec::new()
        };

        TransactionUpdate {
            signature: Signature::new_unique(),
            slot: 330_000_000,
            account_keys: self.account_keys(),
            loaded_writable: Vec::new(),
            loaded_readonly: vec![self.creator_vault],
            instructions: vec![self.create_instruction()],
            inner_instructions,
        }
    }
}

/// System program transfer between two table positions
pub fn transfer(from: u8, to: u8, lamports: u64) -> CompiledInstruction {
    let mut data = discriminators::SYSTEM_TRANSFER.to_le_bytes().to_vec();
    data.extend_from_slice(&lamports.to_le_bytes());
    CompiledInstruction::new_from_raw_parts(SYSTEM_PROGRAM_INDEX, data, vec![from, to])
}

/// Call observed by a [`MockLedger`]
#[derive(Debug, Clone, PartialEq)]
pub enum LedgerCall {
    BlockhashStarted,
    BlockhashFinished,
    SendStarted,
    SendFinished(Signature),
}

/// Ledger recording every call, optionally slow or failing
#[derive(Debug, Default)]
pub struct MockLedger {
    /// Time every call takes
    pub latency: Duration,
    /// Reject every submission
    pub reject_sends: bool,
    pub calls: Mutex<Vec<LedgerCall>>,
    pub sent: Mutex<Vec<Transaction>>,
}

impl MockLedger {
    pub fn calls(&self) -> Vec<LedgerCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn sent(&self) -> Vec<Transaction> {
        self.sent.lock().unwrap().clone()
    }

    fn record(&self, call: LedgerCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl Ledger for MockLedger {
    async fn latest_blockhash(&self) -> Result<Hash, ClientError> {
        self.record(LedgerCall::BlockhashStarted);
        tokio::time::sleep(self.latency).await;
        self.record(LedgerCall::BlockhashFinished);
        Ok(Hash::new_unique())
    }

    async fn send_transaction(&self, transaction: &Transaction) -> Result<Signature, ClientError> {
        self.record(LedgerCall::SendStarted);
        tokio::time::sleep(self.latency).await;
        if self.reject_sends {
            return Err(ClientError::OtherError("transaction rejected".to_string()));
        }

        let signature = transaction.signatures[0];
        self.sent.lock().unwrap().push(transaction.clone());
        self.record(LedgerCall::SendFinished(signature));
        Ok(signature)
    }
}

/// Sniper over a mock ledger with SOL priced at `sol_usd`
pub fn sniper(ledger: Arc<MockLedger>, sol_usd: f64, settings: TradeSettings) -> Sniper {
    let prices = PriceCache::new();
    prices.set(sol_usd);
    Sniper::with_ledger(Arc::new(Keypair::new()), ledger, settings, prices)
}
