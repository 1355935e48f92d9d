pub mod utils;

use std::{sync::Arc, time::Duration};

use pumpfun_sniper::{
    common::types::{SubmitPolicy, TradeSettings},
    constants::accounts,
    decoder::{self, Role},
    error::ClientError,
    instructions::Buy,
    ProcessOutcome, SkipReason,
};
use solana_sdk::{instruction::CompiledInstruction, pubkey::Pubkey};
use utils::{sniper, Creation, LedgerCall, MockLedger, SOL};

#[test]
fn test_decode_fabricated_creation() {
    let creation = Creation::new('A');
    let update = creation.update(12 * SOL);
    let table = update.address_table();

    let creates = decoder::find_create_instructions(&table, &update.instructions);
    assert_eq!(creates.len(), 1);

    let event = decoder::decode_create(&table, creates[0]).unwrap();
    assert_eq!(event.mint, Some(creation.mint));
    assert_eq!(event.bonding_curve, Some(creation.bonding_curve));
    assert_eq!(
        event.associated_bonding_curve,
        Some(creation.associated_bonding_curve)
    );
    assert_eq!(event.creator, Some(creation.creator));
    assert_eq!(event.global, Some(accounts::GLOBAL));
    assert_eq!(event.event_authority, Some(accounts::EVENT_AUTHORITY));
    assert_eq!(event.program, Some(accounts::PUMPFUN));
    assert_eq!(event.metadata.as_ref().map(|m| m.symbol.as_str()), Some("COH"));

    let deposit = decoder::extract_initial_deposit(
        &table,
        &update.inner_instructions,
        event.creator.as_ref(),
        event.bonding_curve.as_ref(),
    );
    assert_eq!(deposit, 12 * SOL);
}

#[tokio::test]
async fn test_buys_above_threshold() {
    let ledger = Arc::new(MockLedger::default());
    let sniper = sniper(ledger.clone(), 150.0, TradeSettings::default());
    let creation = Creation::new('A');

    let outcomes = sniper.process_transaction(&creation.update(12 * SOL)).await;
    assert_eq!(outcomes.len(), 1);
    let signature = match &outcomes[0] {
        ProcessOutcome::Submitted(signature) => *signature,
        other => panic!("unexpected outcome: {other:?}"),
    };

    let sent = ledger.sent();
    assert_eq!(sent.len(), 1);
    let transaction = &sent[0];
    assert_eq!(transaction.signatures[0], signature);
    assert!(transaction.verify().is_ok());

    // Compute budget x2, token account, buy
    let message = &transaction.message;
    assert_eq!(message.instructions.len(), 4);
    let buy = &message.instructions[3];
    assert_eq!(message.account_keys[buy.program_id_index as usize], accounts::PUMPFUN);

    let expected_amount = TradeSettings::default()
        .curve
        .after_deposit(12 * SOL)
        .buy_amount(1_000_000)
        .unwrap();
    assert_eq!(
        buy.data,
        Buy {
            amount: expected_amount,
            max_sol_cost: 1_200_000,
        }
        .data()
    );

    // Creator vault is the derived PDA, not the table guess
    let vault = message.account_keys[buy.accounts[9] as usize];
    assert_eq!(vault, creation.creator_vault);
}

#[tokio::test]
async fn test_below_threshold_does_not_touch_ledger() {
    let ledger = Arc::new(MockLedger::default());
    let sniper = sniper(ledger.clone(), 150.0, TradeSettings::default());

    let outcomes = sniper
        .process_transaction(&Creation::new('B').update(11 * SOL))
        .await;
    match outcomes.as_slice() {
        [ProcessOutcome::BelowThreshold { market_cap_usd }] => {
            assert!((market_cap_usd - 7833.18).abs() < 0.01)
        }
        other => panic!("unexpected outcomes: {other:?}"),
    }
    assert!(ledger.calls().is_empty());
}

#[tokio::test]
async fn test_skips_without_price_or_deposit() {
    let ledger = Arc::new(MockLedger::default());
    let creation = Creation::new('C');

    let unpriced = sniper(ledger.clone(), 0.0, TradeSettings::default());
    let outcomes = unpriced.process_transaction(&creation.update(80 * SOL)).await;
    assert!(matches!(
        outcomes.as_slice(),
        [ProcessOutcome::Skipped(SkipReason::PriceUnavailable)]
    ));

    let priced = sniper(ledger.clone(), 150.0, TradeSettings::default());
    let outcomes = priced.process_transaction(&creation.update(0)).await;
    assert!(matches!(
        outcomes.as_slice(),
        [ProcessOutcome::Skipped(SkipReason::NoDeposit)]
    ));

    assert!(ledger.calls().is_empty());
}

#[tokio::test]
async fn test_skips_unresolved_and_malformed_creates() {
    let ledger = Arc::new(MockLedger::default());
    let sniper = sniper(ledger.clone(), 150.0, TradeSettings::default());
    let creation = Creation::new('D');

    // Too few accounts for a create
    let mut update = creation.update(12 * SOL);
    update.instructions[0].accounts.truncate(5);
    assert!(matches!(
        sniper.process_transaction(&update).await.as_slice(),
        [ProcessOutcome::Skipped(SkipReason::MalformedCreate)]
    ));

    // No pump mint and instruction positions outside the table
    let mut update = creation.update(12 * SOL);
    update.account_keys[1] = Pubkey::new_unique();
    update.instructions[0].accounts = vec![40, 41, 42, 43, 44, 45, 46, 47];
    match sniper.process_transaction(&update).await.as_slice() {
        [ProcessOutcome::Skipped(SkipReason::MissingRoles(roles))] => assert_eq!(
            roles,
            &vec![Role::Mint, Role::BondingCurve, Role::AssociatedBondingCurve]
        ),
        other => panic!("unexpected outcomes: {other:?}"),
    }

    assert!(ledger.calls().is_empty());
}

#[tokio::test]
async fn test_irrelevant_instructions_are_ignored() {
    let ledger = Arc::new(MockLedger::default());
    let sniper = sniper(ledger.clone(), 150.0, TradeSettings::default());

    // Pump.fun instruction that is not a create
    let mut update = Creation::new('E').update(12 * SOL);
    update.instructions = vec![CompiledInstruction::new_from_raw_parts(
        12,
        Buy {
            amount: 1,
            max_sol_cost: 1,
        }
        .data(),
        vec![5, 0, 1, 2, 3],
    )];
    assert!(sniper.process_transaction(&update).await.is_empty());
    assert!(ledger.calls().is_empty());
}

#[tokio::test]
async fn test_every_create_of_a_transaction_is_processed() {
    let ledger = Arc::new(MockLedger::default());
    let sniper = sniper(ledger.clone(), 150.0, TradeSettings::default());

    let creation = Creation::new('F');
    let mut update = creation.update(12 * SOL);
    update.instructions.push(creation.create_instruction());

    let outcomes = sniper.process_transaction(&update).await;
    assert_eq!(outcomes.len(), 2);
    assert!(outcomes
        .iter()
        .all(|outcome| matches!(outcome, ProcessOutcome::Submitted(_))));
    assert_eq!(ledger.sent().len(), 2);
}

#[tokio::test]
async fn test_rejected_submission_is_not_retried() {
    let ledger = Arc::new(MockLedger {
        reject_sends: true,
        ..Default::default()
    });
    let sniper = sniper(ledger.clone(), 150.0, TradeSettings::default());

    let outcomes = sniper
        .process_transaction(&Creation::new('G').update(12 * SOL))
        .await;
    assert!(matches!(
        outcomes.as_slice(),
        [ProcessOutcome::Failed(ClientError::OtherError(_))]
    ));
    assert_eq!(
        ledger.calls(),
        vec![
            LedgerCall::BlockhashStarted,
            LedgerCall::BlockhashFinished,
            LedgerCall::SendStarted,
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_slow_ledger_times_out() {
    let ledger = Arc::new(MockLedger {
        latency: Duration::from_secs(60),
        ..Default::default()
    });
    let settings = TradeSettings {
        submit: SubmitPolicy {
            timeout: Duration::from_secs(5),
            max_attempts: 1,
        },
        ..TradeSettings::default()
    };
    let sniper = sniper(ledger.clone(), 150.0, settings);

    let outcomes = sniper
        .process_transaction(&Creation::new('H').update(12 * SOL))
        .await;
    assert!(matches!(
        outcomes.as_slice(),
        [ProcessOutcome::Failed(ClientError::Timeout(_))]
    ));
    assert!(ledger.sent().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_buys_are_serialized() {
    let ledger = Arc::new(MockLedger {
        latency: Duration::from_millis(200),
        ..Default::default()
    });
    let sniper = sniper(ledger.clone(), 150.0, TradeSettings::default());

    let first = Creation::new('A').update(12 * SOL);
    let second = Creation::new('B').update(20 * SOL);
    let (first, second) = tokio::join!(
        sniper.process_transaction(&first),
        sniper.process_transaction(&second)
    );

    let signatures: Vec<_> = [first, second]
        .into_iter()
        .flatten()
        .map(|outcome| match outcome {
            ProcessOutcome::Submitted(signature) => signature,
            other => panic!("unexpected outcome: {other:?}"),
        })
        .collect();
    assert_eq!(signatures.len(), 2);

    // Each attempt runs start to finish before the next one begins
    let calls = ledger.calls();
    assert_eq!(calls.len(), 8);
    for (attempt, chunk) in calls.chunks(4).enumerate() {
        assert_eq!(
            chunk,
            [
                LedgerCall::BlockhashStarted,
                LedgerCall::BlockhashFinished,
                LedgerCall::SendStarted,
                LedgerCall::SendFinished(signatures[attempt]),
            ]
        );
    }
}
