
use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::{U256, address};
use alloy::sol_types::SolCall;

use fund_rotator::error::RotationError;
use fund_rotator::model::{Amount, Chain, TokenHandle};
use fund_rotator::run::build_scheduler;
use fund_rotator::run::config::{AaveConfig, RotationConfig, SiloConfig};
use fund_rotator::run::scheduler::{Leg, Phase};
use fund_rotator::venues::assembler::TransactionAssembler;
use fund_rotator::venues::lending::aave::IAavePool;
use fund_rotator::venues::lending::silo::ISilo;
use fund_rotator::venues::lending::{
    AaveLending, CollateralType, LendingPool, SiloLending, SiloRouter, SiloVault,
};
use fund_rotator::venues::units::DEFAULT_FALLBACK_DECIMALS;
use fund_rotator::venues::{ExecutionResult, Venue, WithdrawMode};

use mock_common::*;

// ── Helpers ─────────────────────────────────────────────────────────

fn amount(s: &str) -> Amount {
    s.parse().unwrap()
}

fn usdc() -> TokenHandle {
    TokenHandle::new("USDC", TOKEN)
}

fn funded_reader() -> MockReader {
    MockReader::new()
        .with_decimals(TOKEN, 6)
        .with_balance(TOKEN, U256::from(1_000_000_000u64))
}

fn aave(wallet: Arc<MockWallet>, reader: MockReader) -> AaveLending {
    let assembler = Arc::new(TransactionAssembler::new(
        ACCOUNT,
        Arc::new(reader),
        DEFAULT_FALLBACK_DECIMALS,
    ));
    AaveLending::new(wallet, assembler, LendingPool::new(POOL), usdc())
}

fn silo(wallet: Arc<MockWallet>, reader: MockReader) -> SiloLending {
    let assembler = Arc::new(TransactionAssembler::new(
        ACCOUNT,
        Arc::new(reader),
        DEFAULT_FALLBACK_DECIMALS,
    ));
    SiloLending::new(
        wallet,
        assembler,
        SiloRouter::new(ROUTER),
        SiloVault::new(SILO, CollateralType::Collateral),
        usdc(),
    )
}

fn single_step(submission: &Submission) -> &fund_rotator::model::TransactionStep {
    match submission {
        Submission::Single(step) => step,
        Submission::Batch(batch) => panic!("expected a single call, got batch {}", batch.label),
    }
}

// ── Direct adapter ──────────────────────────────────────────────────

#[tokio::test]
async fn test_aave_deposit_submits_one_batch() {
    let wallet = Arc::new(MockWallet::new(ACCOUNT));
    let venue = aave(wallet.clone(), funded_reader());

    let result = venue.deposit(&amount("100")).await.unwrap();
    match result {
        ExecutionResult::Submitted { tx_hash, steps } => {
            assert_eq!(steps, 2);
            assert!(!tx_hash.is_zero());
        }
        ExecutionResult::Noop => panic!("expected a submission"),
    }
    assert_eq!(wallet.labels(), vec!["aave-supply"]);
}

#[tokio::test]
async fn test_aave_withdraw_is_partial() {
    let wallet = Arc::new(MockWallet::new(ACCOUNT));
    let venue = aave(wallet.clone(), funded_reader());
    assert_eq!(venue.name(), "aave");
    assert_eq!(venue.withdraw_mode(), WithdrawMode::Partial);

    venue.withdraw(&amount("40")).await.unwrap();

    let submissions = wallet.submissions();
    assert_eq!(submissions.len(), 1);
    let step = single_step(&submissions[0]);
    let call = IAavePool::withdrawCall::abi_decode(&step.calldata).unwrap();
    assert_eq!(call.amount, U256::from(40_000_000u64));
    assert_eq!(call.to, ACCOUNT);
}

#[tokio::test]
async fn test_aave_referral_code_reaches_supply() {
    let wallet = Arc::new(MockWallet::new(ACCOUNT));
    let venue = aave(wallet.clone(), funded_reader()).with_referral_code(42);
    venue.deposit(&amount("1")).await.unwrap();

    let Submission::Batch(batch) = &wallet.submissions()[0] else {
        panic!("expected a batch");
    };
    let call = IAavePool::supplyCall::abi_decode(&batch.steps()[1].calldata).unwrap();
    assert_eq!(call.referralCode, 42);
}

#[tokio::test]
async fn test_insufficient_balance_submits_nothing() {
    let wallet = Arc::new(MockWallet::new(ACCOUNT));
    let reader = MockReader::new()
        .with_decimals(TOKEN, 6)
        .with_balance(TOKEN, U256::from(999_999u64));
    let venue = aave(wallet.clone(), reader);

    let err = venue.deposit(&amount("1")).await.unwrap_err();
    assert!(matches!(err, RotationError::InsufficientFunds { .. }));
    assert!(wallet.submissions().is_empty());
}

#[tokio::test]
async fn test_wallet_rejection_propagates() {
    let wallet = Arc::new(MockWallet::failing(ACCOUNT, "nonce too low"));
    let venue = aave(wallet, funded_reader());

    let err = venue.deposit(&amount("1")).await.unwrap_err();
    match err {
        RotationError::Submission { label, reason } => {
            assert_eq!(label, "aave-supply");
            assert_eq!(reason, "nonce too low");
        }
        other => panic!("expected Submission, got {other:?}"),
    }
}

// ── Router adapter ──────────────────────────────────────────────────

#[tokio::test]
async fn test_silo_deposit_submits_approve_and_multicall() {
    let wallet = Arc::new(MockWallet::new(ACCOUNT));
    let venue = silo(wallet.clone(), funded_reader());

    let result = venue.deposit(&amount("25")).await.unwrap();
    assert!(matches!(result, ExecutionResult::Submitted { steps: 2, .. }));
    assert_eq!(wallet.labels(), vec!["silo-deposit"]);
}

#[tokio::test]
async fn test_silo_withdraw_redeems_everything_regardless_of_request() {
    let wallet = Arc::new(MockWallet::new(ACCOUNT));
    let shares = U256::from(123_456_789u64);
    let venue = silo(wallet.clone(), funded_reader().with_shares(SILO, shares));
    assert_eq!(venue.withdraw_mode(), WithdrawMode::FullBalance);

    // Requested amount is far below the position; the full share balance goes.
    let result = venue.withdraw(&amount("1")).await.unwrap();
    assert!(matches!(result, ExecutionResult::Submitted { steps: 1, .. }));

    let submissions = wallet.submissions();
    let step = single_step(&submissions[0]);
    assert_eq!(step.target, SILO);
    let call = ISilo::redeemCall::abi_decode(&step.calldata).unwrap();
    assert_eq!(call.shares, shares);
    assert_eq!(call.receiver, ACCOUNT);
    assert_eq!(call.owner, ACCOUNT);
}

#[tokio::test]
async fn test_silo_withdraw_without_shares_is_noop() {
    let wallet = Arc::new(MockWallet::new(ACCOUNT));
    let venue = silo(wallet.clone(), funded_reader().with_shares(SILO, U256::ZERO));

    let result = venue.withdraw(&amount("25")).await.unwrap();
    assert_eq!(result, ExecutionResult::Noop);
    assert!(wallet.submissions().is_empty());
}

#[tokio::test]
async fn test_silo_share_read_failure_is_an_error() {
    let wallet = Arc::new(MockWallet::new(ACCOUNT));
    let venue = silo(wallet.clone(), funded_reader());

    let err = venue.withdraw(&amount("25")).await.unwrap_err();
    assert!(matches!(err, RotationError::ContractRead { .. }));
    assert!(wallet.submissions().is_empty());
}

// ── Wired rotation ──────────────────────────────────────────────────

fn rotation_config(cycles: u32, unwind: bool) -> RotationConfig {
    RotationConfig {
        chain: Chain::custom("local", 31337, "http://127.0.0.1:8545"),
        smart_account: ACCOUNT,
        token: usdc(),
        aave: AaveConfig {
            pool: POOL,
            referral_code: 0,
        },
        silo: SiloConfig {
            router: ROUTER,
            silo: SILO,
            share_token: None,
            collateral: CollateralType::Collateral,
        },
        amount: amount("10"),
        cycles,
        hold_secs: 0,
        fallback_decimals: DEFAULT_FALLBACK_DECIMALS,
        unwind_on_complete: unwind,
    }
}

#[tokio::test]
async fn test_wired_rotation_submission_order() {
    let wallet = Arc::new(MockWallet::new(ACCOUNT));
    let reader = Arc::new(funded_reader().with_shares(SILO, U256::from(10_000_000u64)));

    let mut scheduler = build_scheduler(&rotation_config(2, false), wallet.clone(), reader);
    let report = scheduler.run().await.unwrap();

    let withdraw = IAavePool::withdrawCall::SIGNATURE;
    let redeem = ISilo::redeemCall::SIGNATURE;
    assert_eq!(
        wallet.labels(),
        vec![
            "aave-supply",
            withdraw,
            "silo-deposit",
            redeem,
            "aave-supply",
            withdraw,
            "silo-deposit",
        ]
    );
    assert_eq!(report.cycles_completed, 2);
    assert_eq!(report.steps.len(), 7);
    assert_eq!(report.steps[3].phase, Phase::Withdrawing(Leg::Router));
    assert_eq!(report.steps[3].venue, "silo");
    assert_eq!(report.steps[3].cycle, 1);
    assert_eq!(report.steps[3].requested, None);
    assert!(report.steps[2].requested.is_some());
}

#[tokio::test]
async fn test_wired_rotation_unwinds_router_position() {
    let wallet = Arc::new(MockWallet::new(ACCOUNT));
    let reader = Arc::new(funded_reader().with_shares(SILO, U256::from(10_000_000u64)));

    let mut scheduler = build_scheduler(&rotation_config(1, true), wallet.clone(), reader);
    scheduler.run().await.unwrap();

    assert_eq!(
        wallet.labels().last().copied(),
        Some(ISilo::redeemCall::SIGNATURE)
    );
    assert_eq!(scheduler.phase(), Phase::Completed);
}

#[tokio::test(start_paused = true)]
async fn test_wired_rotation_honors_hold() {
    let wallet = Arc::new(MockWallet::new(ACCOUNT));
    let reader = Arc::new(funded_reader());
    let mut config = rotation_config(1, false);
    config.hold_secs = 600;

    let start = tokio::time::Instant::now();
    let mut scheduler = build_scheduler(&config, wallet.clone(), reader);
    scheduler.run().await.unwrap();

    // One hold between the direct deposit and withdrawal; none after the last cycle.
    assert_eq!(start.elapsed(), Duration::from_secs(600));
    assert_eq!(wallet.labels().len(), 3);
}

#[test]
fn test_silo_defaults_share_token_to_silo() {
    let vault = rotation_config(1, false).silo.vault();
    assert_eq!(vault.share_token, SILO);

    let mut config = rotation_config(1, false);
    let share = address!("0x7777777777777777777777777777777777777777");
    config.silo.share_token = Some(share);
    assert_eq!(config.silo.vault().share_token, share);
}
