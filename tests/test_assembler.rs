
use std::sync::Arc;

use alloy::primitives::{Address, U256};
use alloy::sol_types::{SolCall, SolInterface};

use fund_rotator::error::RotationError;
use fund_rotator::model::{Amount, CalldataBlob, TokenHandle};
use fund_rotator::venues::assembler::TransactionAssembler;
use fund_rotator::venues::calldata::{CalldataEncoder, SiloRouterCalldata};
use fund_rotator::venues::evm::IERC20;
use fund_rotator::venues::lending::aave::IAavePool;
use fund_rotator::venues::lending::silo::{ISilo, ISiloRouter};
use fund_rotator::venues::lending::{
    CollateralType, LendingPool, SiloLending, SiloRouter, SiloVault,
};
use fund_rotator::venues::units::DEFAULT_FALLBACK_DECIMALS;
use fund_rotator::venues::Venue;

use mock_common::*;

// ── Helpers ─────────────────────────────────────────────────────────

fn funded_reader() -> MockReader {
    MockReader::new()
        .with_decimals(TOKEN, 6)
        .with_balance(TOKEN, U256::from(1_000_000_000u64))
}

fn assembler(reader: MockReader) -> TransactionAssembler {
    TransactionAssembler::new(ACCOUNT, Arc::new(reader), DEFAULT_FALLBACK_DECIMALS)
}

fn usdc() -> TokenHandle {
    TokenHandle::new("USDC", TOKEN)
}

fn amount(s: &str) -> Amount {
    s.parse().unwrap()
}

/// Encodes transferFrom and approve normally but fails the deposit.
struct FailingDepositEncoder;

impl CalldataEncoder for FailingDepositEncoder {
    fn encode_transfer_from(&self, token: Address, to: Address, amount: U256) -> CalldataBlob {
        SiloRouterCalldata.encode_transfer_from(token, to, amount)
    }

    fn encode_approve(&self, token: Address, spender: Address, amount: U256) -> CalldataBlob {
        SiloRouterCalldata.encode_approve(token, spender, amount)
    }

    fn encode_deposit(&self, _silo: Address, _amount: U256, _c: CollateralType) -> CalldataBlob {
        CalldataBlob::empty(ISiloRouter::depositCall::SIGNATURE)
    }
}

// ── Aave supply ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_supply_batch_approves_then_supplies() {
    let assembler = assembler(funded_reader());
    let pool = LendingPool::new(POOL);
    let batch = assembler
        .supply_to_pool(&pool, &usdc(), &amount("100"), 7)
        .await
        .unwrap();

    assert_eq!(batch.label, "aave-supply");
    assert_eq!(batch.len(), 2);
    let units = U256::from(100_000_000u64);

    let approve = &batch.steps()[0];
    assert_eq!(approve.target, TOKEN);
    let call = IERC20::approveCall::abi_decode(&approve.calldata).unwrap();
    assert_eq!(call.spender, POOL);
    assert_eq!(call.amount, units);

    let supply = &batch.steps()[1];
    assert_eq!(supply.target, POOL);
    let call = IAavePool::supplyCall::abi_decode(&supply.calldata).unwrap();
    assert_eq!(call.asset, TOKEN);
    assert_eq!(call.amount, units);
    assert_eq!(call.onBehalfOf, ACCOUNT);
    assert_eq!(call.referralCode, 7);
}

#[tokio::test]
async fn test_supply_refused_when_balance_short() {
    let reader = MockReader::new()
        .with_decimals(TOKEN, 6)
        .with_balance(TOKEN, U256::from(99_999_999u64));
    let err = assembler(reader)
        .supply_to_pool(&LendingPool::new(POOL), &usdc(), &amount("100"), 0)
        .await
        .unwrap_err();
    assert!(matches!(err, RotationError::InsufficientFunds { .. }), "got {err:?}");
}

#[tokio::test]
async fn test_withdraw_from_pool_targets_the_account() {
    let step = assembler(funded_reader())
        .withdraw_from_pool(&LendingPool::new(POOL), &usdc(), &amount("40.5"))
        .await
        .unwrap();

    assert_eq!(step.target, POOL);
    assert_eq!(step.method, IAavePool::withdrawCall::SIGNATURE);
    let call = IAavePool::withdrawCall::abi_decode(&step.calldata).unwrap();
    assert_eq!(call.asset, TOKEN);
    assert_eq!(call.amount, U256::from(40_500_000u64));
    assert_eq!(call.to, ACCOUNT);
}

// ── Silo router deposit ─────────────────────────────────────────────

#[tokio::test]
async fn test_router_deposit_batch_layout() {
    let assembler = assembler(funded_reader());
    let router = SiloRouter::new(ROUTER);
    let silo = SiloVault::new(SILO, CollateralType::Collateral);
    let batch = assembler
        .deposit_to_router(&router, &silo, &usdc(), &amount("25"))
        .await
        .unwrap();
    let units = U256::from(25_000_000u64);

    assert_eq!(batch.label, "silo-deposit");
    assert_eq!(batch.len(), 2);

    // Outer step 1: the account approves the router.
    let approve = &batch.steps()[0];
    assert_eq!(approve.target, TOKEN);
    let call = IERC20::approveCall::abi_decode(&approve.calldata).unwrap();
    assert_eq!(call.spender, ROUTER);
    assert_eq!(call.amount, units);

    // Outer step 2: one multicall on the router.
    let multicall = &batch.steps()[1];
    assert_eq!(multicall.target, ROUTER);
    let inner = ISiloRouter::multicallCall::abi_decode(&multicall.calldata)
        .unwrap()
        .data;
    assert_eq!(inner.len(), 3);

    match ISiloRouter::ISiloRouterCalls::abi_decode(&inner[0]).unwrap() {
        ISiloRouter::ISiloRouterCalls::transferFrom(c) => {
            assert_eq!(c.token, TOKEN);
            assert_eq!(c.to, ROUTER);
            assert_eq!(c.amount, units);
        }
        _ => panic!("inner[0] should be transferFrom"),
    }
    match ISiloRouter::ISiloRouterCalls::abi_decode(&inner[1]).unwrap() {
        ISiloRouter::ISiloRouterCalls::approve(c) => {
            assert_eq!(c.token, TOKEN);
            assert_eq!(c.spender, SILO);
            assert_eq!(c.amount, units);
        }
        _ => panic!("inner[1] should be approve"),
    }
    match ISiloRouter::ISiloRouterCalls::abi_decode(&inner[2]).unwrap() {
        ISiloRouter::ISiloRouterCalls::deposit(c) => {
            assert_eq!(c.silo, SILO);
            assert_eq!(c.amount, units);
            assert_eq!(c.collateralType, 1);
        }
        _ => panic!("inner[2] should be deposit"),
    }
}

#[tokio::test]
async fn test_router_deposit_carries_protected_collateral() {
    let batch = assembler(funded_reader())
        .deposit_to_router(
            &SiloRouter::new(ROUTER),
            &SiloVault::new(SILO, CollateralType::Protected),
            &usdc(),
            &amount("1"),
        )
        .await
        .unwrap();
    let inner = ISiloRouter::multicallCall::abi_decode(&batch.steps()[1].calldata)
        .unwrap()
        .data;
    let deposit = ISiloRouter::depositCall::abi_decode(&inner[2]).unwrap();
    assert_eq!(deposit.collateralType, 0);
}

#[tokio::test]
async fn test_encoding_failure_aborts_router_deposit() {
    let assembler = assembler(funded_reader()).with_encoder(Arc::new(FailingDepositEncoder));
    let err = assembler
        .deposit_to_router(
            &SiloRouter::new(ROUTER),
            &SiloVault::new(SILO, CollateralType::Collateral),
            &usdc(),
            &amount("25"),
        )
        .await
        .unwrap_err();
    match err {
        RotationError::CalldataEncoding { call, .. } => {
            assert_eq!(call, ISiloRouter::depositCall::SIGNATURE);
        }
        other => panic!("expected CalldataEncoding, got {other:?}"),
    }
}

#[tokio::test]
async fn test_encoding_failure_submits_nothing() {
    let reader: Arc<MockReader> = Arc::new(funded_reader());
    let assembler = Arc::new(
        TransactionAssembler::new(ACCOUNT, reader, DEFAULT_FALLBACK_DECIMALS)
            .with_encoder(Arc::new(FailingDepositEncoder)),
    );
    let wallet = Arc::new(MockWallet::new(ACCOUNT));
    let silo = SiloLending::new(
        wallet.clone(),
        assembler,
        SiloRouter::new(ROUTER),
        SiloVault::new(SILO, CollateralType::Collateral),
        usdc(),
    );

    let err = silo.deposit(&amount("25")).await.unwrap_err();
    assert!(matches!(err, RotationError::CalldataEncoding { .. }));
    assert!(wallet.submissions().is_empty());
}

#[tokio::test]
async fn test_router_deposit_refused_when_balance_short() {
    let reader = MockReader::new()
        .with_decimals(TOKEN, 6)
        .with_balance(TOKEN, U256::from(24_999_999u64));
    let err = assembler(reader)
        .deposit_to_router(
            &SiloRouter::new(ROUTER),
            &SiloVault::new(SILO, CollateralType::Collateral),
            &usdc(),
            &amount("25"),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, RotationError::InsufficientFunds { .. }), "got {err:?}");
}

// ── Silo redemption ─────────────────────────────────────────────────

#[tokio::test]
async fn test_redeem_uses_full_share_balance() {
    let reader = funded_reader().with_shares(SILO, U256::from(987_654u64));
    let redemption = assembler(reader)
        .redeem_from_silo(&SiloVault::new(SILO, CollateralType::Collateral))
        .await
        .unwrap()
        .expect("shares held");

    assert_eq!(redemption.shares, U256::from(987_654u64));
    assert_eq!(redemption.step.target, SILO);
    let call = ISilo::redeemCall::abi_decode(&redemption.step.calldata).unwrap();
    assert_eq!(call.shares, U256::from(987_654u64));
    assert_eq!(call.receiver, ACCOUNT);
    assert_eq!(call.owner, ACCOUNT);
    assert_eq!(call.collateralType, 1);
}

#[tokio::test]
async fn test_redeem_reads_configured_share_token() {
    let reader = funded_reader().with_shares(SHARE_TOKEN, U256::from(5u64));
    let silo = SiloVault::new(SILO, CollateralType::Protected).with_share_token(SHARE_TOKEN);
    let redemption = assembler(reader)
        .redeem_from_silo(&silo)
        .await
        .unwrap()
        .expect("shares held");

    // Redeem still goes to the silo, not the share token.
    assert_eq!(redemption.step.target, SILO);
    assert_eq!(redemption.shares, U256::from(5u64));
}

#[tokio::test]
async fn test_redeem_with_no_shares_is_none() {
    let reader = funded_reader().with_shares(SILO, U256::ZERO);
    let redemption = assembler(reader)
        .redeem_from_silo(&SiloVault::new(SILO, CollateralType::Collateral))
        .await
        .unwrap();
    assert!(redemption.is_none());
}

// ── Router calldata encoder ─────────────────────────────────────────

#[test]
fn test_encoder_rejects_zero_arguments() {
    let encoder = SiloRouterCalldata;
    let units = U256::from(1u64);

    assert!(encoder.encode_transfer_from(Address::ZERO, ROUTER, units).is_empty());
    assert!(encoder.encode_approve(TOKEN, Address::ZERO, units).is_empty());
    assert!(encoder
        .encode_deposit(SILO, U256::ZERO, CollateralType::Collateral)
        .is_empty());
    assert!(!encoder
        .encode_deposit(SILO, units, CollateralType::Collateral)
        .is_empty());
}

#[test]
fn test_encoder_uses_router_selectors() {
    let blob = SiloRouterCalldata.encode_approve(TOKEN, SILO, U256::from(1u64));
    assert_eq!(blob.method, ISiloRouter::approveCall::SIGNATURE);
    assert_eq!(&blob.data[..4], ISiloRouter::approveCall::SELECTOR.as_slice());
    // Router approve takes the token as its first argument, unlike ERC20 approve.
    assert_ne!(ISiloRouter::approveCall::SELECTOR, IERC20::approveCall::SELECTOR);
}
