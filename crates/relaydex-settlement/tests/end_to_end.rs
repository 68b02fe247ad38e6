//! End-to-end integration tests across all three planes.
//!
//! These tests exercise the full trade lifecycle:
//! Ingress (verify) -> `MatchCore` (match + fees) -> Settlement (ledger)
//!
//! They verify that the three planes work together correctly in realistic
//! scenarios: full and partial fills, prime discounts, insufficient funds,
//! supply conservation, and the withdraw boundary after a trade.

use relaydex_ingress::{VerifiedTrade, verify_trade};
use relaydex_matchcore::{PrimeStatus, count_fee, match_order};
use relaydex_settlement::{
    Ledger, SettlementReceipt, SupplyConservation, balance_of, commit_withdraw, prepare_withdraw,
    settle_trade,
};
use relaydex_types::testing::{MockModules, RecordingEvents, TestSigner, WitnessSet};
use relaydex_types::*;

const BASE: Address = Address([0xb0; 20]);
const QUOTE: Address = Address([0xc0; 20]);
const DEX: Address = Address([0xde; 20]);
const GOV: Address = Address([0x60; 20]);
const RELAY: Address = Address([0x77; 20]);
const CHAIN: u32 = 3;

/// Helper: trade pipeline over one store - verify, match, fee, settle.
struct TradePipeline {
    config: DexConfig,
    exec: ExecutionContext,
    store: MemoryStore,
    modules: MockModules,
}

impl TradePipeline {
    fn new() -> Self {
        Self {
            config: DexConfig::new(DEX, GOV),
            exec: ExecutionContext {
                chain_id: CHAIN,
                timestamp: 1_000,
            },
            store: MemoryStore::new(),
            modules: MockModules::new(Address([0xee; 20]))
                .with_asset(BASE, 8)
                .with_asset(QUOTE, 8),
        }
    }

    fn fund(&mut self, account: &Address, asset: &Address, amount: u64) {
        Ledger::new(&mut self.store)
            .credit(account, asset, amount)
            .unwrap();
        self.modules.mint(DEX, *asset, amount);
    }

    fn order(&self, signer: &TestSigner, side: OrderSide, price: &str, amount: &str) -> OrderData {
        signer.sign_order(RawOrderData {
            chain_id: CHAIN,
            user: signer.address(),
            pair: pair_string(&BASE, &QUOTE),
            side,
            price: price.into(),
            amount: amount.into(),
            channel: Address([0xcc; 20]),
            maker_fee_rate: 0,
            taker_fee_rate: 0,
            expire: 0,
            salt: 1,
        })
    }

    /// Run one trade; writes are staged and only committed on success.
    fn trade(
        &mut self,
        maker: &OrderData,
        taker: &OrderData,
        amount: &str,
    ) -> Result<SettlementReceipt> {
        let args = TradeArgs {
            maker: maker.clone(),
            taker: taker.clone(),
            relay: RelayArgs {
                from: RELAY,
                trade_amount: amount.into(),
                maker_fee: "0".into(),
                taker_fee: "0".into(),
            },
        };

        // VERIFY phase
        let VerifiedTrade {
            mut maker,
            mut taker,
            relay,
        } = verify_trade(&self.exec, &self.store, &self.modules, &args)?;

        // MATCH phase
        let mut clear = match_order(&mut maker, &mut taker, &relay)?;
        let prime = PrimeStatus {
            maker: self.modules.is_prime(&maker.user)?,
            taker: self.modules.is_prime(&taker.user)?,
        };
        count_fee(&self.config.params, &maker, &taker, prime, &mut clear)?;

        // SETTLE phase
        let mut staged = CacheStore::new(&mut self.store);
        let receipt = settle_trade(&mut staged, &self.config.accounts, &maker, &taker, &clear)?;
        staged.commit()?;
        Ok(receipt)
    }

    fn balance(&self, account: &Address, asset: &Address) -> u64 {
        balance_of(&self.store, account, asset).unwrap()
    }

    fn order_state(&self, order: &OrderData) -> Option<OrderState> {
        self.store
            .load(&keys::order_state(&order.raw.order_id()))
            .unwrap()
    }
}

// =============================================================================
// Test: Full fill across all three planes
// =============================================================================
#[test]
fn e2e_full_fill() {
    let mut pipeline = TradePipeline::new();
    let alice = TestSigner::from_seed(1);
    let bob = TestSigner::from_seed(2);

    // Alice sells 10 BASE @ 0.1, Bob buys 10 BASE @ 0.2
    pipeline.fund(&alice.address(), &BASE, 1_000_000_000);
    pipeline.fund(&bob.address(), &QUOTE, 100_000_000);
    let maker = pipeline.order(&alice, OrderSide::Sell, "0.1", "10");
    let taker = pipeline.order(&bob, OrderSide::Buy, "0.2", "10");

    let receipt = pipeline.trade(&maker, &taker, "10").expect("Trade should settle");

    assert_eq!(receipt.clear.price, 10_000_000, "Maker price wins");
    assert_eq!(receipt.clear.trade_amount, 1_000_000_000);
    assert_eq!(receipt.clear.trade_quote_amount, 100_000_000);
    // Default taker sys fee is 3 bps of the base the taker receives.
    assert_eq!(receipt.clear.taker_sys_fee, 300_000);
    assert_eq!(receipt.clear.maker_fee, 0);

    assert_eq!(pipeline.balance(&bob.address(), &BASE), 999_700_000);
    assert_eq!(pipeline.balance(&bob.address(), &QUOTE), 0);
    assert_eq!(pipeline.balance(&alice.address(), &QUOTE), 100_000_000);
    assert_eq!(pipeline.balance(&alice.address(), &BASE), 0);
    assert_eq!(pipeline.balance(&GOV, &BASE), 300_000);

    assert_eq!(pipeline.order_state(&maker).unwrap().filled, 1_000_000_000);
    assert_eq!(pipeline.order_state(&taker).unwrap().filled, 1_000_000_000);

    SupplyConservation::from_journal(&receipt.deltas)
        .verify()
        .expect("Supply conserved");
}

// =============================================================================
// Test: One maker filled by two takers, then exhausted
// =============================================================================
#[test]
fn e2e_partial_fills() {
    let mut pipeline = TradePipeline::new();
    let alice = TestSigner::from_seed(1);
    let bob = TestSigner::from_seed(2);
    let carol = TestSigner::from_seed(3);

    pipeline.fund(&alice.address(), &BASE, 1_000_000_000);
    pipeline.fund(&bob.address(), &QUOTE, 100_000_000);
    pipeline.fund(&carol.address(), &QUOTE, 100_000_000);

    let maker = pipeline.order(&alice, OrderSide::Sell, "0.1", "10");
    let bob_order = pipeline.order(&bob, OrderSide::Buy, "0.1", "4");
    let carol_order = pipeline.order(&carol, OrderSide::Buy, "0.15", "10");

    pipeline.trade(&maker, &bob_order, "4").unwrap();
    assert_eq!(pipeline.order_state(&maker).unwrap().filled, 400_000_000);

    pipeline.trade(&maker, &carol_order, "6").unwrap();
    assert_eq!(pipeline.order_state(&maker).unwrap().filled, 1_000_000_000);
    assert_eq!(pipeline.order_state(&carol_order).unwrap().filled, 600_000_000);

    // Carol still has surplus, but the maker has none left.
    let err = pipeline.trade(&maker, &carol_order, "1").unwrap_err();
    assert!(
        matches!(err, DexError::SurplusNotEnough { available: 0, .. }),
        "Expected SurplusNotEnough, got: {err:?}"
    );

    assert_eq!(pipeline.balance(&alice.address(), &QUOTE), 100_000_000);
    assert_eq!(pipeline.balance(&carol.address(), &QUOTE), 40_000_000);
}

// =============================================================================
// Test: Prime taker pays the discounted system fee
// =============================================================================
#[test]
fn e2e_prime_discount() {
    let mut pipeline = TradePipeline::new();
    let alice = TestSigner::from_seed(1);
    let bob = TestSigner::from_seed(2);
    pipeline.modules.prime.insert(bob.address());

    pipeline.fund(&alice.address(), &BASE, 1_000_000_000);
    pipeline.fund(&bob.address(), &QUOTE, 100_000_000);
    let maker = pipeline.order(&alice, OrderSide::Sell, "0.1", "10");
    let taker = pipeline.order(&bob, OrderSide::Buy, "0.1", "10");

    let receipt = pipeline.trade(&maker, &taker, "10").unwrap();
    assert_eq!(receipt.clear.taker_sys_fee, 240_000);
    assert_eq!(pipeline.balance(&GOV, &BASE), 240_000);
}

// =============================================================================
// Test: Underfunded taker leaves nothing behind
// =============================================================================
#[test]
fn e2e_insufficient_balance_persists_nothing() {
    let mut pipeline = TradePipeline::new();
    let alice = TestSigner::from_seed(1);
    let bob = TestSigner::from_seed(2);

    pipeline.fund(&alice.address(), &BASE, 1_000_000_000);
    pipeline.fund(&bob.address(), &QUOTE, 99_999_999);
    let before = pipeline.store.clone();

    let maker = pipeline.order(&alice, OrderSide::Sell, "0.1", "10");
    let taker = pipeline.order(&bob, OrderSide::Buy, "0.1", "10");
    let err = pipeline.trade(&maker, &taker, "10").unwrap_err();

    assert!(matches!(err, DexError::BalanceNotEnough { .. }));
    assert_eq!(pipeline.store, before, "Staged writes must be discarded");
}

// =============================================================================
// Test: Trade proceeds can be withdrawn through the two-phase withdraw
// =============================================================================
#[test]
fn e2e_trade_then_withdraw() {
    let mut pipeline = TradePipeline::new();
    let alice = TestSigner::from_seed(1);
    let bob = TestSigner::from_seed(2);

    pipeline.fund(&alice.address(), &BASE, 1_000_000_000);
    pipeline.fund(&bob.address(), &QUOTE, 100_000_000);
    let maker = pipeline.order(&alice, OrderSide::Sell, "0.1", "10");
    let taker = pipeline.order(&bob, OrderSide::Buy, "0.1", "10");
    pipeline.trade(&maker, &taker, "10").unwrap();

    let auth = WitnessSet::default();
    let mut events = RecordingEvents::default();
    let alice_addr = alice.address();
    let mut ctx = DexContext {
        exec: pipeline.exec,
        config: &pipeline.config,
        store: &mut pipeline.store,
        auth: &auth,
        modules: &mut pipeline.modules,
        events: &mut events,
    };
    let applied = prepare_withdraw(
        &mut ctx,
        &AssetArgs {
            asset: QUOTE,
            from: alice_addr,
            to: alice_addr,
            amount: 100_000_000,
        },
    )
    .unwrap();
    assert_eq!(applied, 100_000_000);

    ctx.exec.timestamp += ctx.config.params.withdraw_apply_wait_time;
    let outcome = commit_withdraw(
        &mut ctx,
        &CommitWithdrawArgs {
            from: alice_addr,
            asset: QUOTE,
        },
    )
    .unwrap();
    assert_eq!(outcome.withdrawn, 100_000_000);
    assert_eq!(outcome.remaining, 0);
    assert_eq!(pipeline.modules.holding(&alice_addr, &QUOTE), 100_000_000);
}
