//! End-to-end tests through the protocol surface.
//!
//! Every call goes through `DexProtocol::invoke_atomic` against an
//! in-memory host: witnesses, asset module, relay registry and event log
//! all behave as a chain would present them to the dex.

use std::sync::Once;

use relaydex_protocol::{DexProtocol, Operation, Response};
use relaydex_types::testing::{MockModules, RecordingEvents, TestSigner, WitnessSet};
use relaydex_types::*;

const BASE: Address = Address([0xb0; 20]);
const QUOTE: Address = Address([0xc0; 20]);
const DEX: Address = Address([0xde; 20]);
const GOV: Address = Address([0x60; 20]);
const OPERATOR: Address = Address([0x0e; 20]);
const RELAY: Address = Address([0x77; 20]);
const CHANNEL: Address = Address([0xcc; 20]);
const CHAIN: u32 = 5;
const START: u64 = 1_000;

fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Helper: a chain hosting the dex.
struct Host {
    config: DexConfig,
    store: MemoryStore,
    modules: MockModules,
    events: RecordingEvents,
    now: u64,
}

impl Host {
    fn new() -> Self {
        init_tracing();
        Self {
            config: DexConfig::new(DEX, GOV),
            store: MemoryStore::new(),
            modules: MockModules::new(OPERATOR)
                .with_asset(BASE, 8)
                .with_asset(QUOTE, 8),
            events: RecordingEvents::default(),
            now: START,
        }
    }

    /// A host with `RELAY` registered.
    fn with_relay() -> Self {
        let mut host = Self::new();
        host.call(
            &[OPERATOR],
            Operation::SetRelay(SetRelayArgs {
                from: OPERATOR,
                target: RELAY,
                value: true,
            }),
        )
        .unwrap();
        host
    }

    /// Invoke `op` with `signers` as the call's witnesses.
    fn call(&mut self, signers: &[Address], op: Operation) -> Result<Response> {
        let auth = WitnessSet::of(signers);
        let mut ctx = DexContext {
            exec: ExecutionContext {
                chain_id: CHAIN,
                timestamp: self.now,
            },
            config: &self.config,
            store: &mut self.store,
            auth: &auth,
            modules: &mut self.modules,
            events: &mut self.events,
        };
        DexProtocol::invoke_atomic(&mut ctx, op)
    }

    /// Mint into the wallet of `account` and deposit it into the dex.
    fn fund(&mut self, account: Address, asset: Address, amount: u64) {
        self.modules.mint(account, asset, amount);
        self.call(
            &[account],
            Operation::Deposit(AssetArgs {
                asset,
                from: account,
                to: account,
                amount,
            }),
        )
        .unwrap();
    }

    fn balance(&mut self, account: Address, asset: Address) -> u64 {
        self.call(&[], Operation::BalanceOf { account, asset })
            .unwrap()
            .amount()
            .unwrap()
    }

    fn order_state(&mut self, order: &OrderData) -> Option<OrderState> {
        match self.call(&[], Operation::GetOrderState(order.raw.order_id())) {
            Ok(Response::OrderState(state)) => state,
            other => panic!("unexpected response {other:?}"),
        }
    }

    fn trade(&mut self, maker: &OrderData, taker: &OrderData, amount: &str) -> Result<Response> {
        self.call(
            &[RELAY],
            Operation::Trade(TradeArgs {
                maker: maker.clone(),
                taker: taker.clone(),
                relay: RelayArgs {
                    from: RELAY,
                    trade_amount: amount.into(),
                    maker_fee: "0".into(),
                    taker_fee: "0".into(),
                },
            }),
        )
    }
}

fn order(signer: &TestSigner, side: OrderSide, price: &str, amount: &str) -> OrderData {
    signer.sign_order(RawOrderData {
        chain_id: CHAIN,
        user: signer.address(),
        pair: pair_string(&BASE, &QUOTE),
        side,
        price: price.into(),
        amount: amount.into(),
        channel: CHANNEL,
        maker_fee_rate: 10,
        taker_fee_rate: 20,
        expire: 0,
        salt: 1,
    })
}

fn supply(host: &mut Host, accounts: &[Address], asset: Address) -> u64 {
    accounts.iter().map(|a| host.balance(*a, asset)).sum()
}

// =============================================================================
// Relay registry
// =============================================================================
#[test]
fn only_operator_manages_relays() {
    let mut host = Host::new();
    let outsider = Address([0x01; 20]);
    let add = |from| {
        Operation::SetRelay(SetRelayArgs {
            from,
            target: RELAY,
            value: true,
        })
    };

    let err = host.call(&[outsider], add(outsider)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
    // Operator identity without its witness is not enough.
    let err = host.call(&[], add(OPERATOR)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);

    host.call(&[OPERATOR], add(OPERATOR)).unwrap();
    assert_eq!(
        host.call(&[], Operation::Relays).unwrap(),
        Response::Relays(vec![RELAY])
    );
    assert_eq!(
        host.events.named("setRelay")[0][1..],
        [RELAY.to_string(), "true".to_string()]
    );

    host.call(
        &[OPERATOR],
        Operation::SetRelay(SetRelayArgs {
            from: OPERATOR,
            target: RELAY,
            value: false,
        }),
    )
    .unwrap();
    assert_eq!(
        host.call(&[], Operation::Relays).unwrap(),
        Response::Relays(vec![])
    );
}

// =============================================================================
// Deposit / withdraw boundary
// =============================================================================
#[test]
fn deposit_requires_witness_and_emits_event() {
    let mut host = Host::new();
    let alice = Address([0xa1; 20]);
    host.modules.mint(alice, BASE, 500);
    let deposit = Operation::Deposit(AssetArgs {
        asset: BASE,
        from: alice,
        to: alice,
        amount: 200,
    });

    let err = host.call(&[], deposit.clone()).unwrap_err();
    assert!(matches!(err, DexError::Unauthorized { .. }));

    host.call(&[alice], deposit).unwrap();
    assert_eq!(host.balance(alice, BASE), 200);
    assert_eq!(host.modules.holding(&DEX, &BASE), 200);
    let event = host.events.named("deposit")[0].clone();
    assert_eq!(event[4..], ["200".to_string(), "200".to_string()]);
}

#[test]
fn direct_withdraw_limited_to_allow_list() {
    let mut host = Host::new();
    let alice = Address([0xa1; 20]);
    host.fund(alice, BASE, 500);
    host.fund(GOV, BASE, 70);

    let err = host
        .call(
            &[alice],
            Operation::Withdraw(AssetArgs {
                asset: BASE,
                from: alice,
                to: alice,
                amount: 1,
            }),
        )
        .unwrap_err();
    assert!(matches!(err, DexError::Unauthorized { .. }));

    host.call(
        &[GOV],
        Operation::Withdraw(AssetArgs {
            asset: BASE,
            from: GOV,
            to: GOV,
            amount: 70,
        }),
    )
    .unwrap();
    assert_eq!(host.balance(GOV, BASE), 0);
    assert_eq!(host.modules.holding(&GOV, &BASE), 70);
}

// =============================================================================
// Trade lifecycle
// =============================================================================
#[test]
fn full_fill_conserves_supply() {
    let mut host = Host::with_relay();
    let alice = TestSigner::from_seed(1);
    let bob = TestSigner::from_seed(2);
    host.fund(alice.address(), BASE, 1_000_000_000);
    host.fund(bob.address(), QUOTE, 100_000_000);

    let maker = order(&alice, OrderSide::Sell, "0.1", "10");
    let taker = order(&bob, OrderSide::Buy, "0.2", "10");
    let accounts = [alice.address(), bob.address(), CHANNEL, GOV];
    let base_before = supply(&mut host, &accounts, BASE);
    let quote_before = supply(&mut host, &accounts, QUOTE);

    assert_eq!(host.trade(&maker, &taker, "10").unwrap(), Response::None);

    assert_eq!(supply(&mut host, &accounts, BASE), base_before);
    assert_eq!(supply(&mut host, &accounts, QUOTE), quote_before);

    // Taker receives base minus 20 bps channel and 3 bps system fee.
    assert_eq!(host.balance(bob.address(), BASE), 997_700_000);
    assert_eq!(host.balance(CHANNEL, BASE), 2_000_000);
    assert_eq!(host.balance(GOV, BASE), 300_000);
    // Maker receives quote minus 10 bps channel fee.
    assert_eq!(host.balance(alice.address(), QUOTE), 99_900_000);
    assert_eq!(host.balance(CHANNEL, QUOTE), 100_000);

    let state = host.order_state(&maker).unwrap();
    assert_eq!(state.filled, 1_000_000_000);
    assert_eq!(state.user, alice.address());

    let event = host.events.named("trade")[0].clone();
    assert_eq!(event[1], maker.raw.order_id().to_string());
    assert_eq!(event[3..6], ["0.10000000", "10.00000000", "1.00000000"]);
    assert_eq!(event[6..], ["0.00100000", "0.02300000", "0.00100000", "0.02000000"]);
}

#[test]
fn unregistered_relay_cannot_trade() {
    let mut host = Host::new();
    let alice = TestSigner::from_seed(1);
    let bob = TestSigner::from_seed(2);
    let maker = order(&alice, OrderSide::Sell, "0.1", "10");
    let taker = order(&bob, OrderSide::Buy, "0.1", "10");

    let err = host.trade(&maker, &taker, "10").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
}

#[test]
fn underfunded_trade_persists_nothing() {
    let mut host = Host::with_relay();
    let alice = TestSigner::from_seed(1);
    let bob = TestSigner::from_seed(2);
    host.fund(alice.address(), BASE, 1_000_000_000);
    host.fund(bob.address(), QUOTE, 99_999_999);
    let snapshot = host.store.clone();
    let events_before = host.events.events.len();

    let maker = order(&alice, OrderSide::Sell, "0.1", "10");
    let taker = order(&bob, OrderSide::Buy, "0.1", "10");
    let err = host.trade(&maker, &taker, "10").unwrap_err();

    assert_eq!(err.kind(), ErrorKind::BalanceNotEnough);
    assert_eq!(host.store, snapshot);
    assert_eq!(host.events.events.len(), events_before);
    assert_eq!(host.order_state(&maker), None);
}

#[test]
fn filled_order_cannot_be_replayed() {
    let mut host = Host::with_relay();
    let alice = TestSigner::from_seed(1);
    let bob = TestSigner::from_seed(2);
    host.fund(alice.address(), BASE, 2_000_000_000);
    host.fund(bob.address(), QUOTE, 200_000_000);

    let maker = order(&alice, OrderSide::Sell, "0.1", "10");
    let taker = order(&bob, OrderSide::Buy, "0.1", "10");
    host.trade(&maker, &taker, "10").unwrap();

    let err = host.trade(&maker, &taker, "10").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SurplusNotEnough);
}

// =============================================================================
// Cancellation
// =============================================================================
#[test]
fn cancel_is_idempotent_and_blocks_trading() {
    let mut host = Host::with_relay();
    let alice = TestSigner::from_seed(1);
    let bob = TestSigner::from_seed(2);
    host.fund(alice.address(), BASE, 1_000_000_000);
    host.fund(bob.address(), QUOTE, 100_000_000);
    let maker = order(&alice, OrderSide::Sell, "0.1", "10");
    let taker = order(&bob, OrderSide::Buy, "0.1", "10");

    let cancel = Operation::CancelOrder(maker.raw.clone());
    let err = host.call(&[bob.address()], cancel.clone()).unwrap_err();
    assert!(matches!(err, DexError::Unauthorized { .. }));

    for _ in 0..2 {
        let response = host.call(&[alice.address()], cancel.clone()).unwrap();
        assert_eq!(response, Response::Flag(true));
    }
    assert!(host.order_state(&maker).unwrap().canceled);
    assert_eq!(host.events.named("cancel").len(), 2);

    let err = host.trade(&maker, &taker, "10").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::OrderCanceled);
}

#[test]
fn delegate_cancel_invalidates_by_salt() {
    let mut host = Host::with_relay();
    let alice = TestSigner::from_seed(1);
    let bob = TestSigner::from_seed(2);
    host.fund(alice.address(), BASE, 1_000_000_000);
    host.fund(bob.address(), QUOTE, 100_000_000);
    let maker = order(&alice, OrderSide::Sell, "0.1", "10");
    let taker = order(&bob, OrderSide::Buy, "0.1", "10");

    let cancel = |number| {
        Operation::DelegateCancelOrder(DelegateCancelArgs {
            from: RELAY,
            user: alice.address(),
            number,
        })
    };
    assert_eq!(host.call(&[RELAY], cancel(1)).unwrap(), Response::Flag(true));

    let err = host.call(&[RELAY], cancel(1)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgs);

    let err = host.trade(&maker, &taker, "10").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::OrderCanceled);

    let event = host.events.named("delegateCancel")[0].clone();
    assert_eq!(event[3], "1");
}

// =============================================================================
// Withdrawals
// =============================================================================
#[test]
fn delegate_withdraw_cannot_be_replayed() {
    let mut host = Host::with_relay();
    let alice = TestSigner::from_seed(1);
    let dest = Address([0xd0; 20]);
    host.fund(alice.address(), QUOTE, 1_000);

    let mut args = DelegateWithdrawArgs {
        asset: QUOTE,
        from: alice.address(),
        to: dest,
        amount: 400,
        fee: 5,
        salt: 42,
        extra: "payout".into(),
        sig: alice.sign(b""),
        relay: RELAY,
    };
    args.sig = alice.sign(args.hash().as_bytes());

    let err = host
        .call(&[alice.address()], Operation::DelegateWithdraw(args.clone()))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);

    host.call(&[RELAY], Operation::DelegateWithdraw(args.clone()))
        .unwrap();
    assert_eq!(host.balance(alice.address(), QUOTE), 600);
    assert_eq!(host.balance(RELAY, QUOTE), 5);
    assert_eq!(host.modules.holding(&dest, &QUOTE), 395);

    let err = host
        .call(&[RELAY], Operation::DelegateWithdraw(args))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::WithdrawAlreadySubmitted);
    assert_eq!(host.balance(alice.address(), QUOTE), 600);
}

#[test]
fn two_phase_withdraw_caps_at_balance() {
    let mut host = Host::with_relay();
    let alice = TestSigner::from_seed(1);
    let bob = TestSigner::from_seed(2);
    let a = alice.address();
    host.fund(a, BASE, 1_000_000_000);
    host.fund(bob.address(), QUOTE, 100_000_000);

    let applied = host
        .call(
            &[a],
            Operation::PrepareWithdraw(AssetArgs {
                asset: BASE,
                from: a,
                to: a,
                amount: 1_000_000_000,
            }),
        )
        .unwrap();
    assert_eq!(applied, Response::Amount(1_000_000_000));

    let commit = Operation::CommitWithdraw(CommitWithdrawArgs { from: a, asset: BASE });
    host.now = START + 5;
    let err = host.call(&[a], commit.clone()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ApplyWaitNotEnough);

    // Alice sells 4 of her 10 before the commit lands.
    let maker = order(&alice, OrderSide::Sell, "0.1", "10");
    let taker = order(&bob, OrderSide::Buy, "0.1", "10");
    host.trade(&maker, &taker, "4").unwrap();
    assert_eq!(host.balance(a, BASE), 600_000_000);

    host.now = START + host.config.params.withdraw_apply_wait_time;
    assert_eq!(host.call(&[a], commit.clone()).unwrap(), Response::Amount(0));
    assert_eq!(host.modules.holding(&a, &BASE), 600_000_000);
    assert_eq!(
        host.call(&[], Operation::GetPrepareWithdrawState { from: a, asset: BASE })
            .unwrap(),
        Response::PrepareWithdrawState(None)
    );
    let event = host.events.named("commitWithdraw")[0].clone();
    assert_eq!(event[4..], ["600000000".to_string(), "0".to_string()]);

    let err = host.call(&[a], commit).unwrap_err();
    assert!(matches!(err, DexError::WithdrawZero));
}

// =============================================================================
// Governance
// =============================================================================
#[test]
fn governance_claims_finished_round_fees() {
    let mut host = Host::with_relay();
    let alice = TestSigner::from_seed(1);
    let bob = TestSigner::from_seed(2);
    host.fund(alice.address(), BASE, 1_000_000_000);
    host.fund(bob.address(), QUOTE, 100_000_000);
    let maker = order(&alice, OrderSide::Sell, "0.1", "10");
    let taker = order(&bob, OrderSide::Buy, "0.1", "10");
    host.trade(&maker, &taker, "10").unwrap();

    let claim = Operation::ClaimSpProfit { asset: BASE };
    // Round 0 is still running.
    assert_eq!(host.call(&[GOV], claim.clone()).unwrap(), Response::Amount(0));

    let err = host
        .call(&[RELAY], Operation::EpochEnd { round: 1 })
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
    host.call(&[GOV], Operation::EpochEnd { round: 1 }).unwrap();

    assert_eq!(
        host.call(&[GOV], claim.clone()).unwrap(),
        Response::Amount(300_000)
    );
    assert_eq!(host.balance(GOV, BASE), 0);
    assert_eq!(host.modules.holding(&GOV, &BASE), 300_000);
    assert_eq!(host.call(&[GOV], claim).unwrap(), Response::Amount(0));
}

// =============================================================================
// Configuration
// =============================================================================
#[test]
fn out_of_range_config_rejects_every_call() {
    let mut host = Host::with_relay();
    let alice = TestSigner::from_seed(1);
    let bob = TestSigner::from_seed(2);
    host.fund(alice.address(), BASE, 1_000_000_000);
    host.fund(bob.address(), QUOTE, 100_000_000);
    host.modules.prime.insert(bob.address());

    host.config.params.prime_fee_discount_percent = 250;
    host.config.params.taker_sys_fee_rate = 100;
    let snapshot = host.store.clone();
    let events_before = host.events.events.len();

    let maker = order(&alice, OrderSide::Sell, "0.1", "10");
    let taker = order(&bob, OrderSide::Buy, "0.1", "10");
    let err = host.trade(&maker, &taker, "10").unwrap_err();
    assert!(matches!(err, DexError::Configuration(_)));
    assert_eq!(host.store, snapshot);
    assert_eq!(host.events.events.len(), events_before);

    // Queries are refused too.
    let err = host
        .call(
            &[],
            Operation::BalanceOf {
                account: GOV,
                asset: BASE,
            },
        )
        .unwrap_err();
    assert!(matches!(err, DexError::Configuration(_)));

    host.config.params = DexParams::default();
    host.config.params.withdraw_apply_wait_time = 0;
    let err = host
        .call(
            &[alice.address()],
            Operation::PrepareWithdraw(AssetArgs {
                asset: BASE,
                from: alice.address(),
                to: alice.address(),
                amount: 1,
            }),
        )
        .unwrap_err();
    assert!(matches!(err, DexError::Configuration(_)));

    // Back in range: the prime taker pays 80% of the 3 bps system fee.
    host.config.params = DexParams::default();
    host.trade(&maker, &taker, "10").unwrap();
    assert_eq!(host.balance(GOV, BASE), 240_000);
}

// =============================================================================
// Wire decoding
// =============================================================================
#[test]
fn decoded_operation_runs() {
    let mut host = Host::with_relay();
    let bytes = serde_json::to_vec(&Operation::Relays).unwrap();
    let op = Operation::decode(&bytes).unwrap();
    assert_eq!(host.call(&[], op).unwrap(), Response::Relays(vec![RELAY]));
}
