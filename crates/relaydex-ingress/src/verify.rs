//! Trade verification pipeline: hard gate in front of matching.
//!
//! ## Check Order
//!
//! Checks run in a fixed order and the first failure rejects the trade:
//!
//! 1. chain id of both orders (`ChainIdError`)
//! 2. expiry (`OrderExpired`)
//! 3. the four channel fee rates (`FeeIllegal`)
//! 4. complementary sides (`SideError`)
//! 5. reconstruction of both orders and the relay instruction
//! 6. identical pair (`PairError`)
//! 7. per-order cancel flag (`OrderCanceled`)
//! 8. delegated cancel sequence (`OrderCanceled`)
//! 9. signer address equals order user (`SigKeySetInvalid`, `SigUserMismatch`)
//! 10. signature over the order id (`SigVerifyFailed`)
//!
//! Nothing is written to the store.

use relaydex_types::constants::MAX_FEE_RATE;
use relaydex_types::{
    DexError, ExecutionContext, ExternalModules, Order, Relay, Result, StateStore, TradeArgs,
};

use crate::cancel::{is_canceled, is_sequence_canceled};
use crate::reconstruct::{parse_relay, reconstruct_order};

/// Output of a successful verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedTrade {
    pub maker: Order,
    pub taker: Order,
    pub relay: Relay,
}

/// Run the full pipeline over a relay-submitted pair.
///
/// # Errors
/// The error of the first failing check.
pub fn verify_trade(
    exec: &ExecutionContext,
    store: &dyn StateStore,
    modules: &dyn ExternalModules,
    args: &TradeArgs,
) -> Result<VerifiedTrade> {
    let result = run_checks(exec, store, modules, args);
    if let Err(err) = &result {
        tracing::warn!(
            relay = %args.relay.from,
            maker_user = %args.maker.raw.user,
            taker_user = %args.taker.raw.user,
            error = %err,
            "Trade rejected"
        );
    }
    result
}

fn run_checks(
    exec: &ExecutionContext,
    store: &dyn StateStore,
    modules: &dyn ExternalModules,
    args: &TradeArgs,
) -> Result<VerifiedTrade> {
    let maker_raw = &args.maker.raw;
    let taker_raw = &args.taker.raw;

    // 1. chain id
    for raw in [maker_raw, taker_raw] {
        if raw.chain_id != exec.chain_id {
            return Err(DexError::ChainIdError {
                expected: exec.chain_id,
                actual: raw.chain_id,
            });
        }
    }

    // 2. expiry
    for raw in [maker_raw, taker_raw] {
        if raw.is_expired(exec.timestamp) {
            return Err(DexError::OrderExpired {
                order: raw.order_id(),
                expire: raw.expire,
                now: exec.timestamp,
            });
        }
    }

    // 3. fee rates
    for raw in [maker_raw, taker_raw] {
        if let Some(rate) = raw.illegal_fee_rate() {
            return Err(DexError::FeeIllegal {
                rate,
                max: MAX_FEE_RATE,
            });
        }
    }

    // 4. sides
    if maker_raw.side == taker_raw.side {
        return Err(DexError::SideError(maker_raw.side));
    }

    // 5. reconstruction
    let maker = reconstruct_order(maker_raw, store, modules)?;
    let taker = reconstruct_order(taker_raw, store, modules)?;
    let relay = parse_relay(&args.relay, &taker)?;

    // 6. pair
    if maker.base != taker.base || maker.quote != taker.quote {
        return Err(DexError::PairError {
            maker: maker_raw.pair.clone(),
            taker: taker_raw.pair.clone(),
        });
    }

    // 7. direct cancel
    for order in [&maker, &taker] {
        if is_canceled(store, &order.id)? {
            return Err(DexError::OrderCanceled(order.id));
        }
    }

    // 8. delegated cancel sequence
    for (order, raw) in [(&maker, maker_raw), (&taker, taker_raw)] {
        if is_sequence_canceled(store, &raw.user, raw.salt)? {
            return Err(DexError::OrderCanceled(order.id));
        }
    }

    // 9. signer
    for data in [&args.maker, &args.taker] {
        data.sig.ensure_signer(&data.raw.user)?;
    }

    // 10. signature
    for (order, data) in [(&maker, &args.maker), (&taker, &args.taker)] {
        if !data.sig.verify(order.id.as_bytes()) {
            return Err(DexError::SigVerifyFailed);
        }
    }

    Ok(VerifiedTrade {
        maker,
        taker,
        relay,
    })
}
