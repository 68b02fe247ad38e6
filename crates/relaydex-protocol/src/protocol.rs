//! Operation dispatch.
//!
//! [`DexProtocol::invoke`] authorizes an [`Operation`], runs it against the
//! call's [`DexContext`] and emits its event. Authorization happens here;
//! the business checks live in the crates that own each concern:
//!
//! | concern | crate |
//! |---|---|
//! | trade verification | `relaydex-ingress` |
//! | matching and fees | `relaydex-matchcore` |
//! | balances, withdrawals, governance | `relaydex-settlement` |

use relaydex_ingress::verify_trade;
use relaydex_matchcore::{PrimeStatus, count_fee, match_order};
use relaydex_settlement as settlement;
use relaydex_types::{
    Address, AssetArgs, BufferedEvents, CacheStore, DexContext, DexError, ErrorKind, Result,
    TradeArgs,
};

use crate::events;
use crate::operation::{Operation, Response};
use crate::orders;
use crate::relay;

/// Entry point of the dex.
pub struct DexProtocol;

impl DexProtocol {
    /// Authorize and execute one operation.
    ///
    /// Writes go straight to `ctx.store`; on error some may already have
    /// happened. Hosts without their own transaction use
    /// [`invoke_atomic`](Self::invoke_atomic).
    ///
    /// # Errors
    /// `Configuration` if `ctx.config` is out of range, before anything
    /// runs. `Unauthorized` for a missing witness, relay registration or
    /// allow-list entry; otherwise the error of the failing step.
    pub fn invoke(ctx: &mut DexContext<'_>, op: Operation) -> Result<Response> {
        let method = op.name();
        let result = ctx
            .config
            .validate()
            .and_then(|()| Self::dispatch(ctx, op));
        match &result {
            Ok(_) => tracing::debug!(method, "Operation completed"),
            Err(err) if err.kind() == ErrorKind::Unauthorized => {
                tracing::warn!(method, error = %err, "Operation not authorized");
            }
            Err(err @ DexError::Configuration(_)) => {
                tracing::warn!(method, error = %err, "Operation rejected by configuration");
            }
            Err(err) => tracing::debug!(method, error = %err, "Operation failed"),
        }
        result
    }

    /// Run [`invoke`](Self::invoke) over a staged copy of the store and
    /// buffered events. Both are applied only if the operation succeeds.
    ///
    /// Calls into `ctx.modules` are not staged; the host's asset module
    /// must roll those back itself. Queries write nothing and run directly.
    pub fn invoke_atomic(ctx: &mut DexContext<'_>, op: Operation) -> Result<Response> {
        if op.is_query() {
            return Self::invoke(ctx, op);
        }
        let mut staged = CacheStore::new(&mut *ctx.store);
        let mut buffered = BufferedEvents::default();
        let response = {
            let mut inner = DexContext {
                exec: ctx.exec,
                config: ctx.config,
                store: &mut staged,
                auth: ctx.auth,
                modules: &mut *ctx.modules,
                events: &mut buffered,
            };
            Self::invoke(&mut inner, op)?
        };
        tracing::trace!(writes = staged.pending(), "Committing staged writes");
        staged.commit()?;
        buffered.flush_into(&mut *ctx.events);
        Ok(response)
    }

    fn dispatch(ctx: &mut DexContext<'_>, op: Operation) -> Result<Response> {
        match op {
            Operation::Deposit(args) => {
                require_witness(ctx, &args.from)?;
                let balance = settlement::deposit(ctx, &args)?;
                ctx.events.emit(events::transfer(events::DEPOSIT, &args, balance));
                Ok(Response::None)
            }
            Operation::Withdraw(args) => {
                require_witness(ctx, &args.from)?;
                if !ctx.config.accounts.may_withdraw(&args.from) {
                    return Err(DexError::unauthorized(format!(
                        "{} may not withdraw directly",
                        args.from
                    )));
                }
                let balance = settlement::withdraw(ctx, &args)?;
                ctx.events.emit(events::transfer(events::WITHDRAW, &args, balance));
                Ok(Response::None)
            }
            Operation::DelegateWithdraw(args) => {
                require_witness(ctx, &args.relay)?;
                relay::ensure_relay(&*ctx.store, &args.relay)?;
                let balance = settlement::delegate_withdraw(ctx, &args)?;
                ctx.events.emit(events::delegate_withdraw(&args, balance));
                Ok(Response::None)
            }
            Operation::PrepareWithdraw(args) => {
                require_witness(ctx, &args.from)?;
                let applied = settlement::prepare_withdraw(ctx, &args)?;
                ctx.events
                    .emit(events::transfer(events::PREPARE_WITHDRAW, &args, applied));
                Ok(Response::Amount(applied))
            }
            Operation::CommitWithdraw(args) => {
                require_witness(ctx, &args.from)?;
                let outcome = settlement::commit_withdraw(ctx, &args)?;
                let paid = AssetArgs {
                    asset: args.asset,
                    from: args.from,
                    to: args.from,
                    amount: outcome.withdrawn,
                };
                ctx.events.emit(events::transfer(
                    events::COMMIT_WITHDRAW,
                    &paid,
                    outcome.remaining,
                ));
                Ok(Response::Amount(outcome.remaining))
            }
            Operation::GetPrepareWithdrawState { from, asset } => Ok(
                Response::PrepareWithdrawState(settlement::prepare_withdraw_state(
                    &*ctx.store,
                    &from,
                    &asset,
                )?),
            ),
            Operation::BalanceOf { account, asset } => Ok(Response::Amount(
                settlement::balance_of(&*ctx.store, &account, &asset)?,
            )),
            Operation::Trade(args) => {
                require_witness(ctx, &args.relay.from)?;
                relay::ensure_relay(&*ctx.store, &args.relay.from)?;
                trade(ctx, &args)?;
                Ok(Response::None)
            }
            Operation::CancelOrder(raw) => {
                require_witness(ctx, &raw.user)?;
                let id = orders::cancel_order(&mut *ctx.store, &raw)?;
                tracing::info!(user = %raw.user, order = %id.short(), "Order canceled");
                ctx.events.emit(events::cancel(&raw.user, &id));
                Ok(Response::Flag(true))
            }
            Operation::DelegateCancelOrder(args) => {
                require_witness(ctx, &args.from)?;
                relay::ensure_relay(&*ctx.store, &args.from)?;
                orders::advance_cancel_sequence(&mut *ctx.store, &args.user, args.number)?;
                tracing::info!(
                    relay = %args.from,
                    user = %args.user,
                    number = args.number,
                    "Orders canceled by sequence"
                );
                ctx.events
                    .emit(events::delegate_cancel(&args.from, &args.user, args.number));
                Ok(Response::Flag(true))
            }
            Operation::GetOrderState(id) => Ok(Response::OrderState(orders::order_state(
                &*ctx.store,
                &id,
            )?)),
            Operation::SetRelay(args) => {
                require_witness(ctx, &args.from)?;
                let operator = ctx.modules.operator()?;
                if args.from != operator {
                    return Err(DexError::unauthorized(format!(
                        "{} is not the operator",
                        args.from
                    )));
                }
                relay::set_relay(&mut *ctx.store, &args.target, args.value)?;
                tracing::info!(relay = %args.target, value = args.value, "Relay updated");
                ctx.events.emit(events::set_relay(&args.target, args.value));
                Ok(Response::None)
            }
            Operation::Relays => Ok(Response::Relays(relay::relays(&*ctx.store)?)),
            Operation::EpochEnd { round } => {
                require_witness(ctx, &ctx.config.accounts.governance)?;
                settlement::epoch_end(&mut *ctx.store, round)?;
                Ok(Response::None)
            }
            Operation::ClaimSpProfit { asset } => {
                require_witness(ctx, &ctx.config.accounts.governance)?;
                Ok(Response::Amount(settlement::claim_sp_profit(ctx, &asset)?))
            }
        }
    }
}

/// Verify, match, price and settle one relay-submitted pair.
fn trade(ctx: &mut DexContext<'_>, args: &TradeArgs) -> Result<()> {
    let verified = verify_trade(&ctx.exec, &*ctx.store, &*ctx.modules, args)?;
    let (mut maker, mut taker) = (verified.maker, verified.taker);

    let mut clear = match_order(&mut maker, &mut taker, &verified.relay)?;
    let prime = PrimeStatus {
        maker: ctx.modules.is_prime(&maker.user)?,
        taker: ctx.modules.is_prime(&taker.user)?,
    };
    count_fee(&ctx.config.params, &maker, &taker, prime, &mut clear)?;

    settlement::settle_trade(&mut *ctx.store, &ctx.config.accounts, &maker, &taker, &clear)?;
    ctx.events.emit(events::trade(&clear, &maker, &taker));
    Ok(())
}

fn require_witness(ctx: &DexContext<'_>, account: &Address) -> Result<()> {
    if ctx.auth.check_witness(account) {
        Ok(())
    } else {
        Err(DexError::unauthorized(format!("missing witness of {account}")))
    }
}
