//! Storage key layout.
//!
//! Every key is a one-byte namespace followed by the raw bytes of its
//! components, so a namespace byte is enough for a prefix scan.

use crate::ids::{Address, OrderId, WithdrawHash};

pub const BALANCE: u8 = 0x01;
pub const ORDER_STATE: u8 = 0x02;
pub const PREPARE_WITHDRAW: u8 = 0x03;
pub const DELEGATE_WITHDRAW_DONE: u8 = 0x04;
pub const DELEGATE_CANCEL: u8 = 0x05;
pub const RELAY: u8 = 0x06;
pub const CURRENT_ROUND: u8 = 0x07;
pub const SP_PROFIT: u8 = 0x08;

fn key(namespace: u8, parts: &[&[u8]]) -> Vec<u8> {
    let len = 1 + parts.iter().map(|p| p.len()).sum::<usize>();
    let mut out = Vec::with_capacity(len);
    out.push(namespace);
    for part in parts {
        out.extend_from_slice(part);
    }
    out
}

#[must_use]
pub fn balance(account: &Address, asset: &Address) -> Vec<u8> {
    key(BALANCE, &[account.as_bytes().as_slice(), asset.as_bytes().as_slice()])
}

#[must_use]
pub fn order_state(id: &OrderId) -> Vec<u8> {
    key(ORDER_STATE, &[id.as_bytes().as_slice()])
}

#[must_use]
pub fn prepare_withdraw(user: &Address, asset: &Address) -> Vec<u8> {
    key(PREPARE_WITHDRAW, &[user.as_bytes().as_slice(), asset.as_bytes().as_slice()])
}

#[must_use]
pub fn delegate_withdraw_done(hash: &WithdrawHash) -> Vec<u8> {
    key(DELEGATE_WITHDRAW_DONE, &[hash.as_bytes().as_slice()])
}

#[must_use]
pub fn delegate_cancel(user: &Address) -> Vec<u8> {
    key(DELEGATE_CANCEL, &[user.as_bytes().as_slice()])
}

#[must_use]
pub fn relay(account: &Address) -> Vec<u8> {
    key(RELAY, &[account.as_bytes().as_slice()])
}

/// Prefix of every relay flag.
#[must_use]
pub fn relay_prefix() -> Vec<u8> {
    vec![RELAY]
}

/// Recover the relay address from a key produced by [`relay`].
#[must_use]
pub fn relay_address(key: &[u8]) -> Option<Address> {
    match key.split_first() {
        Some((&RELAY, rest)) => Address::from_slice(rest).ok(),
        _ => None,
    }
}

#[must_use]
pub fn current_round() -> Vec<u8> {
    vec![CURRENT_ROUND]
}

#[must_use]
pub fn sp_profit(asset: &Address) -> Vec<u8> {
    key(SP_PROFIT, &[asset.as_bytes().as_slice()])
}
