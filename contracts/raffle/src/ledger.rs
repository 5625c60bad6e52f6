//! Balance ledger.
//!
//! All balance mutations go through [`debit`] and [`credit`]. Debits are
//! checked against the stored balance before anything is written, and both
//! run inside the caller's invocation so they commit or roll back together
//! with the rest of the operation.

use soroban_sdk::{log, token, Address, Env};

use crate::amount::Amount;
use crate::errors::Error;
use crate::storage::DataKey;
use crate::types::{BalanceAccount, Currency};

/// Picks the balance record for `owner` from the raffle's settlement
/// context. Community-scoped raffles always settle in community points.
pub fn route(owner: &Address, currency: &Currency, community: Option<u64>) -> BalanceAccount {
    match (community, currency) {
        (Some(community), _) => BalanceAccount::Community(community, owner.clone()),
        (None, Currency::Token(token)) => BalanceAccount::Wallet(owner.clone(), token.clone()),
        (None, Currency::Points) => BalanceAccount::Points(owner.clone()),
    }
}

pub fn balance(env: &Env, account: &BalanceAccount) -> Amount {
    env.storage()
        .persistent()
        .get(&DataKey::Balance(account.clone()))
        .unwrap_or_else(|| Amount::zero(env))
}

fn write_balance(env: &Env, account: &BalanceAccount, amount: &Amount) {
    env.storage()
        .persistent()
        .set(&DataKey::Balance(account.clone()), amount);
}

/// Returns the new balance.
pub fn debit(env: &Env, account: &BalanceAccount, amount: &Amount) -> Result<Amount, Error> {
    let remaining = balance(env, account)
        .checked_sub(amount)
        .ok_or(Error::InsufficientBalance)?;
    write_balance(env, account, &remaining);
    Ok(remaining)
}

/// Returns the new balance.
pub fn credit(env: &Env, account: &BalanceAccount, amount: &Amount) -> Amount {
    let updated = balance(env, account).add(amount);
    write_balance(env, account, &updated);
    updated
}

fn native_amount(env: &Env, amount: i128) -> Result<Amount, Error> {
    if amount <= 0 {
        return Err(Error::InvalidParameters);
    }
    let units = u128::try_from(amount).map_err(|_| Error::InvalidParameters)?;
    Ok(Amount::from_u128(env, units))
}

/// Moves tokens into engine custody and credits the owner's wallet balance.
pub fn deposit(env: &Env, owner: &Address, token: &Address, amount: i128) -> Result<Amount, Error> {
    owner.require_auth();
    let credited = native_amount(env, amount)?;

    let token_client = token::Client::new(env, token);
    token_client.transfer(owner, &env.current_contract_address(), &amount);

    let account = BalanceAccount::Wallet(owner.clone(), token.clone());
    log!(env, "deposit", amount);
    Ok(credit(env, &account, &credited))
}

/// Debits the wallet balance and releases the tokens back to the owner.
pub fn withdraw(
    env: &Env,
    owner: &Address,
    token: &Address,
    amount: i128,
) -> Result<Amount, Error> {
    owner.require_auth();
    let debited = native_amount(env, amount)?;

    let account = BalanceAccount::Wallet(owner.clone(), token.clone());
    let remaining = debit(env, &account, &debited)?;

    let token_client = token::Client::new(env, token);
    token_client.transfer(&env.current_contract_address(), owner, &amount);

    log!(env, "withdraw", amount);
    Ok(remaining)
}
