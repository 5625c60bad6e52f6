use soroban_sdk::{contracttype, Address, Env, Vec, U256};

use crate::errors::Error;
use crate::sequence::CounterName;
use crate::types::{
    BalanceAccount, Currency, DrawJob, EngineConfig, Raffle, RafflePrize, RaffleTicket,
    RaffleWinner, RefundRecord, TicketSale,
};

#[derive(Clone)]
#[contracttype]
pub enum DataKey {
    Admin,
    Config,
    DrawQueue,
    CurrencyDecimals(Currency),
    Counter(CounterName),
    Raffle(u64),
    Prize(u64),
    /// (raffle, ticket number)
    Ticket(u64, u32),
    /// (raffle, sale index)
    Sale(u64, u32),
    Winner(u64),
    Refund(u64, Address),
    Balance(BalanceAccount),
    /// Draw idempotency key: (raffle, creator).
    DrawKey(u64, Address),
    /// Oracle request id -> raffle id.
    OracleRequest(u64),
}

pub fn read_admin(env: &Env) -> Result<Address, Error> {
    env.storage()
        .instance()
        .get(&DataKey::Admin)
        .ok_or(Error::NotInitialized)
}

pub fn require_admin(env: &Env) -> Result<Address, Error> {
    let admin = read_admin(env)?;
    admin.require_auth();
    Ok(admin)
}

pub fn read_config(env: &Env) -> Result<EngineConfig, Error> {
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(Error::NotInitialized)
}

pub fn write_config(env: &Env, config: &EngineConfig) {
    env.storage().instance().set(&DataKey::Config, config);
}

pub fn read_decimals(env: &Env, currency: &Currency) -> u32 {
    env.storage()
        .persistent()
        .get(&DataKey::CurrencyDecimals(currency.clone()))
        .unwrap_or(0)
}

pub fn write_decimals(env: &Env, currency: &Currency, decimals: u32) {
    env.storage()
        .persistent()
        .set(&DataKey::CurrencyDecimals(currency.clone()), &decimals);
}

/// `10^decimals` for the settlement currency.
pub fn price_multiplier(env: &Env, currency: &Currency) -> U256 {
    U256::from_u32(env, 10).pow(read_decimals(env, currency))
}

pub fn read_raffle(env: &Env, raffle_id: u64) -> Result<Raffle, Error> {
    env.storage()
        .persistent()
        .get(&DataKey::Raffle(raffle_id))
        .ok_or(Error::RaffleNotFound)
}

pub fn write_raffle(env: &Env, raffle: &Raffle) {
    env.storage()
        .persistent()
        .set(&DataKey::Raffle(raffle.id), raffle);
}

pub fn read_prize(env: &Env, raffle_id: u64) -> Result<RafflePrize, Error> {
    env.storage()
        .persistent()
        .get(&DataKey::Prize(raffle_id))
        .ok_or(Error::PrizeNotFound)
}

pub fn write_prize(env: &Env, prize: &RafflePrize) {
    env.storage()
        .persistent()
        .set(&DataKey::Prize(prize.raffle_id), prize);
}

pub fn read_ticket(env: &Env, raffle_id: u64, number: u32) -> Result<RaffleTicket, Error> {
    env.storage()
        .persistent()
        .get(&DataKey::Ticket(raffle_id, number))
        .ok_or(Error::TicketNotFound)
}

pub fn write_ticket(env: &Env, ticket: &RaffleTicket) {
    env.storage()
        .persistent()
        .set(&DataKey::Ticket(ticket.raffle_id, ticket.number), ticket);
}

pub fn read_sale(env: &Env, raffle_id: u64, index: u32) -> Result<TicketSale, Error> {
    env.storage()
        .persistent()
        .get(&DataKey::Sale(raffle_id, index))
        .ok_or(Error::SaleNotFound)
}

pub fn write_sale(env: &Env, sale: &TicketSale) {
    env.storage()
        .persistent()
        .set(&DataKey::Sale(sale.raffle_id, sale.index), sale);
}

pub fn has_winner(env: &Env, raffle_id: u64) -> bool {
    env.storage().persistent().has(&DataKey::Winner(raffle_id))
}

pub fn read_winner(env: &Env, raffle_id: u64) -> Result<RaffleWinner, Error> {
    env.storage()
        .persistent()
        .get(&DataKey::Winner(raffle_id))
        .ok_or(Error::WinnerNotFound)
}

pub fn write_winner(env: &Env, winner: &RaffleWinner) {
    env.storage()
        .persistent()
        .set(&DataKey::Winner(winner.raffle_id), winner);
}

pub fn read_refund(env: &Env, raffle_id: u64, buyer: &Address) -> Option<RefundRecord> {
    env.storage()
        .persistent()
        .get(&DataKey::Refund(raffle_id, buyer.clone()))
}

pub fn write_refund(env: &Env, refund: &RefundRecord) {
    env.storage().persistent().set(
        &DataKey::Refund(refund.raffle_id, refund.buyer.clone()),
        refund,
    );
}

pub fn read_queue(env: &Env) -> Vec<DrawJob> {
    env.storage()
        .instance()
        .get(&DataKey::DrawQueue)
        .unwrap_or_else(|| Vec::new(env))
}

pub fn write_queue(env: &Env, queue: &Vec<DrawJob>) {
    env.storage().instance().set(&DataKey::DrawQueue, queue);
}

pub fn has_draw_key(env: &Env, raffle_id: u64, creator: &Address) -> bool {
    env.storage()
        .persistent()
        .has(&DataKey::DrawKey(raffle_id, creator.clone()))
}

pub fn write_draw_key(env: &Env, raffle_id: u64, creator: &Address, enqueued_at: u64) {
    env.storage()
        .persistent()
        .set(&DataKey::DrawKey(raffle_id, creator.clone()), &enqueued_at);
}

pub fn write_oracle_request(env: &Env, request_id: u64, raffle_id: u64) {
    env.storage()
        .persistent()
        .set(&DataKey::OracleRequest(request_id), &raffle_id);
}

/// Removes and returns the raffle bound to an oracle request, if any.
pub fn take_oracle_request(env: &Env, request_id: u64) -> Option<u64> {
    let key = DataKey::OracleRequest(request_id);
    let raffle_id = env.storage().persistent().get(&key);
    if raffle_id.is_some() {
        env.storage().persistent().remove(&key);
    }
    raffle_id
}
