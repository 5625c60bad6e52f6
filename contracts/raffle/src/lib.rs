#![no_std]
use soroban_sdk::{contract, contractimpl, Address, BytesN, Env, Vec, U256};

pub mod amount;
pub mod distributor;
pub mod draw;
pub mod errors;
pub mod events;
pub mod issuer;
pub mod ledger;
pub mod raffles;
pub mod refund;
pub mod resolver;
pub mod sequence;
pub mod storage;
pub mod types;

pub use amount::Amount;
pub use draw::{RandomnessOracle, RandomnessOracleClient};
pub use errors::Error;
pub use types::*;

use events::{publish_event, ConfigUpdated, PrizeSettled};
use storage::DataKey;

const MAX_DECIMALS: u32 = 38;

#[contract]
pub struct RaffleEngine;

fn validate_config(config: &EngineConfig) -> Result<(), Error> {
    if config.fee_bp > amount::BASIS_POINTS || config.queue_capacity == 0 {
        return Err(Error::InvalidParameters);
    }
    if config.oracle.is_some() && config.oracle_timeout_secs == 0 {
        return Err(Error::InvalidParameters);
    }
    Ok(())
}

#[contractimpl]
impl RaffleEngine {
    // --- administration ---

    pub fn init(env: Env, admin: Address, config: EngineConfig) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Admin) {
            return Err(Error::AlreadyInitialized);
        }
        validate_config(&config)?;
        env.storage().instance().set(&DataKey::Admin, &admin);
        storage::write_config(&env, &config);
        Ok(())
    }

    pub fn set_config(env: Env, config: EngineConfig) -> Result<(), Error> {
        let admin = storage::require_admin(&env)?;
        validate_config(&config)?;
        let old = storage::read_config(&env)?;
        storage::write_config(&env, &config);

        publish_event(
            &env,
            "config_updated",
            ConfigUpdated {
                old_fee_bp: old.fee_bp,
                new_fee_bp: config.fee_bp,
                queue_capacity: config.queue_capacity,
                updated_by: admin,
                timestamp: env.ledger().timestamp(),
            },
        );
        Ok(())
    }

    pub fn set_currency_decimals(env: Env, currency: Currency, decimals: u32) -> Result<(), Error> {
        storage::require_admin(&env)?;
        if decimals > MAX_DECIMALS {
            return Err(Error::InvalidParameters);
        }
        storage::write_decimals(&env, &currency, decimals);
        Ok(())
    }

    pub fn get_config(env: Env) -> Result<EngineConfig, Error> {
        storage::read_config(&env)
    }

    // --- balances ---

    pub fn deposit(
        env: Env,
        owner: Address,
        token: Address,
        amount: i128,
    ) -> Result<Amount, Error> {
        ledger::deposit(&env, &owner, &token, amount)
    }

    pub fn withdraw(
        env: Env,
        owner: Address,
        token: Address,
        amount: i128,
    ) -> Result<Amount, Error> {
        ledger::withdraw(&env, &owner, &token, amount)
    }

    /// Credits internal points, or community points when `community` is set.
    pub fn grant_points(
        env: Env,
        owner: Address,
        community: Option<u64>,
        amount: Amount,
    ) -> Result<Amount, Error> {
        storage::require_admin(&env)?;
        let account = ledger::route(&owner, &Currency::Points, community);
        Ok(ledger::credit(&env, &account, &amount))
    }

    pub fn balance(env: Env, owner: Address, currency: Currency, community: Option<u64>) -> Amount {
        ledger::balance(&env, &ledger::route(&owner, &currency, community))
    }

    // --- raffle lifecycle ---

    pub fn create_raffle(
        env: Env,
        creator: Address,
        params: RaffleParams,
    ) -> Result<Raffle, Error> {
        raffles::create_raffle(&env, creator, params)
    }

    pub fn purchase_tickets(
        env: Env,
        buyer: Address,
        raffle_id: u64,
        quantity: u32,
        is_open_entry: bool,
    ) -> Result<PurchaseReceipt, Error> {
        issuer::purchase(&env, buyer, raffle_id, quantity, is_open_entry)
    }

    pub fn request_draw(env: Env, actor: Address, raffle_id: u64) -> Result<DrawJob, Error> {
        draw::request_draw(&env, actor, raffle_id)
    }

    /// Worker entry point; permissionless.
    pub fn process_draws(env: Env, max_jobs: u32) -> Result<u32, Error> {
        draw::process_draws(&env, max_jobs)
    }

    /// Oracle callback. Safe to deliver more than once.
    pub fn fulfill_randomness(
        env: Env,
        request_id: u64,
        random_value: U256,
        signature: BytesN<64>,
    ) -> Result<bool, Error> {
        draw::fulfill_randomness(&env, request_id, random_value, signature)
    }

    pub fn expire_oracle_request(env: Env, raffle_id: u64) -> Result<RaffleWinner, Error> {
        draw::expire_oracle_request(&env, raffle_id)
    }

    pub fn cancel_raffle(env: Env, actor: Address, raffle_id: u64) -> Result<Raffle, Error> {
        refund::cancel_raffle(&env, actor, raffle_id)
    }

    /// Confirms the manual transfer of an NFT prize to its winner.
    pub fn settle_nft_prize(env: Env, raffle_id: u64) -> Result<RaffleWinner, Error> {
        storage::require_admin(&env)?;
        let mut prize = storage::read_prize(&env, raffle_id)?;
        let mut winner = storage::read_winner(&env, raffle_id)?;
        if prize.status != PrizeStatus::PendingClaim
            || winner.claim_status != ClaimStatus::Unclaimed
        {
            return Err(Error::PrizeNotClaimable);
        }

        prize.status = PrizeStatus::Awarded;
        winner.claim_status = ClaimStatus::Claimed;
        storage::write_prize(&env, &prize);
        storage::write_winner(&env, &winner);

        publish_event(
            &env,
            "prize_settled",
            PrizeSettled {
                raffle_id,
                recipient: winner.owner.clone(),
                status: prize.status,
                timestamp: env.ledger().timestamp(),
            },
        );
        Ok(winner)
    }

    /// Confirms the manual return of a cancelled raffle's NFT to its creator.
    pub fn settle_nft_return(env: Env, raffle_id: u64) -> Result<RafflePrize, Error> {
        storage::require_admin(&env)?;
        let raffle = storage::read_raffle(&env, raffle_id)?;
        let mut prize = storage::read_prize(&env, raffle_id)?;
        if prize.status != PrizeStatus::ReturnPending {
            return Err(Error::PrizeNotClaimable);
        }

        prize.status = PrizeStatus::Returned;
        storage::write_prize(&env, &prize);

        publish_event(
            &env,
            "prize_settled",
            PrizeSettled {
                raffle_id,
                recipient: raffle.creator,
                status: prize.status,
                timestamp: env.ledger().timestamp(),
            },
        );
        Ok(prize)
    }

    // --- queries ---

    pub fn get_raffle(env: Env, raffle_id: u64) -> Result<Raffle, Error> {
        storage::read_raffle(&env, raffle_id)
    }

    pub fn get_prize(env: Env, raffle_id: u64) -> Result<RafflePrize, Error> {
        storage::read_prize(&env, raffle_id)
    }

    pub fn get_ticket(env: Env, raffle_id: u64, number: u32) -> Result<RaffleTicket, Error> {
        storage::read_ticket(&env, raffle_id, number)
    }

    pub fn get_sale(env: Env, raffle_id: u64, index: u32) -> Result<TicketSale, Error> {
        storage::read_sale(&env, raffle_id, index)
    }

    pub fn get_winner(env: Env, raffle_id: u64) -> Result<RaffleWinner, Error> {
        storage::read_winner(&env, raffle_id)
    }

    pub fn get_refund(env: Env, raffle_id: u64, buyer: Address) -> Option<RefundRecord> {
        storage::read_refund(&env, raffle_id, &buyer)
    }

    pub fn pending_draws(env: Env) -> Vec<DrawJob> {
        storage::read_queue(&env)
    }
}
