use soroban_sdk::{log, Address, Env};

use crate::amount::Amount;
use crate::errors::Error;
use crate::events::{publish_event, RaffleCreated};
use crate::ledger;
use crate::sequence::{self, CounterName, RAFFLE_DIGITS, RAFFLE_PREFIX};
use crate::storage::{write_prize, write_raffle};
use crate::types::{
    BalanceAccount, DrawState, PendingOracle, PrizeAsset, PrizeStatus, Raffle, RaffleParams,
    RafflePrize, RaffleStatus,
};

pub fn validate_params(params: &RaffleParams) -> Result<(), Error> {
    if params.ticket_price.is_zero() || params.duration == 0 {
        return Err(Error::InvalidParameters);
    }
    if params.raffle_type.has_fixed_supply() && params.tickets_available == 0 {
        return Err(Error::InvalidParameters);
    }
    match &params.prize {
        PrizeAsset::Token(_, amount) | PrizeAsset::Points(amount) if amount.is_zero() => {
            Err(Error::InvalidParameters)
        }
        _ => Ok(()),
    }
}

/// Creates a raffle and takes custody of its prize in the same invocation.
pub fn create_raffle(env: &Env, creator: Address, params: RaffleParams) -> Result<Raffle, Error> {
    creator.require_auth();
    validate_params(&params)?;

    let now = env.ledger().timestamp();
    let end_time = now
        .checked_add(params.duration)
        .ok_or(Error::InvalidParameters)?;

    let event_id = sequence::next(env, CounterName::RaffleEvent, RAFFLE_PREFIX, RAFFLE_DIGITS)?;

    match &params.prize {
        PrizeAsset::Token(token, amount) => {
            let account = BalanceAccount::Wallet(creator.clone(), token.clone());
            ledger::debit(env, &account, amount)?;
        }
        PrizeAsset::Points(amount) => {
            ledger::debit(env, &BalanceAccount::Points(creator.clone()), amount)?;
        }
        PrizeAsset::Nft(..) => {}
    }

    let supply = if params.raffle_type.has_fixed_supply() {
        params.tickets_available
    } else {
        0
    };

    let raffle = Raffle {
        id: event_id.value,
        event_code: event_id.formatted.clone(),
        creator: creator.clone(),
        lottery_type: params.prize.lottery_type(),
        raffle_type: params.raffle_type,
        currency: params.currency.clone(),
        community: params.community,
        ticket_price: params.ticket_price.clone(),
        initial_supply: supply,
        tickets_available: supply,
        tickets_sold: 0,
        total_entries: 0,
        open_entry_allotment: params.open_entry_allotment,
        open_entries_issued: 0,
        discount: params.discount,
        proceeds: Amount::zero(env),
        created_at: now,
        duration: params.duration,
        end_time,
        status: RaffleStatus::Active,
        draw_state: DrawState::Pending,
        oracle_request: PendingOracle::Idle,
        winner: None,
        winning_ticket: None,
    };

    write_prize(
        env,
        &RafflePrize {
            raffle_id: raffle.id,
            asset: params.prize,
            status: PrizeStatus::Held,
        },
    );
    write_raffle(env, &raffle);

    log!(env, "raffle created", raffle.id, supply);
    publish_event(
        env,
        "raffle_created",
        RaffleCreated {
            raffle_id: raffle.id,
            event_code: event_id.formatted,
            creator,
            lottery_type: raffle.lottery_type,
            raffle_type: raffle.raffle_type,
            currency: raffle.currency.clone(),
            ticket_price: raffle.ticket_price.clone(),
            tickets_available: supply,
            end_time,
        },
    );

    Ok(raffle)
}
