//! Cancellation and refunds.
//!
//! Tickets and sales are never deleted. A cancelled raffle keeps its counts
//! and every paying buyer gets a [`RefundRecord`] describing the
//! compensating credit.

use soroban_sdk::{log, Address, Env, Map};

use crate::errors::Error;
use crate::events::{self, publish_event, RaffleCancelled, RefundIssued};
use crate::ledger;
use crate::sequence::{self, CounterName};
use crate::storage::{
    self, read_prize, read_raffle, read_sale, write_prize, write_raffle, write_refund,
};
use crate::types::{
    BalanceAccount, DrawState, PrizeAsset, PrizeStatus, Raffle, RaffleStatus, RaffleType,
    RefundRecord, SaleType,
};

pub fn cancel_raffle(env: &Env, actor: Address, raffle_id: u64) -> Result<Raffle, Error> {
    actor.require_auth();
    let admin = storage::read_admin(env)?;
    let mut raffle = read_raffle(env, raffle_id)?;
    let now = env.ledger().timestamp();

    match raffle.status {
        RaffleStatus::Cancelled => return Err(Error::AlreadyCancelled),
        RaffleStatus::Completed => return Err(Error::RaffleCompleted),
        _ => {}
    }
    if raffle.raffle_type == RaffleType::Unconditional {
        return Err(Error::NotCancellable);
    }
    if raffle.draw_state != DrawState::Pending {
        return Err(Error::DrawInProgress);
    }
    if actor != admin {
        if actor != raffle.creator {
            return Err(Error::NotAuthorized);
        }
        if !raffle.has_ended(now) {
            return Err(Error::RaffleStillRunning);
        }
    }

    let refunds = collect_refunds(env, &raffle)?;
    for (buyer, refund) in refunds.iter() {
        let account = ledger::route(&buyer, &raffle.currency, raffle.community);
        ledger::credit(env, &account, &refund.amount);
        write_refund(env, &refund);
        publish_event(
            env,
            "refund_issued",
            RefundIssued {
                raffle_id,
                buyer,
                tickets: refund.tickets,
                amount: refund.amount,
            },
        );
    }

    return_prize(env, &raffle)?;

    let old_status = raffle.status;
    raffle.status = RaffleStatus::Cancelled;
    write_raffle(env, &raffle);

    log!(env, "raffle cancelled", raffle_id, refunds.len());
    publish_event(
        env,
        "raffle_cancelled",
        RaffleCancelled {
            raffle_id,
            cancelled_by: actor,
            tickets_sold: raffle.tickets_sold,
            refunded_buyers: refunds.len(),
            timestamp: now,
        },
    );
    events::status_changed(env, raffle_id, old_status, raffle.status, raffle.draw_state);

    Ok(raffle)
}

/// Sums paid sales per buyer. Free and open-entry sales carry no refund.
fn collect_refunds(env: &Env, raffle: &Raffle) -> Result<Map<Address, RefundRecord>, Error> {
    let mut refunds: Map<Address, RefundRecord> = Map::new(env);
    let sales = sequence::current(env, &CounterName::Sale(raffle.id));

    for index in 1..=sales {
        let index = u32::try_from(index).map_err(|_| Error::ArithmeticOverflow)?;
        let sale = read_sale(env, raffle.id, index)?;
        if sale.sale_type != SaleType::Purchase {
            continue;
        }

        let record = match refunds.get(sale.buyer.clone()) {
            Some(mut record) => {
                record.tickets = record
                    .tickets
                    .checked_add(sale.ticket_count)
                    .ok_or(Error::ArithmeticOverflow)?;
                record.amount = record.amount.add(&sale.total_price);
                record
            }
            None => RefundRecord {
                raffle_id: raffle.id,
                buyer: sale.buyer.clone(),
                tickets: sale.ticket_count,
                amount: sale.total_price.clone(),
            },
        };
        refunds.set(sale.buyer, record);
    }

    Ok(refunds)
}

/// Token and points prizes go straight back to the seller; an NFT is
/// flagged for the manual return process.
fn return_prize(env: &Env, raffle: &Raffle) -> Result<(), Error> {
    let mut prize = read_prize(env, raffle.id)?;
    if prize.status != PrizeStatus::Held {
        return Ok(());
    }

    prize.status = match &prize.asset {
        PrizeAsset::Token(token, amount) => {
            let account = BalanceAccount::Wallet(raffle.creator.clone(), token.clone());
            ledger::credit(env, &account, amount);
            PrizeStatus::Returned
        }
        PrizeAsset::Points(amount) => {
            ledger::credit(env, &BalanceAccount::Points(raffle.creator.clone()), amount);
            PrizeStatus::Returned
        }
        PrizeAsset::Nft(..) => PrizeStatus::ReturnPending,
    };
    write_prize(env, &prize);
    Ok(())
}
