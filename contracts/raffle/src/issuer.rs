//! Ticket issuance.

use soroban_sdk::{log, Address, Env, Vec};

use crate::amount::Amount;
use crate::draw;
use crate::errors::Error;
use crate::events::{publish_event, DrawDeferred, TicketsSold};
use crate::ledger;
use crate::sequence::{self, CounterName, TICKET_DIGITS, TICKET_PREFIX};
use crate::storage::{self, read_raffle, write_raffle, write_sale, write_ticket};
use crate::types::{
    DiscountTier, DrawState, PurchaseReceipt, Raffle, RaffleStatus, RaffleTicket, SaleType,
    TicketSale,
};

const COARSE_TIERS: [(u32, u32); 3] = [(50, 10), (20, 5), (5, 1)];
const FINE_TIERS: [(u32, u32); 3] = [(25, 20), (10, 5), (5, 2)];

/// Free bonus tickets earned by buying `quantity` paid tickets.
///
/// Thresholds are applied from the largest down, each one consuming the
/// quantity it rewarded before the next is considered.
pub fn bonus_tickets(tier: DiscountTier, quantity: u32) -> u32 {
    let tiers = match tier {
        DiscountTier::None => return 0,
        DiscountTier::Coarse => &COARSE_TIERS,
        DiscountTier::Fine => &FINE_TIERS,
    };

    let mut remaining = quantity;
    let mut bonus = 0u32;
    for (threshold, reward) in tiers.iter() {
        let hits = remaining / threshold;
        bonus = bonus.saturating_add(hits.saturating_mul(*reward));
        remaining %= threshold;
    }
    bonus
}

/// `price * quantity * 10^decimals(currency)`.
pub fn purchase_price(env: &Env, raffle: &Raffle, quantity: u32) -> Amount {
    let multiplier = storage::price_multiplier(env, &raffle.currency);
    raffle.ticket_price.times(env, quantity).scaled(&multiplier)
}

pub fn purchase(
    env: &Env,
    buyer: Address,
    raffle_id: u64,
    quantity: u32,
    is_open_entry: bool,
) -> Result<PurchaseReceipt, Error> {
    buyer.require_auth();
    if is_open_entry {
        storage::require_admin(env)?;
    }

    let mut raffle = read_raffle(env, raffle_id)?;
    let now = env.ledger().timestamp();

    if raffle.status != RaffleStatus::Active || raffle.draw_state != DrawState::Pending {
        return Err(Error::RaffleNotActive);
    }
    if raffle.has_ended(now) {
        return Err(Error::RaffleEnded);
    }
    if quantity == 0 {
        return Err(Error::InvalidQuantity);
    }

    let receipt = if is_open_entry {
        issue_open_entry(env, &mut raffle, &buyer, quantity, now)?
    } else {
        issue_paid(env, &mut raffle, &buyer, quantity, now)?
    };

    write_raffle(env, &raffle);

    publish_event(
        env,
        "tickets_sold",
        TicketsSold {
            raffle_id,
            buyer,
            purchased_tickets: receipt.purchased_tickets.clone(),
            free_tickets: receipt.free_tickets.clone(),
            total_paid: receipt.total_paid.clone(),
            tickets_available: raffle.tickets_available,
            tickets_sold: raffle.tickets_sold,
            timestamp: now,
        },
    );

    Ok(receipt)
}

fn issue_paid(
    env: &Env,
    raffle: &mut Raffle,
    buyer: &Address,
    quantity: u32,
    now: u64,
) -> Result<PurchaseReceipt, Error> {
    let fixed_supply = raffle.raffle_type.has_fixed_supply();
    if fixed_supply && quantity > raffle.tickets_available {
        return Err(Error::InsufficientTickets);
    }

    let total_price = purchase_price(env, raffle, quantity);
    let account = ledger::route(buyer, &raffle.currency, raffle.community);
    ledger::debit(env, &account, &total_price)?;

    let purchased = issue_batch(
        env,
        raffle,
        buyer,
        SaleType::Purchase,
        quantity,
        &total_price,
        now,
    )?;

    if fixed_supply {
        raffle.tickets_available -= quantity;
    }
    raffle.tickets_sold = raffle
        .tickets_sold
        .checked_add(quantity)
        .ok_or(Error::ArithmeticOverflow)?;
    raffle.proceeds = raffle.proceeds.add(&total_price);

    let bonus = bonus_tickets(raffle.discount, quantity);
    let free = if bonus > 0 {
        issue_batch(
            env,
            raffle,
            buyer,
            SaleType::Free,
            bonus,
            &Amount::zero(env),
            now,
        )?
    } else {
        Vec::new(env)
    };

    log!(env, "tickets purchased", raffle.id, quantity, bonus);

    let mut draw_requested = false;
    if raffle.is_sold_out() {
        draw_requested = hand_off_draw(env, raffle, buyer)?;
    }

    Ok(PurchaseReceipt {
        raffle_id: raffle.id,
        purchased_tickets: purchased,
        free_tickets: free,
        purchased_count: quantity,
        free_count: bonus,
        total_paid: total_price,
        draw_requested,
    })
}

fn issue_open_entry(
    env: &Env,
    raffle: &mut Raffle,
    buyer: &Address,
    quantity: u32,
    now: u64,
) -> Result<PurchaseReceipt, Error> {
    let issued = raffle
        .open_entries_issued
        .checked_add(quantity)
        .ok_or(Error::ArithmeticOverflow)?;
    if issued > raffle.open_entry_allotment {
        return Err(Error::OpenEntryExhausted);
    }

    let tickets = issue_batch(
        env,
        raffle,
        buyer,
        SaleType::OpenEntry,
        quantity,
        &Amount::zero(env),
        now,
    )?;
    raffle.open_entries_issued = issued;

    log!(env, "open entries issued", raffle.id, quantity);

    Ok(PurchaseReceipt {
        raffle_id: raffle.id,
        purchased_tickets: tickets,
        free_tickets: Vec::new(env),
        purchased_count: quantity,
        free_count: 0,
        total_paid: Amount::zero(env),
        draw_requested: false,
    })
}

/// Persists `count` sequential tickets and the sale grouping them.
fn issue_batch(
    env: &Env,
    raffle: &mut Raffle,
    buyer: &Address,
    sale_type: SaleType,
    count: u32,
    total_price: &Amount,
    now: u64,
) -> Result<Vec<u32>, Error> {
    let sale_index = sequence::next_local(env, CounterName::Sale(raffle.id))?;
    let mut numbers = Vec::new(env);

    for _ in 0..count {
        let number = sequence::next_local(env, CounterName::TicketNumber(raffle.id))?;
        let ticket_id = sequence::next(env, CounterName::Ticket, TICKET_PREFIX, TICKET_DIGITS)?;
        write_ticket(
            env,
            &RaffleTicket {
                raffle_id: raffle.id,
                ticket_id: ticket_id.formatted,
                number,
                owner: buyer.clone(),
                sale_index,
                is_free: sale_type == SaleType::Free,
                is_open_entry: sale_type == SaleType::OpenEntry,
                issued_at: now,
            },
        );
        numbers.push_back(number);
    }

    let first_ticket = numbers.first().ok_or(Error::InvalidQuantity)?;
    write_sale(
        env,
        &TicketSale {
            raffle_id: raffle.id,
            index: sale_index,
            buyer: buyer.clone(),
            sale_type,
            first_ticket,
            ticket_count: count,
            total_price: total_price.clone(),
            created_at: now,
        },
    );

    raffle.total_entries = raffle
        .total_entries
        .checked_add(count)
        .ok_or(Error::ArithmeticOverflow)?;
    Ok(numbers)
}

/// Queues the draw for a sold-out raffle. A saturated queue leaves the
/// raffle pending so the purchase itself still commits.
fn hand_off_draw(env: &Env, raffle: &mut Raffle, buyer: &Address) -> Result<bool, Error> {
    match draw::enqueue(env, raffle, buyer) {
        Ok(_) => Ok(true),
        Err(Error::QueueSaturated) => {
            publish_event(
                env,
                "draw_deferred",
                DrawDeferred {
                    raffle_id: raffle.id,
                    backlog: storage::read_queue(env).len(),
                    timestamp: env.ledger().timestamp(),
                },
            );
            Ok(false)
        }
        Err(err) => Err(err),
    }
}
