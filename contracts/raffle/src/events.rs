use soroban_sdk::{contracttype, symbol_short, Address, Env, IntoVal, String, Symbol, Val, Vec};

use crate::amount::Amount;
use crate::types::{
    Currency, DrawState, LotteryType, PrizeStatus, RaffleStatus, RaffleType, RandomnessSource,
};

/// Publishes an event under the `("raffle", <name>)` topic pair.
///
/// Events emitted inside a failed invocation are discarded with the rest of
/// its writes, so consumers only ever observe committed transitions.
#[allow(deprecated)]
pub fn publish_event<T>(env: &Env, event_name: &str, event: T)
where
    T: IntoVal<Env, Val>,
{
    env.events().publish(
        (symbol_short!("raffle"), Symbol::new(env, event_name)),
        event,
    );
}

// ============================================================================
// LIFECYCLE EVENTS
// ============================================================================

#[derive(Clone)]
#[contracttype]
pub struct RaffleCreated {
    pub raffle_id: u64,
    pub event_code: String,
    pub creator: Address,
    pub lottery_type: LotteryType,
    pub raffle_type: RaffleType,
    pub currency: Currency,
    pub ticket_price: Amount,
    pub tickets_available: u32,
    pub end_time: u64,
}

/// Emitted after every purchase; consumed by the real-time layer.
#[derive(Clone)]
#[contracttype]
pub struct TicketsSold {
    pub raffle_id: u64,
    pub buyer: Address,
    pub purchased_tickets: Vec<u32>,
    pub free_tickets: Vec<u32>,
    pub total_paid: Amount,
    pub tickets_available: u32,
    pub tickets_sold: u32,
    pub timestamp: u64,
}

#[derive(Clone)]
#[contracttype]
pub struct DrawRequested {
    pub raffle_id: u64,
    pub requested_by: Address,
    pub ticket_count: u32,
    pub timestamp: u64,
}

/// Supply ran out while the draw queue was saturated.
#[derive(Clone)]
#[contracttype]
pub struct DrawDeferred {
    pub raffle_id: u64,
    pub backlog: u32,
    pub timestamp: u64,
}

#[derive(Clone)]
#[contracttype]
pub struct RandomnessRequested {
    pub raffle_id: u64,
    pub oracle: Address,
    pub request_id: u64,
    pub timestamp: u64,
}

#[derive(Clone)]
#[contracttype]
pub struct RandomnessFallback {
    pub raffle_id: u64,
    pub timestamp: u64,
}

#[derive(Clone)]
#[contracttype]
pub struct WinnerDrawn {
    pub raffle_id: u64,
    pub winner: Address,
    pub winning_ticket: u32,
    pub total_entries: u32,
    pub source: RandomnessSource,
    pub timestamp: u64,
}

#[derive(Clone)]
#[contracttype]
pub struct EarningsPaid {
    pub raffle_id: u64,
    pub seller: Address,
    pub gross: Amount,
    pub net: Amount,
    pub platform_fee: Amount,
    pub fee_bp: u32,
}

#[derive(Clone)]
#[contracttype]
pub struct RefundIssued {
    pub raffle_id: u64,
    pub buyer: Address,
    pub tickets: u32,
    pub amount: Amount,
}

#[derive(Clone)]
#[contracttype]
pub struct RaffleCancelled {
    pub raffle_id: u64,
    pub cancelled_by: Address,
    pub tickets_sold: u32,
    pub refunded_buyers: u32,
    pub timestamp: u64,
}

#[derive(Clone)]
#[contracttype]
pub struct PrizeSettled {
    pub raffle_id: u64,
    pub recipient: Address,
    pub status: PrizeStatus,
    pub timestamp: u64,
}

// ============================================================================
// ADMIN EVENTS
// ============================================================================

#[derive(Clone)]
#[contracttype]
pub struct ConfigUpdated {
    pub old_fee_bp: u32,
    pub new_fee_bp: u32,
    pub queue_capacity: u32,
    pub updated_by: Address,
    pub timestamp: u64,
}

// ============================================================================
// INTERNAL STATE CHANGE EVENT
// ============================================================================

#[derive(Clone)]
#[contracttype]
pub struct StatusChanged {
    pub raffle_id: u64,
    pub old_status: RaffleStatus,
    pub new_status: RaffleStatus,
    pub draw_state: DrawState,
    pub timestamp: u64,
}

pub fn status_changed(
    env: &Env,
    raffle_id: u64,
    old: RaffleStatus,
    new: RaffleStatus,
    draw_state: DrawState,
) {
    publish_event(
        env,
        "status_changed",
        StatusChanged {
            raffle_id,
            old_status: old,
            new_status: new,
            draw_state,
            timestamp: env.ledger().timestamp(),
        },
    );
}
