use soroban_sdk::{contracttype, Address, BytesN, String, Vec};

use crate::amount::Amount;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[contracttype]
pub enum LotteryType {
    Nft = 0,
    Token = 1,
    InternalPoints = 2,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[contracttype]
pub enum RaffleType {
    /// Fixed supply; may be cancelled before the draw.
    Reserve = 0,
    /// Fixed supply; draws regardless of sales and can never be cancelled.
    Unconditional = 1,
    /// No supply cap; availability is never decremented.
    Unlimited = 2,
}

impl RaffleType {
    pub fn has_fixed_supply(&self) -> bool {
        !matches!(self, RaffleType::Unlimited)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[contracttype]
pub enum RaffleStatus {
    Active = 0,
    Drawing = 1,
    Completed = 2,
    Cancelled = 3,
}

/// Draw sub-state; doubles as the mutual-exclusion flag between the draw
/// and cancellation paths.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[contracttype]
pub enum DrawState {
    Pending = 0,
    InProgress = 1,
    Completed = 2,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[contracttype]
pub enum DiscountTier {
    None = 0,
    /// 1 free per 5, 5 free per 20, 10 free per 50.
    Coarse = 1,
    /// 2 free per 5, 5 free per 10, 20 free per 25.
    Fine = 2,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[contracttype]
pub enum SaleType {
    Purchase = 0,
    Free = 1,
    OpenEntry = 2,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[contracttype]
pub enum PrizeStatus {
    Held = 0,
    Awarded = 1,
    PendingClaim = 2,
    Returned = 3,
    ReturnPending = 4,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[contracttype]
pub enum ClaimStatus {
    Unclaimed = 0,
    Claimed = 1,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[contracttype]
pub enum RandomnessSource {
    Oracle = 0,
    Fallback = 1,
}

/// Settlement currency for ticket sales.
#[derive(Clone, PartialEq, Eq, Debug)]
#[contracttype]
pub enum Currency {
    /// Stellar asset contract held in engine custody.
    Token(Address),
    /// Internal points ("nafflings").
    Points,
}

/// Ledger record a balance lives on.
#[derive(Clone, PartialEq, Eq, Debug)]
#[contracttype]
pub enum BalanceAccount {
    /// (owner, token)
    Wallet(Address, Address),
    Points(Address),
    /// (community, owner)
    Community(u64, Address),
}

#[derive(Clone, PartialEq, Eq, Debug)]
#[contracttype]
pub enum PrizeAsset {
    /// (collection, token id). Custody and transfer happen off-engine.
    Nft(Address, u64),
    Token(Address, Amount),
    Points(Amount),
}

impl PrizeAsset {
    pub fn lottery_type(&self) -> LotteryType {
        match self {
            PrizeAsset::Nft(..) => LotteryType::Nft,
            PrizeAsset::Token(..) => LotteryType::Token,
            PrizeAsset::Points(..) => LotteryType::InternalPoints,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[contracttype]
pub struct EngineConfig {
    pub treasury: Address,
    /// Platform fee on sale proceeds, in basis points.
    pub fee_bp: u32,
    pub oracle: Option<Address>,
    /// ed25519 key the oracle signs delivered randomness with.
    pub oracle_key: Option<BytesN<32>>,
    pub oracle_timeout_secs: u64,
    /// Maximum number of queued draw jobs.
    pub queue_capacity: u32,
}

#[derive(Clone, Debug, PartialEq)]
#[contracttype]
pub struct RaffleParams {
    pub raffle_type: RaffleType,
    pub prize: PrizeAsset,
    pub currency: Currency,
    pub community: Option<u64>,
    /// Price per ticket in whole currency units.
    pub ticket_price: Amount,
    pub tickets_available: u32,
    pub open_entry_allotment: u32,
    pub discount: DiscountTier,
    /// Seconds from creation until the raffle closes.
    pub duration: u64,
}

#[derive(Clone, Debug, PartialEq)]
#[contracttype]
pub struct OracleRequest {
    pub request_id: u64,
    pub requested_at: u64,
}

/// Oracle leg of an in-progress draw.
#[derive(Clone, Debug, PartialEq)]
#[contracttype]
pub enum PendingOracle {
    Idle,
    Requested(OracleRequest),
}

impl PendingOracle {
    pub fn request(&self) -> Option<&OracleRequest> {
        match self {
            PendingOracle::Idle => None,
            PendingOracle::Requested(request) => Some(request),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[contracttype]
pub struct Raffle {
    pub id: u64,
    pub event_code: String,
    pub creator: Address,
    pub lottery_type: LotteryType,
    pub raffle_type: RaffleType,
    pub currency: Currency,
    pub community: Option<u64>,
    pub ticket_price: Amount,
    pub initial_supply: u32,
    pub tickets_available: u32,
    /// Paid tickets only.
    pub tickets_sold: u32,
    /// Every ticket number handed out: paid, bonus and open-entry.
    pub total_entries: u32,
    pub open_entry_allotment: u32,
    pub open_entries_issued: u32,
    pub discount: DiscountTier,
    pub proceeds: Amount,
    pub created_at: u64,
    pub duration: u64,
    pub end_time: u64,
    pub status: RaffleStatus,
    pub draw_state: DrawState,
    pub oracle_request: PendingOracle,
    pub winner: Option<Address>,
    pub winning_ticket: Option<u32>,
}

impl Raffle {
    pub fn has_ended(&self, now: u64) -> bool {
        now >= self.end_time
    }

    pub fn is_sold_out(&self) -> bool {
        self.raffle_type.has_fixed_supply() && self.tickets_available == 0
    }
}

#[derive(Clone, Debug, PartialEq)]
#[contracttype]
pub struct RafflePrize {
    pub raffle_id: u64,
    pub asset: PrizeAsset,
    pub status: PrizeStatus,
}

#[derive(Clone, Debug, PartialEq)]
#[contracttype]
pub struct RaffleTicket {
    pub raffle_id: u64,
    /// Globally unique, formatted identifier.
    pub ticket_id: String,
    /// Raffle-scoped sequential number, starting at 1.
    pub number: u32,
    pub owner: Address,
    pub sale_index: u32,
    pub is_free: bool,
    pub is_open_entry: bool,
    pub issued_at: u64,
}

#[derive(Clone, Debug, PartialEq)]
#[contracttype]
pub struct TicketSale {
    pub raffle_id: u64,
    pub index: u32,
    pub buyer: Address,
    pub sale_type: SaleType,
    pub first_ticket: u32,
    pub ticket_count: u32,
    pub total_price: Amount,
    pub created_at: u64,
}

#[derive(Clone, Debug, PartialEq)]
#[contracttype]
pub struct RaffleWinner {
    pub raffle_id: u64,
    pub ticket_number: u32,
    pub owner: Address,
    pub source: RandomnessSource,
    pub claim_status: ClaimStatus,
    pub drawn_at: u64,
}

#[derive(Clone, Debug, PartialEq)]
#[contracttype]
pub struct RefundRecord {
    pub raffle_id: u64,
    pub buyer: Address,
    pub tickets: u32,
    pub amount: Amount,
}

#[derive(Clone, Debug, PartialEq)]
#[contracttype]
pub struct DrawJob {
    pub raffle_id: u64,
    pub ticket_count: u32,
    pub requested_by: Address,
    pub enqueued_at: u64,
}

#[derive(Clone, Debug, PartialEq)]
#[contracttype]
pub struct PurchaseReceipt {
    pub raffle_id: u64,
    pub purchased_tickets: Vec<u32>,
    pub free_tickets: Vec<u32>,
    pub purchased_count: u32,
    pub free_count: u32,
    pub total_paid: Amount,
    /// Whether this purchase exhausted supply and queued the draw.
    pub draw_requested: bool,
}
