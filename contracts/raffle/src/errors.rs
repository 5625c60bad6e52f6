use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    // --- caller errors ---
    NotInitialized = 1,
    AlreadyInitialized = 2,
    NotAuthorized = 3,
    InvalidParameters = 4,
    InvalidQuantity = 5,
    RaffleNotFound = 6,
    RaffleNotActive = 7,
    RaffleEnded = 8,
    RaffleStillRunning = 9,
    RaffleCompleted = 10,
    AlreadyCancelled = 11,
    NotCancellable = 12,
    InsufficientBalance = 13,
    InsufficientTickets = 14,
    OpenEntryExhausted = 15,
    NoTicketsSold = 16,
    DuplicateDraw = 17,
    DrawInProgress = 18,
    DrawNotReady = 19,
    PrizeNotClaimable = 20,

    // --- retryable ---
    QueueSaturated = 30,
    OracleWindowOpen = 31,
    OracleNotConfigured = 32,

    // --- internal ---
    SequenceExhausted = 40,
    NoTicketsFound = 41,
    TicketNotFound = 42,
    SaleNotFound = 43,
    PrizeNotFound = 44,
    WinnerNotFound = 45,
    ArithmeticOverflow = 46,
}
