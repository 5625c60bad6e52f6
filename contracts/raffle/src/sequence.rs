//! Monotonic identifier issuance.
//!
//! Every counter is a single persistent entry that is only ever touched by
//! [`next`]. Soroban runs an invocation against an exclusive storage
//! footprint and rolls back all of its writes on failure, so the
//! read-increment-write below is one atomic step with respect to every
//! other invocation touching the same counter.

use soroban_sdk::{contracttype, Env, String};

use crate::errors::Error;
use crate::storage::DataKey;

pub const RAFFLE_PREFIX: &str = "RAF";
pub const RAFFLE_DIGITS: u32 = 9;
pub const TICKET_PREFIX: &str = "TKT";
pub const TICKET_DIGITS: u32 = 12;
/// Ticket numbers and sale indexes are stored as `u32`.
pub const LOCAL_DIGITS: u32 = 9;

const MAX_PREFIX_LEN: usize = 12;
const MAX_DIGITS: u32 = 19;
const BUFFER_LEN: usize = MAX_PREFIX_LEN + MAX_DIGITS as usize;

#[derive(Clone, Debug, PartialEq, Eq)]
#[contracttype]
pub enum CounterName {
    RaffleEvent,
    Ticket,
    TicketNumber(u64),
    Sale(u64),
}

#[derive(Clone, Debug, PartialEq)]
#[contracttype]
pub struct SequenceId {
    pub value: u64,
    pub formatted: String,
}

/// Largest value representable in `max_digits` decimal digits.
pub fn capacity(max_digits: u32) -> u64 {
    match 10u64.checked_pow(max_digits.min(MAX_DIGITS)) {
        Some(limit) => limit - 1,
        None => u64::MAX,
    }
}

/// Last value handed out for `counter`, zero when it has never been used.
pub fn current(env: &Env, counter: &CounterName) -> u64 {
    env.storage()
        .persistent()
        .get(&DataKey::Counter(counter.clone()))
        .unwrap_or(0)
}

pub fn next(
    env: &Env,
    counter: CounterName,
    prefix: &str,
    max_digits: u32,
) -> Result<SequenceId, Error> {
    if prefix.len() > MAX_PREFIX_LEN || max_digits == 0 || max_digits > MAX_DIGITS {
        return Err(Error::InvalidParameters);
    }

    let value = current(env, &counter)
        .checked_add(1)
        .ok_or(Error::SequenceExhausted)?;
    if value > capacity(max_digits) {
        return Err(Error::SequenceExhausted);
    }
    env.storage()
        .persistent()
        .set(&DataKey::Counter(counter), &value);

    let mut buf = [0u8; BUFFER_LEN];
    let len = render(prefix.as_bytes(), value, max_digits, &mut buf);
    let text = core::str::from_utf8(&buf[..len]).map_err(|_| Error::InvalidParameters)?;

    Ok(SequenceId {
        value,
        formatted: String::from_str(env, text),
    })
}

/// Narrowed form of [`next`] for raffle-scoped `u32` counters.
pub fn next_local(env: &Env, counter: CounterName) -> Result<u32, Error> {
    let id = next(env, counter, "", LOCAL_DIGITS)?;
    u32::try_from(id.value).map_err(|_| Error::SequenceExhausted)
}

/// Writes `prefix` followed by `value` zero-padded to `width` digits.
fn render(prefix: &[u8], value: u64, width: u32, out: &mut [u8; BUFFER_LEN]) -> usize {
    let width = width as usize;
    out[..prefix.len()].copy_from_slice(prefix);

    let digits = &mut out[prefix.len()..prefix.len() + width];
    let mut rest = value;
    for slot in digits.iter_mut().rev() {
        *slot = b'0' + (rest % 10) as u8;
        rest /= 10;
    }
    prefix.len() + width
}
