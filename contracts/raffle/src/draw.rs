//! Draw queue, worker and randomness oracle bridge.
//!
//! `request_draw` only validates and enqueues. Jobs are drained by
//! `process_draws` in a separate invocation, which asks the oracle for
//! randomness or, when the oracle is missing or failing, resolves on the
//! spot from the ledger PRNG. Oracle deliveries arrive through
//! `fulfill_randomness` and are applied at most once; anything that does
//! not match an in-flight request is ignored.

use soroban_sdk::{contractclient, log, Address, Bytes, BytesN, Env, U256};

use crate::distributor;
use crate::errors::Error;
use crate::events::{self, publish_event, DrawRequested, RandomnessFallback, RandomnessRequested};
use crate::resolver;
use crate::storage::{self, read_config, read_raffle, write_raffle};
use crate::types::{
    DrawJob, DrawState, EngineConfig, OracleRequest, PendingOracle, Raffle, RaffleStatus,
    RaffleWinner, RandomnessSource,
};

/// Interface the engine expects from the external randomness oracle. The
/// oracle later answers through `fulfill_randomness` with a value signed by
/// the configured oracle key.
#[contractclient(name = "RandomnessOracleClient")]
pub trait RandomnessOracle {
    fn request(env: Env, raffle_id: u64, ticket_count: u32) -> u64;
}

pub fn request_draw(env: &Env, actor: Address, raffle_id: u64) -> Result<DrawJob, Error> {
    actor.require_auth();
    let admin = storage::read_admin(env)?;
    let mut raffle = read_raffle(env, raffle_id)?;

    if actor != admin {
        if actor != raffle.creator {
            return Err(Error::NotAuthorized);
        }
        if !raffle.has_ended(env.ledger().timestamp()) && !raffle.is_sold_out() {
            return Err(Error::DrawNotReady);
        }
    }

    let job = enqueue(env, &mut raffle, &actor)?;
    write_raffle(env, &raffle);
    Ok(job)
}

/// Moves a pending raffle into the draw queue.
///
/// The caller is responsible for persisting `raffle`.
pub fn enqueue(env: &Env, raffle: &mut Raffle, requested_by: &Address) -> Result<DrawJob, Error> {
    if raffle.status == RaffleStatus::Cancelled {
        return Err(Error::AlreadyCancelled);
    }
    if raffle.draw_state != DrawState::Pending
        || storage::has_draw_key(env, raffle.id, &raffle.creator)
    {
        return Err(Error::DuplicateDraw);
    }
    if raffle.total_entries == 0 {
        return Err(Error::NoTicketsSold);
    }

    let config = read_config(env)?;
    let mut queue = storage::read_queue(env);
    if queue.len() >= config.queue_capacity {
        return Err(Error::QueueSaturated);
    }

    let now = env.ledger().timestamp();
    let job = DrawJob {
        raffle_id: raffle.id,
        ticket_count: raffle.total_entries,
        requested_by: requested_by.clone(),
        enqueued_at: now,
    };
    queue.push_back(job.clone());
    storage::write_queue(env, &queue);
    storage::write_draw_key(env, raffle.id, &raffle.creator, now);

    let old_status = raffle.status;
    raffle.draw_state = DrawState::InProgress;
    raffle.status = RaffleStatus::Drawing;

    publish_event(
        env,
        "draw_requested",
        DrawRequested {
            raffle_id: raffle.id,
            requested_by: requested_by.clone(),
            ticket_count: job.ticket_count,
            timestamp: now,
        },
    );
    events::status_changed(env, raffle.id, old_status, raffle.status, raffle.draw_state);

    Ok(job)
}

/// Worker entry point: drains up to `max_jobs` queued draws.
pub fn process_draws(env: &Env, max_jobs: u32) -> Result<u32, Error> {
    let config = read_config(env)?;
    let mut queue = storage::read_queue(env);
    let mut processed = 0u32;

    while processed < max_jobs {
        let job = match queue.pop_front() {
            Some(job) => job,
            None => break,
        };
        dispatch(env, &config, &job)?;
        processed += 1;
    }

    storage::write_queue(env, &queue);
    log!(env, "draw jobs processed", processed, queue.len());
    Ok(processed)
}

fn dispatch(env: &Env, config: &EngineConfig, job: &DrawJob) -> Result<(), Error> {
    let mut raffle = read_raffle(env, job.raffle_id)?;
    if raffle.draw_state != DrawState::InProgress || raffle.oracle_request.request().is_some() {
        log!(env, "stale draw job dropped", job.raffle_id);
        return Ok(());
    }

    let request_id = config
        .oracle
        .as_ref()
        .and_then(|oracle| request_randomness(env, oracle, job).map(|id| (oracle, id)));

    match request_id {
        Some((oracle, request_id)) => {
            let now = env.ledger().timestamp();
            raffle.oracle_request = PendingOracle::Requested(OracleRequest {
                request_id,
                requested_at: now,
            });
            storage::write_oracle_request(env, request_id, raffle.id);
            write_raffle(env, &raffle);

            publish_event(
                env,
                "randomness_requested",
                RandomnessRequested {
                    raffle_id: raffle.id,
                    oracle: oracle.clone(),
                    request_id,
                    timestamp: now,
                },
            );
            Ok(())
        }
        None => fallback(env, &mut raffle).map(|_| ()),
    }
}

/// Oracle call that swallows any failure; `None` sends the job down the
/// fallback path.
fn request_randomness(env: &Env, oracle: &Address, job: &DrawJob) -> Option<u64> {
    let client = RandomnessOracleClient::new(env, oracle);
    match client.try_request(&job.raffle_id, &job.ticket_count) {
        Ok(Ok(request_id)) => Some(request_id),
        _ => {
            log!(env, "oracle unavailable", job.raffle_id);
            None
        }
    }
}

/// Message the oracle signs: `request_id` (8 bytes BE) followed by the
/// random value (32 bytes BE).
pub fn delivery_message(env: &Env, request_id: u64, random_value: &U256) -> Bytes {
    let mut message = Bytes::from_array(env, &request_id.to_be_bytes());
    message.append(&random_value.to_be_bytes());
    message
}

/// Applies an oracle delivery. Returns `false` for deliveries that no
/// longer match an in-flight request (duplicates, late answers after a
/// fallback, unknown ids).
pub fn fulfill_randomness(
    env: &Env,
    request_id: u64,
    random_value: U256,
    signature: BytesN<64>,
) -> Result<bool, Error> {
    let config = read_config(env)?;
    let oracle_key = config.oracle_key.ok_or(Error::OracleNotConfigured)?;
    env.crypto().ed25519_verify(
        &oracle_key,
        &delivery_message(env, request_id, &random_value),
        &signature,
    );

    let raffle_id = match storage::take_oracle_request(env, request_id) {
        Some(raffle_id) => raffle_id,
        None => {
            log!(env, "unknown or settled randomness request", request_id);
            return Ok(false);
        }
    };

    let mut raffle = read_raffle(env, raffle_id)?;
    let in_flight = matches!(
        raffle.oracle_request.request(),
        Some(request) if request.request_id == request_id
    );
    if raffle.draw_state != DrawState::InProgress || !in_flight {
        log!(env, "randomness delivery ignored", raffle_id, request_id);
        return Ok(false);
    }

    raffle.oracle_request = PendingOracle::Idle;
    complete(env, &mut raffle, &random_value, RandomnessSource::Oracle)?;
    Ok(true)
}

/// Timeout escape hatch for an oracle that never answers.
pub fn expire_oracle_request(env: &Env, raffle_id: u64) -> Result<RaffleWinner, Error> {
    let config = read_config(env)?;
    let mut raffle = read_raffle(env, raffle_id)?;
    if raffle.draw_state != DrawState::InProgress {
        return Err(Error::DrawNotReady);
    }
    let request = raffle
        .oracle_request
        .request()
        .cloned()
        .ok_or(Error::DrawNotReady)?;

    let deadline = request
        .requested_at
        .checked_add(config.oracle_timeout_secs)
        .ok_or(Error::ArithmeticOverflow)?;
    if env.ledger().timestamp() < deadline {
        return Err(Error::OracleWindowOpen);
    }

    storage::take_oracle_request(env, request.request_id);
    raffle.oracle_request = PendingOracle::Idle;
    fallback(env, &mut raffle)
}

fn fallback(env: &Env, raffle: &mut Raffle) -> Result<RaffleWinner, Error> {
    let random = U256::from_u128(env, env.prng().gen::<u64>() as u128);
    publish_event(
        env,
        "randomness_fallback",
        RandomnessFallback {
            raffle_id: raffle.id,
            timestamp: env.ledger().timestamp(),
        },
    );
    complete(env, raffle, &random, RandomnessSource::Fallback)
}

/// Resolves the winner and settles the raffle in the current invocation.
fn complete(
    env: &Env,
    raffle: &mut Raffle,
    random: &U256,
    source: RandomnessSource,
) -> Result<RaffleWinner, Error> {
    let mut winner = resolver::resolve(env, raffle, random, source)?;
    write_raffle(env, raffle);
    distributor::distribute(env, raffle, &mut winner)?;
    Ok(winner)
}
