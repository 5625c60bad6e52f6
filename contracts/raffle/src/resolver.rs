use soroban_sdk::{Env, U256};

use crate::errors::Error;
use crate::events::{self, publish_event, WinnerDrawn};
use crate::storage::{self, read_ticket, write_winner};
use crate::types::{ClaimStatus, DrawState, Raffle, RaffleStatus, RaffleWinner, RandomnessSource};

/// `(random mod total_entries) + 1`.
///
/// Kept as a plain modulo reduction: the bias for very large entry counts
/// relative to the 256-bit randomness range is accepted, not corrected.
pub fn winning_ticket_number(env: &Env, random: &U256, total_entries: u32) -> Result<u32, Error> {
    if total_entries == 0 {
        return Err(Error::NoTicketsFound);
    }
    let index = random.rem_euclid(&U256::from_u32(env, total_entries));
    let index = index
        .to_u128()
        .and_then(|value| u32::try_from(value).ok())
        .ok_or(Error::ArithmeticOverflow)?;
    Ok(index + 1)
}

/// Records the single winner of `raffle` and marks it completed.
///
/// The caller persists `raffle`.
pub fn resolve(
    env: &Env,
    raffle: &mut Raffle,
    random: &U256,
    source: RandomnessSource,
) -> Result<RaffleWinner, Error> {
    if storage::has_winner(env, raffle.id) {
        return Err(Error::DuplicateDraw);
    }

    let number = winning_ticket_number(env, random, raffle.total_entries)?;
    let ticket = read_ticket(env, raffle.id, number)?;
    let now = env.ledger().timestamp();

    let winner = RaffleWinner {
        raffle_id: raffle.id,
        ticket_number: number,
        owner: ticket.owner.clone(),
        source,
        claim_status: ClaimStatus::Unclaimed,
        drawn_at: now,
    };
    write_winner(env, &winner);

    let old_status = raffle.status;
    raffle.status = RaffleStatus::Completed;
    raffle.draw_state = DrawState::Completed;
    raffle.winning_ticket = Some(number);
    raffle.winner = Some(ticket.owner.clone());

    publish_event(
        env,
        "winner_drawn",
        WinnerDrawn {
            raffle_id: raffle.id,
            winner: ticket.owner,
            winning_ticket: number,
            total_entries: raffle.total_entries,
            source,
            timestamp: now,
        },
    );
    events::status_changed(env, raffle.id, old_status, raffle.status, raffle.draw_state);

    Ok(winner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_into_one_based_range() {
        let env = Env::default();

        let seven = U256::from_u32(&env, 7);
        assert_eq!(winning_ticket_number(&env, &seven, 10), Ok(8));
        assert_eq!(winning_ticket_number(&env, &seven, 7), Ok(1));
        assert_eq!(winning_ticket_number(&env, &seven, 1), Ok(1));

        let huge = U256::from_u128(&env, u128::MAX).mul(&U256::from_u32(&env, 3));
        let number = winning_ticket_number(&env, &huge, 1_000).unwrap();
        assert!((1..=1_000).contains(&number));
    }

    #[test]
    fn same_inputs_same_ticket() {
        let env = Env::default();
        let random = U256::from_u128(&env, 0xdead_beef_cafe_babe);

        let first = winning_ticket_number(&env, &random, 37);
        let second = winning_ticket_number(&env, &random, 37);
        assert_eq!(first, second);
    }

    #[test]
    fn zero_entries_is_rejected() {
        let env = Env::default();
        let random = U256::from_u32(&env, 1);
        assert_eq!(
            winning_ticket_number(&env, &random, 0),
            Err(Error::NoTicketsFound)
        );
    }
}
