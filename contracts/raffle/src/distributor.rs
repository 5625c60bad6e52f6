use soroban_sdk::{log, Env};

use crate::amount::{Amount, BASIS_POINTS};
use crate::errors::Error;
use crate::events::{publish_event, EarningsPaid};
use crate::ledger;
use crate::storage::{read_config, read_prize, write_prize, write_winner};
use crate::types::{BalanceAccount, ClaimStatus, PrizeAsset, PrizeStatus, Raffle, RaffleWinner};

#[derive(Clone, Debug, PartialEq)]
pub struct ProceedsSplit {
    pub seller: Amount,
    pub platform_fee: Amount,
}

/// Seller keeps `proceeds * (10_000 - fee_bp) / 10_000`, rounded down; the
/// remainder is the platform fee.
pub fn split_proceeds(env: &Env, proceeds: &Amount, fee_bp: u32) -> Result<ProceedsSplit, Error> {
    let keep_bp = BASIS_POINTS
        .checked_sub(fee_bp)
        .ok_or(Error::InvalidParameters)?;
    let seller = proceeds.basis_points(env, keep_bp);
    let platform_fee = proceeds
        .checked_sub(&seller)
        .ok_or(Error::ArithmeticOverflow)?;
    Ok(ProceedsSplit {
        seller,
        platform_fee,
    })
}

/// Pays out a freshly resolved raffle: prize to the winner, proceeds to the
/// seller, fee to the treasury. The fee is read from the live config.
pub fn distribute(
    env: &Env,
    raffle: &Raffle,
    winner: &mut RaffleWinner,
) -> Result<ProceedsSplit, Error> {
    let config = read_config(env)?;
    let mut prize = read_prize(env, raffle.id)?;

    match &prize.asset {
        PrizeAsset::Token(token, amount) => {
            let account = BalanceAccount::Wallet(winner.owner.clone(), token.clone());
            ledger::credit(env, &account, amount);
            prize.status = PrizeStatus::Awarded;
            winner.claim_status = ClaimStatus::Claimed;
        }
        PrizeAsset::Points(amount) => {
            ledger::credit(env, &BalanceAccount::Points(winner.owner.clone()), amount);
            prize.status = PrizeStatus::Awarded;
            winner.claim_status = ClaimStatus::Claimed;
        }
        PrizeAsset::Nft(..) => {
            prize.status = PrizeStatus::PendingClaim;
        }
    }
    write_prize(env, &prize);
    write_winner(env, winner);

    let split = split_proceeds(env, &raffle.proceeds, config.fee_bp)?;
    if !split.seller.is_zero() {
        let seller = ledger::route(&raffle.creator, &raffle.currency, raffle.community);
        ledger::credit(env, &seller, &split.seller);
    }
    if !split.platform_fee.is_zero() {
        let treasury = ledger::route(&config.treasury, &raffle.currency, raffle.community);
        ledger::credit(env, &treasury, &split.platform_fee);
    }

    log!(env, "raffle settled", raffle.id, config.fee_bp);
    publish_event(
        env,
        "earnings_paid",
        EarningsPaid {
            raffle_id: raffle.id,
            seller: raffle.creator.clone(),
            gross: raffle.proceeds.clone(),
            net: split.seller.clone(),
            platform_fee: split.platform_fee.clone(),
            fee_bp: config.fee_bp,
        },
    );

    Ok(split)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_adds_back_to_proceeds() {
        let env = Env::default();
        let proceeds = Amount::from_u128(&env, 1_001);

        let split = split_proceeds(&env, &proceeds, 250).unwrap();
        // 1_001 * 9_750 / 10_000 = 975.975
        assert_eq!(split.seller, Amount::from_u128(&env, 975));
        assert_eq!(split.platform_fee, Amount::from_u128(&env, 26));
        assert_eq!(split.seller.add(&split.platform_fee), proceeds);
    }

    #[test]
    fn zero_fee_pays_everything_to_seller() {
        let env = Env::default();
        let proceeds = Amount::from_u128(&env, 50);

        let split = split_proceeds(&env, &proceeds, 0).unwrap();
        assert_eq!(split.seller, proceeds);
        assert!(split.platform_fee.is_zero());
    }

    #[test]
    fn fee_above_full_rate_is_rejected() {
        let env = Env::default();
        let proceeds = Amount::from_u128(&env, 50);
        assert_eq!(
            split_proceeds(&env, &proceeds, BASIS_POINTS + 1),
            Err(Error::InvalidParameters)
        );
    }
}
