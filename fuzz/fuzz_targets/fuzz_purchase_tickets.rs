#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use raffle_engine::{
    Amount, Currency, DiscountTier, EngineConfig, PrizeAsset, RaffleEngine, RaffleEngineClient,
    RaffleParams, RaffleType,
};
use soroban_sdk::{testutils::Address as _, Address, Env};

#[derive(Arbitrary, Debug)]
struct Purchase {
    buyer: u8,
    quantity: u8,
}

#[derive(Arbitrary, Debug)]
struct Input {
    supply: u8,
    price: u16,
    fine_discount: bool,
    purchases: Vec<Purchase>,
}

const BUYERS: usize = 4;

fuzz_target!(|input: Input| {
    if input.price == 0 || input.supply == 0 {
        return;
    }

    let env = Env::default();
    env.mock_all_auths();
    let admin = Address::generate(&env);
    let contract_id = env.register(RaffleEngine, ());
    let client = RaffleEngineClient::new(&env, &contract_id);
    client.init(
        &admin,
        &EngineConfig {
            treasury: Address::generate(&env),
            fee_bp: 0,
            oracle: None,
            oracle_key: None,
            oracle_timeout_secs: 600,
            queue_capacity: 4,
        },
    );

    let creator = Address::generate(&env);
    client.grant_points(&creator, &None, &Amount::from_u128(&env, 1));
    let supply = u32::from(input.supply);
    let raffle = client.create_raffle(
        &creator,
        &RaffleParams {
            raffle_type: RaffleType::Reserve,
            prize: PrizeAsset::Points(Amount::from_u128(&env, 1)),
            currency: Currency::Points,
            community: None,
            ticket_price: Amount::from_u128(&env, u128::from(input.price)),
            tickets_available: supply,
            open_entry_allotment: 0,
            discount: if input.fine_discount {
                DiscountTier::Fine
            } else {
                DiscountTier::Coarse
            },
            duration: 86_400,
        },
    );

    let buyers: Vec<Address> = (0..BUYERS)
        .map(|_| {
            let buyer = Address::generate(&env);
            client.grant_points(&buyer, &None, &Amount::from_u128(&env, 1_000_000));
            buyer
        })
        .collect();

    for purchase in input.purchases.iter().take(16) {
        let buyer = &buyers[usize::from(purchase.buyer) % BUYERS];
        let _ = client.try_purchase_tickets(
            buyer,
            &raffle.id,
            &u32::from(purchase.quantity),
            &false,
        );

        let state = client.get_raffle(&raffle.id);
        assert_eq!(state.tickets_available + state.tickets_sold, supply);
        assert!(state.total_entries >= state.tickets_sold);
    }
});
