use proptest::prelude::*;
use raffle_engine::issuer::bonus_tickets;
use raffle_engine::resolver::winning_ticket_number;
use raffle_engine::{
    Amount, Currency, DiscountTier, EngineConfig, PrizeAsset, RaffleEngine, RaffleEngineClient,
    RaffleParams, RaffleType,
};
use soroban_sdk::{testutils::Address as _, Address, Env, U256};

const BUYERS: usize = 3;
const SUPPLY: u32 = 200;

fn setup(env: &Env) -> (RaffleEngineClient<'_>, Address) {
    env.mock_all_auths();
    let admin = Address::generate(env);
    let contract_id = env.register(RaffleEngine, ());
    let client = RaffleEngineClient::new(env, &contract_id);
    client.init(
        &admin,
        &EngineConfig {
            treasury: Address::generate(env),
            fee_bp: 0,
            oracle: None,
            oracle_key: None,
            oracle_timeout_secs: 600,
            queue_capacity: 4,
        },
    );
    (client, admin)
}

fn reserve_raffle(
    env: &Env,
    client: &RaffleEngineClient,
    price: u128,
    discount: DiscountTier,
) -> u64 {
    let creator = Address::generate(env);
    client.grant_points(&creator, &None, &Amount::from_u128(env, 1));
    client
        .create_raffle(
            &creator,
            &RaffleParams {
                raffle_type: RaffleType::Reserve,
                prize: PrizeAsset::Points(Amount::from_u128(env, 1)),
                currency: Currency::Points,
                community: None,
                ticket_price: Amount::from_u128(env, price),
                tickets_available: SUPPLY,
                open_entry_allotment: 0,
                discount,
                duration: 86_400,
            },
        )
        .id
}

fn buyers(env: &Env, client: &RaffleEngineClient, funds: u128) -> std::vec::Vec<Address> {
    (0..BUYERS)
        .map(|_| {
            let buyer = Address::generate(env);
            client.grant_points(&buyer, &None, &Amount::from_u128(env, funds));
            buyer
        })
        .collect()
}

fn discounts() -> impl Strategy<Value = DiscountTier> {
    prop_oneof![
        Just(DiscountTier::None),
        Just(DiscountTier::Coarse),
        Just(DiscountTier::Fine),
    ]
}

fn purchases() -> impl Strategy<Value = std::vec::Vec<(usize, u32)>> {
    prop::collection::vec((0..BUYERS, 1u32..=5), 1..8)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn interleaved_purchases_number_tickets_contiguously(
        orders in purchases(),
        discount in discounts(),
    ) {
        let env = Env::default();
        let (client, _) = setup(&env);
        let raffle_id = reserve_raffle(&env, &client, 1, discount);
        let buyers = buyers(&env, &client, 1_000);

        let mut expected_owners = std::vec::Vec::new();
        for (who, quantity) in orders.iter() {
            client.purchase_tickets(&buyers[*who], &raffle_id, quantity, &false);
            for _ in 0..(*quantity + bonus_tickets(discount, *quantity)) {
                expected_owners.push(buyers[*who].clone());
            }
        }

        for (offset, owner) in expected_owners.iter().enumerate() {
            let ticket = client.get_ticket(&raffle_id, &(offset as u32 + 1));
            prop_assert_eq!(&ticket.owner, owner);
        }

        let raffle = client.get_raffle(&raffle_id);
        prop_assert_eq!(raffle.total_entries as usize, expected_owners.len());
        prop_assert_eq!(raffle.tickets_available + raffle.tickets_sold, SUPPLY);
    }

    #[test]
    fn cancellation_refunds_exactly_the_paid_total(
        orders in purchases(),
        discount in discounts(),
        price in 1u128..1_000,
    ) {
        let env = Env::default();
        let (client, admin) = setup(&env);
        let raffle_id = reserve_raffle(&env, &client, price, discount);
        let funds = price * 40;
        let buyers = buyers(&env, &client, funds);

        let mut paid = [0u32; BUYERS];
        for (who, quantity) in orders.iter() {
            client.purchase_tickets(&buyers[*who], &raffle_id, quantity, &false);
            paid[*who] += *quantity;
        }
        client.cancel_raffle(&admin, &raffle_id);

        for (who, buyer) in buyers.iter().enumerate() {
            prop_assert_eq!(
                client.balance(buyer, &Currency::Points, &None),
                Amount::from_u128(&env, funds)
            );
            match client.get_refund(&raffle_id, buyer) {
                Some(refund) => {
                    prop_assert_eq!(refund.tickets, paid[who]);
                    prop_assert_eq!(
                        refund.amount,
                        Amount::from_u128(&env, price * u128::from(paid[who]))
                    );
                }
                None => {
                    prop_assert_eq!(paid[who], 0);
                }
            }
        }
    }

    #[test]
    fn winning_ticket_is_in_range_and_deterministic(
        random in any::<u128>(),
        total in 1u32..10_000,
    ) {
        let env = Env::default();
        let value = U256::from_u128(&env, random);

        let first = winning_ticket_number(&env, &value, total).unwrap();
        let second = winning_ticket_number(&env, &value, total).unwrap();
        prop_assert_eq!(first, second);
        prop_assert!((1..=total).contains(&first));
        prop_assert_eq!(first as u128, random % total as u128 + 1);
    }
}
