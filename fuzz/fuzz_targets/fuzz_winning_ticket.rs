#![no_main]

use libfuzzer_sys::fuzz_target;
use raffle_engine::resolver::winning_ticket_number;
use soroban_sdk::{Env, U256};

fuzz_target!(|input: (u128, u128, u32)| {
    let (high, low, total) = input;
    let env = Env::default();

    let mut bytes = [0u8; 32];
    bytes[..16].copy_from_slice(&high.to_be_bytes());
    bytes[16..].copy_from_slice(&low.to_be_bytes());
    let random = U256::from_be_bytes(&env, &soroban_sdk::Bytes::from_array(&env, &bytes));

    match winning_ticket_number(&env, &random, total) {
        Ok(number) => assert!(number >= 1 && number <= total),
        Err(_) => assert_eq!(total, 0),
    }
});
