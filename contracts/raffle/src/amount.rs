//! Currency amounts.
//!
//! Every balance, price and prize in the engine is an [`Amount`]: a
//! non-negative 256-bit integer living on the host. Token amounts for
//! high-denomination assets overflow `i128` once decimals are applied. The
//! public surface is construction, addition, checked subtraction and
//! comparison.
//! Scaling by ticket counts, decimal multipliers and basis points is kept
//! crate-private for the pricing and settlement paths.

use core::cmp::Ordering;

use soroban_sdk::{contracttype, Env, U256};

pub const BASIS_POINTS: u32 = 10_000;

#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct Amount {
    units: U256,
}

impl Amount {
    pub fn zero(env: &Env) -> Self {
        Self {
            units: U256::from_u32(env, 0),
        }
    }

    pub fn from_u128(env: &Env, value: u128) -> Self {
        Self {
            units: U256::from_u128(env, value),
        }
    }

    pub fn from_units(units: U256) -> Self {
        Self { units }
    }

    /// Narrows to `u128`, `None` when the value does not fit.
    pub fn to_u128(&self) -> Option<u128> {
        self.units.to_u128()
    }

    pub fn is_zero(&self) -> bool {
        self.to_u128() == Some(0)
    }

    pub fn add(&self, other: &Amount) -> Amount {
        Amount {
            units: self.units.add(&other.units),
        }
    }

    /// `None` when `other` is larger than `self`; amounts never go negative.
    pub fn checked_sub(&self, other: &Amount) -> Option<Amount> {
        if self.units < other.units {
            return None;
        }
        Some(Amount {
            units: self.units.sub(&other.units),
        })
    }

    pub(crate) fn times(&self, env: &Env, factor: u32) -> Amount {
        Amount {
            units: self.units.mul(&U256::from_u32(env, factor)),
        }
    }

    pub(crate) fn scaled(&self, multiplier: &U256) -> Amount {
        Amount {
            units: self.units.mul(multiplier),
        }
    }

    /// `self * bp / 10_000`, rounded down.
    pub(crate) fn basis_points(&self, env: &Env, bp: u32) -> Amount {
        let scaled = self.units.mul(&U256::from_u32(env, bp));
        Amount {
            units: scaled.div(&U256::from_u32(env, BASIS_POINTS)),
        }
    }
}

impl PartialOrd for Amount {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Amount {
    fn cmp(&self, other: &Self) -> Ordering {
        self.units.cmp(&other.units)
    }
}
