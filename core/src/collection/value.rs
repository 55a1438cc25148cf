use num_bigint::BigUint;

use crate::types::NanoParseError;
use crate::to_nano;

/// 0.02 TON forwarded to every minted item.
pub const DEFAULT_MINT_VALUE_PER_ITEM: u64 = 20_000_000;
/// 1 TON kept for the collection's own fees.
pub const DEFAULT_MINT_VALUE_MARGIN: u64 = 1_000_000_000;

/// Amount attached to a batch mint: `recipients * per_item + margin`, in nanotons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchMintValue {
    pub per_item: BigUint,
    pub margin: BigUint,
}

impl BatchMintValue {
    pub fn new(per_item: BigUint, margin: BigUint) -> Self {
        BatchMintValue { per_item, margin }
    }

    /// Builds the calculator from decimal TON amounts, e.g. `("0.02", "1")`.
    pub fn from_ton(per_item: &str, margin: &str) -> Result<Self, NanoParseError> {
        Ok(BatchMintValue {
            per_item: to_nano(per_item)?,
            margin: to_nano(margin)?,
        })
    }

    pub fn value(&self, recipients: usize) -> BigUint {
        &self.per_item * BigUint::from(recipients) + &self.margin
    }
}

impl Default for BatchMintValue {
    fn default() -> Self {
        BatchMintValue {
            per_item: BigUint::from(DEFAULT_MINT_VALUE_PER_ITEM),
            margin: BigUint::from(DEFAULT_MINT_VALUE_MARGIN),
        }
    }
}
