use num_bigint::{BigInt, BigUint};
use strum::Display;
use tonmint_core::cell::{ArcCell, Cell, CellBuilder};
use tonmint_core::TonAddress;

use crate::types::StackParseError;

/// Value on the TVM stack, as passed to and returned from get methods.
///
/// Slices are carried as the cell they span.
#[derive(Debug, Display, Clone, PartialEq)]
pub enum TvmStackEntry {
    Null,
    Int64(i64),
    Int257(BigInt),
    Cell(ArcCell),
    Slice(ArcCell),
}

impl TvmStackEntry {
    /// TVM booleans are `-1` (true) and `0` (false).
    pub fn get_bool(&self) -> Result<bool, StackParseError> {
        match self.get_i64()? {
            0 => Ok(false),
            -1 => Ok(true),
            n => Err(StackParseError::InvalidEntryValue(format!(
                "expected boolean, found number:{}",
                n
            ))),
        }
    }

    pub fn get_i64(&self) -> Result<i64, StackParseError> {
        match self {
            TvmStackEntry::Int64(number) => Ok(*number),
            TvmStackEntry::Int257(number) => number.try_into().map_err(|_| {
                StackParseError::InvalidEntryValue("Received number exceeds i64".to_string())
            }),
            t => Err(StackParseError::InvalidEntryType {
                expected: "Number".to_string(),
                found: t.clone(),
            }),
        }
    }

    pub fn get_u64(&self) -> Result<u64, StackParseError> {
        self.get_bigint()?.try_into().map_err(|_| {
            StackParseError::InvalidEntryValue("Expected number in u64 range".to_string())
        })
    }

    pub fn get_bigint(&self) -> Result<BigInt, StackParseError> {
        match self {
            TvmStackEntry::Int64(number) => Ok(BigInt::from(*number)),
            TvmStackEntry::Int257(number) => Ok(number.clone()),
            t => Err(StackParseError::InvalidEntryType {
                expected: "Number".to_string(),
                found: t.clone(),
            }),
        }
    }

    pub fn get_biguint(&self) -> Result<BigUint, StackParseError> {
        self.get_bigint()?
            .try_into()
            .map_err(|_| StackParseError::InvalidEntryValue("Positive number expected".to_string()))
    }

    pub fn get_cell(&self) -> Result<ArcCell, StackParseError> {
        match self {
            TvmStackEntry::Cell(cell) => Ok(cell.clone()),
            t => Err(StackParseError::InvalidEntryType {
                expected: "Cell".to_string(),
                found: t.clone(),
            }),
        }
    }

    pub fn get_address(&self) -> Result<TonAddress, StackParseError> {
        match self {
            TvmStackEntry::Cell(cell) | TvmStackEntry::Slice(cell) => cell
                .parse_fully(|r| r.load_address())
                .map_err(StackParseError::CellError),
            t => Err(StackParseError::InvalidEntryType {
                expected: "Slice".to_string(),
                found: t.clone(),
            }),
        }
    }
}

impl From<bool> for TvmStackEntry {
    fn from(value: bool) -> Self {
        let i = if value { -1 } else { 0 };
        TvmStackEntry::Int64(i)
    }
}

impl From<i64> for TvmStackEntry {
    fn from(value: i64) -> Self {
        TvmStackEntry::Int64(value)
    }
}

impl From<BigInt> for TvmStackEntry {
    fn from(value: BigInt) -> Self {
        TvmStackEntry::Int257(value)
    }
}

impl From<BigUint> for TvmStackEntry {
    fn from(value: BigUint) -> Self {
        TvmStackEntry::Int257(value.into())
    }
}

impl From<Cell> for TvmStackEntry {
    fn from(value: Cell) -> Self {
        TvmStackEntry::Cell(value.to_arc())
    }
}

impl TryFrom<&TonAddress> for TvmStackEntry {
    type Error = StackParseError;

    fn try_from(value: &TonAddress) -> Result<Self, Self::Error> {
        let cell = CellBuilder::new().store_address(value)?.build()?;
        Ok(TvmStackEntry::Slice(cell.to_arc()))
    }
}
