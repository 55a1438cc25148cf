pub mod cell;
pub mod collection;
pub mod message;
pub mod types;

pub use crate::types::{
    from_nano, to_nano, NanoParseError, TonAddress, TonAddressParseError, TonHash,
};
