mod collection_contract;
mod item_contract;

pub use collection_contract::*;
pub use item_contract::*;
