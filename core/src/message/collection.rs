//! Opcodes understood by the NFT collection contract.

/// batch_mint#f52b8289
///   query_id:uint64
///   addresses:^AddressChain
/// = InternalMsgBody;
///
/// `AddressChain` holds up to 3 `addr_std` per cell and continues in its single reference.
pub const NFT_COLLECTION_BATCH_MINT: u32 = 0xf52b8289;

/// change_owner#1c04412a
///   query_id:uint64
///   new_owner:MsgAddress
/// = InternalMsgBody;
pub const NFT_COLLECTION_CHANGE_OWNER: u32 = 0x1c04412a;

/// change_content#1a0b9d51
///   query_id:uint64
///   content:^[ collection_content:^SnakeString common_content:^SnakeString ]
/// = InternalMsgBody;
pub const NFT_COLLECTION_CHANGE_CONTENT: u32 = 0x1a0b9d51;

/// Largest number of recipients the collection accepts in one batch mint.
pub const MAX_BATCH_MINT: usize = 210;

mod address_chain;
mod batch_mint;
mod change_content;
mod change_owner;

pub use address_chain::*;
pub use batch_mint::*;
pub use change_content::*;
pub use change_owner::*;
