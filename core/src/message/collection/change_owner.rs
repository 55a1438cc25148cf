use crate::cell::{Cell, CellBuilder};
use crate::message::{HasOpcode, TonMessage, TonMessageError, NFT_COLLECTION_CHANGE_OWNER};
use crate::TonAddress;

/// Creates a body for collection ownership change according to TL-B schema:
///
/// ```raw
/// change_owner#1c04412a
///   query_id:uint64
///   new_owner:MsgAddress
/// = InternalMsgBody;
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct NftChangeOwnerMessage {
    /// arbitrary request number.
    pub query_id: u64,
    /// address of the new collection owner.
    pub new_owner: TonAddress,
}

impl NftChangeOwnerMessage {
    pub fn new(new_owner: &TonAddress) -> Self {
        NftChangeOwnerMessage {
            query_id: 0,
            new_owner: new_owner.clone(),
        }
    }
}

impl TonMessage for NftChangeOwnerMessage {
    fn build(&self) -> Result<Cell, TonMessageError> {
        let mut builder = CellBuilder::new();
        builder.store_u32(32, Self::opcode())?;
        builder.store_u64(64, self.query_id)?;
        builder.store_address(&self.new_owner)?;
        Ok(builder.build()?)
    }

    fn parse(cell: &Cell) -> Result<Self, TonMessageError> {
        let mut parser = cell.parser();

        let opcode: u32 = parser.load_u32(32)?;
        let query_id = parser.load_u64(64)?;
        let new_owner = parser.load_address()?;
        parser.ensure_empty()?;

        let result = NftChangeOwnerMessage {
            query_id,
            new_owner,
        };
        result.verify_opcode(opcode)?;

        Ok(result)
    }
}

impl HasOpcode for NftChangeOwnerMessage {
    fn set_query_id(&mut self, query_id: u64) {
        self.query_id = query_id;
    }

    fn query_id(&self) -> u64 {
        self.query_id
    }

    fn opcode() -> u32 {
        NFT_COLLECTION_CHANGE_OWNER
    }
}
