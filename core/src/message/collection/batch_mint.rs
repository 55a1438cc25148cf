use super::{check_batch_size, pack_address_chain, unpack_address_chain};
use crate::cell::{Cell, CellBuilder};
use crate::message::{HasOpcode, TonMessage, TonMessageError, NFT_COLLECTION_BATCH_MINT};
use crate::TonAddress;

/// Creates a body for collection batch mint according to TL-B schema:
///
/// ```raw
/// batch_mint#f52b8289
///   query_id:uint64
///   addresses:^AddressChain
/// = InternalMsgBody;
/// ```
///
/// Item `k` of the batch goes to `recipients[k]`.
#[derive(Clone, Debug, PartialEq)]
pub struct NftBatchMintMessage {
    /// arbitrary request number.
    pub query_id: u64,
    /// owners of the new items, in minting order.
    pub recipients: Vec<TonAddress>,
}

impl NftBatchMintMessage {
    pub fn new(recipients: &[TonAddress]) -> Self {
        NftBatchMintMessage {
            query_id: 0,
            recipients: recipients.to_vec(),
        }
    }
}

impl TonMessage for NftBatchMintMessage {
    fn build(&self) -> Result<Cell, TonMessageError> {
        check_batch_size(self.recipients.len())?;
        let chain = pack_address_chain(&self.recipients)?;

        let mut builder = CellBuilder::new();
        builder.store_u32(32, Self::opcode())?;
        builder.store_u64(64, self.query_id)?;
        builder.store_child(chain)?;
        Ok(builder.build()?)
    }

    fn parse(cell: &Cell) -> Result<Self, TonMessageError> {
        let mut parser = cell.parser();

        let opcode: u32 = parser.load_u32(32)?;
        let query_id = parser.load_u64(64)?;
        let chain = parser.next_reference()?;
        parser.ensure_empty()?;

        let mut result = NftBatchMintMessage {
            query_id,
            recipients: vec![],
        };
        result.verify_opcode(opcode)?;
        result.recipients = unpack_address_chain(&chain)?;

        Ok(result)
    }
}

impl HasOpcode for NftBatchMintMessage {
    fn set_query_id(&mut self, query_id: u64) {
        self.query_id = query_id;
    }

    fn query_id(&self) -> u64 {
        self.query_id
    }

    fn opcode() -> u32 {
        NFT_COLLECTION_BATCH_MINT
    }
}
