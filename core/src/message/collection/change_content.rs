use crate::cell::{Cell, CellBuilder};
use crate::collection::CollectionContent;
use crate::message::{HasOpcode, TonMessage, TonMessageError, NFT_COLLECTION_CHANGE_CONTENT};

/// Creates a body for collection content update according to TL-B schema:
///
/// ```raw
/// change_content#1a0b9d51
///   query_id:uint64
///   content:^[ collection_content:^SnakeString common_content:^SnakeString ]
/// = InternalMsgBody;
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct NftChangeContentMessage {
    /// arbitrary request number.
    pub query_id: u64,
    /// new collection metadata URI and item content prefix.
    pub content: CollectionContent,
}

impl NftChangeContentMessage {
    pub fn new(content: &CollectionContent) -> Self {
        NftChangeContentMessage {
            query_id: 0,
            content: content.clone(),
        }
    }
}

impl TonMessage for NftChangeContentMessage {
    fn build(&self) -> Result<Cell, TonMessageError> {
        let mut builder = CellBuilder::new();
        builder.store_u32(32, Self::opcode())?;
        builder.store_u64(64, self.query_id)?;
        builder.store_child(self.content.to_cell()?)?;
        Ok(builder.build()?)
    }

    fn parse(cell: &Cell) -> Result<Self, TonMessageError> {
        let mut parser = cell.parser();

        let opcode: u32 = parser.load_u32(32)?;
        let query_id = parser.load_u64(64)?;
        let content_cell = parser.next_reference()?;
        let content = CollectionContent::from_cell(&content_cell)?;
        parser.ensure_empty()?;

        let result = NftChangeContentMessage { query_id, content };
        result.verify_opcode(opcode)?;

        Ok(result)
    }
}

impl HasOpcode for NftChangeContentMessage {
    fn set_query_id(&mut self, query_id: u64) {
        self.query_id = query_id;
    }

    fn query_id(&self) -> u64 {
        self.query_id
    }

    fn opcode() -> u32 {
        NFT_COLLECTION_CHANGE_CONTENT
    }
}
