use log::debug;

use crate::cell::{ArcCell, Cell, CellBuilder, StateInit, TonCellError};
use crate::TonAddress;

/// Royalty settings stored by the collection:
/// `numerator:uint16 denominator:uint16 destination:MsgAddress`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoyaltyParams {
    pub numerator: u16,
    pub denominator: u16,
    pub destination: TonAddress,
}

impl RoyaltyParams {
    pub fn to_cell(&self) -> Result<Cell, TonCellError> {
        CellBuilder::new()
            .store_u16(16, self.numerator)?
            .store_u16(16, self.denominator)?
            .store_address(&self.destination)?
            .build()
    }

    pub fn from_cell(cell: &Cell) -> Result<Self, TonCellError> {
        cell.parse_fully(|parser| {
            Ok(RoyaltyParams {
                numerator: parser.load_u16(16)?,
                denominator: parser.load_u16(16)?,
                destination: parser.load_address()?,
            })
        })
    }
}

/// Collection metadata URI plus the prefix every item's individual content is appended to.
///
/// Stored as a cell with two references, each holding a snake string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionContent {
    pub collection_content: String,
    pub common_content: String,
}

impl CollectionContent {
    pub fn new(collection_content: &str, common_content: &str) -> Self {
        CollectionContent {
            collection_content: collection_content.to_string(),
            common_content: common_content.to_string(),
        }
    }

    pub fn to_cell(&self) -> Result<Cell, TonCellError> {
        CellBuilder::new()
            .store_string_ref_tail(&self.collection_content)?
            .store_string_ref_tail(&self.common_content)?
            .build()
    }

    pub fn from_cell(cell: &Cell) -> Result<Self, TonCellError> {
        cell.parse_fully(|parser| {
            let collection_content = parser.next_reference()?.load_snake_string()?;
            let common_content = parser.next_reference()?.load_snake_string()?;
            Ok(CollectionContent {
                collection_content,
                common_content,
            })
        })
    }
}

/// Initial storage of a collection contract.
#[derive(Debug, Clone, PartialEq)]
pub struct NftCollectionConfig {
    pub owner: TonAddress,
    pub content: CollectionContent,
    pub nft_item_code: ArcCell,
    pub royalty: RoyaltyParams,
}

impl NftCollectionConfig {
    /// Collection whose owner also receives the royalties.
    pub fn owned_by(
        owner: &TonAddress,
        content: &CollectionContent,
        nft_item_code: &ArcCell,
        royalty_numerator: u16,
        royalty_denominator: u16,
    ) -> Self {
        NftCollectionConfig {
            owner: owner.clone(),
            content: content.clone(),
            nft_item_code: nft_item_code.clone(),
            royalty: RoyaltyParams {
                numerator: royalty_numerator,
                denominator: royalty_denominator,
                destination: owner.clone(),
            },
        }
    }

    /// `owner:MsgAddress next_item_index:uint32 content:^Cell nft_item_code:^Cell royalty_params:^RoyaltyParams`
    ///
    /// `next_item_index` always starts at 0.
    pub fn to_data_cell(&self) -> Result<Cell, TonCellError> {
        CellBuilder::new()
            .store_address(&self.owner)?
            .store_u32(32, 0)?
            .store_child(self.content.to_cell()?)?
            .store_reference(&self.nft_item_code)?
            .store_child(self.royalty.to_cell()?)?
            .build()
    }

    pub fn state_init(&self, collection_code: &ArcCell) -> Result<StateInit, TonCellError> {
        let data = self.to_data_cell()?.to_arc();
        Ok(StateInit::new(collection_code, &data))
    }

    /// Address the collection will have once deployed with `collection_code` into `workchain`.
    pub fn address(
        &self,
        collection_code: &ArcCell,
        workchain: i32,
    ) -> Result<TonAddress, TonCellError> {
        let address = self.state_init(collection_code)?.address(workchain)?;
        debug!("Collection owned by {} resolves to {}", self.owner, address);
        Ok(address)
    }
}
