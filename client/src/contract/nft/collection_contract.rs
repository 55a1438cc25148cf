use async_trait::async_trait;
use log::debug;
use num_bigint::BigUint;
use strum::IntoStaticStr;
use tonmint_core::cell::{ArcCell, TonCellError};
use tonmint_core::TonAddress;

use crate::contract::{MapStackError, TonContractError, TonContractInterface};
use crate::types::TvmStackEntry;

/// Data returned by get_collection_data according to TEP-62
#[derive(Debug, Clone, PartialEq)]
pub struct NftCollectionData {
    /// Index the next minted item will get, i.e. the number of items minted so far.
    pub next_item_index: u64,
    /// Collection content cell as returned by the contract.
    pub collection_content: ArcCell,
    /// Collection owner address.
    pub owner_address: TonAddress,
}

impl NftCollectionData {
    /// Reads the collection metadata URI stored as a snake string.
    pub fn collection_content_uri(&self) -> Result<String, TonCellError> {
        self.collection_content.load_snake_string()
    }
}

#[derive(IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
enum NftCollectionMethods {
    GetCollectionData,
    GetNftAddressByIndex,
}

#[async_trait]
pub trait NftCollectionContract: TonContractInterface {
    /// Returns nft collection data.
    async fn get_collection_data(&self) -> Result<NftCollectionData, TonContractError> {
        const NFT_COLLECTION_STACK_ELEMENTS: usize = 3;
        let method = NftCollectionMethods::GetCollectionData.into();
        let address = self.address().clone();

        let stack = self.run_get_method(method, &[]).await?.stack;
        if stack.len() == NFT_COLLECTION_STACK_ELEMENTS {
            let next_item_index = stack[0].get_u64().map_stack_error(method, &address)?;
            let collection_content = stack[1].get_cell().map_stack_error(method, &address)?;
            let owner_address = stack[2].get_address().map_stack_error(method, &address)?;
            debug!(
                "Collection {} has next item index {}, owner {}",
                address, next_item_index, owner_address
            );

            Ok(NftCollectionData {
                next_item_index,
                collection_content,
                owner_address,
            })
        } else {
            Err(TonContractError::InvalidMethodResultStackSize {
                method: method.to_string(),
                address,
                actual: stack.len(),
                expected: NFT_COLLECTION_STACK_ELEMENTS,
            })
        }
    }

    /// Gets the serial number of the NFT item of this collection and
    /// returns the address (TonAddress) of this NFT item smart contract.
    async fn get_nft_address_by_index(&self, index: u64) -> Result<TonAddress, TonContractError> {
        let method = NftCollectionMethods::GetNftAddressByIndex.into();
        let input_stack = vec![TvmStackEntry::from(BigUint::from(index))];
        let stack = self.run_get_method(method, &input_stack).await?.stack;

        if stack.len() == 1 {
            stack[0]
                .get_address()
                .map_stack_error(method, self.address())
        } else {
            Err(TonContractError::InvalidMethodResultStackSize {
                method: method.to_string(),
                address: self.address().clone(),
                actual: stack.len(),
                expected: 1,
            })
        }
    }
}

impl<T> NftCollectionContract for T where T: TonContractInterface {}
