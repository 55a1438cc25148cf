use async_trait::async_trait;
use num_bigint::BigUint;
use strum::IntoStaticStr;
use tonmint_core::cell::ArcCell;
use tonmint_core::TonAddress;

use crate::contract::{MapStackError, TonContractError, TonContractInterface};

/// Data returned by get_nft_data according to TEP-62
#[derive(Debug, Clone, PartialEq)]
pub struct NftItemData {
    /// if not zero, then this NFT is fully initialized and ready for interaction.
    pub init: bool,
    /// numerical index of this NFT in the collection.
    pub index: BigUint,
    /// Address of the smart contract of the collection to which this NFT belongs.
    pub collection_address: TonAddress,
    /// Address of the current owner of this NFT.
    pub owner_address: TonAddress,
    /// Individual content, absent when the item returns only the first four fields.
    pub individual_content: Option<ArcCell>,
}

#[derive(IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
enum NftItemContractMethods {
    GetNftData,
}

#[async_trait]
pub trait NftItemContract: TonContractInterface {
    async fn get_nft_data(&self) -> Result<NftItemData, TonContractError> {
        const NFT_DATA_STACK_ELEMENTS: usize = 5;
        const NFT_DATA_MIN_STACK_ELEMENTS: usize = 4;
        let method = NftItemContractMethods::GetNftData.into();
        let address = self.address().clone();

        let stack = self.run_get_method(method, &[]).await?.stack;
        if (NFT_DATA_MIN_STACK_ELEMENTS..=NFT_DATA_STACK_ELEMENTS).contains(&stack.len()) {
            let init = stack[0].get_bool().map_stack_error(method, &address)?;
            let index = stack[1].get_biguint().map_stack_error(method, &address)?;
            let collection_address = stack[2].get_address().map_stack_error(method, &address)?;
            let owner_address = stack[3].get_address().map_stack_error(method, &address)?;
            let individual_content = stack
                .get(4)
                .map(|entry| entry.get_cell())
                .transpose()
                .map_stack_error(method, &address)?;

            Ok(NftItemData {
                init,
                index,
                collection_address,
                owner_address,
                individual_content,
            })
        } else {
            Err(TonContractError::InvalidMethodResultStackSize {
                method: method.to_string(),
                address,
                actual: stack.len(),
                expected: NFT_DATA_STACK_ELEMENTS,
            })
        }
    }
}

impl<T> NftItemContract for T where T: TonContractInterface {}
