use std::sync::Arc;

use num_bigint::BigUint;
use tokio_test::assert_ok;
use tonmint_client::contract::{
    NftCollectionContract, NftItemContract, TonContractError, TonContractFactory,
};
use tonmint_client::types::TvmStackEntry;
use tonmint_core::cell::CellBuilder;
use tonmint_core::TonAddress;

mod common;

const COLLECTION: &str = "EQDk2VTvn04SUKJrW7rXahzdF8_Qi6utb0wj43InCu9vdjrR";
const COLLECTION_URI: &str = "https://storage.googleapis.com/ton-tigers/root.json";

fn address_entry(address: &TonAddress) -> TvmStackEntry {
    assert_ok!(TvmStackEntry::try_from(address))
}

fn factory(transport: common::ScriptedTransport) -> TonContractFactory {
    TonContractFactory::new(Arc::new(transport))
}

#[tokio::test]
async fn test_get_collection_data() -> anyhow::Result<()> {
    common::init_logging();
    let collection: TonAddress = COLLECTION.parse()?;
    let owner = common::test_address(1);
    let content = CellBuilder::new().store_snake_string(COLLECTION_URI)?.build()?;
    let transport = common::ScriptedTransport::default().with_response(
        &collection,
        "get_collection_data",
        vec![
            TvmStackEntry::Int64(420),
            TvmStackEntry::from(content.clone()),
            address_entry(&owner),
        ],
    );

    let contract = factory(transport).get_contract(&collection);
    let data = contract.get_collection_data().await?;
    assert_eq!(data.next_item_index, 420);
    assert_eq!(data.collection_content.as_ref(), &content);
    assert_eq!(data.collection_content_uri()?, COLLECTION_URI);
    assert_eq!(data.owner_address, owner);
    Ok(())
}

#[tokio::test]
async fn test_get_collection_data_wrong_stack_size() -> anyhow::Result<()> {
    common::init_logging();
    let collection: TonAddress = COLLECTION.parse()?;
    let transport = common::ScriptedTransport::default().with_response(
        &collection,
        "get_collection_data",
        vec![TvmStackEntry::Int64(420), TvmStackEntry::Null],
    );

    let contract = factory(transport).get_contract(&collection);
    let result = contract.get_collection_data().await;
    assert!(matches!(
        result,
        Err(TonContractError::InvalidMethodResultStackSize {
            actual: 2,
            expected: 3,
            ..
        })
    ));
    Ok(())
}

#[tokio::test]
async fn test_get_collection_data_wrong_entry_type() -> anyhow::Result<()> {
    common::init_logging();
    let collection: TonAddress = COLLECTION.parse()?;
    let owner = common::test_address(1);
    // owner and content swapped
    let transport = common::ScriptedTransport::default().with_response(
        &collection,
        "get_collection_data",
        vec![
            TvmStackEntry::Int64(0),
            address_entry(&owner),
            TvmStackEntry::Int64(0),
        ],
    );

    let contract = factory(transport).get_contract(&collection);
    let result = contract.get_collection_data().await;
    assert!(matches!(
        result,
        Err(TonContractError::TvmStackParseError { .. })
    ));
    Ok(())
}

#[tokio::test]
async fn test_get_nft_address_by_index() -> anyhow::Result<()> {
    common::init_logging();
    let collection: TonAddress = COLLECTION.parse()?;
    let item = common::test_address(77);
    let transport = Arc::new(common::ScriptedTransport::default().with_response(
        &collection,
        "get_nft_address_by_index",
        vec![address_entry(&item)],
    ));

    let factory = TonContractFactory::new(transport.clone());
    let contract = factory.get_contract(&collection);
    assert_eq!(contract.get_nft_address_by_index(7).await?, item);

    let calls = transport.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].1, "get_nft_address_by_index");
    assert_eq!(calls[0].2, vec![TvmStackEntry::from(BigUint::from(7u32))]);
    Ok(())
}

#[tokio::test]
async fn test_get_nft_data() -> anyhow::Result<()> {
    common::init_logging();
    let collection: TonAddress = COLLECTION.parse()?;
    let item = common::test_address(77);
    let owner = common::test_address(2);
    let individual = CellBuilder::new().store_string("77.json")?.build()?;
    let transport = common::ScriptedTransport::default().with_response(
        &item,
        "get_nft_data",
        vec![
            TvmStackEntry::from(true),
            TvmStackEntry::Int64(77),
            address_entry(&collection),
            address_entry(&owner),
            TvmStackEntry::from(individual.clone()),
        ],
    );

    let contract = factory(transport).get_contract(&item);
    let data = contract.get_nft_data().await?;
    assert!(data.init);
    assert_eq!(data.index, BigUint::from(77u32));
    assert_eq!(data.collection_address, collection);
    assert_eq!(data.owner_address, owner);
    assert_eq!(data.individual_content.as_deref(), Some(&individual));
    Ok(())
}

#[tokio::test]
async fn test_get_nft_data_without_content() -> anyhow::Result<()> {
    common::init_logging();
    let collection: TonAddress = COLLECTION.parse()?;
    let item = common::test_address(5);
    let transport = common::ScriptedTransport::default().with_response(
        &item,
        "get_nft_data",
        vec![
            TvmStackEntry::from(false),
            TvmStackEntry::Int64(5),
            address_entry(&collection),
            address_entry(&TonAddress::NULL),
        ],
    );

    let contract = factory(transport).get_contract(&item);
    let data = contract.get_nft_data().await?;
    assert!(!data.init);
    assert_eq!(data.index, BigUint::from(5u32));
    assert_eq!(data.owner_address, TonAddress::NULL);
    assert_eq!(data.individual_content, None);
    Ok(())
}

#[tokio::test]
async fn test_get_nft_data_invalid() -> anyhow::Result<()> {
    common::init_logging();
    let collection: TonAddress = COLLECTION.parse()?;
    let item = common::test_address(5);
    let transport = common::ScriptedTransport::default()
        .with_response(
            &item,
            "get_nft_data",
            vec![
                TvmStackEntry::Int64(1),
                TvmStackEntry::Int64(5),
                address_entry(&collection),
                address_entry(&collection),
            ],
        )
        .with_response(&collection, "get_nft_data", vec![TvmStackEntry::Int64(0)])
        .with_exit_code(&common::test_address(6), "get_nft_data", 11);
    let contracts = factory(transport);

    assert!(matches!(
        contracts.get_contract(&item).get_nft_data().await,
        Err(TonContractError::TvmStackParseError { .. })
    ));
    assert!(matches!(
        contracts.get_contract(&collection).get_nft_data().await,
        Err(TonContractError::InvalidMethodResultStackSize {
            actual: 1,
            expected: 5,
            ..
        })
    ));
    assert!(matches!(
        contracts
            .get_contract(&common::test_address(6))
            .get_nft_data()
            .await,
        Err(TonContractError::TvmRunError { exit_code: 11, .. })
    ));
    assert!(matches!(
        contracts
            .get_contract(&common::test_address(9))
            .get_nft_data()
            .await,
        Err(TonContractError::TransportError { .. })
    ));
    Ok(())
}
