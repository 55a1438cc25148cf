use std::sync::Arc;

use log::{debug, info};
use num_bigint::BigUint;
use thiserror::Error;
use tonmint_core::cell::{ArcCell, StateInit, TonCellError};
use tonmint_core::collection::{CollectionContent, NftCollectionConfig};
use tonmint_core::message::{
    NftBatchMintMessage, NftChangeContentMessage, NftChangeOwnerMessage, TonMessage,
    TonMessageError, MAX_BATCH_MINT,
};
use tonmint_core::{from_nano, TonAddress};

use crate::config::MinterConfig;
use crate::sender::{check_message_count, OutgoingMessage, TonMessageSender, TonSenderError};

#[derive(Error, Debug)]
pub enum TonMinterError {
    #[error("TonMessageError ({0})")]
    TonMessageError(#[from] TonMessageError),

    #[error("TonCellError ({0})")]
    TonCellError(#[from] TonCellError),

    #[error("TonSenderError ({0})")]
    TonSenderError(#[from] TonSenderError),

    #[error("Transaction {tx_index} of {tx_count} failed ({error})")]
    TransactionFailed {
        tx_index: usize,
        tx_count: usize,
        error: Box<TonMinterError>,
    },

    #[error("Collection state init is unknown, deploy is not possible")]
    MissingStateInit,

    #[error("Invalid mint plan ({0})")]
    InvalidPlan(String),
}

/// Recipients split into batch mints of at most [`MAX_BATCH_MINT`] items,
/// batches grouped into wallet transactions of `messages_per_tx` messages
/// (at most [`crate::config::MAX_MESSAGES_PER_TX`]).
///
/// Recipient `k` of the whole list receives item index `start_index + k`.
#[derive(Debug, Clone, PartialEq)]
pub struct MintPlan {
    batches: Vec<Vec<TonAddress>>,
    start_index: u64,
    messages_per_tx: usize,
    start_tx: usize,
}

impl MintPlan {
    pub fn new(
        recipients: &[TonAddress],
        start_index: u64,
        messages_per_tx: usize,
    ) -> Result<MintPlan, TonMinterError> {
        if messages_per_tx == 0 {
            return Err(TonMinterError::InvalidPlan(
                "messages_per_tx must be positive".to_string(),
            ));
        }
        check_message_count(messages_per_tx)?;
        let batches = recipients
            .chunks(MAX_BATCH_MINT)
            .map(|chunk| chunk.to_vec())
            .collect();
        Ok(MintPlan {
            batches,
            start_index,
            messages_per_tx,
            start_tx: 0,
        })
    }

    /// Skips the first `start_tx` transactions, already sent by an interrupted run.
    pub fn with_start_tx(mut self, start_tx: usize) -> Result<MintPlan, TonMinterError> {
        if start_tx > self.tx_count() {
            return Err(TonMinterError::InvalidPlan(format!(
                "start_tx {} is beyond the last transaction ({} in total)",
                start_tx,
                self.tx_count()
            )));
        }
        self.start_tx = start_tx;
        Ok(self)
    }

    pub fn batches(&self) -> &[Vec<TonAddress>] {
        &self.batches
    }

    pub fn recipient_count(&self) -> usize {
        self.batches.iter().map(Vec::len).sum()
    }

    pub fn start_tx(&self) -> usize {
        self.start_tx
    }

    pub fn tx_count(&self) -> usize {
        self.batches.len().div_ceil(self.messages_per_tx)
    }

    /// Item index of the first recipient of batch `batch_idx`.
    pub fn first_item_index(&self, batch_idx: usize) -> u64 {
        self.start_index + (batch_idx * MAX_BATCH_MINT) as u64
    }

    /// Batches of transaction `tx_idx`.
    pub fn transaction(&self, tx_idx: usize) -> &[Vec<TonAddress>] {
        let from = (tx_idx * self.messages_per_tx).min(self.batches.len());
        let to = (from + self.messages_per_tx).min(self.batches.len());
        &self.batches[from..to]
    }

    /// Transactions still to send, with their indices.
    pub fn pending_transactions(
        &self,
    ) -> impl Iterator<Item = (usize, &[Vec<TonAddress>])> + '_ {
        (self.start_tx..self.tx_count()).map(move |tx_idx| (tx_idx, self.transaction(tx_idx)))
    }
}

/// Sends deployment, minting and admin messages of one collection through a wallet sender.
pub struct NftCollectionMinter {
    sender: Arc<dyn TonMessageSender>,
    collection_address: TonAddress,
    state_init: Option<StateInit>,
    config: MinterConfig,
}

impl NftCollectionMinter {
    /// Minter for an already deployed collection.
    pub fn new(
        sender: Arc<dyn TonMessageSender>,
        collection_address: &TonAddress,
        config: &MinterConfig,
    ) -> NftCollectionMinter {
        NftCollectionMinter {
            sender,
            collection_address: collection_address.clone(),
            state_init: None,
            config: config.clone(),
        }
    }

    /// Minter for a collection that is yet to be deployed; its address is derived
    /// from `collection_code` and the initial data in `collection`.
    pub fn for_new_collection(
        sender: Arc<dyn TonMessageSender>,
        collection: &NftCollectionConfig,
        collection_code: &ArcCell,
        config: &MinterConfig,
    ) -> Result<NftCollectionMinter, TonMinterError> {
        let state_init = collection.state_init(collection_code)?;
        let collection_address = state_init.address(config.workchain)?;
        info!("Collection address: {}", collection_address);
        Ok(NftCollectionMinter {
            sender,
            collection_address,
            state_init: Some(state_init),
            config: config.clone(),
        })
    }

    /// Minter for a new collection owned by the wallet behind `sender`,
    /// which also receives the royalties.
    ///
    /// Fails with [`TonSenderError::NotConnected`] if the sender has no wallet address.
    pub fn for_sender_collection(
        sender: Arc<dyn TonMessageSender>,
        content: &CollectionContent,
        nft_item_code: &ArcCell,
        royalty: (u16, u16),
        collection_code: &ArcCell,
        config: &MinterConfig,
    ) -> Result<NftCollectionMinter, TonMinterError> {
        let owner = sender.address().ok_or(TonSenderError::NotConnected)?;
        let (numerator, denominator) = royalty;
        let collection =
            NftCollectionConfig::owned_by(&owner, content, nft_item_code, numerator, denominator);
        Self::for_new_collection(sender, &collection, collection_code, config)
    }

    pub fn collection_address(&self) -> &TonAddress {
        &self.collection_address
    }

    pub fn config(&self) -> &MinterConfig {
        &self.config
    }

    /// Sends the state init together with `deploy_value`.
    pub async fn send_deploy(&self) -> Result<(), TonMinterError> {
        let state_init = self
            .state_init
            .clone()
            .ok_or(TonMinterError::MissingStateInit)?;
        let message = OutgoingMessage::new(&self.collection_address, &self.config.deploy_value)
            .with_state_init(state_init);
        debug!(
            "Deploying collection {} with {} TON",
            self.collection_address,
            from_nano(&self.config.deploy_value)
        );
        self.send(vec![message]).await
    }

    /// Builds the batch mint message carrying `recipients.len() * per_item + margin`.
    pub fn batch_mint_message(
        &self,
        recipients: &[TonAddress],
    ) -> Result<OutgoingMessage, TonMinterError> {
        let payload = NftBatchMintMessage::new(recipients).build()?;
        let amount = self.config.batch_mint_value().value(recipients.len());
        Ok(OutgoingMessage::new(&self.collection_address, &amount).with_payload(payload.to_arc()))
    }

    pub async fn send_batch_mint(&self, recipients: &[TonAddress]) -> Result<(), TonMinterError> {
        let message = self.batch_mint_message(recipients)?;
        self.send(vec![message]).await
    }

    pub async fn send_change_owner(&self, new_owner: &TonAddress) -> Result<(), TonMinterError> {
        let payload = NftChangeOwnerMessage::new(new_owner).build()?;
        self.send_admin_message(payload.to_arc()).await
    }

    pub async fn send_change_content(
        &self,
        content: &CollectionContent,
    ) -> Result<(), TonMinterError> {
        let payload = NftChangeContentMessage::new(content).build()?;
        self.send_admin_message(payload.to_arc()).await
    }

    /// Plan for minting `recipients` starting at item `start_index`, shaped by the config.
    pub fn plan(
        &self,
        recipients: &[TonAddress],
        start_index: u64,
    ) -> Result<MintPlan, TonMinterError> {
        MintPlan::new(recipients, start_index, self.config.messages_per_tx)?
            .with_start_tx(self.config.start_tx)
    }

    /// Sends every pending transaction of `plan`, pausing between them.
    ///
    /// Stops at the first failure; the error carries the transaction index to resume from.
    /// Returns the number of transactions sent.
    pub async fn mint_plan(&self, plan: &MintPlan) -> Result<usize, TonMinterError> {
        let tx_count = plan.tx_count();
        let pause = self.config.pause_between_txs();
        let mut sent = 0;
        for (tx_index, batches) in plan.pending_transactions() {
            if sent > 0 && !pause.is_zero() {
                tokio::time::sleep(pause).await;
            }
            info!(
                "Sending transaction {} of {} ({} batch mints)",
                tx_index,
                tx_count,
                batches.len()
            );
            self.send_transaction(batches)
                .await
                .map_err(|error| TonMinterError::TransactionFailed {
                    tx_index,
                    tx_count,
                    error: Box::new(error),
                })?;
            sent += 1;
        }
        Ok(sent)
    }

    async fn send_transaction(&self, batches: &[Vec<TonAddress>]) -> Result<(), TonMinterError> {
        let messages = batches
            .iter()
            .map(|batch| self.batch_mint_message(batch))
            .collect::<Result<Vec<_>, _>>()?;
        let total: BigUint = messages.iter().map(|m| &m.amount).sum();
        debug!("Transaction value {} TON", from_nano(&total));
        self.send(messages).await
    }

    async fn send(&self, messages: Vec<OutgoingMessage>) -> Result<(), TonMinterError> {
        check_message_count(messages.len())?;
        self.sender.send_messages(messages).await?;
        Ok(())
    }

    async fn send_admin_message(&self, payload: ArcCell) -> Result<(), TonMinterError> {
        let message = OutgoingMessage::new(&self.collection_address, &self.config.admin_value)
            .with_payload(payload);
        self.send(vec![message]).await
    }
}
