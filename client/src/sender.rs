use async_trait::async_trait;
use num_bigint::BigUint;
use thiserror::Error;
use tonmint_core::cell::{ArcCell, BagOfCells, StateInit, TonCellError};
use tonmint_core::TonAddress;

use crate::config::MAX_MESSAGES_PER_TX;

#[derive(Error, Debug)]
pub enum TonSenderError {
    #[error("Sender is not connected to a wallet")]
    NotConnected,

    #[error("Too many messages in one transaction (Max: {max}, provided: {provided})")]
    TooManyMessages { max: usize, provided: usize },

    #[error("Transaction rejected ({0})")]
    Rejected(String),

    #[error("TonCellError ({0})")]
    TonCellError(#[from] TonCellError),
}

/// Internal message a wallet is asked to send.
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingMessage {
    pub destination: TonAddress,
    /// Attached value in nanotons.
    pub amount: BigUint,
    pub payload: Option<ArcCell>,
    pub state_init: Option<StateInit>,
}

impl OutgoingMessage {
    pub fn new(destination: &TonAddress, amount: &BigUint) -> Self {
        OutgoingMessage {
            destination: destination.clone(),
            amount: amount.clone(),
            payload: None,
            state_init: None,
        }
    }

    pub fn with_payload(mut self, payload: ArcCell) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn with_state_init(mut self, state_init: StateInit) -> Self {
        self.state_init = Some(state_init);
        self
    }

    /// Payload as base64 BoC, the form wallet connectors expect.
    pub fn payload_boc_base64(&self) -> Result<Option<String>, TonCellError> {
        self.payload
            .as_ref()
            .map(|payload| BagOfCells::new(&[payload.clone()]).to_base64(true))
            .transpose()
    }

    pub fn state_init_boc_base64(&self) -> Result<Option<String>, TonCellError> {
        self.state_init
            .as_ref()
            .map(|state_init| BagOfCells::from_root(state_init.build()?).to_base64(true))
            .transpose()
    }
}

/// Fails with [`TonSenderError::TooManyMessages`] if a wallet can't carry `count` messages at once.
pub fn check_message_count(count: usize) -> Result<(), TonSenderError> {
    if count > MAX_MESSAGES_PER_TX {
        return Err(TonSenderError::TooManyMessages {
            max: MAX_MESSAGES_PER_TX,
            provided: count,
        });
    }
    Ok(())
}

/// Wallet side of the toolkit: signs and broadcasts messages.
///
/// Each `send_messages` call is one wallet transaction carrying all given messages.
#[async_trait]
pub trait TonMessageSender: Send + Sync {
    /// Address of the connected wallet, if any.
    fn address(&self) -> Option<TonAddress>;

    async fn send_messages(&self, messages: Vec<OutgoingMessage>) -> Result<(), TonSenderError>;
}
