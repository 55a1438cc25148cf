use std::collections::HashMap;
use std::sync::{Mutex, Once};

use async_trait::async_trait;
use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Root};
use log4rs::Config;
use tonmint_client::contract::{TonContractError, TonGetMethodTransport};
use tonmint_client::sender::{OutgoingMessage, TonMessageSender, TonSenderError};
use tonmint_client::types::{TvmStackEntry, TvmSuccess};
use tonmint_core::TonAddress;

#[allow(dead_code)]
static LOG: Once = Once::new();

#[allow(dead_code)]
pub fn init_logging() {
    LOG.call_once(|| {
        let stderr = ConsoleAppender::builder()
            .target(Target::Stderr)
            .encoder(Box::new(log4rs::encode::pattern::PatternEncoder::new(
                "{d(%Y-%m-%d %H:%M:%S%.6f)} {T:>15.15} {h({l:>5.5})} {t}:{L} - {m}{n}",
            )))
            .build();

        let config = Config::builder()
            .appender(Appender::builder().build("stderr", Box::new(stderr)))
            .build(Root::builder().appender("stderr").build(LevelFilter::Info))
            .unwrap();

        log4rs::init_config(config).unwrap();
    })
}

#[allow(dead_code)]
pub fn test_address(seed: u64) -> TonAddress {
    let mut hash = [0u8; 32];
    hash[24..].copy_from_slice(&seed.to_be_bytes());
    TonAddress::new(0, &hash)
}

/// Answers get methods from a fixed script and records every call.
#[allow(dead_code)]
#[derive(Default)]
pub struct ScriptedTransport {
    responses: HashMap<(TonAddress, String), TvmSuccess>,
    calls: Mutex<Vec<(TonAddress, String, Vec<TvmStackEntry>)>>,
}

#[allow(dead_code)]
impl ScriptedTransport {
    pub fn with_response(
        mut self,
        address: &TonAddress,
        method: &str,
        stack: Vec<TvmStackEntry>,
    ) -> Self {
        self.responses
            .insert((address.clone(), method.to_string()), TvmSuccess::new(stack));
        self
    }

    pub fn with_exit_code(mut self, address: &TonAddress, method: &str, exit_code: i32) -> Self {
        let result = TvmSuccess {
            vm_exit_code: exit_code,
            stack: vec![],
            gas_used: 1000,
        };
        self.responses
            .insert((address.clone(), method.to_string()), result);
        self
    }

    pub fn calls(&self) -> Vec<(TonAddress, String, Vec<TvmStackEntry>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TonGetMethodTransport for ScriptedTransport {
    async fn run_get_method(
        &self,
        address: &TonAddress,
        method: &str,
        stack: &[TvmStackEntry],
    ) -> Result<TvmSuccess, TonContractError> {
        self.calls
            .lock()
            .unwrap()
            .push((address.clone(), method.to_string(), stack.to_vec()));
        self.responses
            .get(&(address.clone(), method.to_string()))
            .cloned()
            .ok_or_else(|| {
                TonContractError::transport_error(
                    method.to_string(),
                    address,
                    "no scripted response",
                )
            })
    }
}

/// Collects sent transactions; fails the transaction with index `fail_at`, if set.
#[allow(dead_code)]
#[derive(Default)]
pub struct RecordingSender {
    address: Option<TonAddress>,
    fail_at: Option<usize>,
    attempts: Mutex<usize>,
    transactions: Mutex<Vec<Vec<OutgoingMessage>>>,
}

#[allow(dead_code)]
impl RecordingSender {
    pub fn connected(address: &TonAddress) -> Self {
        RecordingSender {
            address: Some(address.clone()),
            ..Default::default()
        }
    }

    pub fn failing_at(mut self, attempt: usize) -> Self {
        self.fail_at = Some(attempt);
        self
    }

    pub fn transactions(&self) -> Vec<Vec<OutgoingMessage>> {
        self.transactions.lock().unwrap().clone()
    }
}

#[async_trait]
impl TonMessageSender for RecordingSender {
    fn address(&self) -> Option<TonAddress> {
        self.address.clone()
    }

    async fn send_messages(&self, messages: Vec<OutgoingMessage>) -> Result<(), TonSenderError> {
        let attempt = {
            let mut attempts = self.attempts.lock().unwrap();
            *attempts += 1;
            *attempts - 1
        };
        if self.fail_at == Some(attempt) {
            return Err(TonSenderError::Rejected("user declined".to_string()));
        }
        self.transactions.lock().unwrap().push(messages);
        Ok(())
    }
}
