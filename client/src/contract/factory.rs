use std::sync::Arc;

use tonmint_core::TonAddress;

use crate::contract::{TonContract, TonGetMethodTransport};

/// Creates [`TonContract`] handles sharing one transport.
#[derive(Clone)]
pub struct TonContractFactory {
    transport: Arc<dyn TonGetMethodTransport>,
}

impl TonContractFactory {
    pub fn new(transport: Arc<dyn TonGetMethodTransport>) -> TonContractFactory {
        TonContractFactory { transport }
    }

    pub fn get_contract(&self, address: &TonAddress) -> TonContract {
        TonContract::new(self, address)
    }

    pub fn transport(&self) -> &dyn TonGetMethodTransport {
        self.transport.as_ref()
    }
}
