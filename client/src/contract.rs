use async_trait::async_trait;
use log::trace;
use tonmint_core::TonAddress;

pub use error::*;
pub use factory::*;
pub use interface::*;
pub use nft::*;

use crate::types::{TvmStackEntry, TvmSuccess};

mod error;
mod factory;
mod interface;
mod nft;

/// Handle of a deployed contract: an address bound to the transport that runs its getters.
#[derive(Clone)]
pub struct TonContract {
    factory: TonContractFactory,
    address: TonAddress,
}

impl TonContract {
    pub(crate) fn new(factory: &TonContractFactory, address: &TonAddress) -> TonContract {
        TonContract {
            factory: factory.clone(),
            address: address.clone(),
        }
    }
}

#[async_trait]
impl TonContractInterface for TonContract {
    fn factory(&self) -> &TonContractFactory {
        &self.factory
    }

    fn address(&self) -> &TonAddress {
        &self.address
    }

    async fn run_get_method(
        &self,
        method: &str,
        stack: &[TvmStackEntry],
    ) -> Result<TvmSuccess, TonContractError> {
        trace!("Running {} on {} with {} args", method, self.address, stack.len());
        let result = self
            .factory
            .transport()
            .run_get_method(&self.address, method, stack)
            .await?;
        if !result.is_success() {
            return Err(TonContractError::TvmRunError {
                method: method.to_string(),
                address: self.address.clone(),
                exit_code: result.vm_exit_code,
                gas_used: result.gas_used,
            });
        }
        trace!(
            "{} on {} returned {} entries",
            method,
            self.address,
            result.stack.len()
        );
        Ok(result)
    }
}
