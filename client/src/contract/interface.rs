use async_trait::async_trait;
use tonmint_core::TonAddress;

use crate::contract::{TonContractError, TonContractFactory};
use crate::types::{TvmStackEntry, TvmSuccess};

/// Executes get methods of deployed contracts, e.g. through a lite server or an HTTP API.
#[async_trait]
pub trait TonGetMethodTransport: Send + Sync {
    async fn run_get_method(
        &self,
        address: &TonAddress,
        method: &str,
        stack: &[TvmStackEntry],
    ) -> Result<TvmSuccess, TonContractError>;
}

#[async_trait]
pub trait TonContractInterface {
    fn factory(&self) -> &TonContractFactory;

    fn address(&self) -> &TonAddress;

    async fn run_get_method(
        &self,
        method: &str,
        stack: &[TvmStackEntry],
    ) -> Result<TvmSuccess, TonContractError>;
}
