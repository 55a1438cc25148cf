use std::borrow::Cow;

use thiserror::Error;
use tonmint_core::TonAddress;

use crate::types::StackParseError;

#[derive(Error, Debug)]
pub enum TonContractError {
    #[error("Transport error (Method: {method}, address: {address}, error: {message})")]
    TransportError {
        method: String,
        address: TonAddress,
        message: String,
    },

    #[error("Invalid method result stack size  (Method: {method}, address: {address}, actual: {actual}, expected {expected})")]
    InvalidMethodResultStackSize {
        method: String,
        address: TonAddress,
        actual: usize,
        expected: usize,
    },

    #[error(
        "Tvm stack parse  error (Method: {method}, address: {address}, stack error: {error:?})"
    )]
    TvmStackParseError {
        method: String,
        address: TonAddress,
        error: Box<StackParseError>,
    },

    #[error("Tvm run error (Method: {method}, address: {address}, exit code: {exit_code}, gas used: {gas_used})")]
    TvmRunError {
        method: String,
        address: TonAddress,
        exit_code: i32,
        gas_used: i64,
    },
}

impl TonContractError {
    pub fn transport_error<T: ToString>(
        method: impl Into<Cow<'static, str>>,
        address: &TonAddress,
        error: T,
    ) -> TonContractError {
        TonContractError::TransportError {
            method: method.into().to_string(),
            address: address.clone(),
            message: error.to_string(),
        }
    }
}

pub trait MapStackError<R> {
    fn map_stack_error(
        self,
        method: impl Into<Cow<'static, str>>,
        address: &TonAddress,
    ) -> Result<R, TonContractError>;
}

impl<R> MapStackError<R> for Result<R, StackParseError> {
    fn map_stack_error(
        self,
        method: impl Into<Cow<'static, str>>,
        address: &TonAddress,
    ) -> Result<R, TonContractError> {
        self.map_err(|e| TonContractError::TvmStackParseError {
            method: method.into().to_string(),
            address: address.clone(),
            error: e.into(),
        })
    }
}
