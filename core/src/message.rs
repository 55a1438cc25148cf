use crate::cell::Cell;

mod collection;
mod error;

pub use collection::*;
pub use error::*;

/// Message body that can be built into a cell and parsed back.
pub trait TonMessage: Sized {
    fn build(&self) -> Result<Cell, TonMessageError>;

    fn parse(cell: &Cell) -> Result<Self, TonMessageError>;
}

pub trait HasOpcode: TonMessage {
    fn verify_opcode(&self, opcode: u32) -> Result<(), TonMessageError> {
        let expected_opcode = Self::opcode();
        if opcode != expected_opcode {
            let invalid = InvalidMessage {
                opcode: Some(opcode),
                query_id: Some(self.query_id()),
                message: format!("Unexpected opcode. {0:08x} expected", expected_opcode),
            };
            Err(TonMessageError::InvalidMessage(invalid))
        } else {
            Ok(())
        }
    }

    fn opcode() -> u32;

    fn with_query_id(&mut self, query_id: u64) -> &mut Self {
        self.set_query_id(query_id);
        self
    }

    fn set_query_id(&mut self, query_id: u64);

    fn query_id(&self) -> u64;
}
