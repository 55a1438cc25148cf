use crate::cell::{ArcCell, Cell, CellBuilder, TonCellError};
use crate::TonAddress;

/// `StateInit` of a contract with code and data, no split depth, no tick-tock, no libraries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateInit {
    pub code: ArcCell,
    pub data: ArcCell,
}

impl StateInit {
    pub fn new(code: &ArcCell, data: &ArcCell) -> StateInit {
        StateInit {
            code: code.clone(),
            data: data.clone(),
        }
    }

    pub fn build(&self) -> Result<Cell, TonCellError> {
        CellBuilder::new()
            .store_bit(false)? // split_depth
            .store_bit(false)? // special
            .store_bit(true)? // code
            .store_bit(true)? // data
            .store_bit(false)? // library
            .store_reference(&self.code)?
            .store_reference(&self.data)?
            .build()
    }

    /// Address the contract gets when deployed with this state init.
    pub fn address(&self, workchain: i32) -> Result<TonAddress, TonCellError> {
        let hash = self.build()?.cell_hash();
        Ok(TonAddress::new(workchain, &hash))
    }
}

#[cfg(test)]
mod tests {
    use crate::cell::{CellBuilder, StateInit, TonCellError};

    #[test]
    fn state_init_layout() -> Result<(), TonCellError> {
        let code = CellBuilder::new().store_u8(8, 0xAA)?.build()?.to_arc();
        let data = CellBuilder::new().store_u8(8, 0xBB)?.build()?.to_arc();
        let state_init = StateInit::new(&code, &data);
        let cell = state_init.build()?;
        assert_eq!(cell.bit_len(), 5);
        assert_eq!(cell.data(), [0b0011_0000]);
        assert_eq!(cell.reference(0)?, &code);
        assert_eq!(cell.reference(1)?, &data);

        let address = state_init.address(0)?;
        assert_eq!(address.workchain, 0);
        assert_eq!(address.hash_part, cell.cell_hash());
        assert_ne!(state_init.address(-1)?, address);
        Ok(())
    }

    #[test]
    fn address_depends_on_data() -> Result<(), TonCellError> {
        let code = CellBuilder::new().store_u8(8, 0xAA)?.build()?.to_arc();
        let first = CellBuilder::new().store_u8(8, 1)?.build()?.to_arc();
        let second = CellBuilder::new().store_u8(8, 2)?.build()?.to_arc();
        assert_ne!(
            StateInit::new(&code, &first).address(0)?,
            StateInit::new(&code, &second).address(0)?
        );
        Ok(())
    }
}
