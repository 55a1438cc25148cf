use std::mem;
use std::sync::Arc;

use bitstream_io::{BigEndian, BitWrite, BitWriter, Numeric};

use crate::cell::error::{MapTonCellError, TonCellError};
use crate::cell::{ArcCell, Cell, MAX_CELL_BITS, MAX_CELL_REFERENCES};
use crate::TonAddress;

/// Append-only staging area for a [`Cell`].
///
/// Every store checks the 1023 bits / 4 references limits up front, so an
/// overflowing write never leaves a partially written value behind.
pub struct CellBuilder {
    bit_writer: BitWriter<Vec<u8>, BigEndian>,
    bits_to_write: usize,
    references: Vec<ArcCell>,
}

impl CellBuilder {
    pub fn new() -> CellBuilder {
        CellBuilder {
            bit_writer: BitWriter::endian(Vec::new(), BigEndian),
            bits_to_write: 0,
            references: Vec::new(),
        }
    }

    pub fn store_bit(&mut self, val: bool) -> Result<&mut Self, TonCellError> {
        self.ensure_bits_fit(1)?;
        self.bit_writer.write_bit(val).map_cell_builder_error()?;
        self.bits_to_write += 1;
        Ok(self)
    }

    pub fn store_u8(&mut self, bit_len: usize, val: u8) -> Result<&mut Self, TonCellError> {
        self.store_number(bit_len, val)
    }

    pub fn store_u16(&mut self, bit_len: usize, val: u16) -> Result<&mut Self, TonCellError> {
        self.store_number(bit_len, val)
    }

    pub fn store_u32(&mut self, bit_len: usize, val: u32) -> Result<&mut Self, TonCellError> {
        self.store_number(bit_len, val)
    }

    pub fn store_u64(&mut self, bit_len: usize, val: u64) -> Result<&mut Self, TonCellError> {
        self.store_number(bit_len, val)
    }

    pub fn store_byte(&mut self, val: u8) -> Result<&mut Self, TonCellError> {
        self.store_u8(8, val)
    }

    pub fn store_slice(&mut self, slice: &[u8]) -> Result<&mut Self, TonCellError> {
        self.ensure_bits_fit(slice.len() * 8)?;
        self.bit_writer
            .write_bytes(slice)
            .map_cell_builder_error()?;
        self.bits_to_write += slice.len() * 8;
        Ok(self)
    }

    pub fn store_string(&mut self, val: &str) -> Result<&mut Self, TonCellError> {
        self.store_slice(val.as_bytes())
    }

    /// Stores `addr_std$10 anycast:nothing workchain_id:int8 address:bits256`.
    ///
    /// Always takes [`crate::types::STD_ADDRESS_BIT_LEN`] bits, the null address included.
    pub fn store_address(&mut self, val: &TonAddress) -> Result<&mut Self, TonCellError> {
        let workchain = i8::try_from(val.workchain).map_err(|_| {
            TonCellError::cell_builder_error(format!(
                "Workchain {} does not fit into int8",
                val.workchain
            ))
        })?;
        self.ensure_bits_fit(crate::types::STD_ADDRESS_BIT_LEN)?;
        self.store_u8(2, 0b10)?;
        self.store_bit(false)?;
        self.store_u8(8, workchain as u8)?;
        self.store_slice(&val.hash_part)
    }

    /// Stores a string in snake format: as many whole bytes as fit here,
    /// the rest in a chain of single-reference child cells.
    pub fn store_snake_string(&mut self, val: &str) -> Result<&mut Self, TonCellError> {
        let bytes = val.as_bytes();
        let head_len = (self.remaining_bits() / 8).min(bytes.len());
        let (head, tail) = bytes.split_at(head_len);
        self.store_slice(head)?;
        if !tail.is_empty() {
            let tail_cell = build_snake_chain(tail)?;
            self.store_child(tail_cell)?;
        }
        Ok(self)
    }

    /// Stores a reference to a fresh cell holding `val` in snake format.
    pub fn store_string_ref_tail(&mut self, val: &str) -> Result<&mut Self, TonCellError> {
        let cell = CellBuilder::new().store_snake_string(val)?.build()?;
        self.store_child(cell)
    }

    /// Adds reference to an existing `Cell`.
    pub fn store_reference(&mut self, cell: &ArcCell) -> Result<&mut Self, TonCellError> {
        if self.references.len() >= MAX_CELL_REFERENCES {
            return Err(TonCellError::cell_builder_error(format!(
                "Cell must contain at most {} references, got {}",
                MAX_CELL_REFERENCES,
                self.references.len() + 1
            )));
        }
        self.references.push(cell.clone());
        Ok(self)
    }

    pub fn store_references(&mut self, refs: &[ArcCell]) -> Result<&mut Self, TonCellError> {
        for r in refs {
            self.store_reference(r)?;
        }
        Ok(self)
    }

    /// Adds a reference to a newly constructed `Cell`.
    pub fn store_child(&mut self, cell: Cell) -> Result<&mut Self, TonCellError> {
        self.store_reference(&Arc::new(cell))
    }

    pub fn bit_len(&self) -> usize {
        self.bits_to_write
    }

    pub fn remaining_bits(&self) -> usize {
        MAX_CELL_BITS - self.bits_to_write
    }

    pub fn remaining_refs(&self) -> usize {
        MAX_CELL_REFERENCES - self.references.len()
    }

    /// Finalizes the accumulated bits and references into a [`Cell`].
    ///
    /// The builder is left empty.
    pub fn build(&mut self) -> Result<Cell, TonCellError> {
        let bit_len = mem::take(&mut self.bits_to_write);
        let references = mem::take(&mut self.references);
        let mut writer = mem::replace(
            &mut self.bit_writer,
            BitWriter::endian(Vec::new(), BigEndian),
        );
        writer.byte_align().map_cell_builder_error()?;
        Cell::new(writer.into_writer(), bit_len, references)
    }

    fn store_number<N: Numeric>(
        &mut self,
        bit_len: usize,
        val: N,
    ) -> Result<&mut Self, TonCellError> {
        self.ensure_bits_fit(bit_len)?;
        self.bit_writer
            .write(bit_len as u32, val)
            .map_cell_builder_error()?;
        self.bits_to_write += bit_len;
        Ok(self)
    }

    fn ensure_bits_fit(&self, bit_len: usize) -> Result<(), TonCellError> {
        if self.bits_to_write + bit_len > MAX_CELL_BITS {
            return Err(TonCellError::cell_builder_error(format!(
                "Cell must contain at most {} bits, got {}",
                MAX_CELL_BITS,
                self.bits_to_write + bit_len
            )));
        }
        Ok(())
    }
}

fn build_snake_chain(bytes: &[u8]) -> Result<Cell, TonCellError> {
    const BYTES_PER_CELL: usize = MAX_CELL_BITS / 8;
    let mut chunks = bytes.chunks(BYTES_PER_CELL).rev();
    let last = chunks.next().unwrap_or_default();
    let mut cell = CellBuilder::new().store_slice(last)?.build()?;
    for chunk in chunks {
        cell = CellBuilder::new()
            .store_slice(chunk)?
            .store_child(cell)?
            .build()?;
    }
    Ok(cell)
}

impl Default for CellBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use crate::cell::{CellBuilder, TonCellError, MAX_CELL_BITS};
    use crate::types::STD_ADDRESS_BIT_LEN;
    use crate::TonAddress;

    #[test]
    fn write_numbers() -> Result<(), TonCellError> {
        let cell = CellBuilder::new()
            .store_bit(true)?
            .store_u8(7, 0x55)?
            .store_u32(32, 0xFAD45AAD)?
            .store_u64(64, 0)?
            .build()?;
        assert_eq!(cell.bit_len(), 104);
        assert_eq!(
            cell.data(),
            [0xD5, 0xFA, 0xD4, 0x5A, 0xAD, 0, 0, 0, 0, 0, 0, 0, 0]
        );
        Ok(())
    }

    #[test]
    fn write_address() -> Result<(), TonCellError> {
        let addr = TonAddress::from_base64_url("EQDk2VTvn04SUKJrW7rXahzdF8_Qi6utb0wj43InCu9vdjrR")
            .unwrap();
        let cell = CellBuilder::new().store_address(&addr)?.build()?;
        assert_eq!(
            cell.data(),
            [
                128, 28, 155, 42, 157, 243, 233, 194, 74, 20, 77, 107, 119, 90, 237, 67, 155, 162,
                249, 250, 17, 117, 117, 173, 233, 132, 124, 110, 68, 225, 93, 237, 238, 192
            ]
        );
        assert_eq!(cell.bit_len(), STD_ADDRESS_BIT_LEN);
        Ok(())
    }

    #[test]
    fn address_workchain_must_fit_int8() -> Result<(), TonCellError> {
        let mut builder = CellBuilder::new();
        assert!(builder.store_address(&TonAddress::new(128, &[1; 32])).is_err());
        assert_eq!(builder.bit_len(), 0);
        builder.store_address(&TonAddress::new(-128, &[1; 32]))?;
        let cell = builder.build()?;
        assert_eq!(cell.parser().load_address()?.workchain, -128);
        Ok(())
    }

    #[test]
    fn overflow_is_rejected_before_writing() -> Result<(), TonCellError> {
        let mut builder = CellBuilder::new();
        builder.store_slice(&[0xAA; 127])?;
        assert_eq!(builder.remaining_bits(), MAX_CELL_BITS - 1016);
        assert!(builder.store_u8(8, 1).is_err());
        assert_eq!(builder.bit_len(), 1016);
        builder.store_u8(7, 1)?;
        assert!(builder.store_bit(true).is_err());
        assert_eq!(builder.build()?.bit_len(), MAX_CELL_BITS);
        Ok(())
    }

    #[test]
    fn address_does_not_fit_into_fourth_slot() -> Result<(), TonCellError> {
        let mut builder = CellBuilder::new();
        for _ in 0..3 {
            builder.store_address(&TonAddress::NULL)?;
        }
        assert!(builder.remaining_bits() < STD_ADDRESS_BIT_LEN);
        assert!(builder.store_address(&TonAddress::NULL).is_err());
        assert_eq!(builder.bit_len(), 3 * STD_ADDRESS_BIT_LEN);
        Ok(())
    }

    #[test]
    fn fifth_reference_is_rejected() -> Result<(), TonCellError> {
        let child = CellBuilder::new().build()?.to_arc();
        let mut builder = CellBuilder::new();
        builder.store_references(&[child.clone(), child.clone(), child.clone(), child.clone()])?;
        assert_eq!(builder.remaining_refs(), 0);
        assert!(builder.store_reference(&child).is_err());
        Ok(())
    }

    #[test]
    fn build_empties_the_builder() -> Result<(), TonCellError> {
        let mut builder = CellBuilder::new();
        let first = builder.store_u32(32, 7)?.build()?;
        let second = builder.build()?;
        assert_eq!(first.bit_len(), 32);
        assert_eq!(second.bit_len(), 0);
        Ok(())
    }

    #[test]
    fn string_ref_tail() -> Result<(), TonCellError> {
        let cell = CellBuilder::new().store_string_ref_tail("yep")?.build()?;
        assert_eq!(cell.bit_len(), 0);
        let tail = cell.reference(0)?;
        assert_eq!(tail.data(), b"yep");
        assert_eq!(tail.load_snake_string()?, "yep");
        Ok(())
    }

    #[test]
    fn long_snake_string_chains_full_cells() -> Result<(), TonCellError> {
        let text = "x".repeat(300);
        let cell = CellBuilder::new().store_snake_string(&text)?.build()?;
        assert_eq!(cell.data().len(), 127);
        let second = cell.reference(0)?;
        assert_eq!(second.data().len(), 127);
        let third = second.reference(0)?;
        assert_eq!(third.data().len(), 46);
        assert!(third.references().is_empty());
        assert_eq!(cell.load_snake_string()?, text);
        Ok(())
    }
}
