use std::io::Cursor;

use bitstream_io::{BigEndian, BitRead, BitReader, Numeric};

use crate::cell::{ArcCell, MapTonCellError, TonCellError};
use crate::TonAddress;

/// Sequential reader over the bits and references of a single cell.
pub struct CellParser<'a> {
    bit_len: usize,
    consumed_bits: usize,
    bit_reader: BitReader<Cursor<&'a [u8]>, BigEndian>,
    references: &'a [ArcCell],
    next_ref: usize,
}

impl<'a> CellParser<'a> {
    pub(crate) fn new(bit_len: usize, data: &'a [u8], references: &'a [ArcCell]) -> Self {
        CellParser {
            bit_len,
            consumed_bits: 0,
            bit_reader: BitReader::endian(Cursor::new(data), BigEndian),
            references,
            next_ref: 0,
        }
    }

    pub fn remaining_bits(&self) -> usize {
        self.bit_len - self.consumed_bits
    }

    /// Return number of full bytes remaining
    pub fn remaining_bytes(&self) -> usize {
        self.remaining_bits() / 8
    }

    pub fn remaining_refs(&self) -> usize {
        self.references.len() - self.next_ref
    }

    pub fn load_bit(&mut self) -> Result<bool, TonCellError> {
        self.ensure_enough_bits(1)?;
        let bit = self.bit_reader.read_bit().map_cell_parser_error()?;
        self.consumed_bits += 1;
        Ok(bit)
    }

    pub fn load_u8(&mut self, bit_len: usize) -> Result<u8, TonCellError> {
        self.load_number(bit_len)
    }

    pub fn load_u16(&mut self, bit_len: usize) -> Result<u16, TonCellError> {
        self.load_number(bit_len)
    }

    pub fn load_u32(&mut self, bit_len: usize) -> Result<u32, TonCellError> {
        self.load_number(bit_len)
    }

    pub fn load_u64(&mut self, bit_len: usize) -> Result<u64, TonCellError> {
        self.load_number(bit_len)
    }

    pub fn load_byte(&mut self) -> Result<u8, TonCellError> {
        self.load_u8(8)
    }

    pub fn load_bytes(&mut self, num_bytes: usize) -> Result<Vec<u8>, TonCellError> {
        self.ensure_enough_bits(num_bytes * 8)?;
        let mut res = vec![0_u8; num_bytes];
        self.bit_reader
            .read_bytes(res.as_mut_slice())
            .map_cell_parser_error()?;
        self.consumed_bits += num_bytes * 8;
        Ok(res)
    }

    pub fn load_utf8(&mut self, num_bytes: usize) -> Result<String, TonCellError> {
        let bytes = self.load_bytes(num_bytes)?;
        String::from_utf8(bytes).map_cell_parser_error()
    }

    /// Loads `MsgAddress` restricted to `addr_none` and `addr_std` without anycast.
    ///
    /// `addr_none` is returned as [`TonAddress::NULL`].
    pub fn load_address(&mut self) -> Result<TonAddress, TonCellError> {
        match self.load_u8(2)? {
            0b00 => Ok(TonAddress::null()),
            0b10 => {
                if self.load_bit()? {
                    return Err(TonCellError::cell_parser_error(
                        "Anycast addresses are not supported",
                    ));
                }
                let workchain = self.load_u8(8)? as i8 as i32;
                let hash_part = self
                    .load_bytes(32)?
                    .as_slice()
                    .try_into()
                    .map_cell_parser_error()?;
                Ok(TonAddress::new(workchain, &hash_part))
            }
            tp => Err(TonCellError::InvalidAddressType(tp)),
        }
    }

    pub fn next_reference(&mut self) -> Result<ArcCell, TonCellError> {
        let reference = self
            .references
            .get(self.next_ref)
            .ok_or(TonCellError::InvalidIndex {
                idx: self.next_ref,
                ref_count: self.references.len(),
            })?;
        self.next_ref += 1;
        Ok(reference.clone())
    }

    pub fn ensure_empty(&self) -> Result<(), TonCellError> {
        let remaining_bits = self.remaining_bits();
        let remaining_refs = self.remaining_refs();
        if remaining_bits == 0 && remaining_refs == 0 {
            Ok(())
        } else {
            Err(TonCellError::NonEmptyReader {
                remaining_bits,
                remaining_refs,
            })
        }
    }

    fn load_number<N: Numeric>(&mut self, bit_len: usize) -> Result<N, TonCellError> {
        self.ensure_enough_bits(bit_len)?;
        let value = self
            .bit_reader
            .read::<N>(bit_len as u32)
            .map_cell_parser_error()?;
        self.consumed_bits += bit_len;
        Ok(value)
    }

    fn ensure_enough_bits(&self, bit_len: usize) -> Result<(), TonCellError> {
        if self.remaining_bits() < bit_len {
            return Err(TonCellError::cell_parser_error(format!(
                "Not enough bits to read: requested {}, remaining {}",
                bit_len,
                self.remaining_bits()
            )));
        }
        Ok(())
    }
}
