use std::fmt::{Debug, Formatter};
use std::sync::Arc;
use std::{fmt, ops::Deref};

use sha2::{Digest, Sha256};

pub use bag_of_cells::*;
pub use builder::*;
pub use error::*;
pub use parser::*;
pub use state_init::*;

use crate::TonHash;

mod bag_of_cells;
mod builder;
mod error;
mod parser;
mod raw;
mod state_init;

pub const MAX_CELL_BITS: usize = 1023;
pub const MAX_CELL_REFERENCES: usize = 4;

pub type ArcCell = Arc<Cell>;

/// Ordinary TON cell: up to 1023 data bits and up to 4 references.
///
/// Representation hash and depth are computed once, on construction.
#[derive(PartialEq, Eq, Clone, Hash)]
pub struct Cell {
    data: Vec<u8>,
    bit_len: usize,
    references: Vec<ArcCell>,
    hash: TonHash,
    depth: u16,
}

impl Cell {
    pub fn new(
        data: Vec<u8>,
        bit_len: usize,
        references: Vec<ArcCell>,
    ) -> Result<Self, TonCellError> {
        if bit_len > MAX_CELL_BITS {
            return Err(TonCellError::InvalidCellData(format!(
                "Cell must contain at most {} bits, got {}",
                MAX_CELL_BITS, bit_len
            )));
        }
        if references.len() > MAX_CELL_REFERENCES {
            return Err(TonCellError::InvalidCellData(format!(
                "Cell must contain at most {} references, got {}",
                MAX_CELL_REFERENCES,
                references.len()
            )));
        }
        if data.len() != bit_len.div_ceil(8) {
            return Err(TonCellError::InvalidCellData(format!(
                "Data of {} bytes can't hold exactly {} bits",
                data.len(),
                bit_len
            )));
        }

        let depth = references
            .iter()
            .map(|r| r.depth + 1)
            .max()
            .unwrap_or_default();
        let repr = representation(&data, bit_len, &references);
        let hash: TonHash = Sha256::digest(repr).into();

        Ok(Cell {
            data,
            bit_len,
            references,
            hash,
            depth,
        })
    }

    pub fn parser(&self) -> CellParser<'_> {
        CellParser::new(self.bit_len, &self.data, &self.references)
    }

    pub fn parse<F, T>(&self, parse: F) -> Result<T, TonCellError>
    where
        F: FnOnce(&mut CellParser) -> Result<T, TonCellError>,
    {
        let mut parser = self.parser();
        parse(&mut parser)
    }

    /// Same as [`Cell::parse`] but fails if any bits or references are left unread.
    pub fn parse_fully<F, T>(&self, parse: F) -> Result<T, TonCellError>
    where
        F: FnOnce(&mut CellParser) -> Result<T, TonCellError>,
    {
        let mut parser = self.parser();
        let res = parse(&mut parser)?;
        parser.ensure_empty()?;
        Ok(res)
    }

    pub fn reference(&self, idx: usize) -> Result<&ArcCell, TonCellError> {
        self.references.get(idx).ok_or(TonCellError::InvalidIndex {
            idx,
            ref_count: self.references.len(),
        })
    }

    pub fn data(&self) -> &[u8] {
        self.data.as_slice()
    }

    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    pub fn references(&self) -> &[ArcCell] {
        self.references.as_slice()
    }

    pub fn cell_hash(&self) -> TonHash {
        self.hash
    }

    pub fn cell_hash_hex(&self) -> String {
        hex::encode(self.hash)
    }

    pub fn cell_depth(&self) -> u16 {
        self.depth
    }

    pub fn to_arc(self) -> ArcCell {
        Arc::new(self)
    }

    /// Reads a string stored in snake format starting at this cell:
    /// whole bytes in every cell, continuation in the single reference.
    pub fn load_snake_string(&self) -> Result<String, TonCellError> {
        let mut buffer = Vec::new();
        let mut cell = self;
        loop {
            if cell.bit_len % 8 != 0 {
                return Err(TonCellError::cell_parser_error(format!(
                    "Snake cell must contain whole bytes, got {} bits",
                    cell.bit_len
                )));
            }
            buffer.extend_from_slice(&cell.data);
            match cell.references.as_slice() {
                [] => break,
                [next] => cell = next.deref(),
                refs => {
                    return Err(TonCellError::cell_parser_error(format!(
                        "Snake cell must have at most one reference, got {}",
                        refs.len()
                    )))
                }
            }
        }
        String::from_utf8(buffer).map_cell_parser_error()
    }
}

impl Default for Cell {
    fn default() -> Self {
        // the empty cell always satisfies the limits
        let repr = representation(&[], 0, &[]);
        Cell {
            data: vec![],
            bit_len: 0,
            references: vec![],
            hash: Sha256::digest(repr).into(),
            depth: 0,
        }
    }
}

impl Debug for Cell {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let completion_tag = if self.bit_len % 8 != 0 { "_" } else { "" };
        writeln!(
            f,
            "Cell {{ data: [{}{}], bit_len: {}, references: [",
            hex::encode_upper(&self.data),
            completion_tag,
            self.bit_len,
        )?;
        for reference in &self.references {
            writeln!(
                f,
                "    {}",
                format!("{:?}", reference).replace('\n', "\n    ")
            )?;
        }
        write!(f, "] }}")
    }
}

/// Standard cell representation, see https://docs.ton.org/tvm.pdf 3.1.4-3.1.5
fn representation(data: &[u8], bit_len: usize, references: &[ArcCell]) -> Vec<u8> {
    let mut repr = Vec::with_capacity(2 + data.len() + references.len() * (2 + 32));
    repr.push(references.len() as u8);
    repr.push(bits_descriptor(bit_len));
    repr.extend_from_slice(&padded_data(data, bit_len));
    for reference in references {
        repr.extend_from_slice(&reference.depth.to_be_bytes());
    }
    for reference in references {
        repr.extend_from_slice(&reference.hash);
    }
    repr
}

pub(crate) fn bits_descriptor(bit_len: usize) -> u8 {
    (bit_len / 8 + bit_len.div_ceil(8)) as u8
}

/// Data bytes with the completion tag set after the last bit of an incomplete byte.
pub(crate) fn padded_data(data: &[u8], bit_len: usize) -> Vec<u8> {
    let mut padded = data.to_vec();
    let rest_bits = bit_len % 8;
    if rest_bits != 0 {
        if let Some(last) = padded.last_mut() {
            *last |= 1 << (7 - rest_bits);
        }
    }
    padded
}
