use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::cell::raw::{RawBagOfCells, RawCell};
use crate::cell::*;
use crate::TonHash;

/// Set of root cells together with every cell reachable from them.
#[derive(PartialEq, Eq, Debug, Clone, Hash)]
pub struct BagOfCells {
    pub roots: Vec<ArcCell>,
}

impl BagOfCells {
    pub fn new(roots: &[ArcCell]) -> BagOfCells {
        BagOfCells {
            roots: roots.to_vec(),
        }
    }

    pub fn from_root(root: Cell) -> BagOfCells {
        BagOfCells {
            roots: vec![Arc::new(root)],
        }
    }

    pub fn num_roots(&self) -> usize {
        self.roots.len()
    }

    pub fn root(&self, idx: usize) -> Result<&ArcCell, TonCellError> {
        self.roots.get(idx).ok_or_else(|| {
            TonCellError::boc_deserialization_error(format!(
                "Invalid root index: {}, BoC contains {} roots",
                idx,
                self.roots.len()
            ))
        })
    }

    pub fn single_root(mut self) -> Result<ArcCell, TonCellError> {
        match (self.roots.pop(), self.roots.len()) {
            (Some(root), 0) => Ok(root),
            (popped, rest) => Err(TonCellError::CellParserError(format!(
                "Single root expected, got {}",
                rest + usize::from(popped.is_some())
            ))),
        }
    }

    pub fn parse(serial: &[u8]) -> Result<BagOfCells, TonCellError> {
        let raw = RawBagOfCells::parse(serial)?;
        let num_cells = raw.cells.len();
        let mut cells: Vec<ArcCell> = Vec::with_capacity(num_cells);

        // children always follow their parents, so build from the tail
        for (cell_index, raw_cell) in raw.cells.into_iter().enumerate().rev() {
            let mut references = Vec::with_capacity(raw_cell.references.len());
            for ref_index in &raw_cell.references {
                if *ref_index <= cell_index || *ref_index >= num_cells {
                    return Err(TonCellError::boc_deserialization_error(format!(
                        "Cell {} has invalid reference {}",
                        cell_index, ref_index
                    )));
                }
                references.push(cells[num_cells - 1 - ref_index].clone());
            }

            let cell = Cell::new(raw_cell.data, raw_cell.bit_len, references)
                .map_boc_deserialization_error()?;
            cells.push(cell.to_arc());
        }

        let roots = raw
            .roots
            .into_iter()
            .map(|r| Arc::clone(&cells[num_cells - 1 - r]))
            .collect();

        Ok(BagOfCells { roots })
    }

    pub fn parse_hex(hex: &str) -> Result<BagOfCells, TonCellError> {
        let str: String = hex.chars().filter(|c| !c.is_whitespace()).collect();
        let bin = hex::decode(str.as_str()).map_boc_deserialization_error()?;
        Self::parse(&bin)
    }

    pub fn parse_base64(base64: &str) -> Result<BagOfCells, TonCellError> {
        let bin = STANDARD.decode(base64).map_boc_deserialization_error()?;
        Self::parse(&bin)
    }

    pub fn serialize(&self, has_crc32: bool) -> Result<Vec<u8>, TonCellError> {
        if self.roots.is_empty() {
            return Err(TonCellError::boc_serialization_error(
                "BoC must contain at least one root",
            ));
        }
        self.to_raw().serialize(has_crc32)
    }

    pub fn to_hex(&self, has_crc32: bool) -> Result<String, TonCellError> {
        Ok(hex::encode(self.serialize(has_crc32)?))
    }

    pub fn to_base64(&self, has_crc32: bool) -> Result<String, TonCellError> {
        Ok(STANDARD.encode(self.serialize(has_crc32)?))
    }

    /// Deduplicates cells by hash and orders them so every parent precedes its children.
    fn to_raw(&self) -> RawBagOfCells {
        let mut post_order: Vec<ArcCell> = Vec::new();
        let mut visited: HashSet<TonHash> = HashSet::new();
        for root in &self.roots {
            visit_post_order(root, &mut visited, &mut post_order);
        }
        post_order.reverse();

        let index_by_hash: HashMap<TonHash, usize> = post_order
            .iter()
            .enumerate()
            .map(|(idx, cell)| (cell.cell_hash(), idx))
            .collect();

        let cells = post_order
            .iter()
            .map(|cell| RawCell {
                data: cell.data().to_vec(),
                bit_len: cell.bit_len(),
                references: cell
                    .references()
                    .iter()
                    .map(|r| index_by_hash[&r.cell_hash()])
                    .collect(),
            })
            .collect();
        let roots = self
            .roots
            .iter()
            .map(|r| index_by_hash[&r.cell_hash()])
            .collect();

        RawBagOfCells { cells, roots }
    }
}

fn visit_post_order(
    cell: &ArcCell,
    visited: &mut HashSet<TonHash>,
    out: &mut Vec<ArcCell>,
) {
    if !visited.insert(cell.cell_hash()) {
        return;
    }
    for reference in cell.references() {
        visit_post_order(reference, visited, out);
    }
    out.push(cell.clone());
}
