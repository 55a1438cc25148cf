use crate::cell::{ArcCell, Cell, CellBuilder, MAX_CELL_BITS};
use crate::message::{TonMessageError, MAX_BATCH_MINT};
use crate::types::STD_ADDRESS_BIT_LEN;
use crate::TonAddress;

/// Whole addresses that fit into a single cell.
pub const ADDRESSES_PER_CELL: usize = MAX_CELL_BITS / STD_ADDRESS_BIT_LEN;

/// Packs `addresses` into a chain of cells, [`ADDRESSES_PER_CELL`] per cell,
/// each cell referencing the next one. Returns the head of the chain.
///
/// Fails before building anything if the batch is empty or longer than [`MAX_BATCH_MINT`].
pub fn pack_address_chain(addresses: &[TonAddress]) -> Result<Cell, TonMessageError> {
    check_batch_size(addresses.len())?;

    let head = addresses.chunks(ADDRESSES_PER_CELL).rev().try_fold(
        None,
        |next: Option<Cell>, chunk| -> Result<Option<Cell>, TonMessageError> {
            let mut builder = CellBuilder::new();
            for address in chunk {
                builder.store_address(address)?;
            }
            if let Some(next) = next {
                builder.store_child(next)?;
            }
            Ok(Some(builder.build()?))
        },
    )?;
    head.ok_or(TonMessageError::EmptyBatch)
}

/// Reads back the addresses stored by [`pack_address_chain`], in order.
pub fn unpack_address_chain(head: &Cell) -> Result<Vec<TonAddress>, TonMessageError> {
    let mut addresses = Vec::new();
    let mut next = read_chain_link(head, &mut addresses)?;
    while let Some(cell) = next {
        if addresses.len() > MAX_BATCH_MINT {
            break;
        }
        next = read_chain_link(&cell, &mut addresses)?;
    }
    check_batch_size(addresses.len())?;
    Ok(addresses)
}

fn read_chain_link(
    cell: &Cell,
    addresses: &mut Vec<TonAddress>,
) -> Result<Option<ArcCell>, TonMessageError> {
    let next = cell.parse_fully(|parser| {
        while parser.remaining_bits() >= STD_ADDRESS_BIT_LEN {
            addresses.push(parser.load_address()?);
        }
        match parser.remaining_refs() {
            0 => Ok(None),
            _ => parser.next_reference().map(Some),
        }
    })?;
    Ok(next)
}

pub(crate) fn check_batch_size(provided: usize) -> Result<(), TonMessageError> {
    if provided == 0 {
        Err(TonMessageError::EmptyBatch)
    } else if provided > MAX_BATCH_MINT {
        Err(TonMessageError::BatchSizeExceeded {
            max: MAX_BATCH_MINT,
            provided,
        })
    } else {
        Ok(())
    }
}
