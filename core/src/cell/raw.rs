use std::io::Cursor;

use bitstream_io::{BigEndian, BitWrite, BitWriter, ByteRead, ByteReader};
use crc::Crc;
use lazy_static::lazy_static;

use crate::cell::{MapTonCellError, TonCellError};

lazy_static! {
    pub static ref CRC_32_ISCSI: Crc<u32> = Crc::<u32>::new(&crc::CRC_32_ISCSI);
}

/// Raw representation of Cell.
///
/// References are stored as indices in BagOfCells.
#[derive(PartialEq, Eq, Debug, Clone)]
pub(crate) struct RawCell {
    pub(crate) data: Vec<u8>,
    pub(crate) bit_len: usize,
    pub(crate) references: Vec<usize>,
}

/// Raw representation of BagOfCells.
///
/// `cells` must be topologically sorted: a cell only references cells with greater indices.
#[derive(PartialEq, Eq, Debug, Clone)]
pub(crate) struct RawBagOfCells {
    pub(crate) cells: Vec<RawCell>,
    pub(crate) roots: Vec<usize>,
}

const GENERIC_BOC_MAGIC: u32 = 0xb5ee9c72;
const CRC_LEN: usize = 4;

impl RawBagOfCells {
    pub(crate) fn parse(serial: &[u8]) -> Result<RawBagOfCells, TonCellError> {
        let mut reader: ByteReader<Cursor<&[u8]>, BigEndian> =
            ByteReader::endian(Cursor::new(serial), BigEndian);
        // serialized_boc#b5ee9c72
        let magic = reader.read::<u32>().map_boc_deserialization_error()?;
        if magic != GENERIC_BOC_MAGIC {
            return Err(TonCellError::boc_deserialization_error(format!(
                "Unsupported cell magic number: {:#x}",
                magic
            )));
        }
        // has_idx:(## 1) has_crc32c:(## 1) has_cache_bits:(## 1) flags:(## 2) { flags = 0 }
        // size:(## 3) { size <= 4 }
        let header = reader.read::<u8>().map_boc_deserialization_error()?;
        let has_idx = (header >> 7) & 1 == 1;
        let has_crc32c = (header >> 6) & 1 == 1;
        let size = header & 0b0000_0111;
        if size == 0 || size > 4 {
            return Err(TonCellError::boc_deserialization_error(format!(
                "Invalid reference size: {}",
                size
            )));
        }
        if has_crc32c {
            verify_crc32c(serial)?;
        }

        // off_bytes:(## 8) { off_bytes <= 8 }
        let off_bytes = reader.read::<u8>().map_boc_deserialization_error()?;
        let cells = read_var_size(&mut reader, size)?;
        // roots:(##(size * 8)) { roots >= 1 }
        let roots = read_var_size(&mut reader, size)?;
        // absent:(##(size * 8)) { roots + absent <= cells }
        let absent = read_var_size(&mut reader, size)?;
        if roots == 0 || roots + absent > cells {
            return Err(TonCellError::boc_deserialization_error(format!(
                "Inconsistent header: {} cells, {} roots, {} absent",
                cells, roots, absent
            )));
        }
        let _tot_cells_size = read_var_size(&mut reader, off_bytes)?;

        let mut root_list = Vec::with_capacity(roots);
        for _ in 0..roots {
            let root = read_var_size(&mut reader, size)?;
            if root >= cells {
                return Err(TonCellError::boc_deserialization_error(format!(
                    "Root index {} out of range, BoC contains {} cells",
                    root, cells
                )));
            }
            root_list.push(root);
        }
        // index:has_idx?(cells * ##(off_bytes * 8))
        if has_idx {
            for _ in 0..cells {
                read_var_size(&mut reader, off_bytes)?;
            }
        }

        let mut cell_vec = Vec::with_capacity(cells);
        for _ in 0..cells {
            cell_vec.push(read_cell(&mut reader, size)?);
        }

        Ok(RawBagOfCells {
            cells: cell_vec,
            roots: root_list,
        })
    }

    pub(crate) fn serialize(&self, has_crc32: bool) -> Result<Vec<u8>, TonCellError> {
        let num_ref_bits = 32 - (self.cells.len() as u32).leading_zeros();
        let num_ref_bytes = num_ref_bits.div_ceil(8).max(1);

        let full_size: u32 = self
            .cells
            .iter()
            .map(|cell| raw_cell_size(cell, num_ref_bytes))
            .sum();
        let num_offset_bits = 32 - full_size.leading_zeros();
        let num_offset_bytes = num_offset_bits.div_ceil(8).max(1);

        let mut writer = BitWriter::endian(Vec::new(), BigEndian);
        writer
            .write(32, GENERIC_BOC_MAGIC)
            .map_boc_serialization_error()?;

        // has_idx, has_crc32c, has_cache_bits, flags
        writer.write_bit(false).map_boc_serialization_error()?;
        writer.write_bit(has_crc32).map_boc_serialization_error()?;
        writer.write_bit(false).map_boc_serialization_error()?;
        writer.write(2, 0u8).map_boc_serialization_error()?;
        writer
            .write(3, num_ref_bytes)
            .map_boc_serialization_error()?;
        writer
            .write(8, num_offset_bytes)
            .map_boc_serialization_error()?;
        writer
            .write(8 * num_ref_bytes, self.cells.len() as u32)
            .map_boc_serialization_error()?;
        writer
            .write(8 * num_ref_bytes, self.roots.len() as u32)
            .map_boc_serialization_error()?;
        // complete BoCs only
        writer
            .write(8 * num_ref_bytes, 0u32)
            .map_boc_serialization_error()?;
        writer
            .write(8 * num_offset_bytes, full_size)
            .map_boc_serialization_error()?;
        for root in &self.roots {
            writer
                .write(8 * num_ref_bytes, *root as u32)
                .map_boc_serialization_error()?;
        }

        for cell in &self.cells {
            write_raw_cell(&mut writer, cell, num_ref_bytes)?;
        }

        let mut bytes = writer.into_writer();
        if has_crc32 {
            let cs = CRC_32_ISCSI.checksum(bytes.as_slice());
            bytes.extend_from_slice(&cs.to_le_bytes());
        }
        Ok(bytes)
    }
}

fn verify_crc32c(serial: &[u8]) -> Result<(), TonCellError> {
    if serial.len() < CRC_LEN {
        return Err(TonCellError::boc_deserialization_error(
            "Serialized BoC is too short to contain crc32c",
        ));
    }
    let (payload, crc) = serial.split_at(serial.len() - CRC_LEN);
    let expected = CRC_32_ISCSI.checksum(payload).to_le_bytes();
    if crc != expected {
        return Err(TonCellError::boc_deserialization_error(format!(
            "crc32c mismatch: expected {}, got {}",
            hex::encode(expected),
            hex::encode(crc)
        )));
    }
    Ok(())
}

fn read_cell(
    reader: &mut ByteReader<Cursor<&[u8]>, BigEndian>,
    size: u8,
) -> Result<RawCell, TonCellError> {
    let d1 = reader.read::<u8>().map_boc_deserialization_error()?;
    let d2 = reader.read::<u8>().map_boc_deserialization_error()?;

    if d1 >> 3 != 0 {
        return Err(TonCellError::boc_deserialization_error(format!(
            "Exotic and higher level cells are not supported (d1: {:#04x})",
            d1
        )));
    }
    let ref_num = d1 & 0x07;
    let data_size = ((d2 >> 1) + (d2 & 1)).into();
    let full_bytes = (d2 & 0x01) == 0;

    let mut data = reader
        .read_to_vec(data_size)
        .map_boc_deserialization_error()?;

    let data_len = data.len();
    let padding_len = if data_len > 0 && !full_bytes {
        // strip the completion tag
        let num_zeros = data[data_len - 1].trailing_zeros();
        if num_zeros >= 8 {
            return Err(TonCellError::boc_deserialization_error(
                "Last byte of binary must not be zero if full_byte flag is not set",
            ));
        }
        data[data_len - 1] &= !(1 << num_zeros);
        num_zeros + 1
    } else {
        0
    };
    let bit_len = data.len() * 8 - padding_len as usize;
    let mut references: Vec<usize> = Vec::with_capacity(ref_num as usize);
    for _ in 0..ref_num {
        references.push(read_var_size(reader, size)?);
    }
    Ok(RawCell {
        data,
        bit_len,
        references,
    })
}

fn raw_cell_size(cell: &RawCell, ref_size_bytes: u32) -> u32 {
    let data_len = cell.bit_len.div_ceil(8);
    2 + data_len as u32 + cell.references.len() as u32 * ref_size_bytes
}

fn write_raw_cell(
    writer: &mut BitWriter<Vec<u8>, BigEndian>,
    cell: &RawCell,
    ref_size_bytes: u32,
) -> Result<(), TonCellError> {
    let d1 = cell.references.len() as u8;
    let d2 = crate::cell::bits_descriptor(cell.bit_len);
    let data = crate::cell::padded_data(&cell.data, cell.bit_len);

    writer.write(8, d1).map_boc_serialization_error()?;
    writer.write(8, d2).map_boc_serialization_error()?;
    writer.write_bytes(&data).map_boc_serialization_error()?;
    for r in &cell.references {
        writer
            .write(8 * ref_size_bytes, *r as u32)
            .map_boc_serialization_error()?;
    }
    Ok(())
}

fn read_var_size(
    reader: &mut ByteReader<Cursor<&[u8]>, BigEndian>,
    n: u8,
) -> Result<usize, TonCellError> {
    let bytes = reader
        .read_to_vec(n.into())
        .map_boc_deserialization_error()?;

    let mut result = 0;
    for &byte in &bytes {
        result <<= 8;
        result |= usize::from(byte);
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::{RawBagOfCells, RawCell};

    #[test]
    fn empty_cell_serialization() {
        let raw = RawBagOfCells {
            cells: vec![RawCell {
                data: vec![],
                bit_len: 0,
                references: vec![],
            }],
            roots: vec![0],
        };
        let serial = raw.serialize(false).unwrap();
        assert_eq!(hex::encode(&serial), "b5ee9c72010101010002000000");
        assert_eq!(RawBagOfCells::parse(&serial).unwrap(), raw);
    }

    #[test]
    fn crc32c_is_checked() {
        let raw = RawBagOfCells {
            cells: vec![RawCell {
                data: vec![0b1010_0000],
                bit_len: 3,
                references: vec![],
            }],
            roots: vec![0],
        };
        let mut serial = raw.serialize(true).unwrap();
        assert_eq!(RawBagOfCells::parse(&serial).unwrap(), raw);
        let last = serial.len() - 1;
        serial[last] ^= 0xff;
        assert!(RawBagOfCells::parse(&serial).is_err());
    }

    #[test]
    fn rejects_unknown_magic() {
        assert!(RawBagOfCells::parse(&[0x68, 0xff, 0x65, 0xf3, 0x01]).is_err());
        assert!(RawBagOfCells::parse(&[]).is_err());
    }
}
