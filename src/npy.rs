// src/npy.rs

//! Reading and writing NumPy `.npy` files holding `float64` arrays.
//!
//! Layout of a file written by `numpy.save`:
//!
//! ```text
//! \x93NUMPY <major> <minor> <header_len: u16 LE (v1) | u32 LE (v2, v3)>
//! {'descr': '<f8', 'fortran_order': False, 'shape': (rows, cols), }   \n
//! <rows * cols little-endian f64 values>
//! ```
//!
//! The header is padded with spaces so the data starts on a 64-byte boundary.
//! Only arrays of rank 0, 1 or 2 are read; Fortran-ordered data is transposed
//! to row-major on load. Values are moved as raw bit patterns, so a
//! write-then-read round trip is bit-identical.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use log::debug;

use crate::error::{NpyError, Result};
use crate::matrix::Matrix;

const MAGIC: &[u8; 6] = b"\x93NUMPY";
const ALIGN: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ByteOrder {
    Little,
    Big,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Header {
    order: ByteOrder,
    fortran_order: bool,
    shape: Vec<usize>,
}

/// Finds `key` in the header dict and returns the text after its colon.
fn dict_value<'a>(header: &'a str, key: &str) -> std::result::Result<&'a str, NpyError> {
    let start = [format!("'{key}'"), format!("\"{key}\"")]
        .iter()
        .find_map(|quoted| header.find(quoted.as_str()).map(|i| i + quoted.len()))
        .ok_or_else(|| NpyError::Header(format!("missing key {key:?}")))?;

    header[start..]
        .trim_start()
        .strip_prefix(':')
        .map(str::trim_start)
        .ok_or_else(|| NpyError::Header(format!("expected ':' after {key:?}")))
}

fn parse_header(text: &str) -> std::result::Result<Header, NpyError> {
    let descr_value = dict_value(text, "descr")?;
    let quote = descr_value
        .chars()
        .next()
        .filter(|c| *c == '\'' || *c == '"')
        .ok_or_else(|| NpyError::Header("descr is not a string".into()))?;
    let descr = descr_value[1..]
        .split(quote)
        .next()
        .ok_or_else(|| NpyError::Header("unterminated descr".into()))?;
    let order = match descr {
        "<f8" => ByteOrder::Little,
        ">f8" => ByteOrder::Big,
        other => return Err(NpyError::UnsupportedDtype(other.to_string())),
    };

    let fortran_value = dict_value(text, "fortran_order")?;
    let fortran_order = if fortran_value.starts_with("True") {
        true
    } else if fortran_value.starts_with("False") {
        false
    } else {
        return Err(NpyError::Header("fortran_order is not a bool".into()));
    };

    let shape_value = dict_value(text, "shape")?;
    let close = shape_value
        .find(')')
        .filter(|_| shape_value.starts_with('('))
        .ok_or_else(|| NpyError::Header("shape is not a tuple".into()))?;
    let shape = shape_value[1..close]
        .split(',')
        .map(str::trim)
        .filter(|dim| !dim.is_empty())
        .map(|dim| {
            dim.parse::<usize>()
                .map_err(|_| NpyError::Header(format!("bad dimension {dim:?}")))
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;

    if shape.len() > 2 {
        return Err(NpyError::UnsupportedRank(shape.len()));
    }

    Ok(Header {
        order,
        fortran_order,
        shape,
    })
}

fn shape_literal(shape: &[usize]) -> String {
    match shape {
        [n] => format!("({n},)"),
        dims => format!(
            "({})",
            dims.iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        ),
    }
}

/// Reads one array from an `.npy` stream.
pub fn read<R: Read>(mut reader: R) -> std::result::Result<Matrix, NpyError> {
    let mut magic = [0u8; 6];
    reader.read_exact(&mut magic)?;
    if &magic != MAGIC {
        return Err(NpyError::BadMagic);
    }

    let mut version = [0u8; 2];
    reader.read_exact(&mut version)?;
    let header_len = match version[0] {
        1 => {
            let mut len = [0u8; 2];
            reader.read_exact(&mut len)?;
            u16::from_le_bytes(len) as usize
        }
        2 | 3 => {
            let mut len = [0u8; 4];
            reader.read_exact(&mut len)?;
            u32::from_le_bytes(len) as usize
        }
        major => {
            return Err(NpyError::UnsupportedVersion {
                major,
                minor: version[1],
            })
        }
    };

    let mut header_bytes = vec![0u8; header_len];
    reader.read_exact(&mut header_bytes)?;
    let header_text = match version[0] {
        3 => String::from_utf8(header_bytes)
            .map_err(|_| NpyError::Header("header is not valid UTF-8".into()))?,
        _ => header_bytes.iter().map(|&b| b as char).collect(),
    };
    let header = parse_header(&header_text)?;
    debug!("npy header {:?}", header);

    let count = header
        .shape
        .iter()
        .try_fold(1usize, |acc, &dim| acc.checked_mul(dim))
        .and_then(|n| n.checked_mul(8).map(|_| n))
        .ok_or_else(|| NpyError::Header("shape is too large".into()))?;

    let mut raw = Vec::new();
    reader.read_to_end(&mut raw)?;
    if raw.len() < count * 8 {
        return Err(NpyError::Truncated {
            expected: count * 8,
            actual: raw.len(),
        });
    }
    if raw.len() > count * 8 {
        return Err(NpyError::TrailingData(raw.len() - count * 8));
    }

    let mut data: Vec<f64> = raw
        .chunks_exact(8)
        .map(|chunk| {
            let mut bytes = [0u8; 8];
            bytes.copy_from_slice(chunk);
            match header.order {
                ByteOrder::Little => f64::from_le_bytes(bytes),
                ByteOrder::Big => f64::from_be_bytes(bytes),
            }
        })
        .collect();

    if header.fortran_order {
        if let [rows, cols] = header.shape[..] {
            data = (0..rows * cols)
                .map(|k| data[(k % cols) * rows + k / cols])
                .collect();
        }
    }

    Matrix::new(header.shape, data).map_err(|e| NpyError::Header(e.to_string()))
}

/// Writes `matrix` as a C-ordered little-endian `float64` array.
pub fn write<W: Write>(mut writer: W, matrix: &Matrix) -> std::result::Result<(), NpyError> {
    let dict = format!(
        "{{'descr': '<f8', 'fortran_order': False, 'shape': {}, }}",
        shape_literal(matrix.shape())
    );

    // Preamble is magic + version + length field; v2 only when v1's u16 overflows.
    let unpadded = MAGIC.len() + 2 + 2 + dict.len() + 1;
    let padded = unpadded.div_ceil(ALIGN) * ALIGN;
    let (major, len_field) = if padded - MAGIC.len() - 4 <= u16::MAX as usize {
        (1u8, 2usize)
    } else {
        (2u8, 4usize)
    };
    let total = (MAGIC.len() + 2 + len_field + dict.len() + 1).div_ceil(ALIGN) * ALIGN;
    let header_len = total - MAGIC.len() - 2 - len_field;

    let mut header = dict.into_bytes();
    header.resize(header_len - 1, b' ');
    header.push(b'\n');

    writer.write_all(MAGIC)?;
    writer.write_all(&[major, 0])?;
    match major {
        1 => writer.write_all(&(header_len as u16).to_le_bytes())?,
        _ => writer.write_all(&(header_len as u32).to_le_bytes())?,
    }
    writer.write_all(&header)?;
    for value in matrix.data() {
        writer.write_all(&value.to_le_bytes())?;
    }
    Ok(())
}

pub fn load(path: &Path) -> Result<Matrix> {
    let file = File::open(path)?;
    Ok(read(BufReader::new(file))?)
}

pub fn save(path: &Path, matrix: &Matrix) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write(&mut writer, matrix)?;
    writer.flush()?;
    Ok(())
}
