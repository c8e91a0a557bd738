//! FITS binary table extension reading, plus a small write path used to
//! build synthetic tables in tests.

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use crate::block::padded_byte_len;
use crate::error::{Error, Result};
use crate::hdu::{Hdu, HduInfo};
use crate::header::{find_string, serialize_header, Card};
use crate::value::Value;

/// The data type of a column in a FITS binary table.
///
/// Bit, complex, and variable-length (P/Q) columns are not decoded; their
/// TFORM codes parse to [`Error::UnsupportedColumn`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    /// L -- logical, stored as a single byte (T/F/0).
    Logical,
    /// B -- unsigned byte.
    Byte,
    /// I -- 16-bit signed integer.
    Short,
    /// J -- 32-bit signed integer.
    Int,
    /// K -- 64-bit signed integer.
    Long,
    /// E -- 32-bit IEEE float.
    Float,
    /// D -- 64-bit IEEE float.
    Double,
    /// A -- ASCII character.
    Ascii,
}

impl ColumnType {
    /// Bytes per single element.
    pub fn byte_size(&self) -> usize {
        match self {
            ColumnType::Logical | ColumnType::Byte | ColumnType::Ascii => 1,
            ColumnType::Short => 2,
            ColumnType::Int | ColumnType::Float => 4,
            ColumnType::Long | ColumnType::Double => 8,
        }
    }

    /// The TFORM type code character.
    pub fn tform_code(&self) -> char {
        match self {
            ColumnType::Logical => 'L',
            ColumnType::Byte => 'B',
            ColumnType::Short => 'I',
            ColumnType::Int => 'J',
            ColumnType::Long => 'K',
            ColumnType::Float => 'E',
            ColumnType::Double => 'D',
            ColumnType::Ascii => 'A',
        }
    }
}

/// Describes one column in a binary table.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDescriptor {
    /// Column name (from TTYPEn), if present.
    pub name: Option<String>,
    /// Repeat count from TFORMn.
    pub repeat: usize,
    /// The element data type.
    pub col_type: ColumnType,
}

impl ColumnDescriptor {
    /// A named scalar (repeat 1) column.
    pub fn scalar(name: &str, col_type: ColumnType) -> ColumnDescriptor {
        ColumnDescriptor {
            name: Some(String::from(name)),
            repeat: 1,
            col_type,
        }
    }

    /// Total bytes this column occupies per row.
    pub fn byte_width(&self) -> usize {
        self.repeat * self.col_type.byte_size()
    }
}

/// Column data extracted from a binary table, `repeat * nrows` elements in
/// row-major order.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Logical(Vec<bool>),
    Byte(Vec<u8>),
    Short(Vec<i16>),
    Int(Vec<i32>),
    Long(Vec<i64>),
    Float(Vec<f32>),
    Double(Vec<f64>),
    Ascii(Vec<String>),
}

impl ColumnData {
    /// Number of elements (for Ascii, number of cell strings).
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Logical(v) => v.len(),
            ColumnData::Byte(v) => v.len(),
            ColumnData::Short(v) => v.len(),
            ColumnData::Int(v) => v.len(),
            ColumnData::Long(v) => v.len(),
            ColumnData::Float(v) => v.len(),
            ColumnData::Double(v) => v.len(),
            ColumnData::Ascii(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Widen any numeric column to `f64`; `None` for logical/ASCII columns.
    pub fn into_f64(self) -> Option<Vec<f64>> {
        match self {
            ColumnData::Byte(v) => Some(v.into_iter().map(f64::from).collect()),
            ColumnData::Short(v) => Some(v.into_iter().map(f64::from).collect()),
            ColumnData::Int(v) => Some(v.into_iter().map(f64::from).collect()),
            ColumnData::Long(v) => Some(v.into_iter().map(|x| x as f64).collect()),
            ColumnData::Float(v) => Some(v.into_iter().map(f64::from).collect()),
            ColumnData::Double(v) => Some(v),
            ColumnData::Logical(_) | ColumnData::Ascii(_) => None,
        }
    }
}

/// Parse a TFORMn value like "1D", "10E", "20A".
pub fn parse_tform(s: &str) -> Result<(usize, ColumnType)> {
    let s = s.trim();
    if s.is_empty() {
        return Err(Error::InvalidValue);
    }

    let type_char = s.as_bytes()[s.len() - 1];
    let repeat_str = &s[..s.len() - 1];

    let repeat = if repeat_str.is_empty() {
        1
    } else {
        repeat_str
            .parse::<usize>()
            .map_err(|_| Error::InvalidValue)?
    };

    let col_type = match type_char {
        b'L' => ColumnType::Logical,
        b'B' => ColumnType::Byte,
        b'I' => ColumnType::Short,
        b'J' => ColumnType::Int,
        b'K' => ColumnType::Long,
        b'E' => ColumnType::Float,
        b'D' => ColumnType::Double,
        b'A' => ColumnType::Ascii,
        b'X' => return Err(Error::UnsupportedColumn("X (bit array)")),
        b'C' => return Err(Error::UnsupportedColumn("C (complex float)")),
        b'M' => return Err(Error::UnsupportedColumn("M (complex double)")),
        b'P' | b'Q' => return Err(Error::UnsupportedColumn("P/Q (variable-length array)")),
        _ => return Err(Error::InvalidValue),
    };

    Ok((repeat, col_type))
}

/// Extract column descriptors from the header cards of a binary table HDU.
pub fn parse_columns(cards: &[Card], tfields: usize) -> Result<Vec<ColumnDescriptor>> {
    let mut columns = Vec::with_capacity(tfields);

    for i in 1..=tfields {
        let tform_key = alloc::format!("TFORM{}", i);
        let tform_str = find_string(cards, &tform_key).ok_or(Error::MissingKeyword("TFORMn"))?;
        let (repeat, col_type) = parse_tform(&tform_str)?;

        let ttype_key = alloc::format!("TTYPE{}", i);
        let name = find_string(cards, &ttype_key);

        columns.push(ColumnDescriptor {
            name,
            repeat,
            col_type,
        });
    }

    Ok(columns)
}

/// Column descriptors of a binary table HDU.
pub fn columns_of(hdu: &Hdu) -> Result<Vec<ColumnDescriptor>> {
    match &hdu.info {
        HduInfo::BinaryTable { tfields, .. } => parse_columns(&hdu.cards, *tfields),
        _ => Err(Error::InvalidHeader("not a binary table HDU")),
    }
}

fn table_shape(fits_data: &[u8], hdu: &Hdu) -> Result<(usize, usize, Vec<ColumnDescriptor>)> {
    let (naxis1, naxis2, tfields) = match &hdu.info {
        HduInfo::BinaryTable {
            naxis1,
            naxis2,
            tfields,
            ..
        } => (*naxis1, *naxis2, *tfields),
        _ => return Err(Error::InvalidHeader("not a binary table HDU")),
    };

    if hdu.data_start + naxis1 * naxis2 > fits_data.len() {
        return Err(Error::UnexpectedEof);
    }

    let columns = parse_columns(&hdu.cards, tfields)?;

    let row_width: usize = columns.iter().map(|c| c.byte_width()).sum();
    if row_width > naxis1 {
        return Err(Error::InvalidHeader("TFORM widths exceed NAXIS1"));
    }

    Ok((naxis1, naxis2, columns))
}

fn read_i16_be(buf: &[u8]) -> i16 {
    i16::from_be_bytes([buf[0], buf[1]])
}

fn read_i32_be(buf: &[u8]) -> i32 {
    i32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]])
}

fn read_i64_be(buf: &[u8]) -> i64 {
    i64::from_be_bytes([
        buf[0], buf[1], buf[2], buf[3], buf[4], buf[5], buf[6], buf[7],
    ])
}

fn read_f32_be(buf: &[u8]) -> f32 {
    f32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]])
}

fn read_f64_be(buf: &[u8]) -> f64 {
    f64::from_be_bytes([
        buf[0], buf[1], buf[2], buf[3], buf[4], buf[5], buf[6], buf[7],
    ])
}

/// Read a single column from all rows of a binary table HDU.
///
/// `fits_data` is the complete file byte stream the HDU was parsed from.
pub fn read_column(fits_data: &[u8], hdu: &Hdu, col_index: usize) -> Result<ColumnData> {
    let (naxis1, naxis2, columns) = table_shape(fits_data, hdu)?;

    if col_index >= columns.len() {
        return Err(Error::InvalidValue);
    }

    let col_offset: usize = columns[..col_index].iter().map(|c| c.byte_width()).sum();
    let col = &columns[col_index];

    read_column_cells(fits_data, hdu.data_start, naxis1, naxis2, col, col_offset)
}

fn read_column_cells(
    fits_data: &[u8],
    data_start: usize,
    naxis1: usize,
    naxis2: usize,
    col: &ColumnDescriptor,
    col_offset: usize,
) -> Result<ColumnData> {
    let elem = col.col_type.byte_size();
    let cell = |row: usize, r: usize| data_start + row * naxis1 + col_offset + r * elem;

    match col.col_type {
        ColumnType::Logical => {
            let mut values = Vec::with_capacity(naxis2 * col.repeat);
            for row in 0..naxis2 {
                for r in 0..col.repeat {
                    values.push(fits_data[cell(row, r)] == b'T');
                }
            }
            Ok(ColumnData::Logical(values))
        }
        ColumnType::Byte => {
            let mut values = Vec::with_capacity(naxis2 * col.repeat);
            for row in 0..naxis2 {
                for r in 0..col.repeat {
                    values.push(fits_data[cell(row, r)]);
                }
            }
            Ok(ColumnData::Byte(values))
        }
        ColumnType::Short => {
            let mut values = Vec::with_capacity(naxis2 * col.repeat);
            for row in 0..naxis2 {
                for r in 0..col.repeat {
                    values.push(read_i16_be(&fits_data[cell(row, r)..]));
                }
            }
            Ok(ColumnData::Short(values))
        }
        ColumnType::Int => {
            let mut values = Vec::with_capacity(naxis2 * col.repeat);
            for row in 0..naxis2 {
                for r in 0..col.repeat {
                    values.push(read_i32_be(&fits_data[cell(row, r)..]));
                }
            }
            Ok(ColumnData::Int(values))
        }
        ColumnType::Long => {
            let mut values = Vec::with_capacity(naxis2 * col.repeat);
            for row in 0..naxis2 {
                for r in 0..col.repeat {
                    values.push(read_i64_be(&fits_data[cell(row, r)..]));
                }
            }
            Ok(ColumnData::Long(values))
        }
        ColumnType::Float => {
            let mut values = Vec::with_capacity(naxis2 * col.repeat);
            for row in 0..naxis2 {
                for r in 0..col.repeat {
                    values.push(read_f32_be(&fits_data[cell(row, r)..]));
                }
            }
            Ok(ColumnData::Float(values))
        }
        ColumnType::Double => {
            let mut values = Vec::with_capacity(naxis2 * col.repeat);
            for row in 0..naxis2 {
                for r in 0..col.repeat {
                    values.push(read_f64_be(&fits_data[cell(row, r)..]));
                }
            }
            Ok(ColumnData::Double(values))
        }
        ColumnType::Ascii => {
            let mut values = Vec::with_capacity(naxis2);
            for row in 0..naxis2 {
                let base = cell(row, 0);
                let bytes = &fits_data[base..base + col.repeat];
                let s = core::str::from_utf8(bytes)
                    .map_err(|_| Error::InvalidValue)?
                    .trim_end()
                    .into();
                values.push(s);
            }
            Ok(ColumnData::Ascii(values))
        }
    }
}

// ── Writing (synthetic tables for tests and tools) ──

/// Build the mandatory header cards for a binary table with the given
/// columns and row count. TTYPEn cards are emitted for named columns.
pub fn build_table_cards(
    columns: &[ColumnDescriptor],
    nrows: usize,
    extname: Option<&str>,
) -> Vec<Card> {
    let naxis1: usize = columns.iter().map(|c| c.byte_width()).sum();

    let mut cards = vec![
        Card::new("XTENSION", Value::String(String::from("BINTABLE"))),
        Card::new("BITPIX", Value::Integer(8)),
        Card::new("NAXIS", Value::Integer(2)),
        Card::new("NAXIS1", Value::Integer(naxis1 as i64)),
        Card::new("NAXIS2", Value::Integer(nrows as i64)),
        Card::new("PCOUNT", Value::Integer(0)),
        Card::new("GCOUNT", Value::Integer(1)),
        Card::new("TFIELDS", Value::Integer(columns.len() as i64)),
    ];

    for (i, col) in columns.iter().enumerate() {
        let tform = alloc::format!("{}{}", col.repeat, col.col_type.tform_code());
        cards.push(Card::new(
            &alloc::format!("TFORM{}", i + 1),
            Value::String(tform),
        ));
        if let Some(ref name) = col.name {
            cards.push(Card::new(
                &alloc::format!("TTYPE{}", i + 1),
                Value::String(name.clone()),
            ));
        }
    }

    if let Some(name) = extname {
        cards.push(Card::new("EXTNAME", Value::String(String::from(name))));
    }

    cards
}

fn write_cell(buf: &mut Vec<u8>, col: &ColumnDescriptor, data: &ColumnData, idx: usize) -> Result<()> {
    match (col.col_type, data) {
        (ColumnType::Logical, ColumnData::Logical(v)) => {
            buf.push(if v[idx] { b'T' } else { b'F' })
        }
        (ColumnType::Byte, ColumnData::Byte(v)) => buf.push(v[idx]),
        (ColumnType::Short, ColumnData::Short(v)) => buf.extend_from_slice(&v[idx].to_be_bytes()),
        (ColumnType::Int, ColumnData::Int(v)) => buf.extend_from_slice(&v[idx].to_be_bytes()),
        (ColumnType::Long, ColumnData::Long(v)) => buf.extend_from_slice(&v[idx].to_be_bytes()),
        (ColumnType::Float, ColumnData::Float(v)) => buf.extend_from_slice(&v[idx].to_be_bytes()),
        (ColumnType::Double, ColumnData::Double(v)) => {
            buf.extend_from_slice(&v[idx].to_be_bytes())
        }
        _ => return Err(Error::InvalidValue),
    }
    Ok(())
}

/// Serialize a complete binary table HDU (header plus padded data) from
/// per-column data. Each `ColumnData` must hold `nrows * repeat` elements;
/// ASCII columns are not written.
pub fn serialize_table_hdu(
    columns: &[ColumnDescriptor],
    data: &[ColumnData],
    nrows: usize,
    extname: Option<&str>,
) -> Result<Vec<u8>> {
    if columns.len() != data.len() {
        return Err(Error::InvalidValue);
    }
    for (col, d) in columns.iter().zip(data) {
        if d.len() != nrows * col.repeat {
            return Err(Error::InvalidValue);
        }
    }

    let cards = build_table_cards(columns, nrows, extname);
    let mut bytes = serialize_header(&cards);

    let naxis1: usize = columns.iter().map(|c| c.byte_width()).sum();
    let data_len = naxis1 * nrows;
    let mut table = Vec::with_capacity(data_len);
    for row in 0..nrows {
        for (col, d) in columns.iter().zip(data) {
            for r in 0..col.repeat {
                write_cell(&mut table, col, d, row * col.repeat + r)?;
            }
        }
    }

    bytes.extend_from_slice(&table);
    bytes.resize(bytes.len() + padded_byte_len(data_len) - data_len, 0u8);
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hdu::parse_fits;
    use crate::header::serialize_header;
    use alloc::string::ToString;

    fn empty_primary() -> Vec<u8> {
        serialize_header(&[
            Card::new("SIMPLE", Value::Logical(true)),
            Card::new("BITPIX", Value::Integer(8)),
            Card::new("NAXIS", Value::Integer(0)),
        ])
    }

    #[test]
    fn tform_scalar_double() {
        assert_eq!(parse_tform("1D").unwrap(), (1, ColumnType::Double));
        assert_eq!(parse_tform("D").unwrap(), (1, ColumnType::Double));
    }

    #[test]
    fn tform_repeat_counts() {
        assert_eq!(parse_tform("10E").unwrap(), (10, ColumnType::Float));
        assert_eq!(parse_tform("20A").unwrap(), (20, ColumnType::Ascii));
        assert_eq!(parse_tform(" 3J ").unwrap(), (3, ColumnType::Int));
    }

    #[test]
    fn tform_unsupported_codes() {
        assert!(matches!(
            parse_tform("1PB(200)"),
            Err(Error::InvalidValue) | Err(Error::UnsupportedColumn(_))
        ));
        assert!(matches!(
            parse_tform("1X"),
            Err(Error::UnsupportedColumn(_))
        ));
        assert!(matches!(
            parse_tform("1M"),
            Err(Error::UnsupportedColumn(_))
        ));
    }

    #[test]
    fn tform_garbage() {
        assert!(parse_tform("").is_err());
        assert!(parse_tform("xyzD?").is_err());
    }

    #[test]
    fn roundtrip_double_columns() {
        let columns = [
            ColumnDescriptor::scalar("WAVELENGTH", ColumnType::Double),
            ColumnDescriptor::scalar("FLUX", ColumnType::Double),
        ];
        let wl = vec![1.0, 2.0, 3.0];
        let flux = vec![10.0, 20.0, 30.0];
        let data = [
            ColumnData::Double(wl.clone()),
            ColumnData::Double(flux.clone()),
        ];

        let mut bytes = empty_primary();
        bytes.extend_from_slice(
            &serialize_table_hdu(&columns, &data, 3, Some("EXTRACT1D")).unwrap(),
        );

        let fits = parse_fits(&bytes).unwrap();
        let hdu = fits.find_by_name("EXTRACT1D").unwrap();

        assert_eq!(read_column(&bytes, hdu, 0).unwrap(), ColumnData::Double(wl));
        assert_eq!(
            read_column(&bytes, hdu, 1).unwrap(),
            ColumnData::Double(flux)
        );
    }

    #[test]
    fn roundtrip_mixed_types() {
        let columns = [
            ColumnDescriptor::scalar("IDX", ColumnType::Int),
            ColumnDescriptor::scalar("GOOD", ColumnType::Logical),
            ColumnDescriptor::scalar("SNR", ColumnType::Float),
        ];
        let data = [
            ColumnData::Int(vec![1, 2]),
            ColumnData::Logical(vec![true, false]),
            ColumnData::Float(vec![0.5, 1.5]),
        ];

        let mut bytes = empty_primary();
        bytes.extend_from_slice(&serialize_table_hdu(&columns, &data, 2, None).unwrap());

        let fits = parse_fits(&bytes).unwrap();
        let hdu = fits.get(1).unwrap();

        assert_eq!(
            read_column(&bytes, hdu, 0).unwrap(),
            ColumnData::Int(vec![1, 2])
        );
        assert_eq!(
            read_column(&bytes, hdu, 1).unwrap(),
            ColumnData::Logical(vec![true, false])
        );
        assert_eq!(
            read_column(&bytes, hdu, 2).unwrap(),
            ColumnData::Float(vec![0.5, 1.5])
        );
    }

    #[test]
    fn columns_of_reports_names_in_order() {
        let columns = [
            ColumnDescriptor::scalar("WAVELENGTH", ColumnType::Double),
            ColumnDescriptor::scalar("FLUX", ColumnType::Double),
            ColumnDescriptor::scalar("FLUX_ERROR", ColumnType::Double),
        ];
        let data = [
            ColumnData::Double(vec![1.0]),
            ColumnData::Double(vec![2.0]),
            ColumnData::Double(vec![3.0]),
        ];

        let mut bytes = empty_primary();
        bytes.extend_from_slice(
            &serialize_table_hdu(&columns, &data, 1, Some("EXTRACT1D")).unwrap(),
        );

        let fits = parse_fits(&bytes).unwrap();
        let hdu = fits.get(1).unwrap();
        let names: Vec<String> = columns_of(hdu)
            .unwrap()
            .into_iter()
            .filter_map(|c| c.name)
            .collect();
        assert_eq!(
            names,
            vec![
                "WAVELENGTH".to_string(),
                "FLUX".to_string(),
                "FLUX_ERROR".to_string()
            ]
        );
    }

    #[test]
    fn read_column_out_of_range() {
        let columns = [ColumnDescriptor::scalar("A", ColumnType::Double)];
        let data = [ColumnData::Double(vec![1.0])];
        let mut bytes = empty_primary();
        bytes.extend_from_slice(&serialize_table_hdu(&columns, &data, 1, None).unwrap());

        let fits = parse_fits(&bytes).unwrap();
        let hdu = fits.get(1).unwrap();
        assert!(read_column(&bytes, hdu, 5).is_err());
    }

    #[test]
    fn into_f64_widens_numeric_types() {
        assert_eq!(
            ColumnData::Short(vec![1, -2]).into_f64(),
            Some(vec![1.0, -2.0])
        );
        assert_eq!(
            ColumnData::Float(vec![0.5]).into_f64(),
            Some(vec![0.5])
        );
        assert!(ColumnData::Ascii(vec!["x".to_string()]).into_f64().is_none());
        assert!(ColumnData::Logical(vec![true]).into_f64().is_none());
    }

    #[test]
    fn serialize_rejects_length_mismatch() {
        let columns = [ColumnDescriptor::scalar("A", ColumnType::Double)];
        let data = [ColumnData::Double(vec![1.0, 2.0])];
        assert!(serialize_table_hdu(&columns, &data, 1, None).is_err());
    }

    #[test]
    fn columns_of_non_table_is_error() {
        let bytes = empty_primary();
        let fits = parse_fits(&bytes).unwrap();
        assert!(columns_of(fits.primary()).is_err());
    }
}
