//! HDU walking: splitting a FITS byte stream into header/data units.

use alloc::string::String;
use alloc::vec::Vec;

use crate::block::{padded_byte_len, BLOCK_SIZE};
use crate::error::{Error, Result};
use crate::header::{
    find_integer, find_logical, find_string, header_byte_len, parse_header_blocks, Card,
};

/// Describes the kind and shape of data in a single HDU.
#[derive(Debug, Clone, PartialEq)]
pub enum HduInfo {
    /// Primary HDU containing image data (possibly empty, NAXIS=0).
    Primary {
        /// BITPIX value (8, 16, 32, 64, -32, -64).
        bitpix: i64,
        /// Axis dimensions (NAXIS1, NAXIS2, ...).
        naxes: Vec<usize>,
    },
    /// Image extension (XTENSION = 'IMAGE').
    Image {
        /// BITPIX value.
        bitpix: i64,
        /// Axis dimensions.
        naxes: Vec<usize>,
    },
    /// ASCII table extension (XTENSION = 'TABLE'), recognized structurally
    /// only; the data payload is not decoded.
    AsciiTable {
        /// Row width in bytes.
        naxis1: usize,
        /// Number of rows.
        naxis2: usize,
        /// Number of columns.
        tfields: usize,
    },
    /// Binary table extension (XTENSION = 'BINTABLE').
    BinaryTable {
        /// Row width in bytes.
        naxis1: usize,
        /// Number of rows.
        naxis2: usize,
        /// Size of the variable-length array heap in bytes.
        pcount: usize,
        /// Number of columns.
        tfields: usize,
    },
}

impl HduInfo {
    /// Short human-readable kind label ("Primary", "Image", ...).
    pub fn kind(&self) -> &'static str {
        match self {
            HduInfo::Primary { .. } => "Primary",
            HduInfo::Image { .. } => "Image",
            HduInfo::AsciiTable { .. } => "AsciiTable",
            HduInfo::BinaryTable { .. } => "BinaryTable",
        }
    }

    /// Axis dimensions in file order. Tables report `[naxis1, naxis2]`.
    pub fn dimensions(&self) -> Vec<usize> {
        match self {
            HduInfo::Primary { naxes, .. } | HduInfo::Image { naxes, .. } => naxes.clone(),
            HduInfo::AsciiTable { naxis1, naxis2, .. }
            | HduInfo::BinaryTable { naxis1, naxis2, .. } => {
                let mut dims = Vec::with_capacity(2);
                dims.push(*naxis1);
                dims.push(*naxis2);
                dims
            }
        }
    }
}

/// A single Header Data Unit parsed from a FITS byte stream.
#[derive(Debug, Clone)]
pub struct Hdu {
    /// Parsed metadata describing the HDU type and shape.
    pub info: HduInfo,
    /// Byte offset where the header begins in the FITS stream.
    pub header_start: usize,
    /// Byte offset where the data segment begins.
    pub data_start: usize,
    /// Length of the data segment in bytes (unpadded).
    pub data_len: usize,
    /// All header cards parsed from this HDU.
    pub cards: Vec<Card>,
}

impl Hdu {
    /// The EXTNAME of this HDU, if present.
    pub fn name(&self) -> Option<String> {
        find_string(&self.cards, "EXTNAME")
    }
}

/// A collection of HDUs parsed from a complete FITS file.
#[derive(Debug, Clone)]
pub struct FitsData {
    /// All HDUs in the file, with the primary HDU at index 0.
    pub hdus: Vec<Hdu>,
}

impl FitsData {
    /// Returns the primary (first) HDU.
    pub fn primary(&self) -> &Hdu {
        &self.hdus[0]
    }

    /// Returns the HDU at the given index, or `None` if out of bounds.
    pub fn get(&self, index: usize) -> Option<&Hdu> {
        self.hdus.get(index)
    }

    /// Finds the first HDU whose EXTNAME matches `name`.
    ///
    /// EXTNAME values are matched case-insensitively; the standard treats
    /// them as case-blind and writers disagree on capitalization.
    pub fn find_by_name(&self, name: &str) -> Option<&Hdu> {
        self.hdus
            .iter()
            .find(|hdu| hdu.name().is_some_and(|n| n.eq_ignore_ascii_case(name)))
    }

    /// Iterates over all HDUs whose EXTNAME matches `name` (case-insensitive),
    /// with their file indices, in file order. JWST time-series products
    /// repeat the same EXTNAME once per integration.
    pub fn find_all_by_name<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = (usize, &'a Hdu)> + 'a {
        self.hdus
            .iter()
            .enumerate()
            .filter(move |(_, hdu)| hdu.name().is_some_and(|n| n.eq_ignore_ascii_case(name)))
    }

    /// Returns the number of HDUs.
    pub fn len(&self) -> usize {
        self.hdus.len()
    }

    /// Returns `true` if the file contains no HDUs.
    pub fn is_empty(&self) -> bool {
        self.hdus.is_empty()
    }

    /// Iterates over all HDUs in order.
    pub fn iter(&self) -> impl Iterator<Item = &Hdu> {
        self.hdus.iter()
    }
}

fn is_primary_hdu(cards: &[Card]) -> bool {
    cards
        .first()
        .map(|c| c.keyword_str() == "SIMPLE")
        .unwrap_or(false)
}

fn read_naxes(cards: &[Card]) -> Result<Vec<usize>> {
    let naxis = find_integer(cards, "NAXIS").ok_or(Error::MissingKeyword("NAXIS"))? as usize;
    let mut naxes = Vec::with_capacity(naxis);
    for i in 1..=naxis {
        let kw = alloc::format!("NAXIS{}", i);
        let dim = find_integer(cards, &kw).ok_or(Error::MissingKeyword("NAXISn"))? as usize;
        naxes.push(dim);
    }
    Ok(naxes)
}

fn compute_data_byte_len(cards: &[Card], is_primary: bool) -> Result<usize> {
    let bitpix = find_integer(cards, "BITPIX").ok_or(Error::MissingKeyword("BITPIX"))?;
    let naxes = read_naxes(cards)?;

    if naxes.is_empty() {
        return Ok(0);
    }

    let bytes_per_value = (bitpix.unsigned_abs() as usize) / 8;

    let total_pixels: usize = naxes
        .iter()
        .try_fold(1usize, |acc, &d| acc.checked_mul(d))
        .ok_or(Error::InvalidHeader("pixel count overflow"))?;

    let pcount = if is_primary {
        0
    } else {
        find_integer(cards, "PCOUNT").unwrap_or(0) as usize
    };

    let gcount = if is_primary {
        1
    } else {
        match find_integer(cards, "GCOUNT").unwrap_or(1) as usize {
            0 => 1,
            g => g,
        }
    };

    let data_bytes = gcount
        .checked_mul(
            total_pixels
                .checked_mul(bytes_per_value)
                .ok_or(Error::InvalidHeader("data size overflow"))?,
        )
        .ok_or(Error::InvalidHeader("data size overflow"))?
        .checked_add(
            gcount
                .checked_mul(pcount)
                .ok_or(Error::InvalidHeader("data size overflow"))?,
        )
        .ok_or(Error::InvalidHeader("data size overflow"))?;

    Ok(data_bytes)
}

fn parse_hdu_info(cards: &[Card], is_primary: bool) -> Result<HduInfo> {
    if is_primary {
        let bitpix = find_integer(cards, "BITPIX").ok_or(Error::MissingKeyword("BITPIX"))?;
        let naxes = read_naxes(cards)?;
        if !naxes.is_empty() && naxes[0] == 0 && find_logical(cards, "GROUPS") == Some(true) {
            return Err(Error::UnsupportedExtension("random groups"));
        }
        return Ok(HduInfo::Primary { bitpix, naxes });
    }

    let xtension = find_string(cards, "XTENSION").ok_or(Error::MissingKeyword("XTENSION"))?;
    match xtension.as_str() {
        "IMAGE" => {
            let bitpix = find_integer(cards, "BITPIX").ok_or(Error::MissingKeyword("BITPIX"))?;
            let naxes = read_naxes(cards)?;
            Ok(HduInfo::Image { bitpix, naxes })
        }
        "TABLE" => {
            let naxis1 =
                find_integer(cards, "NAXIS1").ok_or(Error::MissingKeyword("NAXIS1"))? as usize;
            let naxis2 =
                find_integer(cards, "NAXIS2").ok_or(Error::MissingKeyword("NAXIS2"))? as usize;
            let tfields =
                find_integer(cards, "TFIELDS").ok_or(Error::MissingKeyword("TFIELDS"))? as usize;
            Ok(HduInfo::AsciiTable {
                naxis1,
                naxis2,
                tfields,
            })
        }
        "BINTABLE" => {
            let naxis1 =
                find_integer(cards, "NAXIS1").ok_or(Error::MissingKeyword("NAXIS1"))? as usize;
            let naxis2 =
                find_integer(cards, "NAXIS2").ok_or(Error::MissingKeyword("NAXIS2"))? as usize;
            let pcount =
                find_integer(cards, "PCOUNT").ok_or(Error::MissingKeyword("PCOUNT"))? as usize;
            let tfields =
                find_integer(cards, "TFIELDS").ok_or(Error::MissingKeyword("TFIELDS"))? as usize;

            if find_logical(cards, "ZIMAGE") == Some(true) {
                return Err(Error::UnsupportedExtension("tile-compressed image"));
            }

            Ok(HduInfo::BinaryTable {
                naxis1,
                naxis2,
                pcount,
                tfields,
            })
        }
        _ => Err(Error::UnsupportedExtension("unknown XTENSION")),
    }
}

/// Parse a complete FITS byte stream into a [`FitsData`] containing all HDUs.
pub fn parse_fits(data: &[u8]) -> Result<FitsData> {
    if data.len() < BLOCK_SIZE {
        return Err(Error::UnexpectedEof);
    }

    let mut hdus = Vec::new();
    let mut offset: usize = 0;

    while offset < data.len() {
        let remaining = &data[offset..];
        if remaining.len() < BLOCK_SIZE {
            break;
        }

        // Once at least one HDU parsed, treat trailing garbage as end of
        // file rather than an error.
        let header_len = match header_byte_len(remaining) {
            Ok(len) => len,
            Err(_) if !hdus.is_empty() => break,
            Err(e) => return Err(e),
        };
        let cards = match parse_header_blocks(&remaining[..header_len]) {
            Ok(cards) => cards,
            Err(_) if !hdus.is_empty() => break,
            Err(e) => return Err(e),
        };

        let is_primary = hdus.is_empty() && is_primary_hdu(&cards);
        if hdus.is_empty() && !is_primary {
            return Err(Error::InvalidHeader("first HDU must be primary"));
        }

        let info = match parse_hdu_info(&cards, is_primary) {
            Ok(info) => info,
            Err(_) if !hdus.is_empty() => break,
            Err(e) => return Err(e),
        };
        let data_len = match compute_data_byte_len(&cards, is_primary) {
            Ok(len) => len,
            Err(_) if !hdus.is_empty() => break,
            Err(e) => return Err(e),
        };
        let data_start = offset + header_len;

        // All actual data bytes must be present; missing trailing block
        // padding is tolerated (some real-world writers omit it).
        if data_len > 0 && data_start + data_len > data.len() {
            return Err(Error::UnexpectedEof);
        }

        hdus.push(Hdu {
            info,
            header_start: offset,
            data_start,
            data_len,
            cards,
        });

        offset = data_start + padded_byte_len(data_len);
    }

    if hdus.is_empty() {
        return Err(Error::InvalidHeader("no valid HDUs found"));
    }

    Ok(FitsData { hdus })
}
