//! Read-only inspection of pipeline products: extension tree, header
//! dumps, and table column listings.

use std::path::Path;

use fits_light::bintable::columns_of;
use fits_light::hdu::{FitsData, HduInfo};

use crate::error::{Error, Result};
use crate::file::read_fits;
use crate::schema::EXTRACT1D;

/// One line of the extension tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionSummary {
    /// 0-based HDU index in file order.
    pub index: usize,
    /// EXTNAME, when the extension carries one.
    pub name: Option<String>,
    /// HDU kind label ("Primary", "Image", "BinaryTable", ...).
    pub kind: String,
    /// Axis dimensions; tables report `[row width, row count]`.
    pub dimensions: Vec<usize>,
}

/// One header card, decoded for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderEntry {
    pub keyword: String,
    /// Formatted value; commentary cards (COMMENT, HISTORY) have none.
    pub value: Option<String>,
    pub comment: Option<String>,
}

/// One column of a binary table extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    /// TTYPEn, when present.
    pub name: Option<String>,
    /// Repeat count from TFORMn.
    pub repeat: usize,
    /// TFORM type code character ('D', 'E', 'J', ...).
    pub type_code: char,
}

/// Ways of naming an extension in a product: by HDU index or by EXTNAME.
///
/// Name lookup resolves to the first matching extension in file order;
/// products with repeated EXTRACT1D extensions need the index form to reach
/// later integrations.
pub trait DescribesExtension {
    fn resolve(&self, fits: &FitsData) -> Result<usize>;
}

impl DescribesExtension for usize {
    fn resolve(&self, fits: &FitsData) -> Result<usize> {
        if *self < fits.len() {
            Ok(*self)
        } else {
            Err(Error::ExtensionNotFound {
                ext: self.to_string(),
            })
        }
    }
}

impl DescribesExtension for &str {
    fn resolve(&self, fits: &FitsData) -> Result<usize> {
        fits.find_all_by_name(self)
            .map(|(i, _)| i)
            .next()
            .ok_or_else(|| Error::ExtensionNotFound {
                ext: (*self).to_string(),
            })
    }
}

impl DescribesExtension for String {
    fn resolve(&self, fits: &FitsData) -> Result<usize> {
        self.as_str().resolve(fits)
    }
}

/// List every extension of the product, in file order.
pub fn tree(path: impl AsRef<Path>) -> Result<Vec<ExtensionSummary>> {
    let (_, fits) = read_fits(path.as_ref())?;

    let n_extract = fits.find_all_by_name(EXTRACT1D).count();
    if n_extract > 1 {
        log::debug!("{n_extract} {EXTRACT1D} extensions (time-series product)");
    }

    Ok(fits
        .iter()
        .enumerate()
        .map(|(index, hdu)| ExtensionSummary {
            index,
            name: hdu.name(),
            kind: hdu.info.kind().to_string(),
            dimensions: hdu.info.dimensions(),
        })
        .collect())
}

/// Dump the header cards of one extension. The END marker and blank
/// padding cards are omitted.
pub fn head(path: impl AsRef<Path>, ext: impl DescribesExtension) -> Result<Vec<HeaderEntry>> {
    let (_, fits) = read_fits(path.as_ref())?;
    let index = ext.resolve(&fits)?;
    let hdu = fits.get(index).ok_or_else(|| Error::ExtensionNotFound {
        ext: index.to_string(),
    })?;

    Ok(hdu
        .cards
        .iter()
        .filter(|c| !c.is_end() && !c.is_blank())
        .map(|c| HeaderEntry {
            keyword: c.keyword_str().to_string(),
            value: c.value.as_ref().map(|v| v.to_string()),
            comment: c.comment.clone(),
        })
        .collect())
}

/// List the columns of a binary table extension.
pub fn columns(path: impl AsRef<Path>, ext: impl DescribesExtension) -> Result<Vec<ColumnInfo>> {
    let (_, fits) = read_fits(path.as_ref())?;
    let index = ext.resolve(&fits)?;
    let hdu = fits.get(index).ok_or_else(|| Error::ExtensionNotFound {
        ext: index.to_string(),
    })?;

    if !matches!(hdu.info, HduInfo::BinaryTable { .. }) {
        return Err(Error::NotTabular {
            ext: hdu.name().unwrap_or_else(|| index.to_string()),
        });
    }

    Ok(columns_of(hdu)?
        .into_iter()
        .map(|c| ColumnInfo {
            name: c.name,
            repeat: c.repeat,
            type_code: c.col_type.tform_code(),
        })
        .collect())
}
