//! The known NIRSpec pipeline product layout.
//!
//! Column access is driven by this fixed descriptor rather than ad-hoc
//! name lookups: logical fields map to expected column names, resolved and
//! validated once per call, so a wrong-instrument file fails with a typed
//! [`Error::Schema`] instead of an opaque lookup miss.
//!
//! [`Error::Schema`]: crate::Error::Schema

use fits_light::bintable::{columns_of, read_column, ColumnDescriptor};
use fits_light::hdu::Hdu;

use crate::error::{Error, Result};

/// EXTNAME of extracted-spectrum table extensions. Time-series products
/// repeat this name once per integration.
pub const EXTRACT1D: &str = "EXTRACT1D";

/// EXTNAME of the per-integration timing table in `x1dints` products.
pub const INT_TIMES: &str = "INT_TIMES";

/// Wavelength column, μm.
pub const COL_WAVELENGTH: &str = "WAVELENGTH";

/// Flux column, Jy.
pub const COL_FLUX: &str = "FLUX";

/// Flux error column, Jy.
pub const COL_FLUX_ERROR: &str = "FLUX_ERROR";

/// Integration mid-time column in INT_TIMES, barycentric dynamical time.
pub const COL_INT_MID_BJD_TDB: &str = "int_mid_BJD_TDB";

/// Resolved column indices of one EXTRACT1D table.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SpectrumColumns {
    pub wavelength: usize,
    pub flux: usize,
    /// Some pipeline products omit the error column.
    pub flux_error: Option<usize>,
}

fn find_column(columns: &[ColumnDescriptor], name: &str) -> Option<usize> {
    // FITS column names are matched case-insensitively, like astropy does.
    columns.iter().position(|c| {
        c.name
            .as_deref()
            .is_some_and(|n| n.eq_ignore_ascii_case(name))
    })
}

/// Validate that `hdu` is an EXTRACT1D-shaped table and resolve the column
/// indices of the spectral fields.
pub(crate) fn resolve_spectrum_columns(hdu: &Hdu) -> Result<SpectrumColumns> {
    let columns = columns_of(hdu)?;

    let wavelength = find_column(&columns, COL_WAVELENGTH).ok_or_else(|| {
        Error::schema(format!("EXTRACT1D table lacks a {COL_WAVELENGTH} column"))
    })?;
    let flux = find_column(&columns, COL_FLUX)
        .ok_or_else(|| Error::schema(format!("EXTRACT1D table lacks a {COL_FLUX} column")))?;
    let flux_error = find_column(&columns, COL_FLUX_ERROR);

    Ok(SpectrumColumns {
        wavelength,
        flux,
        flux_error,
    })
}

/// Locate a named column in `hdu` and read it as `f64`, failing with a
/// schema error when the column is absent or non-numeric.
pub(crate) fn read_named_f64_column(bytes: &[u8], hdu: &Hdu, name: &str) -> Result<Vec<f64>> {
    let columns = columns_of(hdu)?;
    let index = find_column(&columns, name)
        .ok_or_else(|| Error::schema(format!("table lacks a {name} column")))?;
    read_f64_column(bytes, hdu, index, name)
}

/// Read column `index` of `hdu` as `f64`.
pub(crate) fn read_f64_column(
    bytes: &[u8],
    hdu: &Hdu,
    index: usize,
    name: &str,
) -> Result<Vec<f64>> {
    read_column(bytes, hdu, index)?
        .into_f64()
        .ok_or_else(|| Error::schema(format!("column {name} is not numeric")))
}
