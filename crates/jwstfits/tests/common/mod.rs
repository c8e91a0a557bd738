//! Builders for synthetic NIRSpec pipeline products on disk.
#![allow(dead_code)]

use std::io::Write;

use fits_light::bintable::{serialize_table_hdu, ColumnData, ColumnDescriptor, ColumnType};
use fits_light::header::{serialize_header, Card};
use fits_light::value::Value;
use tempfile::NamedTempFile;

pub fn primary_hdu() -> Vec<u8> {
    serialize_header(&[
        Card::new("SIMPLE", Value::Logical(true)),
        Card::new("BITPIX", Value::Integer(8)),
        Card::new("NAXIS", Value::Integer(0)),
        Card::new("TELESCOP", Value::String("JWST".into())),
        Card::new("INSTRUME", Value::String("NIRSPEC".into())),
    ])
}

pub fn extract1d_hdu(wavelength: &[f64], flux: &[f64], flux_error: Option<&[f64]>) -> Vec<u8> {
    let mut columns = vec![
        ColumnDescriptor::scalar("WAVELENGTH", ColumnType::Double),
        ColumnDescriptor::scalar("FLUX", ColumnType::Double),
    ];
    let mut data = vec![
        ColumnData::Double(wavelength.to_vec()),
        ColumnData::Double(flux.to_vec()),
    ];
    if let Some(err) = flux_error {
        columns.push(ColumnDescriptor::scalar("FLUX_ERROR", ColumnType::Double));
        data.push(ColumnData::Double(err.to_vec()));
    }
    serialize_table_hdu(&columns, &data, wavelength.len(), Some("EXTRACT1D")).unwrap()
}

pub fn int_times_hdu(bjd_mid: &[f64]) -> Vec<u8> {
    let columns = [
        ColumnDescriptor::scalar("integration_number", ColumnType::Int),
        ColumnDescriptor::scalar("int_mid_BJD_TDB", ColumnType::Double),
    ];
    let data = [
        ColumnData::Int((1..=bjd_mid.len() as i32).collect()),
        ColumnData::Double(bjd_mid.to_vec()),
    ];
    serialize_table_hdu(&columns, &data, bjd_mid.len(), Some("INT_TIMES")).unwrap()
}

/// Write a product file from pre-serialized HDUs after a primary.
pub fn write_product(extensions: &[Vec<u8>]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(&primary_hdu()).unwrap();
    for ext in extensions {
        file.write_all(ext).unwrap();
    }
    file.flush().unwrap();
    file
}

/// A single-spectrum `x1d` product.
pub fn x1d_file(wavelength: &[f64], flux: &[f64], flux_error: Option<&[f64]>) -> NamedTempFile {
    write_product(&[extract1d_hdu(wavelength, flux, flux_error)])
}

/// A time-series `x1dints` product: one EXTRACT1D extension per flux
/// series, all over the same wavelength grid, plus an optional INT_TIMES
/// extension.
pub fn x1dints_file(
    wavelength: &[f64],
    fluxes: &[Vec<f64>],
    bjd_mid: Option<&[f64]>,
) -> NamedTempFile {
    let mut extensions: Vec<Vec<u8>> = fluxes
        .iter()
        .map(|flux| extract1d_hdu(wavelength, flux, None))
        .collect();
    if let Some(bjd) = bjd_mid {
        extensions.push(int_times_hdu(bjd));
    }
    write_product(&extensions)
}
