//! Integration tests exercising the full parse path on synthetic files.
//!
//! All fixtures are in-memory byte vectors shaped like JWST pipeline
//! products: an empty primary HDU followed by binary table extensions.

use fits_light::bintable::{
    read_column, serialize_table_hdu, ColumnData, ColumnDescriptor, ColumnType,
};
use fits_light::hdu::{parse_fits, HduInfo};
use fits_light::header::{find_string, serialize_header, Card};
use fits_light::value::Value;

fn empty_primary() -> Vec<u8> {
    serialize_header(&[
        Card::new("SIMPLE", Value::Logical(true)),
        Card::new("BITPIX", Value::Integer(8)),
        Card::new("NAXIS", Value::Integer(0)),
        Card::new("TELESCOP", Value::String("JWST".to_string())),
    ])
}

fn spectrum_table(extname: &str, wl: &[f64], flux: &[f64]) -> Vec<u8> {
    let columns = [
        ColumnDescriptor::scalar("WAVELENGTH", ColumnType::Double),
        ColumnDescriptor::scalar("FLUX", ColumnType::Double),
    ];
    let data = [
        ColumnData::Double(wl.to_vec()),
        ColumnData::Double(flux.to_vec()),
    ];
    serialize_table_hdu(&columns, &data, wl.len(), Some(extname)).unwrap()
}

#[test]
fn multi_extension_spectrum_file() {
    let wl = [1.0, 1.5, 2.0, 2.5];
    let flux = [10.0, 11.0, 12.0, 13.0];

    let mut bytes = empty_primary();
    bytes.extend_from_slice(&spectrum_table("EXTRACT1D", &wl, &flux));
    bytes.extend_from_slice(&spectrum_table("EXTRACT1D", &wl, &flux));

    let fits = parse_fits(&bytes).unwrap();
    assert_eq!(fits.len(), 3);
    assert_eq!(
        find_string(&fits.primary().cards, "TELESCOP").as_deref(),
        Some("JWST")
    );

    let extract1d: Vec<usize> = fits.find_all_by_name("EXTRACT1D").map(|(i, _)| i).collect();
    assert_eq!(extract1d, vec![1, 2]);

    for (_, hdu) in fits.find_all_by_name("EXTRACT1D") {
        match &hdu.info {
            HduInfo::BinaryTable { naxis2, .. } => assert_eq!(*naxis2, 4),
            other => panic!("expected BinaryTable, got {other:?}"),
        }
        assert_eq!(
            read_column(&bytes, hdu, 0).unwrap(),
            ColumnData::Double(wl.to_vec())
        );
        assert_eq!(
            read_column(&bytes, hdu, 1).unwrap(),
            ColumnData::Double(flux.to_vec())
        );
    }
}

#[test]
fn file_written_to_disk_parses_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("spectrum.fits");

    let mut bytes = empty_primary();
    bytes.extend_from_slice(&spectrum_table("EXTRACT1D", &[1.0, 2.0], &[5.0, 6.0]));
    std::fs::write(&path, &bytes).unwrap();

    let read_back = std::fs::read(&path).unwrap();
    let fits = parse_fits(&read_back).unwrap();
    assert_eq!(fits.len(), 2);
    assert!(fits.find_by_name("EXTRACT1D").is_some());
}

#[test]
fn non_fits_bytes_are_rejected() {
    let garbage = vec![0x42u8; 4096];
    assert!(parse_fits(&garbage).is_err());

    let text = b"This is not a FITS file at all".repeat(200);
    assert!(parse_fits(&text).is_err());
}
