mod common;

use fits_light::bintable::{serialize_table_hdu, ColumnData, ColumnDescriptor, ColumnType};
use jwstfits::{x1dints, Error, ExtractOptions};

use common::{extract1d_hdu, int_times_hdu, write_product, x1dints_file};

#[test]
fn one_record_per_integration_in_file_order() {
    let wl = [1.0, 2.0, 3.0];
    let fluxes = vec![
        vec![10.0, 11.0, 12.0],
        vec![20.0, 21.0, 22.0],
        vec![30.0, 31.0, 32.0],
    ];
    let file = x1dints_file(&wl, &fluxes, None);

    let cube = x1dints(file.path(), &ExtractOptions::default()).unwrap();
    assert_eq!(cube.len(), 3);
    assert_eq!(cube.indices(), vec![0, 1, 2]);
    assert_eq!(cube.get(1).unwrap().flux, fluxes[1]);
    assert_eq!(cube.get(2).unwrap().wavelength, wl);
    assert!(cube.times_hours().is_none());
}

#[test]
fn mid_times_rebased_to_hours() {
    let wl = [1.0, 2.0];
    let fluxes = vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]];
    // Quarter-day cadence in BJD.
    let bjd = [60210.0, 60210.25, 60210.5];
    let file = x1dints_file(&wl, &fluxes, Some(&bjd));

    let cube = x1dints(file.path(), &ExtractOptions::default()).unwrap();
    let times = cube.times_hours().unwrap();
    assert_eq!(times.len(), 3);
    assert!((times[0] - 0.0).abs() < 1e-9);
    assert!((times[1] - 6.0).abs() < 1e-9);
    assert!((times[2] - 12.0).abs() < 1e-9);
}

#[test]
fn no_extract1d_is_schema_error() {
    let file = write_product(&[int_times_hdu(&[60210.0])]);

    let err = x1dints(file.path(), &ExtractOptions::default()).unwrap_err();
    assert!(matches!(err, Error::Schema { .. }), "got {err:?}");
    assert!(err.to_string().contains("EXTRACT1D"));
}

#[test]
fn int_times_without_mid_time_column_is_schema_error() {
    let columns = [ColumnDescriptor::scalar(
        "integration_number",
        ColumnType::Int,
    )];
    let data = [ColumnData::Int(vec![1])];
    let bad_times = serialize_table_hdu(&columns, &data, 1, Some("INT_TIMES")).unwrap();
    let file = write_product(&[extract1d_hdu(&[1.0], &[1.0], None), bad_times]);

    let err = x1dints(file.path(), &ExtractOptions::default()).unwrap_err();
    assert!(matches!(err, Error::Schema { .. }));
}

#[test]
fn int_times_row_count_mismatch_is_schema_error() {
    let wl = [1.0, 2.0];
    let fluxes = vec![vec![1.0, 2.0], vec![3.0, 4.0]];
    // Three timing rows for two integrations.
    let bjd = [60210.0, 60210.1, 60210.2];
    let file = x1dints_file(&wl, &fluxes, Some(&bjd));

    let err = x1dints(file.path(), &ExtractOptions::default()).unwrap_err();
    assert!(matches!(err, Error::Schema { .. }));
}

#[test]
fn options_apply_to_every_integration() {
    let wl = [1.0, 2.0, 3.0, 4.0];
    let fluxes = vec![vec![1.0, 2.0, 3.0, 4.0], vec![5.0, 6.0, 7.0, 8.0]];
    let file = x1dints_file(&wl, &fluxes, None);

    let options = ExtractOptions {
        wavelength_range: Some((2.0, 3.0)),
        ..Default::default()
    };
    let cube = x1dints(file.path(), &options).unwrap();
    assert_eq!(cube.get(0).unwrap().flux, vec![2.0, 3.0]);
    assert_eq!(cube.get(1).unwrap().flux, vec![6.0, 7.0]);
}

#[test]
fn integrations_filtered_independently() {
    // A NaN in one integration must not disturb the others.
    let wl = [1.0, 2.0, 3.0];
    let fluxes = vec![vec![1.0, f64::NAN, 3.0], vec![4.0, 5.0, 6.0]];
    let file = x1dints_file(&wl, &fluxes, None);

    let options = ExtractOptions {
        drop_nan: true,
        ..Default::default()
    };
    let cube = x1dints(file.path(), &options).unwrap();
    assert_eq!(cube.get(0).unwrap().len(), 2);
    assert_eq!(cube.get(1).unwrap().len(), 3);
}

#[test]
fn single_integration_product() {
    let file = x1dints_file(&[1.0, 2.0], &[vec![1.0, 2.0]], Some(&[60210.0]));

    let cube = x1dints(file.path(), &ExtractOptions::default()).unwrap();
    assert_eq!(cube.len(), 1);
    assert_eq!(cube.times_hours(), Some(&[0.0][..]));
}
