//! Polars conversions, behind the `dataframe` feature.
//!
//! Extraction results stay plain vectors; callers opting into polars get
//! tidy long-format frames, one row per spectral sample.

use polars::prelude::*;

use crate::spectrum::{IntegrationCube, SpectrumRecord};

impl SpectrumRecord {
    /// One row per sample: `wavelength`, `flux`, and `flux_error` when the
    /// record carries errors.
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        match &self.flux_error {
            Some(err) => df!(
                "wavelength" => &self.wavelength,
                "flux" => &self.flux,
                "flux_error" => err,
            ),
            None => df!(
                "wavelength" => &self.wavelength,
                "flux" => &self.flux,
            ),
        }
    }
}

impl IntegrationCube {
    /// All integrations stacked long-format, one row per sample, tagged
    /// with an `integration` index column.
    ///
    /// `time_hours` is included when the cube has mid-times, repeated per
    /// sample of each integration. `flux_error` is included only when every
    /// integration carries errors, so the column is never partially null.
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let total: usize = self.iter().map(|(_, r)| r.len()).sum();
        let with_error = self.iter().all(|(_, r)| r.flux_error.is_some());

        let mut integration: Vec<u32> = Vec::with_capacity(total);
        let mut wavelength: Vec<f64> = Vec::with_capacity(total);
        let mut flux: Vec<f64> = Vec::with_capacity(total);
        let mut flux_error: Vec<f64> = Vec::with_capacity(if with_error { total } else { 0 });
        let mut time_hours: Vec<f64> = Vec::new();

        for (index, record) in self.iter() {
            integration.resize(integration.len() + record.len(), index as u32);
            wavelength.extend_from_slice(&record.wavelength);
            flux.extend_from_slice(&record.flux);
            if with_error {
                if let Some(err) = &record.flux_error {
                    flux_error.extend_from_slice(err);
                }
            }
            if let Some(times) = self.times_hours() {
                time_hours.resize(time_hours.len() + record.len(), times[index]);
            }
        }

        let mut columns = vec![Column::new("integration".into(), integration)];
        if self.times_hours().is_some() {
            columns.push(Column::new("time_hours".into(), time_hours));
        }
        columns.push(Column::new("wavelength".into(), wavelength));
        columns.push(Column::new("flux".into(), flux));
        if with_error {
            columns.push(Column::new("flux_error".into(), flux_error));
        }

        DataFrame::new(columns)
    }
}
