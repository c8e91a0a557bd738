//! Extracted spectral data: single records and per-integration cubes.

use std::collections::BTreeMap;

use crate::units::FluxUnit;

/// One extracted 1D spectrum.
///
/// The wavelength, flux, and (optional) error sequences always have equal
/// length; index `i` in each refers to the same physical sample.
/// Wavelengths are μm, in source-table order (never reordered).
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrumRecord {
    /// Wavelength per sample, μm.
    pub wavelength: Vec<f64>,
    /// Flux per sample, in `flux_unit`.
    pub flux: Vec<f64>,
    /// Flux error per sample, in `flux_unit`; absent when the source table
    /// carries no error column.
    pub flux_error: Option<Vec<f64>>,
    /// The unit `flux` and `flux_error` are expressed in.
    pub flux_unit: FluxUnit,
}

impl SpectrumRecord {
    /// Number of samples.
    pub fn len(&self) -> usize {
        self.wavelength.len()
    }

    /// `true` when the record holds no samples.
    pub fn is_empty(&self) -> bool {
        self.wavelength.is_empty()
    }

    /// Drop every row whose `keep` entry is false, preserving the order of
    /// the survivors. Rows are removed across all sequences at once so the
    /// co-indexing invariant cannot be broken.
    pub(crate) fn retain_rows(&mut self, keep: &[bool]) {
        debug_assert_eq!(keep.len(), self.len());
        let mut keep_iter = keep.iter();
        self.wavelength.retain(|_| *keep_iter.next().unwrap());
        let mut keep_iter = keep.iter();
        self.flux.retain(|_| *keep_iter.next().unwrap());
        if let Some(err) = &mut self.flux_error {
            let mut keep_iter = keep.iter();
            err.retain(|_| *keep_iter.next().unwrap());
        }
    }
}

/// Spectra of a time-series (`x1dints`) product, keyed by 0-based
/// integration index in file order.
///
/// Indices always match the source file exactly; integrations are never
/// renumbered, and every integration present in the source is present here.
#[derive(Debug, Clone, Default)]
pub struct IntegrationCube {
    integrations: BTreeMap<usize, SpectrumRecord>,
    times_hours: Option<Vec<f64>>,
}

impl IntegrationCube {
    pub(crate) fn insert(&mut self, index: usize, record: SpectrumRecord) {
        self.integrations.insert(index, record);
    }

    pub(crate) fn set_times_hours(&mut self, times: Vec<f64>) {
        self.times_hours = Some(times);
    }

    /// Number of integrations.
    pub fn len(&self) -> usize {
        self.integrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.integrations.is_empty()
    }

    /// The record for one integration.
    pub fn get(&self, index: usize) -> Option<&SpectrumRecord> {
        self.integrations.get(&index)
    }

    /// Integration indices in ascending (= file) order.
    pub fn indices(&self) -> Vec<usize> {
        self.integrations.keys().copied().collect()
    }

    /// Iterate `(integration index, record)` in file order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &SpectrumRecord)> {
        self.integrations.iter().map(|(&k, v)| (k, v))
    }

    /// Integration mid-times in hours since the first integration, indexed
    /// by integration index. Present when the source file carries an
    /// INT_TIMES extension.
    pub fn times_hours(&self) -> Option<&[f64]> {
        self.times_hours.as_deref()
    }
}
