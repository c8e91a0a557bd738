//! NIRSpec spectral extraction: `x1d` single spectra and `x1dints`
//! time-series cubes.
//!
//! Both entry points run the same per-spectrum pipeline, in a fixed order:
//! NaN drop, wavelength-range filter, outlier clip, unit conversion. Row
//! order of the source table is never changed, only rows removed. All
//! filtering is per spectrum; in a time-series product each integration is
//! processed independently of the others.

use std::path::Path;

use fits_light::hdu::{FitsData, Hdu, HduInfo};

use crate::error::{Error, Result};
use crate::file::read_fits;
use crate::schema::{
    read_f64_column, read_named_f64_column, resolve_spectrum_columns, COL_INT_MID_BJD_TDB,
    EXTRACT1D, INT_TIMES,
};
use crate::spectrum::{IntegrationCube, SpectrumRecord};
use crate::units::{convert, FluxUnit};

/// Hours per day, for rebasing BJD mid-times.
const HOURS_PER_DAY: f64 = 24.0;

/// Consistency factor of the median absolute deviation for a normal
/// distribution.
const MAD_TO_SIGMA: f64 = 1.4826;

/// Options applied to every extracted spectrum, in pipeline order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractOptions {
    /// Convert flux (and error) to this unit; `None` keeps the native Jy.
    pub flux_unit: Option<FluxUnit>,
    /// Keep only samples with `min <= wavelength <= max`, μm, inclusive.
    pub wavelength_range: Option<(f64, f64)>,
    /// Remove flux outliers beyond this many sigmas of the median, with
    /// sigma estimated from the median absolute deviation (1.4826 * MAD).
    /// Statistics are computed once on the pre-clip flux, a single pass.
    pub clip_outliers: Option<f64>,
    /// Remove samples whose flux is NaN or infinite.
    pub drop_nan: bool,
}

impl ExtractOptions {
    fn validate(&self) -> Result<()> {
        if let Some((min, max)) = self.wavelength_range {
            if !min.is_finite() || !max.is_finite() {
                return Err(Error::validation("wavelength range must be finite"));
            }
            if min > max {
                return Err(Error::validation(format!(
                    "wavelength range is inverted: {min} > {max}"
                )));
            }
        }
        if let Some(sigma) = self.clip_outliers {
            if !sigma.is_finite() || sigma <= 0.0 {
                return Err(Error::validation(format!(
                    "clip threshold must be a positive number of sigmas, got {sigma}"
                )));
            }
        }
        Ok(())
    }
}

/// Extract the spectrum of an `x1d` product.
///
/// Reads the first EXTRACT1D extension of the file and applies `options`.
pub fn x1d(path: impl AsRef<Path>, options: &ExtractOptions) -> Result<SpectrumRecord> {
    options.validate()?;
    let (bytes, fits) = read_fits(path.as_ref())?;

    let hdu = fits
        .find_all_by_name(EXTRACT1D)
        .map(|(_, hdu)| hdu)
        .next()
        .ok_or_else(|| Error::schema(format!("no {EXTRACT1D} extension")))?;

    extract_record(&bytes, hdu, options)
}

/// Extract every integration of an `x1dints` product.
///
/// Each EXTRACT1D extension yields one record, keyed by its 0-based
/// position among the EXTRACT1D extensions in file order. When the file
/// carries an INT_TIMES extension, integration mid-times are attached,
/// rebased to hours since the first integration.
pub fn x1dints(path: impl AsRef<Path>, options: &ExtractOptions) -> Result<IntegrationCube> {
    options.validate()?;
    let (bytes, fits) = read_fits(path.as_ref())?;

    let mut cube = IntegrationCube::default();
    for (integration, (_, hdu)) in fits.find_all_by_name(EXTRACT1D).enumerate() {
        let record = extract_record(&bytes, hdu, options)?;
        cube.insert(integration, record);
    }
    if cube.is_empty() {
        return Err(Error::schema(format!("no {EXTRACT1D} extension")));
    }
    log::debug!("extracted {} integrations", cube.len());

    if let Some(times) = read_mid_times(&bytes, &fits, cube.len())? {
        cube.set_times_hours(times);
    }

    Ok(cube)
}

/// Mid-times from INT_TIMES, rebased to hours since the first integration.
/// `None` when the file has no INT_TIMES extension; a present but malformed
/// one is a schema error.
fn read_mid_times(bytes: &[u8], fits: &FitsData, n_integrations: usize) -> Result<Option<Vec<f64>>> {
    let Some(hdu) = fits.find_by_name(INT_TIMES) else {
        return Ok(None);
    };
    if !matches!(hdu.info, HduInfo::BinaryTable { .. }) {
        return Err(Error::schema(format!("{INT_TIMES} is not a binary table")));
    }

    let bjd = read_named_f64_column(bytes, hdu, COL_INT_MID_BJD_TDB)?;
    if bjd.len() != n_integrations {
        return Err(Error::schema(format!(
            "{INT_TIMES} has {} rows for {n_integrations} integrations",
            bjd.len()
        )));
    }

    let t0 = bjd[0];
    Ok(Some(bjd.iter().map(|t| (t - t0) * HOURS_PER_DAY).collect()))
}

/// Run the whole per-spectrum pipeline on one EXTRACT1D extension.
fn extract_record(bytes: &[u8], hdu: &Hdu, options: &ExtractOptions) -> Result<SpectrumRecord> {
    // A wrong-shaped EXTRACT1D is a wrong-file-type signal, like a missing
    // column: schema-level, not the Inspector's structural errors.
    if !matches!(hdu.info, HduInfo::BinaryTable { .. }) {
        return Err(Error::schema(format!(
            "{EXTRACT1D} extension is not a binary table"
        )));
    }

    let cols = resolve_spectrum_columns(hdu)?;
    let wavelength = read_f64_column(bytes, hdu, cols.wavelength, "WAVELENGTH")?;
    let flux = read_f64_column(bytes, hdu, cols.flux, "FLUX")?;
    let flux_error = match cols.flux_error {
        Some(index) => Some(read_f64_column(bytes, hdu, index, "FLUX_ERROR")?),
        None => None,
    };

    if flux.len() != wavelength.len()
        || flux_error.as_ref().is_some_and(|e| e.len() != flux.len())
    {
        return Err(Error::schema("spectral columns have unequal lengths"));
    }
    if wavelength.iter().any(|w| !w.is_finite()) {
        return Err(Error::schema("non-finite wavelength sample"));
    }
    if !flux.is_empty() && flux.iter().all(|f| !f.is_finite()) {
        return Err(Error::schema("every flux sample is non-finite"));
    }

    let mut record = SpectrumRecord {
        wavelength,
        flux,
        flux_error,
        flux_unit: FluxUnit::Jansky,
    };

    if options.drop_nan {
        let keep: Vec<bool> = record.flux.iter().map(|f| f.is_finite()).collect();
        record.retain_rows(&keep);
    }

    if let Some((min, max)) = options.wavelength_range {
        let keep: Vec<bool> = record
            .wavelength
            .iter()
            .map(|&w| w >= min && w <= max)
            .collect();
        record.retain_rows(&keep);
        if record.is_empty() {
            return Err(Error::validation(format!(
                "no samples in wavelength range [{min}, {max}] um"
            )));
        }
    }

    if let Some(sigma) = options.clip_outliers {
        clip_flux_outliers(&mut record, sigma);
    }

    if let Some(target) = options.flux_unit {
        convert(&mut record.flux, &record.wavelength, record.flux_unit, target);
        if let Some(err) = &mut record.flux_error {
            convert(err, &record.wavelength, record.flux_unit, target);
        }
        record.flux_unit = target;
    }

    Ok(record)
}

/// Median of `values`, which must be non-empty.
fn median(values: &mut [f64]) -> f64 {
    values.sort_unstable_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        values[mid]
    } else {
        (values[mid - 1] + values[mid]) / 2.0
    }
}

/// Single-pass robust clip: remove rows whose flux deviates from the median
/// by more than `sigma` estimated standard deviations, where the deviation
/// scale comes from the MAD of the pre-clip flux.
///
/// Non-finite flux rows never count as outliers; they carry no statistical
/// weight and are left for `drop_nan` to handle. A zero MAD (over half the
/// samples identical) disables the clip rather than removing everything
/// off the mode.
fn clip_flux_outliers(record: &mut SpectrumRecord, sigma: f64) {
    let mut finite: Vec<f64> = record.flux.iter().copied().filter(|f| f.is_finite()).collect();
    if finite.is_empty() {
        return;
    }

    let med = median(&mut finite);
    let mut deviations: Vec<f64> = finite.iter().map(|f| (f - med).abs()).collect();
    let mad = median(&mut deviations);
    if mad == 0.0 {
        return;
    }

    let threshold = sigma * MAD_TO_SIGMA * mad;
    let keep: Vec<bool> = record
        .flux
        .iter()
        .map(|f| !f.is_finite() || (f - med).abs() <= threshold)
        .collect();

    let removed = keep.iter().filter(|k| !**k).count();
    if removed > 0 {
        log::debug!("clipped {removed} outlier samples at {sigma} sigma");
    }
    record.retain_rows(&keep);
}
