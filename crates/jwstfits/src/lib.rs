//! Inspection and extraction of JWST NIRSpec `x1d`/`x1dints` pipeline
//! products.
//!
//! The pipeline writes extracted 1D spectra as FITS binary tables: a single
//! EXTRACT1D extension for a combined exposure (`x1d`), or one EXTRACT1D
//! extension per integration plus an INT_TIMES timing table for a
//! time-series observation (`x1dints`). This crate reads those products
//! into plain vectors with a small, deterministic post-processing pipeline:
//! NaN dropping, wavelength-range selection, robust outlier clipping, and
//! flux-unit conversion.
//!
//! ```no_run
//! use jwstfits::{x1d, ExtractOptions, FluxUnit};
//!
//! let options = ExtractOptions {
//!     flux_unit: Some(FluxUnit::WattPerM2PerMicron),
//!     wavelength_range: Some((1.0, 5.0)),
//!     ..Default::default()
//! };
//! let spectrum = x1d("jw02783-o002_t001_nirspec_prism_x1d.fits", &options)?;
//! println!("{} samples in {}", spectrum.len(), spectrum.flux_unit);
//! # Ok::<(), jwstfits::Error>(())
//! ```
//!
//! Inspection helpers ([`tree`], [`head`], [`columns`]) answer "what is in
//! this file" without committing to the NIRSpec schema, so they work on any
//! FITS product.
//!
//! With the `dataframe` feature, extraction results convert to polars
//! [`DataFrame`]s via `to_dataframe()`.
//!
//! [`DataFrame`]: https://docs.rs/polars/latest/polars/frame/struct.DataFrame.html

pub mod error;
mod file;
pub mod inspect;
pub mod nirspec;
pub mod schema;
pub mod spectrum;
pub mod units;

#[cfg(feature = "dataframe")]
mod dataframe;

pub use error::{Error, Result};
pub use inspect::{columns, head, tree};
pub use inspect::{ColumnInfo, DescribesExtension, ExtensionSummary, HeaderEntry};
pub use nirspec::{x1d, x1dints, ExtractOptions};
pub use spectrum::{IntegrationCube, SpectrumRecord};
pub use units::FluxUnit;
