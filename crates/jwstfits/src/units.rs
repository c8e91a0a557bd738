//! Flux-density units and wavelength-dependent conversion.
//!
//! NIRSpec pipeline products store flux in Jansky (spectral flux density
//! per unit frequency). Converting to a per-wavelength density is
//! wavelength-dependent: for flux F_ν in Jy at wavelength λ (μm),
//!
//! ```text
//! F_λ [W/m²/μm] = F_ν · c / λ² · 1e-26
//! ```
//!
//! with c in μm/s. Errors scale by the same per-sample factor (linear
//! propagation, no cross-term). Wavelengths are always μm in this crate.

use crate::error::{Error, Result};

/// Speed of light in μm/s.
pub const SPEED_OF_LIGHT_UM_PER_S: f64 = 2.9979e14;

/// One Jansky in W/m²/Hz.
const JY_TO_SI: f64 = 1e-26;

/// A supported spectral flux-density unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FluxUnit {
    /// Jansky, the native unit of pipeline products.
    #[default]
    Jansky,
    /// Watts per square meter per micron.
    WattPerM2PerMicron,
}

impl FluxUnit {
    /// Short unit label, matching the spelling used in pipeline headers.
    pub fn label(&self) -> &'static str {
        match self {
            FluxUnit::Jansky => "Jy",
            FluxUnit::WattPerM2PerMicron => "W/m2/um",
        }
    }

    /// Parse a unit tag. Accepts the ASCII and typographic spellings.
    ///
    /// Any tag outside the supported set is a hard
    /// [`Error::UnsupportedUnit`], never a silent fallback to the native
    /// unit.
    pub fn parse(tag: &str) -> Result<FluxUnit> {
        match tag.trim() {
            "Jy" | "jy" | "Jansky" => Ok(FluxUnit::Jansky),
            "W/m2/um" | "W/m²/μm" | "W m-2 um-1" => Ok(FluxUnit::WattPerM2PerMicron),
            other => Err(Error::UnsupportedUnit {
                requested: other.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for FluxUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Multiplicative factor converting one sample at `wavelength_um` from
/// `from` to `to`.
///
/// The match is exhaustive over the unit pairs, so the conversion table is
/// total by construction.
fn per_sample_factor(from: FluxUnit, to: FluxUnit, wavelength_um: f64) -> f64 {
    match (from, to) {
        (FluxUnit::Jansky, FluxUnit::Jansky)
        | (FluxUnit::WattPerM2PerMicron, FluxUnit::WattPerM2PerMicron) => 1.0,
        (FluxUnit::Jansky, FluxUnit::WattPerM2PerMicron) => {
            SPEED_OF_LIGHT_UM_PER_S * JY_TO_SI / (wavelength_um * wavelength_um)
        }
        (FluxUnit::WattPerM2PerMicron, FluxUnit::Jansky) => {
            wavelength_um * wavelength_um / (SPEED_OF_LIGHT_UM_PER_S * JY_TO_SI)
        }
    }
}

/// Convert `values` in place from `from` to `to`, one factor per sample.
///
/// `values` and `wavelengths_um` must be co-indexed and of equal length.
pub fn convert(values: &mut [f64], wavelengths_um: &[f64], from: FluxUnit, to: FluxUnit) {
    debug_assert_eq!(values.len(), wavelengths_um.len());
    if from == to {
        return;
    }
    for (v, &wl) in values.iter_mut().zip(wavelengths_um) {
        *v *= per_sample_factor(from, to, wl);
    }
}
