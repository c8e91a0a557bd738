use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// All errors surfaced by inspection and extraction calls.
///
/// Every failure is deterministic for a given input; nothing is retried and
/// no partial result is ever returned alongside an error.
#[derive(Debug, Error)]
pub enum Error {
    /// The path could not be opened or read.
    #[error("cannot read {path}: {source}")]
    FileAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The file was read but its bytes are not a FITS container.
    #[error("not a readable FITS container: {source}")]
    Format {
        #[from]
        source: fits_light::Error,
    },
    /// The requested extension does not exist in the file.
    #[error("extension not found: {ext}")]
    ExtensionNotFound { ext: String },
    /// The requested extension exists but is not a binary table.
    #[error("extension {ext} is not a table")]
    NotTabular { ext: String },
    /// Valid FITS, but not the NIRSpec pipeline layout this crate targets.
    #[error("unexpected file schema: {reason}")]
    Schema { reason: String },
    /// Caller-supplied options are internally inconsistent, or filtering
    /// left nothing to return.
    #[error("invalid extraction request: {reason}")]
    Validation { reason: String },
    /// The requested flux unit is outside the supported set.
    #[error("unsupported flux unit: {requested}")]
    UnsupportedUnit { requested: String },
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn schema(reason: impl Into<String>) -> Error {
        Error::Schema {
            reason: reason.into(),
        }
    }

    pub(crate) fn validation(reason: impl Into<String>) -> Error {
        Error::Validation {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_schema() {
        let e = Error::schema("no EXTRACT1D extension");
        assert_eq!(
            e.to_string(),
            "unexpected file schema: no EXTRACT1D extension"
        );
    }

    #[test]
    fn display_unsupported_unit() {
        let e = Error::UnsupportedUnit {
            requested: "erg/s".into(),
        };
        assert_eq!(e.to_string(), "unsupported flux unit: erg/s");
    }

    #[test]
    fn format_error_from_fits_light() {
        let e: Error = fits_light::Error::UnexpectedEof.into();
        assert!(matches!(e, Error::Format { .. }));
    }

    #[test]
    fn file_access_keeps_source() {
        use std::error::Error as StdError;

        let e = Error::FileAccess {
            path: PathBuf::from("/no/such/file.fits"),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        };
        assert!(e.source().is_some());
        assert!(e.to_string().contains("/no/such/file.fits"));
    }
}
