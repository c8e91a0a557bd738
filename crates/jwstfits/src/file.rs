//! File loading: one read of the whole product into memory.
//!
//! Pipeline products are small enough (tens of MB at worst) that slurping
//! the file and parsing HDUs over the byte slice is simpler and faster than
//! seek-based access.

use std::fs;
use std::path::Path;

use fits_light::hdu::{parse_fits, FitsData};

use crate::error::{Error, Result};

/// Read `path` and parse it into HDUs. The raw bytes are returned alongside
/// the parsed structure because column reads index back into them.
pub(crate) fn read_fits(path: &Path) -> Result<(Vec<u8>, FitsData)> {
    let bytes = fs::read(path).map_err(|source| Error::FileAccess {
        path: path.to_path_buf(),
        source,
    })?;
    let fits = parse_fits(&bytes)?;
    log::debug!("{}: {} HDUs", path.display(), fits.len());
    Ok((bytes, fits))
}
