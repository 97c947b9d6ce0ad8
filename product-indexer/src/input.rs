//! Input loading for the catalog and order history exports.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::IndexingError;

/// Read a JSON array of records from a file.
///
/// A missing file or a document that is not an array of records is fatal;
/// individual malformed fields are handled later by the pipeline.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, IndexingError> {
    let file = File::open(path).map_err(|e| IndexingError::input(path, e))?;
    let records: Vec<T> =
        serde_json::from_reader(BufReader::new(file)).map_err(|e| IndexingError::input(path, e))?;

    debug!(count = records.len(), "Loaded records");
    Ok(records)
}
