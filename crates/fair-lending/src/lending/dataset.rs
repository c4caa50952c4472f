use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use super::domain::LoanRecord;

/// Errors raised while reading a loan application CSV export.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("failed to open dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid loan CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("dataset contains no records")]
    Empty,
}

/// Read every row of a headered CSV file. Columns not in [`LoanRecord`] (such as `id`) are
/// ignored and `loan_status` may be absent.
pub fn read_records(path: impl AsRef<Path>) -> Result<Vec<LoanRecord>, DatasetError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    from_reader(file)
}

pub fn from_reader<R: Read>(reader: R) -> Result<Vec<LoanRecord>, DatasetError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let records = csv_reader
        .deserialize::<LoanRecord>()
        .collect::<Result<Vec<_>, _>>()?;

    if records.is_empty() {
        return Err(DatasetError::Empty);
    }
    Ok(records)
}
