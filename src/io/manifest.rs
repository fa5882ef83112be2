use std::io::BufRead;
use std::path::Path;

use tracing::info;

use super::{content_lines, open, ParseError};
use crate::types::DatasetEntry;
use crate::CallerError;

/// Read the dataset manifest (`<accession> <alignment path>` per line).
pub fn read_manifest<P: AsRef<Path>>(path: P) -> Result<Vec<DatasetEntry>, CallerError> {
    let path = path.as_ref();
    let datasets = parse_manifest(open(path)?, path)?;
    info!(path = %path.display(), datasets = datasets.len(), "loaded manifest");
    Ok(datasets)
}

/// Parse manifest lines from any reader; `path` is only used in diagnostics.
pub fn parse_manifest<R: BufRead>(
    reader: R,
    path: &Path,
) -> Result<Vec<DatasetEntry>, CallerError> {
    let mut datasets = Vec::new();
    for line in content_lines(reader, path) {
        let (line_no, line) = line?;
        let mut fields = line.split_whitespace();
        match (fields.next(), fields.next()) {
            (Some(accession), Some(alignment_path)) => {
                datasets.push(DatasetEntry::new(accession, alignment_path));
            }
            _ => {
                return Err(ParseError::new(
                    path,
                    line_no,
                    "expected '<dataset accession> <alignment path>'",
                )
                .into())
            }
        }
    }
    Ok(datasets)
}
