use std::io::BufRead;
use std::path::Path;

use tracing::{info, warn};

use super::{content_lines, open, ParseError};
use crate::types::{VariantBoundary, VariantTable};
use crate::CallerError;

/// Read the variant boundary table (`<accession> <start> <stop>` per line).
pub fn read_variant_table<P: AsRef<Path>>(path: P) -> Result<VariantTable, CallerError> {
    let path = path.as_ref();
    let table = parse_variant_table(open(path)?, path)?;
    info!(path = %path.display(), variants = table.len(), "loaded variant boundaries");
    Ok(table)
}

/// Parse boundary lines from any reader; `path` is only used in diagnostics.
///
/// A repeated accession replaces the earlier entry.
pub fn parse_variant_table<R: BufRead>(
    reader: R,
    path: &Path,
) -> Result<VariantTable, CallerError> {
    let mut table = VariantTable::new();
    for line in content_lines(reader, path) {
        let (line_no, line) = line?;
        let mut fields = line.split_whitespace();
        let (Some(accession), Some(start), Some(stop)) =
            (fields.next(), fields.next(), fields.next())
        else {
            return Err(ParseError::new(
                path,
                line_no,
                "expected '<variant accession> <start> <stop>'",
            )
            .into());
        };

        let parse_offset = |field: &str| {
            field.parse::<u64>().map_err(|_| {
                ParseError::new(path, line_no, format!("invalid offset '{field}'"))
            })
        };
        let start = parse_offset(start)?;
        let stop = parse_offset(stop)?;
        if start > stop {
            return Err(ParseError::new(
                path,
                line_no,
                format!("start {start} is past stop {stop} for {accession}"),
            )
            .into());
        }

        if table.insert(accession, VariantBoundary::new(start, stop)).is_some() {
            warn!(
                variant = accession,
                line = line_no,
                "duplicate variant boundary, keeping the last one"
            );
        }
    }
    Ok(table)
}
