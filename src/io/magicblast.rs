use std::io::BufRead;
use std::path::Path;

use tracing::{debug, warn};

use super::{content_lines, open, ParseError};
use crate::types::{AlignmentRecord, DatasetEntry};
use crate::{AlignmentSource, CallerError};

// Zero-based columns of Magic-BLAST tabular output.
const SUBJECT_COLUMN: usize = 1;
const SUBJECT_START_COLUMN: usize = 8;
const SUBJECT_STOP_COLUMN: usize = 9;
const BTOP_COLUMN: usize = 16;

/// Parse one tabular Magic-BLAST line into an alignment record.
pub fn parse_alignment_line(
    line: &str,
    path: &Path,
    line_no: usize,
) -> Result<AlignmentRecord, ParseError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() <= BTOP_COLUMN {
        return Err(ParseError::new(
            path,
            line_no,
            format!("expected at least {} columns, found {}", BTOP_COLUMN + 1, fields.len()),
        ));
    }

    let coordinate = |column: usize| {
        fields[column].parse::<u64>().map_err(|_| {
            ParseError::new(
                path,
                line_no,
                format!("invalid reference coordinate '{}'", fields[column]),
            )
        })
    };
    let start = coordinate(SUBJECT_START_COLUMN)?;
    let stop = coordinate(SUBJECT_STOP_COLUMN)?;

    AlignmentRecord::new(fields[SUBJECT_COLUMN], start, stop, fields[BTOP_COLUMN])
        .ok_or_else(|| ParseError::new(path, line_no, "empty BTOP string"))
}

/// Parse alignment lines from any reader.
///
/// Lines that cannot be parsed, including lines that are not valid UTF-8,
/// are logged and skipped; only read failures are returned as errors.
pub fn parse_alignments<R: BufRead>(
    reader: R,
    path: &Path,
) -> Result<Vec<AlignmentRecord>, CallerError> {
    let mut records = Vec::new();
    let mut skipped = 0usize;
    for line in content_lines(reader, path) {
        let (line_no, line) = match line {
            Ok(line) => line,
            Err(CallerError::Parse(err)) => {
                warn!(error = %err, "skipping unreadable alignment line");
                skipped += 1;
                continue;
            }
            Err(err) => return Err(err),
        };
        match parse_alignment_line(&line, path, line_no) {
            Ok(record) => records.push(record),
            Err(err) => {
                warn!(error = %err, "skipping unparsable alignment line");
                skipped += 1;
            }
        }
    }
    debug!(path = %path.display(), records = records.len(), skipped, "loaded alignments");
    Ok(records)
}

/// Read every alignment record of a Magic-BLAST tabular file.
pub fn read_alignments<P: AsRef<Path>>(path: P) -> Result<Vec<AlignmentRecord>, CallerError> {
    let path = path.as_ref();
    parse_alignments(open(path)?, path)
}

/// Loads each dataset from the alignment file named in its manifest entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct MagicBlastSource;

impl AlignmentSource for MagicBlastSource {
    fn load(&self, dataset: &DatasetEntry) -> Result<Vec<AlignmentRecord>, CallerError> {
        read_alignments(&dataset.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const LINE: &str = "read1\trs42\t100.00\t50\t0\t0\t1\t50\t130\t81\t0\t0\t50\t+\t-\t50\t4C-CG_10_4\t1\t50";

    #[test]
    fn parses_columns_and_swaps_reversed_coordinates() {
        let record = parse_alignment_line(LINE, Path::new("a.mbo"), 1).unwrap();
        assert_eq!(record.variant(), "rs42");
        assert_eq!(record.start(), 81);
        assert_eq!(record.stop(), 130);
        assert_eq!(record.btop(), "4C-CG_10_4");
    }

    #[test]
    fn short_and_bad_lines_are_skipped() {
        let input = format!(
            "# BLASTN 2.7\n{LINE}\nread2 rs1 too short\n{}\n",
            LINE.replace("\t130\t", "\tx\t")
        );
        let records = parse_alignments(Cursor::new(input), Path::new("a.mbo")).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].variant(), "rs42");
    }

    #[test]
    fn non_utf8_line_is_skipped() {
        let mut input = format!("{LINE}\n").into_bytes();
        input.extend_from_slice(LINE.replace("rs42", "rs43").as_bytes());
        input.extend_from_slice(b"\xff\n");
        let records = parse_alignments(Cursor::new(input), Path::new("a.mbo")).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].variant(), "rs42");
    }

    #[test]
    fn missing_file_is_fatal() {
        let source = MagicBlastSource;
        let err = source
            .load(&DatasetEntry::new("SRR1", "/no/such/SRR1.mbo"))
            .unwrap_err();
        assert!(matches!(err, CallerError::Io { .. }));
    }
}
