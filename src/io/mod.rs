//! File-backed collaborators: manifest, variant boundary table, Magic-BLAST
//! alignments and the TSV report.
//!
//! All inputs are whitespace-delimited text. Blank lines and lines starting
//! with `#` are skipped everywhere.

mod boundaries;
mod magicblast;
mod manifest;
mod report;

pub use boundaries::{parse_variant_table, read_variant_table};
pub use magicblast::{parse_alignment_line, parse_alignments, read_alignments, MagicBlastSource};
pub use manifest::{parse_manifest, read_manifest};
pub use report::{render_report, write_report, REPORT_HEADER};

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::CallerError;

/// A line of an input table could not be interpreted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{}:{line}: {message}", path.display())]
pub struct ParseError {
    /// File being parsed.
    pub path: PathBuf,
    /// 1-based line number.
    pub line: usize,
    /// What was wrong with the line.
    pub message: String,
}

impl ParseError {
    pub(crate) fn new(path: &Path, line: usize, message: impl Into<String>) -> Self {
        Self {
            path: path.to_path_buf(),
            line,
            message: message.into(),
        }
    }
}

pub(crate) fn open(path: &Path) -> Result<BufReader<File>, CallerError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| CallerError::Io {
            path: path.to_path_buf(),
            source,
        })
}

/// Non-blank, non-comment lines with their 1-based line numbers.
///
/// A line that is not valid UTF-8 yields [`CallerError::Parse`] and the
/// iterator moves on to the next line; read failures yield
/// [`CallerError::Io`].
pub(crate) fn content_lines<'a, R: BufRead + 'a>(
    mut reader: R,
    path: &'a Path,
) -> impl Iterator<Item = Result<(usize, String), CallerError>> + 'a {
    let mut buf = Vec::new();
    let mut line_no = 0usize;
    std::iter::from_fn(move || loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => return None,
            Ok(_) => line_no += 1,
            Err(source) => {
                return Some(Err(CallerError::Io {
                    path: path.to_path_buf(),
                    source,
                }))
            }
        }
        let Ok(line) = std::str::from_utf8(&buf) else {
            return Some(Err(CallerError::Parse(ParseError::new(
                path,
                line_no,
                "line is not valid UTF-8",
            ))));
        };
        let line = line.trim_end_matches(|c: char| c == '\n' || c == '\r');
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        return Some(Ok((line_no, line.to_string())));
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn content_lines_skip_comments_and_blanks() {
        let input = "# header\n\nfirst line\n   \nsecond line\n";
        let lines: Vec<(usize, String)> = content_lines(Cursor::new(input), Path::new("in.txt"))
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(
            lines,
            vec![(3, "first line".to_string()), (5, "second line".to_string())]
        );
    }

    #[test]
    fn invalid_utf8_line_is_a_parse_error_for_that_line_only() {
        let input: &[u8] = b"first\r\nbad \xff byte\nthird";
        let lines: Vec<_> = content_lines(input, Path::new("in.txt")).collect();
        assert_eq!(lines.len(), 3);
        assert!(matches!(lines[0], Ok((1, ref line)) if line == "first"));
        assert!(matches!(lines[1], Err(CallerError::Parse(ParseError { line: 2, .. }))));
        assert!(matches!(lines[2], Ok((3, ref line)) if line == "third"));
    }

    #[test]
    fn missing_file_names_path() {
        let err = open(Path::new("/definitely/not/here.txt")).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.txt"));
    }
}
