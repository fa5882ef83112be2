use std::fmt;
use std::ops::RangeInclusive;

use thiserror::Error;

use super::tokenizer::{tokenize, BtopError, BtopToken};

/// Display symbol for a match column.
pub const MATCH_SYMBOL: char = '=';
/// Display symbol for a mismatch column.
pub const MISMATCH_SYMBOL: char = '?';
/// Display symbol for a gap column.
pub const GAP_SYMBOL: char = '_';

/// Tag of a single alignment column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnTag {
    /// Read base equals the reference base.
    Match,
    /// Read base differs from the reference, or one side is an indel.
    Mismatch,
    /// Column inside a gap or intron run.
    Gap,
}

impl ColumnTag {
    /// Whether this column consumes a reference base.
    pub fn consumes_reference(self) -> bool {
        !matches!(self, ColumnTag::Gap)
    }

    /// Single-character rendering of the tag.
    pub fn symbol(self) -> char {
        match self {
            ColumnTag::Match => MATCH_SYMBOL,
            ColumnTag::Mismatch => MISMATCH_SYMBOL,
            ColumnTag::Gap => GAP_SYMBOL,
        }
    }
}

/// Offset could not be mapped onto the alignment.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateError {
    /// The requested reference offset lies past the last reference base.
    #[error("reference offset {offset} out of range ({available} reference bases aligned)")]
    OutOfRange {
        /// Requested 0-based reference offset.
        offset: usize,
        /// Number of reference bases the alignment consumes.
        available: usize,
    },
}

/// Column-wise pseudo-alignment of the reference derived from a BTOP string.
///
/// Columns are kept as runs of equal tags, so a long digit or gap run costs
/// one entry no matter how many columns it claims. Adjacent runs always carry
/// different tags. Column counts saturate at `usize::MAX`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReferenceAlignment {
    runs: Vec<(ColumnTag, usize)>,
    len: usize,
    reference_len: usize,
}

impl ReferenceAlignment {
    /// Collect decoded tokens into column runs.
    pub fn from_tokens(tokens: &[BtopToken]) -> Self {
        let mut alignment = Self::default();
        for token in tokens {
            match *token {
                BtopToken::MatchRun(len) => alignment.push_run(ColumnTag::Match, len),
                BtopToken::GapRun { len, .. } => alignment.push_run(ColumnTag::Gap, len),
                // A pair always occupies exactly one reference column.
                BtopToken::MismatchPair { .. } => alignment.push_run(ColumnTag::Mismatch, 1),
            }
        }
        alignment
    }

    /// Decode a BTOP string and expand it.
    pub fn from_btop(btop: &str) -> Result<Self, BtopError> {
        tokenize(btop).map(|tokens| Self::from_tokens(&tokens))
    }

    fn push_run(&mut self, tag: ColumnTag, count: usize) {
        if count == 0 {
            return;
        }
        self.len = self.len.saturating_add(count);
        if tag.consumes_reference() {
            self.reference_len = self.reference_len.saturating_add(count);
        }
        match self.runs.last_mut() {
            Some((last, run)) if *last == tag => *run = run.saturating_add(count),
            _ => self.runs.push((tag, count)),
        }
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the alignment has no columns.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Runs of equal column tags, in order.
    pub fn runs(&self) -> &[(ColumnTag, usize)] {
        &self.runs
    }

    /// Column tags in order, one per column.
    pub fn columns(&self) -> impl Iterator<Item = ColumnTag> + '_ {
        self.runs
            .iter()
            .flat_map(|&(tag, run)| std::iter::repeat(tag).take(run))
    }

    /// Tag of the column at `index`, if the alignment is that long.
    pub fn tag_at(&self, index: usize) -> Option<ColumnTag> {
        let mut column = 0usize;
        for &(tag, run) in &self.runs {
            let run_end = column.saturating_add(run);
            if index < run_end {
                return Some(tag);
            }
            column = run_end;
        }
        None
    }

    /// Number of reference bases consumed (non-gap columns).
    pub fn reference_len(&self) -> usize {
        self.reference_len
    }

    /// Column index holding the `offset`-th (0-based) reference base.
    ///
    /// Gap columns are skipped, so `column_for_offset(0)` is the first
    /// non-gap column.
    pub fn column_for_offset(&self, offset: usize) -> Result<usize, CoordinateError> {
        let mut column = 0usize;
        let mut consumed = 0usize;
        for &(tag, run) in &self.runs {
            if tag.consumes_reference() {
                // `consumed <= offset` holds on every iteration.
                let within = offset - consumed;
                if within < run {
                    return Ok(column.saturating_add(within));
                }
                consumed = consumed.saturating_add(run);
            }
            column = column.saturating_add(run);
        }
        Err(CoordinateError::OutOfRange {
            offset,
            available: consumed,
        })
    }

    /// Whether every column in `range` is a match column.
    ///
    /// An inverted range and columns past the end of the alignment count as
    /// non-matching.
    pub fn all_match(&self, range: RangeInclusive<usize>) -> bool {
        let (start, end) = range.into_inner();
        if start > end {
            return false;
        }
        let mut column = 0usize;
        for &(tag, run) in &self.runs {
            let run_end = column.saturating_add(run);
            if start < run_end {
                // Neighbouring runs differ in tag, so a matching window lies
                // inside a single match run.
                return tag == ColumnTag::Match && end < run_end;
            }
            column = run_end;
        }
        false
    }
}

impl fmt::Display for ReferenceAlignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for tag in self.columns() {
            write!(f, "{}", tag.symbol())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_mixed_btop() {
        let alignment = ReferenceAlignment::from_btop("4C-CG_10_4").unwrap();
        assert_eq!(alignment.len(), 20);
        assert_eq!(alignment.reference_len(), 10);
        assert_eq!(alignment.to_string(), "====??__________====");
    }

    #[test]
    fn digit_run_is_all_match() {
        let alignment = ReferenceAlignment::from_btop("7").unwrap();
        assert_eq!(alignment.runs(), &[(ColumnTag::Match, 7)]);
        assert_eq!(alignment.columns().collect::<Vec<_>>(), vec![ColumnTag::Match; 7]);
    }

    #[test]
    fn adjacent_pairs_share_one_run() {
        let alignment = ReferenceAlignment::from_btop("2ACGT_3__2_1").unwrap();
        assert_eq!(
            alignment.runs(),
            &[
                (ColumnTag::Match, 2),
                (ColumnTag::Mismatch, 2),
                (ColumnTag::Gap, 5),
                (ColumnTag::Match, 1),
            ]
        );
        assert_eq!(alignment.tag_at(3), Some(ColumnTag::Mismatch));
        assert_eq!(alignment.tag_at(9), Some(ColumnTag::Match));
        assert_eq!(alignment.tag_at(10), None);
    }

    #[test]
    fn huge_runs_stay_compact() {
        let alignment = ReferenceAlignment::from_btop("99999999999999AG_88888888888888_5").unwrap();
        assert_eq!(alignment.runs().len(), 4);
        assert_eq!(alignment.reference_len(), 99_999_999_999_999 + 1 + 5);
        assert_eq!(alignment.column_for_offset(99_999_999_999_999), Ok(99_999_999_999_999));
        assert_eq!(
            alignment.column_for_offset(100_000_000_000_000),
            Ok(99_999_999_999_999 + 1 + 88_888_888_888_888)
        );
        assert!(alignment.all_match(5..=99_999_999_999_998));
        assert!(!alignment.all_match(5..=99_999_999_999_999));
    }

    #[test]
    fn zero_length_runs_add_no_columns() {
        let alignment = ReferenceAlignment::from_btop("3_0_0AC").unwrap();
        assert_eq!(alignment.to_string(), "===?");
    }

    #[test]
    fn translation_skips_gap_columns() {
        let alignment = ReferenceAlignment::from_btop("4C-CG_10_4").unwrap();
        assert_eq!(alignment.column_for_offset(0), Ok(0));
        assert_eq!(alignment.column_for_offset(3), Ok(3));
        assert_eq!(alignment.column_for_offset(5), Ok(5));
        assert_eq!(alignment.column_for_offset(6), Ok(16));
        assert_eq!(alignment.column_for_offset(9), Ok(19));
        assert_eq!(
            alignment.column_for_offset(10),
            Err(CoordinateError::OutOfRange { offset: 10, available: 10 })
        );
    }

    #[test]
    fn leading_gap_is_skipped_for_offset_zero() {
        let alignment = ReferenceAlignment::from_btop("_3_2").unwrap();
        assert_eq!(alignment.column_for_offset(0), Ok(3));
    }

    #[test]
    fn all_match_checks_inclusive_range() {
        let alignment = ReferenceAlignment::from_btop("4C-CG_10_4").unwrap();
        assert!(alignment.all_match(0..=3));
        assert!(!alignment.all_match(3..=4));
        assert!(!alignment.all_match(15..=16));
        assert!(alignment.all_match(16..=19));
        assert!(!alignment.all_match(18..=20));
    }

    #[test]
    fn inverted_range_never_matches() {
        let alignment = ReferenceAlignment::from_btop("10").unwrap();
        assert!(!alignment.all_match(RangeInclusive::new(6, 2)));
    }
}
