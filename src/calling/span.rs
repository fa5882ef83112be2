use crate::btop::{BtopError, ReferenceAlignment};
use crate::types::{AlignmentRecord, VariantBoundary};

/// Outcome of checking one read against one variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReadVerdict {
    /// The read does not cover the whole variant; it is not counted.
    NotSpanning,
    /// Every variant column is a match column.
    Match,
    /// At least one variant column is a mismatch or gap.
    Mismatch,
}

/// Whether the read's reference interval fully contains the variant.
///
/// An inverted boundary (`start > stop`) covers nothing and is never spanned.
pub fn spans_variant(record: &AlignmentRecord, boundary: &VariantBoundary) -> bool {
    boundary.start <= boundary.stop
        && record.start() <= boundary.start
        && boundary.stop <= record.stop()
}

/// Decide whether `record` spans `boundary` and, if so, whether it matches.
///
/// The BTOP string is only decoded for spanning reads. Variant offsets that
/// fall past the alignment's last reference base yield
/// [`ReadVerdict::NotSpanning`].
pub fn evaluate_read(
    record: &AlignmentRecord,
    boundary: &VariantBoundary,
) -> Result<ReadVerdict, BtopError> {
    if !spans_variant(record, boundary) {
        return Ok(ReadVerdict::NotSpanning);
    }

    // Both ends are shifted by the alignment start.
    let (Ok(local_start), Ok(local_stop)) = (
        usize::try_from(boundary.start - record.start()),
        usize::try_from(boundary.stop - record.start()),
    ) else {
        return Ok(ReadVerdict::NotSpanning);
    };

    let alignment = ReferenceAlignment::from_btop(record.btop())?;
    let (Ok(column_start), Ok(column_stop)) = (
        alignment.column_for_offset(local_start),
        alignment.column_for_offset(local_stop),
    ) else {
        return Ok(ReadVerdict::NotSpanning);
    };

    if alignment.all_match(column_start..=column_stop) {
        Ok(ReadVerdict::Match)
    } else {
        Ok(ReadVerdict::Mismatch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(start: u64, stop: u64, btop: &str) -> AlignmentRecord {
        AlignmentRecord::new("test", start, stop, btop).unwrap()
    }

    #[test]
    fn span_requires_both_ends_inside() {
        let read = record(10, 20, "11");
        assert!(spans_variant(&read, &VariantBoundary::new(10, 20)));
        assert!(spans_variant(&read, &VariantBoundary::new(15, 15)));
        assert!(!spans_variant(&read, &VariantBoundary::new(9, 12)));
        assert!(!spans_variant(&read, &VariantBoundary::new(18, 21)));
    }

    #[test]
    fn inverted_boundary_is_not_spanning() {
        let read = record(0, 10, "11");
        let inverted = VariantBoundary { start: 6, stop: 2 };
        assert!(!spans_variant(&read, &inverted));
        assert_eq!(evaluate_read(&read, &inverted), Ok(ReadVerdict::NotSpanning));
    }

    #[test]
    fn match_and_mismatch_columns() {
        let read = record(0, 10, "4C-CG_10_4");
        assert_eq!(evaluate_read(&read, &VariantBoundary::new(3, 3)), Ok(ReadVerdict::Match));
        assert_eq!(evaluate_read(&read, &VariantBoundary::new(4, 4)), Ok(ReadVerdict::Mismatch));
        assert_eq!(evaluate_read(&read, &VariantBoundary::new(3, 4)), Ok(ReadVerdict::Mismatch));
        assert_eq!(evaluate_read(&read, &VariantBoundary::new(6, 9)), Ok(ReadVerdict::Match));
    }

    #[test]
    fn gap_inside_variant_is_mismatch() {
        // Offsets 5 and 6 sit on either side of the ten gap columns.
        let read = record(0, 10, "6_10_4");
        assert_eq!(evaluate_read(&read, &VariantBoundary::new(4, 5)), Ok(ReadVerdict::Match));
        assert_eq!(evaluate_read(&read, &VariantBoundary::new(5, 6)), Ok(ReadVerdict::Mismatch));
    }

    #[test]
    fn offsets_are_relative_to_alignment_start() {
        let read = record(100, 110, "2AG8");
        assert_eq!(evaluate_read(&read, &VariantBoundary::new(102, 102)), Ok(ReadVerdict::Mismatch));
        assert_eq!(evaluate_read(&read, &VariantBoundary::new(103, 110)), Ok(ReadVerdict::Match));
    }

    #[test]
    fn offset_past_alignment_is_not_spanning() {
        let read = record(0, 10, "4C-CG_10_4");
        assert_eq!(evaluate_read(&read, &VariantBoundary::new(10, 10)), Ok(ReadVerdict::NotSpanning));
    }

    #[test]
    fn non_spanning_read_is_not_decoded() {
        let read = record(50, 60, "not a btop");
        assert_eq!(evaluate_read(&read, &VariantBoundary::new(10, 12)), Ok(ReadVerdict::NotSpanning));
    }

    #[test]
    fn oversized_run_is_evaluated_without_expansion() {
        let read = record(0, 10, "99999999999999");
        assert_eq!(evaluate_read(&read, &VariantBoundary::new(3, 5)), Ok(ReadVerdict::Match));
        let read = record(0, 10, "3_99999999999999_7");
        assert_eq!(evaluate_read(&read, &VariantBoundary::new(2, 3)), Ok(ReadVerdict::Mismatch));
    }

    #[test]
    fn malformed_btop_is_reported_for_spanning_read() {
        let read = record(0, 10, "4A5");
        assert!(evaluate_read(&read, &VariantBoundary::new(2, 2)).is_err());
    }
}
