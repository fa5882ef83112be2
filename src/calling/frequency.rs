use std::ops::AddAssign;
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::trace;

use crate::btop::BtopError;
use crate::calling::span::{evaluate_read, ReadVerdict};
use crate::types::{AlignmentRecord, VariantTable};

/// Matching and mismatching spanning reads for one variant in one dataset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VariantFrequency {
    /// Spanning reads whose variant columns all match.
    pub matches: u64,
    /// Spanning reads with a mismatch or gap in the variant columns.
    pub mismatches: u64,
}

impl VariantFrequency {
    /// Construct from explicit counts.
    pub fn new(matches: u64, mismatches: u64) -> Self {
        Self { matches, mismatches }
    }

    /// Total spanning reads.
    pub fn total(&self) -> u64 {
        self.matches + self.mismatches
    }

    /// Fraction of spanning reads that match, `None` without reads.
    pub fn match_ratio(&self) -> Option<f64> {
        match self.total() {
            0 => None,
            total => Some(self.matches as f64 / total as f64),
        }
    }
}

/// Per-variant frequencies of one dataset, in order of first spanning read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariantFrequencies {
    entries: IndexMap<Arc<str>, VariantFrequency>,
}

impl VariantFrequencies {
    /// Empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one spanning read for `variant`, creating its entry on first sight.
    pub fn record(&mut self, variant: &Arc<str>, matched: bool) {
        let entry = self.entries.entry(Arc::clone(variant)).or_default();
        if matched {
            entry.matches += 1;
        } else {
            entry.mismatches += 1;
        }
    }

    /// Frequency of `variant`, if any read spanned it.
    pub fn get(&self, variant: &str) -> Option<&VariantFrequency> {
        self.entries.get(variant)
    }

    /// Entries in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &VariantFrequency)> {
        self.entries
            .iter()
            .map(|(variant, frequency)| (variant.as_ref(), frequency))
    }

    /// Number of variants with at least one spanning read.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no read spanned any variant.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Record counters for one or more datasets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DatasetStats {
    /// Records seen.
    pub records: u64,
    /// Records counted towards a variant frequency.
    pub spanning: u64,
    /// Spanning records rejected for a malformed BTOP string.
    pub malformed: u64,
    /// Records referencing a variant missing from the table.
    pub unknown_variant: u64,
}

impl AddAssign for DatasetStats {
    fn add_assign(&mut self, other: Self) {
        self.records += other.records;
        self.spanning += other.spanning;
        self.malformed += other.malformed;
        self.unknown_variant += other.unknown_variant;
    }
}

/// Accumulates the records of a single dataset against the variant table.
#[derive(Debug)]
pub struct FrequencyAggregator<'a> {
    table: &'a VariantTable,
    frequencies: VariantFrequencies,
    stats: DatasetStats,
}

impl<'a> FrequencyAggregator<'a> {
    /// Start a fresh aggregation.
    pub fn new(table: &'a VariantTable) -> Self {
        Self {
            table,
            frequencies: VariantFrequencies::new(),
            stats: DatasetStats::default(),
        }
    }

    /// Evaluate one record and update the frequencies.
    ///
    /// Unknown variants are counted and reported as not spanning. A malformed
    /// BTOP string is counted and returned as an error; the record leaves no
    /// trace in the frequencies.
    pub fn observe(&mut self, record: &AlignmentRecord) -> Result<ReadVerdict, BtopError> {
        self.stats.records += 1;

        let Some(boundary) = self.table.get(record.variant()) else {
            trace!(variant = record.variant(), "variant not in boundary table");
            self.stats.unknown_variant += 1;
            return Ok(ReadVerdict::NotSpanning);
        };

        let verdict = evaluate_read(record, boundary).inspect_err(|_| {
            self.stats.malformed += 1;
        })?;

        match verdict {
            ReadVerdict::NotSpanning => {}
            ReadVerdict::Match | ReadVerdict::Mismatch => {
                self.stats.spanning += 1;
                self.frequencies
                    .record(record.variant_arc(), verdict == ReadVerdict::Match);
            }
        }
        Ok(verdict)
    }

    /// Frequencies accumulated so far.
    pub fn frequencies(&self) -> &VariantFrequencies {
        &self.frequencies
    }

    /// Consume the aggregator.
    pub fn finish(self) -> (VariantFrequencies, DatasetStats) {
        (self.frequencies, self.stats)
    }
}
