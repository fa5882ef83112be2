//! # Variant genotyping from BTOP alignments
//!
//! This library decides, for many sequencing datasets at once, which of a
//! known set of candidate variants are present and whether each present
//! variant looks homozygous or heterozygous.
//!
//! ## Core Algorithm
//!
//! 1. **BTOP decoding**: split the compact BTOP operation string into match
//!    runs, mismatch pairs and gap runs, then expand it into one tag per
//!    alignment column
//! 2. **Coordinate translation**: map a variant's offset inside its flanking
//!    sequence onto the alignment's columns, skipping gap columns
//! 3. **Span/match evaluation**: a read counts for a variant only when its
//!    reference interval fully contains the variant; it matches when every
//!    column of the variant is a match column
//! 4. **Aggregation and calling**: per dataset, count matching and mismatching
//!    spanning reads per variant and classify the match ratio
//!
//! Datasets are split into contiguous partitions processed by a bounded
//! worker pool; results are always returned in input order.
//!
//! ## Usage Example
//!
//! ```
//! use std::collections::HashMap;
//! use std::sync::Arc;
//! use btopcall::{AlignmentRecord, CallerConfig, DatasetEntry, VariantBoundary, VariantCaller, VariantTable};
//!
//! let mut table = VariantTable::new();
//! table.insert("rs1", VariantBoundary::new(3, 3));
//!
//! let mut source = HashMap::new();
//! source.insert(
//!     "SRR1".to_string(),
//!     vec![AlignmentRecord::new("rs1", 0, 10, "10").unwrap()],
//! );
//!
//! let caller = VariantCaller::new(Arc::new(table), CallerConfig::new());
//! let results = caller.call(&[DatasetEntry::new("SRR1", "SRR1.mbo")], &source).unwrap();
//! assert_eq!(results[0].homozygous, vec!["rs1".to_string()]);
//! ```

#![warn(missing_docs, missing_debug_implementations)]
#![allow(clippy::new_without_default)]

pub mod btop;       // BTOP tokenizer and reference pseudo-alignment
pub mod calling;    // Span/match evaluation, aggregation, genotype calls
pub mod io;         // Manifest, variant table, alignment and report files
pub mod partition;  // Partition driver and worker pool
pub mod types;      // Shared data model

pub use btop::{tokenize, BtopError, BtopToken, ColumnTag, CoordinateError, ReferenceAlignment};
pub use calling::{
    call_genotypes, evaluate_read, spans_variant, DatasetStats, FrequencyAggregator, Genotype,
    ReadVerdict, VariantFrequencies, VariantFrequency,
};
pub use io::{MagicBlastSource, ParseError};
pub use types::{AlignmentRecord, DatasetEntry, DatasetResult, VariantBoundary, VariantTable};

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

/// Configuration parameters for a calling run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerConfig {
    /// Number of dataset partitions processed in parallel (1 = sequential).
    pub threads: usize,
}

impl CallerConfig {
    /// Sequential configuration.
    pub fn new() -> Self {
        Self { threads: 1 }
    }

    /// Set the degree of parallelism.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Check the configuration before any work is scheduled.
    pub fn validate(&self) -> Result<(), CallerError> {
        if self.threads == 0 {
            return Err(CallerError::InvalidConfiguration(
                "thread count must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Errors that terminate a calling run.
///
/// Data-level anomalies (malformed BTOP, unknown variant accessions) never
/// surface here; they are logged and the offending record is skipped.
#[derive(Error, Debug)]
pub enum CallerError {
    /// Invalid run configuration.
    #[error("invalid caller configuration: {0}")]
    InvalidConfiguration(String),

    /// An input file could not be opened or read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// Offending path.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// A manifest or variant table line could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// An in-memory alignment source has no records for the dataset.
    #[error("no alignments registered for dataset {0}")]
    UnknownDataset(String),

    /// The worker pool could not be created.
    #[error("failed to build worker pool: {0}")]
    ThreadPool(String),
}

/// Supplies the alignment records of one dataset to a worker.
pub trait AlignmentSource: Sync {
    /// Load every alignment record of `dataset`, in file order.
    fn load(&self, dataset: &DatasetEntry) -> Result<Vec<AlignmentRecord>, CallerError>;
}

impl AlignmentSource for HashMap<String, Vec<AlignmentRecord>> {
    fn load(&self, dataset: &DatasetEntry) -> Result<Vec<AlignmentRecord>, CallerError> {
        self.get(&dataset.accession)
            .cloned()
            .ok_or_else(|| CallerError::UnknownDataset(dataset.accession.clone()))
    }
}

/// Main calling orchestrator.
///
/// Holds the read-only variant table shared by every worker.
#[derive(Debug, Clone)]
pub struct VariantCaller {
    table: Arc<VariantTable>,
    config: CallerConfig,
}

impl VariantCaller {
    /// Create a caller over a fully loaded variant table.
    pub fn new(table: Arc<VariantTable>, config: CallerConfig) -> Self {
        Self { table, config }
    }

    /// Variant table used for every dataset.
    pub fn table(&self) -> &VariantTable {
        &self.table
    }

    /// Call genotypes for every dataset, returning results in input order.
    pub fn call<S: AlignmentSource>(
        &self,
        datasets: &[DatasetEntry],
        source: &S,
    ) -> Result<Vec<DatasetResult>, CallerError> {
        self.call_with_stats(datasets, source)
            .map(|(results, _)| results)
    }

    /// Same as [`VariantCaller::call`], also returning record counters summed
    /// over all datasets.
    pub fn call_with_stats<S: AlignmentSource>(
        &self,
        datasets: &[DatasetEntry],
        source: &S,
    ) -> Result<(Vec<DatasetResult>, DatasetStats), CallerError> {
        self.config.validate()?;

        let outcomes = partition::process_partitions(datasets, self.config.threads, |dataset| {
            let records = source.load(dataset)?;
            Ok(self.call_dataset_with_stats(&dataset.accession, &records))
        })?;

        let mut total = DatasetStats::default();
        let results = outcomes
            .into_iter()
            .map(|(result, stats)| {
                total += stats;
                result
            })
            .collect();
        Ok((results, total))
    }

    /// Aggregate and classify the records of a single dataset.
    pub fn call_dataset(&self, accession: &str, records: &[AlignmentRecord]) -> DatasetResult {
        self.call_dataset_with_stats(accession, records).0
    }

    fn call_dataset_with_stats(
        &self,
        accession: &str,
        records: &[AlignmentRecord],
    ) -> (DatasetResult, DatasetStats) {
        let mut aggregator = FrequencyAggregator::new(&self.table);
        for record in records {
            if let Err(err) = aggregator.observe(record) {
                warn!(
                    dataset = accession,
                    variant = record.variant(),
                    error = %err,
                    "skipping malformed alignment record"
                );
            }
        }

        let (frequencies, stats) = aggregator.finish();
        let result = call_genotypes(accession, &frequencies);
        debug!(
            dataset = accession,
            records = stats.records,
            spanning = stats.spanning,
            malformed = stats.malformed,
            unknown_variant = stats.unknown_variant,
            homozygous = result.homozygous.len(),
            heterozygous = result.heterozygous.len(),
            "dataset processed"
        );
        (result, stats)
    }
}
