//! Shared data model: alignment records, variant boundaries, manifest
//! entries and per-dataset results.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One read's alignment to the flanking sequence of a candidate variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentRecord {
    variant: Arc<str>,
    start: u64,
    stop: u64,
    btop: String,
}

impl AlignmentRecord {
    /// Construct a record, swapping `start`/`stop` if they are reversed.
    ///
    /// Returns `None` when the BTOP string is empty.
    pub fn new(
        variant: impl Into<Arc<str>>,
        start: u64,
        stop: u64,
        btop: impl Into<String>,
    ) -> Option<Self> {
        let btop = btop.into();
        if btop.is_empty() {
            return None;
        }
        let (start, stop) = if start > stop { (stop, start) } else { (start, stop) };
        Some(Self {
            variant: variant.into(),
            start,
            stop,
            btop,
        })
    }

    /// Accession of the variant whose flanking sequence the read aligned to.
    pub fn variant(&self) -> &str {
        &self.variant
    }

    /// Shared handle to the variant accession.
    pub fn variant_arc(&self) -> &Arc<str> {
        &self.variant
    }

    /// First reference position covered (inclusive).
    pub fn start(&self) -> u64 {
        self.start
    }

    /// Last reference position covered (inclusive).
    pub fn stop(&self) -> u64 {
        self.stop
    }

    /// BTOP operation string.
    pub fn btop(&self) -> &str {
        &self.btop
    }
}

/// Location of a candidate variant inside its flanking sequence (0-based, inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VariantBoundary {
    /// First variant position.
    pub start: u64,
    /// Last variant position.
    pub stop: u64,
}

impl VariantBoundary {
    /// Construct a boundary, swapping `start`/`stop` if they are reversed.
    pub fn new(start: u64, stop: u64) -> Self {
        let (start, stop) = if start > stop { (stop, start) } else { (start, stop) };
        Self { start, stop }
    }
}

/// Read-only lookup from variant accession to boundary.
#[derive(Debug, Clone, Default)]
pub struct VariantTable {
    boundaries: HashMap<Arc<str>, VariantBoundary>,
}

impl VariantTable {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a boundary, returning the previous one for the accession.
    pub fn insert(
        &mut self,
        accession: impl Into<Arc<str>>,
        boundary: VariantBoundary,
    ) -> Option<VariantBoundary> {
        self.boundaries.insert(accession.into(), boundary)
    }

    /// Boundary of `accession`, if known.
    pub fn get(&self, accession: &str) -> Option<&VariantBoundary> {
        self.boundaries.get(accession)
    }

    /// Number of variants.
    pub fn len(&self) -> usize {
        self.boundaries.len()
    }

    /// Whether the table has no variants.
    pub fn is_empty(&self) -> bool {
        self.boundaries.is_empty()
    }
}

impl<K: Into<Arc<str>>> FromIterator<(K, VariantBoundary)> for VariantTable {
    fn from_iter<I: IntoIterator<Item = (K, VariantBoundary)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (accession, boundary) in iter {
            table.insert(accession, boundary);
        }
        table
    }
}

/// Dataset listed in the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetEntry {
    /// Dataset accession.
    pub accession: String,
    /// Path of the dataset's alignment file.
    pub path: PathBuf,
}

impl DatasetEntry {
    /// Construct a manifest entry.
    pub fn new(accession: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            accession: accession.into(),
            path: path.into(),
        }
    }
}

/// Called variants of one dataset, in order of first spanning read.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DatasetResult {
    /// Dataset accession.
    pub accession: String,
    /// Variants called homozygous.
    pub homozygous: Vec<String>,
    /// Variants called heterozygous.
    pub heterozygous: Vec<String>,
}

impl DatasetResult {
    /// Result with no called variants.
    pub fn empty(accession: impl Into<String>) -> Self {
        Self {
            accession: accession.into(),
            ..Self::default()
        }
    }
}
