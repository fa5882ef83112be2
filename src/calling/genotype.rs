use crate::calling::frequency::{VariantFrequencies, VariantFrequency};
use crate::types::DatasetResult;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Match ratios strictly above this are called homozygous.
pub const HOMOZYGOUS_MIN_RATIO: f64 = 0.8;
/// Match ratios strictly above this (and not homozygous) are called heterozygous.
pub const HETEROZYGOUS_MIN_RATIO: f64 = 0.3;

/// Genotype call for one variant in one dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Genotype {
    /// Nearly all spanning reads match.
    Homozygous,
    /// A substantial fraction of spanning reads match.
    Heterozygous,
    /// Too few matching reads; omitted from output.
    NotCalled,
}

/// Classify a match ratio in `[0, 1]`.
pub fn classify_ratio(ratio: f64) -> Genotype {
    if ratio > HOMOZYGOUS_MIN_RATIO {
        Genotype::Homozygous
    } else if ratio > HETEROZYGOUS_MIN_RATIO {
        Genotype::Heterozygous
    } else {
        Genotype::NotCalled
    }
}

impl VariantFrequency {
    /// Genotype implied by the counts; no reads means no call.
    pub fn genotype(&self) -> Genotype {
        self.match_ratio()
            .map_or(Genotype::NotCalled, classify_ratio)
    }
}

/// Classify every variant of a dataset, keeping first-seen order.
pub fn call_genotypes(accession: &str, frequencies: &VariantFrequencies) -> DatasetResult {
    let mut result = DatasetResult::empty(accession);
    for (variant, frequency) in frequencies.iter() {
        match frequency.genotype() {
            Genotype::Homozygous => result.homozygous.push(variant.to_string()),
            Genotype::Heterozygous => result.heterozygous.push(variant.to_string()),
            Genotype::NotCalled => {}
        }
    }
    result
}
