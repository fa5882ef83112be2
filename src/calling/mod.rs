//! Per-read evaluation, per-dataset aggregation and genotype calls.

mod frequency;
mod genotype;
mod span;

pub use frequency::{DatasetStats, FrequencyAggregator, VariantFrequencies, VariantFrequency};
pub use genotype::{
    call_genotypes, classify_ratio, Genotype, HETEROZYGOUS_MIN_RATIO, HOMOZYGOUS_MIN_RATIO,
};
pub use span::{evaluate_read, spans_variant, ReadVerdict};
