//! BTOP decoding.
//!
//! A BTOP string describes a pairwise alignment as bare digit counts for runs
//! of matching bases, two-character pairs for mismatches and single-base
//! indels, and marker-delimited runs for gaps and introns. This module turns
//! that string into typed tokens and then into a reference pseudo-alignment
//! with one tag per alignment column.

mod alignment;
mod tokenizer;

pub use alignment::{
    ColumnTag, CoordinateError, ReferenceAlignment, GAP_SYMBOL, MATCH_SYMBOL, MISMATCH_SYMBOL,
};
pub use tokenizer::{
    split_btop, tokenize, BtopError, BtopToken, GAP_MARKER, INDEL_BASE, INTRON_MARKER,
};
