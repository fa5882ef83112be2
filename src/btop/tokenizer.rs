use std::fmt;

use thiserror::Error;

/// Marker delimiting a gap run, e.g. `_10_`.
pub const GAP_MARKER: u8 = b'_';
/// Marker delimiting an intron; treated exactly like [`GAP_MARKER`].
pub const INTRON_MARKER: u8 = b'^';
/// Placeholder base for a single-base insertion or deletion inside a pair.
pub const INDEL_BASE: u8 = b'-';

/// One decoded BTOP operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BtopToken {
    /// `N` consecutive matching bases.
    MatchRun(usize),
    /// A single mismatched (or indel) column.
    MismatchPair {
        /// Base of the read (query).
        query: u8,
        /// Base of the reference (subject).
        reference: u8,
    },
    /// A contiguous gap of `len` bases.
    GapRun {
        /// Gap length in bases.
        len: usize,
        /// Whether the run was written with intron markers.
        intron: bool,
    },
}

impl fmt::Display for BtopToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            BtopToken::MatchRun(len) => write!(f, "{len}"),
            BtopToken::MismatchPair { query, reference } => {
                write!(f, "{}{}", query as char, reference as char)
            }
            BtopToken::GapRun { len, intron } => {
                let marker = (if intron { INTRON_MARKER } else { GAP_MARKER }) as char;
                write!(f, "{marker}{len}{marker}")
            }
        }
    }
}

/// Errors raised while decoding a BTOP string.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BtopError {
    /// The BTOP string was empty.
    #[error("empty BTOP string")]
    Empty,

    /// A token is neither a digit run, a gap run nor a two-character pair.
    #[error("malformed BTOP token '{token}' at offset {offset}")]
    MalformedToken {
        /// Offending token text.
        token: String,
        /// Byte offset of the token in the BTOP string.
        offset: usize,
    },

    /// A gap region was opened but never closed.
    #[error("unterminated gap region '{token}' at offset {offset}")]
    UnterminatedGap {
        /// Offending token text.
        token: String,
        /// Byte offset of the token in the BTOP string.
        offset: usize,
    },

    /// A run length does not fit in a machine word.
    #[error("run length '{token}' at offset {offset} is too large")]
    LengthOverflow {
        /// Offending token text.
        token: String,
        /// Byte offset of the token in the BTOP string.
        offset: usize,
    },
}

fn is_gap_marker(byte: u8) -> bool {
    byte == GAP_MARKER || byte == INTRON_MARKER
}

fn is_pair_base(byte: u8) -> bool {
    byte.is_ascii_alphabetic() || byte == INDEL_BASE
}

/// Raw token segments together with their byte offsets.
///
/// Boundaries go before every odd pair base, before a gap region and after it,
/// and before a digit run outside a gap region. Digits inside a gap region
/// stay with the enclosing gap token.
fn segments(btop: &str) -> Vec<(usize, &str)> {
    let bytes = btop.as_bytes();
    let mut cuts = Vec::with_capacity(bytes.len() + 2);
    cuts.push(0);

    let mut pair_bases = 0usize;
    let mut in_gap = false;
    let mut prev_digit = false;

    for (idx, &byte) in bytes.iter().enumerate() {
        if is_pair_base(byte) {
            if pair_bases % 2 == 0 {
                cuts.push(idx);
            }
            pair_bases += 1;
            prev_digit = false;
        } else if is_gap_marker(byte) {
            cuts.push(if in_gap { idx + 1 } else { idx });
            in_gap = !in_gap;
            prev_digit = false;
        } else if byte.is_ascii_digit() {
            if !prev_digit && !in_gap {
                cuts.push(idx);
            }
            prev_digit = true;
        } else {
            prev_digit = false;
        }
    }
    cuts.push(bytes.len());

    cuts.windows(2)
        .filter(|window| window[0] < window[1])
        .map(|window| (window[0], &btop[window[0]..window[1]]))
        .collect()
}

/// Split a BTOP string into its raw token texts without validating them.
///
/// ```
/// use btopcall::btop::split_btop;
///
/// assert_eq!(split_btop("4C-CG_10_4"), vec!["4", "C-", "CG", "_10_", "4"]);
/// ```
pub fn split_btop(btop: &str) -> Vec<&str> {
    segments(btop).into_iter().map(|(_, text)| text).collect()
}

fn parse_run(digits: &str, token: &str, offset: usize) -> Result<usize, BtopError> {
    if digits.is_empty() || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(BtopError::MalformedToken {
            token: token.to_string(),
            offset,
        });
    }
    digits.parse().map_err(|_| BtopError::LengthOverflow {
        token: token.to_string(),
        offset,
    })
}

fn classify(offset: usize, token: &str) -> Result<BtopToken, BtopError> {
    let bytes = token.as_bytes();

    if let Some(&first) = bytes.first().filter(|byte| is_gap_marker(**byte)) {
        let Some(&last) = bytes.last().filter(|byte| bytes.len() >= 2 && is_gap_marker(**byte))
        else {
            return Err(BtopError::UnterminatedGap {
                token: token.to_string(),
                offset,
            });
        };
        // `_` must close `_` and `^` must close `^`.
        if last != first {
            return Err(BtopError::MalformedToken {
                token: token.to_string(),
                offset,
            });
        }
        let len = parse_run(&token[1..token.len() - 1], token, offset)?;
        return Ok(BtopToken::GapRun {
            len,
            intron: first == INTRON_MARKER,
        });
    }

    if bytes.iter().all(u8::is_ascii_digit) {
        return parse_run(token, token, offset).map(BtopToken::MatchRun);
    }

    match *bytes {
        [query, reference] if is_pair_base(query) && is_pair_base(reference) => {
            Ok(BtopToken::MismatchPair { query, reference })
        }
        _ => Err(BtopError::MalformedToken {
            token: token.to_string(),
            offset,
        }),
    }
}

/// Decode a BTOP string into typed tokens.
///
/// Fails on the first token that is not a digit run, a gap run opened and
/// closed by the same marker, or a pair of bases.
pub fn tokenize(btop: &str) -> Result<Vec<BtopToken>, BtopError> {
    if btop.is_empty() {
        return Err(BtopError::Empty);
    }
    segments(btop)
        .into_iter()
        .map(|(offset, token)| classify(offset, token))
        .collect()
}
