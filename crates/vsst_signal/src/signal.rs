//! The [`Signal`] value type.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SignalError;
use crate::pack::{bytes_to_words, num_bytes, num_words, word_mask, words_to_bytes};
use crate::vecval::VecVal;

/// Largest width a single signal row may have, in bits.
///
/// Matches the engine's string-conversion buffer: 64 words of 32 bits,
/// times 8.
pub const MAX_SIGNAL_BITS: u32 = 64 * 32 * 8;

/// A bit-vector value with a fixed width and depth.
///
/// Storage is one row of engine words per depth element. Every word is
/// masked on the way in, so bits above `width` are always zero and a row
/// can be handed to the engine as-is.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawSignal")]
pub struct Signal {
    width: u32,
    rows: Vec<Vec<VecVal>>,
}

/// Unchecked wire form; deserialization goes through [`Signal::from_words`].
#[derive(Deserialize)]
struct RawSignal {
    width: u32,
    rows: Vec<Vec<VecVal>>,
}

impl TryFrom<RawSignal> for Signal {
    type Error = SignalError;

    fn try_from(raw: RawSignal) -> Result<Self, Self::Error> {
        Signal::from_words(raw.width, raw.rows)
    }
}

impl Signal {
    /// Builds a depth-1 signal from `num_bytes(width)` little-endian bytes.
    pub fn new(width: u32, bytes: &[u8]) -> Result<Self, SignalError> {
        Self::from_rows(width, 1, bytes, false)
    }

    /// Builds an array signal from `depth` concatenated byte rows.
    ///
    /// With `descending` set, row 0 of `bytes` is stored at index
    /// `depth - 1`, for engines that number memory words from the top.
    pub fn from_rows(
        width: u32,
        depth: usize,
        bytes: &[u8],
        descending: bool,
    ) -> Result<Self, SignalError> {
        validate(width, depth)?;
        let expected = depth * num_bytes(width) as usize;
        if bytes.len() != expected {
            return Err(SignalError::BufferLength {
                expected,
                actual: bytes.len(),
            });
        }

        let words = num_words(width) as usize;
        let flat = bytes_to_words(bytes, width, depth);
        let mut rows: Vec<Vec<VecVal>> = flat
            .chunks_exact(words)
            .map(|chunk| chunk.iter().copied().map(VecVal::new).collect())
            .collect();
        if descending {
            rows.reverse();
        }
        Ok(Self { width, rows })
    }

    /// Builds a depth-1 signal holding the low `width` bits of `value`.
    pub fn from_u64(width: u32, value: u64) -> Result<Self, SignalError> {
        validate(width, 1)?;
        let mut bytes = value.to_le_bytes().to_vec();
        bytes.resize(num_bytes(width) as usize, 0);
        Self::new(width, &bytes)
    }

    /// Builds an all-zero signal.
    pub fn zeroed(width: u32, depth: usize) -> Result<Self, SignalError> {
        validate(width, depth)?;
        let words = num_words(width) as usize;
        Ok(Self {
            width,
            rows: vec![vec![VecVal::default(); words]; depth],
        })
    }

    /// Adopts already-packed rows, masking every word.
    pub(crate) fn from_words(width: u32, rows: Vec<Vec<VecVal>>) -> Result<Self, SignalError> {
        validate(width, rows.len())?;
        let expected = num_words(width) as usize;
        let mut rows = rows;
        for row in &mut rows {
            if row.len() != expected {
                return Err(SignalError::RowWords {
                    expected,
                    actual: row.len(),
                });
            }
            for (w, word) in row.iter_mut().enumerate() {
                *word = word.masked(word_mask(width, w as u32));
            }
        }
        Ok(Self { width, rows })
    }

    /// Bits per row.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows.
    pub fn depth(&self) -> usize {
        self.rows.len()
    }

    /// Length of the full byte view, `depth * num_bytes(width)`.
    pub fn byte_len(&self) -> usize {
        self.depth() * num_bytes(self.width) as usize
    }

    /// Bit 0 of row 0. Used for single-bit control wires such as clocks.
    pub fn scalar_bit(&self) -> u8 {
        (self.rows[0][0].aval & 1) as u8
    }

    /// Byte view of a single row.
    pub fn row_bytes(&self, row: usize) -> Result<Vec<u8>, SignalError> {
        let words = self.row_avals(row)?;
        Ok(words_to_bytes(&words, self.width, 1))
    }

    /// Byte view of every row, concatenated.
    ///
    /// With `reverse` set the last row comes first.
    pub fn to_bytes(&self, reverse: bool) -> Vec<u8> {
        let ordered: Box<dyn Iterator<Item = &Vec<VecVal>>> = if reverse {
            Box::new(self.rows.iter().rev())
        } else {
            Box::new(self.rows.iter())
        };
        let flat: Vec<u32> = ordered.flatten().map(|w| w.aval).collect();
        words_to_bytes(&flat, self.width, self.depth())
    }

    /// The native words of one row, ready for the engine's put-value call.
    pub fn row_words(&self, row: usize) -> Result<&[VecVal], SignalError> {
        self.rows
            .get(row)
            .map(Vec::as_slice)
            .ok_or(SignalError::RowOutOfRange {
                row,
                depth: self.depth(),
            })
    }

    /// Returns the value as a `u64` for depth-1 signals up to 64 bits wide.
    pub fn to_u64(&self) -> Option<u64> {
        if self.depth() != 1 || self.width > 64 {
            return None;
        }
        let row = &self.rows[0];
        let low = u64::from(row[0].aval);
        let high = row.get(1).map_or(0, |w| u64::from(w.aval));
        Some(low | (high << 32))
    }

    fn row_avals(&self, row: usize) -> Result<Vec<u32>, SignalError> {
        Ok(self.row_words(row)?.iter().map(|w| w.aval).collect())
    }
}

pub(crate) fn validate(width: u32, depth: usize) -> Result<(), SignalError> {
    if width == 0 {
        return Err(SignalError::ZeroWidth);
    }
    if width > MAX_SIGNAL_BITS {
        return Err(SignalError::WidthTooLarge {
            width,
            max: MAX_SIGNAL_BITS,
        });
    }
    if depth == 0 {
        return Err(SignalError::ZeroDepth);
    }
    Ok(())
}

fn fmt_row(f: &mut fmt::Formatter<'_>, width: u32, row: &[VecVal]) -> fmt::Result {
    write!(f, "{width}'h")?;
    let mut words = row.iter().rev();
    if let Some(top) = words.next() {
        write!(f, "{:x}", top.aval)?;
    }
    for word in words {
        write!(f, "{:08x}", word.aval)?;
    }
    Ok(())
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.rows.len() == 1 {
            return fmt_row(f, self.width, &self.rows[0]);
        }
        write!(f, "[")?;
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            fmt_row(f, self.width, row)?;
        }
        write!(f, "]")
    }
}

impl fmt::Debug for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signal({self})")
    }
}
