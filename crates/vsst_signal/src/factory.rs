//! Row-at-a-time signal assembly.

use crate::error::SignalError;
use crate::pack::num_words;
use crate::signal::{validate, Signal};
use crate::vecval::VecVal;

/// Collects engine rows one at a time and yields a [`Signal`] once all
/// `depth` rows have arrived.
///
/// Introspective engines return memory contents one word handle at a time;
/// the factory masks each row as it is pushed so the finished signal obeys
/// the same invariants as one built from bytes.
#[derive(Debug)]
pub struct SignalFactory {
    width: u32,
    depth: usize,
    rows: Vec<Vec<VecVal>>,
    done: bool,
}

impl SignalFactory {
    /// Creates a factory for a `width`-bit, `depth`-row signal.
    pub fn new(width: u32, depth: usize) -> Result<Self, SignalError> {
        validate(width, depth)?;
        Ok(Self {
            width,
            depth,
            rows: Vec::with_capacity(depth),
            done: false,
        })
    }

    /// Appends one row of native words.
    ///
    /// Returns the completed signal when this was the last row.
    pub fn push(&mut self, row: &[VecVal]) -> Result<Option<Signal>, SignalError> {
        if self.done {
            return Err(SignalError::FactoryFull { depth: self.depth });
        }
        let expected = num_words(self.width) as usize;
        if row.len() != expected {
            return Err(SignalError::RowWords {
                expected,
                actual: row.len(),
            });
        }
        self.rows.push(row.to_vec());
        if self.rows.len() < self.depth {
            return Ok(None);
        }
        self.done = true;
        let rows = std::mem::take(&mut self.rows);
        Signal::from_words(self.width, rows).map(Some)
    }

    /// Rows still expected before the signal is complete.
    pub fn remaining(&self) -> usize {
        if self.done {
            0
        } else {
            self.depth - self.rows.len()
        }
    }

    /// Whether the final row has been pushed.
    pub fn is_complete(&self) -> bool {
        self.done
    }
}
