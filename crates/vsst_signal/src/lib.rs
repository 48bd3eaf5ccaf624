//! Signal values exchanged between a host simulator and a compiled RTL model.
//!
//! The RTL engine stores every port value as rows of packed 32-bit words
//! (the VPI `vpiVectorVal` layout), while host-side callers deal in flat byte
//! buffers. This crate converts between the two without losing or leaking
//! bits, for any width up to [`MAX_SIGNAL_BITS`] and any array depth.
//!
//! # Modules
//!
//! - `vecval`: the native `aval`/`bval` word pair
//! - `pack`: byte/word packing helpers and width arithmetic
//! - `signal`: the [`Signal`] value type
//! - `factory`: row-at-a-time [`SignalFactory`] for memory-shaped reads
//! - `error`: [`SignalError`]

#![warn(missing_docs)]

pub mod error;
pub mod factory;
pub mod pack;
pub mod signal;
pub mod vecval;

pub use error::SignalError;
pub use factory::SignalFactory;
pub use pack::{bytes_to_words, num_bytes, num_words, word_mask, words_to_bytes};
pub use signal::{Signal, MAX_SIGNAL_BITS};
pub use vecval::VecVal;
