//! Errors raised while building or inspecting a [`Signal`](crate::Signal).

/// Errors that can occur when constructing or reading a signal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignalError {
    /// A signal must carry at least one bit per row.
    #[error("signal width must be positive")]
    ZeroWidth,

    /// A signal must have at least one row.
    #[error("signal depth must be positive")]
    ZeroDepth,

    /// The width is larger than the engine can represent.
    #[error("signal width {width} exceeds the maximum of {max} bits")]
    WidthTooLarge {
        /// Requested width in bits.
        width: u32,
        /// Largest supported width in bits.
        max: u32,
    },

    /// The byte buffer does not match `depth * ceil(width / 8)`.
    #[error("expected a {expected}-byte buffer, got {actual} bytes")]
    BufferLength {
        /// Required buffer length.
        expected: usize,
        /// Length that was supplied.
        actual: usize,
    },

    /// A row index past the end of the signal.
    #[error("row {row} out of range for depth {depth}")]
    RowOutOfRange {
        /// Requested row.
        row: usize,
        /// Signal depth.
        depth: usize,
    },

    /// More rows were pushed into a factory than its depth allows.
    #[error("signal factory already holds all {depth} rows")]
    FactoryFull {
        /// Depth the factory was created with.
        depth: usize,
    },

    /// A row handed to the factory has the wrong number of words.
    #[error("row has {actual} words, expected {expected}")]
    RowWords {
        /// Words per row for the factory's width.
        expected: usize,
        /// Words in the supplied row.
        actual: usize,
    },
}
