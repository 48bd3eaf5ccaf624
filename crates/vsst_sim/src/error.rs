//! Engine error types.
//!
//! Every failing port operation reports one of the [`DutError`] variants;
//! nothing is retried or recovered inside the engine.

use vsst_signal::SignalError;

use crate::port::PortDirection;

/// Errors raised by the port I/O engine.
#[derive(Debug, thiserror::Error)]
pub enum DutError {
    /// No port with this name exists in the model's port table.
    #[error("unknown port '{0}'")]
    UnknownPort(String),

    /// Two table entries share a name.
    #[error("duplicate port '{0}' in port table")]
    DuplicatePort(String),

    /// A write targeted an output port.
    #[error("port '{0}' is not an input")]
    NotAnInput(String),

    /// The value's shape does not match the port's declared shape.
    #[error(
        "shape mismatch on port '{port}': expected {expected_width}x{expected_depth}, got {width}x{depth}"
    )]
    ShapeMismatch {
        /// Port name.
        port: String,
        /// Declared width in bits.
        expected_width: u32,
        /// Declared depth in rows.
        expected_depth: usize,
        /// Width that was supplied or reported.
        width: u32,
        /// Depth that was supplied or reported.
        depth: usize,
    },

    /// The introspection interface disagrees with the port table about a
    /// port's direction.
    #[error("port '{port}' is declared {declared} but the model reports {reported}")]
    DirectionMismatch {
        /// Port name.
        port: String,
        /// Direction in the port table.
        declared: PortDirection,
        /// Direction reported by introspection.
        reported: PortDirection,
    },

    /// The introspection interface reported an object kind other than a
    /// register or a memory.
    #[error("port '{0}' has an unsupported object kind")]
    UnsupportedKind(String),

    /// A deferred write must land strictly after the current tick.
    #[error("cannot schedule a write to '{port}' at tick {at}: current tick is {now}")]
    ScheduleInPast {
        /// Port name.
        port: String,
        /// Requested tick.
        at: u64,
        /// Tick at the time of the request.
        now: u64,
    },

    /// The engine has been finished and accepts no more port operations.
    #[error("engine has finished")]
    Finished,

    /// A value could not be represented.
    #[error(transparent)]
    Signal(#[from] SignalError),
}
