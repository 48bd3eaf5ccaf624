//! The direct-access port table.
//!
//! Each [`PortEntry`] carries a port's name, direction and shape together
//! with two function pointers that move a [`Signal`] in and out of the
//! model's storage. Tables are normally declared with [`port_table!`],
//! which derives both functions from a field name through [`PortField`].

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use vsst_signal::{num_bytes, Signal, SignalError, VecVal};

use crate::error::DutError;

/// The direction of a port on the model boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortDirection {
    /// Driven by the host.
    Input,
    /// Driven by the model.
    Output,
}

impl fmt::Display for PortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input => write!(f, "input"),
            Self::Output => write!(f, "output"),
        }
    }
}

/// Reads a port's current value out of the model.
pub type ReadFn<M> = fn(&M) -> Result<Signal, SignalError>;

/// Stores a value into a port of the model.
pub type WriteFn<M> = fn(&mut M, &Signal);

/// Reports how many bits per row and how many rows the backing storage
/// of a port can hold.
pub type CapacityFn<M> = fn(&M) -> (u32, usize);

/// One row of the port table.
pub struct PortEntry<M> {
    name: String,
    direction: PortDirection,
    width: u32,
    depth: usize,
    pub(crate) read: ReadFn<M>,
    pub(crate) write: WriteFn<M>,
    pub(crate) capacity: CapacityFn<M>,
}

impl<M> PortEntry<M> {
    /// Creates an entry.
    pub fn new(
        name: impl Into<String>,
        direction: PortDirection,
        width: u32,
        depth: usize,
        read: ReadFn<M>,
        write: WriteFn<M>,
        capacity: CapacityFn<M>,
    ) -> Self {
        Self {
            name: name.into(),
            direction,
            width,
            depth,
            read,
            write,
            capacity,
        }
    }

    /// Port name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Port direction.
    pub fn direction(&self) -> PortDirection {
        self.direction
    }

    /// Bits per row.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows; 1 for scalar ports.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Length of the port's byte view.
    pub fn byte_len(&self) -> usize {
        self.depth * num_bytes(self.width) as usize
    }

    /// Whether `signal` has exactly this port's shape.
    pub fn fits(&self, signal: &Signal) -> bool {
        signal.width() == self.width && signal.depth() == self.depth
    }

    /// Checks that `model`'s storage for this port holds at least `width`
    /// bits per row and exactly `depth` rows.
    pub fn check_storage(&self, model: &M) -> Result<(), DutError> {
        let (bits, rows) = (self.capacity)(model);
        if bits < self.width || rows != self.depth {
            return Err(self.shape_error(bits, rows));
        }
        Ok(())
    }

    pub(crate) fn shape_error(&self, width: u32, depth: usize) -> DutError {
        DutError::ShapeMismatch {
            port: self.name.clone(),
            expected_width: self.width,
            expected_depth: self.depth,
            width,
            depth,
        }
    }
}

impl<M> fmt::Debug for PortEntry<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PortEntry")
            .field("name", &self.name)
            .field("direction", &self.direction)
            .field("width", &self.width)
            .field("depth", &self.depth)
            .finish_non_exhaustive()
    }
}

/// A model's port table, in declaration order with O(1) name lookup.
pub struct PortMap<M> {
    entries: Vec<PortEntry<M>>,
    index: HashMap<String, usize>,
}

impl<M> PortMap<M> {
    /// Builds the table, rejecting duplicate names.
    pub fn new(entries: Vec<PortEntry<M>>) -> Result<Self, DutError> {
        let mut index = HashMap::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            if index.insert(entry.name.clone(), i).is_some() {
                return Err(DutError::DuplicatePort(entry.name.clone()));
            }
        }
        Ok(Self { entries, index })
    }

    /// Looks up an entry by name.
    pub fn get(&self, name: &str) -> Option<&PortEntry<M>> {
        self.index.get(name).map(|&i| &self.entries[i])
    }

    /// Port names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    /// Entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &PortEntry<M>> {
        self.entries.iter()
    }

    /// Number of ports.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<M> fmt::Debug for PortMap<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries.iter()).finish()
    }
}

/// One row of model storage.
///
/// Rows are exchanged as little-endian bytes on the way out and native
/// words on the way in.
pub trait PortRow {
    /// Bits one row can hold.
    const BITS: u32;

    /// The row's low `num_bytes(width)` bytes.
    fn row_bytes(&self, width: u32) -> Vec<u8>;

    /// Overwrites the row from native words. Missing words read as zero.
    fn set_row(&mut self, words: &[VecVal]);
}

macro_rules! impl_scalar_row {
    ($($ty:ty),*) => {
        $(
            impl PortRow for $ty {
                const BITS: u32 = <$ty>::BITS;

                fn row_bytes(&self, width: u32) -> Vec<u8> {
                    let mut bytes = u64::from(*self).to_le_bytes().to_vec();
                    bytes.resize(num_bytes(width) as usize, 0);
                    bytes
                }

                fn set_row(&mut self, words: &[VecVal]) {
                    let low = words.first().map_or(0, |w| u64::from(w.aval));
                    let high = words.get(1).map_or(0, |w| u64::from(w.aval));
                    *self = (low | (high << 32)) as $ty;
                }
            }

            impl PortField for $ty {
                fn load(&self, width: u32) -> Result<Signal, SignalError> {
                    Signal::new(width, &self.row_bytes(width))
                }

                fn store(&mut self, signal: &Signal) {
                    if let Ok(words) = signal.row_words(0) {
                        self.set_row(words);
                    }
                }

                fn capacity(&self) -> (u32, usize) {
                    (Self::BITS, 1)
                }
            }
        )*
    };
}

impl_scalar_row!(u8, u16, u32, u64);

impl<const N: usize> PortRow for [u32; N] {
    const BITS: u32 = 32 * N as u32;

    fn row_bytes(&self, width: u32) -> Vec<u8> {
        let mut bytes: Vec<u8> = self.iter().flat_map(|w| w.to_le_bytes()).collect();
        bytes.resize(num_bytes(width) as usize, 0);
        bytes
    }

    fn set_row(&mut self, words: &[VecVal]) {
        for (i, slot) in self.iter_mut().enumerate() {
            *slot = words.get(i).map_or(0, |w| w.aval);
        }
    }
}

/// A model field that backs one port.
///
/// Implemented for `u8`, `u16`, `u32` and `u64` scalars, `[u32; N]` wide
/// words, and `Vec<T>` memories of any of those.
pub trait PortField {
    /// Reads the field as a `width`-bit signal.
    fn load(&self, width: u32) -> Result<Signal, SignalError>;

    /// Stores a signal whose shape already matches the field.
    fn store(&mut self, signal: &Signal);

    /// Bits per row and number of rows the field holds.
    fn capacity(&self) -> (u32, usize);
}

impl<const N: usize> PortField for [u32; N] {
    fn load(&self, width: u32) -> Result<Signal, SignalError> {
        Signal::new(width, &self.row_bytes(width))
    }

    fn store(&mut self, signal: &Signal) {
        if let Ok(words) = signal.row_words(0) {
            self.set_row(words);
        }
    }

    fn capacity(&self) -> (u32, usize) {
        (Self::BITS, 1)
    }
}

impl<T: PortRow> PortField for Vec<T> {
    fn load(&self, width: u32) -> Result<Signal, SignalError> {
        let bytes: Vec<u8> = self.iter().flat_map(|row| row.row_bytes(width)).collect();
        Signal::from_rows(width, self.len(), &bytes, false)
    }

    fn store(&mut self, signal: &Signal) {
        for (i, row) in self.iter_mut().enumerate() {
            if let Ok(words) = signal.row_words(i) {
                row.set_row(words);
            }
        }
    }

    fn capacity(&self) -> (u32, usize) {
        (T::BITS, self.len())
    }
}

/// Declares a model's direct-access port table from its fields.
///
/// Each line names a field, its direction, its width in bits and,
/// for memories, its depth. The field must implement [`PortField`] and
/// hold the declared shape; the engine rejects a table whose fields are
/// narrower or have a different row count.
///
/// ```ignore
/// fn port_map() -> Result<PortMap<Self>, DutError> {
///     port_table!(Self {
///         clock: Input, 1;
///         din: Input, 32;
///         mem: Input, 24, 128;
///         dout: Output, 32;
///     })
/// }
/// ```
#[macro_export]
macro_rules! port_table {
    (@depth) => { 1 };
    (@depth $depth:expr) => { $depth };
    ($model:ty { $($field:ident : $dir:ident, $width:expr $(, $depth:expr)?);* $(;)? }) => {
        $crate::port::PortMap::<$model>::new(vec![
            $(
                $crate::port::PortEntry::<$model>::new(
                    stringify!($field),
                    $crate::port::PortDirection::$dir,
                    $width,
                    $crate::port_table!(@depth $($depth)?),
                    |m: &$model| $crate::port::PortField::load(&m.$field, $width),
                    |m: &mut $model, s: &$crate::Signal| {
                        $crate::port::PortField::store(&mut m.$field, s)
                    },
                    |m: &$model| $crate::port::PortField::capacity(&m.$field),
                ),
            )*
        ])
    };
}
