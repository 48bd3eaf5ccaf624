//! The engine-native vector word.

use serde::{Deserialize, Serialize};

/// One 32-bit word of a packed vector value.
///
/// Mirrors `s_vpi_vecval`: `aval` carries the value bits and `bval` the
/// X/Z plane. Only two-state values cross the port boundary, so every word
/// built by this crate has `bval == 0`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VecVal {
    /// Value bits.
    pub aval: u32,
    /// Unknown/high-impedance bits.
    pub bval: u32,
}

impl VecVal {
    /// Creates a two-state word.
    pub const fn new(aval: u32) -> Self {
        Self { aval, bval: 0 }
    }

    /// Returns a copy with `aval` restricted to `mask` and `bval` cleared.
    pub const fn masked(self, mask: u32) -> Self {
        Self {
            aval: self.aval & mask,
            bval: 0,
        }
    }
}

impl From<u32> for VecVal {
    fn from(aval: u32) -> Self {
        Self::new(aval)
    }
}
