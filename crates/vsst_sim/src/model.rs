//! The interface a compiled RTL model exposes to the engine.
//!
//! A model is reached in one of two ways. The direct path uses the port
//! table returned by [`RtlModel::port_map`], whose entries read and write
//! model fields through plain function pointers. The introspective path
//! looks ports up by name at run time and moves packed [`VecVal`] rows
//! through [`RtlModel::get_value`] and [`RtlModel::put_value`], the way a
//! VPI client would. Models that only support the direct path can keep the
//! default introspection methods, which report every name as unknown.

use serde::{Deserialize, Serialize};
use vsst_signal::VecVal;

use crate::error::DutError;
use crate::port::{PortDirection, PortMap};

/// Opaque handle to an object found through [`RtlModel::lookup`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Handle(u32);

impl Handle {
    /// Creates a handle from a raw `u32` index.
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw `u32` index.
    pub fn as_raw(self) -> u32 {
        self.0
    }
}

/// Object kind reported by the introspection interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    /// A single packed value.
    Reg,
    /// An unpacked array of packed words.
    Memory,
    /// Anything the engine cannot marshal (nets, parameters, scopes).
    Other,
}

/// A compiled RTL model driven by a [`Dut`](crate::Dut).
pub trait RtlModel: Sized {
    /// Evaluates the model's logic at the given tick.
    fn eval(&mut self, tick: u64);

    /// Runs the model's final blocks. Called once by [`Dut::finish`](crate::Dut::finish).
    fn finalize(&mut self) {}

    /// Builds the direct-access port table, usually with [`port_table!`](crate::port_table).
    fn port_map() -> Result<PortMap<Self>, DutError>;

    /// Finds an object by its port name.
    fn lookup(&self, _name: &str) -> Option<Handle> {
        None
    }

    /// Kind of the object behind `handle`.
    fn kind(&self, _handle: Handle) -> ObjectKind {
        ObjectKind::Other
    }

    /// Width in bits of one row of the object.
    fn size(&self, _handle: Handle) -> u32 {
        0
    }

    /// Direction of the port behind `handle`. Must agree with the port
    /// table; the engine rejects introspective access otherwise.
    fn direction(&self, _handle: Handle) -> PortDirection {
        PortDirection::Input
    }

    /// Number of rows; 1 for registers.
    fn rows(&self, _handle: Handle) -> usize {
        0
    }

    /// Whether a memory is declared with a descending index range, so
    /// that iteration position 0 is the highest index.
    fn descending(&self, _handle: Handle) -> bool {
        false
    }

    /// Reads the row at iteration position `row`.
    fn get_value(&self, _handle: Handle, _row: usize) -> Vec<VecVal> {
        Vec::new()
    }

    /// Writes the row at iteration position `row`.
    fn put_value(&mut self, _handle: Handle, _row: usize, _value: &[VecVal]) {}
}
