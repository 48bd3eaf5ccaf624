//! Shared test model for the integration tests.
//!
//! `TestModel` exposes every port twice: through the generated direct table
//! and through a small introspection layer keyed by the same names, so each
//! test can run against either access path.

#![allow(dead_code)]

use vsst_sim::{
    port_table, AccessPath, Dut, DutConfig, DutError, Handle, ObjectKind, PortDirection,
    PortMap, PortRow, RtlModel, VecVal,
};
use vsst_signal::bytes_to_words;

/// Widths exercised by the round-trip grid.
pub const WIDTHS: [u32; 9] = [1, 7, 8, 16, 17, 32, 64, 128, 512];

/// Depths exercised by the round-trip grid.
pub const DEPTHS: [usize; 3] = [1, 10, 128];

/// Row access used by the introspection layer.
pub trait Rows {
    fn get_row(&self, row: usize, width: u32) -> Vec<VecVal>;
    fn put_row(&mut self, row: usize, words: &[VecVal]);
}

/// Zero value of a field with the given depth.
pub trait Blank {
    fn blank(depth: usize) -> Self;
}

fn pack(row: &impl PortRow, width: u32) -> Vec<VecVal> {
    bytes_to_words(&row.row_bytes(width), width, 1)
        .into_iter()
        .map(VecVal::new)
        .collect()
}

macro_rules! scalar_rows {
    ($($ty:ty),*) => {
        $(
            impl Rows for $ty {
                fn get_row(&self, _row: usize, width: u32) -> Vec<VecVal> {
                    pack(self, width)
                }

                fn put_row(&mut self, _row: usize, words: &[VecVal]) {
                    self.set_row(words);
                }
            }

            impl Blank for $ty {
                fn blank(_depth: usize) -> Self {
                    0
                }
            }
        )*
    };
}

scalar_rows!(u8, u16, u32, u64);

impl<const N: usize> Rows for [u32; N] {
    fn get_row(&self, _row: usize, width: u32) -> Vec<VecVal> {
        pack(self, width)
    }

    fn put_row(&mut self, _row: usize, words: &[VecVal]) {
        self.set_row(words);
    }
}

impl<const N: usize> Blank for [u32; N] {
    fn blank(_depth: usize) -> Self {
        [0; N]
    }
}

impl<T: PortRow> Rows for Vec<T> {
    fn get_row(&self, row: usize, width: u32) -> Vec<VecVal> {
        pack(&self[row], width)
    }

    fn put_row(&mut self, row: usize, words: &[VecVal]) {
        self[row].set_row(words);
    }
}

impl<T: Default + Clone> Blank for Vec<T> {
    fn blank(depth: usize) -> Self {
        vec![T::default(); depth]
    }
}

/// Introspection record for one port.
#[derive(Debug, Clone, Copy)]
pub struct PortInfo {
    pub name: &'static str,
    pub direction: PortDirection,
    pub width: u32,
    pub depth: usize,
    pub kind: ObjectKind,
    pub descending: bool,
}

macro_rules! test_ports {
    ($(
        $field:ident : $ty:ty = $dir:ident, $width:expr, $depth:expr, $kind:ident, $desc:expr;
    )*) => {
        /// Port storage of the test model.
        pub struct Ports {
            $( pub $field: $ty, )*
        }

        impl Ports {
            fn new() -> Self {
                Self { $( $field: <$ty as Blank>::blank($depth), )* }
            }

            fn slot(&self, index: usize) -> Option<&dyn Rows> {
                let mut i = 0;
                $(
                    if i == index {
                        return Some(&self.$field);
                    }
                    i += 1;
                )*
                let _ = i;
                None
            }

            fn slot_mut(&mut self, index: usize) -> Option<&mut dyn Rows> {
                let mut i = 0;
                $(
                    if i == index {
                        return Some(&mut self.$field);
                    }
                    i += 1;
                )*
                let _ = i;
                None
            }
        }

        /// Every port of the test model, in declaration order.
        pub const PORTS: &[PortInfo] = &[
            $(
                PortInfo {
                    name: stringify!($field),
                    direction: PortDirection::$dir,
                    width: $width,
                    depth: $depth,
                    kind: ObjectKind::$kind,
                    descending: $desc,
                },
            )*
        ];

        fn direct_table() -> Result<PortMap<TestModel>, DutError> {
            port_table!(TestModel {
                $( $field: $dir, $width, $depth; )*
            })
        }
    };
}

test_ports! {
    clock: u8 = Input, 1, 1, Reg, false;
    count: u32 = Output, 32, 1, Reg, false;
    din: u8 = Input, 8, 1, Reg, false;
    sum: u32 = Output, 32, 1, Reg, false;
    loop_in: u32 = Input, 17, 1, Reg, false;
    loop_out: u32 = Output, 17, 1, Reg, false;
    mem24: Vec<u32> = Input, 24, 128, Memory, false;
    mem_out: Vec<u32> = Output, 24, 128, Memory, false;
    mem_desc: Vec<u8> = Input, 8, 10, Memory, true;
    net: u8 = Input, 8, 1, Other, false;
    w1_d1: u8 = Input, 1, 1, Reg, false;
    w1_d10: Vec<u8> = Input, 1, 10, Memory, false;
    w1_d128: Vec<u8> = Input, 1, 128, Memory, false;
    w7_d1: u8 = Input, 7, 1, Reg, false;
    w7_d10: Vec<u8> = Input, 7, 10, Memory, false;
    w7_d128: Vec<u8> = Input, 7, 128, Memory, false;
    w8_d1: u8 = Input, 8, 1, Reg, false;
    w8_d10: Vec<u8> = Input, 8, 10, Memory, false;
    w8_d128: Vec<u8> = Input, 8, 128, Memory, false;
    w16_d1: u16 = Input, 16, 1, Reg, false;
    w16_d10: Vec<u16> = Input, 16, 10, Memory, false;
    w16_d128: Vec<u16> = Input, 16, 128, Memory, false;
    w17_d1: u32 = Input, 17, 1, Reg, false;
    w17_d10: Vec<u32> = Input, 17, 10, Memory, false;
    w17_d128: Vec<u32> = Input, 17, 128, Memory, false;
    w32_d1: u32 = Input, 32, 1, Reg, false;
    w32_d10: Vec<u32> = Input, 32, 10, Memory, false;
    w32_d128: Vec<u32> = Input, 32, 128, Memory, false;
    w64_d1: u64 = Input, 64, 1, Reg, false;
    w64_d10: Vec<u64> = Input, 64, 10, Memory, false;
    w64_d128: Vec<u64> = Input, 64, 128, Memory, false;
    w128_d1: [u32; 4] = Input, 128, 1, Reg, false;
    w128_d10: Vec<[u32; 4]> = Input, 128, 10, Memory, false;
    w128_d128: Vec<[u32; 4]> = Input, 128, 128, Memory, false;
    w512_d1: [u32; 16] = Input, 512, 1, Reg, false;
    w512_d10: Vec<[u32; 16]> = Input, 512, 10, Memory, false;
    w512_d128: Vec<[u32; 16]> = Input, 512, 128, Memory, false;
}

/// A small synthetic design.
///
/// Fields of [`Ports`] are reachable directly on the model through `Deref`,
/// which is what the generated direct table relies on.
///
/// - `count` increments on every rising edge of `clock`
/// - `sum` adds `din` once per tick
/// - `loop_out` and `mem_out` mirror `loop_in` and `mem24`
pub struct TestModel {
    pub ports: Ports,
    pub prev_clock: u8,
    pub last_tick: u64,
    /// `(tick, din)` sampled at the first evaluation of every tick.
    pub history: Vec<(u64, u8)>,
    pub evals: u64,
    pub finals: u32,
}

impl TestModel {
    pub fn new() -> Self {
        Self {
            ports: Ports::new(),
            prev_clock: 0,
            last_tick: 0,
            history: Vec::new(),
            evals: 0,
            finals: 0,
        }
    }

    /// `din` as seen by the evaluation at `tick`.
    pub fn din_at(&self, tick: u64) -> Option<u8> {
        self.history
            .iter()
            .find(|(t, _)| *t == tick)
            .map(|(_, v)| *v)
    }
}

impl Default for TestModel {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Deref for TestModel {
    type Target = Ports;

    fn deref(&self) -> &Ports {
        &self.ports
    }
}

impl std::ops::DerefMut for TestModel {
    fn deref_mut(&mut self) -> &mut Ports {
        &mut self.ports
    }
}

impl RtlModel for TestModel {
    fn eval(&mut self, tick: u64) {
        let p = &mut self.ports;
        if p.clock & 1 == 1 && self.prev_clock == 0 {
            p.count = p.count.wrapping_add(1);
        }
        self.prev_clock = p.clock & 1;
        if tick != self.last_tick {
            p.sum = p.sum.wrapping_add(u32::from(p.din));
            self.history.push((tick, p.din));
            self.last_tick = tick;
        }
        p.loop_out = p.loop_in;
        p.mem_out.clone_from(&p.mem24);
        self.evals += 1;
    }

    fn finalize(&mut self) {
        self.finals += 1;
    }

    fn port_map() -> Result<PortMap<Self>, DutError> {
        direct_table()
    }

    fn lookup(&self, name: &str) -> Option<Handle> {
        PORTS
            .iter()
            .position(|p| p.name == name)
            .map(|i| Handle::from_raw(i as u32))
    }

    fn kind(&self, handle: Handle) -> ObjectKind {
        info(handle).map_or(ObjectKind::Other, |p| p.kind)
    }

    fn size(&self, handle: Handle) -> u32 {
        info(handle).map_or(0, |p| p.width)
    }

    fn direction(&self, handle: Handle) -> PortDirection {
        info(handle).map_or(PortDirection::Input, |p| p.direction)
    }

    fn rows(&self, handle: Handle) -> usize {
        info(handle).map_or(0, |p| p.depth)
    }

    fn descending(&self, handle: Handle) -> bool {
        info(handle).is_some_and(|p| p.descending)
    }

    fn get_value(&self, handle: Handle, row: usize) -> Vec<VecVal> {
        let Some(p) = info(handle) else {
            return Vec::new();
        };
        let index = storage_row(p, row);
        self.ports
            .slot(handle.as_raw() as usize)
            .map_or_else(Vec::new, |s| s.get_row(index, p.width))
    }

    fn put_value(&mut self, handle: Handle, row: usize, value: &[VecVal]) {
        let Some(p) = info(handle) else {
            return;
        };
        let index = storage_row(p, row);
        if let Some(slot) = self.ports.slot_mut(handle.as_raw() as usize) {
            slot.put_row(index, value);
        }
    }
}

fn info(handle: Handle) -> Option<&'static PortInfo> {
    PORTS.get(handle.as_raw() as usize)
}

/// Storage index behind iteration position `row`.
fn storage_row(p: &PortInfo, row: usize) -> usize {
    if p.descending {
        p.depth - 1 - row
    } else {
        row
    }
}

/// Name of the grid port for a width and depth.
pub fn grid_port(width: u32, depth: usize) -> String {
    format!("w{width}_d{depth}")
}

/// Builds an engine around a fresh model.
pub fn dut(access: AccessPath) -> Dut<TestModel> {
    dut_with(DutConfig {
        access,
        ..DutConfig::default()
    })
}

/// Builds an engine around a fresh model with a custom configuration.
pub fn dut_with(config: DutConfig) -> Dut<TestModel> {
    Dut::new(TestModel::new(), config).expect("test model table is valid")
}

/// Routes engine logs to the test harness when `RUST_LOG` is set.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
