//! The scheduled port I/O engine.
//!
//! A [`Dut`] owns one compiled model and advances it in unit ticks on behalf
//! of the host. Host-side callers exchange values as [`Signal`]s or as flat
//! byte buffers (`depth * ceil(width / 8)` bytes, row-major, each row least
//! significant byte first). Writes either apply immediately, followed by an
//! evaluation, or are queued for a future tick and applied as time reaches
//! it.
//!
//! # Tick semantics
//!
//! Each unit of [`Dut::tick`] applies the writes due at the tick being
//! entered, advances the counter, then evaluates. A write scheduled for
//! tick `T` is therefore visible to a read taken once [`Dut::current_tick`]
//! returns `T`, and not before.

use tracing::{debug, trace};
use vsst_config::{AccessPath, DutConfig, PortReset};
use vsst_signal::{Signal, SignalFactory};

use crate::error::DutError;
use crate::model::{Handle, ObjectKind, RtlModel};
use crate::port::{PortDirection, PortEntry, PortMap};
use crate::queue::WriteQueue;

/// Lifecycle of an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DutState {
    /// Built, no port activity yet.
    Constructed,
    /// At least one tick, read or write has happened.
    Running,
    /// [`Dut::finish`] has run. Terminal.
    Finished,
}

/// Drives a compiled RTL model with scheduled port I/O.
pub struct Dut<M: RtlModel> {
    model: M,
    ports: PortMap<M>,
    queue: WriteQueue,
    config: DutConfig,
    tick: u64,
    state: DutState,
    initialized: bool,
}

impl<M: RtlModel> Dut<M> {
    /// Wraps `model`, building its port table and checking the reset values
    /// against it. On the direct path every table entry must also fit the
    /// model field behind it.
    pub fn new(model: M, config: DutConfig) -> Result<Self, DutError> {
        let ports = M::port_map()?;
        if config.access == AccessPath::Direct {
            for entry in ports.iter() {
                entry.check_storage(&model)?;
            }
        }
        for reset in &config.reset_values {
            let entry = ports
                .get(&reset.port)
                .ok_or_else(|| DutError::UnknownPort(reset.port.clone()))?;
            if entry.direction() != PortDirection::Input {
                return Err(DutError::NotAnInput(reset.port.clone()));
            }
        }
        debug!(
            ports = ports.len(),
            access = ?config.access,
            clock = %config.clock_port,
            clock_freq = ?config.clock_freq,
            resets = config.reset_values.len(),
            verbose = config.verbose,
            "dut created"
        );
        Ok(Self {
            model,
            ports,
            queue: WriteQueue::new(),
            config,
            tick: 0,
            state: DutState::Constructed,
            initialized: false,
        })
    }

    /// Applies the configured reset values, once.
    ///
    /// Each value is written as 8 little-endian bytes cut or zero-extended
    /// to the port's byte length.
    pub fn init(&mut self) -> Result<(), DutError> {
        self.ensure_live()?;
        if self.initialized {
            return Ok(());
        }
        let resets: Vec<PortReset> = self.config.reset_values.clone();
        for reset in &resets {
            let len = self.entry(&reset.port)?.byte_len();
            let mut bytes = reset.value.to_le_bytes().to_vec();
            bytes.resize(len, 0);
            debug!(port = %reset.port, value = reset.value, "applying reset value");
            self.write_port_bytes(&reset.port, &bytes)?;
        }
        self.initialized = true;
        Ok(())
    }

    /// Writes `signal` to an input port now and re-evaluates the model.
    pub fn write_port(&mut self, name: &str, signal: &Signal) -> Result<(), DutError> {
        self.ensure_live()?;
        self.check_writable(name, signal)?;
        self.state = DutState::Running;
        self.apply_write(name, signal)?;
        self.model.eval(self.tick);
        Ok(())
    }

    /// Byte-buffer form of [`write_port`](Self::write_port).
    pub fn write_port_bytes(&mut self, name: &str, bytes: &[u8]) -> Result<(), DutError> {
        let signal = self.signal_for(name, bytes)?;
        self.write_port(name, &signal)
    }

    /// Queues `signal` for an input port at absolute tick `at`.
    ///
    /// `at` must be later than the current tick.
    pub fn write_port_at_tick(
        &mut self,
        name: &str,
        signal: &Signal,
        at: u64,
    ) -> Result<(), DutError> {
        self.ensure_live()?;
        self.check_writable(name, signal)?;
        if at <= self.tick {
            return Err(DutError::ScheduleInPast {
                port: name.to_string(),
                at,
                now: self.tick,
            });
        }
        debug!(port = %name, tick = self.tick, at, "write scheduled");
        self.queue.push(name, at, signal.clone());
        Ok(())
    }

    /// Byte-buffer form of [`write_port_at_tick`](Self::write_port_at_tick).
    pub fn write_port_bytes_at_tick(
        &mut self,
        name: &str,
        bytes: &[u8],
        at: u64,
    ) -> Result<(), DutError> {
        let signal = self.signal_for(name, bytes)?;
        self.write_port_at_tick(name, &signal, at)
    }

    /// Reads a port's current value.
    pub fn read_port(&mut self, name: &str) -> Result<Signal, DutError> {
        self.ensure_live()?;
        let entry = self.entry(name)?;
        let (width, depth) = (entry.width(), entry.depth());
        let signal = match self.config.access {
            AccessPath::Direct => (entry.read)(&self.model)?,
            AccessPath::Introspective => self.read_introspective(name, width, depth)?,
        };
        if signal.width() != width || signal.depth() != depth {
            return Err(entry.shape_error(signal.width(), signal.depth()));
        }
        self.state = DutState::Running;
        Ok(signal)
    }

    /// Byte-buffer form of [`read_port`](Self::read_port).
    pub fn read_port_bytes(&mut self, name: &str) -> Result<Vec<u8>, DutError> {
        Ok(self.read_port(name)?.to_bytes(false))
    }

    /// Advances `n` ticks, applying due writes and evaluating at each.
    pub fn tick(&mut self, n: u64) -> Result<(), DutError> {
        self.ensure_live()?;
        self.state = DutState::Running;
        for _ in 0..n {
            let next = self.tick + 1;
            self.poll_write_queue(next)?;
            self.tick = next;
            self.model.eval(next);
            trace!(tick = next, "eval");
        }
        Ok(())
    }

    /// Host clock handler: one tick per call.
    ///
    /// Returns `false` so the host keeps the handler registered.
    pub fn clock(&mut self, cycle: u64) -> Result<bool, DutError> {
        trace!(cycle, "clock");
        self.tick(1)?;
        Ok(false)
    }

    /// Toggles a single-bit clock port through one full period, one tick
    /// per half period.
    pub fn tick_clock_period(&mut self, name: &str) -> Result<(), DutError> {
        for _ in 0..2 {
            let current = self.read_port(name)?;
            let bit = u64::from(current.scalar_bit() ^ 1);
            let toggled = Signal::from_u64(current.width(), bit)?;
            self.write_port(name, &toggled)?;
            self.tick(1)?;
        }
        Ok(())
    }

    /// Runs `cycles` full periods of the configured clock port.
    pub fn run_cycles(&mut self, cycles: u64) -> Result<(), DutError> {
        let clock = self.config.clock_port.clone();
        for _ in 0..cycles {
            self.tick_clock_period(&clock)?;
        }
        Ok(())
    }

    /// Runs the model's final hook. Later calls do nothing.
    pub fn finish(&mut self) {
        if self.state == DutState::Finished {
            return;
        }
        self.model.finalize();
        self.state = DutState::Finished;
        debug!(tick = self.tick, pending = self.queue.len(), "dut finished");
    }

    /// Ticks elapsed since construction.
    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Lifecycle state.
    pub fn state(&self) -> DutState {
        self.state
    }

    /// Writes still waiting for their tick.
    pub fn pending_writes(&self) -> usize {
        self.queue.len()
    }

    /// The configured access path.
    pub fn access(&self) -> AccessPath {
        self.config.access
    }

    /// The configured clock port name.
    pub fn clock_port(&self) -> &str {
        &self.config.clock_port
    }

    /// The wrapped model.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Width in bits of a port.
    pub fn port_width(&self, name: &str) -> Result<u32, DutError> {
        Ok(self.entry(name)?.width())
    }

    /// Depth in rows of a port.
    pub fn port_depth(&self, name: &str) -> Result<usize, DutError> {
        Ok(self.entry(name)?.depth())
    }

    /// Direction of a port.
    pub fn port_direction(&self, name: &str) -> Result<PortDirection, DutError> {
        Ok(self.entry(name)?.direction())
    }

    /// Byte length of a port's buffer view.
    pub fn port_byte_len(&self, name: &str) -> Result<usize, DutError> {
        Ok(self.entry(name)?.byte_len())
    }

    /// Whether `name` is a port of the model.
    pub fn is_named_port(&self, name: &str) -> bool {
        self.ports.get(name).is_some()
    }

    /// Number of ports.
    pub fn num_ports(&self) -> usize {
        self.ports.len()
    }

    /// Port names in declaration order.
    pub fn port_names(&self) -> Vec<&str> {
        self.ports.names().collect()
    }

    /// The configured reset value for a port, if any.
    pub fn reset_value(&self, name: &str) -> Option<u64> {
        self.config
            .reset_values
            .iter()
            .find(|r| r.port == name)
            .map(|r| r.value)
    }

    fn ensure_live(&self) -> Result<(), DutError> {
        if self.state == DutState::Finished {
            return Err(DutError::Finished);
        }
        Ok(())
    }

    fn entry(&self, name: &str) -> Result<&PortEntry<M>, DutError> {
        self.ports
            .get(name)
            .ok_or_else(|| DutError::UnknownPort(name.to_string()))
    }

    fn signal_for(&self, name: &str, bytes: &[u8]) -> Result<Signal, DutError> {
        self.ensure_live()?;
        let entry = self.entry(name)?;
        Ok(Signal::from_rows(entry.width(), entry.depth(), bytes, false)?)
    }

    fn check_writable(&self, name: &str, signal: &Signal) -> Result<(), DutError> {
        let entry = self.entry(name)?;
        if entry.direction() != PortDirection::Input {
            return Err(DutError::NotAnInput(name.to_string()));
        }
        if !entry.fits(signal) {
            return Err(entry.shape_error(signal.width(), signal.depth()));
        }
        Ok(())
    }

    fn poll_write_queue(&mut self, tick: u64) -> Result<(), DutError> {
        while let Some(write) = self.queue.pop_due(tick) {
            debug!(port = %write.port(), tick, "applying scheduled write");
            self.apply_write(write.port(), write.signal())?;
        }
        Ok(())
    }

    /// Puts a validated value into the model without evaluating.
    fn apply_write(&mut self, name: &str, signal: &Signal) -> Result<(), DutError> {
        match self.config.access {
            AccessPath::Direct => {
                let entry = self
                    .ports
                    .get(name)
                    .ok_or_else(|| DutError::UnknownPort(name.to_string()))?;
                entry.check_storage(&self.model)?;
                (entry.write)(&mut self.model, signal);
            }
            AccessPath::Introspective => {
                let (handle, rows, descending) =
                    self.resolve(name, signal.width(), signal.depth())?;
                for pos in 0..rows {
                    let row = if descending { rows - 1 - pos } else { pos };
                    self.model.put_value(handle, pos, signal.row_words(row)?);
                }
            }
        }
        Ok(())
    }

    fn read_introspective(
        &self,
        name: &str,
        width: u32,
        depth: usize,
    ) -> Result<Signal, DutError> {
        let (handle, rows, descending) = self.resolve(name, width, depth)?;
        let mut factory = SignalFactory::new(width, rows)?;
        let mut done = None;
        for pos in 0..rows {
            done = factory.push(&self.model.get_value(handle, pos))?;
        }
        let signal = done.ok_or_else(|| DutError::ShapeMismatch {
            port: name.to_string(),
            expected_width: width,
            expected_depth: depth,
            width,
            depth: rows - factory.remaining(),
        })?;
        if descending {
            // Position 0 holds the highest index.
            return Ok(Signal::from_rows(width, rows, &signal.to_bytes(false), true)?);
        }
        Ok(signal)
    }

    /// Looks a port up through introspection and checks its shape and
    /// direction against the table.
    ///
    /// Returns the handle, the row count and whether rows iterate from the
    /// highest index down.
    fn resolve(
        &self,
        name: &str,
        width: u32,
        depth: usize,
    ) -> Result<(Handle, usize, bool), DutError> {
        let entry = self.entry(name)?;
        let handle = self
            .model
            .lookup(name)
            .ok_or_else(|| DutError::UnknownPort(name.to_string()))?;
        let direction = self.model.direction(handle);
        if direction != entry.direction() {
            return Err(DutError::DirectionMismatch {
                port: name.to_string(),
                declared: entry.direction(),
                reported: direction,
            });
        }
        let (rows, descending) = match self.model.kind(handle) {
            ObjectKind::Reg => (1, false),
            ObjectKind::Memory => (self.model.rows(handle), self.model.descending(handle)),
            ObjectKind::Other => return Err(DutError::UnsupportedKind(name.to_string())),
        };
        let size = self.model.size(handle);
        if size != width || rows != depth {
            return Err(entry.shape_error(size, rows));
        }
        Ok((handle, rows, descending))
    }
}
