//! Routing of host link events to model ports.
//!
//! A host component talks to the engine through numbered link ports. Each
//! [`PortEvent`] carries an action, a relative tick and a byte packet;
//! [`LinkAdapter`] maps the port id to a model port through the configured
//! [`LinkPortDef`] table and turns the event into an engine call.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;
use vsst_config::{LinkDirection, LinkPortDef};

use crate::dut::Dut;
use crate::error::DutError;
use crate::model::RtlModel;
use crate::port::PortDirection;

/// Errors raised while decoding or dispatching link events.
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    /// No link port has this id.
    #[error("unknown link port id {0}")]
    UnknownPortId(u32),

    /// The packet size does not match the link port's declared size.
    #[error("link port '{port}' expects {expected} bytes, got {actual}")]
    SizeMismatch {
        /// Port name.
        port: String,
        /// Declared size in bytes.
        expected: usize,
        /// Size that was supplied.
        actual: usize,
    },

    /// A write arrived on a link port that only allows reads.
    #[error("link port '{0}' does not accept writes")]
    NotWritable(String),

    /// A read arrived on a link port that only allows writes.
    #[error("link port '{0}' does not allow reads")]
    NotReadable(String),

    /// The engine cannot drive a bidirectional port.
    #[error("link port '{0}' is bidirectional, which the engine does not support")]
    InOutUnsupported(String),

    /// Two link ports share an id.
    #[error("duplicate link port id {0}")]
    DuplicateId(u32),

    /// A deferred write's offset runs past the last representable tick.
    #[error("link write to '{port}' {offset} ticks after tick {now} overflows the tick counter")]
    TickOverflow {
        /// Port name.
        port: String,
        /// Requested offset from the current tick.
        offset: u64,
        /// Tick at the time of the request.
        now: u64,
    },

    /// An event could not be encoded or decoded.
    #[error("link codec error: {0}")]
    Codec(String),

    /// The engine rejected the operation.
    #[error(transparent)]
    Dut(#[from] DutError),
}

/// What a [`PortEvent`] asks the engine to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PortAction {
    /// Sample the port.
    Read,
    /// Drive the port.
    Write,
}

/// One event on a link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortEvent {
    /// Requested action.
    pub action: PortAction,
    /// For writes, ticks from now; 0 applies immediately. For read
    /// responses, the tick the value was sampled at.
    pub at_tick: u64,
    /// Port bytes.
    pub packet: Vec<u8>,
}

impl PortEvent {
    /// A write of `packet`, `at_tick` ticks from now.
    pub fn write(at_tick: u64, packet: Vec<u8>) -> Self {
        Self {
            action: PortAction::Write,
            at_tick,
            packet,
        }
    }

    /// A read request.
    pub fn read() -> Self {
        Self {
            action: PortAction::Read,
            at_tick: 0,
            packet: Vec::new(),
        }
    }

    /// Encodes the event for transport.
    pub fn encode(&self) -> Result<Vec<u8>, LinkError> {
        bincode::serde::encode_to_vec(self, bincode::config::standard())
            .map_err(|e| LinkError::Codec(e.to_string()))
    }

    /// Decodes an event produced by [`encode`](Self::encode).
    pub fn decode(bytes: &[u8]) -> Result<Self, LinkError> {
        let (event, _) = bincode::serde::decode_from_slice(bytes, bincode::config::standard())
            .map_err(|e| LinkError::Codec(e.to_string()))?;
        Ok(event)
    }
}

/// Dispatches link events to an engine.
#[derive(Debug, Clone)]
pub struct LinkAdapter {
    ports: HashMap<u32, LinkPortDef>,
}

impl LinkAdapter {
    /// Builds the adapter, checking every definition against the engine's
    /// port table.
    pub fn new<M: RtlModel>(dut: &Dut<M>, defs: &[LinkPortDef]) -> Result<Self, LinkError> {
        let mut ports = HashMap::with_capacity(defs.len());
        for def in defs {
            if def.direction == LinkDirection::InOut {
                return Err(LinkError::InOutUnsupported(def.name.clone()));
            }
            let expected = dut.port_byte_len(&def.name)?;
            if def.size != expected {
                return Err(LinkError::SizeMismatch {
                    port: def.name.clone(),
                    expected,
                    actual: def.size,
                });
            }
            if def.direction.is_writable() && dut.port_direction(&def.name)? != PortDirection::Input
            {
                return Err(DutError::NotAnInput(def.name.clone()).into());
            }
            if ports.insert(def.id, def.clone()).is_some() {
                return Err(LinkError::DuplicateId(def.id));
            }
        }
        Ok(Self { ports })
    }

    /// Number of link ports.
    pub fn len(&self) -> usize {
        self.ports.len()
    }

    /// Whether no link ports are configured.
    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }

    /// Applies `event` arriving on link port `port_id`.
    ///
    /// Writes return `None`. Reads return a response carrying the port's
    /// bytes and the current tick.
    pub fn handle<M: RtlModel>(
        &self,
        dut: &mut Dut<M>,
        port_id: u32,
        event: &PortEvent,
    ) -> Result<Option<PortEvent>, LinkError> {
        let def = self
            .ports
            .get(&port_id)
            .ok_or(LinkError::UnknownPortId(port_id))?;
        match event.action {
            PortAction::Write => {
                if !def.direction.is_writable() {
                    return Err(LinkError::NotWritable(def.name.clone()));
                }
                if event.packet.len() != def.size {
                    return Err(LinkError::SizeMismatch {
                        port: def.name.clone(),
                        expected: def.size,
                        actual: event.packet.len(),
                    });
                }
                if event.at_tick == 0 {
                    debug!(port = %def.name, id = port_id, "link write");
                    dut.write_port_bytes(&def.name, &event.packet)?;
                } else {
                    let now = dut.current_tick();
                    let at = now
                        .checked_add(event.at_tick)
                        .ok_or_else(|| LinkError::TickOverflow {
                            port: def.name.clone(),
                            offset: event.at_tick,
                            now,
                        })?;
                    debug!(port = %def.name, id = port_id, at, "link deferred write");
                    dut.write_port_bytes_at_tick(&def.name, &event.packet, at)?;
                }
                Ok(None)
            }
            PortAction::Read => {
                if !def.direction.is_readable() {
                    return Err(LinkError::NotReadable(def.name.clone()));
                }
                let packet = dut.read_port_bytes(&def.name)?;
                debug!(port = %def.name, id = port_id, "link read");
                Ok(Some(PortEvent {
                    action: PortAction::Read,
                    at_tick: dut.current_tick(),
                    packet,
                }))
            }
        }
    }
}
