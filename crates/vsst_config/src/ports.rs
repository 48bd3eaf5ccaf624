//! String formats for per-port settings.
//!
//! Both formats are colon-separated and come straight from the host's
//! parameter lists:
//!
//! - reset values: `port:value`, value in decimal or `0x` hex
//! - link ports: `name:id:size:direction`, size in bytes, direction a
//!   bitmask (`2` input, `1` output, `3` both)

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// An initial value applied to a named port before simulation starts.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct PortReset {
    /// Port the value is written to.
    pub port: String,
    /// Value, truncated to the port's width when applied.
    pub value: u64,
}

impl FromStr for PortReset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ConfigError::InvalidResetValue(s.to_string());
        let (port, value) = s.split_once(':').ok_or_else(err)?;
        let port = port.trim();
        if port.is_empty() || value.contains(':') {
            return Err(err());
        }
        let value = parse_u64(value.trim()).ok_or_else(err)?;
        Ok(Self {
            port: port.to_string(),
            value,
        })
    }
}

impl TryFrom<String> for PortReset {
    type Error = ConfigError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Direction of a link port, as seen from the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkDirection {
    /// Driven by the link.
    Input,
    /// Observed by the link.
    Output,
    /// Both.
    InOut,
}

impl LinkDirection {
    /// Decodes the two-bit direction mask.
    pub fn from_mask(mask: u8) -> Option<Self> {
        match mask {
            0b10 => Some(Self::Input),
            0b01 => Some(Self::Output),
            0b11 => Some(Self::InOut),
            _ => None,
        }
    }

    /// The two-bit direction mask.
    pub fn mask(self) -> u8 {
        match self {
            Self::Input => 0b10,
            Self::Output => 0b01,
            Self::InOut => 0b11,
        }
    }

    /// Whether the link may write this port.
    pub fn is_writable(self) -> bool {
        self.mask() & 0b10 != 0
    }

    /// Whether the link may read this port.
    pub fn is_readable(self) -> bool {
        self.mask() & 0b01 != 0
    }
}

impl fmt::Display for LinkDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input => write!(f, "input"),
            Self::Output => write!(f, "output"),
            Self::InOut => write!(f, "inout"),
        }
    }
}

/// One entry of the link port map.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct LinkPortDef {
    /// Model port name.
    pub name: String,
    /// Numeric id carried by link events.
    pub id: u32,
    /// Packet size in bytes.
    pub size: usize,
    /// Allowed transfer direction.
    pub direction: LinkDirection,
}

impl FromStr for LinkPortDef {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ConfigError::InvalidPortDef(s.to_string());
        let fields: Vec<&str> = s.split(':').map(str::trim).collect();
        let [name, id, size, direction] = fields.as_slice() else {
            return Err(err());
        };
        if name.is_empty() {
            return Err(err());
        }
        let id = id.parse().map_err(|_| err())?;
        let size = size.parse().map_err(|_| err())?;
        let direction = direction
            .parse()
            .ok()
            .and_then(LinkDirection::from_mask)
            .ok_or_else(err)?;
        Ok(Self {
            name: name.to_string(),
            id,
            size,
            direction,
        })
    }
}

impl TryFrom<String> for LinkPortDef {
    type Error = ConfigError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

fn parse_u64(s: &str) -> Option<u64> {
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => s.parse().ok(),
    }
}
