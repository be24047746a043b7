//! Port parameters handed to [`Transport::init`](crate::transport::Transport::init)
//!
//! The engine only checks that the parameter kind matches the selected mode; the values are
//! interpreted by the transport. With the `with_serde` feature the types can be loaded from any
//! serde-supported configuration format.

#[cfg(feature = "with_serde")]
use serde::{Deserialize, Serialize};

use crate::ModbusProto;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
#[cfg_attr(feature = "with_serde", derive(Deserialize, Serialize))]
#[cfg_attr(feature = "with_serde", serde(rename_all = "lowercase"))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Parity {
    None,
    Odd,
    #[default]
    Even,
}

/// Serial line parameters (RTU / ASCII)
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "with_serde", derive(Deserialize, Serialize))]
#[cfg_attr(feature = "with_serde", serde(default))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SerialConfig {
    /// platform-specific port number
    pub port: u8,
    pub baud_rate: u32,
    pub parity: Parity,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: 0,
            baud_rate: 19200,
            parity: Parity::Even,
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "with_serde", derive(Deserialize, Serialize))]
#[cfg_attr(feature = "with_serde", serde(default))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TcpConfig {
    pub port: u16,
}

impl Default for TcpConfig {
    fn default() -> Self {
        Self { port: 502 }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "with_serde", derive(Deserialize, Serialize))]
#[cfg_attr(feature = "with_serde", serde(rename_all = "lowercase"))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PortConfig {
    Serial(SerialConfig),
    Tcp(TcpConfig),
}

impl PortConfig {
    /// Whether the parameters can drive a transport in the given mode
    pub fn fits(&self, proto: ModbusProto) -> bool {
        matches!(
            (self, proto),
            (PortConfig::Serial(_), ModbusProto::Rtu | ModbusProto::Ascii)
                | (PortConfig::Tcp(_), ModbusProto::Tcp)
        )
    }
}

impl From<SerialConfig> for PortConfig {
    fn from(config: SerialConfig) -> Self {
        PortConfig::Serial(config)
    }
}

impl From<TcpConfig> for PortConfig {
    fn from(config: TcpConfig) -> Self {
        PortConfig::Tcp(config)
    }
}
