#![ doc = include_str!( concat!( env!( "CARGO_MANIFEST_DIR" ), "/", "README.md" ) ) ]
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(all(test, not(feature = "std")))]
extern crate std;

pub mod adu;
pub mod config;
pub mod consts;
pub mod decode;
pub mod event;
pub mod handler;
pub mod master;
pub mod registry;
pub mod request;
pub mod transport;

mod vector;
pub use vector::VectorTrait;

mod error;
pub use error::{ErrorKind, Exception};

pub use handler::ResponseHandler;
pub use master::{ModbusMaster, State};
pub use request::ModbusRequest;
pub use transport::Transport;

#[cfg(test)]
mod tests;

/// Transport mode
///
/// * **Rtu**: binary serial framing with CRC16
/// * **Ascii**: printable serial framing with LRC
/// * **Tcp**: MBAP header over a stream socket
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
#[cfg_attr(feature = "with_serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "with_serde", serde(rename_all = "lowercase"))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ModbusProto {
    Rtu,
    Ascii,
    Tcp,
}

impl ModbusProto {
    /// Whether the mode is compiled in (features `rtu`, `ascii`, `tcp`)
    pub const fn is_supported(self) -> bool {
        match self {
            ModbusProto::Rtu => cfg!(feature = "rtu"),
            ModbusProto::Ascii => cfg!(feature = "ascii"),
            ModbusProto::Tcp => cfg!(feature = "tcp"),
        }
    }
}

/// Frame buffer
///
/// A Modbus ADU is never longer than 256 bytes (ASCII frames are decoded into it in binary
/// form), so a fixed array is enough.
pub type ModbusFrameBuf = [u8; 256];
