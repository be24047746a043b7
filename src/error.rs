use crate::consts::{
    MODBUS_ERROR_ACKNOWLEDGE, MODBUS_ERROR_GATEWAY_PATH_UNAVAILABLE,
    MODBUS_ERROR_GATEWAY_TARGET_FAILED, MODBUS_ERROR_ILLEGAL_DATA_ADDRESS,
    MODBUS_ERROR_ILLEGAL_DATA_VALUE, MODBUS_ERROR_ILLEGAL_FUNCTION, MODBUS_ERROR_MEMORY_PARITY,
    MODBUS_ERROR_NEGATIVE_ACKNOWLEDGE, MODBUS_ERROR_SLAVE_DEVICE_BUSY,
    MODBUS_ERROR_SLAVE_DEVICE_FAILURE,
};

/// Engine-level error returned by every public operation
#[allow(clippy::module_name_repetitions)]
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ErrorKind {
    /// operation is not valid in the current state, or no transport buffer is available
    IllegalState,
    /// address, count or mode out of bounds
    InvalidArgument,
    /// event queue or transport setup failed
    PortError,
    /// send / receive failed or the response carried an exception
    IOError,
    /// out of buffer
    OOB,
    FrameBroken,
    FrameCRCError,
    Timeout,
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg: &str = match self {
            ErrorKind::IllegalState => "ILLEGAL PROTOCOL STATE",
            ErrorKind::InvalidArgument => "INVALID ARGUMENT",
            ErrorKind::PortError => "PORT ERROR",
            ErrorKind::IOError => "I/O ERROR",
            ErrorKind::OOB => "OUT OF BUFFER",
            ErrorKind::FrameBroken => "FRAME BROKEN",
            ErrorKind::FrameCRCError => "FRAME CRC ERROR",
            ErrorKind::Timeout => "TIMEOUT",
        };
        write!(f, "{}", msg)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ErrorKind {}

/// Wire-level Modbus exception, as returned by the response decoders
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Exception {
    None,
    IllegalFunction,
    IllegalDataAddress,
    IllegalDataValue,
    SlaveDeviceFailure,
    Acknowledge,
    SlaveDeviceBusy,
    NegativeAcknowledge,
    MemoryParityError,
    GatewayPathUnavailable,
    GatewayTargetFailed,
    Unknown(u8),
}

impl Exception {
    /// Map the code byte of an exception response
    ///
    /// Never returns [`Exception::None`]: a zero code in an exception response is
    /// reported as `Unknown(0)`.
    pub fn from_modbus_error(code: u8) -> Self {
        match code {
            MODBUS_ERROR_ILLEGAL_FUNCTION => Exception::IllegalFunction,
            MODBUS_ERROR_ILLEGAL_DATA_ADDRESS => Exception::IllegalDataAddress,
            MODBUS_ERROR_ILLEGAL_DATA_VALUE => Exception::IllegalDataValue,
            MODBUS_ERROR_SLAVE_DEVICE_FAILURE => Exception::SlaveDeviceFailure,
            MODBUS_ERROR_ACKNOWLEDGE => Exception::Acknowledge,
            MODBUS_ERROR_SLAVE_DEVICE_BUSY => Exception::SlaveDeviceBusy,
            MODBUS_ERROR_NEGATIVE_ACKNOWLEDGE => Exception::NegativeAcknowledge,
            MODBUS_ERROR_MEMORY_PARITY => Exception::MemoryParityError,
            MODBUS_ERROR_GATEWAY_PATH_UNAVAILABLE => Exception::GatewayPathUnavailable,
            MODBUS_ERROR_GATEWAY_TARGET_FAILED => Exception::GatewayTargetFailed,
            other => Exception::Unknown(other),
        }
    }

    /// Wire code, 0 for [`Exception::None`]
    pub fn code(self) -> u8 {
        match self {
            Exception::None => 0,
            Exception::IllegalFunction => MODBUS_ERROR_ILLEGAL_FUNCTION,
            Exception::IllegalDataAddress => MODBUS_ERROR_ILLEGAL_DATA_ADDRESS,
            Exception::IllegalDataValue => MODBUS_ERROR_ILLEGAL_DATA_VALUE,
            Exception::SlaveDeviceFailure => MODBUS_ERROR_SLAVE_DEVICE_FAILURE,
            Exception::Acknowledge => MODBUS_ERROR_ACKNOWLEDGE,
            Exception::SlaveDeviceBusy => MODBUS_ERROR_SLAVE_DEVICE_BUSY,
            Exception::NegativeAcknowledge => MODBUS_ERROR_NEGATIVE_ACKNOWLEDGE,
            Exception::MemoryParityError => MODBUS_ERROR_MEMORY_PARITY,
            Exception::GatewayPathUnavailable => MODBUS_ERROR_GATEWAY_PATH_UNAVAILABLE,
            Exception::GatewayTargetFailed => MODBUS_ERROR_GATEWAY_TARGET_FAILED,
            Exception::Unknown(code) => code,
        }
    }

    #[inline]
    pub fn is_none(self) -> bool {
        self == Exception::None
    }
}

impl core::fmt::Display for Exception {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Exception::None => write!(f, "NO EXCEPTION"),
            Exception::IllegalFunction => write!(f, "MODBUS ERROR CODE 01 - ILLEGAL FUNCTION"),
            Exception::IllegalDataAddress => {
                write!(f, "MODBUS ERROR CODE 02 - ILLEGAL DATA ADDRESS")
            }
            Exception::IllegalDataValue => write!(f, "MODBUS ERROR CODE 03 - ILLEGAL DATA VALUE"),
            Exception::SlaveDeviceFailure => {
                write!(f, "MODBUS ERROR CODE 04 - SLAVE DEVICE FAILURE")
            }
            Exception::Acknowledge => write!(f, "MODBUS ERROR CODE 05 - ACKNOWLEDGE"),
            Exception::SlaveDeviceBusy => write!(f, "MODBUS ERROR CODE 06 - SLAVE DEVICE BUSY"),
            Exception::NegativeAcknowledge => {
                write!(f, "MODBUS ERROR CODE 07 - NEGATIVE ACKNOWLEDGE")
            }
            Exception::MemoryParityError => write!(f, "MODBUS ERROR CODE 08 - MEMORY PARITY ERROR"),
            Exception::GatewayPathUnavailable => {
                write!(f, "MODBUS ERROR CODE 10 - GATEWAY PATH UNAVAILABLE")
            }
            Exception::GatewayTargetFailed => {
                write!(f, "MODBUS ERROR CODE 11 - GATEWAY TARGET FAILED")
            }
            Exception::Unknown(code) => write!(f, "UNKNOWN MODBUS ERROR CODE {:02X}", code),
        }
    }
}
