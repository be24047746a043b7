//! MODBUS Constants

// MODBUS Functions
pub const MODBUS_GET_COILS: u8 = 0x01;
pub const MODBUS_GET_DISCRETES: u8 = 0x02;
pub const MODBUS_GET_HOLDINGS: u8 = 0x03;
pub const MODBUS_GET_INPUTS: u8 = 0x04;
pub const MODBUS_SET_COIL: u8 = 0x05;
pub const MODBUS_SET_HOLDING: u8 = 0x06;
pub const MODBUS_SET_COILS_BULK: u8 = 0x0F;
pub const MODBUS_SET_HOLDINGS_BULK: u8 = 0x10;
pub const MODBUS_REPORT_SLAVE_ID: u8 = 0x11;
pub const MODBUS_GET_SET_HOLDINGS_BULK: u8 = 0x17;

/// Set in the function code of an exception response
pub const MODBUS_ERROR_BIT: u8 = 0x80;

// MODBUS Errors
pub const MODBUS_ERROR_ILLEGAL_FUNCTION: u8 = 0x01;
pub const MODBUS_ERROR_ILLEGAL_DATA_ADDRESS: u8 = 0x02;
pub const MODBUS_ERROR_ILLEGAL_DATA_VALUE: u8 = 0x03;
pub const MODBUS_ERROR_SLAVE_DEVICE_FAILURE: u8 = 0x04;
pub const MODBUS_ERROR_ACKNOWLEDGE: u8 = 0x05;
pub const MODBUS_ERROR_SLAVE_DEVICE_BUSY: u8 = 0x06;
pub const MODBUS_ERROR_NEGATIVE_ACKNOWLEDGE: u8 = 0x07;
pub const MODBUS_ERROR_MEMORY_PARITY: u8 = 0x08;
pub const MODBUS_ERROR_GATEWAY_PATH_UNAVAILABLE: u8 = 0x0A;
pub const MODBUS_ERROR_GATEWAY_TARGET_FAILED: u8 = 0x0B;

// PDU limits
pub const MODBUS_PDU_MAX_SIZE: usize = 253;
/// Highest one-based register / coil number accepted by the request builders
pub const MODBUS_MAX_ADDRESS: u16 = 10000;
/// 125 registers would not fit behind the one-byte length of the response
pub const MODBUS_MAX_READ_REGISTERS: u16 = 124;
pub const MODBUS_MAX_WRITE_REGISTERS: u16 = 123;
/// Write part of a read/write multiple registers request
pub const MODBUS_MAX_READ_WRITE_REGISTERS: u16 = 121;
pub const MODBUS_MAX_READ_BITS: u16 = 2000;
pub const MODBUS_MAX_WRITE_BITS: u16 = 1968;

/// Unit id used as the current target right after a TCP init
pub const MODBUS_TCP_PSEUDO_ADDRESS: u8 = 0xFF;
