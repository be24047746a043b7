//! Response decoders
//!
//! Every decoder gets the whole response PDU (function code first), the request it answers and
//! the application handler. Wire data is validated before any callback runs; on failure the
//! decoder returns the exception and calls nothing.

use crate::consts::{
    MODBUS_ERROR_BIT, MODBUS_GET_COILS, MODBUS_GET_DISCRETES, MODBUS_GET_HOLDINGS,
    MODBUS_GET_INPUTS, MODBUS_GET_SET_HOLDINGS_BULK, MODBUS_MAX_READ_BITS,
    MODBUS_MAX_READ_REGISTERS, MODBUS_PDU_MAX_SIZE, MODBUS_REPORT_SLAVE_ID, MODBUS_SET_COIL,
    MODBUS_SET_COILS_BULK, MODBUS_SET_HOLDING, MODBUS_SET_HOLDINGS_BULK,
};
use crate::handler::ResponseHandler;
use crate::request::ModbusRequest;
use crate::Exception;

pub type Decoder = fn(&[u8], &ModbusRequest, &mut dyn ResponseHandler) -> Exception;

const MAX_REGISTERS: usize = MODBUS_MAX_READ_REGISTERS as usize;
const MAX_BITS: usize = MODBUS_MAX_READ_BITS as usize;

#[inline]
fn be16(hi: u8, lo: u8) -> u16 {
    (u16::from(hi) << 8) | u16::from(lo)
}

/// `Some` if the frame is an exception response for `func`
fn exception_response(frame: &[u8], func: u8) -> Option<Exception> {
    if frame.first() != Some(&(func | MODBUS_ERROR_BIT)) {
        return None;
    }
    Some(frame.get(1).map_or(Exception::IllegalDataValue, |code| {
        Exception::from_modbus_error(*code)
    }))
}

fn decode_registers(
    frame: &[u8],
    func: u8,
    values: &mut [u16; MAX_REGISTERS],
) -> Result<usize, Exception> {
    if let Some(e) = exception_response(frame, func) {
        return Err(e);
    }
    let count = usize::from(*frame.get(1).ok_or(Exception::IllegalDataValue)? / 2);
    // 125 registers never fit behind a one-byte length, reject it like zero
    if count == 0 || count > MAX_REGISTERS {
        return Err(Exception::IllegalDataValue);
    }
    let data = frame
        .get(2..2 + count * 2)
        .ok_or(Exception::IllegalDataValue)?;
    for (value, pair) in values.iter_mut().zip(data.chunks_exact(2)) {
        *value = be16(pair[0], pair[1]);
    }
    Ok(count)
}

fn decode_bits(
    frame: &[u8],
    func: u8,
    request: &ModbusRequest,
    values: &mut [bool; MAX_BITS],
) -> Result<usize, Exception> {
    if let Some(e) = exception_response(frame, func) {
        return Err(e);
    }
    let bytes = usize::from(*frame.get(1).ok_or(Exception::IllegalDataValue)?);
    if bytes == 0 || bytes * 8 > MAX_BITS {
        return Err(Exception::IllegalDataValue);
    }
    let data = frame.get(2..2 + bytes).ok_or(Exception::IllegalDataValue)?;
    let count = if request.func == func {
        let count = usize::from(request.count);
        if (count + 7) / 8 != bytes {
            return Err(Exception::IllegalDataValue);
        }
        count
    } else {
        bytes * 8
    };
    for (i, value) in values.iter_mut().take(count).enumerate() {
        *value = data[i >> 3] >> (i & 7) & 1 == 1;
    }
    Ok(count)
}

/// Echo of a write: address and value (single) or quantity (bulk), checked against the request
fn decode_echo(frame: &[u8], func: u8, request: &ModbusRequest) -> Result<(u16, u16), Exception> {
    if let Some(e) = exception_response(frame, func) {
        return Err(e);
    }
    if request.func != func {
        return Err(Exception::IllegalFunction);
    }
    let echo = frame.get(1..5).ok_or(Exception::IllegalDataValue)?;
    let address = be16(echo[0], echo[1]);
    let value = be16(echo[2], echo[3]);
    let expected = match func {
        MODBUS_SET_COIL | MODBUS_SET_HOLDING => request.value,
        _ => request.count,
    };
    if address != request.reg || value != expected {
        return Err(Exception::IllegalDataValue);
    }
    Ok((request.address(), value))
}

pub fn read_input_registers_response(
    frame: &[u8],
    _request: &ModbusRequest,
    handler: &mut dyn ResponseHandler,
) -> Exception {
    let mut values = [0u16; MAX_REGISTERS];
    match decode_registers(frame, MODBUS_GET_INPUTS, &mut values) {
        Ok(count) => {
            handler.on_input_registers(&values[..count]);
            Exception::None
        }
        Err(e) => e,
    }
}

pub fn read_holding_registers_response(
    frame: &[u8],
    _request: &ModbusRequest,
    handler: &mut dyn ResponseHandler,
) -> Exception {
    let mut values = [0u16; MAX_REGISTERS];
    match decode_registers(frame, MODBUS_GET_HOLDINGS, &mut values) {
        Ok(count) => {
            handler.on_holding_registers(&values[..count]);
            Exception::None
        }
        Err(e) => e,
    }
}

pub fn read_coils_response(
    frame: &[u8],
    request: &ModbusRequest,
    handler: &mut dyn ResponseHandler,
) -> Exception {
    let mut values = [false; MAX_BITS];
    match decode_bits(frame, MODBUS_GET_COILS, request, &mut values) {
        Ok(count) => {
            handler.on_coils(&values[..count]);
            Exception::None
        }
        Err(e) => e,
    }
}

pub fn read_discrete_inputs_response(
    frame: &[u8],
    request: &ModbusRequest,
    handler: &mut dyn ResponseHandler,
) -> Exception {
    let mut values = [false; MAX_BITS];
    match decode_bits(frame, MODBUS_GET_DISCRETES, request, &mut values) {
        Ok(count) => {
            handler.on_discrete_inputs(&values[..count]);
            Exception::None
        }
        Err(e) => e,
    }
}

pub fn write_coil_response(
    frame: &[u8],
    request: &ModbusRequest,
    handler: &mut dyn ResponseHandler,
) -> Exception {
    match decode_echo(frame, MODBUS_SET_COIL, request) {
        Ok((address, value)) => {
            handler.on_coil_written(address, value == 0xff00);
            Exception::None
        }
        Err(e) => e,
    }
}

pub fn write_register_response(
    frame: &[u8],
    request: &ModbusRequest,
    handler: &mut dyn ResponseHandler,
) -> Exception {
    match decode_echo(frame, MODBUS_SET_HOLDING, request) {
        Ok((address, value)) => {
            handler.on_register_written(address, value);
            Exception::None
        }
        Err(e) => e,
    }
}

pub fn write_multiple_coils_response(
    frame: &[u8],
    request: &ModbusRequest,
    handler: &mut dyn ResponseHandler,
) -> Exception {
    match decode_echo(frame, MODBUS_SET_COILS_BULK, request) {
        Ok((address, count)) => {
            handler.on_coils_written(address, count);
            Exception::None
        }
        Err(e) => e,
    }
}

pub fn write_multiple_registers_response(
    frame: &[u8],
    request: &ModbusRequest,
    handler: &mut dyn ResponseHandler,
) -> Exception {
    match decode_echo(frame, MODBUS_SET_HOLDINGS_BULK, request) {
        Ok((address, count)) => {
            handler.on_registers_written(address, count);
            Exception::None
        }
        Err(e) => e,
    }
}

pub fn read_write_registers_response(
    frame: &[u8],
    _request: &ModbusRequest,
    handler: &mut dyn ResponseHandler,
) -> Exception {
    let mut values = [0u16; MAX_REGISTERS];
    match decode_registers(frame, MODBUS_GET_SET_HOLDINGS_BULK, &mut values) {
        Ok(count) => {
            handler.on_holding_registers(&values[..count]);
            Exception::None
        }
        Err(e) => e,
    }
}

/// Report slave id: byte count, then the device-specific id and run indicator, passed on raw
pub fn report_slave_id_response(
    frame: &[u8],
    _request: &ModbusRequest,
    handler: &mut dyn ResponseHandler,
) -> Exception {
    if let Some(e) = exception_response(frame, MODBUS_REPORT_SLAVE_ID) {
        return e;
    }
    let Some(&bytes) = frame.get(1) else {
        return Exception::IllegalDataValue;
    };
    let bytes = usize::from(bytes);
    if bytes == 0 || bytes > MODBUS_PDU_MAX_SIZE - 2 {
        return Exception::IllegalDataValue;
    }
    match frame.get(2..2 + bytes) {
        Some(data) => {
            handler.on_slave_id(data);
            Exception::None
        }
        None => Exception::IllegalDataValue,
    }
}
