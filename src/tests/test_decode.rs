use std::vec;
use std::vec::Vec;

use super::mock::Recorder;
use crate::consts::{MODBUS_GET_COILS, MODBUS_GET_DISCRETES, MODBUS_GET_INPUTS};
use crate::decode::{
    read_coils_response, read_discrete_inputs_response, read_holding_registers_response,
    read_input_registers_response, read_write_registers_response, report_slave_id_response,
    write_coil_response, write_multiple_coils_response, write_multiple_registers_response,
    write_register_response,
};
use crate::{Exception, ModbusRequest};

fn request<F>(generate: F) -> ModbusRequest
where
    F: FnOnce(&mut ModbusRequest, &mut Vec<u8>),
{
    let mut req = ModbusRequest::new(1);
    let mut pdu = Vec::new();
    generate(&mut req, &mut pdu);
    req
}

#[test]
fn test_decode_input_registers() {
    let req = ModbusRequest::default();
    let mut rec = Recorder::default();
    assert_eq!(
        read_input_registers_response(&[0x04, 0x04, 0x00, 0x01, 0x80, 0x00], &req, &mut rec),
        Exception::None
    );
    assert_eq!(rec.inputs, vec![vec![1, 0x8000]]);
    // odd byte count rounds down
    assert_eq!(
        read_input_registers_response(&[0x04, 0x03, 0x00, 0x02, 0xFF], &req, &mut rec),
        Exception::None
    );
    assert_eq!(rec.inputs[1], vec![2]);
}

#[test]
fn test_decode_register_count_bounds() {
    let req = ModbusRequest::default();
    let mut frame = [0u8; 256];
    frame[0] = MODBUS_GET_INPUTS;
    for _ in 0..100 {
        let bytes: u8 = rand::random();
        let count = usize::from(bytes / 2);
        frame[1] = bytes;
        for d in frame.iter_mut().skip(2) {
            *d = rand::random();
        }
        let mut rec = Recorder::default();
        let result = read_input_registers_response(&frame, &req, &mut rec);
        if count == 0 || count >= 125 {
            assert_eq!(result, Exception::IllegalDataValue);
            assert!(rec.inputs.is_empty());
        } else {
            assert_eq!(result, Exception::None);
            assert_eq!(rec.inputs.len(), 1);
            assert_eq!(rec.inputs[0].len(), count);
            assert_eq!(
                rec.inputs[0][count - 1],
                u16::from_be_bytes([frame[count * 2], frame[count * 2 + 1]])
            );
        }
    }
    let mut rec = Recorder::default();
    // 124 registers is the most that gets through
    frame[1] = 248;
    assert_eq!(
        read_input_registers_response(&frame, &req, &mut rec),
        Exception::None
    );
    assert_eq!(rec.inputs[0].len(), 124);
    frame[1] = 250;
    assert_eq!(
        read_input_registers_response(&frame, &req, &mut rec),
        Exception::IllegalDataValue
    );
    frame[1] = 1;
    assert_eq!(
        read_input_registers_response(&frame, &req, &mut rec),
        Exception::IllegalDataValue
    );
    assert_eq!(rec.inputs.len(), 1);
}

#[test]
fn test_decode_registers_truncated() {
    let req = ModbusRequest::default();
    let mut rec = Recorder::default();
    for frame in [&[0x03][..], &[0x03, 0x04, 0x00, 0x01, 0x00][..]] {
        assert_eq!(
            read_holding_registers_response(frame, &req, &mut rec),
            Exception::IllegalDataValue
        );
    }
    assert!(rec.holdings.is_empty());
}

#[test]
fn test_decode_exception_responses() {
    let req = ModbusRequest::default();
    let mut rec = Recorder::default();
    assert_eq!(
        read_input_registers_response(&[0x84, 0x02], &req, &mut rec),
        Exception::IllegalDataAddress
    );
    assert_eq!(
        read_holding_registers_response(&[0x83, 0x06], &req, &mut rec),
        Exception::SlaveDeviceBusy
    );
    assert_eq!(
        read_holding_registers_response(&[0x83, 0x0B], &req, &mut rec),
        Exception::GatewayTargetFailed
    );
    assert_eq!(
        read_holding_registers_response(&[0x83, 0x42], &req, &mut rec),
        Exception::Unknown(0x42)
    );
    assert_eq!(
        read_holding_registers_response(&[0x83, 0x00], &req, &mut rec),
        Exception::Unknown(0)
    );
    // exception code missing
    assert_eq!(
        read_coils_response(&[0x81], &req, &mut rec),
        Exception::IllegalDataValue
    );
    let req = request(|r, pdu| r.generate_set_holding(1, 1, pdu).unwrap());
    assert_eq!(
        write_register_response(&[0x86, 0x04], &req, &mut rec),
        Exception::SlaveDeviceFailure
    );
    assert_eq!(rec.calls(), 0);
}

#[test]
fn test_exception_codes() {
    for code in 1..=0x0Bu8 {
        let e = Exception::from_modbus_error(code);
        assert!(!e.is_none());
        assert_eq!(e.code(), code);
    }
    assert_eq!(Exception::from_modbus_error(9), Exception::Unknown(9));
    assert_eq!(Exception::None.code(), 0);
    assert_eq!(
        std::format!("{}", Exception::IllegalDataAddress),
        "MODBUS ERROR CODE 02 - ILLEGAL DATA ADDRESS"
    );
}

#[test]
fn test_decode_bits_by_request_count() {
    let req = request(|r, pdu| r.generate_get_coils(1, 11, pdu).unwrap());
    let mut rec = Recorder::default();
    assert_eq!(
        read_coils_response(&[0x01, 0x02, 0xFF, 0x05], &req, &mut rec),
        Exception::None
    );
    let mut expected = vec![true; 8];
    expected.extend_from_slice(&[true, false, true]);
    assert_eq!(rec.coils, vec![expected]);
    // byte count must match the request
    assert_eq!(
        read_coils_response(&[0x01, 0x01, 0xFF], &req, &mut rec),
        Exception::IllegalDataValue
    );
    assert_eq!(
        read_coils_response(&[0x01, 0x03, 0xFF, 0x05, 0x00], &req, &mut rec),
        Exception::IllegalDataValue
    );
    assert_eq!(rec.coils.len(), 1);
}

#[test]
fn test_decode_bits_without_request() {
    // the last request was something else, all bits of the payload are reported
    let req = request(|r, pdu| r.generate_get_inputs(1, 1, pdu).unwrap());
    let mut rec = Recorder::default();
    assert_eq!(
        read_discrete_inputs_response(&[MODBUS_GET_DISCRETES, 0x01, 0x81], &req, &mut rec),
        Exception::None
    );
    assert_eq!(
        rec.discretes,
        vec![vec![true, false, false, false, false, false, false, true]]
    );
}

#[test]
fn test_decode_bits_bounds() {
    let req = ModbusRequest::default();
    let mut rec = Recorder::default();
    assert_eq!(
        read_coils_response(&[MODBUS_GET_COILS, 0x00], &req, &mut rec),
        Exception::IllegalDataValue
    );
    let mut frame = [0u8; 256];
    frame[0] = MODBUS_GET_COILS;
    frame[1] = 251;
    assert_eq!(
        read_coils_response(&frame, &req, &mut rec),
        Exception::IllegalDataValue
    );
    frame[1] = 250;
    assert_eq!(read_coils_response(&frame, &req, &mut rec), Exception::None);
    assert_eq!(rec.coils[0].len(), 2000);
    // truncated
    assert_eq!(
        read_coils_response(&[MODBUS_GET_COILS, 0x02, 0x01], &req, &mut rec),
        Exception::IllegalDataValue
    );
    assert_eq!(rec.coils.len(), 1);
}

#[test]
fn test_decode_write_echoes() {
    let mut rec = Recorder::default();

    let req = request(|r, pdu| r.generate_set_coil(16, false, pdu).unwrap());
    assert_eq!(
        write_coil_response(&[0x05, 0x00, 0x0F, 0x00, 0x00], &req, &mut rec),
        Exception::None
    );
    assert_eq!(rec.coil_written, vec![(16, false)]);

    let req = request(|r, pdu| r.generate_set_holding(2, 0xBEEF, pdu).unwrap());
    assert_eq!(
        write_register_response(&[0x06, 0x00, 0x01, 0xBE, 0xEF], &req, &mut rec),
        Exception::None
    );
    assert_eq!(rec.register_written, vec![(2, 0xBEEF)]);

    let req = request(|r, pdu| {
        r.generate_set_holdings_bulk(2, &[1, 2], pdu).unwrap()
    });
    assert_eq!(
        write_multiple_registers_response(&[0x10, 0x00, 0x01, 0x00, 0x02], &req, &mut rec),
        Exception::None
    );
    assert_eq!(rec.registers_written, vec![(2, 2)]);

    let req = request(|r, pdu| {
        r.generate_set_coils_bulk(3, &[true; 20], pdu).unwrap()
    });
    assert_eq!(
        write_multiple_coils_response(&[0x0F, 0x00, 0x02, 0x00, 0x14], &req, &mut rec),
        Exception::None
    );
    assert_eq!(rec.coils_written, vec![(3, 20)]);
}

#[test]
fn test_decode_write_echo_mismatch() {
    let mut rec = Recorder::default();
    let req = request(|r, pdu| r.generate_set_holding(2, 0xBEEF, pdu).unwrap());
    // wrong address
    assert_eq!(
        write_register_response(&[0x06, 0x00, 0x02, 0xBE, 0xEF], &req, &mut rec),
        Exception::IllegalDataValue
    );
    // wrong value
    assert_eq!(
        write_register_response(&[0x06, 0x00, 0x01, 0xBE, 0xEE], &req, &mut rec),
        Exception::IllegalDataValue
    );
    // truncated
    assert_eq!(
        write_register_response(&[0x06, 0x00, 0x01, 0xBE], &req, &mut rec),
        Exception::IllegalDataValue
    );
    // not what was asked for
    assert_eq!(
        write_multiple_registers_response(&[0x10, 0x00, 0x01, 0x00, 0x01], &req, &mut rec),
        Exception::IllegalFunction
    );
    let req = request(|r, pdu| r.generate_set_coil(1, true, pdu).unwrap());
    assert_eq!(
        write_coil_response(&[0x05, 0x00, 0x00, 0x00, 0x00], &req, &mut rec),
        Exception::IllegalDataValue
    );
    assert_eq!(rec.calls(), 0);
}

#[test]
fn test_decode_report_slave_id() {
    let req = request(|r, pdu| r.generate_report_slave_id(pdu).unwrap());
    let mut rec = Recorder::default();
    assert_eq!(
        report_slave_id_response(&[0x11, 0x03, 0x0A, 0xFF, 0x01], &req, &mut rec),
        Exception::None
    );
    assert_eq!(rec.slave_ids, vec![vec![0x0A, 0xFF, 0x01]]);
    // bytes past the count are ignored
    assert_eq!(
        report_slave_id_response(&[0x11, 0x01, 0x2A, 0x00], &req, &mut rec),
        Exception::None
    );
    assert_eq!(rec.slave_ids[1], vec![0x2A]);
    for frame in [
        &[0x11][..],
        &[0x11, 0x00][..],
        &[0x11, 0x04, 0x0A, 0xFF, 0x01][..],
        &[0x11, 0xFC][..],
    ] {
        assert_eq!(
            report_slave_id_response(frame, &req, &mut rec),
            Exception::IllegalDataValue
        );
    }
    assert_eq!(
        report_slave_id_response(&[0x91, 0x01], &req, &mut rec),
        Exception::IllegalFunction
    );
    assert_eq!(rec.slave_ids.len(), 2);
}

#[test]
fn test_decode_read_write_registers() {
    let req = request(|r, pdu| {
        r.generate_get_set_holdings_bulk(1, 2, 10, &[7], pdu)
            .unwrap()
    });
    let mut rec = Recorder::default();
    assert_eq!(
        read_write_registers_response(&[0x17, 0x04, 0x00, 0x01, 0x00, 0x02], &req, &mut rec),
        Exception::None
    );
    assert_eq!(rec.holdings, vec![vec![1, 2]]);
    assert_eq!(
        read_write_registers_response(&[0x17, 0x00], &req, &mut rec),
        Exception::IllegalDataValue
    );
    assert_eq!(
        read_write_registers_response(&[0x97, 0x03], &req, &mut rec),
        Exception::IllegalDataValue
    );
    assert_eq!(
        read_write_registers_response(&[0x97, 0x04], &req, &mut rec),
        Exception::SlaveDeviceFailure
    );
    assert_eq!(rec.holdings.len(), 1);
}
