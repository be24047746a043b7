//! ADU framing helpers for transport implementations
//!
//! The engine itself only deals with PDUs. Transports wrap them for the wire:
//!
//! * **Rtu**: `unit | pdu | crc16` (CRC little-endian)
//! * **Ascii**: `:` + hex(`unit | pdu | lrc`) + `\r\n`
//! * **Tcp**: MBAP header `tr_id | 0x0000 | length | unit` + `pdu`
//!
//! Nothing here performs I/O.

use crate::consts::{
    MODBUS_ERROR_BIT, MODBUS_GET_COILS, MODBUS_GET_INPUTS, MODBUS_GET_SET_HOLDINGS_BULK,
    MODBUS_PDU_MAX_SIZE, MODBUS_REPORT_SLAVE_ID, MODBUS_SET_COIL, MODBUS_SET_COILS_BULK,
    MODBUS_SET_HOLDING, MODBUS_SET_HOLDINGS_BULK,
};
use crate::{ErrorKind, ModbusFrameBuf, ModbusProto, VectorTrait};

const MBAP_HEADER_LEN: usize = 7;

/// Decoded ADU: unit id, TCP transaction id (0 for serial modes) and the PDU
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Adu<'a> {
    pub unit_id: u8,
    pub tr_id: u16,
    pub pdu: &'a [u8],
}

pub fn calc_crc16(frame: &[u8]) -> u16 {
    let mut crc: u16 = 0xffff;
    for b in frame {
        crc ^= u16::from(*b);
        for _ in 0..8 {
            if crc & 0x0001 == 0 {
                crc >>= 1;
            } else {
                crc = (crc >> 1) ^ 0xA001;
            }
        }
    }
    crc
}

pub fn calc_lrc(frame: &[u8]) -> u8 {
    frame
        .iter()
        .fold(0u8, |lrc, b| lrc.wrapping_add(*b))
        .wrapping_neg()
}

fn chr_to_hex(c: u8) -> Result<u8, ErrorKind> {
    match c {
        b'0'..=b'9' => Ok(c - b'0'),
        b'A'..=b'F' => Ok(c - b'A' + 10),
        _ => Err(ErrorKind::FrameBroken),
    }
}

#[inline]
fn hex_to_chr(h: u8) -> u8 {
    if h < 10 {
        h + b'0'
    } else {
        h - 10 + b'A'
    }
}

/// Decode the hex body of an ASCII frame into `frame_buf`
///
/// A leading `:` is skipped, decoding stops at CR, LF or NUL. Returns the number of binary bytes
/// written.
///
/// Errors:
///
/// * **OOB** decoded data does not fit into `frame_buf`
/// * **FrameBroken** odd number of hex chars or a non-hex char
pub fn parse_ascii_frame(data: &[u8], frame_buf: &mut [u8]) -> Result<usize, ErrorKind> {
    let body = data.strip_prefix(b":").unwrap_or(data);
    let end = body
        .iter()
        .position(|c| matches!(c, b'\r' | b'\n' | 0))
        .unwrap_or(body.len());
    let body = &body[..end];
    if body.len() % 2 != 0 {
        return Err(ErrorKind::FrameBroken);
    }
    let len = body.len() / 2;
    if len > frame_buf.len() {
        return Err(ErrorKind::OOB);
    }
    for (dst, pair) in frame_buf.iter_mut().zip(body.chunks_exact(2)) {
        *dst = chr_to_hex(pair[0])? << 4 | chr_to_hex(pair[1])?;
    }
    Ok(len)
}

/// Wrap binary data (unit, PDU and LRC) into `:` hex `\r\n`
pub fn generate_ascii_frame<V: VectorTrait<u8>>(
    data: &[u8],
    result: &mut V,
) -> Result<(), ErrorKind> {
    result.clear();
    result.push(b':')?;
    for d in data {
        result.push(hex_to_chr(d >> 4))?;
        result.push(hex_to_chr(*d & 0xf))?;
    }
    result.extend(b"\r\n")
}

/// Frame a request PDU for the wire
///
/// `tr_id` is only used for TCP.
pub fn encode_adu<V: VectorTrait<u8>>(
    proto: ModbusProto,
    unit_id: u8,
    tr_id: u16,
    pdu: &[u8],
    result: &mut V,
) -> Result<(), ErrorKind> {
    if pdu.is_empty() || pdu.len() > MODBUS_PDU_MAX_SIZE {
        return Err(ErrorKind::OOB);
    }
    result.clear();
    match proto {
        ModbusProto::Tcp => {
            #[allow(clippy::cast_possible_truncation)]
            let len = (pdu.len() + 1) as u16;
            result.extend(&tr_id.to_be_bytes())?;
            result.extend(&[0, 0])?;
            result.extend(&len.to_be_bytes())?;
            result.push(unit_id)?;
            result.extend(pdu)
        }
        ModbusProto::Rtu => {
            result.push(unit_id)?;
            result.extend(pdu)?;
            let crc = calc_crc16(result.as_slice());
            result.extend(&crc.to_le_bytes())
        }
        ModbusProto::Ascii => {
            let mut binary: ModbusFrameBuf = [0; 256];
            binary[0] = unit_id;
            binary[1..=pdu.len()].copy_from_slice(pdu);
            let l = pdu.len() + 1;
            binary[l] = calc_lrc(&binary[..l]);
            generate_ascii_frame(&binary[..=l], result)
        }
    }
}

/// Unwrap a received frame, verifying its checksum / header
///
/// ASCII frames are decoded into `scratch`, the other modes return a view into `buf` and leave
/// `scratch` alone.
pub fn decode_adu<'a>(
    proto: ModbusProto,
    buf: &'a [u8],
    scratch: &'a mut ModbusFrameBuf,
) -> Result<Adu<'a>, ErrorKind> {
    match proto {
        ModbusProto::Tcp => {
            if buf.len() < MBAP_HEADER_LEN + 1 {
                return Err(ErrorKind::FrameBroken);
            }
            let tr_id = u16::from_be_bytes([buf[0], buf[1]]);
            let proto_id = u16::from_be_bytes([buf[2], buf[3]]);
            let len = usize::from(u16::from_be_bytes([buf[4], buf[5]]));
            if proto_id != 0 || len < 2 || buf.len() < 6 + len {
                return Err(ErrorKind::FrameBroken);
            }
            Ok(Adu {
                unit_id: buf[6],
                tr_id,
                pdu: &buf[MBAP_HEADER_LEN..6 + len],
            })
        }
        ModbusProto::Rtu => {
            if buf.len() < 4 {
                return Err(ErrorKind::FrameBroken);
            }
            let l = buf.len() - 2;
            if calc_crc16(&buf[..l]) != u16::from_le_bytes([buf[l], buf[l + 1]]) {
                return Err(ErrorKind::FrameCRCError);
            }
            Ok(Adu {
                unit_id: buf[0],
                tr_id: 0,
                pdu: &buf[1..l],
            })
        }
        ModbusProto::Ascii => {
            let len = parse_ascii_frame(buf, scratch)?;
            if len < 3 {
                return Err(ErrorKind::FrameBroken);
            }
            let l = len - 1;
            if calc_lrc(&scratch[..l]) != scratch[l] {
                return Err(ErrorKind::FrameCRCError);
            }
            Ok(Adu {
                unit_id: scratch[0],
                tr_id: 0,
                pdu: &scratch[1..l],
            })
        }
    }
}

/// Guess response frame length
///
/// Frames are often read byte-by-byte. Having the first bytes of a response (3 for RTU, 7 for
/// ASCII, 6 for TCP) the function returns the total frame length, so the transport knows how
/// much more to read.
///
/// * the result may be wrong for broken frames
/// * `FrameBroken` for unknown functions, broken ASCII or non-Modbus TCP headers
/// * `OOB` if `buf` is shorter than the minimum above
pub fn guess_response_frame_len(buf: &[u8], proto: ModbusProto) -> Result<usize, ErrorKind> {
    let mut b: ModbusFrameBuf = [0; 256];
    let (f, multiplier, extra) = match proto {
        ModbusProto::Tcp => {
            if buf.len() < 6 {
                return Err(ErrorKind::OOB);
            }
            if u16::from_be_bytes([buf[2], buf[3]]) != 0 {
                return Err(ErrorKind::FrameBroken);
            }
            return Ok(usize::from(u16::from_be_bytes([buf[4], buf[5]])) + 6);
        }
        ModbusProto::Rtu => {
            if buf.len() < 3 {
                return Err(ErrorKind::OOB);
            }
            // two bytes CRC16
            (buf, 1, 2)
        }
        ModbusProto::Ascii => {
            if buf.len() < 7 {
                return Err(ErrorKind::OOB);
            }
            // decode whole hex pairs only, the rest of the frame may not be there yet
            let body = buf.strip_prefix(b":").unwrap_or(buf);
            let pairs = body.len() / 2 * 2;
            parse_ascii_frame(&body[..pairs], &mut b)?;
            // ':' + two chars LRC + CRLF
            (&b[..], 2, 5)
        }
    };
    let func = f[1];
    let pdu_len = if func & MODBUS_ERROR_BIT == 0 {
        match func {
            MODBUS_GET_COILS..=MODBUS_GET_INPUTS
            | MODBUS_REPORT_SLAVE_ID
            | MODBUS_GET_SET_HOLDINGS_BULK => usize::from(f[2]) + 2,
            MODBUS_SET_COIL
            | MODBUS_SET_HOLDING
            | MODBUS_SET_COILS_BULK
            | MODBUS_SET_HOLDINGS_BULK => 5,
            _ => return Err(ErrorKind::FrameBroken),
        }
    } else {
        2
    };
    // unit id + PDU
    Ok((pdu_len + 1) * multiplier + extra)
}
