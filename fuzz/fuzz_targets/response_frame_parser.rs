#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use mbmaster::{
    adu::{decode_adu, guess_response_frame_len},
    registry::FunctionRegistry,
    ModbusFrameBuf, ModbusProto, ModbusRequest,
};

#[derive(Debug, Arbitrary)]
enum FuzzProto {
    Rtu,
    Ascii,
    Tcp,
}

impl From<FuzzProto> for ModbusProto {
    fn from(p: FuzzProto) -> Self {
        match p {
            FuzzProto::Rtu => ModbusProto::Rtu,
            FuzzProto::Ascii => ModbusProto::Ascii,
            FuzzProto::Tcp => ModbusProto::Tcp,
        }
    }
}

#[derive(Debug, Arbitrary)]
struct FuzzInput<'a> {
    proto: FuzzProto,
    // last request the response is checked against
    func: u8,
    reg: u16,
    count: u16,
    value: u16,
    write_reg: u16,
    write_count: u16,
    response_buf: &'a [u8],
}

fuzz_target!(|data: FuzzInput| {
    // only panics matter
    fuzz_response(data);
});

fn fuzz_response(input: FuzzInput) {
    let proto: ModbusProto = input.proto.into();
    let request = ModbusRequest {
        slave: 1,
        func: input.func,
        reg: input.reg,
        count: input.count,
        value: input.value,
        write_reg: input.write_reg,
        write_count: input.write_count,
    };
    let registry = FunctionRegistry::default();
    // raw PDU straight into the decoders
    let _ = registry.dispatch(input.response_buf, &request, &mut ());
    let _ = guess_response_frame_len(input.response_buf, proto);
    let mut scratch: ModbusFrameBuf = [0; 256];
    if let Ok(adu) = decode_adu(proto, input.response_buf, &mut scratch) {
        let _ = registry.dispatch(adu.pdu, &request, &mut ());
    }
}
