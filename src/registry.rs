use crate::consts::{
    MODBUS_ERROR_BIT, MODBUS_GET_COILS, MODBUS_GET_DISCRETES, MODBUS_GET_HOLDINGS,
    MODBUS_GET_INPUTS, MODBUS_GET_SET_HOLDINGS_BULK, MODBUS_REPORT_SLAVE_ID, MODBUS_SET_COIL,
    MODBUS_SET_COILS_BULK, MODBUS_SET_HOLDING, MODBUS_SET_HOLDINGS_BULK,
};
use crate::decode::{self, Decoder};
use crate::handler::ResponseHandler;
use crate::request::ModbusRequest;
use crate::{ErrorKind, Exception};

pub const MAX_FUNCTION_HANDLERS: usize = 16;

/// Registry entry. Function code 0 marks the end of the active entries.
#[derive(Clone, Copy)]
pub struct FunctionHandler {
    pub code: u8,
    pub decoder: Decoder,
}

impl FunctionHandler {
    const SENTINEL: FunctionHandler = FunctionHandler {
        code: 0,
        decoder: unhandled,
    };

    pub const fn new(code: u8, decoder: Decoder) -> Self {
        Self { code, decoder }
    }

    #[inline]
    pub fn is_sentinel(&self) -> bool {
        self.code == 0
    }
}

impl core::fmt::Debug for FunctionHandler {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FunctionHandler")
            .field("code", &self.code)
            .finish_non_exhaustive()
    }
}

fn unhandled(
    _frame: &[u8],
    _request: &ModbusRequest,
    _handler: &mut dyn ResponseHandler,
) -> Exception {
    Exception::IllegalFunction
}

/// Maps response function codes to decoders
///
/// Fixed capacity, ordered, first match wins. The scan stops at the first sentinel (code 0)
/// entry, so anything stored after it is never dispatched.
#[derive(Debug, Clone)]
pub struct FunctionRegistry {
    entries: [FunctionHandler; MAX_FUNCTION_HANDLERS],
}

impl Default for FunctionRegistry {
    /// All decoders this crate provides
    fn default() -> Self {
        let mut registry = Self::new();
        registry.entries[..10].copy_from_slice(&[
            FunctionHandler::new(MODBUS_REPORT_SLAVE_ID, decode::report_slave_id_response),
            FunctionHandler::new(MODBUS_GET_INPUTS, decode::read_input_registers_response),
            FunctionHandler::new(MODBUS_GET_HOLDINGS, decode::read_holding_registers_response),
            FunctionHandler::new(
                MODBUS_SET_HOLDINGS_BULK,
                decode::write_multiple_registers_response,
            ),
            FunctionHandler::new(MODBUS_SET_HOLDING, decode::write_register_response),
            FunctionHandler::new(
                MODBUS_GET_SET_HOLDINGS_BULK,
                decode::read_write_registers_response,
            ),
            FunctionHandler::new(MODBUS_GET_COILS, decode::read_coils_response),
            FunctionHandler::new(MODBUS_SET_COIL, decode::write_coil_response),
            FunctionHandler::new(MODBUS_SET_COILS_BULK, decode::write_multiple_coils_response),
            FunctionHandler::new(MODBUS_GET_DISCRETES, decode::read_discrete_inputs_response),
        ]);
        registry
    }
}

impl FunctionRegistry {
    /// Empty registry
    pub const fn new() -> Self {
        Self {
            entries: [FunctionHandler::SENTINEL; MAX_FUNCTION_HANDLERS],
        }
    }

    /// Raw table, copied as is (sentinels included). Entries past the capacity are ignored.
    pub fn from_entries(entries: &[FunctionHandler]) -> Self {
        let mut registry = Self::new();
        for (slot, entry) in registry.entries.iter_mut().zip(entries) {
            *slot = *entry;
        }
        registry
    }

    /// Register or replace the decoder for `code`
    ///
    /// Code 0 is reserved for the sentinel and codes with the exception bit set are never
    /// looked up, both are rejected with `InvalidArgument`. `OOB` if the table is full.
    pub fn register(&mut self, code: u8, decoder: Decoder) -> Result<(), ErrorKind> {
        if code == 0 || code & MODBUS_ERROR_BIT != 0 {
            return Err(ErrorKind::InvalidArgument);
        }
        for entry in &mut self.entries {
            if entry.is_sentinel() || entry.code == code {
                *entry = FunctionHandler::new(code, decoder);
                return Ok(());
            }
        }
        Err(ErrorKind::OOB)
    }

    /// Linear scan, first match wins, stops at the first sentinel
    pub fn lookup(&self, code: u8) -> Option<Decoder> {
        if code == 0 {
            return None;
        }
        self.entries
            .iter()
            .take_while(|entry| !entry.is_sentinel())
            .find(|entry| entry.code == code)
            .map(|entry| entry.decoder)
    }

    /// Run the decoder for the frame's function code
    ///
    /// The exception bit is masked off for the lookup, so exception responses reach the decoder
    /// of the function they answer. `IllegalFunction` if nothing matches.
    pub fn dispatch(
        &self,
        frame: &[u8],
        request: &ModbusRequest,
        handler: &mut dyn ResponseHandler,
    ) -> Exception {
        let Some(&func) = frame.first() else {
            return Exception::IllegalFunction;
        };
        match self.lookup(func & !MODBUS_ERROR_BIT) {
            Some(decoder) => decoder(frame, request, handler),
            None => Exception::IllegalFunction,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &FunctionHandler> {
        self.entries.iter().take_while(|entry| !entry.is_sentinel())
    }
}
