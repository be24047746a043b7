use crate::consts::{
    MODBUS_GET_COILS, MODBUS_GET_DISCRETES, MODBUS_GET_HOLDINGS, MODBUS_GET_INPUTS,
    MODBUS_GET_SET_HOLDINGS_BULK, MODBUS_MAX_ADDRESS, MODBUS_MAX_READ_BITS,
    MODBUS_MAX_READ_REGISTERS, MODBUS_MAX_READ_WRITE_REGISTERS, MODBUS_MAX_WRITE_BITS,
    MODBUS_MAX_WRITE_REGISTERS, MODBUS_PDU_MAX_SIZE, MODBUS_REPORT_SLAVE_ID, MODBUS_SET_COIL,
    MODBUS_SET_COILS_BULK, MODBUS_SET_HOLDING, MODBUS_SET_HOLDINGS_BULK,
};
use crate::{ErrorKind, VectorTrait};

/// Modbus request PDU generator
///
/// Addresses passed to the `generate_*` methods are one-based (`1..=10000`); the PDU carries
/// `address - 1`. Arguments are validated before anything is written: an `InvalidArgument` error
/// leaves both the object and the output untouched. An `OOB` error (output too small) comes after
/// validation and may leave both partly written.
///
/// The master keeps the last generated request: the response decoders use it to size bit-packed
/// payloads and to check write echoes.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ModbusRequest {
    pub slave: u8,
    pub func: u8,
    /// zero-based register / coil address on the wire
    pub reg: u16,
    pub count: u16,
    /// value of a single write, as sent (0xFF00 / 0x0000 for coils)
    pub value: u16,
    /// zero-based write address of a read/write multiple registers request
    pub write_reg: u16,
    pub write_count: u16,
}

fn wire_address(address: u16) -> Result<u16, ErrorKind> {
    if address == 0 || address > MODBUS_MAX_ADDRESS {
        return Err(ErrorKind::InvalidArgument);
    }
    Ok(address - 1)
}

fn check_count(count: usize, max: u16) -> Result<u16, ErrorKind> {
    if count == 0 || count > max as usize {
        return Err(ErrorKind::InvalidArgument);
    }
    #[allow(clippy::cast_possible_truncation)]
    Ok(count as u16)
}

impl ModbusRequest {
    pub fn new(slave: u8) -> Self {
        Self {
            slave,
            ..Self::default()
        }
    }

    /// One-based start address, as given by the caller
    #[inline]
    pub fn address(&self) -> u16 {
        self.reg.saturating_add(1)
    }

    pub fn generate_get_coils<V: VectorTrait<u8>>(
        &mut self,
        address: u16,
        count: u16,
        request: &mut V,
    ) -> Result<(), ErrorKind> {
        self.generate_read(
            MODBUS_GET_COILS,
            address,
            count,
            MODBUS_MAX_READ_BITS,
            request,
        )
    }

    pub fn generate_get_discretes<V: VectorTrait<u8>>(
        &mut self,
        address: u16,
        count: u16,
        request: &mut V,
    ) -> Result<(), ErrorKind> {
        self.generate_read(
            MODBUS_GET_DISCRETES,
            address,
            count,
            MODBUS_MAX_READ_BITS,
            request,
        )
    }

    pub fn generate_get_holdings<V: VectorTrait<u8>>(
        &mut self,
        address: u16,
        count: u16,
        request: &mut V,
    ) -> Result<(), ErrorKind> {
        self.generate_read(
            MODBUS_GET_HOLDINGS,
            address,
            count,
            MODBUS_MAX_READ_REGISTERS,
            request,
        )
    }

    pub fn generate_get_inputs<V: VectorTrait<u8>>(
        &mut self,
        address: u16,
        count: u16,
        request: &mut V,
    ) -> Result<(), ErrorKind> {
        self.generate_read(
            MODBUS_GET_INPUTS,
            address,
            count,
            MODBUS_MAX_READ_REGISTERS,
            request,
        )
    }

    pub fn generate_set_coil<V: VectorTrait<u8>>(
        &mut self,
        address: u16,
        value: bool,
        request: &mut V,
    ) -> Result<(), ErrorKind> {
        let reg = wire_address(address)?;
        let value: u16 = if value { 0xff00 } else { 0x0000 };
        self.set(MODBUS_SET_COIL, reg, 1, value);
        self.generate(&value.to_be_bytes(), request)
    }

    pub fn generate_set_holding<V: VectorTrait<u8>>(
        &mut self,
        address: u16,
        value: u16,
        request: &mut V,
    ) -> Result<(), ErrorKind> {
        let reg = wire_address(address)?;
        self.set(MODBUS_SET_HOLDING, reg, 1, value);
        self.generate(&value.to_be_bytes(), request)
    }

    pub fn generate_set_holdings_bulk<V: VectorTrait<u8>>(
        &mut self,
        address: u16,
        values: &[u16],
        request: &mut V,
    ) -> Result<(), ErrorKind> {
        let reg = wire_address(address)?;
        let count = check_count(values.len(), MODBUS_MAX_WRITE_REGISTERS)?;
        let mut data = [0u8; MODBUS_PDU_MAX_SIZE];
        for (chunk, v) in data.chunks_exact_mut(2).zip(values) {
            chunk.copy_from_slice(&v.to_be_bytes());
        }
        self.set(MODBUS_SET_HOLDINGS_BULK, reg, count, 0);
        self.generate(&data[..values.len() * 2], request)
    }

    pub fn generate_set_coils_bulk<V: VectorTrait<u8>>(
        &mut self,
        address: u16,
        values: &[bool],
        request: &mut V,
    ) -> Result<(), ErrorKind> {
        let reg = wire_address(address)?;
        let count = check_count(values.len(), MODBUS_MAX_WRITE_BITS)?;
        let mut data = [0u8; MODBUS_PDU_MAX_SIZE];
        for (i, v) in values.iter().enumerate() {
            if *v {
                data[i >> 3] |= 1 << (i & 7);
            }
        }
        self.set(MODBUS_SET_COILS_BULK, reg, count, 0);
        self.generate(&data[..(values.len() + 7) / 8], request)
    }

    pub fn generate_report_slave_id<V: VectorTrait<u8>>(
        &mut self,
        request: &mut V,
    ) -> Result<(), ErrorKind> {
        self.set(MODBUS_REPORT_SLAVE_ID, 0, 0, 0);
        self.generate(&[], request)
    }

    /// Read/write multiple registers (function 0x17), the write is performed before the read
    pub fn generate_get_set_holdings_bulk<V: VectorTrait<u8>>(
        &mut self,
        read_address: u16,
        read_count: u16,
        write_address: u16,
        values: &[u16],
        request: &mut V,
    ) -> Result<(), ErrorKind> {
        let reg = wire_address(read_address)?;
        let count = check_count(usize::from(read_count), MODBUS_MAX_READ_REGISTERS)?;
        let write_reg = wire_address(write_address)?;
        let write_count = check_count(values.len(), MODBUS_MAX_READ_WRITE_REGISTERS)?;
        let mut data = [0u8; MODBUS_PDU_MAX_SIZE];
        for (chunk, v) in data.chunks_exact_mut(2).zip(values) {
            chunk.copy_from_slice(&v.to_be_bytes());
        }
        self.set(MODBUS_GET_SET_HOLDINGS_BULK, reg, count, 0);
        self.write_reg = write_reg;
        self.write_count = write_count;
        self.generate(&data[..values.len() * 2], request)
    }

    fn generate_read<V: VectorTrait<u8>>(
        &mut self,
        func: u8,
        address: u16,
        count: u16,
        max: u16,
        request: &mut V,
    ) -> Result<(), ErrorKind> {
        let reg = wire_address(address)?;
        let count = check_count(usize::from(count), max)?;
        self.set(func, reg, count, 0);
        self.generate(&[], request)
    }

    fn set(&mut self, func: u8, reg: u16, count: u16, value: u16) {
        self.func = func;
        self.reg = reg;
        self.count = count;
        self.value = value;
        self.write_reg = 0;
        self.write_count = 0;
    }

    /// Write the PDU: function code, address, then function-specific fields
    fn generate<V: VectorTrait<u8>>(&self, data: &[u8], request: &mut V) -> Result<(), ErrorKind> {
        request.clear();
        request.push(self.func)?;
        if self.func == MODBUS_REPORT_SLAVE_ID {
            return Ok(());
        }
        request.extend(&self.reg.to_be_bytes())?;
        match self.func {
            MODBUS_GET_COILS | MODBUS_GET_DISCRETES | MODBUS_GET_HOLDINGS | MODBUS_GET_INPUTS => {
                request.extend(&self.count.to_be_bytes())
            }
            MODBUS_SET_COIL | MODBUS_SET_HOLDING => request.extend(data),
            MODBUS_SET_COILS_BULK | MODBUS_SET_HOLDINGS_BULK => {
                request.extend(&self.count.to_be_bytes())?;
                let l = u8::try_from(data.len()).map_err(|_| ErrorKind::OOB)?;
                request.push(l)?;
                request.extend(data)
            }
            MODBUS_GET_SET_HOLDINGS_BULK => {
                request.extend(&self.count.to_be_bytes())?;
                request.extend(&self.write_reg.to_be_bytes())?;
                request.extend(&self.write_count.to_be_bytes())?;
                let l = u8::try_from(data.len()).map_err(|_| ErrorKind::OOB)?;
                request.push(l)?;
                request.extend(data)
            }
            _ => Err(ErrorKind::InvalidArgument),
        }
    }
}
