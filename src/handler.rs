use crate::Exception;

/// Application callbacks for decoded responses
///
/// Called synchronously from [`poll`](crate::master::ModbusMaster::poll) or the request method
/// that drove it, so implementations must not block. All methods default to no-ops.
///
/// Addresses are one-based, as passed to the request methods.
pub trait ResponseHandler {
    fn on_input_registers(&mut self, _values: &[u16]) {}

    fn on_holding_registers(&mut self, _values: &[u16]) {}

    fn on_coils(&mut self, _values: &[bool]) {}

    fn on_discrete_inputs(&mut self, _values: &[bool]) {}

    fn on_register_written(&mut self, _address: u16, _value: u16) {}

    fn on_registers_written(&mut self, _address: u16, _count: u16) {}

    fn on_coil_written(&mut self, _address: u16, _value: bool) {}

    fn on_coils_written(&mut self, _address: u16, _count: u16) {}

    /// Raw report slave id payload (id, run indicator, device data)
    fn on_slave_id(&mut self, _data: &[u8]) {}

    /// The only place the detail behind an `IOError` from `poll` is visible
    fn on_exception(&mut self, _slave: u8, _func: u8, _exception: Exception) {}
}

/// Ignores every response
impl ResponseHandler for () {}

impl<H: ResponseHandler + ?Sized> ResponseHandler for &mut H {
    fn on_input_registers(&mut self, values: &[u16]) {
        (**self).on_input_registers(values);
    }
    fn on_holding_registers(&mut self, values: &[u16]) {
        (**self).on_holding_registers(values);
    }
    fn on_coils(&mut self, values: &[bool]) {
        (**self).on_coils(values);
    }
    fn on_discrete_inputs(&mut self, values: &[bool]) {
        (**self).on_discrete_inputs(values);
    }
    fn on_register_written(&mut self, address: u16, value: u16) {
        (**self).on_register_written(address, value);
    }
    fn on_registers_written(&mut self, address: u16, count: u16) {
        (**self).on_registers_written(address, count);
    }
    fn on_coil_written(&mut self, address: u16, value: bool) {
        (**self).on_coil_written(address, value);
    }
    fn on_coils_written(&mut self, address: u16, count: u16) {
        (**self).on_coils_written(address, count);
    }
    fn on_slave_id(&mut self, data: &[u8]) {
        (**self).on_slave_id(data);
    }
    fn on_exception(&mut self, slave: u8, func: u8, exception: Exception) {
        (**self).on_exception(slave, func, exception);
    }
}
