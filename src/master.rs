use fixedvec::FixedVec;
use log::{debug, trace, warn};

use crate::config::PortConfig;
use crate::consts::{MODBUS_ERROR_BIT, MODBUS_TCP_PSEUDO_ADDRESS};
use crate::event::{Event, EventQueue};
use crate::handler::ResponseHandler;
use crate::registry::FunctionRegistry;
use crate::request::ModbusRequest;
use crate::transport::Transport;
use crate::{ErrorKind, ModbusProto};

/// Protocol state
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    NotInitialized,
    Disabled,
    Enabled,
}

/// Modbus master protocol engine
///
/// Owns the transport, the event queue, the function registry and the application handler.
/// There are no internal threads: the host calls [`poll`](Self::poll) (or a request method, which
/// polls once by itself) and forwards its interrupt / timer hooks to
/// [`on_byte_received`](Self::on_byte_received) and friends.
///
/// Only one request may be in flight. The current target and the last request are overwritten
/// by every request method, so a response arriving after a second request is attributed to the
/// second one. Hosts sharing the engine between execution contexts must wrap it in their own
/// lock.
///
/// ```no_run
/// use mbmaster::{master::ModbusMaster, config::SerialConfig, event::EventBuf, ModbusProto};
/// # use mbmaster::{transport::Transport, event::EventSink, config::PortConfig, ErrorKind};
/// # struct Port;
/// # impl Transport for Port {
/// #     fn init(&mut self, _: ModbusProto, _: &PortConfig) -> Result<(), ErrorKind> { Ok(()) }
/// #     fn start(&mut self, _: &mut dyn EventSink) {}
/// #     fn stop(&mut self) {}
/// #     fn buffer(&mut self) -> Option<&mut [u8]> { None }
/// #     fn send(&mut self, _: u8, _: usize) -> Result<(), ErrorKind> { Ok(()) }
/// #     fn receive(&mut self) -> Result<(u8, &[u8]), ErrorKind> { Err(ErrorKind::IOError) }
/// #     fn wait_idle(&mut self, _: &mut dyn EventSink) -> bool { true }
/// # }
/// # fn code() -> Result<(), ErrorKind> {
/// let mut master = ModbusMaster::new(Port, EventBuf::new(), ());
/// master.init(ModbusProto::Ascii, &SerialConfig::default().into())?;
/// master.enable()?;
/// loop {
///     if master.read_input_registers(0x0A, 1000, 4).is_err() {
///         continue;
///     }
///     master.poll()?;
/// }
/// # }
/// ```
pub struct ModbusMaster<T: Transport, Q: EventQueue, H: ResponseHandler> {
    state: State,
    mode: Option<ModbusProto>,
    /// address the next response must come from
    target: u8,
    request: ModbusRequest,
    transport: T,
    events: Q,
    registry: FunctionRegistry,
    handler: H,
}

impl<T: Transport, Q: EventQueue, H: ResponseHandler> ModbusMaster<T, Q, H> {
    /// Create an engine with the default function registry
    pub fn new(transport: T, events: Q, handler: H) -> Self {
        Self::with_registry(transport, events, handler, FunctionRegistry::default())
    }

    pub fn with_registry(transport: T, events: Q, handler: H, registry: FunctionRegistry) -> Self {
        Self {
            state: State::NotInitialized,
            mode: None,
            target: 0,
            request: ModbusRequest::default(),
            transport,
            events,
            registry,
            handler,
        }
    }

    /// Bind the transport to `mode` and move to `Disabled`
    ///
    /// Allowed from `NotInitialized` and `Disabled` (to change the mode). On error the state is
    /// left as it was.
    pub fn init(&mut self, mode: ModbusProto, config: &PortConfig) -> Result<(), ErrorKind> {
        if self.state == State::Enabled {
            return Err(ErrorKind::IllegalState);
        }
        if !mode.is_supported() {
            warn!("modbus mode {:?} is not compiled in", mode);
            return Err(ErrorKind::InvalidArgument);
        }
        if !config.fits(mode) {
            warn!("port config {:?} does not fit mode {:?}", config, mode);
            return Err(ErrorKind::InvalidArgument);
        }
        self.transport.init(mode, config)?;
        if !self.events.init() {
            return Err(ErrorKind::PortError);
        }
        self.target = if mode == ModbusProto::Tcp {
            MODBUS_TCP_PSEUDO_ADDRESS
        } else {
            0
        };
        self.request = ModbusRequest::default();
        self.mode = Some(mode);
        self.state = State::Disabled;
        debug!("modbus master initialized, mode {:?}", mode);
        Ok(())
    }

    /// Start the transport and wait for its `Ready` event
    pub fn enable(&mut self) -> Result<(), ErrorKind> {
        if self.state != State::Disabled {
            return Err(ErrorKind::IllegalState);
        }
        self.transport.start(&mut self.events);
        match self.events.wait() {
            Some(Event::Ready) => {
                self.state = State::Enabled;
                debug!("modbus master enabled");
                Ok(())
            }
            other => {
                warn!("transport start failed, got {:?} instead of Ready", other);
                self.transport.stop();
                Err(ErrorKind::IllegalState)
            }
        }
    }

    pub fn disable(&mut self) -> Result<(), ErrorKind> {
        match self.state {
            State::Enabled => {
                self.transport.stop();
                self.state = State::Disabled;
                debug!("modbus master disabled");
                Ok(())
            }
            State::Disabled => Ok(()),
            State::NotInitialized => Err(ErrorKind::IllegalState),
        }
    }

    /// Close the transport and release the mode binding. Only valid while `Disabled`.
    pub fn close(&mut self) -> Result<(), ErrorKind> {
        if self.state != State::Disabled {
            return Err(ErrorKind::IllegalState);
        }
        self.transport.close();
        self.mode = None;
        self.state = State::NotInitialized;
        debug!("modbus master closed");
        Ok(())
    }

    /// Handle at most one pending event
    ///
    /// Returns immediately if the queue is empty. A received frame from the current target is
    /// dispatched to its decoder; a decoder exception is reported to
    /// [`ResponseHandler::on_exception`] and surfaces here only as `IOError`. Errors of
    /// `receive` are returned unchanged.
    pub fn poll(&mut self) -> Result<(), ErrorKind> {
        if self.state != State::Enabled {
            return Err(ErrorKind::IllegalState);
        }
        let Some(event) = self.events.get() else {
            return Ok(());
        };
        match event {
            Event::Ready | Event::FrameSent => Ok(()),
            Event::FrameReceived => {
                let (address, frame) = self.transport.receive()?;
                trace!("frame from {}: {:02X?}", address, frame);
                if address != self.target {
                    debug!("dropping frame from {}, target {}", address, self.target);
                    return Ok(());
                }
                let exception = self
                    .registry
                    .dispatch(frame, &self.request, &mut self.handler);
                if exception.is_none() {
                    return Ok(());
                }
                let func = frame.first().map_or(0, |f| f & !MODBUS_ERROR_BIT);
                warn!("slave {} function {:02X}: {}", address, func, exception);
                self.handler.on_exception(address, func, exception);
                Err(ErrorKind::IOError)
            }
        }
    }

    /// Read input registers (function 0x04), one-based `start` in `1..=10000`
    pub fn read_input_registers(
        &mut self,
        slave: u8,
        start: u16,
        count: u16,
    ) -> Result<(), ErrorKind> {
        self.exchange(slave, |req, pdu| req.generate_get_inputs(start, count, pdu))
    }

    /// Read holding registers (function 0x03), one-based `start` in `1..=10000`
    pub fn read_holding_registers(
        &mut self,
        slave: u8,
        start: u16,
        count: u16,
    ) -> Result<(), ErrorKind> {
        self.exchange(slave, |req, pdu| {
            req.generate_get_holdings(start, count, pdu)
        })
    }

    pub fn read_coils(&mut self, slave: u8, start: u16, count: u16) -> Result<(), ErrorKind> {
        self.exchange(slave, |req, pdu| req.generate_get_coils(start, count, pdu))
    }

    pub fn read_discrete_inputs(
        &mut self,
        slave: u8,
        start: u16,
        count: u16,
    ) -> Result<(), ErrorKind> {
        self.exchange(slave, |req, pdu| {
            req.generate_get_discretes(start, count, pdu)
        })
    }

    /// Write a single holding register (function 0x06)
    pub fn write_register(&mut self, slave: u8, address: u16, value: u16) -> Result<(), ErrorKind> {
        self.exchange(slave, |req, pdu| {
            req.generate_set_holding(address, value, pdu)
        })
    }

    /// Write consecutive holding registers (function 0x10), up to 123 values
    pub fn write_multiple_registers(
        &mut self,
        slave: u8,
        start: u16,
        values: &[u16],
    ) -> Result<(), ErrorKind> {
        self.exchange(slave, |req, pdu| {
            req.generate_set_holdings_bulk(start, values, pdu)
        })
    }

    pub fn write_coil(&mut self, slave: u8, address: u16, value: bool) -> Result<(), ErrorKind> {
        self.exchange(slave, |req, pdu| req.generate_set_coil(address, value, pdu))
    }

    /// Write consecutive coils (function 0x0F), up to 1968 values
    pub fn write_multiple_coils(
        &mut self,
        slave: u8,
        start: u16,
        values: &[bool],
    ) -> Result<(), ErrorKind> {
        self.exchange(slave, |req, pdu| {
            req.generate_set_coils_bulk(start, values, pdu)
        })
    }

    /// Read/write multiple registers (function 0x17)
    ///
    /// The slave writes `values` from `write_start` first, then the `read_count` registers read
    /// from `read_start` are reported through
    /// [`ResponseHandler::on_holding_registers`].
    pub fn read_write_multiple_registers(
        &mut self,
        slave: u8,
        read_start: u16,
        read_count: u16,
        write_start: u16,
        values: &[u16],
    ) -> Result<(), ErrorKind> {
        self.exchange(slave, |req, pdu| {
            req.generate_get_set_holdings_bulk(read_start, read_count, write_start, values, pdu)
        })
    }

    /// Report slave id (function 0x11), the payload goes to [`ResponseHandler::on_slave_id`]
    pub fn report_slave_id(&mut self, slave: u8) -> Result<(), ErrorKind> {
        self.exchange(slave, |req, pdu| req.generate_report_slave_id(pdu))
    }

    /// Encode a request into the transport buffer, send it, wait for the line and poll once
    fn exchange<F>(&mut self, slave: u8, generate: F) -> Result<(), ErrorKind>
    where
        F: FnOnce(&mut ModbusRequest, &mut FixedVec<'_, u8>) -> Result<(), ErrorKind>,
    {
        if self.state != State::Enabled {
            return Err(ErrorKind::IllegalState);
        }
        let mut request = ModbusRequest::new(slave);
        let len = {
            let buf = self.transport.buffer().ok_or(ErrorKind::IllegalState)?;
            let mut pdu = FixedVec::new(buf);
            generate(&mut request, &mut pdu)?;
            trace!("request to {}: {:02X?}", slave, pdu.as_slice());
            pdu.len()
        };
        self.target = slave;
        self.request = request;
        if let Err(e) = self.transport.send(slave, len) {
            warn!("sending to slave {} failed: {}", slave, e);
            return Err(ErrorKind::IOError);
        }
        if !self.transport.wait_idle(&mut self.events) {
            warn!("no response from slave {}", slave);
            return Err(ErrorKind::IOError);
        }
        self.poll()
    }

    /// Byte-received hook for the host's serial interrupt or reader
    pub fn on_byte_received(&mut self) -> bool {
        self.transport.byte_received(&mut self.events)
    }

    /// Transmitter-empty hook
    pub fn on_transmitter_empty(&mut self) -> bool {
        self.transport.transmitter_empty(&mut self.events)
    }

    /// Timer-expired hook
    pub fn on_timer_expired(&mut self) -> bool {
        self.transport.timer_expired(&mut self.events)
    }

    #[inline]
    pub fn state(&self) -> State {
        self.state
    }

    /// Mode bound by the last successful `init`
    #[inline]
    pub fn mode(&self) -> Option<ModbusProto> {
        self.mode
    }

    /// Address responses are currently accepted from
    #[inline]
    pub fn target(&self) -> u8 {
        self.target
    }

    /// The last request sent
    #[inline]
    pub fn last_request(&self) -> &ModbusRequest {
        &self.request
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    pub fn registry_mut(&mut self) -> &mut FunctionRegistry {
        &mut self.registry
    }

    pub fn into_parts(self) -> (T, Q, H) {
        (self.transport, self.events, self.handler)
    }
}
