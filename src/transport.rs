use crate::config::PortConfig;
use crate::event::EventSink;
use crate::{ErrorKind, ModbusProto};

/// Transport binding used by [`ModbusMaster`](crate::master::ModbusMaster)
///
/// A transport owns the byte-level framing of one or more modes (checksums, character timeouts,
/// MBAP headers, see [`adu`](crate::adu) for helpers) and the PDU buffer. The engine never touches
/// the wire directly: it asks for the buffer, writes a PDU into it and calls [`send`](Self::send).
///
/// Methods receiving an [`EventSink`] report progress by posting events:
///
/// * [`Event::Ready`](crate::event::Event::Ready) once after [`start`](Self::start)
/// * [`Event::FrameSent`](crate::event::Event::FrameSent) when the request left the line
/// * [`Event::FrameReceived`](crate::event::Event::FrameReceived) when a full response is framed
pub trait Transport {
    /// Mode-specific setup. Errors are returned to the `init` caller unchanged.
    fn init(&mut self, proto: ModbusProto, config: &PortConfig) -> Result<(), ErrorKind>;

    fn start(&mut self, events: &mut dyn EventSink);

    fn stop(&mut self);

    /// Release the port. Optional.
    fn close(&mut self) {}

    /// PDU buffer for the next request, `None` while a previous exchange is still using it
    fn buffer(&mut self) -> Option<&mut [u8]>;

    /// Frame and transmit the first `len` bytes of [`buffer`](Self::buffer) to `slave`
    fn send(&mut self, slave: u8, len: usize) -> Result<(), ErrorKind>;

    /// Fetch the frame announced by `FrameReceived`: source address and PDU
    fn receive(&mut self) -> Result<(u8, &[u8]), ErrorKind>;

    /// Block until the line is idle after a request, driving the receive state machine. Returns
    /// false on a transport-level failure.
    fn wait_idle(&mut self, events: &mut dyn EventSink) -> bool;

    /// Character received (interrupt / reader hook)
    fn byte_received(&mut self, _events: &mut dyn EventSink) -> bool {
        false
    }

    /// Transmitter ready for the next character
    fn transmitter_empty(&mut self, _events: &mut dyn EventSink) -> bool {
        false
    }

    /// Character-timeout / frame timer expired
    fn timer_expired(&mut self, _events: &mut dyn EventSink) -> bool {
        false
    }
}
