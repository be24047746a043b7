//! Protocol events bridging transport I/O to the poll loop

/// Default capacity of [`EventBuf`]
pub const EVENT_QUEUE_SIZE: usize = 8;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// transport finished its startup and can accept requests
    Ready,
    /// a complete frame is buffered and can be fetched with `receive`
    FrameReceived,
    /// the last request has left the transmitter
    FrameSent,
}

/// Posting side of the event queue, handed to the transport
pub trait EventSink {
    /// Returns false if the event was dropped (queue full)
    fn post(&mut self, event: Event) -> bool;
}

/// Consuming side of the event queue, owned by the engine
///
/// Events are FIFO. Overflow handling is up to the implementation.
pub trait EventQueue: EventSink {
    /// Create or clear the queue, called by `init`
    fn init(&mut self) -> bool;
    /// Take the next event without blocking
    fn get(&mut self) -> Option<Event>;
    /// Take the next event, blocking if the platform can. Used by the enable handshake.
    fn wait(&mut self) -> Option<Event> {
        self.get()
    }
}

/// Fixed-capacity queue, usable without an allocator
pub type EventBuf = heapless::Deque<Event, EVENT_QUEUE_SIZE>;

impl<const N: usize> EventSink for heapless::Deque<Event, N> {
    fn post(&mut self, event: Event) -> bool {
        self.push_back(event).is_ok()
    }
}

impl<const N: usize> EventQueue for heapless::Deque<Event, N> {
    fn init(&mut self) -> bool {
        self.clear();
        true
    }
    fn get(&mut self) -> Option<Event> {
        self.pop_front()
    }
}

#[cfg(feature = "std")]
impl EventSink for std::collections::VecDeque<Event> {
    fn post(&mut self, event: Event) -> bool {
        self.push_back(event);
        true
    }
}

#[cfg(feature = "std")]
impl EventQueue for std::collections::VecDeque<Event> {
    fn init(&mut self) -> bool {
        self.clear();
        true
    }
    fn get(&mut self) -> Option<Event> {
        self.pop_front()
    }
}
