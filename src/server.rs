//! Receive/respond loop on top of an abstract transport.

use core::fmt;

use embassy_time::Instant;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::dispatcher::Dispatcher;
use crate::protocol::{Message, Reply};
use crate::state::BulbStateStore;

/// Transport failure classes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// Temporary condition, the receive loop keeps going
    Transient,
    /// The transport is unusable, the loop stops
    Fatal,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transient => f.write_str("transient transport error"),
            Self::Fatal => f.write_str("fatal transport error"),
        }
    }
}

/// A decoded message together with where it came from
#[derive(Debug, Clone)]
pub struct Datagram<A, R> {
    pub source: A,
    /// Transport specific view of the original request (header, sequence...)
    pub request: R,
    pub message: Message,
    /// Bytes read from the wire
    pub size: usize,
}

/// Abstract LIFX transport
///
/// Implement this trait on top of a UDP socket and a protocol codec.
pub trait Transport {
    type Address;
    type Request;

    /// Wait for the next message
    fn receive(&mut self) -> Result<Datagram<Self::Address, Self::Request>, TransportError>;

    /// Send `reply` to `source` in response to `request`
    ///
    /// When `reply.always` is false the transport only answers if the
    /// requester asked for a response. Returns the number of bytes sent.
    fn respond(
        &mut self,
        source: &Self::Address,
        request: &Self::Request,
        reply: &Reply,
    ) -> Result<usize, TransportError>;
}

/// Serves bulb messages over a [`Transport`]
#[derive(Clone, Copy)]
pub struct Server<'a, const QUEUE_SIZE: usize> {
    dispatcher: Dispatcher<'a, QUEUE_SIZE>,
    store: &'a BulbStateStore,
}

impl<'a, const QUEUE_SIZE: usize> Server<'a, QUEUE_SIZE> {
    pub const fn new(dispatcher: Dispatcher<'a, QUEUE_SIZE>, store: &'a BulbStateStore) -> Self {
        Self { dispatcher, store }
    }

    /// Receive and answer a single message
    ///
    /// Transient failures are swallowed so the caller simply polls again.
    /// Only [`TransportError::Fatal`] is returned.
    pub fn poll<T: Transport>(&self, transport: &mut T, now: Instant) -> Result<(), TransportError> {
        let datagram = match transport.receive() {
            Ok(datagram) => datagram,
            Err(TransportError::Transient) => {
                #[cfg(feature = "esp32-log")]
                println!("[Server.poll] transient receive error, retrying");
                return Ok(());
            }
            Err(TransportError::Fatal) => return Err(TransportError::Fatal),
        };
        self.store.record_traffic(datagram.size, 0);

        let reply = match self.dispatcher.handle(&datagram.message, now) {
            Ok(Some(reply)) => reply,
            Ok(None) => return Ok(()),
            Err(_error) => {
                #[cfg(feature = "esp32-log")]
                println!("[Server.poll] {}", _error);
                return Ok(());
            }
        };

        match transport.respond(&datagram.source, &datagram.request, &reply) {
            Ok(sent) => {
                self.store.record_traffic(0, sent);
                Ok(())
            }
            Err(TransportError::Transient) => {
                #[cfg(feature = "esp32-log")]
                println!("[Server.poll] transient respond error, reply dropped");
                Ok(())
            }
            Err(TransportError::Fatal) => Err(TransportError::Fatal),
        }
    }

    /// Serve until the transport fails fatally
    pub fn serve<T: Transport>(&self, transport: &mut T) -> TransportError {
        loop {
            if let Err(error) = self.poll(transport, Instant::now()) {
                return error;
            }
        }
    }
}
