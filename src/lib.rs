#![no_std]

pub mod action_queue;
pub mod bulb;
pub mod color;
pub mod config;
pub mod dispatcher;
pub mod engine;
pub mod frame_scheduler;
pub mod protocol;
pub mod server;
pub mod state;
pub mod transition;

pub use action_queue::{ActionQueue, ActionReceiver, ActionSender, TransitionRequest};
pub use bulb::BulbContext;
pub use config::{BulbConfig, POWER_OFF, POWER_ON};
pub use dispatcher::{DispatchError, Dispatcher};
pub use engine::TransitionEngine;
pub use frame_scheduler::{FrameResult, FrameScheduler};
pub use protocol::{Label, Message, MessageKind, Payload, Reply};
pub use server::{Datagram, Server, Transport, TransportError};
pub use state::{BulbState, BulbStateStore};
pub use transition::{ActiveTransition, ChannelRamp};

pub use color::{Hsbk, Rgb};
pub use embassy_time::{Duration, Instant};

/// Abstract light output trait
///
/// Implement this trait to drive the physical light (PWM, GPIO, LED strip).
/// The transition engine is generic over this trait.
pub trait OutputDriver {
    type Error;

    /// Show a single color
    fn write(&mut self, color: Rgb) -> Result<(), Self::Error>;
}
