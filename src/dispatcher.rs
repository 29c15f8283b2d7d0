//! Protocol dispatcher
//!
//! Maps decoded messages to handlers. Handlers read and write the state
//! store, queue transitions for the engine and build the reply.

use core::fmt;

use embassy_time::Instant;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::action_queue::{ActionSender, TransitionRequest};
use crate::protocol::{Message, MessageKind, Payload, Reply, SERVICE_UDP};
use crate::state::BulbStateStore;

/// Errors raised while dispatching a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchError {
    /// The payload does not match the declared message kind
    MalformedPayload(MessageKind),
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedPayload(kind) => {
                write!(f, "malformed payload for message type {}", kind.as_raw())
            }
        }
    }
}

/// Stateless message handler bound to a bulb
#[derive(Clone, Copy)]
pub struct Dispatcher<'a, const QUEUE_SIZE: usize> {
    store: &'a BulbStateStore,
    actions: ActionSender<'a, QUEUE_SIZE>,
}

impl<'a, const QUEUE_SIZE: usize> Dispatcher<'a, QUEUE_SIZE> {
    pub const fn new(store: &'a BulbStateStore, actions: ActionSender<'a, QUEUE_SIZE>) -> Self {
        Self { store, actions }
    }

    /// Handle a decoded message received at `now`
    ///
    /// Returns `Ok(None)` for message kinds the bulb does not answer.
    /// A payload that does not fit its kind is rejected before anything is
    /// mutated.
    pub fn handle(&self, message: &Message, now: Instant) -> Result<Option<Reply>, DispatchError> {
        let store = self.store;
        let metadata = store.metadata();
        let kind = message.kind;

        let reply = match kind {
            MessageKind::GetService => Reply::state(
                MessageKind::StateService,
                Payload::StateService {
                    service: SERVICE_UDP,
                    port: u32::from(metadata.port),
                },
            ),
            MessageKind::GetHostInfo => Reply::state(
                MessageKind::StateHostInfo,
                Payload::StateSignal(metadata.host_info),
            ),
            MessageKind::GetHostFirmware => Reply::state(
                MessageKind::StateHostFirmware,
                Payload::StateFirmware(metadata.host_firmware),
            ),
            MessageKind::GetWifiInfo => Reply::state(
                MessageKind::StateWifiInfo,
                Payload::StateSignal(store.wifi_info()),
            ),
            MessageKind::GetWifiFirmware => Reply::state(
                MessageKind::StateWifiFirmware,
                Payload::StateFirmware(metadata.wifi_firmware),
            ),
            MessageKind::GetPower => Reply::state(
                MessageKind::StatePower,
                Payload::StatePower {
                    level: store.power(),
                },
            ),
            MessageKind::SetPower => {
                let &Payload::SetPower { level } = &message.payload else {
                    return Err(DispatchError::MalformedPayload(kind));
                };
                let previous = store.set_power(level);
                self.actions.send(TransitionRequest::power(level, 0));
                Reply::ack(
                    MessageKind::StatePower,
                    Payload::StatePower { level: previous },
                )
            }
            MessageKind::GetLabel => Reply::state(
                MessageKind::StateLabel,
                Payload::StateLabel {
                    label: store.label(),
                },
            ),
            MessageKind::SetLabel => {
                let Payload::SetLabel { label } = &message.payload else {
                    return Err(DispatchError::MalformedPayload(kind));
                };
                store.set_label(label.clone());
                Reply::ack(
                    MessageKind::StateLabel,
                    Payload::StateLabel {
                        label: label.clone(),
                    },
                )
            }
            MessageKind::GetVersion => Reply::state(
                MessageKind::StateVersion,
                Payload::StateVersion(metadata.version),
            ),
            MessageKind::GetInfo => Reply::state(
                MessageKind::StateInfo,
                Payload::StateInfo {
                    time: store.wall_clock_ns(now),
                    uptime: store.uptime_ns(now),
                    downtime: 0,
                },
            ),
            MessageKind::GetLocation => Reply::state(
                MessageKind::StateLocation,
                Payload::StateCollection(metadata.location.clone()),
            ),
            MessageKind::GetGroup => Reply::state(
                MessageKind::StateGroup,
                Payload::StateCollection(metadata.group.clone()),
            ),
            MessageKind::GetOwner => Reply::state(
                MessageKind::StateOwner,
                Payload::StateCollection(store.owner()),
            ),
            MessageKind::SetOwner => {
                let Payload::SetOwner { owner, label } = &message.payload else {
                    return Err(DispatchError::MalformedPayload(kind));
                };
                let owner = store.set_owner(*owner, label.clone(), store.wall_clock_ns(now));
                Reply::ack(MessageKind::StateOwner, Payload::StateCollection(owner))
            }
            MessageKind::EchoRequest => {
                let &Payload::Echo { payload } = &message.payload else {
                    return Err(DispatchError::MalformedPayload(kind));
                };
                Reply::state(MessageKind::EchoResponse, Payload::Echo { payload })
            }
            MessageKind::LightGet => {
                let state = store.get();
                Reply::state(
                    MessageKind::LightState,
                    Payload::LightState {
                        color: state.color,
                        power: state.power,
                        label: state.label,
                    },
                )
            }
            MessageKind::LightSetColor => {
                let &Payload::LightSetColor { color, duration_ms } = &message.payload else {
                    return Err(DispatchError::MalformedPayload(kind));
                };
                let previous = store.set_color(color);
                self.actions
                    .send(TransitionRequest::color(color, duration_ms));
                Reply::ack(
                    MessageKind::LightState,
                    Payload::LightState {
                        color: previous.color,
                        power: previous.power,
                        label: previous.label,
                    },
                )
            }
            MessageKind::LightGetPower => Reply::state(
                MessageKind::LightStatePower,
                Payload::StatePower {
                    level: store.power(),
                },
            ),
            MessageKind::LightSetPower => {
                let &Payload::LightSetPower { level, duration_ms } = &message.payload else {
                    return Err(DispatchError::MalformedPayload(kind));
                };
                let previous = store.set_power(level);
                self.actions
                    .send(TransitionRequest::power(level, duration_ms));
                Reply::ack(
                    MessageKind::LightStatePower,
                    Payload::StatePower { level: previous },
                )
            }
            _ => {
                #[cfg(feature = "esp32-log")]
                println!("[Dispatcher.handle] ignoring message type {}", kind.as_raw());
                return Ok(None);
            }
        };

        Ok(Some(reply))
    }
}
