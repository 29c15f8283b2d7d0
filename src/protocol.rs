//! Decoded LIFX LAN messages
//!
//! The wire codec lives outside of this crate. It hands the core a
//! [`Message`] (kind + typed payload) and receives [`Reply`] values back.

use heapless::String;

use crate::color::Hsbk;

/// Maximum label length in bytes
pub const LABEL_SIZE: usize = 32;

/// Size of the opaque echo payload
pub const ECHO_PAYLOAD_SIZE: usize = 64;

/// Service id announced for UDP
pub const SERVICE_UDP: u8 = 1;

pub type Label = String<LABEL_SIZE>;

/// Build a label, truncating at a character boundary if `text` is too long
pub fn label(text: &str) -> Label {
    let mut label = Label::new();
    for ch in text.chars() {
        if label.push(ch).is_err() {
            break;
        }
    }
    label
}

macro_rules! message_kinds {
    ($($name:ident = $raw:literal,)+) => {
        /// Known message types, numbered as on the wire
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum MessageKind {
            $($name,)+
            /// Anything this bulb does not understand
            Unknown(u16),
        }

        impl MessageKind {
            pub const fn from_raw(value: u16) -> Self {
                match value {
                    $($raw => Self::$name,)+
                    other => Self::Unknown(other),
                }
            }

            pub const fn as_raw(self) -> u16 {
                match self {
                    $(Self::$name => $raw,)+
                    Self::Unknown(other) => other,
                }
            }
        }
    };
}

message_kinds! {
    GetService = 2,
    StateService = 3,
    GetHostInfo = 12,
    StateHostInfo = 13,
    GetHostFirmware = 14,
    StateHostFirmware = 15,
    GetWifiInfo = 16,
    StateWifiInfo = 17,
    GetWifiFirmware = 18,
    StateWifiFirmware = 19,
    GetPower = 20,
    SetPower = 21,
    StatePower = 22,
    GetLabel = 23,
    SetLabel = 24,
    StateLabel = 25,
    GetVersion = 32,
    StateVersion = 33,
    GetInfo = 34,
    StateInfo = 35,
    GetLocation = 48,
    StateLocation = 50,
    GetGroup = 51,
    StateGroup = 53,
    GetOwner = 54,
    SetOwner = 55,
    StateOwner = 56,
    EchoRequest = 58,
    EchoResponse = 59,
    LightGet = 101,
    LightSetColor = 102,
    LightState = 107,
    LightGetPower = 116,
    LightSetPower = 117,
    LightStatePower = 118,
}

/// Firmware build and version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Firmware {
    /// Build time in nanoseconds since the Unix epoch
    pub build: u64,
    pub version: u32,
}

/// Radio statistics of the host or wifi module
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SignalInfo {
    pub signal: f32,
    pub tx: u32,
    pub rx: u32,
    pub mcu_temperature: i16,
}

/// Hardware identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Version {
    pub vendor: u32,
    pub product: u32,
    pub version: u32,
}

/// Location, group or owner membership
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Collection {
    pub id: [u8; 16],
    pub label: Label,
    /// Nanoseconds since the Unix epoch
    pub updated_at: u64,
}

/// Typed message body
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Message without a body
    Empty,
    SetPower {
        level: u16,
    },
    SetLabel {
        label: Label,
    },
    SetOwner {
        owner: [u8; 16],
        label: Label,
    },
    /// Body of both `EchoRequest` and `EchoResponse`
    Echo {
        payload: [u8; ECHO_PAYLOAD_SIZE],
    },
    LightSetColor {
        color: Hsbk,
        duration_ms: u32,
    },
    LightSetPower {
        level: u16,
        duration_ms: u32,
    },
    StateService {
        service: u8,
        port: u32,
    },
    /// Body of `StateHostInfo` and `StateWifiInfo`
    StateSignal(SignalInfo),
    /// Body of `StateHostFirmware` and `StateWifiFirmware`
    StateFirmware(Firmware),
    /// Body of `StatePower` and `LightStatePower`
    StatePower {
        level: u16,
    },
    StateLabel {
        label: Label,
    },
    StateVersion(Version),
    StateInfo {
        time: u64,
        uptime: u64,
        downtime: u64,
    },
    /// Body of `StateLocation`, `StateGroup` and `StateOwner`
    StateCollection(Collection),
    LightState {
        color: Hsbk,
        power: u16,
        label: Label,
    },
}

/// Decoded message
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub kind: MessageKind,
    pub payload: Payload,
}

impl Message {
    pub const fn new(kind: MessageKind, payload: Payload) -> Self {
        Self { kind, payload }
    }

    /// Message without a body, as most `Get*` requests are
    pub const fn empty(kind: MessageKind) -> Self {
        Self::new(kind, Payload::Empty)
    }
}

/// Response produced by the dispatcher
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    /// Send even if the requester did not ask for a response
    pub always: bool,
    pub message: Message,
}

impl Reply {
    /// Reply to a query, always sent
    pub const fn state(kind: MessageKind, payload: Payload) -> Self {
        Self {
            always: true,
            message: Message::new(kind, payload),
        }
    }

    /// Reply to a mutation, sent only when the requester asked for it
    pub const fn ack(kind: MessageKind, payload: Payload) -> Self {
        Self {
            always: false,
            message: Message::new(kind, payload),
        }
    }
}
