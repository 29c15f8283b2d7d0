//! Single ingress for transition requests.
//!
//! A FIFO built on `critical-section` and `heapless::Deque`, shared between
//! the dispatcher (many senders) and the transition engine (one receiver).
//! Sending never waits on the receiver.

use core::cell::RefCell;

use critical_section::Mutex;
use embassy_time::Duration;
use heapless::Deque;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::color::Hsbk;

/// Default capacity of the action queue.
pub const DEFAULT_QUEUE_SIZE: usize = 16;

/// Discrete change requested from the transition engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionRequest {
    /// Fade power to `level` (0 = off, `0xFFFF` = on)
    PowerChange { level: u16, duration: Duration },
    /// Fade to `color`
    ColorChange { color: Hsbk, duration: Duration },
}

impl TransitionRequest {
    /// Build a power request from a wire duration in milliseconds
    pub fn power(level: u16, duration_ms: u32) -> Self {
        Self::PowerChange {
            level,
            duration: Duration::from_millis(u64::from(duration_ms)),
        }
    }

    pub const fn is_power(&self) -> bool {
        matches!(self, Self::PowerChange { .. })
    }

    /// Build a color request from a wire duration in milliseconds
    pub fn color(color: Hsbk, duration_ms: u32) -> Self {
        Self::ColorChange {
            color,
            duration: Duration::from_millis(u64::from(duration_ms)),
        }
    }
}

/// Remove the oldest color change, keeping the order of the rest
fn take_oldest_color<const SIZE: usize>(
    queue: &mut Deque<TransitionRequest, SIZE>,
) -> Option<TransitionRequest> {
    let position = queue.iter().position(|request| !request.is_power())?;
    let mut taken = None;
    for index in 0..queue.len() {
        let Some(request) = queue.pop_front() else {
            break;
        };
        if index == position {
            taken = Some(request);
        } else {
            let _ = queue.push_back(request);
        }
    }
    taken
}

/// Bounded queue of transition requests.
pub struct ActionQueue<const SIZE: usize> {
    inner: Mutex<RefCell<Deque<TransitionRequest, SIZE>>>,
}

impl<const SIZE: usize> ActionQueue<SIZE> {
    /// Create a new empty queue.
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Deque::new())),
        }
    }

    /// Get a sender handle for this queue.
    pub const fn sender(&self) -> ActionSender<'_, SIZE> {
        ActionSender { queue: self }
    }

    /// Get a receiver handle for this queue.
    ///
    /// Only the transition engine should drain the queue.
    pub const fn receiver(&self) -> ActionReceiver<'_, SIZE> {
        ActionReceiver { queue: self }
    }

    /// Append a request.
    ///
    /// When the queue is full one request is dropped to make room and
    /// returned: the oldest pending color change if there is one, otherwise
    /// the oldest power change when a newer one follows it. A power change
    /// is never dropped unless a later power change supersedes it, so a
    /// lone pending power change rejects an incoming color change instead.
    pub fn enqueue(&self, request: TransitionRequest) -> Option<TransitionRequest> {
        critical_section::with(|cs| {
            let mut queue = self.inner.borrow(cs).borrow_mut();
            let displaced = if queue.is_full() {
                match take_oldest_color(&mut *queue) {
                    Some(color) => Some(color),
                    None if queue.len() > 1 || request.is_power() => queue.pop_front(),
                    None => return Some(request),
                }
            } else {
                None
            };
            // Cannot fail, a slot was freed above
            let _ = queue.push_back(request);
            displaced
        })
    }

    /// Take the oldest pending request.
    pub fn try_next(&self) -> Option<TransitionRequest> {
        critical_section::with(|cs| self.inner.borrow(cs).borrow_mut().pop_front())
    }

    /// Number of pending requests.
    pub fn len(&self) -> usize {
        critical_section::with(|cs| self.inner.borrow(cs).borrow().len())
    }

    /// Check if no requests are pending.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<const SIZE: usize> Default for ActionQueue<SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

/// Sending side of an [`ActionQueue`].
#[derive(Clone, Copy)]
pub struct ActionSender<'a, const SIZE: usize> {
    queue: &'a ActionQueue<SIZE>,
}

impl<const SIZE: usize> ActionSender<'_, SIZE> {
    /// Append a request without waiting for the engine.
    pub fn send(&self, request: TransitionRequest) {
        if let Some(_displaced) = self.queue.enqueue(request) {
            #[cfg(feature = "esp32-log")]
            println!("[ActionQueue] queue full, dropped {:?}", _displaced);
        }
    }
}

/// Receiving side of an [`ActionQueue`].
#[derive(Clone, Copy)]
pub struct ActionReceiver<'a, const SIZE: usize> {
    queue: &'a ActionQueue<SIZE>,
}

impl<const SIZE: usize> ActionReceiver<'_, SIZE> {
    /// Take the oldest pending request, if any.
    pub fn try_receive(&self) -> Option<TransitionRequest> {
        self.queue.try_next()
    }
}
