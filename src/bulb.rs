use embassy_time::{Duration, Instant};

use crate::OutputDriver;
use crate::action_queue::{ActionQueue, DEFAULT_QUEUE_SIZE};
use crate::config::BulbConfig;
use crate::dispatcher::Dispatcher;
use crate::engine::TransitionEngine;
use crate::frame_scheduler::FrameScheduler;
use crate::server::Server;
use crate::state::BulbStateStore;

/// Everything one emulated bulb shares between its command and render sides
///
/// Own it somewhere long-lived (a `static`, or the stack of a scope that
/// outlives both sides) and hand out the views below.
pub struct BulbContext<const QUEUE_SIZE: usize = DEFAULT_QUEUE_SIZE> {
    store: BulbStateStore,
    actions: ActionQueue<QUEUE_SIZE>,
}

impl<const QUEUE_SIZE: usize> BulbContext<QUEUE_SIZE> {
    pub fn new(config: &BulbConfig, started_at: Instant) -> Self {
        Self {
            store: BulbStateStore::new(config, started_at),
            actions: ActionQueue::new(),
        }
    }

    pub const fn store(&self) -> &BulbStateStore {
        &self.store
    }

    pub const fn actions(&self) -> &ActionQueue<QUEUE_SIZE> {
        &self.actions
    }

    /// Command side: message handler
    pub const fn dispatcher(&self) -> Dispatcher<'_, QUEUE_SIZE> {
        Dispatcher::new(&self.store, self.actions.sender())
    }

    /// Command side: receive loop
    pub const fn server(&self) -> Server<'_, QUEUE_SIZE> {
        Server::new(self.dispatcher(), &self.store)
    }

    /// Render side: bare engine, for callers with their own pacing
    pub fn engine<O: OutputDriver>(&self, output: O) -> TransitionEngine<'_, O, QUEUE_SIZE> {
        TransitionEngine::new(output, self.actions.receiver(), &self.store)
    }

    /// Render side: engine paced at the default frame rate
    pub fn scheduler<O: OutputDriver>(&self, output: O) -> FrameScheduler<'_, O, QUEUE_SIZE> {
        FrameScheduler::new(self.engine(output))
    }

    /// Render side: engine paced at a custom frame rate
    pub fn scheduler_with_frame_duration<O: OutputDriver>(
        &self,
        output: O,
        frame_duration: Duration,
    ) -> FrameScheduler<'_, O, QUEUE_SIZE> {
        FrameScheduler::with_frame_duration(self.engine(output), frame_duration)
    }
}
