//! Frame scheduling and timing utilities.
//!
//! Provides portable frame pacing without async/await or platform-specific timers.
//! The caller is responsible for sleeping/waiting between frames.

use embassy_time::{Duration, Instant};

use crate::OutputDriver;
use crate::engine::TransitionEngine;

/// Default frame duration (50 FPS).
pub const DEFAULT_FRAME_DURATION: Duration = Duration::from_millis(20);

/// Result of a frame tick operation.
#[derive(Debug, Clone, Copy)]
pub struct FrameResult {
    /// The deadline for the next frame.
    pub next_deadline: Instant,
    /// How long to wait until the next frame (may be zero if behind schedule).
    pub sleep_duration: Duration,
}

/// Portable frame scheduler driving the transition engine.
///
/// This is the single consumer of the action queue. Each tick:
/// - Resets the deadline if we fell too far behind (no catch-up bursts)
/// - Applies queued transition requests
/// - Renders the engine at the actual current time
/// - Returns timing info so the caller can sleep appropriately
///
/// # Usage
///
/// ```ignore
/// let mut scheduler = bulb.scheduler(driver);
///
/// loop {
///     let result = scheduler.tick(Instant::now())?;
///     sleep_ms(result.sleep_duration.as_millis());
/// }
/// ```
pub struct FrameScheduler<'a, O: OutputDriver, const QUEUE_SIZE: usize> {
    engine: TransitionEngine<'a, O, QUEUE_SIZE>,
    next_frame: Instant,
    frame_duration: Duration,
}

impl<'a, O: OutputDriver, const QUEUE_SIZE: usize> FrameScheduler<'a, O, QUEUE_SIZE> {
    /// Create a new frame scheduler.
    ///
    /// Uses `DEFAULT_FRAME_DURATION` (20 ms) for frame timing.
    pub fn new(engine: TransitionEngine<'a, O, QUEUE_SIZE>) -> Self {
        Self::with_frame_duration(engine, DEFAULT_FRAME_DURATION)
    }

    /// Create a new frame scheduler with custom frame duration.
    pub fn with_frame_duration(
        engine: TransitionEngine<'a, O, QUEUE_SIZE>,
        frame_duration: Duration,
    ) -> Self {
        Self {
            engine,
            next_frame: Instant::from_millis(0),
            frame_duration,
        }
    }

    /// Process one frame and return timing information.
    ///
    /// The caller is responsible for waiting until `next_deadline` before
    /// calling `tick` again. Output driver errors abort the frame.
    pub fn tick(&mut self, now: Instant) -> Result<FrameResult, O::Error> {
        // Drift correction: if we've fallen too far behind, reset to now
        let max_drift = self.frame_duration * 2;
        if now > self.next_frame + max_drift {
            self.next_frame = now;
        }

        self.engine.process_pending(now);
        self.engine.tick(now)?;

        self.next_frame += self.frame_duration;

        Ok(FrameResult {
            next_deadline: self.next_frame,
            sleep_duration: self.next_frame.saturating_duration_since(now),
        })
    }

    pub const fn frame_duration(&self) -> Duration {
        self.frame_duration
    }

    /// Get a reference to the engine.
    pub const fn engine(&self) -> &TransitionEngine<'a, O, QUEUE_SIZE> {
        &self.engine
    }

    /// Get a mutable reference to the engine.
    pub fn engine_mut(&mut self) -> &mut TransitionEngine<'a, O, QUEUE_SIZE> {
        &mut self.engine
    }
}
