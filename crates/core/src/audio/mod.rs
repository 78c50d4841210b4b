//! Capabilities the playback scheduler drives but does not implement.
//!
//! A [`ToneSink`] renders audible output; a [`Clock`] provides the suspension
//! between events. All waiting happens on the clock, whether or not a sink
//! is present.

use std::time::{Duration, Instant};

/// Reasons a sink could not render a tone.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SinkError {
    /// No tone rendering capability was supplied for the session.
    #[error("no tone sink available")]
    Unavailable,
    /// The sink reported a failure while rendering.
    #[error("tone sink failed: {0}")]
    Failed(String),
}

impl SinkError {
    pub fn failed<T: Into<String>>(msg: T) -> Self {
        Self::Failed(msg.into())
    }
}

/// Backend able to emit a tone of a given frequency and length.
///
/// Implementations schedule the tone and return; the scheduler waits for
/// `duration` on its [`Clock`] afterwards.
pub trait ToneSink {
    fn render_tone(&mut self, frequency_hz: u32, duration: Duration) -> Result<(), SinkError>;
}

impl<F> ToneSink for F
where
    F: FnMut(u32, Duration) -> Result<(), SinkError>,
{
    fn render_tone(&mut self, frequency_hz: u32, duration: Duration) -> Result<(), SinkError> {
        self(frequency_hz, duration)
    }
}

/// Suspension point used between playback events.
pub trait Clock {
    fn sleep(&mut self, duration: Duration);
}

/// Wall-clock implementation that blocks the calling thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn sleep(&mut self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}

/// Clock that only accumulates requested waits, for dry runs and tests.
#[derive(Debug, Default, Clone)]
pub struct ManualClock {
    elapsed: Duration,
    waits: usize,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Number of waits requested so far.
    pub fn waits(&self) -> usize {
        self.waits
    }

    pub fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
        self.waits = 0;
    }

    pub fn advance(&mut self, delta: Duration) {
        self.elapsed = self.elapsed.saturating_add(delta);
        self.waits += 1;
    }
}

impl Clock for ManualClock {
    fn sleep(&mut self, duration: Duration) {
        self.advance(duration);
    }
}

/// Measures how long a session actually took on the wall clock.
#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    started: Instant,
}

impl Stopwatch {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}
