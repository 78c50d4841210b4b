//! Session-based playback of code strings.
//!
//! A [`Player`] walks the lazy timeline from [`crate::timeline`], forwarding
//! tones to a [`ToneSink`] and waiting out every event on a [`Clock`]. Only
//! one session runs at a time per player.
//!
//! Session and cancellation share one atomic state: `IDLE -> PLAYING` on
//! start, `PLAYING -> CANCELING` on cancel, back to `IDLE` when the session
//! guard drops on any exit path.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::audio::{Clock, SinkError, ToneSink};
use crate::encoder::encode;
use crate::table::SymbolTable;
use crate::timeline::{events, PlaybackEvent, Timing};

/// How a playback request ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    /// Every event was emitted.
    Completed,
    /// Cancellation was requested before the timeline ran out.
    Canceled,
    /// Timing was honoured in full but some or all tones were not rendered.
    Degraded(SinkError),
    /// Another session was already running; nothing was emitted.
    AlreadyInProgress,
}

/// Summary returned to the caller once a session is over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionReport {
    pub status: SessionStatus,
    pub events_emitted: usize,
    /// Sum of the durations of the emitted events.
    pub scheduled: Duration,
}

impl SessionReport {
    fn busy() -> Self {
        Self {
            status: SessionStatus::AlreadyInProgress,
            events_emitted: 0,
            scheduled: Duration::ZERO,
        }
    }

    pub fn is_canceled(&self) -> bool {
        self.status == SessionStatus::Canceled
    }
}

const IDLE: u8 = 0;
const PLAYING: u8 = 1;
const CANCELING: u8 = 2;

/// Shared cancellation signal for a [`Player`].
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    state: Arc<AtomicU8>,
}

impl CancelHandle {
    /// Requests that the running session stop before its next event. A
    /// request made while idle is a no-op.
    pub fn cancel(&self) {
        let _ = self
            .state
            .compare_exchange(PLAYING, CANCELING, Ordering::AcqRel, Ordering::Acquire);
    }

    pub fn is_canceled(&self) -> bool {
        self.state.load(Ordering::Acquire) == CANCELING
    }
}

struct SessionGuard<'a> {
    state: &'a AtomicU8,
}

impl<'a> SessionGuard<'a> {
    fn acquire(state: &'a AtomicU8) -> Option<Self> {
        state
            .compare_exchange(IDLE, PLAYING, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { state })
    }
}

impl Drop for SessionGuard<'_> {
    fn drop(&mut self) {
        self.state.store(IDLE, Ordering::Release);
    }
}

/// Plays code strings as timed tone/silence events.
///
/// Clones share the same session state and cancel handle.
#[derive(Debug, Clone, Default)]
pub struct Player {
    timing: Timing,
    cancel: CancelHandle,
}

impl Player {
    pub fn new(timing: Timing) -> Self {
        Self {
            timing,
            cancel: CancelHandle::default(),
        }
    }

    pub fn timing(&self) -> Timing {
        self.timing
    }

    /// Returns whether a session is currently running.
    pub fn is_active(&self) -> bool {
        self.cancel.state.load(Ordering::Acquire) != IDLE
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Runs one session over `code`.
    ///
    /// Without a sink the session still waits out every event and reports
    /// [`SessionStatus::Degraded`]. A sink that fails is dropped for the rest
    /// of the session while timing continues unchanged.
    pub fn play(
        &self,
        code: &str,
        sink: Option<&mut dyn ToneSink>,
        clock: &mut dyn Clock,
    ) -> SessionReport {
        let Some(_guard) = SessionGuard::acquire(&self.cancel.state) else {
            tracing::debug!("playback requested while a session is active; ignoring");
            return SessionReport::busy();
        };

        let mut sink = sink;
        let mut degraded = None;
        if sink.is_none() {
            tracing::warn!("no tone sink available; playing silently");
            degraded = Some(SinkError::Unavailable);
        }

        tracing::info!(
            symbols = code.len(),
            unit_ms = self.timing.unit.as_millis() as u64,
            "starting playback session"
        );

        let mut events_emitted = 0;
        let mut scheduled = Duration::ZERO;
        let mut canceled = false;
        let mut stream = events(code, self.timing);

        loop {
            if self.cancel.is_canceled() {
                canceled = true;
                break;
            }
            let Some(event) = stream.next() else {
                break;
            };

            if let PlaybackEvent::Tone {
                frequency_hz,
                duration,
            } = event
            {
                let rendered = match sink.as_mut() {
                    Some(sink) => sink.render_tone(frequency_hz, duration),
                    None => Ok(()),
                };
                if let Err(err) = rendered {
                    tracing::warn!(error = %err, "tone sink failed; continuing silently");
                    degraded = Some(err);
                    sink = None;
                }
            }

            clock.sleep(event.duration());
            events_emitted += 1;
            scheduled = scheduled.saturating_add(event.duration());
        }

        let status = match (canceled, degraded) {
            (true, _) => SessionStatus::Canceled,
            (false, Some(err)) => SessionStatus::Degraded(err),
            (false, None) => SessionStatus::Completed,
        };
        tracing::info!(
            ?status,
            events = events_emitted,
            scheduled_ms = scheduled.as_millis() as u64,
            "playback session finished"
        );

        SessionReport {
            status,
            events_emitted,
            scheduled,
        }
    }

    /// Encodes `text` and plays the result.
    pub fn play_text(
        &self,
        text: &str,
        sink: Option<&mut dyn ToneSink>,
        clock: &mut dyn Clock,
    ) -> SessionReport {
        let code = encode(text).to_string();
        self.play(&code, sink, clock)
    }

    /// Plays the code of a single table character. Unmapped characters play
    /// as an empty session.
    pub fn play_symbol(
        &self,
        ch: char,
        sink: Option<&mut dyn ToneSink>,
        clock: &mut dyn Clock,
    ) -> SessionReport {
        let code = SymbolTable::standard().lookup(ch).unwrap_or("");
        self.play(code, sink, clock)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;
    use std::thread;

    use super::*;
    use crate::audio::{ManualClock, SystemClock};

    #[derive(Default)]
    struct RecordingSink {
        tones: Vec<(u32, Duration)>,
    }

    impl ToneSink for RecordingSink {
        fn render_tone(&mut self, frequency_hz: u32, duration: Duration) -> Result<(), SinkError> {
            self.tones.push((frequency_hz, duration));
            Ok(())
        }
    }

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn completes_with_expected_duration() {
        let player = Player::default();
        let mut sink = RecordingSink::default();
        let mut clock = ManualClock::new();

        let report = player.play("... --- ...", Some(&mut sink), &mut clock);

        assert_eq!(report.status, SessionStatus::Completed);
        assert_eq!(report.events_emitted, 20);
        assert_eq!(report.scheduled, ms(3_000));
        assert_eq!(clock.elapsed(), player.timing().expected_duration("... --- ..."));
        assert_eq!(sink.tones.len(), 9);
        assert_eq!(sink.tones[3], (600, ms(300)));
        assert!(!player.is_active());
    }

    #[test]
    fn missing_sink_keeps_timing() {
        let player = Player::default();
        let mut clock = ManualClock::new();

        let report = player.play(".- / -...", None, &mut clock);

        assert_eq!(report.status, SessionStatus::Degraded(SinkError::Unavailable));
        assert_eq!(clock.elapsed(), player.timing().expected_duration(".- / -..."));
        assert!(!player.is_active());
    }

    #[test]
    fn failing_sink_is_dropped_and_timing_continues() {
        let player = Player::default();
        let mut calls = 0;
        let mut sink = |_: u32, _: Duration| -> Result<(), SinkError> {
            calls += 1;
            if calls == 2 {
                Err(SinkError::failed("device unplugged"))
            } else {
                Ok(())
            }
        };
        let mut clock = ManualClock::new();

        let report = player.play("...", Some(&mut sink), &mut clock);

        assert_eq!(
            report.status,
            SessionStatus::Degraded(SinkError::failed("device unplugged"))
        );
        assert_eq!(calls, 2);
        assert_eq!(clock.elapsed(), ms(600));
        assert!(!player.is_active());
    }

    #[test]
    fn second_session_is_ignored_while_active() {
        let player = Player::default();
        let nested_player = player.clone();
        let mut nested_reports = Vec::new();
        let mut outer_tones = Vec::new();
        let mut sink = |hz: u32, duration: Duration| -> Result<(), SinkError> {
            outer_tones.push((hz, duration));
            let mut nested_sink = RecordingSink::default();
            let report = nested_player.play("---", Some(&mut nested_sink), &mut ManualClock::new());
            nested_reports.push((report, nested_sink.tones.len()));
            Ok(())
        };
        let mut clock = ManualClock::new();

        let report = player.play("..", Some(&mut sink), &mut clock);

        assert_eq!(report.status, SessionStatus::Completed);
        assert_eq!(report.events_emitted, 4);
        assert_eq!(outer_tones, vec![(600, ms(100)), (600, ms(100))]);
        assert_eq!(nested_reports.len(), 2);
        for (nested, rendered) in nested_reports {
            assert_eq!(nested.status, SessionStatus::AlreadyInProgress);
            assert_eq!(nested.events_emitted, 0);
            assert_eq!(rendered, 0);
        }
        assert!(!player.is_active());
    }

    #[test]
    fn cancel_stops_before_the_next_event() {
        let player = Player::default();
        let handle = player.cancel_handle();
        let mut tones = 0;
        let mut sink = |_: u32, _: Duration| -> Result<(), SinkError> {
            tones += 1;
            if tones == 2 {
                handle.cancel();
            }
            Ok(())
        };
        let mut clock = ManualClock::new();

        let report = player.play("... ---", Some(&mut sink), &mut clock);

        assert!(report.is_canceled());
        // tone, gap, tone; the gap after the second tone is never emitted.
        assert_eq!(report.events_emitted, 3);
        assert_eq!(clock.elapsed(), ms(300));
        assert_eq!(tones, 2);
        assert!(!player.is_active());
    }

    #[test]
    fn stale_cancel_does_not_leak_into_next_session() {
        let player = Player::default();
        player.cancel();

        let report = player.play(".", None, &mut ManualClock::new());

        assert_eq!(report.events_emitted, 2);
        assert!(!report.is_canceled());
    }

    #[test]
    fn cancel_while_idle_is_a_no_op() {
        let player = Player::default();
        let handle = player.cancel_handle();
        handle.cancel();

        assert!(!handle.is_canceled());
        assert!(!player.is_active());
    }

    #[test]
    fn cancel_is_cleared_when_the_session_ends() {
        let player = Player::default();
        let handle = player.cancel_handle();
        let mut sink = |_: u32, _: Duration| -> Result<(), SinkError> {
            handle.cancel();
            assert!(handle.is_canceled());
            Ok(())
        };

        let report = player.play("..", Some(&mut sink), &mut ManualClock::new());

        assert!(report.is_canceled());
        assert_eq!(report.events_emitted, 1);
        assert!(!player.cancel_handle().is_canceled());
        assert!(!player.is_active());

        let next = player.play("..", None, &mut ManualClock::new());
        assert_eq!(next.events_emitted, 4);
    }

    #[test]
    fn oversized_unit_saturates_without_panicking() {
        let player = Player::new(Timing::new(Duration::MAX, 600));
        let mut clock = ManualClock::new();

        let report = player.play(&"/".repeat(200), None, &mut clock);

        assert_eq!(report.events_emitted, 200);
        assert_eq!(report.scheduled, Duration::MAX);
        assert_eq!(clock.elapsed(), Duration::MAX);
        assert!(!player.is_active());
    }

    #[test]
    fn empty_and_unknown_only_codes_return_immediately() {
        let player = Player::default();
        for code in ["", "? ?", "xyz"] {
            let mut sink = RecordingSink::default();
            let mut clock = ManualClock::new();
            let report = player.play(code, Some(&mut sink), &mut clock);

            assert_eq!(report.status, SessionStatus::Completed, "code {code:?}");
            assert_eq!(report.events_emitted, 0);
            assert_eq!(clock.waits(), 0);
            assert!(sink.tones.is_empty());
        }
        assert!(!player.is_active());
    }

    #[test]
    fn plays_text_and_single_symbols() {
        let player = Player::new(Timing::new(ms(50), 700));
        let mut clock = ManualClock::new();
        let mut sink = RecordingSink::default();

        let report = player.play_text("e t", Some(&mut sink), &mut clock);
        assert_eq!(report.status, SessionStatus::Completed);
        assert_eq!(sink.tones, vec![(700, ms(50)), (700, ms(150))]);
        assert_eq!(clock.elapsed(), player.timing().expected_duration(". / -"));

        let mut sink = RecordingSink::default();
        player.play_symbol('a', Some(&mut sink), &mut ManualClock::new());
        assert_eq!(sink.tones, vec![(700, ms(50)), (700, ms(150))]);

        let report = player.play_symbol('#', None, &mut ManualClock::new());
        assert_eq!(report.events_emitted, 0);
    }

    #[test]
    fn cancel_from_another_thread() {
        let player = Player::new(Timing::new(ms(2), 600));
        let worker = player.clone();
        let (started_tx, started_rx) = mpsc::channel();

        let handle = thread::spawn(move || {
            let code = ".".repeat(500);
            let mut sink = move |_: u32, _: Duration| -> Result<(), SinkError> {
                let _ = started_tx.send(());
                Ok(())
            };
            worker.play(&code, Some(&mut sink), &mut SystemClock)
        });

        started_rx.recv().expect("session should start");
        assert!(player.is_active());
        player.cancel();

        let report = handle.join().expect("playback thread panicked");
        assert!(report.is_canceled());
        assert!(report.events_emitted < 1_000);
        assert!(!player.is_active());
    }
}
