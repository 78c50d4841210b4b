//! Lazy conversion of a code string into timed tone and silence events.
//!
//! Each call to [`next_event`] is a pure step from a [`Cursor`] to the next
//! event, so playback can stop between any two events without the rest of
//! the timeline ever being built.

use std::time::Duration;

/// Default length of one dot.
pub const DEFAULT_UNIT: Duration = Duration::from_millis(100);

/// Default tone frequency in hertz.
pub const DEFAULT_TONE_HZ: u32 = 600;

/// Timing constants, all derived from a single base unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub unit: Duration,
    pub tone_hz: u32,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            unit: DEFAULT_UNIT,
            tone_hz: DEFAULT_TONE_HZ,
        }
    }
}

impl Timing {
    pub fn new(unit: Duration, tone_hz: u32) -> Self {
        Self { unit, tone_hz }
    }

    pub fn dot(&self) -> Duration {
        self.unit
    }

    pub fn dash(&self) -> Duration {
        self.unit.saturating_mul(3)
    }

    /// Silence following every dot or dash.
    pub fn element_gap(&self) -> Duration {
        self.unit
    }

    pub fn letter_gap(&self) -> Duration {
        self.unit.saturating_mul(3)
    }

    pub fn word_gap(&self) -> Duration {
        self.unit.saturating_mul(7)
    }

    /// Total playback time of `code`, computed from symbol counts alone.
    /// Saturates at [`Duration::MAX`].
    pub fn expected_duration(&self, code: &str) -> Duration {
        let units = code.chars().fold(0u32, |units, ch| {
            let weight = match ch {
                '.' => 2,
                '-' => 4,
                ' ' => 3,
                '/' => 7,
                _ => 0,
            };
            units.saturating_add(weight)
        });
        self.unit.saturating_mul(units)
    }
}

/// One step of the playback timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackEvent {
    Tone { frequency_hz: u32, duration: Duration },
    Silence { duration: Duration },
}

impl PlaybackEvent {
    pub fn duration(&self) -> Duration {
        match *self {
            PlaybackEvent::Tone { duration, .. } | PlaybackEvent::Silence { duration } => duration,
        }
    }

    pub fn is_tone(&self) -> bool {
        matches!(self, PlaybackEvent::Tone { .. })
    }
}

/// Position within a code string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    /// Byte offset of the next unread character.
    pub offset: usize,
    /// A tone was just emitted and its trailing element gap is still owed.
    pub gap_pending: bool,
}

/// Produces the event at `cursor` together with the cursor that follows it.
///
/// Characters other than `.`, `-`, ` ` and `/` are skipped silently; this
/// includes the unknown marker.
pub fn next_event(code: &str, timing: &Timing, cursor: Cursor) -> Option<(PlaybackEvent, Cursor)> {
    if cursor.gap_pending {
        let event = PlaybackEvent::Silence {
            duration: timing.element_gap(),
        };
        return Some((
            event,
            Cursor {
                offset: cursor.offset,
                gap_pending: false,
            },
        ));
    }

    let rest = code.get(cursor.offset..)?;
    for (idx, ch) in rest.char_indices() {
        let offset = cursor.offset + idx + ch.len_utf8();
        let (event, gap_pending) = match ch {
            '.' => (tone(timing, timing.dot()), true),
            '-' => (tone(timing, timing.dash()), true),
            ' ' => (silence(timing.letter_gap()), false),
            '/' => (silence(timing.word_gap()), false),
            _ => continue,
        };
        return Some((event, Cursor { offset, gap_pending }));
    }
    None
}

fn tone(timing: &Timing, duration: Duration) -> PlaybackEvent {
    PlaybackEvent::Tone {
        frequency_hz: timing.tone_hz,
        duration,
    }
}

fn silence(duration: Duration) -> PlaybackEvent {
    PlaybackEvent::Silence { duration }
}

/// Iterator over the events of a code string, produced on demand.
#[derive(Debug, Clone)]
pub struct EventStream<'a> {
    code: &'a str,
    timing: Timing,
    cursor: Cursor,
}

impl<'a> EventStream<'a> {
    pub fn new(code: &'a str, timing: Timing) -> Self {
        Self {
            code,
            timing,
            cursor: Cursor::default(),
        }
    }
}

impl Iterator for EventStream<'_> {
    type Item = PlaybackEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let (event, cursor) = next_event(self.code, &self.timing, self.cursor)?;
        self.cursor = cursor;
        Some(event)
    }
}

/// Shorthand for [`EventStream::new`].
pub fn events(code: &str, timing: Timing) -> EventStream<'_> {
    EventStream::new(code, timing)
}
