// ── Year time-lapse sequencer ──
//
// The pure half of playback: an ordered ascending sequence of distinct
// known years and a Stopped/Playing(index) state machine. The timer that
// drives `tick()` lives in the Explorer, so this stays unit-testable
// without a runtime.

use serde::Serialize;

/// Externally visible playback status, for a play/pause control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PlaybackStatus {
    Stopped,
    Playing { year: u16 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Stopped,
    Playing { index: usize },
}

/// Steps the year dimension through every known year in order.
#[derive(Debug, Clone)]
pub struct Playback {
    years: Vec<u16>,
    state: State,
}

impl Playback {
    /// `years` must be the distinct ascending sequence from the year
    /// index; empty when the year dimension is disabled.
    pub fn new(years: Vec<u16>) -> Self {
        debug_assert!(years.windows(2).all(|w| w[0] < w[1]));
        Self {
            years,
            state: State::Stopped,
        }
    }

    pub fn is_playing(&self) -> bool {
        matches!(self.state, State::Playing { .. })
    }

    pub fn status(&self) -> PlaybackStatus {
        match self.state {
            State::Stopped => PlaybackStatus::Stopped,
            State::Playing { index } => PlaybackStatus::Playing {
                // Playing(index) always holds an in-range index.
                year: self.years[index],
            },
        }
    }

    /// Begin playback at the first known year. Restarting while playing
    /// resets to the beginning (the caller stops its timer first).
    /// Returns the first year to apply, or `None` when there are no
    /// known years and playback cannot run.
    pub fn start(&mut self) -> Option<u16> {
        self.stop();
        let first = *self.years.first()?;
        self.state = State::Playing { index: 0 };
        Some(first)
    }

    /// Advance one step. Returns the next year to apply, or `None` when
    /// the sequence is exhausted (the machine is then Stopped).
    pub fn tick(&mut self) -> Option<u16> {
        let State::Playing { index } = self.state else {
            return None;
        };
        let next = index + 1;
        match self.years.get(next) {
            Some(&year) => {
                self.state = State::Playing { index: next };
                Some(year)
            }
            None => {
                self.stop();
                None
            }
        }
    }

    /// Return to Stopped. Idempotent.
    pub fn stop(&mut self) {
        self.state = State::Stopped;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_begins_at_first_year() {
        let mut playback = Playback::new(vec![2010, 2012, 2015]);
        assert_eq!(playback.start(), Some(2010));
        assert_eq!(playback.status(), PlaybackStatus::Playing { year: 2010 });
    }

    #[test]
    fn ticks_walk_the_sequence_then_stop() {
        let mut playback = Playback::new(vec![2010, 2012]);
        playback.start();
        assert_eq!(playback.tick(), Some(2012));
        assert_eq!(playback.tick(), None);
        assert_eq!(playback.status(), PlaybackStatus::Stopped);
    }

    #[test]
    fn restart_resets_to_first_year_not_double_advance() {
        let mut playback = Playback::new(vec![2010, 2012, 2015]);
        playback.start();
        playback.tick();
        // Second start must land on the first year again.
        assert_eq!(playback.start(), Some(2010));
        assert_eq!(playback.status(), PlaybackStatus::Playing { year: 2010 });
    }

    #[test]
    fn start_with_no_known_years_is_a_no_op() {
        let mut playback = Playback::new(vec![]);
        assert_eq!(playback.start(), None);
        assert_eq!(playback.status(), PlaybackStatus::Stopped);
    }

    #[test]
    fn stop_is_idempotent() {
        let mut playback = Playback::new(vec![2010]);
        playback.start();
        playback.stop();
        playback.stop();
        assert_eq!(playback.status(), PlaybackStatus::Stopped);
        assert_eq!(playback.tick(), None);
    }
}
