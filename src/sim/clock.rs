//! Round countdown
//!
//! Turns elapsed simulated time into remaining whole seconds and a terminal
//! game-over flag.

use serde::{Deserialize, Serialize};

use crate::consts::GAME_OVER_GRACE_SECS;

/// Lifecycle of a single round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Countdown running, shots count
    Running,
    /// Round finished (terminal until reset)
    Over,
}

/// Snapshot returned by every clock tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoundState {
    pub elapsed_secs: f64,
    pub time_left_secs: u32,
    pub game_over: bool,
}

/// Fixed-duration round clock
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundClock {
    duration_secs: u32,
    elapsed_secs: f64,
    phase: RoundPhase,
}

impl RoundClock {
    pub fn new(duration_secs: u32) -> Self {
        Self {
            duration_secs,
            elapsed_secs: 0.0,
            phase: RoundPhase::Running,
        }
    }

    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn is_over(&self) -> bool {
        self.phase == RoundPhase::Over
    }

    /// Sample the clock with the time elapsed since round start.
    ///
    /// Negative or NaN samples count as zero and a sample earlier than one
    /// already seen is ignored, so remaining time never goes back up.
    pub fn tick(&mut self, elapsed_secs: f64) -> RoundState {
        // f64::max drops NaN
        let elapsed = elapsed_secs.max(0.0);
        if elapsed > self.elapsed_secs {
            self.elapsed_secs = elapsed;
        }

        if self.phase == RoundPhase::Running
            && self.elapsed_secs > self.duration_secs as f64 + GAME_OVER_GRACE_SECS
        {
            self.phase = RoundPhase::Over;
            log::info!(
                "Round over after {:.2}s ({}s round)",
                self.elapsed_secs,
                self.duration_secs
            );
        }

        self.state()
    }

    /// Current state without advancing
    pub fn state(&self) -> RoundState {
        let game_over = self.is_over();
        let time_left_secs = if game_over {
            0
        } else {
            let left = self.duration_secs as f64 - self.elapsed_secs.floor();
            left.clamp(0.0, self.duration_secs as f64) as u32
        };

        RoundState {
            elapsed_secs: self.elapsed_secs,
            time_left_secs,
            game_over,
        }
    }

    /// Start a fresh round with the same duration
    pub fn reset(&mut self) {
        self.elapsed_secs = 0.0;
        self.phase = RoundPhase::Running;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_starts_running_with_full_time() {
        let mut clock = RoundClock::new(10);
        let state = clock.tick(0.0);
        assert_eq!(state.time_left_secs, 10);
        assert!(!state.game_over);
        assert_eq!(clock.phase(), RoundPhase::Running);
    }

    #[test]
    fn test_grace_second_before_game_over() {
        let mut clock = RoundClock::new(10);

        let state = clock.tick(10.9);
        assert_eq!(state.time_left_secs, 0);
        assert!(!state.game_over);

        let state = clock.tick(11.0);
        assert!(!state.game_over, "boundary itself is not past the grace");

        let state = clock.tick(11.1);
        assert!(state.game_over);
        assert_eq!(state.time_left_secs, 0);
    }

    #[test]
    fn test_over_is_terminal() {
        let mut clock = RoundClock::new(10);
        clock.tick(12.0);
        assert!(clock.is_over());

        // Earlier sample cannot revive the round
        let state = clock.tick(1.0);
        assert!(state.game_over);
        assert_eq!(state.time_left_secs, 0);
    }

    #[test]
    fn test_negative_and_nan_clamp() {
        let mut clock = RoundClock::new(10);
        assert_eq!(clock.tick(-3.5).time_left_secs, 10);
        assert_eq!(clock.tick(f64::NAN).time_left_secs, 10);
        assert!(!clock.is_over());
    }

    #[test]
    fn test_reset_restarts_round() {
        let mut clock = RoundClock::new(5);
        clock.tick(100.0);
        assert!(clock.is_over());

        clock.reset();
        let state = clock.state();
        assert!(!state.game_over);
        assert_eq!(state.time_left_secs, 5);
        assert_eq!(state.elapsed_secs, 0.0);
    }

    proptest! {
        #[test]
        fn prop_countdown_within_round(duration in 1u32..600, frac in 0.0f64..=1.0) {
            let elapsed = duration as f64 * frac;
            let mut clock = RoundClock::new(duration);
            let state = clock.tick(elapsed);
            prop_assert_eq!(state.time_left_secs, duration - elapsed.floor() as u32);
            prop_assert!(!state.game_over);
        }

        #[test]
        fn prop_game_over_sticks(duration in 1u32..600, past in 0.001f64..1000.0, later in proptest::collection::vec(-50.0f64..2000.0, 0..16)) {
            let mut clock = RoundClock::new(duration);
            prop_assert!(clock.tick(duration as f64 + 1.0 + past).game_over);
            for elapsed in later {
                let state = clock.tick(elapsed);
                prop_assert!(state.game_over);
                prop_assert_eq!(state.time_left_secs, 0);
            }
        }

        #[test]
        fn prop_time_left_never_increases(duration in 1u32..120, samples in proptest::collection::vec(-10.0f64..200.0, 1..32)) {
            let mut clock = RoundClock::new(duration);
            let mut last = clock.state().time_left_secs;
            for elapsed in samples {
                let state = clock.tick(elapsed);
                prop_assert!(state.time_left_secs <= last);
                last = state.time_left_secs;
            }
        }
    }
}
