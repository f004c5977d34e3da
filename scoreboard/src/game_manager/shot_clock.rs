use super::timer::Timer;
use derivative::Derivative;
use scoreboard_common::{config::Game as GameConfig, game_snapshot::ShotClockSnapshot};
use serde::{Deserialize, Serialize};
use tokio::time::Duration;

#[derive(Derivative, Serialize, Deserialize)]
#[derivative(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ResetLength {
    #[derivative(Default)]
    Full,
    Partial,
}

/// A [`Timer`] that latches a violation when it runs out. While the violation is latched the
/// clock is stopped and refuses to start until it is reset or stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShotClock {
    timer: Timer,
    violation: bool,
    full: Duration,
    partial: Duration,
}

impl ShotClock {
    pub fn new(config: &GameConfig) -> Self {
        let full = config.shot_clock_full_duration();
        Self {
            timer: Timer::new(full),
            violation: false,
            full,
            partial: config.shot_clock_partial_duration(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_running()
    }

    pub fn in_violation(&self) -> bool {
        self.violation
    }

    pub fn remaining(&self) -> Duration {
        self.timer.remaining()
    }

    // Returns true if the clock was started. Never starts while a violation is latched.
    pub fn start(&mut self) -> bool {
        if self.violation {
            false
        } else {
            self.timer.start()
        }
    }

    pub fn stop(&mut self) {
        self.violation = false;
        self.timer.stop();
    }

    /// Clears any violation. Coming out of a violation the clock stays stopped, otherwise the
    /// running state is kept.
    pub fn reset(&mut self, length: ResetLength) {
        self.violation = false;
        self.timer.reset(match length {
            ResetLength::Full => self.full,
            ResetLength::Partial => self.partial,
        });
    }

    /// Returns `true` exactly when this tick caused a violation
    pub fn tick(&mut self, elapsed: Duration) -> bool {
        if self.timer.tick(elapsed) && !self.violation {
            self.latch_violation();
            true
        } else {
            false
        }
    }

    /// Returns `false` if a violation was already latched
    pub fn force_violation(&mut self) -> bool {
        if self.violation {
            false
        } else {
            self.latch_violation();
            true
        }
    }

    fn latch_violation(&mut self) {
        self.timer.stop();
        self.violation = true;
    }

    pub fn as_snapshot(&self) -> ShotClockSnapshot {
        let timer = self.timer.as_snapshot();
        ShotClockSnapshot {
            remaining: timer.remaining,
            running: timer.running,
            capacity: timer.capacity,
            violation: self.violation,
        }
    }
}
