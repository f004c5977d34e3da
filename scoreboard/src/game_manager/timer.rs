use scoreboard_common::game_snapshot::TimerSnapshot;
use tokio::time::Duration;

/// A countdown that only moves when ticked while running
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timer {
    remaining: Duration,
    running: bool,
    capacity: Duration,
}

impl Timer {
    /// Starts full and stopped
    pub fn new(capacity: Duration) -> Self {
        Self {
            remaining: capacity,
            running: false,
            capacity,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    pub fn capacity(&self) -> Duration {
        self.capacity
    }

    pub fn is_expired(&self) -> bool {
        self.remaining.is_zero()
    }

    // Returns true if the timer was started, false if it was already running
    pub fn start(&mut self) -> bool {
        if self.running {
            false
        } else {
            self.running = true;
            true
        }
    }

    // Returns true if the timer was stopped, false if it was already stopped
    pub fn stop(&mut self) -> bool {
        if self.running {
            self.running = false;
            true
        } else {
            false
        }
    }

    /// Leaves the running state untouched
    pub fn reset(&mut self, to: Duration) {
        self.remaining = to.min(self.capacity);
    }

    pub fn set_capacity(&mut self, capacity: Duration) {
        self.capacity = capacity;
        self.remaining = self.remaining.min(capacity);
    }

    /// Returns `true` if the timer is running and sits at zero after this tick. The timer is
    /// never stopped here, that is left to the owner.
    pub fn tick(&mut self, elapsed: Duration) -> bool {
        if !self.running {
            return false;
        }
        self.remaining = self.remaining.saturating_sub(elapsed);
        self.remaining.is_zero()
    }

    pub fn as_snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            remaining: self.remaining,
            running: self.running,
            capacity: self.capacity,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_start_stop() {
        let mut timer = Timer::new(Duration::from_secs(720));
        assert!(!timer.is_running());
        assert!(timer.start());
        assert!(!timer.start());
        assert!(timer.is_running());
        assert!(timer.stop());
        assert!(!timer.stop());
        assert!(!timer.is_running());
        assert_eq!(timer.remaining(), Duration::from_secs(720));
    }

    #[test]
    fn test_tick_only_while_running() {
        let mut timer = Timer::new(Duration::from_secs(10));
        assert!(!timer.tick(Duration::from_secs(3)));
        assert_eq!(timer.remaining(), Duration::from_secs(10));

        timer.start();
        assert!(!timer.tick(Duration::from_millis(2_500)));
        assert_eq!(timer.remaining(), Duration::from_millis(7_500));

        timer.stop();
        timer.tick(Duration::from_secs(1));
        assert_eq!(timer.remaining(), Duration::from_millis(7_500));
    }

    #[test]
    fn test_tick_floors_at_zero() {
        let mut timer = Timer::new(Duration::from_secs(1));
        timer.start();
        assert!(timer.tick(Duration::from_secs(2)));
        assert_eq!(timer.remaining(), Duration::ZERO);
        assert!(timer.is_expired());
        // Reaching zero does not stop the timer, and it never goes back up
        assert!(timer.is_running());
        assert!(timer.tick(Duration::from_secs(1)));
        assert_eq!(timer.remaining(), Duration::ZERO);
    }

    #[test]
    fn test_reset_clamps_and_keeps_running_state() {
        let mut timer = Timer::new(Duration::from_secs(24));
        timer.start();
        timer.tick(Duration::from_secs(20));
        timer.reset(Duration::from_secs(14));
        assert_eq!(timer.remaining(), Duration::from_secs(14));
        assert!(timer.is_running());

        timer.reset(Duration::from_secs(99));
        assert_eq!(timer.remaining(), Duration::from_secs(24));

        timer.stop();
        timer.reset(Duration::ZERO);
        assert!(!timer.is_running());
        assert!(timer.is_expired());
    }

    #[test]
    fn test_set_capacity() {
        let mut timer = Timer::new(Duration::from_secs(720));
        timer.set_capacity(Duration::from_secs(300));
        assert_eq!(timer.remaining(), Duration::from_secs(300));
        timer.set_capacity(Duration::from_secs(720));
        assert_eq!(timer.remaining(), Duration::from_secs(300));
        assert_eq!(timer.capacity(), Duration::from_secs(720));
    }

    #[test]
    fn test_as_snapshot() {
        let mut timer = Timer::new(Duration::from_secs(24));
        timer.start();
        timer.tick(Duration::from_millis(100));
        assert_eq!(
            timer.as_snapshot(),
            TimerSnapshot {
                remaining: Duration::from_millis(23_900),
                running: true,
                capacity: Duration::from_secs(24),
            }
        );
    }
}
