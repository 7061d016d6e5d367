use crate::consts;
use std::time::Duration;

/// Speed level and the effective interval between ticks
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Pace {
    speed_level: u32,
    interval: Duration,
    /// The interval in effect when the slow effect started, restored when it
    /// ends
    slow_restore: Option<Duration>,
}

impl Pace {
    pub(crate) fn new() -> Pace {
        Pace {
            speed_level: 0,
            interval: consts::INITIAL_INTERVAL,
            slow_restore: None,
        }
    }

    pub(crate) fn speed_level(&self) -> u32 {
        self.speed_level
    }

    /// The interval to wait before the next tick
    pub(crate) fn interval(&self) -> Duration {
        self.interval
    }

    /// Score that must be exceeded to reach the next speed level
    pub(crate) fn next_threshold(&self) -> u32 {
        consts::SPEED_THRESHOLD.saturating_mul(self.speed_level.saturating_add(1))
    }

    /// Raise the speed level by one if `score` has passed the next threshold.
    /// Returns whether it did.
    pub(crate) fn check_speed_up(&mut self, score: u32) -> bool {
        if score > self.next_threshold() {
            self.speed_level += 1;
            self.interval = self
                .interval
                .saturating_sub(consts::SPEED_STEP)
                .max(consts::MIN_INTERVAL);
            true
        } else {
            false
        }
    }

    /// Stretch the interval for the slow effect, remembering the current one.
    /// Does nothing if the interval is already stretched.
    pub(crate) fn slow_down(&mut self) {
        if self.slow_restore.is_none() {
            self.slow_restore = Some(self.interval);
            self.interval = (self.interval * 3 / 2).min(consts::MAX_SLOW_INTERVAL);
        }
    }

    /// Put back the interval that was in effect when the slow effect started
    pub(crate) fn restore(&mut self) {
        if let Some(interval) = self.slow_restore.take() {
            self.interval = interval;
        }
    }
}
