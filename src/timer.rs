use log::debug;
use std::time::Duration;

/// Proof that a tick was due under a particular schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickToken {
    generation: u64,
}

/// A cancellable repeating schedule driven by frame time.
///
/// Restarting replaces the schedule wholesale, so at most one tick is ever due
/// and tokens handed out before a restart are no longer current.
#[derive(Debug, Clone)]
pub struct TickTimer {
    interval: Duration,
    elapsed: Duration,
    running: bool,
    generation: u64,
}

impl TickTimer {
    pub fn new(interval: Duration) -> Self {
        TickTimer {
            interval,
            elapsed: Duration::ZERO,
            running: false,
            generation: 0,
        }
    }

    pub fn start(&mut self, interval: Duration) {
        self.interval = interval;
        self.elapsed = Duration::ZERO;
        self.running = true;
        self.generation += 1;
        debug!("Tick schedule {} every {:?}", self.generation, interval);
    }

    /// Restarts the phase at the current interval.
    pub fn restart(&mut self) {
        self.start(self.interval);
    }

    /// Changes the interval, restarting the phase only if the timer is running.
    pub fn reschedule(&mut self, interval: Duration) {
        if self.running {
            self.start(interval);
        } else {
            self.interval = interval;
        }
    }

    pub fn cancel(&mut self) {
        self.running = false;
        self.elapsed = Duration::ZERO;
        self.generation += 1;
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_current(&self, token: TickToken) -> bool {
        self.running && token.generation == self.generation
    }

    /// Advances by `dt` and returns a token if a tick is due.
    pub fn poll(&mut self, dt: Duration) -> Option<TickToken> {
        if !self.running {
            return None;
        }
        self.elapsed += dt;
        if self.elapsed < self.interval {
            return None;
        }
        self.elapsed -= self.interval;
        // Long frames drop the backlog rather than replaying it.
        if self.elapsed >= self.interval {
            self.elapsed = Duration::ZERO;
        }
        Some(TickToken {
            generation: self.generation,
        })
    }
}
