/// Outcome of advancing the countdown by one second.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tick {
    /// Still counting; the new remaining time in seconds.
    Remaining(u64),
    /// The period elapsed. A refresh is due and the countdown restarted at a
    /// full period.
    Elapsed,
    /// The countdown was not running.
    Inactive,
}

/// Seconds left until the next periodic quote refresh.
///
/// `remaining` never leaves `[0, period]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Countdown {
    period: u64,
    remaining: u64,
    active: bool,
}

impl Countdown {
    pub fn new(period: u64) -> Self {
        debug_assert!(period > 0);

        Self {
            period,
            remaining: period,
            active: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    /// (Re)start at a full period. Safe to call while already running.
    pub fn start(&mut self) {
        self.remaining = self.period;
        self.active = true;
    }

    /// Stop and reset to a full period. No-op when already stopped.
    pub fn stop(&mut self) {
        self.remaining = self.period;
        self.active = false;
    }

    pub fn tick(&mut self) -> Tick {
        if !self.active {
            return Tick::Inactive;
        }

        self.remaining -= 1;
        if self.remaining == 0 {
            self.remaining = self.period;
            Tick::Elapsed
        } else {
            Tick::Remaining(self.remaining)
        }
    }
}
