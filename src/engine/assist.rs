use std::time::{Duration, Instant};

pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(60);

/// Cooldown for the auto-solve assist. One gate per app, shared by every
/// puzzle, and never persisted.
#[derive(Clone, Debug)]
pub struct AssistGate {
    cooldown: Duration,
    last_used: Option<Instant>,
}

impl Default for AssistGate {
    fn default() -> Self {
        Self::new(DEFAULT_COOLDOWN)
    }
}

impl AssistGate {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            last_used: None,
        }
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    pub fn remaining(&self, now: Instant) -> Duration {
        match self.last_used {
            Some(last) => self
                .cooldown
                .saturating_sub(now.saturating_duration_since(last)),
            None => Duration::ZERO,
        }
    }

    pub fn is_available(&self, now: Instant) -> bool {
        self.remaining(now).is_zero()
    }

    pub fn is_cooling_down(&self) -> bool {
        self.last_used.is_some()
    }

    pub fn start(&mut self, now: Instant) {
        self.last_used = Some(now);
    }

    /// Periodic tick. Drops the timer once it has run out so idle ticks do no work.
    pub fn poll(&mut self, now: Instant) -> Duration {
        let remaining = self.remaining(now);
        if remaining.is_zero() && self.last_used.take().is_some() {
            log::debug!("assist cooldown finished");
        }
        remaining
    }

    /// Fraction of the cooldown already elapsed, 1.0 when available.
    pub fn progress(&self, now: Instant) -> f64 {
        if self.cooldown.is_zero() {
            return 1.0;
        }
        1.0 - self.remaining(now).as_secs_f64() / self.cooldown.as_secs_f64()
    }
}
