use web_time::Instant;

use crate::Millis;

/// Monotonic game clock, usable both natively and in the browser.
#[derive(Copy, Clone, Debug)]
pub struct GameClock {
    started_at: Instant,
}

impl GameClock {
    pub fn start() -> Self {
        Self {
            started_at: Instant::now(),
        }
    }

    /// Milliseconds since the clock started.
    pub fn now(&self) -> Millis {
        self.started_at
            .elapsed()
            .as_millis()
            .try_into()
            .unwrap_or(Millis::MAX)
    }
}

impl Default for GameClock {
    fn default() -> Self {
        Self::start()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_is_monotonic() {
        let clock = GameClock::start();
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
    }
}
