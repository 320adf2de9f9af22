use std::time::Duration;

/// A single pending iteration, counted down by the host's frame clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IterationTimer {
    remaining: Duration,
}

impl IterationTimer {
    pub fn new(delay: Duration) -> Self {
        IterationTimer { remaining: delay }
    }

    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    /// Advance the countdown; returns true once the delay has fully elapsed
    pub fn tick(&mut self, delta: Duration) -> bool {
        self.remaining = self.remaining.saturating_sub(delta);
        self.remaining.is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once_delay_elapsed() {
        let mut timer = IterationTimer::new(Duration::from_millis(1000));

        assert!(!timer.tick(Duration::from_millis(400)));
        assert!(!timer.tick(Duration::from_millis(599)));
        assert_eq!(timer.remaining(), Duration::from_millis(1));
        assert!(timer.tick(Duration::from_millis(16)));
    }
}
