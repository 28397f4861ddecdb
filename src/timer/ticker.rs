use std::time::{Duration, Instant};

/// Periodic tick source driven by the event loop's clock.
///
/// The loop polls far more often than once per period; `due` reports how
/// many whole periods elapsed since the previous call so no tick is lost
/// when a frame takes long.
#[derive(Clone, Debug)]
pub struct Ticker {
    period: Duration,
    next_due: Instant,
}

impl Ticker {
    pub fn new(now: Instant, period: Duration) -> Self {
        Self {
            period,
            next_due: now + period,
        }
    }

    pub fn due(&mut self, now: Instant) -> u32 {
        let mut count = 0;
        while now >= self.next_due {
            count += 1;
            self.next_due += self.period;
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nothing_due_before_first_period() {
        let start = Instant::now();
        let mut ticker = Ticker::new(start, Duration::from_secs(1));
        assert_eq!(ticker.due(start), 0);
        assert_eq!(ticker.due(start + Duration::from_millis(999)), 0);
    }

    #[test]
    fn catches_up_on_late_polls() {
        let start = Instant::now();
        let mut ticker = Ticker::new(start, Duration::from_secs(1));
        assert_eq!(ticker.due(start + Duration::from_millis(3500)), 3);
        assert_eq!(ticker.due(start + Duration::from_millis(3900)), 0);
        assert_eq!(ticker.due(start + Duration::from_secs(4)), 1);
    }
}
