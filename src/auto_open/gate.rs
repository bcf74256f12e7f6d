//! Fixed-interval sampler over host ticks.

/// Lets every `interval`-th tick through.
#[derive(Debug, Clone)]
pub struct TickGate {
    interval: u32,
    counter: u64,
}

impl TickGate {
    /// Creates a gate passing once per `interval` ticks (an interval of zero is treated as one).
    pub fn new(interval: u32) -> Self {
        Self {
            interval: interval.max(1),
            counter: 0,
        }
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn interval(&self) -> u32 {
        self.interval
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn ticks_seen(&self) -> u64 {
        self.counter
    }

    /// Changes the interval without resetting the running count.
    pub fn set_interval(&mut self, interval: u32) {
        self.interval = interval.max(1);
    }

    /// Counts one tick and reports whether the check should run now.
    pub fn advance(&mut self) -> bool {
        self.counter = self.counter.wrapping_add(1);
        self.counter % u64::from(self.interval) == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_every_kth_tick() {
        let mut gate = TickGate::new(30);
        let passed: Vec<u64> = (1..=90).filter(|_| gate.advance()).collect();
        assert_eq!(passed.len(), 3);
        assert_eq!(gate.ticks_seen(), 90);
    }

    #[test]
    fn first_pass_lands_on_the_interval() {
        let mut gate = TickGate::new(60);
        for _ in 0..59 {
            assert!(!gate.advance());
        }
        assert!(gate.advance());
    }

    #[test]
    fn zero_interval_behaves_like_one() {
        let mut gate = TickGate::new(0);
        assert_eq!(gate.interval(), 1);
        assert!(gate.advance());
        assert!(gate.advance());
    }
}
