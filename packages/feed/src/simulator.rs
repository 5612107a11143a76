//! Timing for the background feed simulator.

use std::time::Duration;

use rand::Rng;

/// Shortest pause between simulated incidents.
pub const MIN_INTERVAL_MS: u64 = 10_000;

/// Longest pause between simulated incidents.
pub const MAX_INTERVAL_MS: u64 = 15_000;

/// Draws the pause before the next simulated incident.
#[must_use]
pub fn next_interval() -> Duration {
    let mut rng = rand::thread_rng();
    Duration::from_millis(rng.gen_range(MIN_INTERVAL_MS..MAX_INTERVAL_MS))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_stays_in_bounds() {
        for _ in 0..100 {
            let interval = next_interval();
            assert!(interval >= Duration::from_millis(MIN_INTERVAL_MS));
            assert!(interval < Duration::from_millis(MAX_INTERVAL_MS));
        }
    }
}
