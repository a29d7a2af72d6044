use crate::meter::{Metric, Reading};

/// Remembers the last published value per metric and flags what changed.
/// Starts from all zeros at process start and is never reset.
pub struct ChangeTracker {
    last: Reading,
}

impl ChangeTracker {
    pub fn new() -> Self {
        ChangeTracker {
            last: Reading::default(),
        }
    }

    /// Compare the new reading against the tracked values using exact
    /// equality on the scaled value and return the metrics that differ,
    /// committing the new values immediately. A failed publish is never
    /// rolled back; the next differing value is the only corrective signal.
    pub fn changed(&mut self, reading: &Reading) -> Vec<(Metric, f64)> {
        let mut changed = Vec::new();
        for metric in Metric::ALL {
            let value = reading.get(metric);
            if value != self.last.get(metric) {
                changed.push((metric, value));
            }
        }
        self.last = *reading;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_reading() -> Reading {
        Reading {
            consumed: 1234.56,
            frequency: 50.03,
            voltage: 231.3,
            current: 0.98,
            power: 100.0,
            power_factor: 0.95,
        }
    }

    #[test]
    fn first_nonzero_reading_changes_everything() {
        let mut tracker = ChangeTracker::new();
        let changed = tracker.changed(&sample_reading());
        assert_eq!(changed.len(), 6);
    }

    #[test]
    fn unchanged_reading_changes_nothing() {
        let mut tracker = ChangeTracker::new();
        tracker.changed(&sample_reading());
        assert!(tracker.changed(&sample_reading()).is_empty());
        assert!(tracker.changed(&sample_reading()).is_empty());
    }

    #[test]
    fn single_power_change_flags_only_power() {
        let mut tracker = ChangeTracker::new();
        tracker.changed(&sample_reading());

        let mut next = sample_reading();
        next.power = 105.0;
        let changed = tracker.changed(&next);
        assert_eq!(changed, vec![(Metric::Power, 105.0)]);
    }

    #[test]
    fn zero_reading_after_nonzero_changes_everything() {
        // A degraded cycle flows through the same change detection:
        // dropping to the all-zero sentinel publishes the zeros.
        let mut tracker = ChangeTracker::new();
        tracker.changed(&sample_reading());
        let changed = tracker.changed(&Reading::default());
        assert_eq!(changed.len(), 6);
        assert!(changed.iter().all(|&(_, v)| v == 0.0));
    }

    #[test]
    fn values_commit_regardless_of_publish_outcome() {
        // The tracker has no notion of publish success; once a value is
        // reported as changed it is the new baseline.
        let mut tracker = ChangeTracker::new();
        tracker.changed(&sample_reading());
        assert!(tracker.changed(&sample_reading()).is_empty());
    }

    #[test]
    fn all_zero_start_suppresses_zero_metrics() {
        let mut tracker = ChangeTracker::new();
        let reading = Reading {
            voltage: 230.0,
            ..Reading::default()
        };
        let changed = tracker.changed(&reading);
        assert_eq!(changed, vec![(Metric::Voltage, 230.0)]);
    }
}
