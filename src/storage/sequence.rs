use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonically increasing identifier counter, restartable to its start
/// value. Values handed out are never reused within a generation cycle;
/// restarting begins a new cycle.
#[derive(Debug)]
pub struct Sequence {
    start: u64,
    next: AtomicU64,
}

impl Sequence {
    /// Create a sequence whose first value is `start`
    pub fn new(start: u64) -> Self {
        Self {
            start,
            next: AtomicU64::new(start),
        }
    }

    /// Hand out the next value
    pub fn next_val(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }

    /// Restart at the configured start value
    pub fn restart(&self) {
        self.next.store(self.start, Ordering::Relaxed);
    }
}

impl Default for Sequence {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn starts_at_start_value() {
        let seq = Sequence::new(1);
        assert_eq!(seq.next_val(), 1);
        assert_eq!(seq.next_val(), 2);
    }

    #[test]
    fn restart_returns_to_start_value() {
        let seq = Sequence::new(1);
        for _ in 0..100 {
            seq.next_val();
        }
        seq.restart();
        assert_eq!(seq.next_val(), 1);
    }

    #[test]
    fn custom_start_value() {
        let seq = Sequence::new(500);
        assert_eq!(seq.next_val(), 500);
        seq.restart();
        assert_eq!(seq.next_val(), 500);
    }

    #[test]
    fn concurrent_values_are_unique() {
        let seq = Arc::new(Sequence::default());

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let seq = Arc::clone(&seq);
                thread::spawn(move || (0..1000).map(|_| seq.next_val()).collect::<Vec<_>>())
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for value in handle.join().unwrap() {
                assert!(seen.insert(value), "duplicate id {value}");
            }
        }
        assert_eq!(seen.len(), 4000);
    }
}
