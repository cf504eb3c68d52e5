/// Locally-unique survey ids for `submit` calls.
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use alloy_primitives::U256;

/// Millisecond-timestamp ids, strictly increasing within the process even when
/// several ids are drawn in the same millisecond.
#[derive(Debug, Default)]
pub struct SurveyIdGenerator {
    last: AtomicU64,
}

impl SurveyIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self) -> U256 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        let mut prev = self.last.load(Ordering::Relaxed);
        loop {
            let next = now.max(prev + 1);
            match self
                .last
                .compare_exchange_weak(prev, next, Ordering::Relaxed, Ordering::Relaxed)
            {
                Ok(_) => return U256::from(next),
                Err(actual) => prev = actual,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn ids_are_strictly_increasing() {
        let ids = SurveyIdGenerator::new();
        let mut prev = ids.next_id();
        for _ in 0..1000 {
            let id = ids.next_id();
            assert!(id > prev);
            prev = id;
        }
    }

    #[test]
    fn ids_are_unique_across_threads() {
        let ids = std::sync::Arc::new(SurveyIdGenerator::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let ids = ids.clone();
                std::thread::spawn(move || (0..250).map(|_| ids.next_id()).collect::<Vec<_>>())
            })
            .collect();
        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(seen.insert(id), "duplicate survey id {id}");
            }
        }
        assert_eq!(seen.len(), 1000);
    }

    #[test]
    fn ids_track_wall_clock() {
        let now_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_millis() as u64;
        assert!(SurveyIdGenerator::new().next_id() >= U256::from(now_ms));
    }
}
