use std::sync::{Mutex, PoisonError};

use sitescope_core::{PageRecord, ResultSet};

/// Append-only record sink shared by the crawl workers and the handoff pool.
#[derive(Debug, Default)]
pub struct ResultAggregator {
    records: Mutex<Vec<PageRecord>>,
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, record: PageRecord) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record);
    }

    /// Moves everything collected so far into a [`ResultSet`].
    pub fn take(&self) -> ResultSet {
        let mut records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        ResultSet::new(std::mem::take(&mut *records))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use sitescope_core::PageRecord;

    use super::ResultAggregator;

    #[test]
    fn concurrent_pushes_are_all_kept() {
        let aggregator = Arc::new(ResultAggregator::new());
        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let aggregator = aggregator.clone();
                thread::spawn(move || {
                    for page in 0..25 {
                        aggregator.push(PageRecord::same_domain(
                            format!("http://example.com/{worker}/{page}"),
                            "",
                        ));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let results = aggregator.take();
        assert_eq!(results.len(), 200);
        assert!(aggregator.take().is_empty());
    }
}
