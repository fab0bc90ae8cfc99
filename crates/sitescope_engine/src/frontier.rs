use dashmap::DashSet;

/// Every URL ever claimed during one crawl. Entries are never removed.
#[derive(Debug, Default)]
pub(crate) struct Frontier {
    claimed: DashSet<String>,
}

impl Frontier {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// First caller for a given URL gets `true`; every later caller gets `false`.
    ///
    /// Check and insert happen under one shard lock. Blank input is refused
    /// without touching the set.
    pub(crate) fn claim(&self, url: &str) -> bool {
        let url = url.trim();
        if url.is_empty() {
            return false;
        }
        self.claimed.insert(url.to_string())
    }

    pub(crate) fn len(&self) -> usize {
        self.claimed.len()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Barrier};
    use std::thread;

    use super::Frontier;

    #[test]
    fn second_claim_is_refused() {
        let frontier = Frontier::new();
        assert!(frontier.claim("http://example.com/a"));
        assert!(!frontier.claim("http://example.com/a"));
        assert!(frontier.claim("http://example.com/b"));
        assert_eq!(frontier.len(), 2);
    }

    #[test]
    fn blank_urls_never_mutate_state() {
        let frontier = Frontier::new();
        assert!(!frontier.claim(""));
        assert!(!frontier.claim("   "));
        assert_eq!(frontier.len(), 0);
    }

    #[test]
    fn concurrent_claims_have_exactly_one_winner() {
        const THREADS: usize = 16;
        for round in 0..50 {
            let frontier = Arc::new(Frontier::new());
            let barrier = Arc::new(Barrier::new(THREADS));
            let winners = Arc::new(AtomicUsize::new(0));
            let url = format!("http://example.com/page/{round}");

            let handles: Vec<_> = (0..THREADS)
                .map(|_| {
                    let frontier = frontier.clone();
                    let barrier = barrier.clone();
                    let winners = winners.clone();
                    let url = url.clone();
                    thread::spawn(move || {
                        barrier.wait();
                        if frontier.claim(&url) {
                            winners.fetch_add(1, Ordering::SeqCst);
                        }
                    })
                })
                .collect();
            for handle in handles {
                handle.join().unwrap();
            }

            assert_eq!(winners.load(Ordering::SeqCst), 1, "round {round}");
            assert!(!frontier.claim(&url));
        }
    }
}
