use std::sync::Arc;

use engine_logging::{engine_debug, engine_info};
use sitescope_core::PageRecord;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;

use crate::crawler::{external_text, fetch_html, CrawlContext};

/// Bounded FIFO of platform URLs between the scoped crawl and the pool.
///
/// The queue closes once every [`HandoffSender`] is dropped; receivers then
/// drain what is left and see `None`.
pub fn handoff_queue(capacity: usize) -> (HandoffSender, HandoffReceiver) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (
        HandoffSender { tx },
        HandoffReceiver {
            rx: Arc::new(Mutex::new(rx)),
        },
    )
}

#[derive(Debug, Clone)]
pub struct HandoffSender {
    tx: mpsc::Sender<String>,
}

impl HandoffSender {
    /// Waits for queue capacity. `false` once every receiver is gone.
    pub async fn push(&self, url: String) -> bool {
        self.tx.send(url).await.is_ok()
    }
}

/// Multi-consumer end of the queue; clones share one underlying receiver.
#[derive(Debug, Clone)]
pub struct HandoffReceiver {
    rx: Arc<Mutex<mpsc::Receiver<String>>>,
}

impl HandoffReceiver {
    /// Next URL, or `None` when the queue is closed and empty.
    pub async fn next(&self) -> Option<String> {
        self.rx.lock().await.recv().await
    }
}

/// Fixed-size set of single-page fetchers draining the handoff queue.
pub(crate) struct HandoffPool {
    workers: JoinSet<usize>,
}

impl HandoffPool {
    pub(crate) fn spawn(workers: usize, queue: HandoffReceiver, ctx: Arc<CrawlContext>) -> Self {
        let mut set = JoinSet::new();
        for id in 0..workers.max(1) {
            set.spawn(drain(id, queue.clone(), ctx.clone()));
        }
        engine_debug!("Spawned {} handoff workers", workers.max(1));
        Self { workers: set }
    }

    /// Waits for every worker to exit; returns how many records they produced.
    pub(crate) async fn join(mut self) -> usize {
        let mut produced = 0;
        while let Some(result) = self.workers.join_next().await {
            match result {
                Ok(count) => produced += count,
                Err(err) => engine_info!("Handoff worker aborted: {}", err),
            }
        }
        produced
    }
}

async fn drain(id: usize, queue: HandoffReceiver, ctx: Arc<CrawlContext>) -> usize {
    let bounds = ctx.task.content_bounds();
    let mut produced = 0;
    loop {
        let next = tokio::select! {
            _ = ctx.cancel.cancelled() => None,
            url = queue.next() => url,
        };
        let Some(url) = next else {
            break;
        };

        engine_info!("Visiting external: {}", url);
        match fetch_html(&ctx, &url).await {
            Ok(fetched) => {
                let text = external_text(fetched, bounds);
                ctx.results.push(PageRecord::external(url, text));
                produced += 1;
            }
            Err(err) => engine_debug!("Skipping external {}: {}", url, err),
        }
    }
    engine_debug!("Handoff worker {} exiting after {} pages", id, produced);
    produced
}
