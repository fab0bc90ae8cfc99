use engine_logging::engine_info;
use sitescope_core::{CrawlTask, ResultSet};
use tokio_util::sync::CancellationToken;

use crate::crawler::Crawler;

/// One way of acquiring page content for a task.
#[async_trait::async_trait]
pub trait ContentSource: Send + Sync {
    fn name(&self) -> &str;

    async fn acquire(&self, task: &CrawlTask, cancel: CancellationToken) -> ResultSet;
}

#[async_trait::async_trait]
impl ContentSource for Crawler {
    fn name(&self) -> &str {
        "crawler"
    }

    async fn acquire(&self, task: &CrawlTask, cancel: CancellationToken) -> ResultSet {
        self.crawl_with_cancel(task, cancel).await
    }
}

/// Ordered content sources; later ones only run when earlier ones came back empty.
///
/// Slower strategies such as a headless renderer belong at the end.
#[derive(Default)]
pub struct AcquisitionChain {
    sources: Vec<Box<dyn ContentSource>>,
}

impl AcquisitionChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, source: impl ContentSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub async fn acquire(&self, task: &CrawlTask, cancel: CancellationToken) -> ResultSet {
        for source in &self.sources {
            if cancel.is_cancelled() {
                break;
            }
            let results = source.acquire(task, cancel.clone()).await;
            if !results.is_empty() {
                return results;
            }
            engine_info!("{} found no pages for {}", source.name(), task.seed());
        }
        ResultSet::default()
    }
}
