use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use engine_logging::{engine_debug, engine_info, engine_warn};
use sitescope_core::{clean, CrawlTask, LengthBounds, PageRecord, ResultSet};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::aggregate::ResultAggregator;
use crate::decode::decode_body;
use crate::extract::EventFieldExtractor;
use crate::fetch::{FetchSettings, Fetcher, ReqwestFetcher};
use crate::frontier::Frontier;
use crate::handoff::{handoff_queue, HandoffPool, HandoffSender};
use crate::page::ParsedPage;
use crate::{FailureKind, FetchError};

/// State shared by every worker of one crawl invocation.
pub(crate) struct CrawlContext {
    pub(crate) task: CrawlTask,
    pub(crate) fetcher: Arc<dyn Fetcher>,
    pub(crate) frontier: Frontier,
    pub(crate) results: ResultAggregator,
    pub(crate) extractor: EventFieldExtractor,
    pub(crate) cancel: CancellationToken,
}

impl CrawlContext {
    fn new(task: CrawlTask, fetcher: Arc<dyn Fetcher>, cancel: CancellationToken) -> Self {
        Self {
            task,
            fetcher,
            frontier: Frontier::new(),
            results: ResultAggregator::new(),
            extractor: EventFieldExtractor::new(),
            cancel,
        }
    }
}

pub(crate) struct FetchedHtml {
    pub(crate) html: String,
    pub(crate) base: Url,
}

/// Links discovered on one page that won their claim.
#[derive(Debug, Default)]
struct Discovered {
    follow: Vec<String>,
    handoff: Vec<String>,
}

/// Keyword-scoped crawler for a single allowed domain.
#[derive(Clone)]
pub struct Crawler {
    fetcher: Arc<dyn Fetcher>,
}

impl Crawler {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self { fetcher }
    }

    /// Crawler over HTTP with the task's per-request timeout.
    pub fn for_task(task: &CrawlTask) -> Result<Self, FetchError> {
        let fetcher = ReqwestFetcher::new(FetchSettings::for_task(task))?;
        Ok(Self::new(Arc::new(fetcher)))
    }

    /// Runs the scoped crawl and, for tasks with platform patterns, the
    /// handoff pool, returning once both have finished.
    pub async fn crawl(&self, task: &CrawlTask) -> ResultSet {
        self.crawl_with_cancel(task, CancellationToken::new()).await
    }

    pub async fn crawl_with_cancel(&self, task: &CrawlTask, cancel: CancellationToken) -> ResultSet {
        let ctx = Arc::new(CrawlContext::new(task.clone(), self.fetcher.clone(), cancel));
        engine_info!(
            "Starting {} crawl of {} (domain {})",
            task.kind(),
            task.seed(),
            task.allowed_domain()
        );

        let (sender, pool) = match task.handoff() {
            Some(settings) => {
                let (sender, receiver) = handoff_queue(settings.capacity);
                let pool = HandoffPool::spawn(settings.workers, receiver, ctx.clone());
                (Some(sender), Some(pool))
            }
            None => (None, None),
        };

        scoped_pass(ctx.clone(), sender).await;
        if let Some(pool) = pool {
            let external = pool.join().await;
            engine_info!("Handoff pool finished with {} external pages", external);
        }

        let results = ctx.results.take();
        engine_info!(
            "Finished {} crawl of {}: {} pages, {} urls claimed",
            task.kind(),
            task.seed(),
            results.len(),
            ctx.frontier.len()
        );
        results
    }

    /// Only the same-domain pass. Platform links go to `handoff`, which is
    /// closed when the pass returns; nothing drains it here.
    pub async fn scoped_crawl(
        &self,
        task: &CrawlTask,
        handoff: Option<HandoffSender>,
        cancel: CancellationToken,
    ) -> ResultSet {
        let ctx = Arc::new(CrawlContext::new(task.clone(), self.fetcher.clone(), cancel));
        scoped_pass(ctx.clone(), handoff).await;
        ctx.results.take()
    }
}

/// Same-domain pass: at most `max_parallelism` page tasks in flight, pending
/// links dispatched FIFO, done when nothing is pending or running.
async fn scoped_pass(ctx: Arc<CrawlContext>, handoff: Option<HandoffSender>) {
    let seed = ctx.task.seed().to_string();
    let limit = ctx.task.max_parallelism();
    let mut pending = VecDeque::new();
    if ctx.frontier.claim(&seed) {
        pending.push_back(seed);
    }

    let mut in_flight = JoinSet::new();
    let mut dispatched = 0usize;
    loop {
        while in_flight.len() < limit {
            if ctx.cancel.is_cancelled() {
                if !pending.is_empty() {
                    engine_info!("Crawl cancelled, dropping {} pending urls", pending.len());
                }
                pending.clear();
                break;
            }
            let Some(url) = pending.pop_front() else {
                break;
            };
            in_flight.spawn(visit(ctx.clone(), url, handoff.clone()));
            dispatched += 1;
        }

        match in_flight.join_next().await {
            Some(Ok(follow)) => pending.extend(follow),
            Some(Err(err)) => engine_warn!("Page task aborted: {}", err),
            None => break,
        }
    }

    // Last sender clone goes here; consumers see end-of-input.
    drop(handoff);
    engine_debug!(
        "Scoped pass over {} done after {} dispatches",
        ctx.task.allowed_domain(),
        dispatched
    );
}

async fn visit(ctx: Arc<CrawlContext>, url: String, handoff: Option<HandoffSender>) -> Vec<String> {
    politeness_pause(&ctx).await;
    engine_info!("Visiting: {}", url);

    let fetched = match fetch_html(&ctx, &url).await {
        Ok(fetched) => fetched,
        Err(err) => {
            engine_debug!("Skipping {}: {}", url, err);
            return Vec::new();
        }
    };

    let discovered = process_page(&ctx, &url, fetched, handoff.is_some());

    if let Some(queue) = handoff {
        for link in discovered.handoff {
            engine_debug!("Handing off {}", link);
            if !queue.push(link).await {
                break;
            }
        }
    }
    discovered.follow
}

async fn politeness_pause(ctx: &CrawlContext) {
    let max = ctx.task.politeness_delay();
    if max.is_zero() {
        return;
    }
    let max_ms = u64::try_from(max.as_millis()).unwrap_or(u64::MAX);
    let pause = Duration::from_millis(rand::random_range(0..=max_ms));
    tokio::select! {
        _ = ctx.cancel.cancelled() => {}
        _ = tokio::time::sleep(pause) => {}
    }
}

/// Fetch under the task timeout and the cancellation token, then decode.
pub(crate) async fn fetch_html(ctx: &CrawlContext, url: &str) -> Result<FetchedHtml, FetchError> {
    if ctx.cancel.is_cancelled() {
        return Err(FetchError::new(FailureKind::Cancelled, "crawl cancelled"));
    }
    let timeout = ctx.task.request_timeout();
    let output = tokio::select! {
        _ = ctx.cancel.cancelled() => {
            return Err(FetchError::new(FailureKind::Cancelled, "crawl cancelled"));
        }
        result = tokio::time::timeout(timeout, ctx.fetcher.fetch(url)) => match result {
            Ok(output) => output?,
            Err(_) => {
                return Err(FetchError::new(
                    FailureKind::Timeout,
                    format!("no response within {timeout:?}"),
                ));
            }
        },
    };

    let html = decode_body(&output.body, output.metadata.content_type.as_deref());
    let base = Url::parse(&output.metadata.final_url)
        .or_else(|_| Url::parse(url))
        .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
    Ok(FetchedHtml { html, base })
}

/// Cleaned body text of a page fetched outside the allowed domain.
pub(crate) fn external_text(fetched: FetchedHtml, bounds: LengthBounds) -> String {
    let page = ParsedPage::parse(&fetched.html, fetched.base);
    clean(&page.body_text(), bounds)
}

fn process_page(
    ctx: &CrawlContext,
    url: &str,
    fetched: FetchedHtml,
    handoff_enabled: bool,
) -> Discovered {
    let task = &ctx.task;
    let page = ParsedPage::parse(&fetched.html, fetched.base);

    let text = clean(&page.body_text(), task.content_bounds());
    let mut record = PageRecord::same_domain(url, text);
    if task.extract_event_fields() {
        let fields =
            ctx.extractor
                .extract(page.document(), task.allowed_domain(), task.title_bounds());
        record = record.with_event(fields);
    }
    ctx.results.push(record);

    let mut discovered = Discovered::default();
    for link in page.links() {
        if task.follows(&link) {
            if ctx.frontier.claim(link.as_str()) {
                discovered.follow.push(link.into());
            }
        } else if handoff_enabled && task.hands_off(&link) && ctx.frontier.claim(link.as_str()) {
            discovered.handoff.push(link.into());
        }
    }
    discovered
}
