use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use bytes::Bytes;
use sitescope_core::{CrawlTask, LengthBounds, TaskKind, TaskProfile};
use sitescope_engine::{
    CancellationToken, Crawler, FailureKind, FetchError, FetchMetadata, FetchOutput, Fetcher,
};

/// In-memory site: URL -> (html, artificial latency).
#[derive(Default)]
struct StubSite {
    pages: HashMap<String, (Bytes, Duration)>,
    requests: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl StubSite {
    fn with_page(self, url: &str, html: &str) -> Self {
        self.with_raw_page(url, html.as_bytes())
    }

    fn with_raw_page(mut self, url: &str, body: &[u8]) -> Self {
        self.pages.insert(
            url.to_string(),
            (Bytes::copy_from_slice(body), Duration::from_millis(10)),
        );
        self
    }

    fn with_slow_page(mut self, url: &str, html: &str, latency: Duration) -> Self {
        self.pages
            .insert(url.to_string(), (Bytes::copy_from_slice(html.as_bytes()), latency));
        self
    }

    fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Fetcher for StubSite {
    async fn fetch(&self, url: &str) -> Result<FetchOutput, FetchError> {
        self.requests.lock().unwrap().push(url.to_string());
        let Some((body, latency)) = self.pages.get(url).cloned() else {
            return Err(FetchError::new(FailureKind::Network, "connection refused"));
        };

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(latency).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        Ok(FetchOutput {
            metadata: FetchMetadata {
                requested_url: url.to_string(),
                final_url: url.to_string(),
                status: 200,
                content_type: Some("text/html; charset=utf-8".into()),
                byte_len: body.len() as u64,
            },
            body,
        })
    }
}

fn task(seed: &str, tweak: impl FnOnce(&mut TaskProfile)) -> CrawlTask {
    let mut profile = TaskProfile::for_kind(TaskKind::Product);
    profile.content_bounds = LengthBounds::new(0, 1000);
    profile.politeness_delay = Duration::ZERO;
    tweak(&mut profile);
    CrawlTask::new(seed, profile).unwrap()
}

#[tokio::test]
async fn unreachable_seed_yields_empty_results() {
    let site = Arc::new(StubSite::default());
    let task = task("http://down.test/", |_| {});
    let results = Crawler::new(site.clone()).crawl(&task).await;
    assert!(results.is_empty());
    assert_eq!(site.requests(), vec!["http://down.test/"]);
}

#[tokio::test]
async fn seed_with_fragment_is_fetched_once() {
    let site = Arc::new(StubSite::default().with_page(
        "http://shop.test/products",
        r#"<p>catalogue</p><a href="/products">all</a><a href="/products#top">top</a>"#,
    ));
    let task = task("http://shop.test/products#top", |_| {});
    let results = Crawler::new(site.clone()).crawl(&task).await;

    assert_eq!(site.requests(), vec!["http://shop.test/products"]);
    assert_eq!(results.urls().collect::<Vec<_>>(), ["http://shop.test/products"]);
}

#[tokio::test]
async fn malformed_bytes_do_not_drop_the_page() {
    let site = Arc::new(
        StubSite::default()
            .with_raw_page(
                "http://shop.test/",
                b"<p>Caf\xE9 menu</p><a href=\"/products/menu\">menu</a>",
            )
            .with_page("http://shop.test/products/menu", "<p>coffee</p>"),
    );
    let task = task("http://shop.test/", |_| {});
    let results = Crawler::new(site.clone()).crawl(&task).await;

    assert_eq!(
        site.requests(),
        vec!["http://shop.test/", "http://shop.test/products/menu"]
    );
    let home = results
        .pages
        .iter()
        .find(|page| page.url == "http://shop.test/")
        .unwrap();
    assert!(home.text.contains("Caf\u{FFFD} menu"), "{}", home.text);
    assert_eq!(results.len(), 2);
}

#[tokio::test]
async fn parallelism_never_exceeds_the_task_limit() {
    let mut links = String::new();
    let mut site = StubSite::default();
    for i in 0..12 {
        let url = format!("http://shop.test/products/{i}");
        links.push_str(&format!(r#"<a href="{url}">p{i}</a>"#));
        site = site.with_page(&url, "<p>item</p>");
    }
    let site = Arc::new(site.with_page("http://shop.test/", &links));

    let task = task("http://shop.test/", |p| p.max_parallelism = 3);
    let results = Crawler::new(site.clone()).crawl(&task).await;

    assert_eq!(results.len(), 13);
    let peak = site.peak_in_flight.load(Ordering::SeqCst);
    assert!(peak <= 3, "peak in flight was {peak}");
    assert!(peak >= 2, "expected some overlap, peak was {peak}");
}

#[tokio::test]
async fn slow_pages_time_out_without_blocking_others() {
    let site = Arc::new(
        StubSite::default()
            .with_page(
                "http://shop.test/",
                r#"<a href="/products/slow">slow</a><a href="/products/fast">fast</a>"#,
            )
            .with_slow_page(
                "http://shop.test/products/slow",
                "<p>late</p>",
                Duration::from_secs(5),
            )
            .with_page("http://shop.test/products/fast", "<p>quick</p>"),
    );

    let task = task("http://shop.test/", |p| {
        p.request_timeout = Duration::from_millis(200)
    });
    let started = std::time::Instant::now();
    let results = Crawler::new(site).crawl(&task).await;

    let mut urls: Vec<&str> = results.urls().collect();
    urls.sort();
    assert_eq!(urls, ["http://shop.test/", "http://shop.test/products/fast"]);
    assert!(started.elapsed() < Duration::from_secs(3));
}

#[tokio::test]
async fn cancelled_crawl_dispatches_nothing() {
    let site = Arc::new(StubSite::default().with_page("http://shop.test/", "<p>home</p>"));
    let task = task("http://shop.test/", |_| {});

    let cancel = CancellationToken::new();
    cancel.cancel();
    let results = Crawler::new(site.clone())
        .crawl_with_cancel(&task, cancel)
        .await;

    assert!(results.is_empty());
    assert!(site.requests().is_empty());
}

#[tokio::test]
async fn cancellation_interrupts_in_flight_fetches() {
    let site = Arc::new(StubSite::default().with_slow_page(
        "http://shop.test/",
        "<p>home</p>",
        Duration::from_secs(5),
    ));
    let task = task("http://shop.test/", |_| {});

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let started = std::time::Instant::now();
    let results = Crawler::new(site).crawl_with_cancel(&task, cancel).await;
    assert!(results.is_empty());
    assert!(started.elapsed() < Duration::from_secs(2));
}
