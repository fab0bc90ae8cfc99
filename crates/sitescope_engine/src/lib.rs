//! Sitescope engine: fetching, parsing and the concurrent crawl itself.
mod aggregate;
mod crawler;
mod decode;
mod extract;
mod fallback;
mod fetch;
mod frontier;
mod handoff;
mod page;
mod types;

pub use aggregate::ResultAggregator;
pub use crawler::Crawler;
pub use decode::decode_body;
pub use extract::EventFieldExtractor;
pub use fallback::{AcquisitionChain, ContentSource};
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher, DEFAULT_USER_AGENT};
pub use handoff::{handoff_queue, HandoffReceiver, HandoffSender};
pub use page::ParsedPage;
pub use types::{FailureKind, FetchError, FetchMetadata, FetchOutput};

pub use tokio_util::sync::CancellationToken;
