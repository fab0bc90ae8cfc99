//! Sitescope core: pure crawl-task model and text processing (no IO).
mod clean;
mod domain;
mod keywords;
mod record;
mod task;

pub use clean::{clean, collapse_whitespace, strip_tags, truncate_chars, LengthBounds};
pub use domain::{host_of, resolve_link, same_host};
pub use keywords::{KeywordSet, PlatformPatterns};
pub use record::{EventFields, PageOrigin, PageRecord, ResultSet};
pub use task::{CrawlTask, HandoffSettings, TaskError, TaskKind, TaskProfile};
