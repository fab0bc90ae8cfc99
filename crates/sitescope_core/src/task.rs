use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::clean::LengthBounds;
use crate::domain::host_key;
use crate::keywords::{KeywordSet, PlatformPatterns};

const QUICK_KEYWORDS: &[&str] = &["about", "about-us", "info", "contact"];

const PRODUCT_KEYWORDS: &[&str] = &[
    "product", "products", "service", "services", "solution", "solutions", "offering",
    "offerings", "platform", "feature", "features",
];

const EVENT_KEYWORDS: &[&str] = &[
    "event", "events", "webinar", "conference", "summit", "expo", "forum", "seminar",
];

/// Hosts of event and webinar platforms that event pages commonly link out to.
const EVENT_PLATFORM_PATTERNS: &[&str] = &[
    r"hopin\.com", r"zoom\.us", r"webex\.com", r"airmeet\.com", r"vfairs\.com",
    r"eventbrite\.com", r"cvent\.com", r"bizzabo\.com", r"on24\.com", r"remo\.co",
    r"whova\.com", r"brella\.io", r"runtheworld\.today", r"splashthat\.com",
    r"accelevents\.com", r"bigmarker\.com", r"6connex\.com", r"gotowebinar\.com",
    r"gotomeeting\.com", r"slido\.com", r"inevent\.com", r"pheedloop\.com",
    r"swapcard\.com", r"eventzilla\.net", r"eventscase\.com", r"hubilo\.com",
    r"convene\.com", r"attendify\.com", r"socio\.events", r"eventcadence\.com",
    r"heysummit\.com", r"meetyoo\.com", r"gathertown\.com", r"shindig\.com",
    r"hexafair\.com", r"veertly\.com", r"eventsair\.com", r"sched\.com", r"glisser\.com",
    r"meetingplay\.com", r"vconferenceonline\.com", r"expopass\.com", r"bevy\.com",
    r"hubspot\.com", r"demio\.com", r"conferize\.com", r"tampevents\.com",
    r"tame\.events", r"spotme\.com", r"evvnt\.com", r"tickettailor\.com",
    r"ticketspice\.com", r"brighttalk\.com",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    /// Company "about"/"contact" pages.
    Quick,
    /// Product and service pages.
    Product,
    /// Event pages, with structured fields and platform handoff.
    Event,
}

impl TaskKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskKind::Quick => "quick",
            TaskKind::Product => "product",
            TaskKind::Event => "event",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskKind {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quick" => Ok(TaskKind::Quick),
            "product" => Ok(TaskKind::Product),
            "event" => Ok(TaskKind::Event),
            other => Err(TaskError::UnknownKind(other.to_string())),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaskError {
    #[error("unknown task kind {0:?}")]
    UnknownKind(String),
    #[error("invalid seed url {url:?}: {reason}")]
    InvalidSeed { url: String, reason: String },
    #[error("keyword set is empty")]
    EmptyKeywords,
    #[error("invalid platform pattern: {0}")]
    InvalidPattern(String),
    #[error("invalid setting {name}: {reason}")]
    InvalidSetting { name: &'static str, reason: String },
}

/// Tunables of one task kind. Plain data; [`CrawlTask::new`] validates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskProfile {
    pub kind: TaskKind,
    pub keywords: Vec<String>,
    pub platform_patterns: Vec<String>,
    pub content_bounds: LengthBounds,
    pub title_bounds: LengthBounds,
    pub max_parallelism: usize,
    pub request_timeout: Duration,
    /// Upper bound of the random pause before each fetch.
    pub politeness_delay: Duration,
    pub handoff_workers: usize,
    pub handoff_capacity: usize,
    pub extract_event_fields: bool,
}

impl TaskProfile {
    pub fn for_kind(kind: TaskKind) -> Self {
        match kind {
            TaskKind::Quick => Self {
                kind,
                keywords: to_owned(QUICK_KEYWORDS),
                platform_patterns: Vec::new(),
                content_bounds: LengthBounds::new(400, 2000),
                title_bounds: LengthBounds::new(1, 300),
                max_parallelism: 5,
                request_timeout: Duration::from_secs(10),
                politeness_delay: Duration::ZERO,
                handoff_workers: 0,
                handoff_capacity: 0,
                extract_event_fields: false,
            },
            TaskKind::Product => Self {
                kind,
                keywords: to_owned(PRODUCT_KEYWORDS),
                platform_patterns: Vec::new(),
                content_bounds: LengthBounds::new(400, 1000),
                title_bounds: LengthBounds::new(1, 300),
                max_parallelism: 20,
                request_timeout: Duration::from_secs(3),
                politeness_delay: Duration::from_millis(100),
                handoff_workers: 0,
                handoff_capacity: 0,
                extract_event_fields: false,
            },
            TaskKind::Event => Self {
                kind,
                keywords: to_owned(EVENT_KEYWORDS),
                platform_patterns: to_owned(EVENT_PLATFORM_PATTERNS),
                content_bounds: LengthBounds::new(50, 10_000),
                title_bounds: LengthBounds::new(1, 300),
                max_parallelism: 50,
                request_timeout: Duration::from_secs(2),
                politeness_delay: Duration::from_millis(50),
                handoff_workers: 10,
                handoff_capacity: 100,
                extract_event_fields: true,
            },
        }
    }
}

fn to_owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandoffSettings {
    pub workers: usize,
    pub capacity: usize,
}

/// One validated crawl invocation. Immutable once built.
#[derive(Debug, Clone)]
pub struct CrawlTask {
    kind: TaskKind,
    seed: Url,
    allowed_domain: String,
    keywords: KeywordSet,
    platforms: Option<PlatformPatterns>,
    content_bounds: LengthBounds,
    title_bounds: LengthBounds,
    max_parallelism: usize,
    request_timeout: Duration,
    politeness_delay: Duration,
    handoff: Option<HandoffSettings>,
    extract_event_fields: bool,
}

impl CrawlTask {
    /// Shorthand for a seed crawled with the built-in profile of `kind`.
    pub fn for_kind(kind: TaskKind, seed: &str) -> Result<Self, TaskError> {
        Self::new(seed, TaskProfile::for_kind(kind))
    }

    pub fn new(seed: &str, profile: TaskProfile) -> Result<Self, TaskError> {
        let seed = parse_seed(seed)?;
        let allowed_domain = host_key(&seed).ok_or_else(|| TaskError::InvalidSeed {
            url: seed.to_string(),
            reason: "no host".into(),
        })?;

        let keywords = KeywordSet::new(&profile.keywords);
        if keywords.is_empty() {
            return Err(TaskError::EmptyKeywords);
        }

        if profile.max_parallelism == 0 {
            return Err(invalid("max_parallelism", "must be at least 1"));
        }
        for (name, bounds) in [
            ("content_bounds", profile.content_bounds),
            ("title_bounds", profile.title_bounds),
        ] {
            if bounds.min > bounds.max {
                return Err(invalid(
                    name,
                    format!("min {} exceeds max {}", bounds.min, bounds.max),
                ));
            }
        }
        if profile.request_timeout.is_zero() {
            return Err(invalid("request_timeout", "must be non-zero"));
        }

        let (platforms, handoff) = if profile.platform_patterns.is_empty() {
            (None, None)
        } else {
            let patterns = PlatformPatterns::new(&profile.platform_patterns)
                .map_err(|err| TaskError::InvalidPattern(err.to_string()))?;
            if profile.handoff_workers == 0 {
                return Err(invalid("handoff_workers", "must be at least 1"));
            }
            if profile.handoff_capacity == 0 {
                return Err(invalid("handoff_capacity", "must be at least 1"));
            }
            let handoff = HandoffSettings {
                workers: profile.handoff_workers,
                capacity: profile.handoff_capacity,
            };
            (Some(patterns), Some(handoff))
        };

        Ok(Self {
            kind: profile.kind,
            seed,
            allowed_domain,
            keywords,
            platforms,
            content_bounds: profile.content_bounds,
            title_bounds: profile.title_bounds,
            max_parallelism: profile.max_parallelism,
            request_timeout: profile.request_timeout,
            politeness_delay: profile.politeness_delay,
            handoff,
            extract_event_fields: profile.extract_event_fields,
        })
    }

    pub fn kind(&self) -> TaskKind {
        self.kind
    }

    pub fn seed(&self) -> &Url {
        &self.seed
    }

    pub fn allowed_domain(&self) -> &str {
        &self.allowed_domain
    }

    pub fn keywords(&self) -> &KeywordSet {
        &self.keywords
    }

    pub fn platforms(&self) -> Option<&PlatformPatterns> {
        self.platforms.as_ref()
    }

    pub fn content_bounds(&self) -> LengthBounds {
        self.content_bounds
    }

    pub fn title_bounds(&self) -> LengthBounds {
        self.title_bounds
    }

    pub fn max_parallelism(&self) -> usize {
        self.max_parallelism
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub fn politeness_delay(&self) -> Duration {
        self.politeness_delay
    }

    pub fn handoff(&self) -> Option<HandoffSettings> {
        self.handoff
    }

    pub fn extract_event_fields(&self) -> bool {
        self.extract_event_fields
    }

    /// True when `link` is on the allowed domain and passes the keyword predicate.
    pub fn follows(&self, link: &Url) -> bool {
        host_key(link).is_some_and(|host| host == self.allowed_domain)
            && self.keywords.matches(link.as_str())
    }

    /// True when `link` points at a configured third-party platform.
    pub fn hands_off(&self, link: &Url) -> bool {
        match (&self.platforms, host_key(link)) {
            (Some(platforms), Some(host)) => platforms.matches_host(&host),
            _ => false,
        }
    }
}

fn parse_seed(seed: &str) -> Result<Url, TaskError> {
    let trimmed = seed.trim();
    let mut url = Url::parse(trimmed).map_err(|err| TaskError::InvalidSeed {
        url: trimmed.to_string(),
        reason: err.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(TaskError::InvalidSeed {
            url: trimmed.to_string(),
            reason: format!("unsupported scheme {}", url.scheme()),
        });
    }
    // Discovered links are claimed without fragments; the seed must match.
    url.set_fragment(None);
    Ok(url)
}

fn invalid(name: &'static str, reason: impl Into<String>) -> TaskError {
    TaskError::InvalidSetting {
        name,
        reason: reason.into(),
    }
}
