use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOrigin {
    SameDomain,
    External,
}

impl PageOrigin {
    pub fn is_external(&self) -> bool {
        matches!(self, PageOrigin::External)
    }

    fn is_same_domain(&self) -> bool {
        !self.is_external()
    }
}

fn serialize_origin<S: Serializer>(origin: &PageOrigin, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_bool(origin.is_external())
}

/// Structured fields of an event page.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct EventFields {
    pub title: String,
    pub date: String,
    pub speakers: Vec<String>,
    pub host: String,
}

/// One successfully fetched page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageRecord {
    pub url: String,
    pub text: String,
    #[serde(
        rename = "external",
        serialize_with = "serialize_origin",
        skip_serializing_if = "PageOrigin::is_same_domain"
    )]
    pub origin: PageOrigin,
    #[serde(flatten)]
    pub event: Option<EventFields>,
}

impl PageRecord {
    pub fn same_domain(url: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            text: text.into(),
            origin: PageOrigin::SameDomain,
            event: None,
        }
    }

    pub fn external(url: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            text: text.into(),
            origin: PageOrigin::External,
            event: None,
        }
    }

    pub fn with_event(mut self, event: EventFields) -> Self {
        self.event = Some(event);
        self
    }
}

/// Records of one crawl, in completion order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ResultSet {
    pub pages: Vec<PageRecord>,
}

impl ResultSet {
    pub fn new(pages: Vec<PageRecord>) -> Self {
        Self { pages }
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().map(|page| page.url.as_str())
    }
}
