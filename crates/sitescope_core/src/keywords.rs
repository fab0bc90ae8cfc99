use regex::RegexSet;

/// Case-insensitive substring predicate over the full absolute URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordSet {
    keywords: Vec<String>,
}

impl KeywordSet {
    /// Lowercases and drops blank entries.
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords = keywords
            .into_iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        Self { keywords }
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.keywords
    }

    pub fn matches(&self, url: &str) -> bool {
        let lower = url.to_lowercase();
        self.keywords.iter().any(|k| lower.contains(k.as_str()))
    }
}

/// Host patterns of third-party platforms whose links get handed off.
#[derive(Debug, Clone)]
pub struct PlatformPatterns {
    set: RegexSet,
}

impl PlatformPatterns {
    pub fn new<I, S>(patterns: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns: Vec<String> = patterns
            .into_iter()
            .map(|p| format!("(?i){}", p.as_ref()))
            .collect();
        Ok(Self {
            set: RegexSet::new(patterns)?,
        })
    }

    pub fn matches_host(&self, host: &str) -> bool {
        self.set.is_match(host)
    }
}

#[cfg(test)]
mod tests {
    use super::{KeywordSet, PlatformPatterns};

    #[test]
    fn keywords_match_anywhere_in_url_ignoring_case() {
        let set = KeywordSet::new(["About", " contact ", ""]);
        assert_eq!(set.as_slice(), ["about".to_string(), "contact".to_string()]);
        assert!(set.matches("http://example.com/ABOUT-us"));
        assert!(set.matches("http://contact.example.com/"));
        assert!(set.matches("http://example.com/?next=contact"));
        assert!(!set.matches("http://example.com/pricing"));
    }

    #[test]
    fn platform_patterns_match_hosts() {
        let patterns = PlatformPatterns::new([r"zoom\.us", r"eventbrite\.com"]).unwrap();
        assert!(patterns.matches_host("us02web.zoom.us"));
        assert!(patterns.matches_host("www.Eventbrite.com"));
        assert!(!patterns.matches_host("zoomus.com"));
    }

    #[test]
    fn invalid_pattern_is_an_error() {
        assert!(PlatformPatterns::new(["("]).is_err());
    }
}
