use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use engine_logging::engine_info;
use serde::Deserialize;
use sitescope_core::{LengthBounds, TaskKind, TaskProfile};

/// Optional overrides for a built-in task profile, read from RON.
///
/// ```ron
/// (
///     keywords: Some(["about", "team"]),
///     min_length: Some(100),
///     request_timeout_ms: Some(5000),
/// )
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ProfileOverrides {
    pub keywords: Option<Vec<String>>,
    pub platform_patterns: Option<Vec<String>>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub title_min_length: Option<usize>,
    pub title_max_length: Option<usize>,
    pub max_parallelism: Option<usize>,
    pub request_timeout_ms: Option<u64>,
    pub politeness_delay_ms: Option<u64>,
    pub handoff_workers: Option<usize>,
    pub handoff_capacity: Option<usize>,
    pub extract_event_fields: Option<bool>,
}

impl ProfileOverrides {
    pub fn from_ron(text: &str) -> Result<Self> {
        ron::from_str(text).context("profile overrides are not valid RON")
    }

    pub fn apply(self, mut profile: TaskProfile) -> TaskProfile {
        if let Some(keywords) = self.keywords {
            profile.keywords = keywords;
        }
        if let Some(patterns) = self.platform_patterns {
            profile.platform_patterns = patterns;
        }
        profile.content_bounds = LengthBounds::new(
            self.min_length.unwrap_or(profile.content_bounds.min),
            self.max_length.unwrap_or(profile.content_bounds.max),
        );
        profile.title_bounds = LengthBounds::new(
            self.title_min_length.unwrap_or(profile.title_bounds.min),
            self.title_max_length.unwrap_or(profile.title_bounds.max),
        );
        if let Some(parallelism) = self.max_parallelism {
            profile.max_parallelism = parallelism;
        }
        if let Some(ms) = self.request_timeout_ms {
            profile.request_timeout = Duration::from_millis(ms);
        }
        if let Some(ms) = self.politeness_delay_ms {
            profile.politeness_delay = Duration::from_millis(ms);
        }
        if let Some(workers) = self.handoff_workers {
            profile.handoff_workers = workers;
        }
        if let Some(capacity) = self.handoff_capacity {
            profile.handoff_capacity = capacity;
        }
        if let Some(extract) = self.extract_event_fields {
            profile.extract_event_fields = extract;
        }
        profile
    }
}

/// Built-in profile for `kind`, with overrides from `path` if given.
pub fn load_profile(kind: TaskKind, path: Option<&Path>) -> Result<TaskProfile> {
    let profile = TaskProfile::for_kind(kind);
    let Some(path) = path else {
        return Ok(profile);
    };

    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read profile {}", path.display()))?;
    let overrides = ProfileOverrides::from_ron(&text)
        .with_context(|| format!("failed to parse profile {}", path.display()))?;
    engine_info!("Loaded {} profile overrides from {:?}", kind, path);
    Ok(overrides.apply(profile))
}
