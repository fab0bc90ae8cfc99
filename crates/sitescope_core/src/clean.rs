use once_cell::sync::Lazy;
use regex::Regex;

static SCRIPT_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").unwrap());
static STYLE_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<style\b[^>]*>.*?</style\s*>").unwrap());
static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]+>").unwrap());
static JS_DECLARATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:var|let|const|function)\s+[\w$]+\s*=?\s*[{(]").unwrap()
});
static CSS_RULE_OPENER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.[\w-]+\s*\{").unwrap());

/// Inclusive character-length window for cleaned text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthBounds {
    pub min: usize,
    pub max: usize,
}

impl LengthBounds {
    pub const fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }
}

/// Removes every markup tag and re-joins what is left with single spaces.
pub fn strip_tags(input: &str) -> String {
    collapse_whitespace(&TAG.replace_all(input, " "))
}

pub fn collapse_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Hard cut to at most `max` characters, never splitting a code point.
pub fn truncate_chars(input: &str, max: usize) -> &str {
    match input.char_indices().nth(max) {
        Some((idx, _)) => &input[..idx],
        None => input,
    }
}

/// Runs the cleaning pipeline over raw page text.
///
/// Script and style blocks go first, then tags, then code-like residue that
/// survived tag stripping. Results shorter than `bounds.min` characters come
/// back empty; longer than `bounds.max` are cut to exactly `bounds.max`.
pub fn clean(raw: &str, bounds: LengthBounds) -> String {
    let without_scripts = SCRIPT_BLOCK.replace_all(raw, " ");
    let without_styles = STYLE_BLOCK.replace_all(&without_scripts, " ");
    let without_tags = TAG.replace_all(&without_styles, " ");
    let without_js = JS_DECLARATION.replace_all(&without_tags, " ");
    let without_css = CSS_RULE_OPENER.replace_all(&without_js, " ");
    let cleaned = collapse_whitespace(&without_css);

    if cleaned.chars().count() < bounds.min {
        return String::new();
    }
    truncate_chars(&cleaned, bounds.max).to_string()
}
