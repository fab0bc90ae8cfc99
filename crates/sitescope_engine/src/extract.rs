use scraper::{ElementRef, Html, Selector};
use sitescope_core::{clean, EventFields, LengthBounds};

const SPEAKER_SELECTORS: &str = ".speaker, .presenter, .author";

/// Pulls event metadata from a parsed page using ordered fallback rules.
///
/// - title: first `h1`, then `<title>`; first candidate that survives cleaning
/// - date: first `<time>`'s `datetime`, then its text, then
///   `article:published_time` meta; first non-empty value wins
/// - speakers: every speaker/presenter/author element, document order
#[derive(Debug)]
pub struct EventFieldExtractor {
    heading: Option<Selector>,
    title: Option<Selector>,
    time: Option<Selector>,
    published_meta: Option<Selector>,
    speakers: Option<Selector>,
}

impl Default for EventFieldExtractor {
    fn default() -> Self {
        Self {
            heading: Selector::parse("h1").ok(),
            title: Selector::parse("title").ok(),
            time: Selector::parse("time").ok(),
            published_meta: Selector::parse(r#"meta[property="article:published_time"]"#).ok(),
            speakers: Selector::parse(SPEAKER_SELECTORS).ok(),
        }
    }
}

impl EventFieldExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extract(&self, doc: &Html, host: &str, title_bounds: LengthBounds) -> EventFields {
        EventFields {
            title: self.title(doc, title_bounds),
            date: self.date(doc),
            speakers: self.speakers(doc),
            host: host.to_string(),
        }
    }

    fn title(&self, doc: &Html, bounds: LengthBounds) -> String {
        [&self.heading, &self.title]
            .into_iter()
            .filter_map(|sel| first(doc, sel))
            .map(|el| clean(&element_text(el), bounds))
            .find(|t| !t.is_empty())
            .unwrap_or_default()
    }

    fn date(&self, doc: &Html) -> String {
        if let Some(time) = first(doc, &self.time) {
            let machine = time.value().attr("datetime").map(str::trim);
            if let Some(value) = machine.filter(|v| !v.is_empty()) {
                return value.to_string();
            }
            let rendered = element_text(time);
            if !rendered.is_empty() {
                return rendered;
            }
        }
        first(doc, &self.published_meta)
            .and_then(|meta| meta.value().attr("content"))
            .map(|content| content.trim().to_string())
            .unwrap_or_default()
    }

    fn speakers(&self, doc: &Html) -> Vec<String> {
        let Some(sel) = self.speakers.as_ref() else {
            return Vec::new();
        };
        doc.select(sel)
            .map(element_text)
            .filter(|name| !name.is_empty())
            .collect()
    }
}

fn first<'a>(doc: &'a Html, sel: &Option<Selector>) -> Option<ElementRef<'a>> {
    sel.as_ref().and_then(|sel| doc.select(sel).next())
}

fn element_text(el: ElementRef<'_>) -> String {
    el.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
