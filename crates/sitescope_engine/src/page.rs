use ego_tree::NodeRef;
use engine_logging::engine_debug;
use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};
use sitescope_core::resolve_link;
use url::Url;

const DEFAULT_MAX_LINKS: usize = 5_000;

/// A fetched document parsed once, with its base URL for link resolution.
pub struct ParsedPage {
    document: Html,
    base: Url,
}

impl ParsedPage {
    pub fn parse(html: &str, base: Url) -> Self {
        Self {
            document: Html::parse_document(html),
            base,
        }
    }

    pub fn document(&self) -> &Html {
        &self.document
    }

    /// Rendered text of `<body>` (or the whole document if there is none).
    ///
    /// Script-like subtrees are skipped and text nodes are joined by spaces,
    /// so the result still needs the cleaning pipeline for whitespace and bounds.
    pub fn body_text(&self) -> String {
        let root = Selector::parse("body")
            .ok()
            .and_then(|sel| self.document.select(&sel).next())
            .unwrap_or_else(|| self.document.root_element());

        let mut out = String::new();
        collect_text(*root, &mut out);
        out
    }

    /// Every `a[href]` resolved to an absolute http(s) URL, in document order.
    pub fn links(&self) -> Vec<Url> {
        self.links_capped(DEFAULT_MAX_LINKS)
    }

    pub fn links_capped(&self, max_links: usize) -> Vec<Url> {
        let Ok(anchor) = Selector::parse("a[href]") else {
            return Vec::new();
        };
        let mut resolved = self
            .document
            .select(&anchor)
            .filter_map(|a| a.value().attr("href"))
            .filter_map(|href| resolve_link(&self.base, href));
        let links: Vec<Url> = resolved.by_ref().take(max_links).collect();
        let dropped = resolved.count();
        if dropped > 0 {
            engine_debug!(
                "Link cap {max_links} reached on {}; {dropped} links dropped",
                self.base
            );
        }
        links
    }
}

fn collect_text(node: NodeRef<'_, Node>, out: &mut String) {
    match node.value() {
        Node::Text(text) => {
            out.push_str(text);
            out.push(' ');
        }
        Node::Element(_) => {
            if let Some(element) = ElementRef::wrap(node) {
                if is_skipped(element) {
                    return;
                }
            }
            for child in node.children() {
                collect_text(child, out);
            }
        }
        Node::Comment(_) | Node::ProcessingInstruction(_) | Node::Doctype(_) => {}
        _ => {
            for child in node.children() {
                collect_text(child, out);
            }
        }
    }
}

fn is_skipped(element: ElementRef<'_>) -> bool {
    matches!(
        element.value().name().to_ascii_lowercase().as_str(),
        "script" | "style" | "noscript" | "template" | "iframe"
    )
}
