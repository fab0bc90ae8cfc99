use url::Url;

/// Host key used to scope a crawl: lowercase host plus the explicit port, if any.
///
/// Only absolute `http`/`https` URLs have a host key.
pub fn host_of(link: &str) -> Option<String> {
    let url = Url::parse(link.trim()).ok()?;
    host_key(&url)
}

pub(crate) fn host_key(url: &Url) -> Option<String> {
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    let host = url.host_str()?.to_ascii_lowercase();
    if host.is_empty() {
        return None;
    }
    Some(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host,
    })
}

pub fn same_host(link: &str, domain: &str) -> bool {
    host_of(link).is_some_and(|host| host == domain)
}

/// Resolves an anchor `href` against the page URL.
///
/// Returns `None` for empty, fragment-only and non-navigational references
/// (`javascript:`, `mailto:`, `tel:`, `data:`) and for anything that does not
/// end up as `http`/`https`. The fragment is dropped.
pub fn resolve_link(base: &Url, href: &str) -> Option<Url> {
    let trimmed = href.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }
    let lower = trimmed.to_ascii_lowercase();
    if ["javascript:", "mailto:", "tel:", "data:"]
        .iter()
        .any(|scheme| lower.starts_with(scheme))
    {
        return None;
    }

    let mut url = base.join(trimmed).ok()?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return None;
    }
    url.set_fragment(None);
    Some(url)
}
