use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use engine_logging::engine_debug;

/// How far into the body `<meta charset>` is searched for.
const META_PRESCAN_BYTES: usize = 1024;

/// Decodes a fetched body to UTF-8.
///
/// Order: byte-order mark, `Content-Type` charset, `<meta charset>` in the
/// first kilobyte, then a `chardetng` guess. Malformed sequences become
/// U+FFFD so a page with a stray byte still yields text and links.
pub fn decode_body(bytes: &[u8], content_type: Option<&str>) -> String {
    let encoding = Encoding::for_bom(bytes)
        .map(|(enc, _)| enc)
        .or_else(|| content_type.and_then(header_charset).and_then(label_encoding))
        .or_else(|| meta_charset(bytes).and_then(label_encoding))
        .unwrap_or_else(|| {
            let mut detector = EncodingDetector::new();
            detector.feed(bytes, true);
            detector.guess(None, true)
        });

    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        engine_debug!("Malformed {} sequences replaced", encoding.name());
    }
    text.into_owned()
}

fn label_encoding(label: String) -> Option<&'static Encoding> {
    Encoding::for_label(label.as_bytes())
}

fn header_charset(content_type: &str) -> Option<String> {
    content_type.split(';').find_map(|part| {
        let (key, value) = part.split_once('=')?;
        key.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches(['"', '\'']).to_string())
    })
}

fn meta_charset(bytes: &[u8]) -> Option<String> {
    let head = &bytes[..bytes.len().min(META_PRESCAN_BYTES)];
    let head = String::from_utf8_lossy(head).to_ascii_lowercase();

    let mut rest = head.as_str();
    while let Some(start) = rest.find("<meta") {
        let tag = &rest[start..];
        let tag = &tag[..tag.find('>').unwrap_or(tag.len())];
        if let Some(pos) = tag.find("charset=") {
            let label: String = tag[pos + "charset=".len()..]
                .trim_start_matches(['"', '\'', ' '])
                .chars()
                .take_while(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.'))
                .collect();
            if !label.is_empty() {
                return Some(label);
            }
        }
        rest = &rest[start + "<meta".len()..];
    }
    None
}
