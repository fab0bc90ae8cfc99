use pretty_assertions::assert_eq;
use sitescope_core::{clean, LengthBounds};

const OPEN: LengthBounds = LengthBounds::new(0, 10_000);

#[test]
fn script_and_style_blocks_are_removed_with_their_content() {
    let raw = r#"Intro <script type="text/javascript">
        window.track("x");
    </script> middle <STYLE>body { color: red; }</STYLE> outro"#;
    assert_eq!(clean(raw, OPEN), "Intro middle outro");
}

#[test]
fn remaining_tags_collapse_into_single_spaces() {
    let raw = "<div><h1>Our\n\n team</h1><p>We build   things.</p></div>";
    assert_eq!(clean(raw, OPEN), "Our team We build things.");
}

#[test]
fn code_like_residue_is_dropped() {
    let raw = "Welcome var config = { debug } function init() { } .hero { margin: 0 } done";
    let cleaned = clean(raw, OPEN);
    assert!(!cleaned.contains("var config"), "{cleaned}");
    assert!(!cleaned.contains("function init"), "{cleaned}");
    assert!(!cleaned.contains(".hero"), "{cleaned}");
    assert!(cleaned.starts_with("Welcome"));
    assert!(cleaned.ends_with("done"));
}

#[test]
fn prose_mentioning_keywords_survives() {
    let raw = "Let us know if the function of the team is unclear.";
    assert_eq!(clean(raw, OPEN), raw);
}

#[test]
fn text_below_minimum_becomes_empty() {
    let bounds = LengthBounds::new(20, 100);
    assert_eq!(clean("<p>too short</p>", bounds), "");
}

#[test]
fn text_at_minimum_is_kept() {
    let bounds = LengthBounds::new(5, 100);
    assert_eq!(clean("  hello  ", bounds), "hello");
}

#[test]
fn text_above_maximum_is_cut_to_exactly_maximum() {
    let bounds = LengthBounds::new(0, 12);
    let raw = "abcdefghij klmnopqrstuvwxyz";
    let cleaned = clean(raw, bounds);
    assert_eq!(cleaned.chars().count(), 12);
    assert_eq!(cleaned, "abcdefghij k");
}

#[test]
fn cut_counts_characters_not_bytes() {
    let bounds = LengthBounds::new(0, 4);
    assert_eq!(clean("ééééé", bounds), "éééé");
}
