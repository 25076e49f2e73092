//! Raw ampersand repair for XMLTV display names
//!
//! Guide exports frequently carry display names such as `Crime & Investigation`
//! with a bare `&`, which makes the document ill-formed. The repair runs on
//! the raw document text before parsing and only touches `display-name`
//! element content.

use regex::{Captures, Regex};
use std::borrow::Cow;
use std::sync::LazyLock;

/// A bare `&`, or one that already starts an entity or character reference
static AMPERSAND_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(?:(?:lt|gt|amp|apos|quot);|#[0-9]+;|#x[0-9a-fA-F]+;)?")
        .expect("ampersand pattern is valid")
});

static DISPLAY_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(<display-name(?:\s[^>]*[^/>])?>)([^<]*)(</display-name>)")
        .expect("display-name pattern is valid")
});

/// Escape every `&` that does not already start a predefined entity or a
/// numeric character reference.
///
/// ```rust
/// use channel_logo_updater::xmltv::repair_ampersands;
///
/// assert_eq!(repair_ampersands("A & B"), "A &amp; B");
/// assert_eq!(repair_ampersands("A &amp; B"), "A &amp; B");
/// ```
pub fn repair_ampersands(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }

    AMPERSAND_RE.replace_all(text, |caps: &Captures| {
        let matched = &caps[0];
        if matched.len() == 1 {
            "&amp;".to_string()
        } else {
            matched.to_string()
        }
    })
}

/// Apply [`repair_ampersands`] to the content of every `display-name` element
/// in a raw document. Returns the repaired text and the number of display
/// names that changed.
pub fn repair_display_names(document: &str) -> (Cow<'_, str>, usize) {
    if !document.contains('&') {
        return (Cow::Borrowed(document), 0);
    }

    let mut repaired = 0usize;
    let output = DISPLAY_NAME_RE.replace_all(document, |caps: &Captures| {
        let content = repair_ampersands(&caps[2]);
        if matches!(content, Cow::Owned(ref fixed) if fixed != &caps[2]) {
            repaired += 1;
        }
        format!("{}{}{}", &caps[1], content, &caps[3])
    });

    (output, repaired)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("A & B", "A &amp; B")]
    #[case("A &amp; B", "A &amp; B")]
    #[case("A &#38; B", "A &#38; B")]
    #[case("A &#x26; B", "A &#x26; B")]
    #[case("&lt;&gt;&apos;&quot;", "&lt;&gt;&apos;&quot;")]
    #[case("AT&T", "AT&amp;T")]
    #[case("&&", "&amp;&amp;")]
    #[case("&nbsp;", "&amp;nbsp;")]
    #[case("no ampersand", "no ampersand")]
    fn test_repair_ampersands(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(repair_ampersands(input), expected);
    }

    #[rstest]
    #[case("A & B")]
    #[case("Tom &amp; Jerry & Friends")]
    #[case("&#38;&")]
    fn test_repair_is_idempotent(#[case] input: &str) {
        let once = repair_ampersands(input).into_owned();
        assert_eq!(repair_ampersands(&once), once);
    }

    #[test]
    fn test_only_display_names_are_repaired() {
        let document = r#"<tv><channel id="a&amp;b"><display-name lang="en">Crime & Investigation</display-name><display-name>Fine &amp; Dandy</display-name><url>http://x/?a=1&amp;b=2</url></channel></tv>"#;
        let (repaired, count) = repair_display_names(document);

        assert_eq!(count, 1);
        assert!(repaired.contains(r#"<display-name lang="en">Crime &amp; Investigation</display-name>"#));
        assert!(repaired.contains("<display-name>Fine &amp; Dandy</display-name>"));
        assert!(repaired.contains("http://x/?a=1&amp;b=2"));
    }

    #[test]
    fn test_self_closing_display_name_is_not_spanned() {
        let document = "<channel><display-name/><desc>R & D</desc><display-name>X</display-name></channel>";
        let (repaired, count) = repair_display_names(document);
        assert_eq!(count, 0);
        assert_eq!(repaired, document);
    }
}
