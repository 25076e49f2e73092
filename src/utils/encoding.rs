//! Character set handling for fetched guides and playlists
//!
//! Content is decoded as UTF-8 when it is valid UTF-8 (a BOM selects its own
//! encoding). Otherwise the declared charset is used, taken from the HTTP
//! `Content-Type` header or the XML declaration, and Windows-1252 is the
//! last resort.

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use regex::bytes::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;
use tracing::{debug, warn};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Only the start of a document is searched for its declaration
const DECLARATION_WINDOW: usize = 256;

static XML_ENCODING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*<\?xml\s[^>]*?encoding\s*=\s*["']([A-Za-z0-9._:-]+)["']"#)
        .expect("xml encoding pattern is valid")
});

/// The `charset` parameter of a `Content-Type` header value.
///
/// ```rust
/// use channel_logo_updater::utils::encoding::charset_from_content_type;
///
/// assert_eq!(charset_from_content_type("text/xml; charset=\"ISO-8859-1\""), Some("ISO-8859-1"));
/// assert_eq!(charset_from_content_type("application/xml"), None);
/// ```
pub fn charset_from_content_type(content_type: &str) -> Option<&str> {
    content_type
        .split(';')
        .skip(1)
        .find_map(|parameter| {
            let (key, value) = parameter.split_once('=')?;
            key.trim()
                .eq_ignore_ascii_case("charset")
                .then(|| value.trim().trim_matches('"'))
        })
        .filter(|charset| !charset.is_empty())
}

/// The `encoding` pseudo-attribute of a leading XML declaration.
pub fn xml_declared_encoding(bytes: &[u8]) -> Option<String> {
    let head = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let head = &head[..head.len().min(DECLARATION_WINDOW)];
    XML_ENCODING_RE
        .captures(head)
        .and_then(|caps| caps.get(1))
        .map(|label| String::from_utf8_lossy(label.as_bytes()).into_owned())
}

/// Decode `bytes` to text, preferring UTF-8, then `declared_charset`, then
/// the document's own XML declaration.
pub fn decode_text<'a>(bytes: &'a [u8], declared_charset: Option<&str>) -> Cow<'a, str> {
    let (text, encoding, malformed) = UTF_8.decode(bytes);
    if !malformed {
        if encoding != UTF_8 {
            debug!("Decoded content as {} from its byte order mark", encoding.name());
        }
        return text;
    }

    let declared = declared_charset
        .map(str::to_string)
        .or_else(|| xml_declared_encoding(bytes));
    if let Some(label) = declared {
        match Encoding::for_label(label.trim().as_bytes()) {
            Some(encoding) => {
                debug!("Content is not UTF-8, decoding as declared {}", encoding.name());
                let (text, _, _) = encoding.decode(bytes);
                return text;
            }
            None => warn!("Unknown declared charset '{}'", label),
        }
    }

    warn!("Content is not valid UTF-8 and declares no usable charset, decoding as windows-1252");
    let (text, _, _) = WINDOWS_1252.decode(bytes);
    text
}
