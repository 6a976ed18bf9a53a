//! Hyperlink targets
//!
//! Accepted forms:
//! - `http://`, `https://`, `ftp://`, `ftps://` and `mailto:` URLs
//! - `internal:Sheet2!A1` for a location inside the workbook
//! - `external:c:\path\file.xlsx#Sheet1!A1` for another file

use std::borrow::Cow;

use crate::error::{Error, Result};
use crate::{MAX_TOOLTIP_LENGTH, MAX_URL_LENGTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HyperlinkKind {
    /// Web or mail URL
    Url,
    /// Location within this workbook
    Internal,
    /// Another file on disk or a share
    ExternalFile,
}

/// Text shown in a hyperlink cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayText {
    /// Index into the shared string table
    Shared(u32),
    Inline(String),
}

/// A hyperlink stored in a cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hyperlink {
    pub kind: HyperlinkKind,
    /// Escaped target; empty for internal links
    pub target: String,
    /// Fragment or in-workbook location
    pub location: Option<String>,
    pub display: DisplayText,
    pub tooltip: Option<String>,
}

/// A URL split into its parts, before the display text is stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ParsedUrl {
    pub kind: HyperlinkKind,
    pub target: String,
    pub location: Option<String>,
    /// What the cell shows when the caller gives no display text
    pub default_display: String,
}

const URL_SCHEMES: &[&str] = &["http://", "https://", "ftp://", "ftps://", "mailto:"];

pub(crate) fn parse_url(url: &str) -> Result<ParsedUrl> {
    let parsed = if let Some(location) = url.strip_prefix("internal:") {
        ParsedUrl {
            kind: HyperlinkKind::Internal,
            target: String::new(),
            location: Some(location.to_string()),
            default_display: location.to_string(),
        }
    } else if let Some(path) = url.strip_prefix("external:") {
        let (path, location) = split_fragment(path);
        let target = if is_absolute_path(path) {
            format!("file:///{}", escape_url(path))
        } else {
            escape_url(path).into_owned()
        };
        ParsedUrl {
            kind: HyperlinkKind::ExternalFile,
            target,
            location,
            default_display: path.to_string(),
        }
    } else if URL_SCHEMES.iter().any(|scheme| url.starts_with(scheme)) {
        let default_display = url.strip_prefix("mailto:").unwrap_or(url).to_string();
        let (base, location) = split_fragment(url);
        ParsedUrl {
            kind: HyperlinkKind::Url,
            target: escape_url(base).into_owned(),
            location,
            default_display,
        }
    } else {
        return Err(Error::InvalidUrl(url.to_string()));
    };

    let length = parsed.target.chars().count()
        + parsed.location.as_ref().map_or(0, |l| l.chars().count());
    if length > MAX_URL_LENGTH {
        return Err(Error::capacity("URL", MAX_URL_LENGTH, length));
    }
    Ok(parsed)
}

pub(crate) fn check_tooltip(tooltip: &str) -> Result<()> {
    let length = tooltip.chars().count();
    if length > MAX_TOOLTIP_LENGTH {
        return Err(Error::capacity("Hyperlink tooltip", MAX_TOOLTIP_LENGTH, length));
    }
    Ok(())
}

fn split_fragment(url: &str) -> (&str, Option<String>) {
    match url.split_once('#') {
        Some((base, fragment)) => (base, Some(fragment.to_string())),
        None => (url, None),
    }
}

fn is_absolute_path(path: &str) -> bool {
    let bytes = path.as_bytes();
    path.starts_with('/')
        || path.starts_with("\\\\")
        || (bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':')
}

/// Percent-escape characters that are not allowed unescaped in a link
/// target. An existing `%XX` sequence is kept as is.
pub fn escape_url(url: &str) -> Cow<'_, str> {
    let bytes = url.as_bytes();
    let needs_escape = |i: usize| match bytes[i] {
        b' ' | b'"' | b'<' | b'>' | b'[' | b']' | b'`' | b'^' | b'{' | b'}' => true,
        b'%' => !is_percent_escape(&bytes[i..]),
        _ => false,
    };

    if !(0..bytes.len()).any(needs_escape) {
        return Cow::Borrowed(url);
    }

    let mut out = String::with_capacity(url.len() + 8);
    for (i, c) in url.char_indices() {
        if c.is_ascii() && needs_escape(i) {
            out.push_str(&format!("%{:02x}", c as u8));
        } else {
            out.push(c);
        }
    }
    Cow::Owned(out)
}

fn is_percent_escape(bytes: &[u8]) -> bool {
    bytes.len() >= 3 && bytes[1].is_ascii_hexdigit() && bytes[2].is_ascii_hexdigit()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_web_url() {
        let parsed = parse_url("https://example.com/a b#top").unwrap();
        assert_eq!(parsed.kind, HyperlinkKind::Url);
        assert_eq!(parsed.target, "https://example.com/a%20b");
        assert_eq!(parsed.location.as_deref(), Some("top"));
        assert_eq!(parsed.default_display, "https://example.com/a b#top");
    }

    #[test]
    fn test_mailto_display_drops_scheme() {
        let parsed = parse_url("mailto:jo@example.com").unwrap();
        assert_eq!(parsed.default_display, "jo@example.com");
        assert_eq!(parsed.target, "mailto:jo@example.com");
    }

    #[test]
    fn test_internal_link() {
        let parsed = parse_url("internal:Sheet2!A1").unwrap();
        assert_eq!(parsed.kind, HyperlinkKind::Internal);
        assert_eq!(parsed.target, "");
        assert_eq!(parsed.location.as_deref(), Some("Sheet2!A1"));
        assert_eq!(parsed.default_display, "Sheet2!A1");
    }

    #[test]
    fn test_external_file() {
        let parsed = parse_url(r"external:c:\temp\foo.xlsx#Sheet1!A1").unwrap();
        assert_eq!(parsed.kind, HyperlinkKind::ExternalFile);
        assert_eq!(parsed.target, r"file:///c:\temp\foo.xlsx");
        assert_eq!(parsed.location.as_deref(), Some("Sheet1!A1"));

        let relative = parse_url("external:foo.xlsx").unwrap();
        assert_eq!(relative.target, "foo.xlsx");
    }

    #[test]
    fn test_unknown_scheme() {
        assert!(matches!(parse_url("gopher://x"), Err(Error::InvalidUrl(_))));
    }

    #[test]
    fn test_escape_keeps_existing_escapes() {
        assert_eq!(escape_url("http://a/b%20c"), "http://a/b%20c");
        assert_eq!(escape_url("http://a/100%"), "http://a/100%25");
        assert_eq!(escape_url("http://a/{x}"), "http://a/%7bx%7d");
        assert!(matches!(escape_url("http://plain"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_overlong_url_is_rejected() {
        let url = format!("http://example.com/{}", "a".repeat(MAX_URL_LENGTH));
        match parse_url(&url) {
            Err(Error::CapacityExceeded { limit, .. }) => assert_eq!(limit, MAX_URL_LENGTH),
            other => panic!("expected CapacityExceeded, got {other:?}"),
        }
    }

    #[test]
    fn test_escaping_can_push_url_over_limit() {
        let url = format!("http://x/{}", " ".repeat(700));
        assert!(url.len() < MAX_URL_LENGTH);
        assert!(matches!(
            parse_url(&url),
            Err(Error::CapacityExceeded { .. })
        ));
    }

    #[test]
    fn test_tooltip_limit() {
        assert!(check_tooltip(&"t".repeat(MAX_TOOLTIP_LENGTH)).is_ok());
        assert!(check_tooltip(&"t".repeat(MAX_TOOLTIP_LENGTH + 1)).is_err());
    }
}
