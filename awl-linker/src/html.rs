//! Fragment parsing, serialization, and URL hygiene.
use kuchikikiki::NodeRef;
use tendril::TendrilSink;
use url::Url;

/// Schemes allowed through [`sanitize_url`] for absolute URLs.
const ALLOWED_SCHEMES: [&str; 10] = [
  "http", "https", "ftp", "ftps", "mailto", "news", "irc", "tel", "webcal",
  "xmpp",
];

/// Parse an HTML fragment into a document tree.
///
/// html5ever always recovers into a full document skeleton, so the
/// fragment ends up under `<head>`/`<body>`; [`serialize_fragment`] undoes
/// that on the way out.
pub(crate) fn parse_fragment(html: &str) -> NodeRef {
  kuchikikiki::parse_html().one(html)
}

/// Serialize a parsed fragment back to a string without the document
/// skeleton the parser added.
///
/// Head children come first (the parser moves `<title>`, `<meta>` and
/// friends there), then body children, which restores the original
/// fragment order for body-content input. Falls back to serializing the
/// whole tree if the skeleton is missing.
pub(crate) fn serialize_fragment(document: &NodeRef) -> String {
  let mut out = Vec::new();
  let mut found_skeleton = false;

  for selector in ["head", "body"] {
    if let Ok(mut matches) = document.select(selector)
      && let Some(section) = matches.next()
    {
      found_skeleton = true;
      for child in section.as_node().children() {
        child.serialize(&mut out).unwrap_or_default();
      }
    }
  }

  if !found_skeleton {
    document.serialize(&mut out).unwrap_or_default();
  }

  String::from_utf8(out).unwrap_or_default()
}

/// Normalize a link target for use in an `href` attribute.
///
/// Absolute URLs are parsed and re-serialized, and must carry an allowed
/// scheme. Site-relative targets are kept as-is apart from
/// percent-escaping the characters that cannot appear raw in an
/// attribute. Anything unparseable sanitizes to an empty string, which
/// callers treat as "do not link".
#[must_use]
pub fn sanitize_url(raw: &str) -> String {
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    return String::new();
  }

  match Url::parse(trimmed) {
    Ok(url) => {
      if ALLOWED_SCHEMES.contains(&url.scheme()) {
        url.to_string()
      } else {
        String::new()
      }
    },
    Err(url::ParseError::RelativeUrlWithoutBase) => {
      trimmed
        .replace(' ', "%20")
        .replace('"', "%22")
        .replace('<', "%3C")
        .replace('>', "%3E")
    },
    Err(_) => String::new(),
  }
}
