//! Ancestor checks for regions that must not receive links.
use std::collections::HashSet;

use kuchikikiki::NodeRef;

/// Tag names whose descendants never receive links: text that is already
/// a link, a quote, or a heading stays untouched.
pub const DEFAULT_SKIP_TAGS: [&str; 8] =
  ["a", "blockquote", "h1", "h2", "h3", "h4", "h5", "h6"];

/// Whether any ancestor element of `node` carries a tag name from
/// `skip_tags`.
///
/// Walks parent links up to the root and returns on the first hit. Tag
/// names are compared in ASCII lowercase; `skip_tags` entries are expected
/// lowercase. No side effects.
#[must_use]
pub fn has_disallowed_ancestor(
  node: &NodeRef,
  skip_tags: &HashSet<String>,
) -> bool {
  let mut parent = node.parent();
  while let Some(p) = parent {
    if let Some(element) = p.as_element() {
      let name = element.name.local.as_ref().to_ascii_lowercase();
      if skip_tags.contains(name.as_str()) {
        return true;
      }
    }
    parent = p.parent();
  }
  false
}
