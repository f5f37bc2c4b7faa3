//! Dictionary data model: keywords and their link metadata.
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Link-relation flag for an inserted anchor.
///
/// `Dofollow` emits no `rel` attribute at all; `Nofollow` emits
/// `rel="nofollow"`.
#[derive(
  Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq,
)]
#[serde(rename_all = "lowercase")]
pub enum RelAttribute {
  /// No `rel` attribute is emitted.
  #[default]
  Dofollow,
  /// `rel="nofollow"` is emitted.
  Nofollow,
}

impl RelAttribute {
  /// Whether this relation emits `rel="nofollow"`.
  #[must_use]
  pub const fn is_nofollow(self) -> bool {
    matches!(self, Self::Nofollow)
  }
}

impl std::fmt::Display for RelAttribute {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Dofollow => write!(f, "dofollow"),
      Self::Nofollow => write!(f, "nofollow"),
    }
  }
}

impl std::str::FromStr for RelAttribute {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_ascii_lowercase().as_str() {
      "dofollow" => Ok(Self::Dofollow),
      "nofollow" => Ok(Self::Nofollow),
      other => {
        Err(format!(
          "unknown rel attribute {other:?} (expected \"dofollow\" or \
           \"nofollow\")"
        ))
      },
    }
  }
}

/// Link metadata attached to one dictionary keyword.
///
/// The keyword itself is held as the [`Dictionary`] key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct KeywordEntry {
  /// Destination URL for inserted anchors. Escaped for attribute use when
  /// the anchor is built, not here.
  pub target_url: String,

  /// How many times this keyword may be linked within one document.
  /// Must be positive.
  #[serde(default = "default_max_per_post")]
  pub max_per_post: u32,

  /// Link-relation flag.
  #[serde(rename = "rel_attribute", default)]
  pub rel: RelAttribute,
}

const fn default_max_per_post() -> u32 {
  1
}

impl KeywordEntry {
  /// Create an entry for `target_url`, linked at most `max_per_post` times
  /// per document.
  #[must_use]
  pub fn new(
    target_url: impl Into<String>,
    max_per_post: u32,
    rel: RelAttribute,
  ) -> Self {
    Self {
      target_url: target_url.into(),
      max_per_post,
      rel,
    }
  }
}

/// Ordered mapping from keyword to [`KeywordEntry`].
///
/// Iteration order is insertion order, and it matters: when several
/// keywords could match in the same text node, the first-declared keyword
/// wins. Overlapping or substring keywords are not coordinated beyond
/// that, so dictionary ordering is part of the configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dictionary {
  entries: IndexMap<String, KeywordEntry>,
}

impl Dictionary {
  /// Create an empty dictionary.
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Insert an entry for `keyword`, returning the previous entry if the
  /// keyword was already present. Replacement keeps the keyword's original
  /// position.
  pub fn insert(
    &mut self,
    keyword: impl Into<String>,
    entry: KeywordEntry,
  ) -> Option<KeywordEntry> {
    self.entries.insert(keyword.into(), entry)
  }

  /// Look up the entry for an exact keyword string.
  #[must_use]
  pub fn get(&self, keyword: &str) -> Option<&KeywordEntry> {
    self.entries.get(keyword)
  }

  /// Whether an exact keyword string is present.
  #[must_use]
  pub fn contains(&self, keyword: &str) -> bool {
    self.entries.contains_key(keyword)
  }

  /// Number of keywords.
  #[must_use]
  pub fn len(&self) -> usize {
    self.entries.len()
  }

  /// Whether the dictionary holds no keywords.
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Iterate keywords and entries in declaration order.
  pub fn iter(&self) -> impl Iterator<Item = (&str, &KeywordEntry)> {
    self.entries.iter().map(|(keyword, entry)| (keyword.as_str(), entry))
  }
}

impl FromIterator<(String, KeywordEntry)> for Dictionary {
  fn from_iter<I: IntoIterator<Item = (String, KeywordEntry)>>(
    iter: I,
  ) -> Self {
    Self {
      entries: iter.into_iter().collect(),
    }
  }
}
