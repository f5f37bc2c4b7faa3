//! The linking engine: walks text nodes and wraps keyword matches in
//! anchors.
use std::collections::{HashMap, HashSet};

use kuchikikiki::NodeRef;
use log::{debug, error, trace, warn};
use regex::Regex;

use crate::{
  classify::{DEFAULT_SKIP_TAGS, has_disallowed_ancestor},
  dictionary::{Dictionary, KeywordEntry},
  html::{parse_fragment, sanitize_url, serialize_fragment},
  matcher::{keyword_pattern, split_first_match},
};

/// Maximum number of links inserted into one document, across all
/// keywords.
pub const DEFAULT_MAX_LINKS: usize = 3;

/// Class attribute applied to every inserted anchor.
pub const DEFAULT_LINK_CLASS: &str = "awl-link";

/// Options controlling one [`Linker`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkerOptions {
  /// Class attribute placed on inserted anchors, for style targeting.
  pub link_class: String,

  /// Global cap on inserted links per document.
  pub max_links: usize,

  /// Tag names whose descendants never receive links.
  pub skip_tags: Vec<String>,
}

impl Default for LinkerOptions {
  fn default() -> Self {
    Self {
      link_class: DEFAULT_LINK_CLASS.to_string(),
      max_links:  DEFAULT_MAX_LINKS,
      skip_tags:  DEFAULT_SKIP_TAGS
        .iter()
        .map(std::string::ToString::to_string)
        .collect(),
    }
  }
}

/// Outcome of one annotation pass over one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkResult {
  /// The annotated HTML fragment. Identical to the input when nothing was
  /// inserted.
  pub html: String,

  /// Number of anchors inserted.
  pub links_added: usize,
}

/// One dictionary entry prepared for matching: compiled pattern,
/// sanitized link target, and the normalized key used for per-keyword
/// counting.
struct CompiledKeyword<'d> {
  keyword:     &'d str,
  entry:       &'d KeywordEntry,
  pattern:     Regex,
  href:        String,
  counter_key: String,
}

/// Keyword auto-linker for HTML fragments.
///
/// One `annotate` call processes one document start to finish with its own
/// counters; the linker itself holds only configuration, so a single
/// instance may serve any number of documents, concurrently included.
#[derive(Debug, Clone, Default)]
pub struct Linker {
  options: LinkerOptions,
}

impl Linker {
  /// Create a linker with the given options.
  #[must_use]
  pub const fn new(options: LinkerOptions) -> Self {
    Self { options }
  }

  /// Access linker options.
  #[must_use]
  pub const fn options(&self) -> &LinkerOptions {
    &self.options
  }

  /// Annotate an HTML fragment with keyword links.
  ///
  /// For each text node (in document order, skipping nodes inside
  /// disallowed ancestors), dictionary keywords are tried in declaration
  /// order; the first whole-word, case-insensitive match splits the node
  /// into before/anchor/after. A text node contributes at most one link,
  /// each keyword links at most `max_per_post` times, and the document as
  /// a whole receives at most `max_links` links.
  ///
  /// # Arguments
  ///
  /// * `html` - The fragment to annotate
  /// * `dictionary` - Keyword snapshot for this pass
  ///
  /// # Returns
  ///
  /// A [`LinkResult`] with the output fragment and the number of anchors
  /// inserted. Never fails: an empty or unusable dictionary, or a panic
  /// inside the DOM stack on pathological input, returns the input
  /// unchanged with a count of zero.
  #[must_use]
  pub fn annotate(&self, html: &str, dictionary: &Dictionary) -> LinkResult {
    if html.is_empty() || dictionary.is_empty() {
      return LinkResult {
        html:        html.to_string(),
        links_added: 0,
      };
    }

    let compiled = compile_dictionary(dictionary);
    if compiled.is_empty() {
      return LinkResult {
        html:        html.to_string(),
        links_added: 0,
      };
    }

    let pass = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
      let document = parse_fragment(html);
      let links_added = self.link_document(&document, &compiled);

      // Serialize only when the tree changed, so a no-match pass does not
      // rewrite the input with parser normalization.
      let html = if links_added == 0 {
        html.to_string()
      } else {
        serialize_fragment(&document)
      };

      LinkResult { html, links_added }
    }));

    match pass {
      Ok(result) => {
        debug!("inserted {} link(s)", result.links_added);
        result
      },
      Err(panic_err) => {
        error!("Panic while annotating document: {panic_err:?}");
        LinkResult {
          html:        html.to_string(),
          links_added: 0,
        }
      },
    }
  }

  /// Walk the parsed document and insert anchors in place. Returns the
  /// number of links inserted.
  fn link_document(
    &self,
    document: &NodeRef,
    compiled: &[CompiledKeyword<'_>],
  ) -> usize {
    let skip_tags: HashSet<String> = self
      .options
      .skip_tags
      .iter()
      .map(|tag| tag.to_ascii_lowercase())
      .collect();

    // Snapshot the text nodes before touching the tree; splicing while
    // iterating live structure would skip or revisit siblings.
    let mut text_nodes = Vec::new();
    for node in document.inclusive_descendants() {
      if node.as_text().is_some() {
        text_nodes.push(node);
      }
    }

    let mut links_added = 0usize;
    let mut per_keyword: HashMap<String, u32> = HashMap::new();

    'nodes: for text_node in text_nodes {
      if has_disallowed_ancestor(&text_node, &skip_tags) {
        continue;
      }

      let Some(text) = text_node.as_text() else {
        continue;
      };
      let content = text.borrow().clone();
      if content.trim().is_empty() {
        continue;
      }

      for candidate in compiled {
        if links_added >= self.options.max_links {
          break 'nodes;
        }

        let count =
          per_keyword.get(&candidate.counter_key).copied().unwrap_or(0);
        if count >= candidate.entry.max_per_post {
          continue;
        }

        let Some((before, matched, after)) =
          split_first_match(&content, &candidate.pattern)
        else {
          continue;
        };

        if !before.is_empty() {
          text_node.insert_before(NodeRef::new_text(before));
        }
        text_node.insert_before(self.build_anchor(candidate, matched));
        if !after.is_empty() {
          text_node.insert_before(NodeRef::new_text(after));
        }
        text_node.detach();

        links_added += 1;
        *per_keyword.entry(candidate.counter_key.clone()).or_insert(0) += 1;
        trace!("linked {:?} -> {}", candidate.keyword, candidate.href);

        // One link per text node.
        continue 'nodes;
      }
    }

    links_added
  }

  /// Build the anchor element for a matched keyword occurrence. The
  /// anchor text keeps the casing found in the document; `title` carries
  /// the dictionary form.
  fn build_anchor(
    &self,
    candidate: &CompiledKeyword<'_>,
    matched: &str,
  ) -> NodeRef {
    let mut attributes = vec![
      (
        kuchikikiki::ExpandedName::new("", "class"),
        kuchikikiki::Attribute {
          prefix: None,
          value:  self.options.link_class.clone(),
        },
      ),
      (
        kuchikikiki::ExpandedName::new("", "href"),
        kuchikikiki::Attribute {
          prefix: None,
          value:  candidate.href.clone(),
        },
      ),
      (
        kuchikikiki::ExpandedName::new("", "title"),
        kuchikikiki::Attribute {
          prefix: None,
          value:  candidate.keyword.to_string(),
        },
      ),
    ];

    if candidate.entry.rel.is_nofollow() {
      attributes.push((
        kuchikikiki::ExpandedName::new("", "rel"),
        kuchikikiki::Attribute {
          prefix: None,
          value:  "nofollow".into(),
        },
      ));
    }

    let anchor = NodeRef::new_element(
      markup5ever::QualName::new(
        None,
        markup5ever::ns!(html),
        markup5ever::local_name!("a"),
      ),
      attributes,
    );
    anchor.append(NodeRef::new_text(matched));
    anchor
  }
}

/// Prepare a dictionary for one pass: compile patterns and sanitize link
/// targets, dropping entries that cannot be used.
fn compile_dictionary(dictionary: &Dictionary) -> Vec<CompiledKeyword<'_>> {
  let mut compiled = Vec::with_capacity(dictionary.len());

  for (keyword, entry) in dictionary.iter() {
    let pattern = match keyword_pattern(keyword) {
      Ok(pattern) => pattern,
      Err(err) => {
        warn!("skipping keyword {keyword:?}: {err}");
        continue;
      },
    };

    let href = sanitize_url(&entry.target_url);
    if href.is_empty() {
      warn!(
        "skipping keyword {keyword:?}: unusable target URL {:?}",
        entry.target_url
      );
      continue;
    }

    compiled.push(CompiledKeyword {
      keyword,
      entry,
      pattern,
      href,
      counter_key: keyword.to_lowercase(),
    });
  }

  compiled
}
