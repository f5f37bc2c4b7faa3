//! # awl-linker - keyword auto-linking for HTML fragments
//!
//! This crate wraps the first occurrence of configured keywords in anchor
//! elements, for turning a glossary of terms into internal links across
//! rendered content.
//!
//! Matching is literal, case-insensitive, and whole-word (Unicode-aware).
//! Each document receives at most a global cap of links (3 by default),
//! each keyword at most its own `max_per_post`, and text inside `a`,
//! `blockquote`, or `h1`-`h6` elements is never touched. Keywords are
//! tried in dictionary declaration order, so ordering is part of the
//! configuration.
//!
//! ## Quick Start
//!
//! ```rust
//! use awl_linker::{Dictionary, KeywordEntry, Linker, LinkerOptions, RelAttribute};
//!
//! let mut dictionary = Dictionary::new();
//! dictionary.insert(
//!   "widget",
//!   KeywordEntry::new("https://x.test/widgets", 1, RelAttribute::Dofollow),
//! );
//!
//! let linker = Linker::new(LinkerOptions::default());
//! let result = linker.annotate("<p>Buy a widget today.</p>", &dictionary);
//!
//! assert_eq!(result.links_added, 1);
//! assert!(result.html.contains("class=\"awl-link\""));
//! ```
//!
//! ## Failure behavior
//!
//! `annotate` never fails outward: empty or unusable dictionaries are a
//! no-op, unmatchable entries are skipped with a logged warning, and a
//! panic anywhere in the DOM stack is caught and the input handed back
//! unchanged. Persistence and caching of the dictionary live in the
//! `awl-store` crate; this crate only consumes a read-only snapshot per
//! call.

mod classify;
mod dictionary;
mod engine;
mod html;
mod matcher;

pub use crate::{
  classify::{DEFAULT_SKIP_TAGS, has_disallowed_ancestor},
  dictionary::{Dictionary, KeywordEntry, RelAttribute},
  engine::{
    DEFAULT_LINK_CLASS,
    DEFAULT_MAX_LINKS,
    LinkResult,
    Linker,
    LinkerOptions,
  },
  html::sanitize_url,
};
