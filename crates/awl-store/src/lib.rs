//! # awl-store - persistence for the AWL keyword table
//!
//! CRUD over a JSON-array keyword file plus the time-bounded dictionary
//! cache the linker reads through. Row layout mirrors the keyword table
//! columns: `id`, `keyword`, `target_url`, `max_per_post`,
//! `rel_attribute`.
//!
//! ```rust,no_run
//! use awl_linker::RelAttribute;
//! use awl_store::KeywordStore;
//!
//! # fn main() -> Result<(), awl_store::StoreError> {
//! let store = KeywordStore::open("keywords.json");
//! store.add("widget", "https://x.test/w", 1, RelAttribute::Dofollow)?;
//!
//! let dictionary = store.dictionary()?;
//! assert!(dictionary.contains("widget"));
//! # Ok(())
//! # }
//! ```

mod cache;
mod error;
mod store;

pub use crate::{
  cache::DEFAULT_CACHE_TTL,
  error::StoreError,
  store::{
    DEFAULT_PER_PAGE,
    KeywordPage,
    KeywordRow,
    KeywordStore,
    KeywordUpdate,
  },
};
