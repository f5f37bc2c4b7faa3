//! File-backed keyword table with CRUD, pagination, and cached
//! dictionary reads.
use std::{
  fs,
  path::{Path, PathBuf},
  sync::{Mutex, PoisonError},
};

use awl_linker::{Dictionary, KeywordEntry, RelAttribute};
use jiff::{SignedDuration, Timestamp};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::{
  cache::{DEFAULT_CACHE_TTL, DictionaryCache},
  error::StoreError,
};

/// Rows shown per page when listing keywords.
pub const DEFAULT_PER_PAGE: usize = 20;

/// One persisted keyword row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct KeywordRow {
  /// Row id, assigned on insert.
  pub id: u64,

  /// The literal phrase to match.
  pub keyword: String,

  /// Link metadata for the keyword.
  #[serde(flatten)]
  pub entry: KeywordEntry,
}

/// Partial update for one keyword row. `None` fields keep their current
/// value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordUpdate {
  pub keyword:      Option<String>,
  pub target_url:   Option<String>,
  pub max_per_post: Option<u32>,
  pub rel:          Option<RelAttribute>,
}

/// One page of keyword rows, newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordPage {
  pub rows:        Vec<KeywordRow>,
  pub page:        usize,
  pub per_page:    usize,
  pub total_rows:  usize,
  pub total_pages: usize,
}

/// File-backed keyword table.
///
/// Rows live in a JSON array on disk in insertion order. The dictionary
/// handed to the linker is built from that order and cached for
/// [`DEFAULT_CACHE_TTL`]; every successful write invalidates the cache so
/// the next read is fresh.
pub struct KeywordStore {
  path:    PathBuf,
  cache:   DictionaryCache,
  // Highest id issued by this handle, so removed ids are not reissued.
  last_id: Mutex<u64>,
}

impl KeywordStore {
  /// Open a store at `path`. The file is created on first write; a
  /// missing file reads as an empty table.
  #[must_use]
  pub fn open(path: impl Into<PathBuf>) -> Self {
    Self::with_cache_ttl(path, DEFAULT_CACHE_TTL)
  }

  /// Open a store with a custom dictionary cache lifetime.
  #[must_use]
  pub fn with_cache_ttl(
    path: impl Into<PathBuf>,
    ttl: SignedDuration,
  ) -> Self {
    Self {
      path:    path.into(),
      cache:   DictionaryCache::new(ttl),
      last_id: Mutex::new(0),
    }
  }

  /// Path of the backing file.
  #[must_use]
  pub fn path(&self) -> &Path {
    &self.path
  }

  /// Add a keyword row.
  ///
  /// Ids grow monotonically for the lifetime of this handle: removing
  /// the newest row does not make its id available again.
  ///
  /// # Errors
  ///
  /// Fails on an empty keyword, a zero `max_per_post`, a keyword string
  /// that is already present, or file I/O problems.
  pub fn add(
    &self,
    keyword: &str,
    target_url: &str,
    max_per_post: u32,
    rel: RelAttribute,
  ) -> Result<KeywordRow, StoreError> {
    let keyword = keyword.trim();
    validate_keyword(keyword)?;
    validate_cap(max_per_post)?;

    let mut rows = self.load_rows()?;
    if rows.iter().any(|row| row.keyword == keyword) {
      return Err(StoreError::DuplicateKeyword(keyword.to_string()));
    }

    let id = {
      let mut last_id =
        self.last_id.lock().unwrap_or_else(PoisonError::into_inner);
      let highest = rows.iter().map(|row| row.id).max().unwrap_or(0);
      let next = (*last_id).max(highest) + 1;
      *last_id = next;
      next
    };

    let row = KeywordRow {
      id,
      keyword: keyword.to_string(),
      entry: KeywordEntry::new(target_url, max_per_post, rel),
    };
    rows.push(row.clone());
    self.save_rows(&rows)?;

    info!("added keyword {:?} (id {id})", row.keyword);
    Ok(row)
  }

  /// Apply a partial update to the row with `id`, returning the updated
  /// row.
  ///
  /// # Errors
  ///
  /// Fails when the id is unknown, the new keyword is empty or collides
  /// with another row, the new cap is zero, or on file I/O problems.
  pub fn update(
    &self,
    id: u64,
    update: KeywordUpdate,
  ) -> Result<KeywordRow, StoreError> {
    let mut rows = self.load_rows()?;

    if let Some(keyword) = update.keyword.as_deref() {
      let keyword = keyword.trim();
      validate_keyword(keyword)?;
      if rows.iter().any(|row| row.id != id && row.keyword == keyword) {
        return Err(StoreError::DuplicateKeyword(keyword.to_string()));
      }
    }
    if let Some(cap) = update.max_per_post {
      validate_cap(cap)?;
    }

    let row = rows
      .iter_mut()
      .find(|row| row.id == id)
      .ok_or(StoreError::NotFound(id))?;

    if let Some(keyword) = update.keyword {
      row.keyword = keyword.trim().to_string();
    }
    if let Some(target_url) = update.target_url {
      row.entry.target_url = target_url;
    }
    if let Some(cap) = update.max_per_post {
      row.entry.max_per_post = cap;
    }
    if let Some(rel) = update.rel {
      row.entry.rel = rel;
    }

    let updated = row.clone();
    self.save_rows(&rows)?;

    debug!("updated keyword row {id}");
    Ok(updated)
  }

  /// Remove the row with `id`, returning it.
  ///
  /// # Errors
  ///
  /// Fails when the id is unknown or on file I/O problems.
  pub fn remove(&self, id: u64) -> Result<KeywordRow, StoreError> {
    let mut rows = self.load_rows()?;
    let index = rows
      .iter()
      .position(|row| row.id == id)
      .ok_or(StoreError::NotFound(id))?;
    let removed = rows.remove(index);
    self.save_rows(&rows)?;

    info!("removed keyword {:?} (id {id})", removed.keyword);
    Ok(removed)
  }

  /// Look up a single row by id.
  ///
  /// # Errors
  ///
  /// Fails on file I/O problems.
  pub fn get(&self, id: u64) -> Result<Option<KeywordRow>, StoreError> {
    Ok(self.load_rows()?.into_iter().find(|row| row.id == id))
  }

  /// Number of keyword rows.
  ///
  /// # Errors
  ///
  /// Fails on file I/O problems.
  pub fn count(&self) -> Result<usize, StoreError> {
    Ok(self.load_rows()?.len())
  }

  /// One page of rows, newest first (descending id). `page` is 1-based;
  /// a zero `per_page` falls back to [`DEFAULT_PER_PAGE`].
  ///
  /// # Errors
  ///
  /// Fails on file I/O problems.
  pub fn list(
    &self,
    page: usize,
    per_page: usize,
  ) -> Result<KeywordPage, StoreError> {
    let per_page = if per_page == 0 { DEFAULT_PER_PAGE } else { per_page };
    let page = page.max(1);

    let mut rows = self.load_rows()?;
    rows.sort_by(|a, b| b.id.cmp(&a.id));

    let total_rows = rows.len();
    let total_pages = total_rows.div_ceil(per_page).max(1);
    let start = (page - 1).saturating_mul(per_page);
    let rows: Vec<KeywordRow> =
      rows.into_iter().skip(start).take(per_page).collect();

    Ok(KeywordPage {
      rows,
      page,
      per_page,
      total_rows,
      total_pages,
    })
  }

  /// The dictionary snapshot for the linker, in table order.
  ///
  /// Served from the cache when fresh; on a miss the table is scanned and
  /// the cache repopulated.
  ///
  /// # Errors
  ///
  /// Fails on file I/O problems.
  pub fn dictionary(&self) -> Result<Dictionary, StoreError> {
    let now = Timestamp::now();
    if let Some(dictionary) = self.cache.get(now) {
      return Ok(dictionary);
    }

    let rows = self.load_rows()?;
    let dictionary: Dictionary =
      rows.into_iter().map(|row| (row.keyword, row.entry)).collect();
    self.cache.put(dictionary.clone(), now);

    debug!("dictionary cache refreshed ({} keywords)", dictionary.len());
    Ok(dictionary)
  }

  fn load_rows(&self) -> Result<Vec<KeywordRow>, StoreError> {
    if !self.path.exists() {
      return Ok(Vec::new());
    }

    let content = fs::read_to_string(&self.path)?;
    if content.trim().is_empty() {
      return Ok(Vec::new());
    }
    Ok(serde_json::from_str(&content)?)
  }

  fn save_rows(&self, rows: &[KeywordRow]) -> Result<(), StoreError> {
    if let Some(parent) = self.path.parent()
      && !parent.as_os_str().is_empty()
      && !parent.exists()
    {
      fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(rows)?;
    fs::write(&self.path, json)?;
    self.cache.invalidate();
    Ok(())
  }
}

fn validate_keyword(keyword: &str) -> Result<(), StoreError> {
  if keyword.is_empty() {
    return Err(StoreError::InvalidEntry(
      "keyword must not be empty".to_string(),
    ));
  }
  Ok(())
}

fn validate_cap(max_per_post: u32) -> Result<(), StoreError> {
  if max_per_post == 0 {
    return Err(StoreError::InvalidEntry(
      "max_per_post must be positive".to_string(),
    ));
  }
  Ok(())
}
