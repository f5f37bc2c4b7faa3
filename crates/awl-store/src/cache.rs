//! Time-bounded cache for the dictionary snapshot.
use std::sync::{Mutex, PoisonError};

use awl_linker::Dictionary;
use jiff::{SignedDuration, Timestamp};
use log::trace;

/// Default cache lifetime. The keyword table changes rarely, so reads are
/// served from memory for a day unless a write invalidates them first.
pub const DEFAULT_CACHE_TTL: SignedDuration = SignedDuration::from_hours(24);

struct CacheSlot {
  dictionary: Dictionary,
  expires_at: Timestamp,
}

/// Interior-mutable TTL cache holding at most one dictionary snapshot.
///
/// Refresh races are tolerated: two callers that miss simultaneously both
/// rebuild the same snapshot and the writes are last-write-wins.
pub(crate) struct DictionaryCache {
  ttl:  SignedDuration,
  slot: Mutex<Option<CacheSlot>>,
}

impl DictionaryCache {
  pub(crate) const fn new(ttl: SignedDuration) -> Self {
    Self {
      ttl,
      slot: Mutex::new(None),
    }
  }

  /// The cached snapshot, unless missing or expired at `now`.
  pub(crate) fn get(&self, now: Timestamp) -> Option<Dictionary> {
    let slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
    match slot.as_ref() {
      Some(cached) if now < cached.expires_at => {
        trace!("dictionary cache hit");
        Some(cached.dictionary.clone())
      },
      _ => None,
    }
  }

  /// Store a fresh snapshot, stamped to expire one TTL after `now`.
  pub(crate) fn put(&self, dictionary: Dictionary, now: Timestamp) {
    let expires_at = now.checked_add(self.ttl).unwrap_or(Timestamp::MAX);
    let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
    *slot = Some(CacheSlot {
      dictionary,
      expires_at,
    });
  }

  /// Drop the cached snapshot so the next read scans the table again.
  pub(crate) fn invalidate(&self) {
    let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
    *slot = None;
  }
}
