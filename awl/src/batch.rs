//! Batch reprocessing of stored documents.
//!
//! Walks the content directory for stored HTML files, keeps the ones
//! untouched for long enough, and runs the linker over the newest of
//! them. Files are only rewritten when the linker actually inserted
//! links.

use std::{
  fs,
  path::{Path, PathBuf},
};

use awl_linker::{Dictionary, Linker};
use awl_store::KeywordStore;
use color_eyre::eyre::{Context, Result};
use indicatif::{ParallelProgressIterator, ProgressBar};
use jiff::{SignedDuration, Timestamp};
use log::{debug, info, trace, warn};
use walkdir::WalkDir;

/// Parameters of one batch run.
#[derive(Debug, Clone)]
pub struct BatchOptions {
  /// Directory holding stored HTML documents.
  pub content_dir: PathBuf,

  /// Only touch files untouched for at least this many days.
  pub min_age_days: u16,

  /// Most files rewritten in one run.
  pub limit: usize,

  /// Report what would change without rewriting any file.
  pub dry_run: bool,
}

/// Summary of one batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchOutcome {
  /// Stored documents found under the content directory.
  pub scanned: usize,

  /// Documents old enough to reprocess, after the per-run cap.
  pub eligible: usize,

  /// Documents rewritten with new links.
  pub updated: usize,

  /// Links inserted across all processed documents.
  pub links_added: usize,
}

/// Run the linker over eligible stored documents.
///
/// # Errors
///
/// Returns an error if the keyword table cannot be loaded or a stored
/// document cannot be read or written.
pub fn run(
  linker: &Linker,
  store: &KeywordStore,
  options: &BatchOptions,
) -> Result<BatchOutcome> {
  use rayon::prelude::*;

  let dictionary = store.dictionary()?;
  if dictionary.is_empty() {
    info!("Keyword table is empty, nothing to reprocess");
    return Ok(BatchOutcome::default());
  }

  let files = collect_stored_documents(&options.content_dir);
  let scanned = files.len();

  let cutoff = Timestamp::now()
    .checked_sub(SignedDuration::from_hours(
      24 * i64::from(options.min_age_days),
    ))
    .unwrap_or(Timestamp::MIN);
  let eligible = select_eligible(files, cutoff, options.limit);
  info!(
    "{} of {scanned} stored document(s) eligible for relinking",
    eligible.len()
  );

  if eligible.is_empty() {
    return Ok(BatchOutcome {
      scanned,
      ..BatchOutcome::default()
    });
  }

  let progress = ProgressBar::new(eligible.len() as u64);
  let results: Vec<(usize, bool)> = eligible
    .par_iter()
    .progress_with(progress.clone())
    .map(|path| relink_document(linker, &dictionary, path, options.dry_run))
    .collect::<Result<Vec<_>>>()?;
  progress.finish_and_clear();

  let updated = results.iter().filter(|(_, written)| *written).count();
  let links_added = results.iter().map(|(links, _)| links).sum();

  info!("Relinked {updated} document(s), {links_added} link(s) inserted");
  Ok(BatchOutcome {
    scanned,
    eligible: results.len(),
    updated,
    links_added,
  })
}

/// Annotate one stored document, rewriting it only when links were
/// inserted. Returns the link count and whether the file was written.
fn relink_document(
  linker: &Linker,
  dictionary: &Dictionary,
  path: &Path,
  dry_run: bool,
) -> Result<(usize, bool)> {
  let content = fs::read_to_string(path).wrap_err_with(|| {
    format!("Failed to read stored document: {}", path.display())
  })?;

  let result = linker.annotate(&content, dictionary);
  if result.links_added == 0 {
    trace!("No links inserted into {}", path.display());
    return Ok((0, false));
  }

  if dry_run {
    info!(
      "Would insert {} link(s) into {}",
      result.links_added,
      path.display()
    );
    return Ok((result.links_added, false));
  }

  fs::write(path, &result.html).wrap_err_with(|| {
    format!("Failed to write stored document: {}", path.display())
  })?;
  debug!(
    "Inserted {} link(s) into {}",
    result.links_added,
    path.display()
  );
  Ok((result.links_added, true))
}

/// Collect stored documents and their modification times.
fn collect_stored_documents(content_dir: &Path) -> Vec<(PathBuf, Timestamp)> {
  let mut files = Vec::new();

  for entry in WalkDir::new(content_dir)
    .follow_links(true)
    .into_iter()
    .filter_map(Result::ok)
  {
    let path = entry.path();
    if !path.is_file() {
      continue;
    }
    let is_html = path
      .extension()
      .is_some_and(|ext| ext == "html" || ext == "htm");
    if !is_html {
      continue;
    }

    match entry.metadata().ok().and_then(|meta| meta.modified().ok()) {
      Some(modified) => {
        let modified =
          Timestamp::try_from(modified).unwrap_or(Timestamp::MIN);
        files.push((path.to_path_buf(), modified));
      },
      None => {
        warn!("Skipping {} (no modification time)", path.display());
      },
    }
  }

  trace!("Found {} stored documents to consider", files.len());
  files
}

/// Keep files at or before the cutoff, newest first, capped at `limit`.
fn select_eligible(
  mut files: Vec<(PathBuf, Timestamp)>,
  cutoff: Timestamp,
  limit: usize,
) -> Vec<PathBuf> {
  files.retain(|(_, modified)| *modified <= cutoff);
  files.sort_by(|a, b| b.1.cmp(&a.1));
  files.truncate(limit);
  files.into_iter().map(|(path, _)| path).collect()
}
