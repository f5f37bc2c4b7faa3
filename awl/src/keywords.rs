//! Handlers for the `keyword` subcommand family.

use awl_linker::RelAttribute;
use awl_store::{KeywordStore, KeywordUpdate};
use color_eyre::eyre::{Result, eyre};
use log::info;

use crate::cli::KeywordCommand;

/// Dispatch one keyword table operation against the store.
pub fn handle_keyword_command(
  store: &KeywordStore,
  action: &KeywordCommand,
) -> Result<()> {
  match action {
    KeywordCommand::Add {
      keyword,
      target_url,
      max_per_post,
      rel,
    } => {
      let rel = parse_rel(rel)?;
      let row = store.add(keyword, target_url, *max_per_post, rel)?;
      info!("Added keyword {:?} with id {}", row.keyword, row.id);
      Ok(())
    },
    KeywordCommand::List { page, per_page } => {
      list_keywords(store, *page, *per_page)
    },
    KeywordCommand::Update {
      id,
      keyword,
      target_url,
      max_per_post,
      rel,
    } => {
      let rel = match rel {
        Some(value) => Some(parse_rel(value)?),
        None => None,
      };
      let update = KeywordUpdate {
        keyword: keyword.clone(),
        target_url: target_url.clone(),
        max_per_post: *max_per_post,
        rel,
      };
      let row = store.update(*id, update)?;
      info!("Updated keyword {:?} (id {})", row.keyword, row.id);
      Ok(())
    },
    KeywordCommand::Remove { id } => {
      let row = store.remove(*id)?;
      info!("Removed keyword {:?} (id {})", row.keyword, row.id);
      Ok(())
    },
  }
}

/// Print one page of the keyword table as an aligned text table.
fn list_keywords(
  store: &KeywordStore,
  page: usize,
  per_page: usize,
) -> Result<()> {
  let listing = store.list(page, per_page)?;

  if listing.rows.is_empty() {
    println!(
      "No keywords on page {} of {}.",
      listing.page, listing.total_pages
    );
    return Ok(());
  }

  println!(
    "{:<6} {:<24} {:<40} {:>4} {:<8}",
    "id", "keyword", "target url", "max", "rel"
  );
  for row in &listing.rows {
    // Width specifiers only apply to strings, so render the rel first.
    let rel = row.entry.rel.to_string();
    println!(
      "{:<6} {:<24} {:<40} {:>4} {rel:<8}",
      row.id, row.keyword, row.entry.target_url, row.entry.max_per_post
    );
  }
  println!(
    "Page {} of {} ({} keyword(s) total)",
    listing.page, listing.total_pages, listing.total_rows
  );

  Ok(())
}

fn parse_rel(value: &str) -> Result<RelAttribute> {
  value.parse().map_err(|message: String| eyre!(message))
}
