//! Render the bundled documentation to HTML.

use std::{fs, path::Path};

use color_eyre::eyre::{Context, Result};
use comrak::{markdown_to_html, options::Options};
use log::info;
use regex::Regex;

/// Render README.md or CHANGELOG.md from the working directory as HTML.
///
/// # Errors
///
/// Returns an error if the source file cannot be read or the output file
/// cannot be written.
pub fn render(changelog: bool, output: Option<&Path>) -> Result<()> {
  let source = if changelog {
    "CHANGELOG.md"
  } else {
    "README.md"
  };
  let markdown = fs::read_to_string(source)
    .wrap_err_with(|| format!("Failed to read {source}"))?;

  let html = markdown_to_html(&markdown, &comrak_options());

  // Rendered pages are text-only, images are dropped.
  let img_tag = Regex::new(r"<img[^>]*>")?;
  let html = img_tag.replace_all(&html, "");

  match output {
    Some(path) => {
      fs::write(path, html.as_bytes())
        .wrap_err_with(|| format!("Failed to write {}", path.display()))?;
      info!("Rendered {source} to {}", path.display());
    },
    None => println!("{html}"),
  }

  Ok(())
}

/// Build comrak options for rendering project documentation.
fn comrak_options() -> Options<'static> {
  let mut options = Options::default();
  options.extension.table = true;
  options.extension.strikethrough = true;
  options.extension.tasklist = true;
  options.extension.autolink = true;
  options.render.r#unsafe = true;
  options
}
