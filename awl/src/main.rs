use std::{fs, path::Path};

use awl_linker::Linker;
use awl_store::KeywordStore;
use color_eyre::eyre::{Context, Result};
use log::{LevelFilter, debug, info};

mod batch;
mod cli;
mod config;
mod docs;
mod error;
mod keywords;

use cli::{Cli, Commands};
use color_eyre::eyre::bail;
use config::Config;

fn main() -> Result<()> {
  color_eyre::install()?;

  // Parse command line arguments
  let cli = Cli::parse_args();

  // Initialize logging first so we can log during command handling
  env_logger::Builder::new()
    .filter_level(if cli.verbose {
      LevelFilter::Debug
    } else {
      LevelFilter::Info
    })
    .write_style(env_logger::WriteStyle::Always)
    .init();

  match cli.command {
    Commands::Init {
      output,
      format,
      force,
    } => init_config(&output, &format, force),

    Commands::Apply {
      input,
      output,
      in_place,
      keywords,
    } => {
      let config = Config::load(cli.config_file.as_deref())?;
      apply_document(
        &config,
        input.as_deref(),
        output.as_deref(),
        in_place,
        keywords.as_deref(),
      )
    },

    Commands::Batch {
      content_dir,
      older_than_days,
      limit,
      jobs,
      dry_run,
      keywords,
    } => {
      let config = Config::load(cli.config_file.as_deref())?;

      // Setup thread pool once for all parallel operations
      let thread_count = jobs.or(config.jobs).unwrap_or_else(num_cpus::get);
      rayon::ThreadPoolBuilder::new()
        .num_threads(thread_count)
        .build_global()?;

      let store = open_store(&config, keywords.as_deref());
      let linker = Linker::new(config.linker_options());
      let options = batch::BatchOptions {
        content_dir: content_dir.unwrap_or(config.content_dir),
        min_age_days: older_than_days.unwrap_or(config.batch_min_age_days),
        limit: limit.unwrap_or(config.batch_limit),
        dry_run,
      };

      let outcome = batch::run(&linker, &store, &options)?;
      println!(
        "{} scanned, {} eligible, {} updated, {} link(s) inserted",
        outcome.scanned, outcome.eligible, outcome.updated, outcome.links_added
      );
      Ok(())
    },

    Commands::Keyword { keywords, action } => {
      let config = Config::load(cli.config_file.as_deref())?;
      let store = open_store(&config, keywords.as_deref());
      keywords::handle_keyword_command(&store, &action)
    },

    Commands::Docs { changelog, output } => {
      docs::render(changelog, output.as_deref())
    },
  }
}

/// Create a fresh configuration file for the `init` command.
fn init_config(output: &Path, format: &str, force: bool) -> Result<()> {
  // Check if file already exists and that we're not forcing overwrite
  if output.exists() && !force {
    bail!(
      "Configuration file already exists: {}. Use --force to overwrite.",
      output.display()
    );
  }

  // Create parent directories if needed
  if let Some(parent) = output.parent() {
    if !parent.as_os_str().is_empty() && !parent.exists() {
      fs::create_dir_all(parent).wrap_err_with(|| {
        format!("Failed to create directory: {}", parent.display())
      })?;
      info!("Created directory: {}", parent.display());
    }
  }

  Config::generate_default_config(format, output).wrap_err_with(|| {
    format!(
      "Failed to generate configuration file: {}",
      output.display()
    )
  })?;

  info!(
    "Configuration file created successfully. Point keywords_path at your \
     keyword table and content_dir at your stored documents."
  );
  Ok(())
}

/// Annotate one document from a file or stdin and emit the result.
fn apply_document(
  config: &Config,
  input: Option<&Path>,
  output: Option<&Path>,
  in_place: bool,
  keywords: Option<&Path>,
) -> Result<()> {
  use std::io::Read;

  let html = match input {
    Some(path) => {
      fs::read_to_string(path).wrap_err_with(|| {
        format!("Failed to read input file: {}", path.display())
      })?
    },
    None => {
      let mut buffer = String::new();
      std::io::stdin()
        .read_to_string(&mut buffer)
        .wrap_err("Failed to read stdin")?;
      buffer
    },
  };

  let store = open_store(config, keywords);
  let dictionary = store.dictionary()?;
  if dictionary.is_empty() {
    debug!("Keyword table is empty, emitting input unchanged");
  }

  let linker = Linker::new(config.linker_options());
  let result = linker.annotate(&html, &dictionary);
  info!("Inserted {} link(s)", result.links_added);

  let destination = if in_place { input } else { output };
  match destination {
    Some(path) => {
      fs::write(path, &result.html).wrap_err_with(|| {
        format!("Failed to write output file: {}", path.display())
      })?;
    },
    None => print!("{}", result.html),
  }

  Ok(())
}

/// Open the keyword store configured for this invocation.
fn open_store(config: &Config, keywords: Option<&Path>) -> KeywordStore {
  let path = keywords.unwrap_or(&config.keywords_path);
  debug!("Using keyword table at {}", path.display());
  KeywordStore::open(path)
}
