use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Command line interface for awl
#[derive(Parser, Debug)]
#[command(author, version, about = "AWL: Automatic Word Linker")]
pub struct Cli {
  /// Subcommand to execute (see [`Commands`])
  #[command(subcommand)]
  pub command: Commands,

  /// Enable verbose debug logging
  #[arg(short, long)]
  pub verbose: bool,

  /// Path to the configuration file (TOML or JSON)
  #[arg(short = 'c', long = "config-file")]
  pub config_file: Option<PathBuf>,
}

/// All supported subcommands for the awl CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
  /// Initialize a new AWL configuration file
  Init {
    /// Path to create the configuration file at
    #[arg(short, long, default_value = "awl.toml")]
    output: PathBuf,

    /// Format of the configuration file.
    #[arg(short = 'F', long, default_value = "toml", value_parser = ["toml", "json"])]
    format: String,

    /// Force overwrite if file already exists
    #[arg(short, long)]
    force: bool,
  },

  /// Annotate a single HTML document with keyword links.
  Apply {
    /// Input file to annotate. Reads stdin when omitted.
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output file for the annotated document. Writes stdout when omitted.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Rewrite the input file in place.
    #[arg(long, requires = "input", conflicts_with = "output")]
    in_place: bool,

    /// Keyword table to use instead of the configured one.
    #[arg(short, long)]
    keywords: Option<PathBuf>,
  },

  /// Reprocess older stored documents with the current keyword table.
  Batch {
    /// Directory of stored documents. Overrides the configured one.
    #[arg(short, long)]
    content_dir: Option<PathBuf>,

    /// Only touch files untouched for at least this many days.
    #[arg(long = "older-than")]
    older_than_days: Option<u16>,

    /// Maximum number of files to rewrite in this run.
    #[arg(short, long)]
    limit: Option<usize>,

    /// Number of threads to use for parallel processing.
    #[arg(short = 'p', long = "jobs")]
    jobs: Option<usize>,

    /// Report what would change without rewriting any file.
    #[arg(long)]
    dry_run: bool,

    /// Keyword table to use instead of the configured one.
    #[arg(short, long)]
    keywords: Option<PathBuf>,
  },

  /// Manage the keyword table.
  Keyword {
    /// Keyword table to use instead of the configured one.
    #[arg(short, long)]
    keywords: Option<PathBuf>,

    #[command(subcommand)]
    action: KeywordCommand,
  },

  /// Render the bundled documentation to HTML.
  Docs {
    /// Render the changelog instead of the readme.
    #[arg(long)]
    changelog: bool,

    /// Output file for the rendered page. Writes stdout when omitted.
    #[arg(short, long)]
    output: Option<PathBuf>,
  },
}

/// Operations on the keyword table.
#[derive(Subcommand, Debug)]
pub enum KeywordCommand {
  /// Add a keyword row.
  Add {
    /// Phrase to match in stored documents.
    keyword: String,

    /// Destination URL for inserted links.
    target_url: String,

    /// Most links for this keyword per document.
    #[arg(short = 'm', long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..=3))]
    max_per_post: u32,

    /// Link relation. `nofollow` emits rel="nofollow" on inserted anchors.
    #[arg(short = 'r', long, default_value = "dofollow", value_parser = ["dofollow", "nofollow"])]
    rel: String,
  },

  /// List keyword rows, newest first.
  List {
    /// Page number, starting at 1.
    #[arg(short, long, default_value_t = 1)]
    page: usize,

    /// Rows per page.
    #[arg(long, default_value_t = awl_store::DEFAULT_PER_PAGE)]
    per_page: usize,
  },

  /// Update fields of an existing keyword row.
  Update {
    /// Row identifier to update.
    id: u64,

    /// New phrase to match.
    #[arg(short = 'k', long)]
    keyword: Option<String>,

    /// New destination URL.
    #[arg(short = 't', long)]
    target_url: Option<String>,

    /// New per-document cap for this keyword.
    #[arg(short = 'm', long, value_parser = clap::value_parser!(u32).range(1..=3))]
    max_per_post: Option<u32>,

    /// New link relation.
    #[arg(short = 'r', long, value_parser = ["dofollow", "nofollow"])]
    rel: Option<String>,
  },

  /// Remove a keyword row.
  Remove {
    /// Row identifier to remove.
    id: u64,
  },
}

impl Cli {
  /// Parse command line arguments into a [`Cli`] struct.
  #[must_use]
  pub fn parse_args() -> Self {
    Self::parse()
  }
}
