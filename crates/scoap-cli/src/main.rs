//! `scoap`: command-line access to the SCOAP article stores.
//!
//! # Usage
//!
//! ```text
//! scoap --store articles.db legacy 1234
//! scoap --store articles.db --index index.db export legacy --source search --out records.json
//! scoap --config ~/.config/scoap/config.toml scan-all --out compliance.csv
//! scoap crossref analyze --dois dois.csv --field author.ORCID=nr --csv out.csv
//! scoap crossref flatten --dois dois.csv --out works.csv
//! ```

mod client;
mod commands;
mod settings;

use std::{path::PathBuf, process::ExitCode};

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use scoap_core::ArticleId;
use scoap_export::crossref::FieldSpec;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "scoap", version, about = "SCOAP legacy records, exports and compliance scans")]
struct Args {
  /// Path to a TOML config file (store, index, files, phrase, concurrency).
  #[arg(short, long, value_name = "FILE", global = true)]
  config: Option<PathBuf>,

  /// Relational store database.
  #[arg(long, env = "SCOAP_STORE", global = true)]
  store: Option<PathBuf>,

  /// Search-document index database.
  #[arg(long, env = "SCOAP_INDEX", global = true)]
  index: Option<PathBuf>,

  /// Directory that attachment keys resolve against.
  #[arg(long, env = "SCOAP_FILES", global = true)]
  files: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

/// Which backend an article is loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Source {
  Relational,
  Search,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Print the legacy record of one article.
  Legacy {
    id:     ArticleId,
    #[arg(long, value_enum, default_value_t = Source::Relational)]
    source: Source,
  },
  /// Export every article.
  Export {
    #[command(subcommand)]
    what: ExportCommand,
  },
  /// Scan one article's attachments for the funding statement.
  Scan {
    id:     ArticleId,
    /// Phrase to look for instead of the configured one.
    #[arg(long)]
    phrase: Option<String>,
  },
  /// Scan every article and write a CSV report.
  ScanAll {
    #[arg(long, value_name = "FILE")]
    out: Option<PathBuf>,
  },
  /// Import a JSON array of articles into the store and index them.
  Import { file: PathBuf },
  /// Rebuild the search-document index from the store.
  Reindex,
  /// Crossref metadata tools.
  Crossref {
    #[command(subcommand)]
    what: CrossrefCommand,
  },
}

#[derive(Subcommand, Debug)]
enum ExportCommand {
  /// JSON array of legacy records, ordered by control number.
  Legacy {
    #[arg(long, value_enum, default_value_t = Source::Relational)]
    source: Source,
    #[arg(long, value_name = "FILE")]
    out:    Option<PathBuf>,
  },
  /// Summary CSV of every article.
  Summary {
    #[arg(long, value_name = "FILE")]
    out: Option<PathBuf>,
  },
}

#[derive(Subcommand, Debug)]
enum CrossrefCommand {
  /// Fetch each DOI's work and analyse the requested fields.
  Analyze {
    /// CSV file with a `doi` column.
    #[arg(long, value_name = "FILE")]
    dois:  PathBuf,
    /// `PATH=MODE` where MODE is y/n, nr or data. Repeatable.
    #[arg(long = "field", value_name = "PATH=MODE", required = true)]
    fields: Vec<FieldSpec>,
    #[arg(long, value_name = "FILE")]
    json:  Option<PathBuf>,
    #[arg(long, value_name = "FILE")]
    csv:   Option<PathBuf>,
  },
  /// Fetch each DOI's work and write every field as one CSV row.
  Flatten {
    /// CSV file with a `doi` column.
    #[arg(long, value_name = "FILE")]
    dois: PathBuf,
    #[arg(long, value_name = "FILE")]
    out:  PathBuf,
  },
  /// List the DOIs of works in a journal or from a publisher.
  Works {
    #[command(flatten)]
    selector: WorksArgs,
    /// Earliest publication date, YYYY-MM-DD.
    #[arg(long)]
    from:     Option<NaiveDate>,
    /// Latest publication date, YYYY-MM-DD.
    #[arg(long)]
    until:    Option<NaiveDate>,
    #[arg(long, value_name = "FILE")]
    out:      PathBuf,
  },
}

#[derive(ClapArgs, Debug)]
#[group(required = true, multiple = false)]
struct WorksArgs {
  #[arg(long)]
  journal:   Option<String>,
  #[arg(long)]
  publisher: Option<String>,
}

// ─── Entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<ExitCode> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();
  let settings = settings::Settings::resolve(
    args.config.as_deref(),
    settings::Overrides { store: args.store, index: args.index, files: args.files },
  )?;

  commands::run(&settings, args.command).await
}

#[cfg(test)]
mod tests {
  use clap::Parser as _;

  use super::*;

  #[test]
  fn legacy_defaults_to_the_relational_source() {
    let args = Args::try_parse_from(["scoap", "legacy", "42"]).unwrap();
    assert!(matches!(args.command, Command::Legacy { id: 42, source: Source::Relational }));
  }

  #[test]
  fn global_paths_after_the_subcommand() {
    let args =
      Args::try_parse_from(["scoap", "export", "summary", "--store", "a.db"]).unwrap();
    assert_eq!(args.store, Some(PathBuf::from("a.db")));
  }

  #[test]
  fn analyze_parses_field_specs() {
    let args = Args::try_parse_from([
      "scoap", "crossref", "analyze", "--dois", "dois.csv",
      "--field", "author.ORCID=nr", "--field", "DOI=y/n",
    ])
    .unwrap();
    let Command::Crossref { what: CrossrefCommand::Analyze { fields, .. } } = args.command else {
      panic!("wrong command");
    };
    assert_eq!(fields.len(), 2);
    assert_eq!(fields[0].path, "author.ORCID");

    assert!(
      Args::try_parse_from(["scoap", "crossref", "analyze", "--dois", "d", "--field", "x=zz"])
        .is_err()
    );
  }

  #[test]
  fn flatten_needs_input_and_output() {
    let args = Args::try_parse_from([
      "scoap", "crossref", "flatten", "--dois", "dois.csv", "--out", "works.csv",
    ])
    .unwrap();
    let Command::Crossref { what: CrossrefCommand::Flatten { dois, out } } = args.command else {
      panic!("wrong command");
    };
    assert_eq!(dois, PathBuf::from("dois.csv"));
    assert_eq!(out, PathBuf::from("works.csv"));

    assert!(Args::try_parse_from(["scoap", "crossref", "flatten", "--dois", "d.csv"]).is_err());
  }

  #[test]
  fn works_needs_exactly_one_selector() {
    let base = ["scoap", "crossref", "works", "--out", "dois.txt"];
    assert!(Args::try_parse_from(base).is_err());
    assert!(Args::try_parse_from(base.into_iter().chain(["--journal", "JHEP"])).is_ok());
    assert!(
      Args::try_parse_from(
        base.into_iter().chain(["--journal", "JHEP", "--publisher", "Springer"])
      )
      .is_err()
    );
    assert!(
      Args::try_parse_from(base.into_iter().chain(["--publisher", "APS", "--from", "2024-13-01"]))
        .is_err()
    );
  }
}
