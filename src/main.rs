mod changelog;
mod commands;
mod core;
mod release;

use clap::{ArgAction, Parser, Subcommand};
use core::context::PluginContext;
use core::error::{PluginCiError, PluginCiResult, ResultExt, print_error};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// Changelog and metadata tooling for QGIS plugin releases
#[derive(Parser)]
#[command(name = "qgis-plugin-ci")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct Cli {
  /// Increase log verbosity (-v, -vv, -vvv)
  #[arg(short, long, action = ArgAction::Count, global = true)]
  verbose: u8,

  /// Configuration file (.qgis-plugin-ci, setup.cfg or pyproject.toml)
  #[arg(long, global = true)]
  config: Option<PathBuf>,

  /// Accept any release version, even if not semver or x.y[.z]
  #[arg(long, global = true)]
  no_validation: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  // ============================================================================
  // Changelog
  // ============================================================================
  /// Print the changelog notes of a version
  Changelog {
    /// Version to look up, or 'latest' for the newest section
    #[arg(default_value = changelog::LATEST)]
    release_version: String,
    /// Output format
    #[arg(long, value_enum, default_value_t = commands::OutputFormat::Text)]
    format: commands::OutputFormat,
    /// Shorthand for --format json
    #[arg(long, conflicts_with = "format")]
    json: bool,
  },

  /// Print the latest version found in the changelog
  Latest,

  // ============================================================================
  // Release
  // ============================================================================
  /// Suggest the version following a release tag
  NextVersion {
    /// Release tag, e.g. 1.2.3 or 1.2.3-rc.1
    tag: String,
  },

  /// Stamp release values into the plugin metadata.txt
  Stamp {
    /// Release version, or 'latest' to take it from the changelog
    release_version: String,
    /// Also set qgisMinimumVersion
    #[arg(long)]
    min_qgis: Option<String>,
  },
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

/// Logs go to stderr so command output on stdout stays machine-readable
fn init_tracing(verbose: u8) {
  let base_filter = match std::env::var("RUST_LOG") {
    Ok(filter) => filter,
    Err(_) => match verbose {
      0 => "warn".to_string(),
      1 => "info".to_string(),
      2 => "debug".to_string(),
      _ => "trace".to_string(),
    },
  };

  let filter = EnvFilter::try_new(&base_filter).unwrap_or_else(|_| EnvFilter::new("warn"));

  tracing_subscriber::registry()
    .with(filter)
    .with(
      fmt::layer()
        .with_target(verbose >= 2)
        .with_file(verbose >= 3)
        .with_line_number(verbose >= 3)
        .with_writer(std::io::stderr)
        .compact(),
    )
    .init();
}

fn main() {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  let root = match std::env::current_dir().context("Failed to get current directory") {
    Ok(dir) => dir,
    Err(err) => handle_error(err),
  };

  if let Err(err) = run(cli, &root) {
    handle_error(err);
  }
}

fn run(cli: Cli, root: &Path) -> PluginCiResult<()> {
  let config = cli.config.as_deref();

  match cli.command {
    // Changelog
    Commands::Changelog {
      release_version,
      format,
      json,
    } => {
      let ctx = PluginContext::from_root(root, config)?;
      let format = if json { commands::OutputFormat::Json } else { format };
      commands::run_changelog(&ctx, &release_version, format)
    }
    Commands::Latest => {
      let ctx = PluginContext::from_root(root, config)?;
      commands::run_latest(&ctx)
    }

    // Release
    Commands::NextVersion { tag } => commands::run_next_version(&tag),
    Commands::Stamp {
      release_version,
      min_qgis,
    } => {
      let ctx = PluginContext::build(root, config, false)?;
      let options = commands::StampOptions {
        release_version,
        qgis_minimum_version: min_qgis,
        no_validation: cli.no_validation,
      };
      commands::run_stamp(&ctx, &options)
    }
  }
}

fn handle_error(err: PluginCiError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
