//! Command line front-end for resolving asset references.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use asset_resolver::{
  AssetReference, AssetResolver, BundleId, EncodedDataOptions, PlatformKind, ResolverConfig,
  StoredFileOptions,
};
use clap::{Parser, Subcommand};

/// Exit status reported when a download failed and nothing was stored.
const SOFT_FAIL_EXIT: u8 = 2;

#[derive(Debug, Parser)]
#[command(name = "asset-resolver", version, about = "Resolve asset references to files or data URLs")]
struct Cli {
  /// Configuration file; `asset_resolver.json` in the working directory when omitted.
  #[arg(long, global = true)]
  config: Option<PathBuf>,

  /// Runtime variant: browser, resource-table or bundle-file.
  #[arg(long, global = true)]
  platform: Option<PlatformKind>,

  /// Asset manifest mapping bundle ids to descriptors.
  #[arg(long, global = true)]
  manifest: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
  /// Store the asset on local storage and print its location.
  Stored {
    /// Bundle id, URL, local path or inline JSON.
    reference: String,
    /// Destination file.
    #[arg(long)]
    dst: Option<PathBuf>,
    /// Use bundle files in place instead of copying them.
    #[arg(long)]
    avoid_copy: bool,
  },
  /// Print the asset as a data URL.
  Data {
    /// Bundle id, URL, local path or inline JSON.
    reference: String,
    /// Print network and browser URLs as-is instead of encoding them.
    #[arg(long)]
    allow_url: bool,
  },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
  env_logger::init();
  let cli = Cli::parse();

  let mut config = match &cli.config {
    Some(path) => ResolverConfig::load(path)
      .with_context(|| format!("failed to load configuration from {}", path.display()))?
      .relative_to(path.parent().unwrap_or(Path::new("."))),
    None => {
      let cwd = std::env::current_dir().context("failed to read the working directory")?;
      ResolverConfig::discover(&cwd)
    }
  };
  if let Some(platform) = cli.platform {
    config.platform = platform;
  }
  if let Some(manifest) = cli.manifest {
    config.manifest = Some(manifest);
  }

  let resolver = AssetResolver::from_config(&config).context("failed to set up the resolver")?;
  log::debug!("resolving for {:?}", resolver.runtime());

  match cli.command {
    Command::Stored {
      reference,
      dst,
      avoid_copy,
    } => {
      let options = StoredFileOptions {
        destination: dst,
        avoid_copy,
      };
      let resolved = resolver
        .resolve_to_stored_file(parse_reference(&reference)?, &options)
        .await
        .with_context(|| format!("failed to store {reference}"))?;
      match resolved {
        Some(resolved) => println!("{resolved}"),
        None => {
          eprintln!("download of {reference} failed; nothing was stored");
          return Ok(ExitCode::from(SOFT_FAIL_EXIT));
        }
      }
    }
    Command::Data {
      reference,
      allow_url,
    } => {
      let resolved = resolver
        .resolve_to_encoded_data(parse_reference(&reference)?, EncodedDataOptions { allow_url })
        .await
        .with_context(|| format!("failed to encode {reference}"))?;
      println!("{resolved}");
    }
  }

  Ok(ExitCode::SUCCESS)
}

/// Interpret a command line reference: integers are bundle ids, JSON objects and arrays are
/// inline values, everything else is a URL or path.
fn parse_reference(raw: &str) -> Result<AssetReference> {
  let trimmed = raw.trim();
  if trimmed.starts_with('{') || trimmed.starts_with('[') {
    let value = serde_json::from_str(trimmed).context("failed to parse inline JSON reference")?;
    return Ok(AssetReference::from_value(value));
  }
  if let Ok(id) = trimmed.parse::<u32>() {
    return Ok(AssetReference::BundleId(BundleId(id)));
  }
  Ok(AssetReference::Url(raw.to_string()))
}
