//! Dexcat CLI
//!
//! Ingests the creature catalog (from the remote service or a JSON fixture)
//! and answers filter queries against it:
//! - `dexcat list` prints the displayed subset for a set of facet flags
//! - `dexcat pick` draws one entry at random from that subset

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use dexcat_ingest::{
    CatalogSource, Fixture, HttpCatalogSource, InMemorySource, IngestConfig, IngestOutcome,
    Ingestor,
};
use dexcat_model::Locale;
use dexcat_session::{Preferences, Session};
use tracing_subscriber::EnvFilter;

mod args;
mod output;

use args::{FilterArgs, SourceSpec};

#[derive(Parser)]
#[command(name = "dexcat")]
#[command(author, version, about = "Dexcat: browse and filter the creature catalog")]
struct Cli {
    /// Catalog source: `http` or `fixture:<path>`
    #[arg(long, global = true, default_value = "http")]
    source: SourceSpec,

    /// Override the service base URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Entries fetched concurrently per batch
    #[arg(long, global = true)]
    batch_size: Option<usize>,

    /// Highest entry id to ingest
    #[arg(long, global = true)]
    max_id: Option<u32>,

    /// Preferences file (locale, theme); updated when --locale or --theme is given
    #[arg(long, global = true)]
    prefs: Option<PathBuf>,

    /// Display locale for names and name matching
    #[arg(long, global = true)]
    locale: Option<String>,

    /// Opaque theme preference, stored alongside the locale
    #[arg(long, global = true)]
    theme: Option<String>,

    /// Hide ingestion progress
    #[arg(short, long, global = true)]
    quiet: bool,

    /// More log output (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every entry the facet flags let through
    List {
        #[command(flatten)]
        filter: FilterArgs,
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Pick one displayed, non-disabled entry at random
    Pick {
        #[command(flatten)]
        filter: FilterArgs,
        /// Seed for a reproducible pick
        #[arg(long)]
        seed: Option<u64>,
        /// Emit JSON instead of a table row
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_config(cli: &Cli) -> Result<IngestConfig> {
    let mut config = IngestConfig::from_env().context("invalid DEXCAT_* environment override")?;
    if let Some(url) = &cli.base_url {
        config = config.with_base_url(url.clone());
    }
    if let Some(size) = cli.batch_size {
        config = config.with_batch_size(size);
    }
    if let Some(max) = cli.max_id {
        config = config.with_max_entity_id(max);
    }
    config.validate().context("invalid ingest configuration")?;
    Ok(config)
}

fn open_source(spec: &SourceSpec, config: &IngestConfig) -> Result<Arc<dyn CatalogSource>> {
    match spec {
        SourceSpec::Http => {
            let source = HttpCatalogSource::new(config).context("failed to build HTTP client")?;
            tracing::info!(base_url = %config.base_url, "opened HTTP catalog source");
            Ok(Arc::new(source))
        }
        SourceSpec::Fixture(path) => {
            tracing::info!(path = %path.display(), "opening fixture catalog source");
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read fixture {}", path.display()))?;
            let fixture = Fixture::from_json_str(&text)
                .with_context(|| format!("failed to parse fixture {}", path.display()))?;
            Ok(Arc::new(InMemorySource::new(fixture)))
        }
    }
}

fn ingest(cli: &Cli) -> Result<IngestOutcome> {
    let config = build_config(cli)?;
    let source = open_source(&cli.source, &config)?;

    let mut ingestor = Ingestor::new(source, config);
    if !cli.quiet {
        ingestor.on_progress(Box::new(output::print_progress));
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    let outcome = runtime
        .block_on(ingestor.ingest())
        .context("catalog ingestion failed")?;

    if !cli.quiet {
        output::print_report(&outcome.report);
    }
    Ok(outcome)
}

fn load_preferences(cli: &Cli) -> Result<Preferences> {
    let mut prefs = match &cli.prefs {
        Some(path) => Preferences::load(path)
            .with_context(|| format!("failed to read preferences {}", path.display()))?,
        None => Preferences::default(),
    };
    let changed = cli.locale.is_some() || cli.theme.is_some();
    if let Some(locale) = &cli.locale {
        prefs.locale = Locale::new(locale.clone());
        if !prefs.locale.is_supported() {
            tracing::warn!(
                locale = %prefs.locale,
                "no localized names for this locale, showing canonical names"
            );
        }
    }
    if let Some(theme) = &cli.theme {
        prefs.theme = theme.clone();
    }
    if let (true, Some(path)) = (changed, &cli.prefs) {
        save_preferences(&prefs, path)?;
    }
    Ok(prefs)
}

fn save_preferences(prefs: &Preferences, path: &Path) -> Result<()> {
    prefs
        .save(path)
        .with_context(|| format!("failed to write preferences {}", path.display()))?;
    tracing::info!(
        path = %path.display(),
        locale = %prefs.locale,
        theme = %prefs.theme,
        "preferences saved"
    );
    Ok(())
}

fn open_session(cli: &Cli, filter: &FilterArgs, seed: Option<u64>) -> Result<Session> {
    let preferences = load_preferences(cli)?;
    let outcome = ingest(cli)?;

    let session = match seed {
        Some(seed) => Session::with_seed(outcome.catalog, seed),
        None => Session::new(outcome.catalog),
    };
    let mut session = session.with_preferences(preferences);
    *session.filter_mut() = filter.to_state();
    for &id in &filter.disable {
        session.toggle_disabled(id);
    }
    Ok(session)
}

fn cmd_list(cli: &Cli, filter: &FilterArgs, json: bool) -> Result<()> {
    let session = open_session(cli, filter, None)?;
    let displayed = session.apply();
    if json {
        output::print_json(&session, &displayed)
    } else {
        output::print_table(&session, &displayed);
        Ok(())
    }
}

fn cmd_pick(cli: &Cli, filter: &FilterArgs, seed: Option<u64>, json: bool) -> Result<()> {
    let mut session = open_session(cli, filter, seed)?;
    let Some(id) = session.choose_random() else {
        eprintln!("{} nothing to pick from", "info:".yellow().bold());
        return Ok(());
    };
    let Some(record) = session.catalog().get(id) else {
        return Ok(());
    };
    if json {
        output::print_json(&session, &[record])
    } else {
        println!("{}", output::format_row(&session, record).bold());
        Ok(())
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Commands::List { filter, json } => cmd_list(&cli, filter, *json),
        Commands::Pick { filter, seed, json } => cmd_pick(&cli, filter, *seed, *json),
    }
}
