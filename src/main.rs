use clap::{Parser, Subcommand};
use name_atlas::compat::Spelled;
use name_atlas::{audit, config, dataset, generate, output};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "name-atlas")]
#[command(about = "Static site generator for baby-name research pages")]
#[command(long_about = "\
Static site generator for baby-name research pages

A data directory of JSON exports becomes a static site of name profiles,
sibling pairings, surname matches, and filter listings. Every page is
measured against word and link floors before anything is written.

Data structure:

  data/
  ├── config.toml          # Site config (optional, overrides stock defaults)
  ├── names.json           # Given names (required)
  ├── surnames.json        # Surnames for compatibility pages
  ├── popularity.json      # Rank per name, country, and year
  ├── categories.json      # Style tags per name
  ├── countries.json       # Country code → display name
  ├── variants.json        # Prose templates per slot
  └── pages/
      └── 010-privacy.md   # Legal page (numbered = footer order)

Run 'name-atlas gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Data directory
    #[arg(long, default_value = "data", global = true)]
    data: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Log debug diagnostics to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load the dataset, render every page, and write the site
    Build,
    /// Validate the dataset and measure every page without writing
    Check,
    /// Measure an already built output directory against the floors
    Audit,
    /// Show the compatibility breakdown for a first name and surname
    Score { first: String, surname: String },
    /// Show the best sibling matches and strongest contrasts for a name
    Siblings { name: String },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Build => {
            println!("==> Loading {}", cli.data.display());
            let data = dataset::load(&cli.data)?;
            init_thread_pool(&data.config.processing);
            println!("==> Generating HTML \u{2192} {}", cli.output.display());
            let report = generate::generate(&data, &cli.output)?;
            output::print_generate_report(&report);
            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.data.display());
            let data = dataset::load(&cli.data)?;
            output::print_dataset_summary(&data);
            init_thread_pool(&data.config.processing);
            let pages = generate::render_site(&data);
            generate::check_pages(&data, &pages)?;
            println!("==> {} pages meet their content floors", pages.len());
        }
        Command::Audit => {
            let site_config = config::load_config(&cli.data)?;
            println!("==> Auditing {}", cli.output.display());
            let report = audit::audit(
                &cli.output,
                &site_config.thresholds,
                &site_config.site.host,
            )?;
            output::print_audit_report(&report);
            if !report.is_clean() {
                std::process::exit(1);
            }
        }
        Command::Score { first, surname } => {
            let data = load_if_present(&cli.data)?;
            let first = CliName::resolve(&first, |s| {
                data.as_ref()
                    .and_then(|d| d.name_by_slug(s))
                    .map(|r| (r.name.clone(), r.syllables))
            });
            let surname = CliName::resolve(&surname, |s| {
                data.as_ref()
                    .and_then(|d| d.surname_by_slug(s))
                    .map(|r| (r.name.clone(), r.syllables))
            });
            output::print_score(&first, &surname);
        }
        Command::Siblings { name } => {
            let data = dataset::load(&cli.data)?;
            let record = data
                .name_by_slug(&name)
                .ok_or_else(|| format!("No name {name:?} in {}", cli.data.display()))?;
            output::print_siblings(&data, record);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Diagnostics go to stderr so they never mix with command output.
fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Size the global rayon pool from `[processing]`, capped at the core count.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}

/// `score` works without a dataset; with one, curated syllable counts apply.
fn load_if_present(root: &Path) -> Result<Option<dataset::Dataset>, dataset::DatasetError> {
    if root.join("names.json").is_file() {
        dataset::load(root).map(Some)
    } else {
        Ok(None)
    }
}

/// A name typed on the command line, matched against the dataset if possible.
struct CliName {
    name: String,
    syllables: Option<u32>,
}

impl CliName {
    fn resolve(typed: &str, lookup: impl FnOnce(&str) -> Option<(String, Option<u32>)>) -> Self {
        match lookup(typed) {
            Some((name, syllables)) => Self { name, syllables },
            None => Self {
                name: typed.trim().to_string(),
                syllables: None,
            },
        }
    }
}

impl Spelled for CliName {
    fn spelling(&self) -> &str {
        &self.name
    }

    fn curated_syllables(&self) -> Option<u32> {
        self.syllables
    }
}
