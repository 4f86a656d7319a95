use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;

use tracing_subscriber::EnvFilter;

use refcrawl::config::{
    apply_env_overrides, default_config_path, load_config, save_config, CrawlConfig,
};
use refcrawl::crawler::ReferenceCrawler;
use refcrawl::errors::RefCrawlError;
use refcrawl::report::format_report;
use refcrawl::source::{ContentstackSource, MemorySource, ReferenceSource};
use refcrawl::types::OutputFormat;

/// Environment variable holding the log filter.
const LOG_ENV: &str = "REFCRAWL_LOG";

/// Finds every entry linked to a Contentstack entry, upward and downward.
#[derive(Parser)]
#[command(
    name = "refcrawl",
    about = "Finds every entry linked to a Contentstack entry, upward and downward"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl the reference graph around an entry
    Crawl {
        /// Config file (default: <config dir>/refcrawl/config.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Root entry uid
        #[arg(long)]
        entry_uid: Option<String>,
        /// Root entry content type uid
        #[arg(long)]
        content_type: Option<String>,
        /// Locale code
        #[arg(short, long)]
        locale: Option<String>,
        /// Read the graph from a JSON fixture instead of the API
        #[arg(long)]
        fixture: Option<PathBuf>,
        /// Output format (json or text)
        #[arg(short, long, default_value = "json")]
        format: String,
    },
    /// Write a template config file
    Init {
        /// Config file (default: <config dir>/refcrawl/config.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Installs a stderr subscriber filtered by `REFCRAWL_LOG`, keeping stdout for
/// the report.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("refcrawl=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> refcrawl::errors::Result<()> {
    match cli.command {
        Commands::Crawl {
            config,
            entry_uid,
            content_type,
            locale,
            fixture,
            format,
        } => {
            let output_format =
                OutputFormat::from_str(&format).ok_or_else(|| RefCrawlError::Config {
                    message: format!("unknown output format '{}'; expected json or text", format),
                })?;

            let config_path = config.unwrap_or_else(default_config_path);
            let mut settings =
                apply_env_overrides(load_config(&config_path)?, |var| std::env::var(var).ok());
            if let Some(uid) = entry_uid {
                settings.entry_uid = uid;
            }
            if let Some(content_type) = content_type {
                settings.content_type_uid = content_type;
            }
            if let Some(locale) = locale {
                settings.locale = locale;
            }

            let source: Box<dyn ReferenceSource> = match fixture {
                Some(path) => {
                    let memory = MemorySource::load_fixture(&path)?;
                    if settings.content_type_uid.is_empty() {
                        if let Some(content_type) = memory.content_type_of(&settings.entry_uid) {
                            settings.content_type_uid = content_type.to_string();
                        }
                    }
                    Box::new(memory)
                }
                None => Box::new(ContentstackSource::new(&settings)?),
            };

            let crawler = ReferenceCrawler::from_config(source.as_ref(), &settings)?;
            let report = crawler.crawl()?;
            println!("{}", format_report(&report, output_format));
        }
        Commands::Init { config, force } => {
            let config_path = config.unwrap_or_else(default_config_path);
            if config_path.exists() && !force {
                return Err(RefCrawlError::Config {
                    message: format!(
                        "config file '{}' already exists; pass --force to overwrite",
                        config_path.display()
                    ),
                });
            }
            save_config(&config_path, &CrawlConfig::default())?;
            println!("Wrote config template to {}", config_path.display());
        }
    }
    Ok(())
}
