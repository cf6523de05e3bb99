use anyhow::Result;
use clap::{Parser, Subcommand};
use museo::config::load_config;
use museo::fetch::HttpPageSource;
use museo::pipeline::{run_crawl, run_url_collection};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "museo", about = "Gold Museum archaeological collection scraper")]
struct Cli {
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    out_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Crawl,
    Urls,
    Validate,
}

fn main() -> Result<()> {
    init_tracing()?;
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(out_dir) = cli.out_dir {
        config.output.dir = out_dir;
    }

    match cli.command.unwrap_or(Commands::Crawl) {
        Commands::Crawl => {
            info!("web scraping gold museum");
            let source = HttpPageSource::new(&config.fetch)?;
            let (_, report) = run_crawl(&source, &config)?;
            info!(
                listing_pages = report.listing_pages,
                urls = report.urls,
                fetched = report.pages_fetched,
                fetch_failures = report.fetch_failures,
                records = report.records,
                outputs = report.outputs_written,
                output_failures = report.output_failures,
                "crawl summary"
            );
        }
        Commands::Urls => {
            let source = HttpPageSource::new(&config.fetch)?;
            let (ctx, report) = run_url_collection(&source, &config)?;
            info!(
                urls = ctx.urls.len(),
                fetch_failures = report.fetch_failures,
                "url collection summary"
            );
        }
        Commands::Validate => {
            let origin = cli
                .config
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "built-in defaults".to_string());
            println!("OK: {origin}");
        }
    }

    Ok(())
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|err| anyhow::anyhow!(err.to_string()))?;
    Ok(())
}
