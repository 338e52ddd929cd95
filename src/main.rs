use anyhow::Result;
use clap::{builder::RangedU64ValueParser, Parser, Subcommand};
use factscraper::{
    config::{
        BASE_URL, DEFAULT_DATA_DIR, DEFAULT_LOG_FILTER, DEFAULT_MAPPING_FILE, DEFAULT_PORT,
        SCRAPE_DELAY_MS, SCRAPE_OUTPUT_FILE,
    },
    corpus, fetch,
    record::{CodeResolver, RecordBuilder, Variant},
    serve::{self, ServeOptions},
};
use std::{env, path::PathBuf, time::Duration};
use tokio::time::Instant;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "factscraper", about = "CIA World Factbook extractor and viewer server")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize a local factbook.json mirror into one JSON document
    Extract {
        #[arg(long, value_enum, default_value = "iso")]
        variant: Variant,
        /// Directory holding the factbook.json clone
        #[arg(long, env = "FACTBOOK_DATA_DIR", default_value = DEFAULT_DATA_DIR)]
        data_dir: PathBuf,
        /// FIPS→ISO mapping array (iso variant only)
        #[arg(long, env = "FACTBOOK_MAPPING", default_value = DEFAULT_MAPPING_FILE)]
        mapping: PathBuf,
        /// Output path (default: <data-dir>/<variant file name>)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Scrape the live Factbook site
    Scrape {
        /// Only scrape the first N countries
        #[arg(short = 'n', long, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
        limit: Option<usize>,
        #[arg(long, default_value = DEFAULT_DATA_DIR)]
        output_dir: PathBuf,
        /// Pause between detail page requests
        #[arg(long, default_value_t = SCRAPE_DELAY_MS)]
        delay_ms: u64,
        #[arg(long, env = "FACTBOOK_BASE_URL", default_value = BASE_URL)]
        base_url: String,
    },
    /// Serve a directory (the viewer and its data) with CORS enabled
    Serve {
        #[arg(long, default_value = ".")]
        root: PathBuf,
        #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
        port: u16,
        /// Do not open the globe viewer in a browser
        #[arg(long)]
        no_browser: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // ─── init logging ────────────────────────────────────────────────
    let fallback = env::var("LOG_LEVEL").unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string());
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    match cli.command {
        Commands::Extract {
            variant,
            data_dir,
            mapping,
            output,
        } => {
            info!(?variant, data_dir = %data_dir.display(), "extracting factbook mirror");
            let resolver = CodeResolver::for_variant(variant, &mapping)?;
            let builder = RecordBuilder::new(variant, resolver);
            let output = output.unwrap_or_else(|| data_dir.join(variant.output_file()));
            corpus::extract_offline(&data_dir, &output, builder)?;
        }
        Commands::Scrape {
            limit,
            output_dir,
            delay_ms,
            base_url,
        } => {
            info!(%base_url, "scraping live factbook");
            let scraper = fetch::Scraper::new(base_url, Duration::from_millis(delay_ms))?;
            let output = output_dir.join(SCRAPE_OUTPUT_FILE);
            fetch::scrape_to_file(&scraper, limit, &output).await?;
        }
        Commands::Serve {
            root,
            port,
            no_browser,
        } => {
            serve::serve(ServeOptions {
                root,
                port,
                open_browser: !no_browser,
            })
            .await?;
        }
    }

    info!(elapsed = ?t0.elapsed(), "all done");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn scrape_limit_must_be_positive() {
        assert!(Cli::try_parse_from(["factscraper", "scrape", "--limit", "0"]).is_err());

        let cli = Cli::try_parse_from(["factscraper", "scrape", "-n", "3"]).unwrap();
        match cli.command {
            Commands::Scrape { limit, .. } => assert_eq!(limit, Some(3)),
            _ => panic!("expected scrape"),
        }
    }
}
