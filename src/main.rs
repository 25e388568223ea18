use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{error, info, instrument, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use hotel_kpi_tracker::config::Config;
use hotel_kpi_tracker::dataset::ComprehensiveDocument;
use hotel_kpi_tracker::importers::ReportDownloader;
use hotel_kpi_tracker::report::{render_summary, render_year};
use hotel_kpi_tracker::report_link_fetcher::ReportLinkFetcher;
use hotel_kpi_tracker::services::DatasetService;

#[derive(Parser)]
#[command(name = "hotel-kpi-tracker")]
#[command(about = "Extract monthly hotel KPIs from the yearly performance workbooks", long_about = None)]
struct Cli {
    /// Directory holding the cached yearly workbooks
    #[arg(long, env = "DATA_DIR", global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Discover and download missing yearly reports
    Fetch(YearArgs),
    /// Build the KPI document from the cached reports
    Build {
        #[command(flatten)]
        years: YearArgs,

        /// Download missing reports first
        #[arg(long)]
        fetch: bool,

        /// Output path for the JSON document
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the annual summary of a built document
    Summary {
        /// Path to the JSON document
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Show the monthly table for one year
        #[arg(long)]
        year: Option<i32>,
    },
}

#[derive(Args)]
struct YearArgs {
    /// Years to process, comma separated (default: START_YEAR..=END_YEAR)
    #[arg(long, value_delimiter = ',')]
    years: Vec<i32>,
}

impl YearArgs {
    fn resolve(&self, config: &Config) -> Vec<i32> {
        if self.years.is_empty() {
            config.years()
        } else {
            self.years.clone()
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if it exists (ignore errors if not found)
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,hotel_kpi_tracker=debug")),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_line_number(true),
        )
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }

    match cli.command {
        Command::Fetch(years) => {
            let years = years.resolve(&config);
            fetch_reports(&config, &years).await?;
        }
        Command::Build {
            years,
            fetch,
            output,
        } => {
            let years = years.resolve(&config);
            if fetch {
                fetch_reports(&config, &years).await?;
            }
            let output = output.unwrap_or_else(|| config.output_path.clone());
            build_document(&config, years, &output).await?;
        }
        Command::Summary { input, year } => {
            let input = input.unwrap_or_else(|| config.output_path.clone());
            print_summary(&input, year)?;
        }
    }

    Ok(())
}

/// Download every report in `years` that is not cached yet
#[instrument(skip(config, years), fields(years = years.len()))]
async fn fetch_reports(config: &Config, years: &[i32]) -> Result<(), Box<dyn std::error::Error>> {
    let downloader = ReportDownloader::with_settings(
        &config.data_dir,
        config.http_timeout(),
        &config.user_agent,
        config.download_max_retries,
    );

    let missing: Vec<i32> = years
        .iter()
        .copied()
        .filter(|year| !downloader.cached_path(*year).exists())
        .collect();
    if missing.is_empty() {
        info!("All {} reports already cached in {}", years.len(), config.data_dir.display());
        return Ok(());
    }

    info!("Looking up {} report links on {}", missing.len(), config.ir_library_url);
    let fetcher = ReportLinkFetcher::with_timeout(
        config.ir_library_url.clone(),
        config.base_url.clone(),
        config.http_timeout(),
    );
    let urls = fetcher.fetch_report_urls(&missing).await?;

    let pb = ProgressBar::new(urls.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")?
            .progress_chars("##-"),
    );

    let mut downloaded = 0;
    for (i, (year, url)) in urls.iter().enumerate() {
        if i > 0 {
            tokio::time::sleep(config.request_interval()).await;
        }
        pb.set_message(format!("{year}年"));
        match downloader.download_report(*year, url).await {
            Ok(_) => downloaded += 1,
            Err(e) => warn!("{}年: download failed: {}", year, e),
        }
        pb.inc(1);
    }

    pb.finish_with_message(format!("✓ Downloaded {downloaded}/{} reports", missing.len()));
    Ok(())
}

async fn build_document(
    config: &Config,
    years: Vec<i32>,
    output: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    info!("Building KPI document for {} years", years.len());

    let service = DatasetService::new(config.clone());
    let document = service.build_document_blocking(years).await?;

    if document.datasets.is_empty() {
        error!("No year could be extracted; writing an empty document");
    }

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(output, serde_json::to_string_pretty(&document)?)?;

    info!(
        "✓ Wrote {} ({}) in {:.2?}",
        output.display(),
        document.metadata.extraction_success_rate,
        start_time.elapsed()
    );
    Ok(())
}

fn print_summary(input: &Path, year: Option<i32>) -> Result<(), Box<dyn std::error::Error>> {
    let contents = std::fs::read_to_string(input)?;
    let document: ComprehensiveDocument = serde_json::from_str(&contents)?;

    match year {
        Some(year) => {
            let dataset = document
                .datasets
                .get(&year.to_string())
                .ok_or_else(|| format!("{year}年 is not in {}", input.display()))?;
            print!("{}", render_year(dataset));
        }
        None => print!("{}", render_summary(&document)),
    }
    Ok(())
}
