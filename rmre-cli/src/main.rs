//! RMRE CLI: fetch the representative market exchange rate and related series.
//!
//! Commands:
//! - (none): fetch the full daily series and log it as a table
//! - `series`: filtered, optionally transformed and resampled series
//! - `indicator`: auxiliary series: policy rate, inflation, interbank rate

mod export;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use rmre_core::data::fetch_indicator;
use rmre_core::frame::{observation_frame, series_frame};
use rmre_core::transform::{filter_range, DateBounds};
use rmre_core::render::SeriesRenderer;
use rmre_core::{
    fetch_series, fetch_series_with, Indicator, SeriesOutput, SeriesRequest, SourceConfig,
};
use std::fmt::Write as _;
use rmre_tui::TerminalRenderer;
use tracing::Level;

#[derive(Parser)]
#[command(
    name = "rmre",
    about = "RMRE CLI: Colombian representative market exchange rate (TRM)"
)]
struct Cli {
    /// More log output (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log warnings and errors.
    #[arg(short, long, default_value_t = false, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the RMRE series with optional range, log-returns and resampling.
    Series {
        /// Start date (YYYY-MM-DD). Defaults to the first available date.
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD). Defaults to the last available date.
        #[arg(long)]
        end: Option<String>,

        /// Return ln(value[t] / value[t-1]) instead of levels.
        #[arg(long, default_value_t = false)]
        log_return: bool,

        /// Show the result as an interactive terminal chart.
        #[arg(long, default_value_t = false)]
        plot: bool,

        /// Observations per year: 365 (daily), 12, 4 or 2.
        #[arg(long, default_value_t = 365)]
        frequency: u32,

        /// Aggregation for resampled output: last_date or mean.
        #[arg(long = "type", visible_alias = "aggregation", default_value = "last_date")]
        aggregation: String,

        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Fetch an auxiliary macroeconomic series.
    Indicator {
        #[arg(value_enum)]
        name: IndicatorArg,

        /// Start date (YYYY-MM-DD).
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD).
        #[arg(long)]
        end: Option<String>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Table,
    Csv,
    Json,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum IndicatorArg {
    PolicyRate,
    Inflation,
    InterbankRate,
}

impl From<IndicatorArg> for Indicator {
    fn from(arg: IndicatorArg) -> Self {
        match arg {
            IndicatorArg::PolicyRate => Indicator::PolicyRate,
            IndicatorArg::Inflation => Indicator::Inflation,
            IndicatorArg::InterbankRate => Indicator::InterbankRate,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        None => run_default(),
        Some(Commands::Series {
            start,
            end,
            log_return,
            plot,
            frequency,
            aggregation,
            format,
        }) => {
            let request = SeriesRequest {
                start_date: start,
                end_date: end,
                log_return,
                plot_data: plot,
                frequency,
                aggregation,
            };
            run_series(&request, format)
        }
        Some(Commands::Indicator {
            name,
            start,
            end,
            format,
        }) => run_indicator(name.into(), start.as_deref(), end.as_deref(), format),
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => Level::WARN,
        (false, 0) => Level::INFO,
        (false, 1) => Level::DEBUG,
        (false, _) => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// No arguments: full daily series, logged as a table.
fn run_default() -> Result<()> {
    let output = fetch_series(&SeriesRequest::default())?;
    let frame = series_frame(&output.series)?;
    tracing::info!("\n{frame}");
    Ok(())
}

fn run_series(request: &SeriesRequest, format: OutputFormat) -> Result<()> {
    let renderer: Option<Box<dyn SeriesRenderer>> = if request.plot_data {
        Some(Box::new(TerminalRenderer::default()))
    } else {
        None
    };
    let output = fetch_series_with(request, &SourceConfig::default(), renderer)?;

    match format {
        OutputFormat::Table => print!("{}", summary_text(&output)?),
        OutputFormat::Csv => print!("{}", export::series_csv(&output.series)?),
        OutputFormat::Json => println!("{}", export::series_json(&output)?),
    }
    Ok(())
}

fn run_indicator(
    indicator: Indicator,
    start: Option<&str>,
    end: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let bounds = DateBounds::parse(start, end)?;
    let mut fetched = fetch_indicator(indicator, &SourceConfig::default())?;
    fetched.series = filter_range(&fetched.series, &bounds)?.series;

    match format {
        OutputFormat::Table => {
            println!("{}", observation_frame(&fetched.series, &fetched.name)?);
            println!(
                "{}: {} observations ({} rows skipped)",
                indicator.name(),
                fetched.series.len(),
                fetched.dropped
            );
        }
        OutputFormat::Csv => print!("{}", export::observations_csv(&fetched.series, &fetched.name)?),
        OutputFormat::Json => println!("{}", export::indicator_json(&fetched)?),
    }
    Ok(())
}

/// Frame plus summary lines for `--format table`.
fn summary_text(output: &SeriesOutput) -> Result<String> {
    let mut out = String::new();
    writeln!(out, "=== {} ===", output.series.title())?;
    writeln!(out, "{}", series_frame(&output.series)?)?;
    writeln!(out, "Source:       {}", output.source)?;
    if let Some(range) = output.range {
        writeln!(out, "Range:        {} .. {}", range.start(), range.end())?;
    }
    writeln!(out, "Rows:         {}", output.series.len())?;
    if output.dropped_rows > 0 {
        writeln!(out, "Dropped rows: {}", output.dropped_rows)?;
    }
    for warning in &output.warnings {
        writeln!(out, "Warning:      {warning}")?;
    }
    Ok(out)
}
