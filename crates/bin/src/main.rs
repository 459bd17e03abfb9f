//! Tuck CLI binary.
//!
//! Runs Fama-French factor regressions for a single stock from the command line.

mod integration;

use chrono::Local;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use integration::data_pipeline::fetch_market_data;
use integration::prompt;
use std::io;
use std::path::PathBuf;
use std::process;
use std::time::Duration as StdDuration;
use tracing_subscriber::EnvFilter;
use tuck::{AnalysisPeriod, AnalysisRequest};
use tuck_data::Frequency;
use tuck_model::ModelSpec;
use tuck_output::ExportFormat;

const DEFAULT_LOG_FILTER: &str = "warn,tuck=info,tuck_data=info,tuck_model=info,tuck_output=info";

#[derive(Parser)]
#[command(name = "tuck")]
#[command(about = "Tuck: Fama-French factor regressions for a single stock", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Regress a stock's excess returns on the Fama-French factors
    Analyze {
        /// Stock ticker; prompts for ticker and dates when omitted
        ticker: Option<String>,

        /// Start date (MM/DD/YYYY or YYYY-MM-DD), default seven years before the end
        #[arg(long)]
        start: Option<String>,

        /// End date (MM/DD/YYYY or YYYY-MM-DD), default today
        #[arg(long)]
        end: Option<String>,

        /// Return frequency (daily or monthly)
        #[arg(long, default_value = "daily")]
        frequency: Frequency,

        /// Custom model as NAME=F1,F2,... (repeatable, replaces the standard set)
        #[arg(long = "model", value_name = "NAME=FACTORS")]
        models: Vec<ModelSpec>,

        /// Export format (xlsx, csv, json or pretty-json)
        #[arg(long, default_value = "xlsx")]
        format: ExportFormat,

        /// Directory for the exported summary
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,

        /// Print the summary as Markdown instead of an ASCII table
        #[arg(long)]
        markdown: bool,

        /// Do not write the summary to a file
        #[arg(long)]
        no_export: bool,
    },

    /// List the standard model set
    Models,
}

/// Options for one `analyze` invocation.
struct AnalyzeOptions {
    ticker: Option<String>,
    start: Option<String>,
    end: Option<String>,
    frequency: Frequency,
    models: Vec<ModelSpec>,
    format: ExportFormat,
    output_dir: PathBuf,
    markdown: bool,
    export: bool,
}

#[tokio::main]
async fn main() {
    init_tracing();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn init_tracing() {
    let filter = || {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
    };
    let json_logging = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json_logging {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter())
            .with_writer(io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter())
            .with_writer(io::stderr)
            .init();
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            ticker,
            start,
            end,
            frequency,
            models,
            format,
            output_dir,
            markdown,
            no_export,
        } => {
            let options = AnalyzeOptions {
                ticker,
                start,
                end,
                frequency,
                models,
                format,
                output_dir,
                markdown,
                export: !no_export,
            };
            analyze(options).await?;
        }
        Commands::Models => list_models(),
    }

    Ok(())
}

async fn analyze(options: AnalyzeOptions) -> Result<(), Box<dyn std::error::Error>> {
    let today = Local::now().date_naive();

    let (ticker, start, end) = match options.ticker {
        Some(ticker) => (ticker, options.start, options.end),
        None => {
            let defaults = AnalysisPeriod::from_inputs(
                options.start.as_deref(),
                options.end.as_deref(),
                today,
            )?;
            let answers = prompt::ask(&mut io::stdin().lock(), &mut io::stdout(), defaults)?;
            (
                answers.ticker,
                answers.start.or(options.start),
                answers.end.or(options.end),
            )
        }
    };

    let period = AnalysisPeriod::from_inputs(start.as_deref(), end.as_deref(), today)?;
    let request = AnalysisRequest::new(&ticker, period)?
        .with_frequency(options.frequency)
        .with_models(options.models)?;

    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!(
        "║{:^62}║",
        format!("FAMA-FRENCH FACTOR REGRESSION: {}", request.ticker())
    );
    println!("╚══════════════════════════════════════════════════════════════╝\n");
    println!("Period: {}", request.period());
    println!("Frequency: {}", request.frequency());
    println!(
        "Models: {}",
        request
            .models()
            .iter()
            .map(|m| m.name())
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!();

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.enable_steady_tick(StdDuration::from_millis(100));

    let data = match fetch_market_data(&request, Some(&pb)).await {
        Ok(data) => {
            pb.finish_with_message(format!(
                "Fetched {} prices and {} factor rows",
                data.prices.len(),
                data.factors.len()
            ));
            data
        }
        Err(e) => {
            pb.finish_with_message("Failed!");
            return Err(e.into());
        }
    };

    print!("Running regressions...");
    std::io::Write::flush(&mut std::io::stdout())?;
    let analysis = match request.run(&data.prices, &data.factors) {
        Ok(analysis) => {
            println!(" ✓ ({} observations)", analysis.observations());
            analysis
        }
        Err(e) => {
            println!(" ✗");
            return Err(e.into());
        }
    };

    for fit in &analysis.fits {
        if let Err(e) = &fit.outcome {
            println!("  {} could not be fitted: {}", fit.name(), e);
        }
    }
    println!();

    if options.markdown {
        println!("{}", analysis.table.to_markdown());
    } else {
        println!("{}", analysis.table);
    }

    if options.export {
        let path = analysis.export(&options.output_dir, options.format)?;
        println!("Summary written to {}", path.display());
    }

    Ok(())
}

fn list_models() {
    println!("\nStandard models:");
    println!("{}", "-".repeat(40));
    for spec in ModelSpec::standard_set() {
        let factors: Vec<&str> = spec.factors().iter().map(|f| f.label()).collect();
        println!("  {:<12} {}", spec.name(), factors.join(", "));
    }
    println!();
    println!("Custom models: --model \"NAME=Mkt-RF,SMB,...\"");
}
