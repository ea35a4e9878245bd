//! Kowloon CLI binary.
//!
//! Builds the normalized financial index for one batch of equities.

mod integration;

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use integration::PipelineError;
use integration::config_paths::resolve_config_path;
use integration::revenue_fetch::resolve_revenues;
use kowloon::{Config, IndexPipeline, attach_revenue};
use kowloon_data::{EquityRecord, ExtractorChain, ReportClient, RevenueResolver, load_equities};
use kowloon_output::{
    ExportFormat, Exporter, ReportBuilder, RunParameters, generate_index_summary, weights_table,
};
use std::path::PathBuf;
use std::process;
use std::time::Duration as StdDuration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "kowloon")]
#[command(about = "Kowloon: free-float and revenue weighted equity index", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (default: ./kowloon.toml, then the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the index for a batch file
    Run {
        /// Equity table to read
        #[arg(long)]
        input: Option<PathBuf>,

        /// Artifact path
        #[arg(long)]
        output: Option<PathBuf>,

        /// Artifact format (csv, json or pretty-json)
        #[arg(long)]
        format: Option<ExportFormat>,

        /// Also write the per-constituent breakdown here
        #[arg(long)]
        details: Option<PathBuf>,

        /// Also write a JSON run report here
        #[arg(long)]
        report: Option<PathBuf>,

        /// Reports fetched at the same time
        #[arg(long)]
        concurrency: Option<usize>,

        /// Per-report timeout in seconds
        #[arg(long)]
        timeout_secs: Option<u64>,

        /// Skip report fetching; every revenue is 0
        #[arg(long)]
        no_fetch: bool,

        /// Print concentration statistics after the table
        #[arg(long)]
        summary: bool,
    },

    /// Resolve a single report and print the value found
    Extract {
        /// URL or local path of the report
        reference: String,

        /// Label to search for
        #[arg(long)]
        label: Option<String>,
    },

    /// Print the effective configuration as TOML
    Config,
}

/// Per-run overrides taken from the command line.
#[derive(Default)]
struct RunOverrides {
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    format: Option<ExportFormat>,
    details: Option<PathBuf>,
    report: Option<PathBuf>,
    concurrency: Option<usize>,
    timeout_secs: Option<u64>,
    no_fetch: bool,
}

impl RunOverrides {
    fn apply(self, config: &mut Config) {
        if let Some(input) = self.input {
            config.input.path = input;
        }
        if let Some(output) = self.output {
            config.output.path = output;
        }
        if let Some(format) = self.format {
            config.output.format = format;
        }
        if self.details.is_some() {
            config.output.details_path = self.details;
        }
        if self.report.is_some() {
            config.output.report_path = self.report;
        }
        if let Some(concurrency) = self.concurrency {
            config.fetch.concurrency = concurrency;
        }
        if let Some(timeout) = self.timeout_secs {
            config.fetch.timeout_secs = timeout;
        }
        if self.no_fetch {
            config.fetch.enabled = false;
        }
    }
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
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("kowloon=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run() -> Result<(), PipelineError> {
    let cli = Cli::parse();
    let mut config = Config::load(resolve_config_path(cli.config.as_deref()));

    match cli.command {
        Commands::Run {
            input,
            output,
            format,
            details,
            report,
            concurrency,
            timeout_secs,
            no_fetch,
            summary,
        } => {
            RunOverrides {
                input,
                output,
                format,
                details,
                report,
                concurrency,
                timeout_secs,
                no_fetch,
            }
            .apply(&mut config);
            config.validate()?;
            run_index(&config, summary).await?;
        }
        Commands::Extract { reference, label } => {
            if let Some(label) = label {
                config.fetch.revenue_label = label;
            }
            let resolver = build_resolver(&config)?;
            let revenue = resolver.resolve(&reference).await;
            println!("{}: {}", config.fetch.revenue_label, revenue);
        }
        Commands::Config => {
            print!("{}", config.to_toml_string()?);
        }
    }

    Ok(())
}

fn build_resolver(config: &Config) -> Result<RevenueResolver, PipelineError> {
    let client = ReportClient::with_settings(config.fetch.timeout(), &config.fetch.user_agent)?;
    let extractor = ExtractorChain::for_label(&config.fetch.revenue_label)?;
    Ok(RevenueResolver::new(client, extractor).with_timeout(config.fetch.timeout()))
}

async fn run_index(config: &Config, show_summary: bool) -> Result<(), PipelineError> {
    let pipeline = IndexPipeline::from_config(config)?;

    let mut records = load_equities(&config.input.path, &config.input.columns)?;

    let revenues = fetch_revenues(config, &records).await?;
    attach_revenue(&mut records, &revenues)?;

    let normalized = pipeline.compute(&mut records)?;
    let weights = IndexPipeline::weights(&records);

    let table = weights_table(&weights).map_err(|e| PipelineError::Table(e.to_string()))?;
    println!("{table}");

    let format = config.output.format;
    weights.export_to_file(&config.output.path, format)?;

    let constituents = IndexPipeline::constituents(&records, &normalized);
    if let Some(details) = &config.output.details_path {
        constituents.export_to_file(details, format)?;
        info!("Constituent breakdown written to {}", details.display());
    }

    let summary = generate_index_summary(config.input.path.display().to_string(), &constituents);
    if show_summary {
        println!("{}", summary.to_ascii_table());
    }

    if let Some(report_path) = &config.output.report_path {
        let report = ReportBuilder::new()
            .source(config.input.path.display().to_string())
            .output(config.output.path.display().to_string())
            .format(format)
            .parameters(RunParameters {
                free_float_weight: config.index.free_float_weight,
                revenue_weight: config.index.revenue_weight,
                floor: config.normalizer.floor,
                total: config.normalizer.total,
            })
            .summary(summary)
            .build()?;
        report.write_to(report_path)?;
        info!("Run report written to {}", report_path.display());
    }

    println!(
        "Normalized financial index written to {}",
        config.output.path.display()
    );
    Ok(())
}

async fn fetch_revenues(config: &Config, records: &[EquityRecord]) -> Result<Vec<f64>, PipelineError> {
    if !config.fetch.enabled {
        info!("Report fetching disabled, every revenue is 0");
        return Ok(vec![0.0; records.len()]);
    }

    let resolver = build_resolver(config)?;

    // Create progress bar for report fetching (the slow step)
    let pb = ProgressBar::new(records.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .expect("valid template")
            .progress_chars("█▓░"),
    );
    pb.enable_steady_tick(StdDuration::from_millis(100));
    pb.set_message("Fetching financial reports...");

    let revenues = resolve_revenues(&resolver, records, config.fetch.concurrency, Some(&pb)).await;

    let found = revenues.iter().filter(|r| **r > 0.0).count();
    pb.finish_with_message(format!("Fetched {} reports ({} with revenue)", records.len(), found));
    Ok(revenues)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_run_overrides() {
        let cli = Cli::parse_from([
            "kowloon",
            "run",
            "--input",
            "batch.csv",
            "--format",
            "json",
            "--concurrency",
            "4",
            "--no-fetch",
        ]);
        let Commands::Run {
            input,
            format,
            concurrency,
            no_fetch,
            summary,
            ..
        } = cli.command
        else {
            panic!("expected run");
        };
        assert_eq!(input, Some(PathBuf::from("batch.csv")));
        assert_eq!(format, Some(ExportFormat::Json));
        assert_eq!(concurrency, Some(4));
        assert!(no_fetch);
        assert!(!summary);
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::parse_from(["kowloon", "config", "--config", "custom.toml"]);
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
        assert!(matches!(cli.command, Commands::Config));
    }

    #[test]
    fn test_overrides_apply() {
        let mut config = Config::default();
        RunOverrides {
            output: Some(PathBuf::from("weights.json")),
            format: Some(ExportFormat::Json),
            timeout_secs: Some(5),
            no_fetch: true,
            ..Default::default()
        }
        .apply(&mut config);

        assert_eq!(config.output.path, PathBuf::from("weights.json"));
        assert_eq!(config.output.format, ExportFormat::Json);
        assert_eq!(config.fetch.timeout_secs, 5);
        assert!(!config.fetch.enabled);
        assert_eq!(config.input.path, Config::default().input.path);
    }

    #[tokio::test]
    async fn test_run_index_without_fetch() {
        let dir = std::env::temp_dir();
        let input = dir.join("kowloon_cli_batch.csv");
        let output = dir.join("kowloon_cli_output.csv");
        let report = dir.join("kowloon_cli_report.json");
        std::fs::write(
            &input,
            "RIC;Free-float %;Financial report / Allotment\nA;10;\nB;30;\n",
        )
        .unwrap();

        let mut config = Config::default();
        RunOverrides {
            input: Some(input.clone()),
            output: Some(output.clone()),
            report: Some(report.clone()),
            no_fetch: true,
            ..Default::default()
        }
        .apply(&mut config);

        run_index(&config, false).await.unwrap();

        let written_report =
            kowloon_output::Report::from_json(&std::fs::read_to_string(&report).unwrap()).unwrap();
        assert_eq!(written_report.constituents(), 2);
        assert_eq!(written_report.parameters.floor, 0.1);
        assert_eq!(written_report.summary.zero_revenue, 2);

        let written = std::fs::read_to_string(&output).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines[0], "ID,output");
        assert!(lines[1].starts_with("A,"));
        assert!(lines[2].starts_with("B,"));

        std::fs::remove_file(input).ok();
        std::fs::remove_file(output).ok();
        std::fs::remove_file(report).ok();
    }
}
