//! crmscan - Web Exposure Scanner CLI

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tabled::builder::Builder;
use tabled::settings::Style;
use tracing::error;
use tracing_subscriber::EnvFilter;

use crmscan::config;
use crmscan::http::HttpClient;
use crmscan::models::{ScanConfig, ScanResult, StageOutcome};
use crmscan::report::{self, ReportGenerator};
use crmscan::scanner::ScanEngine;
use crmscan::wordlist;

/// crmscan - Web Exposure Scanner
#[derive(Parser)]
#[command(name = "crmscan", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a target and save the results as JSON
    Scan {
        /// Target URL or bare host (https:// is assumed)
        target: String,

        /// Output JSON file
        #[arg(short, long, default_value = "scan_results.json")]
        output: PathBuf,

        /// Request timeout in seconds
        #[arg(short, long)]
        timeout: Option<u64>,

        /// Number of requests for the performance test
        #[arg(short = 'n', long)]
        requests: Option<usize>,

        /// Maximum concurrent endpoint discovery requests
        #[arg(long)]
        threads: Option<usize>,

        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Render a findings JSON file as JSON, HTML and Markdown reports
    Report {
        /// Path to the JSON findings file
        input: PathBuf,

        /// Prefix for the output files
        #[arg(short, long, default_value = "vulnerability_report")]
        output: String,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose { "crmscan=debug" } else { "crmscan=info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_target(false)
        .init();
}

fn print_banner() {
    let banner = r#"
    ╔═══════════════════════════════════════╗
    ║  CRMSCAN                              ║
    ║  Web Exposure Scanner                 ║
    ╚═══════════════════════════════════════╝
    "#;
    println!("{}", banner.cyan());
}

fn describe<T>(slot: Option<&StageOutcome<T>>, ok: impl Fn(&T) -> String) -> String {
    match slot {
        None => "skipped".to_string(),
        Some(StageOutcome::Completed(value)) => ok(value),
        Some(StageOutcome::Failed { error }) => format!("error: {error}"),
    }
}

fn print_summary(result: &ScanResult, total_requests: u64) {
    let reachable = result.availability().is_some_and(|a| a.is_reachable());

    let availability = match result.availability() {
        Some(a) if a.is_reachable() => {
            format!("{} ({}, {:.3}s)", a.status, a.status_code, a.response_time)
        }
        Some(a) => a.status.to_string(),
        None => "skipped".to_string(),
    };
    let endpoints = if reachable {
        format!("{} found", result.endpoints().len())
    } else {
        "skipped".to_string()
    };

    let mut builder = Builder::default();
    builder.push_record(["Stage", "Outcome"]);
    builder.push_record(["Availability".to_string(), availability]);
    builder.push_record([
        "Security headers".to_string(),
        describe(result.security_headers(), |h| {
            format!("{}/{} present", h.present_count(), h.len())
        }),
    ]);
    builder.push_record([
        "SSL/TLS".to_string(),
        describe(result.ssl(), |s| {
            format!(
                "https: {}, redirect: {}",
                s.https_enabled, s.redirects_to_https
            )
        }),
    ]);
    builder.push_record(["Endpoints".to_string(), endpoints]);
    builder.push_record([
        "Technologies".to_string(),
        describe(result.technologies(), |t| {
            if t.detected.is_empty() {
                "none detected".to_string()
            } else {
                t.detected.join(", ")
            }
        }),
    ]);
    builder.push_record([
        "Performance".to_string(),
        describe(result.performance(), |p| {
            format!("avg {:.3}s ({} ok)", p.avg, p.total_requests)
        }),
    ]);
    builder.push_record(["Requests".to_string(), total_requests.to_string()]);

    let mut table = builder.build();
    table.with(Style::rounded());

    println!("\n{}", "  Scan Summary".bold());
    println!("{table}");
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan {
            target,
            output,
            timeout,
            requests,
            threads,
            config: config_path,
            verbose,
        } => {
            init_tracing(verbose);
            print_banner();

            let mut scan_config = if let Some(ref path) = config_path {
                config::load_config(path)?
            } else {
                let default_path = Path::new("config/default.toml");
                if default_path.exists() {
                    config::load_config(default_path)?
                } else {
                    ScanConfig::default()
                }
            };
            config::merge_cli_args(&mut scan_config, target, timeout, requests, threads)?;

            let client = HttpClient::from_config(&scan_config)?;
            let engine = ScanEngine::new(
                Arc::new(client.clone()),
                &scan_config,
                wordlist::load(&scan_config),
            )?
            .with_progress(true);

            println!("  {} {}", "Target:".bold(), engine.target().as_str().green());
            println!(
                "  {} {}s | {} {}\n",
                "Timeout:".bold(),
                scan_config.timeout_secs.to_string().cyan(),
                "Performance requests:".bold(),
                scan_config.performance_requests.to_string().cyan()
            );

            let result = engine.run().await;
            print_summary(&result, client.request_count());

            match report::json::export(&result, &output) {
                Ok(()) => println!(
                    "\n  {} {}",
                    "Results saved to:".bold(),
                    output.display().to_string().green()
                ),
                Err(e) => error!("Could not save results to {}: {e}", output.display()),
            }
        }

        Commands::Report {
            input,
            output,
            verbose,
        } => {
            init_tracing(verbose);
            print_banner();

            let data = report::json::load(&input)?;
            let files = ReportGenerator::new(data).generate_all(&output);

            println!("\n  {}", "Reports generated:".bold());
            for (format, path) in files {
                println!(
                    "    • {} ({})",
                    path.display().to_string().green(),
                    format.to_uppercase()
                );
            }
        }
    }

    Ok(())
}
