use std::process::ExitCode;
use std::sync::Arc;

use clap::{builder::TypedValueParser, Parser};
use tracing::{error, info, Level};

use s3_rm::{get_client, Coordinator, DeleteConfig, RmError, RunReport, S3Path, DEFAULT_MAX_IN_FLIGHT, MAX_BATCH_SIZE};

/// Recursively delete all objects under an S3 path.
#[derive(Parser, Debug)]
#[command(name = "s3-rm", version)]
#[command(about = "Recursively delete all objects under s3://bucket[/prefix]", long_about = None)]
struct Cli {
    /// Path to delete, as s3://bucket[/prefix]
    path: String,

    /// AWS region (falls back to the default provider chain)
    #[arg(long, env = "AWS_REGION")]
    region: Option<String>,

    /// Maximum number of bulk-delete requests in flight
    #[arg(long, env = "S3_RM_MAX_IN_FLIGHT", default_value_t = DEFAULT_MAX_IN_FLIGHT,
          value_parser = clap::value_parser!(u16).range(1..).map(usize::from))]
    max_in_flight: usize,

    /// Number of keys per listed page and per bulk delete
    #[arg(long, default_value_t = MAX_BATCH_SIZE,
          value_parser = clap::value_parser!(u16).range(1..=MAX_BATCH_SIZE as i64).map(usize::from))]
    page_size: usize,

    /// Log debug output
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        // disable printing the name of the module in every log line.
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<RunReport, RmError> {
    let path = S3Path::parse(&cli.path)?;
    let config = DeleteConfig::default()
        .with_page_size(cli.page_size)
        .with_max_in_flight(cli.max_in_flight);

    let client = get_client(cli.region).await?;
    let coordinator = Coordinator::new(Arc::new(client), config);

    Ok(coordinator.run(&path).await)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let run_report = match run(cli).await {
        Ok(run_report) => run_report,
        Err(err) => {
            error!("{err}");
            return ExitCode::from(err.exit_code());
        }
    };

    if !run_report.nothing_to_delete() {
        println!("{}", run_report.report);
    }

    match run_report.listing_error {
        Some(err) => {
            error!("Run aborted after {} pages: {err}", run_report.pages_listed);
            ExitCode::from(err.exit_code())
        }
        None => {
            info!("Done after listing {} pages", run_report.pages_listed);
            ExitCode::SUCCESS
        }
    }
}
