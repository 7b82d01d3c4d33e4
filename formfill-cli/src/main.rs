//! formfill CLI - bulk document generation from the command line.
//!
//! Fills a `{{column}}` text template once per spreadsheet row and writes
//! the results into a destination directory, with bounded concurrency for
//! both generation and writing.

mod error;

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use formfill::candidate::{NamingRule, RowData};
use formfill::fill::TextTemplateFiller;
use formfill::logging::{init_logging, DEFAULT_LOG_DIR, DEFAULT_LOG_FILE};
use formfill::run::{
    ErrorPolicy, RunConfig, RunController, RunError, RunEvent, RunRequest, RunStats,
    DEFAULT_GENERATE_LIMIT, DEFAULT_WRITE_LIMIT,
};
use formfill::write::FsDirectoryWriter;

use error::CliError;

#[derive(Parser)]
#[command(name = "formfill")]
#[command(version = formfill::VERSION)]
#[command(about = "Fill a form template once per spreadsheet row", long_about = None)]
struct Args {
    /// Template file with {{column}} placeholders (UTF-8)
    #[arg(long)]
    template: PathBuf,

    /// Rows file: a JSON array of column-to-value objects
    #[arg(long)]
    rows: PathBuf,

    /// Destination directory for generated files (created if missing)
    #[arg(long)]
    out: PathBuf,

    /// First row index to generate (0-based, inclusive)
    #[arg(long)]
    start: Option<usize>,

    /// Row index to stop at (exclusive; defaults to the row count)
    #[arg(long)]
    end: Option<usize>,

    /// Name output files from this column instead of the row index
    #[arg(long)]
    name_column: Option<String>,

    /// Continue past per-item failures instead of aborting the run
    #[arg(long)]
    skip_errors: bool,

    /// Max documents generated concurrently
    #[arg(long, default_value_t = DEFAULT_GENERATE_LIMIT)]
    concurrency_gen: usize,

    /// Max files written concurrently
    #[arg(long, default_value_t = DEFAULT_WRITE_LIMIT)]
    concurrency_write: usize,

    /// Suppress per-item progress output
    #[arg(long)]
    quiet: bool,

    /// Log to logs/formfill.log and stderr (RUST_LOG controls the level)
    #[arg(long)]
    verbose: bool,
}

fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

fn print_summary(stats: &RunStats) {
    let elapsed = stats
        .elapsed()
        .map(format_duration)
        .unwrap_or_else(|| "--:--".to_string());
    println!(
        "done | total {} | generated ok:{} err:{} skipped:{} | written ok:{} err:{} skipped:{} | elapsed {}",
        stats.total,
        stats.generated_ok,
        stats.generated_err,
        stats.skipped_gen,
        stats.written_ok,
        stats.written_err,
        stats.skipped_write,
        elapsed,
    );
}

fn print_event(event: &RunEvent) {
    match event {
        RunEvent::RunStarted { total } => println!("generating {total} file(s)"),
        RunEvent::GenerateCompleted { name } => println!("generated {name}"),
        RunEvent::GenerateFailed { name, message } => {
            println!("generate failed {name}: {message}")
        }
        RunEvent::GenerateSkipped { name } => println!("skipped {name} (generation failed)"),
        RunEvent::WriteCompleted { name } => println!("wrote {name}"),
        RunEvent::WriteFailed { name, message } => println!("write failed {name}: {message}"),
        RunEvent::WriteSkipped { name } => println!("skipped {name} (write failed)"),
        RunEvent::RunCompleted { .. } | RunEvent::RunAborted { .. } => {}
    }
}

fn load_rows(path: &PathBuf) -> Result<Vec<RowData>, CliError> {
    let text = fs::read_to_string(path).map_err(|error| CliError::Rows {
        path: path.clone(),
        message: error.to_string(),
    })?;
    let rows: Vec<HashMap<String, String>> =
        serde_json::from_str(&text).map_err(|error| CliError::Rows {
            path: path.clone(),
            message: error.to_string(),
        })?;
    Ok(rows)
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let _logging_guard = if args.verbose {
        match init_logging(DEFAULT_LOG_DIR, DEFAULT_LOG_FILE) {
            Ok(guard) => Some(guard),
            Err(error) => CliError::LoggingInit(error).exit(),
        }
    } else {
        None
    };

    let template = match fs::read(&args.template) {
        Ok(bytes) => bytes,
        Err(error) => CliError::Template {
            path: args.template.clone(),
            error,
        }
        .exit(),
    };

    let rows = match load_rows(&args.rows) {
        Ok(rows) => rows,
        Err(error) => error.exit(),
    };

    if let Err(error) = fs::create_dir_all(&args.out) {
        CliError::OutDir {
            path: args.out.clone(),
            error,
        }
        .exit();
    }

    let config = RunConfig {
        concurrency_generate: args.concurrency_gen,
        concurrency_write: args.concurrency_write,
        error_policy: if args.skip_errors {
            ErrorPolicy::Skip
        } else {
            ErrorPolicy::Abort
        },
    };

    let (controller, mut events) = RunController::new(
        TextTemplateFiller::new(),
        FsDirectoryWriter::new(&args.out),
        config,
    );

    let printer = (!args.quiet).then(|| {
        tokio::spawn(async move {
            while let Some(event) = events.next().await {
                print_event(&event);
            }
        })
    });

    let mut request = RunRequest::new(template, rows);
    request.start = args.start;
    request.end = args.end;
    if let Some(column) = args.name_column {
        request.naming = NamingRule::Column(column);
    }

    let outcome = controller.generate(request).await;
    let stats = controller.stats();

    // Dropping the controller closes the event channel so the printer ends.
    drop(controller);
    if let Some(printer) = printer {
        let _ = printer.await;
    }

    match outcome {
        Ok(stats) => print_summary(&stats),
        Err(error @ (RunError::Config(_) | RunError::AlreadyRunning)) => {
            CliError::Run(error).exit()
        }
        Err(error) => {
            print_summary(&stats);
            CliError::Run(error).exit()
        }
    }
}
