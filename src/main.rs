//! Curl Latency Tester - command line entry point
//!
//! Probes one URL repeatedly with curl and reports where the time goes
//! (DNS, TCP, TLS, server processing, total).

use clap::Parser;
use curl_latency_tester::{
    app::App,
    cli::Cli,
    config::load_config,
    error::{AppError, ErrorReporter, Result},
    PKG_NAME, VERSION,
};
use std::process;

#[tokio::main]
async fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panic: {}", panic_info);
        process::exit(AppError::internal("panic").exit_code());
    }));

    // Usage errors share the configuration exit code
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            let _ = e.print();
            process::exit(1);
        }
    };

    let use_color = cli.use_colors();
    let verbose = cli.verbose;

    if let Err(e) = run_application(cli).await {
        ErrorReporter::new(use_color, verbose).report_error(&e);
        print_error_suggestions(&e);
        process::exit(e.exit_code());
    }
}

/// Main application logic
async fn run_application(cli: Cli) -> Result<()> {
    if cli.debug {
        eprintln!("{} v{} ({})", PKG_NAME, VERSION, env!("TARGET_TRIPLE"));
        eprintln!("Built: {}", env!("BUILD_TIME"));
        if let Some(commit) = option_env!("GIT_COMMIT") {
            eprintln!("Commit: {}", commit);
        }
        eprintln!("{}", cli.get_config_summary());
    }

    let config = load_config(cli)?;
    let app = App::new(config);

    let cancel = app.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\nInterrupted, stopping after the current step...");
            cancel.cancel();
        }
    });

    app.run().await.map(|_| ())
}

/// Print helpful suggestions for common errors
fn print_error_suggestions(error: &AppError) {
    match error {
        AppError::Config(_) | AppError::InvalidConfiguration(_) => {
            eprintln!();
            eprintln!("Configuration help:");
            eprintln!("  - Check your .env file format (KEY=VALUE per line)");
            eprintln!("  - The URL must include a scheme, e.g. https://example.com");
            eprintln!("  - --count must be 1-1000 and --delay 0.1-3600 seconds");
            eprintln!("  - Run with --help for all options");
        }
        AppError::ProbeUnavailable(_) => {
            eprintln!();
            eprintln!("Probe troubleshooting:");
            eprintln!("  - Check that curl is installed: curl --version");
            eprintln!("  - Point --probe (or PROBE_COMMAND) at a curl-compatible executable");
            eprintln!("  - Verify the target URL is reachable from this machine");
            eprintln!("  - Increase --timeout for slow targets");
        }
        AppError::MalformedProbeOutput(_) => {
            eprintln!();
            eprintln!("The probe did not print the expected timing report.");
            eprintln!("  - The probe must honour curl's -o, -s and -w options");
            eprintln!("  - Run with --debug to see every request");
        }
        AppError::Cancelled { .. } => {
            eprintln!();
            eprintln!("No results were saved.");
        }
        _ => {}
    }
}
