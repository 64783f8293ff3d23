use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use scanwatch::config::settings::{Settings, DEFAULT_SERVER_URL};
use scanwatch::headless::{self, HeadlessOptions};

#[derive(Parser, Debug)]
#[command(name = "scanwatch", version, about = "Follow a background scan's progress")]
struct Cli {
    /// Scan server base URL
    #[arg(long, env = "SCANWATCH_SERVER", default_value = DEFAULT_SERVER_URL)]
    server: String,

    /// Path of the progress event stream
    #[arg(long)]
    events_path: Option<String>,

    /// Path of the scan start/interrupt endpoint
    #[arg(long)]
    scan_path: Option<String>,

    /// Timeout in seconds for scan/interrupt requests
    #[arg(short = 't', long)]
    timeout: Option<u64>,

    /// Log progress instead of showing the terminal UI
    #[arg(long)]
    headless: bool,

    /// Request a scan once connected (headless mode)
    #[arg(long)]
    scan: bool,

    /// Export the final progress as JSON to file (implies --headless)
    #[arg(long)]
    export_json: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();
    let headless = cli.headless || cli.export_json.is_some();

    // Initialize tracing (logs to stderr). Headless mode reports through the log.
    let default_level = if headless { "info" } else { "off" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    // Build settings
    let mut settings = Settings {
        server_url: cli.server,
        ..Settings::default()
    };
    if let Some(path) = cli.events_path {
        settings.events_path = path;
    }
    if let Some(path) = cli.scan_path {
        settings.scan_path = path;
    }
    if let Some(secs) = cli.timeout {
        settings.request_timeout_secs = secs;
    }

    if headless {
        let options = HeadlessOptions {
            trigger_scan: cli.scan,
            export_path: cli.export_json,
            ..HeadlessOptions::default()
        };
        return headless::run(settings, options).await;
    }

    // Interactive mode: launch TUI
    let mut app = scanwatch::app::App::new(settings);
    app.run().await
}
