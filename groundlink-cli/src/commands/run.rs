//! Run command - connect to the telemetry bridge and open the dashboard.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use groundlink::config::is_websocket_url;
use groundlink::dashboard::GroundStation;
use groundlink::map::SceneMap;
use groundlink::telemetry::{TelemetryFeed, TelemetryIngestor, DEFAULT_FEED_CAPACITY};

use crate::error::CliError;
use crate::runner::CliRunner;
use crate::tui_app::{self, TuiAppConfig};

/// Grace period for the ingestor to send its close frame.
const INGESTOR_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(2);

/// Arguments for the run command.
#[derive(Debug, Default)]
pub struct RunArgs {
    pub url: Option<String>,
    pub debug: bool,
}

/// Run the run command.
pub fn run(args: RunArgs) -> Result<(), CliError> {
    let runner = CliRunner::with_debug(args.debug)?;
    runner.log_startup("run");

    let mut config = runner.config().clone();
    if let Some(url) = args.url {
        if !is_websocket_url(&url) {
            return Err(CliError::Config(format!(
                "--url '{}' must be a ws:// or wss:// URL",
                url
            )));
        }
        config.telemetry.url = url;
    }

    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_flag = Arc::clone(&shutdown);
    ctrlc::set_handler(move || {
        shutdown_flag.store(true, Ordering::SeqCst);
    })
    .map_err(|e| CliError::Config(format!("Failed to install Ctrl+C handler: {}", e)))?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("groundlink-io")
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;

    let feed = TelemetryFeed::new(DEFAULT_FEED_CAPACITY);
    let updates = feed.subscribe();
    let cancel = CancellationToken::new();

    let ingestor = TelemetryIngestor::new(config.ingestor_config(), feed.clone());
    let telemetry_url = ingestor.url().to_string();
    let handle = {
        let _enter = runtime.enter();
        ingestor.start(cancel.clone())
    };

    let station =
        GroundStation::<SceneMap>::mount(config.map_sync_config()).map_err(CliError::Map)?;

    let app = TuiAppConfig {
        station,
        feed: feed.clone(),
        updates,
        shutdown,
        ingestor: &handle,
        telemetry_url,
    };

    let result = if atty::is(atty::Stream::Stdout) {
        tui_app::run_tui(app)
    } else {
        tui_app::run_headless(app)
    };

    info!("Shutting down telemetry ingestor");
    cancel.cancel();
    // The timer must be created inside the runtime
    let outcome =
        runtime.block_on(async { tokio::time::timeout(INGESTOR_SHUTDOWN_TIMEOUT, handle).await });
    let connection_error = match outcome {
        Ok(Ok(Ok(()))) => None,
        Ok(Ok(Err(e))) => Some(e.to_string()),
        Ok(Err(e)) => {
            warn!(error = %e, "Telemetry task panicked");
            Some(e.to_string())
        }
        Err(_) => {
            warn!("Telemetry ingestor did not stop in time");
            None
        }
    };
    runtime.shutdown_timeout(INGESTOR_SHUTDOWN_TIMEOUT);

    print_session_summary(&feed, connection_error.as_deref());
    result
}

/// Print a short summary after the dashboard closes.
fn print_session_summary(feed: &TelemetryFeed, connection_error: Option<&str>) {
    let stats = feed.stats();
    println!();
    println!("Session summary");
    println!("  Messages received:  {}", stats.messages_received);
    println!("  Snapshots applied:  {}", stats.snapshots_published);
    println!("  Messages dropped:   {}", stats.messages_dropped);
    if let Some(error) = connection_error {
        println!("  Telemetry link:     {}", error);
    }
}
