// # ifddnsd - Interface DDNS Daemon
//
// This daemon is a THIN integration layer only:
// - No change detection or update logic here (that lives in ifddns-core)
// - No retry logic anywhere
// - Configuration is via environment variables, seeded from `./.env`
//
// The ifddnsd daemon is responsible for:
// 1. Loading `./.env` (required) and reading configuration from the environment
// 2. Initializing logging and the runtime
// 3. Resolving the network interface
// 4. Wiring the IP sources and the Cloudflare provider into the engine
// 5. Running the engine until it fails or a shutdown signal arrives
//
// ## Configuration
//
// - `networkInterfaceName`: Interface carrying the IPv6 address (required)
// - `apiKey`: Cloudflare API token
// - `zoneId`: Cloudflare zone ID
// - `ipv4RecordId`: A record ID
// - `ipv6RecordId`: AAAA record ID
// - `sleepTime`: Poll interval in milliseconds (default 300000)
// - `logLevel`: trace, debug, info, warn, error (default info)
//
// ## Example
//
// ```bash
// cat > .env <<EOF
// networkInterfaceName=eth0
// apiKey=your_token
// zoneId=023e105f4ecef8ad9ca31a8372d0c353
// ipv4RecordId=372e67954025e0ba6aaa6d586b9e0b59
// ipv6RecordId=372e67954025e0ba6aaa6d586b9e0b60
// sleepTime=300000
// EOF
//
// ifddnsd
// ```

use anyhow::{Context, Result};
use ifddns_core::engine::DEFAULT_EVENT_CHANNEL_CAPACITY;
use ifddns_core::{AppState, DdnsConfig, DdnsEngine, EngineEvent, InterfaceSource, NetworkInterface};
use ifddns_ip_http::HttpIpSource;
use ifddns_ip_interface::SystemInterfaces;
use ifddns_provider_cloudflare::CloudflareProvider;
use std::path::Path;
use std::process::ExitCode;
use tokio::sync::{mpsc, oneshot};
use tracing::{Level, debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Environment file read at startup, relative to the working directory
const ENV_FILE: &str = ".env";

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: `.env` could not be loaded, or runtime error (the update loop stopped)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DdnsExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown,
    /// Configuration error or startup failure
    ConfigError,
    /// `.env` missing or unreadable
    EnvFileError,
    /// Runtime error (a cycle failed)
    RuntimeError,
}

impl DdnsExitCode {
    fn code(self) -> u8 {
        match self {
            DdnsExitCode::CleanShutdown => 0,
            DdnsExitCode::ConfigError => 1,
            DdnsExitCode::EnvFileError | DdnsExitCode::RuntimeError => 2,
        }
    }
}

impl From<DdnsExitCode> for ExitCode {
    fn from(code: DdnsExitCode) -> Self {
        ExitCode::from(code.code())
    }
}

fn main() -> ExitCode {
    // Runs before logging exists, so failures go to stderr.
    if let Err(code) = load_env_file(Path::new(ENV_FILE)) {
        return code.into();
    }

    // Load configuration from environment
    let config = DdnsConfig::from_env();

    // Initialize tracing (an invalid level is reported by `startup`)
    let subscriber = FmtSubscriber::builder()
        .with_max_level(parse_level(&config.log_level))
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DdnsExitCode::ConfigError.into();
    }

    info!("Starting ifddnsd daemon");
    debug!("Configuration: {:?}", config);

    let interfaces = SystemInterfaces::new();
    let network_interface = match startup(&config, &interfaces) {
        Ok(iface) => iface,
        Err(code) => return code.into(),
    };

    // Enter tokio runtime
    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DdnsExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        if let Err(e) = run_daemon(config, interfaces, network_interface).await {
            error!("Daemon error: {:#}", e);
            DdnsExitCode::RuntimeError
        } else {
            DdnsExitCode::CleanShutdown
        }
    });

    result.into()
}

/// Load `KEY=value` pairs from the environment file into the process
///
/// Variables already set in the process environment win. A missing file is
/// fatal.
fn load_env_file(path: &Path) -> std::result::Result<(), DdnsExitCode> {
    dotenvy::from_path(path).map_err(|e| {
        eprintln!("Error loading {} file: {}", path.display(), e);
        DdnsExitCode::EnvFileError
    })
}

/// Checks that must pass before any network traffic
///
/// Validates the configuration, then resolves the interface. No IP source or
/// provider exists yet when this runs.
fn startup<I: InterfaceSource>(
    config: &DdnsConfig,
    interfaces: &I,
) -> std::result::Result<NetworkInterface, DdnsExitCode> {
    if let Err(e) = config.validate() {
        error!("Configuration validation error: {}", e);
        return Err(DdnsExitCode::ConfigError);
    }

    interfaces
        .lookup(&config.network_interface_name)
        .map_err(|e| {
            error!("Failed to resolve network interface: {}", e);
            DdnsExitCode::ConfigError
        })
}

/// Map a validated log level name onto a tracing level
fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Run the daemon
async fn run_daemon(
    config: DdnsConfig,
    interfaces: SystemInterfaces,
    network_interface: NetworkInterface,
) -> Result<()> {
    info!("Using network interface {}", network_interface);

    let ip_source = HttpIpSource::new(config.ip_lookup_url.clone());
    info!("Public IPv4 lookup via {}", ip_source.url());
    let provider = CloudflareProvider::with_base_url(config.api_key.clone(), config.api_base_url.clone())
        .context("Failed to create Cloudflare provider")?;

    let (engine, events) = DdnsEngine::new(
        Box::new(ip_source),
        Box::new(interfaces),
        Box::new(provider),
        DEFAULT_EVENT_CHANNEL_CAPACITY,
    )?;

    let event_logger = tokio::spawn(log_events(events));

    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    tokio::spawn(async move {
        match wait_for_shutdown_signal().await {
            Ok(signal) => {
                info!("Received shutdown signal: {}", signal);
                let _ = shutdown_tx.send(());
            }
            Err(e) => {
                // Dropping the sender would resolve the receiver, so park it.
                warn!("Signal handling unavailable: {}", e);
                let _parked = shutdown_tx;
                std::future::pending::<()>().await;
            }
        }
    });

    let state = AppState::new(&config, network_interface);
    let outcome = engine.run_with_shutdown(state, Some(shutdown_rx)).await;

    // Closing the channel lets the logger drain and finish.
    drop(engine);
    let _ = event_logger.await;

    outcome?;
    info!("Shutting down daemon");
    Ok(())
}

/// Log engine events for operators running at debug level
async fn log_events(mut events: mpsc::Receiver<EngineEvent>) {
    while let Some(event) = events.recv().await {
        debug!("Engine event: {:?}", event);
    }
}

/// Wait for shutdown signals (SIGTERM, SIGINT)
///
/// # Returns
///
/// Returns the name of the signal received.
#[cfg(unix)]
async fn wait_for_shutdown_signal() -> Result<&'static str> {
    let mut sigterm = signal(SignalKind::terminate()).context("Failed to setup SIGTERM handler")?;
    let mut sigint = signal(SignalKind::interrupt()).context("Failed to setup SIGINT handler")?;

    let name = tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    };
    Ok(name)
}

/// Wait for shutdown signals (SIGINT only)
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
async fn wait_for_shutdown_signal() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .context("Failed to wait for CTRL-C")?;
    Ok("SIGINT")
}
