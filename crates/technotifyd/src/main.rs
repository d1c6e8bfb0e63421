// # technotifyd - Technology Notification Daemon
//
// This daemon is a THIN integration layer. All counting, edge detection and
// fan-out logic lives in technotify-core.
//
// The technotifyd daemon is responsible for:
// 1. Reading configuration from environment variables
// 2. Initializing logging and the runtime
// 3. Creating the notifier on a channel transport
// 4. Logging every broadcast and feeding control commands from stdin
//
// ## Configuration
//
// - `TECHNOTIFY_CONFIG`: Path to a JSON config file (optional)
// - `TECHNOTIFY_MANAGER_PATH`: Object path of broadcasts (overrides file)
// - `TECHNOTIFY_MANAGER_INTERFACE`: Interface of broadcasts (overrides file)
// - `TECHNOTIFY_CHANNEL_CAPACITY`: Broadcast channel capacity (overrides file)
// - `TECHNOTIFY_LOG_LEVEL`: trace, debug, info, warn, error
//
// ## Example
//
// ```bash
// export TECHNOTIFY_LOG_LEVEL=debug
// printf 'register wifi\nenable wifi\noffline on\nstatus\n' | technotifyd
// ```

mod command;

use anyhow::{Context, Result};
use command::Command;
use std::env;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use technotify_core::{
    ChannelTransport, Notifier, NotifierConfig, Observer, ProfileSink, Service, TechnologyKind,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_stream::StreamExt;
use tracing::{Level, debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum DaemonExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<DaemonExitCode> for ExitCode {
    fn from(code: DaemonExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration
struct Config {
    notifier: NotifierConfig,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Individual variables override values from `TECHNOTIFY_CONFIG`.
    fn from_env() -> Result<Self> {
        let mut notifier = match env::var("TECHNOTIFY_CONFIG") {
            Ok(path) => NotifierConfig::from_json_file(&path)
                .with_context(|| format!("Failed to load TECHNOTIFY_CONFIG '{}'", path))?,
            Err(_) => NotifierConfig::default(),
        };

        if let Ok(path) = env::var("TECHNOTIFY_MANAGER_PATH") {
            notifier.manager_path = path;
        }

        if let Ok(interface) = env::var("TECHNOTIFY_MANAGER_INTERFACE") {
            notifier.manager_interface = interface;
        }

        if let Ok(capacity) = env::var("TECHNOTIFY_CHANNEL_CAPACITY") {
            notifier.channel_capacity = capacity.parse().with_context(|| {
                format!("TECHNOTIFY_CHANNEL_CAPACITY must be a number. Got: {}", capacity)
            })?;
        }

        Ok(Self {
            notifier,
            log_level: env::var("TECHNOTIFY_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        self.notifier.validate()?;

        if self.notifier.channel_capacity > 65536 {
            anyhow::bail!(
                "TECHNOTIFY_CHANNEL_CAPACITY must be at most 65536. Got: {}",
                self.notifier.channel_capacity
            );
        }

        self.level()?;
        Ok(())
    }

    fn level(&self) -> Result<Level> {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Ok(Level::TRACE),
            "debug" => Ok(Level::DEBUG),
            "info" => Ok(Level::INFO),
            "warn" => Ok(Level::WARN),
            "error" => Ok(Level::ERROR),
            _ => anyhow::bail!(
                "TECHNOTIFY_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }
    }
}

/// Observer that logs every callback
struct LogObserver;

impl Observer for LogObserver {
    fn name(&self) -> &str {
        "log"
    }

    fn priority(&self) -> i32 {
        i32::MIN
    }

    fn enabled_changed(&self, kind: TechnologyKind, enabled: bool) {
        info!("Technology {} {}", kind, if enabled { "enabled" } else { "disabled" });
    }

    fn default_changed(&self, service: Option<&dyn Service>) {
        match service {
            Some(service) => info!("Default service is now {}", service.identifier()),
            None => info!("No default service"),
        }
    }

    fn offline_mode_changed(&self, enabled: bool) {
        info!("Offline mode {}", if enabled { "on" } else { "off" });
    }
}

/// Profile sink standing in for the profile store
struct LogProfileSink;

impl ProfileSink for LogProfileSink {
    fn profile_changed(&self, delayed: bool) {
        debug!("Profile changed (delayed: {})", delayed);
    }
}

/// Service created by the `default <kind>` command
struct CommandService {
    identifier: String,
    kind: TechnologyKind,
}

impl Service for CommandService {
    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn kind(&self) -> TechnologyKind {
        self.kind
    }
}

fn main() -> ExitCode {
    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return DaemonExitCode::ConfigError.into();
        }
    };

    // Validate configuration
    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {:#}", e);
        return DaemonExitCode::ConfigError.into();
    }

    // Initialize tracing
    let log_level = config.level().unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DaemonExitCode::ConfigError.into();
    }

    info!("Starting technotifyd daemon");

    // Enter tokio runtime
    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DaemonExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        if let Err(e) = run_daemon(config).await {
            error!("Daemon error: {:#}", e);
            DaemonExitCode::RuntimeError
        } else {
            DaemonExitCode::CleanShutdown
        }
    });

    // A pending stdin read would otherwise keep the runtime alive
    rt.shutdown_timeout(Duration::from_secs(1));

    result.into()
}

/// Run the daemon
async fn run_daemon(config: Config) -> Result<()> {
    let transport = Arc::new(ChannelTransport::new(config.notifier.channel_capacity));
    let mut signals = transport.stream();

    let notifier = Notifier::init(transport.clone(), Arc::new(LogProfileSink), config.notifier)?;
    notifier.register_observer(Arc::new(LogObserver));

    // Log every broadcast until the transport is dropped
    let bus_logger = tokio::spawn(async move {
        while let Some(signal) = signals.next().await {
            match signal {
                Ok(signal) => match signal.to_json() {
                    Ok(json) => info!("broadcast {}", json),
                    Err(e) => warn!("Failed to encode {}: {}", signal.property, e),
                },
                Err(e) => warn!("Broadcast log fell behind: {}", e),
            }
        }
    });

    info!("Daemon initialized, reading commands from stdin");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let shutdown = wait_for_shutdown();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line.context("Failed to read stdin")? {
                    Some(line) => {
                        if !handle_line(&notifier, &line) {
                            info!("Quit requested");
                            break;
                        }
                    }
                    None => {
                        info!("stdin closed");
                        break;
                    }
                }
            }

            received = &mut shutdown => {
                info!("Received shutdown signal: {}", received?);
                break;
            }
        }
    }

    info!("Shutting down daemon");
    notifier.cleanup();
    drop(notifier);
    drop(transport);

    if let Err(e) = bus_logger.await {
        warn!("Broadcast logger ended abnormally: {}", e);
    }

    Ok(())
}

/// Apply one control line; returns `false` when the daemon should stop
fn handle_line(notifier: &Notifier, line: &str) -> bool {
    let command = match Command::parse(line) {
        Ok(Some(command)) => command,
        Ok(None) => return true,
        Err(e) => {
            warn!("Ignoring command '{}': {:#}", line.trim(), e);
            return true;
        }
    };

    match command {
        Command::Register(kind) => notifier.register(kind),
        Command::Unregister(kind) => notifier.unregister(kind),
        Command::Enable(kind) => notifier.enable(kind),
        Command::Disable(kind) => notifier.disable(kind),
        Command::Connect(kind) => notifier.connect(kind),
        Command::Disconnect(kind) => notifier.disconnect(kind),
        Command::Default(None) => notifier.default_changed(None),
        Command::Default(Some(kind)) => {
            let service = CommandService {
                identifier: format!("{}_default", kind),
                kind,
            };
            notifier.default_changed(Some(&service as &dyn Service));
        }
        Command::Offline(enabled) => notifier.offline_mode_changed(enabled),
        Command::Status => match serde_json::to_string(&notifier.properties()) {
            Ok(json) => info!("status {}", json),
            Err(e) => warn!("Failed to encode status: {}", e),
        },
        Command::Quit => return false,
    }

    true
}

/// Wait for shutdown signals (SIGTERM, SIGINT)
///
/// # Returns
///
/// Returns the name of the signal received.
#[cfg(unix)]
async fn wait_for_shutdown() -> Result<&'static str> {
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGINT handler: {}", e))?;

    tokio::select! {
        _ = sigterm.recv() => Ok("SIGTERM"),
        _ = sigint.recv() => Ok("SIGINT"),
    }
}

/// Wait for shutdown signals (SIGINT only)
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
async fn wait_for_shutdown() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to wait for CTRL-C: {}", e))?;
    Ok("SIGINT")
}
