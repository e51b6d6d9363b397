use roam2md_core::config::{LoggingConfig, ResolvedConfig};
use std::fs::File;
use std::io::IsTerminal;
use std::path::Path;
use std::sync::Mutex;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

static LOG_GUARD: Mutex<Option<WorkerGuard>> = Mutex::new(None);

/// Install the stderr progress layer and, if configured, a file layer.
pub fn init(cfg: &ResolvedConfig) {
    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .with_filter(stderr_filter(&cfg.logging, env.as_deref()));

    let registry = tracing_subscriber::registry().with(stderr_layer);

    match &cfg.logging.file {
        Some(path) => {
            let file_layer = fmt::layer()
                .with_writer(open_log_file(path))
                .with_ansi(false)
                .with_file(true)
                .with_line_number(true)
                .with_filter(file_filter(&cfg.logging, env.as_deref()));
            registry.with(file_layer).init();
        }
        None => registry.init(),
    }
}

/// Flush buffered file logs. Call before `process::exit`, which skips destructors.
pub fn flush() {
    if let Ok(mut g) = LOG_GUARD.lock() {
        g.take();
    }
}

fn open_log_file(path: &Path) -> tracing_appender::non_blocking::NonBlocking {
    let file = File::create(path).unwrap_or_else(|e| {
        eprintln!("Failed to create log file {}: {}", path.display(), e);
        std::process::exit(1);
    });

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    // Keep the file writer alive until flush()
    if let Ok(mut g) = LOG_GUARD.lock() {
        *g = Some(guard);
    }
    non_blocking
}

/// `RUST_LOG` replaces the configured level, except that `--debug` always
/// lifts the default level back to debug.
fn stderr_filter(cfg: &LoggingConfig, env: Option<&str>) -> EnvFilter {
    let level = parse_level(&cfg.level).unwrap_or(LevelFilter::INFO);
    let filter = build_filter(level, env);
    if cfg.debug { filter.add_directive(LevelFilter::DEBUG.into()) } else { filter }
}

fn file_filter(cfg: &LoggingConfig, env: Option<&str>) -> EnvFilter {
    let level = cfg
        .file_level
        .as_deref()
        .and_then(parse_level)
        .or_else(|| parse_level(&cfg.level))
        .unwrap_or(LevelFilter::DEBUG);
    build_filter(level, env)
}

fn build_filter(default: LevelFilter, env: Option<&str>) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(default.into())
        .parse_lossy(env.unwrap_or_default())
}

fn parse_level(s: &str) -> Option<LevelFilter> {
    match s.to_lowercase().as_str() {
        "error" => Some(LevelFilter::ERROR),
        "warn" => Some(LevelFilter::WARN),
        "info" => Some(LevelFilter::INFO),
        "debug" => Some(LevelFilter::DEBUG),
        "trace" => Some(LevelFilter::TRACE),
        _ => None,
    }
}
