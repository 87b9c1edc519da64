//! Logger setup: terminal output plus an optional log file.
use chrono::Local;
use simplelog::{
    ColorChoice, CombinedLogger, Config, LevelFilter, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};
use std::fs::File;
use std::path::{Path, PathBuf};

/// maps "debug", "info", "warn", "error" (and "off", "trace") to a level filter
pub fn log_level_filter(level: &str) -> Result<LevelFilter, String> {
    match level.trim().to_lowercase().as_str() {
        "trace" => Ok(LevelFilter::Trace),
        "debug" => Ok(LevelFilter::Debug),
        "info" => Ok(LevelFilter::Info),
        "warn" => Ok(LevelFilter::Warn),
        "error" => Ok(LevelFilter::Error),
        "off" => Ok(LevelFilter::Off),
        other => Err(format!(
            "loglevel must be debug, info, warn or error, got '{}'",
            other
        )),
    }
}

/// log_<date>_<time>.txt in the working directory
pub fn default_log_file_name() -> PathBuf {
    let date_and_time = Local::now().format("%Y-%m-%d_%H-%M-%S");
    PathBuf::from(format!("log_{}.txt", date_and_time))
}

/// Installs the global logger.
///
/// A second call (or a logger installed elsewhere, e.g. by a test harness) is not an error:
/// the already installed logger stays in place.
pub fn init_logger(level: &str, log_file: Option<&Path>) -> Result<(), String> {
    let log_option = log_level_filter(level)?;
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        log_option,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    if let Some(path) = log_file {
        let file = File::create(path)
            .map_err(|e| format!("Failed to create log file {}: {}", path.display(), e))?;
        loggers.push(WriteLogger::new(log_option, Config::default(), file));
    }
    let _ = CombinedLogger::init(loggers);
    Ok(())
}
