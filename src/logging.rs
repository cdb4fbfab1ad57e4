use crate::config::FileConfig;
use crate::util::data_dir;
use log::LevelFilter;
use simplelog::{ConfigBuilder, WriteLogger};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Start writing log messages to the configured log file.  The terminal
/// belongs to the game, so nothing is ever logged to stderr.
///
/// Does nothing if the configured log level is `Off`.
pub(crate) fn init(files: &FileConfig) -> Result<(), LogError> {
    if files.log_level == LevelFilter::Off {
        return Ok(());
    }
    let path = log_file(files).ok_or_else(LogError::no_path)?;
    let fp = open_log_file(&path)?;
    let config = ConfigBuilder::new()
        .set_target_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Off)
        .build();
    WriteLogger::init(files.log_level, config, fp).map_err(LogError::install)
}

/// Return the path to write logs to: the configured file if there is one,
/// otherwise `gridsnake.log` in the local data directory
fn log_file(files: &FileConfig) -> Option<PathBuf> {
    files
        .log_file
        .clone()
        .or_else(|| data_dir().map(|p| p.join("gridsnake.log")))
}

fn open_log_file(path: &Path) -> Result<fs_err::File, LogError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs_err::create_dir_all(parent).map_err(LogError::mkdir)?;
    }
    fs_err::OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)
        .map_err(LogError::open)
}

#[derive(Debug, Error)]
#[error("Failed to set up logging")]
pub(crate) struct LogError(#[source] LogErrorSource);

impl LogError {
    fn no_path() -> Self {
        LogError(LogErrorSource::NoPath)
    }

    fn mkdir(e: std::io::Error) -> Self {
        LogError(LogErrorSource::Mkdir(e))
    }

    fn open(e: std::io::Error) -> Self {
        LogError(LogErrorSource::Open(e))
    }

    fn install(e: log::SetLoggerError) -> Self {
        LogError(LogErrorSource::Install(e))
    }
}

#[derive(Debug, Error)]
enum LogErrorSource {
    #[error("failed to determine path to local data directory")]
    NoPath,
    #[error("failed to create parent directories")]
    Mkdir(#[source] std::io::Error),
    #[error("failed to open log file")]
    Open(#[source] std::io::Error),
    #[error("failed to install logger")]
    Install(#[source] log::SetLoggerError),
}
