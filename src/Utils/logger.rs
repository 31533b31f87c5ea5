use crate::error::{CalcError, CalcResult};
use chrono::Local;
use simplelog::*;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Where and how much to log.
#[derive(Debug, Clone, PartialEq)]
pub struct LogSettings {
    pub level: LevelFilter,
    pub log_to_console: bool,
    /// optional log file
    pub file: Option<PathBuf>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: LevelFilter::Warn,
            log_to_console: true,
            file: None,
        }
    }
}

/// Parses a level name (`off`, `error`, `warn`, `info`, `debug`, `trace`), case-insensitive.
pub fn parse_level(name: &str) -> CalcResult<LevelFilter> {
    LevelFilter::from_str(name.trim())
        .map_err(|_| CalcError::Config(format!("unknown log level '{}'", name)))
}

/// `derivative_xpert_<timestamp>.log` inside `dir`
pub fn timestamped_log_file(dir: &Path) -> PathBuf {
    dir.join(format!(
        "derivative_xpert_{}.log",
        Local::now().format("%Y%m%d_%H%M%S")
    ))
}

/// Log file for the configured path: a directory gets a timestamped file inside it.
pub fn resolve_log_file(path: &Path) -> PathBuf {
    if path.is_dir() {
        timestamped_log_file(path)
    } else {
        path.to_path_buf()
    }
}

/// Initializes the process-wide logger: a terminal logger and, if requested, a file logger.
///
/// Only the first successful call installs a logger; later calls are no-ops and return
/// `Ok(false)`.
pub fn init_logger(settings: &LogSettings) -> CalcResult<bool> {
    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();

    // Console logger
    if settings.log_to_console {
        loggers.push(TermLogger::new(
            settings.level,
            Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ));
    }

    // File logger
    if let Some(ref configured) = settings.file {
        let filename = resolve_log_file(configured);
        let file = File::create(&filename).map_err(|e| {
            CalcError::Config(format!("cannot create log file {}: {}", filename.display(), e))
        })?;
        loggers.push(WriteLogger::new(settings.level, Config::default(), file));
    }

    if loggers.is_empty() {
        return Ok(false);
    }
    Ok(CombinedLogger::init(loggers).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug").unwrap(), LevelFilter::Debug);
        assert_eq!(parse_level("WARN").unwrap(), LevelFilter::Warn);
        assert!(matches!(parse_level("loud"), Err(CalcError::Config(_))));
    }

    #[test]
    fn test_timestamped_log_file() {
        let path = timestamped_log_file(Path::new("logs"));
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("derivative_xpert_") && name.ends_with(".log"));
        assert!(path.starts_with("logs"));
    }

    #[test]
    fn test_directory_gets_timestamped_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let resolved = resolve_log_file(dir.path());
        assert_eq!(resolved.parent(), Some(dir.path()));
        assert!(resolved.to_string_lossy().ends_with(".log"));
        let plain = dir.path().join("run.log");
        assert_eq!(resolve_log_file(&plain), plain);

        let settings = LogSettings {
            level: LevelFilter::Info,
            log_to_console: false,
            file: Some(dir.path().to_path_buf()),
        };
        let _ = init_logger(&settings).unwrap();
        let created: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(created.len(), 1);
        assert!(created[0].starts_with("derivative_xpert_"));
    }

    #[test]
    fn test_init_logger_with_file() {
        let dir = tempfile::tempdir().unwrap();
        let settings = LogSettings {
            level: LevelFilter::Info,
            log_to_console: false,
            file: Some(dir.path().join("run.log")),
        };
        // another test may already have installed the global logger
        let _ = init_logger(&settings).unwrap();
        assert!(dir.path().join("run.log").exists());
        let nothing = LogSettings {
            log_to_console: false,
            ..LogSettings::default()
        };
        assert!(!init_logger(&nothing).unwrap());
    }
}
