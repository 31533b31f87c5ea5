//! Application settings read from a TOML file.
//!
//! ```toml
//! [analysis]
//! window = [-100.0, 100.0]
//! samples = 4000
//! domain_check = true
//!
//! [plot]
//! backend = "plotters"      # or "gnuplot"
//! window = [-100.0, 100.0]
//! output_dir = "."
//! width = 800
//! height = 600
//! samples = 2000
//! show = false              # gnuplot only: open a window instead of writing a PNG
//!
//! [logging]
//! level = "warn"
//! file = "derivative_xpert.log"  # a directory gets a timestamped file
//! ```
//! Every key is optional; a missing file gives the defaults.
use crate::Utils::logger::{LogSettings, parse_level};
use crate::Utils::plots::BackendKind;
use crate::calculus::analysis::AnalysisConfig;
use crate::error::{CalcError, CalcResult};
use crate::numerical::window::SearchWindow;
use simplelog::LevelFilter;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use toml::{Table, Value};

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisSettings {
    pub window: (f64, f64),
    pub samples: usize,
    pub domain_check: bool,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            window: (-100.0, 100.0),
            samples: 4000,
            domain_check: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlotSettings {
    pub backend: BackendKind,
    pub window: (f64, f64),
    pub output_dir: PathBuf,
    pub width: u32,
    pub height: u32,
    pub samples: usize,
    pub show: bool,
}

impl Default for PlotSettings {
    fn default() -> Self {
        Self {
            backend: BackendKind::Plotters,
            window: (-100.0, 100.0),
            output_dir: PathBuf::from("."),
            width: 800,
            height: 600,
            samples: 2000,
            show: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: LevelFilter::Warn,
            file: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppConfig {
    pub analysis: AnalysisSettings,
    pub plot: PlotSettings,
    pub logging: LoggingSettings,
}

//___________________________________TOML HELPERS___________________________________

fn section<'a>(table: &'a Table, name: &str) -> CalcResult<Option<&'a Table>> {
    match table.get(name) {
        None => Ok(None),
        Some(Value::Table(t)) => Ok(Some(t)),
        Some(_) => Err(CalcError::Config(format!("[{}] must be a table", name))),
    }
}

fn bad_key(section: &str, key: &str, expected: &str) -> CalcError {
    CalcError::Config(format!("{}.{} must be {}", section, key, expected))
}

fn get_f64(value: &Value) -> Option<f64> {
    value.as_float().or_else(|| value.as_integer().map(|i| i as f64))
}

fn read_window(t: &Table, section: &str) -> CalcResult<Option<(f64, f64)>> {
    let Some(value) = t.get("window") else {
        return Ok(None);
    };
    let expected = "an array of two increasing numbers";
    let items = value
        .as_array()
        .ok_or_else(|| bad_key(section, "window", expected))?;
    let numbers: Vec<f64> = items.iter().filter_map(get_f64).collect();
    match numbers.as_slice() {
        [a, b] if items.len() == 2 && a < b && a.is_finite() && b.is_finite() => Ok(Some((*a, *b))),
        _ => Err(bad_key(section, "window", expected)),
    }
}

fn read_usize(t: &Table, section: &str, key: &str) -> CalcResult<Option<usize>> {
    match t.get(key) {
        None => Ok(None),
        Some(v) => match v.as_integer() {
            Some(i) if i > 0 => Ok(Some(i as usize)),
            _ => Err(bad_key(section, key, "a positive integer")),
        },
    }
}

fn read_u32(t: &Table, section: &str, key: &str) -> CalcResult<Option<u32>> {
    match t.get(key) {
        None => Ok(None),
        Some(v) => match v.as_integer() {
            Some(i) if i > 0 => u32::try_from(i)
                .map(Some)
                .map_err(|_| bad_key(section, key, "at most 4294967295")),
            _ => Err(bad_key(section, key, "a positive integer")),
        },
    }
}

fn read_bool(t: &Table, section: &str, key: &str) -> CalcResult<Option<bool>> {
    match t.get(key) {
        None => Ok(None),
        Some(v) => v.as_bool().map(Some).ok_or_else(|| bad_key(section, key, "a boolean")),
    }
}

fn read_str<'a>(t: &'a Table, section: &str, key: &str) -> CalcResult<Option<&'a str>> {
    match t.get(key) {
        None => Ok(None),
        Some(v) => v.as_str().map(Some).ok_or_else(|| bad_key(section, key, "a string")),
    }
}

impl AppConfig {
    /// Parses TOML text; absent keys keep their defaults.
    pub fn from_toml_str(text: &str) -> CalcResult<Self> {
        let table: Table = text
            .parse()
            .map_err(|e: toml::de::Error| CalcError::Config(e.to_string()))?;
        let mut config = AppConfig::default();

        if let Some(t) = section(&table, "analysis")? {
            if let Some(window) = read_window(t, "analysis")? {
                config.analysis.window = window;
            }
            if let Some(samples) = read_usize(t, "analysis", "samples")? {
                config.analysis.samples = samples;
            }
            if let Some(check) = read_bool(t, "analysis", "domain_check")? {
                config.analysis.domain_check = check;
            }
        }

        if let Some(t) = section(&table, "plot")? {
            if let Some(name) = read_str(t, "plot", "backend")? {
                config.plot.backend = BackendKind::from_str(name)
                    .map_err(|_| bad_key("plot", "backend", "\"plotters\" or \"gnuplot\""))?;
            }
            if let Some(window) = read_window(t, "plot")? {
                config.plot.window = window;
            }
            if let Some(dir) = read_str(t, "plot", "output_dir")? {
                config.plot.output_dir = PathBuf::from(dir);
            }
            if let Some(width) = read_u32(t, "plot", "width")? {
                config.plot.width = width;
            }
            if let Some(height) = read_u32(t, "plot", "height")? {
                config.plot.height = height;
            }
            if let Some(samples) = read_usize(t, "plot", "samples")? {
                config.plot.samples = samples;
            }
            if let Some(show) = read_bool(t, "plot", "show")? {
                config.plot.show = show;
            }
        }

        if let Some(t) = section(&table, "logging")? {
            if let Some(level) = read_str(t, "logging", "level")? {
                config.logging.level = parse_level(level)?;
            }
            if let Some(file) = read_str(t, "logging", "file")? {
                config.logging.file = Some(PathBuf::from(file));
            }
        }
        Ok(config)
    }

    /// Reads the file at `path`; `None` when it does not exist.
    pub fn load(path: &Path) -> CalcResult<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let text = std::fs::read_to_string(path)
            .map_err(|e| CalcError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_toml_str(&text).map(Some)
    }

    pub fn analysis_config(&self) -> AnalysisConfig {
        let (start, end) = self.analysis.window;
        AnalysisConfig {
            window: SearchWindow::new(start, end, self.analysis.samples),
        }
    }

    pub fn log_settings(&self) -> LogSettings {
        LogSettings {
            level: self.logging.level,
            log_to_console: true,
            file: self.logging.file.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.analysis.window, (-100.0, 100.0));
        assert!(config.analysis.domain_check);
        assert_eq!(config.plot.backend, BackendKind::Plotters);
        assert_eq!(config.logging.level, LevelFilter::Warn);
    }

    #[test]
    fn test_full_file() {
        let text = r#"
            [analysis]
            window = [-10, 10.5]
            samples = 1000
            domain_check = false

            [plot]
            backend = "gnuplot"
            output_dir = "plots"
            width = 1024

            [logging]
            level = "debug"
            file = "run.log"
        "#;
        let config = AppConfig::from_toml_str(text).unwrap();
        assert_eq!(config.analysis.window, (-10.0, 10.5));
        assert_eq!(config.analysis.samples, 1000);
        assert!(!config.analysis.domain_check);
        assert_eq!(config.plot.backend, BackendKind::Gnuplot);
        assert_eq!(config.plot.output_dir, PathBuf::from("plots"));
        assert_eq!((config.plot.width, config.plot.height), (1024, 600));
        assert_eq!(config.logging.level, LevelFilter::Debug);
        assert_eq!(config.logging.file, Some(PathBuf::from("run.log")));
        let window = config.analysis_config().window;
        assert_eq!((window.start, window.end, window.samples), (-10.0, 10.5, 1000));
    }

    #[test]
    fn test_invalid_values() {
        for text in [
            "[analysis]\nwindow = [5, 1]",
            "[analysis]\nwindow = \"wide\"",
            "[analysis]\nsamples = -3",
            "[plot]\nbackend = \"excel\"",
            "[logging]\nlevel = \"loud\"",
            "analysis = 3",
            "this is not toml",
        ] {
            assert!(
                matches!(AppConfig::from_toml_str(text), Err(CalcError::Config(_))),
                "{:?} should be rejected",
                text
            );
        }
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[plot]\nheight = 480").unwrap();
        let config = AppConfig::load(file.path()).unwrap().unwrap();
        assert_eq!(config.plot.height, 480);
        // the caller reports a missing file once its logger is up
        assert_eq!(AppConfig::load(Path::new("/definitely/not/here.toml")).unwrap(), None);
    }

    #[test]
    fn test_plot_size_must_fit_u32() {
        for key in ["width", "height"] {
            let text = format!("[plot]\n{} = 5000000000", key);
            assert!(matches!(
                AppConfig::from_toml_str(&text),
                Err(CalcError::Config(msg)) if msg.contains(key)
            ));
        }
        let config = AppConfig::from_toml_str("[plot]\nwidth = 4294967295").unwrap();
        assert_eq!(config.plot.width, u32::MAX);
    }

    #[test]
    fn test_plot_show_flag() {
        assert!(!AppConfig::default().plot.show);
        let text = "[plot]\nbackend = \"gnuplot\"\nshow = true";
        let config = AppConfig::from_toml_str(text).unwrap();
        assert!(config.plot.show);
        assert!(matches!(
            AppConfig::from_toml_str("[plot]\nshow = \"yes\""),
            Err(CalcError::Config(_))
        ));
    }
}
