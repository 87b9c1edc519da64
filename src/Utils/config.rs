//! Typed run configuration on top of `task_parser`.
//!
//! Sections and keys (all optional, defaults in brackets):
//! - `general`: `task` [minimize], `func` [sin(x) + x^2], `a` [-2], `b` [2]
//! - `task1`: `method` [golden], `eps` [1e-4], `delta` [0, meaning eps/2]
//! - `task2`: `method` [central], `dfunc` [none], `h` [0.1], `rmse_sweep` [true],
//!   `sweep_steps` [5], `parallel_sweep` [false]
//! - `output`: `data_dir` [data]
//! - `logging`: `level` [info], `log_file` [none; `auto` for a timestamped name]

use crate::Utils::task_parser::{DocumentMap, Value, parse_document};
use crate::numerical::differentiation::finite_differences::DifferenceScheme;
use crate::numerical::optimization::minimizer::MinimizerKind;
use crate::tasks::TaskKind;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq)]
pub struct GeneralConfig {
    pub task: TaskKind,
    pub func: String,
    pub a: f64,
    pub b: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MinimizationConfig {
    pub method: MinimizerKind,
    pub eps: f64,
    pub delta: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DifferentiationConfig {
    pub method: DifferenceScheme,
    /// reference derivative formula; the symbolic derivative of `func` when absent
    pub dfunc: Option<String>,
    pub h: f64,
    pub rmse_sweep: bool,
    pub sweep_steps: i64,
    pub parallel_sweep: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutputConfig {
    pub data_dir: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    pub level: String,
    pub log_file: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub general: GeneralConfig,
    pub task1: MinimizationConfig,
    pub task2: DifferentiationConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig {
                task: TaskKind::Minimize,
                func: "sin(x) + x^2".to_string(),
                a: -2.0,
                b: 2.0,
            },
            task1: MinimizationConfig {
                method: MinimizerKind::Golden,
                eps: 1e-4,
                delta: 0.0,
            },
            task2: DifferentiationConfig {
                method: DifferenceScheme::Central,
                dfunc: None,
                h: 0.1,
                rmse_sweep: true,
                sweep_steps: 5,
                parallel_sweep: false,
            },
            output: OutputConfig {
                data_dir: "data".to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                log_file: None,
            },
        }
    }
}

/// read-only view of the parsed document with typed getters
struct Document(DocumentMap);

impl Document {
    fn get(&self, section: &str, key: &str) -> Option<&Value> {
        self.0.get(section).and_then(|s| s.get(key))
    }

    fn string(&self, section: &str, key: &str) -> Option<String> {
        self.get(section, key)
            .map(|v| v.to_string_value())
            .filter(|s| !s.is_empty())
    }

    fn float(&self, section: &str, key: &str, default: f64) -> Result<f64, String> {
        match self.get(section, key) {
            None => Ok(default),
            Some(value) => value
                .as_float()
                .filter(|v| v.is_finite())
                .ok_or_else(|| {
                    format!("{}.{}: expected a finite number, got '{}'", section, key, value)
                }),
        }
    }

    fn integer(&self, section: &str, key: &str, default: i64) -> Result<i64, String> {
        match self.get(section, key) {
            None => Ok(default),
            Some(value) => value
                .as_integer()
                .ok_or_else(|| format!("{}.{}: expected an integer, got '{}'", section, key, value)),
        }
    }

    fn boolean(&self, section: &str, key: &str, default: bool) -> Result<bool, String> {
        match self.get(section, key) {
            None => Ok(default),
            Some(value) => value
                .as_boolean()
                .ok_or_else(|| format!("{}.{}: expected true or false, got '{}'", section, key, value)),
        }
    }

    fn parsed<T: FromStr>(&self, section: &str, key: &str, default: T) -> Result<T, String> {
        match self.string(section, key) {
            None => Ok(default),
            Some(text) => T::from_str(text.trim())
                .map_err(|_| format!("Unknown {} {}: {}", section, key, text)),
        }
    }
}

impl Config {
    /// Builds the configuration from document text, missing keys keep their defaults.
    pub fn from_text(text: &str) -> Result<Config, String> {
        let doc = Document(parse_document(text)?);
        let default = Config::default();
        let general = GeneralConfig {
            task: doc.parsed("general", "task", default.general.task)?,
            func: doc.string("general", "func").unwrap_or(default.general.func),
            a: doc.float("general", "a", default.general.a)?,
            b: doc.float("general", "b", default.general.b)?,
        };
        let task1 = MinimizationConfig {
            method: doc.parsed("task1", "method", default.task1.method)?,
            eps: doc.float("task1", "eps", default.task1.eps)?,
            delta: doc.float("task1", "delta", default.task1.delta)?,
        };
        let task2 = DifferentiationConfig {
            method: doc.parsed("task2", "method", default.task2.method)?,
            dfunc: doc.string("task2", "dfunc").or(default.task2.dfunc),
            h: doc.float("task2", "h", default.task2.h)?,
            rmse_sweep: doc.boolean("task2", "rmse_sweep", default.task2.rmse_sweep)?,
            sweep_steps: doc.integer("task2", "sweep_steps", default.task2.sweep_steps)?,
            parallel_sweep: doc.boolean("task2", "parallel_sweep", default.task2.parallel_sweep)?,
        };
        let output = OutputConfig {
            data_dir: doc.string("output", "data_dir").unwrap_or(default.output.data_dir),
        };
        let logging = LoggingConfig {
            level: doc.string("logging", "level").unwrap_or(default.logging.level),
            log_file: doc
                .string("logging", "log_file")
                .filter(|f| !f.eq_ignore_ascii_case("none")),
        };
        Ok(Config {
            general,
            task1,
            task2,
            output,
            logging,
        })
    }

    /// Reads and parses a configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Config, String> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to open config file: {} ({})", path.display(), e))?;
        Config::from_text(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_empty_document_gives_defaults() {
        assert_eq!(Config::from_text("").unwrap(), Config::default());
        assert_eq!(Config::from_text("# nothing here\n").unwrap(), Config::default());
    }

    #[test]
    fn test_full_document() {
        let text = "[general]\n\
                    task = diff\n\
                    func = exp(x)*cos(x)\n\
                    a = 0\n\
                    b = 1.5\n\
                    [task1]\n\
                    method = Dichotomy\n\
                    eps = 1e-6\n\
                    delta = 1e-7\n\
                    [task2]\n\
                    method = left\n\
                    dfunc = exp(x)*(cos(x) - sin(x))\n\
                    h = 0.05\n\
                    rmse_sweep = no\n\
                    sweep_steps = 7\n\
                    [output]\n\
                    data_dir = out/run1\n\
                    [logging]\n\
                    level = debug\n\
                    log_file = auto\n";
        let cfg = Config::from_text(text).unwrap();
        assert_eq!(cfg.general.task, TaskKind::Differentiate);
        assert_eq!(cfg.general.func, "exp(x)*cos(x)");
        assert_eq!(cfg.general.a, 0.0);
        assert_eq!(cfg.general.b, 1.5);
        assert_eq!(cfg.task1.method, MinimizerKind::Dichotomy);
        assert_eq!(cfg.task1.eps, 1e-6);
        assert_eq!(cfg.task1.delta, 1e-7);
        assert_eq!(cfg.task2.method, DifferenceScheme::Left);
        assert_eq!(cfg.task2.dfunc.as_deref(), Some("exp(x)*(cos(x) - sin(x))"));
        assert_eq!(cfg.task2.h, 0.05);
        assert!(!cfg.task2.rmse_sweep);
        assert_eq!(cfg.task2.sweep_steps, 7);
        assert!(!cfg.task2.parallel_sweep);
        assert_eq!(cfg.output.data_dir, "out/run1");
        assert_eq!(cfg.logging.level, "debug");
        assert_eq!(cfg.logging.log_file.as_deref(), Some("auto"));
    }

    #[test]
    fn test_task_aliases() {
        for (text, kind) in [
            ("1", TaskKind::Minimize),
            ("task1", TaskKind::Minimize),
            ("Minimization", TaskKind::Minimize),
            ("2", TaskKind::Differentiate),
            ("derivative", TaskKind::Differentiate),
            ("DIFFERENTIATE", TaskKind::Differentiate),
        ] {
            let cfg = Config::from_text(&format!("general\ntask: {}\n", text)).unwrap();
            assert_eq!(cfg.general.task, kind, "{}", text);
        }
    }

    #[test]
    fn test_invalid_values() {
        let err = Config::from_text("[general]\ntask = integrate\n").unwrap_err();
        assert!(err.contains("Unknown general task"), "{}", err);
        let err = Config::from_text("[task1]\nmethod = newton\n").unwrap_err();
        assert!(err.contains("newton"), "{}", err);
        let err = Config::from_text("[general]\na = left\n").unwrap_err();
        assert!(err.contains("expected a finite number"), "{}", err);
        for bad in ["inf", "-inf", "NaN"] {
            let err = Config::from_text(&format!("[general]\nb = {}\n", bad)).unwrap_err();
            assert!(err.contains("general.b"), "{}", err);
        }
        let err = Config::from_text("[task2]\nrmse_sweep = maybe\n").unwrap_err();
        assert!(err.contains("expected true or false"), "{}", err);
    }

    #[test]
    fn test_empty_dfunc_means_none() {
        let cfg = Config::from_text("[task2]\ndfunc =\n").unwrap();
        assert_eq!(cfg.task2.dfunc, None);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.txt");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[general]\ntask = 2\nfunc = x^3").unwrap();
        let cfg = Config::load(&path).unwrap();
        assert_eq!(cfg.general.task, TaskKind::Differentiate);
        assert_eq!(cfg.general.func, "x^3");
        let missing = Config::load(dir.path().join("missing.txt")).unwrap_err();
        assert!(missing.starts_with("Failed to open config file"));
    }
}
