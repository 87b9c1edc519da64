//! Task layer: turns a [`Config`] into a minimization or differentiation run and archives
//! the results.
//!
//! # Example
//! ```
//! use matan::Utils::config::Config;
//! use matan::tasks::{TaskOutcome, run_task};
//! let mut cfg = Config::default();
//! cfg.general.func = "(x - 0.5)^2".to_string();
//! match run_task(&cfg).unwrap() {
//!     TaskOutcome::Minimization(result) => assert!((result.x_min - 0.5).abs() < 1e-3),
//!     TaskOutcome::Differentiation(_) => unreachable!(),
//! }
//! ```
use crate::Utils::config::Config;
use crate::Utils::result_writer::{
    write_task1_result, write_task2_combined, write_task2_derivative_expr, write_task2_result,
    write_task2_rmse,
};
use crate::numerical::differentiation::finite_differences::DerivativeResult;
use crate::numerical::differentiation::multi_estimator::MultiEstimatorRunner;
use crate::numerical::evaluable::{DerivativeTruth, SymbolicFunction};
use crate::numerical::optimization::minimizer::MinimizationResult;
use log::info;
use std::path::Path;
use std::str::FromStr;
use strum_macros::{Display, EnumIter};

/// Which of the two tasks a configuration selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum TaskKind {
    Minimize,
    Differentiate,
}

impl FromStr for TaskKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1" | "task1" | "minimize" | "minimization" => Ok(TaskKind::Minimize),
            "2" | "task2" | "differentiate" | "differentiation" | "derivative" | "diff" => {
                Ok(TaskKind::Differentiate)
            }
            other => Err(format!("Unknown task: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TaskOutcome {
    Minimization(MinimizationResult),
    Differentiation(DerivativeResult),
}

fn minimize(cfg: &Config) -> Result<MinimizationResult, String> {
    let f = SymbolicFunction::from_string(&cfg.general.func).map_err(|e| e.to_string())?;
    let minimizer = cfg.task1.method.minimizer(cfg.task1.delta);
    info!(
        "minimizing {} on [{}, {}] with {} (eps = {})",
        cfg.general.func, cfg.general.a, cfg.general.b, cfg.task1.method, cfg.task1.eps
    );
    minimizer
        .minimize(&f, cfg.general.a, cfg.general.b, cfg.task1.eps)
        .map_err(|e| e.to_string())
}

fn differentiate(cfg: &Config) -> Result<DerivativeResult, String> {
    let f = SymbolicFunction::from_string(&cfg.general.func).map_err(|e| e.to_string())?;
    let differentiator = cfg.task2.method.differentiator();
    let result = match &cfg.task2.dfunc {
        Some(dfunc) => {
            let df = SymbolicFunction::from_string(dfunc).map_err(|e| e.to_string())?;
            differentiator.differentiate(
                &f,
                DerivativeTruth::Formula(&df),
                cfg.general.a,
                cfg.general.b,
                cfg.task2.h,
            )
        }
        None => differentiator.differentiate(
            &f,
            DerivativeTruth::Analytic(&f),
            cfg.general.a,
            cfg.general.b,
            cfg.task2.h,
        ),
    };
    result.map_err(|e| e.to_string())
}

/// Runs the configured task without touching the file system.
pub fn run_task(cfg: &Config) -> Result<TaskOutcome, String> {
    match cfg.general.task {
        TaskKind::Minimize => minimize(cfg).map(TaskOutcome::Minimization),
        TaskKind::Differentiate => differentiate(cfg).map(TaskOutcome::Differentiation),
    }
}

/// Runs the configured task and writes every result file into `output.data_dir`.
///
/// Differentiation additionally runs all three schemes on the same grid and, when
/// `task2.rmse_sweep` is set, the RMSE sweep over `task2.sweep_steps` halvings of h.
pub fn run_and_archive(cfg: &Config) -> Result<TaskOutcome, String> {
    let data_dir = Path::new(&cfg.output.data_dir);
    let outcome = run_task(cfg)?;
    match &outcome {
        TaskOutcome::Minimization(result) => {
            let f = SymbolicFunction::from_string(&cfg.general.func).map_err(|e| e.to_string())?;
            write_task1_result(result, &f, cfg.general.a, cfg.general.b, data_dir)
                .map_err(|e| e.to_string())?;
        }
        TaskOutcome::Differentiation(result) => {
            write_task2_result(result, data_dir).map_err(|e| e.to_string())?;
            let (a, b, h) = (cfg.general.a, cfg.general.b, cfg.task2.h);
            let runner = MultiEstimatorRunner::default();
            let combined = runner
                .run_all_differences(&cfg.general.func, a, b, h)
                .map_err(|e| e.to_string())?;
            write_task2_combined(&combined, data_dir).map_err(|e| e.to_string())?;
            write_task2_derivative_expr(&combined.derivative_expr, data_dir)
                .map_err(|e| e.to_string())?;
            if cfg.task2.rmse_sweep {
                let steps = cfg.task2.sweep_steps;
                let sweep = if cfg.task2.parallel_sweep {
                    runner.run_rmse_sweep_parallel(&cfg.general.func, a, b, h, steps)
                } else {
                    runner.run_rmse_sweep(&cfg.general.func, a, b, h, steps)
                }
                .map_err(|e| e.to_string())?;
                write_task2_rmse(&sweep, data_dir).map_err(|e| e.to_string())?;
            }
        }
    }
    info!("results written to {}", data_dir.display());
    Ok(outcome)
}
