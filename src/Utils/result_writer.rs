//! Plain-text result archive: space separated columns, no header, one file per series.
//!
//! | file | columns |
//! |------|---------|
//! | `task1_func.dat` | x f(x), 401 samples on [a, b] |
//! | `task1_<method>_points.dat` | k x_star f(x_star) |
//! | `task1_<method>_interval.dat` | k a b length |
//! | `task1_summary.dat` | x_min f_min |
//! | `task2_<method>.dat` | x f d_true d_est err |
//! | `task2_all.dat` | x f d_true d_right d_left d_central |
//! | `task2_rmse.dat` | h right left central |
//! | `task2_derivative.txt` | derivative formula |
use crate::numerical::differentiation::finite_differences::DerivativeResult;
use crate::numerical::differentiation::multi_estimator::{Task2Results, Task2RmseRow};
use crate::numerical::evaluable::Evaluable;
use crate::numerical::optimization::minimizer::MinimizationResult;
use csv::{Writer, WriterBuilder};
use log::{debug, info};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// number of intervals of the task1_func.dat sampling
pub const FUNCTION_SAMPLES: usize = 400;

fn method_suffix(method: &str) -> &str {
    if method.is_empty() { "unknown" } else { method }
}

fn ensure_dir(dir: &Path) -> io::Result<()> {
    if dir.as_os_str().is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "Output directory is empty",
        ));
    }
    fs::create_dir_all(dir)
}

/// removes regular files in `dir` whose name starts with `prefix`
fn remove_task_files(dir: &Path, prefix: &str) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        if entry.file_name().to_string_lossy().starts_with(prefix) {
            debug!("removing stale {}", entry.path().display());
            fs::remove_file(entry.path())?;
        }
    }
    Ok(())
}

fn space_writer(path: &Path) -> io::Result<Writer<File>> {
    let file = File::create(path).map_err(|e| {
        io::Error::new(e.kind(), format!("Failed to open {}: {}", path.display(), e))
    })?;
    Ok(WriterBuilder::new()
        .delimiter(b' ')
        .has_headers(false)
        .from_writer(file))
}

fn write_rows<I, R>(path: &Path, rows: I) -> io::Result<()>
where
    I: IntoIterator<Item = R>,
    R: IntoIterator<Item = String>,
{
    let mut writer = space_writer(path)?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// f(x), a non-finite value becomes an `InvalidData` error
fn checked_eval(f: &dyn Evaluable, x: f64) -> io::Result<f64> {
    f.eval(x)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))
}

/// Writes everything about one minimization run into `data_dir`, replacing older task1 files.
///
/// `f` is sampled on [a, b] for plotting and evaluated again at every x_star of the trace;
/// a non-finite value fails the write with `InvalidData`.
pub fn write_task1_result(
    result: &MinimizationResult,
    f: &dyn Evaluable,
    a: f64,
    b: f64,
    data_dir: &Path,
) -> io::Result<()> {
    let suffix = method_suffix(&result.method);
    let step = (b - a) / FUNCTION_SAMPLES as f64;
    let samples = (0..=FUNCTION_SAMPLES)
        .map(|i| {
            let x = a + step * i as f64;
            Ok(vec![x.to_string(), checked_eval(f, x)?.to_string()])
        })
        .collect::<io::Result<Vec<_>>>()?;
    let points = result
        .iterations
        .iter()
        .map(|it| {
            Ok(vec![
                it.k.to_string(),
                it.x_star.to_string(),
                checked_eval(f, it.x_star)?.to_string(),
            ])
        })
        .collect::<io::Result<Vec<_>>>()?;

    ensure_dir(data_dir)?;
    remove_task_files(data_dir, "task1_")?;
    write_rows(&data_dir.join("task1_func.dat"), samples)?;
    write_rows(&data_dir.join(format!("task1_{}_points.dat", suffix)), points)?;
    write_rows(
        &data_dir.join(format!("task1_{}_interval.dat", suffix)),
        result.iterations.iter().map(|it| {
            vec![
                it.k.to_string(),
                it.a.to_string(),
                it.b.to_string(),
                it.length.to_string(),
            ]
        }),
    )?;
    write_rows(
        &data_dir.join("task1_summary.dat"),
        [vec![result.x_min.to_string(), result.f_min.to_string()]],
    )?;
    info!("task1 results of {} written to {}", suffix, data_dir.display());
    Ok(())
}

/// Writes a single-scheme run as `task2_<method>.dat`, replacing older task2 files.
pub fn write_task2_result(result: &DerivativeResult, data_dir: &Path) -> io::Result<PathBuf> {
    ensure_dir(data_dir)?;
    remove_task_files(data_dir, "task2_")?;
    let path = data_dir.join(format!("task2_{}.dat", method_suffix(&result.method)));
    write_rows(
        &path,
        result.samples.iter().map(|s| {
            vec![
                s.x.to_string(),
                s.fx.to_string(),
                s.d_true.to_string(),
                s.d_est.to_string(),
                s.err.to_string(),
            ]
        }),
    )?;
    Ok(path)
}

pub fn write_task2_combined(results: &Task2Results, data_dir: &Path) -> io::Result<PathBuf> {
    ensure_dir(data_dir)?;
    let rows = results
        .combined_rows()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;
    let path = data_dir.join("task2_all.dat");
    write_rows(
        &path,
        rows.iter().map(|r| {
            vec![
                r.x.to_string(),
                r.fx.to_string(),
                r.d_true.to_string(),
                r.d_right.to_string(),
                r.d_left.to_string(),
                r.d_central.to_string(),
            ]
        }),
    )?;
    Ok(path)
}

pub fn write_task2_rmse(sweep: &[Task2RmseRow], data_dir: &Path) -> io::Result<PathBuf> {
    ensure_dir(data_dir)?;
    let path = data_dir.join("task2_rmse.dat");
    write_rows(
        &path,
        sweep.iter().map(|r| {
            vec![
                r.h.to_string(),
                r.right.to_string(),
                r.left.to_string(),
                r.central.to_string(),
            ]
        }),
    )?;
    Ok(path)
}

pub fn write_task2_derivative_expr(expr: &str, data_dir: &Path) -> io::Result<PathBuf> {
    ensure_dir(data_dir)?;
    let path = data_dir.join("task2_derivative.txt");
    let mut file = File::create(&path)?;
    writeln!(file, "{}", expr)?;
    Ok(path)
}
