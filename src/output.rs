// Copyright 2026 PulseCtrl Contributors
// SPDX-License-Identifier: Apache-2.0

//! Result output: amplitude tables, pulse plots, JSON summaries.
//!
//! Amplitude tables follow the demonstration's convention: one file per
//! stage named `ctrl_amps_initial_<ext>` / `ctrl_amps_final_<ext>`, with a
//! time column followed by one column per control, tab-separated.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use ndarray::Array2;
use plotters::prelude::*;
use tracing::info;

use crate::error::{Error, Result};
use crate::optim::result::OptimResult;

/// Which stage an amplitude table belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmpsStage {
    Initial,
    Final,
}

impl AmpsStage {
    fn label(self) -> &'static str {
        match self {
            AmpsStage::Initial => "initial",
            AmpsStage::Final => "final",
        }
    }
}

/// File name for an amplitude table: `ctrl_amps_<stage>_<ext>`.
pub fn amps_file_name(stage: AmpsStage, ext: &str) -> String {
    format!("ctrl_amps_{}_{}", stage.label(), ext)
}

/// File name for the JSON summary: `summary_<stem>.json`, where `<stem>` is
/// `ext` without its extension.
pub fn summary_file_name(ext: &str) -> String {
    let stem = Path::new(ext)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(ext);
    format!("summary_{}.json", stem)
}

/// Write one amplitude table. `times` holds the start time of each slot.
pub fn write_amps_file(path: &Path, times: &[f64], amps: &Array2<f64>) -> Result<()> {
    if times.len() != amps.nrows() {
        return Err(Error::Config(format!(
            "time column length {} does not match {} amplitude rows",
            times.len(),
            amps.nrows()
        )));
    }

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    for (k, t) in times.iter().enumerate() {
        write!(writer, "{:.10e}", t)?;
        for j in 0..amps.ncols() {
            write!(writer, "\t{:.10e}", amps[[k, j]])?;
        }
        writeln!(writer)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write both amplitude tables for a result into `dir`, named by `ext`.
/// Returns the written paths.
pub fn write_result_amps(
    dir: &Path,
    ext: &str,
    times: &[f64],
    result: &OptimResult,
) -> Result<(PathBuf, PathBuf)> {
    std::fs::create_dir_all(dir)?;
    let initial_path = dir.join(amps_file_name(AmpsStage::Initial, ext));
    let final_path = dir.join(amps_file_name(AmpsStage::Final, ext));
    write_amps_file(&initial_path, times, &result.initial_amps)?;
    write_amps_file(&final_path, times, &result.final_amps)?;
    info!(
        initial = %initial_path.display(),
        final_ = %final_path.display(),
        "Wrote amplitude files"
    );
    Ok((initial_path, final_path))
}

/// Render the initial and final control amplitudes as two stacked step
/// charts (the demonstration's two-panel figure).
pub fn plot_amps(
    path: &Path,
    evo_time: f64,
    initial: &Array2<f64>,
    finals: &Array2<f64>,
) -> Result<()> {
    let root = BitMapBackend::new(path, (800, 600)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;
    let panels = root.split_evenly((2, 1));

    draw_panel(&panels[0], "Initial control amps", evo_time, initial)?;
    draw_panel(&panels[1], "Optimised control amps", evo_time, finals)?;

    root.present().map_err(plot_err)?;
    info!(path = %path.display(), "Wrote pulse plot");
    Ok(())
}

fn draw_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, plotters::coord::Shift>,
    title: &str,
    evo_time: f64,
    amps: &Array2<f64>,
) -> Result<()> {
    let n = amps.nrows();
    let dt = evo_time / n as f64;

    let mut y_min = amps.iter().cloned().fold(f64::INFINITY, f64::min);
    let mut y_max = amps.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if !y_min.is_finite() || !y_max.is_finite() {
        return Err(Error::Plot("non-finite amplitudes".into()));
    }
    let pad = 0.1 * (y_max - y_min).max(1e-3);
    y_min -= pad;
    y_max += pad;

    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(50)
        .build_cartesian_2d(0.0..evo_time, y_min..y_max)
        .map_err(plot_err)?;
    chart.configure_mesh().draw().map_err(plot_err)?;

    for j in 0..amps.ncols() {
        // Piecewise-constant step path.
        let mut points = Vec::with_capacity(2 * n);
        for k in 0..n {
            let t0 = k as f64 * dt;
            points.push((t0, amps[[k, j]]));
            points.push((t0 + dt, amps[[k, j]]));
        }
        let color = Palette99::pick(j);
        chart
            .draw_series(LineSeries::new(points, &color))
            .map_err(plot_err)?
            .label(format!("u{}", j + 1))
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 16, y)], Palette99::pick(j))
            });
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(plot_err)?;
    Ok(())
}

fn plot_err<E: std::fmt::Display>(e: E) -> Error {
    Error::Plot(e.to_string())
}

/// Write the scalar result summary plus amplitudes as JSON.
pub fn write_json_summary(path: &Path, result: &OptimResult) -> Result<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(BufWriter::new(file), &result.summary())?;
    info!(path = %path.display(), "Wrote JSON summary");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operators::identity;
    use crate::optim::result::{OptimStats, TerminationReason};
    use std::time::Duration;

    fn dummy_result() -> OptimResult {
        OptimResult {
            initial_amps: Array2::from_shape_fn((4, 2), |(k, j)| k as f64 + 0.1 * j as f64),
            final_amps: Array2::from_shape_fn((4, 2), |(k, j)| -(k as f64) - 0.1 * j as f64),
            fid_err: 1e-9,
            grad_norm_final: 1e-6,
            termination: TerminationReason::GoalAchieved,
            num_iter: 7,
            evo_final: identity(2),
            stats: OptimStats {
                wall_time: Duration::from_millis(10),
                num_iter: 7,
                num_fid_evals: 15,
                num_grad_evals: 8,
                wall_time_fid: Duration::from_millis(3),
                wall_time_grad: Duration::from_millis(5),
            },
        }
    }

    #[test]
    fn test_amps_file_name() {
        assert_eq!(
            amps_file_name(AmpsStage::Initial, "hadamard_n_ts10.txt"),
            "ctrl_amps_initial_hadamard_n_ts10.txt"
        );
        assert_eq!(
            amps_file_name(AmpsStage::Final, "x.txt"),
            "ctrl_amps_final_x.txt"
        );
    }

    #[test]
    fn test_write_amps_file_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("amps.txt");
        let amps = Array2::from_shape_fn((3, 2), |(k, j)| k as f64 * 10.0 + j as f64);
        let times = vec![0.0, 1.0, 2.0];

        write_amps_file(&path, &times, &amps).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        let cols: Vec<&str> = lines[1].split('\t').collect();
        assert_eq!(cols.len(), 3);
        assert!((cols[0].parse::<f64>().unwrap() - 1.0).abs() < 1e-12);
        assert!((cols[1].parse::<f64>().unwrap() - 10.0).abs() < 1e-12);
        assert!((cols[2].parse::<f64>().unwrap() - 11.0).abs() < 1e-12);
    }

    #[test]
    fn test_write_amps_file_length_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("amps.txt");
        let amps = Array2::zeros((3, 1));
        assert!(write_amps_file(&path, &[0.0, 1.0], &amps).is_err());
    }

    #[test]
    fn test_write_result_amps_creates_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let result = dummy_result();
        let times = vec![0.0, 0.5, 1.0, 1.5];

        let (initial, final_) =
            write_result_amps(dir.path(), "demo.txt", &times, &result).unwrap();
        assert!(initial.exists());
        assert!(final_.exists());
        assert!(initial.ends_with("ctrl_amps_initial_demo.txt"));
        assert!(final_.ends_with("ctrl_amps_final_demo.txt"));
    }

    #[test]
    fn test_plot_amps_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pulse.png");
        let result = dummy_result();

        plot_amps(&path, 2.0, &result.initial_amps, &result.final_amps).unwrap();
        assert!(path.exists());
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn test_summary_file_name() {
        assert_eq!(
            summary_file_name("hadamard_n_ts10.txt"),
            "summary_hadamard_n_ts10.json"
        );
        assert_eq!(summary_file_name("demo"), "summary_demo.json");
    }

    #[test]
    fn test_write_json_summary() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");
        let result = dummy_result();

        write_json_summary(&path, &result).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed["num_iter"], 7);
        assert_eq!(parsed["termination"], "Goal achieved");
    }
}
