// Copyright 2026 PulseCtrl Contributors
// SPDX-License-Identifier: Apache-2.0

//! Optimization result and statistics types.

use std::fmt;
use std::time::Duration;

use ndarray::Array2;
use num_complex::Complex64;
use serde::Serialize;

/// Why the optimization stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminationReason {
    /// Fidelity error target reached
    GoalAchieved,
    /// Iteration limit reached
    IterLimitReached,
    /// Wall time limit exceeded
    WallTimeReached,
    /// Gradient norm fell below the minimum threshold
    GradMinReached,
    /// Solver stopped for its own reason
    SolverDone(String),
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerminationReason::GoalAchieved => write!(f, "Goal achieved"),
            TerminationReason::IterLimitReached => {
                write!(f, "Iteration or fidelity function call limit reached")
            }
            TerminationReason::WallTimeReached => write!(f, "Wall time exceeded"),
            TerminationReason::GradMinReached => {
                write!(f, "Minimum gradient norm reached")
            }
            TerminationReason::SolverDone(msg) => write!(f, "Solver terminated: {}", msg),
        }
    }
}

/// Performance statistics for one optimization run.
#[derive(Debug, Clone)]
pub struct OptimStats {
    /// Total optimization wall time.
    pub wall_time: Duration,
    /// Optimizer iterations executed.
    pub num_iter: u64,
    /// Fidelity error evaluations.
    pub num_fid_evals: u64,
    /// Gradient evaluations.
    pub num_grad_evals: u64,
    /// Wall time spent in fidelity evaluations.
    pub wall_time_fid: Duration,
    /// Wall time spent in gradient evaluations.
    pub wall_time_grad: Duration,
}

impl OptimStats {
    /// Formatted performance report.
    pub fn report(&self) -> String {
        let total = self.wall_time.as_secs_f64();
        let fid = self.wall_time_fid.as_secs_f64();
        let grad = self.wall_time_grad.as_secs_f64();
        let overhead = (total - fid - grad).max(0.0);
        format!(
            "------------------------------------\n\
             ---- Optimisation stats summary ----\n\
             Number of iterations: {}\n\
             Wall time: {:.6}s\n\
             Fidelity function calls: {} ({:.6}s)\n\
             Gradient function calls: {} ({:.6}s)\n\
             Solver overhead: {:.6}s\n\
             ------------------------------------",
            self.num_iter, total, self.num_fid_evals, fid, self.num_grad_evals, grad, overhead
        )
    }
}

impl fmt::Display for OptimStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.report())
    }
}

/// Result of a pulse optimization run.
#[derive(Debug, Clone)]
pub struct OptimResult {
    /// Amplitudes the search started from (num_tslots × num_ctrls).
    pub initial_amps: Array2<f64>,
    /// Optimized amplitudes (num_tslots × num_ctrls).
    pub final_amps: Array2<f64>,
    /// Achieved fidelity error.
    pub fid_err: f64,
    /// Gradient norm at the final amplitudes.
    pub grad_norm_final: f64,
    /// Why the optimization stopped.
    pub termination: TerminationReason,
    /// Optimizer iterations executed.
    pub num_iter: u64,
    /// Full evolution at the final amplitudes.
    pub evo_final: Array2<Complex64>,
    /// Performance statistics.
    pub stats: OptimStats,
}

impl OptimResult {
    /// Whether the fidelity error target was reached.
    pub fn goal_achieved(&self) -> bool {
        self.termination == TerminationReason::GoalAchieved
    }

    /// Scalar summary plus amplitude tables, for JSON output.
    pub fn summary(&self) -> ResultSummary {
        ResultSummary {
            fid_err: self.fid_err,
            grad_norm_final: self.grad_norm_final,
            termination: self.termination.to_string(),
            num_iter: self.num_iter,
            num_fid_evals: self.stats.num_fid_evals,
            num_grad_evals: self.stats.num_grad_evals,
            wall_time_s: self.stats.wall_time.as_secs_f64(),
            initial_amps: rows(&self.initial_amps),
            final_amps: rows(&self.final_amps),
        }
    }
}

fn rows(amps: &Array2<f64>) -> Vec<Vec<f64>> {
    amps.rows().into_iter().map(|r| r.to_vec()).collect()
}

/// Serializable view of an [`OptimResult`].
#[derive(Debug, Clone, Serialize)]
pub struct ResultSummary {
    pub fid_err: f64,
    pub grad_norm_final: f64,
    pub termination: String,
    pub num_iter: u64,
    pub num_fid_evals: u64,
    pub num_grad_evals: u64,
    pub wall_time_s: f64,
    pub initial_amps: Vec<Vec<f64>>,
    pub final_amps: Vec<Vec<f64>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operators::identity;

    fn dummy_result(termination: TerminationReason) -> OptimResult {
        OptimResult {
            initial_amps: Array2::zeros((3, 1)),
            final_amps: Array2::from_elem((3, 1), 0.5),
            fid_err: 1e-11,
            grad_norm_final: 2e-7,
            termination,
            num_iter: 12,
            evo_final: identity(2),
            stats: OptimStats {
                wall_time: Duration::from_millis(120),
                num_iter: 12,
                num_fid_evals: 25,
                num_grad_evals: 13,
                wall_time_fid: Duration::from_millis(40),
                wall_time_grad: Duration::from_millis(60),
            },
        }
    }

    #[test]
    fn test_termination_display() {
        assert_eq!(TerminationReason::GoalAchieved.to_string(), "Goal achieved");
        assert_eq!(
            TerminationReason::IterLimitReached.to_string(),
            "Iteration or fidelity function call limit reached"
        );
        assert_eq!(
            TerminationReason::WallTimeReached.to_string(),
            "Wall time exceeded"
        );
        assert_eq!(
            TerminationReason::GradMinReached.to_string(),
            "Minimum gradient norm reached"
        );
    }

    #[test]
    fn test_goal_achieved() {
        assert!(dummy_result(TerminationReason::GoalAchieved).goal_achieved());
        assert!(!dummy_result(TerminationReason::IterLimitReached).goal_achieved());
    }

    #[test]
    fn test_stats_report_contains_counts() {
        let result = dummy_result(TerminationReason::GoalAchieved);
        let report = result.stats.report();
        assert!(report.contains("Number of iterations: 12"));
        assert!(report.contains("Fidelity function calls: 25"));
        assert!(report.contains("Gradient function calls: 13"));
    }

    #[test]
    fn test_summary_serializes() {
        let result = dummy_result(TerminationReason::GoalAchieved);
        let json = serde_json::to_string(&result.summary()).unwrap();
        assert!(json.contains("\"termination\":\"Goal achieved\""));
        assert!(json.contains("\"num_iter\":12"));
    }

    #[test]
    fn test_summary_amps_shape() {
        let result = dummy_result(TerminationReason::GoalAchieved);
        let summary = result.summary();
        assert_eq!(summary.final_amps.len(), 3);
        assert_eq!(summary.final_amps[0].len(), 1);
    }
}
