// Copyright 2026 PulseCtrl Contributors
// SPDX-License-Identifier: Apache-2.0

//! Quasi-Newton pulse optimization.
//!
//! [`PulseOptimizer`] drives the L-BFGS solver over the piecewise-constant
//! amplitudes of a [`ControlProblem`]: validate the problem, generate the
//! initial pulse, minimize the fidelity error subject to the configured
//! error target, iteration limit, wall-time limit and gradient threshold,
//! and assemble an [`OptimResult`] with the termination reason and a
//! performance-statistics breakdown.
//!
//! # References
//!
//! - Khaneja et al. (2005), "Optimal control of coupled spin dynamics",
//!   J. Magn. Reson. 172, 296.
//! - Liu, Nocedal (1989), "On the limited memory BFGS method for large
//!   scale optimization", Math. Program. 45, 503.

pub mod problem;
pub mod result;

use std::sync::Arc;
use std::time::{Duration, Instant};

use argmin::core::{Executor, State, TerminationReason as SolverTermination};
use argmin::solver::linesearch::MoreThuenteLineSearch;
use argmin::solver::quasinewton::LBFGS;
use ndarray::Array2;
use tracing::{debug, info};

use crate::config::{OptimConfig, ResourceLimits};
use crate::dynamics::{self, ControlProblem};
use crate::error::{Error, Result};
use crate::pulsegen::PulseGenerator;
use crate::validation;

use problem::{EvalTally, FidelityComputer};
use result::{OptimResult, OptimStats, TerminationReason};

pub use result::ResultSummary;

/// Pulse optimizer for unitary gate synthesis.
pub struct PulseOptimizer {
    config: OptimConfig,
    limits: ResourceLimits,
}

impl PulseOptimizer {
    /// Create an optimizer with the given configuration and default limits.
    pub fn new(config: OptimConfig) -> Result<Self> {
        Self::with_limits(config, ResourceLimits::default())
    }

    /// Create an optimizer with explicit resource limits.
    pub fn with_limits(config: OptimConfig, limits: ResourceLimits) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, limits })
    }

    /// Optimize control amplitudes for `problem`, starting from the
    /// configured initial pulse shape.
    pub fn optimize(&self, problem: &ControlProblem) -> Result<OptimResult> {
        let generator = PulseGenerator {
            pulse_type: self.config.init_pulse.pulse_type,
            scaling: self.config.init_pulse.scaling,
            offset: self.config.init_pulse.offset,
            seed: self.config.init_pulse.seed,
        };
        let initial_amps = generator.generate(problem.num_tslots, problem.num_ctrls());
        self.optimize_from(problem, initial_amps)
    }

    /// Optimize control amplitudes starting from an explicit amplitude
    /// array.
    pub fn optimize_from(
        &self,
        problem: &ControlProblem,
        initial_amps: Array2<f64>,
    ) -> Result<OptimResult> {
        validation::validate_problem(problem, &self.limits)?;
        validation::validate_amps(&initial_amps, problem.num_tslots, problem.num_ctrls())?;
        if problem.num_tslots != self.config.num_tslots {
            debug!(
                problem_tslots = problem.num_tslots,
                config_tslots = self.config.num_tslots,
                "problem timeslot count differs from configuration; using the problem's"
            );
        }

        let init_err = dynamics::fid_err(problem, &initial_amps);
        info!(
            dim = problem.dim(),
            num_tslots = problem.num_tslots,
            num_ctrls = problem.num_ctrls(),
            evo_time = problem.evo_time,
            fid_err_targ = self.config.fid_err_targ,
            init_fid_err = init_err,
            "Starting pulse optimization"
        );

        let shared = Arc::new(problem.clone());
        let tally = Arc::new(EvalTally::default());
        let computer = FidelityComputer::new(Arc::clone(&shared), Arc::clone(&tally));

        let linesearch = MoreThuenteLineSearch::new();
        let solver = LBFGS::new(linesearch, self.config.lbfgs_memory)
            .with_tolerance_grad(self.config.min_grad)
            .map_err(|e| Error::Optimization(e.to_string()))?;

        let x0: Vec<f64> = initial_amps.iter().copied().collect();
        let target = self.config.fid_err_targ;
        let max_iter = self.config.max_iter;

        let start = Instant::now();
        let res = Executor::new(computer, solver)
            .configure(|state| state.param(x0.clone()).max_iters(max_iter).target_cost(target))
            .timeout(Duration::from_secs_f64(self.config.max_wall_time_s))
            .run()
            .map_err(|e| Error::Optimization(e.to_string()))?;
        let wall_time = start.elapsed();

        let final_flat = res.state.get_best_param().cloned().unwrap_or(x0);
        let final_amps =
            Array2::from_shape_vec((problem.num_tslots, problem.num_ctrls()), final_flat)
                .map_err(|e| Error::Optimization(e.to_string()))?;

        let evo_final = dynamics::total_evolution(problem, &final_amps);
        let fid_err = dynamics::fid_err_of_evolution(problem, &evo_final);
        let (_, grad) = dynamics::fid_err_and_grad(problem, &final_amps);
        let grad_norm_final = grad.iter().map(|g| g * g).sum::<f64>().sqrt();

        let termination = map_termination(
            res.state.get_termination_reason(),
            grad_norm_final,
            self.config.min_grad,
        );

        let stats = OptimStats {
            wall_time,
            num_iter: res.state.get_iter(),
            num_fid_evals: tally.fid_evals(),
            num_grad_evals: tally.grad_evals(),
            wall_time_fid: tally.fid_time(),
            wall_time_grad: tally.grad_time(),
        };

        info!(
            fid_err,
            grad_norm_final,
            num_iter = stats.num_iter,
            wall_time_s = stats.wall_time.as_secs_f64(),
            termination = %termination,
            "Pulse optimization finished"
        );

        Ok(OptimResult {
            initial_amps,
            final_amps,
            fid_err,
            grad_norm_final,
            termination,
            num_iter: stats.num_iter,
            evo_final,
            stats,
        })
    }
}

/// Translate the solver's stop status into a [`TerminationReason`].
///
/// `SolverConverged` covers both the gradient-tolerance and the
/// cost-stagnation criteria of L-BFGS; the gradient threshold is only
/// claimed when the final gradient norm actually satisfies it.
fn map_termination(
    reason: Option<&SolverTermination>,
    grad_norm: f64,
    min_grad: f64,
) -> TerminationReason {
    match reason {
        Some(SolverTermination::TargetCostReached) => TerminationReason::GoalAchieved,
        Some(SolverTermination::MaxItersReached) => TerminationReason::IterLimitReached,
        Some(SolverTermination::Timeout) => TerminationReason::WallTimeReached,
        Some(SolverTermination::SolverConverged) => {
            if grad_norm <= min_grad {
                TerminationReason::GradMinReached
            } else {
                TerminationReason::SolverDone("cost change below tolerance".into())
            }
        }
        Some(other) => TerminationReason::SolverDone(other.to_string()),
        None => TerminationReason::SolverDone("not terminated".into()),
    }
}
