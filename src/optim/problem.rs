// Copyright 2026 PulseCtrl Contributors
// SPDX-License-Identifier: Apache-2.0

//! argmin adapter for the fidelity-error objective.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use argmin::core::{CostFunction, Gradient};
use ndarray::Array2;

use crate::dynamics::{self, ControlProblem};

/// Evaluation counters and accumulated wall time, shared between the solver
/// and the surrounding optimizer. `&self` interior mutation because argmin
/// evaluates through shared references.
#[derive(Debug, Default)]
pub struct EvalTally {
    fid_evals: AtomicU64,
    grad_evals: AtomicU64,
    fid_nanos: AtomicU64,
    grad_nanos: AtomicU64,
}

impl EvalTally {
    fn record_fid(&self, elapsed: Duration) {
        self.fid_evals.fetch_add(1, Ordering::Relaxed);
        self.fid_nanos
            .fetch_add(elapsed.as_nanos() as u64, Ordering::Relaxed);
    }

    fn record_grad(&self, elapsed: Duration) {
        self.grad_evals.fetch_add(1, Ordering::Relaxed);
        self.grad_nanos
            .fetch_add(elapsed.as_nanos() as u64, Ordering::Relaxed);
    }

    pub fn fid_evals(&self) -> u64 {
        self.fid_evals.load(Ordering::Relaxed)
    }

    pub fn grad_evals(&self) -> u64 {
        self.grad_evals.load(Ordering::Relaxed)
    }

    pub fn fid_time(&self) -> Duration {
        Duration::from_nanos(self.fid_nanos.load(Ordering::Relaxed))
    }

    pub fn grad_time(&self) -> Duration {
        Duration::from_nanos(self.grad_nanos.load(Ordering::Relaxed))
    }
}

/// Fidelity-error objective over flattened (row-major, slot-major)
/// amplitudes.
pub struct FidelityComputer {
    problem: Arc<ControlProblem>,
    tally: Arc<EvalTally>,
}

impl FidelityComputer {
    pub fn new(problem: Arc<ControlProblem>, tally: Arc<EvalTally>) -> Self {
        Self { problem, tally }
    }

    /// Reshape a flat parameter vector into (num_tslots × num_ctrls).
    pub fn unflatten(&self, param: &[f64]) -> Result<Array2<f64>, argmin::core::Error> {
        Array2::from_shape_vec(
            (self.problem.num_tslots, self.problem.num_ctrls()),
            param.to_vec(),
        )
        .map_err(|e| argmin::core::Error::msg(e.to_string()))
    }
}

impl CostFunction for FidelityComputer {
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, param: &Self::Param) -> Result<Self::Output, argmin::core::Error> {
        let start = Instant::now();
        let amps = self.unflatten(param)?;
        let err = dynamics::fid_err(&self.problem, &amps);
        self.tally.record_fid(start.elapsed());
        Ok(err)
    }
}

impl Gradient for FidelityComputer {
    type Param = Vec<f64>;
    type Gradient = Vec<f64>;

    fn gradient(&self, param: &Self::Param) -> Result<Self::Gradient, argmin::core::Error> {
        let start = Instant::now();
        let amps = self.unflatten(param)?;
        let (_, grad) = dynamics::fid_err_and_grad(&self.problem, &amps);
        self.tally.record_grad(start.elapsed());
        Ok(grad.iter().copied().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operators::{hadamard, sigma_x, sigma_z};

    fn computer() -> (FidelityComputer, Arc<EvalTally>) {
        let problem = Arc::new(ControlProblem::unitary_synthesis(
            sigma_z(),
            vec![sigma_x()],
            hadamard(),
            4,
            2.0,
        ));
        let tally = Arc::new(EvalTally::default());
        (FidelityComputer::new(problem, Arc::clone(&tally)), tally)
    }

    #[test]
    fn test_cost_counts_evaluations() {
        let (computer, tally) = computer();
        let param = vec![0.1; 4];
        computer.cost(&param).unwrap();
        computer.cost(&param).unwrap();
        assert_eq!(tally.fid_evals(), 2);
        assert_eq!(tally.grad_evals(), 0);
    }

    #[test]
    fn test_gradient_counts_evaluations() {
        let (computer, tally) = computer();
        let param = vec![0.1; 4];
        computer.gradient(&param).unwrap();
        assert_eq!(tally.grad_evals(), 1);
    }

    #[test]
    fn test_gradient_length() {
        let (computer, _) = computer();
        let grad = computer.gradient(&vec![0.2; 4]).unwrap();
        assert_eq!(grad.len(), 4);
        assert!(grad.iter().all(|g| g.is_finite()));
    }

    #[test]
    fn test_bad_param_length_rejected() {
        let (computer, _) = computer();
        assert!(computer.cost(&vec![0.1; 3]).is_err());
    }

    #[test]
    fn test_cost_in_unit_interval() {
        let (computer, _) = computer();
        let err = computer.cost(&vec![0.3; 4]).unwrap();
        assert!((0.0..=1.0).contains(&err));
    }
}
