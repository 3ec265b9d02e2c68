// Copyright 2026 PulseCtrl Contributors
// SPDX-License-Identifier: Apache-2.0

//! Control problem definition, propagation, fidelity error and gradient.
//!
//! Ref: Khaneja et al. (2005), J. Magn. Reson. 172, 296.

use ndarray::Array2;
use num_complex::Complex64;

use super::expm::{matrix_exp, matrix_exp_frechet};
use crate::operators::{dagger, trace_of_product};

/// A unitary-synthesis control problem.
///
/// Evolution is generated by `H(t) = drift + Σ_j u_j(t)·controls[j]` with
/// piecewise-constant amplitudes over `num_tslots` equal slots of total
/// duration `evo_time`.
#[derive(Debug, Clone)]
pub struct ControlProblem {
    /// Drift (free) Hamiltonian.
    pub drift: Array2<Complex64>,
    /// Control Hamiltonians.
    pub controls: Vec<Array2<Complex64>>,
    /// Initial unitary (identity in the demonstration).
    pub initial: Array2<Complex64>,
    /// Target unitary.
    pub target: Array2<Complex64>,
    /// Number of timeslots.
    pub num_tslots: usize,
    /// Total evolution time.
    pub evo_time: f64,
}

impl ControlProblem {
    /// Problem starting from the identity, the usual gate-synthesis setup.
    pub fn unitary_synthesis(
        drift: Array2<Complex64>,
        controls: Vec<Array2<Complex64>>,
        target: Array2<Complex64>,
        num_tslots: usize,
        evo_time: f64,
    ) -> Self {
        let d = drift.nrows();
        Self {
            drift,
            controls,
            initial: Array2::from_diag_elem(d, Complex64::new(1.0, 0.0)),
            target,
            num_tslots,
            evo_time,
        }
    }

    /// Hilbert space dimension.
    pub fn dim(&self) -> usize {
        self.drift.nrows()
    }

    /// Number of control Hamiltonians.
    pub fn num_ctrls(&self) -> usize {
        self.controls.len()
    }

    /// Timeslot duration.
    pub fn dt(&self) -> f64 {
        self.evo_time / self.num_tslots as f64
    }

    /// Start time of each slot.
    pub fn slot_times(&self) -> Vec<f64> {
        let dt = self.dt();
        (0..self.num_tslots).map(|k| k as f64 * dt).collect()
    }
}

/// Hamiltonian for slot `k`: `H_k = H_d + Σ_j u[k,j]·H_cj`.
fn slot_hamiltonian(problem: &ControlProblem, amps: &Array2<f64>, k: usize) -> Array2<Complex64> {
    let mut h = problem.drift.clone();
    for (j, ctrl) in problem.controls.iter().enumerate() {
        h = h + ctrl * Complex64::new(amps[[k, j]], 0.0);
    }
    h
}

/// Per-slot propagators `U_k = exp(−i·H_k·dt)`.
pub fn timeslot_propagators(
    problem: &ControlProblem,
    amps: &Array2<f64>,
) -> Vec<Array2<Complex64>> {
    let dt = problem.dt();
    let scale = Complex64::new(0.0, -dt);
    (0..problem.num_tslots)
        .map(|k| matrix_exp(&(slot_hamiltonian(problem, amps, k) * scale)))
        .collect()
}

/// Full evolution `U_{n−1}·…·U_0·U_init`.
pub fn total_evolution(problem: &ControlProblem, amps: &Array2<f64>) -> Array2<Complex64> {
    let mut evo = problem.initial.clone();
    for u in timeslot_propagators(problem, amps) {
        evo = u.dot(&evo);
    }
    evo
}

/// Phase-insensitive (PSU) fidelity error:
/// `f = 1 − |Tr(target†·evolution)| / d`.
///
/// Zero when the evolution matches the target up to a global phase; the
/// value is clamped into `[0, 1]` against roundoff.
pub fn fid_err(problem: &ControlProblem, amps: &Array2<f64>) -> f64 {
    let evo = total_evolution(problem, amps);
    fid_err_of_evolution(problem, &evo)
}

/// Fidelity error of a precomputed evolution.
pub fn fid_err_of_evolution(problem: &ControlProblem, evo: &Array2<Complex64>) -> f64 {
    let d = problem.dim() as f64;
    let overlap = trace_of_product(&dagger(&problem.target), evo);
    (1.0 - overlap.norm() / d).clamp(0.0, 1.0)
}

/// Fidelity error and its gradient w.r.t. every amplitude.
///
/// Gradient entries are
/// `∂f/∂u[k,j] = −Re( (χ*/|χ|) · Tr(target† · B[k+1] · dU_kj · F[k]) ) / d`
/// where `χ = Tr(target†·F[n])`, `F` is the forward evolution including the
/// initial unitary, `B` the onward propagator product, and `dU_kj` the exact
/// Fréchet derivative of the slot propagator in the direction of control
/// `j`. One forward and one backward pass per evaluation.
pub fn fid_err_and_grad(problem: &ControlProblem, amps: &Array2<f64>) -> (f64, Array2<f64>) {
    let n = problem.num_tslots;
    let n_ctrls = problem.num_ctrls();
    let d = problem.dim() as f64;
    let dt = problem.dt();
    let scale = Complex64::new(0.0, -dt);

    // Per-slot propagators and their derivatives w.r.t. each control.
    let mut props = Vec::with_capacity(n);
    let mut derivs: Vec<Vec<Array2<Complex64>>> = Vec::with_capacity(n);
    for k in 0..n {
        let arg = slot_hamiltonian(problem, amps, k) * scale;
        let mut slot_derivs = Vec::with_capacity(n_ctrls);
        let mut prop = None;
        for ctrl in &problem.controls {
            let direction = ctrl * scale;
            let (u, du) = matrix_exp_frechet(&arg, &direction);
            if prop.is_none() {
                prop = Some(u);
            }
            slot_derivs.push(du);
        }
        // At least one control is guaranteed by validation.
        props.push(prop.unwrap_or_else(|| matrix_exp(&arg)));
        derivs.push(slot_derivs);
    }

    // Forward: F[0] = U_init, F[k+1] = U_k·F[k].
    let mut forward = Vec::with_capacity(n + 1);
    forward.push(problem.initial.clone());
    for u in &props {
        let prev = &forward[forward.len() - 1];
        forward.push(u.dot(prev));
    }

    // Onward: B[n] = I, B[k] = B[k+1]·U_k.
    let eye = Array2::from_diag_elem(problem.dim(), Complex64::new(1.0, 0.0));
    let mut onward = vec![eye; n + 1];
    for k in (0..n).rev() {
        onward[k] = onward[k + 1].dot(&props[k]);
    }

    let target_dag = dagger(&problem.target);
    let chi = trace_of_product(&target_dag, &forward[n]);
    let err = (1.0 - chi.norm() / d).clamp(0.0, 1.0);

    // d|χ| is undefined at χ = 0; treat the phase factor as 1 there.
    let phase_conj = if chi.norm() > 1e-12 {
        chi.conj() / chi.norm()
    } else {
        Complex64::new(1.0, 0.0)
    };

    let mut grad = Array2::zeros((n, n_ctrls));
    for k in 0..n {
        // Tr(W†·B[k+1]·dU·F[k]) = Tr((F[k]·W†·B[k+1])·dU)
        let m = forward[k].dot(&target_dag).dot(&onward[k + 1]);
        for j in 0..n_ctrls {
            let dchi = trace_of_product(&m, &derivs[k][j]);
            grad[[k, j]] = -(phase_conj * dchi).re / d;
        }
    }

    (err, grad)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operators::{frobenius_norm, hadamard, identity, is_unitary, sigma_x, sigma_z};

    fn hadamard_problem(num_tslots: usize, evo_time: f64) -> ControlProblem {
        ControlProblem::unitary_synthesis(
            sigma_z(),
            vec![sigma_x()],
            hadamard(),
            num_tslots,
            evo_time,
        )
    }

    #[test]
    fn test_fid_err_zero_for_identity_target() {
        let problem = ControlProblem::unitary_synthesis(
            Array2::zeros((2, 2)),
            vec![sigma_x()],
            identity(2),
            5,
            1.0,
        );
        let amps = Array2::zeros((5, 1));
        assert!(fid_err(&problem, &amps) < 1e-12);
    }

    #[test]
    fn test_fid_err_ignores_global_phase() {
        let problem = hadamard_problem(4, 2.0);
        let amps = Array2::from_shape_fn((4, 1), |(k, _)| 0.3 * (k as f64 + 1.0));

        let mut phased = problem.clone();
        phased.target = &problem.target * Complex64::from_polar(1.0, 1.234);

        let f1 = fid_err(&problem, &amps);
        let f2 = fid_err(&phased, &amps);
        assert!((f1 - f2).abs() < 1e-12);
    }

    #[test]
    fn test_fid_err_traceless_overlap_is_one() {
        // Achieved identity vs traceless target: χ = Tr(σx) = 0.
        let problem = ControlProblem::unitary_synthesis(
            Array2::zeros((2, 2)),
            vec![sigma_x()],
            sigma_x(),
            3,
            1.0,
        );
        let amps = Array2::zeros((3, 1));
        assert!((fid_err(&problem, &amps) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_propagators_unitary() {
        let problem = hadamard_problem(6, 3.0);
        let amps = Array2::from_shape_fn((6, 1), |(k, _)| (k as f64 * 0.7).sin());
        for u in timeslot_propagators(&problem, &amps) {
            assert!(is_unitary(&u, 1e-10));
        }
    }

    #[test]
    fn test_total_evolution_matches_chain() {
        let problem = hadamard_problem(5, 2.5);
        let amps = Array2::from_shape_fn((5, 1), |(k, _)| 0.1 * k as f64 - 0.2);

        let props = timeslot_propagators(&problem, &amps);
        let mut chained = problem.initial.clone();
        for u in &props {
            chained = u.dot(&chained);
        }
        let evo = total_evolution(&problem, &amps);
        let diff = evo - chained;
        assert!(frobenius_norm(&diff) < 1e-12);
    }

    #[test]
    fn test_single_timeslot() {
        let problem = hadamard_problem(1, 1.0);
        let amps = Array2::from_elem((1, 1), 0.5);
        let (err, grad) = fid_err_and_grad(&problem, &amps);
        assert!((0.0..=1.0).contains(&err));
        assert_eq!(grad.dim(), (1, 1));
        assert!(grad[[0, 0]].is_finite());
    }

    #[test]
    fn test_grad_matches_cost() {
        let problem = hadamard_problem(4, 2.0);
        let amps = Array2::from_shape_fn((4, 1), |(k, _)| 0.25 * (k as f64 - 1.5));
        let (err, _) = fid_err_and_grad(&problem, &amps);
        assert!((err - fid_err(&problem, &amps)).abs() < 1e-13);
    }

    #[test]
    fn test_grad_matches_finite_difference() {
        let problem = ControlProblem::unitary_synthesis(
            sigma_z(),
            vec![sigma_x(), sigma_z()],
            hadamard(),
            4,
            2.0,
        );
        let amps = Array2::from_shape_fn((4, 2), |(k, j)| {
            0.3 * ((k + 1) as f64 * 0.9 + j as f64).sin()
        });

        let (_, grad) = fid_err_and_grad(&problem, &amps);

        let eps = 1e-6;
        for k in 0..4 {
            for j in 0..2 {
                let mut plus = amps.clone();
                plus[[k, j]] += eps;
                let mut minus = amps.clone();
                minus[[k, j]] -= eps;
                let fd = (fid_err(&problem, &plus) - fid_err(&problem, &minus)) / (2.0 * eps);
                assert!(
                    (grad[[k, j]] - fd).abs() < 1e-6,
                    "grad[{}, {}] = {} vs finite difference {}",
                    k,
                    j,
                    grad[[k, j]],
                    fd
                );
            }
        }
    }

    #[test]
    fn test_grad_zero_amps_finite() {
        let problem = hadamard_problem(5, 2.0);
        let amps = Array2::zeros((5, 1));
        let (_, grad) = fid_err_and_grad(&problem, &amps);
        assert!(grad.iter().all(|g| g.is_finite()));
    }
}
