// Copyright 2026 PulseCtrl Contributors
// SPDX-License-Identifier: Apache-2.0

//! Piecewise-constant-Hamiltonian dynamics.
//!
//! The control problem evolves a known initial unitary toward a target
//! unitary under `H(t) = H_d + Σ_j u_j(t) H_cj`, with the amplitudes
//! `u_j(t)` constant over each timeslot. The pieces are pure functions:
//!
//! - [`expm::matrix_exp`]: matrix exponential (scaling-and-squaring, Padé 13)
//! - [`expm::matrix_exp_frechet`]: exponential plus its exact directional
//!   derivative, via the augmented block matrix
//! - [`evolution::timeslot_propagators`]: per-slot unitaries from amplitudes
//! - [`evolution::fid_err`]: phase-insensitive fidelity error
//! - [`evolution::fid_err_and_grad`]: fidelity error and its exact gradient
//!   w.r.t. every slot/control amplitude
//!
//! # References
//!
//! - Khaneja et al. (2005), "Optimal control of coupled spin dynamics",
//!   J. Magn. Reson. 172, 296. doi:10.1016/j.jmr.2004.11.004
//! - Higham (2005), "The Scaling and Squaring Method for the Matrix
//!   Exponential Revisited", SIAM J. Matrix Anal. Appl. 26(4), 1179.
//! - Al-Mohy, Higham (2009), "Computing the Fréchet derivative of the
//!   matrix exponential", SIAM J. Matrix Anal. Appl. 30(4), 1639.

pub mod evolution;
pub mod expm;

pub use evolution::{
    fid_err, fid_err_and_grad, fid_err_of_evolution, timeslot_propagators, total_evolution,
    ControlProblem,
};
pub use expm::{matrix_exp, matrix_exp_frechet};
