// Copyright 2026 PulseCtrl Contributors
// SPDX-License-Identifier: Apache-2.0

//! PulseCtrl: gradient-ascent pulse engineering for unitary gate synthesis.
//!
//! Optimizes piecewise-constant control amplitudes so that the evolution
//! under a drift Hamiltonian plus driven control Hamiltonians realizes a
//! target unitary. The fidelity error and its exact gradient are fed to an
//! L-BFGS solver, which stops on the configured error target, iteration
//! limit, wall-time limit or gradient threshold.
//!
//! # Modules
//!
//! - [`config`]: configuration loading and validation
//! - [`dynamics`]: propagators, fidelity error and its gradient
//! - [`error`]: crate error types
//! - [`operators`]: standard operators and matrix predicates
//! - [`optim`]: the L-BFGS pulse optimizer
//! - [`output`]: amplitude files, plots and JSON summaries
//! - [`pulsegen`]: initial pulse shape generation
//! - [`validation`]: problem and amplitude validation

pub mod config;
pub mod dynamics;
pub mod error;
pub mod operators;
pub mod optim;
pub mod output;
pub mod pulsegen;
pub mod validation;

pub use config::{Config, OptimConfig};
pub use dynamics::ControlProblem;
pub use error::{Error, Result};
pub use optim::result::{OptimResult, OptimStats, TerminationReason};
pub use optim::PulseOptimizer;
pub use pulsegen::{PulseGenerator, PulseType};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
