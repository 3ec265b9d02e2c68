// Copyright 2026 PulseCtrl Contributors
// SPDX-License-Identifier: Apache-2.0

//! Input validation for control problems and amplitude arrays.

use ndarray::Array2;

use crate::config::ResourceLimits;
use crate::dynamics::ControlProblem;
use crate::error::{Result, ValidationError};
use crate::operators::{is_hermitian, is_unitary};

const HERMITICITY_TOL: f64 = 1e-10;
const UNITARITY_TOL: f64 = 1e-10;

/// Validate a control problem against physics constraints and resource
/// limits.
pub fn validate_problem(problem: &ControlProblem, limits: &ResourceLimits) -> Result<()> {
    let d = problem.dim();

    if d == 0 {
        return Err(ValidationError::Field {
            field: "drift".into(),
            message: "must be non-empty".into(),
        }
        .into());
    }

    if d as u64 > limits.max_hilbert_dim {
        return Err(ValidationError::ResourceLimit {
            resource: "hilbert_dim".into(),
            limit: limits.max_hilbert_dim,
            requested: d as u64,
        }
        .into());
    }

    if problem.drift.ncols() != d {
        return Err(ValidationError::Dimension {
            what: "drift".into(),
            expected: d,
            actual: problem.drift.ncols(),
        }
        .into());
    }

    if problem.controls.is_empty() {
        return Err(ValidationError::Field {
            field: "controls".into(),
            message: "at least one control Hamiltonian is required".into(),
        }
        .into());
    }

    for (name, matrix) in [
        ("initial", &problem.initial),
        ("target", &problem.target),
    ] {
        if matrix.nrows() != d || matrix.ncols() != d {
            return Err(ValidationError::Dimension {
                what: name.into(),
                expected: d,
                actual: matrix.nrows().max(matrix.ncols()),
            }
            .into());
        }
        if !is_unitary(matrix, UNITARITY_TOL) {
            return Err(ValidationError::PhysicsConstraint(format!(
                "{} operator is not unitary",
                name
            ))
            .into());
        }
    }

    if !is_hermitian(&problem.drift, HERMITICITY_TOL) {
        return Err(
            ValidationError::PhysicsConstraint("drift Hamiltonian is not Hermitian".into()).into(),
        );
    }

    for (j, ctrl) in problem.controls.iter().enumerate() {
        if ctrl.nrows() != d || ctrl.ncols() != d {
            return Err(ValidationError::Dimension {
                what: format!("control {}", j),
                expected: d,
                actual: ctrl.nrows().max(ctrl.ncols()),
            }
            .into());
        }
        if !is_hermitian(ctrl, HERMITICITY_TOL) {
            return Err(ValidationError::PhysicsConstraint(format!(
                "control Hamiltonian {} is not Hermitian",
                j
            ))
            .into());
        }
    }

    if problem.num_tslots == 0 {
        return Err(ValidationError::Field {
            field: "num_tslots".into(),
            message: "must be greater than 0".into(),
        }
        .into());
    }

    if problem.num_tslots as u64 > limits.max_tslots {
        return Err(ValidationError::ResourceLimit {
            resource: "num_tslots".into(),
            limit: limits.max_tslots,
            requested: problem.num_tslots as u64,
        }
        .into());
    }

    if problem.evo_time <= 0.0 || !problem.evo_time.is_finite() {
        return Err(ValidationError::Field {
            field: "evo_time".into(),
            message: "must be positive and finite".into(),
        }
        .into());
    }

    Ok(())
}

/// Validate an amplitude array shape and contents.
pub fn validate_amps(amps: &Array2<f64>, num_tslots: usize, num_ctrls: usize) -> Result<()> {
    if amps.nrows() != num_tslots {
        return Err(ValidationError::Dimension {
            what: "amps rows".into(),
            expected: num_tslots,
            actual: amps.nrows(),
        }
        .into());
    }
    if amps.ncols() != num_ctrls {
        return Err(ValidationError::Dimension {
            what: "amps columns".into(),
            expected: num_ctrls,
            actual: amps.ncols(),
        }
        .into());
    }
    for ((k, j), val) in amps.indexed_iter() {
        if !val.is_finite() {
            return Err(ValidationError::Field {
                field: "amps".into(),
                message: format!("non-finite amplitude at slot {}, control {}", k, j),
            }
            .into());
        }
    }
    Ok(())
}
