// Copyright 2026 PulseCtrl Contributors
// SPDX-License-Identifier: Apache-2.0

//! Standard operators and dense complex matrix helpers.
//!
//! All matrices are `ndarray::Array2<Complex64>`. The demonstration problem
//! is 2×2; the helpers are dimension-generic.

use ndarray::Array2;
use num_complex::Complex64;
use std::f64::consts::FRAC_1_SQRT_2;

/// d × d identity.
pub fn identity(d: usize) -> Array2<Complex64> {
    Array2::from_diag_elem(d, Complex64::new(1.0, 0.0))
}

/// Pauli X.
pub fn sigma_x() -> Array2<Complex64> {
    let mut m = Array2::zeros((2, 2));
    m[[0, 1]] = Complex64::new(1.0, 0.0);
    m[[1, 0]] = Complex64::new(1.0, 0.0);
    m
}

/// Pauli Y.
pub fn sigma_y() -> Array2<Complex64> {
    let mut m = Array2::zeros((2, 2));
    m[[0, 1]] = Complex64::new(0.0, -1.0);
    m[[1, 0]] = Complex64::new(0.0, 1.0);
    m
}

/// Pauli Z.
pub fn sigma_z() -> Array2<Complex64> {
    let mut m = Array2::zeros((2, 2));
    m[[0, 0]] = Complex64::new(1.0, 0.0);
    m[[1, 1]] = Complex64::new(-1.0, 0.0);
    m
}

/// Lowering operator σ⁻ = |0⟩⟨1|.
pub fn sigma_minus() -> Array2<Complex64> {
    let mut m = Array2::zeros((2, 2));
    m[[0, 1]] = Complex64::new(1.0, 0.0);
    m
}

/// Hadamard gate: (1/√2)[[1, 1], [1, −1]].
pub fn hadamard() -> Array2<Complex64> {
    let h = Complex64::new(FRAC_1_SQRT_2, 0.0);
    let mut m = Array2::zeros((2, 2));
    m[[0, 0]] = h;
    m[[0, 1]] = h;
    m[[1, 0]] = h;
    m[[1, 1]] = -h;
    m
}

/// Conjugate transpose.
pub fn dagger(a: &Array2<Complex64>) -> Array2<Complex64> {
    a.t().mapv(|x| x.conj())
}

/// Matrix trace.
pub fn trace(a: &Array2<Complex64>) -> Complex64 {
    (0..a.nrows().min(a.ncols())).map(|i| a[[i, i]]).sum()
}

/// Tr(A·B) without forming the product.
pub fn trace_of_product(a: &Array2<Complex64>, b: &Array2<Complex64>) -> Complex64 {
    let n = a.nrows();
    let mut t = Complex64::new(0.0, 0.0);
    for i in 0..n {
        for k in 0..a.ncols() {
            t += a[[i, k]] * b[[k, i]];
        }
    }
    t
}

/// Frobenius norm.
pub fn frobenius_norm(a: &Array2<Complex64>) -> f64 {
    a.iter().map(|x| x.norm_sqr()).sum::<f64>().sqrt()
}

/// Check hermiticity within `tol` (elementwise).
pub fn is_hermitian(a: &Array2<Complex64>, tol: f64) -> bool {
    if a.nrows() != a.ncols() {
        return false;
    }
    for ((i, j), val) in a.indexed_iter() {
        if (val - a[[j, i]].conj()).norm() > tol {
            return false;
        }
    }
    true
}

/// Check unitarity within `tol`: ||A†A − I||_F < tol.
pub fn is_unitary(a: &Array2<Complex64>, tol: f64) -> bool {
    if a.nrows() != a.ncols() {
        return false;
    }
    let product = dagger(a).dot(a);
    let diff = product - identity(a.nrows());
    frobenius_norm(&diff) < tol
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pauli_matrices_hermitian_and_unitary() {
        for m in [sigma_x(), sigma_y(), sigma_z()] {
            assert!(is_hermitian(&m, 1e-14));
            assert!(is_unitary(&m, 1e-14));
        }
    }

    #[test]
    fn test_hadamard_unitary_and_self_inverse() {
        let h = hadamard();
        assert!(is_unitary(&h, 1e-14));
        let h2 = h.dot(&h);
        let diff = h2 - identity(2);
        assert!(frobenius_norm(&diff) < 1e-14);
    }

    #[test]
    fn test_hadamard_maps_z_to_x() {
        // H σz H† = σx
        let h = hadamard();
        let conj = h.dot(&sigma_z()).dot(&dagger(&h));
        let diff = conj - sigma_x();
        assert!(frobenius_norm(&diff) < 1e-14);
    }

    #[test]
    fn test_trace() {
        let t = trace(&sigma_z());
        assert!((t - Complex64::new(0.0, 0.0)).norm() < 1e-15);
        let t = trace(&identity(4));
        assert!((t - Complex64::new(4.0, 0.0)).norm() < 1e-15);
    }

    #[test]
    fn test_trace_of_product_matches_full_product() {
        let a = sigma_x();
        let b = sigma_y();
        let full = trace(&a.dot(&b));
        let fast = trace_of_product(&a, &b);
        assert!((full - fast).norm() < 1e-15);
    }

    #[test]
    fn test_sigma_minus_not_hermitian() {
        assert!(!is_hermitian(&sigma_minus(), 1e-14));
    }

    #[test]
    fn test_dagger_involution() {
        let y = sigma_y();
        let diff = dagger(&dagger(&y)) - y;
        assert!(frobenius_norm(&diff) < 1e-15);
    }

    #[test]
    fn test_non_square_rejected() {
        let a = Array2::<Complex64>::zeros((2, 3));
        assert!(!is_hermitian(&a, 1e-12));
        assert!(!is_unitary(&a, 1e-12));
    }
}
