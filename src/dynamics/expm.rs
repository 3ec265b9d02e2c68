// Copyright 2026 PulseCtrl Contributors
// SPDX-License-Identifier: Apache-2.0

//! Matrix exponential via scaling-and-squaring with Padé(13) approximation.
//!
//! Implements the algorithm from Higham (2005). The propagator evaluation
//! dominates the optimization cost, and the matrices are small dense complex
//! matrices (2×2 in the demonstration, 4×4 for the augmented Fréchet form),
//! so the implementation is tuned for that regime.

use ndarray::{s, Array2};
use num_complex::Complex64;

/// Padé(13,13) coefficients, Higham (2005) eq. (10.33).
const PADE13: [f64; 14] = [
    1.0,
    0.5,
    0.12,
    1.833_333_333_333_333_4e-2,
    1.992_753_623_188_405_8e-3,
    1.630_434_782_608_696e-4,
    1.035_196_687_401_6e-5,
    5.175_983_437_008_01e-7,
    2.043_151_356_652_5e-8,
    6.306_022_705_717_593e-10,
    1.483_770_048_404_14e-11,
    2.529_153_491_597_966e-13,
    2.810_170_546_219_962_4e-15,
    1.544_049_750_670_309e-17,
];

/// Scaling threshold theta_13 from Higham Table 10.2.
const THETA_13: f64 = 5.37;

/// Compute exp(A) for a square complex matrix.
///
/// # Panics
/// Panics if `a` is not square.
pub fn matrix_exp(a: &Array2<Complex64>) -> Array2<Complex64> {
    let n = a.nrows();
    assert_eq!(n, a.ncols(), "matrix_exp requires a square matrix");

    if n == 0 {
        return Array2::zeros((0, 0));
    }
    if n == 1 {
        let mut out = Array2::zeros((1, 1));
        out[[0, 0]] = a[[0, 0]].exp();
        return out;
    }

    let s = scaling_power(one_norm(a));
    let a_scaled = a * Complex64::new((0.5f64).powi(s as i32), 0.0);

    let mut result = pade13(&a_scaled);
    for _ in 0..s {
        result = result.dot(&result);
    }
    result
}

/// Compute exp(A) together with its Fréchet derivative L(A, E) in
/// direction E, using the augmented block matrix
///
/// ```text
/// exp([[A, E], [0, A]]) = [[exp(A), L(A, E)], [0, exp(A)]]
/// ```
///
/// Returns `(exp(A), L(A, E))`. This is the exact directional derivative of
/// the propagator, used for the amplitude gradient.
pub fn matrix_exp_frechet(
    a: &Array2<Complex64>,
    e: &Array2<Complex64>,
) -> (Array2<Complex64>, Array2<Complex64>) {
    let n = a.nrows();
    assert_eq!(n, a.ncols(), "matrix_exp_frechet requires a square matrix");
    assert_eq!(a.shape(), e.shape(), "direction must match matrix shape");

    let mut aug = Array2::zeros((2 * n, 2 * n));
    aug.slice_mut(s![..n, ..n]).assign(a);
    aug.slice_mut(s![..n, n..]).assign(e);
    aug.slice_mut(s![n.., n..]).assign(a);

    let big = matrix_exp(&aug);
    let exp_a = big.slice(s![..n, ..n]).to_owned();
    let frechet = big.slice(s![..n, n..]).to_owned();
    (exp_a, frechet)
}

/// Number of halvings so that the scaled 1-norm drops below theta_13.
fn scaling_power(norm: f64) -> u32 {
    if norm > THETA_13 {
        (norm / THETA_13).log2().ceil() as u32
    } else {
        0
    }
}

/// 1-norm: maximum absolute column sum.
fn one_norm(a: &Array2<Complex64>) -> f64 {
    let mut max_sum = 0.0f64;
    for col in a.columns() {
        let sum: f64 = col.iter().map(|x| x.norm()).sum();
        max_sum = max_sum.max(sum);
    }
    max_sum
}

#[inline]
fn c(x: f64) -> Complex64 {
    Complex64::new(x, 0.0)
}

/// Padé(13,13) rational approximation of exp(A) for ||A|| <= theta_13.
fn pade13(a: &Array2<Complex64>) -> Array2<Complex64> {
    let n = a.nrows();
    let eye = Array2::from_diag_elem(n, c(1.0));

    let a2 = a.dot(a);
    let a4 = a2.dot(&a2);
    let a6 = a2.dot(&a4);

    // Odd part U = A·(A6·(b13 A6 + b11 A4 + b9 A2) + b7 A6 + b5 A4 + b3 A2 + b1 I)
    let u_inner = &a6 * c(PADE13[13]) + &a4 * c(PADE13[11]) + &a2 * c(PADE13[9]);
    let u = a.dot(
        &(u_inner.dot(&a6)
            + &a6 * c(PADE13[7])
            + &a4 * c(PADE13[5])
            + &a2 * c(PADE13[3])
            + &eye * c(PADE13[1])),
    );

    // Even part V = A6·(b12 A6 + b10 A4 + b8 A2) + b6 A6 + b4 A4 + b2 A2 + b0 I
    let v_inner = &a6 * c(PADE13[12]) + &a4 * c(PADE13[10]) + &a2 * c(PADE13[8]);
    let v = v_inner.dot(&a6)
        + &a6 * c(PADE13[6])
        + &a4 * c(PADE13[4])
        + &a2 * c(PADE13[2])
        + &eye * c(PADE13[0]);

    // exp(A) ≈ (V − U)⁻¹ (V + U)
    solve(&v - &u, &v + &u)
}

/// Solve A·X = B by in-place LU with partial pivoting.
fn solve(a: Array2<Complex64>, b: Array2<Complex64>) -> Array2<Complex64> {
    let n = a.nrows();
    let m = b.ncols();
    let mut lu = a;
    let mut x = b;

    for col in 0..n {
        let mut pivot_row = col;
        let mut pivot_mag = lu[[col, col]].norm();
        for row in (col + 1)..n {
            let mag = lu[[row, col]].norm();
            if mag > pivot_mag {
                pivot_mag = mag;
                pivot_row = row;
            }
        }
        if pivot_row != col {
            for j in 0..n {
                lu.swap([col, j], [pivot_row, j]);
            }
            for j in 0..m {
                x.swap([col, j], [pivot_row, j]);
            }
        }

        let pivot = lu[[col, col]];
        if pivot.norm() < 1e-300 {
            // The Padé denominator is well conditioned after scaling; a zero
            // pivot means the input was not finite.
            return Array2::from_diag_elem(n, c(f64::NAN));
        }

        for row in (col + 1)..n {
            let factor = lu[[row, col]] / pivot;
            for j in (col + 1)..n {
                let v = lu[[col, j]];
                lu[[row, j]] -= factor * v;
            }
            for j in 0..m {
                let v = x[[col, j]];
                x[[row, j]] -= factor * v;
            }
        }
    }

    // Back substitution
    for col in (0..n).rev() {
        let pivot = lu[[col, col]];
        for j in 0..m {
            let mut sum = x[[col, j]];
            for k in (col + 1)..n {
                sum -= lu[[col, k]] * x[[k, j]];
            }
            x[[col, j]] = sum / pivot;
        }
    }
    x
}
