//! Brute-force versions of the kernels in [`contract`][crate::contract],
//! built from full 2<sup>*n*</sup> × 2<sup>*n*</sup> Kronecker products.
//!
//! These scale as *O*(4<sup>*n*</sup>) in both time and memory and exist only
//! to check the structure-aware kernels against.

use nalgebra as na;
use num_complex::Complex64 as C64;
use crate::gate::{ projector, Bit, Mat2, Mat4, Oracle, Unitary };

fn dyn_mat2(m: &Mat2) -> na::DMatrix<C64> {
    na::DMatrix::from_column_slice(2, 2, m.as_slice())
}

fn dyn_mat4(m: &Mat4) -> na::DMatrix<C64> {
    na::DMatrix::from_column_slice(4, 4, m.as_slice())
}

/// Build the full `n`-qubit operator for a product of single-qubit factors,
/// with the identity on every qubit not listed.
pub fn full_operator(n: usize, factors: &[(usize, &Mat2)]) -> na::DMatrix<C64> {
    let ident = Mat2::identity();
    (1..=n)
        .map(|k| {
            factors.iter()
                .find(|(q, _)| *q == k)
                .map(|(_, m)| dyn_mat2(m))
                .unwrap_or_else(|| dyn_mat2(&ident))
        })
        .fold(
            na::DMatrix::identity(1, 1),
            |acc, m| acc.kronecker(&m),
        )
}

/// Build the full `n`-qubit operator for a two-qubit operator on qubits `k`
/// and `k + 1`.
pub fn full_pair_operator(n: usize, k: usize, u: &Mat4) -> na::DMatrix<C64> {
    let left = na::DMatrix::<C64>::identity(1 << (k - 1), 1 << (k - 1));
    let right = na::DMatrix::<C64>::identity(1 << (n - k - 1), 1 << (n - k - 1));
    left.kronecker(&dyn_mat4(u)).kronecker(&right)
}

/// Multiply a full operator into a state vector.
pub fn apply_full(op: &na::DMatrix<C64>, state: &[C64]) -> Vec<C64> {
    let psi = na::DVector::from_column_slice(state);
    (op * psi).as_slice().to_vec()
}

/// Reference for [`contract_single`][crate::contract::contract_single].
pub fn single(state: &[C64], n: usize, k: usize, u: Unitary) -> Vec<C64> {
    apply_full(&full_operator(n, &[(k, &u.matrix())]), state)
}

/// Reference for a controlled gate: `P0_c ⊗ I_t + P1_c ⊗ U_t`.
pub fn controlled(state: &[C64], n: usize, c: usize, t: usize, u: Unitary)
    -> Vec<C64>
{
    let mat = u.matrix();
    let op
        = full_operator(n, &[(c, projector(Bit::Zero))])
        + full_operator(n, &[(c, projector(Bit::One)), (t, &mat)]);
    apply_full(&op, state)
}

/// Reference for [`contract_pair`][crate::contract::contract_pair].
pub fn oracle(state: &[C64], n: usize, k: usize, o: Oracle) -> Vec<C64> {
    apply_full(&full_pair_operator(n, k, o.matrix()), state)
}

/// The literal all-pairs contraction: for every `(i, j)`, multiply together
/// the factor (or identity) elements `[bit_k(i)][bit_k(j)]` over all qubits.
pub fn all_pairs(state: &[C64], n: usize, factors: &[(usize, &Mat2)])
    -> Vec<C64>
{
    let ident = Mat2::identity();
    let bit = |k: usize, i: usize| (i >> (n - k)) & 1;
    (0..state.len())
        .map(|i| {
            state.iter().enumerate()
                .map(|(j, a)| {
                    let coeff: C64
                        = (1..=n)
                        .map(|k| {
                            let m = factors.iter()
                                .find(|(q, _)| *q == k)
                                .map(|(_, m)| *m)
                                .unwrap_or(&ident);
                            m[(bit(k, i), bit(k, j))]
                        })
                        .product();
                    coeff * a
                })
                .sum()
        })
        .collect()
}
