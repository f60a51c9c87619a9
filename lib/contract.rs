//! Structure-aware contraction of local operators against a dense state
//! vector.
//!
//! A local operator acting on a handful of qubits is implicitly tensored with
//! the identity on every other qubit, so each element of the full
//! 2<sup>*n*</sup> × 2<sup>*n*</sup> operator factors as
//!
//! ```text
//! A[i, j] = Π_k A_k[bit_k(i), bit_k(j)]
//! ```
//!
//! and the identity factors vanish unless `bit_k(i) == bit_k(j)`. The new
//! amplitude at `i` is therefore a combination of only the 2<sup>*m*</sup>
//! input amplitudes that agree with `i` on every qubit outside the *m* touched
//! ones. Each output amplitude depends only on the (immutable) input vector,
//! so all outputs are computed in parallel into a fresh buffer.
//!
//! Qubit indices here are 1-based with qubit 1 as the most significant bit;
//! callers are responsible for checking that they are in range and distinct.

use rayon::iter::{ IntoParallelIterator, IndexedParallelIterator, ParallelIterator };
use num_complex::Complex64 as C64;
use crate::gate::{ Bit, Mat2, Mat4 };

/// Bit mask selecting qubit `k` in a basis index for an `n`-qubit register.
#[inline]
pub(crate) fn mask(n: usize, k: usize) -> usize { 1 << (n - k) }

/// Value of qubit `k` in basis index `i`.
#[inline]
pub(crate) fn bit_of(n: usize, k: usize, i: usize) -> usize {
    (i >> (n - k)) & 1
}

/// Apply a single-qubit operator `u` to qubit `k`.
pub fn contract_single(state: &[C64], n: usize, k: usize, u: &Mat2) -> Vec<C64>
{
    let m = mask(n, k);
    (0..state.len()).into_par_iter()
        .map(|i| {
            let b = usize::from(i & m != 0);
            u[(b, 0)] * state[i & !m] + u[(b, 1)] * state[i | m]
        })
        .collect()
}

/// Apply a tensor product of single-qubit operators, each acting on a
/// distinct qubit.
///
/// With *m* factors, each output amplitude is a sum of 2<sup>*m*</sup> terms.
pub fn contract_product(state: &[C64], n: usize, factors: &[(usize, &Mat2)])
    -> Vec<C64>
{
    let masks: Vec<usize> = factors.iter().map(|(k, _)| mask(n, *k)).collect();
    let full: usize = masks.iter().fold(0, |acc, m| acc | m);
    let nterms: usize = 1 << factors.len();
    (0..state.len()).into_par_iter()
        .map(|i| {
            let rest = i & !full;
            (0..nterms)
                .map(|t| {
                    let mut j = rest;
                    let mut coeff = C64::from(1.0);
                    for (f, ((_, a), m)) in factors.iter().zip(&masks).enumerate() {
                        let bj = (t >> f) & 1;
                        let bi = usize::from(i & m != 0);
                        if bj == 1 { j |= m; }
                        coeff *= a[(bi, bj)];
                    }
                    coeff * state[j]
                })
                .sum::<C64>()
        })
        .collect()
}

/// Apply a two-qubit operator `u` to the pair of qubits (`k`, `k + 1`).
///
/// Rows and columns of `u` are ordered by the two-bit value with qubit `k` as
/// the high bit.
pub fn contract_pair(state: &[C64], n: usize, k: usize, u: &Mat4) -> Vec<C64>
{
    let mh = mask(n, k);
    let ml = mask(n, k + 1);
    let both = mh | ml;
    (0..state.len()).into_par_iter()
        .map(|i| {
            let rest = i & !both;
            let row = 2 * usize::from(i & mh != 0) + usize::from(i & ml != 0);
            let idx = [rest, rest | ml, rest | mh, rest | both];
            idx.iter().enumerate()
                .map(|(col, j)| u[(row, col)] * state[*j])
                .sum::<C64>()
        })
        .collect()
}

/// Project qubit `k` onto ∣`bit`⟩: amplitudes whose qubit `k` disagrees with
/// `bit` are zeroed, all others kept as-is.
///
/// The result is not normalized.
pub fn project(state: &[C64], n: usize, k: usize, bit: Bit) -> Vec<C64> {
    let want = usize::from(bit.is_one());
    state.into_par_iter()
        .enumerate()
        .map(|(i, a)| {
            if bit_of(n, k, i) == want { *a } else { C64::from(0.0) }
        })
        .collect()
}

/// Sum of squared magnitudes.
pub fn norm_sqr(state: &[C64]) -> f64 {
    state.into_par_iter().map(|a| a.norm_sqr()).sum()
}

/// Elementwise sum of two equal-length vectors, consuming the first.
pub(crate) fn add_into(mut a: Vec<C64>, b: &[C64]) -> Vec<C64> {
    a.as_mut_slice().into_par_iter()
        .zip(b.into_par_iter())
        .for_each(|(ai, bi)| { *ai += bi; });
    a
}

/// Divide every amplitude by `norm`.
pub(crate) fn scale(state: &mut [C64], norm: f64) {
    state.into_par_iter().for_each(|a| { *a /= norm; });
}
