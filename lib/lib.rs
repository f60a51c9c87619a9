//! Tools for simulating small registers of qubits as dense state vectors.
//!
//! Gates are applied without forming the full 2<sup>*n*</sup> ×
//! 2<sup>*n*</sup> operator: each local operator is contracted directly
//! against the amplitudes it touches (see [`contract`]), with a brute-force
//! Kronecker-product version kept in [`reference`] for comparison.

pub mod error;
pub mod gate;
pub mod contract;
pub mod circuit;
pub mod state;
pub mod reference;
pub mod algorithms;
