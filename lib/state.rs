//! Dense *n*-qubit states as complex amplitude vectors.
//!
//! The amplitude at index `i` belongs to the basis state whose bit string is
//! the binary representation of `i`, with qubit 1 as the most significant bit.
//! Qubits are numbered from 1.
//!
//! # Example
//! ```
//! use qubit_sim::{ gate::{ Bit, Unitary }, state::QuantumState };
//! use rand::{ rngs::StdRng, SeedableRng };
//!
//! let mut rng = StdRng::seed_from_u64(10546);
//!
//! // initialize a new state to ∣00⟩
//! let mut state = QuantumState::from_bits("00", &mut rng).unwrap();
//!
//! // generate a Bell state on qubits 1, 2
//! state.apply_single(Unitary::H, 1).unwrap()
//!     .apply_controlled(Unitary::X, 1, 2).unwrap();
//! println!("{}", state);
//! // (0.7071067811865476+0i)∣00⟩ + (0.7071067811865476+0i)∣11⟩
//!
//! // the two qubits always agree
//! let m1 = state.measure(1, &mut rng).unwrap().bit;
//! let m2 = state.measure(2, &mut rng).unwrap().bit;
//! assert_eq!(m1, m2);
//! ```

use std::fmt;
use itertools::Itertools;
use nalgebra as na;
use num_complex::Complex64 as C64;
use rand::Rng;
use crate::{
    circuit::{ CircuitLog, Entry },
    contract::{
        add_into,
        contract_pair,
        contract_product,
        contract_single,
        norm_sqr,
        project,
        scale,
    },
    error::{ StateError, StateResult },
    gate::{ projector, Bit, Gate, Oracle, Unitary },
};

/// Tolerance on the squared norm of a state before it is renormalized, and
/// the smallest norm a state (or measurement branch) may have and still be
/// normalized.
pub const NORM_TOL: f64 = 1e-9;

/// Number of decimal places kept by [`QuantumState::amplitude_rounded`].
pub const DECIMAL_PLACES: i32 = 16;

/// Largest number of qubits a state may be constructed with.
pub const MAX_QUBITS: usize = 30;

/// The result of a single-qubit measurement.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Outcome {
    /// The measured qubit.
    pub qubit: usize,
    /// The bit it was found in.
    pub bit: Bit,
}

/// Label of the `i`-th basis state of an `n`-qubit register.
pub fn basis_label(n: usize, i: usize) -> String {
    format!("{:0width$b}", i, width = n)
}

// draw a complex number with real and imaginary parts uniform in [-1, 1]
fn random_amp<R>(rng: &mut R) -> C64
where R: Rng + ?Sized
{
    C64::new(rng.gen_range(-1.0..=1.0), rng.gen_range(-1.0..=1.0))
}

fn normalized(mut amps: Vec<C64>) -> StateResult<Vec<C64>> {
    let norm = norm_sqr(&amps).sqrt();
    if !norm.is_finite() || norm < NORM_TOL {
        return Err(StateError::DegenerateState);
    }
    scale(&mut amps, norm);
    Ok(amps)
}

/// A pure state of `n` qubits, stored as 2<sup>`n`</sup> complex amplitudes,
/// along with a log of the operations applied to it.
#[derive(Clone, Debug, PartialEq)]
pub struct QuantumState {
    n: usize,
    amps: na::DVector<C64>,
    circuit: CircuitLog,
}

impl fmt::Display for QuantumState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let terms: Vec<String>
            = (0..self.dim())
            .filter_map(|i| {
                self.amplitude_rounded(i)
                    .filter(|a| *a != C64::from(0.0))
                    .map(|a| format!("({})∣{}⟩", a, basis_label(self.n, i)))
            })
            .collect();
        write!(f, "{}", terms.join(" + "))
    }
}

impl QuantumState {
    fn from_parts(n: usize, amps: Vec<C64>) -> Self {
        Self {
            n,
            amps: na::DVector::from_vec(amps),
            circuit: CircuitLog::new(n),
        }
    }

    /// Create a new state from a string of per-qubit characters: `'0'` for
    /// ∣0⟩, `'1'` for ∣1⟩, and `'q'` for a qubit with random, independently
    /// normalized amplitudes.
    ///
    /// The first character is qubit 1.
    pub fn from_bits<R>(bits: &str, rng: &mut R) -> StateResult<Self>
    where R: Rng + ?Sized
    {
        if let Some(c) = bits.chars().find(|c| !matches!(c, '0' | '1' | 'q')) {
            return Err(StateError::InvalidBitString(c));
        }
        let n = bits.chars().count();
        if n == 0 || n > MAX_QUBITS {
            return Err(StateError::InvalidQubitCount(n));
        }
        let zero = C64::from(0.0);
        let one = C64::from(1.0);
        let qubits: Vec<Vec<C64>>
            = bits.chars()
            .map(|c| match c {
                '0' => Ok(vec![one, zero]),
                '1' => Ok(vec![zero, one]),
                _ => normalized(vec![random_amp(rng), random_amp(rng)]),
            })
            .collect::<StateResult<_>>()?;
        let amps: Vec<C64>
            = qubits.into_iter()
            .map(|q| q.into_iter())
            .multi_cartesian_product()
            .map(|amps| amps.into_iter().product())
            .collect();
        Ok(Self::from_parts(n, amps))
    }

    /// Create a new `n`-qubit state with random amplitudes, normalized.
    pub fn random<R>(n: usize, rng: &mut R) -> StateResult<Self>
    where R: Rng + ?Sized
    {
        if n == 0 || n > MAX_QUBITS {
            return Err(StateError::InvalidQubitCount(n));
        }
        let amps: Vec<C64> = (0..1_usize << n).map(|_| random_amp(rng)).collect();
        Ok(Self::from_parts(n, normalized(amps)?))
    }

    /// Create a new state from a vector of amplitudes, whose length must be a
    /// power of two greater than 1.
    ///
    /// The vector is normalized; fails with [`StateError::DegenerateState`] if
    /// this is not possible.
    pub fn from_vector<I>(amps: I) -> StateResult<Self>
    where I: IntoIterator<Item = C64>
    {
        let amps: Vec<C64> = amps.into_iter().collect();
        let len = amps.len();
        if len < 2 || !len.is_power_of_two() {
            return Err(StateError::InvalidVectorLength(len));
        }
        let n = len.trailing_zeros() as usize;
        Ok(Self::from_parts(n, normalized(amps)?))
    }

    /// Return the number of qubits.
    pub fn num_qubits(&self) -> usize { self.n }

    /// Return the number of basis states, `2^n`.
    pub fn dim(&self) -> usize { self.amps.len() }

    /// Return the raw amplitudes.
    pub fn vector(&self) -> &[C64] { self.amps.as_slice() }

    /// Return the amplitude of the `i`-th basis state.
    pub fn amplitude(&self, i: usize) -> Option<C64> { self.amps.get(i).copied() }

    /// Return the amplitude of the `i`-th basis state rounded to
    /// [`DECIMAL_PLACES`], for display.
    pub fn amplitude_rounded(&self, i: usize) -> Option<C64> {
        let s = 10.0_f64.powi(DECIMAL_PLACES);
        self.amplitude(i)
            .map(|a| C64::new((a.re * s).round() / s, (a.im * s).round() / s))
    }

    /// Return the squared norm of the state.
    pub fn norm_sqr(&self) -> f64 { norm_sqr(self.vector()) }

    /// Return `true` if the squared norm is within [`NORM_TOL`] of 1.
    pub fn is_normalized(&self) -> bool {
        (self.norm_sqr() - 1.0).abs() <= NORM_TOL
    }

    /// Return the probability of each basis state, labeled by its bit string.
    pub fn probabilities(&self) -> Vec<(String, f64)> {
        self.amps.iter().enumerate()
            .map(|(i, a)| (basis_label(self.n, i), a.norm_sqr()))
            .collect()
    }

    /// Return the log of operations applied so far.
    pub fn circuit(&self) -> &CircuitLog { &self.circuit }

    fn check_qubit(&self, k: usize) -> StateResult<()> {
        if (1..=self.n).contains(&k) {
            Ok(())
        } else {
            Err(StateError::QubitOutOfRange { qubit: k, n: self.n })
        }
    }

    // swap in a freshly computed vector, restore normalization, and record the
    // operation
    fn commit(&mut self, amps: Vec<C64>, entry: Entry) {
        self.amps = na::DVector::from_vec(amps);
        let nsqr = self.norm_sqr();
        if (nsqr - 1.0).abs() > NORM_TOL {
            scale(self.amps.as_mut_slice(), nsqr.sqrt());
        }
        self.circuit.push(entry);
    }

    /// Apply a single-qubit unitary to the `k`-th qubit.
    pub fn apply_single(&mut self, u: Unitary, k: usize)
        -> StateResult<&mut Self>
    {
        self.check_qubit(k)?;
        let amps = contract_single(self.vector(), self.n, k, &u.matrix());
        self.commit(amps, Entry::Single(u, k));
        Ok(self)
    }

    /// Apply a unitary to the `target` qubit, conditioned on the `control`
    /// qubit being ∣1⟩.
    pub fn apply_controlled(&mut self, u: Unitary, control: usize, target: usize)
        -> StateResult<&mut Self>
    {
        self.check_qubit(control)?;
        self.check_qubit(target)?;
        if control == target {
            return Err(StateError::ControlTargetCollision(control));
        }
        // ∣0⟩⟨0∣_c ⊗ I_t + ∣1⟩⟨1∣_c ⊗ U_t
        let mat = u.matrix();
        let branch0
            = contract_single(self.vector(), self.n, control, projector(Bit::Zero));
        let branch1
            = contract_product(
                self.vector(),
                self.n,
                &[(control, projector(Bit::One)), (target, &mat)],
            );
        let amps = add_into(branch0, &branch1);
        self.commit(amps, Entry::Controlled(u, control, target));
        Ok(self)
    }

    /// Apply a CNOT gate to the `target` qubit, with `control` as control.
    pub fn apply_cnot(&mut self, control: usize, target: usize)
        -> StateResult<&mut Self>
    {
        self.apply_controlled(Unitary::X, control, target)
    }

    /// Apply a Deutsch oracle to the adjacent qubits `k1` and `k2 = k1 + 1`.
    pub fn apply_oracle(&mut self, oracle: Oracle, k1: usize, k2: usize)
        -> StateResult<&mut Self>
    {
        self.check_qubit(k1)?;
        self.check_qubit(k2)?;
        if k2 != k1 + 1 {
            return Err(StateError::OracleQubitsNotAdjacent(k1, k2));
        }
        let amps = contract_pair(self.vector(), self.n, k1, oracle.matrix());
        self.commit(amps, Entry::Oracle(oracle, k1, k2));
        Ok(self)
    }

    /// Swap qubits `a` and `b` with three CNOTs.
    pub fn swap(&mut self, a: usize, b: usize) -> StateResult<&mut Self> {
        self.check_qubit(a)?;
        self.check_qubit(b)?;
        if a == b { return Err(StateError::IdenticalQubits(a)); }
        self.apply_cnot(a, b)?
            .apply_cnot(b, a)?
            .apply_cnot(a, b)
    }

    /// Perform the action of a gate.
    pub fn apply_gate(&mut self, gate: Gate) -> StateResult<&mut Self> {
        match gate {
            Gate::Single(u, k) => self.apply_single(u, k),
            Gate::Controlled(u, c, t) => self.apply_controlled(u, c, t),
            Gate::Oracle(o, a, b) => self.apply_oracle(o, a, b),
            Gate::Swap(a, b) => self.swap(a, b),
        }
    }

    /// Perform a series of gates.
    ///
    /// Stops at the first gate that fails, leaving all preceding gates
    /// applied.
    pub fn apply_circuit<'a, I>(&mut self, gates: I) -> StateResult<&mut Self>
    where I: IntoIterator<Item = &'a Gate>
    {
        gates.into_iter().copied()
            .try_for_each(|g| self.apply_gate(g).map(|_| ()))?;
        Ok(self)
    }

    // the two (unnormalized) projections of the state onto qubit `k` being ∣0⟩
    // or ∣1⟩, with their squared norms
    fn branches(&self, k: usize) -> [(Vec<C64>, f64); 2] {
        [Bit::Zero, Bit::One]
            .map(|b| {
                let collapsed = project(self.vector(), self.n, k, b);
                let w = norm_sqr(&collapsed);
                (collapsed, w)
            })
    }

    /// Return the probabilities of measuring qubit `k` as 0 or 1, normalized
    /// to sum to 1.
    pub fn branch_probabilities(&self, k: usize) -> StateResult<(f64, f64)> {
        self.check_qubit(k)?;
        let [(_, w0), (_, w1)] = self.branches(k);
        born(w0, w1)
    }

    /// Perform a projective measurement on qubit `k` in the *z*-basis,
    /// collapsing the state and returning the outcome.
    pub fn measure<R>(&mut self, k: usize, rng: &mut R) -> StateResult<Outcome>
    where R: Rng + ?Sized
    {
        self.check_qubit(k)?;
        let [(c0, w0), (c1, w1)] = self.branches(k);
        let (p0, _) = born(w0, w1)?;
        let r: f64 = rng.gen();
        let (bit, mut collapsed, w)
            = if r < p0 { (Bit::Zero, c0, w0) } else { (Bit::One, c1, w1) };
        let norm = w.sqrt();
        if !norm.is_finite() || norm < NORM_TOL {
            return Err(StateError::DegenerateState);
        }
        scale(&mut collapsed, norm);
        self.commit(collapsed, Entry::Measure(k, bit));
        Ok(Outcome { qubit: k, bit })
    }

    /// Measure every qubit in order, from 1 to `n`.
    pub fn measure_all<R>(&mut self, rng: &mut R) -> StateResult<Vec<Bit>>
    where R: Rng + ?Sized
    {
        (1..=self.n)
            .map(|k| self.measure(k, rng).map(|outcome| outcome.bit))
            .collect()
    }

    /// Form the joint state of `self` and `other`, with `self`'s qubits first.
    ///
    /// Both states are consumed. The circuit log of the result contains
    /// `self`'s operations followed by `other`'s.
    pub fn compose(self, other: Self) -> Self {
        let n = self.n + other.n;
        let amps: Vec<C64>
            = self.amps.iter()
            .cartesian_product(other.amps.iter())
            .map(|(a, b)| a * b)
            .collect();
        let mut joined = Self::from_parts(n, amps);
        joined.circuit = self.circuit.join(other.circuit);
        let nsqr = joined.norm_sqr();
        if (nsqr - 1.0).abs() > NORM_TOL {
            scale(joined.amps.as_mut_slice(), nsqr.sqrt());
        }
        joined
    }
}

// renormalize the two branch weights so that they sum to 1
fn born(w0: f64, w1: f64) -> StateResult<(f64, f64)> {
    let total = w0 + w1;
    if !total.is_finite() || total < NORM_TOL * NORM_TOL {
        return Err(StateError::DegenerateState);
    }
    Ok((w0 / total, w1 / total))
}

/// Form the joint state of `a` and `b`. See [`QuantumState::compose`].
pub fn compose(a: QuantumState, b: QuantumState) -> QuantumState {
    a.compose(b)
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::{ rngs::{ mock::StepRng, StdRng }, SeedableRng };
    use std::f64::consts::FRAC_1_SQRT_2;

    const TOL: f64 = 1e-12;

    fn close(a: &[C64], b: &[C64], tol: f64) -> bool {
        a.len() == b.len() && a.iter().zip(b).all(|(x, y)| (x - y).norm() < tol)
    }

    fn c(re: f64) -> C64 { C64::from(re) }

    #[test]
    fn from_bits_basis() {
        let mut rng = StdRng::seed_from_u64(10546);
        let s = QuantumState::from_bits("011", &mut rng).unwrap();
        assert_eq!(s.num_qubits(), 3);
        assert_eq!(s.dim(), 8);
        let mut expected = vec![c(0.0); 8];
        expected[0b011] = c(1.0);
        assert_eq!(s.vector(), expected.as_slice());
        assert!(s.circuit().is_empty());
    }

    #[test]
    fn from_bits_wildcard() {
        let mut rng = StdRng::seed_from_u64(10546);
        let s = QuantumState::from_bits("1q", &mut rng).unwrap();
        assert!(s.is_normalized());
        // first qubit is definitely ∣1⟩
        assert_eq!(s.amplitude(0), Some(c(0.0)));
        assert_eq!(s.amplitude(1), Some(c(0.0)));
        let (p0, p1) = s.branch_probabilities(1).unwrap();
        assert!(p0.abs() < TOL && (p1 - 1.0).abs() < TOL);
    }

    #[test]
    fn constructor_errors() {
        let mut rng = StdRng::seed_from_u64(10546);
        assert_eq!(
            QuantumState::from_bits("01x", &mut rng),
            Err(StateError::InvalidBitString('x')),
        );
        assert_eq!(
            QuantumState::from_bits("", &mut rng),
            Err(StateError::InvalidQubitCount(0)),
        );
        assert_eq!(
            QuantumState::random(0, &mut rng),
            Err(StateError::InvalidQubitCount(0)),
        );
        assert_eq!(
            QuantumState::random(MAX_QUBITS + 1, &mut rng),
            Err(StateError::InvalidQubitCount(MAX_QUBITS + 1)),
        );
        assert_eq!(
            QuantumState::from_vector(vec![c(1.0)]),
            Err(StateError::InvalidVectorLength(1)),
        );
        assert_eq!(
            QuantumState::from_vector(vec![c(1.0); 6]),
            Err(StateError::InvalidVectorLength(6)),
        );
        assert_eq!(
            QuantumState::from_vector(vec![c(0.0); 4]),
            Err(StateError::DegenerateState),
        );
    }

    #[test]
    fn from_vector_normalizes() {
        let s = QuantumState::from_vector(vec![c(3.0), C64::new(0.0, 4.0)])
            .unwrap();
        assert_eq!(s.num_qubits(), 1);
        assert!(close(s.vector(), &[c(0.6), C64::new(0.0, 0.8)], TOL));
    }

    #[test]
    fn random_is_normalized() {
        let mut rng = StdRng::seed_from_u64(10546);
        for n in 1..=8 {
            let s = QuantumState::random(n, &mut rng).unwrap();
            assert_eq!(s.dim(), 1 << n);
            assert!(s.is_normalized());
        }
    }

    #[test]
    fn bell_state() {
        let mut rng = StdRng::seed_from_u64(10546);
        let mut s = QuantumState::from_bits("00", &mut rng).unwrap();
        s.apply_single(Unitary::H, 1).unwrap()
            .apply_cnot(1, 2).unwrap();
        let r = c(FRAC_1_SQRT_2);
        assert!(close(s.vector(), &[r, c(0.0), c(0.0), r], TOL));
        assert_eq!(
            s.circuit().entries(),
            &[Entry::Single(Unitary::H, 1), Entry::Controlled(Unitary::X, 1, 2)],
        );
        assert_eq!(
            s.to_string(),
            "(0.7071067811865476+0i)∣00⟩ + (0.7071067811865476+0i)∣11⟩",
        );
    }

    #[test]
    fn involutions() {
        let mut rng = StdRng::seed_from_u64(10546);
        for n in 1..=4 {
            for k in 1..=n {
                for u in Unitary::ALL.into_iter().filter(|u| u.is_involution()) {
                    let mut s = QuantumState::random(n, &mut rng).unwrap();
                    let init = s.vector().to_vec();
                    s.apply_single(u, k).unwrap().apply_single(u, k).unwrap();
                    assert!(close(s.vector(), &init, 1e-10), "{}({})", u, k);
                }
            }
        }
    }

    #[test]
    fn controlled_acts_only_on_control_one() {
        let mut rng = StdRng::seed_from_u64(10546);
        // control 3, target 1: ∣001⟩ -> ∣101⟩, ∣000⟩ unchanged
        let mut s = QuantumState::from_bits("001", &mut rng).unwrap();
        s.apply_cnot(3, 1).unwrap();
        assert_eq!(s.amplitude(0b101), Some(c(1.0)));
        let mut s = QuantumState::from_bits("000", &mut rng).unwrap();
        s.apply_cnot(3, 1).unwrap();
        assert_eq!(s.amplitude(0b000), Some(c(1.0)));
        // CZ phases only ∣11⟩
        let mut s = QuantumState::from_vector(vec![c(1.0); 4]).unwrap();
        s.apply_controlled(Unitary::Z, 1, 2).unwrap();
        assert!(close(s.vector(), &[c(0.5), c(0.5), c(0.5), c(-0.5)], TOL));
    }

    #[test]
    fn swap_exchanges_qubits() {
        let mut rng = StdRng::seed_from_u64(10546);
        let mut s = QuantumState::from_bits("100", &mut rng).unwrap();
        s.swap(1, 3).unwrap();
        assert_eq!(s.amplitude(0b001), Some(c(1.0)));
        assert_eq!(s.circuit().len(), 3);

        let mut s = QuantumState::random(3, &mut rng).unwrap();
        let init = s.vector().to_vec();
        s.swap(2, 3).unwrap();
        // ∣abc⟩ -> ∣acb⟩
        for i in 0..8_usize {
            let j = (i & 0b100) | ((i & 0b010) >> 1) | ((i & 0b001) << 1);
            assert!((s.vector()[j] - init[i]).norm() < TOL);
        }
    }

    #[test]
    fn failed_operations_leave_state_untouched() {
        let mut rng = StdRng::seed_from_u64(10546);
        let mut s = QuantumState::random(3, &mut rng).unwrap();
        s.apply_single(Unitary::H, 2).unwrap();
        let before = s.clone();

        assert_eq!(
            s.apply_single(Unitary::X, 0).map(|_| ()),
            Err(StateError::QubitOutOfRange { qubit: 0, n: 3 }),
        );
        assert_eq!(
            s.apply_single(Unitary::X, 4).map(|_| ()),
            Err(StateError::QubitOutOfRange { qubit: 4, n: 3 }),
        );
        assert_eq!(
            s.apply_controlled(Unitary::Y, 2, 2).map(|_| ()),
            Err(StateError::ControlTargetCollision(2)),
        );
        assert_eq!(
            s.apply_controlled(Unitary::Y, 1, 5).map(|_| ()),
            Err(StateError::QubitOutOfRange { qubit: 5, n: 3 }),
        );
        assert_eq!(
            s.apply_oracle(Oracle::Bal0, 1, 3).map(|_| ()),
            Err(StateError::OracleQubitsNotAdjacent(1, 3)),
        );
        assert_eq!(
            s.apply_oracle(Oracle::Bal0, 3, 4).map(|_| ()),
            Err(StateError::QubitOutOfRange { qubit: 4, n: 3 }),
        );
        assert_eq!(
            s.swap(1, 1).map(|_| ()),
            Err(StateError::IdenticalQubits(1)),
        );
        assert_eq!(
            s.measure(9, &mut rng),
            Err(StateError::QubitOutOfRange { qubit: 9, n: 3 }),
        );
        assert_eq!(s, before);
    }

    #[test]
    fn apply_circuit_stops_at_failure() {
        let mut rng = StdRng::seed_from_u64(10546);
        let mut s = QuantumState::from_bits("00", &mut rng).unwrap();
        let gates = [Gate::x(1), Gate::cx(1, 1), Gate::x(2)];
        assert_eq!(
            s.apply_circuit(&gates).map(|_| ()),
            Err(StateError::ControlTargetCollision(1)),
        );
        assert_eq!(s.amplitude(0b10), Some(c(1.0)));
        assert_eq!(s.circuit().len(), 1);

        let mut s = QuantumState::from_bits("01", &mut rng).unwrap();
        s.apply_circuit(&[Gate::Swap(1, 2), Gate::Oracle(Oracle::Const1, 1, 2)])
            .unwrap();
        // ∣01⟩ -> ∣10⟩ -> ∣11⟩
        assert_eq!(s.amplitude(0b11), Some(c(1.0)));
    }

    #[test]
    fn normalization_holds() {
        let mut rng = StdRng::seed_from_u64(10546);
        let mut s = QuantumState::random(5, &mut rng).unwrap();
        for _ in 0..200 {
            let k = rng.gen_range(1..=5);
            let t = (k % 5) + 1;
            let u = Unitary::ALL[rng.gen_range(0..Unitary::ALL.len())];
            match rng.gen_range(0..5) {
                0 => { s.apply_single(u, k).unwrap(); },
                1 => { s.apply_controlled(u, k, t).unwrap(); },
                2 => { s.swap(k, t).unwrap(); },
                3 if k < 5 => {
                    let o = Oracle::ALL[rng.gen_range(0..4)];
                    s.apply_oracle(o, k, k + 1).unwrap();
                },
                _ => { s.measure(k, &mut rng).unwrap(); },
            }
            assert!(s.is_normalized());
        }
    }

    #[test]
    fn born_rule() {
        let mut rng = StdRng::seed_from_u64(10546);
        for _ in 0..1000 {
            let n = rng.gen_range(1..=5);
            let k = rng.gen_range(1..=n);
            let s = QuantumState::random(n, &mut rng).unwrap();
            let (p0, p1) = s.branch_probabilities(k).unwrap();
            assert!((p0 + p1 - 1.0).abs() < TOL);
            assert!((0.0..=1.0).contains(&p0) && (0.0..=1.0).contains(&p1));
        }
    }

    #[test]
    fn measurement_collapses() {
        let mut rng = StdRng::seed_from_u64(10546);
        for _ in 0..50 {
            let mut s = QuantumState::random(3, &mut rng).unwrap();
            let init = s.vector().to_vec();
            let Outcome { qubit, bit } = s.measure(2, &mut rng).unwrap();
            assert_eq!(qubit, 2);
            assert!(s.is_normalized());
            // every surviving amplitude is proportional to the original one
            let want = usize::from(bit.is_one());
            let w: f64
                = init.iter().enumerate()
                .filter(|(i, _)| (i >> 1) & 1 == want)
                .map(|(_, a)| a.norm_sqr())
                .sum();
            for (i, (a, a0)) in s.vector().iter().zip(&init).enumerate() {
                if (i >> 1) & 1 == want {
                    assert!((a - a0 / w.sqrt()).norm() < TOL);
                } else {
                    assert_eq!(*a, c(0.0));
                }
            }
            // measuring again is deterministic
            assert_eq!(s.measure(2, &mut rng).unwrap().bit, bit);
            assert_eq!(
                s.circuit().measurements().collect::<Vec<_>>(),
                vec![(2, bit), (2, bit)],
            );
        }
    }

    #[test]
    fn degenerate_states() {
        assert_eq!(
            QuantumState::from_vector(vec![c(f64::NAN), c(1.0)]),
            Err(StateError::DegenerateState),
        );
        assert_eq!(
            QuantumState::from_vector(vec![c(f64::INFINITY), c(0.0)]),
            Err(StateError::DegenerateState),
        );

        // r = 0 always selects the vanishingly small ∣0⟩ branch
        let mut rng = StepRng::new(0, 0);
        let mut s = QuantumState::from_vector(vec![c(1e-10), c(1.0)]).unwrap();
        let before = s.clone();
        assert_eq!(s.measure(1, &mut rng), Err(StateError::DegenerateState));
        assert_eq!(s, before);
        assert!(s.circuit().is_empty());
    }

    #[test]
    fn measure_definite_states() {
        let mut rng = StdRng::seed_from_u64(10546);
        for _ in 0..20 {
            let mut s = QuantumState::from_bits("101", &mut rng).unwrap();
            assert_eq!(
                s.measure_all(&mut rng).unwrap(),
                vec![Bit::One, Bit::Zero, Bit::One],
            );
        }
    }

    #[test]
    fn compose_is_kronecker() {
        let mut rng = StdRng::seed_from_u64(10546);
        for qa in 1..=4 {
            for qb in 1..=4 {
                let a = QuantumState::random(qa, &mut rng).unwrap();
                let b = QuantumState::random(qb, &mut rng).unwrap();
                let va = na::DMatrix::from_column_slice(a.dim(), 1, a.vector());
                let vb = na::DMatrix::from_column_slice(b.dim(), 1, b.vector());
                let expected = va.kronecker(&vb);
                let ab = compose(a, b);
                assert_eq!(ab.num_qubits(), qa + qb);
                assert!(close(ab.vector(), expected.as_slice(), TOL));
                assert!(ab.is_normalized());
            }
        }
    }

    #[test]
    fn compose_joins_circuits() {
        let mut rng = StdRng::seed_from_u64(10546);
        let mut a = QuantumState::from_bits("0", &mut rng).unwrap();
        a.apply_single(Unitary::H, 1).unwrap();
        let mut b = QuantumState::from_bits("00", &mut rng).unwrap();
        b.apply_cnot(1, 2).unwrap();
        let ab = a.compose(b);
        assert_eq!(
            ab.circuit().entries(),
            &[Entry::Single(Unitary::H, 1), Entry::Controlled(Unitary::X, 2, 3)],
        );
    }

    #[test]
    fn probabilities_are_labeled() {
        let s = QuantumState::from_vector(vec![c(1.0), c(0.0), c(0.0), c(1.0)])
            .unwrap();
        let probs = s.probabilities();
        let labels: Vec<&str> = probs.iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(labels, vec!["00", "01", "10", "11"]);
        assert!((probs[0].1 - 0.5).abs() < TOL);
        assert!(probs[1].1.abs() < TOL);
        assert!((probs[3].1 - 0.5).abs() < TOL);
    }
}
