//! Canonical few-qubit protocols built on [`QuantumState`].

use num_complex::Complex64 as C64;
use rand::Rng;
use crate::{
    error::StateResult,
    gate::{ Bit, Gate, Oracle },
    state::QuantumState,
};

/// Prepare the Bell state (∣00⟩ + ∣11⟩)/√2 on two fresh qubits.
pub fn bell_pair<R>(rng: &mut R) -> StateResult<QuantumState>
where R: Rng + ?Sized
{
    let mut state = QuantumState::from_bits("00", rng)?;
    state.apply_circuit(&[Gate::h(1), Gate::cx(1, 2)])?;
    Ok(state)
}

/// Prepare a Bell pair and measure both qubits, returning the two bits.
pub fn bell_measurement<R>(rng: &mut R) -> StateResult<(Bit, Bit)>
where R: Rng + ?Sized
{
    let mut state = bell_pair(rng)?;
    let m1 = state.measure(1, rng)?.bit;
    let m2 = state.measure(2, rng)?.bit;
    Ok((m1, m2))
}

/// Deutsch's verdict on an oracle's underlying function.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Verdict {
    Constant,
    Balanced,
}

impl From<Bit> for Verdict {
    fn from(bit: Bit) -> Self {
        match bit {
            Bit::Zero => Self::Constant,
            Bit::One => Self::Balanced,
        }
    }
}

/// Run Deutsch's algorithm against `oracle`: prepare ∣01⟩, apply H to both
/// qubits, apply the oracle, apply H to qubit 1, and measure it.
///
/// The result is `0` for a constant function and `1` for a balanced one.
pub fn deutsch<R>(oracle: Oracle, rng: &mut R) -> StateResult<Bit>
where R: Rng + ?Sized
{
    let mut state = QuantumState::from_bits("01", rng)?;
    state.apply_circuit(
        &[
            Gate::h(1),
            Gate::h(2),
            Gate::Oracle(oracle, 1, 2),
            Gate::h(1),
        ]
    )?;
    state.measure(1, rng).map(|outcome| outcome.bit)
}

/// Output of [`teleport`].
#[derive(Clone, Debug, PartialEq)]
pub struct Teleported {
    /// Final three-qubit state after corrections.
    pub state: QuantumState,
    /// Outcome of measuring qubit 1.
    pub m1: Bit,
    /// Outcome of measuring qubit 2.
    pub m2: Bit,
}

impl Teleported {
    /// Return the two amplitudes of qubit 3.
    ///
    /// After measurement qubits 1 and 2 are in a definite state, so the
    /// received qubit is read off the pair of amplitudes sharing their bits.
    pub fn received(&self) -> [C64; 2] {
        let base
            = (usize::from(u8::from(self.m1)) << 2)
            | (usize::from(u8::from(self.m2)) << 1);
        let v = self.state.vector();
        [v[base], v[base | 1]]
    }
}

/// Teleport the single-qubit state `input` onto the last qubit of a fresh
/// three-qubit register.
///
/// `input` is placed on qubit 1 and qubits 2 and 3 share a Bell pair. Qubits 1
/// and 2 are measured, and qubit 3 is corrected by X if qubit 2 read 1 and
/// then by Z if qubit 1 read 1.
pub fn teleport<R>(input: QuantumState, rng: &mut R) -> StateResult<Teleported>
where R: Rng + ?Sized
{
    let pair = QuantumState::from_bits("00", rng)?;
    let mut state = input.compose(pair);
    state.apply_circuit(
        &[
            Gate::h(2),
            Gate::cx(2, 3),
            Gate::cx(1, 2),
            Gate::h(1),
        ]
    )?;
    let m1 = state.measure(1, rng)?.bit;
    let m2 = state.measure(2, rng)?.bit;
    if m2.is_one() { state.apply_gate(Gate::x(3))?; }
    if m1.is_one() { state.apply_gate(Gate::z(3))?; }
    Ok(Teleported { state, m1, m2 })
}
