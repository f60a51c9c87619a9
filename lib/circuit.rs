//! A record of the operations applied to a state, kept for later display.
//!
//! The log only stores what was done, not how to draw it; the numeric kernel
//! never reads it back.

use std::fmt;
use crate::gate::{ Bit, Gate, Oracle, Unitary };

/// A single recorded operation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Entry {
    /// A single-qubit unitary.
    Single(Unitary, usize),
    /// A controlled unitary; the first qubit index is the control.
    Controlled(Unitary, usize, usize),
    /// A Deutsch oracle on two adjacent qubits.
    Oracle(Oracle, usize, usize),
    /// A measurement of a qubit and the bit that was obtained.
    Measure(usize, Bit),
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Single(u, k) => write!(f, "{}({})", u, k),
            Self::Controlled(u, c, t) => write!(f, "C{}({}, {})", u, c, t),
            Self::Oracle(o, a, b) => write!(f, "U_{}({}, {})", o, a, b),
            Self::Measure(k, b) => write!(f, "M({}) = {}", k, b),
        }
    }
}

impl Entry {
    /// Return `true` if `self` is `Measure`.
    pub fn is_measure(&self) -> bool { matches!(self, Self::Measure(..)) }

    /// Return the qubits touched by `self`.
    pub fn qubits(&self) -> Vec<usize> {
        match *self {
            Self::Single(_, k) | Self::Measure(k, _) => vec![k],
            Self::Controlled(_, a, b) | Self::Oracle(_, a, b) => vec![a, b],
        }
    }

    /// Return the symbol naming the operation.
    pub fn symbol(&self) -> String {
        match *self {
            Self::Single(u, _) => u.to_string(),
            Self::Controlled(u, ..) => format!("C{}", u),
            Self::Oracle(o, ..) => o.to_string(),
            Self::Measure(_, b) => b.to_string(),
        }
    }

    fn shifted(self, offs: usize) -> Self {
        match self {
            Self::Single(u, k) => Self::Single(u, k + offs),
            Self::Controlled(u, c, t) => Self::Controlled(u, c + offs, t + offs),
            Self::Oracle(o, a, b) => Self::Oracle(o, a + offs, b + offs),
            Self::Measure(k, b) => Self::Measure(k + offs, b),
        }
    }

    /// Convert back to a [`Gate`], if `self` is not a measurement.
    pub fn as_gate(&self) -> Option<Gate> {
        match *self {
            Self::Single(u, k) => Some(Gate::Single(u, k)),
            Self::Controlled(u, c, t) => Some(Gate::Controlled(u, c, t)),
            Self::Oracle(o, a, b) => Some(Gate::Oracle(o, a, b)),
            Self::Measure(..) => None,
        }
    }
}

/// Ordered record of everything applied to an `n`-qubit state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CircuitLog {
    n: usize,
    entries: Vec<Entry>,
}

impl IntoIterator for CircuitLog {
    type Item = Entry;
    type IntoIter = <Vec<Entry> as IntoIterator>::IntoIter;

    fn into_iter(self) -> Self::IntoIter { self.entries.into_iter() }
}

impl<'a> IntoIterator for &'a CircuitLog {
    type Item = &'a Entry;
    type IntoIter = <&'a Vec<Entry> as IntoIterator>::IntoIter;

    fn into_iter(self) -> Self::IntoIter { self.entries.iter() }
}

impl fmt::Display for CircuitLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.entries.len();
        for (k, entry) in self.entries.iter().enumerate() {
            entry.fmt(f)?;
            if k < n - 1 { write!(f, "; ")?; }
        }
        Ok(())
    }
}

impl CircuitLog {
    /// Create a new, empty log for `n` qubits.
    pub fn new(n: usize) -> Self { Self { n, entries: Vec::new() } }

    /// Return the number of qubits.
    pub fn num_qubits(&self) -> usize { self.n }

    /// Return the number of recorded entries.
    pub fn len(&self) -> usize { self.entries.len() }

    /// Return `true` if nothing has been recorded.
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    /// Return all entries in the order they were recorded.
    pub fn entries(&self) -> &[Entry] { &self.entries }

    /// Return the most recent entry.
    pub fn last(&self) -> Option<&Entry> { self.entries.last() }

    /// Return the measured bits, in order of measurement, with the qubit each
    /// was measured on.
    pub fn measurements(&self) -> impl Iterator<Item = (usize, Bit)> + '_ {
        self.entries.iter()
            .filter_map(|e| match *e {
                Entry::Measure(k, b) => Some((k, b)),
                _ => None,
            })
    }

    pub(crate) fn push(&mut self, entry: Entry) { self.entries.push(entry); }

    /// Merge the logs of two states joined by
    /// [`compose`][crate::state::compose]: all of `self`'s entries, followed by
    /// all of `other`'s with qubit indices shifted past `self`'s qubits.
    pub fn join(mut self, other: Self) -> Self {
        let offs = self.n;
        self.entries.extend(other.entries.into_iter().map(|e| e.shifted(offs)));
        self.n += other.n;
        self
    }
}
