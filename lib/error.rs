//! Failure modes for state construction and manipulation.
//!
//! All of these are raised before any amplitudes are touched, so a
//! [`QuantumState`][crate::state::QuantumState] is always left exactly as it
//! was when an operation fails.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StateError {
    /// A state must have at least one qubit and no more than
    /// [`MAX_QUBITS`][crate::state::MAX_QUBITS].
    #[error("invalid qubit count {0}: must be between 1 and {max}", max = crate::state::MAX_QUBITS)]
    InvalidQubitCount(usize),

    /// Bit strings may only contain `'0'`, `'1'`, or the wildcard `'q'`.
    #[error("invalid character {0:?} in bit string: expected '0', '1', or 'q'")]
    InvalidBitString(char),

    /// State vectors must have a length that is a power of two, at least 2.
    #[error("invalid vector length {0}: must be a power of two greater than 1")]
    InvalidVectorLength(usize),

    #[error("qubit {qubit} is out of range for a {n}-qubit state")]
    QubitOutOfRange { qubit: usize, n: usize },

    #[error("qubit {0} was given twice")]
    IdenticalQubits(usize),

    #[error("control and target cannot both be qubit {0}")]
    ControlTargetCollision(usize),

    #[error("oracle qubits {0} and {1} are not adjacent: the second must be one more than the first")]
    OracleQubitsNotAdjacent(usize, usize),

    /// The state (or a post-measurement branch of it) has vanishing or
    /// non-finite norm and cannot be normalized.
    #[error("state cannot be normalized")]
    DegenerateState,

    #[error("unknown gate symbol {0:?}")]
    UnknownGate(String),

    #[error("unknown oracle kind {0:?}")]
    UnknownOracle(String),
}

pub type StateResult<T> = Result<T, StateError>;
