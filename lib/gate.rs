//! Local operators: the fixed single-qubit unitaries, the Deutsch oracles, and
//! a description of a single gate acting on a particular set of qubits.
//!
//! All qubit indices are 1-based, with qubit 1 being the most significant bit
//! of a basis state index.

use std::{ fmt, str::FromStr };
use nalgebra as na;
use num_complex::Complex64 as C64;
use once_cell::sync::Lazy;
use crate::error::{ StateError, StateResult };

/// A 2 × 2 local operator.
pub type Mat2 = na::Matrix2<C64>;

/// A 4 × 4 local operator acting on two adjacent qubits.
pub type Mat4 = na::Matrix4<C64>;

const ZERO: C64 = C64 { re: 0.0, im: 0.0 };
const ONE: C64 = C64 { re: 1.0, im: 0.0 };

/// ∣0⟩⟨0∣
pub(crate) static PROJ0: Lazy<Mat2> = Lazy::new(|| {
    Mat2::new(
        ONE,  ZERO,
        ZERO, ZERO,
    )
});

/// ∣1⟩⟨1∣
pub(crate) static PROJ1: Lazy<Mat2> = Lazy::new(|| {
    Mat2::new(
        ZERO, ZERO,
        ZERO, ONE,
    )
});

/// Select one of the two computational basis projectors.
pub(crate) fn projector(bit: Bit) -> &'static Mat2 {
    match bit {
        Bit::Zero => &*PROJ0,
        Bit::One => &*PROJ1,
    }
}

/// The result of measuring a single qubit.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Bit {
    /// ∣0⟩
    Zero,
    /// ∣1⟩
    One,
}

impl fmt::Display for Bit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Zero => write!(f, "0"),
            Self::One => write!(f, "1"),
        }
    }
}

impl From<Bit> for u8 {
    fn from(bit: Bit) -> Self {
        match bit {
            Bit::Zero => 0,
            Bit::One => 1,
        }
    }
}

impl From<bool> for Bit {
    fn from(b: bool) -> Self { if b { Self::One } else { Self::Zero } }
}

impl Bit {
    /// Return `true` if `self` is `One`.
    pub fn is_one(self) -> bool { matches!(self, Self::One) }

    /// Return `true` if `self` is `Zero`.
    pub fn is_zero(self) -> bool { matches!(self, Self::Zero) }
}

/// One of the fixed single-qubit unitaries.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Unitary {
    /// π rotation about X
    X,
    /// π rotation about Y
    Y,
    /// π rotation about Z
    Z,
    /// Hadamard
    H,
    /// π/2 rotation about Z
    P,
    /// π/4 rotation about Z
    T,
}

impl fmt::Display for Unitary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl FromStr for Unitary {
    type Err = StateError;

    fn from_str(s: &str) -> StateResult<Self> {
        match s {
            "X" => Ok(Self::X),
            "Y" => Ok(Self::Y),
            "Z" => Ok(Self::Z),
            "H" => Ok(Self::H),
            "P" => Ok(Self::P),
            "T" => Ok(Self::T),
            _ => Err(StateError::UnknownGate(s.to_string())),
        }
    }
}

impl Unitary {
    /// All single-qubit unitaries.
    pub const ALL: [Self; 6] = [Self::X, Self::Y, Self::Z, Self::H, Self::P, Self::T];

    /// Return the matrix representation in the *z*-basis.
    pub fn matrix(self) -> Mat2 {
        use std::f64::consts::{ FRAC_1_SQRT_2, FRAC_PI_4 };
        let i = C64::i();
        let ort2 = C64::from(FRAC_1_SQRT_2);
        match self {
            Self::X => Mat2::new(
                ZERO, ONE,
                ONE,  ZERO,
            ),
            Self::Y => Mat2::new(
                ZERO, -i,
                i,    ZERO,
            ),
            Self::Z => Mat2::new(
                ONE,  ZERO,
                ZERO, -ONE,
            ),
            Self::H => Mat2::new(
                ort2,  ort2,
                ort2, -ort2,
            ),
            Self::P => Mat2::new(
                ONE,  ZERO,
                ZERO, i,
            ),
            Self::T => Mat2::new(
                ONE,  ZERO,
                ZERO, C64::cis(FRAC_PI_4),
            ),
        }
    }

    /// Return `true` if `self` is its own inverse.
    pub fn is_involution(self) -> bool {
        matches!(self, Self::X | Self::Y | Self::Z | Self::H)
    }

    /// Parse a controlled-gate symbol (`CX` or `CNOT`, `CY`, `CZ`, `CH`, `CP`,
    /// `CT`), returning the unitary applied to the target.
    pub fn from_controlled_symbol(s: &str) -> StateResult<Self> {
        match s {
            "CNOT" | "CX" => Ok(Self::X),
            "CY" => Ok(Self::Y),
            "CZ" => Ok(Self::Z),
            "CH" => Ok(Self::H),
            "CP" => Ok(Self::P),
            "CT" => Ok(Self::T),
            _ => Err(StateError::UnknownGate(s.to_string())),
        }
    }
}

/// One of the four possible functions *f*: {0, 1} → {0, 1} for Deutsch's
/// algorithm, encoded as the permutation ∣*x*, *y*⟩ → ∣*x*, *y* ⊕ *f*(*x*)⟩.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Oracle {
    /// *f*(*x*) = 0
    Const0,
    /// *f*(*x*) = 1
    Const1,
    /// *f*(*x*) = *x*
    Bal0,
    /// *f*(*x*) = ¬*x*
    Bal1,
}

impl fmt::Display for Oracle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Const0 => write!(f, "const0"),
            Self::Const1 => write!(f, "const1"),
            Self::Bal0 => write!(f, "bal0"),
            Self::Bal1 => write!(f, "bal1"),
        }
    }
}

impl FromStr for Oracle {
    type Err = StateError;

    fn from_str(s: &str) -> StateResult<Self> {
        match s {
            "const0" => Ok(Self::Const0),
            "const1" => Ok(Self::Const1),
            "bal0" => Ok(Self::Bal0),
            "bal1" => Ok(Self::Bal1),
            _ => Err(StateError::UnknownOracle(s.to_string())),
        }
    }
}

// rows/columns ordered ∣00⟩, ∣01⟩, ∣10⟩, ∣11⟩ over (qubit1, qubit2)
static ORACLES: Lazy<[Mat4; 4]> = Lazy::new(|| {
    let perm = |p: [usize; 4]| -> Mat4 {
        Mat4::from_fn(|r, c| if p[c] == r { ONE } else { ZERO })
    };
    [
        perm([0, 1, 2, 3]),
        perm([1, 0, 3, 2]),
        perm([0, 1, 3, 2]),
        perm([1, 0, 2, 3]),
    ]
});

impl Oracle {
    /// All oracle kinds.
    pub const ALL: [Self; 4] = [Self::Const0, Self::Const1, Self::Bal0, Self::Bal1];

    /// Return the 4 × 4 permutation matrix for `self`.
    pub fn matrix(self) -> &'static Mat4 {
        match self {
            Self::Const0 => &ORACLES[0],
            Self::Const1 => &ORACLES[1],
            Self::Bal0 => &ORACLES[2],
            Self::Bal1 => &ORACLES[3],
        }
    }

    /// Evaluate the underlying classical function.
    pub fn eval(self, x: Bit) -> Bit {
        match self {
            Self::Const0 => Bit::Zero,
            Self::Const1 => Bit::One,
            Self::Bal0 => x,
            Self::Bal1 => Bit::from(x.is_zero()),
        }
    }

    /// Return `true` if the underlying function is constant.
    pub fn is_constant(self) -> bool { matches!(self, Self::Const0 | Self::Const1) }
}

/// Description of a single operation on a register of qubits.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Gate {
    /// A single-qubit unitary on one qubit.
    Single(Unitary, usize),
    /// A unitary on the second qubit, controlled by the first.
    Controlled(Unitary, usize, usize),
    /// A Deutsch oracle spanning two adjacent qubits.
    Oracle(Oracle, usize, usize),
    /// Swap, implemented as three CNOTs.
    Swap(usize, usize),
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Single(u, k) => write!(f, "{}({})", u, k),
            Self::Controlled(u, c, t) => write!(f, "C{}({}, {})", u, c, t),
            Self::Oracle(o, a, b) => write!(f, "U_{}({}, {})", o, a, b),
            Self::Swap(a, b) => write!(f, "SWAP({}, {})", a, b),
        }
    }
}

impl Gate {
    /// Hadamard on qubit `k`.
    pub fn h(k: usize) -> Self { Self::Single(Unitary::H, k) }

    /// X on qubit `k`.
    pub fn x(k: usize) -> Self { Self::Single(Unitary::X, k) }

    /// Z on qubit `k`.
    pub fn z(k: usize) -> Self { Self::Single(Unitary::Z, k) }

    /// CNOT with control `c` and target `t`.
    pub fn cx(c: usize, t: usize) -> Self { Self::Controlled(Unitary::X, c, t) }

    /// Return `true` if `self` is `Single`.
    pub fn is_single(&self) -> bool { matches!(self, Self::Single(..)) }

    /// Return `true` if `self` is `Controlled`.
    pub fn is_controlled(&self) -> bool { matches!(self, Self::Controlled(..)) }

    /// Return `true` if `self` is `Oracle`.
    pub fn is_oracle(&self) -> bool { matches!(self, Self::Oracle(..)) }

    /// Return `true` if `self` is `Swap`.
    pub fn is_swap(&self) -> bool { matches!(self, Self::Swap(..)) }

    /// Build a gate from a textual symbol and the qubits it acts on.
    ///
    /// Single-qubit symbols (`X`, `Y`, `Z`, `H`, `P`, `T`) take one qubit,
    /// controlled symbols (`CX`/`CNOT`, `CY`, `CZ`, `CH`, `CP`, `CT`) and
    /// `SWAP` take two, and oracle kinds (`const0`, `const1`, `bal0`, `bal1`)
    /// take two. An unrecognized symbol or wrong number of qubits is reported
    /// as [`StateError::UnknownGate`].
    pub fn parse(symbol: &str, qubits: &[usize]) -> StateResult<Self> {
        let unknown = || StateError::UnknownGate(symbol.to_string());
        match *qubits {
            [k] => symbol.parse::<Unitary>().map(|u| Self::Single(u, k)),
            [a, b] if symbol == "SWAP" => Ok(Self::Swap(a, b)),
            [a, b] => {
                if let Ok(o) = symbol.parse::<Oracle>() {
                    Ok(Self::Oracle(o, a, b))
                } else {
                    Unitary::from_controlled_symbol(symbol)
                        .map(|u| Self::Controlled(u, a, b))
                }
            },
            _ => Err(unknown()),
        }
    }
}
