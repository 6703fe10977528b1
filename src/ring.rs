//! Polynomial arithmetic over Z_q[X]/(X^N + 1).
//!
//! Every function takes the modulus per call: the same polynomial is reduced
//! mod `qi` in ordinary operations and mod `P * qi` while key-switching, so
//! the modulus cannot live inside the value. Coefficients are kept as the
//! centred representatives in `(-q/2, q/2]` after every mod-q operation.
//!
//! Multiplication is schoolbook with the negacyclic fold (X^N = -1). The
//! right-shift family rounds toward negative infinity (`BigInt >>`), and the
//! same rule is used everywhere a rescaling divides by a power of two.

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::Zero;

/// A polynomial of degree < N; index i holds the coefficient of X^i.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Poly {
    pub coeffs: Vec<BigInt>,
}

impl Poly {
    pub fn zero(n: usize) -> Self {
        Self {
            coeffs: vec![BigInt::zero(); n],
        }
    }

    pub fn from_coeffs(coeffs: Vec<BigInt>) -> Self {
        Self { coeffs }
    }

    pub fn n(&self) -> usize {
        self.coeffs.len()
    }
}

/// Centred representative of `x` modulo `q`: the unique value in
/// `(-q/2, q/2]` congruent to `x`.
pub fn rem_centered(x: &BigInt, q: &BigInt) -> BigInt {
    let mut r = x.mod_floor(q);
    if &r << 1 > *q {
        r -= q;
    }
    r
}

pub fn add(x: &Poly, y: &Poly, q: &BigInt) -> Poly {
    debug_assert_eq!(x.n(), y.n());
    Poly {
        coeffs: x
            .coeffs
            .iter()
            .zip(&y.coeffs)
            .map(|(a, b)| rem_centered(&(a + b), q))
            .collect(),
    }
}

pub fn add_assign(x: &mut Poly, y: &Poly, q: &BigInt) {
    debug_assert_eq!(x.n(), y.n());
    for (a, b) in x.coeffs.iter_mut().zip(&y.coeffs) {
        *a = rem_centered(&(&*a + b), q);
    }
}

pub fn sub(x: &Poly, y: &Poly, q: &BigInt) -> Poly {
    debug_assert_eq!(x.n(), y.n());
    Poly {
        coeffs: x
            .coeffs
            .iter()
            .zip(&y.coeffs)
            .map(|(a, b)| rem_centered(&(a - b), q))
            .collect(),
    }
}

pub fn sub_assign(x: &mut Poly, y: &Poly, q: &BigInt) {
    debug_assert_eq!(x.n(), y.n());
    for (a, b) in x.coeffs.iter_mut().zip(&y.coeffs) {
        *a = rem_centered(&(&*a - b), q);
    }
}

pub fn neg(x: &Poly, q: &BigInt) -> Poly {
    Poly {
        coeffs: x.coeffs.iter().map(|a| rem_centered(&-a, q)).collect(),
    }
}

/// Negacyclic product. Accumulates the full 2N-1 convolution, folds the top
/// half with a sign flip, and centres once at the end.
pub fn mult(x: &Poly, y: &Poly, q: &BigInt) -> Poly {
    let n = x.n();
    debug_assert_eq!(n, y.n());
    let mut acc = vec![BigInt::zero(); 2 * n];
    for (i, a) in x.coeffs.iter().enumerate() {
        if a.is_zero() {
            continue;
        }
        for (j, b) in y.coeffs.iter().enumerate() {
            acc[i + j] += a * b;
        }
    }
    let mut coeffs = Vec::with_capacity(n);
    for k in 0..n {
        let folded = &acc[k] - &acc[k + n];
        coeffs.push(rem_centered(&folded, q));
    }
    Poly { coeffs }
}

pub fn mult_assign(x: &mut Poly, y: &Poly, q: &BigInt) {
    *x = mult(x, y, q);
}

pub fn square(x: &Poly, q: &BigInt) -> Poly {
    mult(x, x, q)
}

pub fn mult_by_const(x: &Poly, cnst: &BigInt, q: &BigInt) -> Poly {
    Poly {
        coeffs: x
            .coeffs
            .iter()
            .map(|a| rem_centered(&(a * cnst), q))
            .collect(),
    }
}

pub fn mult_by_const_assign(x: &mut Poly, cnst: &BigInt, q: &BigInt) {
    for a in &mut x.coeffs {
        *a = rem_centered(&(&*a * cnst), q);
    }
}

/// Multiplies by the monomial X^degree, flipping signs on the negacyclic
/// wrap-around. No modulus reduction; the permutation preserves centring.
pub fn mult_by_monomial(x: &Poly, degree: usize) -> Poly {
    let n = x.n();
    let shift = degree % (2 * n);
    let mut coeffs = vec![BigInt::zero(); n];
    for (i, a) in x.coeffs.iter().enumerate() {
        let pos = (i + shift) % (2 * n);
        if pos < n {
            coeffs[pos] = a.clone();
        } else {
            coeffs[pos - n] = -a;
        }
    }
    Poly { coeffs }
}

pub fn mult_by_monomial_assign(x: &mut Poly, degree: usize) {
    *x = mult_by_monomial(x, degree);
}

/// The X -> X^(-1) permutation (complex conjugation of the slots). No
/// modulus reduction, matching the other permutations.
pub fn conjugate(x: &Poly) -> Poly {
    let n = x.n();
    let mut coeffs = vec![BigInt::zero(); n];
    coeffs[0] = x.coeffs[0].clone();
    for i in 1..n {
        coeffs[i] = -&x.coeffs[n - i];
    }
    Poly { coeffs }
}

/// Substitutes X -> X^t and reduces mod X^N + 1 and mod q. `t` must be odd
/// so that the substitution permutes the coefficient positions.
pub fn inpower(x: &Poly, t: usize, q: &BigInt) -> Poly {
    let n = x.n();
    debug_assert_eq!(t % 2, 1);
    let mut coeffs = vec![BigInt::zero(); n];
    for (i, a) in x.coeffs.iter().enumerate() {
        let pos = i * t % (2 * n);
        if pos < n {
            coeffs[pos] = rem_centered(a, q);
        } else {
            coeffs[pos - n] = rem_centered(&-a, q);
        }
    }
    Poly { coeffs }
}

/// Arithmetic right shift of every coefficient: divide by 2^bits rounding
/// toward negative infinity.
pub fn right_shift(x: &Poly, bits: usize) -> Poly {
    Poly {
        coeffs: x.coeffs.iter().map(|a| a >> bits).collect(),
    }
}

pub fn right_shift_assign(x: &mut Poly, bits: usize) {
    for a in &mut x.coeffs {
        *a = &*a >> bits;
    }
}

/// Multiplies every coefficient by 2^bits and reduces mod 2^logq. The shift
/// stays inside the declared modulus rather than growing it.
pub fn left_shift(x: &Poly, bits: usize, logq: usize) -> Poly {
    let q = BigInt::from(1) << logq;
    Poly {
        coeffs: x
            .coeffs
            .iter()
            .map(|a| rem_centered(&(a << bits), &q))
            .collect(),
    }
}

pub fn left_shift_assign(x: &mut Poly, bits: usize, logq: usize) {
    let q = BigInt::from(1) << logq;
    for a in &mut x.coeffs {
        *a = rem_centered(&(&*a << bits), &q);
    }
}

pub fn double_assign(x: &mut Poly, logq: usize) {
    left_shift_assign(x, 1, logq);
}

/// Centres every coefficient into the range of the modulus 2^logq_new.
pub fn truncate(x: &Poly, logq_new: usize) -> Poly {
    let q = BigInt::from(1) << logq_new;
    Poly {
        coeffs: x.coeffs.iter().map(|a| rem_centered(a, &q)).collect(),
    }
}

pub fn truncate_assign(x: &mut Poly, logq_new: usize) {
    let q = BigInt::from(1) << logq_new;
    for a in &mut x.coeffs {
        *a = rem_centered(&*a, &q);
    }
}
