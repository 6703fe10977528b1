//! Gaussian integers with arbitrary-precision components.
//!
//! `CZZ` is the value type for plaintext slots: a complex number whose real
//! and imaginary parts are `BigInt`s, usually carrying a fixed-point scale of
//! `2^logp`. All scheme-internal complex arithmetic (the special FFT, slot
//! grouping) runs on `CZZ` so that no floating-point error enters the
//! encoding pipeline beyond the initial rounding.

use num_bigint::BigInt;
use num_complex::Complex64;
use num_traits::{ToPrimitive, Zero};
use std::ops::{Add, Mul, Sub};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CZZ {
    pub r: BigInt,
    pub i: BigInt,
}

impl CZZ {
    pub fn new(r: BigInt, i: BigInt) -> Self {
        Self { r, i }
    }

    pub fn zero() -> Self {
        Self {
            r: BigInt::zero(),
            i: BigInt::zero(),
        }
    }

    pub fn from_i64(r: i64, i: i64) -> Self {
        Self {
            r: BigInt::from(r),
            i: BigInt::from(i),
        }
    }

    /// Rounds `v * 2^logp` into a real `CZZ`.
    pub fn from_f64(v: f64, logp: usize) -> Self {
        Self::from_complex(Complex64::new(v, 0.0), logp)
    }

    /// Rounds `z * 2^logp` componentwise.
    pub fn from_complex(z: Complex64, logp: usize) -> Self {
        let scale = (1u64 << logp) as f64;
        Self {
            r: f64_to_bigint(z.re * scale),
            i: f64_to_bigint(z.im * scale),
        }
    }

    /// Interprets the value at scale `2^logp` as a `Complex64`.
    pub fn to_complex(&self, logp: usize) -> Complex64 {
        let scale = (1u64 << logp) as f64;
        Complex64::new(
            self.r.to_f64().unwrap_or(f64::NAN) / scale,
            self.i.to_f64().unwrap_or(f64::NAN) / scale,
        )
    }

    pub fn conjugate(&self) -> Self {
        Self {
            r: self.r.clone(),
            i: -&self.i,
        }
    }

    /// Arithmetic right shift of both components (rounds toward -inf).
    pub fn shr_assign(&mut self, bits: usize) {
        self.r = &self.r >> bits;
        self.i = &self.i >> bits;
    }
}

impl Add for &CZZ {
    type Output = CZZ;

    fn add(self, rhs: &CZZ) -> CZZ {
        CZZ {
            r: &self.r + &rhs.r,
            i: &self.i + &rhs.i,
        }
    }
}

impl Sub for &CZZ {
    type Output = CZZ;

    fn sub(self, rhs: &CZZ) -> CZZ {
        CZZ {
            r: &self.r - &rhs.r,
            i: &self.i - &rhs.i,
        }
    }
}

impl Mul for &CZZ {
    type Output = CZZ;

    fn mul(self, rhs: &CZZ) -> CZZ {
        CZZ {
            r: &self.r * &rhs.r - &self.i * &rhs.i,
            i: &self.r * &rhs.i + &self.i * &rhs.r,
        }
    }
}

fn f64_to_bigint(v: f64) -> BigInt {
    // Round-half-away-from-zero, then widen. Values this large only appear
    // when logp pushes past the f64 mantissa, which Params rejects.
    BigInt::from(v.round() as i128)
}
