//! Polynomial samplers: uniform, rounded Gaussian, zero-centred ternary, and
//! fixed-Hamming-weight ternary. All take a caller-supplied RNG so tests can
//! pin seeds.

use crate::ring::{rem_centered, Poly};
use num_bigint::BigInt;
use num_traits::Zero;
use rand::seq::SliceRandom;
use rand::Rng;
use rand_distr::{Distribution, Normal};

/// Samples coefficients uniformly mod `q`, centred.
pub fn sample_uniform<R: Rng + ?Sized>(n: usize, q: &BigInt, rng: &mut R) -> Poly {
    let bits = q.bits() as usize;
    let coeffs = (0..n)
        .map(|_| rem_centered(&random_bits(bits, rng), q))
        .collect();
    Poly::from_coeffs(coeffs)
}

/// Samples rounded Gaussian coefficients with standard deviation `sigma`.
pub fn sample_gauss<R: Rng + ?Sized>(n: usize, sigma: f64, rng: &mut R) -> Poly {
    assert!(
        sigma.is_finite() && sigma > 0.0,
        "sample_gauss: sigma must be finite and positive"
    );
    let normal = Normal::new(0.0, sigma)
        .expect("sample_gauss: failed to create Normal distribution");
    let coeffs = (0..n)
        .map(|_| BigInt::from(normal.sample(rng).round() as i64))
        .collect();
    Poly::from_coeffs(coeffs)
}

/// Samples coefficients from {-1, 0, +1} with probabilities 1/4, 1/2, 1/4.
pub fn sample_zo<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Poly {
    let coeffs = (0..n)
        .map(|_| {
            if rng.random_bool(0.5) {
                BigInt::zero()
            } else if rng.random_bool(0.5) {
                BigInt::from(1)
            } else {
                BigInt::from(-1)
            }
        })
        .collect();
    Poly::from_coeffs(coeffs)
}

/// Samples a ternary polynomial with exactly `h` nonzero coefficients.
///
/// # Panics
///
/// Panics if `h > n`.
pub fn sample_hwt<R: Rng + ?Sized>(n: usize, h: usize, rng: &mut R) -> Poly {
    assert!(h <= n, "sample_hwt: Hamming weight must be <= ring degree");
    let mut poly = Poly::zero(n);
    // Shuffle indices and assign signs on the selected support.
    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(rng);
    for &idx in indices.iter().take(h) {
        poly.coeffs[idx] = if rng.random_bool(0.5) {
            BigInt::from(1)
        } else {
            BigInt::from(-1)
        };
    }
    poly
}

fn random_bits<R: Rng + ?Sized>(bits: usize, rng: &mut R) -> BigInt {
    let mut acc = BigInt::zero();
    let mut remaining = bits;
    while remaining >= 32 {
        acc = (acc << 32) + BigInt::from(rng.random::<u32>());
        remaining -= 32;
    }
    if remaining > 0 {
        let mask = (1u32 << remaining) - 1;
        acc = (acc << remaining) + BigInt::from(rng.random::<u32>() & mask);
    }
    acc
}
