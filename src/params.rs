//! Scheme parameters: the power-of-two modulus ladder, rotation-group
//! tables, and the scaled root-of-unity powers consumed by the encoder.
//!
//! `Params` is built once and shared (immutably) by key generation and by
//! every `Scheme` operation.

use crate::czz::CZZ;
use num_bigint::BigInt;
use num_traits::One;
use std::f64::consts::PI;
use thiserror::Error;

/// Default standard deviation of the error distribution.
pub const DEFAULT_SIGMA: f64 = 3.2;
/// Default Hamming weight of the secret key.
pub const DEFAULT_H: usize = 64;

#[derive(Debug, Error)]
pub enum ParamsError {
    #[error("ring degree 2^{0} too small (need log_n >= 2)")]
    RingDegreeTooSmall(usize),
    #[error("modulus chain needs at least one level")]
    NoLevels,
    #[error("logq = {logq} cannot carry {levels} levels at logp = {logp}")]
    ModulusChainTooShort {
        logq: usize,
        logp: usize,
        levels: usize,
    },
    #[error("logp = {0} exceeds the f64 mantissa used for the root tables")]
    PrecisionTooLarge(usize),
}

#[derive(Debug, Clone)]
pub struct Params {
    /// Ring degree N (power of two).
    pub n: usize,
    /// Slot capacity Nh = N / 2.
    pub nh: usize,
    pub log_n: usize,
    pub log_nh: usize,
    /// Base fixed-point precision: the plaintext scale is 2^logp.
    pub logp: usize,
    /// Bit size of the freshest ciphertext modulus.
    pub logq: usize,
    /// Ladder length L; ciphertext levels run in [1, levels].
    pub levels: usize,
    /// Bit size of the special key-switching modulus P.
    pub log_p_special: usize,
    /// Error distribution standard deviation.
    pub sigma: f64,
    /// Secret key Hamming weight.
    pub h: usize,
    /// Freshest modulus q = 2^logq.
    pub q: BigInt,
    /// rot_group[k][i] = 5^i mod 2^(k+2); odd residues indexing the slots
    /// of a 2^k-slot encoding.
    pub rot_group: Vec<Vec<usize>>,
    /// rot_group_inv[k][i] = 2^(k+2) - rot_group[k][i].
    pub rot_group_inv: Vec<Vec<usize>>,
    /// ksi_pows[k][j] = round(2^logp * e^(2*pi*i*j / 2^k)) for j in 0..=2^k.
    /// The inclusive top index makes the conjugate root ksi_pows[k][2^k - j].
    pub ksi_pows: Vec<Vec<CZZ>>,
}

impl Params {
    /// Builds a parameter set with `log_p_special = logq` (the special
    /// modulus P is taken comparable to the fresh modulus, which keeps the
    /// key-switching noise below one plaintext unit after the division
    /// by P).
    pub fn new(
        log_n: usize,
        logq: usize,
        logp: usize,
        levels: usize,
    ) -> Result<Self, ParamsError> {
        if log_n < 2 {
            return Err(ParamsError::RingDegreeTooSmall(log_n));
        }
        if levels == 0 {
            return Err(ParamsError::NoLevels);
        }
        if logq < logp * levels {
            return Err(ParamsError::ModulusChainTooShort { logq, logp, levels });
        }
        if logp > 50 {
            return Err(ParamsError::PrecisionTooLarge(logp));
        }

        let n = 1usize << log_n;
        let log_nh = log_n - 1;

        let mut rot_group = Vec::with_capacity(log_nh + 1);
        let mut rot_group_inv = Vec::with_capacity(log_nh + 1);
        for k in 0..=log_nh {
            let modulus = 1usize << (k + 2);
            let mut fwd = Vec::with_capacity(1 << k);
            let mut inv = Vec::with_capacity(1 << k);
            let mut power = 1usize;
            for _ in 0..(1 << k) {
                fwd.push(power);
                inv.push(modulus - power);
                power = power * 5 % modulus;
            }
            rot_group.push(fwd);
            rot_group_inv.push(inv);
        }

        let scale = (1u64 << logp) as f64;
        let mut ksi_pows = Vec::with_capacity(log_n + 2);
        for k in 0..=log_n + 1 {
            let order = 1usize << k;
            let mut pows = Vec::with_capacity(order + 1);
            for j in 0..=order / 2 {
                let angle = 2.0 * PI * j as f64 / order as f64;
                pows.push(CZZ::new(
                    BigInt::from((scale * angle.cos()).round() as i128),
                    BigInt::from((scale * angle.sin()).round() as i128),
                ));
            }
            // The upper half mirrors the lower as exact conjugates.
            for j in order / 2 + 1..=order {
                pows.push(pows[order - j].conjugate());
            }
            ksi_pows.push(pows);
        }

        Ok(Self {
            n,
            nh: n >> 1,
            log_n,
            log_nh,
            logp,
            logq,
            levels,
            log_p_special: logq,
            sigma: DEFAULT_SIGMA,
            h: DEFAULT_H,
            q: BigInt::one() << logq,
            rot_group,
            rot_group_inv,
            ksi_pows,
        })
    }

    /// Bit size of the modulus at `level`. Level 1 is freshest; each
    /// rescaling consumes `logp` bits.
    pub fn log_qi(&self, level: usize) -> usize {
        debug_assert!(level >= 1 && level <= self.levels);
        self.logq - self.logp * (level - 1)
    }

    /// Ciphertext modulus `qi = 2^(logq - logp*(level-1))` at `level`.
    pub fn qi(&self, level: usize) -> BigInt {
        BigInt::one() << self.log_qi(level)
    }

    /// Extended modulus `P * qi` used while key-switching at `level`.
    pub fn pqi(&self, level: usize) -> BigInt {
        BigInt::one() << (self.log_p_special + self.log_qi(level))
    }
}
