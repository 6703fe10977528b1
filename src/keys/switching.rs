//! Key-switching material. Each key is an RLWE encryption, at the extended
//! modulus P*q, of P times a transformed secret: s^2 for relinearization
//! after multiplication, the conjugated secret for slot conjugation, and one
//! automorphism image per power-of-two rotation. Dividing by P after the
//! switch shrinks the key noise below one plaintext unit.

use super::{KeyError, SecretKey};
use crate::params::Params;
use crate::ring::{self, Poly};
use crate::sampling::{sample_gauss, sample_uniform};
use num_bigint::BigInt;
use rand::Rng;

/// Relinearization key: encrypts P * s^2.
pub struct EvalKey {
    pub ax_star: Poly,
    pub bx_star: Poly,
}

/// Conjugation key: encrypts P * conj(s).
pub struct ConjKey {
    pub ax: Poly,
    pub bx: Poly,
}

/// Rotation key for 2^k slots: encrypts P * tau(s) with tau the
/// X -> X^(5^(2^k)) automorphism.
pub struct RotKey {
    pub ax: Poly,
    pub bx: Poly,
}

impl EvalKey {
    pub fn generate<R: Rng + ?Sized>(
        secret: &SecretKey,
        params: &Params,
        rng: &mut R,
    ) -> Self {
        let pq = params.pqi(1);
        let payload = ring::square(&secret.sx, &pq);
        let (ax_star, bx_star) = switching_pair(secret, payload, &pq, params, rng);
        Self { ax_star, bx_star }
    }
}

impl ConjKey {
    pub fn generate<R: Rng + ?Sized>(
        secret: &SecretKey,
        params: &Params,
        rng: &mut R,
    ) -> Self {
        let pq = params.pqi(1);
        let payload = ring::conjugate(&secret.sx);
        let (ax, bx) = switching_pair(secret, payload, &pq, params, rng);
        Self { ax, bx }
    }
}

impl RotKey {
    pub fn generate<R: Rng + ?Sized>(
        secret: &SecretKey,
        log_pow: usize,
        params: &Params,
        rng: &mut R,
    ) -> Result<Self, KeyError> {
        if log_pow >= params.log_nh {
            return Err(KeyError::RotationOutOfRange {
                log_pow,
                log_nh: params.log_nh,
            });
        }
        let pq = params.pqi(1);
        let t = params.rot_group[params.log_nh][1 << log_pow];
        let payload = ring::inpower(&secret.sx, t, &pq);
        let (ax, bx) = switching_pair(secret, payload, &pq, params, rng);
        Ok(Self { ax, bx })
    }
}

/// Builds (a, b = e - a*s + P*payload) mod P*q.
fn switching_pair<R: Rng + ?Sized>(
    secret: &SecretKey,
    payload: Poly,
    pq: &BigInt,
    params: &Params,
    rng: &mut R,
) -> (Poly, Poly) {
    let log_pq = params.log_p_special + params.logq;
    let lifted = ring::left_shift(&payload, params.log_p_special, log_pq);

    let ax = sample_uniform(params.n, pq, rng);
    let ex = sample_gauss(params.n, params.sigma, rng);

    let mut bx = ring::neg(&ring::mult(&ax, &secret.sx, pq), pq);
    ring::add_assign(&mut bx, &ex, pq);
    ring::add_assign(&mut bx, &lifted, pq);

    (ax, bx)
}
