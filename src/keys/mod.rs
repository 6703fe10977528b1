//! Key material: the sparse secret, the public encryption key, and the
//! key-switching keys (evaluation, conjugation, per-power-of-two rotation).
//!
//! Everything except the secret is generated at the extended modulus P*q and
//! is immutable afterwards; `Scheme` borrows the bundle.

mod public;
mod secret;
mod switching;

pub use public::EncKey;
pub use secret::SecretKey;
pub use switching::{ConjKey, EvalKey, RotKey};

use crate::params::Params;
use rand::Rng;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum KeyError {
    #[error("Hamming weight {h} exceeds ring degree {n}")]
    HammingWeightTooLarge { h: usize, n: usize },
    #[error("rotation exponent {log_pow} out of range (log_nh = {log_nh})")]
    RotationOutOfRange { log_pow: usize, log_nh: usize },
}

/// The full public key bundle a `Scheme` operates with.
pub struct Keys {
    pub enc: EncKey,
    pub eval: EvalKey,
    pub conj: ConjKey,
    /// rot[k] switches back the automorphism that rotates by 2^k slots.
    pub rot: Vec<RotKey>,
}

impl Keys {
    pub fn generate<R: Rng + ?Sized>(
        secret: &SecretKey,
        params: &Params,
        rng: &mut R,
    ) -> Result<Self, KeyError> {
        let enc = EncKey::generate(secret, params, rng);
        let eval = EvalKey::generate(secret, params, rng);
        let conj = ConjKey::generate(secret, params, rng);
        let rot = (0..params.log_nh)
            .map(|k| RotKey::generate(secret, k, params, rng))
            .collect::<Result<_, _>>()?;
        Ok(Self {
            enc,
            eval,
            conj,
            rot,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ring;
    use num_bigint::BigInt;
    use num_traits::Signed;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn small_params() -> Params {
        let mut params = Params::new(6, 90, 30, 3).unwrap();
        params.h = 16;
        params
    }

    /// b + a*s must equal the advertised payload plus a small error.
    fn assert_rlwe_relation(
        ax: &ring::Poly,
        bx: &ring::Poly,
        sx: &ring::Poly,
        payload: &ring::Poly,
        q: &BigInt,
        n: usize,
    ) {
        let mut lhs = ring::mult(ax, sx, q);
        ring::add_assign(&mut lhs, bx, q);
        let err = ring::sub(&lhs, payload, q);
        let bound = BigInt::from(64 * n as u64);
        for c in &err.coeffs {
            assert!(c.abs() < bound, "error coefficient too large: {c}");
        }
    }

    #[test]
    fn enc_key_hides_zero() {
        let params = small_params();
        let mut rng = ChaCha20Rng::seed_from_u64(9);
        let sk = SecretKey::generate(&params, &mut rng).unwrap();
        let enc = EncKey::generate(&sk, &params, &mut rng);
        let q = params.qi(1);
        assert_rlwe_relation(
            &enc.ax,
            &enc.bx,
            &sk.sx,
            &ring::Poly::zero(params.n),
            &q,
            params.n,
        );
    }

    #[test]
    fn eval_key_encrypts_scaled_secret_square() {
        let params = small_params();
        let mut rng = ChaCha20Rng::seed_from_u64(10);
        let sk = SecretKey::generate(&params, &mut rng).unwrap();
        let eval = EvalKey::generate(&sk, &params, &mut rng);
        let pq = params.pqi(1);
        let payload = ring::left_shift(
            &ring::square(&sk.sx, &pq),
            params.log_p_special,
            params.log_p_special + params.logq,
        );
        assert_rlwe_relation(&eval.ax_star, &eval.bx_star, &sk.sx, &payload, &pq, params.n);
    }

    #[test]
    fn conj_key_encrypts_scaled_conjugated_secret() {
        let params = small_params();
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        let sk = SecretKey::generate(&params, &mut rng).unwrap();
        let conj = ConjKey::generate(&sk, &params, &mut rng);
        let pq = params.pqi(1);
        let payload = ring::left_shift(
            &ring::conjugate(&sk.sx),
            params.log_p_special,
            params.log_p_special + params.logq,
        );
        assert_rlwe_relation(&conj.ax, &conj.bx, &sk.sx, &payload, &pq, params.n);
    }

    #[test]
    fn rot_keys_cover_every_power_of_two() {
        let params = small_params();
        let mut rng = ChaCha20Rng::seed_from_u64(12);
        let sk = SecretKey::generate(&params, &mut rng).unwrap();
        let keys = Keys::generate(&sk, &params, &mut rng).unwrap();
        assert_eq!(keys.rot.len(), params.log_nh);

        let pq = params.pqi(1);
        for (k, rot) in keys.rot.iter().enumerate() {
            let t = params.rot_group[params.log_nh][1 << k];
            let payload = ring::left_shift(
                &ring::inpower(&sk.sx, t, &pq),
                params.log_p_special,
                params.log_p_special + params.logq,
            );
            assert_rlwe_relation(&rot.ax, &rot.bx, &sk.sx, &payload, &pq, params.n);
        }
    }
}
