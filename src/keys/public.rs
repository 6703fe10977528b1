//! Public encryption key: a fresh RLWE sample (a, b = e - a*s) mod q.

use super::SecretKey;
use crate::params::Params;
use crate::ring::{self, Poly};
use crate::sampling::{sample_gauss, sample_uniform};
use rand::Rng;

pub struct EncKey {
    pub ax: Poly,
    pub bx: Poly,
}

impl EncKey {
    pub fn generate<R: Rng + ?Sized>(
        secret: &SecretKey,
        params: &Params,
        rng: &mut R,
    ) -> Self {
        let q = params.qi(1);
        let ax = sample_uniform(params.n, &q, rng);
        let ex = sample_gauss(params.n, params.sigma, rng);

        // bx = e - a * s mod q
        let mut bx = ring::neg(&ring::mult(&ax, &secret.sx, &q), &q);
        ring::add_assign(&mut bx, &ex, &q);

        Self { ax, bx }
    }
}
