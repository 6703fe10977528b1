//! Secret key: a sparse ternary polynomial with coefficients in {-1, 0, 1}
//! and fixed Hamming weight taken from `Params`.

use super::KeyError;
use crate::params::Params;
use crate::ring::Poly;
use crate::sampling::sample_hwt;
use rand::Rng;

pub struct SecretKey {
    pub sx: Poly,
}

impl SecretKey {
    pub fn generate<R: Rng + ?Sized>(
        params: &Params,
        rng: &mut R,
    ) -> Result<Self, KeyError> {
        if params.h > params.n {
            return Err(KeyError::HammingWeightTooLarge {
                h: params.h,
                n: params.n,
            });
        }
        Ok(Self {
            sx: sample_hwt(params.n, params.h, rng),
        })
    }
}
