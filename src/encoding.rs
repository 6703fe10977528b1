//! Encoding between slot vectors and plaintext polynomials.
//!
//! A length-l complex vector is doubled into a conjugate-symmetric vector of
//! 2l entries (`group_idx`), pushed through the inverse special FFT, and its
//! real outputs are spread at stride `gap = N / 2l` across an N-coefficient
//! polynomial. Decoding runs the pipeline backwards.
//!
//! The special FFT evaluates a degree-2l polynomial at the odd powers of a
//! primitive 4l-th root of unity: position j of the grouped vector holds the
//! evaluation at ksi^(2j+1). Conjugate pairs land on mirrored residues, so
//! the inverse transform of a grouped vector is real up to rounding. All
//! root multiplications use the scaled integer table `ksi_pows` and are
//! followed by an arithmetic shift of `logp` bits.

use crate::ciphertext::Message;
use crate::czz::CZZ;
use crate::params::Params;
use crate::ring::Poly;
use num_bigint::BigInt;
use thiserror::Error;

pub type EncodingResult<T> = Result<T, EncodingError>;

#[derive(Debug, Error)]
pub enum EncodingError {
    #[error("slot count {0} is not a power of two")]
    SlotsNotPowerOfTwo(usize),
    #[error("slot count {slots} exceeds capacity {max}")]
    TooManySlots { slots: usize, max: usize },
}

fn check_slots(slots: usize, params: &Params) -> EncodingResult<()> {
    if slots == 0 || !slots.is_power_of_two() {
        return Err(EncodingError::SlotsNotPowerOfTwo(slots));
    }
    if slots > params.nh {
        return Err(EncodingError::TooManySlots {
            slots,
            max: params.nh,
        });
    }
    Ok(())
}

/// Doubles `vals` into the conjugate-symmetric grouped vector: `vals[i]`
/// goes to position `(rot_group[log l][i] - 1) / 2` and its conjugate to
/// `(rot_group_inv[log l][i] - 1) / 2`.
pub fn group_idx(vals: &[CZZ], params: &Params) -> EncodingResult<Vec<CZZ>> {
    let slots = vals.len();
    check_slots(slots, params)?;
    let log_slots = slots.trailing_zeros() as usize;
    let mut grouped = vec![CZZ::zero(); 2 * slots];
    for (i, val) in vals.iter().enumerate() {
        grouped[(params.rot_group[log_slots][i] - 1) / 2] = val.clone();
        grouped[(params.rot_group_inv[log_slots][i] - 1) / 2] = val.conjugate();
    }
    Ok(grouped)
}

/// Reads the user-visible slots back out of a grouped vector.
pub fn degroup_idx(grouped: &[CZZ], slots: usize, params: &Params) -> Vec<CZZ> {
    let log_slots = slots.trailing_zeros() as usize;
    (0..slots)
        .map(|i| grouped[(params.rot_group[log_slots][i] - 1) / 2].clone())
        .collect()
}

/// Encodes a grouped vector of 2l entries into an N-coefficient plaintext.
pub fn encode(grouped: &[CZZ], slots: usize, params: &Params) -> Message {
    let double_slots = 2 * slots;
    debug_assert_eq!(grouped.len(), double_slots);
    let gap = params.n / double_slots;

    let mut vals = grouped.to_vec();
    fft_special_inv(&mut vals, &params.ksi_pows, params.logp);

    let mut mx = Poly::zero(params.n);
    for (i, v) in vals.into_iter().enumerate() {
        // Imaginary parts cancel by conjugate symmetry, up to rounding.
        mx.coeffs[i * gap] = v.r;
    }
    Message::new(mx, slots)
}

/// Decodes a message back into its grouped vector of 2l evaluations.
pub fn decode(msg: &Message, params: &Params) -> Vec<CZZ> {
    let double_slots = 2 * msg.slots;
    let gap = params.n / double_slots;
    let qi = params.qi(msg.level);

    let mut vals = Vec::with_capacity(double_slots);
    for i in 0..double_slots {
        let mut c = CZZ::new(msg.mx.coeffs[i * gap].clone(), BigInt::from(0));
        true_value(&mut c, &qi);
        vals.push(c);
    }
    fft_special(&mut vals, &params.ksi_pows, params.logp);
    vals
}

/// Centres both components of `m` into `(-q/2, q/2]`.
pub fn true_value(m: &mut CZZ, q: &BigInt) {
    center(&mut m.r, q);
    center(&mut m.i, q);
}

fn center(x: &mut BigInt, q: &BigInt) {
    let minus_q = -q;
    while (&*x << 1) > *q {
        *x -= q;
    }
    while (&*x << 1) < minus_q {
        *x += q;
    }
}

/// Forward special FFT: coefficient vector to evaluations at the odd root
/// powers, in place. `vals.len()` must be a power of two.
pub fn fft_special(vals: &mut [CZZ], ksi_pows: &[Vec<CZZ>], logp: usize) {
    let n = vals.len();
    let log_double = log2(n) + 1;
    // Twist by ksi^k so the remaining transform is an ordinary DFT.
    for (k, v) in vals.iter_mut().enumerate().skip(1) {
        *v = &*v * &ksi_pows[log_double][k];
        v.shr_assign(logp);
    }
    fft_raw(vals, ksi_pows, logp, true);
}

/// Inverse special FFT: evaluations back to coefficients, in place.
pub fn fft_special_inv(vals: &mut [CZZ], ksi_pows: &[Vec<CZZ>], logp: usize) {
    let n = vals.len();
    let log_n = log2(n);
    let log_double = log_n + 1;
    fft_raw(vals, ksi_pows, logp, false);
    for (k, v) in vals.iter_mut().enumerate() {
        v.shr_assign(log_n);
        if k > 0 {
            // Untwist with the conjugate root.
            *v = &*v * &ksi_pows[log_double][(2 * n) - k];
            v.shr_assign(logp);
        }
    }
}

/// Iterative radix-2 DFT over scaled Gaussian integers. Forward uses the
/// roots directly, inverse their conjugates; neither normalises.
fn fft_raw(vals: &mut [CZZ], ksi_pows: &[Vec<CZZ>], logp: usize, forward: bool) {
    let n = vals.len();
    debug_assert!(n.is_power_of_two());
    bit_reverse(vals);
    let mut len = 2;
    while len <= n {
        let log_len = log2(len);
        let half = len / 2;
        for block in (0..n).step_by(len) {
            for j in 0..half {
                let root = if forward {
                    &ksi_pows[log_len][j]
                } else {
                    &ksi_pows[log_len][len - j]
                };
                let u = vals[block + j].clone();
                let mut v = &vals[block + j + half] * root;
                v.shr_assign(logp);
                vals[block + j] = &u + &v;
                vals[block + j + half] = &u - &v;
            }
        }
        len <<= 1;
    }
}

fn bit_reverse(vals: &mut [CZZ]) {
    let n = vals.len();
    let mut j = 0;
    for i in 1..n {
        let mut bit = n >> 1;
        while j >= bit {
            j -= bit;
            bit >>= 1;
        }
        j += bit;
        if i < j {
            vals.swap(i, j);
        }
    }
}

fn log2(n: usize) -> usize {
    n.trailing_zeros() as usize
}
