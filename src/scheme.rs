//! The public homomorphic surface: encryption, decryption, and the operator
//! set (addition, multiplication with relinearization, constant and monomial
//! products, conjugation, slot rotations, and the mod-switch family that
//! walks ciphertexts down the modulus ladder).
//!
//! Level convention: a fresh ciphertext has `level = 1` and modulus
//! `qi(1) = 2^logq`; every rescaling moves one level up and strips `logp`
//! bits. Binary operators require equal levels; nothing raises a level
//! implicitly.

use crate::ciphertext::{Cipher, Message};
use crate::czz::CZZ;
use crate::encoding;
use crate::errors::{SchemeError, SchemeResult};
use crate::keys::{Keys, SecretKey};
use crate::params::Params;
use crate::ring::{self, Poly};
use crate::sampling::{sample_gauss, sample_zo};
use num_bigint::BigInt;
use rand::Rng;

pub struct Scheme<'a> {
    pub params: &'a Params,
    pub keys: &'a Keys,
}

impl<'a> Scheme<'a> {
    pub fn new(params: &'a Params, keys: &'a Keys) -> Self {
        Self { params, keys }
    }

    fn check_level(&self, level: usize) -> SchemeResult<()> {
        if level == 0 || level > self.params.levels {
            return Err(SchemeError::ExhaustedLevel {
                level,
                levels: self.params.levels,
            });
        }
        Ok(())
    }

    fn check_same_level(c1: &Cipher, c2: &Cipher) -> SchemeResult<()> {
        if c1.level != c2.level {
            return Err(SchemeError::LevelMismatch {
                left: c1.level,
                right: c2.level,
            });
        }
        Ok(())
    }

    //------------------------------------------------------------------
    // Encryption and decryption
    //------------------------------------------------------------------

    /// A fresh RLWE sample under the public key: (v*pk.ax + e1, v*pk.bx + e0)
    /// mod q, with sparse ternary v and Gaussian noise on both halves.
    fn rlwe_instance<R: Rng + ?Sized>(
        &self,
        q: &BigInt,
        rng: &mut R,
    ) -> (Poly, Poly) {
        let n = self.params.n;
        let vx = sample_zo(n, rng);
        let e0 = sample_gauss(n, self.params.sigma, rng);
        let e1 = sample_gauss(n, self.params.sigma, rng);

        let mut ax = ring::mult(&vx, &self.keys.enc.ax, q);
        ring::add_assign(&mut ax, &e1, q);
        let mut bx = ring::mult(&vx, &self.keys.enc.bx, q);
        ring::add_assign(&mut bx, &e0, q);

        (ax, bx)
    }

    pub fn encrypt_msg<R: Rng + ?Sized>(
        &self,
        msg: &Message,
        level: usize,
        rng: &mut R,
    ) -> SchemeResult<Cipher> {
        self.check_level(level)?;
        let qi = self.params.qi(level);
        let (ax, mut bx) = self.rlwe_instance(&qi, rng);
        ring::add_assign(&mut bx, &msg.mx, &qi);
        Ok(Cipher::new(ax, bx, msg.slots, level))
    }

    /// Encrypts a slot vector (power-of-two length, at most Nh entries) at
    /// the given level. Values carry the fixed-point scale 2^logp.
    pub fn encrypt<R: Rng + ?Sized>(
        &self,
        vals: &[CZZ],
        level: usize,
        rng: &mut R,
    ) -> SchemeResult<Cipher> {
        let grouped = encoding::group_idx(vals, self.params)?;
        let msg = encoding::encode(&grouped, vals.len(), self.params);
        self.encrypt_msg(&msg, level, rng)
    }

    /// Encrypts a single value into a one-slot ciphertext.
    pub fn encrypt_single<R: Rng + ?Sized>(
        &self,
        val: &CZZ,
        level: usize,
        rng: &mut R,
    ) -> SchemeResult<Cipher> {
        self.encrypt(std::slice::from_ref(val), level, rng)
    }

    pub fn decrypt_msg(&self, secret: &SecretKey, cipher: &Cipher) -> Message {
        let qi = self.params.qi(cipher.level);
        let mut mx = ring::mult(&cipher.ax, &secret.sx, &qi);
        ring::add_assign(&mut mx, &cipher.bx, &qi);
        Message::with_level(mx, cipher.slots, cipher.level)
    }

    /// Decrypts into the slot vector, still at scale 2^logp.
    pub fn decrypt(&self, secret: &SecretKey, cipher: &Cipher) -> Vec<CZZ> {
        let msg = self.decrypt_msg(secret, cipher);
        let grouped = encoding::decode(&msg, self.params);
        encoding::degroup_idx(&grouped, msg.slots, self.params)
    }

    pub fn decrypt_single(&self, secret: &SecretKey, cipher: &Cipher) -> CZZ {
        self.decrypt(secret, cipher).swap_remove(0)
    }

    //------------------------------------------------------------------
    // Additive operators
    //------------------------------------------------------------------

    pub fn add(&self, c1: &Cipher, c2: &Cipher) -> SchemeResult<Cipher> {
        Self::check_same_level(c1, c2)?;
        let qi = self.params.qi(c1.level);
        Ok(Cipher::new(
            ring::add(&c1.ax, &c2.ax, &qi),
            ring::add(&c1.bx, &c2.bx, &qi),
            c1.slots,
            c1.level,
        ))
    }

    pub fn add_assign(&self, c1: &mut Cipher, c2: &Cipher) -> SchemeResult<()> {
        Self::check_same_level(c1, c2)?;
        let qi = self.params.qi(c1.level);
        ring::add_assign(&mut c1.ax, &c2.ax, &qi);
        ring::add_assign(&mut c1.bx, &c2.bx, &qi);
        Ok(())
    }

    pub fn sub(&self, c1: &Cipher, c2: &Cipher) -> SchemeResult<Cipher> {
        Self::check_same_level(c1, c2)?;
        let qi = self.params.qi(c1.level);
        Ok(Cipher::new(
            ring::sub(&c1.ax, &c2.ax, &qi),
            ring::sub(&c1.bx, &c2.bx, &qi),
            c1.slots,
            c1.level,
        ))
    }

    pub fn sub_assign(&self, c1: &mut Cipher, c2: &Cipher) -> SchemeResult<()> {
        Self::check_same_level(c1, c2)?;
        let qi = self.params.qi(c1.level);
        ring::sub_assign(&mut c1.ax, &c2.ax, &qi);
        ring::sub_assign(&mut c1.bx, &c2.bx, &qi);
        Ok(())
    }

    /// Adds an integer constant (at the caller's scale) to the free
    /// coefficient; all slots shift by the same amount.
    pub fn add_const(&self, cipher: &Cipher, cnst: &BigInt) -> Cipher {
        let mut res = cipher.clone();
        self.add_const_assign(&mut res, cnst);
        res
    }

    pub fn add_const_assign(&self, cipher: &mut Cipher, cnst: &BigInt) {
        let qi = self.params.qi(cipher.level);
        cipher.bx.coeffs[0] =
            ring::rem_centered(&(&cipher.bx.coeffs[0] + cnst), &qi);
    }

    //------------------------------------------------------------------
    // Multiplicative operators
    //------------------------------------------------------------------

    /// Homomorphic product with relinearization. The output keeps the input
    /// level but its plaintext scale doubles; follow with `mod_switch_one`
    /// to return to scale 2^logp.
    pub fn mult(&self, c1: &Cipher, c2: &Cipher) -> SchemeResult<Cipher> {
        Self::check_same_level(c1, c2)?;
        let qi = self.params.qi(c1.level);
        let pqi = self.params.pqi(c1.level);

        // Karatsuba-style tensor: three ring products instead of four.
        let mut axbx1 = ring::add(&c1.ax, &c1.bx, &qi);
        let axbx2 = ring::add(&c2.ax, &c2.bx, &qi);
        ring::mult_assign(&mut axbx1, &axbx2, &qi);

        let bxbx = ring::mult(&c1.bx, &c2.bx, &qi);
        let axax = ring::mult(&c1.ax, &c2.ax, &qi);

        // Switch the quadratic term back under s via the evaluation key,
        // working mod P*q and dividing by P afterwards.
        let mut ax = ring::mult(&axax, &self.keys.eval.ax_star, &pqi);
        let mut bx = ring::mult(&axax, &self.keys.eval.bx_star, &pqi);
        ring::right_shift_assign(&mut ax, self.params.log_p_special);
        ring::right_shift_assign(&mut bx, self.params.log_p_special);

        ring::add_assign(&mut ax, &axbx1, &qi);
        ring::sub_assign(&mut ax, &bxbx, &qi);
        ring::sub_assign(&mut ax, &axax, &qi);
        ring::add_assign(&mut bx, &bxbx, &qi);

        Ok(Cipher::new(ax, bx, c1.slots, c1.level))
    }

    pub fn mult_assign(&self, c1: &mut Cipher, c2: &Cipher) -> SchemeResult<()> {
        *c1 = self.mult(c1, c2)?;
        Ok(())
    }

    /// `mult` followed by one rescaling; the usual step of a circuit.
    pub fn mult_and_mod_switch_one(
        &self,
        c1: &Cipher,
        c2: &Cipher,
    ) -> SchemeResult<Cipher> {
        let prod = self.mult(c1, c2)?;
        self.mod_switch_one(&prod)
    }

    /// Squaring: the d1 cross term is 2*a*b, one ring product cheaper than
    /// a general `mult`.
    pub fn square(&self, cipher: &Cipher) -> Cipher {
        let qi = self.params.qi(cipher.level);
        let pqi = self.params.pqi(cipher.level);

        let bxbx = ring::square(&cipher.bx, &qi);
        let mut axbx = ring::mult(&cipher.ax, &cipher.bx, &qi);
        ring::double_assign(&mut axbx, self.params.log_qi(cipher.level));
        let axax = ring::square(&cipher.ax, &qi);

        let mut ax = ring::mult(&axax, &self.keys.eval.ax_star, &pqi);
        let mut bx = ring::mult(&axax, &self.keys.eval.bx_star, &pqi);
        ring::right_shift_assign(&mut ax, self.params.log_p_special);
        ring::right_shift_assign(&mut bx, self.params.log_p_special);

        ring::add_assign(&mut ax, &axbx, &qi);
        ring::add_assign(&mut bx, &bxbx, &qi);

        Cipher::new(ax, bx, cipher.slots, cipher.level)
    }

    pub fn square_assign(&self, cipher: &mut Cipher) {
        *cipher = self.square(cipher);
    }

    /// Scales every slot by an integer constant at the caller's scale.
    pub fn mult_by_const(&self, cipher: &Cipher, cnst: &BigInt) -> Cipher {
        let qi = self.params.qi(cipher.level);
        Cipher::new(
            ring::mult_by_const(&cipher.ax, cnst, &qi),
            ring::mult_by_const(&cipher.bx, cnst, &qi),
            cipher.slots,
            cipher.level,
        )
    }

    pub fn mult_by_const_assign(&self, cipher: &mut Cipher, cnst: &BigInt) {
        let qi = self.params.qi(cipher.level);
        ring::mult_by_const_assign(&mut cipher.ax, cnst, &qi);
        ring::mult_by_const_assign(&mut cipher.bx, cnst, &qi);
    }

    pub fn mult_by_monomial(&self, cipher: &Cipher, degree: usize) -> Cipher {
        Cipher::new(
            ring::mult_by_monomial(&cipher.ax, degree),
            ring::mult_by_monomial(&cipher.bx, degree),
            cipher.slots,
            cipher.level,
        )
    }

    pub fn mult_by_monomial_assign(&self, cipher: &mut Cipher, degree: usize) {
        ring::mult_by_monomial_assign(&mut cipher.ax, degree);
        ring::mult_by_monomial_assign(&mut cipher.bx, degree);
    }

    /// Multiplies every slot by the imaginary unit (the X^Nh monomial).
    pub fn imult(&self, cipher: &Cipher) -> Cipher {
        self.mult_by_monomial(cipher, self.params.nh)
    }

    pub fn imult_assign(&self, cipher: &mut Cipher) {
        self.mult_by_monomial_assign(cipher, self.params.nh);
    }

    /// Multiplies both polynomials by 2^bits, staying mod qi(level).
    pub fn left_shift(&self, cipher: &Cipher, bits: usize) -> Cipher {
        let log_qi = self.params.log_qi(cipher.level);
        Cipher::new(
            ring::left_shift(&cipher.ax, bits, log_qi),
            ring::left_shift(&cipher.bx, bits, log_qi),
            cipher.slots,
            cipher.level,
        )
    }

    pub fn left_shift_assign(&self, cipher: &mut Cipher, bits: usize) {
        let log_qi = self.params.log_qi(cipher.level);
        ring::left_shift_assign(&mut cipher.ax, bits, log_qi);
        ring::left_shift_assign(&mut cipher.bx, bits, log_qi);
    }

    pub fn double_assign(&self, cipher: &mut Cipher) {
        self.left_shift_assign(cipher, 1);
    }

    //------------------------------------------------------------------
    // Conjugation and rotations
    //------------------------------------------------------------------

    /// Conjugates every slot: apply X -> X^(-1) to both halves, then switch
    /// the permuted ax back under s through the conjugation key.
    pub fn conjugate(&self, cipher: &Cipher) -> Cipher {
        let qi = self.params.qi(cipher.level);
        let pqi = self.params.pqi(cipher.level);

        let bx_conj = ring::conjugate(&cipher.bx);
        let ax_conj = ring::conjugate(&cipher.ax);

        let mut ax = ring::mult(&ax_conj, &self.keys.conj.ax, &pqi);
        let mut bx = ring::mult(&ax_conj, &self.keys.conj.bx, &pqi);
        ring::right_shift_assign(&mut ax, self.params.log_p_special);
        ring::right_shift_assign(&mut bx, self.params.log_p_special);

        ring::add_assign(&mut bx, &bx_conj, &qi);
        ring::truncate_assign(&mut ax, self.params.log_qi(cipher.level));

        Cipher::new(ax, bx, cipher.slots, cipher.level)
    }

    pub fn conjugate_assign(&self, cipher: &mut Cipher) {
        *cipher = self.conjugate(cipher);
    }

    /// Rotates the slot vector left by 2^log_pow positions: the
    /// corresponding ring automorphism on both halves, then a key switch
    /// through the matching rotation key.
    pub fn left_rotate_by_po2(
        &self,
        cipher: &Cipher,
        log_pow: usize,
    ) -> SchemeResult<Cipher> {
        if log_pow >= self.params.log_nh {
            return Err(SchemeError::InvalidRotation {
                log_pow,
                log_nh: self.params.log_nh,
            });
        }
        let qi = self.params.qi(cipher.level);
        let pqi = self.params.pqi(cipher.level);
        let t = self.params.rot_group[self.params.log_nh][1 << log_pow];
        let key = &self.keys.rot[log_pow];

        let bx_rot = ring::inpower(&cipher.bx, t, &qi);
        let ax_rot = ring::inpower(&cipher.ax, t, &qi);

        let mut ax = ring::mult(&ax_rot, &key.ax, &pqi);
        let mut bx = ring::mult(&ax_rot, &key.bx, &pqi);
        ring::right_shift_assign(&mut ax, self.params.log_p_special);
        ring::right_shift_assign(&mut bx, self.params.log_p_special);

        ring::add_assign(&mut bx, &bx_rot, &qi);
        ring::truncate_assign(&mut ax, self.params.log_qi(cipher.level));

        Ok(Cipher::new(ax, bx, cipher.slots, cipher.level))
    }

    pub fn left_rotate_by_po2_assign(
        &self,
        cipher: &mut Cipher,
        log_pow: usize,
    ) -> SchemeResult<()> {
        *cipher = self.left_rotate_by_po2(cipher, log_pow)?;
        Ok(())
    }

    /// Rotates left by an arbitrary step count, composing power-of-two
    /// rotations over the set bits (automorphisms commute, so the order is
    /// immaterial). A zero step is the identity.
    pub fn left_rotate(&self, cipher: &Cipher, steps: usize) -> SchemeResult<Cipher> {
        let mut res = cipher.clone();
        self.left_rotate_assign(&mut res, steps)?;
        Ok(res)
    }

    pub fn left_rotate_assign(
        &self,
        cipher: &mut Cipher,
        steps: usize,
    ) -> SchemeResult<()> {
        let steps = steps % self.params.nh;
        let mut log_pow = 0;
        while (1 << log_pow) <= steps {
            if steps & (1 << log_pow) != 0 {
                self.left_rotate_by_po2_assign(cipher, log_pow)?;
            }
            log_pow += 1;
        }
        Ok(())
    }

    pub fn right_rotate(&self, cipher: &Cipher, steps: usize) -> SchemeResult<Cipher> {
        let steps = steps % self.params.nh;
        let left = (self.params.nh - steps) % self.params.nh;
        self.left_rotate(cipher, left)
    }

    pub fn right_rotate_assign(
        &self,
        cipher: &mut Cipher,
        steps: usize,
    ) -> SchemeResult<()> {
        let steps = steps % self.params.nh;
        let left = (self.params.nh - steps) % self.params.nh;
        self.left_rotate_assign(cipher, left)
    }

    //------------------------------------------------------------------
    // Level management
    //------------------------------------------------------------------

    /// Rescales toward exhaustion: divides both halves by
    /// 2^(logp * (new_level - level)) and adopts the smaller modulus.
    pub fn mod_switch(&self, cipher: &Cipher, new_level: usize) -> SchemeResult<Cipher> {
        let mut res = cipher.clone();
        self.mod_switch_assign(&mut res, new_level)?;
        Ok(res)
    }

    pub fn mod_switch_assign(
        &self,
        cipher: &mut Cipher,
        new_level: usize,
    ) -> SchemeResult<()> {
        if new_level <= cipher.level {
            return Err(SchemeError::LevelNotAdvancing {
                from: cipher.level,
                to: new_level,
            });
        }
        self.check_level(new_level)?;
        let log_df = self.params.logp * (new_level - cipher.level);
        ring::right_shift_assign(&mut cipher.ax, log_df);
        ring::right_shift_assign(&mut cipher.bx, log_df);
        cipher.level = new_level;
        Ok(())
    }

    pub fn mod_switch_one(&self, cipher: &Cipher) -> SchemeResult<Cipher> {
        self.mod_switch(cipher, cipher.level + 1)
    }

    pub fn mod_switch_one_assign(&self, cipher: &mut Cipher) -> SchemeResult<()> {
        self.mod_switch_assign(cipher, cipher.level + 1)
    }

    /// Drops to a smaller modulus without rescaling: truncates both halves
    /// into the range of qi(new_level). The plaintext scale is unchanged.
    pub fn mod_embed(&self, cipher: &Cipher, new_level: usize) -> SchemeResult<Cipher> {
        let mut res = cipher.clone();
        self.mod_embed_assign(&mut res, new_level)?;
        Ok(res)
    }

    pub fn mod_embed_assign(
        &self,
        cipher: &mut Cipher,
        new_level: usize,
    ) -> SchemeResult<()> {
        if new_level <= cipher.level {
            return Err(SchemeError::LevelNotAdvancing {
                from: cipher.level,
                to: new_level,
            });
        }
        self.check_level(new_level)?;
        let new_log_qi = self.params.log_qi(new_level);
        ring::truncate_assign(&mut cipher.ax, new_log_qi);
        ring::truncate_assign(&mut cipher.bx, new_log_qi);
        cipher.level = new_level;
        Ok(())
    }
}
