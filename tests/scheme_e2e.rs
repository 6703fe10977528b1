//! End-to-end checks: encrypt, operate homomorphically, decrypt, compare
//! against plain complex arithmetic.

use heaan_ckks::{Keys, Params, Scheme, SchemeError, SecretKey, CZZ};
use num_bigint::BigInt;
use num_complex::Complex64;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

const LOGP: usize = 30;

struct Fixture {
    params: Params,
    secret: SecretKey,
    keys: Keys,
}

impl Fixture {
    fn new(seed: u64) -> Self {
        let params = Params::new(7, 150, LOGP, 5).unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let secret = SecretKey::generate(&params, &mut rng).unwrap();
        let keys = Keys::generate(&secret, &params, &mut rng).unwrap();
        Self {
            params,
            secret,
            keys,
        }
    }

    fn scheme(&self) -> Scheme<'_> {
        Scheme::new(&self.params, &self.keys)
    }
}

fn slots(vals: &[(f64, f64)]) -> Vec<CZZ> {
    vals.iter()
        .map(|&(re, im)| CZZ::from_complex(Complex64::new(re, im), LOGP))
        .collect()
}

fn assert_slots_eq(decrypted: &[CZZ], expected: &[(f64, f64)], eps: f64) {
    assert_eq!(decrypted.len(), expected.len());
    for (i, (d, &(re, im))) in decrypted.iter().zip(expected).enumerate() {
        let z = d.to_complex(LOGP);
        assert!(
            (z.re - re).abs() < eps && (z.im - im).abs() < eps,
            "slot {i}: got {z}, expected {re}+{im}i"
        );
    }
}

#[test]
fn add_then_decrypt() {
    let fx = Fixture::new(1);
    let scheme = fx.scheme();
    let mut rng = ChaCha20Rng::seed_from_u64(100);

    let c1 = scheme
        .encrypt(&slots(&[(1.0, 0.0), (2.0, 0.0)]), 1, &mut rng)
        .unwrap();
    let c2 = scheme
        .encrypt(&slots(&[(3.0, 4.0), (-1.0, 1.0)]), 1, &mut rng)
        .unwrap();

    let sum = scheme.add(&c1, &c2).unwrap();
    assert_eq!(sum.level, 1);
    assert_eq!(sum.slots, 2);
    assert_slots_eq(
        &scheme.decrypt(&fx.secret, &sum),
        &[(4.0, 4.0), (1.0, 1.0)],
        1e-4,
    );

    let diff = scheme.sub(&c1, &c2).unwrap();
    assert_slots_eq(
        &scheme.decrypt(&fx.secret, &diff),
        &[(-2.0, -4.0), (3.0, -1.0)],
        1e-4,
    );
}

#[test]
fn multiply_then_rescale() {
    let fx = Fixture::new(2);
    let scheme = fx.scheme();
    let mut rng = ChaCha20Rng::seed_from_u64(200);

    let c1 = scheme
        .encrypt(&slots(&[(1.0, 1.0), (2.0, 0.0)]), 1, &mut rng)
        .unwrap();
    let c2 = scheme
        .encrypt(&slots(&[(1.0, -1.0), (0.5, 0.0)]), 1, &mut rng)
        .unwrap();

    let prod = scheme.mult(&c1, &c2).unwrap();
    assert_eq!(prod.level, 1);
    let rescaled = scheme.mod_switch_one(&prod).unwrap();
    assert_eq!(rescaled.level, 2);

    assert_slots_eq(
        &scheme.decrypt(&fx.secret, &rescaled),
        &[(2.0, 0.0), (1.0, 0.0)],
        1e-3,
    );

    let fused = scheme.mult_and_mod_switch_one(&c1, &c2).unwrap();
    assert_eq!(fused.level, 2);
    assert_slots_eq(
        &scheme.decrypt(&fx.secret, &fused),
        &[(2.0, 0.0), (1.0, 0.0)],
        1e-3,
    );
}

#[test]
fn depth_two_squaring_circuit() {
    let fx = Fixture::new(3);
    let scheme = fx.scheme();
    let mut rng = ChaCha20Rng::seed_from_u64(300);

    let x = scheme
        .encrypt_single(&CZZ::from_f64(0.5, LOGP), 1, &mut rng)
        .unwrap();
    let y = scheme.mod_switch_one(&scheme.square(&x)).unwrap();
    let z = scheme.mod_switch_one(&scheme.square(&y)).unwrap();
    assert_eq!(z.level, 3);

    let out = scheme.decrypt_single(&fx.secret, &z).to_complex(LOGP);
    assert!(
        (out.re - 0.0625).abs() < 1e-3 && out.im.abs() < 1e-3,
        "x^4 came out as {out}"
    );
}

#[test]
fn rotation_shifts_slots_cyclically() {
    let fx = Fixture::new(4);
    let scheme = fx.scheme();
    let mut rng = ChaCha20Rng::seed_from_u64(400);

    let vals: Vec<(f64, f64)> = (1..=8).map(|v| (v as f64, 0.0)).collect();
    let cipher = scheme.encrypt(&slots(&vals), 1, &mut rng).unwrap();

    let rotated = scheme.left_rotate(&cipher, 3).unwrap();
    assert_eq!(rotated.level, 1);
    let expected: Vec<(f64, f64)> =
        (0..8).map(|i| ((1 + (i + 3) % 8) as f64, 0.0)).collect();
    assert_slots_eq(&scheme.decrypt(&fx.secret, &rotated), &expected, 1e-3);

    // A zero rotation is the identity.
    let same = scheme.left_rotate(&cipher, 0).unwrap();
    assert_slots_eq(&scheme.decrypt(&fx.secret, &same), &vals, 1e-4);

    // Rotating right by s undoes rotating left by s.
    let back = scheme.right_rotate(&rotated, 3).unwrap();
    assert_slots_eq(&scheme.decrypt(&fx.secret, &back), &vals, 1e-3);
}

#[test]
fn conjugate_flips_imaginary_parts() {
    let fx = Fixture::new(5);
    let scheme = fx.scheme();
    let mut rng = ChaCha20Rng::seed_from_u64(500);

    let cipher = scheme
        .encrypt(&slots(&[(1.0, 2.0), (3.0, -1.0)]), 1, &mut rng)
        .unwrap();
    let conj = scheme.conjugate(&cipher);
    assert_eq!(conj.level, 1);
    assert_slots_eq(
        &scheme.decrypt(&fx.secret, &conj),
        &[(1.0, -2.0), (3.0, 1.0)],
        1e-3,
    );
}

#[test]
fn constant_addition_shifts_every_slot() {
    let fx = Fixture::new(6);
    let scheme = fx.scheme();
    let mut rng = ChaCha20Rng::seed_from_u64(600);

    let cipher = scheme
        .encrypt(&slots(&[(5.0, 0.0), (7.0, 0.0)]), 1, &mut rng)
        .unwrap();
    let two = BigInt::from(2) << LOGP;
    let shifted = scheme.add_const(&cipher, &two);
    assert_slots_eq(
        &scheme.decrypt(&fx.secret, &shifted),
        &[(7.0, 0.0), (9.0, 0.0)],
        1e-4,
    );
}

#[test]
fn constant_and_monomial_products() {
    let fx = Fixture::new(7);
    let scheme = fx.scheme();
    let mut rng = ChaCha20Rng::seed_from_u64(700);

    let cipher = scheme
        .encrypt(&slots(&[(1.5, -0.5), (-2.0, 1.0)]), 1, &mut rng)
        .unwrap();

    // Integer constants multiply without consuming scale.
    let tripled = scheme.mult_by_const(&cipher, &BigInt::from(3));
    assert_slots_eq(
        &scheme.decrypt(&fx.secret, &tripled),
        &[(4.5, -1.5), (-6.0, 3.0)],
        1e-3,
    );

    // X^Nh multiplies every slot by i.
    let times_i = scheme.imult(&cipher);
    assert_slots_eq(
        &scheme.decrypt(&fx.secret, &times_i),
        &[(0.5, 1.5), (-1.0, -2.0)],
        1e-3,
    );

    let mut doubled = cipher.clone();
    scheme.double_assign(&mut doubled);
    assert_slots_eq(
        &scheme.decrypt(&fx.secret, &doubled),
        &[(3.0, -1.0), (-4.0, 2.0)],
        1e-3,
    );
}

#[test]
fn mod_embed_keeps_the_plaintext_scale() {
    let fx = Fixture::new(8);
    let scheme = fx.scheme();
    let mut rng = ChaCha20Rng::seed_from_u64(800);

    let cipher = scheme
        .encrypt(&slots(&[(2.25, -1.0), (0.5, 3.0)]), 1, &mut rng)
        .unwrap();
    let embedded = scheme.mod_embed(&cipher, 3).unwrap();
    assert_eq!(embedded.level, 3);
    assert_slots_eq(
        &scheme.decrypt(&fx.secret, &embedded),
        &[(2.25, -1.0), (0.5, 3.0)],
        1e-3,
    );
}

#[test]
fn encryption_is_randomised() {
    let fx = Fixture::new(9);
    let scheme = fx.scheme();
    let mut rng = ChaCha20Rng::seed_from_u64(900);

    let vals = slots(&[(1.0, 0.0), (2.0, 0.0)]);
    let c1 = scheme.encrypt(&vals, 1, &mut rng).unwrap();
    let c2 = scheme.encrypt(&vals, 1, &mut rng).unwrap();
    assert_ne!(c1.ax, c2.ax);
    assert_ne!(c1.bx, c2.bx);
    assert_slots_eq(
        &scheme.decrypt(&fx.secret, &c1),
        &[(1.0, 0.0), (2.0, 0.0)],
        1e-4,
    );
    assert_slots_eq(
        &scheme.decrypt(&fx.secret, &c2),
        &[(1.0, 0.0), (2.0, 0.0)],
        1e-4,
    );
}

#[test]
fn deeper_levels_encrypt_and_operate() {
    let fx = Fixture::new(10);
    let scheme = fx.scheme();
    let mut rng = ChaCha20Rng::seed_from_u64(1000);

    let c1 = scheme
        .encrypt(&slots(&[(1.0, 0.0)]), 3, &mut rng)
        .unwrap();
    let c2 = scheme
        .encrypt(&slots(&[(0.5, 0.5)]), 3, &mut rng)
        .unwrap();
    let sum = scheme.add(&c1, &c2).unwrap();
    assert_eq!(sum.level, 3);
    assert_slots_eq(&scheme.decrypt(&fx.secret, &sum), &[(1.5, 0.5)], 1e-4);
}

#[test]
fn caller_fault_preconditions_error_out() {
    let fx = Fixture::new(11);
    let scheme = fx.scheme();
    let mut rng = ChaCha20Rng::seed_from_u64(1100);

    let vals = slots(&[(1.0, 0.0), (2.0, 0.0)]);
    let fresh = scheme.encrypt(&vals, 1, &mut rng).unwrap();
    let deep = scheme.mod_switch(&fresh, 3).unwrap();

    // Mismatched levels on a binary operator.
    assert!(matches!(
        scheme.add(&fresh, &deep),
        Err(SchemeError::LevelMismatch { left: 1, right: 3 })
    ));
    assert!(matches!(
        scheme.mult(&fresh, &deep),
        Err(SchemeError::LevelMismatch { .. })
    ));

    // Rescaling past the end of the ladder.
    assert!(matches!(
        scheme.mod_switch(&fresh, 6),
        Err(SchemeError::ExhaustedLevel { level: 6, levels: 5 })
    ));
    // A mod-switch must advance the level.
    assert!(matches!(
        scheme.mod_switch(&deep, 3),
        Err(SchemeError::LevelNotAdvancing { from: 3, to: 3 })
    ));
    assert!(matches!(
        scheme.mod_embed(&deep, 2),
        Err(SchemeError::LevelNotAdvancing { from: 3, to: 2 })
    ));

    // Encrypting outside the ladder.
    assert!(matches!(
        scheme.encrypt(&vals, 0, &mut rng),
        Err(SchemeError::ExhaustedLevel { .. })
    ));
    assert!(matches!(
        scheme.encrypt(&vals, 9, &mut rng),
        Err(SchemeError::ExhaustedLevel { .. })
    ));

    // Unsupported slot counts surface at encrypt.
    let three = slots(&[(1.0, 0.0), (2.0, 0.0), (3.0, 0.0)]);
    assert!(matches!(
        scheme.encrypt(&three, 1, &mut rng),
        Err(SchemeError::Encoding(_))
    ));

    // Rotation exponent beyond the key table.
    assert!(matches!(
        scheme.left_rotate_by_po2(&fresh, fx.params.log_nh),
        Err(SchemeError::InvalidRotation { .. })
    ));
}

#[test]
fn linearity_across_random_vectors() {
    let fx = Fixture::new(12);
    let scheme = fx.scheme();
    let mut rng = ChaCha20Rng::seed_from_u64(1200);

    let vals1: Vec<(f64, f64)> = (0..4)
        .map(|i| (0.25 * i as f64 - 0.5, 0.125 * i as f64))
        .collect();
    let vals2: Vec<(f64, f64)> = (0..4)
        .map(|i| (1.0 - 0.3 * i as f64, -0.2 * i as f64))
        .collect();
    let expected: Vec<(f64, f64)> = vals1
        .iter()
        .zip(&vals2)
        .map(|(&(a, b), &(c, d))| (a + c, b + d))
        .collect();

    let c1 = scheme.encrypt(&slots(&vals1), 1, &mut rng).unwrap();
    let c2 = scheme.encrypt(&slots(&vals2), 1, &mut rng).unwrap();
    let mut acc = c1.clone();
    scheme.add_assign(&mut acc, &c2).unwrap();
    assert_slots_eq(&scheme.decrypt(&fx.secret, &acc), &expected, 1e-4);
}

#[test]
fn square_matches_mult_with_self() {
    let fx = Fixture::new(13);
    let scheme = fx.scheme();
    let mut rng = ChaCha20Rng::seed_from_u64(1300);

    let cipher = scheme
        .encrypt(&slots(&[(1.5, 0.5), (-0.75, 0.25)]), 1, &mut rng)
        .unwrap();
    let squared = scheme.mod_switch_one(&scheme.square(&cipher)).unwrap();
    let expected = [(2.0, 1.5), (0.5, -0.375)];
    assert_slots_eq(&scheme.decrypt(&fx.secret, &squared), &expected, 1e-3);

    let mult = scheme.mult_and_mod_switch_one(&cipher, &cipher).unwrap();
    assert_slots_eq(&scheme.decrypt(&fx.secret, &mult), &expected, 1e-3);
}
