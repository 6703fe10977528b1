use crate::ring::Poly;

/// An encoded plaintext: a polynomial carrying `slots` complex values at
/// scale 2^logp.
#[derive(Debug, Clone)]
pub struct Message {
    pub mx: Poly,
    pub slots: usize,
    pub level: usize,
}

impl Message {
    /// A freshly encoded message sits at the top of the modulus ladder.
    pub fn new(mx: Poly, slots: usize) -> Self {
        Self {
            mx,
            slots,
            level: 1,
        }
    }

    pub fn with_level(mx: Poly, slots: usize, level: usize) -> Self {
        Self { mx, slots, level }
    }
}

/// An RLWE ciphertext pair: decryption computes `bx + ax * s mod qi(level)`.
///
/// Invariants kept by every operator: `slots` never changes; `level` only
/// changes through the mod-switch family; both polynomials stay centred
/// mod `qi(level)`.
#[derive(Debug, Clone)]
pub struct Cipher {
    pub ax: Poly,
    pub bx: Poly,
    pub slots: usize,
    pub level: usize,
}

impl Cipher {
    pub fn new(ax: Poly, bx: Poly, slots: usize, level: usize) -> Self {
        Self {
            ax,
            bx,
            slots,
            level,
        }
    }
}
