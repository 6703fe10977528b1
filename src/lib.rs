//! Approximate-arithmetic homomorphic encryption over RLWE.
//!
//! Vectors of complex numbers are packed into the slots of a ciphertext over
//! Z_q[X]/(X^N + 1); the scheme supports homomorphic addition and
//! multiplication (with relinearization), constant and monomial products,
//! slot rotation, complex conjugation, and rescaling along a ladder of
//! power-of-two moduli that tracks the remaining noise budget.

pub mod ciphertext;
pub mod czz;
pub mod encoding;
pub mod errors;
pub mod keys;
pub mod params;
pub mod ring;
pub mod sampling;
pub mod scheme;

pub use ciphertext::{Cipher, Message};
pub use czz::CZZ;
pub use encoding::{EncodingError, EncodingResult};
pub use errors::{SchemeError, SchemeResult};
pub use keys::{ConjKey, EncKey, EvalKey, KeyError, Keys, RotKey, SecretKey};
pub use params::{Params, ParamsError};
pub use ring::Poly;
pub use scheme::Scheme;
