use num_bigint::BigUint;
use crate::crypto_error::CryptoError;
use crate::elgamal::e_encrypt::Ciphertext;
use crate::elgamal::e_keygen::PrivateKey;
use crate::elgamal::math::{mod_inverse, mod_pow};

// ---------------------------------------------------------------------------
// Déchiffrement ElGamal :
//   s = c1^x mod p,  m = c2 · s⁻¹ mod p
//
// Composantes hors de [0, p-1] → OutOfRange.
// s non inversible (c1 = 0, ou p non premier) → NotInvertible, propagé.
// ---------------------------------------------------------------------------
pub fn e_decrypt(ct: &Ciphertext, sk: &PrivateKey) -> Result<BigUint, CryptoError> {
    decrypt_raw(&ct.c1, &ct.c2, &sk.x, &sk.p)
}

pub fn decrypt_raw(
    c1: &BigUint,
    c2: &BigUint,
    x: &BigUint,
    p: &BigUint,
) -> Result<BigUint, CryptoError> {
    if c1 >= p {
        return Err(CryptoError::OutOfRange { field: "C1", reason: format!("must be in [0, {p})") });
    }
    if c2 >= p {
        return Err(CryptoError::OutOfRange { field: "C2", reason: format!("must be in [0, {p})") });
    }

    let s = mod_pow(c1, x, p);
    let s_inv = mod_inverse(&s, p)?;

    Ok((c2 * s_inv) % p)
}
