use num_bigint::{BigInt, BigUint};
use num_traits::{One, Zero};
use crate::crypto_error::CryptoError;

// ---------------------------------------------------------------------------
// Test de primalité par division d'essai : 2..=⌊√n⌋.
// O(√n), suffisant pour les petits P et Q saisis à la main.
// ---------------------------------------------------------------------------
pub fn is_prime(n: &BigUint) -> bool {
    if n <= &BigUint::one() {
        return false;
    }

    let limit = n.sqrt();
    let mut divisor = BigUint::from(2u32);
    while divisor <= limit {
        if (n % &divisor).is_zero() {
            return false;
        }
        divisor += 1u32;
    }
    true
}

// ---------------------------------------------------------------------------
// Modulo mathématique : résultat toujours dans [0, n-1], même pour a < 0.
// Le reste natif de BigInt garde le signe du dividende, d'où ((a % n) + n) % n.
//
// Panique si n == 0 (comme l'opérateur %).
// ---------------------------------------------------------------------------
pub fn true_mod(a: &BigInt, n: &BigUint) -> BigUint {
    let n_big = BigInt::from(n.clone());
    let r = ((a % &n_big) + &n_big) % &n_big;
    r.magnitude().clone()
}

// ---------------------------------------------------------------------------
// Exponentiation modulaire rapide (carré-et-multiplie, de gauche à droite) :
// O(log exponent) multiplications, chaque étape réduite mod modulus.
//
// modulus == 1 → 0 (tout entier est congru à 0 mod 1).
// Panique si modulus == 0.
// ---------------------------------------------------------------------------
pub fn mod_pow(base: &BigUint, exponent: &BigUint, modulus: &BigUint) -> BigUint {
    if modulus.is_one() {
        return BigUint::zero();
    }

    let base = base % modulus;
    let mut result = BigUint::one();
    for i in (0..exponent.bits()).rev() {
        result = (&result * &result) % modulus;
        if exponent.bit(i) {
            result = (&result * &base) % modulus;
        }
    }
    result
}

// ---------------------------------------------------------------------------
// Calcule l'inverse modulaire de a mod n (Euclide étendu).
// Retourne Err(CryptoError::NotInvertible) si gcd(a,n) != 1 : l'erreur
// remonte jusqu'à l'appelant, aucun déchiffrement de repli n'existe.
// ---------------------------------------------------------------------------
pub fn mod_inverse(a: &BigUint, n: &BigUint) -> Result<BigUint, CryptoError> {
    if n.is_zero() {
        return Err(CryptoError::NotInvertible { value: a.clone(), modulus: n.clone() });
    }

    let (g, s, _) = extended_gcd(a, n);
    if !g.is_one() {
        return Err(CryptoError::NotInvertible { value: a.clone(), modulus: n.clone() });
    }

    Ok(true_mod(&s, n))
}

// ---------------------------------------------------------------------------
// Euclide étendu : (g, s, t) tels que a·s + b·t = g = gcd(a, b).
// ---------------------------------------------------------------------------
pub fn extended_gcd(a: &BigUint, b: &BigUint) -> (BigUint, BigInt, BigInt) {
    let (mut old_r, mut r) = (BigInt::from(a.clone()), BigInt::from(b.clone()));
    let (mut old_s, mut s) = (BigInt::one(), BigInt::zero());
    let (mut old_t, mut t) = (BigInt::zero(), BigInt::one());

    while !r.is_zero() {
        let quotient = &old_r / &r;

        let next_r = &old_r - &quotient * &r;
        old_r = std::mem::replace(&mut r, next_r);

        let next_s = &old_s - &quotient * &s;
        old_s = std::mem::replace(&mut s, next_s);

        let next_t = &old_t - &quotient * &t;
        old_t = std::mem::replace(&mut t, next_t);
    }

    // Entrées positives : old_r >= 0, la magnitude est la valeur
    (old_r.magnitude().clone(), old_s, old_t)
}
