use std::fmt;

use num_bigint::{BigUint, RandBigInt};
use num_traits::One;
use rand::Rng;
use rand_core::RngCore;
use zeroize::Zeroize;
use crate::crypto_error::CryptoError;
use crate::elgamal::math::{is_prime, mod_pow};
use crate::elgamal::roots::{is_primitive_root, primitive_roots, root_hint};

// Nombre de racines citées quand G est refusé
const REJECTED_G_HINT: usize = 3;

// ============================================================================
// Paramètres de domaine : P (module), Q (premier de recherche des racines), G
//
// G doit être racine primitive de Q (ensemble proposé à l'utilisateur) ET
// de P, puisque tous les calculs se font modulo P. Si P == Q les deux
// conditions coïncident.
// ============================================================================
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DomainParameters {
    pub p: BigUint,
    pub q: BigUint,
    pub g: BigUint,
}

impl DomainParameters {
    pub fn new(p: BigUint, q: BigUint, g: BigUint) -> Result<Self, CryptoError> {
        if !is_prime(&q) {
            return Err(CryptoError::InvalidPrime { field: "Q" });
        }
        let roots = primitive_roots(&q);
        Self::with_roots(p, q, g, &roots)
    }

    /// Variante qui réutilise les racines de Q déjà calculées (session).
    pub fn with_roots(
        p: BigUint,
        q: BigUint,
        g: BigUint,
        roots_of_q: &[BigUint],
    ) -> Result<Self, CryptoError> {
        if !is_prime(&p) {
            return Err(CryptoError::InvalidPrime { field: "P" });
        }
        if !is_prime(&q) {
            return Err(CryptoError::InvalidPrime { field: "Q" });
        }

        if !roots_of_q.contains(&g) {
            return Err(CryptoError::InvalidGenerator {
                roots_hint: root_hint(roots_of_q, REJECTED_G_HINT),
            });
        }

        if !is_primitive_root(&g, &p) {
            // Ne propose que les racines de Q qui engendrent aussi Z*_P
            let usable: Vec<BigUint> = roots_of_q
                .iter()
                .filter(|r| is_primitive_root(r, &p))
                .cloned()
                .collect();
            if usable.is_empty() {
                return Err(CryptoError::NoCommonGenerator);
            }
            return Err(CryptoError::InvalidGenerator {
                roots_hint: root_hint(&usable, REJECTED_G_HINT),
            });
        }

        Ok(DomainParameters { p, q, g })
    }
}

// ============================================================================
// Clé publique ElGamal : pas de données secrètes
// ============================================================================
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicKey {
    pub p: BigUint,
    pub g: BigUint,
    pub y: BigUint,
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}, {}, {}}}", self.p, self.g, self.y)
    }
}

// ============================================================================
// Helper : efface les octets internes d'un BigUint
// ============================================================================
fn zeroize_biguint(n: &mut BigUint) {
    let bits = n.bits() as usize;
    if bits > 0 {
        *n = BigUint::from_bytes_be(&vec![0u8; (bits + 7) / 8]);
    }
    *n = BigUint::default();
}

// ============================================================================
// Clé privée ElGamal : ZEROISÉE À LA DESTRUCTION
// ============================================================================
#[derive(Clone)]
pub struct PrivateKey {
    pub p: BigUint,
    pub x: BigUint,
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("p", &self.p)
            .field("x", &"<secret>")
            .finish()
    }
}

impl Zeroize for PrivateKey {
    fn zeroize(&mut self) {
        zeroize_biguint(&mut self.x);
    }
}

impl Drop for PrivateKey {
    fn drop(&mut self) {
        self.zeroize();
    }
}

// ============================================================================
// Paire de clés
// ============================================================================
#[derive(Clone, Debug)]
pub struct KeyPair {
    pub public_key: PublicKey,
    pub secret_key: PrivateKey,
}

// ============================================================================
// Génération de la clé : y = g^x mod p
//
// x est fourni par l'appelant (aucun aléa ici) et doit être dans [1, p-2] :
// x = 0 donne y = 1, x = p-1 donne aussi y = 1 (Fermat).
// ============================================================================
pub fn e_keygen(params: &DomainParameters, x: &BigUint) -> Result<KeyPair, CryptoError> {
    check_exponent("X", x, &params.p)?;

    let y = mod_pow(&params.g, x, &params.p);
    log::info!("public key generated: y = {} (mod {})", y, params.p);

    Ok(KeyPair {
        public_key: PublicKey { p: params.p.clone(), g: params.g.clone(), y },
        secret_key: PrivateKey { p: params.p.clone(), x: x.clone() },
    })
}

// Domaine commun de x et k : [1, p-2]
pub(crate) fn check_exponent(
    field: &'static str,
    value: &BigUint,
    p: &BigUint,
) -> Result<(), CryptoError> {
    let upper = exponent_upper_bound(field, p)?;
    if value < &BigUint::one() || value > &upper {
        return Err(CryptoError::OutOfRange {
            field,
            reason: format!("must be in [1, {upper}]"),
        });
    }
    Ok(())
}

fn exponent_upper_bound(field: &'static str, p: &BigUint) -> Result<BigUint, CryptoError> {
    if p < &BigUint::from(3u32) {
        return Err(CryptoError::OutOfRange {
            field,
            reason: format!("no valid exponent exists for P = {p}"),
        });
    }
    Ok(p - BigUint::from(2u32))
}

// ---------------------------------------------------------------------------
// Tirage uniforme dans [1, p-2] : pour x comme pour k
// ---------------------------------------------------------------------------
pub fn random_exponent<R: RngCore + ?Sized>(
    p: &BigUint,
    rng: &mut R,
) -> Result<BigUint, CryptoError> {
    let upper = exponent_upper_bound("P", p)?;
    Ok(rng.gen_biguint_range(&BigUint::one(), &(upper + BigUint::one())))
}

// ---------------------------------------------------------------------------
// Tirage uniforme d'un G parmi les racines primitives proposées
// ---------------------------------------------------------------------------
pub fn random_generator<R: RngCore + ?Sized>(
    roots: &[BigUint],
    rng: &mut R,
) -> Result<BigUint, CryptoError> {
    if roots.is_empty() {
        return Err(CryptoError::MissingParameter { field: "Q" });
    }
    let index = rng.gen_range(0..roots.len());
    Ok(roots[index].clone())
}
