use std::collections::HashSet;
use std::fmt;

use num_bigint::{BigInt, BigUint};
use crate::crypto_error::CryptoError;
use crate::elgamal::e_keygen::e_keygen::check_exponent;
use crate::elgamal::e_keygen::PublicKey;
use crate::elgamal::math::{mod_pow, true_mod};

/// Chiffré ElGamal (c1, c2), les deux composantes dans [0, p-1].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Ciphertext {
    pub c1: BigUint,
    pub c2: BigUint,
}

impl fmt::Display for Ciphertext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}, {}}}", self.c1, self.c2)
    }
}

// ---------------------------------------------------------------------------
// Chiffrement ElGamal :
//   c1 = g^k mod p
//   c2 = y^k · m  mod p
//
// Déterministe en (message, k, pk). k doit être neuf : deux messages
// chiffrés avec le même k sous la même clé révèlent m1/m2. Cette fonction
// ne garde pas de mémoire, EphemeralLedger::encrypt fait la vérification.
// ---------------------------------------------------------------------------
pub fn e_encrypt(
    message: &BigUint,
    k: &BigUint,
    pk: &PublicKey,
) -> Result<Ciphertext, CryptoError> {
    if message >= &pk.p {
        return Err(CryptoError::OutOfRange {
            field:  "Message",
            reason: format!("must be in [0, {})", pk.p),
        });
    }
    check_exponent("K", k, &pk.p)?;

    let c1 = mod_pow(&pk.g, k, &pk.p);
    let shared = mod_pow(&pk.y, k, &pk.p);
    let m = true_mod(&BigInt::from(message.clone()), &pk.p);
    let c2 = (shared * m) % &pk.p;

    log::debug!("encrypted under {}: {{{}, {}}}", pk, c1, c2);
    Ok(Ciphertext { c1, c2 })
}

// ============================================================================
// Registre des k consommés sous la clé courante
//
// On retient c1 = g^k mod p plutôt que k : g étant racine primitive de p,
// c1 détermine k mod (p-1), et aucune valeur secrète n'est conservée.
// À vider (reset) à chaque nouvelle clé.
// ============================================================================
#[derive(Debug, Default, Clone)]
pub struct EphemeralLedger {
    used: HashSet<BigUint>,
}

impl EphemeralLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Chiffre puis enregistre k ; Err(EphemeralReuse) si k a déjà servi.
    pub fn encrypt(
        &mut self,
        message: &BigUint,
        k: &BigUint,
        pk: &PublicKey,
    ) -> Result<Ciphertext, CryptoError> {
        let ct = e_encrypt(message, k, pk)?;
        self.claim(&ct)?;
        Ok(ct)
    }

    pub fn claim(&mut self, ct: &Ciphertext) -> Result<(), CryptoError> {
        if !self.used.insert(ct.c1.clone()) {
            log::warn!("rejected encryption: ephemeral k reused (c1 = {})", ct.c1);
            return Err(CryptoError::EphemeralReuse);
        }
        Ok(())
    }

    /// Vrai si un chiffré de composante c1 a déjà été émis sous la clé.
    pub fn is_used(&self, c1: &BigUint) -> bool {
        self.used.contains(c1)
    }

    pub fn reset(&mut self) {
        self.used.clear();
    }

    pub fn len(&self) -> usize {
        self.used.len()
    }

    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }
}
