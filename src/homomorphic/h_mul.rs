use num_bigint::BigUint;
use num_traits::One;
use crate::crypto_error::CryptoError;
use crate::elgamal::e_encrypt::{Ciphertext, EphemeralLedger};
use crate::elgamal::e_keygen::PublicKey;

/// Un message et son chiffré, gardés côte à côte pour l'affichage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchEntry {
    pub message:    BigUint,
    pub ciphertext: Ciphertext,
}

/// Lot ordonné de chiffrés sous une même clé.
pub type CiphertextBatch = Vec<BatchEntry>;

/// Produits composante par composante : M = ∏m, C1 = ∏c1, C2 = ∏c2 (mod p)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AggregateProduct {
    pub message:    BigUint,
    pub ciphertext: Ciphertext,
}

// ---------------------------------------------------------------------------
// Multiplication homomorphique de deux chiffrés :
//   E(m1) ⊗ E(m2) = (c1·c1', c2·c2') mod p = E(m1·m2 mod p)
// ---------------------------------------------------------------------------
pub fn mul_ciphertexts(a: &Ciphertext, b: &Ciphertext, p: &BigUint) -> Ciphertext {
    Ciphertext {
        c1: (&a.c1 * &b.c1) % p,
        c2: (&a.c2 * &b.c2) % p,
    }
}

// ---------------------------------------------------------------------------
// Agrégation d'un lot : réduction mod p à chaque produit.
// Le lot n'est pas modifié ; l'ordre n'influe pas sur le résultat.
// ---------------------------------------------------------------------------
pub fn h_mul(batch: &[BatchEntry], p: &BigUint) -> Result<AggregateProduct, CryptoError> {
    if batch.is_empty() {
        return Err(CryptoError::EmptyBatch);
    }

    let identity = AggregateProduct {
        message:    BigUint::one() % p,
        ciphertext: Ciphertext { c1: BigUint::one() % p, c2: BigUint::one() % p },
    };

    Ok(batch.iter().fold(identity, |acc, entry| AggregateProduct {
        message:    (&acc.message * &entry.message) % p,
        ciphertext: mul_ciphertexts(&acc.ciphertext, &entry.ciphertext, p),
    }))
}

// ---------------------------------------------------------------------------
// Chiffre un lot de paires (message, k) sous pk.
//
// Tout ou rien : les k sont réservés sur une copie du registre, qui ne
// remplace l'original que si toutes les paires sont valides et qu'aucun k
// n'est répété (dans le lot ou avant lui).
// ---------------------------------------------------------------------------
pub fn encrypt_batch(
    pairs: &[(BigUint, BigUint)],
    pk: &PublicKey,
    ledger: &mut EphemeralLedger,
) -> Result<CiphertextBatch, CryptoError> {
    if pairs.is_empty() {
        return Err(CryptoError::EmptyBatch);
    }

    let mut staged = ledger.clone();
    let batch = pairs
        .iter()
        .map(|(message, k)| {
            let ciphertext = staged.encrypt(message, k, pk)?;
            Ok(BatchEntry { message: message.clone(), ciphertext })
        })
        .collect::<Result<CiphertextBatch, CryptoError>>()?;

    *ledger = staged;
    log::info!("encrypted a batch of {} messages", batch.len());
    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elgamal::e_encrypt::e_encrypt::e_encrypt;
    use crate::elgamal::e_keygen::e_keygen::e_keygen;
    use crate::elgamal::e_keygen::DomainParameters;

    fn big(n: u64) -> BigUint {
        BigUint::from(n)
    }

    fn pk_23() -> PublicKey {
        let params = DomainParameters::new(big(23), big(23), big(5)).unwrap();
        e_keygen(&params, &big(6)).unwrap().public_key.clone()
    }

    fn pairs(values: &[(u64, u64)]) -> Vec<(BigUint, BigUint)> {
        values.iter().map(|&(m, k)| (big(m), big(k))).collect()
    }

    #[test]
    fn test_h_mul_products() {
        let pk = pk_23();
        let mut ledger = EphemeralLedger::new();
        let batch = encrypt_batch(&pairs(&[(3, 2), (4, 5), (7, 11)]), &pk, &mut ledger).unwrap();
        let agg = h_mul(&batch, &pk.p).unwrap();

        assert_eq!(agg.message, big(84 % 23));
        let mut c1 = big(1);
        let mut c2 = big(1);
        for e in &batch {
            c1 = c1 * &e.ciphertext.c1 % &pk.p;
            c2 = c2 * &e.ciphertext.c2 % &pk.p;
        }
        assert_eq!(agg.ciphertext, Ciphertext { c1, c2 });
    }

    #[test]
    fn test_h_mul_order_independent() {
        let pk = pk_23();
        let mut ledger = EphemeralLedger::new();
        let batch = encrypt_batch(&pairs(&[(3, 2), (4, 5), (7, 11)]), &pk, &mut ledger).unwrap();
        let mut reversed = batch.clone();
        reversed.reverse();
        assert_eq!(h_mul(&batch, &pk.p), h_mul(&reversed, &pk.p));
    }

    #[test]
    fn test_h_mul_single_entry_is_identity() {
        let pk = pk_23();
        let ct = e_encrypt(&big(9), &big(4), &pk).unwrap();
        let entry = BatchEntry { message: big(9), ciphertext: ct.clone() };
        let agg = h_mul(&[entry], &pk.p).unwrap();
        assert_eq!(agg.message, big(9));
        assert_eq!(agg.ciphertext, ct);
    }

    #[test]
    fn test_h_mul_empty_batch() {
        assert_eq!(h_mul(&[], &big(23)), Err(CryptoError::EmptyBatch));
    }

    #[test]
    fn test_encrypt_batch_rejects_duplicate_k_atomically() {
        let pk = pk_23();
        let mut ledger = EphemeralLedger::new();
        let err = encrypt_batch(&pairs(&[(3, 2), (4, 5), (7, 2)]), &pk, &mut ledger).unwrap_err();
        assert_eq!(err, CryptoError::EphemeralReuse);
        // Rien n'a été réservé
        assert!(ledger.is_empty());
        assert!(encrypt_batch(&pairs(&[(3, 2)]), &pk, &mut ledger).is_ok());
    }

    #[test]
    fn test_encrypt_batch_rejects_k_used_before() {
        let pk = pk_23();
        let mut ledger = EphemeralLedger::new();
        ledger.encrypt(&big(1), &big(5), &pk).unwrap();
        assert_eq!(
            encrypt_batch(&pairs(&[(3, 2), (4, 5)]), &pk, &mut ledger),
            Err(CryptoError::EphemeralReuse)
        );
        assert_eq!(ledger.len(), 1);
    }
}
