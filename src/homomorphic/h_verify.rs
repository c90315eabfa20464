use num_bigint::BigUint;
use crate::crypto_error::CryptoError;
use crate::elgamal::e_decrypt::e_decrypt;
use crate::elgamal::e_keygen::PrivateKey;
use crate::homomorphic::h_mul::{h_mul, AggregateProduct, BatchEntry};

/// Résultat de la vérification : produit des clairs, produit des chiffrés,
/// et déchiffrement de ce dernier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HomomorphicCheck {
    pub product:   AggregateProduct,
    pub decrypted: BigUint,
}

impl HomomorphicCheck {
    /// D(∏c) == ∏m mod p
    pub fn verify(&self) -> bool {
        self.product.message == self.decrypted
    }
}

// ---------------------------------------------------------------------------
// Multiplie le lot composante par composante puis déchiffre (C1, C2).
// NotInvertible remonte tel quel : pas de verdict sans déchiffrement.
// ---------------------------------------------------------------------------
pub fn h_verify(batch: &[BatchEntry], sk: &PrivateKey) -> Result<HomomorphicCheck, CryptoError> {
    let product = h_mul(batch, &sk.p)?;
    let decrypted = e_decrypt(&product.ciphertext, sk)?;

    let check = HomomorphicCheck { product, decrypted };
    log::info!(
        "homomorphic check over {} ciphertexts: M = {}, D(C) = {}, verified = {}",
        batch.len(),
        check.product.message,
        check.decrypted,
        check.verify()
    );
    Ok(check)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elgamal::e_encrypt::e_encrypt::e_encrypt;
    use crate::elgamal::e_encrypt::{Ciphertext, EphemeralLedger};
    use crate::elgamal::e_keygen::e_keygen::e_keygen;
    use crate::elgamal::e_keygen::DomainParameters;
    use crate::elgamal::e_decrypt::decrypt_raw;
    use crate::homomorphic::h_mul::encrypt_batch;

    fn big(n: u64) -> BigUint {
        BigUint::from(n)
    }

    #[test]
    fn test_two_message_homomorphism() {
        let params = DomainParameters::new(big(23), big(23), big(5)).unwrap();
        let kp = e_keygen(&params, &big(6)).unwrap();
        let p = &kp.public_key.p;

        let a = e_encrypt(&big(4), &big(7), &kp.public_key).unwrap();
        let b = e_encrypt(&big(9), &big(13), &kp.public_key).unwrap();
        let plain = decrypt_raw(&((&a.c1 * &b.c1) % p), &((&a.c2 * &b.c2) % p), &big(6), p);
        assert_eq!(plain, Ok(big(36 % 23)));
    }

    #[test]
    fn test_batch_verifies() {
        let params = DomainParameters::new(big(1019), big(1019), big(2)).unwrap();
        let kp = e_keygen(&params, &big(321)).unwrap();
        let pairs: Vec<(BigUint, BigUint)> = [(12u64, 5u64), (400, 77), (999, 1000), (1, 3), (250, 600)]
            .iter()
            .map(|&(m, k)| (big(m), big(k)))
            .collect();

        let mut ledger = EphemeralLedger::new();
        let batch = encrypt_batch(&pairs, &kp.public_key, &mut ledger).unwrap();
        let check = h_verify(&batch, &kp.secret_key).unwrap();

        let expected = pairs.iter().fold(big(1), |acc, (m, _)| acc * m % big(1019));
        assert_eq!(check.product.message, expected);
        assert_eq!(check.decrypted, expected);
        assert!(check.verify());
    }

    #[test]
    fn test_tampered_batch_fails_verification() {
        let params = DomainParameters::new(big(23), big(23), big(5)).unwrap();
        let kp = e_keygen(&params, &big(6)).unwrap();
        let ct = e_encrypt(&big(4), &big(7), &kp.public_key).unwrap();

        // Message affiché ≠ message chiffré
        let batch = vec![BatchEntry { message: big(5), ciphertext: ct }];
        let check = h_verify(&batch, &kp.secret_key).unwrap();
        assert!(!check.verify());
    }

    #[test]
    fn test_zero_component_surfaces_not_invertible() {
        let params = DomainParameters::new(big(23), big(23), big(5)).unwrap();
        let kp = e_keygen(&params, &big(6)).unwrap();
        let batch = vec![BatchEntry {
            message:    big(3),
            ciphertext: Ciphertext { c1: big(0), c2: big(3) },
        }];
        assert!(matches!(
            h_verify(&batch, &kp.secret_key),
            Err(CryptoError::NotInvertible { .. })
        ));
    }
}
