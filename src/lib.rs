// Déclaration des modules
pub mod crypto_error;
pub mod elgamal;
pub mod homomorphic;
pub mod session;

pub use crate::elgamal::math;
pub use crate::elgamal::roots;
pub use crate::elgamal::e_keygen;
pub use crate::elgamal::e_encrypt;
pub use crate::elgamal::e_decrypt;

// Fonctions mathématiques principales
pub use crate::elgamal::math::{is_prime, mod_inverse, mod_pow, true_mod};
pub use crate::elgamal::roots::primitive_roots;

// Types et opérations ElGamal
pub use e_keygen::e_keygen::{e_keygen, random_exponent, random_generator};
pub use e_keygen::{DomainParameters, KeyPair, PrivateKey, PublicKey};
pub use e_encrypt::e_encrypt::e_encrypt;
pub use e_encrypt::{Ciphertext, EphemeralLedger};
pub use e_decrypt::e_decrypt::{decrypt_raw, e_decrypt};

// Homomorphisme multiplicatif
pub use homomorphic::{h_mul, h_verify, BatchEntry, CiphertextBatch, HomomorphicCheck};

// Erreur centralisée
pub use crypto_error::{CryptoError, Result};

// Contexte de session : remplace l'état global de l'interface
pub use session::{Session, SessionConfig};
