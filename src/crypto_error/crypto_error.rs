// ===========================================================================
// Gestion centralisée des erreurs cryptographiques
//
// Tous les modules utilisent ce type au lieu de panic!/assert!/unwrap().
// Le texte Display est la raison lisible renvoyée à l'interface
// (ex. "P must be a prime number") : l'appelant l'affiche tel quel.
// ===========================================================================

use num_bigint::BigUint;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum CryptoError {
    // --- Erreurs de validation (détectées avant tout calcul) ---
    /// P ou Q échoue au test de primalité
    #[error("{field} must be a prime number")]
    InvalidPrime { field: &'static str },

    /// G n'est pas une racine primitive (de Q, ou de P)
    #[error("\"G\" can only be chosen from primitive roots of Q [{roots_hint} ...]")]
    InvalidGenerator { roots_hint: String },

    /// Aucune racine primitive de Q n'engendre Z*_P
    #[error("no primitive root of Q is a primitive root of P")]
    NoCommonGenerator,

    /// Message, exposant ou aléa hors de son domaine
    #[error("{field} is out of range: {reason}")]
    OutOfRange { field: &'static str, reason: String },

    /// Saisie non numérique, fractionnaire ou trop longue
    #[error("{field} must be an integer (got {value:?})")]
    InvalidNumericInput { field: &'static str, value: String },

    // --- Erreur mathématique, fatale pour le déchiffrement en cours ---
    /// L'inverse modulaire n'existe pas (gcd != 1)
    #[error("{value} is not invertible modulo {modulus}")]
    NotInvertible { value: BigUint, modulus: BigUint },

    // --- Erreurs d'état de session ---
    /// Opération demandée avant que ses entrées n'existent
    #[error("Please enter \"{field}\" firstly.")]
    MissingParameter { field: &'static str },

    /// Le même k a déjà servi sous cette clé
    #[error("ephemeral value k was already used under this key")]
    EphemeralReuse,

    /// Agrégation homomorphique demandée sur un lot vide
    #[error("cannot aggregate an empty batch of ciphertexts")]
    EmptyBatch,
}

impl CryptoError {
    /// Vrai pour les erreurs de saisie (corrigeables par l'utilisateur).
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CryptoError::InvalidPrime { .. }
                | CryptoError::InvalidGenerator { .. }
                | CryptoError::NoCommonGenerator
                | CryptoError::OutOfRange { .. }
                | CryptoError::InvalidNumericInput { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, CryptoError>;
