pub mod h_mul;
pub mod h_verify;

// Réexportations pratiques pour l'utilisateur du module
pub use h_mul::{encrypt_batch, h_mul, mul_ciphertexts, AggregateProduct, BatchEntry, CiphertextBatch};
pub use h_verify::{h_verify, HomomorphicCheck};
