pub mod e_encrypt;

pub use e_encrypt::{Ciphertext, EphemeralLedger};
