pub mod e_keygen;

pub use e_keygen::{DomainParameters, KeyPair, PrivateKey, PublicKey};
