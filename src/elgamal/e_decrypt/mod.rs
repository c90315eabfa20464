pub mod e_decrypt;

pub use e_decrypt::{decrypt_raw, e_decrypt};
