pub mod math;
pub mod roots;
pub mod e_keygen;
pub mod e_encrypt;
pub mod e_decrypt;
