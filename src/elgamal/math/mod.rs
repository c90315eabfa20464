// Réexporte les fonctions arithmétiques de base

mod math;

pub use math::{extended_gcd, is_prime, mod_inverse, mod_pow, true_mod};
