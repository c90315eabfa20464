use rand::rngs::StdRng;
use rand::SeedableRng;

// Borne par défaut de P et Q : la recherche de racines est en O(q²),
// Q proche de 5 000 reste sous la demi-seconde
pub const DEFAULT_MAX_MODULUS: u64 = 5_000;

// Nombre de paires (message, k) du mode lot, comme sur la page d'origine
pub const DEFAULT_BATCH_SIZE: usize = 5;

/// Réglages d'une session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    /// Plus grande valeur acceptée pour P et Q.
    pub max_modulus: u64,
    /// Taille du lot proposée par l'interface.
    pub batch_size: usize,
    /// Graine optionnelle : rend x, k et G reproductibles.
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            max_modulus: DEFAULT_MAX_MODULUS,
            batch_size:  DEFAULT_BATCH_SIZE,
            seed:        None,
        }
    }
}

impl SessionConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Source d'aléa de la session : graine fixe si fournie, entropie système sinon.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_defaults() {
        let cfg = SessionConfig::default();
        assert_eq!(cfg.max_modulus, 5_000);
        assert_eq!(cfg.batch_size, 5);
        assert_eq!(cfg.seed, None);
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let cfg = SessionConfig::default().with_seed(99);
        let a: u64 = cfg.rng().gen();
        let b: u64 = cfg.rng().gen();
        assert_eq!(a, b);
    }
}
