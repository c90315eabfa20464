// ============================================================================
// Session : contexte explicite d'une démonstration ElGamal
//
// Remplace les variables globales de la page (p, q, g, x, y, c1, c2, msgs) :
// chaque onglet, test ou thread possède sa propre Session, rien n'est
// partagé. Les saisies arrivent en texte brut, sont validées ici, et les
// erreurs repartent sous forme de CryptoError affichable.
//
// Transitions (toutes remplacent la valeur précédente) :
//   P, Q  → invalident G, la clé et les chiffrés
//   G     → DomainParameters ; invalide la clé et les chiffrés
//   X     → KeyPair ; vide le registre des k et les chiffrés
// ============================================================================

use num_bigint::BigUint;
use rand_core::RngCore;
use crate::crypto_error::CryptoError;
use crate::elgamal::e_decrypt::e_decrypt;
use crate::elgamal::e_encrypt::{Ciphertext, EphemeralLedger};
use crate::elgamal::e_keygen::e_keygen::{e_keygen, random_exponent, random_generator};
use crate::elgamal::e_keygen::{DomainParameters, KeyPair, PublicKey};
use crate::elgamal::math::{is_prime, mod_pow};
use crate::elgamal::roots::{is_primitive_root, primitive_roots, root_hint};
use crate::homomorphic::{encrypt_batch, h_verify, BatchEntry, CiphertextBatch, HomomorphicCheck};
use crate::session::config::SessionConfig;
use crate::session::input::{parse_natural, verify_ceiling};

// Nombre de racines listées après validation de Q
const Q_HINT_ROOTS: usize = 10;

#[derive(Debug, Default)]
pub struct Session {
    config:          SessionConfig,
    p:               Option<BigUint>,
    q:               Option<BigUint>,
    roots_of_q:      Vec<BigUint>,
    params:          Option<DomainParameters>,
    keypair:         Option<KeyPair>,
    ledger:          EphemeralLedger,
    last_ciphertext: Option<Ciphertext>,
    last_plaintext:  Option<BigUint>,
    batch:           CiphertextBatch,
    check:           Option<HomomorphicCheck>,
}

fn rejected(err: CryptoError) -> CryptoError {
    log::warn!("input rejected: {err}");
    err
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Session { config, ..Session::default() }
    }

    // -----------------------------------------------------------------------
    // Paramètres de domaine
    // -----------------------------------------------------------------------

    /// Valide et enregistre P (premier, <= max_modulus).
    pub fn set_p(&mut self, raw: &str) -> Result<(), CryptoError> {
        let p = self.parse_prime("P", raw).map_err(rejected)?;
        if self.p.as_ref() != Some(&p) {
            log::info!("P set to {p}");
            self.p = Some(p);
            self.clear_generator();
        }
        Ok(())
    }

    /// Valide Q et calcule ses racines primitives (candidats pour G).
    pub fn set_q(&mut self, raw: &str) -> Result<&[BigUint], CryptoError> {
        let q = self.parse_prime("Q", raw).map_err(rejected)?;
        if self.q.as_ref() != Some(&q) {
            self.roots_of_q = primitive_roots(&q);
            log::info!("Q set to {q} ({} primitive roots)", self.roots_of_q.len());
            self.q = Some(q);
            self.clear_generator();
        }
        Ok(&self.roots_of_q)
    }

    /// "G" could be [2,6,7,8 ...] : aide affichée sous le champ Q.
    pub fn generator_hint(&self) -> Option<String> {
        self.q.as_ref()?;
        Some(format!(
            "\"G\" could be [{} ...]",
            root_hint(&self.roots_of_q, Q_HINT_ROOTS)
        ))
    }

    /// Valide G contre les racines de Q et de P, puis fige les paramètres.
    pub fn set_g(&mut self, raw: &str) -> Result<&DomainParameters, CryptoError> {
        let g = parse_natural("G", raw).map_err(rejected)?;
        self.install_generator(g)
    }

    /// Tire G au hasard parmi les racines de Q qui engendrent aussi Z*_P.
    pub fn generate_g<R: RngCore + ?Sized>(&mut self, rng: &mut R) -> Result<BigUint, CryptoError> {
        let q = self.q.as_ref().ok_or(CryptoError::MissingParameter { field: "Q" })?;
        let p = self.p.as_ref().ok_or(CryptoError::MissingParameter { field: "P" })?;

        let usable: Vec<BigUint> = if p == q {
            self.roots_of_q.clone()
        } else {
            self.roots_of_q.iter().filter(|r| is_primitive_root(r, p)).cloned().collect()
        };
        if usable.is_empty() {
            return Err(rejected(CryptoError::NoCommonGenerator));
        }

        let g = random_generator(&usable, rng)?;
        self.install_generator(g.clone())?;
        Ok(g)
    }

    fn install_generator(&mut self, g: BigUint) -> Result<&DomainParameters, CryptoError> {
        let q = self.q.clone().ok_or(CryptoError::MissingParameter { field: "Q" })?;
        let p = self.p.clone().ok_or(CryptoError::MissingParameter { field: "P" })?;

        let params = DomainParameters::with_roots(p, q, g, &self.roots_of_q).map_err(rejected)?;
        log::info!("domain parameters set: p = {}, q = {}, g = {}", params.p, params.q, params.g);

        self.clear_key();
        Ok(self.params.insert(params))
    }

    // -----------------------------------------------------------------------
    // Clés
    // -----------------------------------------------------------------------

    /// Propose un x uniforme dans [1, p-2] (non consommé).
    pub fn generate_x<R: RngCore + ?Sized>(&self, rng: &mut R) -> Result<BigUint, CryptoError> {
        let params = self.require_params()?;
        random_exponent(&params.p, rng)
    }

    /// y = g^x mod p ; une nouvelle clé repart avec un registre de k vide.
    pub fn generate_key(&mut self, raw_x: &str) -> Result<&PublicKey, CryptoError> {
        let x = parse_natural("X", raw_x).map_err(rejected)?;
        let keypair = e_keygen(self.require_params()?, &x).map_err(rejected)?;

        self.clear_key();
        let keypair = self.keypair.insert(keypair);
        Ok(&keypair.public_key)
    }

    // -----------------------------------------------------------------------
    // Chiffrement / déchiffrement d'un message
    // -----------------------------------------------------------------------

    /// Propose un k uniforme dans [1, p-2] encore jamais utilisé sous la clé.
    pub fn generate_k<R: RngCore + ?Sized>(&self, rng: &mut R) -> Result<BigUint, CryptoError> {
        let pk = &self.require_keypair()?.public_key;
        let available = &pk.p - BigUint::from(2u32);
        if BigUint::from(self.ledger.len()) >= available {
            return Err(CryptoError::EphemeralReuse);
        }

        loop {
            let k = random_exponent(&pk.p, rng)?;
            let c1 = mod_pow(&pk.g, &k, &pk.p);
            if !self.ledger.is_used(&c1) {
                return Ok(k);
            }
        }
    }

    pub fn encrypt(&mut self, raw_message: &str, raw_k: &str) -> Result<&Ciphertext, CryptoError> {
        let message = parse_natural("Message", raw_message).map_err(rejected)?;
        let k = parse_natural("K", raw_k).map_err(rejected)?;

        let keypair = self.keypair.as_ref().ok_or(CryptoError::MissingParameter { field: "X" })?;
        let message = verify_ceiling("Message", message, &keypair.public_key.p).map_err(rejected)?;
        let ct = self.ledger.encrypt(&message, &k, &keypair.public_key)?;

        self.last_plaintext = None;
        Ok(self.last_ciphertext.insert(ct))
    }

    /// Déchiffre le dernier chiffré produit par encrypt().
    pub fn decrypt(&mut self) -> Result<BigUint, CryptoError> {
        let keypair = self.require_keypair()?;
        let ct = self
            .last_ciphertext
            .as_ref()
            .ok_or(CryptoError::MissingParameter { field: "Cipher" })?;

        let plain = e_decrypt(ct, &keypair.secret_key)?;
        self.last_plaintext = Some(plain.clone());
        Ok(plain)
    }

    // -----------------------------------------------------------------------
    // Mode lot : chiffrement de N paires puis vérification homomorphique
    // -----------------------------------------------------------------------

    pub fn encrypt_all(&mut self, raw_pairs: &[(&str, &str)]) -> Result<&[BatchEntry], CryptoError> {
        let keypair = self.keypair.as_ref().ok_or(CryptoError::MissingParameter { field: "X" })?;
        let p = &keypair.public_key.p;

        let pairs = raw_pairs
            .iter()
            .map(|(raw_message, raw_k)| {
                let message = parse_natural("Message", raw_message)?;
                let message = verify_ceiling("Message", message, p)?;
                let k = parse_natural("K", raw_k)?;
                Ok((message, k))
            })
            .collect::<Result<Vec<_>, CryptoError>>()
            .map_err(rejected)?;

        let batch = encrypt_batch(&pairs, &keypair.public_key, &mut self.ledger)?;
        self.batch = batch;
        self.check = None;
        Ok(&self.batch)
    }

    /// Produits (M, C1, C2), déchiffrement de (C1, C2) et verdict.
    pub fn calculate(&mut self) -> Result<&HomomorphicCheck, CryptoError> {
        let keypair = self.require_keypair()?;
        if self.batch.is_empty() {
            return Err(CryptoError::EmptyBatch);
        }
        let check = h_verify(&self.batch, &keypair.secret_key)?;
        Ok(self.check.insert(check))
    }

    // -----------------------------------------------------------------------
    // Accès en lecture
    // -----------------------------------------------------------------------

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn p(&self) -> Option<&BigUint> {
        self.p.as_ref()
    }

    pub fn q(&self) -> Option<&BigUint> {
        self.q.as_ref()
    }

    pub fn roots_of_q(&self) -> &[BigUint] {
        &self.roots_of_q
    }

    pub fn params(&self) -> Option<&DomainParameters> {
        self.params.as_ref()
    }

    pub fn public_key(&self) -> Option<&PublicKey> {
        self.keypair.as_ref().map(|kp| &kp.public_key)
    }

    pub fn last_ciphertext(&self) -> Option<&Ciphertext> {
        self.last_ciphertext.as_ref()
    }

    pub fn last_plaintext(&self) -> Option<&BigUint> {
        self.last_plaintext.as_ref()
    }

    pub fn batch(&self) -> &[BatchEntry] {
        &self.batch
    }

    pub fn check(&self) -> Option<&HomomorphicCheck> {
        self.check.as_ref()
    }

    // -----------------------------------------------------------------------
    // Helpers internes
    // -----------------------------------------------------------------------

    fn parse_prime(&self, field: &'static str, raw: &str) -> Result<BigUint, CryptoError> {
        let value = parse_natural(field, raw)?;
        let ceiling = BigUint::from(self.config.max_modulus) + 1u32;
        let value = verify_ceiling(field, value, &ceiling)?;
        if !is_prime(&value) {
            return Err(CryptoError::InvalidPrime { field });
        }
        Ok(value)
    }

    fn require_params(&self) -> Result<&DomainParameters, CryptoError> {
        match (&self.params, &self.p, &self.q) {
            (Some(params), _, _) => Ok(params),
            (None, None, _) => Err(CryptoError::MissingParameter { field: "P" }),
            (None, _, None) => Err(CryptoError::MissingParameter { field: "Q" }),
            (None, _, _) => Err(CryptoError::MissingParameter { field: "G" }),
        }
    }

    fn require_keypair(&self) -> Result<&KeyPair, CryptoError> {
        self.keypair.as_ref().ok_or(CryptoError::MissingParameter { field: "X" })
    }

    fn clear_generator(&mut self) {
        self.params = None;
        self.clear_key();
    }

    // Drop de l'ancienne KeyPair → zeroization de x
    fn clear_key(&mut self) {
        self.keypair = None;
        self.ledger.reset();
        self.last_ciphertext = None;
        self.last_plaintext = None;
        self.batch.clear();
        self.check = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn big(n: u64) -> BigUint {
        BigUint::from(n)
    }

    fn ready_session() -> Session {
        let mut s = Session::new(SessionConfig::default());
        s.set_p("23").unwrap();
        s.set_q("23").unwrap();
        s.set_g("5").unwrap();
        s.generate_key("6").unwrap();
        s
    }

    #[test]
    fn test_set_p_rejects_composite_with_page_message() {
        let mut s = Session::default();
        let err = s.set_p("21").unwrap_err();
        assert_eq!(err.to_string(), "P must be a prime number");
        assert!(s.p().is_none());
    }

    #[test]
    fn test_set_p_rejects_non_numeric() {
        let mut s = Session::default();
        assert!(matches!(s.set_p("2.5"), Err(CryptoError::InvalidNumericInput { field: "P", .. })));
    }

    #[test]
    fn test_set_p_respects_max_modulus() {
        let mut s = Session::new(SessionConfig { max_modulus: 100, ..SessionConfig::default() });
        assert!(s.set_p("97").is_ok());
        assert!(matches!(s.set_p("101"), Err(CryptoError::OutOfRange { field: "P", .. })));
    }

    #[test]
    fn test_set_q_returns_roots_and_hint() {
        let mut s = Session::default();
        assert_eq!(s.set_q("11").unwrap(), &[big(2), big(6), big(7), big(8)]);
        assert_eq!(s.generator_hint().unwrap(), "\"G\" could be [2,6,7,8 ...]");
    }

    #[test]
    fn test_set_g_requires_q_and_p() {
        let mut s = Session::default();
        assert_eq!(s.set_g("5").unwrap_err(), CryptoError::MissingParameter { field: "Q" });
        s.set_q("23").unwrap();
        assert_eq!(s.set_g("5").unwrap_err(), CryptoError::MissingParameter { field: "P" });
    }

    #[test]
    fn test_set_g_rejects_non_root() {
        let mut s = Session::default();
        s.set_p("23").unwrap();
        s.set_q("23").unwrap();
        let err = s.set_g("4").unwrap_err();
        assert_eq!(
            err.to_string(),
            "\"G\" can only be chosen from primitive roots of Q [5,7,10 ...]"
        );
    }

    #[test]
    fn test_generate_g_picks_usable_root() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut s = Session::default();
        assert_eq!(s.generate_g(&mut rng), Err(CryptoError::MissingParameter { field: "Q" }));

        s.set_p("23").unwrap();
        s.set_q("11").unwrap();
        // Seul 7 est racine primitive de 11 et de 23
        assert_eq!(s.generate_g(&mut rng), Ok(big(7)));
        assert_eq!(s.params().unwrap().g, big(7));
    }

    #[test]
    fn test_generate_g_without_common_root() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut s = Session::default();
        s.set_p("23").unwrap();
        s.set_q("3").unwrap();
        let err = s.generate_g(&mut rng).unwrap_err();
        assert_eq!(err, CryptoError::NoCommonGenerator);
        assert_eq!(err.to_string(), "no primitive root of Q is a primitive root of P");
        assert_eq!(s.set_g("2").unwrap_err(), CryptoError::NoCommonGenerator);
        assert!(s.params().is_none());
    }

    #[test]
    fn test_generate_key_requires_parameters() {
        let mut s = Session::default();
        assert_eq!(s.generate_key("6").unwrap_err(), CryptoError::MissingParameter { field: "P" });
        s.set_p("23").unwrap();
        s.set_q("23").unwrap();
        assert_eq!(s.generate_key("6").unwrap_err(), CryptoError::MissingParameter { field: "G" });
    }

    #[test]
    fn test_encrypt_decrypt_cycle() {
        let mut s = ready_session();
        assert_eq!(s.public_key().unwrap().to_string(), "{23, 5, 8}");
        assert_eq!(s.encrypt("10", "3").unwrap().to_string(), "{10, 14}");
        assert_eq!(s.decrypt(), Ok(big(10)));
        assert_eq!(s.last_plaintext(), Some(&big(10)));
    }

    #[test]
    fn test_encrypt_flags_reused_k() {
        let mut s = ready_session();
        s.encrypt("10", "3").unwrap();
        assert_eq!(s.encrypt("11", "3").unwrap_err(), CryptoError::EphemeralReuse);
        // Le dernier chiffré valide reste disponible
        assert_eq!(s.decrypt(), Ok(big(10)));
    }

    #[test]
    fn test_new_key_resets_ledger() {
        let mut s = ready_session();
        s.encrypt("10", "3").unwrap();
        s.generate_key("7").unwrap();
        assert!(s.last_ciphertext().is_none());
        assert!(s.encrypt("10", "3").is_ok());
    }

    #[test]
    fn test_encrypt_rejects_message_not_below_p() {
        let mut s = ready_session();
        assert!(matches!(s.encrypt("23", "3"), Err(CryptoError::OutOfRange { field: "Message", .. })));
        assert!(matches!(s.encrypt("-1", "3"), Err(CryptoError::OutOfRange { field: "Message", .. })));
    }

    #[test]
    fn test_decrypt_without_ciphertext() {
        let mut s = ready_session();
        assert_eq!(s.decrypt(), Err(CryptoError::MissingParameter { field: "Cipher" }));
    }

    #[test]
    fn test_generate_k_avoids_used_values() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut s = Session::default();
        s.set_p("5").unwrap();
        s.set_q("5").unwrap();
        s.set_g("2").unwrap();
        s.generate_key("2").unwrap();

        // p = 5 : k ∈ {1, 2, 3}
        for _ in 0..3 {
            let k = s.generate_k(&mut rng).unwrap();
            s.encrypt("1", &k.to_string()).unwrap();
        }
        assert_eq!(s.generate_k(&mut rng), Err(CryptoError::EphemeralReuse));
    }

    #[test]
    fn test_batch_and_calculate() {
        let mut s = ready_session();
        let batch = s.encrypt_all(&[("3", "2"), ("4", "5"), ("7", "11"), ("2", "13"), ("9", "17")]).unwrap();
        assert_eq!(batch.len(), 5);

        let check = s.calculate().unwrap();
        assert_eq!(check.product.message, big(3 * 4 * 7 * 2 * 9 % 23));
        assert!(check.verify());
    }

    #[test]
    fn test_batch_errors() {
        let mut s = ready_session();
        assert_eq!(s.calculate().unwrap_err(), CryptoError::EmptyBatch);
        assert_eq!(s.encrypt_all(&[]).unwrap_err(), CryptoError::EmptyBatch);
        assert!(matches!(
            s.encrypt_all(&[("3", "2"), ("x", "5")]),
            Err(CryptoError::InvalidNumericInput { field: "Message", .. })
        ));
        assert_eq!(
            s.encrypt_all(&[("3", "2"), ("4", "2")]).unwrap_err(),
            CryptoError::EphemeralReuse
        );
        assert!(s.batch().is_empty());
    }

    #[test]
    fn test_changing_p_invalidates_key() {
        let mut s = ready_session();
        s.set_p("23").unwrap();
        assert!(s.public_key().is_some(), "same P keeps the state");
        s.set_p("47").unwrap();
        assert!(s.params().is_none());
        assert!(s.public_key().is_none());
    }

    #[test]
    fn test_sessions_are_independent() {
        let mut a = ready_session();
        let mut b = ready_session();
        a.encrypt("10", "3").unwrap();
        assert!(b.encrypt("12", "3").is_ok());
        assert_eq!(a.decrypt(), Ok(big(10)));
        assert_eq!(b.decrypt(), Ok(big(12)));
    }
}
