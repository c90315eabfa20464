use serde::{Deserialize, Serialize};
use num_bigint::BigUint;
use crate::elgamal::e_encrypt::Ciphertext;
use crate::elgamal::e_keygen::{DomainParameters, PublicKey};
use crate::homomorphic::{BatchEntry, HomomorphicCheck};
use crate::session::session::Session;

// ============================================================================
// Structures JSON du rapport de session
//
// Les entiers sont écrits en décimal, comme l'interface les affiche.
// Aucune valeur secrète (x, k) n'apparaît dans le rapport.
// ============================================================================

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ParametersJson {
    pub p: String,
    pub q: String,
    pub g: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PublicKeyJson {
    pub p: String,
    pub g: String,
    pub y: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CiphertextJson {
    pub c1: String,
    pub c2: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BatchEntryJson {
    pub message:    String,
    pub ciphertext: CiphertextJson,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HomomorphicJson {
    pub message_product:    String,
    pub ciphertext_product: CiphertextJson,
    pub decrypted:          String,
    pub verified:           bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct SessionReport {
    pub parameters:      Option<ParametersJson>,
    pub public_key:      Option<PublicKeyJson>,
    pub last_ciphertext: Option<CiphertextJson>,
    pub last_plaintext:  Option<String>,
    pub batch:           Vec<BatchEntryJson>,
    pub homomorphic:     Option<HomomorphicJson>,
}

// ============================================================================
// Conversion structures Rust → JSON
// ============================================================================

fn dec(value: &BigUint) -> String {
    value.to_str_radix(10)
}

pub fn parameters_to_json(params: &DomainParameters) -> ParametersJson {
    ParametersJson { p: dec(&params.p), q: dec(&params.q), g: dec(&params.g) }
}

pub fn public_key_to_json(pk: &PublicKey) -> PublicKeyJson {
    PublicKeyJson { p: dec(&pk.p), g: dec(&pk.g), y: dec(&pk.y) }
}

pub fn ciphertext_to_json(ct: &Ciphertext) -> CiphertextJson {
    CiphertextJson { c1: dec(&ct.c1), c2: dec(&ct.c2) }
}

pub fn batch_entry_to_json(entry: &BatchEntry) -> BatchEntryJson {
    BatchEntryJson {
        message:    dec(&entry.message),
        ciphertext: ciphertext_to_json(&entry.ciphertext),
    }
}

pub fn homomorphic_to_json(check: &HomomorphicCheck) -> HomomorphicJson {
    HomomorphicJson {
        message_product:    dec(&check.product.message),
        ciphertext_product: ciphertext_to_json(&check.product.ciphertext),
        decrypted:          dec(&check.decrypted),
        verified:           check.verify(),
    }
}

/// Instantané de tout ce que la session peut afficher.
pub fn session_report(session: &Session) -> SessionReport {
    SessionReport {
        parameters:      session.params().map(parameters_to_json),
        public_key:      session.public_key().map(public_key_to_json),
        last_ciphertext: session.last_ciphertext().map(ciphertext_to_json),
        last_plaintext:  session.last_plaintext().map(dec),
        batch:           session.batch().iter().map(batch_entry_to_json).collect(),
        homomorphic:     session.check().map(homomorphic_to_json),
    }
}

pub fn report_to_json(report: &SessionReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::config::SessionConfig;

    #[test]
    fn test_empty_session_report() {
        let report = session_report(&Session::new(SessionConfig::default()));
        assert_eq!(report, SessionReport::default());
    }

    #[test]
    fn test_report_after_batch() {
        let mut s = Session::new(SessionConfig::default());
        s.set_p("23").unwrap();
        s.set_q("23").unwrap();
        s.set_g("5").unwrap();
        s.generate_key("6").unwrap();
        s.encrypt("10", "3").unwrap();
        s.decrypt().unwrap();
        s.encrypt_all(&[("3", "2"), ("4", "5")]).unwrap();
        s.calculate().unwrap();

        let report = session_report(&s);
        assert_eq!(report.public_key, Some(PublicKeyJson { p: "23".into(), g: "5".into(), y: "8".into() }));
        assert_eq!(report.last_ciphertext, Some(CiphertextJson { c1: "10".into(), c2: "14".into() }));
        assert_eq!(report.last_plaintext.as_deref(), Some("10"));
        assert_eq!(report.batch.len(), 2);
        let homomorphic = report.homomorphic.clone().unwrap();
        assert_eq!(homomorphic.message_product, "12");
        assert!(homomorphic.verified);

        let json = report_to_json(&report).unwrap();
        assert!(json.contains("\"verified\": true"));
        // Le x secret n'est jamais écrit
        assert!(!json.contains("\"x\""));
    }
}
