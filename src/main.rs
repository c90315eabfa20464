// =========================================================
// Démonstration ElGamal : paramètres, clés, chiffrement
// et vérification de l'homomorphisme multiplicatif
// =========================================================

use elgamal_crypto::session::config::{DEFAULT_BATCH_SIZE, DEFAULT_MAX_MODULUS};
use elgamal_crypto::session::report::{report_to_json, session_report};
use elgamal_crypto::{CryptoError, Session, SessionConfig};

use clap::Parser;
use log::LevelFilter;
use rand::rngs::StdRng;
use std::io::{self, Write};

// Tirages d'un k libre avant d'abandonner (petits P presque épuisés)
const TIRAGES_K_MAX: usize = 64;

// ─────────────────────────────────────────────────────────
// Options de ligne de commande
// ─────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "elgamal_crypto", about = "ElGamal : clés, chiffrement, homomorphisme multiplicatif")]
struct Args {
    /// Graine de l'aléa (x, k, G reproductibles)
    #[arg(long)]
    seed: Option<u64>,

    /// Nombre de paires (message, k) en mode lot
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    batch_size: usize,

    /// Valeur maximale acceptée pour P et Q.
    /// La recherche des racines de Q est quadratique : Q = 20 000 prend déjà
    /// plusieurs secondes.
    #[arg(long, default_value_t = DEFAULT_MAX_MODULUS)]
    max_modulus: u64,

    /// Écrit le rapport de session en JSON à la sortie
    #[arg(long)]
    json: bool,

    /// -v : info, -vv : debug
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn config(&self) -> SessionConfig {
        SessionConfig {
            max_modulus: self.max_modulus,
            batch_size:  self.batch_size.max(1),
            seed:        self.seed,
        }
    }
}

// ─────────────────────────────────────────────────────────
// Journalisation : -v info, -vv debug, warn par défaut
// ─────────────────────────────────────────────────────────

fn niveau_log(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    }
}

// ─────────────────────────────────────────────────────────
// Erreur applicative centrale
//
// Unifie CryptoError, io::Error et serde_json::Error pour
// propager toutes les erreurs via ?
// ─────────────────────────────────────────────────────────

#[derive(Debug)]
enum AppError {
    Crypto(CryptoError),
    Io(io::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Crypto(e) => write!(f, "{}", e),
            AppError::Io(e)     => write!(f, "Erreur I/O : {}", e),
            AppError::Json(e)   => write!(f, "Erreur JSON : {}", e),
        }
    }
}

impl AppError {
    // Saisie corrigeable par l'utilisateur, ou échec de calcul / d'E/S
    fn libelle(&self) -> &'static str {
        match self {
            AppError::Crypto(e) if e.is_validation() => "SAISIE",
            _ => "ERREUR",
        }
    }
}

impl From<CryptoError> for AppError {
    fn from(e: CryptoError) -> Self { AppError::Crypto(e) }
}

impl From<io::Error> for AppError {
    fn from(e: io::Error) -> Self { AppError::Io(e) }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self { AppError::Json(e) }
}

// ─────────────────────────────────────────────────────────
// Point d'entrée
// ─────────────────────────────────────────────────────────

fn main() {
    let args = Args::parse();
    env_logger::Builder::new().filter_level(niveau_log(args.verbose)).init();

    let config = args.config();
    let mut rng = config.rng();
    let mut session = Session::new(config);

    loop {
        afficher_menu();
        let choix = match lire_ligne() {
            Ok(c) => c,
            Err(e) => {
                eprintln!("[FATAL] Lecture de l'entrée impossible : {}", e);
                std::process::exit(1);
            }
        };

        let res = match choix.as_str() {
            "1" => saisir_parametres(&mut session, &mut rng),
            "2" => generer_cle(&mut session, &mut rng),
            "3" => chiffrer_message(&mut session, &mut rng),
            "4" => demonstration_lot(&mut session, &mut rng),
            "5" => afficher_rapport(&session),
            "6" | "" => break,
            _   => { println!("\nChoix invalide. Veuillez choisir entre 1 et 6.\n"); continue; }
        };

        if let Err(e) = res {
            eprintln!("\n[{}] {}\n", e.libelle(), e);
        }
    }

    if args.json {
        if let Err(e) = afficher_rapport(&session) {
            eprintln!("[ERREUR] {}", e);
            std::process::exit(1);
        }
    }
    println!("\nAu revoir !\n");
}

// ─────────────────────────────────────────────────────────
// Menu et saisie
// ─────────────────────────────────────────────────────────

fn afficher_menu() {
    println!("\n╔═══════════════════════════════════════════════╗");
    println!("║   ELGAMAL : DÉMONSTRATION                     ║");
    println!("╚═══════════════════════════════════════════════╝");
    println!("\n  [1] Paramètres P, Q, G");
    println!("  [2] Génération de la clé (x → y)");
    println!("  [3] Chiffrer / déchiffrer un message");
    println!("  [4] Homomorphisme multiplicatif (lot)");
    println!("  [5] Rapport JSON");
    println!("  [6] Quitter\n");
    print!("Votre choix : ");
    io::stdout().flush().ok();
}

// Ligne vide en fin d'entrée (EOF) : traitée comme "quitter" par le menu
fn lire_ligne() -> io::Result<String> {
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

fn demander(libelle: &str) -> io::Result<String> {
    print!("  {} : ", libelle);
    io::stdout().flush()?;
    lire_ligne()
}

// ─────────────────────────────────────────────────────────
// [1] Paramètres de domaine
// ─────────────────────────────────────────────────────────

fn saisir_parametres(session: &mut Session, rng: &mut StdRng) -> Result<(), AppError> {
    let p = demander("P (premier)")?;
    session.set_p(&p)?;

    let q = demander("Q (premier)")?;
    session.set_q(&q)?;
    if let Some(hint) = session.generator_hint() {
        println!("  {}", hint);
    }

    let g = demander("G (vide = tirage aléatoire)")?;
    if g.is_empty() {
        let g = session.generate_g(rng)?;
        println!("  G tiré : {}", g);
    } else {
        session.set_g(&g)?;
    }

    if let Some(params) = session.params() {
        println!("\n  Paramètres : p = {}, q = {}, g = {}", params.p, params.q, params.g);
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────
// [2] Clé publique
// ─────────────────────────────────────────────────────────

fn generer_cle(session: &mut Session, rng: &mut StdRng) -> Result<(), AppError> {
    let mut x = demander("x secret dans [1, p-2] (vide = tirage aléatoire)")?;
    if x.is_empty() {
        x = session.generate_x(rng)?.to_string();
        println!("  x tiré (secret, non affiché)");
    }

    let pk = session.generate_key(&x)?;
    println!("\n  y = {}", pk.y);
    println!("  Clé publique : {}", pk);
    Ok(())
}

// ─────────────────────────────────────────────────────────
// [3] Chiffrement d'un message puis déchiffrement
// ─────────────────────────────────────────────────────────

fn chiffrer_message(session: &mut Session, rng: &mut StdRng) -> Result<(), AppError> {
    let message = demander("Message (0 <= m < p)")?;
    let mut k = demander("k éphémère (vide = tirage aléatoire)")?;
    if k.is_empty() {
        k = session.generate_k(rng)?.to_string();
    }

    let ct = session.encrypt(&message, &k)?;
    println!("\n  Chiffré : {}", ct);

    let plain = session.decrypt()?;
    println!("  Déchiffré : {}", plain);
    Ok(())
}

// ─────────────────────────────────────────────────────────
// [4] Lot : N chiffrements, produit, vérification
// ─────────────────────────────────────────────────────────

fn demonstration_lot(session: &mut Session, rng: &mut StdRng) -> Result<(), AppError> {
    let n = session.config().batch_size;
    println!("\n  {} paires (message, k) : k vide = tirage aléatoire\n", n);

    let mut saisies: Vec<(String, String)> = Vec::with_capacity(n);
    for i in 1..=n {
        let message = demander(&format!("Message {}", i))?;
        let mut k = demander(&format!("k{}", i))?;
        if k.is_empty() {
            // Évite aussi les k déjà proposés dans ce lot
            k = (0..TIRAGES_K_MAX)
                .map(|_| session.generate_k(rng).map(|k| k.to_string()))
                .find(|c| !matches!(c, Ok(k) if saisies.iter().any(|(_, pris)| pris == k)))
                .unwrap_or(Err(CryptoError::EphemeralReuse))?;
        }
        saisies.push((message, k));
    }

    let paires: Vec<(&str, &str)> = saisies.iter().map(|(m, k)| (m.as_str(), k.as_str())).collect();
    let lot = session.encrypt_all(&paires)?;
    for (i, entree) in lot.iter().enumerate() {
        println!("  cph{} = {}", i + 1, entree.ciphertext);
    }

    let check = session.calculate()?;
    println!("\n  Produit des messages   M = {}", check.product.message);
    println!("  Produit des chiffrés     = {}", check.product.ciphertext);
    println!("  Déchiffrement du produit = {}", check.decrypted);
    if check.verify() {
        println!("\n  \u{2714} Homomorphisme vérifié : D(∏ E(mᵢ)) = ∏ mᵢ mod p");
    } else {
        println!("\n  \u{2718} Homomorphisme non vérifié !");
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────
// [5] Rapport JSON
// ─────────────────────────────────────────────────────────

fn afficher_rapport(session: &Session) -> Result<(), AppError> {
    let json = report_to_json(&session_report(session))?;
    println!("{}", json);
    Ok(())
}
