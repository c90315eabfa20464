use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};

// ---------------------------------------------------------------------------
// Ordre multiplicatif de r modulo m, par multiplications successives :
// part de r^1, multiplie par r jusqu'à retomber sur 1.
//
// Retourne None si la suite tombe sur 0 ou ne revient pas à 1 en m-1 pas
// (r non inversible, m non premier) : la boucle reste bornée.
// ---------------------------------------------------------------------------
pub fn multiplicative_order(r: &BigUint, m: &BigUint) -> Option<BigUint> {
    if m <= &BigUint::one() {
        return None;
    }

    // r non inversible mod m : pas d'ordre
    if !r.gcd(m).is_one() {
        return None;
    }

    let bound = m - BigUint::one();
    let mut value = r % m;
    let mut order = BigUint::one();

    while !value.is_one() {
        if value.is_zero() || order >= bound {
            return None;
        }
        value = (&value * r) % m;
        order += 1u32;
    }
    Some(order)
}

// ---------------------------------------------------------------------------
// Racines primitives d'un premier, dans l'ordre croissant, sans doublon.
//
// Candidats 2..prime-1 : r est racine primitive si son ordre vaut prime-1.
// Pré-condition : prime est premier (non revérifié ici).
// Coût O(prime²) : réservé aux petits premiers de démonstration.
// ---------------------------------------------------------------------------
pub fn primitive_roots(prime: &BigUint) -> Vec<BigUint> {
    let mut roots = Vec::new();
    if prime <= &BigUint::from(2u32) {
        return roots;
    }

    let target = prime - BigUint::one();
    let mut r = BigUint::from(2u32);
    while &r < prime {
        if multiplicative_order(&r, prime).as_ref() == Some(&target) {
            roots.push(r.clone());
        }
        r += 1u32;
    }

    log::debug!("{} primitive roots found modulo {}", roots.len(), prime);
    roots
}

/// Vérifie un seul candidat sans énumérer toutes les racines.
pub fn is_primitive_root(candidate: &BigUint, prime: &BigUint) -> bool {
    if candidate <= &BigUint::one() || candidate >= prime {
        return false;
    }
    let target = prime - BigUint::one();
    multiplicative_order(candidate, prime).as_ref() == Some(&target)
}

// Les `count` premières racines, séparées par des virgules : "2,6,7,8"
pub fn root_hint(roots: &[BigUint], count: usize) -> String {
    roots
        .iter()
        .take(count)
        .map(|r| r.to_string())
        .collect::<Vec<_>>()
        .join(",")
}
