// Hash au format Django : pbkdf2_sha256$<itérations>$<salt>$<hash base64>
// Les comptes existants gardent leurs hashs tels quels ; le nombre
// d'itérations est relu dans le hash stocké.

use base64::{Engine, engine::general_purpose::STANDARD};
use hmac::Hmac;
use pbkdf2::pbkdf2;
use rand::{Rng, distributions::Alphanumeric};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "pbkdf2_sha256";
const ITERATIONS: u32 = 600_000;
const SALT_LENGTH: usize = 22;
const KEY_LENGTH: usize = 32;

fn derive(password: &str, salt: &str, iterations: u32) -> Result<[u8; KEY_LENGTH], String> {
    let mut key = [0u8; KEY_LENGTH];
    pbkdf2::<HmacSha256>(password.as_bytes(), salt.as_bytes(), iterations, &mut key)
        .map_err(|e| format!("PBKDF2 derivation failed: {}", e))?;
    Ok(key)
}

/// Hash un nouveau mot de passe (salt alphanumérique aléatoire)
pub fn hash_password(password: &str) -> Result<String, String> {
    let salt: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SALT_LENGTH)
        .map(char::from)
        .collect();

    let key = derive(password, &salt, ITERATIONS)?;
    Ok(format!("{}${}${}${}", ALGORITHM, ITERATIONS, salt, STANDARD.encode(key)))
}

/// Vérifie un mot de passe contre un hash stocké
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, String> {
    // 1. Découper les quatre segments
    let mut parts = stored_hash.splitn(4, '$');
    let (Some(algorithm), Some(iterations), Some(salt), Some(encoded)) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err("Invalid hash format".to_string());
    };

    if algorithm != ALGORITHM {
        return Err(format!("Unsupported hash algorithm: {}", algorithm));
    }
    let iterations = iterations
        .parse::<u32>()
        .map_err(|_| "Invalid iterations".to_string())?;
    let expected = STANDARD
        .decode(encoded)
        .map_err(|e| format!("Invalid hash encoding: {}", e))?;

    // 2. Recalculer avec le même salt
    let computed = derive(password, salt, iterations)?;

    // 3. Comparaison en temps constant
    if expected.len() != computed.len() {
        return Ok(false);
    }
    let diff = computed
        .iter()
        .zip(expected.iter())
        .fold(0u8, |acc, (a, b)| acc | (a ^ b));
    Ok(diff == 0)
}
