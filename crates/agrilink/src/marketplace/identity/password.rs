//! Credential hashing with Argon2id.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand::rngs::OsRng;

pub(crate) fn hash_secret(secret: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(secret.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

pub(crate) fn verify_secret(
    secret: &str,
    stored_hash: &str,
) -> Result<bool, argon2::password_hash::Error> {
    let parsed = PasswordHash::new(stored_hash)?;
    match Argon2::default().verify_password(secret.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_round_trip() {
        let hash = hash_secret("greenfields").expect("hashes");
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_secret("greenfields", &hash).expect("verifies"));
        assert!(!verify_secret("brownfields", &hash).expect("verifies"));
    }

    #[test]
    fn salts_are_unique_per_hash() {
        let first = hash_secret("same-secret").expect("hashes");
        let second = hash_secret("same-secret").expect("hashes");
        assert_ne!(first, second);
    }
}
