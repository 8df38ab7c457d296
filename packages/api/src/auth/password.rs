//! # Password hashing and verification — scrypt
//!
//! Provides the two functions used by the local (email + password)
//! authentication path:
//!
//! - [`hash_password`] — generates a random 16-byte salt, derives a 64-byte
//!   key with scrypt (N=2^14, r=8, p=1), and returns
//!   `hex(key) + "." + hex(salt)`. Each call uses a fresh salt, so hashing
//!   the same password twice yields different strings.
//!
//! - [`verify_password`] — splits a stored value on `.`, re-derives the key
//!   with the same parameters, and compares in constant time. Returns
//!   `Ok(true)` on a match, `Ok(false)` on a mismatch, or `Err` if the stored
//!   value is malformed.
//!
//! The salt is fed to the KDF as its hex encoding, which is also the form it
//! is stored in.

use rand::rngs::OsRng;
use rand::RngCore;
use scrypt::{scrypt, Params};
use subtle::ConstantTimeEq;
use thiserror::Error;

const SALT_LEN: usize = 16;
const KEY_LEN: usize = 64;
const LOG_N: u8 = 14;
const R: u32 = 8;
const P: u32 = 1;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("stored password hash is malformed")]
    MalformedHash,
    #[error("key derivation failed")]
    Derivation,
}

/// Hash a password with scrypt. Returns `hex(key).hex(salt)`.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    let salt_hex = hex::encode(salt);
    let key = derive_key(password.as_bytes(), salt_hex.as_bytes())?;
    Ok(format!("{}.{}", hex::encode(key), salt_hex))
}

/// Verify a password against a stored `hex(key).hex(salt)` value.
pub fn verify_password(password: &str, stored: &str) -> Result<bool, PasswordError> {
    let (key_hex, salt_hex) = stored.split_once('.').ok_or(PasswordError::MalformedHash)?;
    let expected = hex::decode(key_hex).map_err(|_| PasswordError::MalformedHash)?;
    if expected.len() != KEY_LEN {
        return Err(PasswordError::MalformedHash);
    }
    let derived = derive_key(password.as_bytes(), salt_hex.as_bytes())?;
    Ok(bool::from(derived[..].ct_eq(&expected[..])))
}

fn derive_key(password: &[u8], salt: &[u8]) -> Result<[u8; KEY_LEN], PasswordError> {
    let params = Params::new(LOG_N, R, P, KEY_LEN).map_err(|_| PasswordError::Derivation)?;
    let mut key = [0u8; KEY_LEN];
    scrypt(password, salt, &params, &mut key).map_err(|_| PasswordError::Derivation)?;
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_round_trips() {
        let stored = hash_password("pw").unwrap();
        assert!(verify_password("pw", &stored).unwrap());
        assert!(!verify_password("other", &stored).unwrap());
    }

    #[test]
    fn hashes_are_salted() {
        let first = hash_password("same password").unwrap();
        let second = hash_password("same password").unwrap();
        assert_ne!(first, second);
        assert!(verify_password("same password", &first).unwrap());
        assert!(verify_password("same password", &second).unwrap());
    }

    #[test]
    fn stored_format_is_key_dot_salt() {
        let stored = hash_password("pw").unwrap();
        let (key_hex, salt_hex) = stored.split_once('.').unwrap();
        assert_eq!(key_hex.len(), KEY_LEN * 2);
        assert_eq!(salt_hex.len(), SALT_LEN * 2);
        assert!(stored.chars().all(|c| c.is_ascii_hexdigit() || c == '.'));
    }

    #[test]
    fn malformed_stored_value_is_an_error() {
        assert!(matches!(
            verify_password("pw", "no-separator"),
            Err(PasswordError::MalformedHash)
        ));
        assert!(matches!(
            verify_password("pw", "zz.not-hex"),
            Err(PasswordError::MalformedHash)
        ));
        assert!(matches!(
            verify_password("pw", "abcd.0123"),
            Err(PasswordError::MalformedHash)
        ));
    }

    #[test]
    fn printable_ascii_passwords_round_trip() {
        for password in ["a", "correct horse battery staple", "p@$$w0rd! ~"] {
            let stored = hash_password(password).unwrap();
            assert!(verify_password(password, &stored).unwrap());
            assert!(!verify_password("wrong", &stored).unwrap());
        }
    }
}
