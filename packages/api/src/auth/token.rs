use rand::rngs::OsRng;
use rand::RngCore;

const TOKEN_LEN: usize = 32;

/// Generate a single-use email verification token: 32 random bytes,
/// hex-encoded.
pub fn generate_verification_token() -> String {
    let mut bytes = [0u8; TOKEN_LEN];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_hex_and_unique() {
        let first = generate_verification_token();
        let second = generate_verification_token();
        assert_eq!(first.len(), TOKEN_LEN * 2);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(first, second);
    }
}
