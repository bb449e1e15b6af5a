//! License secret generation.

/// Generate a fresh license secret: 16 random bytes as uppercase hex.
pub fn generate_license_secret() -> String {
    let bytes: [u8; 16] = rand::random();
    hex::encode_upper(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_shape() {
        let secret = generate_license_secret();
        assert_eq!(secret.len(), 32);
        assert!(
            secret
                .chars()
                .all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c))
        );
    }

    #[test]
    fn test_secrets_differ() {
        assert_ne!(generate_license_secret(), generate_license_secret());
    }
}
