//! Share tokens: 256 bits from the OS RNG, base64url-encoded.
//! Global uniqueness is backed by the store's UNIQUE index.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::RngCore;

pub const TOKEN_BYTES: usize = 32;

/// Generate an unguessable URL-safe share token.
pub fn generate() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_unique_and_url_safe() {
        let mut seen = std::collections::HashSet::new();
        for _ in 0..256 {
            let token = generate();
            assert!(token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
            assert!(seen.insert(token));
        }
    }
}
