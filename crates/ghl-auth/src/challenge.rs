//! Challenge and session token generation.
//!
//! Uniform draws from uppercase letters and digits. The challenge deters
//! casual scripted login attempts; it is not a control against a targeted
//! adversary.

use ghl_core::CHALLENGE_LENGTH;
use ghl_core::TOKEN_LENGTH;
use rand::Rng;

const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

fn draw(length: usize) -> String {
    let mut rng = rand::rng();
    (0..length)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}

/// Mints a human-verification challenge.
pub fn challenge() -> String {
    draw(CHALLENGE_LENGTH)
}

/// Mints an opaque session token for the browser cookie.
pub fn token() -> String {
    draw(TOKEN_LENGTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn challenge_is_six_uppercase_alphanumerics() {
        let challenge = challenge();
        assert!(challenge.len() == CHALLENGE_LENGTH);
        assert!(challenge.bytes().all(|b| ALPHABET.contains(&b)));
    }

    #[test]
    fn token_is_thirty_two_alphanumerics() {
        let token = token();
        assert!(token.len() == TOKEN_LENGTH);
        assert!(token.bytes().all(|b| ALPHABET.contains(&b)));
    }
}
