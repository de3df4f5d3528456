//! Random tokens for public share links and household join codes.

use chrono::Duration;
use rand::Rng;

use crate::types::Timestamp;

/// Length of a public share link token.
pub const SHARE_TOKEN_LEN: usize = 8;

/// Length of a household join code.
pub const JOIN_CODE_LEN: usize = 8;

/// Characters of share tokens (URL-safe, case-sensitive).
const TOKEN_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Characters of join codes: uppercase without look-alikes (0/O, 1/I) since
/// codes are read aloud and typed by hand.
const JOIN_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

fn random_string(alphabet: &[u8], len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| alphabet[rng.random_range(0..alphabet.len())] as char)
        .collect()
}

/// A fresh share-link token.
pub fn generate_token(len: usize) -> String {
    random_string(TOKEN_ALPHABET, len)
}

/// A fresh household join code.
pub fn generate_join_code() -> String {
    random_string(JOIN_CODE_ALPHABET, JOIN_CODE_LEN)
}

/// Canonical form of a user-typed join code.
pub fn normalize_join_code(code: &str) -> String {
    code.trim()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect::<String>()
        .to_uppercase()
}

/// Expiry timestamp `days` after `from`.
pub fn share_expiry(from: Timestamp, days: i64) -> Timestamp {
    from + Duration::days(days)
}

/// A link is expired once `now` has reached its expiry.
pub fn is_expired(expires_at: Timestamp, now: Timestamp) -> bool {
    now >= expires_at
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn tokens_have_requested_length_and_alphabet() {
        let token = generate_token(SHARE_TOKEN_LEN);
        assert_eq!(token.len(), SHARE_TOKEN_LEN);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));

        let code = generate_join_code();
        assert_eq!(code.len(), JOIN_CODE_LEN);
        assert!(code.bytes().all(|b| JOIN_CODE_ALPHABET.contains(&b)));
    }

    #[test]
    fn join_codes_are_normalized() {
        assert_eq!(normalize_join_code(" abcd-ef 12 "), "ABCDEF12");
    }

    #[test]
    fn expiry_boundary() {
        let now = Utc::now();
        let expires = share_expiry(now, 30);
        assert!(!is_expired(expires, now));
        assert!(is_expired(expires, expires));
        assert!(is_expired(share_expiry(now, -1), now));
    }
}
