//! Encoding Utilities
//!
//! Base64url helpers for compact token segments (JWT header/claims/signature).

use base64::{Engine, engine::general_purpose};

/// Encode bytes as unpadded base64url
pub fn to_base64_url(bytes: &[u8]) -> String {
    general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

/// Decode unpadded base64url to bytes
///
/// Trailing `=` padding is tolerated since some issuers emit it.
pub fn from_base64_url(s: &str) -> Result<Vec<u8>, base64::DecodeError> {
    general_purpose::URL_SAFE_NO_PAD.decode(s.trim_end_matches('='))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_safe_alphabet() {
        let encoded = to_base64_url(&[0xfb, 0xff, 0xfe]);
        assert_eq!(encoded, "-__-");
        assert!(!encoded.contains('='));
    }

    #[test]
    fn test_padding_tolerated() {
        assert_eq!(from_base64_url("YQ==").unwrap(), b"a");
        assert_eq!(from_base64_url("YQ").unwrap(), b"a");
    }

    #[test]
    fn test_rejects_standard_alphabet() {
        assert!(from_base64_url("+/8").is_err());
    }
}
