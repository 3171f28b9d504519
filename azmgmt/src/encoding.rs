//! Base64 helpers for configuration payloads

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::errors::{MgmtError, Result};

/// Encode UTF-8 text as standard Base64
pub fn to_base64(text: &str) -> String {
    STANDARD.encode(text.as_bytes())
}

/// Decode standard Base64 into UTF-8 text
pub fn from_base64(encoded: &str) -> Result<String> {
    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|e| MgmtError::protocol("base64 payload", e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| MgmtError::protocol("base64 payload", e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encodes_utf8_text() {
        assert_eq!(to_base64("<Role name=\"Web\"/>"), "PFJvbGUgbmFtZT0iV2ViIi8+");
        assert_eq!(from_base64("PFJvbGUgbmFtZT0iV2ViIi8+").unwrap(), "<Role name=\"Web\"/>");
    }

    #[test]
    fn test_decode_tolerates_surrounding_whitespace() {
        assert_eq!(from_base64("\n  w6k=\n").unwrap(), "é");
    }

    #[test]
    fn test_rejects_malformed_input() {
        assert!(matches!(
            from_base64("not base64!"),
            Err(MgmtError::ProtocolParse { .. })
        ));
        // valid base64, invalid UTF-8
        assert!(from_base64("/w==").is_err());
    }
}
