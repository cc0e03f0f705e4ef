//! Secure filename generation.
//!
//! Uploaded blobs are named `<timestamp>_<token>_<original name>`: a
//! `YYYYMMDD_HHMMSS` prefix, eight random bytes encoded base64url, and the
//! original file name verbatim. The token makes concurrent uploads of the
//! same file within one second collision-free; keeping the original name at
//! the end keeps remote listings readable.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use rand::RngCore;

use crate::constants::{FILENAME_TIME_FORMAT, FILENAME_TOKEN_BYTES};

pub fn secure_filename(original_name: &str) -> String {
    let timestamp = Utc::now().format(FILENAME_TIME_FORMAT);

    let mut token = [0u8; FILENAME_TOKEN_BYTES];
    rand::rngs::OsRng.fill_bytes(&mut token);

    format!(
        "{}_{}_{}",
        timestamp,
        URL_SAFE_NO_PAD.encode(token),
        original_name
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embeds_original_name() {
        let name = secure_filename("report.pdf");
        assert!(name.ends_with("_report.pdf"));
    }

    #[test]
    fn test_unique_across_calls() {
        let a = secure_filename("same.pdf");
        let b = secure_filename("same.pdf");
        assert_ne!(a, b);
    }

    #[test]
    fn test_prefix_shape() {
        let name = secure_filename("x");
        let parts: Vec<&str> = name.splitn(3, '_').collect();

        // YYYYMMDD, HHMMSS, then token_originalname
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0].len(), 8);
        assert!(parts[0].chars().all(|c| c.is_ascii_digit()));
        assert_eq!(parts[1].len(), 6);
        assert!(parts[1].chars().all(|c| c.is_ascii_digit()));

        // 8 bytes base64url without padding is 11 chars
        let token = parts[2].strip_suffix("_x").unwrap();
        assert_eq!(token.len(), 11);
    }
}
