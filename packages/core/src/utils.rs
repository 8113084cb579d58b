// ABOUTME: Shared utility functions for AirWatch
// ABOUTME: Record ID and redemption code generation

use rand::Rng;

/// Generate a record ID with a type prefix, e.g. `ward-V1StGXR8_Z5jdHi6B-myT`
pub fn generate_id(prefix: &str) -> String {
    format!("{}-{}", prefix, nanoid::nanoid!())
}

/// Generate an 8-character uppercase redemption code for reward vouchers
pub fn generate_redemption_code() -> String {
    // Excludes the look-alike pairs 0/O and 1/I
    const CHARSET: &[u8] = b"23456789ABCDEFGHJKLMNPQRSTUVWXYZ";
    let mut rng = rand::thread_rng();
    (0..8)
        .map(|_| {
            let idx = rng.gen_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_id_has_prefix() {
        let id = generate_id("ward");
        assert!(id.starts_with("ward-"));
        assert!(id.len() > "ward-".len());
    }

    #[test]
    fn test_generate_id_unique() {
        assert_ne!(generate_id("sim"), generate_id("sim"));
    }

    #[test]
    fn test_generate_redemption_code() {
        let code = generate_redemption_code();
        assert_eq!(code.len(), 8);
        assert!(code
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
        assert!(!code.contains('0') && !code.contains('O'));
    }
}
