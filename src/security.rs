//! Security helpers (constant-time compare, storage object keys)

use rand::Rng;
use subtle::ConstantTimeEq;

/// Constant-time equality for shared secrets.
pub fn ct_eq_str(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Build a collision-resistant object key for an uploaded file:
/// `<unix-millis>-<8 random chars>.<ext>`.
/// - Extension is taken from `file_name` and lowercased
/// - Names without a usable extension get `bin`
pub fn generate_storage_key(file_name: &str, unix_millis: i64) -> String {
    const CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::rng();

    let suffix: String = (0..8)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect();

    format!("{}-{}.{}", unix_millis, suffix, file_extension(file_name))
}

fn file_extension(file_name: &str) -> String {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.trim().to_ascii_lowercase())
        .filter(|ext| !ext.is_empty() && ext.len() <= 10 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or_else(|| "bin".to_string())
}
