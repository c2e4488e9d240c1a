pub mod url_validator;

/// Alphabet used for generated codes
pub const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Longest code accepted or generated
pub const MAX_CODE_LENGTH: usize = 32;

pub fn generate_random_code(length: usize) -> String {
    use std::iter;

    // 随机选择字母和数字
    iter::repeat_with(|| CODE_ALPHABET[rand::random_range(0..CODE_ALPHABET.len())] as char)
        .take(length)
        .collect()
}

/// Codes that collide with fixed routes of the HTTP host
pub const RESERVED_CODES: &[&str] = &["api"];

pub fn is_reserved_code(code: &str) -> bool {
    RESERVED_CODES.contains(&code)
}

/// ASCII letters and digits only, 1 to [`MAX_CODE_LENGTH`] characters,
/// and not one of [`RESERVED_CODES`].
pub fn is_valid_short_code(code: &str) -> bool {
    !code.is_empty()
        && !is_reserved_code(code)
        && code.len() <= MAX_CODE_LENGTH
        && code.bytes().all(|b| b.is_ascii_alphanumeric())
}
