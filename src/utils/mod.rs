pub mod url_validator;

/// 随机短码字符表：URL 安全的字母和数字
const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

pub const CUSTOM_CODE_MIN_LEN: usize = 3;
pub const CUSTOM_CODE_MAX_LEN: usize = 20;

/// Generate a random alphanumeric code of `length` characters.
///
/// Collisions are possible; callers retry against the store.
pub fn generate_random_code(length: usize) -> String {
    use std::iter;

    iter::repeat_with(|| CODE_ALPHABET[rand::random_range(0..CODE_ALPHABET.len())] as char)
        .take(length)
        .collect()
}

/// 校验用户自定义短码：3-20 个字符，只允许字母、数字、下划线和连字符
pub fn is_valid_custom_code(code: &str) -> bool {
    let len = code.chars().count();
    (CUSTOM_CODE_MIN_LEN..=CUSTOM_CODE_MAX_LEN).contains(&len)
        && code
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
