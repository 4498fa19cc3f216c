/// 短码字母表：a-z, A-Z, 0-9, '-', '_'（共 64 个字符）
pub const CODE_ALPHABET: &[u8; 64] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789-_";

/// 路由允许的最短短码长度
pub const MIN_CODE_LENGTH: usize = 4;

/// Source of candidate short codes.
pub trait CodeGenerator: Send + Sync {
    /// Produce a code of exactly `length` characters.
    fn generate(&self, length: usize) -> String;
}

/// Uniform random codes over [`CODE_ALPHABET`].
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomCodeGenerator;

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self, length: usize) -> String {
        generate_random_code(length)
    }
}

pub fn generate_random_code(length: usize) -> String {
    use std::iter;

    iter::repeat_with(|| CODE_ALPHABET[rand::random_range(0..CODE_ALPHABET.len())] as char)
        .take(length)
        .collect()
}

/// 检查短码是否符合 `[-_A-Za-z0-9]{4,}`
pub fn is_valid_short_code(code: &str) -> bool {
    code.len() >= MIN_CODE_LENGTH && code.bytes().all(|b| CODE_ALPHABET.contains(&b))
}
