use crate::Generator;
use pinhole_core::ShortCode;
use std::iter;
use typed_builder::TypedBuilder;

pub const DEFAULT_CODE_LENGTH: usize = 6;

const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Draws `length` characters uniformly from `[A-Za-z0-9]`.
pub fn generate_code(length: usize) -> String {
    iter::repeat_with(|| ALPHABET[rand::random_range(0..ALPHABET.len())] as char)
        .take(length)
        .collect()
}

/// Random alphanumeric generator backed by the thread-local RNG.
///
/// With the default length there are 62^6 (about 5.7e10) possible codes.
#[derive(Debug, Clone, Copy, TypedBuilder)]
pub struct RandomGenerator {
    #[builder(default = DEFAULT_CODE_LENGTH)]
    length: usize,
}

impl RandomGenerator {
    pub fn new(length: usize) -> Self {
        Self { length }
    }
}

impl Default for RandomGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_CODE_LENGTH)
    }
}

impl Generator for RandomGenerator {
    type Output = ShortCode;

    fn generate(&self) -> Self::Output {
        ShortCode::generated(generate_code(self.length))
    }
}
