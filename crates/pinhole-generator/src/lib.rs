pub mod random;
pub mod seq;

use pinhole_core::ShortCode;

pub use random::{generate_code, RandomGenerator, DEFAULT_CODE_LENGTH};
pub use seq::SeqGenerator;

/// Trait for generating short codes.
///
/// Implementations are pure generators that don't interact with storage.
/// Uniqueness is only probabilistic; the caller resolves collisions against
/// the store.
pub trait Generator: Send + Sync + 'static {
    type Output: Into<ShortCode>;

    /// Generates a candidate short code.
    fn generate(&self) -> Self::Output;
}

impl<G: Generator> Generator for std::sync::Arc<G> {
    type Output = G::Output;

    fn generate(&self) -> Self::Output {
        (**self).generate()
    }
}
