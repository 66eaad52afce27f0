use typed_builder::TypedBuilder;

pub const DEFAULT_MAX_ATTEMPTS: usize = 10;

#[derive(Debug, Clone, TypedBuilder)]
pub struct ShortenerSettings {
    /// Public origin short URLs are built from, e.g. `https://pin.example`.
    #[builder(setter(into))]
    pub base_url: String,
    /// Cap on generated candidates tried before giving up.
    #[builder(default = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: usize,
}
