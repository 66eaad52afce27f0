use std::sync::Arc;

use pinhole_core::{Repository, ShortCode};
use pinhole_generator::Generator;
use pinhole_qrcode::QrCodeStore;
use pinhole_redirector::{Redirector, RedirectorService};
use pinhole_shortener::{Shortener, ShortenerService, ShortenerSettings};

#[derive(Clone)]
pub struct AppState {
    shortener: Arc<dyn Shortener>,
    redirector: Arc<dyn Redirector>,
    qrcodes: Arc<QrCodeStore>,
    base_url: String,
}

impl AppState {
    pub fn new(
        shortener: Arc<dyn Shortener>,
        redirector: Arc<dyn Redirector>,
        qrcodes: QrCodeStore,
        public_base_url: impl Into<String>,
    ) -> Self {
        Self {
            shortener,
            redirector,
            qrcodes: Arc::new(qrcodes),
            base_url: public_base_url.into(),
        }
    }

    /// Builds both services over one shared repository.
    pub fn with_repository<R: Repository, G: Generator>(
        repository: Arc<R>,
        generator: G,
        settings: ShortenerSettings,
        qrcodes: QrCodeStore,
    ) -> Self {
        let base_url = settings.base_url.clone();
        let redirector = RedirectorService::new(Arc::clone(&repository));
        let shortener = ShortenerService::new(repository, generator, settings);
        Self::new(Arc::new(shortener), Arc::new(redirector), qrcodes, base_url)
    }

    pub fn shortener(&self) -> &dyn Shortener {
        self.shortener.as_ref()
    }

    pub fn redirector(&self) -> &dyn Redirector {
        self.redirector.as_ref()
    }

    pub fn qrcodes(&self) -> &QrCodeStore {
        &self.qrcodes
    }

    /// Public link to the QR image of `code`.
    pub fn qr_url(&self, code: &ShortCode) -> String {
        format!("{}/qr/{}", self.base_url.trim_end_matches('/'), code)
    }
}
