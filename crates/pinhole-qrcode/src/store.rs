use crate::Result;
use image::{ImageFormat, Luma};
use pinhole_core::ShortCode;
use qrcode::QrCode;
use std::io::{Cursor, ErrorKind};
use std::path::PathBuf;
use tracing::{debug, trace};

/// Encodes `data` as a QR code and returns the PNG bytes.
pub fn render_png(data: &str) -> Result<Vec<u8>> {
    let code = QrCode::new(data.as_bytes())?;
    let image = code.render::<Luma<u8>>().build();

    let mut png = Vec::new();
    image.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
    Ok(png)
}

/// Directory of generated QR images, one file per short code.
#[derive(Debug, Clone)]
pub struct QrCodeStore {
    dir: PathBuf,
}

impl QrCodeStore {
    /// Opens the store, creating `dir` if needed.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    pub fn path_for(&self, code: &ShortCode) -> PathBuf {
        self.dir.join(format!("{}.png", code.as_str()))
    }

    /// Renders `url` and writes it to the file for `code`, replacing any
    /// previous image.
    pub async fn generate(&self, code: &ShortCode, url: &str) -> Result<PathBuf> {
        let png = render_png(url)?;
        let path = self.path_for(code);
        tokio::fs::write(&path, png).await?;
        debug!(code = %code, path = %path.display(), "wrote QR code");
        Ok(path)
    }

    /// Reads the PNG for `code`. A missing file is `Ok(None)`.
    pub async fn load(&self, code: &ShortCode) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(self.path_for(code)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                trace!(code = %code, "QR code not found");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}
