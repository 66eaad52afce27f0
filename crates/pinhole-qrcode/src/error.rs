use thiserror::Error;

pub type Result<T> = std::result::Result<T, QrCodeError>;

#[derive(Debug, Error)]
pub enum QrCodeError {
    #[error("failed to encode QR code: {0}")]
    Encode(#[from] qrcode::types::QrError),
    #[error("failed to write PNG: {0}")]
    Image(#[from] image::ImageError),
    #[error("QR code file error: {0}")]
    Io(#[from] std::io::Error),
}
