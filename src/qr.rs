//! QR images for collection-goal payment links.
//!
//! The actual encoder is a collaborator behind [`QrEncoder`]; this module
//! only decides when to call it and wraps the PNG it returns as a data URI.

use crate::constants::qr::{DEFAULT_MARGIN, DEFAULT_SIZE};
use crate::error::Result;
use crate::locale::{Locale, Text};

/// Rendering options passed to the encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QrOptions {
    /// Pixels per module.
    pub size: u32,
    /// Quiet zone in modules.
    pub margin: u32,
}

impl Default for QrOptions {
    fn default() -> Self {
        Self { size: DEFAULT_SIZE, margin: DEFAULT_MARGIN }
    }
}

/// Turns text into a PNG image of its QR code.
pub trait QrEncoder: Send + Sync {
    /// Encode `text` exactly as given.
    fn encode_png(&self, text: &str, options: QrOptions) -> Result<Vec<u8>>;
}

/// Outcome of building a QR image for one link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QrCode {
    /// Inline PNG ready for an `<img src>`.
    Image {
        /// `data:image/png;base64,...`
        data_uri: String,
        /// The encoded link, for alt text.
        alt_text: String,
    },
    /// The goal has no payment link; the encoder was not called.
    Missing,
    /// The encoder returned no bytes.
    GenerationFailed,
    /// The encoder reported an error.
    Error(String),
}

impl QrCode {
    /// Text shown in place of the image when there is none.
    #[must_use]
    pub fn marker(&self, locale: Locale) -> Option<String> {
        match self {
            Self::Image { .. } => None,
            Self::Missing => Some(locale.text(Text::QrMissing).to_string()),
            Self::GenerationFailed => Some(locale.text(Text::QrGenerationFailed).to_string()),
            Self::Error(message) => Some(format!("{}{message}", locale.text(Text::QrError))),
        }
    }
}

/// Build the QR image for a payment link.
pub fn qr_for_link(encoder: &dyn QrEncoder, link: &str, options: QrOptions) -> QrCode {
    if link.is_empty() {
        return QrCode::Missing;
    }

    match encoder.encode_png(link, options) {
        Ok(png) if png.is_empty() => QrCode::GenerationFailed,
        Ok(png) => QrCode::Image {
            data_uri: format!("data:image/png;base64,{}", base64::encode(&png)),
            alt_text: link.to_string(),
        },
        Err(e) => {
            tracing::warn!("QR encoding failed: {e}");
            QrCode::Error(e.to_string())
        }
    }
}
