use anyhow::{anyhow, Context, Result};
use image::{GrayImage, Luma};
use qrcode::{EcLevel, QrCode};
use std::path::Path;

/// Encodes a URL into an image file.
pub trait QrEncoder {
    fn encode(&self, url: &str, dest: &Path) -> Result<()>;
}

/// Black-on-white PNG QR codes at error-correction level L.
#[derive(Debug, Clone)]
pub struct QrCodeEncoder {
    module_px: u32,
}

impl QrCodeEncoder {
    pub fn new(module_px: u32) -> Self {
        Self {
            module_px: module_px.max(1),
        }
    }

    pub fn render(&self, url: &str) -> Result<GrayImage> {
        let code = QrCode::with_error_correction_level(url.as_bytes(), EcLevel::L)
            .map_err(|err| anyhow!("failed to encode '{}' as QR code: {}", url, err))?;
        Ok(code
            .render::<Luma<u8>>()
            .quiet_zone(true)
            .module_dimensions(self.module_px, self.module_px)
            .build())
    }
}

impl Default for QrCodeEncoder {
    fn default() -> Self {
        Self::new(10)
    }
}

impl QrEncoder for QrCodeEncoder {
    fn encode(&self, url: &str, dest: &Path) -> Result<()> {
        let image = self.render(url)?;
        image
            .save_with_format(dest, image::ImageFormat::Png)
            .with_context(|| format!("failed to write QR image: {}", dest.display()))
    }
}
