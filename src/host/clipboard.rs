//! 剪贴板服务
//!
//! 封装系统剪贴板：文本/HTML 读写，以及粘贴图片的提取。

use std::io::Cursor;
use std::path::PathBuf;

use arboard::Clipboard;

use crate::core::Service;

use super::image::{hex_digest, ImageData, ImageError, ImageService, IMAGE_SIZE_LIMIT};
use super::ports::{ClipboardData, ClipboardPort};

/// arboard-backed adapter. A clipboard may be unavailable (headless
/// session); reads then come back empty and writes are dropped.
pub struct SystemClipboard {
    clipboard: Option<Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self {
            clipboard: Clipboard::new().ok(),
        }
    }
}

impl Default for SystemClipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl ClipboardPort for SystemClipboard {
    fn read_text(&mut self) -> Option<String> {
        self.clipboard.as_mut()?.get_text().ok()
    }

    fn read_html(&mut self) -> Option<String> {
        // arboard has no HTML read; callers fall back to the text flavor
        None
    }

    fn write_text(&mut self, text: &str) {
        if let Some(clipboard) = self.clipboard.as_mut() {
            let _ = clipboard.set_text(text.to_string());
        }
    }

    fn write_html(&mut self, html: &str) {
        if let Some(clipboard) = self.clipboard.as_mut() {
            let _ = clipboard.set_html(html.to_string(), None::<String>);
        }
    }

    fn read_image_png(&mut self) -> Option<Vec<u8>> {
        let raw = self.clipboard.as_mut()?.get_image().ok()?;
        let buffer = image::RgbaImage::from_raw(
            raw.width as u32,
            raw.height as u32,
            raw.bytes.into_owned(),
        )?;
        let mut png = Vec::new();
        image::DynamicImage::ImageRgba8(buffer)
            .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
            .ok()?;
        Some(png)
    }

    fn copied_files(&mut self) -> Vec<PathBuf> {
        match self.clipboard.as_mut() {
            Some(clipboard) => clipboard.get().file_list().unwrap_or_default(),
            None => Vec::new(),
        }
    }
}

pub struct ClipboardService {
    port: Box<dyn ClipboardPort>,
}

impl ClipboardService {
    pub fn new(port: Box<dyn ClipboardPort>) -> Self {
        Self { port }
    }

    pub fn system() -> Self {
        Self::new(Box::new(SystemClipboard::new()))
    }

    pub fn read_data(&mut self) -> ClipboardData {
        ClipboardData {
            text: self.port.read_text().unwrap_or_default(),
            html: self.port.read_html().unwrap_or_default(),
        }
    }

    pub fn read_html(&mut self) -> String {
        self.port.read_html().unwrap_or_default()
    }

    pub fn write_data(&mut self, data: &ClipboardData) {
        if !data.html.is_empty() {
            self.port.write_html(&data.html);
        }
        self.port.write_text(&data.text);
    }

    pub fn copy_html(&mut self, html: &str) {
        self.port.write_html(html);
    }

    /// Image content of the clipboard: a single copied image file, or raw
    /// bitmap data. `Ok(None)` means the clipboard holds no image.
    pub fn clipboard_image(
        &mut self,
        images: &ImageService,
    ) -> Result<Option<ImageData>, ImageError> {
        let files = self.port.copied_files();
        if !files.is_empty() {
            if files.len() > 1 {
                return Err(ImageError::MultipleFiles);
            }
            return images
                .image_data(&files[0].to_string_lossy())
                .map(Some);
        }

        if let Some(png) = self.port.read_image_png() {
            if png.len() > IMAGE_SIZE_LIMIT {
                return Err(ImageError::TooLarge);
            }
            return Ok(Some(ImageData {
                digest: hex_digest(&png),
                name: "截图".to_string(),
                content_type: "image/png".to_string(),
                data: png,
            }));
        }
        Ok(None)
    }
}

impl Service for ClipboardService {
    fn name(&self) -> &'static str {
        "ClipboardService"
    }
}
